pub mod sns;
pub mod transport;
