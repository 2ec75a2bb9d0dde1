pub mod ingress;
pub mod queue;
