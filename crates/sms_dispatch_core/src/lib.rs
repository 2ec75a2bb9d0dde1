//! Shared SMS dispatch pipeline contracts.
//!
//! This crate owns the wire shapes both pipeline stages agree on, plus the
//! validation and decoding rules applied to inbound payloads. It
//! intentionally excludes AWS SDK and Lambda runtime concerns.

pub mod contract;
