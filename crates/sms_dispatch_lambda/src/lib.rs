//! AWS-oriented adapters and handlers for the SMS dispatch pipeline.
//!
//! This crate owns runtime integration details (Lambda handlers and the SNS
//! transport adapter) while `sms_dispatch_core` holds the wire contracts both
//! pipeline stages share.

pub mod adapters;
pub mod handlers;
