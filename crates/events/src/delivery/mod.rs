//! Downstream deployment notifiers.

pub mod http;
