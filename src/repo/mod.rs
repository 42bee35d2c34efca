//! Data access. Every function takes the caller's connection so a handler
//! decides whether it runs on a plain pooled connection or inside a transaction.

pub mod attendance;
pub mod employee;
