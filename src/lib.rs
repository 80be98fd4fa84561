//! Help-desk AI gateway
//!
//! Mediates every call from ticket, chat and report features to a remote
//! text-generation service. Calls are throttled, guarded by a circuit
//! breaker, retried with exponential backoff and cached; when the service
//! is unreachable or unconfigured a keyword classifier answers instead, so
//! callers always receive a well-formed result.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
