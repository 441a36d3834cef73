//! Observability for coursedb
//!
//! Structured, synchronous, deterministic event logging. Observability is
//! read-only: it has no side effects on execution and must never fail an
//! operation.

mod logger;

pub use logger::log_event;
