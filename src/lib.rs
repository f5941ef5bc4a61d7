//! hwlicense - hardware-bound license validation server
//!
//! A license key carries a ceiling on how many distinct machines may use it.
//! Each machine is identified by its board UUID and disk serial; the first
//! validation from a machine takes a slot in the activation ledger and later
//! validations from the same machine are idempotent.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod licensing;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod util;
