//! Leave ledger and reporting engine
//!
//! This crate tracks employee leave requests against an annual allowance and
//! reports usage: employees, leave requests and holidays, date-range
//! normalization, and per-employee annual usage reports, behind a store with
//! a remote and a local snapshot backend.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ids;
pub mod models;
pub mod store;
