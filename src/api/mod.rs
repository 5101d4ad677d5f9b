//! Endpoint wrappers, grouped by backend resource.
//!
//! Each file adds an `impl ApiClient` block; paths are relative to the
//! `/api` base the client was built with.

pub mod analytics;
pub mod auth;
pub mod budgets;
pub mod expenses;
