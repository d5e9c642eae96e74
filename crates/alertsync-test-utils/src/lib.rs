//! Shared test utilities for the alertsync workspace.
//!
//! This crate provides standardised fixtures to eliminate duplication across
//! crate test suites. It is a dev-dependency only — never published.
//!
//! - [`MockDashboard`] — in-memory `DashboardClient` with scriptable
//!   failures and recorded mutation calls
//! - [`builders`] — terse constructors for configuration documents

pub mod builders;
pub mod mock;

pub use mock::MockDashboard;
