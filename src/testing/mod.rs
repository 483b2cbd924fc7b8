//! Testing utilities for Ledgerline.
//!
//! - Oneshot HTTP endpoint testing without running a server
//! - Database testing with SQLite in-memory
//! - Fake data helpers
//!
//! # Example
//!
//! ```rust,ignore
//! use ledgerline::testing;
//!
//! #[tokio::test]
//! async fn test_list_requires_admin() {
//!     let app = /* build router */;
//!
//!     testing::get(app, "/api/admin/plans")
//!         .execute()
//!         .await
//!         .assert_unauthorized();
//! }
//! ```

mod database;
mod fixtures;
mod scenario;

pub use database::TestDb;
pub use fixtures::fake;
pub use scenario::{delete, get, patch, post, put, Scenario, ScenarioAssert};
