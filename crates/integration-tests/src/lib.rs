//! Integration tests for Zenthra analytics.
//!
//! # Running Tests
//!
//! ```bash
//! # Point at a running record store
//! ZENTHRA_STORE_URL=http://127.0.0.1:8090 \
//!     cargo test -p zenthra-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `analytics_reports` - End-to-end report runs against a live store,
//!   asserting the cross-report invariants that hold for any order set
//!
//! The live tests are `#[ignore]`d by default so a plain `cargo test`
//! stays self-contained.
