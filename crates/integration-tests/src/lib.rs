//! Integration tests for Alderwood.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p alderwood-cli -- migrate
//!
//! # Start the API server
//! cargo run -p alderwood-api
//!
//! # Run integration tests
//! cargo test -p alderwood-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `account_flows` - registration, login, profile
//! - `order_lifecycle` - placement, listing, transitions, ownership
//! - `password_reset` - reset token round trip
//!
//! The tests talk to a running server at `SHOP_BASE_API_URL`
//! (default `http://localhost:5000`) and are `#[ignore]`d by default.
