//! HTTP surface tests for Shutterfinch.
//!
//! These tests build the full application router (session layer, CORS,
//! request IDs, rate limiting) over a per-test database and drive it with
//! in-process requests, so the whole middleware stack is exercised without
//! binding a port.
//!
//! # Running Tests
//!
//! ```bash
//! # Run with a Postgres instance available
//! DATABASE_URL=postgres://localhost/shutterfinch_test cargo test -p shutterfinch-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `http_surface` - Health checks, 404s, request IDs, open endpoints
//! - `auth_surface` - OAuth login redirects, callback validation, logout
//! - `api_surface` - Authentication requirements on the API routes
//!
//! Handler logic and repository behaviour are covered by the server crate's
//! own tests; this crate pins the wiring.
