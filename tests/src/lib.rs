//! # Carrier Gateway Test Suite
//!
//! Drives the real `reqwest` transport and both carrier clients against an
//! in-process mock carrier.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── mock_carrier.rs   # axum server speaking the DHL and Canada Post wire formats
//! └── integration/      # End-to-end flows per carrier and through the registry
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p carrier-tests
//! cargo test -p carrier-tests integration::dhl_flow
//! ```

#![allow(dead_code)]

pub mod integration;
pub mod mock_carrier;
