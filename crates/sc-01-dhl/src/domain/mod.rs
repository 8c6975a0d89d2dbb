//! # Domain Module
//!
//! DHL wire shapes.

pub mod wire;

pub use wire::*;
