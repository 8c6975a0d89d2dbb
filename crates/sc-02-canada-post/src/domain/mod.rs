//! # Domain Module
//!
//! Canada Post XML document shapes.

pub mod xml;

pub use xml::*;
