//! # Adapters Layer
//!
//! Translation between the shared domain model and DHL's wire format, plus
//! the OAuth token handling every DHL call goes through.

pub mod auth;
pub mod mapping;
pub mod parsing;

pub use auth::DhlAuthenticator;
pub use mapping::{build_label_request, map_address, package_id_for};
pub use parsing::{parse_label_response, parse_tracking_response, ParsedLabel};
