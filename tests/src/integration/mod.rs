//! End-to-end flows over real HTTP.

pub mod canada_post_flow;
pub mod dhl_flow;
pub mod registry_flow;
