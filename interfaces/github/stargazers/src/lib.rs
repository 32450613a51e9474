//! Thin client for the GitHub REST stargazers listing.
//!
//! - `index` issues one page request and hands back the raw status and body
//! - `models` holds the timestamped star records returned by that endpoint

pub mod index;
pub mod models;
