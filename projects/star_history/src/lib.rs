//! GitHub star history chart generator
//!
//! - Fixed repository list and run settings in `config`
//! - Paginated stargazer collection in `fetcher`
//! - Cumulative series derivation in `series`
//! - SVG rendering with plotters in `chart`
//! - Reads GITHUB_TOKEN from the environment when present

pub mod chart;
pub mod config;
pub mod driver;
pub mod fetcher;
pub mod series;
