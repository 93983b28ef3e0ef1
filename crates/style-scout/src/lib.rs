//! Style Scout: extract a web page's palette and typography and classify
//! its colors into semantic roles.

pub mod analyzer;
pub mod collector;
pub mod color;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod kit;
pub mod label;
pub mod overrides;
pub mod rank;
pub mod sizes;
pub mod types;

pub use analyzer::{build_profile, validate_url, Analyzer};
pub use color::{normalize, parse_color, rank_colors, strongest_alpha, Rgb};
pub use config::AnalyzerConfig;
pub use extract::{extract, CssVars, CustomProperties, Signals};
pub use fetch::{FetchError, FetchOptions, FetchResponse, Fetcher, HttpFetcher};
pub use kit::{build_kit_settings, KitSettings};
pub use label::{label, label_with_alpha};
pub use overrides::ProfileOverrides;
pub use rank::rank_fonts;
pub use types::*;
