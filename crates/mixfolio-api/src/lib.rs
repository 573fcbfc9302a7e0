#![forbid(unsafe_code)]

mod errors;
pub mod error_mapping;
mod params;

pub use error_mapping::{map_error, map_resolve_error, ApiErrorMapping};
pub use errors::{ApiError, ApiErrorCode};
pub use params::{parse_track_query, TrackQuery, TRACK_QUERY_PARAMS};

pub const CRATE_NAME: &str = "mixfolio-api";
