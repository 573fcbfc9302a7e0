#![forbid(unsafe_code)]
//! Portfolio model SSOT: catalog tracks and the audio format tables the
//! asset resolver tries.

mod audio;
mod catalog;
mod track;

pub use audio::{
    audio_url, content_type_for_extension, has_extension, split_extension, AudioFormat,
    AudioVariant, CandidateExtension, CANDIDATE_EXTENSIONS, DEFAULT_CONTENT_TYPE,
    FILES_ROUTE_PREFIX,
};
pub use catalog::{all_genres, fallback_tracks, filter_by_genre, filter_by_tag, filter_by_type};
pub use track::{Track, TrackKind, ValidationError};

pub const CRATE_NAME: &str = "mixfolio-model";
