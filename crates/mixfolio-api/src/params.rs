use crate::errors::ApiError;
use mixfolio_model::{filter_by_genre, filter_by_tag, filter_by_type, Track, TrackKind};
use std::collections::BTreeMap;

pub const TRACK_QUERY_PARAMS: [&str; 3] = ["type", "genre", "tag"];

/// Optional filters accepted by `GET /api/tracks`. Unknown parameters are
/// ignored so cache-busting query strings keep working.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackQuery {
    pub kind: Option<TrackKind>,
    pub genre: Option<String>,
    pub tag: Option<String>,
}

impl TrackQuery {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.genre.is_none() && self.tag.is_none()
    }

    /// Filters compose; catalog order is preserved.
    #[must_use]
    pub fn apply(&self, tracks: &[Track]) -> Vec<Track> {
        let mut out = tracks.to_vec();
        if let Some(kind) = self.kind {
            out = filter_by_type(&out, kind);
        }
        if let Some(genre) = &self.genre {
            out = filter_by_genre(&out, genre);
        }
        if let Some(tag) = &self.tag {
            out = filter_by_tag(&out, tag);
        }
        out
    }
}

pub fn parse_track_query(query: &BTreeMap<String, String>) -> Result<TrackQuery, ApiError> {
    let kind = match query.get("type") {
        Some(raw) => Some(
            raw.parse::<TrackKind>()
                .map_err(|_| ApiError::invalid_param("type", raw))?,
        ),
        None => None,
    };
    Ok(TrackQuery {
        kind,
        genre: non_empty(query, "genre")?,
        tag: non_empty(query, "tag")?,
    })
}

fn non_empty(query: &BTreeMap<String, String>, name: &str) -> Result<Option<String>, ApiError> {
    match query.get(name) {
        Some(raw) if raw.trim().is_empty() => Err(ApiError::invalid_param(name, raw)),
        Some(raw) => Ok(Some(raw.clone())),
        None => Ok(None),
    }
}
