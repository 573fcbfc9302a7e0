// SPDX-License-Identifier: Apache-2.0

use mixfolio_model::{fallback_tracks, Track};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Why the catalog document could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLoadFailure {
    Missing,
    Unreadable(String),
    Syntax(String),
    NotAList,
    NoValidRecords { dropped: usize },
}

impl CatalogLoadFailure {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Unreadable(_) => "unreadable",
            Self::Syntax(_) => "syntax",
            Self::NotAList => "not_a_list",
            Self::NoValidRecords { .. } => "no_valid_records",
        }
    }
}

impl Display for CatalogLoadFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "catalog document not found"),
            Self::Unreadable(e) => write!(f, "catalog document unreadable: {e}"),
            Self::Syntax(e) => write!(f, "catalog document is not valid yaml: {e}"),
            Self::NotAList => write!(f, "catalog document must be a list of tracks"),
            Self::NoValidRecords { dropped } => {
                write!(f, "all {dropped} catalog records are malformed")
            }
        }
    }
}

impl std::error::Error for CatalogLoadFailure {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Document { dropped_records: usize },
    Fallback { reason: CatalogLoadFailure },
}

impl CatalogSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Document { .. } => "document",
            Self::Fallback { .. } => "fallback",
        }
    }

    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLoad {
    pub tracks: Vec<Track>,
    pub source: CatalogSource,
}

/// A parsed document: the records kept and how many were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogDocument {
    pub tracks: Vec<Track>,
    pub dropped_records: usize,
}

/// Decodes a YAML list of tracks record by record. Records that fail to
/// decode or validate, and repeats of an already seen `file`, are dropped.
/// A non-empty list with no usable record is a failure.
pub fn parse_catalog_document(raw: &str) -> Result<CatalogDocument, CatalogLoadFailure> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(raw).map_err(|e| CatalogLoadFailure::Syntax(e.to_string()))?;
    let serde_yaml::Value::Sequence(records) = value else {
        return Err(CatalogLoadFailure::NotAList);
    };
    let total = records.len();
    let mut seen_files = HashSet::new();
    let mut tracks = Vec::with_capacity(total);
    for (index, record) in records.into_iter().enumerate() {
        let decoded = serde_yaml::from_value::<Track>(record)
            .map_err(|e| e.to_string())
            .and_then(|track| {
                track.validate().map(|()| track).map_err(|e| e.to_string())
            });
        match decoded {
            Ok(track) if !seen_files.insert(track.file.clone()) => {
                warn!(index, file = %track.file, "dropping catalog record with duplicate file");
            }
            Ok(track) => tracks.push(track),
            Err(reason) => warn!(index, reason = %reason, "dropping malformed catalog record"),
        }
    }
    let dropped_records = total - tracks.len();
    if total > 0 && tracks.is_empty() {
        return Err(CatalogLoadFailure::NoValidRecords {
            dropped: dropped_records,
        });
    }
    Ok(CatalogDocument {
        tracks,
        dropped_records,
    })
}

/// Loads the track catalog from a YAML document, substituting the embedded
/// fallback catalog whenever the document cannot be used.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    path: PathBuf,
    fallback: Vec<Track>,
}

impl CatalogLoader {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            fallback: fallback_tracks(),
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: Vec<Track>) -> Self {
        self.fallback = fallback;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn fallback(&self) -> &[Track] {
        &self.fallback
    }

    /// Never fails; the source of the tracks is reported alongside them.
    #[must_use]
    pub fn load(&self) -> CatalogLoad {
        match self.read_document() {
            Ok(doc) => CatalogLoad {
                tracks: doc.tracks,
                source: CatalogSource::Document {
                    dropped_records: doc.dropped_records,
                },
            },
            Err(reason) => {
                warn!(
                    event = "catalog_fallback",
                    reason = reason.as_str(),
                    detail = %reason,
                    path = %self.path.display(),
                    "catalog document unusable, serving fallback catalog"
                );
                CatalogLoad {
                    tracks: self.fallback.clone(),
                    source: CatalogSource::Fallback { reason },
                }
            }
        }
    }

    fn read_document(&self) -> Result<CatalogDocument, CatalogLoadFailure> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CatalogLoadFailure::Missing,
            _ => CatalogLoadFailure::Unreadable(e.to_string()),
        })?;
        parse_catalog_document(&raw)
    }
}
