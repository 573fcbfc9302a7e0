use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

/// Who the work belongs to. The wire labels are the ones the catalog
/// document and the browser use; the long names are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrackKind {
    #[serde(rename = "my", alias = "original")]
    Original,
    #[serde(rename = "mix", alias = "mixed")]
    Mixed,
    #[serde(rename = "friend", alias = "collaboration")]
    Collaboration,
}

impl TrackKind {
    pub const ALL: [Self; 3] = [Self::Original, Self::Mixed, Self::Collaboration];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Original => "my",
            Self::Mixed => "mix",
            Self::Collaboration => "friend",
        }
    }

    #[must_use]
    pub const fn long_name(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Mixed => "mixed",
            Self::Collaboration => "collaboration",
        }
    }
}

impl Display for TrackKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TrackKind {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let s = input.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s || kind.long_name() == s)
            .ok_or_else(|| {
                ValidationError(format!(
                    "unknown track type `{s}`; expected one of my, mix, friend"
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    #[serde(deserialize_with = "scalar_text::one")]
    pub title: String,
    #[serde(default, deserialize_with = "scalar_text::one")]
    pub artist: String,
    #[serde(default, deserialize_with = "scalar_text::one")]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TrackKind,
    #[serde(default, deserialize_with = "scalar_text::list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "scalar_text::list")]
    pub genre: Vec<String>,
    #[serde(deserialize_with = "scalar_text::one")]
    pub file: String,
}

/// Catalog documents are hand-edited, so `title: 1999` or `file: 2024` left
/// unquoted must still read as text. Only plain scalars are accepted.
mod scalar_text {
    use serde::de::{Deserializer, Error, Visitor};
    use serde::Deserialize;
    use std::fmt::Formatter;

    struct ScalarText;

    impl Visitor<'_> for ScalarText {
        type Value = String;

        fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str("a string, number or boolean")
        }

        fn visit_str<E: Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_bool<E: Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    struct Text(String);

    impl<'de> Deserialize<'de> for Text {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            d.deserialize_any(ScalarText).map(Text)
        }
    }

    pub(super) fn one<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        d.deserialize_any(ScalarText)
    }

    pub(super) fn list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        let items = Vec::<Text>::deserialize(d)?;
        Ok(items.into_iter().map(|t| t.0).collect())
    }
}

impl Track {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        kind: TrackKind,
        file: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            description: String::new(),
            kind,
            tags: Vec::new(),
            genre: Vec::new(),
            file: file.into(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genre = genres.into_iter().map(Into::into).collect();
        self
    }

    /// Checks the fields the resolver and the browser key on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError("track title must not be empty".to_string()));
        }
        if self.file.trim().is_empty() {
            return Err(ValidationError(format!(
                "track `{}` has an empty file identifier",
                self.title
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genre.iter().any(|g| g == genre)
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_accepts_wire_labels_and_long_names() {
        assert_eq!("my".parse::<TrackKind>(), Ok(TrackKind::Original));
        assert_eq!("mixed".parse::<TrackKind>(), Ok(TrackKind::Mixed));
        assert_eq!(
            " friend ".parse::<TrackKind>(),
            Ok(TrackKind::Collaboration)
        );
        assert!("remix".parse::<TrackKind>().is_err());
    }

    #[test]
    fn validate_rejects_empty_file_identifier() {
        let track = Track::new("Untitled", "Nobody", TrackKind::Mixed, "  ");
        let err = track.validate().expect_err("empty file must be rejected");
        assert!(err.0.contains("empty file identifier"));
    }

    #[test]
    fn genre_membership_is_exact() {
        let track = Track::new("Comet", "Ricky Legend", TrackKind::Mixed, "Comet")
            .with_genres(["pop", "indie"]);
        assert!(track.has_genre("pop"));
        assert!(!track.has_genre("Pop"));
        assert!(!track.has_genre("po"));
    }
}
