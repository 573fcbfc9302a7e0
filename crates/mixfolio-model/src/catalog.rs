use crate::track::{Track, TrackKind};
use std::collections::BTreeSet;

/// Catalog served when the catalog document cannot be used.
#[must_use]
pub fn fallback_tracks() -> Vec<Track> {
    vec![
        Track::new(
            "Wish List (Slowed + Reverbed)",
            "Data Drift",
            TrackKind::Original,
            "Wish List (Slowed + Reverbed)",
        )
        .with_description("Chill phonk song")
        .with_tags(["my", "mix", "master"])
        .with_genres(["phonk"]),
        Track::new(
            "Dark Dreams",
            "Data Drift",
            TrackKind::Original,
            "Dark Dreams",
        )
        .with_description("Old school phonk song")
        .with_tags(["my", "mix", "master"])
        .with_genres(["phonk"]),
        Track::new("Comet", "Ricky Legend", TrackKind::Mixed, "Comet")
            .with_description("Mix and master of a pop song")
            .with_tags(["mix", "master"])
            .with_genres(["pop", "indie", "electronic"]),
    ]
}

#[must_use]
pub fn filter_by_type(tracks: &[Track], kind: TrackKind) -> Vec<Track> {
    tracks.iter().filter(|t| t.kind == kind).cloned().collect()
}

#[must_use]
pub fn filter_by_genre(tracks: &[Track], genre: &str) -> Vec<Track> {
    tracks.iter().filter(|t| t.has_genre(genre)).cloned().collect()
}

#[must_use]
pub fn filter_by_tag(tracks: &[Track], tag: &str) -> Vec<Track> {
    tracks.iter().filter(|t| t.has_tag(tag)).cloned().collect()
}

#[must_use]
pub fn all_genres(tracks: &[Track]) -> BTreeSet<String> {
    tracks
        .iter()
        .flat_map(|t| t.genre.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Track> {
        vec![
            Track::new("A", "x", TrackKind::Original, "a").with_genres(["phonk"]),
            Track::new("B", "y", TrackKind::Mixed, "b").with_genres(["pop", "phonk"]),
            Track::new("C", "z", TrackKind::Collaboration, "c").with_genres(["indie"]),
            Track::new("D", "w", TrackKind::Original, "d").with_genres(["pop"]),
        ]
    }

    #[test]
    fn filter_by_type_keeps_input_order() {
        let files: Vec<_> = filter_by_type(&sample(), TrackKind::Original)
            .into_iter()
            .map(|t| t.file)
            .collect();
        assert_eq!(files, vec!["a", "d"]);
    }

    #[test]
    fn filter_by_genre_is_membership_and_idempotent() {
        let once = filter_by_genre(&sample(), "phonk");
        let files: Vec<_> = once.iter().map(|t| t.file.as_str()).collect();
        assert_eq!(files, vec!["a", "b"]);
        assert_eq!(filter_by_genre(&once, "phonk"), once);
    }

    #[test]
    fn filter_by_genre_without_matches_is_empty() {
        assert!(filter_by_genre(&sample(), "jazz").is_empty());
    }

    #[test]
    fn all_genres_deduplicates() {
        let genres = all_genres(&sample());
        assert_eq!(
            genres.into_iter().collect::<Vec<_>>(),
            vec!["indie", "phonk", "pop"]
        );
        assert!(all_genres(&[]).is_empty());
    }

    #[test]
    fn fallback_catalog_is_valid_and_keyed_uniquely() {
        let tracks = fallback_tracks();
        assert!(!tracks.is_empty());
        let mut files = BTreeSet::new();
        for t in &tracks {
            t.validate().expect("fallback track must validate");
            assert!(files.insert(t.file.clone()), "duplicate file {}", t.file);
        }
    }
}
