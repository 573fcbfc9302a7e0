use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";
pub const FILES_ROUTE_PREFIX: &str = "/files";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
    Flac,
    Ogg,
    Aac,
    M4a,
}

impl AudioFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
            Self::Aac => "aac",
            Self::M4a => "m4a",
        }
    }

    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Flac => "audio/flac",
            Self::Ogg => "audio/ogg",
            Self::Aac | Self::M4a => "audio/aac",
        }
    }

    /// Case-insensitive; the leading dot is optional.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        [
            Self::Mp3,
            Self::Wav,
            Self::Flac,
            Self::Ogg,
            Self::Aac,
            Self::M4a,
        ]
        .into_iter()
        .find(|f| f.extension().eq_ignore_ascii_case(ext))
    }
}

impl Display for AudioFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateExtension {
    pub suffix: &'static str,
    pub format: AudioFormat,
}

/// Lookup order for extension-less requests: mp3 is the delivery format,
/// wav the source of truth, everything else is last resort. Suffixes are
/// matched case-sensitively against storage keys.
pub const CANDIDATE_EXTENSIONS: [CandidateExtension; 8] = [
    CandidateExtension {
        suffix: ".mp3",
        format: AudioFormat::Mp3,
    },
    CandidateExtension {
        suffix: ".MP3",
        format: AudioFormat::Mp3,
    },
    CandidateExtension {
        suffix: ".wav",
        format: AudioFormat::Wav,
    },
    CandidateExtension {
        suffix: ".WAV",
        format: AudioFormat::Wav,
    },
    CandidateExtension {
        suffix: ".flac",
        format: AudioFormat::Flac,
    },
    CandidateExtension {
        suffix: ".ogg",
        format: AudioFormat::Ogg,
    },
    CandidateExtension {
        suffix: ".aac",
        format: AudioFormat::Aac,
    },
    CandidateExtension {
        suffix: ".m4a",
        format: AudioFormat::M4a,
    },
];

#[must_use]
pub fn content_type_for_extension(ext: &str) -> &'static str {
    AudioFormat::from_extension(ext)
        .map_or(DEFAULT_CONTENT_TYPE, AudioFormat::content_type)
}

/// Splits `name` into stem and extension (dot included). Only the last path
/// segment is inspected and a leading dot does not start an extension, so
/// `.hidden` has none while `Comet.flac` has `.flac`.
#[must_use]
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    let segment_start = name.rfind('/').map_or(0, |i| i + 1);
    match name[segment_start..].rfind('.') {
        Some(idx) if idx > 0 => {
            let split_at = segment_start + idx;
            (&name[..split_at], Some(&name[split_at..]))
        }
        _ => (name, None),
    }
}

#[must_use]
pub fn has_extension(filename: &str, extension: &str) -> bool {
    let ext = extension.strip_prefix('.').unwrap_or(extension);
    filename
        .to_ascii_lowercase()
        .ends_with(&format!(".{}", ext.to_ascii_lowercase()))
}

/// Which rendition of a track the player asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioVariant {
    /// Let the server pick by lookup order.
    Original,
    Format(AudioFormat),
}

impl Default for AudioVariant {
    fn default() -> Self {
        Self::Format(AudioFormat::Mp3)
    }
}

#[must_use]
pub fn audio_url(file: &str, variant: AudioVariant) -> String {
    match variant {
        AudioVariant::Original => format!("{FILES_ROUTE_PREFIX}/{file}"),
        AudioVariant::Format(format) => format!("{FILES_ROUTE_PREFIX}/{file}.{format}"),
    }
}
