use serde::{Deserialize, Serialize};

/// One song and the metadata known about it and its artist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub artist_name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Length of the song in seconds.
    pub duration: Option<f64>,
    pub year: Option<u32>,
    pub loudness: Option<f64>,
    pub tempo: Option<f64>,
    pub key: Option<u8>,
    pub mode: Option<u8>,
    pub time_signature: Option<u8>,
    pub artist_familiarity: Option<f64>,
    /// Popularity score being predicted.
    pub hotttnesss: f64,
}

/// A scalar metadata field that may be appended to a feature vector.
///
/// The declaration order is the order fields are appended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    Duration,
    Year,
    Loudness,
    Tempo,
    Key,
    Mode,
    TimeSignature,
    ArtistFamiliarity,
}

impl MetadataField {
    pub const ALL: [MetadataField; 8] = [
        MetadataField::Duration,
        MetadataField::Year,
        MetadataField::Loudness,
        MetadataField::Tempo,
        MetadataField::Key,
        MetadataField::Mode,
        MetadataField::TimeSignature,
        MetadataField::ArtistFamiliarity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MetadataField::Duration => "duration",
            MetadataField::Year => "year",
            MetadataField::Loudness => "loudness",
            MetadataField::Tempo => "tempo",
            MetadataField::Key => "key",
            MetadataField::Mode => "mode",
            MetadataField::TimeSignature => "time_signature",
            MetadataField::ArtistFamiliarity => "artist_familiarity",
        }
    }

    /// Reads this field from `record` as a real number, if present.
    pub fn value(self, record: &Record) -> Option<f64> {
        match self {
            MetadataField::Duration => record.duration,
            MetadataField::Year => record.year.map(f64::from),
            MetadataField::Loudness => record.loudness,
            MetadataField::Tempo => record.tempo,
            MetadataField::Key => record.key.map(f64::from),
            MetadataField::Mode => record.mode.map(f64::from),
            MetadataField::TimeSignature => record.time_signature.map(f64::from),
            MetadataField::ArtistFamiliarity => record.artist_familiarity,
        }
    }
}
