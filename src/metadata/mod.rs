mod corpus;
mod index;
mod record;

pub use corpus::{SongCorpus, UNKNOWN_LIFESPAN};
pub use index::FeatureIndex;
pub use record::{MetadataField, Record};

/// Read-only lookups over a loaded song dataset.
///
/// Implementations are built once per run; every lookup is pure.
pub trait MetadataAccessor {
    /// Returns the disjoint training and testing sets.
    fn datasets(&self) -> (&[Record], &[Record]);

    /// Returns the genre vocabulary; its length is the genre component width.
    fn genre_feature_info(&self) -> &FeatureIndex;

    /// Returns the artist vocabulary; its length is the artist component width.
    fn artist_feature_info(&self) -> &FeatureIndex;

    /// Years between the artist's first and last dated songs, or
    /// `UNKNOWN_LIFESPAN` when fewer than two of their songs are dated.
    fn artist_lifespan(&self, artist_name: &str) -> f64;

    /// Number of the artist's songs whose hotttnesss exceeds the popularity
    /// threshold.
    fn num_popular_songs(&self, artist_name: &str) -> usize;

    /// Mean hotttnesss over every loaded record.
    fn average_hotttnesss(&self) -> f64;
}
