use std::collections::BTreeMap;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ExperimentError, Result},
    metadata::{MetadataAccessor, MetadataField, Record},
    settings::Variant,
};

/// Which components make up a feature vector.
///
/// Components are laid out in field order: genre, artist, metadata fields in
/// `MetadataField` order, artist lifespan, number of popular songs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureFlags {
    /// Multi-hot encoding of the record's genre tags.
    pub genre: bool,
    /// One-hot encoding of the record's artist.
    pub artist: bool,
    pub metadata: BTreeMap<MetadataField, bool>,
    pub artist_lifespan: bool,
    pub num_popular: bool,
}

impl FeatureFlags {
    /// Only the genre component.
    pub fn genre_only() -> Self {
        Self {
            genre: true,
            ..Self::default()
        }
    }

    /// Only the given metadata fields.
    pub fn metadata_only<I: IntoIterator<Item = MetadataField>>(fields: I) -> Self {
        Self {
            metadata: fields.into_iter().map(|f| (f, true)).collect(),
            ..Self::default()
        }
    }

    /// Returns a copy with the scalar of `variant` enabled.
    pub fn with_variant(&self, variant: Variant) -> Self {
        let mut flags = self.clone();
        match variant {
            Variant::Basic => {}
            Variant::ArtistLifespan => flags.artist_lifespan = true,
            Variant::NumPopular => flags.num_popular = true,
        }
        flags
    }

    /// Enabled metadata fields, in append order.
    pub fn enabled_metadata(&self) -> impl Iterator<Item = MetadataField> + '_ {
        self.metadata
            .iter()
            .filter(|&(_, &enabled)| enabled)
            .map(|(&field, _)| field)
    }
}

/// Turns records into fixed-width numeric vectors.
///
/// Genres or artists outside the vocabulary contribute zeros. The width only
/// depends on the flags and the vocabularies, so every vector built by the
/// same builder has the same length.
pub struct FeatureVectorBuilder<'a> {
    metadata: &'a dyn MetadataAccessor,
    flags: &'a FeatureFlags,
    width: usize,
}

impl<'a> FeatureVectorBuilder<'a> {
    /// # Errors
    /// Returns `ExperimentError::InvalidConfig` if the flags select no column at all.
    pub fn new(metadata: &'a dyn MetadataAccessor, flags: &'a FeatureFlags) -> Result<Self> {
        let mut width = flags.enabled_metadata().count();
        if flags.genre {
            width += metadata.genre_feature_info().len();
        }
        if flags.artist {
            width += metadata.artist_feature_info().len();
        }
        width += usize::from(flags.artist_lifespan) + usize::from(flags.num_popular);

        if width == 0 {
            return Err(ExperimentError::InvalidConfig(
                "the enabled features produce an empty feature vector".into(),
            ));
        }

        Ok(Self {
            metadata,
            flags,
            width,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Builds the feature vector of a single record.
    ///
    /// # Errors
    /// Returns `ExperimentError::MissingField` if an enabled metadata field is
    /// absent from `record`.
    pub fn build(&self, record: &Record) -> Result<Vec<f64>> {
        let mut vector = Vec::with_capacity(self.width);

        if self.flags.genre {
            let index = self.metadata.genre_feature_info();
            let start = vector.len();
            vector.resize(start + index.len(), 0.0);
            for genre in &record.genres {
                if let Some(i) = index.index_of(genre) {
                    vector[start + i] = 1.0;
                }
            }
        }

        if self.flags.artist {
            let index = self.metadata.artist_feature_info();
            let start = vector.len();
            vector.resize(start + index.len(), 0.0);
            if let Some(i) = index.index_of(&record.artist_name) {
                vector[start + i] = 1.0;
            }
        }

        for field in self.flags.enabled_metadata() {
            let value = field
                .value(record)
                .ok_or_else(|| ExperimentError::MissingField {
                    artist: record.artist_name.clone(),
                    field: field.name(),
                })?;
            vector.push(value);
        }

        if self.flags.artist_lifespan {
            vector.push(self.metadata.artist_lifespan(&record.artist_name));
        }

        if self.flags.num_popular {
            vector.push(self.metadata.num_popular_songs(&record.artist_name) as f64);
        }

        debug_assert_eq!(vector.len(), self.width);
        Ok(vector)
    }

    /// Builds one row per record.
    ///
    /// # Errors
    /// Fails on the first record `build` rejects.
    pub fn build_all(&self, records: &[Record]) -> Result<Array2<f64>> {
        let mut data = Vec::with_capacity(records.len() * self.width);
        for record in records {
            data.extend(self.build(record)?);
        }

        Array2::from_shape_vec((records.len(), self.width), data).map_err(|_| {
            ExperimentError::InvalidConfig("feature vectors of uneven width".into())
        })
    }
}

/// The hotttnesss of every record, in order.
pub fn expected_outputs(records: &[Record]) -> Array1<f64> {
    records.iter().map(|r| r.hotttnesss).collect()
}
