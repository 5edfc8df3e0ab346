use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use log::{debug, info};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use super::{FeatureIndex, MetadataAccessor, Record};
use crate::{
    error::{ExperimentError, Result},
    settings::{Settings, VocabularyScope},
};

/// Lifespan reported for artists with fewer than two dated songs.
pub const UNKNOWN_LIFESPAN: f64 = 0.0;

#[derive(Debug, Default, Clone, Copy)]
struct ArtistStats {
    first_year: Option<u32>,
    last_year: Option<u32>,
    dated_songs: usize,
    popular_songs: usize,
}

/// In-memory song dataset, split once into training and testing sets.
#[derive(Debug)]
pub struct SongCorpus {
    training: Vec<Record>,
    testing: Vec<Record>,
    genres: FeatureIndex,
    artists: FeatureIndex,
    artist_stats: HashMap<String, ArtistStats>,
    average_hotttnesss: f64,
}

impl SongCorpus {
    /// Reads the dataset named by `settings` and builds the corpus from it.
    ///
    /// # Errors
    /// Returns an `ExperimentError` if the file cannot be read or parsed, or if
    /// it cannot be split into two non-empty sets.
    pub fn load(settings: &Settings) -> Result<Self> {
        let records = read_records(&settings.dataset_path)?;
        Self::new(records, settings)
    }

    /// Builds the corpus from already loaded records.
    ///
    /// Artist statistics and the average hotttnesss always cover every record;
    /// the vocabularies follow `settings.vocabulary`.
    ///
    /// # Errors
    /// Returns `ExperimentError::InvalidConfig` if fewer than two records are given.
    pub fn new(mut records: Vec<Record>, settings: &Settings) -> Result<Self> {
        if records.len() < 2 {
            return Err(ExperimentError::InvalidConfig(format!(
                "at least two records are needed to split a dataset, got {}",
                records.len()
            )));
        }

        let artist_stats = artist_stats(&records, settings.popularity_threshold);
        let average_hotttnesss =
            records.iter().map(|r| r.hotttnesss).sum::<f64>() / records.len() as f64;

        if let Some(seed) = settings.seed {
            debug!("shuffling {} records with seed {seed}", records.len());
            records.shuffle(&mut StdRng::seed_from_u64(seed));
        }

        let total = records.len();
        let test_len = ((total as f64 * settings.test_fraction).ceil() as usize).clamp(1, total - 1);
        let train_len = total - test_len;

        let vocabulary = match settings.vocabulary {
            VocabularyScope::FullCorpus => &records[..],
            VocabularyScope::TrainingOnly => &records[..train_len],
        };
        let genres = FeatureIndex::from_names(
            vocabulary.iter().flat_map(|r| r.genres.iter().map(String::as_str)),
        );
        let artists = FeatureIndex::from_names(vocabulary.iter().map(|r| r.artist_name.as_str()));

        let testing = records.split_off(train_len);
        let training = records;

        info!(
            "split {total} records into {} training and {} testing, {} genres, {} artists",
            training.len(),
            testing.len(),
            genres.len(),
            artists.len()
        );

        Ok(Self {
            training,
            testing,
            genres,
            artists,
            artist_stats,
            average_hotttnesss,
        })
    }
}

/// Reads a JSON array of records.
///
/// # Errors
/// Returns `ExperimentError::Io` or `ExperimentError::Parse`.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    info!("loading records from {}", path.display());
    let file = File::open(path).map_err(|source| ExperimentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| ExperimentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn artist_stats(records: &[Record], popularity_threshold: f64) -> HashMap<String, ArtistStats> {
    let mut stats: HashMap<String, ArtistStats> = HashMap::new();

    for record in records {
        let entry = stats.entry(record.artist_name.clone()).or_default();

        if let Some(year) = record.year {
            entry.first_year = Some(entry.first_year.map_or(year, |y| y.min(year)));
            entry.last_year = Some(entry.last_year.map_or(year, |y| y.max(year)));
            entry.dated_songs += 1;
        }

        if record.hotttnesss > popularity_threshold {
            entry.popular_songs += 1;
        }
    }

    stats
}

impl MetadataAccessor for SongCorpus {
    fn datasets(&self) -> (&[Record], &[Record]) {
        (&self.training, &self.testing)
    }

    fn genre_feature_info(&self) -> &FeatureIndex {
        &self.genres
    }

    fn artist_feature_info(&self) -> &FeatureIndex {
        &self.artists
    }

    fn artist_lifespan(&self, artist_name: &str) -> f64 {
        match self.artist_stats.get(artist_name) {
            Some(&ArtistStats {
                first_year: Some(first),
                last_year: Some(last),
                dated_songs,
                ..
            }) if dated_songs >= 2 => f64::from(last - first),
            _ => UNKNOWN_LIFESPAN,
        }
    }

    fn num_popular_songs(&self, artist_name: &str) -> usize {
        self.artist_stats
            .get(artist_name)
            .map_or(0, |s| s.popular_songs)
    }

    fn average_hotttnesss(&self) -> f64 {
        self.average_hotttnesss
    }
}
