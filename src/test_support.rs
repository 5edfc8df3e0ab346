#![cfg(test)]

use crate::metadata::Record;

pub fn record(artist: &str, genres: &[&str], hotttnesss: f64) -> Record {
    Record {
        artist_name: artist.to_string(),
        title: None,
        genres: genres.iter().map(|g| g.to_string()).collect(),
        duration: None,
        year: None,
        loudness: None,
        tempo: None,
        key: None,
        mode: None,
        time_signature: None,
        artist_familiarity: None,
        hotttnesss,
    }
}
