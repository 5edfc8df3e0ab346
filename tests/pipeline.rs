use std::{fs, num::NonZeroUsize, path::Path};

use hotttnesss::{
    experiment::base_flags,
    metadata::{MetadataField, Record},
    run_variants,
    settings::{PredictionMode, Variant},
    ExperimentError, FeatureFlags, ModelChoice, Settings,
};
use tempfile::TempDir;

fn song(artist: &str, genres: &[&str], year: u32, duration: f64, hotttnesss: f64) -> Record {
    Record {
        artist_name: artist.to_string(),
        title: None,
        genres: genres.iter().map(|g| g.to_string()).collect(),
        duration: Some(duration),
        year: Some(year),
        loudness: None,
        tempo: None,
        key: None,
        mode: None,
        time_signature: None,
        artist_familiarity: None,
        hotttnesss,
    }
}

fn songs() -> Vec<Record> {
    vec![
        song("The Clash", &["punk", "rock"], 1977, 180.0, 0.72),
        song("The Clash", &["punk"], 1982, 210.0, 0.65),
        song("Coltrane", &["jazz"], 1959, 420.0, 0.55),
        song("Coltrane", &["jazz"], 1965, 600.0, 0.48),
        song("Muddy Waters", &["blues"], 1955, 170.0, 0.31),
        song("Muddy Waters", &["blues"], 1977, 240.0, 0.28),
        song("Blondie", &["rock"], 1978, 200.0, 0.61),
        song("Blondie", &["rock", "disco"], 1979, 230.0, 0.59),
        song("Miles Davis", &["jazz"], 1970, 1600.0, 0.57),
        song("Miles Davis", &["jazz", "rock"], 1986, 310.0, 0.44),
    ]
}

fn write_dataset(dir: &Path, records: &[Record]) -> Settings {
    let path = dir.join("songs.json");
    fs::write(&path, serde_json::to_string(records).unwrap()).unwrap();
    Settings {
        dataset_path: path,
        test_fraction: 0.25,
        seed: Some(11),
        ..Settings::default()
    }
}

#[test]
fn every_variant_produces_a_report() {
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        variants: vec![Variant::Basic, Variant::ArtistLifespan, Variant::NumPopular],
        ..write_dataset(dir.path(), &songs())
    };

    let base = FeatureFlags::genre_only();
    let reports = run_variants(&settings, &base, ModelChoice::Lasso { alpha: 0.5 }).unwrap();

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[1].width, reports[0].width + 1);
    assert_eq!(reports[2].width, reports[0].width + 1);
    for report in &reports {
        assert_eq!(report.model, "lasso");
        assert_eq!(report.training.samples, 7);
        assert_eq!(report.testing.samples, 3);
        assert!((0.0..=100.0).contains(&report.testing.accuracy));
        for ratio in [report.ratios.popular, report.ratios.unpopular] {
            assert!(ratio.is_nan() || (0.0..=1.0).contains(&ratio));
        }
    }
}

#[test]
fn pipeline_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let settings = write_dataset(dir.path(), &songs());
    let base = FeatureFlags::metadata_only([MetadataField::Year, MetadataField::Duration]);
    let model = ModelChoice::KNeighbors {
        k: NonZeroUsize::new(3).unwrap(),
    };

    let first = run_variants(&settings, &base, model).unwrap();
    let second = run_variants(&settings, &base, model).unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].to_string(), second[0].to_string());
    assert_eq!(
        first[0].testing.accuracy.to_bits(),
        second[0].testing.accuracy.to_bits()
    );
}

#[test]
fn training_mean_mode_ignores_model_choice() {
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        prediction: PredictionMode::TrainingMean,
        ..write_dataset(dir.path(), &songs())
    };

    let base = FeatureFlags::genre_only();
    let reports = run_variants(&settings, &base, ModelChoice::LinearRegression).unwrap();

    assert_eq!(reports[0].model, "training mean baseline");
    assert!(reports[0].training.r2.abs() < 1e-9);
}

#[test]
fn settings_file_overrides_features() {
    let dir = TempDir::new().unwrap();
    let mut settings = write_dataset(dir.path(), &songs());
    settings.features = Some(FeatureFlags::metadata_only([MetadataField::Duration]));

    let path = dir.path().join("settings.json");
    fs::write(&path, serde_json::to_string(&settings).unwrap()).unwrap();

    let loaded = Settings::read(&path).unwrap();
    assert_eq!(loaded, settings);

    let base = base_flags(&loaded, FeatureFlags::genre_only());
    let reports = run_variants(&loaded, &base, ModelChoice::LinearRegression).unwrap();
    assert_eq!(reports[0].width, 1);
}

#[test]
fn missing_dataset_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        dataset_path: dir.path().join("absent.json"),
        ..Settings::default()
    };

    let err = run_variants(&settings, &FeatureFlags::genre_only(), ModelChoice::LinearRegression)
        .unwrap_err();
    assert!(matches!(err, ExperimentError::Io { .. }));
}

#[test]
fn record_without_hotttnesss_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("songs.json");
    fs::write(&path, r#"[{ "artist_name": "Nobody", "genres": ["rock"] }]"#).unwrap();
    let settings = Settings {
        dataset_path: path,
        ..Settings::default()
    };

    let err = run_variants(&settings, &FeatureFlags::genre_only(), ModelChoice::LinearRegression)
        .unwrap_err();
    assert!(matches!(err, ExperimentError::Parse { .. }));
}

#[test]
fn enabling_absent_field_is_fatal() {
    let dir = TempDir::new().unwrap();
    let settings = write_dataset(dir.path(), &songs());
    let base = FeatureFlags::metadata_only([MetadataField::ArtistFamiliarity]);

    let err = run_variants(&settings, &base, ModelChoice::LinearRegression).unwrap_err();
    assert!(matches!(
        err,
        ExperimentError::MissingField {
            field: "artist_familiarity",
            ..
        }
    ));
}
