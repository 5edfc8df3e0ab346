use std::num::NonZeroUsize;

use anyhow::Context;
use clap::Parser;
use hotttnesss::{
    experiment::base_flags, metadata::MetadataField, run_variants, FeatureFlags, ModelChoice,
    Settings,
};
use log::info;

/// Predicts song hotttnesss from year and duration with k nearest neighbors.
#[derive(Debug, Parser)]
#[command(about)]
struct Cli {}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let _cli = Cli::parse();
    let settings = Settings::load()?;

    let k = NonZeroUsize::new(settings.num_neighbors).context("num_neighbors must be positive")?;
    info!("running {k} nearest neighbors regression");

    let preset = FeatureFlags::metadata_only([MetadataField::Year, MetadataField::Duration]);
    let base = base_flags(&settings, preset);
    for report in run_variants(&settings, &base, ModelChoice::KNeighbors { k })? {
        println!("{report}\n");
    }

    info!("done");
    Ok(())
}
