use clap::Parser;
use hotttnesss::{experiment::base_flags, run_variants, FeatureFlags, ModelChoice, Settings};
use log::info;

/// Predicts song hotttnesss from genre and metadata features with linear regression.
#[derive(Debug, Parser)]
#[command(about)]
struct Cli {
    /// Fit linear regression with an L1 penalty instead of ordinary least squares.
    #[arg(long)]
    lasso: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let model = if cli.lasso {
        info!("running linear regression with L1 penalty");
        ModelChoice::Lasso {
            alpha: settings.lasso_alpha,
        }
    } else {
        info!("running normal linear regression");
        ModelChoice::LinearRegression
    };

    let base = base_flags(&settings, FeatureFlags::genre_only());
    for report in run_variants(&settings, &base, model)? {
        println!("{report}\n");
    }

    info!("done");
    Ok(())
}
