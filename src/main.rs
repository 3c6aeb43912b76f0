use anyhow::{Context, Result};
use clap::Parser;
use topicmap::config::Cli;
use topicmap::ingest::SquadFiles;
use topicmap::Pipeline;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let cli = Cli::parse();
    let config = cli.build_config().context("invalid configuration")?;
    let source = SquadFiles::new(config.datasets.clone());

    let report = Pipeline::new(config, source)
        .run()
        .context("topic clustering run failed")?;

    println!(
        "{} passages, {} features, inertia {:.4}",
        report.corpus_size, report.n_features, report.inertia
    );
    print!("{}", report.histogram);
    for (k, inertia) in &report.sweep {
        println!("sweep k={k:<4} inertia {inertia:.4}");
    }
    println!("topic map: {}", report.topic_map_path.display());
    Ok(())
}
