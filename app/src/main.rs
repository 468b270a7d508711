use std::path::PathBuf;

use clap::Parser;
use common::{report, table::BenchTable};
use eyre::{Context, Result};
use tracing::{debug, error};
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Renders the direct-upsert vs staging-COPY comparison chart from a
/// benchmark results table
#[derive(Parser)]
struct Cli {
    /// Benchmark results table
    #[arg(short, long, default_value = "data.csv")]
    data: PathBuf,
    /// Output image
    #[arg(short, long, default_value = "comparison.png")]
    out: PathBuf,
    #[arg(short, long)]
    log: Vec<String>,
}

fn main() -> Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("warn".to_owned());
    let args = Cli::parse();
    let file_appender = tracing_appender::rolling::never(".", "log.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let mut env_filter =
        EnvFilter::new(format!("upsert_report={log_level},common={log_level}"));
    for log in &args.log {
        env_filter = env_filter.add_directive(log.parse()?);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            layer()
                .with_timer(ChronoLocal::new("%v %k:%M:%S %z".to_owned()))
                .compact(),
        )
        .with(layer().with_writer(non_blocking))
        .init();

    if let Err(err) = generate_report(&args) {
        error!("{err:#?}");
        return Err(err);
    }
    Ok(())
}

fn generate_report(args: &Cli) -> Result<()> {
    let mut table = BenchTable::from_csv(&args.data)
        .context(format!("Load benchmark table {}", args.data.display()))?;
    table.derive_millis();
    debug!("{} benchmark rows", table.records.len());
    report::render(&table, &args.out)
        .context(format!("Render comparison chart {}", args.out.display()))?;
    Ok(())
}
