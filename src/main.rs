use anyhow::Result;
use energyscreen::{config::CONFIG_FILE, PipelineConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) configure paths ──────────────────────────────────────────
    let config = PipelineConfig::load_or_default(CONFIG_FILE)?;
    info!(cwd = %std::env::current_dir()?.display(), "working directory");

    // ─── 3) run ──────────────────────────────────────────────────────
    let summary = energyscreen::run(&config)?;
    for chart in &summary.charts {
        info!(chart = %chart.display(), "chart written");
    }

    info!("all done");
    Ok(())
}
