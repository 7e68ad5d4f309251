//! Main application entry point

use std::io::Write;
use std::sync::Arc;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use wv_core::{summarize, Dashboard};
use wv_data::{import_export_file, spawn_load, RecordDecoder, SourceConfig};

mod cli;
mod output;

use cli::{Cli, Command, ImportArgs};

/// Merge the optional config file with command line overrides
fn resolve_config(cli: &Cli) -> Result<SourceConfig> {
    let mut config = match &cli.config {
        Some(path) => SourceConfig::from_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => SourceConfig::default(),
    };

    if let Some(kind) = cli.source {
        config.kind = Some(kind);
    }
    if let Some(path) = &cli.path {
        config.path = path.clone();
    }
    if let Some(window) = cli.window {
        config.window_hours = window;
    }

    config.validate()?;
    Ok(config)
}

/// Apply the requested handles; end first so a start past the default
/// window is not clamped against it
fn apply_range(dashboard: &Dashboard, cli: &Cli) {
    if let Some(end) = cli.end {
        dashboard.set_end(end);
    }
    if let Some(start) = cli.start {
        dashboard.set_start(start);
    }
}

/// Import the given exports into the database named by `args`
async fn run_import(args: &ImportArgs, config: &SourceConfig) -> Result<()> {
    let exports = [
        (args.solar.clone(), config.solar_table.clone()),
        (args.wind.clone(), config.wind_table.clone()),
    ];

    for (export, table) in exports {
        let Some(export) = export else {
            continue;
        };

        let db = args.db.clone();
        let config = config.clone();
        let target = table.clone();
        let rows = tokio::task::spawn_blocking(move || {
            import_export_file(
                &db,
                &export,
                &target,
                &config.solar_table,
                &config.wind_table,
                &RecordDecoder::new(config.null_config.clone()),
            )
            .with_context(|| format!("failed to import {}", export.display()))
        })
        .await??;
        println!("{}: {} rows", table, rows);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    debug!(?config, "resolved configuration");

    if let Some(Command::Import(args)) = &cli.command {
        return run_import(args, &config).await;
    }

    let dashboard = Arc::new(Dashboard::with_window(config.window_hours));
    dashboard.set_mode(cli.mode);

    let source = config.build_source()?;
    info!(source = source.source_name(), kind = ?config.resolved_kind(), "starting wattview");

    // A failed load is already logged; the dashboard renders empty
    spawn_load(dashboard.clone(), source).await?;

    apply_range(&dashboard, &cli);

    let visible = dashboard.visible();
    let summary = cli.summary.then(|| summarize(&visible));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    output::render(&mut out, cli.format, &dashboard.context(), &visible, summary.as_ref())?;
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use wv_core::{Dataset, Mode, Range, TimePoint};
    use wv_data::SourceKind;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["wattview"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_overrides_defaults() {
        let config = resolve_config(&parse(&["--path", "stats.db", "--window", "48"])).unwrap();
        assert_eq!(config.path, PathBuf::from("stats.db"));
        assert_eq!(config.window_hours, 48);
        assert_eq!(config.resolved_kind(), SourceKind::Sqlite);
    }

    #[tokio::test]
    async fn test_import_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("complete_wind_records.json");
        std::fs::write(
            &export,
            r#"[{"Full Date": "2024-06-01T10:00:00.000", "EXPECTED - BEST": 4, "EXPECTED - WORST": 2, "Total Hourly Energy (REAL)": 3}]"#,
        )
        .unwrap();
        let db = dir.path().join("energy.db");

        let cli = parse(&[
            "--path", db.to_str().unwrap(),
            "import", "--db", db.to_str().unwrap(), "--wind", export.to_str().unwrap(),
        ]);
        let config = resolve_config(&cli).unwrap();
        let Some(Command::Import(args)) = &cli.command else {
            panic!("expected import command");
        };
        run_import(args, &config).await.unwrap();

        let dashboard = Arc::new(Dashboard::new());
        spawn_load(dashboard.clone(), config.build_source().unwrap()).await.unwrap();
        dashboard.set_mode(Mode::Wind);
        assert_eq!(dashboard.visible().len(), 1);
        assert!(dashboard.dataset().unwrap().solar.is_empty());
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(resolve_config(&parse(&["--window", "0"])).is_err());
    }

    #[test]
    fn test_apply_range_past_default_window() {
        let dashboard = Dashboard::new();
        dashboard.load_dataset("test", Dataset::new(vec![TimePoint::default(); 400], Vec::new()));
        dashboard.set_mode(Mode::Solar);

        apply_range(&dashboard, &parse(&["--start", "200", "--end", "300"]));
        assert_eq!(dashboard.range(), Range::new(200, 300));
        assert_eq!(dashboard.visible().len(), 101);
    }
}
