// ABOUTME: Main entry point for the gifpeek binary
// ABOUTME: Resolves flags, env, and config, then runs either the listing or the interactive browser

use anyhow::{Context, Result};
use clap::Parser;
use gifpeek_cli::cli::Cli;
use gifpeek_cli::cli_output::CliOutput;
use gifpeek_cli::config::Config;
use gifpeek_cli::constants::session;
use gifpeek_cli::download;
use gifpeek_cli::image_protocols::detection::{self, DetectOptions, process_env};
use gifpeek_cli::image_protocols::{ColorChoice, InlineProtocol, TerminalCapabilities, ThumbsMode};
use gifpeek_cli::output::{ListingFormat, formatter_for};
use gifpeek_cli::providers::{ApiKeys, build_provider};
use gifpeek_cli::thumbs::ThumbRenderer;
use gifpeek_cli::tui::input::CrosstermKeys;
use gifpeek_cli::tui::{self, CrosstermTerminal, TuiEnv, TuiSettings};
use gifpeek_sdk::constants::limits::DEFAULT_LIMIT;
use gifpeek_sdk::{FilterOptions, SearchOptions, SourceFetcher, filter_results};
use std::io::{self, BufWriter, IsTerminal, Write};
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = CliOutput::new();
    if let Err(err) = run(cli, &output).await {
        output.report(&err);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over the default filter.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

async fn run(cli: Cli, output: &CliOutput) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let env = &process_env;

    let source = cli.source.or(config.source).unwrap_or_default();
    let keys = ApiKeys::resolve(env, config.api_keys());
    let provider = build_provider(source, keys).context("Failed to create search provider")?;
    let fetcher = SourceFetcher::new().context("Failed to create fetcher")?;

    let search = SearchOptions::builder()
        .limit(cli.limit.or(config.limit).unwrap_or(DEFAULT_LIMIT))
        .build();
    let filter = FilterOptions {
        ignore_case: cli.ignore_case,
        invert: cli.invert,
        regex: cli.regex,
    };
    let query = cli.query_text();
    let stdout_tty = io::stdout().is_terminal();

    if cli.tui {
        let caps = TerminalCapabilities::detect(
            env,
            DetectOptions {
                thumbs: ThumbsMode::Auto,
                is_tty: stdout_tty,
                plain_output: true,
                cell_aspect: config.cell_aspect,
                software_animation: config.software_animation,
            },
        );
        let settings = TuiSettings {
            protocol: caps.protocol,
            software_animation: caps.software_animation,
            cell_aspect: caps.cell_aspect,
            search,
            filter,
            initial_query: (!query.trim().is_empty()).then_some(query),
            download_dir: download::download_dir(config.download_dir.clone()),
        };

        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown_tx.send(()).await;
            }
        });

        let tui_env = TuiEnv {
            terminal: Box::new(CrosstermTerminal),
            input: Box::new(CrosstermKeys),
            output: BufWriter::new(io::stdout()),
            provider,
            fetcher: Arc::new(fetcher),
            shutdown: shutdown_rx,
        };
        return tui::run(tui_env, settings)
            .await
            .context("Interactive session failed");
    }

    let format = cli
        .format
        .or(config.format)
        .unwrap_or_default()
        .resolve(cli.json, stdout_tty);

    let results = provider
        .search(&query, &search)
        .await
        .with_context(|| format!("Search for '{}' failed", query))?;
    let results = filter_results(results, &query, &filter).context("Failed to filter results")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if let Some(formatter) = formatter_for(format) {
        out.write_all(formatter.format_results(&results)?.as_bytes())?;
        out.flush()?;
        return Ok(());
    }

    if results.is_empty() {
        writeln!(out, "No results")?;
        out.flush()?;
        return Ok(());
    }

    let thumbs = cli
        .thumbs
        .or_else(|| detection::thumbs_from_env(env))
        .or(config.thumbs)
        .unwrap_or_default();
    let caps = TerminalCapabilities::detect(
        env,
        DetectOptions {
            thumbs,
            is_tty: stdout_tty,
            plain_output: format == ListingFormat::Plain,
            cell_aspect: config.cell_aspect,
            software_animation: config.software_animation,
        },
    );
    if thumbs == ThumbsMode::Always && caps.protocol == InlineProtocol::None {
        output.warning("inline thumbnails are not supported by this terminal");
    }

    let use_color =
        ColorChoice::from_flags(cli.no_color, cli.force_color).resolve(env, stdout_tty);
    let term_cols = if stdout_tty {
        crossterm::terminal::size()
            .map(|(cols, _)| cols)
            .unwrap_or(session::FALLBACK_COLS)
    } else {
        0
    };

    ThumbRenderer::new(&fetcher, caps.protocol)
        .with_color(use_color)
        .with_numbers(cli.number)
        .with_term_cols(term_cols)
        .with_cell_aspect(caps.cell_aspect)
        .render(&mut out, &results)
        .await
        .context("Failed to write results")?;
    Ok(())
}
