/*!
 * Command-line interface for repo2md
 */

use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use rayon::ThreadPoolBuilder;

use repo2md::clipboard::copy_to_clipboard;
use repo2md::config::{self, Args, Config, EnvStatus};
use repo2md::report::{Reporter, ScanReport};
use repo2md::writer::MarkdownWriter;
use repo2md::Result;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "repo2md", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    // Load the env file first so RUST_LOG from it reaches the logger
    let env_status = config::bootstrap_env(args.env_file.as_deref().map(std::path::Path::new));
    setup_logging(args.quiet, args.verbose);

    match env_status {
        Ok(EnvStatus::Created(path)) => {
            warn!("Created default env file at {}", path.display())
        }
        Ok(EnvStatus::Loaded(path)) => debug!("Loaded env file {}", path.display()),
        Ok(EnvStatus::Unavailable) => debug!("No home directory, skipping env file"),
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    env_logger::Builder::new()
        .filter_level(config::log_level(quiet, verbose))
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(args: &Args) -> Result<()> {
    // Captured once so every section shares it
    let generated_at = Local::now();
    let start_time = Instant::now();

    let config = Config::from_args(args);
    config.validate()?;

    // Configure thread pool
    if let Err(e) = ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build_global()
    {
        warn!("Failed to set thread pool size: {}", e);
    }

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%)")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📊 Processing");

    let writer = MarkdownWriter::new(config.clone(), Arc::new(progress.clone()));
    let document = writer.generate(generated_at);
    progress.finish_and_clear();

    let document = document?;
    writer.write(&document)?;

    let clipboard = if config.clip {
        match copy_to_clipboard(&document.markdown) {
            Ok(backend) => {
                info!("✅ Copied to clipboard via {}", backend);
                Some(backend.to_string())
            }
            Err(e) => {
                warn!("Clipboard unavailable: {}", e);
                None
            }
        }
    } else {
        None
    };

    if !config.quiet {
        let mut report =
            ScanReport::from_records(&document.records, writer.destination(), start_time.elapsed());
        report.clipboard = clipboard;
        Reporter::print_report(&report);
    }

    Ok(())
}
