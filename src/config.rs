/*!
 * Configuration handling for repo2md
 */

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;
use log::LevelFilter;

use crate::error::{Result, ResultExt};
use crate::{bail, ensure};

/// Directory under the home directory holding the env file
pub const CONFIG_DIR_NAME: &str = ".repo2md";

/// Env file name inside the config directory
pub const ENV_FILE_NAME: &str = ".env";

/// Variables that must be set once the env file is loaded
pub const REQUIRED_VARS: &[&str] = &[];

/// Written when no env file exists yet
const ENV_TEMPLATE: &str = include_str!("../configs/env.example");

/// Command-line arguments for repo2md
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "repo2md",
    version = env!("CARGO_PKG_VERSION"),
    about = "Convert a repository to a single Markdown document",
    long_about = "Prints a file tree and the contents of every non-ignored text file as one Markdown document, ready to paste into an LLM."
)]
pub struct Args {
    /// Path to the repository
    #[clap(default_value = ".")]
    pub repo_path: String,

    /// Do not copy the document to the system clipboard
    #[clap(long)]
    pub no_clip: bool,

    /// Write the document to this file instead of stdout
    #[clap(short, long)]
    pub output: Option<String>,

    /// Comma-separated list of extra file patterns to ignore
    #[clap(long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Number of threads to use for processing
    #[clap(long, default_value = "4")]
    pub threads: usize,

    /// Env file to load instead of ~/.repo2md/.env
    #[clap(long)]
    pub env_file: Option<String>,

    /// Only report warnings and errors, skip the summary
    #[clap(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Target directory to process
    pub target_dir: PathBuf,

    /// Output file, stdout when `None`
    pub output_file: Option<PathBuf>,

    /// Extra file patterns to ignore
    pub ignore_patterns: Vec<String>,

    /// Number of threads to use for processing
    pub num_threads: usize,

    /// Copy output to clipboard
    pub clip: bool,

    /// Suppress the summary report
    pub quiet: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: &Args) -> Self {
        Self {
            target_dir: PathBuf::from(&args.repo_path),
            output_file: args.output.as_ref().map(PathBuf::from),
            ignore_patterns: args.ignore.clone(),
            num_threads: args.threads,
            clip: !args.no_clip,
            quiet: args.quiet,
        }
    }

    /// Configuration for a root directory with every default
    pub fn for_root(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            output_file: None,
            ignore_patterns: Vec::new(),
            num_threads: 1,
            clip: false,
            quiet: true,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.target_dir.exists() {
            bail!(
                PathNotFound,
                "Target directory not found: {}",
                self.target_dir.display()
            );
        }
        ensure!(
            self.target_dir.is_dir(),
            Config,
            "Target is not a directory: {}",
            self.target_dir.display()
        );
        fs::read_dir(&self.target_dir).with_context(|| {
            format!("Cannot read target directory {}", self.target_dir.display())
        })?;

        if let Some(parent) = self.output_file.as_ref().and_then(|p| p.parent()) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                bail!(
                    PathNotFound,
                    "Output directory not found: {}",
                    parent.display()
                );
            }
        }

        ensure!(
            self.num_threads > 0,
            InvalidArgument,
            "Thread count must be at least 1"
        );

        Ok(())
    }
}

/// Default env file location, `~/.repo2md/.env`
pub fn default_env_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(ENV_FILE_NAME))
}

/// Outcome of loading the env file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvStatus {
    /// An existing file was loaded
    Loaded(PathBuf),
    /// The file was missing; a template was written and loaded
    Created(PathBuf),
    /// No home directory to look in
    Unavailable,
}

/// Ensure the env file exists, load it, and check required variables
///
/// Runs before logging is configured so `RUST_LOG` from the file applies.
pub fn bootstrap_env(path: Option<&Path>) -> Result<EnvStatus> {
    let path = match path.map(Path::to_path_buf).or_else(default_env_path) {
        Some(path) => path,
        None => return Ok(EnvStatus::Unavailable),
    };

    let created = if path.exists() {
        false
    } else {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }
        fs::write(&path, ENV_TEMPLATE)
            .with_context(|| format!("Could not create {}", path.display()))?;
        true
    };

    dotenvy::from_path_override(&path)?;
    check_required_vars(REQUIRED_VARS)?;

    Ok(if created {
        EnvStatus::Created(path)
    } else {
        EnvStatus::Loaded(path)
    })
}

/// Fail when any of `vars` is unset or empty
pub fn check_required_vars(vars: &[&str]) -> Result<()> {
    let missing: Vec<&str> = vars
        .iter()
        .copied()
        .filter(|v| env::var(v).map_or(true, |value| value.is_empty()))
        .collect();

    ensure!(
        missing.is_empty(),
        Config,
        "Missing env vars: {}",
        missing.join(", ")
    );
    Ok(())
}

/// Log level chosen by the quiet and verbose flags
pub fn log_level(quiet: bool, verbose: u8) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Repo2MdError;
    use tempfile::tempdir;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["repo2md"]);
        let config = Config::from_args(&args);
        assert_eq!(config.target_dir, PathBuf::from("."));
        assert!(config.clip);
        assert!(config.output_file.is_none());
        assert_eq!(config.num_threads, 4);
    }

    #[test]
    fn test_args_flags() {
        let args = Args::parse_from([
            "repo2md",
            "some/repo",
            "--no-clip",
            "-o",
            "out.md",
            "--ignore",
            "*.lock,*.csv",
            "-vv",
        ]);
        let config = Config::from_args(&args);
        assert_eq!(config.target_dir, PathBuf::from("some/repo"));
        assert!(!config.clip);
        assert_eq!(config.output_file, Some(PathBuf::from("out.md")));
        assert_eq!(config.ignore_patterns, vec!["*.lock", "*.csv"]);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_validate_missing_root() {
        let dir = tempdir().unwrap();
        let config = Config::for_root(dir.path().join("nope"));
        assert!(matches!(
            config.validate(),
            Err(Repo2MdError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_validate_file_root() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            Config::for_root(&file).validate(),
            Err(Repo2MdError::Config(_))
        ));
    }

    #[test]
    fn test_validate_missing_output_dir() {
        let dir = tempdir().unwrap();
        let mut config = Config::for_root(dir.path());
        config.output_file = Some(dir.path().join("missing").join("out.md"));
        assert!(config.validate().is_err());

        config.output_file = Some(PathBuf::from("out.md"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bootstrap_creates_and_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf").join(".env");

        let status = bootstrap_env(Some(&path)).unwrap();
        assert_eq!(status, EnvStatus::Created(path.clone()));
        assert_eq!(fs::read_to_string(&path).unwrap(), ENV_TEMPLATE);

        fs::write(&path, "REPO2MD_TEST_BOOTSTRAP=loaded\n").unwrap();
        let status = bootstrap_env(Some(&path)).unwrap();
        assert_eq!(status, EnvStatus::Loaded(path));
        assert_eq!(env::var("REPO2MD_TEST_BOOTSTRAP").unwrap(), "loaded");
    }

    #[test]
    fn test_check_required_vars() {
        assert!(check_required_vars(&[]).is_ok());
        assert!(matches!(
            check_required_vars(&["REPO2MD_SURELY_UNSET_VARIABLE"]),
            Err(Repo2MdError::Config(_))
        ));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(true, 3), LevelFilter::Warn);
        assert_eq!(log_level(false, 0), LevelFilter::Info);
        assert_eq!(log_level(false, 1), LevelFilter::Debug);
        assert_eq!(log_level(false, 5), LevelFilter::Trace);
    }
}
