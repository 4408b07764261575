// src/cli.rs

//! CLI argument parsing using `clap`.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{DEFAULT_DEBOUNCE, DEFAULT_LISTEN, DEFAULT_POLL_TIMEOUT};
use crate::types::HiddenFilePolicy;

/// Command-line arguments for `reloader`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "reloader",
    version,
    about = "Serve a directory over HTTP and reload the browser when files change.",
    long_about = None,
    override_usage = "reloader <PATH>\n       reloader --help",
    help_template = "usage: {usage}\n\n{all-args}"
)]
pub struct CliArgs {
    /// Directory (or single file) to serve and watch.
    #[arg(value_name = "PATH")]
    pub target: PathBuf,

    /// Address the HTTP server listens on.
    #[arg(long, value_name = "ADDR", default_value_t = DEFAULT_LISTEN)]
    pub listen: SocketAddr,

    /// Quiet period after the last change before browsers are told to reload.
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_DEBOUNCE.as_millis() as u64)]
    pub debounce_ms: u64,

    /// How long a `/notification` request is held before answering 408.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_POLL_TIMEOUT.as_secs())]
    pub poll_timeout: u64,

    /// Whether changes to dot-prefixed files trigger a reload.
    #[arg(long, value_enum, value_name = "POLICY", default_value_t = HiddenFilePolicy::Ignore)]
    pub hidden: HiddenFilePolicy,

    /// Glob (relative to PATH) whose changes never trigger a reload.
    /// May be given more than once.
    #[arg(long = "ignore", value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Logging level (error, warn, info, debug, trace).
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn defaults_match_fixed_local_server() {
        let args = CliArgs::try_parse_from(["reloader", "site"]).unwrap();
        assert_eq!(args.target, PathBuf::from("site"));
        assert_eq!(args.listen, "127.0.0.1:8000".parse().unwrap());
        assert_eq!(args.debounce_ms, 250);
        assert_eq!(args.poll_timeout, 60);
        assert_eq!(args.hidden, HiddenFilePolicy::Ignore);
        assert!(args.ignore.is_empty());
        assert!(args.log_level.is_none());
    }

    #[test]
    fn missing_path_is_a_usage_error() {
        let err = CliArgs::try_parse_from(["reloader"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn help_exits_successfully_with_two_line_usage() {
        let err = CliArgs::try_parse_from(["reloader", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);

        let rendered = err.render().to_string();
        assert!(rendered.starts_with("usage: reloader <PATH>\n       reloader --help"));
    }

    #[test]
    fn repeated_ignore_globs_accumulate() {
        let args = CliArgs::try_parse_from([
            "reloader",
            "--ignore",
            "*.tmp",
            "--ignore",
            "build/**",
            "--hidden",
            "reload",
            ".",
        ])
        .unwrap();
        assert_eq!(args.ignore, vec!["*.tmp".to_string(), "build/**".to_string()]);
        assert_eq!(args.hidden, HiddenFilePolicy::Reload);
    }
}
