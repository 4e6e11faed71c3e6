//! Command-line configuration

use crate::client::DEFAULT_BACKEND_URL;
use crate::model::PLACEHOLDER_SOURCE;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Log file used when `--log` is not given
pub const DEFAULT_LOG_FILE: &str = "cppvis.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the analysis service, without a trailing slash
    pub backend_url: String,
    pub log_file: PathBuf,
    /// File whose contents seed the editor
    pub source_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            source_file: None,
        }
    }
}

/// What the command line asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Config),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("option '{0}' needs a value")]
    MissingValue(&'static str),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("backend URL must start with http:// or https://, got '{0}'")]
    InvalidBackendUrl(String),
}

impl Config {
    /// Parse arguments, not including the program name
    pub fn from_args<I>(args: I) -> Result<Command, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Command::Help),
                "-b" | "--backend" => {
                    let url = args.next().ok_or(ConfigError::MissingValue("--backend"))?;
                    if !(url.starts_with("http://") || url.starts_with("https://")) {
                        return Err(ConfigError::InvalidBackendUrl(url));
                    }
                    config.backend_url = url.trim_end_matches('/').to_string();
                }
                "-l" | "--log" => {
                    let path = args.next().ok_or(ConfigError::MissingValue("--log"))?;
                    config.log_file = PathBuf::from(path);
                }
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(ConfigError::UnknownOption(flag.to_string()));
                }
                _ => {
                    if config.source_file.is_some() {
                        return Err(ConfigError::UnexpectedArgument(arg));
                    }
                    config.source_file = Some(PathBuf::from(arg));
                }
            }
        }

        Ok(Command::Run(config))
    }

    /// Text the editor starts with: the source file if one was given,
    /// otherwise the placeholder comment
    pub fn initial_source(&self) -> io::Result<String> {
        match &self.source_file {
            Some(path) => fs::read_to_string(path),
            None => Ok(PLACEHOLDER_SOURCE.to_string()),
        }
    }
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [--backend URL] [--log FILE] [file.cpp]\n\
         \n\
         Options:\n\
         \x20 -b, --backend URL   analysis service (default {DEFAULT_BACKEND_URL})\n\
         \x20 -l, --log FILE      log file (default {DEFAULT_LOG_FILE}, filter with RUST_LOG)\n\
         \x20 -h, --help          show this message\n\
         \n\
         Keys: F5 analyze, F6 parse, Tab focus, Esc cancel, Ctrl+Q quit"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, ConfigError> {
        Config::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_without_arguments() {
        assert_eq!(parse(&[]), Ok(Command::Run(Config::default())));
    }

    #[test]
    fn reads_all_options() {
        let command = parse(&["--backend", "http://10.0.0.2:8000/", "-l", "/tmp/x.log", "main.cpp"]);
        assert_eq!(
            command,
            Ok(Command::Run(Config {
                backend_url: "http://10.0.0.2:8000".to_string(),
                log_file: PathBuf::from("/tmp/x.log"),
                source_file: Some(PathBuf::from("main.cpp")),
            }))
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse(&["--backend"]), Err(ConfigError::MissingValue("--backend")));
        assert_eq!(
            parse(&["--backend", "localhost:8000"]),
            Err(ConfigError::InvalidBackendUrl("localhost:8000".to_string()))
        );
        assert_eq!(
            parse(&["--verbose"]),
            Err(ConfigError::UnknownOption("--verbose".to_string()))
        );
        assert_eq!(
            parse(&["a.cpp", "b.cpp"]),
            Err(ConfigError::UnexpectedArgument("b.cpp".to_string()))
        );
    }

    #[test]
    fn help_wins() {
        assert_eq!(parse(&["a.cpp", "--help"]), Ok(Command::Help));
    }

    #[test]
    fn placeholder_without_file() {
        assert_eq!(
            Config::default().initial_source().unwrap(),
            PLACEHOLDER_SOURCE
        );
    }
}
