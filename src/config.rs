use std::path::PathBuf;

use crate::cli::Cli;

pub const LOG_LEVEL_ENV: &str = "TODO_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TODO_LOG_DIR";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Config {
    /// Flags win over environment variables, which win over defaults.
    pub fn from_cli(cli: &Cli) -> Self {
        Config::resolve(cli.log_level.clone(), cli.log_dir.clone(), |key| std::env::var(key).ok())
    }

    fn resolve(
        log_level: Option<String>,
        log_dir: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let log_level = log_level
            .or_else(|| env(LOG_LEVEL_ENV))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let log_dir = log_dir
            .or_else(|| env(LOG_DIR_ENV))
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let home_dir = env("HOME").unwrap_or_else(|| ".".to_string());
                PathBuf::from(home_dir).join(".todo").join("logs")
            });

        Config { log_level, log_dir }
    }
}
