use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "Terminal todo list", long_about = None)]
pub struct Cli {
    /// Log level written to the log file (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rotating log files
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the todo list screen
    Tui,
    /// Print shell completions to stdout
    Completions {
        #[arg(value_name = "SHELL")]
        shell: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["todo"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_global_log_flags() {
        let cli = Cli::try_parse_from(["todo", "tui", "--log-level", "debug", "--log-dir", "/tmp/x"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Tui)));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.log_dir.as_deref(), Some("/tmp/x"));
    }

    #[test]
    fn test_completions_requires_shell() {
        assert!(Cli::try_parse_from(["todo", "completions"]).is_err());
        let cli = Cli::try_parse_from(["todo", "completions", "zsh"]).unwrap();
        match cli.command {
            Some(Commands::Completions { shell }) => assert_eq!(shell, "zsh"),
            _ => panic!("expected completions"),
        }
    }
}
