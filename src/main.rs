mod cli;
mod config;
mod editor;
mod error;
mod logging;
mod models;
mod store;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use config::Config;
use ui::run_tui;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    match cli.command {
        Some(Commands::Completions { shell }) => {
            use clap_complete::{generate, Shell};
            let shell = shell.to_lowercase();
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "elvish" => Shell::Elvish,
                "powershell" => Shell::PowerShell,
                _ => {
                    println!("Unsupported shell: {}", shell);
                    return Ok(());
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "todo", &mut std::io::stdout());
        }
        Some(Commands::Tui) | None => {
            // Keep the handle alive until the screen closes.
            let _logger = match logging::init_logging(&config.log_level, &config.log_dir) {
                Ok(handle) => Some(handle),
                Err(err) => {
                    eprintln!("Warning: file logging disabled: {err:#}");
                    None
                }
            };
            run_tui()?;
        }
    }

    Ok(())
}
