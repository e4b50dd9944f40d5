//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands;
use crate::config::RecalcConfig;
use crate::logging;
use crate::paths;
use crate::setup;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

/// A terminal audio recorder and an arbitrary-precision calculator
#[derive(Parser)]
#[command(name = "recalc")]
#[command(version)]
#[command(about = "Terminal audio recorder and arbitrary-precision calculator")]
#[command(
    long_about = "Terminal audio recorder and arbitrary-precision calculator.\n\nThe recorder captures the microphone to a WAV file with a live waveform and\nplays the take back. The calculator evaluates `a op b` on integers of any size\nand keeps a history of every result.\n\nEXAMPLES:\n    $ recalc record\n    $ recalc calc\n    $ recalc eval 999999999999999 + 1\n    $ recalc eval -12 / 5 --save\n    $ recalc history"
)]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/recalc/recalc.toml\n    Data:               ~/.local/share/recalc/\n    Logs:               ~/.local/state/recalc/recalc.log.*"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record audio with a live waveform, then play it back
    ///
    /// Space/Enter records, stops and plays. r resets, q/Esc quits.
    /// Sending SIGUSR1 to the process acts like pressing Space.
    #[command(visible_alias = "r")]
    Record,

    /// Open the calculator
    ///
    /// Type digits and one of + - * / %, Enter or = to evaluate.
    /// h opens the history panel, d clears it while open.
    #[command(visible_alias = "c")]
    Calc,

    /// Evaluate one expression and print the result
    ///
    /// Tokens are joined with single spaces, so both `recalc eval 2 + 3` and
    /// `recalc eval "2 + 3"` work. Quote `*` to keep the shell from expanding it.
    Eval {
        /// Expression tokens: operand operator operand
        #[arg(value_name = "EXPR", required = true, num_args = 1.., allow_negative_numbers = true)]
        expression: Vec<String>,

        /// Also record the expression in the calculator history
        #[arg(short, long)]
        save: bool,
    },

    /// List calculator history, newest first
    #[command(visible_alias = "h")]
    History {
        /// Delete every history entry
        #[arg(long)]
        clear: bool,

        /// Skip the confirmation prompt when clearing
        #[arg(short, long, requires = "clear")]
        yes: bool,
    },

    /// Open configuration file in your preferred editor
    ///
    /// Uses $EDITOR environment variable or falls back to nano/vi.
    Config,

    /// List available audio input devices
    ///
    /// Shows device IDs, names, and configurations to help configure
    /// the correct input device in recalc.toml.
    #[command(name = "list-devices")]
    ListDevices,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    Logs,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   recalc completions bash > recalc.bash
    ///   recalc completions zsh > _recalc
    ///   recalc completions fish > recalc.fish
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Errors
/// - If configuration cannot be written or parsed
/// - If logging initialization fails
/// - If the selected command fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Commands that need neither logging nor configuration
    let command = match cli.command {
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
        Some(Commands::Completions { shell }) => {
            generate(shell, &mut Cli::command(), "recalc", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => return commands::handle_list_devices(),
        Some(Commands::Logs) => return commands::handle_logs(),
        Some(command) => command,
    };

    let config_path = paths::config_file()?;
    let created = setup::ensure_config(&config_path)?;
    let config = RecalcConfig::load_from(&config_path)?;

    logging::init_logging(&config.logging.level)?;
    tracing::info!("recalc {} starting", env!("CARGO_PKG_VERSION"));
    if created {
        tracing::info!("Wrote default configuration to {}", config_path.display());
    }

    match command {
        Commands::Record => commands::handle_record(&config)?,
        Commands::Calc => commands::handle_calc(&config).await?,
        Commands::Eval { expression, save } => commands::handle_eval(&expression, save, &config)?,
        Commands::History { clear, yes } => commands::handle_history(clear, yes, &config)?,
        Commands::Config => commands::handle_config()?,
        Commands::Completions { .. } | Commands::ListDevices | Commands::Logs => {
            unreachable!("handled before configuration is loaded")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn eval_accepts_negative_operands() {
        let cli = Cli::try_parse_from(["recalc", "eval", "-12", "/", "5", "--save"]).unwrap();
        match cli.command {
            Some(Commands::Eval { expression, save }) => {
                assert_eq!(expression, ["-12", "/", "5"]);
                assert!(save);
            }
            _ => panic!("expected eval"),
        }
    }

    #[test]
    fn aliases_resolve() {
        assert!(matches!(
            Cli::try_parse_from(["recalc", "c"]).unwrap().command,
            Some(Commands::Calc)
        ));
        assert!(matches!(
            Cli::try_parse_from(["recalc", "r"]).unwrap().command,
            Some(Commands::Record)
        ));
        assert!(matches!(
            Cli::try_parse_from(["recalc", "h", "--clear", "-y"]).unwrap().command,
            Some(Commands::History { clear: true, yes: true })
        ));
    }
}
