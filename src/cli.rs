use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "soilfert", version, about = "Soil fertility evaluator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill in measurements in the terminal form (default)
    Form,
    /// Evaluate a YAML or JSON file of measurements
    Evaluate {
        /// Measurements file (.yaml, .yml or .json)
        input: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also write the plain-text report to this path
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Refuse to evaluate when values have the wrong type or name
        #[arg(long)]
        strict: bool,
    },
    /// Answer one question per attribute
    Prompt {
        /// Write the report here instead of the configured location
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
    /// List optimal ranges and advice
    Ranges {
        #[arg(short, long, value_enum, default_value_t = RangesFormat::Text)]
        format: RangesFormat,
    },
    /// Run interactive configuration setup
    Init,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RangesFormat {
    Text,
    Yaml,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_form() {
        let cli = Cli::parse_from(["soilfert"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parses_evaluate_flags() {
        let cli = Cli::parse_from([
            "soilfert", "-vv", "evaluate", "sample.yaml", "--format", "json", "--strict",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Evaluate {
                input,
                format,
                report,
                strict,
            }) => {
                assert_eq!(input, PathBuf::from("sample.yaml"));
                assert_eq!(format, OutputFormat::Json);
                assert!(report.is_none());
                assert!(strict);
            }
            _ => panic!("expected evaluate"),
        }
    }
}
