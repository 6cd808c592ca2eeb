// CLI configuration
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::output::OutputFormat;

/// Sonotag - audio tag and duration reader
#[derive(Parser, Debug)]
#[command(name = "sonotag")]
#[command(about = "Read tags and playing time from audio files", long_about = None)]
#[command(version)]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub format: OutputFormat,

    /// Quiet mode (suppress progress messages)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON file with parse limits (ogg_scan_limit, max_atom_depth, max_atoms, id3v1)
    #[arg(long, value_name = "JSON", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read tags from audio file(s)
    Read {
        /// Audio file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Detect container format and the readers that would run
    Detect {
        /// Audio file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Estimate playing time
    Duration {
        /// Audio file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Read tags from every matching file in a directory
    Batch {
        /// Directory path
        #[arg(short, long)]
        directory: PathBuf,

        /// File pattern (e.g., "*.mp3", "*.flac")
        #[arg(short, long, default_value = "*")]
        pattern: String,
    },

    /// Show file information
    Info {
        /// Audio file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Include FLAC STREAMINFO fields
        #[arg(short, long)]
        detailed: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Config::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let config = Config::try_parse_from(["sonotag", "read", "a.mp3", "--format", "json", "-q"]).unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.quiet);
        match config.command {
            Commands::Read { files, output } => {
                assert_eq!(files, vec![PathBuf::from("a.mp3")]);
                assert!(output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn batch_pattern_defaults_to_everything() {
        let config = Config::try_parse_from(["sonotag", "batch", "-d", "music"]).unwrap();
        match config.command {
            Commands::Batch { directory, pattern } => {
                assert_eq!(directory, PathBuf::from("music"));
                assert_eq!(pattern, "*");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn read_requires_a_file() {
        assert!(Config::try_parse_from(["sonotag", "read"]).is_err());
    }
}
