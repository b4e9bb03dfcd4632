//! wavwash CLI - batch normalization of WAV files
//!
//! This binary inspects WAV headers and converts WAV files of any supported
//! bit depth into canonical 16/32-bit PCM.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use wavwash_cli::commands;
use wavwash_cli::commands::convert::ConvertArgs;

/// wavwash - WAV chunk scanner and PCM normalizer
#[derive(Parser)]
#[command(name = "wavwash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the format and data layout of a WAV file
    Inspect {
        /// Path to the WAV file
        input: PathBuf,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,

        /// Hex dump the RIFF header and fmt chunk
        #[arg(long)]
        hex: bool,
    },

    /// Convert a WAV file or a directory of WAV files to canonical PCM
    Convert {
        /// WAV file or directory to convert
        input: PathBuf,

        /// Write outputs under this directory instead of next to the inputs
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write a JSON batch report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Worker threads (0 = one per file)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Replace existing outputs
        #[arg(long)]
        overwrite: bool,

        /// Only convert files directly inside the input directory
        #[arg(long)]
        no_recursive: bool,

        /// Print the batch report as JSON instead of progress lines
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Inspect { input, json, hex } => commands::inspect::run(&input, json, hex),
        Commands::Convert {
            input,
            out_dir,
            config,
            report,
            jobs,
            overwrite,
            no_recursive,
            json,
        } => commands::convert::run(&ConvertArgs {
            input,
            out_dir,
            config,
            report,
            jobs,
            overwrite,
            no_recursive,
            json,
        }),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_inspect() {
        let cli = Cli::try_parse_from(["wavwash", "inspect", "in.wav", "--hex"]).unwrap();
        assert_eq!(cli.verbose, 0);
        match cli.command {
            Commands::Inspect { input, json, hex } => {
                assert_eq!(input, PathBuf::from("in.wav"));
                assert!(!json);
                assert!(hex);
            }
            _ => panic!("expected inspect command"),
        }
    }

    #[test]
    fn test_cli_parses_convert() {
        let cli = Cli::try_parse_from([
            "wavwash",
            "-vv",
            "convert",
            "samples",
            "--out-dir",
            "out",
            "--jobs",
            "4",
            "--overwrite",
            "--report",
            "report.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Convert {
                input,
                out_dir,
                config,
                report,
                jobs,
                overwrite,
                no_recursive,
                json,
            } => {
                assert_eq!(input, PathBuf::from("samples"));
                assert_eq!(out_dir, Some(PathBuf::from("out")));
                assert_eq!(config, None);
                assert_eq!(report, Some(PathBuf::from("report.json")));
                assert_eq!(jobs, Some(4));
                assert!(overwrite);
                assert!(!no_recursive);
                assert!(!json);
            }
            _ => panic!("expected convert command"),
        }
    }

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["wavwash", "convert"]).is_err());
    }
}
