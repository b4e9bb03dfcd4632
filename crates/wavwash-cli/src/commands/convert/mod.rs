//! Convert command implementation
//!
//! Normalizes one WAV file, or every WAV file under a directory, into a
//! canonical PCM WAV file. Files are converted in parallel; each worker opens
//! its own file handles.

mod config;
mod report;


pub use config::ConvertConfig;
pub use report::{BatchReport, FileReport, FileStatus};

use anyhow::{Context, Result};
use colored::Colorize;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;
use walkdir::WalkDir;

use wavwash_backend_wav::{EncodeError, WavEncoder};
use wavwash_core::{encode_all, extract_file, ExtractError};

/// Command-line arguments of the convert command.
#[derive(Debug, Clone, Default)]
pub struct ConvertArgs {
    pub input: PathBuf,
    pub out_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub overwrite: bool,
    pub no_recursive: bool,
    pub json: bool,
}

/// One input and where its conversion goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Run the convert command
///
/// # Returns
/// Exit code: 0 if every file converted or was skipped, 1 if any failed
pub fn run(args: &ConvertArgs) -> Result<ExitCode> {
    let mut config = match &args.config {
        Some(path) => ConvertConfig::from_file(path)?,
        None => ConvertConfig::default(),
    };
    config.apply_args(args);

    if !args.input.exists() {
        anyhow::bail!("Input path does not exist: {}", args.input.display());
    }

    let jobs = plan_jobs(&args.input, &config);
    debug!("{} file(s) selected under {}", jobs.len(), args.input.display());

    let progress = !args.json;
    if progress {
        println!(
            "{} {} file(s) from {}",
            "Converting".cyan().bold(),
            jobs.len(),
            args.input.display()
        );
    }

    let start = Instant::now();
    let report = BatchReport::from_results(convert_all(&jobs, &config, progress));

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, start.elapsed().as_secs_f64());
    }

    Ok(if report.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Selects the inputs under `root` and names their outputs.
///
/// `root` may be a single file. Directory traversal picks `.wav` files
/// (any case), skipping files that already carry the output extension.
pub fn plan_jobs(root: &Path, config: &ConvertConfig) -> Vec<ConvertJob> {
    collect_inputs(root, config)
        .into_iter()
        .map(|input| ConvertJob {
            output: output_path(root, &input, config),
            input,
        })
        .collect()
}

fn collect_inputs(root: &Path, config: &ConvertConfig) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    let output_suffix = format!(".{}", config.extension().to_lowercase());
    let max_depth = if config.recursive { usize::MAX } else { 1 };

    let mut inputs: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy().to_lowercase();
            name.ends_with(".wav") && !name.ends_with(&output_suffix)
        })
        .map(|e| e.into_path())
        .collect();

    // Sort for deterministic output
    inputs.sort();
    inputs
}

fn output_path(root: &Path, input: &Path, config: &ConvertConfig) -> PathBuf {
    let base = match &config.out_dir {
        Some(out_dir) => {
            let relative = if root.is_file() {
                input.file_name().map(Path::new).unwrap_or(input)
            } else {
                input.strip_prefix(root).unwrap_or(input)
            };
            out_dir.join(relative)
        }
        None => input.to_path_buf(),
    };
    base.with_extension(config.extension())
}

/// Converts every job on a pool of scoped worker threads.
///
/// Results come back in job order.
pub fn convert_all(jobs: &[ConvertJob], config: &ConvertConfig, progress: bool) -> Vec<FileReport> {
    if jobs.is_empty() {
        return Vec::new();
    }

    let workers = match config.jobs {
        0 => jobs.len(),
        n => n.min(jobs.len()),
    };
    let next = AtomicUsize::new(0);
    let next = &next;
    let overwrite = config.overwrite;

    let mut results: Vec<(usize, FileReport)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(move || {
                    let mut done = Vec::new();
                    loop {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(job) = jobs.get(index) else {
                            break;
                        };
                        done.push((index, convert_one(job, overwrite, progress)));
                    }
                    done
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(done) => done,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, report)| report).collect()
}

fn convert_one(job: &ConvertJob, overwrite: bool, progress: bool) -> FileReport {
    let mut report = FileReport::new(
        job.input.display().to_string(),
        job.output.display().to_string(),
        FileStatus::Converted,
    );

    if job.output.exists() && !overwrite {
        report.status = FileStatus::Skipped;
        if progress {
            println!(
                "{} {} {}",
                "[SKIP ]".dimmed(),
                report.input,
                "(output exists)".dimmed()
            );
        }
        return report;
    }

    if progress {
        println!("{} {}", "[DOING]".cyan().bold(), report.input);
    }

    match convert_file(job, &mut report) {
        Ok(()) => {
            if progress {
                let mut line = format!("{} {}", "[DONE ]".green().bold(), report.output);
                if !report.warnings.is_empty() {
                    let note = format!("({} warning(s))", report.warnings.len());
                    line = format!("{} {}", line, note.yellow());
                }
                println!("{}", line);
            }
        }
        Err(e) => {
            report.status = FileStatus::Failed;
            report.error_code = Some(error_code(&e).to_string());
            report.error = Some(format!("{:#}", e));
            if progress {
                println!("{} {}: {:#}", "[ERROR]".red().bold(), report.input, e);
            }
        }
    }

    report
}

/// Extracts, encodes and writes one file, filling in `report`.
fn convert_file(job: &ConvertJob, report: &mut FileReport) -> Result<()> {
    let audio = extract_file(&job.input)
        .with_context(|| format!("Failed to extract {}", job.input.display()))?;

    let mut encoder = WavEncoder::new();
    let bytes = encode_all(&mut encoder, &audio)
        .with_context(|| format!("Failed to encode {}", job.input.display()))?;

    if let Some(parent) = job.output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&job.output, &bytes)
        .with_context(|| format!("Failed to write {}", job.output.display()))?;
    debug!("wrote {} bytes to {}", bytes.len(), job.output.display());

    report.warnings = audio.warnings.clone();
    report.channels = Some(audio.channel_count());
    report.sample_rate = Some(audio.sample_rate());
    report.bits_per_sample = Some(audio.bits_per_sample());
    report.frames = Some(audio.number_of_samples);
    report.pcm_hash = encoder.pcm_hash().map(str::to_owned);
    Ok(())
}

/// Stable code for a conversion failure.
fn error_code(e: &anyhow::Error) -> &'static str {
    if let Some(e) = e.downcast_ref::<ExtractError>() {
        e.code()
    } else if let Some(e) = e.downcast_ref::<EncodeError>() {
        e.code()
    } else {
        "IO_ERROR"
    }
}

fn print_summary(report: &BatchReport, elapsed: f64) {
    println!("\n{}", "=".repeat(60));
    println!(
        "{} {} {}",
        "Conversion Summary".bold(),
        "•".dimmed(),
        format!("{:.1}s", elapsed).dimmed()
    );
    println!("{}", "=".repeat(60));
    println!("  {} {}", "Total:    ".dimmed(), report.total);
    println!("  {} {}", "Converted:".green(), report.converted);
    println!("  {} {}", "Skipped:  ".dimmed(), report.skipped);
    if report.failed > 0 {
        println!("  {} {}", "Failed:   ".red().bold(), report.failed);
    } else {
        println!("  {} {}", "Failed:   ".dimmed(), report.failed);
    }
}
