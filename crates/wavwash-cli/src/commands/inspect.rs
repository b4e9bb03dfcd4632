//! Inspect command implementation
//!
//! Prints the decoded fmt chunk and data chunk location of a WAV file,
//! optionally with a hex dump of the header bytes.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::process::ExitCode;

use wavwash_core::format::read_format_descriptor;
use wavwash_core::riff::{
    find_chunk, find_data, validate, ChunkHeader, DataDescriptor, CHUNK_HEADER_SIZE, FMT_ID,
    RIFF_HEADER_SIZE,
};
use wavwash_core::{ExtractError, FormatDescriptor, FormatTag};

/// Largest fmt chunk body included in a hex dump.
const MAX_DUMPED_FMT_BYTES: u64 = 256;

/// Header-level facts about one WAV file.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub format: FormatDescriptor,
    pub data: DataDescriptor,
    /// Whole frames declared by the data chunk.
    pub frames: usize,
}

#[derive(Debug, Serialize)]
struct InspectOutput<'a> {
    success: bool,
    path: String,
    #[serde(flatten)]
    report: Option<&'a InspectReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the inspect command
///
/// # Arguments
/// * `input` - Path to the WAV file
/// * `json_output` - Whether to output machine-readable JSON
/// * `hex` - Whether to hex dump the header and fmt chunk
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(input: &Path, json_output: bool, hex: bool) -> Result<ExitCode> {
    let result = inspect_file(input);

    if json_output {
        let output = match &result {
            Ok(report) => InspectOutput {
                success: true,
                path: input.display().to_string(),
                report: Some(report),
                error_code: None,
                error: None,
            },
            Err(e) => InspectOutput {
                success: false,
                path: input.display().to_string(),
                report: None,
                error_code: e.downcast_ref::<ExtractError>().map(ExtractError::code),
                error: Some(format!("{:#}", e)),
            },
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(if output.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        });
    }

    println!("{} {}", "Inspecting:".cyan().bold(), input.display());

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            println!("{} {:#}", "[ERROR]".red().bold(), e);
            return Ok(ExitCode::from(1));
        }
    };

    print_report(&report);

    if hex {
        let mut reader = open(input)?;
        for (offset, bytes) in header_regions(&mut reader)? {
            println!();
            print!("{}", hex_dump(offset, &bytes));
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Validates the file and decodes its fmt and data chunk headers.
///
/// Unlike conversion, this does not require the format to be supported.
pub fn inspect_file(path: &Path) -> Result<InspectReport> {
    let mut reader = open(path)?;

    validate(&mut reader).with_context(|| format!("Invalid WAV file: {}", path.display()))?;
    let format = read_format_descriptor(&mut reader)?;
    let data = find_data(&mut reader)?.ok_or(ExtractError::DataChunkMissing)?;

    Ok(InspectReport {
        frames: data.frame_count(format.block_align),
        format,
        data,
    })
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn print_report(report: &InspectReport) {
    let format = &report.format;
    let tag = FormatTag::from(format.format_tag);

    println!("{}", "Format:".green().bold());
    println!("  {:<18}{}", "audio format", tag);
    if let Some(ext) = &format.extensible {
        println!(
            "  {:<18}{}",
            "sub-format",
            FormatTag::from(ext.sub_format_code())
        );
        println!("  {:<18}{}", "valid bits", ext.valid_bits_per_sample);
        println!("  {:<18}0x{:08x}", "channel mask", ext.channel_mask);
    }
    println!("  {:<18}{}", "channels", format.channels);
    println!("  {:<18}{} Hz", "sample rate", format.sample_rate);
    println!("  {:<18}{}", "byte rate", format.byte_rate);
    println!("  {:<18}{}", "block align", format.block_align);
    println!("  {:<18}{}", "bits per sample", format.bits_per_sample);

    println!("{}", "Data:".green().bold());
    println!("  {:<18}0x{:x}", "data index", report.data.data_index);
    println!("  {:<18}{}", "data size", report.data.data_size);
    println!("  {:<18}{}", "frames", report.frames);

    if let Err(e) = format.check_supported() {
        println!("{} {}", "Not convertible:".yellow().bold(), e);
    }
}

/// The RIFF header and the fmt chunk (header and body), with file offsets.
fn header_regions<R: Read + Seek>(reader: &mut R) -> Result<Vec<(u64, Vec<u8>)>> {
    let mut regions = Vec::new();

    reader.seek(SeekFrom::Start(0))?;
    let mut riff = Vec::new();
    reader.by_ref().take(RIFF_HEADER_SIZE).read_to_end(&mut riff)?;
    regions.push((0, riff));

    if let Some(offset) = find_chunk(reader, FMT_ID)? {
        reader.seek(SeekFrom::Start(offset))?;
        let header = ChunkHeader::read(reader)?;
        let len = CHUNK_HEADER_SIZE + u64::from(header.size).min(MAX_DUMPED_FMT_BYTES);

        reader.seek(SeekFrom::Start(offset))?;
        let mut fmt = Vec::new();
        reader.by_ref().take(len).read_to_end(&mut fmt)?;
        regions.push((offset, fmt));
    }

    Ok(regions)
}

/// Formats bytes as offset, 16 hex bytes, and printable ASCII per line.
pub fn hex_dump(base_offset: u64, bytes: &[u8]) -> String {
    let mut out = String::new();

    for (row, line) in bytes.chunks(16).enumerate() {
        let _ = write!(out, "{:08x}  ", base_offset + row as u64 * 16);
        for i in 0..16 {
            match line.get(i) {
                Some(byte) => {
                    let _ = write!(out, "{:02x} ", byte);
                }
                None => out.push_str("   "),
            }
            if i == 7 {
                out.push(' ');
            }
        }
        out.push_str(" |");
        out.extend(line.iter().map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        }));
        out.push_str("|\n");
    }

    out
}
