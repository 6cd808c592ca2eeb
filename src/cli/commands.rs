// CLI command implementations
use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use sonotag::flac::StreamInfo;
use sonotag::{AudioFile, ByteCursor, Container, DurationEstimator, ParseOptions};

use super::config::{Commands, Config};
use super::output::OutputFormatter;

/// Dispatch the parsed command line
pub fn run(config: &Config, options: &ParseOptions) -> Result<()> {
    let formatter = OutputFormatter::new(config.format, config.quiet);

    match &config.command {
        Commands::Read { files, output } => command_read(files, output.as_deref(), options, &formatter),
        Commands::Detect { files } => command_detect(files, &formatter),
        Commands::Duration { files } => command_duration(files, &formatter),
        Commands::Batch { directory, pattern } => command_batch(directory, pattern, options, &formatter),
        Commands::Info { files, detailed } => command_info(files, *detailed, &formatter),
    }
}

/// Read tags from files
fn command_read(
    files: &[PathBuf],
    output: Option<&Path>,
    options: &ParseOptions,
    formatter: &OutputFormatter,
) -> Result<()> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(std::io::stdout()),
    };

    let mut failures = 0;
    for path in files {
        match AudioFile::open_with(path, options) {
            Ok(audio) => {
                let record = serde_json::to_value(audio.metadata())?;
                formatter.output(&record, &mut *writer)?;
            }
            Err(e) => {
                formatter.print_error(&format!("{}: {}", path.display(), e));
                failures += 1;
            }
        }
    }
    writer.flush()?;

    if let Some(path) = output {
        formatter.print_success(&format!(
            "Wrote {} records to {}",
            files.len() - failures,
            path.display()
        ));
    }
    if failures == files.len() {
        bail!("no file could be read");
    }
    Ok(())
}

/// Detect container format
fn command_detect(files: &[PathBuf], formatter: &OutputFormatter) -> Result<()> {
    let mut stdout = std::io::stdout();
    for path in files {
        if !path.exists() {
            formatter.print_error(&format!("File not found: {}", path.display()));
            continue;
        }
        formatter.output(&detect_record(path), &mut stdout)?;
    }
    Ok(())
}

fn detect_record(path: &Path) -> Value {
    let container = sonotag::detect(path);
    let readers: Vec<&str> = container.reader_plan().iter().map(|r| r.name()).collect();
    json!({
        "path": path.display().to_string(),
        "container": container,
        "readers": readers,
    })
}

/// Estimate playing time with its provenance
fn command_duration(files: &[PathBuf], formatter: &OutputFormatter) -> Result<()> {
    let estimator = DurationEstimator::default();
    let mut stdout = std::io::stdout();

    for path in files {
        if !path.exists() {
            formatter.print_error(&format!("File not found: {}", path.display()));
            continue;
        }
        let estimate = estimator.estimate(path);
        let record = json!({
            "path": path.display().to_string(),
            "duration_secs": estimate.map(|e| e.duration.as_secs_f64()),
            "provenance": estimate.map(|e| e.provenance),
        });
        formatter.output(&record, &mut stdout)?;
    }
    Ok(())
}

/// Expand `pattern` under `directory`. A pattern without wildcards matches
/// that file name at any depth.
fn batch_files(directory: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let glob_pattern = if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
        directory.join(pattern)
    } else {
        directory.join("**").join(pattern)
    };
    let glob_pattern = glob_pattern
        .to_str()
        .context("directory path is not valid UTF-8")?
        .to_string();

    let mut files = Vec::new();
    for entry in glob::glob(&glob_pattern).with_context(|| format!("invalid glob pattern: {}", glob_pattern))? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => debug!(error = %e, "unreadable path during glob"),
        }
    }
    files.sort();
    Ok(files)
}

/// Read every matching file in a directory
fn command_batch(
    directory: &Path,
    pattern: &str,
    options: &ParseOptions,
    formatter: &OutputFormatter,
) -> Result<()> {
    if !directory.is_dir() {
        bail!("not a directory: {}", directory.display());
    }

    let files = batch_files(directory, pattern)?;
    let total = files.len();
    if total == 0 {
        formatter.print_info("No files found matching pattern");
        return Ok(());
    }
    formatter.print_info(&format!("Processing {} files...", total));

    let mut stdout = std::io::stdout();
    let mut success_count = 0;
    let mut error_count = 0;

    for path in &files {
        match AudioFile::open_with(path, options) {
            Ok(audio) => {
                formatter.output(&serde_json::to_value(audio.metadata())?, &mut stdout)?;
                success_count += 1;
            }
            Err(e) => {
                formatter.print_error(&format!("{}: {}", path.display(), e));
                error_count += 1;
            }
        }
    }

    formatter.print_info(&format!(
        "Completed: {} successful, {} errors",
        success_count, error_count
    ));
    Ok(())
}

/// Show file information
fn command_info(files: &[PathBuf], detailed: bool, formatter: &OutputFormatter) -> Result<()> {
    let estimator = DurationEstimator::default();
    let mut stdout = std::io::stdout();

    for path in files {
        if !path.exists() {
            formatter.print_error(&format!("File not found: {}", path.display()));
            continue;
        }
        let record = info_record(path, detailed, &estimator)?;
        formatter.output(&record, &mut stdout)?;
    }
    Ok(())
}

fn info_record(path: &Path, detailed: bool, estimator: &DurationEstimator) -> Result<Value> {
    let fs_meta = std::fs::metadata(path).with_context(|| format!("cannot stat {}", path.display()))?;
    let modified = fs_meta
        .modified()
        .ok()
        .map(|t| chrono::DateTime::<chrono::Utc>::from(t).format("%Y-%m-%d %H:%M:%S UTC").to_string());

    let container = sonotag::detect(path);
    let estimate = estimator.estimate(path);

    let mut record = json!({
        "path": path.display().to_string(),
        "size": fs_meta.len(),
        "modified": modified,
        "container": container,
        "duration_secs": estimate.map(|e| e.duration.as_secs_f64()),
        "provenance": estimate.map(|e| e.provenance),
    });

    if detailed && container == Container::Flac {
        let mut cursor = ByteCursor::open(path)?;
        if let (Some(info), Some(obj)) = (StreamInfo::read(&mut cursor)?, record.as_object_mut()) {
            obj.insert("sample_rate".into(), json!(info.sample_rate));
            obj.insert("channels".into(), json!(info.channels));
            obj.insert("bits_per_sample".into(), json!(info.bits_per_sample));
            obj.insert("total_samples".into(), json!(info.total_samples));
        }
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn batch_matches_wildcards_at_top_level() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.flac"), b"fLaC").unwrap();
        fs::write(dir.path().join("b.mp3"), b"").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.flac"), b"fLaC").unwrap();

        let files = batch_files(dir.path(), "*.flac").unwrap();
        assert_eq!(files, vec![dir.path().join("a.flac")]);
    }

    #[test]
    fn batch_plain_name_matches_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("track.wav"), b"").unwrap();

        let files = batch_files(dir.path(), "track.wav").unwrap();
        assert_eq!(files, vec![dir.path().join("sub").join("track.wav")]);
    }

    #[test]
    fn detect_lists_reader_plan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.bin");
        fs::write(&path, b"fLaC\0\0\0\0").unwrap();

        let record = detect_record(&path);
        assert_eq!(record["container"], "flac");
        assert_eq!(record["readers"], json!(["id3v2", "id3v1", "flac"]));
    }

    #[test]
    fn info_reports_size_and_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.ogg");
        fs::write(&path, b"OggS").unwrap();

        let record = info_record(&path, true, &DurationEstimator::with_sources(Vec::new())).unwrap();
        assert_eq!(record["size"], 4);
        assert_eq!(record["container"], "ogg");
        assert!(record["duration_secs"].is_null());
        assert!(record.get("sample_rate").is_none());
    }
}
