//! Report file writer
//!
//! Writes the rendered report set to `<output_dir>/output_<YYYYMMDD_HHMMSS>.<ext>`.
//! The directory is created if needed. A name already taken gets `_1`, `_2`, ...
//! appended so earlier reports are never overwritten. Content is written to a
//! hidden temporary file and renamed into place, so a failed run leaves no
//! partial report behind.

use super::aggregator::ReportSet;
use super::renderer::{render_json, render_text};
use chrono::{DateTime, Local};
use mla_common::config::OutputFormat;
use mla_common::time::output_stamp;
use mla_common::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Write `reports` under `output_dir` and return the path written
pub fn write_reports(
    reports: &ReportSet,
    output_dir: impl Into<PathBuf>,
    format: OutputFormat,
    now: &DateTime<Local>,
) -> Result<PathBuf> {
    Reporter::new(output_dir, format)
        .write(reports, now)
        .map(|written| written.path)
}

/// A report file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenReport {
    pub path: PathBuf,
    pub bytes: usize,
}

pub struct Reporter {
    output_dir: PathBuf,
    format: OutputFormat,
}

impl Reporter {
    pub fn new(output_dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render `reports` and write them to a fresh file stamped with `at`
    pub fn write(&self, reports: &ReportSet, at: &DateTime<Local>) -> Result<WrittenReport> {
        let content = match self.format {
            OutputFormat::Text => render_text(reports),
            OutputFormat::Json => render_json(reports, at)?,
        };

        fs::create_dir_all(&self.output_dir)?;
        let path = self.available_path(&output_stamp(at));

        write_atomically(&path, content.as_bytes())?;

        debug!(path = %path.display(), bytes = content.len(), "Report written");
        Ok(WrittenReport {
            path,
            bytes: content.len(),
        })
    }

    /// First unused `output_<stamp>[_N].<ext>` in the output directory
    fn available_path(&self, stamp: &str) -> PathBuf {
        let extension = self.format.extension();
        let mut path = self
            .output_dir
            .join(format!("output_{}.{}", stamp, extension));
        let mut suffix = 1u32;
        while path.exists() {
            path = self
                .output_dir
                .join(format!("output_{}_{}.{}", stamp, suffix, extension));
            suffix += 1;
        }
        path
    }
}

/// Write `bytes` to a hidden sibling of `path`, then rename it into place
///
/// On any failure the sibling is removed and `path` is left untouched.
fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let temp_path = temp_path_for(path);
    let result = fs::File::create(&temp_path)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&temp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReportTable, Value};
    use crate::services::aggregator::ReportName;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn reports() -> ReportSet {
        let mut table = ReportTable::new(["hour", "count"]);
        table.push_row(vec![Value::Int(10), Value::Int(3)]);
        let mut reports = ReportSet::new();
        reports.insert(ReportName::MostPopularHours, table);
        reports
    }

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_creates_directory_and_stamped_file() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("nested").join("output");
        let reporter = Reporter::new(&output_dir, OutputFormat::Text);

        let written = reporter.write(&reports(), &at()).unwrap();

        assert_eq!(written.path, output_dir.join("output_20240102_030405.txt"));
        let content = fs::read_to_string(&written.path).unwrap();
        assert_eq!(content, render_text(&reports()));
        assert_eq!(written.bytes, content.len());
    }

    #[test]
    fn test_same_second_does_not_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = Reporter::new(temp_dir.path(), OutputFormat::Text);

        let first = reporter.write(&reports(), &at()).unwrap();
        let second = reporter.write(&reports(), &at()).unwrap();
        let third = reporter.write(&reports(), &at()).unwrap();

        assert_eq!(first.path, temp_dir.path().join("output_20240102_030405.txt"));
        assert_eq!(second.path, temp_dir.path().join("output_20240102_030405_1.txt"));
        assert_eq!(third.path, temp_dir.path().join("output_20240102_030405_2.txt"));
    }

    #[test]
    fn test_json_extension() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = Reporter::new(temp_dir.path(), OutputFormat::Json);

        let written = reporter.write(&reports(), &at()).unwrap();

        assert_eq!(written.path.extension().unwrap(), "json");
        let content = fs::read_to_string(&written.path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["reports"][0]["rows"][0][1], 3);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = Reporter::new(temp_dir.path(), OutputFormat::Text);
        reporter.write(&reports(), &at()).unwrap();

        let names: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["output_20240102_030405.txt"]);
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        // A non-empty directory in the way makes the final rename fail
        let blocked = temp_dir.path().join("output_20240102_030405.txt");
        fs::create_dir_all(blocked.join("occupied")).unwrap();

        let result = write_atomically(&blocked, b"report");

        assert!(result.is_err());
        assert!(!temp_path_for(&blocked).exists());
        assert!(blocked.join("occupied").is_dir());
    }

    #[test]
    fn test_unwritable_location_leaves_nothing_behind() {
        let temp_dir = TempDir::new().unwrap();
        let missing_parent = temp_dir.path().join("absent").join("output.txt");

        assert!(write_atomically(&missing_parent, b"report").is_err());
        assert!(!temp_dir.path().join("absent").exists());
    }
}
