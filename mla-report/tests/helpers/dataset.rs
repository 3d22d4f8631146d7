//! CSV fixture directories

use mla_common::config::{AnalyticsConfig, OutputFormat};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const LISTENING_HEADER: &str = "listening_id,user_id,song_id,listen_datetime";
pub const SONGS_HEADER: &str = "song_id,song,singer_id";
pub const USERS_HEADER: &str = "user_id,age,city";
pub const SINGER_HEADER: &str = "singer_id,singer";

/// Scratch directory with `data/` and `output/` subdirectories
pub struct TestDataset {
    dir: TempDir,
}

impl TestDataset {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        Self { dir }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("output")
    }

    /// Write `header` followed by `rows` to `data/<file_name>`
    pub fn write_table(&self, file_name: &str, header: &str, rows: &[&str]) -> &Self {
        let mut content = String::from(header);
        content.push('\n');
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        fs::write(self.data_dir().join(file_name), content).unwrap();
        self
    }

    pub fn remove_table(&self, file_name: &str) {
        fs::remove_file(self.data_dir().join(file_name)).unwrap();
    }

    /// Files currently in the output directory, sorted by name
    pub fn output_files(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(self.output_dir()) else {
            return Vec::new();
        };
        let mut files: Vec<PathBuf> = entries.map(|e| e.unwrap().path()).collect();
        files.sort();
        files
    }
}

/// Three users in two cities, two songs by two singers, three listens
pub fn scenario_dataset() -> TestDataset {
    let dataset = TestDataset::new();
    dataset
        .write_table(
            "users.csv",
            USERS_HEADER,
            &["1,25,Ankara", "2,30,Ankara", "3,35,Bursa"],
        )
        .write_table(
            "songs.csv",
            SONGS_HEADER,
            &["10,song-for-10,100", "11,song-for-11,101"],
        )
        .write_table(
            "singer.csv",
            SINGER_HEADER,
            &["100,singer-100", "101,singer-101"],
        )
        .write_table(
            "listening.csv",
            LISTENING_HEADER,
            &[
                "1,1,10,2021-01-01T10:00",
                "2,1,10,2021-01-01T11:00",
                "3,2,11,2022-05-05T09:00",
            ],
        );
    dataset
}

/// Configuration pointing at the dataset's directories
pub fn test_config(dataset: &TestDataset) -> AnalyticsConfig {
    AnalyticsConfig {
        data_dir: dataset.data_dir(),
        output_dir: dataset.output_dir(),
        format: OutputFormat::Text,
        parallel: true,
        strict_keys: false,
        log_level: "info".to_string(),
    }
}
