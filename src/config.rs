//! Runtime configuration for the scrape and report pipeline.
//!
//! Every stage receives its settings explicitly. Defaults point at the live
//! Wikipedia page; a JSON file or CLI flags can substitute any of them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOURCE: &str = "https://en.wikipedia.org/wiki/List_of_Spotify_streaming_records";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_TABLE_CLASSES: &[&str] = &["wikitable", "sortable", "plainrowheaders"];

pub const DEFAULT_DB_PATH: &str = "spotify_streaming_records.db";

pub const DEFAULT_TABLE_NAME: &str = "streaming_records";

pub const DEFAULT_REPORT_PATH: &str = "streaming_report.json";

/// Which HTML table to extract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Class tokens the table's `class` attribute must all contain.
    pub classes: Vec<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            classes: DEFAULT_TABLE_CLASSES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Location of the SQLite file and the table the records live in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: String,
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DB_PATH.to_string(),
            table: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

/// Sizes of the derived report views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub top_n: usize,
    pub histogram_bins: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            histogram_bins: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// URL to fetch, or a local HTML file path.
    pub source: String,
    pub user_agent: String,
    pub table: TableConfig,
    pub store: StoreConfig,
    pub report: ReportConfig,
    pub report_path: Option<String>,
    pub csv_path: Option<String>,
    /// Also log the full report as pretty JSON.
    pub print_json: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            table: TableConfig::default(),
            store: StoreConfig::default(),
            report: ReportConfig::default(),
            report_path: Some(DEFAULT_REPORT_PATH.to_string()),
            csv_path: None,
            print_json: false,
        }
    }
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path`. Missing keys keep their defaults.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{path}'"))?;
        let config: PipelineConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file '{path}'"))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_defaults_match_live_page() {
        let config = PipelineConfig::default();
        assert_eq!(config.source, DEFAULT_SOURCE);
        assert_eq!(config.table.classes, vec!["wikitable", "sortable", "plainrowheaders"]);
        assert_eq!(config.store.table, "streaming_records");
        assert_eq!(config.report.top_n, 10);
        assert_eq!(config.report.histogram_bins, 20);
        assert!(!config.print_json);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let path = temp_path("streaming_records_test_config.json");
        fs::write(
            &path,
            r#"{ "source": "fixture.html", "store": { "path": "other.db" }, "print_json": true }"#,
        )
        .unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.source, "fixture.html");
        assert_eq!(config.store.path, "other.db");
        assert_eq!(config.store.table, DEFAULT_TABLE_NAME);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert!(config.print_json);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = PipelineConfig::load("/nonexistent/streaming_records.json");
        assert!(result.is_err());
    }
}
