// Application settings
// Loaded from ~/.config/bufalo/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Processing server used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "https://excel-proviewer-production.up.railway.app";

/// Name given to the processed workbook when the server does not suggest one.
pub const DEFAULT_DOWNLOAD_NAME: &str = "archivo_procesado.xlsx";

/// Overrides the configured endpoint.
pub const ENDPOINT_ENV: &str = "BUFALO_ENDPOINT";

/// Overrides the settings file location.
pub const CONFIG_ENV: &str = "BUFALO_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the processing server; `/upload/` is appended
    #[serde(rename = "upload.endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds. None waits for as long as the server takes.
    #[serde(rename = "upload.timeoutSecs")]
    pub timeout_secs: Option<u64>,

    /// Where processed files are written. None = the user's download folder
    #[serde(rename = "download.dir")]
    pub download_dir: Option<PathBuf>,

    /// File name for base64 replies
    #[serde(rename = "download.fileName")]
    pub download_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: None,
            download_dir: None,
            download_name: DEFAULT_DOWNLOAD_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bufalo")
            .join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }

        Self::load_from(&path)
    }

    /// Load from an explicit path. Unreadable or malformed files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Error parsing {}: {}", path.display(), e);
                    log::warn!("Using default settings");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON, ignoring `//` comment lines.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| e.to_string())?;

        fs::write(&path, json).map_err(|e| e.to_string())
    }

    /// Endpoint after applying a CLI flag and then `BUFALO_ENDPOINT`.
    pub fn effective_endpoint(&self, flag: Option<&str>) -> String {
        let raw = match flag {
            Some(url) => url.to_string(),
            None => std::env::var(ENDPOINT_ENV)
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| self.endpoint.clone()),
        };
        raw.trim().trim_end_matches('/').to_string()
    }

    /// Download directory after applying a CLI flag.
    pub fn effective_download_dir(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.download_dir.clone())
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Error creating config directory: {}", e);
                return;
            }
        }

        let default_config = format!(
            r#"{{
    // Processing server (POST <endpoint>/upload/)
    // BUFALO_ENDPOINT or --endpoint take precedence
    "upload.endpoint": "{}",

    // Seconds to wait for the server; null waits indefinitely
    "upload.timeoutSecs": null,

    // Where processed workbooks are saved; null = Downloads folder
    "download.dir": null,
    "download.fileName": "{}"
}}
"#,
            DEFAULT_ENDPOINT, DEFAULT_DOWNLOAD_NAME
        );

        if let Err(e) = fs::write(path, default_config) {
            log::warn!("Error writing default settings.json: {}", e);
        }
    }

    /// Get the config file path for display/opening
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}
