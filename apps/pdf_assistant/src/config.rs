use std::{fs, io, path::Path, time::Duration};

use anyhow::Context;
use client_core::HttpServiceOptions;
use serde::Deserialize;
use shared::protocol::IngestParams;

pub const DEFAULT_SETTINGS_FILE: &str = "pdf-assistant.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub service_url: String,
    pub request_timeout_secs: u64,
    pub chunk_size: Option<u32>,
    pub chunk_overlap: Option<u32>,
    pub top_k: Option<u32>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:8000".into(),
            request_timeout_secs: 120,
            chunk_size: None,
            chunk_overlap: None,
            top_k: None,
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    service_url: Option<String>,
    request_timeout_secs: Option<u64>,
    chunk_size: Option<u32>,
    chunk_overlap: Option<u32>,
    top_k: Option<u32>,
    log_filter: Option<String>,
}

impl Settings {
    pub fn service_options(&self) -> HttpServiceOptions {
        HttpServiceOptions {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ingest: IngestParams {
                chunk_size: self.chunk_size,
                overlap: self.chunk_overlap,
            },
            top_k: self.top_k,
        }
    }

    fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.service_url {
            self.service_url = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if file_cfg.chunk_size.is_some() {
            self.chunk_size = file_cfg.chunk_size;
        }
        if file_cfg.chunk_overlap.is_some() {
            self.chunk_overlap = file_cfg.chunk_overlap;
        }
        if file_cfg.top_k.is_some() {
            self.top_k = file_cfg.top_k;
        }
        if let Some(v) = file_cfg.log_filter {
            self.log_filter = v;
        }
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("PDF_ASSISTANT_SERVICE_URL") {
            self.service_url = v;
        }
        if let Some(v) = var("APP__SERVICE_URL") {
            self.service_url = v;
        }

        if let Some(parsed) = var("APP__REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.request_timeout_secs = parsed;
        }
        if let Some(parsed) = var("APP__CHUNK_SIZE").and_then(|v| v.parse().ok()) {
            self.chunk_size = Some(parsed);
        }
        if let Some(parsed) = var("APP__CHUNK_OVERLAP").and_then(|v| v.parse().ok()) {
            self.chunk_overlap = Some(parsed);
        }
        if let Some(parsed) = var("APP__TOP_K").and_then(|v| v.parse().ok()) {
            self.top_k = Some(parsed);
        }

        if let Some(v) = var("APP__LOG_FILTER") {
            self.log_filter = v;
        }
    }
}

/// Defaults, then the settings file, then environment overrides.
///
/// An explicitly named file must exist; the default file is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

fn load_settings_with(
    path: Option<&Path>,
    var: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (file, required) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_SETTINGS_FILE), false),
    };
    match fs::read_to_string(file) {
        Ok(raw) => settings
            .apply_file(&raw)
            .with_context(|| format!("invalid settings file '{}'", file.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", file.display()))
        }
    }

    settings.apply_env(var);
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
