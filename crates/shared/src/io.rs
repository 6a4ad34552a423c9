use anyhow::{Context, Result};
use chrono::DateTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::models::CompanyAnalysis;

const SUPPORTED_VERSION: &str = "1.0";

/// Get the default directory for storing analysis files
pub fn get_default_analyses_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .context("Could not determine local data directory")?
        .join("company-news")
        .join("analyses");

    fs::create_dir_all(&data_dir).context("Failed to create analyses directory")?;

    Ok(data_dir)
}

/// Save an analysis to a JSON file in the default directory
pub fn save_analysis(data: &CompanyAnalysis, filename: &str) -> Result<PathBuf> {
    let analyses_dir = get_default_analyses_dir()?;
    save_analysis_in(&analyses_dir, data, filename)
}

pub fn save_analysis_in(dir: &Path, data: &CompanyAnalysis, filename: &str) -> Result<PathBuf> {
    let filepath = dir.join(filename);

    let json = serde_json::to_string_pretty(data).context("Failed to serialize analysis")?;

    fs::write(&filepath, json).context("Failed to write analysis file")?;

    Ok(filepath)
}

/// Load an analysis from a JSON file
pub fn load_analysis(filepath: &Path) -> Result<CompanyAnalysis> {
    if !filepath.exists() {
        anyhow::bail!("Analysis file not found: {}", filepath.display());
    }

    let content = fs::read_to_string(filepath)
        .with_context(|| format!("Failed to read analysis file: {}", filepath.display()))?;

    let data: CompanyAnalysis = serde_json::from_str(&content).with_context(|| {
        format!(
            "Failed to parse analysis JSON from {}. The file may be corrupted or not a valid analysis file.",
            filepath.display()
        )
    })?;

    if data.version != SUPPORTED_VERSION {
        anyhow::bail!(
            "Unsupported analysis file version: {}. Expected {}. Please rerun analyze-news.",
            data.version,
            SUPPORTED_VERSION
        );
    }

    let counted = data.report.sentiment_distribution.total();
    if counted != data.articles.len() {
        anyhow::bail!(
            "Analysis file {} is inconsistent: distribution counts {} articles but {} are stored.",
            filepath.display(),
            counted,
            data.articles.len()
        );
    }

    Ok(data)
}

/// List all analysis files in the default directory, newest first
pub fn list_analysis_files() -> Result<Vec<(PathBuf, CompanyAnalysis)>> {
    let analyses_dir = get_default_analyses_dir()?;
    list_analysis_files_in(&analyses_dir)
}

pub fn list_analysis_files_in(dir: &Path) -> Result<Vec<(PathBuf, CompanyAnalysis)>> {
    let mut files = Vec::new();

    if dir.exists() {
        for entry in fs::read_dir(dir).context("Failed to read analyses directory")? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                match load_analysis(&path) {
                    Ok(data) => files.push((path, data)),
                    Err(e) => warn!(path = %path.display(), error = %e, "Could not load analysis"),
                }
            }
        }
    }

    files.sort_by(|a, b| {
        let time_a = DateTime::parse_from_rfc3339(&a.1.created_at).ok();
        let time_b = DateTime::parse_from_rfc3339(&b.1.created_at).ok();
        time_b.cmp(&time_a)
    });

    Ok(files)
}
