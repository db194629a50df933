// src/stations/names.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListFormat {
    Json,
    Toml,
}

impl ListFormat {
    /// `.toml` files are TOML; anything else is read as a JSON array.
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ListFormat::Toml,
            _ => ListFormat::Json,
        }
    }
}

/// Load station names from a JSON array or a TOML `stations = [...]` table.
/// Input order is kept: it decides ties in the nearest-station scan.
pub fn load_station_names(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading station names from {}", path.display()))?;
    let names = parse_station_names(&content, ListFormat::for_path(path))
        .with_context(|| format!("parsing station names in {}", path.display()))?;
    if names.is_empty() {
        return Err(anyhow!("{} lists no stations", path.display()));
    }
    Ok(names)
}

fn parse_station_names(s: &str, format: ListFormat) -> Result<Vec<String>> {
    let raw = match format {
        ListFormat::Json => serde_json::from_str::<Vec<String>>(s)
            .context("expected a JSON array of station names")?,
        ListFormat::Toml => {
            #[derive(serde::Deserialize)]
            struct StationsTable {
                stations: Vec<String>,
            }
            toml::from_str::<StationsTable>(s)
                .context("expected `stations = [...]`")?
                .stations
        }
    };
    Ok(clean_list(raw))
}

/// Trim, drop blanks and repeats; first occurrence wins.
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if !t.is_empty() && !out.iter().any(|o| o == t) {
            out.push(t.to_string());
        }
    }
    out
}
