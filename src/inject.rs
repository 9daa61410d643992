//! Fills in the build-time placeholders left in the frontend bundle.
//!
//! The bundle is built once without knowing where it will be deployed, so
//! its JavaScript carries marker strings that are swapped for real values
//! when the server starts.

use std::path::Path;

use tokio::fs::{read_dir, read_to_string, write};

pub const API_BASE_URL: &str = "REACT_APP_API_BASE_URL_PLACEHOLDER";
pub const PINCODE_API_URL: &str = "REACT_APP_PINCODE_API_URL_PLACEHOLDER";
pub const APP_NAME: &str = "REACT_APP_APP_NAME_PLACEHOLDER";

/// Replaces every placeholder in the `.js` files directly inside
/// `assets_dir` and returns how many occurrences were replaced.
///
/// Only modified files are written back.
pub async fn inject_placeholders(
    assets_dir: &Path,
    placeholders: &[(&str, String)],
) -> anyhow::Result<usize> {
    if !assets_dir.is_dir() {
        log::warn!(
            "Frontend assets not found at {}, skipping placeholder injection",
            assets_dir.display()
        );
        return Ok(0);
    }

    let mut scripts = Vec::new();
    let mut entries = read_dir(assets_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map_or(false, |ext| ext == "js") && path.is_file() {
            scripts.push(path);
        }
    }
    scripts.sort();

    if scripts.is_empty() {
        log::warn!("No JavaScript files in {}", assets_dir.display());
        return Ok(0);
    }
    log::info!("Injecting placeholders into {} JavaScript files", scripts.len());

    let mut total = 0;
    for script in scripts {
        let mut content = read_to_string(&script).await?;
        let mut modified = false;
        for (placeholder, value) in placeholders {
            let count = content.matches(*placeholder).count();
            if count == 0 {
                continue;
            }
            content = content.replace(*placeholder, value);
            modified = true;
            total += count;
            log::info!(
                "Replaced {} occurrence(s) of {} in {}",
                count,
                placeholder,
                script.display()
            );
        }
        if modified {
            write(&script, content).await?;
        }
    }

    if total == 0 {
        log::warn!("No placeholders found to replace in {}", assets_dir.display());
    }
    Ok(total)
}
