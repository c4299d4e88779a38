use anyhow::{Context, Result};
use std::path::Path;

/// Parse newline-delimited samples where `null`, `nan` or `-` marks a missing value.
/// Blank lines and `#` comments are skipped.
pub fn parse_nullable_series(text: &str) -> Result<Vec<Option<f64>>> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if matches!(trimmed.to_ascii_lowercase().as_str(), "null" | "nan" | "-") {
            out.push(None);
            continue;
        }
        let val: f64 = trimmed
            .parse()
            .with_context(|| format!("line {} is not f64: {}", idx + 1, trimmed))?;
        out.push(Some(val));
    }
    if out.is_empty() {
        anyhow::bail!("no samples found");
    }
    Ok(out)
}

/// Read a nullable sample series from disk.
pub fn read_nullable_series(path: &Path) -> Result<Vec<Option<f64>>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_nullable_series(&text)
}
