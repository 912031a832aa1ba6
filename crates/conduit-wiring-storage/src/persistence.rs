//! Snapshot files.

use crate::ModelSnapshot;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

pub fn load_snapshot(path: &Path) -> Result<ModelSnapshot> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read model snapshot {}", path.display()))?;
    let snapshot: ModelSnapshot = serde_json::from_str(&text)
        .with_context(|| format!("invalid model snapshot {}", path.display()))?;
    tracing::debug!(path = %path.display(), elements = snapshot.elements.len(), "loaded snapshot");
    Ok(snapshot)
}

/// Writes a sibling temp file, then renames it over `path`.
pub fn save_snapshot(path: &Path, snapshot: &ModelSnapshot) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("snapshot path has no file name: {}", path.display()))?;
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;

    let tmp = dir.join(format!(".{}.tmp", file_name.to_string_lossy()));
    let json = serde_json::to_string_pretty(snapshot)?;
    {
        let mut file = fs::File::create(&tmp)
            .with_context(|| format!("failed to create {}", tmp.display()))?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to move snapshot into {}", path.display()))?;

    tracing::debug!(path = %path.display(), elements = snapshot.elements.len(), "saved snapshot");
    Ok(())
}
