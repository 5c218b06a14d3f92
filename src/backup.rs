use crate::store::Snapshot;
use anyhow::{anyhow, Context};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const MANIFEST_ENTRY: &str = "manifest.json";
const SNAPSHOT_ENTRY: &str = "data/educontrol.json";
pub const BUNDLE_FORMAT_V1: &str = "educontrol-backup-v1";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub entry_count: usize,
}

#[derive(Debug)]
pub struct ImportSummary {
    pub bundle_format_detected: String,
    pub snapshot: Snapshot,
}

/// Import failures split in two: I/O trouble reaching the file, and payloads
/// that reached us but are not a valid backup. The caller surfaces them under
/// different codes and must leave current state untouched either way.
#[derive(Debug)]
pub enum ImportError {
    Io(anyhow::Error),
    Malformed(anyhow::Error),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(e) => write!(f, "{:#}", e),
            ImportError::Malformed(e) => write!(f, "{:#}", e),
        }
    }
}

pub fn export_backup_bundle(
    snapshot: &Snapshot,
    out_path: &Path,
) -> anyhow::Result<ExportSummary> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create directory {}", parent.to_string_lossy())
            })?;
        }
    }

    let payload =
        serde_json::to_string_pretty(snapshot).context("failed to serialize snapshot")?;
    let checksum = format!("{:x}", Sha256::digest(payload.as_bytes()));

    let out_file = File::create(out_path).with_context(|| {
        format!(
            "failed to create output file {}",
            out_path.to_string_lossy()
        )
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let exported_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let manifest = json!({
        "format": BUNDLE_FORMAT_V1,
        "version": 1,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": exported_at,
        "snapshotSha256": checksum,
    });
    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    zip.start_file(SNAPSHOT_ENTRY, opts)
        .context("failed to start snapshot entry")?;
    zip.write_all(payload.as_bytes())
        .context("failed to write snapshot entry")?;

    zip.finish().context("failed to finalize zip bundle")?;

    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT_V1.to_string(),
        entry_count: 2,
    })
}

/// Read a backup from disk without touching any state. Accepts either a
/// bundle produced by [`export_backup_bundle`] or a raw `.json` snapshot (the
/// dashboard's own download format), detected by file signature.
pub fn import_backup(in_path: &Path) -> Result<ImportSummary, ImportError> {
    if !is_zip_file(in_path).map_err(ImportError::Io)? {
        let bytes = std::fs::read(in_path)
            .with_context(|| format!("failed to read {}", in_path.to_string_lossy()))
            .map_err(ImportError::Io)?;
        let snapshot = Snapshot::from_slice(&bytes).map_err(ImportError::Malformed)?;
        return Ok(ImportSummary {
            bundle_format_detected: "raw-json".to_string(),
            snapshot,
        });
    }

    let in_file = File::open(in_path)
        .with_context(|| format!("failed to open bundle {}", in_path.to_string_lossy()))
        .map_err(ImportError::Io)?;
    let mut archive = ZipArchive::new(in_file)
        .context("invalid zip archive")
        .map_err(ImportError::Malformed)?;

    let mut manifest_text = String::new();
    archive
        .by_name(MANIFEST_ENTRY)
        .context("bundle missing manifest.json")
        .map_err(ImportError::Malformed)?
        .read_to_string(&mut manifest_text)
        .context("failed to read manifest.json")
        .map_err(ImportError::Malformed)?;
    let manifest: serde_json::Value = serde_json::from_str(&manifest_text)
        .context("manifest.json is invalid JSON")
        .map_err(ImportError::Malformed)?;
    let format = manifest
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if format != BUNDLE_FORMAT_V1 {
        return Err(ImportError::Malformed(anyhow!(
            "unsupported bundle format: {}",
            format
        )));
    }

    let mut payload = Vec::new();
    archive
        .by_name(SNAPSHOT_ENTRY)
        .context("bundle missing data/educontrol.json")
        .map_err(ImportError::Malformed)?
        .read_to_end(&mut payload)
        .context("failed to read snapshot entry")
        .map_err(ImportError::Malformed)?;

    if let Some(expected) = manifest.get("snapshotSha256").and_then(|v| v.as_str()) {
        let actual = format!("{:x}", Sha256::digest(&payload));
        if actual != expected {
            return Err(ImportError::Malformed(anyhow!(
                "snapshot checksum mismatch: manifest says {}, entry hashes to {}",
                expected,
                actual
            )));
        }
    }

    let snapshot = Snapshot::from_slice(&payload).map_err(ImportError::Malformed)?;
    Ok(ImportSummary {
        bundle_format_detected: BUNDLE_FORMAT_V1.to_string(),
        snapshot,
    })
}

fn is_zip_file(path: &Path) -> anyhow::Result<bool> {
    let mut f = File::open(path)
        .with_context(|| format!("failed to open input file {}", path.to_string_lossy()))?;
    let mut sig = [0u8; 4];
    let read = f.read(&mut sig).context("failed to read file signature")?;
    if read < 4 {
        return Ok(false);
    }
    Ok(sig == [0x50, 0x4B, 0x03, 0x04])
}
