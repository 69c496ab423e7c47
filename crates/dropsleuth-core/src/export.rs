/// Export a dropped batch as CSV or JSON.
///
/// Only metadata is written (names, in-drop paths, sizes, timestamps);
/// file contents are never read.
use crate::error::{DropError, Result};
use crate::model::{DropPoint, DroppedBatch, DroppedFile};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct FileRow<'a> {
    name: &'a str,
    full_path: &'a str,
    native_path: Option<String>,
    size: u64,
    modified: Option<String>,
}

impl<'a> From<&'a DroppedFile> for FileRow<'a> {
    fn from(f: &'a DroppedFile) -> Self {
        Self {
            name: &f.name,
            full_path: &f.full_path,
            native_path: f.path.as_ref().map(|p| p.to_string_lossy().into_owned()),
            size: f.size,
            modified: f
                .modified
                .map(|t| chrono::DateTime::<chrono::Local>::from(t).to_rfc3339()),
        }
    }
}

#[derive(Serialize)]
struct BatchDoc<'a> {
    files: Vec<FileRow<'a>>,
    point: Option<[f32; 2]>,
    skipped: Vec<String>,
}

/// Column order of [`FileRow`].
const CSV_HEADER: [&str; 5] = ["name", "full_path", "native_path", "size", "modified"];

/// One row per file, with a header. An empty batch still gets the header.
pub fn write_csv<W: Write>(batch: &DroppedBatch, writer: W) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for file in &batch.files {
        csv.serialize(FileRow::from(file))?;
    }
    csv.flush().map_err(|e| DropError::Export(e.to_string()))?;
    Ok(())
}

/// A single JSON document with the files, the drop point and the skipped
/// branch errors.
pub fn write_json<W: Write>(batch: &DroppedBatch, mut writer: W) -> Result<()> {
    let doc = BatchDoc {
        files: batch.files.iter().map(FileRow::from).collect(),
        point: batch.point.map(|DropPoint { x, y }| [x, y]),
        skipped: batch.skipped.iter().map(ToString::to_string).collect(),
    };
    serde_json::to_writer_pretty(&mut writer, &doc)?;
    writer
        .flush()
        .map_err(|e| DropError::Export(e.to_string()))?;
    Ok(())
}

/// Write `batch` to `path`, choosing the format from the extension.
pub fn export_to_path(batch: &DroppedBatch, path: &Path) -> Result<()> {
    let format = ExportFormat::from_path(path).ok_or_else(|| {
        DropError::Export(format!(
            "unsupported export extension for {} (use .csv or .json)",
            path.display()
        ))
    })?;
    let file = std::fs::File::create(path)
        .map_err(|e| DropError::Export(format!("{}: {e}", path.display())))?;
    let writer = std::io::BufWriter::new(file);
    match format {
        ExportFormat::Csv => write_csv(batch, writer)?,
        ExportFormat::Json => write_json(batch, writer)?,
    }
    info!("Exported {} file(s) to {}", batch.files.len(), path.display());
    Ok(())
}
