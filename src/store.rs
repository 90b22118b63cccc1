//! Reading and writing mapping sheets as JSON or YAML documents.
//!
//! The format is picked from the file extension: `.yaml` / `.yml` are YAML,
//! anything else is JSON. A document is either a full mapping sheet or a bare
//! list of rows.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;

use crate::model::{MappingFile, MappingRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MappingDocument {
    Sheet(MappingFile),
    Rows(Vec<MappingRecord>),
}

impl From<MappingDocument> for MappingFile {
    fn from(document: MappingDocument) -> Self {
        match document {
            MappingDocument::Sheet(sheet) => sheet,
            MappingDocument::Rows(rows) => MappingFile::from_rows(rows),
        }
    }
}

pub fn parse_mapping_file(raw: &str, format: DocumentFormat) -> Result<MappingFile> {
    let document: MappingDocument = match format {
        DocumentFormat::Json => serde_json::from_str(raw).context("Parsing mapping JSON")?,
        DocumentFormat::Yaml => serde_yaml::from_str(raw).context("Parsing mapping YAML")?,
    };
    Ok(document.into())
}

pub fn load_mapping_file(path: &Path) -> Result<MappingFile> {
    let mut raw = String::new();
    File::open(path)
        .with_context(|| format!("Opening mapping file {path:?}"))?
        .read_to_string(&mut raw)
        .with_context(|| format!("Reading mapping file {path:?}"))?;
    let sheet = parse_mapping_file(&raw, DocumentFormat::from_path(path))
        .with_context(|| format!("Loading mappings from {path:?}"))?;
    debug!("Loaded {} mapping row(s) from {:?}", sheet.rows.len(), path);
    Ok(sheet)
}

pub fn save_mapping_file(path: &Path, sheet: &MappingFile) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Creating mapping file {path:?}"))?;
    let mut writer = BufWriter::new(file);
    match DocumentFormat::from_path(path) {
        DocumentFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, sheet)
                .with_context(|| format!("Writing mapping JSON to {path:?}"))?;
            writeln!(writer)?;
        }
        DocumentFormat::Yaml => {
            let rendered = serde_yaml::to_string(sheet).context("Serializing mapping YAML")?;
            writer
                .write_all(rendered.as_bytes())
                .with_context(|| format!("Writing mapping YAML to {path:?}"))?;
        }
    }
    writer.flush()?;
    debug!("Saved {} mapping row(s) to {:?}", sheet.rows.len(), path);
    Ok(())
}
