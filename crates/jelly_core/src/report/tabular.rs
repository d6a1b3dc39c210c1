//! Tabular (CSV) export.

use std::io::Write;
use std::path::Path;

use crate::batch::BatchResult;
use crate::error::{Error, Result};

/// Column names and order are the compatibility contract; consumers parse
/// this export by position.
pub const CSV_HEADER: [&str; 9] = [
    "Filename",
    "Predicted Species",
    "Confidence (%)",
    "Status",
    "Scientific Name",
    "Habitat",
    "Size",
    "Sting Danger",
    "Note",
];

/// Write the tabular export to a file.
pub fn write_tabular(batch: &BatchResult, path: impl AsRef<Path>) -> Result<()> {
    if batch.is_empty() {
        return Err(Error::EmptyBatch);
    }
    let mut wtr = csv::Writer::from_path(path)?;
    write_rows(&mut wtr, batch)?;
    wtr.flush()?;
    Ok(())
}

/// Write the tabular export to any writer.
pub fn tabular_to_writer<W: Write>(batch: &BatchResult, writer: W) -> Result<()> {
    if batch.is_empty() {
        return Err(Error::EmptyBatch);
    }
    let mut wtr = csv::Writer::from_writer(writer);
    write_rows(&mut wtr, batch)?;
    wtr.flush()?;
    Ok(())
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, batch: &BatchResult) -> Result<()> {
    wtr.write_record(CSV_HEADER)?;
    for item in &batch.items {
        let tier = item.prediction.tier();
        let filename = item
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| item.file.to_string_lossy().into_owned());
        let confidence = format!("{:.1}", item.prediction.confidence * 100.0);
        wtr.write_record([
            filename.as_str(),
            item.species.display_name,
            confidence.as_str(),
            tier.label(),
            item.species.scientific,
            item.species.habitat,
            item.species.size,
            item.species.danger.plain_label(),
            tier.advisory(),
        ])?;
    }
    Ok(())
}
