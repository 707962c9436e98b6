use crate::models::{SchemeDocument, SchemeRow};
use anyhow::{Context, Result};
use std::path::Path;

/// Load scheme rows from the CSV export
pub fn load_scheme_rows<P: AsRef<Path>>(path: P) -> Result<Vec<SchemeRow>> {
    let path = path.as_ref();
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let row: SchemeRow = result
            .with_context(|| format!("Failed to parse CSV row {} in {}", i + 1, path.display()))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Build indexed documents from rows, ids assigned in row order starting at "0"
pub fn build_documents(rows: &[SchemeRow]) -> Vec<SchemeDocument> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| SchemeDocument::from_row(i, row))
        .collect()
}
