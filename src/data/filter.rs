use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use super::model::{DataError, FilterCollection, FilterCurve, FilterPoint};

/// Expected column names in a filter transmission table.
pub const WAVELENGTH_COLUMN: &str = "Wavelength (nm)";
pub const TRANSMISSION_COLUMN: &str = "% Transmission";

// ---------------------------------------------------------------------------
// Resource ordering
// ---------------------------------------------------------------------------

/// Sort key for resource identifiers.
///
/// The first run of ASCII digits, parsed as an index, orders `Filter_2`
/// before `Filter_10`. Identifiers without a numeric index sort after the
/// indexed ones, by length then name — the heuristic the naming scheme
/// originally relied on.
pub fn ordering_key(identifier: &str) -> (u8, u64, usize, String) {
    let digits: String = identifier
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    match digits.parse::<u64>() {
        Ok(index) => (0, index, identifier.len(), identifier.to_string()),
        Err(_) => (1, 0, identifier.len(), identifier.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Filter curve loading
// ---------------------------------------------------------------------------

/// Load every `.csv` filter table under `dir` into a [`FilterCollection`],
/// ordered by [`ordering_key`]. The collection order fixes the output column
/// order for the whole run.
pub fn load_all(dir: &Path) -> Result<FilterCollection> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .with_context(|| format!("listing filter directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.to_ascii_lowercase().ends_with(".csv"))
        .collect();
    names.sort_by_key(|name| ordering_key(name));

    let mut curves = Vec::with_capacity(names.len());
    for name in &names {
        curves.push(load_curve(&dir.join(name), name)?);
    }
    debug!("loaded {} filter curves from {}", curves.len(), dir.display());

    Ok(FilterCollection::new(curves))
}

/// Read one 2-column filter table. Wavelength and transmission are carried
/// through without unit conversion; filters are assumed already in
/// nanometres. The filter name is the resource identifier with its extension
/// stripped.
fn load_curve(path: &Path, resource: &str) -> Result<FilterCurve> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("reading headers of {}", path.display()))?
        .clone();
    let wavelength_idx = column_index(&headers, resource, WAVELENGTH_COLUMN)?;
    let transmission_idx = column_index(&headers, resource, TRANSMISSION_COLUMN)?;

    let mut points = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("{resource} row {row_no}"))?;
        points.push(FilterPoint {
            wavelength_nm: parse_cell(&record, wavelength_idx, resource, row_no)?,
            transmission: parse_cell(&record, transmission_idx, resource, row_no)?,
        });
    }

    let name = resource
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(resource)
        .to_string();

    Ok(FilterCurve { name, points })
}

fn column_index(
    headers: &csv::StringRecord,
    resource: &str,
    column: &str,
) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| DataError::MissingColumn {
            resource: resource.to_string(),
            column: column.to_string(),
        })
}

fn parse_cell(record: &csv::StringRecord, idx: usize, resource: &str, row_no: usize) -> Result<f64> {
    let cell = record.get(idx).unwrap_or("");
    cell.trim()
        .parse::<f64>()
        .with_context(|| format!("{resource} row {row_no}: '{cell}' is not a number"))
}
