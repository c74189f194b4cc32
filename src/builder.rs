use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::{Config, OnMalformed};
use crate::data::filter::{load_all, ordering_key};
use crate::data::integrate::integral;
use crate::data::model::{FilterCollection, ObjectSpectrum, ResponseRow, ResponseTable};
use crate::data::parser;

// ---------------------------------------------------------------------------
// Run orchestration: filters first, then one row per object
// ---------------------------------------------------------------------------

/// Full pipeline: load filters, traverse objects, integrate, write the CSV.
/// Filter loading failures abort before any object is touched; the table is
/// persisted only after every object has been processed.
pub fn run(config: &Config) -> Result<()> {
    let filters = load_all(&config.filter_dir()).context("loading filter curves")?;
    info!("loaded {} filter curves", filters.len());

    let objects = list_objects(&config.object_dir())?;
    info!("found {} object resources", objects.len());

    let table = build(&config.object_dir(), &objects, &filters, config.on_malformed)?;

    write_table(&config.output_path(), &table)?;
    info!(
        "wrote {} rows to {}",
        table.rows.len(),
        config.output_path().display()
    );
    Ok(())
}

/// List `.asc` object resources under `dir` in traversal order (same
/// [`ordering_key`] as the filter collection).
pub fn list_objects(dir: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .with_context(|| format!("listing object directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.to_ascii_lowercase().ends_with(".asc"))
        .collect();
    names.sort_by_key(|name| ordering_key(name));
    Ok(names)
}

/// Assemble the response table: objects outer, filters inner, each cell an
/// independent integral. Each spectrum is dropped as soon as its row is
/// built, so memory stays bounded by one object at a time.
pub fn build(
    dir: &Path,
    objects: &[String],
    filters: &FilterCollection,
    on_malformed: OnMalformed,
) -> Result<ResponseTable> {
    let mut table = ResponseTable::new(filters.labels());

    for (index, name) in objects.iter().enumerate() {
        info!("{:>3}% {}", index * 100 / objects.len().max(1), name);

        let path = dir.join(name);
        let source =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;

        let spectrum = match parser::parse(name, &source) {
            Ok(spectrum) => spectrum,
            Err(err) => match on_malformed {
                OnMalformed::Abort => {
                    return Err(err).with_context(|| format!("parsing object '{name}'"));
                }
                OnMalformed::Skip => {
                    warn!("skipping object '{name}': {err}");
                    continue;
                }
            },
        };

        table.push(build_row(&spectrum, filters));
    }

    Ok(table)
}

/// One object's row, one integral per filter in collection order. A cell
/// whose integral has an insufficient domain gets the `NaN` sentinel
/// instead of failing the run.
pub fn build_row(spectrum: &ObjectSpectrum, filters: &FilterCollection) -> ResponseRow {
    let values = filters
        .curves()
        .iter()
        .map(|filter| match integral(filter, spectrum) {
            Ok(value) => value,
            Err(err) => {
                warn!("object '{}', filter '{}': {err}", spectrum.name, filter.name);
                f64::NAN
            }
        })
        .collect();

    ResponseRow {
        object_name: spectrum.name.clone(),
        values,
    }
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

/// Write the table as CSV: empty first header cell then the filter labels,
/// one row per object with 3-decimal cells.
pub fn write_table(path: &Path, table: &ResponseTable) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec![String::new()];
    header.extend(table.columns.iter().cloned());
    writer.write_record(&header).context("writing header row")?;

    for row in &table.rows {
        let mut record = vec![row.object_name.clone()];
        record.extend(row.values.iter().map(|value| format!("{value:.3}")));
        writer
            .write_record(&record)
            .with_context(|| format!("writing row '{}'", row.object_name))?;
    }

    writer.flush().context("flushing output table")?;
    Ok(())
}
