use thiserror::Error;

// ---------------------------------------------------------------------------
// Data-layer errors
// ---------------------------------------------------------------------------

/// Errors produced while parsing object records, loading filter curves, or
/// integrating a response cell.
#[derive(Debug, Error)]
pub enum DataError {
    /// Object resource missing its name line, or a data line that does not
    /// split into at least three numeric fields.
    #[error("malformed record '{resource}': {reason}")]
    MalformedRecord { resource: String, reason: String },

    /// Filter resource missing one of the expected named columns.
    #[error("filter '{resource}' is missing column '{column}'")]
    MissingColumn { resource: String, column: String },

    /// Fewer than two object samples fall inside the filter's wavelength
    /// support, so no trapezoid can be formed.
    #[error("fewer than two object samples inside the filter's wavelength support")]
    InsufficientDomain,
}

// ---------------------------------------------------------------------------
// SpectralSample / ObjectSpectrum – one parsed object resource
// ---------------------------------------------------------------------------

/// One retained measurement row of an object resource.
///
/// Invariants (enforced by the parser): `wavelength_nm` lies in `[361, 890]`
/// and `reflectance > 0`. `deviation` is carried through unfiltered and is
/// not used by the integral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralSample {
    pub wavelength_nm: i32,
    pub reflectance: f64,
    pub deviation: f64,
}

/// A named reflectance spectrum. Samples keep source order and are never
/// re-sorted or de-duplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSpectrum {
    pub name: String,
    pub samples: Vec<SpectralSample>,
}

// ---------------------------------------------------------------------------
// FilterCurve / FilterCollection – loaded transmission curves
// ---------------------------------------------------------------------------

/// One sampled point of a filter transmission curve, already in nanometres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterPoint {
    pub wavelength_nm: f64,
    pub transmission: f64,
}

/// A bandpass filter's transmission-vs-wavelength table.
///
/// Points are assumed strictly monotonic in wavelength; the loader does not
/// re-sort, and interpolation over a non-monotonic table is undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCurve {
    pub name: String,
    pub points: Vec<FilterPoint>,
}

impl FilterCurve {
    /// Wavelength support `[min, max]`, or `None` for an empty table.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        let first = self.points.first()?;
        Some(self.points.iter().fold(
            (first.wavelength_nm, first.wavelength_nm),
            |(lo, hi), p| (lo.min(p.wavelength_nm), hi.max(p.wavelength_nm)),
        ))
    }

    /// Output column label: `name(peak)` with the wavelength of the
    /// maximum-transmission point, e.g. `Filter_1(400)`.
    pub fn label(&self) -> String {
        match self
            .points
            .iter()
            .max_by(|a, b| a.transmission.total_cmp(&b.transmission))
        {
            Some(peak) => format!("{}({:.0})", self.name, peak.wavelength_nm),
            None => self.name.clone(),
        }
    }
}

/// All loaded filter curves in their fixed load order. Built once at startup,
/// read-only for the rest of the run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCollection {
    curves: Vec<FilterCurve>,
}

impl FilterCollection {
    pub fn new(curves: Vec<FilterCurve>) -> Self {
        FilterCollection { curves }
    }

    pub fn curves(&self) -> &[FilterCurve] {
        &self.curves
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Output column labels in collection order.
    pub fn labels(&self) -> Vec<String> {
        self.curves.iter().map(FilterCurve::label).collect()
    }
}

// ---------------------------------------------------------------------------
// ResponseRow / ResponseTable – the output accumulator
// ---------------------------------------------------------------------------

/// One object's integrals, one value per filter in collection order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRow {
    pub object_name: String,
    pub values: Vec<f64>,
}

/// The full result: fixed column labels plus one row per processed object.
/// Grows append-only; serialized only after all objects are processed.
#[derive(Debug, Clone, Default)]
pub struct ResponseTable {
    pub columns: Vec<String>,
    pub rows: Vec<ResponseRow>,
}

impl ResponseTable {
    pub fn new(columns: Vec<String>) -> Self {
        ResponseTable {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: ResponseRow) {
        self.rows.push(row);
    }
}
