use log::debug;

use super::model::{DataError, ObjectSpectrum, SpectralSample};

// ---------------------------------------------------------------------------
// Object record layout (USGS splib-style .asc files)
// ---------------------------------------------------------------------------

/// Line index (0-based) holding the object display name.
const NAME_LINE: usize = 14;
/// First line index of numeric data; everything before is header/metadata.
const DATA_START: usize = 16;

/// Retained wavelength interval in nanometres: the min/max support of the
/// filter set.
pub const WAVELENGTH_MIN: i32 = 361;
pub const WAVELENGTH_MAX: i32 = 890;

// ---------------------------------------------------------------------------
// Unit factor detection
// ---------------------------------------------------------------------------

/// Multiplier converting a record's native wavelength units to nanometres.
///
/// The source format uses one of two scale conventions. A leading integer
/// digit of 0 (i.e. raw value below 1.0) means the ×1000 convention,
/// anything else the ×100 convention. The caller detects this once per
/// record, from the first sample surviving the negative-wavelength filter,
/// and applies it uniformly; a record mixing both conventions is
/// undetectable.
pub fn detect_unit_factor(raw_wavelength: f64) -> f64 {
    if raw_wavelength.abs() < 1.0 {
        1000.0
    } else {
        100.0
    }
}

// ---------------------------------------------------------------------------
// Record parser
// ---------------------------------------------------------------------------

/// Parse one raw object resource into a normalized [`ObjectSpectrum`].
///
/// Data lines split on runs of whitespace into at least three numeric
/// fields: raw wavelength, raw reflectance, raw deviation. A sample is
/// retained iff its scaled wavelength (truncated to an integer) lies in
/// `[361, 890]` and its reflectance is positive; negative raw wavelengths
/// are the source format's missing-data sentinel and are dropped before
/// unit-factor detection. Zero retained samples is a valid outcome.
pub fn parse(resource: &str, source: &str) -> Result<ObjectSpectrum, DataError> {
    let lines: Vec<&str> = source.lines().collect();

    let name = lines
        .get(NAME_LINE)
        .map(|line| line.trim().to_string())
        .ok_or_else(|| malformed(resource, "missing object name line"))?;

    let mut factor: Option<f64> = None;
    let mut samples = Vec::new();

    for (index, line) in lines.iter().enumerate().skip(DATA_START) {
        let (raw_wavelength, raw_reflectance, raw_deviation) =
            split_data_line(resource, index, line)?;

        // Negative wavelength is the source format's missing-data sentinel.
        if raw_wavelength < 0.0 {
            continue;
        }

        let factor = *factor.get_or_insert_with(|| detect_unit_factor(raw_wavelength));
        let wavelength_nm = (raw_wavelength * factor).trunc() as i32;

        if (WAVELENGTH_MIN..=WAVELENGTH_MAX).contains(&wavelength_nm) && raw_reflectance > 0.0 {
            samples.push(SpectralSample {
                wavelength_nm,
                reflectance: raw_reflectance,
                deviation: raw_deviation,
            });
        }
    }

    debug!(
        "parsed '{}' from {}: {} retained samples, unit factor {:?}",
        name,
        resource,
        samples.len(),
        factor
    );

    Ok(ObjectSpectrum { name, samples })
}

/// Split one data line into its three leading numeric fields.
fn split_data_line(
    resource: &str,
    index: usize,
    line: &str,
) -> Result<(f64, f64, f64), DataError> {
    let mut fields = line.split_whitespace();
    let mut next = |column: &str| -> Result<f64, DataError> {
        let token = fields.next().ok_or_else(|| {
            malformed(
                resource,
                format!("line {}: fewer than 3 fields", index + 1),
            )
        })?;
        token.parse::<f64>().map_err(|_| {
            malformed(
                resource,
                format!("line {}: non-numeric {column} '{token}'", index + 1),
            )
        })
    };

    let wavelength = next("wavelength")?;
    let reflectance = next("reflectance")?;
    let deviation = next("deviation")?;
    Ok((wavelength, reflectance, deviation))
}

fn malformed(resource: &str, reason: impl Into<String>) -> DataError {
    DataError::MalformedRecord {
        resource: resource.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a record with the standard 16-line header: name on line 15
    /// (1-indexed), data from line 17.
    fn record(name: &str, data_lines: &[&str]) -> String {
        let mut lines: Vec<String> = (0..16).map(|i| format!("header {i}")).collect();
        lines[NAME_LINE] = name.to_string();
        lines.extend(data_lines.iter().map(|s| s.to_string()));
        lines.join("\n")
    }

    #[test]
    fn unit_factor_from_leading_digit() {
        // Integer part 0 → micrometre-style scale, ×1000.
        assert_eq!(detect_unit_factor(0.361), 1000.0);
        assert_eq!(detect_unit_factor(0.5), 1000.0);
        assert_eq!(detect_unit_factor(0.890), 1000.0);
        // Leading digit 1..9 → ×100.
        for leading in 1..=9 {
            let raw = leading as f64 + 0.61;
            assert_eq!(detect_unit_factor(raw), 100.0, "raw {raw}");
        }
    }

    #[test]
    fn parses_name_and_scaled_samples() {
        let source = record(
            "  Olivine GDS70.a  ",
            &["0.400      0.20      0.010", "0.450      0.30      0.010"],
        );
        let spectrum = parse("olivine.asc", &source).unwrap();

        assert_eq!(spectrum.name, "Olivine GDS70.a");
        assert_eq!(spectrum.samples.len(), 2);
        assert_eq!(spectrum.samples[0].wavelength_nm, 400);
        assert_eq!(spectrum.samples[0].reflectance, 0.20);
        assert_eq!(spectrum.samples[1].wavelength_nm, 450);
    }

    #[test]
    fn hundred_factor_convention() {
        let source = record("x100 object", &["4.00      0.20      0.010"]);
        let spectrum = parse("obj.asc", &source).unwrap();
        assert_eq!(spectrum.samples[0].wavelength_nm, 400);
    }

    #[test]
    fn retained_samples_satisfy_invariants() {
        let source = record(
            "invariants",
            &[
                "-1.23e34   0.50      0.010", // sentinel, dropped
                "0.360      0.50      0.010", // below 361 nm
                "0.361      0.50      0.010",
                "0.500      -0.10     0.010", // non-positive reflectance
                "0.500      0.00      0.010", // non-positive reflectance
                "0.890      0.40      0.010",
                "0.891      0.40      0.010", // above 890 nm
            ],
        );
        let spectrum = parse("obj.asc", &source).unwrap();
        assert_eq!(spectrum.samples.len(), 2);
        for sample in &spectrum.samples {
            assert!((361..=890).contains(&sample.wavelength_nm));
            assert!(sample.reflectance > 0.0);
        }
    }

    #[test]
    fn negative_rows_do_not_lock_the_factor() {
        // The sentinel row would pick ×100; the first real row must win.
        let source = record(
            "sentinel first",
            &["-1.23e34   0.50      0.010", "0.400      0.20      0.010"],
        );
        let spectrum = parse("obj.asc", &source).unwrap();
        assert_eq!(spectrum.samples[0].wavelength_nm, 400);
    }

    #[test]
    fn missing_name_line_is_malformed() {
        let source = "only\nfour\nshort\nlines";
        let err = parse("short.asc", source).unwrap_err();
        assert!(matches!(err, DataError::MalformedRecord { .. }));
    }

    #[test]
    fn non_numeric_data_line_is_malformed() {
        let source = record("bad data", &["0.400      abc      0.010"]);
        let err = parse("bad.asc", &source).unwrap_err();
        assert!(matches!(err, DataError::MalformedRecord { .. }));
    }

    #[test]
    fn short_data_line_is_malformed() {
        let source = record("short line", &["0.400      0.20"]);
        let err = parse("short.asc", &source).unwrap_err();
        assert!(matches!(err, DataError::MalformedRecord { .. }));
    }

    #[test]
    fn zero_retained_samples_is_valid() {
        let source = record("out of band", &["0.300      0.20      0.010"]);
        let spectrum = parse("oob.asc", &source).unwrap();
        assert!(spectrum.samples.is_empty());
    }
}
