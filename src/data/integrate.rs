use super::model::{DataError, FilterCurve, FilterPoint, ObjectSpectrum};

// ---------------------------------------------------------------------------
// Piecewise-linear interpolation over the filter table
// ---------------------------------------------------------------------------

/// Evaluate the filter's transmission at `wavelength` by linear
/// interpolation between consecutive table points.
///
/// Defined only inside the table's wavelength support; the caller crops to
/// the filter bounds first. Works for ascending or descending tables as long
/// as the wavelengths are strictly monotonic.
fn transmission_at(points: &[FilterPoint], wavelength: f64) -> f64 {
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let lo = a.wavelength_nm.min(b.wavelength_nm);
        let hi = a.wavelength_nm.max(b.wavelength_nm);
        if wavelength >= lo && wavelength <= hi {
            let t = (wavelength - a.wavelength_nm) / (b.wavelength_nm - a.wavelength_nm);
            return a.transmission * (1.0 - t) + b.transmission * t;
        }
    }
    // Cropping guarantees in-support queries; only float edge noise lands
    // here, so clamp to the nearer endpoint.
    let first = points[0];
    let last = points[points.len() - 1];
    if (wavelength - first.wavelength_nm).abs() <= (wavelength - last.wavelength_nm).abs() {
        first.transmission
    } else {
        last.transmission
    }
}

// ---------------------------------------------------------------------------
// Response integral
// ---------------------------------------------------------------------------

/// Trapezoidal integral of (filter transmission × object reflectance) over
/// the filter's wavelength support.
///
/// Object samples are cropped to the filter bounds (inclusive) in source
/// order, the interpolated transmission is paired with each retained sample,
/// and the pointwise product is integrated trapezoid by trapezoid. Fewer
/// than two cropped samples, or a filter table with fewer than two points,
/// yields [`DataError::InsufficientDomain`].
pub fn integral(filter: &FilterCurve, object: &ObjectSpectrum) -> Result<f64, DataError> {
    if filter.points.len() < 2 {
        return Err(DataError::InsufficientDomain);
    }
    let (lo, hi) = filter.bounds().ok_or(DataError::InsufficientDomain)?;

    let mut sum = 0.0;
    let mut count = 0usize;
    let mut prev: Option<(f64, f64)> = None;

    for sample in &object.samples {
        let w = sample.wavelength_nm as f64;
        if w < lo || w > hi {
            continue;
        }
        let product = transmission_at(&filter.points, w) * sample.reflectance;
        if let Some((w0, p0)) = prev {
            sum += (w - w0) * (p0 + product) / 2.0;
        }
        prev = Some((w, product));
        count += 1;
    }

    if count < 2 {
        return Err(DataError::InsufficientDomain);
    }
    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SpectralSample;
    use approx::assert_relative_eq;

    fn curve(points: &[(f64, f64)]) -> FilterCurve {
        FilterCurve {
            name: "test".to_string(),
            points: points
                .iter()
                .map(|&(wavelength_nm, transmission)| FilterPoint {
                    wavelength_nm,
                    transmission,
                })
                .collect(),
        }
    }

    fn object(samples: &[(i32, f64)]) -> ObjectSpectrum {
        ObjectSpectrum {
            name: "test object".to_string(),
            samples: samples
                .iter()
                .map(|&(wavelength_nm, reflectance)| SpectralSample {
                    wavelength_nm,
                    reflectance,
                    deviation: 0.01,
                })
                .collect(),
        }
    }

    #[test]
    fn interpolates_between_table_points() {
        let filter = curve(&[(400.0, 0.0), (450.0, 1.0), (500.0, 0.0)]);
        assert_relative_eq!(transmission_at(&filter.points, 400.0), 0.0);
        assert_relative_eq!(transmission_at(&filter.points, 425.0), 0.5);
        assert_relative_eq!(transmission_at(&filter.points, 450.0), 1.0);
        assert_relative_eq!(transmission_at(&filter.points, 475.0), 0.5);
    }

    #[test]
    fn triangle_filter_scenario() {
        // Product at 400/450/500 is 0, 0.3, 0; trapezoids over two 50 nm
        // segments sum to 15.0.
        let filter = curve(&[(400.0, 0.0), (450.0, 1.0), (500.0, 0.0)]);
        let obj = object(&[(400, 0.2), (450, 0.3), (500, 0.25)]);

        let value = integral(&filter, &obj).unwrap();
        assert_relative_eq!(value, 15.0, epsilon = 1e-9);
        assert_eq!(format!("{value:.3}"), "15.000");
    }

    #[test]
    fn integral_is_linear_in_reflectance() {
        let filter = curve(&[(400.0, 0.0), (450.0, 1.0), (500.0, 0.0)]);
        let base = object(&[(400, 0.2), (430, 0.35), (470, 0.3), (500, 0.25)]);
        let k = 2.5;
        let scaled = ObjectSpectrum {
            name: base.name.clone(),
            samples: base
                .samples
                .iter()
                .map(|s| SpectralSample {
                    reflectance: s.reflectance * k,
                    ..*s
                })
                .collect(),
        };

        let a = integral(&filter, &base).unwrap();
        let b = integral(&filter, &scaled).unwrap();
        assert_relative_eq!(b, k * a, epsilon = 1e-12);
    }

    #[test]
    fn crops_samples_outside_the_support() {
        let filter = curve(&[(400.0, 1.0), (500.0, 1.0)]);
        // Out-of-support samples must not contribute.
        let obj = object(&[(361, 9.0), (400, 0.2), (500, 0.2), (890, 9.0)]);
        let value = integral(&filter, &obj).unwrap();
        assert_relative_eq!(value, 100.0 * 0.2, epsilon = 1e-9);
    }

    #[test]
    fn disjoint_support_is_insufficient_domain() {
        let filter = curve(&[(400.0, 0.0), (450.0, 1.0), (500.0, 0.0)]);
        let obj = object(&[(700, 0.2), (750, 0.3)]);
        assert!(matches!(
            integral(&filter, &obj),
            Err(DataError::InsufficientDomain)
        ));
    }

    #[test]
    fn single_overlapping_sample_is_insufficient_domain() {
        let filter = curve(&[(400.0, 0.0), (450.0, 1.0), (500.0, 0.0)]);
        let obj = object(&[(450, 0.3), (700, 0.2)]);
        assert!(matches!(
            integral(&filter, &obj),
            Err(DataError::InsufficientDomain)
        ));
    }

    #[test]
    fn empty_object_is_insufficient_domain() {
        let filter = curve(&[(400.0, 0.0), (500.0, 1.0)]);
        let obj = object(&[]);
        assert!(matches!(
            integral(&filter, &obj),
            Err(DataError::InsufficientDomain)
        ));
    }

    #[test]
    fn degenerate_filter_table_is_insufficient_domain() {
        let filter = curve(&[(450.0, 1.0)]);
        let obj = object(&[(400, 0.2), (450, 0.3), (500, 0.25)]);
        assert!(matches!(
            integral(&filter, &obj),
            Err(DataError::InsufficientDomain)
        ));
    }
}
