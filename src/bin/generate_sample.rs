//! Generates a deterministic demo tree for the main binary: ten triangular
//! bandpass filter tables under `sample_data/filters/` and a handful of
//! reflectance records under `sample_data/objects/`, covering both wavelength
//! scale conventions the parser has to detect.

use std::fs;
use std::path::Path;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Triangular transmission table around `center`, ±40 nm, 85 % peak,
/// sampled every 5 nm.
fn write_filter(dir: &Path, index: usize, center: f64) {
    let mut lines = vec!["Wavelength (nm),% Transmission".to_string()];
    for step in -8i32..=8 {
        let wavelength = center + step as f64 * 5.0;
        let transmission = 85.0 * (1.0 - step.abs() as f64 / 8.0);
        lines.push(format!("{wavelength:.1},{transmission:.3}"));
    }
    let path = dir.join(format!("Filter_{index}.csv"));
    fs::write(&path, lines.join("\n")).expect("Failed to write filter table");
}

/// One `.asc` record: 16 header lines with the display name on line 15
/// (1-indexed), then whitespace-separated wavelength/reflectance/deviation
/// triples. `scale` divides nanometres back into the file's native units
/// (1000.0 or 100.0).
fn write_object(
    dir: &Path,
    file_name: &str,
    display_name: &str,
    scale: f64,
    peaks: &[(f64, f64, f64)],
    rng: &mut SimpleRng,
) {
    let mut lines = vec![
        "USGS Digital Spectral Library".to_string(),
        format!("record for {display_name}"),
    ];
    while lines.len() < 14 {
        lines.push(format!("metadata line {}", lines.len() + 1));
    }
    lines.push(display_name.to_string());
    lines.push("wavelength  reflectance  deviation".to_string());

    // Wavelengths 350–900 nm, step 5, so some rows fall outside [361, 890]
    // and get filtered on parse. A few sentinel rows are sprinkled in.
    for i in 0..=110 {
        let nm = 350.0 + i as f64 * 5.0;
        if i % 37 == 13 {
            lines.push(format!(
                "{:>12}{:>14}{:>14}",
                "-1.23e34", "-1.23e34", "-1.23e34"
            ));
            continue;
        }
        let signal: f64 = peaks
            .iter()
            .map(|&(mu, sigma, amp)| gaussian(nm, mu, sigma, amp))
            .sum();
        let reflectance = (0.05 + signal + rng.gauss(0.0, 0.002)).max(0.001);
        let deviation = rng.gauss(0.0, 0.003).abs().max(1e-4);
        lines.push(format!(
            "{:>12.6}{:>14.6}{:>14.6}",
            nm / scale,
            reflectance,
            deviation
        ));
    }

    fs::write(dir.join(file_name), lines.join("\n")).expect("Failed to write object record");
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let root = Path::new("sample_data");
    let filter_dir = root.join("filters");
    let object_dir = root.join("objects");
    fs::create_dir_all(&filter_dir).expect("Failed to create filters directory");
    fs::create_dir_all(&object_dir).expect("Failed to create objects directory");

    // Ten bandpass filters, 400–850 nm in 50 nm steps.
    for index in 1..=10 {
        let center = 350.0 + index as f64 * 50.0;
        write_filter(&filter_dir, index, center);
    }

    // Reflectance records in both scale conventions.
    let objects: [(&str, &str, f64, &[(f64, f64, f64)]); 4] = [
        (
            "olivine.asc",
            "Olivine GDS70.a",
            1000.0,
            &[(650.0, 120.0, 0.45), (450.0, 60.0, 0.15)],
        ),
        (
            "hematite.asc",
            "Hematite GDS27",
            1000.0,
            &[(750.0, 90.0, 0.35)],
        ),
        (
            "kaolinite.asc",
            "Kaolinite CM9",
            100.0,
            &[(550.0, 150.0, 0.55), (820.0, 40.0, 0.2)],
        ),
        (
            "gypsum.asc",
            "Gypsum HS333.3B",
            100.0,
            &[(480.0, 110.0, 0.5)],
        ),
    ];
    for (file_name, display_name, scale, peaks) in objects {
        write_object(&object_dir, file_name, display_name, scale, peaks, &mut rng);
    }

    println!(
        "Wrote 10 filter tables and {} object records under {}",
        objects.len(),
        root.display()
    );
    println!("Run `spectradb` from inside {} to build data.csv", root.display());
}
