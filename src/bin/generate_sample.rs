//! Write a synthetic spectra table for trying out the server.
//!
//! ```bash
//! cargo run --bin generate_sample -- data/
//! cargo run --bin spectrum-sorter -- --data data/
//! ```

use std::path::PathBuf;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Deterministic splitmix64 stream, enough for reproducible noise.
struct Noise {
    state: u64,
}

impl Noise {
    fn new(seed: u64) -> Self {
        Noise { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller
    fn gauss(&mut self, std_dev: f64) -> f64 {
        let u1 = self.uniform().max(1e-15);
        let u2 = self.uniform();
        std_dev * (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

fn main() {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&out_dir).expect("Failed to create output directory");

    let mut noise = Noise::new(42);

    // Wavenumbers: 4000 → 2002, step 2
    let wavenumbers: Vec<f64> = (0..1000).map(|i| 4000.0 - i as f64 * 2.0).collect();

    let samples: [(&str, [(f64, f64, f64); 3]); 3] = [
        ("Sample_A", [(3400.0, 80.0, 0.8), (2900.0, 40.0, 0.5), (2350.0, 30.0, 0.3)]),
        ("Sample_B", [(3200.0, 60.0, 0.6), (2800.0, 50.0, 0.7), (2500.0, 35.0, 0.4)]),
        ("Sample_C", [(3600.0, 70.0, 0.9), (3000.0, 45.0, 0.4), (2200.0, 25.0, 0.5)]),
    ];
    let concentrations = [0.1, 0.5, 1.0, 2.0, 5.0];

    let output_path = out_dir.join("sample_spectra.txt");
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(&output_path)
        .expect("Failed to create output file");

    // Header: one blank label cell, then the axis.
    let header: Vec<String> = std::iter::once(String::new())
        .chain(wavenumbers.iter().map(|wn| wn.to_string()))
        .collect();
    writer.write_record(&header).expect("Failed to write header");

    let mut rows = 0;
    for (name, peaks) in &samples {
        for &conc in &concentrations {
            let record: Vec<String> = std::iter::once(format!("{name}_c{conc}"))
                .chain(wavenumbers.iter().map(|&wn| {
                    let signal: f64 = peaks
                        .iter()
                        .map(|&(mu, sigma, amp)| gaussian(wn, mu, sigma, amp * conc))
                        .sum();
                    (signal + noise.gauss(0.005 * conc)).to_string()
                }))
                .collect();
            writer.write_record(&record).expect("Failed to write spectrum");
            rows += 1;
        }
    }
    writer.flush().expect("Failed to flush output file");

    println!(
        "Wrote {rows} spectra ({} wavenumbers each) to {}",
        wavenumbers.len(),
        output_path.display()
    );
}
