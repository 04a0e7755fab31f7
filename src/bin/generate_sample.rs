//! Writes a synthetic `Crop_Recommendation.csv` plus a nearest-centroid model
//! built from the same crop profiles, so the dashboard runs without external
//! artifacts.

use anyhow::{Context, Result};
use serde_json::json;

const FEATURES: [&str; 7] = [
    "Nitrogen",
    "Phosphorus",
    "Potassium",
    "Temperature",
    "Humidity",
    "pH_Value",
    "Rainfall",
];

const ROWS_PER_CROP: usize = 100;

/// `(crop, [(mean, std_dev); 7])` in `FEATURES` order.
const PROFILES: [(&str, [(f64, f64); 7]); 10] = [
    ("Rice", [(80.0, 12.0), (48.0, 8.0), (40.0, 3.0), (23.7, 2.0), (82.3, 1.4), (6.4, 0.8), (236.2, 35.0)]),
    ("Maize", [(78.0, 11.0), (48.0, 8.0), (20.0, 3.0), (22.4, 2.6), (65.1, 5.5), (6.2, 0.4), (84.8, 11.0)]),
    ("Chickpea", [(40.0, 12.0), (68.0, 7.0), (80.0, 3.0), (18.9, 1.1), (16.9, 1.7), (7.3, 0.8), (80.1, 10.0)]),
    ("Kidney Beans", [(20.0, 11.0), (67.0, 7.0), (20.0, 3.0), (20.1, 2.6), (21.6, 2.0), (5.7, 0.3), (105.9, 25.0)]),
    ("Mungbean", [(21.0, 11.0), (47.0, 8.0), (20.0, 3.0), (28.5, 1.0), (85.5, 1.5), (6.7, 0.3), (48.4, 6.5)]),
    ("Banana", [(100.0, 11.0), (82.0, 7.0), (50.0, 3.0), (27.4, 1.4), (80.4, 2.9), (6.0, 0.3), (104.6, 9.4)]),
    ("Mango", [(20.0, 12.0), (27.0, 7.0), (30.0, 3.0), (31.2, 2.5), (50.2, 5.8), (5.8, 0.6), (94.7, 3.7)]),
    ("Grapes", [(23.0, 12.0), (132.0, 7.0), (200.0, 3.0), (23.8, 9.0), (81.9, 1.0), (6.0, 0.3), (69.6, 2.6)]),
    ("Cotton", [(118.0, 11.0), (46.0, 7.0), (20.0, 3.0), (24.0, 1.0), (79.8, 3.0), (6.9, 0.6), (80.4, 11.0)]),
    ("Coffee", [(101.0, 11.0), (28.0, 7.0), (30.0, 3.0), (25.5, 1.4), (58.9, 5.7), (6.8, 0.4), (158.1, 24.0)]),
];

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

/// Draw one observation for a crop profile, kept inside physical limits.
fn sample_row(profile: &[(f64, f64); 7], rng: &mut SimpleRng) -> [String; 7] {
    let mut row: [String; 7] = Default::default();
    for (i, &(mean, sd)) in profile.iter().enumerate() {
        let v = rng.gauss(mean, sd);
        row[i] = match FEATURES[i] {
            "Nitrogen" | "Phosphorus" | "Potassium" => format!("{}", v.round().max(0.0) as i64),
            "Humidity" => format!("{:.8}", v.clamp(10.0, 100.0)),
            "pH_Value" => format!("{:.8}", v.clamp(3.5, 9.9)),
            "Rainfall" => format!("{:.8}", v.max(20.0)),
            _ => format!("{v:.8}"),
        };
    }
    row
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let csv_path = "Crop_Recommendation.csv";
    let mut writer = csv::Writer::from_path(csv_path)
        .with_context(|| format!("creating {csv_path}"))?;
    writer.write_record(FEATURES.iter().copied().chain(["Crop"]))?;

    for (crop, profile) in &PROFILES {
        for _ in 0..ROWS_PER_CROP {
            let row = sample_row(profile, &mut rng);
            writer.write_record(row.iter().map(String::as_str).chain([*crop]))?;
        }
    }
    writer.flush().context("flushing CSV")?;

    // Distances are measured in units of the average within-crop spread.
    let scale: Vec<f64> = (0..FEATURES.len())
        .map(|i| PROFILES.iter().map(|(_, p)| p[i].1).sum::<f64>() / PROFILES.len() as f64)
        .collect();
    let model = json!({
        "feature_names": FEATURES,
        "estimator": {
            "kind": "nearest_centroid",
            "classes": PROFILES.iter().map(|(crop, _)| *crop).collect::<Vec<_>>(),
            "centroids": PROFILES
                .iter()
                .map(|(_, p)| p.iter().map(|(mean, _)| *mean).collect::<Vec<_>>())
                .collect::<Vec<_>>(),
            "scale": scale,
        }
    });

    let model_path = "crop_recommendation_model.json";
    let file = std::fs::File::create(model_path)
        .with_context(|| format!("creating {model_path}"))?;
    serde_json::to_writer_pretty(file, &model).context("writing model")?;

    println!(
        "Wrote {} rows for {} crops to {csv_path} and a nearest-centroid model to {model_path}",
        PROFILES.len() * ROWS_PER_CROP,
        PROFILES.len()
    );
    Ok(())
}
