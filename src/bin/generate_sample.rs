use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// SplitMix64: tiny, seedable, and identical output on every platform.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1).
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }

    /// Normal sample via Box-Muller.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let r = (-2.0 * self.unit().max(1e-15).ln()).sqrt();
        let theta = std::f64::consts::TAU * self.unit();
        mean + std_dev * r * theta.cos()
    }
}

/// One synthetic workout; columns match what the dashboard loads.
struct Workout {
    age: i64,
    distance_km: f64,
    bmi: f64,
    gender: &'static str,
    calories: f64,
    heart_rate: f64,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn generate(n: usize, rng: &mut SampleRng) -> Vec<Workout> {
    (0..n)
        .map(|_| {
            let gender = if rng.unit() < 0.5 { "Male" } else { "Female" };
            let age = rng.uniform(14.0, 75.0).floor() as i64;
            let distance_km = round1(rng.uniform(1.0, 21.0));
            let bmi = round1(rng.normal(24.5, 4.0).clamp(15.0, 42.0));
            // Roughly 60 kcal per km, heavier runners burn a little more.
            let weight_factor = 1.0 + (bmi - 22.0) * 0.02;
            let calories = round1((distance_km * 60.0 * weight_factor + rng.normal(0.0, 25.0)).max(20.0));
            let age_penalty = (age as f64 - 30.0) * 0.3;
            let heart_rate = round1(rng.normal(145.0 - age_penalty + distance_km * 0.8, 8.0));
            Workout {
                age,
                distance_km,
                bmi,
                gender,
                calories,
                heart_rate,
            }
        })
        .collect()
}

fn write_csv(path: &PathBuf, rows: &[Workout]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record([
        "Age",
        "Distance(km)",
        "BMI",
        "Gender",
        "Calories Burned",
        "Average Heart Rate",
    ])?;
    for w in rows {
        writer.write_record([
            w.age.to_string(),
            w.distance_km.to_string(),
            w.bmi.to_string(),
            w.gender.to_string(),
            w.calories.to_string(),
            w.heart_rate.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &PathBuf, rows: &[Workout]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Age", DataType::Int64, false),
        Field::new("Distance(km)", DataType::Float64, false),
        Field::new("BMI", DataType::Float64, false),
        Field::new("Gender", DataType::Utf8, false),
        Field::new("Calories Burned", DataType::Float64, false),
        Field::new("Average Heart Rate", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|w| w.age))) as ArrayRef,
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|w| w.distance_km))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|w| w.bmi))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|w| w.gender))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|w| w.calories))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|w| w.heart_rate))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Usage: `generate_sample [OUTPUT] [ROWS]` – `.csv` output writes CSV,
/// anything else writes Parquet.
fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output_path = PathBuf::from(args.next().unwrap_or_else(|| "sample_workouts.parquet".into()));
    let n: usize = match args.next() {
        Some(s) => s.parse().with_context(|| format!("row count '{s}' is not a number"))?,
        None => 500,
    };

    let mut rng = SampleRng(42);
    let rows = generate(n, &mut rng);

    let is_csv = output_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        write_csv(&output_path, &rows)?;
    } else {
        write_parquet(&output_path, &rows)?;
    }

    log::info!("generated {n} workouts with seed 42");
    println!("Wrote {n} workouts to {}", output_path.display());
    Ok(())
}
