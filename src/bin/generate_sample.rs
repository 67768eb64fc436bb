//! Writes a synthetic review dataset to `data/airDataFiltered.{csv,parquet}`
//! (or to the directory given as the first argument).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;

use airline_dash::data::loader::required_columns;

const AIRLINES: [(&str, f64); 10] = [
    ("Qatar Airways", 8.2),
    ("Singapore Airlines", 8.0),
    ("Emirates", 7.1),
    ("ANA All Nippon Airways", 7.8),
    ("Cathay Pacific Airways", 6.9),
    ("EVA Air", 7.6),
    ("Turkish Airlines", 5.9),
    ("Qantas Airways", 6.4),
    ("Lufthansa", 5.1),
    ("British Airways", 4.6),
];
const REVIEWS_PER_AIRLINE: usize = 180;
const FIRST_YEAR: i32 = 2015;
const YEARS: u64 = 9;
/// Chance that a category rating is left blank; Wifi is blank far more often.
const ABSENT_RATE: f64 = 0.08;
const WIFI_ABSENT_RATE: f64 = 0.45;

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

struct SampleReview {
    airline: &'static str,
    overall: Option<i64>,
    categories: [Option<i64>; 7],
    date_flown: NaiveDate,
}

fn generate(rng: &mut SimpleRng) -> Result<Vec<SampleReview>> {
    let mut reviews = Vec::with_capacity(AIRLINES.len() * REVIEWS_PER_AIRLINE);
    for &(airline, quality) in &AIRLINES {
        for _ in 0..REVIEWS_PER_AIRLINE {
            let overall = rng.gauss(quality, 2.2).round().clamp(1.0, 10.0);
            let mut categories = [None; 7];
            for (i, slot) in categories.iter_mut().enumerate() {
                let absent = if i == 5 { WIFI_ABSENT_RATE } else { ABSENT_RATE };
                if rng.next_f64() >= absent {
                    // Category scores use the 1-5 star scale.
                    *slot = Some(rng.gauss(overall / 2.0, 0.9).round().clamp(1.0, 5.0) as i64);
                }
            }

            let year = FIRST_YEAR + rng.below(YEARS) as i32;
            let month = 1 + rng.below(12) as u32;
            let date_flown = NaiveDate::from_ymd_opt(year, month, 1)
                .with_context(|| format!("invalid generated date {year}-{month}"))?;

            reviews.push(SampleReview {
                airline,
                overall: (rng.next_f64() >= 0.02).then_some(overall as i64),
                categories,
                date_flown,
            });
        }
    }
    Ok(reviews)
}

fn write_csv(path: &Path, reviews: &[SampleReview]) -> Result<()> {
    let cell = |v: Option<i64>| v.map(|v| v.to_string()).unwrap_or_default();
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(required_columns())?;
    for r in reviews {
        let mut row = vec![r.airline.to_string(), cell(r.overall)];
        row.extend(r.categories.iter().map(|c| cell(*c)));
        row.push(r.date_flown.format("%Y-%m-%d").to_string());
        writer.write_record(&row)?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, reviews: &[SampleReview]) -> Result<()> {
    let columns = required_columns();
    let (airline_col, rating_cols, date_col) = (columns[0], &columns[1..9], columns[9]);

    let mut fields = vec![Field::new(airline_col, DataType::Utf8, false)];
    fields.extend(rating_cols.iter().map(|name| Field::new(*name, DataType::Int64, true)));
    fields.push(Field::new(date_col, DataType::Date32, false));
    let schema = Arc::new(Schema::new(fields));

    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("epoch")?;
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(StringArray::from(
        reviews.iter().map(|r| r.airline).collect::<Vec<_>>(),
    ))];
    arrays.push(Arc::new(Int64Array::from(reviews.iter().map(|r| r.overall).collect::<Vec<_>>())));
    for i in 0..7 {
        arrays.push(Arc::new(Int64Array::from(
            reviews.iter().map(|r| r.categories[i]).collect::<Vec<_>>(),
        )));
    }
    arrays.push(Arc::new(Date32Array::from(
        reviews
            .iter()
            .map(|r| (r.date_flown - epoch).num_days() as i32)
            .collect::<Vec<_>>(),
    )));

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let reviews = generate(&mut rng)?;

    let csv_path = out_dir.join("airDataFiltered.csv");
    let parquet_path = out_dir.join("airDataFiltered.parquet");
    write_csv(&csv_path, &reviews)?;
    write_parquet(&parquet_path, &reviews)?;

    println!(
        "Wrote {} reviews of {} airlines to {} and {}",
        reviews.len(),
        AIRLINES.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
