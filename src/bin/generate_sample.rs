use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const ROWS: usize = 120;

const FIRST_NAMES: [&str; 12] = [
    "AMAL", "EMAD", "OSAMA", "FARAH", "LINA", "KARIM", "NOUR", "SAMI", "HALA", "RAMI", "DINA",
    "YOUSEF",
];
const DEPARTMENTS: [&str; 5] = ["Sales", "Operations", "Technology", "Finance", "HR"];
const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const EDUCATION: [&str; 3] = ["Bachelor's", "Master's & above", "Below Secondary"];
const GENDERS: [&str; 2] = ["F", "M"];
const CHANNELS: [&str; 3] = ["referred", "sourcing", "other"];

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn range(&mut self, low: i64, high: i64) -> i64 {
        low + (self.next_u64() % (high - low + 1) as u64) as i64
    }

    /// A score in `[0, 100]` rounded to one decimal.
    fn score(&mut self, mean: f64, std_dev: f64) -> f64 {
        (self.gauss(mean, std_dev).clamp(0.0, 100.0) * 10.0).round() / 10.0
    }
}

#[derive(Default)]
struct Employees {
    employee: Vec<String>,
    department: Vec<&'static str>,
    region: Vec<&'static str>,
    education: Vec<&'static str>,
    gender: Vec<&'static str>,
    channel: Vec<&'static str>,
    trainings: Vec<i64>,
    age: Vec<i64>,
    previous_rating: Vec<i64>,
    service: Vec<i64>,
    task_completion: Vec<f64>,
    quality: Vec<f64>,
    attendance: Vec<f64>,
    engagement: Vec<f64>,
}

fn generate(rng: &mut SimpleRng) -> Employees {
    let mut e = Employees::default();
    for i in 0..ROWS {
        let first = FIRST_NAMES[i % FIRST_NAMES.len()];
        e.employee.push(format!("{first}_{:03}", i + 1));
        e.department.push(rng.pick(&DEPARTMENTS));
        e.region.push(rng.pick(&REGIONS));
        e.education.push(rng.pick(&EDUCATION));
        e.gender.push(rng.pick(&GENDERS));
        e.channel.push(rng.pick(&CHANNELS));

        let trainings = rng.range(1, 6);
        let age = rng.range(22, 60);
        let rating = rng.range(1, 5);
        e.trainings.push(trainings);
        e.age.push(age);
        e.previous_rating.push(rating);
        e.service.push(rng.range(1, (age - 20).min(30)));

        // Higher past ratings and more training lift every metric a little.
        let lift = (rating - 3) as f64 * 3.0 + trainings as f64;
        e.task_completion.push(rng.score(78.0 + lift, 8.0));
        e.quality.push(rng.score(74.0 + lift, 9.0));
        e.attendance.push(rng.score(90.0, 5.0));
        e.engagement.push(rng.score(72.0 + lift, 10.0));
    }
    e
}

fn to_batch(e: &Employees) -> Result<RecordBatch> {
    let text = |name: &str| Field::new(name, DataType::Utf8, false);
    let int = |name: &str| Field::new(name, DataType::Int64, false);
    let float = |name: &str| Field::new(name, DataType::Float64, false);

    let schema = Arc::new(Schema::new(vec![
        text("Employee"),
        text("Department"),
        text("Region"),
        text("Education"),
        text("Gender"),
        text("Recruitment Channel"),
        int("Number of Trainings"),
        int("Age"),
        int("Previous Year Rating"),
        int("Length of Service"),
        float("Task Completion"),
        float("Quality Score"),
        float("Attendance"),
        float("Engagement Score"),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(
            e.employee.iter().map(String::as_str).collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(e.department.clone())),
        Arc::new(StringArray::from(e.region.clone())),
        Arc::new(StringArray::from(e.education.clone())),
        Arc::new(StringArray::from(e.gender.clone())),
        Arc::new(StringArray::from(e.channel.clone())),
        Arc::new(Int64Array::from(e.trainings.clone())),
        Arc::new(Int64Array::from(e.age.clone())),
        Arc::new(Int64Array::from(e.previous_rating.clone())),
        Arc::new(Int64Array::from(e.service.clone())),
        Arc::new(Float64Array::from(e.task_completion.clone())),
        Arc::new(Float64Array::from(e.quality.clone())),
        Arc::new(Float64Array::from(e.attendance.clone())),
        Arc::new(Float64Array::from(e.engagement.clone())),
    ];

    RecordBatch::try_new(schema, columns).context("building record batch")
}

fn write_csv(batch: &RecordBatch, path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    let mut record = Vec::with_capacity(batch.num_columns());
    writer.write_record(batch.schema().fields().iter().map(|f| f.name()))?;
    for row in 0..batch.num_rows() {
        record.clear();
        for col in batch.columns() {
            record.push(arrow::util::display::array_value_to_string(col.as_ref(), row)?);
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(batch: &RecordBatch, path: &str) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let employees = generate(&mut rng);
    let batch = to_batch(&employees)?;

    write_csv(&batch, "sample_data.csv")?;
    write_parquet(&batch, "sample_data.parquet")?;

    println!(
        "Wrote {} employees ({} columns) to sample_data.csv and sample_data.parquet",
        batch.num_rows(),
        batch.num_columns()
    );
    Ok(())
}
