use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;

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

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

const CITIES: &[(&str, &[&str])] = &[
    ("Cambridge", &["University of Cambridge", "Massachusetts Institute of Technology", "Harvard University"]),
    ("London", &["Imperial College London", "UCL", "King's College London", "London School of Economics"]),
    ("Paris", &["Université PSL", "Sorbonne University", "Institut Polytechnique de Paris"]),
    ("Zürich", &["ETH Zurich", "University of Zurich"]),
    ("Tokyo", &["The University of Tokyo", "Tokyo Institute of Technology"]),
    ("Singapore", &["National University of Singapore (NUS)", "Nanyang Technological University, Singapore (NTU)"]),
    ("Melbourne", &["The University of Melbourne", "Monash University"]),
];

struct Columns {
    rank: Vec<i64>,
    name: Vec<String>,
    overall: Vec<f64>,
    citations: Vec<Option<f64>>,
    reputation: Vec<f64>,
    city: Vec<Option<String>>,
}

fn generate(rng: &mut SimpleRng) -> Columns {
    let mut rows: Vec<(String, Option<String>, f64, Option<f64>, f64)> = Vec::new();
    for (city, universities) in CITIES {
        for name in *universities {
            let overall = (rng.range(55.0, 100.0) * 10.0).round() / 10.0;
            // Some institutions do not report citations.
            let citations = (rng.next_f64() > 0.1).then(|| (rng.range(5.0, 100.0) * 10.0).round() / 10.0);
            let reputation = (rng.range(30.0, 100.0) * 10.0).round() / 10.0;
            rows.push((name.to_string(), Some(city.to_string()), overall, citations, reputation));
        }
    }
    // One row with an unknown city, as in real rankings exports.
    rows.push(("Open University".to_string(), None, 55.0, None, 41.2));

    rows.sort_by(|a, b| b.2.total_cmp(&a.2));

    let mut cols = Columns {
        rank: Vec::new(),
        name: Vec::new(),
        overall: Vec::new(),
        citations: Vec::new(),
        reputation: Vec::new(),
        city: Vec::new(),
    };
    for (i, (name, city, overall, citations, reputation)) in rows.into_iter().enumerate() {
        cols.rank.push(i as i64 + 1);
        cols.name.push(name);
        cols.overall.push(overall);
        cols.citations.push(citations);
        cols.reputation.push(reputation);
        cols.city.push(city);
    }
    cols
}

fn to_batch(cols: &Columns) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Rank", DataType::Int64, false),
        Field::new("University Name", DataType::Utf8, false),
        Field::new("Overall Score", DataType::Float64, false),
        Field::new("Citations per Paper", DataType::Float64, true),
        Field::new("Academic Reputation", DataType::Float64, false),
        Field::new("City", DataType::Utf8, true),
    ]));

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(cols.rank.clone())),
        Arc::new(StringArray::from_iter_values(&cols.name)),
        Arc::new(Float64Array::from(cols.overall.clone())),
        Arc::new(Float64Array::from(cols.citations.clone())),
        Arc::new(Float64Array::from(cols.reputation.clone())),
        Arc::new(StringArray::from(cols.city.clone())),
    ];

    RecordBatch::try_new(schema, arrays).context("building record batch")
}

fn write_csv(path: &Path, batch: &RecordBatch) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    let schema = batch.schema();
    writer.write_record(schema.fields().iter().map(|f| f.name().as_str()))?;
    for row in 0..batch.num_rows() {
        let fields = batch
            .columns()
            .iter()
            .map(|col| arrow::util::display::array_value_to_string(col.as_ref(), row))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        writer.write_record(&fields)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let output_path = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "topuniversities.csv".to_string()),
    );

    let mut rng = SimpleRng::new(42);
    let batch = to_batch(&generate(&mut rng))?;

    match output_path.extension().and_then(|e| e.to_str()) {
        Some("csv") => write_csv(&output_path, &batch)?,
        Some("parquet") | Some("pq") => write_parquet(&output_path, &batch)?,
        _ => bail!("output must end in .csv or .parquet: {}", output_path.display()),
    }

    log::debug!("\n{}", pretty_format_batches(&[batch.clone()])?);
    log::info!(
        "Wrote {} universities to {}",
        batch.num_rows(),
        output_path.display()
    );
    Ok(())
}
