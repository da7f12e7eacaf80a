//! JSON parsing workload.

use machmeter_core::{ExecutionError, WorkloadContext};
use serde::Serialize;

use crate::synth;

const RECORDS: usize = 200_000;
const BATCHES_PER_WORKER: usize = 4;
const SEED: u64 = 0x6d61_6368_0003;

#[derive(Serialize)]
struct Record {
    id: u64,
    name: String,
    latitude: f64,
    longitude: f64,
    tags: Vec<String>,
}

/// Serialize a deterministic record set to JSON lines, then parse every
/// line back into a dynamic value and verify the record count.
pub fn json_parsing(ctx: &WorkloadContext) -> Result<(), ExecutionError> {
    let lines = document(RECORDS);

    let batch_size = lines.len().div_ceil(ctx.workers() * BATCHES_PER_WORKER);
    let batches: Vec<Vec<String>> = lines
        .chunks(batch_size)
        .map(<[String]>::to_vec)
        .collect();

    let counts = ctx.map(parse_batch, batches)?;

    let parsed: usize = counts.iter().sum();
    if parsed != RECORDS {
        return Err(ExecutionError::workload(format!(
            "parsed {parsed} records, expected {RECORDS}"
        )));
    }
    Ok(())
}

/// One JSON document per line, in record order.
fn document(records: usize) -> Vec<String> {
    let names = synth::text(records * 8, SEED);
    let mut names = names
        .split(|&b| b == b' ' || b == b'\n')
        .filter(|w| !w.is_empty());

    (0..records as u64)
        .map(|id| {
            let name = String::from_utf8_lossy(names.next().unwrap_or(b"anon")).into_owned();
            let record = Record {
                id,
                latitude: (id % 180) as f64 - 90.0,
                longitude: (id % 360) as f64 - 180.0,
                tags: vec![format!("tag-{}", id % 7), format!("tag-{}", id % 13)],
                name,
            };
            serde_json::to_string(&record).expect("record serialization is infallible")
        })
        .collect()
}

fn parse_batch(batch: Vec<String>) -> Result<usize, ExecutionError> {
    let mut parsed = 0;
    for line in &batch {
        let value: serde_json::Value =
            serde_json::from_str(line).map_err(ExecutionError::workload)?;
        if value.get("id").is_some() {
            parsed += 1;
        }
    }
    Ok(parsed)
}
