//! Parallel review of independent scenarios.
//!
//! Every scenario gets its own sandbox and session, so reviews share no
//! state and can run on a rayon pool.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::info;
use rayon::prelude::*;
use serde::Serialize;

use super::{Scenario, ScenarioError};
use crate::select::Decision;

/// Reviews `scenarios` on `threads` workers. Results are in input order;
/// a scenario that fails does not stop the others.
pub fn review_all(
    scenarios: &[Scenario],
    threads: usize,
) -> Result<Vec<Result<Option<Decision>, ScenarioError>>, ScenarioError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()?;

    let completed = AtomicUsize::new(0);
    let results = pool.install(|| {
        scenarios
            .par_iter()
            .map(|scenario| {
                let result = scenario.review();
                let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                info!("Reviewed {}/{}: {}", n, scenarios.len(), scenario.name);
                result
            })
            .collect()
    });
    Ok(results)
}

#[derive(Serialize)]
struct Line<'a> {
    name: &'a str,
    #[serde(rename = "move")]
    decision: Option<Decision>,
}

/// Writes one JSON object per reviewed scenario. Failed reviews are
/// skipped.
pub fn write_jsonl<W: Write>(
    scenarios: &[Scenario],
    results: &[Result<Option<Decision>, ScenarioError>],
    writer: &mut W,
) -> Result<(), ScenarioError> {
    for (scenario, result) in scenarios.iter().zip(results) {
        if let Ok(decision) = result {
            let line = Line {
                name: &scenario.name,
                decision: *decision,
            };
            serde_json::to_writer(&mut *writer, &line)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
