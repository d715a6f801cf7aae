//! Scenario review CLI.
//!
//! Reviews one or more scenario files and prints the chosen move for
//! each.
//!
//! Usage:
//!   cargo run --release --bin review -- [OPTIONS] FILE...
//!
//! Options:
//!   --threads N            Number of parallel reviews (default: 1)
//!   --option NAME=VALUE    Override a review option in every scenario
//!   --json                 Print one JSON object per scenario
//!
//! Set RUST_LOG=debug to see every move reason and the top moves.

use std::env;
use std::io::{self, BufWriter, Write};
use std::process;

use tesuji::sandbox::{review_all, write_jsonl};
use tesuji::Scenario;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut threads = 1usize;
    let mut options: Vec<(String, String)> = Vec::new();
    let mut files: Vec<String> = Vec::new();
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--threads" => {
                i += 1;
                threads = match args.get(i).and_then(|s| s.parse().ok()) {
                    Some(n) => n,
                    None => fail("invalid --threads value"),
                };
            }
            "--option" => {
                i += 1;
                match args.get(i).and_then(|s| s.split_once('=')) {
                    Some((name, value)) => options.push((name.to_string(), value.to_string())),
                    None => fail("--option expects NAME=VALUE"),
                }
            }
            "--json" => json = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other if other.starts_with("--") => fail(&format!("Unknown argument: {other}")),
            file => files.push(file.to_string()),
        }
        i += 1;
    }

    if files.is_empty() {
        fail("no scenario files given");
    }

    let mut scenarios = Vec::with_capacity(files.len());
    for file in &files {
        let mut scenario = match Scenario::load(file) {
            Ok(scenario) => scenario,
            Err(e) => fail(&format!("{file}: {e}")),
        };
        if scenario.name.is_empty() {
            scenario.name = file.clone();
        }
        for (name, value) in &options {
            if let Err(e) = scenario.config.set_option(name, value) {
                fail(&e.to_string());
            }
        }
        scenarios.push(scenario);
    }

    let results = match review_all(&scenarios, threads) {
        Ok(results) => results,
        Err(e) => fail(&e.to_string()),
    };

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    if json {
        if let Err(e) = write_jsonl(&scenarios, &results, &mut writer) {
            fail(&e.to_string());
        }
    }
    let mut failed = false;
    for (scenario, result) in scenarios.iter().zip(&results) {
        match result {
            Ok(_) if json => {}
            Ok(Some(decision)) => {
                let _ = writeln!(writer, "{}: {} {:.2}", scenario.name, decision.point, decision.value);
            }
            Ok(None) => {
                let _ = writeln!(writer, "{}: pass", scenario.name);
            }
            Err(e) => {
                eprintln!("{}: {}", scenario.name, e);
                failed = true;
            }
        }
    }
    let _ = writer.flush();
    if failed {
        process::exit(1);
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    print_usage();
    process::exit(1);
}

fn print_usage() {
    eprintln!("Usage: review [OPTIONS] FILE...");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --threads N          Number of parallel reviews (default: 1)");
    eprintln!("  --option NAME=VALUE  Override a review option");
    eprintln!("  --json               Print one JSON object per scenario");
    eprintln!("  --help               Show this help");
}
