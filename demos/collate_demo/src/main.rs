// =============================================================================
// Batch Collation Walkthrough — Corral
// =============================================================================
//
// This demo shows how samples are combined into mini-batches, and where the
// default collation rule breaks down.
//
// Features demonstrated:
//   1. DefaultCollate on an image-classification dataset (scalar labels)
//   2. The map-merge rule: a batch of uniform map targets becomes ONE map
//      of stacked fields, not a list of maps
//   3. The failure mode: detection targets with varying box counts cannot
//      be stacked by the default rule
//   4. DetectionCollate, which keeps per-sample target maps as a plain list
//
// Usage:
//   cargo run -p collate-demo                      # defaults
//   cargo run -p collate-demo -- --batch-size 8
//   cargo run -p collate-demo -- --samples 32 --seed 7

use corral_core::{Array, Value};
use corral_data::{
    ClassificationDataset, Collate, DataLoader, DataLoaderConfig, Dataset, DefaultCollate,
    DetectionCollate, DetectionDataset, Normalize, Sample, VecDataset,
};

struct Config {
    samples: usize,
    batch_size: usize,
    seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            samples: 16,
            batch_size: 4,
            seed: 42,
        }
    }
}

fn parse_args() -> Config {
    let mut cfg = Config::default();
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--samples" => {
                i += 1;
                cfg.samples = args[i].parse().expect("invalid --samples");
            }
            "--batch-size" => {
                i += 1;
                cfg.batch_size = args[i].parse().expect("invalid --batch-size");
            }
            "--seed" => {
                i += 1;
                cfg.seed = args[i].parse().expect("invalid --seed");
            }
            other => {
                eprintln!("unknown argument: {other}");
                std::process::exit(1);
            }
        }
        i += 1;
    }
    cfg
}

fn describe_target(target: &Value) -> String {
    match target {
        Value::Map(fields) => {
            let parts: Vec<String> = fields
                .iter()
                .map(|(k, v)| match v {
                    Value::Array(a) => format!("{k}: {}", a.shape()),
                    other => format!("{k}: {}", other.kind()),
                })
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        Value::Array(a) => format!("array {}", a.shape()),
        Value::Scalar(s) => format!("scalar {s}"),
        Value::Seq(s) => format!("seq of {}", s.len()),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cfg = parse_args();

    // 1. Classification: scalar labels go through the default rule
    println!("── 1. classification batch, DefaultCollate ──");
    let cls = ClassificationDataset::new(cfg.samples, &[3, 8, 8], 10, cfg.seed);
    let mut loader = DataLoader::new(
        &cls,
        DefaultCollate,
        DataLoaderConfig::default().batch_size(cfg.batch_size),
    )
    .with_transform(Box::new(Normalize::new(255.0)));

    let batch = loader
        .iter_batches()
        .next()
        .expect("dataset is not empty")
        .expect("uniform shapes always collate");
    println!(
        "inputs:  {} (stacked)",
        batch.inputs.as_stacked().unwrap().shape()
    );
    if let Some(targets) = batch.targets.as_collated() {
        println!("targets: {}", describe_target(targets));
    }

    // 2. The footgun: uniform map targets merge into ONE map
    println!("\n── 2. uniform map targets, DefaultCollate ──");
    let det = DetectionDataset::new(cfg.samples, &[3, 8, 8], 4, 10, cfg.seed);
    // Hand-built samples with exactly 2 boxes each, so the default rule CAN stack
    let uniform: Vec<Sample> = (0..cfg.batch_size)
        .map(|i| {
            let target = Value::map([
                ("boxes", Value::Array(Array::zeros((2, 4)))),
                (
                    "labels",
                    Value::Array(Array::vector(vec![i as f64, i as f64])),
                ),
            ]);
            Sample::new(det.get(i).input, target)
        })
        .collect();
    let ds = VecDataset::new(uniform, "uniform-boxes");
    let mut loader = DataLoader::new(
        &ds,
        DefaultCollate,
        DataLoaderConfig::default().batch_size(cfg.batch_size),
    );
    match loader.iter_batches().next().expect("non-empty") {
        Ok(batch) => {
            if let Some(targets) = batch.targets.as_collated() {
                println!("merged targets: {}", describe_target(targets));
                println!("(one map of stacked fields — NOT a list of per-sample maps)");
            }
        }
        Err(e) => println!("collation failed: {e}"),
    }

    // 3. Varying box counts break the default rule
    println!("\n── 3. varying map targets, DefaultCollate ──");
    let mut loader = DataLoader::new(
        &det,
        DefaultCollate,
        DataLoaderConfig::default().batch_size(cfg.batch_size),
    );
    let mut saw_error = false;
    for batch in loader.iter_batches() {
        if let Err(e) = batch {
            println!("collation failed: {e}");
            saw_error = true;
            break;
        }
    }
    if !saw_error {
        println!("(all batches happened to have uniform box counts — rerun with another seed)");
    }

    // 4. The custom rule: per-sample maps stay a list
    println!("\n── 4. varying map targets, DetectionCollate ──");
    let samples: Vec<_> = (0..cfg.batch_size).map(|i| det.get(i)).collect();
    let batch = DetectionCollate
        .collate(samples)
        .expect("never stacks varying targets");
    println!(
        "inputs:  {} (stacked — image shapes are uniform)",
        batch.inputs.as_stacked().unwrap().shape()
    );
    for (i, target) in batch.targets.as_per_sample().unwrap().iter().enumerate() {
        println!("target {i}: {}", describe_target(target));
    }
}
