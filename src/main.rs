use std::env;
use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, bail};
use growth_curves::reference::loader::{load_bundle_dir, load_store};
use growth_curves::{
    EvaluationConfig, EvaluationRequest, GrowthEvaluator, ReferenceTableStore, builtin_store,
    render_summary,
};
use log::{info, warn};
use serde::Deserialize;

/// Request file: the evaluation request plus its configuration
#[derive(Debug, Deserialize)]
struct CliRequest {
    #[serde(flatten)]
    request: EvaluationRequest,
    config: EvaluationConfig,
}

fn load_tables(path: Option<&Path>) -> anyhow::Result<ReferenceTableStore> {
    let Some(path) = path else {
        info!("Using built-in reference tables");
        return Ok(builtin_store()?);
    };

    if path.is_dir() {
        let mut builder = ReferenceTableStore::builder();
        let count = load_bundle_dir(path, &mut builder)?;
        if count == 0 {
            bail!("no reference tables found in {}", path.display());
        }
        Ok(builder.build())
    } else {
        load_store(path).with_context(|| format!("failed to load tables from {}", path.display()))
    }
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (request_path, tables_path) = match args.as_slice() {
        [request] => (Path::new(request), None),
        [request, tables] => (Path::new(request), Some(Path::new(tables))),
        _ => bail!("usage: growth-curves <request.json> [tables.json|tables-dir]"),
    };

    let start = Instant::now();
    let store = load_tables(tables_path)?;
    info!("Loaded {} reference tables in {:?}", store.len(), start.elapsed());

    let contents = fs::read_to_string(request_path)
        .with_context(|| format!("failed to read {}", request_path.display()))?;
    let cli: CliRequest = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {}", request_path.display()))?;
    info!("{}", cli.config);

    let evaluator = GrowthEvaluator::new(&store, cli.config)?;
    let result = evaluator.evaluate_request(&cli.request)?;
    for (parameter, clamp) in result.clamp_warnings() {
        warn!(
            "{parameter}: age {} outside reference table, edge row at {} used",
            clamp.requested_age, clamp.edge_age
        );
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    println!();
    print!("{}", render_summary(&result));

    Ok(())
}
