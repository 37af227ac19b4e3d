//! Report pipelines: load, normalize, aggregate and render every partition in turn.

use std::path::PathBuf;

use chrono::NaiveDate;
use itertools::Itertools;
use log::{debug, info};

use crate::aggregate::{aggregate, inner_join, partition, PartitionKey};
use crate::chart::{breakdown_chart, breakdown_file_name, compare_chart, compare_file_name, format_key_value};
use crate::config::{BreakdownConfig, CompareConfig};
use crate::error::{Error, Result};
use crate::loader::load_table;
use crate::normalize::{normalize_breakdown, normalize_component_log};
use crate::render::ChartSink;
use crate::schema::{breakdown, compare};

fn describe(key: &PartitionKey) -> String {
    format!(
        "file_size={}, num_block_copies={}",
        format_key_value(key.file_size),
        format_key_value(key.num_block_copies)
    )
}

/// Builds one breakdown chart per partition of the single-source log.
///
/// Returns paths of the written charts.
pub fn breakdown_report(config: &BreakdownConfig, sink: &mut dyn ChartSink) -> Result<Vec<PathBuf>> {
    info!("building breakdown charts from {}", config.input.display());
    let mut table = load_table(&config.input)?;
    normalize_breakdown(&mut table, config.unit_mode);
    let partitions = partition(&table)?;
    debug!("partitions: {}", partitions.keys().map(describe).join("; "));

    sink.prepare(&config.output_dir)?;
    let mut written = Vec::new();
    for (key, rows) in partitions.iter() {
        let agg = aggregate(&table, rows, breakdown::TIME_COLUMNS, config.missing_policy)?;
        if agg.is_empty() {
            debug!("skipping {}: no complete rows", describe(key));
            continue;
        }
        let model = breakdown_chart(key, &agg, config);
        let path = config.output_dir.join(breakdown_file_name(key));
        sink.write_chart(&model, &path)?;
        info!("saved {}", path.display());
        written.push(path);
    }
    info!("{} charts saved to {}/", written.len(), config.output_dir.display());
    Ok(written)
}

/// Builds one RPC vs baseline chart per partition present in both logs.
///
/// Only block numbers measured by both paths are plotted; partitions without any are skipped.
pub fn compare_report(config: &CompareConfig, run_date: NaiveDate, sink: &mut dyn ChartSink) -> Result<Vec<PathBuf>> {
    if !config.log_dir.is_dir() {
        return Err(Error::MissingInput(config.log_dir.clone()));
    }
    info!("comparing logs in {}", config.log_dir.display());
    let mut baseline = load_table(&config.baseline_path())?;
    let mut rpc = load_table(&config.rpc_path())?;
    normalize_component_log(&mut baseline, &[], config.unit_mode);
    normalize_component_log(&mut rpc, compare::RPC_RENAMES, config.unit_mode);

    let baseline_parts = partition(&baseline)?;
    let rpc_parts = partition(&rpc)?;

    sink.prepare(&config.output_dir)?;
    let mut written = Vec::new();
    for (key, rpc_rows) in rpc_parts.iter() {
        let Some(baseline_rows) = baseline_parts.get(key) else {
            debug!("skipping {}: no baseline measurements", describe(key));
            continue;
        };
        let rpc_agg = aggregate(&rpc, rpc_rows, compare::PARTS, config.missing_policy)?;
        let baseline_agg = aggregate(&baseline, baseline_rows, compare::PARTS, config.missing_policy)?;
        let joined = inner_join(&rpc_agg, &baseline_agg);
        if joined.is_empty() {
            debug!("skipping {}: no common block numbers", describe(key));
            continue;
        }
        let model = compare_chart(key, &joined, config);
        let path = config.output_dir.join(compare_file_name(key, run_date));
        sink.write_chart(&model, &path)?;
        info!("saved {}", path.display());
        written.push(path);
    }
    info!("{} charts saved to {}/", written.len(), config.output_dir.display());
    Ok(written)
}
