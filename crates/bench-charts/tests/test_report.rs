mod common;
use common::{assert_float_eq, write_file};

use chrono::NaiveDate;

use bench_charts::config::{BreakdownConfig, CompareConfig, UnitMode};
use bench_charts::error::Error;
use bench_charts::render::MemorySink;
use bench_charts::report::{breakdown_report, compare_report};

const BREAKDOWN_LOG: &str = "\
block_num,iteration,num_block_copies,file_size,fiemap_time,rpc_time,io_time,client_total_time,baseline_time
100,1,4,10,0.1,0.2,0.3,0.7,0.5
100,1,4,10,0.3,0.2,0.3,0.9,0.7
100,2,4,10,0.2,0.2,0.3,0.8,0.3
200,1,4.0,10,1,1,1,3,2
100,1,8,10,0.5,0.5,0.5,1.5,1
";

const RPC_LOG: &str = "\
block_num,iteration,num_block_copies,file_size,server_read_ns,server_write_ns,server_other_ns,fiemap_ns,rpc_ns,prep_ns,end_ns,total_time
4096,1,4,10,1000,2000,100,300,4000,50,50,7500
8192,1,4,10,2000,3000,100,300,5000,50,50,10500
4096,1,8,10,1000,2000,100,300,4000,50,50,7500
4096,1,16,10,1000,2000,100,300,4000,50,50,7500
";

const BASELINE_LOG: &str = "\
block_num,iteration,num_block_copies,file_size,read_ns,write_ns,other_ns,total_time
4096,1,4,10,3000,1000,200,4200
4096,2,4,10,5000,1000,200,6200
16384,1,4,10,9000,1000,200,10200
2048,1,8,10,1000,1000,200,2200
";

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 5).unwrap()
}

#[test]
fn test_breakdown_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = BreakdownConfig {
        input: write_file(dir.path(), "log.csv", BREAKDOWN_LOG),
        output_dir: dir.path().join("charts"),
        ..Default::default()
    };
    let mut sink = MemorySink::default();
    let written = breakdown_report(&config, &mut sink).unwrap();
    assert_eq!(
        written,
        vec![
            config.output_dir.join("chart_fs10_nbc4.png"),
            config.output_dir.join("chart_fs10_nbc8.png"),
        ]
    );
    assert_eq!(sink.charts.len(), 2);

    let (_, model) = &sink.charts[0];
    assert_eq!(model.ticks.len(), 2);
    // fiemap of block 100: mean(mean(0.1, 0.3), 0.2)
    let fiemap = &model.stacks[0].segments[0];
    assert_eq!(fiemap.component, "fiemap_time");
    assert_float_eq(fiemap.value, 0.2, 1e-12);
    assert_float_eq(model.stacks[1].total, 0.45, 1e-12);
    assert_float_eq(model.stacks[2].total, 3., 1e-12);
}

#[test]
fn test_breakdown_report_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = BreakdownConfig {
        input: dir.path().join("absent.csv"),
        output_dir: dir.path().join("charts"),
        ..Default::default()
    };
    let err = breakdown_report(&config, &mut MemorySink::default()).unwrap_err();
    assert!(matches!(err, Error::MissingInput(_)));
}

fn compare_config(dir: &std::path::Path) -> CompareConfig {
    let log_dir = dir.join("logs");
    std::fs::create_dir(&log_dir).unwrap();
    write_file(&log_dir, "rpc.log", RPC_LOG);
    write_file(&log_dir, "baseline.log", BASELINE_LOG);
    CompareConfig {
        log_dir,
        output_dir: dir.join("outputs"),
        ..Default::default()
    }
}

#[test]
fn test_compare_report_plots_common_blocks_only() {
    let dir = tempfile::tempdir().unwrap();
    let config = compare_config(dir.path());
    let mut sink = MemorySink::default();
    let written = compare_report(&config, run_date(), &mut sink).unwrap();
    // (10, 8) has no common block numbers, (10, 16) has no baseline partition
    assert_eq!(
        written,
        vec![config
            .output_dir
            .join("chart_fs10GB_bytes4-finegrained-read-2024-11-05.png")]
    );

    let (_, model) = &sink.charts[0];
    assert_eq!(model.ticks, vec![(1., "4096".to_string())]);
    let rpc = &model.stacks[0];
    let baseline = &model.stacks[1];
    let value = |stack: &bench_charts::chart::Stack, name: &str| {
        stack.segments.iter().find(|s| s.component == name).unwrap().value
    };
    assert_float_eq(value(rpc, "read_ns"), 1000., 1e-9);
    assert_float_eq(value(rpc, "other_ns"), 200., 1e-9);
    assert_float_eq(rpc.total, 7500., 1e-9);
    assert_float_eq(value(baseline, "read_ns"), 4000., 1e-9);
    assert_float_eq(value(baseline, "rpc_ns"), 0., 1e-9);
    assert_float_eq(baseline.total, 5200., 1e-9);
}

#[test]
fn test_compare_report_converts_units() {
    let dir = tempfile::tempdir().unwrap();
    let config = CompareConfig {
        unit_mode: UnitMode::Force,
        time_unit: "s".to_string(),
        ..compare_config(dir.path())
    };
    let mut sink = MemorySink::default();
    compare_report(&config, run_date(), &mut sink).unwrap();
    let (_, model) = &sink.charts[0];
    assert_float_eq(model.stacks[0].total, 7.5e-6, 1e-15);
}

#[test]
fn test_compare_report_without_overlap_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().to_path_buf();
    write_file(&log_dir, "rpc.log", RPC_LOG);
    write_file(
        &log_dir,
        "baseline.log",
        "block_num,iteration,num_block_copies,file_size,read_ns\n1,1,4,10,5\n",
    );
    let config = CompareConfig {
        log_dir,
        output_dir: dir.path().join("outputs"),
        ..Default::default()
    };
    let mut sink = MemorySink::default();
    let written = compare_report(&config, run_date(), &mut sink).unwrap();
    assert!(written.is_empty());
    assert!(sink.charts.is_empty());
}

#[test]
fn test_compare_report_missing_log_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = CompareConfig {
        log_dir: dir.path().join("finegrained_read_logs"),
        ..Default::default()
    };
    let err = compare_report(&config, run_date(), &mut MemorySink::default()).unwrap_err();
    assert!(matches!(err, Error::MissingInput(p) if p.ends_with("finegrained_read_logs")));
}
