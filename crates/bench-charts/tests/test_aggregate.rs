mod common;
use common::{assert_float_eq, table};

use bench_charts::aggregate::{aggregate, inner_join, partition, Aggregated, PartitionKey};
use bench_charts::config::MissingPolicy;
use bench_charts::error::Error;
use bench_charts::table::Table;

const HEADER: &str = "file_size,num_block_copies,block_num,iteration,read_ns\n";

fn log(rows: &str) -> Table {
    table(&format!("{}{}", HEADER, rows))
}

fn all_rows(t: &Table) -> Vec<usize> {
    (0..t.len()).collect()
}

#[test]
fn test_iterations_have_equal_weight() {
    let t = log("10,4,100,1,500\n10,4,100,1,700\n10,4,100,2,300\n");
    let agg = aggregate(&t, &all_rows(&t), &["read_ns"], MissingPolicy::Skip).unwrap();
    assert_eq!(agg.block_nums, vec![100.]);
    assert_float_eq(agg.value("read_ns", 0), 450., 1e-9);
}

#[test]
fn test_one_row_per_block_sorted() {
    let t = log("10,4,300,1,1\n10,4,100,1,2\n10,4,200,1,3\n10,4,100,2,4\n10,4,300,2,5\n");
    let agg = aggregate(&t, &all_rows(&t), &["read_ns"], MissingPolicy::Skip).unwrap();
    assert_eq!(agg.block_nums, vec![100., 200., 300.]);
    assert_eq!(agg.column("read_ns").unwrap(), &[3., 3., 3.]);
}

#[test]
fn test_missing_values_policies() {
    let t = log("10,4,100,1,\n10,4,100,2,300\n10,4,200,1,\n");
    let skip = aggregate(&t, &all_rows(&t), &["read_ns"], MissingPolicy::Skip).unwrap();
    assert_eq!(skip.column("read_ns").unwrap(), &[300., 0.]);
    let zero = aggregate(&t, &all_rows(&t), &["read_ns"], MissingPolicy::Zero).unwrap();
    assert_eq!(zero.column("read_ns").unwrap(), &[150., 0.]);
}

#[test]
fn test_rows_without_group_keys_are_dropped() {
    let t = log("10,4,100,1,10\n10,4,,1,1000\n10,4,100,,1000\n");
    let agg = aggregate(&t, &all_rows(&t), &["read_ns"], MissingPolicy::Skip).unwrap();
    assert_eq!(agg.block_nums, vec![100.]);
    assert_eq!(agg.value("read_ns", 0), 10.);
}

#[test]
fn test_partitions() {
    let t = log("10,4,100,1,1\n10,4.0,200,1,1\n10,8,100,1,1\n,4,100,1,1\n20,,100,1,1\n");
    let parts = partition(&t).unwrap();
    let keys: Vec<_> = parts.keys().copied().collect();
    assert_eq!(
        keys,
        vec![
            PartitionKey::new(Some(10.), Some(4.)),
            PartitionKey::new(Some(10.), Some(8.)),
            PartitionKey::new(Some(20.), None),
            PartitionKey::new(None, Some(4.)),
        ]
    );
    assert_eq!(parts[&PartitionKey::new(Some(10.), Some(4.))], vec![0, 1]);
    assert_eq!(parts[&PartitionKey::new(None, Some(4.))], vec![3]);
}

#[test]
fn test_aggregate_within_partition() {
    let t = log("10,4,100,1,1\n10,8,100,1,5\n10,4,100,2,3\n");
    let parts = partition(&t).unwrap();
    let rows = &parts[&PartitionKey::new(Some(10.), Some(4.))];
    let agg = aggregate(&t, rows, &["read_ns"], MissingPolicy::Skip).unwrap();
    assert_eq!(agg.value("read_ns", 0), 2.);
}

#[test]
fn test_missing_columns() {
    let t = table("file_size,block_num\n1,2\n");
    assert!(matches!(partition(&t), Err(Error::MissingColumn(c)) if c == "num_block_copies"));
    let t = log("10,4,100,1,1\n");
    let err = aggregate(&t, &[0], &["write_ns"], MissingPolicy::Skip).unwrap_err();
    assert!(matches!(err, Error::MissingColumn(c) if c == "write_ns"));
}

fn aggregated(blocks: &[f64], values: &[f64]) -> Aggregated {
    Aggregated {
        block_nums: blocks.to_vec(),
        columns: [("read_ns".to_string(), values.to_vec())].into_iter().collect(),
    }
}

#[test]
fn test_inner_join_keeps_common_blocks() {
    let rpc = aggregated(&[1., 2., 3.], &[10., 20., 30.]);
    let baseline = aggregated(&[2., 3., 4.], &[200., 300., 400.]);
    let joined = inner_join(&rpc, &baseline);
    assert_eq!(joined.block_nums(), &[2., 3.]);
    assert_eq!(joined.left.column("read_ns").unwrap(), &[20., 30.]);
    assert_eq!(joined.right.column("read_ns").unwrap(), &[200., 300.]);
    assert_eq!(joined.right.block_nums, vec![2., 3.]);
}

#[test]
fn test_inner_join_without_overlap_is_empty() {
    let joined = inner_join(&aggregated(&[1.], &[1.]), &aggregated(&[2.], &[2.]));
    assert!(joined.is_empty());
    assert!(inner_join(&Aggregated::default(), &aggregated(&[2.], &[2.])).is_empty());
}
