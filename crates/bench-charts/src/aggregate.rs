//! Partitioning and the two-stage grouped mean.
//!
//! Duplicate `(block_num, iteration)` rows are averaged first, and only then iterations are
//! averaged per `block_num`, so every iteration has the same weight in the result no matter how
//! many raw rows it produced.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use log::warn;

use crate::config::MissingPolicy;
use crate::error::{Error, Result};
use crate::schema::{BLOCK_NUM, FILE_SIZE, ITERATION, NUM_BLOCK_COPIES};
use crate::table::Table;

/// Value of a grouping key. Missing values form their own group ordered after all numbers.
#[derive(Clone, Copy, Debug)]
pub struct KeyValue(Option<f64>);

impl KeyValue {
    pub fn new(value: Option<f64>) -> Self {
        // folds -0.0 into 0.0 so that both land in the same group
        Self(value.map(|x| x + 0.))
    }

    pub fn get(&self) -> Option<f64> {
        self.0
    }
}

impl Ord for KeyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0, other.0) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl PartialOrd for KeyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for KeyValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for KeyValue {}

/// Identifies one output chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PartitionKey {
    pub file_size: KeyValue,
    pub num_block_copies: KeyValue,
}

impl PartitionKey {
    pub fn new(file_size: Option<f64>, num_block_copies: Option<f64>) -> Self {
        Self {
            file_size: KeyValue::new(file_size),
            num_block_copies: KeyValue::new(num_block_copies),
        }
    }
}

#[derive(Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn add(&mut self, x: Option<f64>) {
        if let Some(x) = x {
            self.sum += x;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Per-`block_num` means of a partition, sorted by `block_num`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Aggregated {
    pub block_nums: Vec<f64>,
    pub columns: IndexMap<String, Vec<f64>>,
}

impl Aggregated {
    pub fn len(&self) -> usize {
        self.block_nums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.block_nums.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    /// Returns the value of column `name` in row `row`, zero if the column is absent.
    pub fn value(&self, name: &str, row: usize) -> f64 {
        self.column(name).and_then(|v| v.get(row)).copied().unwrap_or(0.)
    }

    fn select(&self, rows: &[usize]) -> Self {
        Self {
            block_nums: rows.iter().map(|&i| self.block_nums[i]).collect(),
            columns: self
                .columns
                .iter()
                .map(|(name, values)| (name.clone(), rows.iter().map(|&i| values[i]).collect()))
                .collect(),
        }
    }
}

/// Two aggregated tables restricted to their common block numbers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Joined {
    pub left: Aggregated,
    pub right: Aggregated,
}

impl Joined {
    pub fn block_nums(&self) -> &[f64] {
        &self.left.block_nums
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

fn required<'a>(table: &'a Table, name: &str) -> Result<&'a [Option<f64>]> {
    table.numeric(name).ok_or_else(|| Error::MissingColumn(name.to_string()))
}

/// Splits table rows by `(file_size, num_block_copies)`.
///
/// Returns row indices of every partition, partitions in ascending key order.
pub fn partition(table: &Table) -> Result<BTreeMap<PartitionKey, Vec<usize>>> {
    let file_size = required(table, FILE_SIZE)?;
    let copies = required(table, NUM_BLOCK_COPIES)?;
    let mut partitions: BTreeMap<PartitionKey, Vec<usize>> = BTreeMap::new();
    for (row, (fs, nbc)) in file_size.iter().zip(copies.iter()).enumerate() {
        partitions.entry(PartitionKey::new(*fs, *nbc)).or_default().push(row);
    }
    Ok(partitions)
}

/// Computes per-`block_num` means of `columns` over the given rows.
///
/// Rows are first averaged within each `(block_num, iteration)` group and the group means are
/// then averaged per `block_num`. Rows without `block_num` or `iteration` are dropped.
pub fn aggregate(table: &Table, rows: &[usize], columns: &[&str], policy: MissingPolicy) -> Result<Aggregated> {
    let block_num = required(table, BLOCK_NUM)?;
    let iteration = required(table, ITERATION)?;
    let mut values = Vec::with_capacity(columns.len());
    for name in columns {
        let column = table.column(name).ok_or_else(|| Error::MissingColumn(name.to_string()))?;
        values.push(column.to_numeric());
    }

    let mut per_iteration: BTreeMap<(KeyValue, KeyValue), Vec<Mean>> = BTreeMap::new();
    let mut dropped = 0;
    for &row in rows {
        let (Some(block), Some(iter)) = (block_num[row], iteration[row]) else {
            dropped += 1;
            continue;
        };
        let means = per_iteration
            .entry((KeyValue::new(Some(block)), KeyValue::new(Some(iter))))
            .or_insert_with(|| vec![Mean::default(); columns.len()]);
        for (mean, column) in means.iter_mut().zip(values.iter()) {
            mean.add(column[row]);
        }
    }
    if dropped > 0 {
        warn!("dropped {} rows without {} or {}", dropped, BLOCK_NUM, ITERATION);
    }

    let mut per_block: BTreeMap<KeyValue, Vec<Mean>> = BTreeMap::new();
    for ((block, _), means) in per_iteration {
        let acc = per_block
            .entry(block)
            .or_insert_with(|| vec![Mean::default(); columns.len()]);
        for (acc, mean) in acc.iter_mut().zip(means) {
            let value = match policy {
                MissingPolicy::Skip => mean.value(),
                MissingPolicy::Zero => Some(mean.value().unwrap_or(0.)),
            };
            acc.add(value);
        }
    }

    let mut result = Aggregated {
        block_nums: Vec::with_capacity(per_block.len()),
        columns: columns
            .iter()
            .map(|name| (name.to_string(), Vec::with_capacity(per_block.len())))
            .collect(),
    };
    for (block, means) in per_block {
        // keys were built from present values only
        result.block_nums.push(block.get().unwrap_or_default());
        for (column, mean) in result.columns.values_mut().zip(means) {
            column.push(mean.value().unwrap_or(0.));
        }
    }
    Ok(result)
}

/// Keeps only block numbers present in both tables, in ascending order.
pub fn inner_join(left: &Aggregated, right: &Aggregated) -> Joined {
    let right_rows: HashMap<u64, usize> = right
        .block_nums
        .iter()
        .enumerate()
        .map(|(i, b)| ((b + 0.).to_bits(), i))
        .collect();
    let mut left_sel = Vec::new();
    let mut right_sel = Vec::new();
    for (i, b) in left.block_nums.iter().enumerate() {
        if let Some(&j) = right_rows.get(&(b + 0.).to_bits()) {
            left_sel.push(i);
            right_sel.push(j);
        }
    }
    Joined {
        left: left.select(&left_sel),
        right: right.select(&right_sel),
    }
}
