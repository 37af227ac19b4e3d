use std::fs;
use std::path::{Path, PathBuf};

use bench_charts::loader::read_table;
use bench_charts::table::Table;

pub fn assert_float_eq(x: f64, y: f64, eps: f64) {
    assert!(x > y - eps && x < y + eps, "{} != {}", x, y);
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

pub fn table(csv: &str) -> Table {
    read_table(csv.as_bytes()).unwrap()
}
