//! Charts for block-read benchmark logs.
//!
//! Two reports are supported:
//!
//! - [`breakdown_report`](report::breakdown_report) reads a single CSV with `fiemap`, `rpc` and `io`
//!   timings next to the baseline time and plots one breakdown chart per
//!   `(file_size, num_block_copies)` partition.
//! - [`compare_report`](report::compare_report) reads an `rpc.log` / `baseline.log` pair, brings
//!   both to the same component schema and plots RPC and baseline stacks side by side for every
//!   block number measured by both.
//!
//! Both reports average duplicate `(block_num, iteration)` measurements before averaging
//! iterations, see [`aggregate`](aggregate::aggregate).

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod palette;
pub mod render;
pub mod report;
pub mod schema;
pub mod table;

pub use error::{Error, Result};
