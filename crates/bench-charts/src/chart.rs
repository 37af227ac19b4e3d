//! Chart models: bar positions, stacked segments and their labels.
//!
//! Models are plain data, drawing them is up to a [`ChartSink`](crate::render::ChartSink).

use chrono::NaiveDate;

use crate::aggregate::{Aggregated, Joined, KeyValue, PartitionKey};
use crate::config::{BreakdownConfig, CompareConfig};
use crate::schema::{breakdown, compare};

const BREAKDOWN_BAR_WIDTH: f64 = 0.35;
const COMPARE_BAR_WIDTH: f64 = 0.30;
const COMPARE_BAR_OFFSET: f64 = COMPARE_BAR_WIDTH * 0.7;

/// One piece of a stacked bar.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub component: String,
    pub bottom: f64,
    pub value: f64,
    /// Text drawn in the middle of the segment.
    pub label: Option<String>,
}

impl Segment {
    pub fn top(&self) -> f64 {
        self.bottom + self.value
    }
}

/// Stacked bar with its total label.
#[derive(Clone, Debug, PartialEq)]
pub struct Stack {
    /// Center of the bar.
    pub x: f64,
    pub width: f64,
    pub segments: Vec<Segment>,
    /// Sum of segment values.
    pub total: f64,
    /// Text drawn above the bar.
    pub total_label: String,
    pub bold_total: bool,
}

impl Stack {
    fn new<'a, I>(x: f64, width: f64, parts: I, bold_total: bool, fmt: impl Fn(f64) -> String) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64, Option<String>)>,
    {
        let mut segments = Vec::new();
        let mut bottom = 0.;
        for (component, value, label) in parts {
            segments.push(Segment {
                component: component.to_string(),
                bottom,
                value,
                label,
            });
            bottom += value;
        }
        Self {
            x,
            width,
            segments,
            total: bottom,
            total_label: fmt(bottom),
            bold_total,
        }
    }
}

/// Everything needed to draw one partition's chart.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartModel {
    /// Main title above the chart.
    pub title: Option<String>,
    /// Per-partition caption.
    pub caption: String,
    pub x_desc: String,
    pub y_desc: String,
    pub x_range: (f64, f64),
    /// Category positions and their labels.
    pub ticks: Vec<(f64, String)>,
    pub stacks: Vec<Stack>,
    /// Components in legend order.
    pub legend: Vec<String>,
    /// Note drawn below the chart.
    pub footnote: Option<String>,
}

impl ChartModel {
    /// Height of the tallest stack.
    pub fn y_max(&self) -> f64 {
        self.stacks.iter().map(|s| s.total).fold(0., f64::max)
    }

    /// Vertical gap between a bar and its total label.
    pub fn label_gap(&self) -> f64 {
        let y_max = self.y_max();
        if y_max > 0. {
            y_max * 0.015
        } else {
            0.01
        }
    }
}

/// Formats a key value for display: integral values without fraction, missing values as `nan`.
pub fn format_key_value(value: KeyValue) -> String {
    match value.get() {
        None => "nan".to_string(),
        Some(x) if x.is_finite() && x.fract() == 0. && x.abs() < 1e15 => format!("{}", x as i64),
        Some(x) => format!("{}", x),
    }
}

/// Encodes a key value for use in a file name, so `4` and `4.0` give the same result.
pub fn encode_key_value(value: KeyValue) -> String {
    format_key_value(value).replace('.', "_")
}

/// Encodes the integer part of a key value.
pub fn encode_truncated(value: KeyValue) -> String {
    match value.get() {
        Some(x) if x.is_finite() => format!("{}", x.trunc() as i64),
        _ => encode_key_value(value),
    }
}

/// File name of a breakdown chart.
pub fn breakdown_file_name(key: &PartitionKey) -> String {
    format!(
        "chart_fs{}_nbc{}.png",
        encode_key_value(key.file_size),
        encode_key_value(key.num_block_copies)
    )
}

/// File name of a comparison chart. Charts of the same day overwrite each other.
pub fn compare_file_name(key: &PartitionKey, date: NaiveDate) -> String {
    format!(
        "chart_fs{}GB_bytes{}-finegrained-read-{}.png",
        encode_truncated(key.file_size),
        encode_key_value(key.num_block_copies),
        date.format("%Y-%m-%d")
    )
}

fn block_label(block: f64) -> String {
    format!("{}", block.trunc() as i64)
}

/// Builds the breakdown chart: a `fiemap/rpc/io` stack next to a baseline bar per block.
pub fn breakdown_chart(key: &PartitionKey, agg: &Aggregated, config: &BreakdownConfig) -> ChartModel {
    let half = BREAKDOWN_BAR_WIDTH / 2.;
    let mut stacks = Vec::with_capacity(agg.len() * 2);
    let mut ticks = Vec::with_capacity(agg.len());
    for (i, block) in agg.block_nums.iter().enumerate() {
        let x = i as f64;
        let parts = breakdown::STACKED.iter().map(|&name| {
            let v = agg.value(name, i);
            (name, v, Some(format!("{:.2}", v)))
        });
        stacks.push(Stack::new(x - half, BREAKDOWN_BAR_WIDTH, parts, true, |t| format!("{:.2}", t)));
        let baseline = agg.value(breakdown::BASELINE_TIME, i);
        stacks.push(Stack::new(
            x + half,
            BREAKDOWN_BAR_WIDTH,
            [(breakdown::BASELINE_TIME, baseline, None)],
            false,
            |t| format!("{:.2}", t),
        ));
        ticks.push((x, block_label(*block)));
    }
    let last = agg.len().saturating_sub(1) as f64;
    ChartModel {
        title: config.title.clone(),
        caption: format!(
            "file_size={} GiB, num_block_copies={}",
            format_key_value(key.file_size),
            format_key_value(key.num_block_copies)
        ),
        x_desc: "block_num".to_string(),
        y_desc: format!("time ({})", config.time_unit),
        x_range: (-0.6, last + 0.6),
        ticks,
        stacks,
        legend: breakdown::COMPONENTS.iter().map(|s| s.to_string()).collect(),
        footnote: None,
    }
}

/// Short component name used in segment labels: `read_ns` becomes `read`.
fn short_name(component: &str) -> &str {
    component.split('_').next().unwrap_or(component)
}

/// Builds the comparison chart: an RPC stack (left) and a baseline stack (right) per block.
///
/// `joined.left` holds RPC means and `joined.right` baseline means.
pub fn compare_chart(key: &PartitionKey, joined: &Joined, config: &CompareConfig) -> ChartModel {
    let unit = config.time_unit.as_str();
    let labeled = |name: &str, v: f64| {
        if v > 0. && config.labeled_components.iter().any(|c| c == name) {
            Some(format!("({}: {:.2}{})", short_name(name), v, unit))
        } else {
            None
        }
    };
    let fmt_total = |t: f64| format!("{:.2}{}", t, unit);
    let mut stacks = Vec::with_capacity(joined.block_nums().len() * 2);
    let mut ticks = Vec::with_capacity(joined.block_nums().len());
    for (i, block) in joined.block_nums().iter().enumerate() {
        let x = (i + 1) as f64;
        for (side, dx) in [(&joined.left, -COMPARE_BAR_OFFSET), (&joined.right, COMPARE_BAR_OFFSET)] {
            let parts = compare::PARTS.iter().map(|&name| {
                let v = side.value(name, i);
                (name, v, labeled(name, v))
            });
            stacks.push(Stack::new(x + dx, COMPARE_BAR_WIDTH, parts, true, fmt_total));
        }
        ticks.push((x, block_label(*block)));
    }
    let n = joined.block_nums().len() as f64;
    ChartModel {
        title: config.title.clone().filter(|t| !t.is_empty()),
        caption: format!(
            "file_size={} GiB · total_bytes={}",
            format_key_value(key.file_size),
            format_key_value(key.num_block_copies)
        ),
        x_desc: "bytes".to_string(),
        y_desc: format!("time ({})", unit),
        x_range: (0.4, n + 0.6),
        ticks,
        stacks,
        legend: compare::PARTS.iter().map(|s| s.to_string()).collect(),
        footnote: Some("Left: RPC   |   Right: BASELINE".to_string()),
    }
}
