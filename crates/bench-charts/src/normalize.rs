//! Bringing raw logs to the common schema: numeric coercion, renames, defaults and units.

use log::debug;

use crate::config::UnitMode;
use crate::schema::{self, compare};
use crate::table::{Column, Table};

/// Nanoseconds in one second.
pub const NS_PER_SEC: f64 = 1e9;

/// Median above which auto-detection treats a column as nanoseconds.
pub const NS_MEDIAN_THRESHOLD: f64 = 1e6;

/// Converts the listed columns to numeric ones. Unparsable cells become missing values.
pub fn coerce_numeric(table: &mut Table, columns: &[&str]) {
    for name in columns {
        let values = match table.column(name) {
            Some(Column::Numeric(_)) | None => continue,
            Some(column) => column.to_numeric(),
        };
        table.set_column(*name, Column::Numeric(values));
    }
}

/// Renames source-specific columns to canonical names. Absent source columns are skipped.
pub fn rename_columns(table: &mut Table, renames: &[(&str, &str)]) {
    for (from, to) in renames {
        if table.rename_column(from, to) {
            debug!("renamed column {} -> {}", from, to);
        }
    }
}

/// Creates every absent column, filled with `fill`.
pub fn ensure_columns(table: &mut Table, columns: &[&str], fill: f64) {
    for name in columns {
        if !table.contains(name) {
            table.set_column(*name, Column::filled(table.len(), fill));
        }
    }
}

/// Returns the median of non-missing values, averaging the two middle ones for even counts.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut data: Vec<f64> = values.iter().flatten().copied().collect();
    let n = data.len();
    if n == 0 {
        return None;
    }
    let upper = *order_stat::kth_by(&mut data, n / 2, |a, b| a.total_cmp(b));
    if n % 2 == 1 {
        return Some(upper);
    }
    let lower = *order_stat::kth_by(&mut data, n / 2 - 1, |a, b| a.total_cmp(b));
    Some((lower + upper) / 2.)
}

/// Applies the unit conversion policy to the listed numeric columns.
///
/// Returns the names of converted columns.
pub fn convert_units(table: &mut Table, columns: &[&str], mode: UnitMode) -> Vec<String> {
    let mut converted = Vec::new();
    if mode == UnitMode::None {
        return converted;
    }
    for name in columns {
        let convert = match mode {
            UnitMode::Force => table.numeric(name).is_some(),
            UnitMode::AutoDetect => match table.numeric(name).and_then(median) {
                Some(med) => med.is_finite() && med > NS_MEDIAN_THRESHOLD,
                None => false,
            },
            UnitMode::None => false,
        };
        if !convert {
            continue;
        }
        if let Some(values) = table.numeric_mut(name) {
            for x in values.iter_mut().flatten() {
                *x /= NS_PER_SEC;
            }
            debug!("converted column {} from ns to s", name);
            converted.push(name.to_string());
        }
    }
    converted
}

/// Adds the `extra` columns to `target`, treating missing cells as zero.
///
/// Absent columns contribute nothing; `target` is created if needed.
pub fn fold_columns(table: &mut Table, target: &str, extra: &[&str]) {
    let mut sum = vec![0.; table.len()];
    for name in std::iter::once(&target).chain(extra.iter()) {
        if let Some(values) = table.column(name).map(|c| c.to_numeric()) {
            for (acc, x) in sum.iter_mut().zip(values) {
                *acc += x.unwrap_or(0.);
            }
        }
    }
    table.set_column(target, Column::Numeric(sum.into_iter().map(Some).collect()));
}

/// Normalizes the single-source breakdown log.
pub fn normalize_breakdown(table: &mut Table, unit_mode: UnitMode) {
    coerce_numeric(table, schema::KEY_COLUMNS);
    coerce_numeric(table, schema::breakdown::TIME_COLUMNS);
    ensure_columns(table, schema::breakdown::TIME_COLUMNS, 0.);
    convert_units(table, schema::breakdown::TIME_COLUMNS, unit_mode);
}

/// Normalizes one log of the dual-source pair to the shared component schema.
///
/// `renames` maps source-specific names to canonical ones (see [`compare::RPC_RENAMES`]).
pub fn normalize_component_log(table: &mut Table, renames: &[(&str, &str)], unit_mode: UnitMode) {
    coerce_numeric(table, schema::KEY_COLUMNS);
    coerce_numeric(table, &[schema::TOTAL_TIME]);
    rename_columns(table, renames);
    coerce_numeric(table, compare::OPTIONAL);
    ensure_columns(table, compare::OPTIONAL, 0.);
    let mut unit_columns = compare::OPTIONAL.to_vec();
    unit_columns.push(schema::TOTAL_TIME);
    convert_units(table, &unit_columns, unit_mode);
    fold_columns(table, compare::OTHER_NS, compare::FOLDED_INTO_OTHER);
    ensure_columns(table, compare::PARTS, 0.);
    coerce_numeric(table, schema::KEY_COLUMNS);
}
