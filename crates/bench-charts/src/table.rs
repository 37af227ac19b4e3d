//! In-memory column-oriented table.

use indexmap::IndexMap;

/// Parses one CSV cell. Empty cells, unparsable text and `NaN` are all treated as missing.
pub fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|x| !x.is_nan())
}

/// Single table column.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    /// Numeric cells, `None` marks a missing value.
    Numeric(Vec<Option<f64>>),
    /// Raw text cells of a column which could not be read as numbers.
    Text(Vec<String>),
}

impl Column {
    /// Builds a column from raw cells, choosing the numeric type if every non-empty cell is a number.
    pub fn infer(cells: Vec<String>) -> Self {
        let values: Option<Vec<Option<f64>>> = cells
            .iter()
            .map(|cell| {
                let cell = cell.trim();
                if cell.is_empty() {
                    return Some(None);
                }
                cell.parse::<f64>().ok().map(|x| Some(x).filter(|x| !x.is_nan()))
            })
            .collect();
        match values {
            Some(values) => Column::Numeric(values),
            None => Column::Text(cells),
        }
    }

    /// Creates a numeric column with all cells set to `value`.
    pub fn filled(len: usize, value: f64) -> Self {
        Column::Numeric(vec![Some(value); len])
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    /// Returns numeric view of the column. Text cells which are not numbers become missing.
    pub fn to_numeric(&self) -> Vec<Option<f64>> {
        match self {
            Column::Numeric(v) => v.clone(),
            Column::Text(v) => v.iter().map(|cell| parse_cell(cell)).collect(),
        }
    }
}

/// Table with named columns of equal length, kept in the order they were added.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: IndexMap<String, Column>,
    rows: usize,
}

impl Table {
    /// Creates a table without columns which has `rows` rows.
    pub fn new(rows: usize) -> Self {
        Self {
            columns: IndexMap::new(),
            rows,
        }
    }

    /// Creates a table from numeric columns.
    ///
    /// Panics if the columns have different lengths.
    pub fn from_numeric<S: Into<String>>(columns: Vec<(S, Vec<Option<f64>>)>) -> Self {
        let rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut table = Self::new(rows);
        for (name, values) in columns {
            table.set_column(name, Column::Numeric(values));
        }
        table
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Returns the cells of a numeric column, `None` if the column is absent or holds text.
    pub fn numeric(&self, name: &str) -> Option<&[Option<f64>]> {
        match self.columns.get(name) {
            Some(Column::Numeric(v)) => Some(v),
            _ => None,
        }
    }

    pub fn numeric_mut(&mut self, name: &str) -> Option<&mut Vec<Option<f64>>> {
        match self.columns.get_mut(name) {
            Some(Column::Numeric(v)) => Some(v),
            _ => None,
        }
    }

    /// Returns a single numeric cell.
    pub fn value(&self, name: &str, row: usize) -> Option<f64> {
        self.numeric(name).and_then(|v| v.get(row).copied().flatten())
    }

    /// Inserts a column or replaces the existing one, keeping its position.
    ///
    /// Panics if the column length differs from the number of rows.
    pub fn set_column<S: Into<String>>(&mut self, name: S, column: Column) {
        let name = name.into();
        assert_eq!(
            column.len(),
            self.rows,
            "column '{}' has {} cells, table has {} rows",
            name,
            column.len(),
            self.rows
        );
        self.columns.insert(name, column);
    }

    /// Renames a column in place. A column already named `to` is dropped.
    /// Returns `false` if there is no column named `from`.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        if from == to || !self.columns.contains_key(from) {
            return self.columns.contains_key(from);
        }
        self.columns.shift_remove(to);
        let columns = std::mem::take(&mut self.columns);
        self.columns = columns
            .into_iter()
            .map(|(name, column)| if name == from { (to.to_string(), column) } else { (name, column) })
            .collect();
        true
    }
}
