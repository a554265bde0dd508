use std::collections::HashMap;
use std::fmt;

use super::error::TableError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// One dynamically-typed table cell.
/// Used as a `BTreeMap` key when grouping, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

// -- Manual Eq/Ord so we can group by CellValue --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

/// Human-facing rendering used by the tables and chart labels.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "NaN"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell. Booleans and text are not numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Identifier text for labels and pickers. Floats print exactly, so
    /// distinct cells never share a label.
    pub fn label(&self) -> String {
        match self {
            CellValue::Float(v) => v.to_string(),
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – a named, typed sequence of cells
// ---------------------------------------------------------------------------

/// Inferred type of a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    Integer,
    Float,
    Bool,
    Text,
}

impl DType {
    pub fn is_numeric(self) -> bool {
        matches!(self, DType::Integer | DType::Float)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Integer => "int64",
            DType::Float => "float64",
            DType::Bool => "bool",
            DType::Text => "object",
        };
        f.write_str(name)
    }
}

/// One column of the table. Every value is either `Null` or matches `dtype`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: DType,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: DType, values: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            dtype,
            values,
        }
    }

    /// Build a column from loosely typed cells, picking the narrowest dtype
    /// that fits every non-null value: Integer, then Float, then Bool, then
    /// Text. Mixed cells are widened (ints to floats, anything else to text).
    pub fn from_cells(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        let non_null: Vec<&CellValue> = cells.iter().filter(|c| !c.is_null()).collect();

        let dtype = if non_null.is_empty() {
            if cells.is_empty() {
                DType::Text
            } else {
                DType::Float
            }
        } else if non_null.iter().all(|c| matches!(c, CellValue::Integer(_))) {
            DType::Integer
        } else if non_null
            .iter()
            .all(|c| matches!(c, CellValue::Integer(_) | CellValue::Float(_)))
        {
            DType::Float
        } else if non_null.iter().all(|c| matches!(c, CellValue::Bool(_))) {
            DType::Bool
        } else {
            DType::Text
        };

        let values = cells
            .into_iter()
            .map(|cell| match (dtype, cell) {
                (_, CellValue::Null) => CellValue::Null,
                (DType::Float, CellValue::Integer(i)) => CellValue::Float(i as f64),
                (DType::Text, CellValue::Text(s)) => CellValue::Text(s),
                (DType::Text, other) => CellValue::Text(other.to_string()),
                (_, other) => other,
            })
            .collect();

        Column::new(name, dtype, values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_numeric(&self) -> bool {
        self.dtype.is_numeric()
    }

    /// Per-row numeric values; `None` for missing cells and for every cell
    /// of a non-numeric column.
    pub fn numeric_values(&self) -> Vec<Option<f64>> {
        if !self.is_numeric() {
            return vec![None; self.len()];
        }
        self.values.iter().map(CellValue::as_f64).collect()
    }

    /// The non-missing numeric values, in row order.
    pub fn valid_numbers(&self) -> Vec<f64> {
        self.numeric_values().into_iter().flatten().collect()
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Ordered, equal-length named columns with a name index for presence checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    n_rows: usize,
}

impl Table {
    /// Assemble a table, rejecting duplicate names and ragged columns.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        let mut index = HashMap::with_capacity(columns.len());

        for (pos, col) in columns.iter().enumerate() {
            if col.len() != n_rows {
                return Err(TableError::RaggedColumn {
                    name: col.name.clone(),
                    expected: n_rows,
                    found: col.len(),
                });
            }
            if index.insert(col.name.clone(), pos).is_some() {
                return Err(TableError::DuplicateColumn(col.name.clone()));
            }
        }

        Ok(Table {
            columns,
            index,
            n_rows,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Whether the table has no rows (it may still have a header).
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&pos| &self.columns[pos])
    }

    /// Numeric columns in table order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    /// Cells of row `row` in column order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = &CellValue> {
        self.columns.iter().filter_map(move |c| c.values.get(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_cells_infers_narrowest_type() {
        let ints = Column::from_cells("a", vec![CellValue::Integer(1), CellValue::Null]);
        assert_eq!(ints.dtype, DType::Integer);

        let mixed = Column::from_cells("b", vec![CellValue::Integer(1), CellValue::Float(2.5)]);
        assert_eq!(mixed.dtype, DType::Float);
        assert_eq!(mixed.values[0], CellValue::Float(1.0));

        let text = Column::from_cells(
            "c",
            vec![CellValue::Integer(1), CellValue::Text("x".into())],
        );
        assert_eq!(text.dtype, DType::Text);
        assert_eq!(text.values[0], CellValue::Text("1".into()));
    }

    #[test]
    fn all_missing_column_is_float() {
        let col = Column::from_cells("a", vec![CellValue::Null, CellValue::Null]);
        assert_eq!(col.dtype, DType::Float);
        assert!(col.valid_numbers().is_empty());

        let empty = Column::from_cells("b", Vec::new());
        assert_eq!(empty.dtype, DType::Text);
    }

    #[test]
    fn table_rejects_ragged_and_duplicate_columns() {
        let a = Column::from_cells("a", vec![CellValue::Integer(1)]);
        let b = Column::from_cells("b", vec![CellValue::Integer(1), CellValue::Integer(2)]);
        assert!(matches!(
            Table::new(vec![a.clone(), b]),
            Err(TableError::RaggedColumn { .. })
        ));
        assert!(matches!(
            Table::new(vec![a.clone(), a]),
            Err(TableError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn column_lookup_is_explicit() {
        let table = Table::new(vec![Column::from_cells(
            "Task Completion",
            vec![CellValue::Integer(80)],
        )])
        .unwrap();
        assert!(table.has_column("Task Completion"));
        assert!(table.column("Bonus").is_none());
        assert_eq!(table.row(0).count(), 1);
    }
}
