use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int16Array, Int32Array,
    Int64Array, Int8Array, StringArray, UInt16Array, UInt32Array, UInt8Array,
};
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{CellValue, Column, DType, Table};

/// Cell texts read as missing values. These are the NA spellings that show
/// up in spreadsheets exported by common HR and analytics tools.
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row followed by data rows (the upload format)
/// * `.json`    – records orientation, `[{ "Employee": "AMAL", ... }, ...]`
/// * `.parquet` – flat columns of strings, integers, floats or booleans
pub fn load_file(path: &Path) -> Result<Table, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv_bytes(&std::fs::read(path)?),
        "json" => load_json(&std::fs::read_to_string(path)?),
        "parquet" | "pq" => load_parquet(std::fs::File::open(path)?),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

/// Parse an in-memory CSV upload.
pub fn load_csv_bytes(bytes: &[u8]) -> Result<Table, LoadError> {
    load_csv_reader(bytes)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: one header row with column names, then one record per
/// employee. Ragged rows and invalid UTF-8 fail the whole load.
pub fn load_csv_reader<R: Read>(reader: R) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(LoadError::NoColumns);
    }

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result?;
        for (col_idx, field) in record.iter().enumerate() {
            raw[col_idx].push(field.to_string());
        }
    }

    let columns = mangle_duplicate_names(headers)
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| infer_text_column(name, cells))
        .collect();

    Ok(Table::new(columns)?)
}

/// Rename repeated header names to `A`, `A.1`, `A.2`.
fn mangle_duplicate_names(headers: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut out = Vec::with_capacity(headers.len());

    for name in headers {
        let mut candidate = name.clone();
        let mut suffix = 1;
        while taken.contains(&candidate) {
            candidate = format!("{name}.{suffix}");
            suffix += 1;
        }
        taken.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

fn is_missing(s: &str) -> bool {
    MISSING_MARKERS.contains(&s)
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Pick the column dtype from its raw cell texts. Text columns keep the
/// original cell text untouched.
fn infer_text_column(name: String, cells: Vec<String>) -> Column {
    let present = || cells.iter().filter(|s| !is_missing(s));

    let mut any_present = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;
    for s in present() {
        any_present = true;
        let t = s.trim();
        all_int &= t.parse::<i64>().is_ok();
        all_float &= t.parse::<f64>().is_ok();
        all_bool &= parse_bool(t).is_some();
    }

    let dtype = if !any_present {
        if cells.is_empty() {
            DType::Text
        } else {
            DType::Float
        }
    } else if all_int {
        DType::Integer
    } else if all_float {
        DType::Float
    } else if all_bool {
        DType::Bool
    } else {
        DType::Text
    };

    let values = cells
        .into_iter()
        .map(|s| {
            if is_missing(&s) {
                return CellValue::Null;
            }
            let t = s.trim();
            match dtype {
                DType::Integer => t.parse().map(CellValue::Integer).unwrap_or(CellValue::Null),
                DType::Float => float_cell(t.parse::<f64>().ok()),
                DType::Bool => parse_bool(t).map(CellValue::Bool).unwrap_or(CellValue::Null),
                DType::Text => CellValue::Text(s),
            }
        })
        .collect();

    Column::new(name, dtype, values)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Employee": "AMAL", "Task Completion": 80, "Department": "Sales" },
///   ...
/// ]
/// ```
///
/// Column order follows first appearance; keys missing from a record are
/// read as missing values.
pub fn load_json(text: &str) -> Result<Table, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root
        .as_array()
        .ok_or_else(|| LoadError::JsonShape("expected top-level JSON array".into()))?;

    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::JsonShape(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }
    if names.is_empty() {
        return Err(LoadError::NoColumns);
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let cells = records
                .iter()
                .map(|rec| rec.get(&name).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect();
            Column::from_cells(name, cells)
        })
        .collect();

    Ok(Table::new(columns)?)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per table column.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Nested or exotic types are rendered
/// to text.
pub fn load_parquet(file: std::fs::File) -> Result<Table, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    if names.is_empty() {
        return Err(LoadError::NoColumns);
    }

    let reader = builder.build()?;
    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];

    for batch_result in reader {
        let batch = batch_result?;
        for (col_idx, column_cells) in cells.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            for row in 0..batch.num_rows() {
                column_cells.push(extract_cell(array, row)?);
            }
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::from_cells(name, values))
        .collect();

    Ok(Table::new(columns)?)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue, LoadError> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let any = col.as_any();
    let cell = match col.data_type() {
        DataType::Utf8 => match any.downcast_ref::<StringArray>() {
            Some(s) => CellValue::Text(s.value(row).to_string()),
            None => CellValue::Text(array_value_to_string(col.as_ref(), row)?),
        },
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => int_cell(any.downcast_ref::<Int8Array>().map(|a| a.value(row) as i64)),
        DataType::Int16 => int_cell(any.downcast_ref::<Int16Array>().map(|a| a.value(row) as i64)),
        DataType::Int32 => int_cell(any.downcast_ref::<Int32Array>().map(|a| a.value(row) as i64)),
        DataType::Int64 => int_cell(any.downcast_ref::<Int64Array>().map(|a| a.value(row))),
        DataType::UInt8 => int_cell(any.downcast_ref::<UInt8Array>().map(|a| a.value(row) as i64)),
        DataType::UInt16 => {
            int_cell(any.downcast_ref::<UInt16Array>().map(|a| a.value(row) as i64))
        }
        DataType::UInt32 => {
            int_cell(any.downcast_ref::<UInt32Array>().map(|a| a.value(row) as i64))
        }
        DataType::Float32 => float_cell(
            any.downcast_ref::<Float32Array>()
                .map(|a| a.value(row) as f64),
        ),
        DataType::Float64 => float_cell(any.downcast_ref::<Float64Array>().map(|a| a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| CellValue::Bool(a.value(row)))
            .unwrap_or(CellValue::Null),
        _ => CellValue::Text(array_value_to_string(col.as_ref(), row)?),
    };
    Ok(cell)
}

fn int_cell(value: Option<i64>) -> CellValue {
    value.map(CellValue::Integer).unwrap_or(CellValue::Null)
}

fn float_cell(value: Option<f64>) -> CellValue {
    match value {
        Some(v) if !v.is_nan() => CellValue::Float(v),
        _ => CellValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "Employee,Department,Task Completion,Quality Score,Remote\n\
                          AMAL,Sales,80,75.5,true\n\
                          EMAD,IT,90,,False\n\
                          OSAMA,Sales,85,78,TRUE\n";

    #[test]
    fn csv_columns_keep_header_order_and_types() {
        let table = load_csv_bytes(SAMPLE.as_bytes()).unwrap();
        assert_eq!(
            table.column_names(),
            vec!["Employee", "Department", "Task Completion", "Quality Score", "Remote"]
        );
        assert_eq!(table.len(), 3);
        assert_eq!(table.column("Employee").unwrap().dtype, DType::Text);
        assert_eq!(table.column("Task Completion").unwrap().dtype, DType::Integer);
        assert_eq!(table.column("Remote").unwrap().dtype, DType::Bool);

        let quality = table.column("Quality Score").unwrap();
        assert_eq!(quality.dtype, DType::Float);
        assert_eq!(quality.values[1], CellValue::Null);
    }

    #[test]
    fn missing_markers_become_null() {
        let table = load_csv_bytes(b"Name,Score\nA,NA\nB,n/a\nC,12\n").unwrap();
        let score = table.column("Score").unwrap();
        assert_eq!(score.dtype, DType::Integer);
        assert_eq!(score.values, vec![CellValue::Null, CellValue::Null, CellValue::Integer(12)]);
    }

    #[test]
    fn any_nan_spelling_becomes_null() {
        let table = load_csv_bytes(b"Score,Name\nNAN,a\n-nan,b\nnAn,c\n80,d\n").unwrap();
        let score = table.column("Score").unwrap();
        assert_eq!(score.dtype, DType::Float);
        assert_eq!(
            score.values,
            vec![CellValue::Null, CellValue::Null, CellValue::Null, CellValue::Float(80.0)]
        );

        let again = load_csv_bytes(&crate::data::export::to_csv(&table).unwrap()).unwrap();
        assert_eq!(again, table);
    }

    #[test]
    fn text_cells_are_kept_verbatim() {
        let table = load_csv_bytes(b"Code\n007\n x1 \n").unwrap();
        let code = table.column("Code").unwrap();
        assert_eq!(code.dtype, DType::Text);
        assert_eq!(code.values[0], CellValue::Text("007".into()));
        assert_eq!(code.values[1], CellValue::Text(" x1 ".into()));
    }

    #[test]
    fn ragged_rows_fail_without_partial_table() {
        let err = load_csv_bytes(b"a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn empty_input_has_no_columns() {
        assert!(matches!(load_csv_bytes(b""), Err(LoadError::NoColumns)));
    }

    #[test]
    fn header_only_file_gives_empty_table() {
        let table = load_csv_bytes(b"Employee,Attendance\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_names(), vec!["Employee", "Attendance"]);
    }

    #[test]
    fn duplicate_headers_are_mangled() {
        let table = load_csv_bytes(b"A,A,A.1,A\n1,2,3,4\n").unwrap();
        assert_eq!(table.column_names(), vec!["A", "A.1", "A.1.1", "A.2"]);
    }

    #[test]
    fn json_records_fill_missing_keys() {
        let table = load_json(
            r#"[{"Employee": "AMAL", "Attendance": 95},
                {"Employee": "EMAD", "Attendance": 90.5, "Gender": "M"}]"#,
        )
        .unwrap();
        assert_eq!(table.column_names(), vec!["Employee", "Attendance", "Gender"]);
        assert_eq!(table.column("Attendance").unwrap().dtype, DType::Float);
        assert_eq!(table.column("Gender").unwrap().values[0], CellValue::Null);
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(matches!(load_json("{}"), Err(LoadError::JsonShape(_))));
        assert!(matches!(load_json("[1, 2]"), Err(LoadError::JsonShape(_))));
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 3);

        let other = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(
            load_file(other.path()),
            Err(LoadError::UnsupportedExtension(ext)) if ext == "txt"
        ));
    }
}
