use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use super::error::ExportError;
use super::model::{CellValue, Table};

/// Download formats offered for the loaded table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Spreadsheet,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Spreadsheet];

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Spreadsheet => "Excel",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Spreadsheet => "xlsx",
        }
    }

    /// Suggested download name, e.g. `Employee_Performance.xlsx`.
    pub fn file_name(self) -> String {
        format!("Employee_Performance.{}", self.extension())
    }
}

/// Encode the whole table. A table without rows still yields its header.
pub fn encode(table: &Table, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Csv => to_csv(table),
        ExportFormat::Spreadsheet => to_xlsx(table),
    }
}

/// Encode and write to `path`.
pub fn save(table: &Table, format: ExportFormat, path: &Path) -> Result<(), ExportError> {
    let bytes = encode(table, format)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Header plus one record per row, no index column. The output reloads
/// through `load_csv_bytes` into an equal table.
pub fn to_csv(table: &Table) -> Result<Vec<u8>, ExportError> {
    if table.n_columns() == 0 {
        return Ok(Vec::new());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns().iter().map(|c| c.name.as_str()))?;

    for row in 0..table.len() {
        writer.write_record(table.row(row).map(csv_field))?;
    }

    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

fn csv_field(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::Bool(true) => "True".to_string(),
        CellValue::Bool(false) => "False".to_string(),
        CellValue::Integer(i) => i.to_string(),
        // Keep a trailing ".0" on integral floats so they reload as floats.
        CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => format!("{v:.1}"),
        CellValue::Float(v) if v.is_nan() => String::new(),
        CellValue::Float(v) => v.to_string(),
        CellValue::Text(s) => s.clone(),
    }
}

// ---------------------------------------------------------------------------
// XLSX
// ---------------------------------------------------------------------------

/// Single worksheet with a bold header row. Missing cells stay blank.
pub fn to_xlsx(table: &Table) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Sheet1")?;

    for (c, column) in table.columns().iter().enumerate() {
        let col = c as u16;
        worksheet.write_string_with_format(0, col, &column.name, &header)?;

        for (r, value) in column.values.iter().enumerate() {
            let row = (r + 1) as u32;
            match value {
                CellValue::Null => {}
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                CellValue::Integer(i) => {
                    worksheet.write_number(row, col, *i as f64)?;
                }
                CellValue::Float(v) if v.is_finite() => {
                    worksheet.write_number(row, col, *v)?;
                }
                CellValue::Float(_) => {}
                CellValue::Text(s) => {
                    worksheet.write_string(row, col, s)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_bytes;
    use proptest::prelude::*;

    const DATA: &str = "Employee,Department,Task Completion,Quality Score,Remote,Notes\n\
                        AMAL,Sales,80,75.5,True,\"says \"\"hi\"\", often\"\n\
                        EMAD,IT,90,,False,\n\
                        OSAMA,,85,78.0,True,\"multi\nline\"\n";

    #[test]
    fn csv_round_trip_preserves_table() {
        let table = load_csv_bytes(DATA.as_bytes()).unwrap();
        let bytes = encode(&table, ExportFormat::Csv).unwrap();
        let reloaded = load_csv_bytes(&bytes).unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn integral_floats_stay_floats() {
        let table = load_csv_bytes(b"Score\n1.0\n2.5\n").unwrap();
        let text = String::from_utf8(to_csv(&table).unwrap()).unwrap();
        assert_eq!(text, "Score\n1.0\n2.5\n");
    }

    #[test]
    fn header_only_table_round_trips() {
        let table = load_csv_bytes(b"Employee,Attendance\n").unwrap();
        let bytes = encode(&table, ExportFormat::Csv).unwrap();
        assert_eq!(bytes, b"Employee,Attendance\n");

        let reloaded = load_csv_bytes(&bytes).unwrap();
        assert!(reloaded.is_empty());
        assert_eq!(reloaded.column_names(), table.column_names());
    }

    #[test]
    fn spreadsheet_is_a_zip_container() {
        let table = load_csv_bytes(DATA.as_bytes()).unwrap();
        let bytes = encode(&table, ExportFormat::Spreadsheet).unwrap();
        assert!(bytes.starts_with(b"PK"));

        let empty = load_csv_bytes(b"Employee\n").unwrap();
        assert!(encode(&empty, ExportFormat::Spreadsheet).unwrap().starts_with(b"PK"));
    }

    #[test]
    fn download_names_match_formats() {
        assert_eq!(ExportFormat::Csv.file_name(), "Employee_Performance.csv");
        assert_eq!(ExportFormat::Spreadsheet.file_name(), "Employee_Performance.xlsx");
    }

    fn cell_text() -> impl Strategy<Value = String> {
        prop_oneof![
            any::<i32>().prop_map(|i| i.to_string()),
            (-1.0e6f64..1.0e6).prop_map(|v| v.to_string()),
            Just("75.0".to_string()),
            Just("NAN".to_string()),
            Just("inf".to_string()),
            prop::sample::select(vec!["true", "False", "TRUE"]).prop_map(str::to_string),
            prop::sample::select(vec!["", "NA", "n/a", "null", "#N/A"]).prop_map(str::to_string),
            "[a-zA-Z0-9 .,\"-]{1,8}",
        ]
    }

    fn csv_upload() -> impl Strategy<Value = Vec<u8>> {
        (2usize..5).prop_flat_map(|width| {
            prop::collection::vec(prop::collection::vec(cell_text(), width), 0..8).prop_map(
                move |rows| {
                    let mut writer = csv::Writer::from_writer(Vec::new());
                    writer
                        .write_record((0..width).map(|i| format!("col{i}")))
                        .unwrap();
                    for row in &rows {
                        writer.write_record(row).unwrap();
                    }
                    writer.into_inner().unwrap()
                },
            )
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn any_loaded_table_survives_csv_round_trip(upload in csv_upload()) {
            let table = load_csv_bytes(&upload).unwrap();
            let bytes = encode(&table, ExportFormat::Csv).unwrap();
            let reloaded = load_csv_bytes(&bytes).unwrap();
            prop_assert_eq!(reloaded, table);
        }
    }

    #[test]
    fn save_writes_encoded_bytes() {
        let table = load_csv_bytes(b"Employee,Attendance\nAMAL,95\n").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ExportFormat::Csv.file_name());
        save(&table, ExportFormat::Csv, &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"Employee,Attendance\nAMAL,95\n");
    }
}
