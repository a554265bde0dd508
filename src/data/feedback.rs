use std::collections::HashSet;

use super::model::{CellValue, Table};

/// Feedback typed for one employee. Shown once, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackEntry {
    pub employee: String,
    pub text: String,
}

impl FeedbackEntry {
    pub fn new(employee: impl Into<String>, text: impl Into<String>) -> Self {
        FeedbackEntry {
            employee: employee.into(),
            text: text.into(),
        }
    }

    /// The echo line; the text is passed through unmodified.
    pub fn message(&self) -> String {
        format!("Feedback for {}: {}", self.employee, self.text)
    }
}

/// Distinct non-missing labels of `label_column` in first-appearance order.
/// Empty when the column does not exist.
pub fn employee_labels(table: &Table, label_column: &str) -> Vec<String> {
    let Some(column) = table.column(label_column) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    column
        .values
        .iter()
        .filter(|v| !v.is_null() && seen.insert(*v))
        .map(CellValue::label)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_bytes;

    #[test]
    fn labels_are_unique_in_order() {
        let table = load_csv_bytes(b"Employee\nOSAMA\nAMAL\nOSAMA\n\nFARAH\n").unwrap();
        assert_eq!(employee_labels(&table, "Employee"), vec!["OSAMA", "AMAL", "FARAH"]);
        assert!(employee_labels(&table, "Name").is_empty());
    }

    #[test]
    fn numeric_ids_keep_full_precision() {
        let table = load_csv_bytes(b"Employee\n1.001\n1.002\n1.001\n").unwrap();
        assert_eq!(employee_labels(&table, "Employee"), vec!["1.001", "1.002"]);
    }

    #[test]
    fn message_echoes_text_verbatim() {
        let entry = FeedbackEntry::new("AMAL", "  Great *quarter*\nkeep going ");
        assert_eq!(entry.message(), "Feedback for AMAL:   Great *quarter*\nkeep going ");
    }
}
