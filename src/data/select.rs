use std::marker::PhantomData;

use super::model::Table;

// ---------------------------------------------------------------------------
// Default column resolver
// ---------------------------------------------------------------------------

/// Metric columns picked when a file is loaded, if present.
pub const DEFAULT_METRICS: [&str; 4] = [
    "Task Completion",
    "Quality Score",
    "Attendance",
    "Engagement Score",
];

/// Segment columns picked when a file is loaded, if present.
pub const DEFAULT_SEGMENTS: [&str; 3] = ["Department", "Education", "Gender"];

/// The candidates that exist in `columns`, in candidate order, each once.
pub fn resolve_columns<S: AsRef<str>>(columns: &[String], candidates: &[S]) -> Vec<String> {
    let mut resolved: Vec<String> = Vec::new();
    for candidate in candidates {
        let name = candidate.as_ref();
        if columns.iter().any(|c| c == name) && !resolved.iter().any(|r| r == name) {
            resolved.push(name.to_string());
        }
    }
    resolved
}

// ---------------------------------------------------------------------------
// Column selections
// ---------------------------------------------------------------------------

/// Tags what a [`ColumnSelection`] is used for, so metric and segment picks
/// cannot be mixed up.
pub trait SelectionKind {
    const LABEL: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segments;

impl SelectionKind for Metrics {
    const LABEL: &'static str = "metric";
}

impl SelectionKind for Segments {
    const LABEL: &'static str = "segment";
}

/// An ordered set of column names. Every name exists in the table the
/// selection was built or last edited against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection<K> {
    names: Vec<String>,
    kind: PhantomData<K>,
}

pub type MetricSelection = ColumnSelection<Metrics>;
pub type SegmentSelection = ColumnSelection<Segments>;

impl<K> Default for ColumnSelection<K> {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            kind: PhantomData,
        }
    }
}

impl<K: SelectionKind> ColumnSelection<K> {
    /// Default selection: the candidates present in the table.
    pub fn resolve<S: AsRef<str>>(table: &Table, candidates: &[S]) -> Self {
        Self {
            names: resolve_columns(&table.column_names(), candidates),
            kind: PhantomData,
        }
    }

    /// User override. Unknown names are dropped rather than rejected and the
    /// user's order is kept.
    pub fn from_user<S: AsRef<str>>(table: &Table, picks: &[S]) -> Self {
        let mut selection = Self::default();
        for pick in picks {
            let name = pick.as_ref();
            if !table.has_column(name) {
                log::warn!("Ignoring unknown {} column '{name}'", K::LABEL);
                continue;
            }
            if !selection.contains(name) {
                selection.names.push(name.to_string());
            }
        }
        selection
    }

    /// Add or remove `name`. Returns false when the name is not a column.
    pub fn toggle(&mut self, table: &Table, name: &str) -> bool {
        if let Some(pos) = self.names.iter().position(|n| n == name) {
            self.names.remove(pos);
            return true;
        }
        if !table.has_column(name) {
            log::warn!("Ignoring unknown {} column '{name}'", K::LABEL);
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column};
    use proptest::prelude::*;

    fn table(names: &[&str]) -> Table {
        Table::new(
            names
                .iter()
                .map(|n| Column::from_cells(*n, vec![CellValue::Integer(1)]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn resolver_keeps_candidate_order() {
        let columns: Vec<String> = ["Attendance", "Employee", "Task Completion"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let resolved = resolve_columns(&columns, &DEFAULT_METRICS);
        assert_eq!(resolved, vec!["Task Completion", "Attendance"]);
    }

    #[test]
    fn resolver_only_returns_names_in_both_lists() {
        let columns: Vec<String> = vec!["Department".into(), "Region".into()];
        let resolved = resolve_columns(&columns, &["Gender", "Department", "Department"]);
        assert_eq!(resolved, vec!["Department"]);
        assert!(resolve_columns(&columns, &DEFAULT_METRICS).is_empty());
    }

    #[test]
    fn unknown_user_pick_is_dropped() {
        let t = table(&["Employee", "Task Completion"]);
        let sel = MetricSelection::from_user(&t, &["Bonus", "Task Completion", "Task Completion"]);
        assert_eq!(sel.names(), ["Task Completion"]);
    }

    #[test]
    fn toggle_refuses_missing_columns() {
        let t = table(&["Department", "Gender"]);
        let mut sel = SegmentSelection::resolve(&t, &DEFAULT_SEGMENTS);
        assert_eq!(sel.names(), ["Department", "Gender"]);

        assert!(sel.toggle(&t, "Department"));
        assert_eq!(sel.names(), ["Gender"]);
        assert!(!sel.toggle(&t, "Education"));
        assert_eq!(sel.len(), 1);
    }

    fn names() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            prop::sample::select(vec![
                "Employee", "Department", "Gender", "Attendance", "Quality Score", "Bonus",
            ])
            .prop_map(str::to_string),
            0..8,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn resolved_names_are_in_both_lists_in_candidate_order(
            columns in names(),
            candidates in names(),
        ) {
            let resolved = resolve_columns(&columns, &candidates);

            for name in &resolved {
                prop_assert!(columns.contains(name));
                prop_assert!(candidates.contains(name));
            }

            let mut expected: Vec<String> = Vec::new();
            for c in &candidates {
                if columns.contains(c) && !expected.contains(c) {
                    expected.push(c.clone());
                }
            }
            prop_assert_eq!(resolved, expected);
        }
    }
}
