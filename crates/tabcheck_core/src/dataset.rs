//! Tabular data representation for validation.
//!
//! A [`DataSet`] is a row-ordered, column-addressable table. Every row carries
//! a [`RowId`] that identifies it in failure reports; ids are whatever the
//! table provider assigned and need not be contiguous or start at zero.

use crate::{Result, ValidationError};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A value in a table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataValue {
    /// Null/missing value
    Null,
    /// String value
    String(String),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Timestamp value (ISO 8601 string)
    Timestamp(String),
}

static NULL_VALUE: DataValue = DataValue::Null;

impl DataValue {
    /// Returns true if this value counts as missing.
    ///
    /// A NaN float is missing, the same as an empty cell.
    pub fn is_null(&self) -> bool {
        match self {
            DataValue::Null => true,
            DataValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::String(_) => "string",
            DataValue::Int(_) => "int",
            DataValue::Float(_) => "float",
            DataValue::Bool(_) => "bool",
            DataValue::Timestamp(_) => "datetime",
        }
    }

    /// Attempts to get this value as a string.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get this value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            DataValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to get this value as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            DataValue::Float(f) => Some(*f),
            DataValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Attempts to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to get this value as a timestamp string.
    pub fn as_timestamp(&self) -> Option<&str> {
        match self {
            DataValue::Timestamp(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value for human-readable reports, quoting text.
    pub fn repr(&self) -> String {
        match self {
            DataValue::String(s) | DataValue::Timestamp(s) => format!("'{}'", s),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => write!(f, "null"),
            DataValue::String(s) | DataValue::Timestamp(s) => write!(f, "{}", s),
            DataValue::Int(i) => write!(f, "{}", i),
            DataValue::Float(v) => write!(f, "{}", v),
            DataValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Int(i)
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        DataValue::Float(f)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DataValue::Null, Into::into)
    }
}

impl From<&serde_json::Value> for DataValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => DataValue::Null,
            serde_json::Value::Bool(b) => DataValue::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => DataValue::Int(i),
                None => n.as_f64().map_or(DataValue::Null, DataValue::Float),
            },
            serde_json::Value::String(s) => DataValue::String(s.clone()),
            // Nested structures are kept in their JSON text form
            other => DataValue::String(other.to_string()),
        }
    }
}

/// Identifier of a row in the source table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RowId {
    /// Plain ordinal position assigned by the provider
    Ordinal(usize),
    /// Provider-defined label
    Label(String),
}

impl RowId {
    /// Returns the identifier as shown to humans: ordinals become 1-indexed
    /// row numbers, labels are shown as-is.
    pub fn display_number(&self) -> String {
        match self {
            RowId::Ordinal(n) => (n + 1).to_string(),
            RowId::Label(label) => label.clone(),
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Ordinal(n) => write!(f, "{}", n),
            RowId::Label(label) => write!(f, "{}", label),
        }
    }
}

/// A single row of data.
pub type DataRow = HashMap<String, DataValue>;

/// A table of rows validated by the engine.
///
/// The table is read-only to validators; rows are traversed in insertion order.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    columns: Vec<String>,
    row_ids: Vec<RowId>,
    rows: Vec<DataRow>,
}

impl DataSet {
    /// Creates a new empty dataset.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a new dataset from rows, with ordinal row ids `0..n`.
    ///
    /// The column list is the union of all row keys, in order of first
    /// appearance (keys within a single row are taken in sorted order).
    pub fn from_rows(rows: Vec<DataRow>) -> Self {
        let mut dataset = Self::empty();
        for row in rows {
            dataset.add_row(row);
        }
        dataset
    }

    /// Creates a new dataset from named columns.
    ///
    /// Columns shorter than the longest one are padded with nulls.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<DataValue>)>) -> Self {
        let columns: Vec<(String, Vec<DataValue>)> = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .collect();
        let height = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

        let mut rows: Vec<DataRow> = (0..height).map(|_| DataRow::new()).collect();
        for (name, values) in &columns {
            for (row, value) in rows.iter_mut().zip(values.iter()) {
                row.insert(name.clone(), value.clone());
            }
        }

        Self {
            columns: columns.into_iter().map(|(name, _)| name).collect(),
            row_ids: (0..height).map(RowId::Ordinal).collect(),
            rows,
        }
    }

    /// Creates a dataset from a JSON array of objects (record orientation).
    ///
    /// Keys missing from a record read as null.
    pub fn from_json_records(value: &serde_json::Value) -> Result<Self> {
        let records = value.as_array().ok_or_else(|| {
            ValidationError::InvalidTable("expected a JSON array of records".to_string())
        })?;

        let mut dataset = Self::empty();
        for (idx, record) in records.iter().enumerate() {
            let object = record.as_object().ok_or_else(|| {
                ValidationError::InvalidTable(format!("record at index {} is not an object", idx))
            })?;
            for key in object.keys() {
                dataset.ensure_column(key);
            }
            dataset.rows.push(
                object
                    .iter()
                    .map(|(key, value)| (key.clone(), DataValue::from(value)))
                    .collect(),
            );
            dataset.row_ids.push(RowId::Ordinal(idx));
        }

        Ok(dataset)
    }

    /// Replaces the row identifiers.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidTable` if the number of ids differs
    /// from the number of rows or if an id is repeated.
    pub fn with_row_ids(mut self, ids: Vec<RowId>) -> Result<Self> {
        if ids.len() != self.rows.len() {
            return Err(ValidationError::InvalidTable(format!(
                "{} row ids given for {} rows",
                ids.len(),
                self.rows.len()
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = ids.iter().find(|id| !seen.insert(*id)) {
            return Err(ValidationError::InvalidTable(format!(
                "duplicate row id '{}'",
                dup
            )));
        }
        self.row_ids = ids;
        Ok(self)
    }

    /// Returns the number of rows in the dataset.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the column names in table order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns true if the table has a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Returns the `(row id, value)` pairs of a column in row order, or `None`
    /// if the column does not exist.
    pub fn column<'a>(
        &'a self,
        name: &'a str,
    ) -> Option<impl Iterator<Item = (&'a RowId, &'a DataValue)> + 'a> {
        if !self.has_column(name) {
            return None;
        }
        Some(
            self.row_ids
                .iter()
                .zip(self.rows.iter())
                .map(move |(id, row)| (id, row.get(name).unwrap_or(&NULL_VALUE))),
        )
    }

    /// Returns an iterator over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &DataRow> {
        self.rows.iter()
    }

    /// Returns the row identifiers in row order.
    pub fn row_ids(&self) -> &[RowId] {
        &self.row_ids
    }

    /// Gets a specific row by position.
    pub fn get_row(&self, index: usize) -> Option<&DataRow> {
        self.rows.get(index)
    }

    /// Adds a row to the dataset with the next ordinal id.
    pub fn add_row(&mut self, row: DataRow) {
        let mut keys: Vec<&String> = row.keys().collect();
        keys.sort();
        for key in keys {
            if !self.columns.contains(key) {
                self.columns.push(key.clone());
            }
        }
        let next = self.row_ids.len();
        self.row_ids.push(RowId::Ordinal(next));
        self.rows.push(row);
    }

    fn ensure_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
    }
}

impl FromIterator<DataRow> for DataSet {
    fn from_iter<T: IntoIterator<Item = DataRow>>(iter: T) -> Self {
        Self::from_rows(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_data_value_types() {
        assert_eq!(DataValue::Null.type_name(), "null");
        assert_eq!(DataValue::String("test".into()).type_name(), "string");
        assert_eq!(DataValue::Int(42).type_name(), "int");
        assert_eq!(DataValue::Float(3.5).type_name(), "float");
        assert_eq!(DataValue::Bool(true).type_name(), "bool");
    }

    #[test]
    fn test_nan_is_null() {
        assert!(DataValue::Float(f64::NAN).is_null());
        assert!(!DataValue::Float(0.0).is_null());
        assert!(DataValue::from(None::<i64>).is_null());
    }

    #[test]
    fn test_data_value_conversions() {
        let val = DataValue::String("hello".into());
        assert_eq!(val.as_string(), Some("hello"));
        assert_eq!(val.as_int(), None);

        let val = DataValue::Int(42);
        assert_eq!(val.as_int(), Some(42));
        assert_eq!(val.as_float(), Some(42.0));
        assert_eq!(val.as_string(), None);
    }

    #[test]
    fn test_from_columns_pads_with_null() {
        let dataset = DataSet::from_columns(vec![
            ("a", vec![DataValue::Int(1), DataValue::Int(2)]),
            ("b", vec![DataValue::from("x")]),
        ]);

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.columns(), &["a".to_string(), "b".to_string()]);
        let b: Vec<_> = dataset.column("b").unwrap().map(|(_, v)| v.clone()).collect();
        assert_eq!(b, vec![DataValue::from("x"), DataValue::Null]);
    }

    #[test]
    fn test_missing_column() {
        let dataset = DataSet::from_columns(vec![("a", vec![DataValue::Int(1)])]);
        assert!(dataset.column("zzz").is_none());
        assert!(!dataset.has_column("zzz"));
    }

    #[test]
    fn test_from_json_records() {
        let value = json!([
            {"id": 1, "name": "alice", "score": 9.5},
            {"id": 2, "active": true},
        ]);

        let dataset = DataSet::from_json_records(&value).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(dataset.has_column("active"));

        let names: Vec<_> = dataset.column("name").unwrap().collect();
        assert_eq!(names[0], (&RowId::Ordinal(0), &DataValue::from("alice")));
        assert_eq!(names[1], (&RowId::Ordinal(1), &DataValue::Null));
    }

    #[test]
    fn test_from_json_records_rejects_non_array() {
        let result = DataSet::from_json_records(&json!({"id": 1}));
        assert!(matches!(result, Err(ValidationError::InvalidTable(_))));
    }

    #[test]
    fn test_with_row_ids() {
        let dataset = DataSet::from_columns(vec![("a", vec![DataValue::Int(1), DataValue::Int(2)])])
            .with_row_ids(vec![RowId::Ordinal(10), RowId::Label("last".into())])
            .unwrap();

        let ids: Vec<_> = dataset.column("a").unwrap().map(|(id, _)| id.clone()).collect();
        assert_eq!(ids, vec![RowId::Ordinal(10), RowId::Label("last".into())]);

        let bad = DataSet::from_columns(vec![("a", vec![DataValue::Int(1)])])
            .with_row_ids(vec![RowId::Ordinal(0), RowId::Ordinal(1)]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_row_id_display_number() {
        assert_eq!(RowId::Ordinal(0).display_number(), "1");
        assert_eq!(RowId::Label("r-7".into()).display_number(), "r-7");
    }

    #[test]
    fn test_add_row_assigns_ordinals() {
        let mut dataset = DataSet::empty();
        let mut row = HashMap::new();
        row.insert("id".to_string(), DataValue::Int(1));
        dataset.add_row(row.clone());
        dataset.add_row(row);

        assert_eq!(dataset.row_ids(), &[RowId::Ordinal(0), RowId::Ordinal(1)]);
        assert_eq!(dataset.get_row(1).unwrap().get("id"), Some(&DataValue::Int(1)));
    }
}
