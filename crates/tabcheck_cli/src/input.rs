use anyhow::{Context, Result, bail};
use std::io::Read;
use std::path::Path;
use tabcheck_core::{DataSet, DataValue};

/// Cell texts read as null, on top of the empty cell.
const NULL_MARKERS: [&str; 7] = ["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Supported input data formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

/// Picks the input format from the file extension.
pub fn detect_format(path: &Path) -> Result<InputFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("csv") => Ok(InputFormat::Csv),
        Some("json") => Ok(InputFormat::Json),
        Some(other) => bail!(
            "Unsupported input file extension '.{}', use .csv or .json",
            other
        ),
        None => bail!("Input file has no extension: {}", path.display()),
    }
}

/// Loads the table to validate from a CSV file or a JSON array of records.
pub fn load_dataset(path: &Path) -> Result<DataSet> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    match format {
        InputFormat::Csv => read_csv(content.as_bytes())
            .with_context(|| format!("Failed to read CSV records from {}", path.display())),
        InputFormat::Json => {
            let records: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("Input file is not valid JSON: {}", path.display()))?;
            DataSet::from_json_records(&records)
                .with_context(|| format!("Failed to load records from {}", path.display()))
        }
    }
}

/// Reads CSV with a header row into a dataset, keeping the header's column order.
pub fn read_csv<R: Read>(reader: R) -> Result<DataSet> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut columns: Vec<Vec<DataValue>> = vec![Vec::new(); headers.len()];

    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV record {}", idx + 1))?;
        for (column, cell) in columns.iter_mut().zip(record.iter()) {
            column.push(parse_cell(cell));
        }
    }

    Ok(DataSet::from_columns(
        headers.into_iter().zip(columns).collect(),
    ))
}

/// Infers a typed value from one CSV cell.
fn parse_cell(cell: &str) -> DataValue {
    if cell.is_empty() || NULL_MARKERS.contains(&cell) {
        return DataValue::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return DataValue::Int(i);
    }
    if let Ok(f) = cell.parse::<f64>() {
        return DataValue::Float(f);
    }
    match cell {
        "True" | "TRUE" | "true" => DataValue::Bool(true),
        "False" | "FALSE" | "false" => DataValue::Bool(false),
        _ => DataValue::String(cell.to_string()),
    }
}
