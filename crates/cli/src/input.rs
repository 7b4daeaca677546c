//! Input loaders
//!
//! Samples and series come from CSV or JSON files; the format follows the
//! file extension, falling back to CSV then JSON.

use anyhow::{anyhow, bail, Context, Result};
use rightsizing_server::wire::WireDatapoint;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
    Unknown,
}

fn format_of(path: &Path) -> Format {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "csv" => Format::Csv,
        "json" => Format::Json,
        _ => Format::Unknown,
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Load utilisation samples for rightsizing
pub fn load_values(path: &Path, column: Option<&str>) -> Result<Vec<f64>> {
    let values = match format_of(path) {
        Format::Csv => values_from_csv(open(path)?, column),
        Format::Json => values_from_json(open(path)?, column),
        Format::Unknown => values_from_csv(open(path)?, column)
            .or_else(|_| values_from_json(open(path)?, column)),
    };
    values.with_context(|| format!("failed to load samples from {}", path.display()))
}

/// Load a `timestamp,value` series for forecasting
pub fn load_series(path: &Path) -> Result<Vec<WireDatapoint>> {
    let series = match format_of(path) {
        Format::Csv => series_from_csv(open(path)?),
        Format::Json => series_from_json(open(path)?),
        Format::Unknown => series_from_csv(open(path)?).or_else(|_| series_from_json(open(path)?)),
    };
    series.with_context(|| format!("failed to load series from {}", path.display()))
}

/// Column by index or header name; the first column by default
fn column_index(headers: &csv::StringRecord, column: Option<&str>) -> Result<usize> {
    match column {
        None => Ok(0),
        Some(col) => match col.parse::<usize>() {
            Ok(idx) => Ok(idx),
            Err(_) => headers
                .iter()
                .position(|h| h.trim() == col)
                .ok_or_else(|| anyhow!("column '{}' not found", col)),
        },
    }
}

pub fn values_from_csv<R: Read>(reader: R, column: Option<&str>) -> Result<Vec<f64>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers().context("failed to read headers")?.clone();
    let idx = column_index(&headers, column)?;

    let mut data = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to read row {}", row + 1))?;
        let field = record
            .get(idx)
            .ok_or_else(|| anyhow!("row {} has no column {}", row + 1, idx))?;
        let value = field
            .trim()
            .parse::<f64>()
            .with_context(|| format!("row {}: '{}' is not a number", row + 1, field))?;
        data.push(value);
    }
    Ok(data)
}

pub fn values_from_json<R: Read>(reader: R, column: Option<&str>) -> Result<Vec<f64>> {
    let json: serde_json::Value = serde_json::from_reader(reader).context("failed to parse JSON")?;

    let array = match &json {
        serde_json::Value::Array(arr) => arr,
        serde_json::Value::Object(obj) => obj
            .get("data")
            .and_then(|v| v.as_array())
            .ok_or_else(|| anyhow!("expected an array or an object with a 'data' array"))?,
        _ => bail!("expected an array or an object with a 'data' array"),
    };

    // Plain numbers, or objects carrying the column (default "value")
    let key = column.unwrap_or("value");
    array
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_f64()
                .or_else(|| v.get(key).and_then(|x| x.as_f64()))
                .ok_or_else(|| anyhow!("element {} has no numeric '{}'", i, key))
        })
        .collect()
}

pub fn series_from_csv<R: Read>(reader: R) -> Result<Vec<WireDatapoint>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers().context("failed to read headers")?.clone();
    let ts_idx = column_index(&headers, Some("timestamp"))?;
    let value_idx = column_index(&headers, Some("value"))?;

    let mut data = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to read row {}", row + 1))?;
        let timestamp = record
            .get(ts_idx)
            .unwrap_or("")
            .trim()
            .parse::<i64>()
            .with_context(|| format!("row {}: bad timestamp", row + 1))?;
        let value = record
            .get(value_idx)
            .unwrap_or("")
            .trim()
            .parse::<f64>()
            .with_context(|| format!("row {}: bad value", row + 1))?;
        data.push(WireDatapoint { timestamp, value });
    }
    Ok(data)
}

pub fn series_from_json<R: Read>(reader: R) -> Result<Vec<WireDatapoint>> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Series {
        Bare(Vec<WireDatapoint>),
        Wrapped { data: Vec<WireDatapoint> },
    }

    let series: Series = serde_json::from_reader(reader).context("failed to parse JSON series")?;
    Ok(match series {
        Series::Bare(data) | Series::Wrapped { data } => data,
    })
}
