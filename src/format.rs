use std::fmt;
use std::io::Read;
use std::str::FromStr;

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Cell data serialization format for input and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    Csv,
    Tsv,
}

impl Default for DataFormat {
    fn default() -> Self {
        DataFormat::Csv
    }
}

impl DataFormat {
    pub fn separator(&self) -> u8 {
        match self {
            DataFormat::Csv => b',',
            DataFormat::Tsv => b'\t',
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataFormat::Csv => write!(f, "csv"),
            DataFormat::Tsv => write!(f, "tsv"),
        }
    }
}

impl FromStr for DataFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(DataFormat::Csv),
            "tsv" => Ok(DataFormat::Tsv),
            other => bail!("invalid data format: {} (allowed: csv, tsv)", other),
        }
    }
}

/// Render a matrix of cell values as csv/tsv text.
pub fn format_values(rows: &[Vec<String>], format: DataFormat) -> Result<String> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(format.separator())
            .flexible(true)
            .from_writer(&mut buf);
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    Ok(String::from_utf8(buf)?)
}

/// Read csv/tsv text into a matrix of cell values. Rows may have differing
/// widths; blank lines are skipped.
pub fn scan_values<R: Read>(reader: R, format: DataFormat) -> Result<Vec<Vec<String>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(format.separator())
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn format_names() {
        assert_eq!(DataFormat::Csv.to_string(), "csv");
        assert_eq!(DataFormat::Tsv.to_string(), "tsv");
    }

    #[test]
    fn format_from_str() {
        assert_eq!("csv".parse::<DataFormat>().unwrap(), DataFormat::Csv);
        assert_eq!("tsv".parse::<DataFormat>().unwrap(), DataFormat::Tsv);
        assert!("blah".parse::<DataFormat>().is_err());
    }

    #[test]
    fn separators() {
        assert_eq!(DataFormat::Csv.separator(), b',');
        assert_eq!(DataFormat::Tsv.separator(), b'\t');
    }

    #[test]
    fn format_values_simple_csv() {
        let out = format_values(&rows(&[&["a", "b"], &["c", "d"]]), DataFormat::Csv).unwrap();
        assert_eq!(out, "a,b\nc,d\n");
    }

    #[test]
    fn format_values_simple_tsv() {
        let out = format_values(&rows(&[&["a", "b"], &["c", "d"]]), DataFormat::Tsv).unwrap();
        assert_eq!(out, "a\tb\nc\td\n");
    }

    #[test]
    fn format_values_single_cell() {
        let out = format_values(&rows(&[&["hello"]]), DataFormat::Csv).unwrap();
        assert_eq!(out, "hello\n");
    }

    #[test]
    fn format_values_quotes_separator() {
        let out = format_values(&rows(&[&["a,b", "c"]]), DataFormat::Csv).unwrap();
        assert_eq!(out, "\"a,b\",c\n");
    }

    #[test]
    fn format_values_empty() {
        assert_eq!(format_values(&[], DataFormat::Csv).unwrap(), "");
    }

    #[test]
    fn scan_values_simple() {
        let data = "a,b\nc,d\n";
        assert_eq!(
            scan_values(data.as_bytes(), DataFormat::Csv).unwrap(),
            rows(&[&["a", "b"], &["c", "d"]])
        );
    }

    #[test]
    fn scan_values_tsv() {
        let data = "a\tb\nc\td\n";
        assert_eq!(
            scan_values(data.as_bytes(), DataFormat::Tsv).unwrap(),
            rows(&[&["a", "b"], &["c", "d"]])
        );
    }

    #[test]
    fn scan_values_ragged_rows() {
        let data = "a,b,c\nd\n";
        assert_eq!(
            scan_values(data.as_bytes(), DataFormat::Csv).unwrap(),
            rows(&[&["a", "b", "c"], &["d"]])
        );
    }

    #[test]
    fn scan_values_round_trips_format() {
        let original = rows(&[&["a,b", "c"], &["d", "e\"f"]]);
        let text = format_values(&original, DataFormat::Csv).unwrap();
        assert_eq!(
            scan_values(text.as_bytes(), DataFormat::Csv).unwrap(),
            original
        );
    }
}
