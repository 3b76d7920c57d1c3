//! Utilities for presenting samples from the store
use anyhow::{Result, bail};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use table::MeroctlTable;
use tabled::{Table, Tabled};

pub(crate) mod rows;
pub(crate) mod table;

/// Data format for presenting samples
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// Human readable table of data
    #[default]
    Table,
    /// Comma-separated values for importing into a spreadsheet
    Csv,
    /// JSON-formatted objects
    Json,
    /// YAML-formatted objects
    Yaml,
}

impl OutputFormat {
    /// Present a single record. Tables are transposed so that every field gets its own line.
    pub(crate) fn present<T>(self, record: T) -> Result<String>
    where
        T: Tabled + Serialize,
    {
        match self {
            OutputFormat::Table => {
                let mut table = Table::builder([record])
                    .index()
                    .column(0)
                    .transpose()
                    .build();
                Ok(table.styled().to_string())
            }
            OutputFormat::Csv => bail!("CSV output is only available for listings"),
            OutputFormat::Json => Ok(serde_json::to_string(&record)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(&record)?),
        }
    }

    /// Present a listing of records, one per row. Tables end with the number of rows.
    pub(crate) fn present_all<I>(self, records: I) -> Result<String>
    where
        I: IntoIterator,
        I::Item: Tabled + Serialize,
    {
        let records: Vec<I::Item> = records.into_iter().collect();
        match self {
            OutputFormat::Table => {
                let count = records.len();
                Ok(format!("{}\n{count} found", Table::new(&records).styled()))
            }
            OutputFormat::Csv => to_csv(&records),
            OutputFormat::Json => Ok(serde_json::to_string(&records)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(&records)?),
        }
    }
}

fn to_csv<T: Serialize>(records: &[T]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    Ok(String::from_utf8(writer.into_inner()?)?)
}
