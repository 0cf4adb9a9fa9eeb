//! SQL queries executed by the server (`ExecuteQueryRq`).
//!
//! The server answers with one `Row` element per CSV line; the first line
//! holds the column names.

use fishbowl_core::{DomainError, DomainResult, Fields, Request, ValueObject};

use crate::element::Element;
use crate::error::CodecError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteQuery {
    sql: String,
}

impl ExecuteQuery {
    pub fn new(sql: impl Into<String>) -> DomainResult<Self> {
        let sql = sql.into();
        if sql.trim().is_empty() {
            return Err(DomainError::validation("query cannot be empty"));
        }
        Ok(Self { sql })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl ValueObject for ExecuteQuery {}

impl Request for ExecuteQuery {
    const REQUEST_NODE: &'static str = "ExecuteQueryRq";
    const RESPONSE_NODE: &'static str = "ExecuteQueryRs";
    const AUDIT_LABEL: &'static str = "query";

    fn to_fields(&self) -> Fields {
        Fields::new().with("Query", &self.sql)
    }

    fn from_fields(fields: &Fields) -> DomainResult<Self> {
        Self::new(fields.require("Query")?)
    }
}

/// Turn the `Row` descendants of an `ExecuteQueryRs` node into records keyed
/// by column name. Column lookup on the returned [`Fields`] ignores case.
pub fn parse_rows(node: &Element) -> Result<Vec<Fields>, CodecError> {
    let mut csv_text = String::new();
    for row in node.find_all("Row") {
        csv_text.push_str(&row.text);
        csv_text.push('\n');
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| CodecError::Rows(e.to_string()))?
        .clone();

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| CodecError::Rows(e.to_string()))?;
        records.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
    }
    Ok(records)
}
