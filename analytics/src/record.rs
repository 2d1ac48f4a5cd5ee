//! Content records and normalization of raw fetch rows.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AnalyticsError, Result};

/// One retrievable chunk and its usage metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: String,
    pub source: String,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub document: String,
    pub relevance_score: f64,
    pub feedback_score: f64,
    pub avg_feedback_score: f64,
    pub total_number_used: u64,
    pub avg_relevance_score_by_source: f64,
    pub avg_feedback_score_by_source: f64,
    #[serde(default)]
    pub quarantine: bool,
    #[serde(default)]
    pub access_roles: Vec<String>,
    pub coord_1: f64,
    pub coord_2: f64,
    pub coord_3: f64,
    #[serde(default)]
    pub creation_date: String,
    #[serde(default)]
    pub uploader_role: String,
    #[serde(default)]
    pub selected: bool,
}

/// Round to two decimals, the precision every score is displayed with.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Keep only the file name of a document path.
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Split an `access_roles` value into trimmed role names.
///
/// Strings are comma separated and may carry stray quote characters; arrays
/// are taken element-wise; any other scalar becomes a single role.
pub fn parse_access_roles(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(joined) => split_roles(joined),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(role) => Some(role.trim().to_string()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|role| !role.is_empty())
            .collect(),
        other => vec![other.to_string()],
    }
}

fn split_roles(joined: &str) -> Vec<String> {
    joined
        .replace(['"', '\''], "")
        .split(',')
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .map(str::to_string)
        .collect()
}

impl ContentRecord {
    /// Build a record from one raw fetch row.
    ///
    /// `index` is only used to name the row in errors when it has no id.
    pub fn from_value(index: usize, raw: &Value) -> Result<Self> {
        let fields = raw.as_object().ok_or_else(|| AnalyticsError::DataShape {
            row: format!("#{index}"),
            field: "<row>",
            reason: "is not a JSON object".to_string(),
        })?;
        let id = match fields.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => {
                return Err(AnalyticsError::DataShape {
                    row: format!("#{index}"),
                    field: "id",
                    reason: "is missing".to_string(),
                });
            }
        };
        let row = RowReader { id: &id, fields };

        Ok(Self {
            source: basename(&row.string("source")?).to_string(),
            page: row.optional_u64("page")?.map(|page| page as u32),
            document: row.optional_string("document"),
            relevance_score: round2(row.float("relevance_score")?),
            feedback_score: round2(row.float("feedback_score")?),
            avg_feedback_score: round2(row.float("avg_feedback_score")?),
            total_number_used: row.integer("total_number_used")?,
            avg_relevance_score_by_source: round2(row.float("avg_relevance_score_by_source")?),
            avg_feedback_score_by_source: round2(row.float("avg_feedback_score_by_source")?),
            quarantine: row.flag("quarantine")?,
            access_roles: fields
                .get("access_roles")
                .map(parse_access_roles)
                .unwrap_or_default(),
            coord_1: row.float("coord_1")?,
            coord_2: row.float("coord_2")?,
            coord_3: row.float("coord_3")?,
            creation_date: row.optional_string("creation_date"),
            uploader_role: row.optional_string("uploader_role"),
            selected: false,
            id,
        })
    }
}

/// Normalize a fetched batch. Any malformed row rejects the whole batch.
pub fn normalize_records(rows: &[Value]) -> Result<Vec<ContentRecord>> {
    let records = rows
        .iter()
        .enumerate()
        .map(|(index, raw)| ContentRecord::from_value(index, raw))
        .collect::<Result<Vec<_>>>()?;
    debug!("normalized {} fetched rows", records.len());
    Ok(records)
}

struct RowReader<'a> {
    id: &'a str,
    fields: &'a Map<String, Value>,
}

impl RowReader<'_> {
    fn shape(&self, field: &'static str, reason: impl Into<String>) -> AnalyticsError {
        AnalyticsError::DataShape {
            row: self.id.to_string(),
            field,
            reason: reason.into(),
        }
    }

    fn required(&self, field: &'static str) -> Result<&Value> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Err(self.shape(field, "is missing")),
            Some(value) => Ok(value),
        }
    }

    fn string(&self, field: &'static str) -> Result<String> {
        match self.required(field)? {
            Value::String(text) => Ok(text.clone()),
            other => Err(self.shape(field, format!("expected a string, got {other}"))),
        }
    }

    fn optional_string(&self, field: &'static str) -> String {
        match self.fields.get(field) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    fn float(&self, field: &'static str) -> Result<f64> {
        let value = self.required(field)?;
        let parsed = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(number) if number.is_finite() => Ok(number),
            _ => Err(self.shape(field, format!("is not a finite number: {value}"))),
        }
    }

    fn integer(&self, field: &'static str) -> Result<u64> {
        let value = self.required(field)?;
        parse_integer(value).ok_or_else(|| self.shape(field, format!("is not an integer: {value}")))
    }

    fn optional_u64(&self, field: &'static str) -> Result<Option<u64>> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
            Some(value) => parse_integer(value)
                .filter(|page| u32::try_from(*page).is_ok())
                .map(Some)
                .ok_or_else(|| self.shape(field, format!("is not an integer: {value}"))),
        }
    }

    fn flag(&self, field: &'static str) -> Result<bool> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(value) => parse_integer(value)
                .map(|flag| flag != 0)
                .ok_or_else(|| self.shape(field, format!("is not a 0/1 flag: {value}"))),
        }
    }
}

/// Integers may arrive as numbers or strings; fractional parts are truncated.
fn parse_integer(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().and_then(truncate_non_negative)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<u64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(truncate_non_negative))
        }
        _ => None,
    }
}

fn truncate_non_negative(number: f64) -> Option<u64> {
    (number.is_finite() && number >= 0.0).then(|| number.trunc() as u64)
}
