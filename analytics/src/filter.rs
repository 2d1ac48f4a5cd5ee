//! Column filters as reported by the grid widget.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::columns::Column;
use crate::error::Result;
use crate::row::GridRow;

/// Filter on one column. Extra keys the widget sends (`filterType`, `type`)
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFilter {
    #[serde(deserialize_with = "text_or_number")]
    pub filter: String,
}

fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected filter text, got {other}"
        ))),
    }
}

/// Column id → filter, in the order the widget reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterModel(IndexMap<String, ColumnFilter>);

impl FilterModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(
            column.into(),
            ColumnFilter {
                filter: text.into(),
            },
        );
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The only entry that takes effect. Later keys are ignored.
    pub fn first(&self) -> Option<(&str, &ColumnFilter)> {
        self.0
            .get_index(0)
            .map(|(column, filter)| (column.as_str(), filter))
    }

    /// Resolve the effective column and needle, rejecting unknown columns.
    pub fn effective(&self) -> Result<Option<(Column, &str)>> {
        match self.first() {
            None => Ok(None),
            Some((id, filter)) => {
                let column = id.parse::<Column>()?;
                Ok(Some((column, filter.filter.as_str())))
            }
        }
    }
}

/// Indices of the rows whose cell text for the effective column contains
/// the filter text (case-sensitive). An empty model keeps every row.
pub fn filter_indices<R: GridRow>(rows: &[R], model: &FilterModel) -> Result<Vec<usize>> {
    let Some((column, needle)) = model.effective()? else {
        return Ok((0..rows.len()).collect());
    };
    Ok(rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.cell_text(column).contains(needle))
        .map(|(index, _)| index)
        .collect())
}

/// Subset of `rows` matching `model`, always evaluated against the full
/// slice passed in.
pub fn apply_column_filter<R: GridRow + Clone>(rows: &[R], model: &FilterModel) -> Result<Vec<R>> {
    Ok(filter_indices(rows, model)?
        .into_iter()
        .filter_map(|index| rows.get(index).cloned())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tests::record;
    use crate::error::AnalyticsError;
    use crate::record::ContentRecord;
    use pretty_assertions::assert_eq;

    fn rows() -> Vec<ContentRecord> {
        vec![
            record("1", "alpha.pdf", 0.8),
            record("2", "beta.pdf", 0.6),
            record("3", "Alphabet.txt", 0.5),
        ]
    }

    fn ids(rows: &[ContentRecord]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn substring_match_is_case_sensitive() {
        let rows = rows();
        let model = FilterModel::new().with("source", "alpha");
        assert_eq!(ids(&apply_column_filter(&rows, &model).unwrap()), vec!["1"]);
    }

    #[test]
    fn only_first_key_applies() {
        let rows = rows();
        let model = FilterModel::new()
            .with("source", ".pdf")
            .with("relevance_score", "0.80");
        assert_eq!(model.len(), 2);
        assert_eq!(
            ids(&apply_column_filter(&rows, &model).unwrap()),
            vec!["1", "2"]
        );
    }

    #[test]
    fn numeric_columns_match_their_rendered_text() {
        let rows = rows();
        let model = FilterModel::new().with("relevance_score", "0.6");
        assert_eq!(ids(&apply_column_filter(&rows, &model).unwrap()), vec!["2"]);
    }

    #[test]
    fn empty_model_returns_everything() {
        let rows = rows();
        assert_eq!(
            apply_column_filter(&rows, &FilterModel::new()).unwrap().len(),
            3
        );
    }

    #[test]
    fn unknown_column_is_rejected() {
        let model = FilterModel::new().with("colour", "red");
        assert!(matches!(
            filter_indices(&rows(), &model),
            Err(AnalyticsError::UnknownColumn(_))
        ));
    }

    #[test]
    fn deserializes_widget_payload_in_order() {
        let model: FilterModel = serde_json::from_str(
            r#"{"source":{"filterType":"text","type":"contains","filter":"beta"},
                "relevance_score":{"filterType":"number","filter":0.5}}"#,
        )
        .unwrap();
        assert_eq!(model.first().map(|(column, _)| column), Some("source"));
        assert_eq!(ids(&apply_column_filter(&rows(), &model).unwrap()), vec!["2"]);
    }
}
