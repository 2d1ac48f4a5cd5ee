use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyticsError;

/// Grid presentation of the working set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// One row per source document.
    #[default]
    Document,
    /// One row per chunk, with the page column shown.
    PageSegment,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Document => ViewMode::PageSegment,
            ViewMode::PageSegment => ViewMode::Document,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Document => "document",
            ViewMode::PageSegment => "page_segment",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(ViewMode::Document),
            "page_segment" | "page" => Ok(ViewMode::PageSegment),
            other => Err(AnalyticsError::InvalidConfig(format!(
                "unknown view mode `{other}`"
            ))),
        }
    }
}

/// Fields a grid row exposes, keyed by their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    Source,
    Page,
    Document,
    RelevanceScore,
    FeedbackScore,
    AvgFeedbackScore,
    TotalNumberUsed,
    Quarantine,
    CreationDate,
    AvgRelevanceScoreBySource,
    AvgFeedbackScoreBySource,
    UploaderRole,
    AccessRoles,
    #[serde(rename = "coord_1")]
    Coord1,
    #[serde(rename = "coord_2")]
    Coord2,
    #[serde(rename = "coord_3")]
    Coord3,
    ChunksFound,
}

/// Grid column order in page-segment mode.
const GRID_ORDER: [Column; 14] = [
    Column::Id,
    Column::Source,
    Column::Page,
    Column::Document,
    Column::RelevanceScore,
    Column::FeedbackScore,
    Column::AvgFeedbackScore,
    Column::TotalNumberUsed,
    Column::Quarantine,
    Column::CreationDate,
    Column::AvgRelevanceScoreBySource,
    Column::AvgFeedbackScoreBySource,
    Column::UploaderRole,
    Column::AccessRoles,
];

impl Column {
    pub fn id(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Source => "source",
            Column::Page => "page",
            Column::Document => "document",
            Column::RelevanceScore => "relevance_score",
            Column::FeedbackScore => "feedback_score",
            Column::AvgFeedbackScore => "avg_feedback_score",
            Column::TotalNumberUsed => "total_number_used",
            Column::Quarantine => "quarantine",
            Column::CreationDate => "creation_date",
            Column::AvgRelevanceScoreBySource => "avg_relevance_score_by_source",
            Column::AvgFeedbackScoreBySource => "avg_feedback_score_by_source",
            Column::UploaderRole => "uploader_role",
            Column::AccessRoles => "access_roles",
            Column::Coord1 => "coord_1",
            Column::Coord2 => "coord_2",
            Column::Coord3 => "coord_3",
            Column::ChunksFound => "chunks_found",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        GRID_ORDER
            .iter()
            .chain(&[
                Column::Coord1,
                Column::Coord2,
                Column::Coord3,
                Column::ChunksFound,
            ])
            .copied()
            .find(|column| column.id() == id)
    }

    pub fn header(self) -> &'static str {
        match self {
            Column::Id => "Id",
            Column::Source => "File Name",
            Column::Page => "Page",
            Column::Document => "Raw Text",
            Column::RelevanceScore => "Relevance",
            Column::FeedbackScore => "User Satisfaction",
            Column::AvgFeedbackScore => "Average User Satisfaction",
            Column::TotalNumberUsed => "Total Number Used",
            Column::Quarantine => "Quarantine",
            Column::CreationDate => "Date Created",
            Column::AvgRelevanceScoreBySource => "Relevance Grouped by Documents",
            Column::AvgFeedbackScoreBySource => "User Satisfaction Grouped by Documents",
            Column::UploaderRole => "Uploader Role",
            Column::AccessRoles => "Access Roles",
            Column::Coord1 => "UMAP Coordinate X",
            Column::Coord2 => "UMAP Coordinate Y",
            Column::Coord3 => "UMAP Coordinate Z",
            Column::ChunksFound => "Chunks Found",
        }
    }

    /// Whether the column can drive a plot axis or the hue.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Column::RelevanceScore
                | Column::FeedbackScore
                | Column::AvgFeedbackScore
                | Column::TotalNumberUsed
                | Column::AvgRelevanceScoreBySource
                | Column::AvgFeedbackScoreBySource
                | Column::Coord1
                | Column::Coord2
                | Column::Coord3
                | Column::ChunksFound
        )
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Column {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::from_id(s).ok_or_else(|| AnalyticsError::UnknownColumn(s.to_string()))
    }
}

/// One grid column as the table should render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub column: Column,
    pub header: &'static str,
    pub hidden: bool,
}

/// Columns for `mode`, in grid order. `id` and `quarantine` are present but
/// hidden; `page` is dropped in document mode.
pub fn grid_columns(mode: ViewMode) -> Vec<ColumnSpec> {
    GRID_ORDER
        .iter()
        .copied()
        .filter(|column| !(mode == ViewMode::Document && *column == Column::Page))
        .map(|column| ColumnSpec {
            column,
            header: column.header(),
            hidden: matches!(column, Column::Id | Column::Quarantine),
        })
        .collect()
}

/// Only the columns a user actually sees for `mode`.
pub fn visible_columns(mode: ViewMode) -> Vec<Column> {
    grid_columns(mode)
        .into_iter()
        .filter(|spec| !spec.hidden)
        .map(|spec| spec.column)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn page_column_only_in_page_segment_mode() {
        assert!(visible_columns(ViewMode::PageSegment).contains(&Column::Page));
        assert!(!visible_columns(ViewMode::Document).contains(&Column::Page));
        assert_eq!(
            visible_columns(ViewMode::PageSegment).len(),
            visible_columns(ViewMode::Document).len() + 1
        );
    }

    #[test]
    fn id_and_quarantine_are_always_hidden() {
        for mode in [ViewMode::Document, ViewMode::PageSegment] {
            let hidden: Vec<Column> = grid_columns(mode)
                .into_iter()
                .filter(|spec| spec.hidden)
                .map(|spec| spec.column)
                .collect();
            assert_eq!(hidden, vec![Column::Id, Column::Quarantine]);
        }
    }

    #[test]
    fn column_ids_round_trip_through_serde_names() {
        for id in ["coord_2", "avg_feedback_score_by_source", "access_roles"] {
            let column: Column = id.parse().unwrap();
            assert_eq!(column.id(), id);
            assert_eq!(serde_json::to_value(column).unwrap(), id);
        }
        assert!(matches!(
            "nope".parse::<Column>(),
            Err(AnalyticsError::UnknownColumn(_))
        ));
    }

    #[test]
    fn view_mode_toggles() {
        assert_eq!(ViewMode::default().toggled(), ViewMode::PageSegment);
        assert_eq!("page_segment".parse::<ViewMode>().unwrap(), ViewMode::PageSegment);
    }
}
