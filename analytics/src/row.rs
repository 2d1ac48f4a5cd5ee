use crate::aggregate::DocumentAggregate;
use crate::columns::Column;
use crate::record::ContentRecord;

/// Read access to a grid row, shared by the flat and grouped views.
pub trait GridRow {
    fn row_id(&self) -> &str;
    fn source(&self) -> &str;
    fn page(&self) -> Option<u32>;
    fn is_selected(&self) -> bool;
    fn is_quarantined(&self) -> bool;
    fn access_roles(&self) -> &[String];

    /// Numeric value for plot axes; `None` for text columns.
    fn numeric(&self, column: Column) -> Option<f64>;

    /// Text shown in the grid cell, which is also what filters match against.
    fn cell_text(&self, column: Column) -> String;
}

fn score(value: f64) -> String {
    format!("{value:.2}")
}

fn page_text(page: Option<u32>) -> String {
    page.map(|page| page.to_string()).unwrap_or_default()
}

fn flag_text(flag: bool) -> String {
    if flag { "1" } else { "0" }.to_string()
}

impl GridRow for ContentRecord {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn page(&self) -> Option<u32> {
        self.page
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn is_quarantined(&self) -> bool {
        self.quarantine
    }

    fn access_roles(&self) -> &[String] {
        &self.access_roles
    }

    fn numeric(&self, column: Column) -> Option<f64> {
        match column {
            Column::RelevanceScore => Some(self.relevance_score),
            Column::FeedbackScore => Some(self.feedback_score),
            Column::AvgFeedbackScore => Some(self.avg_feedback_score),
            Column::TotalNumberUsed => Some(self.total_number_used as f64),
            Column::AvgRelevanceScoreBySource => Some(self.avg_relevance_score_by_source),
            Column::AvgFeedbackScoreBySource => Some(self.avg_feedback_score_by_source),
            Column::Coord1 => Some(self.coord_1),
            Column::Coord2 => Some(self.coord_2),
            Column::Coord3 => Some(self.coord_3),
            Column::ChunksFound => Some(1.0),
            _ => None,
        }
    }

    fn cell_text(&self, column: Column) -> String {
        match column {
            Column::Id => self.id.clone(),
            Column::Source => self.source.clone(),
            Column::Page => page_text(self.page),
            Column::Document => self.document.clone(),
            Column::TotalNumberUsed => self.total_number_used.to_string(),
            Column::Quarantine => flag_text(self.quarantine),
            Column::CreationDate => self.creation_date.clone(),
            Column::UploaderRole => self.uploader_role.clone(),
            Column::AccessRoles => self.access_roles.join(", "),
            Column::ChunksFound => "1".to_string(),
            numeric => self.numeric(numeric).map(score).unwrap_or_default(),
        }
    }
}

impl GridRow for DocumentAggregate {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn page(&self) -> Option<u32> {
        self.page
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn is_quarantined(&self) -> bool {
        self.quarantine
    }

    fn access_roles(&self) -> &[String] {
        &self.access_roles
    }

    fn numeric(&self, column: Column) -> Option<f64> {
        match column {
            Column::RelevanceScore => Some(self.relevance_score),
            Column::FeedbackScore => Some(self.feedback_score),
            Column::AvgFeedbackScore => Some(self.avg_feedback_score),
            Column::TotalNumberUsed => Some(self.total_number_used as f64),
            Column::AvgRelevanceScoreBySource => Some(self.avg_relevance_score_by_source),
            Column::AvgFeedbackScoreBySource => Some(self.avg_feedback_score_by_source),
            Column::Coord1 => Some(self.coord_1),
            Column::Coord2 => Some(self.coord_2),
            Column::Coord3 => Some(self.coord_3),
            Column::ChunksFound => Some(self.chunks_found as f64),
            _ => None,
        }
    }

    fn cell_text(&self, column: Column) -> String {
        match column {
            Column::Id => self.id.clone(),
            Column::Source => self.source.clone(),
            Column::Page => page_text(self.page),
            Column::Document => self.document.clone(),
            Column::TotalNumberUsed => self.total_number_used.to_string(),
            Column::Quarantine => flag_text(self.quarantine),
            Column::CreationDate => self.creation_date.clone(),
            Column::UploaderRole => self.uploader_role.join(", "),
            Column::AccessRoles => self.access_roles.join(", "),
            Column::ChunksFound => self.chunks_found.to_string(),
            numeric => self.numeric(numeric).map(score).unwrap_or_default(),
        }
    }
}
