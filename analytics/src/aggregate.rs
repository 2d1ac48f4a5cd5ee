//! Per-document aggregation of content records.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::record::{ContentRecord, round2};

/// Metrics of every chunk sharing one source, folded into a single row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAggregate {
    /// Same as `source`.
    pub id: String,
    pub source: String,
    /// Page and text of the first member, shown as a preview.
    pub page: Option<u32>,
    pub document: String,
    pub relevance_score: f64,
    pub feedback_score: f64,
    pub avg_feedback_score: f64,
    pub total_number_used: u64,
    pub avg_relevance_score_by_source: f64,
    pub avg_feedback_score_by_source: f64,
    pub quarantine: bool,
    pub access_roles: Vec<String>,
    pub coord_1: f64,
    pub coord_2: f64,
    pub coord_3: f64,
    pub creation_date: String,
    pub uploader_role: Vec<String>,
    pub embedding_ids: Vec<String>,
    pub chunks_found: usize,
    pub selected: bool,
}

#[derive(Default)]
struct Accumulator {
    page: Option<u32>,
    document: String,
    creation_date: String,
    relevance_score: f64,
    feedback_score: f64,
    avg_feedback_score: f64,
    avg_relevance_score_by_source: f64,
    avg_feedback_score_by_source: f64,
    coords: [f64; 3],
    total_number_used: u64,
    quarantine: bool,
    access_roles: Vec<String>,
    uploader_role: Vec<String>,
    embedding_ids: Vec<String>,
    chunks_found: usize,
}

impl Accumulator {
    fn add(&mut self, record: &ContentRecord) {
        if self.chunks_found == 0 {
            self.page = record.page;
            self.document = record.document.clone();
            self.creation_date = record.creation_date.clone();
        }
        self.relevance_score += record.relevance_score;
        self.feedback_score += record.feedback_score;
        self.avg_feedback_score += record.avg_feedback_score;
        self.avg_relevance_score_by_source += record.avg_relevance_score_by_source;
        self.avg_feedback_score_by_source += record.avg_feedback_score_by_source;
        self.coords[0] += record.coord_1;
        self.coords[1] += record.coord_2;
        self.coords[2] += record.coord_3;
        self.total_number_used = self.total_number_used.max(record.total_number_used);
        self.quarantine |= record.quarantine;
        self.access_roles.extend(record.access_roles.iter().cloned());
        if !record.uploader_role.is_empty() {
            self.uploader_role.push(record.uploader_role.clone());
        }
        self.embedding_ids.push(record.id.clone());
        self.chunks_found += 1;
    }

    fn finish(self, source: String) -> DocumentAggregate {
        let count = self.chunks_found as f64;
        let mean = |sum: f64| round2(sum / count);
        let mut access_roles = self.access_roles;
        access_roles.sort();
        access_roles.dedup();
        DocumentAggregate {
            id: source.clone(),
            source,
            page: self.page,
            document: self.document,
            relevance_score: mean(self.relevance_score),
            feedback_score: mean(self.feedback_score),
            avg_feedback_score: mean(self.avg_feedback_score),
            total_number_used: self.total_number_used,
            avg_relevance_score_by_source: mean(self.avg_relevance_score_by_source),
            avg_feedback_score_by_source: mean(self.avg_feedback_score_by_source),
            quarantine: self.quarantine,
            access_roles,
            coord_1: mean(self.coords[0]),
            coord_2: mean(self.coords[1]),
            coord_3: mean(self.coords[2]),
            creation_date: self.creation_date,
            uploader_role: dedup_in_order(self.uploader_role),
            embedding_ids: dedup_in_order(self.embedding_ids),
            chunks_found: self.chunks_found,
            selected: false,
        }
    }
}

fn dedup_in_order(values: Vec<String>) -> Vec<String> {
    let mut seen = indexmap::IndexSet::with_capacity(values.len());
    for value in values {
        seen.insert(value);
    }
    seen.into_iter().collect()
}

fn ensure_finite(record: &ContentRecord) -> Result<()> {
    let fields = [
        ("relevance_score", record.relevance_score),
        ("feedback_score", record.feedback_score),
        ("avg_feedback_score", record.avg_feedback_score),
        (
            "avg_relevance_score_by_source",
            record.avg_relevance_score_by_source,
        ),
        (
            "avg_feedback_score_by_source",
            record.avg_feedback_score_by_source,
        ),
        ("coord_1", record.coord_1),
        ("coord_2", record.coord_2),
        ("coord_3", record.coord_3),
    ];
    match fields.iter().find(|(_, value)| !value.is_finite()) {
        Some((field, value)) => Err(AnalyticsError::DataShape {
            row: record.id.clone(),
            field: *field,
            reason: format!("is not a finite number: {value}"),
        }),
        None => Ok(()),
    }
}

/// Fold records into one aggregate per distinct source, in first-occurrence
/// order.
///
/// Numeric fields are averaged over the member count and rounded to two
/// decimals; `total_number_used` takes the maximum and `quarantine` the
/// logical OR. Access roles become a sorted set; uploader roles and member
/// ids keep first-occurrence order. A non-finite value anywhere fails the
/// whole batch.
pub fn group_by_source(records: &[ContentRecord]) -> Result<Vec<DocumentAggregate>> {
    let mut groups: IndexMap<&str, Accumulator> = IndexMap::new();
    for record in records {
        ensure_finite(record)?;
        groups
            .entry(record.source.as_str())
            .or_default()
            .add(record);
    }
    let aggregates: Vec<DocumentAggregate> = groups
        .into_iter()
        .map(|(source, acc)| acc.finish(source.to_string()))
        .collect();
    debug!(
        "grouped {} records into {} documents",
        records.len(),
        aggregates.len()
    );
    Ok(aggregates)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) fn record(id: &str, source: &str, relevance: f64) -> ContentRecord {
        ContentRecord {
            id: id.to_string(),
            source: source.to_string(),
            page: Some(1),
            document: format!("text of {id}"),
            relevance_score: relevance,
            feedback_score: 0.5,
            avg_feedback_score: 0.5,
            total_number_used: 1,
            avg_relevance_score_by_source: relevance,
            avg_feedback_score_by_source: 0.5,
            quarantine: false,
            access_roles: Vec::new(),
            coord_1: 0.0,
            coord_2: 0.0,
            coord_3: 0.0,
            creation_date: "2024-01-01".to_string(),
            uploader_role: "Admin".to_string(),
            selected: false,
        }
    }

    fn scenario() -> Vec<ContentRecord> {
        let mut first = record("1", "A", 0.8);
        first.quarantine = true;
        first.access_roles = vec!["Admin".to_string()];
        let mut second = record("2", "A", 0.6);
        second.access_roles = vec!["User".to_string(), "Admin".to_string()];
        second.total_number_used = 4;
        let third = record("3", "B", 0.5);
        vec![first, second, third]
    }

    #[test]
    fn groups_by_source_in_first_occurrence_order() {
        let docs = group_by_source(&scenario()).unwrap();
        assert_eq!(docs.len(), 2);

        let a = &docs[0];
        assert_eq!(a.id, "A");
        assert_eq!(a.relevance_score, 0.7);
        assert!(a.quarantine);
        assert_eq!(a.chunks_found, 2);
        assert_eq!(a.total_number_used, 4);
        assert_eq!(a.access_roles, vec!["Admin", "User"]);
        assert_eq!(a.embedding_ids, vec!["1", "2"]);
        assert_eq!(a.uploader_role, vec!["Admin"]);
        assert_eq!(a.document, "text of 1");
        assert!(!a.selected);

        let b = &docs[1];
        assert_eq!(b.relevance_score, 0.5);
        assert!(!b.quarantine);
        assert_eq!(b.chunks_found, 1);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(group_by_source(&[]).unwrap().is_empty());
    }

    #[test]
    fn chunk_counts_sum_to_record_count_and_means_stay_in_range() {
        let mut records = scenario();
        records.push(record("4", "B", 0.27));
        records.push(record("5", "C", 0.99));
        records.push(record("6", "A", 0.13));
        let docs = group_by_source(&records).unwrap();

        let total: usize = docs.iter().map(|d| d.chunks_found).sum();
        assert_eq!(total, records.len());

        for doc in &docs {
            let members: Vec<f64> = records
                .iter()
                .filter(|r| r.source == doc.source)
                .map(|r| r.relevance_score)
                .collect();
            let min = members.iter().copied().fold(f64::INFINITY, f64::min);
            let max = members.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert!(doc.relevance_score >= min && doc.relevance_score <= max);

            let mut sorted = doc.access_roles.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted, doc.access_roles);
        }
    }

    #[test]
    fn grouping_is_idempotent() {
        let records = scenario();
        assert_eq!(
            group_by_source(&records).unwrap(),
            group_by_source(&records).unwrap()
        );
    }

    #[test]
    fn non_finite_value_fails_the_batch() {
        let mut records = scenario();
        records[2].coord_2 = f64::NAN;
        let err = group_by_source(&records).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::DataShape { field: "coord_2", .. }
        ));
    }
}
