use indexmap::{IndexMap, IndexSet};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::aggregate::{DocumentAggregate, group_by_source};
use crate::columns::{Column, ColumnSpec, ViewMode, grid_columns, visible_columns};
use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, Result};
use crate::filter::{FilterModel, filter_indices};
use crate::mutation::{
    BulkEdit, EditableField, FieldValue, FlagMode, FlagName, FlagUpdate, RequestToken, RoleUpdate,
};
use crate::plot::{PlotAxes, ScatterPlot, build_scatter};
use crate::record::{ContentRecord, normalize_records};
use crate::row::GridRow;

/// Shown after access roles were copied across a multi-row selection.
pub const UPDATE_ROLES_REMINDER: &str = "Please ensure to click the \"Update Access Roles\" button after modifying access roles to save changes permanently.";

/// What raised a selection-changed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionSource {
    /// A checkbox click in the grid.
    UserClick,
    /// The select-all / deselect-all toggle for the current page.
    SelectAllOnPage,
    /// Any other programmatic change.
    Api,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionChanged {
    pub ids: Vec<String>,
    pub source: SelectionSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub selected: usize,
    /// Set when the selection painted the first row's access roles onto the
    /// rest of it.
    pub painted: Option<BulkEdit>,
    pub notice: Option<&'static str>,
}

/// Request for the grid widget issued by the select-all toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectAllRequest {
    SelectAllOnPage,
    DeselectAllOnPage,
}

/// Rows of the current view, after filtering.
#[derive(Debug, Clone)]
pub enum ViewRows<'a> {
    Records(Vec<&'a ContentRecord>),
    Documents(Vec<&'a DocumentAggregate>),
}

impl ViewRows<'_> {
    pub fn len(&self) -> usize {
        match self {
            ViewRows::Records(rows) => rows.len(),
            ViewRows::Documents(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> Vec<&str> {
        match self {
            ViewRows::Records(rows) => rows.iter().map(|row| row.row_id()).collect(),
            ViewRows::Documents(rows) => rows.iter().map(|row| row.row_id()).collect(),
        }
    }

    pub fn cells(&self, column: Column) -> Vec<String> {
        match self {
            ViewRows::Records(rows) => rows.iter().map(|row| row.cell_text(column)).collect(),
            ViewRows::Documents(rows) => rows.iter().map(|row| row.cell_text(column)).collect(),
        }
    }
}

/// Working set behind the analytics grid and plot.
///
/// The engine owns the master record list and the grouped document list
/// derived from it. Filtered views are index lists into the master set of
/// the current mode, so every edit goes through an engine operation and
/// lands on the master rows. Each view switch or reload advances the view
/// generation; mutation acknowledgments prepared under an older generation
/// are discarded.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
    records: Vec<ContentRecord>,
    documents: Vec<DocumentAggregate>,
    mode: ViewMode,
    filter: FilterModel,
    visible: Vec<usize>,
    selection: Vec<String>,
    generation: u64,
    needs_commit: bool,
    select_all_next: bool,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default())
    }
}

impl AnalyticsEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self {
            mode: config.default_view,
            config,
            records: Vec::new(),
            documents: Vec::new(),
            filter: FilterModel::default(),
            visible: Vec::new(),
            selection: Vec::new(),
            generation: 0,
            needs_commit: false,
            select_all_next: true,
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn records(&self) -> &[ContentRecord] {
        &self.records
    }

    pub fn documents(&self) -> &[DocumentAggregate] {
        &self.documents
    }

    /// Ids last reported checked by the grid.
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn filter(&self) -> &FilterModel {
        &self.filter
    }

    /// Whether local access-role edits are waiting for an explicit update.
    pub fn needs_commit(&self) -> bool {
        self.needs_commit
    }

    /// Normalize and install a fetched batch. On error the working set is
    /// left untouched.
    pub fn load(&mut self, rows: &[Value]) -> Result<usize> {
        let records = normalize_records(rows)?;
        self.load_records(records)
    }

    pub fn load_records(&mut self, records: Vec<ContentRecord>) -> Result<usize> {
        let documents = group_by_source(&records)?;
        self.records = records;
        self.documents = documents;
        self.filter = FilterModel::default();
        self.selection.clear();
        self.needs_commit = false;
        self.generation += 1;
        self.reset_visible();
        info!(
            "loaded {} records across {} documents",
            self.records.len(),
            self.documents.len()
        );
        Ok(self.records.len())
    }

    /// Switch between grouped and flat presentation.
    ///
    /// Entering document mode regroups the current records, so mutations
    /// applied in page-segment mode show up in the aggregates. The filter and
    /// the selection cache are cleared and the view generation advances.
    pub fn set_view_mode(&mut self, mode: ViewMode) -> Result<()> {
        if mode == self.mode {
            return Ok(());
        }
        if mode == ViewMode::Document {
            self.documents = group_by_source(&self.records)?;
        }
        self.mode = mode;
        self.filter = FilterModel::default();
        self.selection.clear();
        self.generation += 1;
        self.reset_visible();
        debug!(
            "view switched to {mode} (generation {}), {} rows",
            self.generation,
            self.visible.len()
        );
        Ok(())
    }

    pub fn toggle_view_mode(&mut self) -> Result<ViewMode> {
        self.set_view_mode(self.mode.toggled())?;
        Ok(self.mode)
    }

    pub fn grid_columns(&self) -> Vec<ColumnSpec> {
        grid_columns(self.mode)
    }

    pub fn visible_columns(&self) -> Vec<Column> {
        visible_columns(self.mode)
    }

    /// Apply a filter model from the grid, always against the full master
    /// set of the current mode. Returns the number of matching rows.
    pub fn apply_filter(&mut self, model: FilterModel) -> Result<usize> {
        let visible = match self.mode {
            ViewMode::PageSegment => filter_indices(&self.records, &model)?,
            ViewMode::Document => filter_indices(&self.documents, &model)?,
        };
        debug!("filter kept {} rows", visible.len());
        self.visible = visible;
        self.filter = model;
        Ok(self.visible.len())
    }

    pub fn clear_filter(&mut self) -> usize {
        self.filter = FilterModel::default();
        self.reset_visible();
        self.visible.len()
    }

    fn reset_visible(&mut self) {
        let len = match self.mode {
            ViewMode::PageSegment => self.records.len(),
            ViewMode::Document => self.documents.len(),
        };
        self.visible = (0..len).collect();
    }

    /// Rows of the current view in grid order.
    pub fn rows(&self) -> ViewRows<'_> {
        match self.mode {
            ViewMode::PageSegment => ViewRows::Records(
                self.visible
                    .iter()
                    .filter_map(|index| self.records.get(*index))
                    .collect(),
            ),
            ViewMode::Document => ViewRows::Documents(
                self.visible
                    .iter()
                    .filter_map(|index| self.documents.get(*index))
                    .collect(),
            ),
        }
    }

    /// Scatter plot of the current view using the configured axes.
    pub fn scatter(&self) -> Result<ScatterPlot> {
        self.scatter_with(&PlotAxes {
            x: self.config.x_column,
            y: self.config.y_column,
            z: self.config.z_column,
            hue: self.config.hue_column,
        })
    }

    pub fn scatter_with(&self, axes: &PlotAxes) -> Result<ScatterPlot> {
        match self.rows() {
            ViewRows::Records(rows) => build_scatter(&rows, axes, self.mode),
            ViewRows::Documents(rows) => build_scatter(&rows, axes, self.mode),
        }
    }

    /// Mirror a selection-changed event from the grid.
    ///
    /// In page-segment mode a multi-row selection made by hand copies the
    /// first row's access roles onto the others; select-all events never do.
    pub fn on_selection_changed(&mut self, event: SelectionChanged) -> Result<SelectionOutcome> {
        for id in &event.ids {
            self.ensure_row(id)?;
        }
        self.selection = event.ids;

        let paints = self.mode == ViewMode::PageSegment
            && self.selection.len() > 1
            && event.source != SelectionSource::SelectAllOnPage;
        if !paints {
            return Ok(SelectionOutcome {
                selected: self.selection.len(),
                painted: None,
                notice: None,
            });
        }

        let ids = self.selection.clone();
        let first = self.row_roles(&ids[0])?;
        let edit = self.reconcile_bulk_selection_edit(
            &ids,
            &ids[0],
            EditableField::AccessRoles,
            FieldValue::Roles(first),
        )?;
        Ok(SelectionOutcome {
            selected: ids.len(),
            painted: Some(edit),
            notice: Some(UPDATE_ROLES_REMINDER),
        })
    }

    /// Write the value typed into `edited_id`'s cell, then spread it across
    /// the selected rows.
    ///
    /// The edited row always takes `new_value`. With several rows selected in
    /// page-segment mode the first selected row's value (after the edit) is
    /// then painted onto the rest, so a typed value only survives when it
    /// landed on that first row. Otherwise `new_value` is written to every
    /// selected row, and in document mode to their member records as well.
    /// Nothing is persisted; the working set is marked as needing an
    /// explicit update.
    pub fn reconcile_bulk_selection_edit(
        &mut self,
        selected_ids: &[String],
        edited_id: &str,
        field: EditableField,
        new_value: FieldValue,
    ) -> Result<BulkEdit> {
        let Some(first) = selected_ids.first() else {
            return Err(AnalyticsError::EmptySelection);
        };
        self.ensure_row(edited_id)?;
        for id in selected_ids {
            self.ensure_row(id)?;
        }
        let EditableField::AccessRoles = field;
        let FieldValue::Roles(typed) = new_value;

        self.write_roles(edited_id, &typed);
        let roles = match self.mode {
            ViewMode::PageSegment if selected_ids.len() > 1 => self.row_roles(first)?,
            _ => typed,
        };
        for id in selected_ids {
            self.write_roles(id, &roles);
        }

        let mut updated = selected_ids.to_vec();
        if !updated.iter().any(|id| id == edited_id) {
            updated.push(edited_id.to_string());
        }
        self.needs_commit = true;
        debug!(
            "access roles [{}] written to {} rows",
            roles.join(", "),
            updated.len()
        );
        Ok(BulkEdit {
            updated,
            value: FieldValue::Roles(roles),
        })
    }

    /// Set the access roles of one row of the current view. Documents keep a
    /// sorted copy; their member records take the value as given.
    fn write_roles(&mut self, id: &str, roles: &[String]) {
        match self.mode {
            ViewMode::PageSegment => {
                for record in self.records.iter_mut().filter(|record| record.id == id) {
                    record.access_roles = roles.to_vec();
                }
            }
            ViewMode::Document => {
                let mut sorted = roles.to_vec();
                sorted.sort();
                sorted.dedup();
                for doc in self.documents.iter_mut().filter(|doc| doc.id == id) {
                    doc.access_roles = sorted.clone();
                }
                for record in self.records.iter_mut().filter(|record| record.source == id) {
                    record.access_roles = roles.to_vec();
                }
            }
        }
    }

    /// Copy the selection cache into the `selected` flags of the current
    /// view. Returns the number of rows now selected.
    pub fn commit_view(&mut self) -> usize {
        let checked: IndexSet<&str> = self.selection.iter().map(String::as_str).collect();
        let count = match self.mode {
            ViewMode::PageSegment => {
                for record in &mut self.records {
                    record.selected = checked.contains(record.id.as_str());
                }
                self.records.iter().filter(|record| record.selected).count()
            }
            ViewMode::Document => {
                for doc in &mut self.documents {
                    doc.selected = checked.contains(doc.id.as_str());
                }
                for record in &mut self.records {
                    record.selected = checked.contains(record.source.as_str());
                }
                self.documents.iter().filter(|doc| doc.selected).count()
            }
        };
        debug!("committed selection of {count} rows");
        count
    }

    /// Alternate between selecting and deselecting the current page.
    pub fn toggle_select_all(&mut self) -> SelectAllRequest {
        let request = if self.select_all_next {
            SelectAllRequest::SelectAllOnPage
        } else {
            SelectAllRequest::DeselectAllOnPage
        };
        self.select_all_next = !self.select_all_next;
        request
    }

    /// Resolve the selection to the records whose flag would change.
    pub fn prepare_flag_update(
        &self,
        selected_ids: &[String],
        flag: FlagName,
        mode: FlagMode,
    ) -> Result<FlagUpdate> {
        if selected_ids.is_empty() {
            return Err(AnalyticsError::EmptySelection);
        }
        let target = mode.target();
        let record_ids = self
            .resolve_record_ids(selected_ids)?
            .into_iter()
            .filter(|id| {
                self.records
                    .iter()
                    .find(|record| &record.id == id)
                    .is_some_and(|record| flag_value(record, flag) != target)
            })
            .collect();
        Ok(FlagUpdate {
            token: self.token(),
            flag,
            mode,
            record_ids,
        })
    }

    /// Apply an acknowledged flag update and drop the selection cache, since
    /// the grid deselects everything afterwards. Returns the number of
    /// records changed.
    pub fn confirm_flag_update(&mut self, update: &FlagUpdate) -> Result<usize> {
        self.check_token(update.token)?;
        let target = update.mode.target();
        let mut changed = 0;
        for record in self
            .records
            .iter_mut()
            .filter(|record| update.record_ids.contains(&record.id))
        {
            match update.flag {
                FlagName::Quarantine => record.quarantine = target,
            }
            changed += 1;
        }
        resync_documents(&mut self.documents, &self.records);
        self.selection.clear();
        info!("{} {} on {changed} records", update.mode, update.flag);
        Ok(changed)
    }

    /// Plan an access-role update carrying the first selected row's roles.
    pub fn prepare_role_update(&self, selected_ids: &[String]) -> Result<RoleUpdate> {
        let Some(first) = selected_ids.first() else {
            return Err(AnalyticsError::EmptySelection);
        };
        Ok(RoleUpdate {
            token: self.token(),
            roles: self.row_roles(first)?,
            record_ids: self.resolve_record_ids(selected_ids)?.into_iter().collect(),
        })
    }

    /// Apply an acknowledged role update and clear the pending-commit mark.
    pub fn confirm_role_update(&mut self, update: &RoleUpdate) -> Result<usize> {
        self.check_token(update.token)?;
        let mut changed = 0;
        for record in self
            .records
            .iter_mut()
            .filter(|record| update.record_ids.contains(&record.id))
        {
            record.access_roles = update.roles.clone();
            changed += 1;
        }
        resync_documents(&mut self.documents, &self.records);
        self.needs_commit = false;
        info!(
            "access roles [{}] saved on {changed} records",
            update.roles_csv()
        );
        Ok(changed)
    }

    fn token(&self) -> RequestToken {
        RequestToken {
            generation: self.generation,
        }
    }

    fn check_token(&self, token: RequestToken) -> Result<()> {
        if token.generation != self.generation {
            warn!(
                "discarding response prepared for generation {} (now {})",
                token.generation, self.generation
            );
            return Err(AnalyticsError::StaleResponse {
                issued: token.generation,
                current: self.generation,
            });
        }
        Ok(())
    }

    fn ensure_row(&self, id: &str) -> Result<()> {
        let known = match self.mode {
            ViewMode::PageSegment => self.records.iter().any(|record| record.id == id),
            ViewMode::Document => self.documents.iter().any(|doc| doc.id == id),
        };
        if known {
            Ok(())
        } else {
            Err(AnalyticsError::UnknownRow(id.to_string()))
        }
    }

    fn row_roles(&self, id: &str) -> Result<Vec<String>> {
        let roles = match self.mode {
            ViewMode::PageSegment => self
                .records
                .iter()
                .find(|record| record.id == id)
                .map(|record| record.access_roles.clone()),
            ViewMode::Document => self
                .documents
                .iter()
                .find(|doc| doc.id == id)
                .map(|doc| doc.access_roles.clone()),
        };
        roles.ok_or_else(|| AnalyticsError::UnknownRow(id.to_string()))
    }

    /// Map view ids to record ids, expanding documents to their members.
    fn resolve_record_ids(&self, ids: &[String]) -> Result<IndexSet<String>> {
        let mut resolved = IndexSet::new();
        for id in ids {
            match self.mode {
                ViewMode::PageSegment => {
                    self.ensure_row(id)?;
                    resolved.insert(id.clone());
                }
                ViewMode::Document => {
                    let doc = self
                        .documents
                        .iter()
                        .find(|doc| &doc.id == id)
                        .ok_or_else(|| AnalyticsError::UnknownRow(id.clone()))?;
                    resolved.extend(doc.embedding_ids.iter().cloned());
                }
            }
        }
        Ok(resolved)
    }
}

fn flag_value(record: &ContentRecord, flag: FlagName) -> bool {
    match flag {
        FlagName::Quarantine => record.quarantine,
    }
}

/// Recompute the record-derived document fields that mutations can touch.
fn resync_documents(documents: &mut [DocumentAggregate], records: &[ContentRecord]) {
    let mut members: IndexMap<&str, (bool, Vec<String>)> = IndexMap::new();
    for record in records {
        let (quarantine, roles) = members.entry(record.source.as_str()).or_default();
        *quarantine |= record.quarantine;
        roles.extend(record.access_roles.iter().cloned());
    }
    for doc in documents {
        if let Some((quarantine, roles)) = members.get(doc.source.as_str()) {
            let mut roles = roles.clone();
            roles.sort();
            roles.dedup();
            doc.quarantine = *quarantine;
            doc.access_roles = roles;
        }
    }
}
