//! # Analytics
//!
//! View state for the retrieval analytics page: chunk records fetched from
//! the backend, their per-document aggregates, grid selection and filtering,
//! and the quarantine / access-role mutations planned against them.
//!
//! [`AnalyticsEngine`] owns the working set. Mutations are two-phase: the
//! engine prepares a request (resolving ids and capturing the view
//! generation), the caller sends it, and only an acknowledged request is
//! confirmed back into the engine.

mod aggregate;
mod columns;
mod config;
mod engine;
mod error;
mod filter;
mod mutation;
mod plot;
mod record;
mod row;

pub use aggregate::{DocumentAggregate, group_by_source};
pub use columns::{Column, ColumnSpec, ViewMode, grid_columns, visible_columns};
pub use config::AnalyticsConfig;
pub use engine::{
    AnalyticsEngine, SelectAllRequest, SelectionChanged, SelectionOutcome, SelectionSource,
    UPDATE_ROLES_REMINDER, ViewRows,
};
pub use error::{AnalyticsError, Result};
pub use filter::{ColumnFilter, FilterModel, apply_column_filter, filter_indices};
pub use mutation::{
    BulkEdit, EditableField, FieldValue, FlagMode, FlagName, FlagUpdate, RequestToken, RoleUpdate,
};
pub use plot::{PlotAxes, PlotPoint, PlotSeries, ScatterPlot, build_scatter, point_label};
pub use record::{ContentRecord, basename, normalize_records, parse_access_roles, round2};
pub use row::GridRow;
