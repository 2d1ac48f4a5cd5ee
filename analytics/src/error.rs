use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// A row is missing a required field or carries a value that cannot be
    /// parsed. The whole batch is rejected.
    #[error("row {row}: field `{field}` {reason}")]
    DataShape {
        row: String,
        field: &'static str,
        reason: String,
    },

    #[error("unknown row id `{0}` in the current view")]
    UnknownRow(String),

    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    #[error("column `{0}` is not numeric and cannot be plotted")]
    NonNumericAxis(String),

    #[error("no rows selected")]
    EmptySelection,

    #[error("response for view generation {issued} arrived at generation {current}")]
    StaleResponse { issued: u64, current: u64 },

    #[error("invalid analytics config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
