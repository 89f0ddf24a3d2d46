use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("failed to load dataset: {0}")]
    DataLoad(String),

    #[error("selection index {index} out of range (dataset has {len} rows)")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("malformed percentage in `{field}`: {value:?}")]
    MalformedPercentage { field: &'static str, value: String },

    #[error("chart shape mismatch: {values} values, {labels} labels")]
    ShapeMismatch { values: usize, labels: usize },

    #[error("invalid binding registry: {0}")]
    InvalidRegistry(String),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
