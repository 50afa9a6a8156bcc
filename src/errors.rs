// errors.rs
use thiserror::Error;

/// Errors originating from either the loaders and exporters around the
/// pipeline or from validating a user query against the catalog.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Db(String),

    #[error("XLSX error: {0}")]
    Xlsx(String),

    #[error("Missing column '{column}' in {source_name}")]
    MissingColumn { source_name: String, column: String },

    #[error("Unsupported operator '{operator}' for column '{column}'")]
    UnsupportedOperator { column: String, operator: String },

    #[error("Malformed condition for column '{column}': {reason}")]
    MalformedCondition { column: String, reason: String },

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Unknown facility category '{0}'")]
    UnknownCategory(String),

    #[error("Cannot order '{column}' values against a {operand} operand")]
    TypeMismatch { column: String, operand: &'static str },
}

impl PipelineError {
    /// True for errors caused by the query itself rather than by I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PipelineError::UnsupportedOperator { .. }
                | PipelineError::MalformedCondition { .. }
                | PipelineError::UnknownColumn(_)
                | PipelineError::UnknownCategory(_)
                | PipelineError::TypeMismatch { .. }
        )
    }
}

impl From<rusqlite::Error> for PipelineError {
    fn from(e: rusqlite::Error) -> Self {
        PipelineError::Db(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for PipelineError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        PipelineError::Xlsx(e.to_string())
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
