use thiserror::Error;

/// Errors raised when data crossing a component boundary breaks its contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// An upstream collaborator handed over a value outside its declared domain,
    /// e.g. a sentiment label that is not Positive, Negative or Neutral.
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}
