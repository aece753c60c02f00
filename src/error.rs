//! Failures raised while turning raw page bytes into canonical records.

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The page carried no `__NEXT_DATA__` payload at all. Kept separate
    /// from the decode failures so callers can tell a layout change apart
    /// from a corrupt payload.
    #[error("__NEXT_DATA__ not found")]
    NextDataNotFound,
    #[error("failed to decode embedded JSON: {0}")]
    Json(serde_json::Error),
    #[error("embedded JSON missing required structure: {0}")]
    Schema(serde_json::Error),
    #[error("invalid date format: {0}")]
    DateFormat(String),
}
