use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// JSON error envelope returned by the HTTP layer.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    /// machine readable kind, e.g. `not_found`
    pub error: &'static str,
    pub message: String,
}
