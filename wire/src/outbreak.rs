//! Outbreak records and upload response bodies.

use serde::{Deserialize, Serialize};

/// A stored outbreak alert as returned by the query endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutbreakRecord {
    /// Row identifier (UUID string).
    pub id: String,
    pub pincode: String,
    pub disease_name: String,
    pub cases: i64,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub advice: String,
}

/// Successful upload response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub count: usize,
}

/// Error body returned by the upload and chat endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
