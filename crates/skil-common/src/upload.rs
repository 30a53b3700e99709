use serde::{Deserialize, Serialize};

/// One stored artifact returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadResponse {
    pub file_name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl FileUploadResponse {
    /// Path as a `file://` URI, the form model deployments expect.
    pub fn file_uri(&self) -> String {
        format!("file://{}", self.path)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadList {
    #[serde(default)]
    pub file_upload_response_list: Vec<FileUploadResponse>,
}
