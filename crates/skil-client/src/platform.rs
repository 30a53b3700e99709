use std::path::{Path, PathBuf};

use serde_json::Value;
use skil_common::{
    AddResourceRequest, Credentials, FileUploadResponse, Resource, ResourceId, ResourceSubType,
    ResourceType, ServiceInfo, Token,
};

use crate::auth::Authorization;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("platform returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response is missing field '{0}'")]
    MissingField(&'static str),
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PlatformError {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        PlatformError::Status {
            status,
            body: body.into(),
        }
    }

    /// HTTP status of a non-success response, if that is what failed.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PlatformError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The remote API surface a [`crate::Session`] talks to.
///
/// Every call except `login` carries the session's authorization; the
/// implementation attaches it to the outgoing request unchanged.
pub trait Platform {
    /// Human-readable address, used in logs and error messages.
    fn endpoint(&self) -> &str;

    fn login(&self, credentials: &Credentials) -> Result<Token, PlatformError>;

    fn list_services(&self, auth: &Authorization) -> Result<Vec<ServiceInfo>, PlatformError>;

    fn upload_file(
        &self,
        auth: &Authorization,
        path: &Path,
    ) -> Result<Vec<FileUploadResponse>, PlatformError>;

    fn get_resources(&self, auth: &Authorization) -> Result<Vec<Resource>, PlatformError>;

    fn get_resource_by_id(
        &self,
        auth: &Authorization,
        id: ResourceId,
    ) -> Result<Resource, PlatformError>;

    fn get_resource_details_by_id(
        &self,
        auth: &Authorization,
        id: ResourceId,
    ) -> Result<Value, PlatformError>;

    fn get_resources_by_type(
        &self,
        auth: &Authorization,
        resource_type: ResourceType,
    ) -> Result<Vec<Resource>, PlatformError>;

    fn get_resources_by_sub_type(
        &self,
        auth: &Authorization,
        sub_type: ResourceSubType,
    ) -> Result<Vec<Resource>, PlatformError>;

    /// Returns the id the platform assigned to the new resource.
    fn add_resource(
        &self,
        auth: &Authorization,
        request: &AddResourceRequest,
    ) -> Result<ResourceId, PlatformError>;

    fn delete_resource_by_id(
        &self,
        auth: &Authorization,
        id: ResourceId,
    ) -> Result<(), PlatformError>;
}
