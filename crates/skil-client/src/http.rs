use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use skil_common::{
    AddResourceRequest, Credentials, FileUploadList, FileUploadResponse, Resource, ResourceId,
    ResourceSubType, ResourceType, ServiceInfo, ServiceList, Token,
};

use crate::auth::Authorization;
use crate::platform::{Platform, PlatformError};

/// Build the platform base URL from a host and port. A host given with a
/// scheme keeps it; a bare host gets `http://`.
pub fn base_url(host: &str, port: u16) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{host}:{port}")
    } else {
        format!("http://{host}:{port}")
    }
}

/// [`Platform`] over the SKIL REST API.
#[derive(Debug, Clone)]
pub struct HttpPlatform {
    base_url: String,
    http: Client,
}

impl HttpPlatform {
    pub fn new(base_url: impl Into<String>) -> Result<Self, PlatformError> {
        // Model uploads can be large; the blocking client's 30s default is too short.
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(3))
            .timeout(Duration::from_secs(600))
            .build()?;
        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn from_host_port(host: &str, port: u16) -> Result<Self, PlatformError> {
        Self::new(base_url(host, port))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn checked(req: RequestBuilder) -> Result<Response, PlatformError> {
        let resp = req.send()?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().unwrap_or_default();
        tracing::debug!(%status, body=%body, "platform returned error");
        Err(PlatformError::status(status.as_u16(), body))
    }

    fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PlatformError> {
        let bytes = Self::checked(req)?.bytes()?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn get<T: DeserializeOwned>(&self, auth: &Authorization, path: &str) -> Result<T, PlatformError> {
        let url = self.url(path);
        tracing::debug!(url=%url, "GET");
        Self::send(auth.apply(self.http.get(&url)))
    }
}

impl Platform for HttpPlatform {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    fn login(&self, credentials: &Credentials) -> Result<Token, PlatformError> {
        let url = self.url("/login");
        tracing::debug!(url=%url, user=%credentials.user_id, "POST");
        Self::send(self.http.post(&url).json(credentials))
    }

    fn list_services(&self, auth: &Authorization) -> Result<Vec<ServiceInfo>, PlatformError> {
        let list: ServiceList = self.get(auth, "/services")?;
        Ok(list.service_info_list)
    }

    fn upload_file(
        &self,
        auth: &Authorization,
        path: &Path,
    ) -> Result<Vec<FileUploadResponse>, PlatformError> {
        let form = multipart::Form::new()
            .file("file", path)
            .map_err(|source| PlatformError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let url = self.url("/api/upload/model");
        tracing::debug!(url=%url, file=%path.display(), "POST multipart");
        let list: FileUploadList = Self::send(auth.apply(self.http.post(&url)).multipart(form))?;
        Ok(list.file_upload_response_list)
    }

    fn get_resources(&self, auth: &Authorization) -> Result<Vec<Resource>, PlatformError> {
        self.get(auth, "/resources")
    }

    fn get_resource_by_id(
        &self,
        auth: &Authorization,
        id: ResourceId,
    ) -> Result<Resource, PlatformError> {
        self.get(auth, &format!("/resources/{id}"))
    }

    fn get_resource_details_by_id(
        &self,
        auth: &Authorization,
        id: ResourceId,
    ) -> Result<Value, PlatformError> {
        self.get(auth, &format!("/resources/details/{id}"))
    }

    fn get_resources_by_type(
        &self,
        auth: &Authorization,
        resource_type: ResourceType,
    ) -> Result<Vec<Resource>, PlatformError> {
        self.get(auth, &format!("/resources/type/{resource_type}"))
    }

    fn get_resources_by_sub_type(
        &self,
        auth: &Authorization,
        sub_type: ResourceSubType,
    ) -> Result<Vec<Resource>, PlatformError> {
        self.get(auth, &format!("/resources/subtype/{sub_type}"))
    }

    fn add_resource(
        &self,
        auth: &Authorization,
        request: &AddResourceRequest,
    ) -> Result<ResourceId, PlatformError> {
        let url = self.url("/resources/add");
        tracing::debug!(url=%url, name=%request.resource_name, sub_type=%request.sub_type, "POST");
        let resp: Value = Self::send(auth.apply(self.http.post(&url)).json(request))?;
        resp.get("resourceId")
            .and_then(Value::as_i64)
            .ok_or(PlatformError::MissingField("resourceId"))
    }

    fn delete_resource_by_id(
        &self,
        auth: &Authorization,
        id: ResourceId,
    ) -> Result<(), PlatformError> {
        let url = self.url(&format!("/resources/remove/{id}"));
        tracing::debug!(url=%url, "DELETE");
        Self::checked(auth.apply(self.http.delete(&url)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_adds_scheme() {
        assert_eq!(base_url("localhost", 9008), "http://localhost:9008");
        assert_eq!(base_url("https://skil.internal/", 443), "https://skil.internal:443");
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let platform = HttpPlatform::with_client("http://localhost:9008/", Client::new());
        assert_eq!(platform.endpoint(), "http://localhost:9008");
        assert_eq!(platform.url("/resources/add"), "http://localhost:9008/resources/add");
    }
}
