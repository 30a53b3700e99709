use std::fmt;
use std::path::Path;

use serde_json::Value;
use skil_common::{Credentials, FileUploadResponse, Resource, ResourceId, ResourceSubType, ResourceType};

use crate::auth::Authorization;
use crate::config::{ConfigError, ConfigStore, SavedConfig};
use crate::error::{Error, Result};
use crate::http::{base_url, HttpPlatform};
use crate::platform::Platform;

const MODEL_HISTORY: &str = "Model History";

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub host: String,
    pub port: u16,
    pub credentials: Credentials,
    /// Skip discovery and use this server id as the default.
    pub server_id: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9008,
            credentials: Credentials::default(),
            server_id: None,
        }
    }
}

impl SessionOptions {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn server_id(mut self, server_id: impl Into<String>) -> Self {
        self.server_id = Some(server_id.into());
        self
    }

    /// Options from the last successful login recorded in `store`.
    pub fn from_store(store: &dyn ConfigStore) -> Result<Self> {
        let saved = store
            .load()?
            .ok_or_else(|| ConfigError::Missing(store.location()))?;
        Ok(saved.into())
    }

    fn to_saved(&self) -> SavedConfig {
        SavedConfig {
            host: self.host.clone(),
            port: self.port,
            username: self.credentials.user_id.clone(),
            password: self.credentials.password.clone(),
        }
    }
}

impl From<SavedConfig> for SessionOptions {
    fn from(saved: SavedConfig) -> Self {
        Self {
            host: saved.host,
            port: saved.port,
            credentials: Credentials::new(saved.username, saved.password),
            server_id: None,
        }
    }
}

/// One authenticated connection to a SKIL platform.
pub struct Session<P = HttpPlatform> {
    platform: P,
    auth: Authorization,
    server_id: Option<String>,
    uploads: Vec<FileUploadResponse>,
    uploaded_model_names: Vec<String>,
}

impl Session<HttpPlatform> {
    /// Log in over HTTP and record the connection in `store`.
    pub fn open(options: SessionOptions, store: &dyn ConfigStore) -> Result<Self> {
        let platform = HttpPlatform::from_host_port(&options.host, options.port).map_err(
            |source| Error::Authentication {
                endpoint: base_url(&options.host, options.port),
                source,
            },
        )?;
        Self::open_with(platform, options, store)
    }

    /// Reconnect with whatever the last successful login saved.
    pub fn open_from_saved_config(store: &dyn ConfigStore) -> Result<Self> {
        let options = SessionOptions::from_store(store)?;
        Self::open(options, store)
    }
}

impl<P: Platform> Session<P> {
    /// Log in through `platform` and record the connection in `store`.
    ///
    /// The config is saved as soon as login succeeds. Discovery happens later
    /// in [`Session::resolve_default_server`], so a saved config does not mean
    /// the platform has a Model History service.
    pub fn open_with(platform: P, options: SessionOptions, store: &dyn ConfigStore) -> Result<Self> {
        tracing::info!(
            endpoint=%platform.endpoint(),
            user=%options.credentials.user_id,
            "authenticating"
        );
        let token = platform
            .login(&options.credentials)
            .map_err(|source| Error::Authentication {
                endpoint: platform.endpoint().to_string(),
                source,
            })?;
        let auth = Authorization::bearer(&token.token);

        store.save(&options.to_saved())?;
        tracing::info!(endpoint=%platform.endpoint(), "authenticated");

        Ok(Self {
            platform,
            auth,
            server_id: options.server_id,
            uploads: Vec::new(),
            uploaded_model_names: Vec::new(),
        })
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn endpoint(&self) -> &str {
        self.platform.endpoint()
    }

    pub fn authorization(&self) -> &Authorization {
        &self.auth
    }

    /// The default server id, if supplied or already resolved.
    pub fn server_id(&self) -> Option<&str> {
        self.server_id.as_deref()
    }

    /// Default server id, discovering the Model History service on first use.
    /// When several services match, the last one listed is used.
    pub fn resolve_default_server(&mut self) -> Result<&str> {
        let id = match self.server_id.take() {
            Some(id) => id,
            None => self.discover_model_history()?,
        };
        Ok(self.server_id.insert(id).as_str())
    }

    fn discover_model_history(&self) -> Result<String> {
        let services = self
            .platform
            .list_services(&self.auth)
            .map_err(|source| Error::ServiceDiscovery {
                reason: "could not list services".to_string(),
                source: Some(source),
            })?;

        let matching: Vec<_> = services
            .iter()
            .filter(|s| s.name.contains(MODEL_HISTORY))
            .collect();
        let Some(found) = matching.last() else {
            return Err(Error::ServiceDiscovery {
                reason: "could not detect default model history server instance, is SKIL running?"
                    .to_string(),
                source: None,
            });
        };
        if matching.len() > 1 {
            tracing::warn!(
                chosen=%found.id,
                listed = matching.len(),
                "several model history servers listed, using the last"
            );
        }
        tracing::info!(server_id=%found.id, name=%found.name, "resolved default server");
        Ok(found.id.clone())
    }

    /// Upload a model file; returns the records the platform stored for it.
    pub fn upload_model(&mut self, path: impl AsRef<Path>) -> Result<&[FileUploadResponse]> {
        let path = path.as_ref();
        tracing::info!(file=%path.display(), "uploading model, this might take a while");
        let records = self
            .platform
            .upload_file(&self.auth, path)
            .map_err(Error::remote("model upload"))?;

        let start = self.uploads.len();
        self.uploads.extend(records);
        self.uploaded_model_names
            .push(path.to_string_lossy().into_owned());
        for record in &self.uploads[start..] {
            tracing::info!(file_name=%record.file_name, path=%record.path, "model uploaded");
        }
        Ok(&self.uploads[start..])
    }

    /// Names passed to [`Session::upload_model`], in call order.
    pub fn uploaded_model_names(&self) -> &[String] {
        &self.uploaded_model_names
    }

    pub fn uploads(&self) -> &[FileUploadResponse] {
        &self.uploads
    }

    /// `file://` URI of an earlier upload whose recorded file name is
    /// exactly `name`.
    pub fn model_path(&self, name: &str) -> Result<String> {
        self.uploads
            .iter()
            .find(|u| u.file_name == name)
            .map(FileUploadResponse::file_uri)
            .ok_or_else(|| Error::NotFound {
                name: name.to_string(),
            })
    }

    pub fn list_compute_resources(&self) -> Result<Vec<Resource>> {
        self.platform
            .get_resources_by_type(&self.auth, ResourceType::Compute)
            .map_err(Error::remote("list compute resources"))
    }

    pub fn list_storage_resources(&self) -> Result<Vec<Resource>> {
        self.platform
            .get_resources_by_type(&self.auth, ResourceType::Storage)
            .map_err(Error::remote("list storage resources"))
    }

    pub fn list_all_resources(&self) -> Result<Vec<Resource>> {
        self.platform
            .get_resources(&self.auth)
            .map_err(Error::remote("list resources"))
    }

    pub fn resource_by_id(&self, id: ResourceId) -> Result<Resource> {
        self.platform
            .get_resource_by_id(&self.auth, id)
            .map_err(Error::remote("get resource"))
    }

    pub fn resource_details_by_id(&self, id: ResourceId) -> Result<Value> {
        self.platform
            .get_resource_details_by_id(&self.auth, id)
            .map_err(Error::remote("get resource details"))
    }

    pub fn resources_by_sub_type(&self, sub_type: ResourceSubType) -> Result<Vec<Resource>> {
        self.platform
            .get_resources_by_sub_type(&self.auth, sub_type)
            .map_err(Error::remote("list resources by sub type"))
    }

    pub fn delete_resource(&self, id: ResourceId) -> Result<()> {
        self.platform
            .delete_resource_by_id(&self.auth, id)
            .map_err(Error::remote("delete resource"))?;
        tracing::info!(resource_id = id, "resource deleted");
        Ok(())
    }
}

impl<P: Platform> fmt::Debug for Session<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.platform.endpoint())
            .field("server_id", &self.server_id)
            .field("uploads", &self.uploads.len())
            .finish_non_exhaustive()
    }
}
