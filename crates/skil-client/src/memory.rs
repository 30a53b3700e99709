use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use skil_common::{
    AddResourceRequest, Credentials, FileUploadResponse, Resource, ResourceDetails, ResourceId,
    ResourceSubType, ResourceType, ServiceInfo, Token,
};

use crate::auth::Authorization;
use crate::platform::{Platform, PlatformError};

const UPLOAD_ROOT: &str = "/opt/skil/uploads";

/// In-process [`Platform`] that behaves like a SKIL server: it checks
/// credentials and bearer tokens, assigns resource ids, and rejects
/// add-resource payloads a server would refuse.
#[derive(Debug)]
pub struct MemoryPlatform {
    credentials: Credentials,
    inner: RefCell<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    issued_token: Option<String>,
    logins: u64,
    services: Vec<ServiceInfo>,
    services_failure: Option<u16>,
    next_id: ResourceId,
    resources: BTreeMap<ResourceId, (Resource, Value)>,
    seen_authorizations: Vec<String>,
}

impl MemoryPlatform {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            inner: RefCell::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }

    pub fn with_services(self, services: Vec<ServiceInfo>) -> Self {
        self.inner.borrow_mut().services = services;
        self
    }

    /// Make `GET /services` answer with `status` from now on.
    pub fn fail_service_listing(&self, status: u16) {
        self.inner.borrow_mut().services_failure = Some(status);
    }

    /// Seed a resource as if another client had registered it.
    pub fn insert_resource(
        &self,
        name: &str,
        sub_type: ResourceSubType,
        details: Value,
    ) -> ResourceId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let resource = Resource {
            resource_id: id,
            resource_name: name.to_string(),
            resource_type: sub_type.category(),
            sub_type,
        };
        inner.resources.insert(id, (resource, details));
        id
    }

    pub fn contains_resource(&self, id: ResourceId) -> bool {
        self.inner.borrow().resources.contains_key(&id)
    }

    /// `Authorization` header values of every authorized call, in order.
    pub fn seen_authorizations(&self) -> Vec<String> {
        self.inner.borrow().seen_authorizations.clone()
    }

    fn authorize(&self, auth: &Authorization) -> Result<(), PlatformError> {
        let mut inner = self.inner.borrow_mut();
        inner
            .seen_authorizations
            .push(auth.header_value().to_string());
        match inner.issued_token.as_deref() {
            Some(token) if token == auth.token() => Ok(()),
            _ => Err(PlatformError::status(401, "invalid or missing bearer token")),
        }
    }

    fn filtered(&self, keep: impl Fn(&Resource) -> bool) -> Vec<Resource> {
        self.inner
            .borrow()
            .resources
            .values()
            .map(|(r, _)| r)
            .filter(|r| keep(r))
            .cloned()
            .collect()
    }
}

fn validate(request: &AddResourceRequest) -> Result<(), String> {
    if request.resource_name.trim().is_empty() {
        return Err("resourceName must not be empty".to_string());
    }
    if request.sub_type.category() != request.resource_type {
        return Err(format!(
            "sub type {} is not a {} resource",
            request.sub_type, request.resource_type
        ));
    }
    let required: Vec<(&str, &str)> = match (&request.resource_details, request.sub_type) {
        (ResourceDetails::Emr(d), ResourceSubType::Emr) => {
            vec![("region", d.region.as_str())]
        }
        (ResourceDetails::DataProc(d), ResourceSubType::DataProc) => vec![
            ("projectId", d.project_id.as_str()),
            ("region", d.region.as_str()),
            ("sparkClusterName", d.spark_cluster_name.as_str()),
        ],
        (ResourceDetails::HdInsight(d), ResourceSubType::HdInsight) => vec![
            ("subscriptionId", d.subscription_id.as_str()),
            ("resourceGroupName", d.resource_group_name.as_str()),
            ("clusterName", d.cluster_name.as_str()),
        ],
        (ResourceDetails::Yarn(d), ResourceSubType::Yarn) => {
            vec![("localSparkHome", d.local_spark_home.as_str())]
        }
        _ => {
            return Err(format!(
                "resource details do not match sub type {}",
                request.sub_type
            ))
        }
    };
    match required.into_iter().find(|(_, v)| v.trim().is_empty()) {
        Some((field, _)) => Err(format!("{field} must not be empty")),
        None => Ok(()),
    }
}

impl Platform for MemoryPlatform {
    fn endpoint(&self) -> &str {
        "memory://skil"
    }

    fn login(&self, credentials: &Credentials) -> Result<Token, PlatformError> {
        if *credentials != self.credentials {
            return Err(PlatformError::status(401, "invalid credentials"));
        }
        let mut inner = self.inner.borrow_mut();
        inner.logins += 1;
        let token = format!("memory-token-{}", inner.logins);
        inner.issued_token = Some(token.clone());
        Ok(Token { token })
    }

    fn list_services(&self, auth: &Authorization) -> Result<Vec<ServiceInfo>, PlatformError> {
        self.authorize(auth)?;
        let inner = self.inner.borrow();
        match inner.services_failure {
            Some(status) => Err(PlatformError::status(status, "service listing unavailable")),
            None => Ok(inner.services.clone()),
        }
    }

    fn upload_file(
        &self,
        auth: &Authorization,
        path: &Path,
    ) -> Result<Vec<FileUploadResponse>, PlatformError> {
        self.authorize(auth)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| PlatformError::status(400, "upload has no file name"))?;
        Ok(vec![FileUploadResponse {
            path: format!("{UPLOAD_ROOT}/{file_name}"),
            file_name,
            status: Some("uploaded".to_string()),
        }])
    }

    fn get_resources(&self, auth: &Authorization) -> Result<Vec<Resource>, PlatformError> {
        self.authorize(auth)?;
        Ok(self.filtered(|_| true))
    }

    fn get_resource_by_id(
        &self,
        auth: &Authorization,
        id: ResourceId,
    ) -> Result<Resource, PlatformError> {
        self.authorize(auth)?;
        self.inner
            .borrow()
            .resources
            .get(&id)
            .map(|(r, _)| r.clone())
            .ok_or_else(|| PlatformError::status(404, format!("no resource with id {id}")))
    }

    fn get_resource_details_by_id(
        &self,
        auth: &Authorization,
        id: ResourceId,
    ) -> Result<Value, PlatformError> {
        self.authorize(auth)?;
        self.inner
            .borrow()
            .resources
            .get(&id)
            .map(|(_, details)| details.clone())
            .ok_or_else(|| PlatformError::status(404, format!("no resource with id {id}")))
    }

    fn get_resources_by_type(
        &self,
        auth: &Authorization,
        resource_type: ResourceType,
    ) -> Result<Vec<Resource>, PlatformError> {
        self.authorize(auth)?;
        Ok(self.filtered(|r| r.resource_type == resource_type))
    }

    fn get_resources_by_sub_type(
        &self,
        auth: &Authorization,
        sub_type: ResourceSubType,
    ) -> Result<Vec<Resource>, PlatformError> {
        self.authorize(auth)?;
        Ok(self.filtered(|r| r.sub_type == sub_type))
    }

    fn add_resource(
        &self,
        auth: &Authorization,
        request: &AddResourceRequest,
    ) -> Result<ResourceId, PlatformError> {
        self.authorize(auth)?;
        validate(request).map_err(|reason| PlatformError::status(400, reason))?;
        let details = serde_json::to_value(&request.resource_details)?;
        Ok(self.insert_resource(&request.resource_name, request.sub_type, details))
    }

    fn delete_resource_by_id(
        &self,
        auth: &Authorization,
        id: ResourceId,
    ) -> Result<(), PlatformError> {
        self.authorize(auth)?;
        match self.inner.borrow_mut().resources.remove(&id) {
            Some(_) => Ok(()),
            None => Err(PlatformError::status(404, format!("no resource with id {id}"))),
        }
    }
}
