pub mod auth;
pub mod resource;
pub mod service;
pub mod upload;

pub use auth::{Credentials, Token};
pub use resource::{
    AddResourceRequest, DataProcResourceDetails, EmrResourceDetails, HdInsightResourceDetails,
    ParseResourceError, Resource, ResourceDetails, ResourceId, ResourceSubType, ResourceType,
    YarnResourceDetails,
};
pub use service::{ServiceInfo, ServiceList};
pub use upload::{FileUploadList, FileUploadResponse};

pub mod telemetry;
