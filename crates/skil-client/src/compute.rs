//! Compute resources: external clusters (EMR, Dataproc, HDInsight, YARN)
//! registered with the platform so jobs can be sent to them.

use skil_common::{
    AddResourceRequest, DataProcResourceDetails, EmrResourceDetails, HdInsightResourceDetails,
    ResourceDetails, ResourceId, ResourceSubType, ResourceType, YarnResourceDetails,
};

use crate::error::{Error, Result};
use crate::platform::Platform;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComputeBackend {
    /// AWS Elastic MapReduce. `cluster_id` may be unknown at registration.
    Emr {
        region: String,
        credential_uri: String,
        cluster_id: Option<String>,
    },
    /// Google Dataproc.
    DataProc {
        project_id: String,
        region: String,
        spark_cluster_name: String,
    },
    /// Azure HDInsight.
    HdInsight {
        subscription_id: String,
        resource_group_name: String,
        cluster_name: String,
    },
    /// Self-managed YARN reached through a local Spark installation.
    Yarn { local_spark_home: String },
}

impl ComputeBackend {
    pub fn sub_type(&self) -> ResourceSubType {
        match self {
            ComputeBackend::Emr { .. } => ResourceSubType::Emr,
            ComputeBackend::DataProc { .. } => ResourceSubType::DataProc,
            ComputeBackend::HdInsight { .. } => ResourceSubType::HdInsight,
            ComputeBackend::Yarn { .. } => ResourceSubType::Yarn,
        }
    }

    fn credential_uri(&self) -> Option<String> {
        match self {
            ComputeBackend::Emr { credential_uri, .. } => Some(credential_uri.clone()),
            _ => None,
        }
    }

    fn details(&self) -> ResourceDetails {
        match self.clone() {
            ComputeBackend::Emr {
                region, cluster_id, ..
            } => ResourceDetails::Emr(EmrResourceDetails { cluster_id, region }),
            ComputeBackend::DataProc {
                project_id,
                region,
                spark_cluster_name,
            } => ResourceDetails::DataProc(DataProcResourceDetails {
                project_id,
                region,
                spark_cluster_name,
            }),
            ComputeBackend::HdInsight {
                subscription_id,
                resource_group_name,
                cluster_name,
            } => ResourceDetails::HdInsight(HdInsightResourceDetails {
                subscription_id,
                resource_group_name,
                cluster_name,
            }),
            ComputeBackend::Yarn { local_spark_home } => {
                ResourceDetails::Yarn(YarnResourceDetails { local_spark_home })
            }
        }
    }

    fn add_request(&self, name: &str) -> AddResourceRequest {
        AddResourceRequest {
            resource_name: name.to_string(),
            resource_details: self.details(),
            credential_uri: self.credential_uri(),
            resource_type: ResourceType::Compute,
            sub_type: self.sub_type(),
        }
    }
}

/// A compute resource known to the platform. Only [`ComputeResource::register`]
/// creates one, so the id is always the one the platform assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeResource {
    id: ResourceId,
    name: String,
    backend: ComputeBackend,
}

impl ComputeResource {
    pub fn register<P: Platform>(
        session: &Session<P>,
        name: impl Into<String>,
        backend: ComputeBackend,
    ) -> Result<Self> {
        let name = name.into();
        let request = backend.add_request(&name);
        let id = session
            .platform()
            .add_resource(session.authorization(), &request)
            .map_err(Error::remote("add compute resource"))?;
        tracing::info!(resource_id = id, name=%name, sub_type=%request.sub_type, "compute resource registered");
        Ok(Self { id, name, backend })
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backend(&self) -> &ComputeBackend {
        &self.backend
    }

    /// Remove the resource from the platform. Local state is left as is;
    /// deleting twice fails if the platform no longer knows the id.
    pub fn delete<P: Platform>(&self, session: &Session<P>) -> Result<()> {
        session.delete_resource(self.id)
    }
}
