use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type ResourceId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    Compute,
    Storage,
}

impl ResourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Compute => "COMPUTE",
            ResourceType::Storage => "STORAGE",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = ParseResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "COMPUTE" => Ok(ResourceType::Compute),
            "STORAGE" => Ok(ResourceType::Storage),
            _ => Err(ParseResourceError(s.to_string())),
        }
    }
}

/// Backend tag of a resource.
///
/// - `Emr`: AWS Elastic MapReduce (compute)
/// - `S3`: AWS Simple Storage Service
/// - `GoogleStorage`: Google Cloud Storage
/// - `DataProc`: Google Dataproc (compute)
/// - `HdInsight`: Azure HDInsight (compute)
/// - `AzureStorage`: Azure Blob Storage
/// - `Hdfs`: self-managed Hadoop filesystem (storage)
/// - `Yarn`: self-managed YARN (compute)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceSubType {
    #[serde(rename = "EMR")]
    Emr,
    S3,
    GoogleStorage,
    DataProc,
    #[serde(rename = "HDInsight")]
    HdInsight,
    AzureStorage,
    #[serde(rename = "HDFS")]
    Hdfs,
    #[serde(rename = "YARN")]
    Yarn,
}

impl ResourceSubType {
    pub const ALL: [ResourceSubType; 8] = [
        ResourceSubType::Emr,
        ResourceSubType::S3,
        ResourceSubType::GoogleStorage,
        ResourceSubType::DataProc,
        ResourceSubType::HdInsight,
        ResourceSubType::AzureStorage,
        ResourceSubType::Hdfs,
        ResourceSubType::Yarn,
    ];

    /// Wire token, also used as the path segment of sub-type queries.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceSubType::Emr => "EMR",
            ResourceSubType::S3 => "S3",
            ResourceSubType::GoogleStorage => "GoogleStorage",
            ResourceSubType::DataProc => "DataProc",
            ResourceSubType::HdInsight => "HDInsight",
            ResourceSubType::AzureStorage => "AzureStorage",
            ResourceSubType::Hdfs => "HDFS",
            ResourceSubType::Yarn => "YARN",
        }
    }

    pub fn category(self) -> ResourceType {
        match self {
            ResourceSubType::Emr
            | ResourceSubType::DataProc
            | ResourceSubType::HdInsight
            | ResourceSubType::Yarn => ResourceType::Compute,
            ResourceSubType::S3
            | ResourceSubType::GoogleStorage
            | ResourceSubType::AzureStorage
            | ResourceSubType::Hdfs => ResourceType::Storage,
        }
    }
}

impl fmt::Display for ResourceSubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource type '{0}'")]
pub struct ParseResourceError(pub String);

impl FromStr for ResourceSubType {
    type Err = ParseResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceSubType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseResourceError(s.to_string()))
    }
}

/// A resource as listed by the platform. Backend details are fetched
/// separately through the details endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub resource_id: ResourceId,
    pub resource_name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub sub_type: ResourceSubType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmrResourceDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataProcResourceDetails {
    pub project_id: String,
    pub region: String,
    pub spark_cluster_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HdInsightResourceDetails {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub cluster_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YarnResourceDetails {
    pub local_spark_home: String,
}

/// Backend payload of an add-resource request; serialized bare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceDetails {
    DataProc(DataProcResourceDetails),
    HdInsight(HdInsightResourceDetails),
    Emr(EmrResourceDetails),
    Yarn(YarnResourceDetails),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddResourceRequest {
    pub resource_name: String,
    pub resource_details: ResourceDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_uri: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub sub_type: ResourceSubType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_type_parse_is_case_insensitive() {
        assert_eq!("emr".parse::<ResourceSubType>(), Ok(ResourceSubType::Emr));
        assert_eq!("hdinsight".parse::<ResourceSubType>(), Ok(ResourceSubType::HdInsight));
        assert_eq!("GoogleStorage".parse::<ResourceSubType>(), Ok(ResourceSubType::GoogleStorage));
        assert!("Kubernetes".parse::<ResourceSubType>().is_err());
    }

    #[test]
    fn test_sub_type_categories() {
        let compute: Vec<_> = ResourceSubType::ALL
            .into_iter()
            .filter(|t| t.category() == ResourceType::Compute)
            .map(ResourceSubType::as_str)
            .collect();
        assert_eq!(compute, vec!["EMR", "DataProc", "HDInsight", "YARN"]);
    }

    #[test]
    fn test_sub_type_wire_token_matches_display() {
        for t in ResourceSubType::ALL {
            let wire = serde_json::to_value(t).unwrap();
            assert_eq!(wire, serde_json::Value::String(t.to_string()));
        }
    }

    #[test]
    fn test_add_resource_request_shape() {
        let req = AddResourceRequest {
            resource_name: "emr-prod".to_string(),
            resource_details: ResourceDetails::Emr(EmrResourceDetails {
                cluster_id: None,
                region: "us-east-1".to_string(),
            }),
            credential_uri: Some("s3://creds/aws.json".to_string()),
            resource_type: ResourceType::Compute,
            sub_type: ResourceSubType::Emr,
        };

        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "resourceName": "emr-prod",
                "resourceDetails": {"region": "us-east-1"},
                "credentialUri": "s3://creds/aws.json",
                "type": "COMPUTE",
                "subType": "EMR",
            })
        );
    }

    #[test]
    fn test_resource_listing_ignores_extra_fields() {
        let resource: Resource = serde_json::from_value(serde_json::json!({
            "resourceId": 7,
            "resourceName": "lake",
            "type": "STORAGE",
            "subType": "S3",
            "bucket": "models",
        }))
        .unwrap();
        assert_eq!(resource.resource_id, 7);
        assert_eq!(resource.resource_type, ResourceType::Storage);
        assert_eq!(resource.sub_type, ResourceSubType::S3);
    }
}
