use serde::{Deserialize, Serialize};

/// A service instance as reported by `GET /services`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceList {
    #[serde(default)]
    pub service_info_list: Vec<ServiceInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_list_envelope() {
        let list: ServiceList = serde_json::from_value(serde_json::json!({
            "serviceInfoList": [
                {"id": "a1", "name": "Zeppelin Notebook"},
                {"id": "b2", "name": "Model History Server", "status": "STARTED"},
            ]
        }))
        .unwrap();

        assert_eq!(list.service_info_list.len(), 2);
        assert_eq!(list.service_info_list[1].id, "b2");
        assert_eq!(list.service_info_list[1].status.as_deref(), Some("STARTED"));
        assert_eq!(list.service_info_list[0].status, None);
    }

    #[test]
    fn test_missing_list_is_empty() {
        let list: ServiceList = serde_json::from_str("{}").unwrap();
        assert!(list.service_info_list.is_empty());
    }
}
