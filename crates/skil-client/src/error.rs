use crate::config::ConfigError;
use crate::platform::PlatformError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("authentication against {endpoint} failed")]
    Authentication {
        endpoint: String,
        #[source]
        source: PlatformError,
    },

    #[error("service discovery failed: {reason}")]
    ServiceDiscovery {
        reason: String,
        #[source]
        source: Option<PlatformError>,
    },

    #[error("model resource '{name}' not found, did you upload it?")]
    NotFound { name: String },

    #[error("{operation} failed")]
    RemoteOperation {
        operation: &'static str,
        #[source]
        source: PlatformError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub(crate) fn remote(operation: &'static str) -> impl FnOnce(PlatformError) -> Error {
        move |source| Error::RemoteOperation { operation, source }
    }

    /// The platform's HTTP status, when the failure was a non-success response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Authentication { source, .. } | Error::RemoteOperation { source, .. } => {
                source.status_code()
            }
            Error::ServiceDiscovery { source, .. } => {
                source.as_ref().and_then(PlatformError::status_code)
            }
            Error::NotFound { .. } | Error::Config(_) => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
