//! Blocking client for the SKIL machine-learning platform.
//!
//! A [`Session`] logs in once, keeps the bearer token in a single
//! [`Authorization`] provider and passes it to every [`Platform`] call.
//! [`ComputeResource`] registers external clusters through a session.

pub mod auth;
pub mod compute;
pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod platform;
pub mod session;

pub use auth::Authorization;
pub use compute::{ComputeBackend, ComputeResource};
pub use config::{ConfigError, ConfigStore, FileConfigStore, MemoryConfigStore, SavedConfig};
pub use error::{Error, Result};
pub use http::HttpPlatform;
pub use memory::MemoryPlatform;
pub use platform::{Platform, PlatformError};
pub use session::{Session, SessionOptions};
