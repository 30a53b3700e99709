use std::path::PathBuf;

use clap::{Parser, Subcommand};
use skil_common::{ResourceId, ResourceSubType, ResourceType};

#[derive(Debug, Parser)]
#[command(name = "skil")]
#[command(about = "SKIL platform client", long_about = None)]
pub struct Args {
    /// Platform host
    #[arg(long, env = "SKIL_HOST", default_value = "localhost")]
    pub host: String,

    /// Platform port
    #[arg(long, env = "SKIL_PORT", default_value_t = 9008)]
    pub port: u16,

    #[arg(long, env = "SKIL_USER", default_value = "admin")]
    pub user: String,

    #[arg(long, env = "SKIL_PASSWORD", default_value = "admin", hide_env_values = true)]
    pub password: String,

    /// Default server id; skips Model History discovery
    #[arg(long, env = "SKIL_SERVER_ID")]
    pub server_id: Option<String>,

    /// Saved connection file (default: $HOME/.skil/config.json)
    #[arg(long, env = "SKIL_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Reconnect with the last saved connection instead of host/port/user flags
    #[arg(long)]
    pub saved: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and save the connection for later `--saved` use
    Login,
    /// Print the default (Model History) server id
    Server,
    /// Upload model files
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Query and remove resources
    Resources {
        #[command(subcommand)]
        subcommand: ResourceCommand,
    },
    /// Register compute resources
    Compute {
        #[command(subcommand)]
        subcommand: ComputeCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ResourceCommand {
    /// List resources, optionally filtered
    List {
        /// COMPUTE or STORAGE
        #[arg(long = "type", conflicts_with = "sub_type")]
        kind: Option<ResourceType>,
        /// EMR, S3, GoogleStorage, DataProc, HDInsight, AzureStorage, HDFS, YARN
        #[arg(long)]
        sub_type: Option<ResourceSubType>,
    },
    /// Show one resource
    Get { id: ResourceId },
    /// Show backend details of one resource
    Details { id: ResourceId },
    /// Delete a resource by id
    Delete { id: ResourceId },
}

#[derive(Debug, Subcommand)]
pub enum ComputeCommand {
    /// Register an AWS EMR cluster
    Emr {
        #[arg(long)]
        name: String,
        #[arg(long)]
        region: String,
        #[arg(long)]
        credential_uri: String,
        /// Leave unset if the cluster id is not known yet
        #[arg(long)]
        cluster_id: Option<String>,
    },
    /// Register a Google Dataproc cluster
    Dataproc {
        #[arg(long)]
        name: String,
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        region: String,
        #[arg(long)]
        spark_cluster_name: String,
    },
    /// Register an Azure HDInsight cluster
    Hdinsight {
        #[arg(long)]
        name: String,
        #[arg(long)]
        subscription_id: String,
        #[arg(long)]
        resource_group_name: String,
        #[arg(long)]
        cluster_name: String,
    },
    /// Register a self-managed YARN cluster
    Yarn {
        #[arg(long)]
        name: String,
        #[arg(long)]
        local_spark_home: String,
    },
}
