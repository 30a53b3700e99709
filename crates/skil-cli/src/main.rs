mod args;
mod output;

use anyhow::Result;
use clap::Parser;

use skil_client::{
    ComputeBackend, ComputeResource, ConfigStore, FileConfigStore, Session, SessionOptions,
};
use skil_common::telemetry::init_tracing;
use skil_common::{Credentials, ResourceType};

use crate::args::{Args, Command, ComputeCommand, ResourceCommand};
use crate::output::{print_details, print_resource, print_resources, print_uploads};

fn compute_backend(command: ComputeCommand) -> (String, ComputeBackend) {
    match command {
        ComputeCommand::Emr {
            name,
            region,
            credential_uri,
            cluster_id,
        } => (
            name,
            ComputeBackend::Emr {
                region,
                credential_uri,
                cluster_id,
            },
        ),
        ComputeCommand::Dataproc {
            name,
            project_id,
            region,
            spark_cluster_name,
        } => (
            name,
            ComputeBackend::DataProc {
                project_id,
                region,
                spark_cluster_name,
            },
        ),
        ComputeCommand::Hdinsight {
            name,
            subscription_id,
            resource_group_name,
            cluster_name,
        } => (
            name,
            ComputeBackend::HdInsight {
                subscription_id,
                resource_group_name,
                cluster_name,
            },
        ),
        ComputeCommand::Yarn {
            name,
            local_spark_home,
        } => (name, ComputeBackend::Yarn { local_spark_home }),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing("skil-cli", &args.log_level);

    let store = match &args.config {
        Some(path) => FileConfigStore::new(path),
        None => FileConfigStore::from_env(),
    };

    let mut options = if args.saved {
        SessionOptions::from_store(&store)?
    } else {
        SessionOptions::new(args.host, args.port).credentials(Credentials::new(args.user, args.password))
    };
    if let Some(id) = args.server_id {
        options = options.server_id(id);
    }
    let user = options.credentials.user_id.clone();

    let mut session = Session::open(options, &store)?;

    match args.command {
        Command::Login => {
            println!("✓ Logged in to {} as '{}'", session.endpoint(), user);
            println!("  Connection saved to {}", store.location());
        }
        Command::Server => {
            let id = session.resolve_default_server()?;
            println!("{id}");
        }
        Command::Upload { paths } => {
            for path in paths {
                let records = session.upload_model(&path)?;
                print_uploads(records);
            }
        }
        Command::Resources { subcommand } => match subcommand {
            ResourceCommand::List { kind, sub_type } => {
                let (title, resources) = match (kind, sub_type) {
                    (Some(ResourceType::Compute), _) => {
                        ("Compute Resources".to_string(), session.list_compute_resources()?)
                    }
                    (Some(ResourceType::Storage), _) => {
                        ("Storage Resources".to_string(), session.list_storage_resources()?)
                    }
                    (None, Some(sub_type)) => (
                        format!("{sub_type} Resources"),
                        session.resources_by_sub_type(sub_type)?,
                    ),
                    (None, None) => ("Resources".to_string(), session.list_all_resources()?),
                };
                print_resources(&title, &resources);
            }
            ResourceCommand::Get { id } => {
                print_resource(&session.resource_by_id(id)?);
            }
            ResourceCommand::Details { id } => {
                print_details(id, &session.resource_details_by_id(id)?);
            }
            ResourceCommand::Delete { id } => {
                session.delete_resource(id)?;
                println!("✓ Resource {id} deleted");
            }
        },
        Command::Compute { subcommand } => {
            let (name, backend) = compute_backend(subcommand);
            let resource = ComputeResource::register(&session, name, backend)?;
            println!(
                "✓ Registered {} resource '{}' with id {}",
                resource.backend().sub_type(),
                resource.name(),
                resource.id()
            );
        }
    }

    Ok(())
}
