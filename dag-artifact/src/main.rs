// dag-artifact/src/main.rs

mod cli;
mod commands;

use clap::Parser;

use cli::{Cli, Commands};
use dag_artifact_core::DagArtifactError;
use dag_artifact_core::infrastructure::error::InfrastructureError;

#[tokio::main]
async fn main() {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug dag-artifact publish ... pour voir les détails
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Bootstrap {
            project_dir,
            read_capacity,
            write_capacity,
        } => commands::bootstrap::execute(project_dir, read_capacity, write_capacity).await,
        Commands::Publish {
            project_dir,
            dag_id,
            script,
            metadata,
            tags,
        } => commands::publish::execute(project_dir, dag_id, script, metadata, tags).await,
        Commands::Release {
            project_dir,
            dag_id,
        } => commands::release::execute(project_dir, dag_id).await,
        Commands::Deploy {
            project_dir,
            dag_id,
            version,
        } => commands::deploy::execute(project_dir, dag_id, version).await,
        Commands::Versions {
            project_dir,
            dag_id,
        } => commands::versions::execute(project_dir, dag_id).await,
        Commands::Purge {
            project_dir,
            dag_id,
        } => commands::purge::execute(project_dir, dag_id).await,
        Commands::PurgeAll { project_dir, yes } => {
            commands::purge::execute_all(project_dir, yes).await
        }
    };

    if let Err(err) = result {
        report(err);
        // Exit with error code for CI/CD
        std::process::exit(1);
    }
}

/// Storage errors come with a suggestion, the other layers with miette diagnostics.
fn report(err: anyhow::Error) {
    match err.downcast::<DagArtifactError>() {
        Ok(DagArtifactError::Infrastructure(InfrastructureError::Storage(e))) => {
            eprintln!("❌ {}", e.display_rich())
        }
        Ok(DagArtifactError::Domain(e)) => eprintln!("{:?}", miette::Report::new(e)),
        Ok(DagArtifactError::Infrastructure(e)) => eprintln!("{:?}", miette::Report::new(e)),
        Ok(other) => eprintln!("❌ {}", other),
        Err(err) => eprintln!("❌ {:#}", err),
    }
}
