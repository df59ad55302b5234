// dag-artifact/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use dag_artifact_core::domain::{ArtifactVersion, DagId};

#[derive(Parser)]
#[command(name = "dag-artifact")]
#[command(about = "Versioned Airflow DAG artifacts for MWAA (S3 + DynamoDB)", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🏗️  Creates the artifact bucket and metadata table if missing
    Bootstrap {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// DynamoDB read capacity (provisioned billing when set)
        #[arg(long)]
        read_capacity: Option<i64>,

        /// DynamoDB write capacity (provisioned billing when set)
        #[arg(long)]
        write_capacity: Option<i64>,
    },

    /// 🚀 Uploads a DAG script to LATEST and deploys '<dag_id>_latest'
    Publish {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        dag_id: DagId,

        /// Path to the DAG python file
        #[arg(long)]
        script: PathBuf,

        /// Extra object metadata (repeatable, KEY=VALUE)
        #[arg(long = "metadata", value_parser = parse_key_val)]
        metadata: Vec<(String, String)>,

        /// Object tags (repeatable, KEY=VALUE)
        #[arg(long = "tag", value_parser = parse_key_val)]
        tags: Vec<(String, String)>,
    },

    /// 📦 Cuts an immutable version from LATEST and deploys '<dag_id>_v<n>'
    Release {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        dag_id: DagId,
    },

    /// ⏪ Redeploys a stored version (LATEST or a number)
    Deploy {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        dag_id: DagId,

        /// LATEST, 3 or 000003
        #[arg(long = "version", id = "artifact_version")]
        version: ArtifactVersion,
    },

    /// 📜 Lists the stored versions of a DAG
    Versions {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        dag_id: DagId,
    },

    /// 🗑️  Deletes every stored version of a DAG
    Purge {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        dag_id: DagId,
    },

    /// 💣 Deletes every stored artifact and metadata record
    PurgeAll {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid KEY=VALUE: no `=` found in `{}`", s)),
    }
}
