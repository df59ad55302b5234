use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const CONFIG: &str = r#"
backend: local
aws_region: us-east-1
s3_bucket: my-bucket
s3_prefix: airflow-artifact
dynamodb_table_name: airflow-artifact
dags_folder: dags
"#;

/// A throw-away project using the local backend.
struct ProjectEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl ProjectEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().to_path_buf();
        fs::write(root.join("dag_artifact.yaml"), CONFIG)?;
        Ok(Self { _tmp: tmp, root })
    }

    fn write_script(&self, dag_id: &str, task: &str) -> Result<PathBuf> {
        let path = self.root.join(format!("{}.py", dag_id));
        fs::write(
            &path,
            format!(
                "from airflow import DAG\n\nwith DAG(dag_id = \"{}\") as dag:\n    {}\n",
                dag_id, task
            ),
        )?;
        Ok(path)
    }

    fn dag_file(&self, file_name: &str) -> PathBuf {
        self.root.join("dags").join(file_name)
    }

    fn cli(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dag-artifact"));
        cmd.current_dir(&self.root);
        // Environment overrides would leak into the project config.
        for var in [
            "DAG_ARTIFACT_BACKEND",
            "DAG_ARTIFACT_AWS_REGION",
            "DAG_ARTIFACT_S3_BUCKET",
            "DAG_ARTIFACT_DAGS_FOLDER",
            "DAG_ARTIFACT_ENDPOINT_URL",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    fn publish(&self, dag_id: &str, script: &Path) -> assert_cmd::assert::Assert {
        self.cli()
            .args(["publish", "--dag-id", dag_id, "--script"])
            .arg(script)
            .assert()
    }
}

#[test]
fn test_publish_then_release() -> Result<()> {
    let env = ProjectEnv::new()?;
    let script = env.write_script("etl", "extract()")?;

    env.cli().arg("bootstrap").assert().success();
    env.publish("etl", &script)
        .success()
        .stdout(predicate::str::contains("etl_latest"));

    let latest = fs::read_to_string(env.dag_file("etl_latest.py"))?;
    assert!(latest.contains("dag_id = \"etl_latest\""));

    env.cli()
        .args(["release", "--dag-id", "etl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("etl_v1"));

    let v1 = fs::read_to_string(env.dag_file("etl_v1.py"))?;
    assert!(v1.contains("dag_id = \"etl_v1\""));
    assert!(
        env.root
            .join(".dag_artifact/my-bucket/airflow-artifact/etl/000001.py")
            .exists()
    );
    Ok(())
}

#[test]
fn test_versions_and_rollback() -> Result<()> {
    let env = ProjectEnv::new()?;

    for task in ["extract()", "transform()"] {
        let script = env.write_script("etl", task)?;
        env.publish("etl", &script).success();
        env.cli()
            .args(["release", "--dag-id", "etl"])
            .assert()
            .success();
    }

    env.cli()
        .args(["versions", "--dag-id", "etl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LATEST"))
        .stdout(predicate::str::contains("etl_v2"));

    env.cli()
        .args(["deploy", "--dag-id", "etl", "--version", "1"])
        .assert()
        .success();
    let v1 = fs::read_to_string(env.dag_file("etl_v1.py"))?;
    assert!(v1.contains("extract()"));
    Ok(())
}

#[test]
fn test_publish_without_literal_fails() -> Result<()> {
    let env = ProjectEnv::new()?;
    let script = env.root.join("etl.py");
    fs::write(&script, "with DAG('etl') as dag:\n    pass\n")?;

    env.publish("etl", &script)
        .failure()
        .stderr(predicate::str::contains("dag_id"));
    assert!(!env.dag_file("etl_latest.py").exists());
    Ok(())
}

#[test]
fn test_purge_all_requires_confirmation() -> Result<()> {
    let env = ProjectEnv::new()?;
    let script = env.write_script("etl", "extract()")?;
    env.publish("etl", &script).success();

    env.cli()
        .arg("purge-all")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    env.cli().args(["purge-all", "--yes"]).assert().success();
    env.cli()
        .args(["deploy", "--dag-id", "etl", "--version", "LATEST"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_missing_config_fails() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    Command::new(assert_cmd::cargo::cargo_bin!("dag-artifact"))
        .current_dir(tmp.path())
        .args(["release", "--dag-id", "etl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dag_artifact.yaml"));
    Ok(())
}
