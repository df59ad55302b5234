// dag-artifact-core/src/domain/dag/rewrite.rs

use crate::domain::artifact::ARTIFACT_SUFFIX;
use crate::domain::dag::{DagAlias, DagId};
use crate::domain::error::DomainError;

/// A rewritten DAG script ready to be dropped into the Airflow DAG folder.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentFile {
    /// `<dag_id>_latest.py` or `<dag_id>_v<n>.py`
    pub file_name: String,
    /// The dag_id Airflow will see once the file is parsed.
    pub deployed_dag_id: String,
    pub content: String,
}

/// Renames the `dag_id = "<dag_id>"` literal so that several copies of the
/// same DAG can coexist in one folder.
///
/// This is a literal substitution: the script must contain the exact text
/// `dag_id = "<dag_id>"` (one space around `=`, double quotes). Every
/// occurrence is replaced. This function is PURE : no I/O.
pub fn rewrite_dag_id(
    content: &str,
    dag_id: &DagId,
    alias: DagAlias,
) -> Result<String, DomainError> {
    let before = format!("dag_id = \"{}\"", dag_id);
    if !content.contains(&before) {
        return Err(DomainError::DagIdLiteralNotFound {
            dag_id: dag_id.to_string(),
            expected: before,
        });
    }
    let after = format!("dag_id = \"{}\"", alias.qualify(dag_id));
    Ok(content.replace(&before, &after))
}

pub fn deployment_file(
    content: &str,
    dag_id: &DagId,
    alias: DagAlias,
) -> Result<DeploymentFile, DomainError> {
    let rewritten = rewrite_dag_id(content, dag_id, alias)?;
    let deployed_dag_id = alias.qualify(dag_id);
    Ok(DeploymentFile {
        file_name: format!("{}{}", deployed_dag_id, ARTIFACT_SUFFIX),
        deployed_dag_id,
        content: rewritten,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    const SCRIPT: &str = r#"from airflow import DAG

with DAG(
    dag_id = "etl_daily",
    schedule="@daily",
) as dag:
    pass"#;

    #[test]
    fn test_rewrite_latest() -> Result<()> {
        let id = DagId::new("etl_daily")?;
        let out = rewrite_dag_id(SCRIPT, &id, DagAlias::Latest)?;
        assert!(out.contains("dag_id = \"etl_daily_latest\""));
        assert!(!out.contains("dag_id = \"etl_daily\""));
        insta::assert_snapshot!(out, @r#"
        from airflow import DAG

        with DAG(
            dag_id = "etl_daily_latest",
            schedule="@daily",
        ) as dag:
            pass
        "#);
        Ok(())
    }

    #[test]
    fn test_rewrite_version() -> Result<()> {
        let id = DagId::new("etl_daily")?;
        let out = rewrite_dag_id(SCRIPT, &id, DagAlias::Version(4))?;
        assert!(out.contains("dag_id = \"etl_daily_v4\""));
        Ok(())
    }

    #[test]
    fn test_rewrite_replaces_every_occurrence() -> Result<()> {
        let id = DagId::new("a")?;
        let content = "dag_id = \"a\"\nprint('x')\ndag_id = \"a\"";
        let out = rewrite_dag_id(content, &id, DagAlias::Version(1))?;
        assert_eq!(out, "dag_id = \"a_v1\"\nprint('x')\ndag_id = \"a_v1\"");
        Ok(())
    }

    #[test]
    fn test_rewrite_requires_exact_literal() -> Result<()> {
        let id = DagId::new("etl_daily")?;
        for content in [
            "dag_id=\"etl_daily\"",
            "dag_id = 'etl_daily'",
            "dag_id = \"other\"",
            "",
        ] {
            let err = rewrite_dag_id(content, &id, DagAlias::Latest);
            assert!(matches!(
                err,
                Err(DomainError::DagIdLiteralNotFound { ref expected, .. })
                    if expected == "dag_id = \"etl_daily\""
            ));
        }
        Ok(())
    }

    #[test]
    fn test_already_renamed_script_is_rejected() -> Result<()> {
        // `dag_id = "etl_daily_latest"` does not contain `dag_id = "etl_daily"`
        // because of the closing quote.
        let id = DagId::new("etl_daily")?;
        let renamed = rewrite_dag_id(SCRIPT, &id, DagAlias::Latest)?;
        assert!(rewrite_dag_id(&renamed, &id, DagAlias::Latest).is_err());
        Ok(())
    }

    #[test]
    fn test_deployment_file_naming() -> Result<()> {
        let id = DagId::new("etl_daily")?;
        let latest = deployment_file(SCRIPT, &id, DagAlias::Latest)?;
        assert_eq!(latest.file_name, "etl_daily_latest.py");
        assert_eq!(latest.deployed_dag_id, "etl_daily_latest");

        let v2 = deployment_file(SCRIPT, &id, DagAlias::Version(2))?;
        assert_eq!(v2.file_name, "etl_daily_v2.py");
        assert!(v2.content.contains("dag_id = \"etl_daily_v2\""));
        Ok(())
    }
}
