// dag-artifact-core/src/infrastructure/storage/dynamodb.rs

use std::collections::HashMap;
use std::time::Duration;

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType,
    ProvisionedThroughput, ScalarAttributeType, TableStatus,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use super::error::{Service, StorageError, map_sdk_error};
use crate::domain::artifact::{ArtifactRecord, ArtifactVersion};
use crate::ports::repository::BootstrapOptions;

const ATTR_NAME: &str = "name";
const ATTR_VERSION: &str = "version";
const ATTR_SHA256: &str = "sha256";
const ATTR_UPDATE_AT: &str = "update_at";

const TABLE_ACTIVE_POLL: Duration = Duration::from_secs(1);
const TABLE_ACTIVE_MAX_POLLS: u32 = 60;

type Item = HashMap<String, AttributeValue>;

/// The artifact metadata table: hash key `name`, range key `version`
/// (`LATEST` or a zero-padded number).
#[derive(Debug, Clone)]
pub struct MetadataTable {
    client: Client,
    table_name: String,
}

impl MetadataTable {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub async fn table_exists(&self) -> Result<bool, StorageError> {
        match self
            .client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let not_found = err
                    .as_service_error()
                    .map(|e| e.is_resource_not_found_exception())
                    .unwrap_or(false);
                if not_found {
                    Ok(false)
                } else {
                    Err(map_sdk_error(&err, Service::DynamoDb, &self.table_name))
                }
            }
        }
    }

    /// Creates the table and waits until it is ACTIVE.
    #[instrument(skip(self, options), fields(table = %self.table_name))]
    pub async fn create_table(&self, options: &BootstrapOptions) -> Result<(), StorageError> {
        let build_err = |e: aws_sdk_dynamodb::error::BuildError| {
            StorageError::ConfigurationError(e.to_string())
        };

        let mut request = self
            .client
            .create_table()
            .table_name(&self.table_name)
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name(ATTR_NAME)
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .map_err(build_err)?,
            )
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name(ATTR_VERSION)
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .map_err(build_err)?,
            )
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name(ATTR_NAME)
                    .key_type(KeyType::Hash)
                    .build()
                    .map_err(build_err)?,
            )
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name(ATTR_VERSION)
                    .key_type(KeyType::Range)
                    .build()
                    .map_err(build_err)?,
            );

        request = match (
            options.dynamodb_read_capacity_units,
            options.dynamodb_write_capacity_units,
        ) {
            (None, None) => request.billing_mode(BillingMode::PayPerRequest),
            (read, write) => request.billing_mode(BillingMode::Provisioned).provisioned_throughput(
                ProvisionedThroughput::builder()
                    .read_capacity_units(read.unwrap_or(5))
                    .write_capacity_units(write.unwrap_or(5))
                    .build()
                    .map_err(build_err)?,
            ),
        };

        request
            .send()
            .await
            .map_err(|ref err| map_sdk_error(err, Service::DynamoDb, &self.table_name))?;
        info!("Metadata table created, waiting for ACTIVE");

        for _ in 0..TABLE_ACTIVE_MAX_POLLS {
            let response = self
                .client
                .describe_table()
                .table_name(&self.table_name)
                .send()
                .await
                .map_err(|ref err| map_sdk_error(err, Service::DynamoDb, &self.table_name))?;
            let status = response.table().and_then(|t| t.table_status());
            if status == Some(&TableStatus::Active) {
                return Ok(());
            }
            tokio::time::sleep(TABLE_ACTIVE_POLL).await;
        }

        Err(StorageError::DynamoDbError(format!(
            "Table '{}' did not become ACTIVE in time",
            self.table_name
        )))
    }

    pub async fn put_record(&self, record: &ArtifactRecord) -> Result<(), StorageError> {
        debug!(name = %record.name, version = %record.version, "put_item");
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(record)))
            .send()
            .await
            .map_err(|ref err| map_sdk_error(err, Service::DynamoDb, &record.name))?;
        Ok(())
    }

    pub async fn get_record(
        &self,
        name: &str,
        version: ArtifactVersion,
    ) -> Result<Option<ArtifactRecord>, StorageError> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_NAME, AttributeValue::S(name.to_string()))
            .key(ATTR_VERSION, AttributeValue::S(version.encode()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|ref err| map_sdk_error(err, Service::DynamoDb, name))?;

        response.item().map(item_to_record).transpose()
    }

    /// Every record of one artifact name (LATEST included), following pagination.
    pub async fn query_records(&self, name: &str) -> Result<Vec<ArtifactRecord>, StorageError> {
        let mut records = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let response = self
                .client
                .query()
                .table_name(&self.table_name)
                // `name` is a DynamoDB reserved word
                .key_condition_expression("#n = :name")
                .expression_attribute_names("#n", ATTR_NAME)
                .expression_attribute_values(":name", AttributeValue::S(name.to_string()))
                .consistent_read(true)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|ref err| map_sdk_error(err, Service::DynamoDb, name))?;

            for item in response.items() {
                records.push(item_to_record(item)?);
            }

            match response.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        Ok(records)
    }

    /// `(name, encoded version)` of every record in the table.
    pub async fn scan_keys(&self) -> Result<Vec<(String, String)>, StorageError> {
        let mut keys = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let response = self
                .client
                .scan()
                .table_name(&self.table_name)
                .projection_expression("#n, #v")
                .expression_attribute_names("#n", ATTR_NAME)
                .expression_attribute_names("#v", ATTR_VERSION)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|ref err| map_sdk_error(err, Service::DynamoDb, &self.table_name))?;

            for item in response.items() {
                keys.push((string_attr(item, ATTR_NAME)?, string_attr(item, ATTR_VERSION)?));
            }

            match response.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        Ok(keys)
    }

    pub async fn delete_record(&self, name: &str, encoded_version: &str) -> Result<(), StorageError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(ATTR_NAME, AttributeValue::S(name.to_string()))
            .key(ATTR_VERSION, AttributeValue::S(encoded_version.to_string()))
            .send()
            .await
            .map_err(|ref err| map_sdk_error(err, Service::DynamoDb, name))?;
        Ok(())
    }
}

pub(crate) fn record_to_item(record: &ArtifactRecord) -> Item {
    HashMap::from([
        (ATTR_NAME.to_string(), AttributeValue::S(record.name.clone())),
        (ATTR_VERSION.to_string(), AttributeValue::S(record.version.encode())),
        (ATTR_SHA256.to_string(), AttributeValue::S(record.sha256.clone())),
        (
            ATTR_UPDATE_AT.to_string(),
            AttributeValue::S(record.update_at.to_rfc3339()),
        ),
    ])
}

fn string_attr(item: &Item, attr: &str) -> Result<String, StorageError> {
    item.get(attr)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| StorageError::CorruptedRecord(format!("missing string attribute '{}'", attr)))
}

fn item_to_record(item: &Item) -> Result<ArtifactRecord, StorageError> {
    let version_raw = string_attr(item, ATTR_VERSION)?;
    let version = version_raw
        .parse::<ArtifactVersion>()
        .map_err(|e| StorageError::CorruptedRecord(e.to_string()))?;
    let update_at = DateTime::parse_from_rfc3339(&string_attr(item, ATTR_UPDATE_AT)?)
        .map_err(|e| StorageError::CorruptedRecord(e.to_string()))?
        .with_timezone(&Utc);

    Ok(ArtifactRecord {
        name: string_attr(item, ATTR_NAME)?,
        version,
        sha256: string_attr(item, ATTR_SHA256)?,
        update_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use aws_sdk_dynamodb::operation::create_table::CreateTableOutput;
    use aws_sdk_dynamodb::operation::describe_table::{DescribeTableError, DescribeTableOutput};
    use aws_sdk_dynamodb::operation::get_item::GetItemOutput;
    use aws_sdk_dynamodb::types::TableDescription;
    use aws_sdk_dynamodb::types::error::ResourceNotFoundException;
    use aws_smithy_mocks::{Rule, RuleMode, mock, mock_client};

    #[test]
    fn test_item_roundtrip_keeps_padded_version() -> Result<()> {
        let record = ArtifactRecord {
            name: "dag1".to_string(),
            version: ArtifactVersion::Numbered(3),
            sha256: "abc".to_string(),
            update_at: Utc::now(),
        };
        let item = record_to_item(&record);
        assert_eq!(
            item.get(ATTR_VERSION).and_then(|v| v.as_s().ok()).map(String::as_str),
            Some("000003")
        );
        let back = item_to_record(&item)?;
        assert_eq!(back.version, record.version);
        assert_eq!(back.sha256, "abc");
        Ok(())
    }

    #[test]
    fn test_item_missing_attribute_is_corrupted() {
        let mut item = Item::new();
        item.insert(ATTR_NAME.to_string(), AttributeValue::S("dag1".to_string()));
        assert!(matches!(
            item_to_record(&item),
            Err(StorageError::CorruptedRecord(_))
        ));
    }

    fn active_table() -> Rule {
        mock!(Client::describe_table).then_output(|| {
            DescribeTableOutput::builder()
                .table(
                    TableDescription::builder()
                        .table_status(TableStatus::Active)
                        .build(),
                )
                .build()
        })
    }

    #[tokio::test]
    async fn test_table_exists_is_false_when_table_is_missing() -> Result<()> {
        let missing = mock!(Client::describe_table).then_error(|| {
            DescribeTableError::ResourceNotFoundException(
                ResourceNotFoundException::builder()
                    .message("Requested resource not found")
                    .build(),
            )
        });
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::MatchAny, [&missing]);

        assert!(!MetadataTable::new(client, "airflow-artifact").table_exists().await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_table_without_capacities_is_on_demand() -> Result<()> {
        let create = mock!(Client::create_table)
            .match_requests(|req| {
                req.table_name() == Some("airflow-artifact")
                    && req.billing_mode() == Some(&BillingMode::PayPerRequest)
                    && req.provisioned_throughput().is_none()
                    && req.key_schema().len() == 2
            })
            .then_output(|| CreateTableOutput::builder().build());
        let describe = active_table();
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::MatchAny, [&create, &describe]);

        MetadataTable::new(client, "airflow-artifact")
            .create_table(&BootstrapOptions::default())
            .await?;
        assert_eq!(create.num_calls(), 1);
        assert_eq!(describe.num_calls(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_table_with_one_capacity_defaults_the_other() -> Result<()> {
        let expected = ProvisionedThroughput::builder()
            .read_capacity_units(10)
            .write_capacity_units(5)
            .build()?;
        let create = mock!(Client::create_table)
            .match_requests(move |req| {
                req.billing_mode() == Some(&BillingMode::Provisioned)
                    && req.provisioned_throughput() == Some(&expected)
            })
            .then_output(|| CreateTableOutput::builder().build());
        let describe = active_table();
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::MatchAny, [&create, &describe]);

        MetadataTable::new(client, "airflow-artifact")
            .create_table(&BootstrapOptions {
                dynamodb_read_capacity_units: Some(10),
                dynamodb_write_capacity_units: None,
            })
            .await?;
        assert_eq!(create.num_calls(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_record_reads_consistently_and_handles_absence() -> Result<()> {
        let absent = mock!(Client::get_item)
            .match_requests(|req| {
                req.consistent_read() == Some(true)
                    && req.key().and_then(|k| k.get(ATTR_VERSION))
                        == Some(&AttributeValue::S("000004".to_string()))
            })
            .then_output(|| GetItemOutput::builder().build());
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::MatchAny, [&absent]);

        let record = MetadataTable::new(client, "airflow-artifact")
            .get_record("dag1", ArtifactVersion::Numbered(4))
            .await?;
        assert!(record.is_none());
        assert_eq!(absent.num_calls(), 1);
        Ok(())
    }
}

