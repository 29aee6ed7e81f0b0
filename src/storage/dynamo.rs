//! AWS DynamoDB record store implementation.
//!
//! Table layout: partition key `Source` (S), sort key `CreatedAt` (N).

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;

use crate::error::{AppError, Result};
use crate::models::NormalizedItem;
use crate::storage::ItemStore;

/// DynamoDB-backed record store.
#[derive(Clone)]
pub struct DynamoItemStore {
    client: Client,
    table: String,
}

impl DynamoItemStore {
    /// Create a new store for `table`.
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// Create from a loaded AWS configuration.
    pub fn from_conf(config: &aws_config::SdkConfig, table: impl Into<String>) -> Self {
        Self::new(Client::new(config), table)
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

/// Attribute map written for one record. `Image` is omitted when absent.
pub fn item_attributes(item: &NormalizedItem) -> HashMap<String, AttributeValue> {
    let mut attributes = HashMap::from([
        ("Id".to_string(), AttributeValue::N(item.id.to_string())),
        ("Source".to_string(), AttributeValue::S(item.source.clone())),
        (
            "CreatedAt".to_string(),
            AttributeValue::N(item.created_at.to_string()),
        ),
        ("Title".to_string(), AttributeValue::S(item.title.clone())),
        ("Summary".to_string(), AttributeValue::S(item.summary.clone())),
        ("Link".to_string(), AttributeValue::S(item.link.clone())),
    ]);
    if let Some(image) = &item.image {
        attributes.insert("Image".to_string(), AttributeValue::S(image.clone()));
    }
    attributes
}

fn parse_created_at(item: &HashMap<String, AttributeValue>) -> Result<i64> {
    match item.get("CreatedAt") {
        Some(AttributeValue::N(n)) => n
            .parse()
            .map_err(|e| AppError::storage(format!("CreatedAt '{n}' is not an integer: {e}"))),
        other => Err(AppError::storage(format!(
            "CreatedAt missing or not a number: {other:?}"
        ))),
    }
}

#[async_trait]
impl ItemStore for DynamoItemStore {
    async fn latest_created_at(&self, source: &str) -> Result<Option<i64>> {
        let output = self
            .client
            .query()
            .table_name(&self.table)
            .key_condition_expression("#Source = :source")
            .expression_attribute_names("#Source", "Source")
            .expression_attribute_names("#CreatedAt", "CreatedAt")
            .expression_attribute_values(":source", AttributeValue::S(source.to_string()))
            .projection_expression("#CreatedAt")
            .scan_index_forward(false)
            .limit(1)
            .send()
            .await
            .map_err(|e| {
                AppError::storage(format!(
                    "query {} for {} failed: {}",
                    self.table,
                    source,
                    DisplayErrorContext(&e)
                ))
            })?;

        output
            .items()
            .first()
            .map(parse_created_at)
            .transpose()
    }

    async fn put_item(&self, item: &NormalizedItem) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(item_attributes(item)))
            .send()
            .await
            .map_err(|e| AppError::persist(item.id, DisplayErrorContext(&e)))?;
        Ok(())
    }
}
