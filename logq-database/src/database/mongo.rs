use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use log::warn;
use mongodb::{
    bson::{doc, Document},
    options::{AggregateOptions, FindOneOptions},
    Client, Collection,
};
use serde::de::DeserializeOwned;

use super::LogStore;
use crate::config::DbConfig;
use crate::models::{EndpointCount, LogEntry};

pub const COLLECTION_NAME: &str = "log";

/// `LogStore` backed by the `log` collection of a MongoDB database.
#[derive(Clone, Debug)]
pub struct MongoLogStore {
    client: Client,
    db_name: String,
    max_time: Duration,
}

impl MongoLogStore {
    pub fn new(client: Client, config: &DbConfig) -> Self {
        Self {
            client,
            db_name: config.db_name.clone(),
            max_time: config.timeout,
        }
    }

    fn get_collection(&self) -> Collection<Document> {
        self.client
            .database(&self.db_name)
            .collection(COLLECTION_NAME)
    }

    async fn aggregate_counts(&self, limit: Option<i64>) -> Result<Vec<EndpointCount>> {
        let options = AggregateOptions::builder().max_time(self.max_time).build();
        let mut cursor = self
            .get_collection()
            .aggregate(endpoint_counts_pipeline(limit), options)
            .await?;

        let mut ret = vec![];
        while let Some(row) = cursor.try_next().await? {
            if let Some(count) = decode_or_skip::<EndpointCount>(row, "group row") {
                ret.push(count);
            }
        }
        Ok(ret)
    }
}

/**
 * Decode a document fetched from the log collection. A document that still fails to decode
 * is logged and treated as absent, so bad data never turns a query into an error.
 *
 * # Arguments
 * @param document: Document - The raw document
 * @param what: &str - What the document is, for the warning
 *
 * # Returns
 * @return Option<T> - The decoded value, or None when the document is malformed
 */
pub fn decode_or_skip<T: DeserializeOwned>(document: Document, what: &str) -> Option<T> {
    match mongodb::bson::from_document::<T>(document) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Skipping malformed {}: {}", what, e);
            None
        }
    }
}

/**
 * Build the aggregation that groups calls by (action, url, method, timestamp) and sorts
 * the groups by descending count.
 *
 * # Arguments
 * @param limit: Option<i64> - Keep only the first `limit` groups
 *
 * # Returns
 * @return Vec<Document> - The pipeline stages
 */
pub fn endpoint_counts_pipeline(limit: Option<i64>) -> Vec<Document> {
    let mut pipeline = vec![
        doc! {
            "$group": {
                "_id": {
                    "action": "$action",
                    "url": "$url",
                    "method": "$method",
                    "timestamp": "$timestamp",
                },
                "count": { "$sum": 1 },
            }
        },
        doc! { "$sort": { "count": -1 } },
    ];
    if let Some(limit) = limit {
        pipeline.push(doc! { "$limit": limit });
    }
    pipeline
}

#[async_trait]
impl LogStore for MongoLogStore {
    async fn last_entry(&self) -> Result<Option<LogEntry>> {
        let options = FindOneOptions::builder()
            .sort(doc! { "timestamp": -1 })
            .max_time(self.max_time)
            .build();
        let entry = self.get_collection().find_one(None, options).await?;
        Ok(entry.and_then(|document| decode_or_skip::<LogEntry>(document, "log entry")))
    }

    async fn most_frequent(&self) -> Result<Option<EndpointCount>> {
        let mut top = self.aggregate_counts(Some(1)).await?;
        Ok(top.pop())
    }

    async fn counts(&self) -> Result<Vec<EndpointCount>> {
        self.aggregate_counts(None).await
    }

    async fn shutdown(&self) {
        self.client.clone().shutdown().await;
    }
}
