use actix_web::{get, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use logq_database::models::{log_entry::serialize_timestamp, EndpointKey, LogEntry};
use logq_database::LogStore;
use serde::Serialize;
use serde_json::json;

const NO_ENDPOINT_LOGGED: &str = "No endpoint logged yet";
const NO_ENDPOINT_CALLS_LOGGED: &str = "No endpoint calls logged yet";
const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastEndpointResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_endpoint: Option<String>,
    #[serde(serialize_with = "serialize_timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl From<LogEntry> for LastEndpointResponse {
    fn from(entry: LogEntry) -> Self {
        Self {
            last_endpoint: entry.action,
            timestamp: entry.timestamp,
            method: entry.method,
            url: entry.url,
            class: entry.class,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MostFrequentEndpointResponse {
    pub most_frequent_endpoint: EndpointKey,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

fn internal_error(query: &str, e: anyhow::Error) -> HttpResponse {
    log::error!("Failed to fetch {}: {:#}", query, e);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: INTERNAL_SERVER_ERROR,
    })
}

/**
 * Get the most recently logged endpoint call
 *
 * # Returns
 * @return HttpResponse - The last call, or a placeholder when nothing is logged
 */
#[get("/lastEndpoint")]
pub async fn last_endpoint(store: web::Data<dyn LogStore>) -> impl Responder {
    match store.last_entry().await {
        Ok(Some(entry)) => HttpResponse::Ok().json(LastEndpointResponse::from(entry)),
        Ok(None) => HttpResponse::Ok().json(json!({ "lastEndpoint": NO_ENDPOINT_LOGGED })),
        Err(e) => internal_error("last endpoint", e),
    }
}

/**
 * Get the endpoint call logged most often
 *
 * # Returns
 * @return HttpResponse - The call and its count, or a placeholder when nothing is logged
 */
#[get("/mostFrequentEndpoint")]
pub async fn most_frequent_endpoint(store: web::Data<dyn LogStore>) -> impl Responder {
    match store.most_frequent().await {
        Ok(Some(top)) => HttpResponse::Ok().json(MostFrequentEndpointResponse {
            most_frequent_endpoint: top.id,
            count: top.count,
        }),
        Ok(None) => HttpResponse::Ok().json(json!({ "mostFrequentEndpoint": NO_ENDPOINT_LOGGED })),
        Err(e) => internal_error("most frequent endpoint", e),
    }
}

/**
 * Get the number of calls per endpoint, highest first
 *
 * # Returns
 * @return HttpResponse - A list of counts, or a message object when nothing is logged
 */
#[get("/counts")]
pub async fn counts(store: web::Data<dyn LogStore>) -> impl Responder {
    match store.counts().await {
        Ok(rows) if !rows.is_empty() => HttpResponse::Ok().json(rows),
        Ok(_) => HttpResponse::Ok().json(json!({ "message": NO_ENDPOINT_CALLS_LOGGED })),
        Err(e) => internal_error("endpoint counts", e),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(last_endpoint)
        .service(most_frequent_endpoint)
        .service(counts);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, App};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use logq_database::models::EndpointCount;
    use logq_database::MemoryLogStore;
    use serde_json::Value;

    struct UnavailableStore;

    #[async_trait]
    impl LogStore for UnavailableStore {
        async fn last_entry(&self) -> anyhow::Result<Option<LogEntry>> {
            Err(anyhow!("Server selection timeout: No available servers"))
        }

        async fn most_frequent(&self) -> anyhow::Result<Option<EndpointCount>> {
            Err(anyhow!("Server selection timeout: No available servers"))
        }

        async fn counts(&self) -> anyhow::Result<Vec<EndpointCount>> {
            Err(anyhow!("Server selection timeout: No available servers"))
        }
    }

    fn entry(action: &str, url: &str, method: &str, millis: i64) -> LogEntry {
        LogEntry {
            action: Some(action.to_string()),
            timestamp: Some(Utc.timestamp_millis_opt(millis).unwrap()),
            method: Some(method.to_string()),
            url: Some(url.to_string()),
            class: Some("com.example.Log".to_string()),
        }
    }

    /// Three identical login calls at T1 and one logout call at T2.
    fn login_logout_store() -> MemoryLogStore {
        MemoryLogStore::new(vec![
            entry("login", "/a", "GET", 1_700_000_000_000),
            entry("logout", "/b", "POST", 1_700_000_000_500),
            entry("login", "/a", "GET", 1_700_000_000_000),
            entry("login", "/a", "GET", 1_700_000_000_000),
        ])
    }

    async fn get_json(store: Arc<dyn LogStore>, uri: &str) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(store))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_rt::test]
    async fn test_empty_collection_returns_placeholders() {
        let store: Arc<dyn LogStore> = Arc::new(MemoryLogStore::default());

        let (status, body) = get_json(store.clone(), "/lastEndpoint").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "lastEndpoint": "No endpoint logged yet" }));

        let (status, body) = get_json(store.clone(), "/mostFrequentEndpoint").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "mostFrequentEndpoint": "No endpoint logged yet" }));

        let (status, body) = get_json(store, "/counts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "No endpoint calls logged yet" }));
    }

    #[actix_rt::test]
    async fn test_last_endpoint_returns_latest_call() {
        let store: Arc<dyn LogStore> = Arc::new(login_logout_store());

        let (status, body) = get_json(store, "/lastEndpoint").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "lastEndpoint": "logout",
                "timestamp": "2023-11-14T22:13:20.500Z",
                "method": "POST",
                "url": "/b",
                "class": "com.example.Log",
            })
        );
    }

    #[actix_rt::test]
    async fn test_last_endpoint_omits_missing_fields() {
        let partial = LogEntry {
            action: Some("ping".to_string()),
            ..LogEntry::default()
        };
        let store: Arc<dyn LogStore> = Arc::new(MemoryLogStore::new(vec![partial]));

        let (status, body) = get_json(store, "/lastEndpoint").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "lastEndpoint": "ping" }));
    }

    #[actix_rt::test]
    async fn test_most_frequent_endpoint() {
        let store: Arc<dyn LogStore> = Arc::new(login_logout_store());

        let (status, body) = get_json(store, "/mostFrequentEndpoint").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "mostFrequentEndpoint": {
                    "action": "login",
                    "url": "/a",
                    "method": "GET",
                    "timestamp": "2023-11-14T22:13:20.000Z",
                },
                "count": 3,
            })
        );
    }

    #[actix_rt::test]
    async fn test_counts_are_sorted_and_agree_with_most_frequent() {
        let store: Arc<dyn LogStore> = Arc::new(login_logout_store());

        let (status, body) = get_json(store.clone(), "/counts").await;
        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().expect("counts should be a list");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["_id"]["action"], "login");
        assert_eq!(rows[0]["count"], 3);
        assert_eq!(rows[1]["_id"]["action"], "logout");
        assert_eq!(rows[1]["count"], 1);
        assert!(rows
            .windows(2)
            .all(|w| w[0]["count"].as_u64() >= w[1]["count"].as_u64()));

        let (_, top) = get_json(store, "/mostFrequentEndpoint").await;
        assert_eq!(top["mostFrequentEndpoint"], rows[0]["_id"]);
        assert_eq!(top["count"], rows[0]["count"]);
    }

    #[actix_rt::test]
    async fn test_unavailable_store_returns_internal_server_error() {
        let store: Arc<dyn LogStore> = Arc::new(UnavailableStore);

        for uri in ["/lastEndpoint", "/mostFrequentEndpoint", "/counts"] {
            let (status, body) = get_json(store.clone(), uri).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
            assert_eq!(body, json!({ "error": "Internal Server Error" }), "{}", uri);
        }
    }
}
