//! Notion API connector implementation
//!
//! Implements the `RecordStore` trait for the Notion API.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::store::{NewRecord, RecordPage, RecordQuery, RecordStore, StoredRecord};
use chrono::SecondsFormat;
use core_runtime::config::{DurationFormat, StoreSchema};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::NotionError;
use crate::types::{ErrorResponse, QueryResponse};

/// Notion API base URL
const NOTION_API_BASE: &str = "https://api.notion.com/v1";

/// API version pinned on every request
pub const NOTION_VERSION: &str = "2022-06-28";

/// Notion database connector
///
/// Implements `RecordStore` on top of a single Notion database. Reads map to
/// `databases/{id}/query`, writes to `pages`.
///
/// # Example
///
/// ```ignore
/// use provider_notion::NotionConnector;
/// use bridge_traits::store::{RecordQuery, RecordStore};
///
/// let connector = NotionConnector::new(http_client, token, database_id, StoreSchema::default());
/// let page = connector.query_records(&RecordQuery::all(100), None).await?;
/// ```
pub struct NotionConnector {
    http_client: Arc<dyn HttpClient>,
    token: String,
    database_id: String,
    schema: StoreSchema,
}

impl NotionConnector {
    /// Create a new Notion connector
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `token` - Integration bearer token
    /// * `database_id` - Database the integration has been shared with
    /// * `schema` - Property names of that database
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        token: String,
        database_id: String,
        schema: StoreSchema,
    ) -> Self {
        Self {
            http_client,
            token,
            database_id,
            schema,
        }
    }

    async fn post(&self, url: String, body: &Value) -> std::result::Result<HttpResponse, NotionError> {
        let request = HttpRequest::post(url)
            .bearer_token(self.token.as_str())
            .header("Notion-Version", NOTION_VERSION)
            .timeout(Duration::from_secs(30))
            .json(body)?;

        let response = self.http_client.execute(request).await?;

        if response.is_success() {
            return Ok(response);
        }

        let status_code = response.status;
        let error = match response.json::<ErrorResponse>() {
            Ok(body) => NotionError::ApiError {
                status_code,
                code: body.code,
                message: body.message,
            },
            Err(_) => NotionError::ApiError {
                status_code,
                code: "unknown".to_string(),
                message: response.text_lossy(),
            },
        };
        Err(error)
    }

    /// Build the query body: page size, cursor and an `and` filter over the
    /// requested conditions.
    fn query_body(&self, query: &RecordQuery, cursor: Option<String>) -> Value {
        let mut conditions = Vec::new();

        if let Some(since) = query.since {
            conditions.push(json!({
                "property": self.schema.date,
                "date": { "on_or_after": since.format("%Y-%m-%d").to_string() }
            }));
        }
        if query.require_category {
            conditions.push(json!({
                "property": self.schema.category,
                "select": { "is_not_empty": true }
            }));
        }
        if query.require_channel {
            conditions.push(json!({
                "property": self.schema.channel,
                "rich_text": { "is_not_empty": true }
            }));
        }

        let mut body = Map::new();
        body.insert("page_size".to_string(), json!(query.page_size));
        if let Some(cursor) = cursor {
            body.insert("start_cursor".to_string(), json!(cursor));
        }
        if !conditions.is_empty() {
            body.insert("filter".to_string(), json!({ "and": conditions }));
        }

        Value::Object(body)
    }

    /// Build the page-creation body. The category property is left out
    /// entirely when the record has none.
    fn page_body(&self, record: &NewRecord) -> Value {
        let mut properties = Map::new();

        properties.insert(
            self.schema.title.clone(),
            json!({ "title": [ { "text": { "content": record.title } } ] }),
        );
        properties.insert(self.schema.url.clone(), json!({ "url": record.url }));
        properties.insert(
            self.schema.channel.clone(),
            json!({ "rich_text": [ { "text": { "content": record.channel } } ] }),
        );
        properties.insert(
            self.schema.date.clone(),
            json!({
                "date": { "start": record.published_at.to_rfc3339_opts(SecondsFormat::Secs, true) }
            }),
        );

        let duration = match self.schema.duration_format {
            DurationFormat::Minutes => json!({ "number": record.duration_minutes }),
            DurationFormat::Text => {
                json!({ "rich_text": [ { "text": { "content": record.duration_display } } ] })
            }
        };
        properties.insert(self.schema.duration.clone(), duration);

        if let Some(category) = &record.category {
            properties.insert(
                self.schema.category.clone(),
                json!({ "select": { "name": category } }),
            );
        }

        json!({
            "parent": { "database_id": self.database_id },
            "properties": properties,
        })
    }
}

#[async_trait]
impl RecordStore for NotionConnector {
    #[instrument(skip(self, query), fields(has_cursor = cursor.is_some()))]
    async fn query_records(
        &self,
        query: &RecordQuery,
        cursor: Option<String>,
    ) -> Result<RecordPage> {
        let url = format!("{}/databases/{}/query", NOTION_API_BASE, self.database_id);
        let body = self.query_body(query, cursor);

        let response = self.post(url, &body).await?;
        let result: QueryResponse = response.json().map_err(|e| {
            NotionError::ParseError(format!("Failed to parse query response: {}", e))
        })?;

        let records: Vec<StoredRecord> = result
            .results
            .iter()
            .map(|page| StoredRecord {
                url: page.url(&self.schema.url),
                channel: page.text(&self.schema.channel),
                category: page.select(&self.schema.category),
            })
            .collect();

        let next_cursor = if result.has_more {
            result.next_cursor
        } else {
            None
        };

        debug!(
            records = records.len(),
            has_more = next_cursor.is_some(),
            "Fetched record page"
        );

        Ok(RecordPage {
            records,
            next_cursor,
        })
    }

    #[instrument(skip(self, record), fields(url = %record.url))]
    async fn create_record(&self, record: &NewRecord) -> Result<()> {
        let url = format!("{}/pages", NOTION_API_BASE);
        let body = self.page_body(record);

        self.post(url, &body).await?;
        debug!("Created record");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;
    use bytes::Bytes;
    use chrono::{NaiveDate, TimeZone, Utc};
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
        }
    }

    fn respond(status: u16, body: &'static str) -> Result<HttpResponse> {
        Ok(HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body),
        })
    }

    fn body_of(request: &HttpRequest) -> Value {
        serde_json::from_slice(request.body.as_ref().unwrap()).unwrap()
    }

    fn connector(mock_http: MockHttpClient, schema: StoreSchema) -> NotionConnector {
        NotionConnector::new(
            Arc::new(mock_http),
            "secret_token".to_string(),
            "db123".to_string(),
            schema,
        )
    }

    fn record(category: Option<&str>) -> NewRecord {
        NewRecord {
            title: "Deep dive".to_string(),
            url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            channel: "Foo".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            duration_minutes: 5.5,
            duration_display: "5:30".to_string(),
            category: category.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_query_sends_filter_and_cursor() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.url, "https://api.notion.com/v1/databases/db123/query");
            assert_eq!(req.headers.get("Notion-Version").unwrap(), "2022-06-28");
            assert_eq!(
                req.headers.get("Authorization").unwrap(),
                "Bearer secret_token"
            );

            let body = body_of(&req);
            assert_eq!(body["page_size"], 100);
            assert_eq!(body["start_cursor"], "cur1");
            let and = body["filter"]["and"].as_array().unwrap();
            assert_eq!(and.len(), 3);
            assert_eq!(and[0]["property"], "Date");
            assert_eq!(and[0]["date"]["on_or_after"], "2024-02-23");
            assert_eq!(and[1]["property"], "Type");
            assert_eq!(and[1]["select"]["is_not_empty"], true);
            assert_eq!(and[2]["property"], "Channel");

            respond(
                200,
                r#"{
                    "results": [
                        { "id": "p1", "properties": {
                            "Channel": { "type": "rich_text", "rich_text": [ { "plain_text": "Foo" } ] },
                            "Type": { "type": "select", "select": { "name": "Tech" } }
                        } }
                    ],
                    "next_cursor": null,
                    "has_more": false
                }"#,
            )
        });

        let connector = connector(mock_http, StoreSchema::default());
        let query = RecordQuery {
            since: NaiveDate::from_ymd_opt(2024, 2, 23),
            require_category: true,
            require_channel: true,
            page_size: 100,
        };
        let page = connector
            .query_records(&query, Some("cur1".to_string()))
            .await
            .unwrap();

        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].channel.as_deref(), Some("Foo"));
        assert_eq!(page.records[0].category.as_deref(), Some("Tech"));
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_unfiltered_query_omits_filter() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            let body = body_of(&req);
            assert!(body.get("filter").is_none());
            assert!(body.get("start_cursor").is_none());

            respond(
                200,
                r#"{
                    "results": [
                        { "id": "p1", "properties": {
                            "Link": { "type": "url", "url": "https://youtu.be/aaaaaaaaaaa" }
                        } },
                        { "id": "p2", "properties": {} }
                    ],
                    "next_cursor": "cur2",
                    "has_more": true
                }"#,
            )
        });

        let connector = connector(mock_http, StoreSchema::default());
        let page = connector
            .query_records(&RecordQuery::all(100), None)
            .await
            .unwrap();

        assert_eq!(page.records.len(), 2);
        assert_eq!(
            page.records[0].url.as_deref(),
            Some("https://youtu.be/aaaaaaaaaaa")
        );
        assert_eq!(page.records[1], StoredRecord::default());
        assert_eq!(page.next_cursor.as_deref(), Some("cur2"));
    }

    #[tokio::test]
    async fn test_cursor_ignored_without_has_more() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            respond(
                200,
                r#"{ "results": [], "next_cursor": "stale", "has_more": false }"#,
            )
        });

        let connector = connector(mock_http, StoreSchema::default());
        let page = connector
            .query_records(&RecordQuery::all(100), None)
            .await
            .unwrap();

        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_create_record_with_category() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.url, "https://api.notion.com/v1/pages");

            let body = body_of(&req);
            assert_eq!(body["parent"]["database_id"], "db123");
            let props = &body["properties"];
            assert_eq!(props["Title"]["title"][0]["text"]["content"], "Deep dive");
            assert_eq!(
                props["Link"]["url"],
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
            );
            assert_eq!(props["Channel"]["rich_text"][0]["text"]["content"], "Foo");
            assert_eq!(props["Date"]["date"]["start"], "2024-03-01T10:00:00Z");
            assert_eq!(props["Length"]["number"], 5.5);
            assert_eq!(props["Type"]["select"]["name"], "Tech");

            respond(200, r#"{ "object": "page", "id": "new" }"#)
        });

        let connector = connector(mock_http, StoreSchema::default());
        connector.create_record(&record(Some("Tech"))).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_record_omits_missing_category() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            let body = body_of(&req);
            let props = body["properties"].as_object().unwrap();
            assert!(!props.contains_key("Type"));
            assert_eq!(props.len(), 5);

            respond(200, r#"{ "object": "page", "id": "new" }"#)
        });

        let connector = connector(mock_http, StoreSchema::default());
        connector.create_record(&record(None)).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_record_text_duration_and_custom_names() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            let body = body_of(&req);
            let props = &body["properties"];
            assert_eq!(props["Duration"]["rich_text"][0]["text"]["content"], "5:30");
            assert_eq!(props["Kind"]["select"]["name"], "Tech");
            respond(200, r#"{ "object": "page", "id": "new" }"#)
        });

        let schema = StoreSchema {
            duration: "Duration".to_string(),
            category: "Kind".to_string(),
            duration_format: DurationFormat::Text,
            ..StoreSchema::default()
        };
        let connector = connector(mock_http, schema);
        connector.create_record(&record(Some("Tech"))).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_record_api_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            respond(
                400,
                r#"{ "object": "error", "status": 400, "code": "validation_error", "message": "Type is not a property that exists." }"#,
            )
        });

        let connector = connector(mock_http, StoreSchema::default());
        let result = connector.create_record(&record(Some("Tech"))).await;

        match result {
            Err(BridgeError::Status { status, message }) => {
                assert_eq!(status, 400);
                assert!(message.contains("validation_error"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_query_response_is_decode_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| respond(200, "<html>gateway</html>"));

        let connector = connector(mock_http, StoreSchema::default());
        let result = connector.query_records(&RecordQuery::all(100), None).await;

        assert!(matches!(result, Err(BridgeError::Decode(_))));
    }
}
