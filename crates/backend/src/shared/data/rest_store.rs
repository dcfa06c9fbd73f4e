use async_trait::async_trait;
use chrono::NaiveDate;
use contracts::domain::a001_component::{Component, ComponentDto, ComponentId};
use contracts::domain::a002_reading::{Reading, ReadingDto, ReadingId};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::store::{RecordStore, StoreError};
use crate::shared::config::StoreConfig;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

// ============================================================================
// Store rows (column names as they exist in the hosted tables)
// ============================================================================
#[derive(Debug, Deserialize)]
struct ComponentRow {
    id: i64,
    #[serde(rename = "Drawing", default)]
    drawing: Option<String>,
    #[serde(rename = "Component", default)]
    name: Option<String>,
    #[serde(rename = "Unit", default)]
    unit: Option<String>,
    #[serde(default)]
    drawing_pdf_url: Option<String>,
}

impl From<ComponentRow> for Component {
    fn from(r: ComponentRow) -> Self {
        Component {
            id: ComponentId(r.id),
            drawing: r.drawing.unwrap_or_default(),
            name: r.name.unwrap_or_default(),
            unit: r.unit.unwrap_or_default(),
            drawing_pdf_url: r.drawing_pdf_url,
        }
    }
}

#[derive(Debug, Serialize)]
struct ComponentFields<'a> {
    #[serde(rename = "Drawing")]
    drawing: &'a str,
    #[serde(rename = "Component")]
    name: &'a str,
    #[serde(rename = "Unit")]
    unit: &'a str,
}

impl<'a> From<&'a ComponentDto> for ComponentFields<'a> {
    fn from(dto: &'a ComponentDto) -> Self {
        Self {
            drawing: &dto.drawing,
            name: &dto.name,
            unit: &dto.unit,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReadingRow {
    id: i64,
    component_id: i64,
    test_date: NaiveDate,
    #[serde(default)]
    inspector: Option<String>,
    reading_value: f64,
    #[serde(default)]
    notes: Option<String>,
}

impl From<ReadingRow> for Reading {
    fn from(r: ReadingRow) -> Self {
        Reading {
            id: ReadingId(r.id),
            component_id: ComponentId(r.component_id),
            test_date: r.test_date,
            inspector: r.inspector.unwrap_or_default(),
            reading_value: r.reading_value,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Serialize)]
struct ReadingFields<'a> {
    component_id: i64,
    test_date: NaiveDate,
    inspector: &'a str,
    reading_value: f64,
    notes: Option<&'a str>,
}

impl<'a> From<&'a ReadingDto> for ReadingFields<'a> {
    fn from(dto: &'a ReadingDto) -> Self {
        Self {
            component_id: dto.component_id.0,
            test_date: dto.test_date,
            inspector: &dto.inspector,
            reading_value: dto.reading_value,
            notes: dto.notes.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// ============================================================================
// Client
// ============================================================================
/// Client of a hosted PostgREST database with object storage
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    component_table: String,
    reading_table: String,
    bucket: String,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: config.url.trim().trim_end_matches('/').to_string(),
            api_key: config.api_key.trim().replace(['\n', '\r', '\t'], ""),
            component_table: config.component_table.clone(),
            reading_table: config.reading_table.clone(),
            bucket: config.attachment_bucket.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, urlencoding::encode(table))
    }

    fn object_path(&self, name: &str) -> String {
        format!(
            "{}/{}",
            urlencoding::encode(&self.bucket),
            urlencoding::encode(name)
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", self.api_key.as_str())
            .bearer_auth(&self.api_key)
    }

    fn components(&self, method: Method) -> RequestBuilder {
        self.request(method, &self.table_url(&self.component_table))
    }

    fn readings(&self, method: Method) -> RequestBuilder {
        self.request(method, &self.table_url(&self.reading_table))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, StoreError> {
        let response = builder.send().await.map_err(network_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            message: error_message(&text, status),
        })
    }

    async fn fetch_one<T: for<'de> Deserialize<'de>>(
        &self,
        builder: RequestBuilder,
        not_found: StoreError,
    ) -> Result<T, StoreError> {
        let result = self.send(builder.header("Accept", SINGLE_OBJECT)).await;
        let response = match result {
            // PostgREST answers 406 when a single-object read matches no rows
            Err(StoreError::Api { status, .. }) if status == StatusCode::NOT_ACCEPTABLE.as_u16() => {
                return Err(not_found)
            }
            other => other?,
        };
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn fetch_many<T: for<'de> Deserialize<'de>>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Vec<T>, StoreError> {
        self.send(builder)
            .await?
            .json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    /// PATCH or DELETE that has to match a row; PostgREST answers an empty
    /// list rather than an error when nothing matched
    async fn modify_one(
        &self,
        builder: RequestBuilder,
        not_found: StoreError,
    ) -> Result<(), StoreError> {
        let rows: Vec<serde_json::Value> = self
            .fetch_many(builder.header("Prefer", "return=representation"))
            .await?;
        require_rows(rows.len(), not_found)
    }
}

fn require_rows(touched: usize, not_found: StoreError) -> Result<(), StoreError> {
    if touched == 0 {
        return Err(not_found);
    }
    Ok(())
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

fn network_error(e: reqwest::Error) -> StoreError {
    let message = if e.is_timeout() {
        format!("Request to store timed out: {}", e)
    } else if e.is_connect() {
        format!("Could not connect to store: {}", e)
    } else if e.is_request() || e.is_builder() {
        format!("Failed to build request: {}", e)
    } else {
        e.to_string()
    };
    StoreError::Network(message)
}

fn error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                body.trim().to_string()
            }
        })
}

#[async_trait]
impl RecordStore for RestStore {
    async fn list_components(&self) -> Result<Vec<Component>, StoreError> {
        let rows: Vec<ComponentRow> = self
            .fetch_many(self.components(Method::GET).query(&[("select", "*")]))
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_component(&self, id: ComponentId) -> Result<Component, StoreError> {
        let row: ComponentRow = self
            .fetch_one(
                self.components(Method::GET)
                    .query(&[("select", "*".to_string()), ("id", eq(id))]),
                StoreError::not_found::<Component>(id),
            )
            .await?;
        Ok(row.into())
    }

    async fn create_component(&self, fields: &ComponentDto) -> Result<Component, StoreError> {
        let rows: Vec<ComponentRow> = self
            .fetch_many(
                self.components(Method::POST)
                    .header("Prefer", "return=representation")
                    .json(&[ComponentFields::from(fields)]),
            )
            .await?;
        rows.into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| StoreError::Decode("insert returned no rows".into()))
    }

    async fn update_component(
        &self,
        id: ComponentId,
        fields: &ComponentDto,
    ) -> Result<(), StoreError> {
        self.modify_one(
            self.components(Method::PATCH)
                .query(&[("id", eq(id))])
                .json(&ComponentFields::from(fields)),
            StoreError::not_found::<Component>(id),
        )
        .await
    }

    async fn update_component_drawing_url(
        &self,
        id: ComponentId,
        url: &str,
    ) -> Result<(), StoreError> {
        self.modify_one(
            self.components(Method::PATCH)
                .query(&[("id", eq(id))])
                .json(&serde_json::json!({ "drawing_pdf_url": url })),
            StoreError::not_found::<Component>(id),
        )
        .await
    }

    async fn delete_component(&self, id: ComponentId) -> Result<(), StoreError> {
        self.modify_one(
            self.components(Method::DELETE).query(&[("id", eq(id))]),
            StoreError::not_found::<Component>(id),
        )
        .await
    }

    async fn list_readings(&self, component_id: ComponentId) -> Result<Vec<Reading>, StoreError> {
        let rows: Vec<ReadingRow> = self
            .fetch_many(self.readings(Method::GET).query(&[
                ("select", "*".to_string()),
                ("component_id", eq(component_id)),
                ("order", "test_date.desc".to_string()),
            ]))
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_reading(&self, id: ReadingId) -> Result<Reading, StoreError> {
        let row: ReadingRow = self
            .fetch_one(
                self.readings(Method::GET)
                    .query(&[("select", "*".to_string()), ("id", eq(id))]),
                StoreError::not_found::<Reading>(id),
            )
            .await?;
        Ok(row.into())
    }

    async fn create_reading(&self, fields: &ReadingDto) -> Result<(), StoreError> {
        self.create_readings(std::slice::from_ref(fields)).await
    }

    async fn create_readings(&self, fields: &[ReadingDto]) -> Result<(), StoreError> {
        let rows: Vec<ReadingFields<'_>> = fields.iter().map(ReadingFields::from).collect();
        self.send(self.readings(Method::POST).json(&rows)).await?;
        Ok(())
    }

    async fn update_reading(&self, id: ReadingId, fields: &ReadingDto) -> Result<(), StoreError> {
        self.modify_one(
            self.readings(Method::PATCH)
                .query(&[("id", eq(id))])
                .json(&ReadingFields::from(fields)),
            StoreError::not_found::<Reading>(id),
        )
        .await
    }

    async fn delete_reading(&self, id: ReadingId) -> Result<(), StoreError> {
        self.modify_one(
            self.readings(Method::DELETE).query(&[("id", eq(id))]),
            StoreError::not_found::<Reading>(id),
        )
        .await
    }

    async fn delete_readings_for_component(
        &self,
        component_id: ComponentId,
    ) -> Result<(), StoreError> {
        self.send(
            self.readings(Method::DELETE)
                .query(&[("component_id", eq(component_id))]),
        )
        .await?;
        Ok(())
    }

    async fn upload_file(&self, name: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let url = format!(
            "{}/storage/v1/object/{}",
            self.base_url,
            self.object_path(name)
        );
        self.send(
            self.request(Method::POST, &url)
                .header("Content-Type", "application/pdf")
                .body(bytes),
        )
        .await?;
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}",
            self.base_url,
            self.object_path(name)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::StoreKind;

    fn config() -> StoreConfig {
        StoreConfig {
            kind: StoreKind::Rest,
            url: "https://demo.supabase.co/".into(),
            api_key: " key\n".into(),
            component_table: "Component Table".into(),
            reading_table: "Readings".into(),
            attachment_bucket: "pdfs".into(),
            timeout_secs: None,
        }
    }

    #[test]
    fn test_urls() {
        let store = RestStore::new(&config()).unwrap();
        assert_eq!(
            store.table_url("Component Table"),
            "https://demo.supabase.co/rest/v1/Component%20Table"
        );
        assert_eq!(
            store.public_url("component_1_1700000000000.pdf"),
            "https://demo.supabase.co/storage/v1/object/public/pdfs/component_1_1700000000000.pdf"
        );
        assert_eq!(store.api_key, "key");
    }

    #[test]
    fn test_component_row_uses_store_columns() {
        let row: ComponentRow = serde_json::from_str(
            r#"{"id":7,"Drawing":"LDAR-1","Component":"V-101","Unit":"Unit 1","drawing_pdf_url":null}"#,
        )
        .unwrap();
        let component: Component = row.into();
        assert_eq!(component.id, ComponentId(7));
        assert_eq!(component.name, "V-101");
        assert_eq!(component.drawing_pdf_url, None);

        let dto = ComponentDto::from(&component);
        let json = serde_json::to_value(ComponentFields::from(&dto)).unwrap();
        assert_eq!(json["Component"], "V-101");
        assert_eq!(json["Drawing"], "LDAR-1");
    }

    #[test]
    fn test_reading_fields_json() {
        let dto = ReadingDto {
            component_id: ComponentId(3),
            test_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            inspector: "A. Jones".into(),
            reading_value: 120.5,
            notes: None,
        };
        let json = serde_json::to_value(ReadingFields::from(&dto)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "component_id": 3,
                "test_date": "2024-05-01",
                "inspector": "A. Jones",
                "reading_value": 120.5,
                "notes": null
            })
        );
    }

    #[test]
    fn test_untouched_row_is_not_found() {
        assert_eq!(
            require_rows(0, StoreError::not_found::<Component>(ComponentId(999))),
            Err(StoreError::NotFound("Component 999".into()))
        );
        assert_eq!(
            require_rows(1, StoreError::not_found::<Reading>(ReadingId(4))),
            Ok(())
        );
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message":"permission denied for table"}"#, StatusCode::UNAUTHORIZED),
            "permission denied for table"
        );
        assert_eq!(error_message("", StatusCode::BAD_GATEWAY), "Bad Gateway");
        assert_eq!(error_message("plain failure", StatusCode::BAD_REQUEST), "plain failure");
    }
}
