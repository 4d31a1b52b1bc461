// src/api/client.rs
//! HTTP client for the Notion REST API.
//!
//! A thin wrapper around reqwest that handles authentication and request
//! plumbing. Parsing lives in `parser`; the repository traits are
//! implemented at the bottom of this file.

use super::parser;
use super::types::PaginatedResponse;
use super::{NotionRepository, NotionWriter};
use crate::error::AppError;
use crate::model::{Database, Record, WorkspaceUser};
use crate::types::{ApiBaseUrl, ApiKey, NotionId};
use reqwest::{header, Client, Response};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: ApiBaseUrl,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(
        api_key: &ApiKey,
        base_url: ApiBaseUrl,
        notion_version: &str,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key, notion_version)?)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(
        api_key: &ApiKey,
        notion_version: &str,
    ) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_str(notion_version).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid Notion-Version value: {}", e))
            })?,
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Makes a GET request to the specified endpoint (path without base URL).
    pub async fn get(&self, endpoint: &str) -> Result<Response, AppError> {
        let url = self.base_url.join(endpoint);
        log::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        log::debug!("GET {} -> {}", url, response.status());
        Ok(response)
    }

    /// Makes a GET request with URL query parameters.
    pub async fn get_with_query(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Response, AppError> {
        let url = self.base_url.join(endpoint);
        log::debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        log::debug!("GET {} -> {}", url, response.status());
        Ok(response)
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<Response, AppError> {
        let url = self.base_url.join(endpoint);
        log::debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        log::debug!("POST {} -> {}", url, response.status());
        Ok(response)
    }
}

#[async_trait::async_trait]
impl NotionRepository for NotionHttpClient {
    async fn retrieve_database(&self, id: &NotionId) -> Result<Database, AppError> {
        let endpoint = format!("databases/{}", id.to_hyphenated());
        let response = self.get(&endpoint).await?;
        let result = extract_response_text(response).await?;
        parser::parse_database_response(result)
    }

    async fn query_records(
        &self,
        database: &NotionId,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Record>, AppError> {
        let endpoint = format!("databases/{}/query", database.to_hyphenated());
        let mut body = json!({ "page_size": page_size });
        if let Some(cursor) = cursor {
            body["start_cursor"] = json!(cursor);
        }
        let response = self.post(&endpoint, &body).await?;
        let result = extract_response_text(response).await?;
        parser::parse_records_pagination(result)
    }
}

#[async_trait::async_trait]
impl NotionWriter for NotionHttpClient {
    async fn list_users(
        &self,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<WorkspaceUser>, AppError> {
        let mut query = vec![("page_size", page_size.to_string())];
        if let Some(cursor) = cursor {
            query.push(("start_cursor", cursor));
        }
        let response = self.get_with_query("users", &query).await?;
        let result = extract_response_text(response).await?;
        parser::parse_users_pagination(result)
    }

    async fn title_exists(
        &self,
        database: &NotionId,
        title_property: &str,
        title: &str,
    ) -> Result<bool, AppError> {
        let endpoint = format!("databases/{}/query", database.to_hyphenated());
        let body = json!({
            "filter": { "property": title_property, "title": { "equals": title } },
            "page_size": 1,
        });
        let response = self.post(&endpoint, &body).await?;
        let result = extract_response_text(response).await?;
        let page: PaginatedResponse<Value> = parser::parse_api_response(result)?;
        Ok(!page.results.is_empty())
    }

    async fn create_page(
        &self,
        database: &NotionId,
        properties: Map<String, Value>,
    ) -> Result<(), AppError> {
        let body = json!({
            "parent": { "database_id": database.to_hyphenated() },
            "properties": properties,
        });
        let response = self.post("pages", &body).await?;
        let result = extract_response_text(response).await?;
        let _created: Value = parser::parse_api_response(result)?;
        Ok(())
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
