// src/api/parser.rs
//! Turns raw HTTP bodies into domain values or typed errors.

use super::adapter::{convert_database, convert_record, convert_user};
use super::client::ApiResponse;
use super::responses::{DatabaseResponse, NotionError, PageResponse, UserResponse};
use super::types::PaginatedResponse;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionErrorCode};
use crate::model::{Database, Record, WorkspaceUser};

/// Parse any Notion API response, mapping non-success statuses to errors.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if !result.status.is_success() {
        return Err(parse_error_response(&result));
    }

    serde_json::from_str(&result.data).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", result.url, e);
        AppError::MalformedResponse(format!("{} (body: {})", e, preview(&result.data)))
    })
}

/// Builds the error for a non-success response.
///
/// Prefers the structured Notion error envelope; falls back to the HTTP
/// status when the body isn't one.
pub fn parse_error_response(result: &ApiResponse<String>) -> AppError {
    match serde_json::from_str::<NotionError>(&result.data) {
        Ok(error) => AppError::NotionService {
            code: NotionErrorCode::from_api_response(&error.code),
            message: error.message,
            status: result.status.as_u16(),
        },
        Err(_) => AppError::NotionService {
            code: NotionErrorCode::from_http_status(result.status.as_u16()),
            message: format!("HTTP {} from {}", result.status, result.url),
            status: result.status.as_u16(),
        },
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let cut: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}

/// Parse a database retrieval response.
pub fn parse_database_response(result: ApiResponse<String>) -> Result<Database, AppError> {
    let response: DatabaseResponse = parse_api_response(result)?;
    convert_database(response)
}

/// Parse one page of a database query.
pub fn parse_records_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Record>, AppError> {
    let response: PaginatedResponse<PageResponse> = parse_api_response(result)?;
    response.try_map(convert_record)
}

/// Parse one page of the users list.
pub fn parse_users_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<WorkspaceUser>, AppError> {
    let response: PaginatedResponse<UserResponse> = parse_api_response(result)?;
    response.try_map(convert_user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn response(status: StatusCode, body: &str) -> ApiResponse<String> {
        ApiResponse {
            data: body.to_string(),
            status,
            url: "https://api.notion.com/v1/databases/abc".to_string(),
        }
    }

    #[test]
    fn parses_notion_error_envelope() {
        let result = parse_database_response(response(
            StatusCode::NOT_FOUND,
            r#"{
                "object": "error",
                "status": 404,
                "code": "object_not_found",
                "message": "Could not find database with ID: abc",
                "request_id": "req_123"
            }"#,
        ));

        match result {
            Err(AppError::NotionService {
                code,
                message,
                status,
            }) => {
                assert_eq!(code, NotionErrorCode::ObjectNotFound);
                assert!(message.contains("Could not find database"));
                assert_eq!(status, 404);
            }
            other => panic!("expected NotionService error, got {:?}", other),
        }
    }

    #[test]
    fn falls_back_to_http_status() {
        let result = parse_database_response(response(StatusCode::BAD_GATEWAY, "<html>"));
        assert!(matches!(
            result,
            Err(AppError::NotionService {
                code: NotionErrorCode::HttpStatus(502),
                ..
            })
        ));
    }

    #[test]
    fn malformed_success_body_is_reported() {
        let result = parse_database_response(response(StatusCode::OK, "{not json"));
        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }

    #[test]
    fn parses_query_page() {
        let page = parse_records_pagination(response(
            StatusCode::OK,
            r#"{
                "object": "list",
                "results": [
                    {"object": "page", "id": "12345678-1234-1234-1234-123456789abc",
                     "properties": {"Name": {"id": "title", "type": "title",
                                             "title": [{"plain_text": "Alpha"}]}}}
                ],
                "next_cursor": "cursor-2",
                "has_more": true,
                "type": "page_or_database",
                "page_or_database": {}
            }"#,
        ))
        .unwrap();

        assert_eq!(page.results.len(), 1);
        assert_eq!(page.next_cursor.as_deref(), Some("cursor-2"));
        assert!(page.has_more);
    }

    #[test]
    fn long_bodies_are_truncated_in_previews() {
        let body = "x".repeat(ERROR_BODY_PREVIEW_LENGTH + 50);
        assert_eq!(preview(&body).len(), ERROR_BODY_PREVIEW_LENGTH + 3);
    }
}
