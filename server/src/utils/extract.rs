//! Extractors that report malformed input through [`AppError`] instead of
//! axum's plain-text rejections.

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use serde::Deserialize;
use uuid::Uuid;

use crate::pagination::PageQuery;
use crate::utils::error::{AppError, FieldErrors};

/// The `:event_id` path segment. Anything that is not a UUID names no event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for EventId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::NotFound(e.body_text()))?;

        Uuid::parse_str(&raw)
            .map(EventId)
            .map_err(|_| AppError::NotFound(format!("Event with id '{}' was not found", raw)))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPageQuery {
    page_number: Option<String>,
    page_size: Option<String>,
}

/// `pageNumber`/`pageSize` from the query string. Values that are not
/// integers are reported per field.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageParams(pub PageQuery);

#[async_trait]
impl<S> FromRequestParts<S> for PageParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawPageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::ValidationError(e.body_text()))?;

        let mut errors = FieldErrors::new();
        let page_number = parse_integer("pageNumber", raw.page_number, &mut errors);
        let page_size = parse_integer("pageSize", raw.page_size, &mut errors);
        errors.into_result()?;

        Ok(PageParams(PageQuery {
            page_number,
            page_size,
        }))
    }
}

fn parse_integer(field: &str, raw: Option<String>, errors: &mut FieldErrors) -> Option<i64> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, format!("{field} should be an integer, but was '{raw}'"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn page_params(uri: &str) -> Result<PageParams, AppError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        PageParams::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_page_params_parse_integers() {
        let PageParams(query) = page_params("/?pageNumber=-3&pageSize=50").await.unwrap();
        assert_eq!(query.page_number, Some(-3));
        assert_eq!(query.page_size, Some(50));

        let PageParams(query) = page_params("/").await.unwrap();
        assert_eq!(query.page_number, None);
        assert_eq!(query.page_size, None);
    }

    #[tokio::test]
    async fn test_page_params_report_each_bad_field() {
        match page_params("/?pageNumber=abc&pageSize=1.5").await {
            Err(AppError::Unprocessable(errors)) => {
                assert!(errors.contains("pageNumber"));
                assert!(errors.contains("pageSize"));
            }
            other => panic!("expected field errors, got {other:?}"),
        }
    }
}
