use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ApiErrorBody,
}

pub fn success<T>(data: T, message: impl Into<String>) -> Response
where
    T: Serialize,
{
    let body = ApiResponse {
        success: true,
        data: Some(data),
        message: Some(message.into()),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Like [`success`], with one extra response header.
pub fn success_with_header<T>(
    data: T,
    message: impl Into<String>,
    header: (HeaderName, HeaderValue),
) -> Response
where
    T: Serialize,
{
    let mut response = success(data, message);
    response.headers_mut().insert(header.0, header.1);
    response
}

pub fn error(
    code: &str,
    message: impl Into<String>,
    details: Option<Value>,
    status: StatusCode,
) -> Response {
    let body = ApiErrorResponse {
        success: false,
        error: ApiErrorBody {
            code: code.to_string(),
            message: message.into(),
            details,
        },
    };

    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_with_header_sets_header() {
        let response = success_with_header(
            vec![1, 2, 3],
            "ok",
            (
                HeaderName::from_static("x-pagination"),
                HeaderValue::from_static("{}"),
            ),
        );
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-pagination"], "{}");
    }

    #[test]
    fn test_error_uses_given_status() {
        let response = error("NOT_FOUND", "missing", None, StatusCode::NOT_FOUND);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
