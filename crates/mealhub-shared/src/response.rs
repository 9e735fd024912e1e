//! The JSON envelope every endpoint responds with.
//!
//! ```json
//! { "status": true, "statusCode": 200, "success": true,
//!   "message": "...", "data": { ... }, "meta": { ... } }
//! ```

use serde::{Deserialize, Serialize};

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_page: u64,
}

/// One concrete problem behind an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSource {
    /// Request field the problem relates to; empty when it is not field specific.
    pub path: String,
    pub message: String,
}

impl ErrorSource {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status: bool,
    pub status_code: u16,
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_sources: Option<Vec<ErrorSource>>,
}

impl<T> ApiResponse<T> {
    pub fn ok(status_code: u16, message: impl Into<String>, data: T) -> Self {
        Self {
            status: true,
            status_code,
            success: true,
            message: message.into(),
            data: Some(data),
            meta: None,
            error_sources: None,
        }
    }

    pub fn with_meta(mut self, meta: PageMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Error envelope: `data` is always `null`.
pub type ErrorResponse = ApiResponse<()>;

impl ErrorResponse {
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status: false,
            status_code,
            success: false,
            message: message.into(),
            data: None,
            meta: None,
            error_sources: None,
        }
    }

    pub fn with_sources(mut self, sources: Vec<ErrorSource>) -> Self {
        self.error_sources = Some(sources);
        self
    }

    /// Attach a single source that is not tied to a request field.
    pub fn with_detail(self, detail: impl Into<String>) -> Self {
        self.with_sources(vec![ErrorSource::new("", detail)])
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::error(400, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::error(401, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::error(403, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::error(404, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::error(409, message)
    }

    pub fn internal_error() -> Self {
        Self::error(500, "Internal Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let body = ApiResponse::ok(200, "Blogs retrieved successfully", vec![1, 2]).with_meta(
            PageMeta {
                page: 1,
                limit: 6,
                total: 2,
                total_page: 1,
            },
        );
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "status": true,
                "statusCode": 200,
                "success": true,
                "message": "Blogs retrieved successfully",
                "data": [1, 2],
                "meta": {"page": 1, "limit": 6, "total": 2, "totalPage": 1}
            })
        );
    }

    #[test]
    fn test_error_envelope_has_null_data() {
        let body = ErrorResponse::not_found("Blog not found").with_detail("Blog not found: 42");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["data"], serde_json::Value::Null);
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["statusCode"], json!(404));
        assert_eq!(value["errorSources"][0]["message"], json!("Blog not found: 42"));
        assert!(value.get("meta").is_none());
    }
}
