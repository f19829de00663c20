use serde::{Deserialize, Serialize};

/// Envelope returned to external callers (CLI, host protocol).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}
impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

impl<T> From<crate::Result<T>> for ApiResponse<T> {
    fn from(res: crate::Result<T>) -> Self {
        match res {
            Ok(v) => ApiResponse::ok(v),
            Err(e) => ApiResponse::err(e.to_string()),
        }
    }
}
