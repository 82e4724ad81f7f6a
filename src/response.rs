use serde::Serialize;
use utoipa::ToSchema;

/// Paging info attached to list responses.
#[derive(Debug, Serialize, ToSchema, Clone, Default)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Envelope shared by every endpoint; `ok` is false only on error bodies.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub message: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            data: Some(data),
            meta,
        }
    }

    pub fn failure(message: impl Into<String>, data: T) -> Self {
        Self {
            ok: false,
            message: message.into(),
            data: Some(data),
            meta: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_bodies_omit_meta() {
        let body = serde_json::to_value(ApiResponse::failure("Not Found", 1)).unwrap();
        assert_eq!(body["ok"], false);
        assert!(body.get("meta").is_none());
    }

    #[test]
    fn empty_meta_serializes_nulls() {
        let body = serde_json::to_value(ApiResponse::success("OK", (), Some(Meta::empty()))).unwrap();
        assert_eq!(body["ok"], true);
        assert!(body["meta"]["total"].is_null());
    }
}
