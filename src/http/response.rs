use bytes::Bytes;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Fully buffered response. Buffering lets the client hand back the retry's
/// response verbatim without holding a connection open.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    headers: HeaderMap,
    body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn with_json(status: u16, value: &Value) -> Self {
        Self::new(
            status,
            HeaderMap::new(),
            Bytes::from(serde_json::to_vec(value).unwrap_or_default()),
        )
    }

    pub fn empty(status: u16) -> Self {
        Self::new(status, HeaderMap::new(), Bytes::new())
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Error message from a backend error body. Accepts `{"detail": "..."}` and the
    /// validation form `{"detail": [{"msg": "..."}]}`.
    pub fn detail(&self) -> Option<String> {
        let json: Value = serde_json::from_slice(&self.body).ok()?;
        let detail = json.get("detail")?;
        let msg = match detail {
            Value::String(s) => s.trim(),
            Value::Array(items) => items
                .iter()
                .find_map(|item| item.get("msg").and_then(|m| m.as_str()))?
                .trim(),
            _ => return None,
        };
        if msg.is_empty() {
            None
        } else {
            Some(msg.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_reads_plain_string() {
        let res = HttpResponse::with_json(400, &json!({"detail": "Blog title already exists"}));
        assert_eq!(res.detail().as_deref(), Some("Blog title already exists"));
    }

    #[test]
    fn detail_reads_first_validation_message() {
        let res = HttpResponse::with_json(
            422,
            &json!({"detail": [{"loc": ["body", "email"], "msg": "value is not a valid email address"}]}),
        );
        assert_eq!(
            res.detail().as_deref(),
            Some("value is not a valid email address")
        );
    }

    #[test]
    fn detail_is_none_for_non_json_or_blank() {
        let res = HttpResponse::new(502, HeaderMap::new(), Bytes::from_static(b"Bad Gateway"));
        assert_eq!(res.detail(), None);
        let res = HttpResponse::with_json(400, &json!({"detail": "  "}));
        assert_eq!(res.detail(), None);
    }

    #[test]
    fn success_range_is_2xx_only() {
        assert!(HttpResponse::empty(204).is_success());
        assert!(!HttpResponse::empty(301).is_success());
        assert!(!HttpResponse::empty(401).is_success());
    }
}
