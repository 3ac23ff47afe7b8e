//! Strict JSON request decoding and envelope responses.

use std::fmt::Display;

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use serde_json::Value;

use crate::config::ToolkitConfig;
use crate::{Result, ToolkitError};

/// Envelope used for every JSON response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonResponse {
    /// Whether the response describes a failure.
    pub error: bool,
    /// Human-readable message.
    pub message: String,
    /// Optional payload. Never present on error envelopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonResponse {
    /// Create a success envelope without data.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: None,
        }
    }

    /// Create a success envelope carrying `data`.
    pub fn with_data(message: impl Into<String>, data: impl Serialize) -> Result<Self> {
        let data = serde_json::to_value(data).map_err(|e| ToolkitError::Encoding(e.to_string()))?;
        Ok(Self {
            error: false,
            message: message.into(),
            data: Some(data),
        })
    }

    /// Create an error envelope.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            data: None,
        }
    }
}

/// Read the request body and decode it as exactly one JSON value of type `T`.
///
/// The body is capped at `config.max_json_size` bytes, and unknown object
/// keys are rejected unless `config.allow_unknown_json_fields` is set.
pub async fn read_json<T: DeserializeOwned>(config: &ToolkitConfig, request: Request) -> Result<T> {
    let body = read_body(request.into_body(), config.max_json_size).await?;
    decode_json(config, &body)
}

/// Collect a body, failing as soon as it grows past `limit` bytes.
pub async fn read_body(body: Body, limit: u64) -> Result<Bytes> {
    let mut stream = body.into_data_stream();
    let mut buf = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| ToolkitError::MalformedRequest(e.to_string()))?;
        if (buf.len() + chunk.len()) as u64 > limit {
            return Err(ToolkitError::BodyTooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(Bytes::from(buf))
}

/// Decode `body` as exactly one JSON value of type `T`.
pub fn decode_json<T: DeserializeOwned>(config: &ToolkitConfig, body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ToolkitError::EmptyBody);
    }

    let mut de = serde_json::Deserializer::from_slice(body);

    let value = if config.allow_unknown_json_fields {
        T::deserialize(&mut de).map_err(decode_error)?
    } else {
        let mut unknown = None;
        let result = serde_ignored::deserialize(&mut de, |path| {
            if unknown.is_none() {
                unknown = Some(path.to_string());
            }
        });
        match (result, unknown) {
            // A body that is not well-formed is reported as such, even when
            // an unknown key was seen before the error.
            (Err(e), _) if matches!(e.classify(), Category::Syntax | Category::Eof) => {
                return Err(decode_error(e));
            }
            (_, Some(field)) => return Err(ToolkitError::UnknownField(field)),
            (result, None) => result.map_err(decode_error)?,
        }
    };

    de.end().map_err(|_| ToolkitError::TrailingData)?;
    Ok(value)
}

fn decode_error(err: serde_json::Error) -> ToolkitError {
    match err.classify() {
        Category::Syntax | Category::Eof => ToolkitError::Syntax(err.to_string()),
        Category::Data => ToolkitError::TypeMismatch(err.to_string()),
        Category::Io => ToolkitError::MalformedRequest(err.to_string()),
    }
}

/// Serialize `payload` into a JSON response.
///
/// `headers` are applied first, so they can never override the
/// `Content-Type: application/json` header.
pub fn write_json<T: Serialize + ?Sized>(
    status: StatusCode,
    payload: &T,
    headers: HeaderMap,
) -> Result<Response> {
    let body = serde_json::to_vec(payload).map_err(|e| ToolkitError::Encoding(e.to_string()))?;

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().extend(headers);
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Ok(response)
}

/// Write an error envelope carrying `err`'s message.
///
/// The status defaults to 400 Bad Request.
pub fn error_json(err: impl Display, status: Option<StatusCode>) -> Result<Response> {
    write_json(
        status.unwrap_or(StatusCode::BAD_REQUEST),
        &JsonResponse::error(err.to_string()),
        HeaderMap::new(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Foo {
        foo: String,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Nested {
        inner: Inner,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Inner {
        id: u32,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Required {
        name: String,
    }

    fn strict() -> ToolkitConfig {
        ToolkitConfig::default()
    }

    fn request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> JsonResponse {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_read_json_good() {
        let foo: Foo = read_json(&strict(), request(r#"{"foo": "bar"}"#)).await.unwrap();
        assert_eq!(foo.foo, "bar");
    }

    #[tokio::test]
    async fn test_read_json_table() {
        let cases: &[(&str, &str, bool, u64, fn(&ToolkitError) -> bool)] = &[
            ("badly formatted", r#"{"foo":}"#, false, 1024, |e| {
                matches!(e, ToolkitError::Syntax(_))
            }),
            ("incorrect type", r#"{"foo": 1}"#, false, 1024, |e| {
                matches!(e, ToolkitError::TypeMismatch(_))
            }),
            ("two documents", r#"{"foo": "1"}{"alpha": "beta"}"#, false, 1024, |e| {
                matches!(e, ToolkitError::TrailingData)
            }),
            ("empty body", "", false, 1024, |e| {
                matches!(e, ToolkitError::EmptyBody)
            }),
            ("whitespace body", " \n\t", false, 1024, |e| {
                matches!(e, ToolkitError::EmptyBody)
            }),
            ("truncated", r#"{"foo": "1"#, false, 1024, |e| {
                matches!(e, ToolkitError::Syntax(_))
            }),
            ("unknown field", r#"{"fooo": "1"}"#, false, 1024, |e| {
                matches!(e, ToolkitError::UnknownField(name) if name == "fooo")
            }),
            ("unknown field then truncated", r#"{"fooo": "1", "foo": "#, false, 1024, |e| {
                matches!(e, ToolkitError::Syntax(_))
            }),
            ("unknown field unterminated", r#"{"fooo": "1""#, false, 1024, |e| {
                matches!(e, ToolkitError::Syntax(_))
            }),
            ("unknown field then bad token", r#"{"fooo": "1", "foo": ]}"#, false, 1024, |e| {
                matches!(e, ToolkitError::Syntax(_))
            }),
            ("unknown field then wrong type", r#"{"fooo": "1", "foo": 2}"#, false, 1024, |e| {
                matches!(e, ToolkitError::UnknownField(name) if name == "fooo")
            }),
            ("unquoted key", r#"{jack: "1"}"#, false, 1024, |e| {
                matches!(e, ToolkitError::Syntax(_))
            }),
            ("too large", r#"{"foo": "bar"}"#, false, 5, |e| {
                matches!(e, ToolkitError::BodyTooLarge { limit: 5 })
            }),
            ("not json", "Hello, world", false, 1024, |e| {
                matches!(e, ToolkitError::Syntax(_))
            }),
            ("two documents when lenient", r#"{"foo": "1"} {"foo": "2"}"#, true, 1024, |e| {
                matches!(e, ToolkitError::TrailingData)
            }),
        ];

        for (name, body, allow_unknown, max_size, check) in cases {
            let config = ToolkitConfig::default()
                .with_allow_unknown_json_fields(*allow_unknown)
                .with_max_json_size(*max_size);

            let result: Result<Foo> = read_json(&config, request(body)).await;
            match result {
                Err(e) => assert!(check(&e), "{name}: unexpected error {e:?}"),
                Ok(v) => panic!("{name}: expected an error, got {v:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_read_json_allows_unknown_fields() {
        let config = strict().with_allow_unknown_json_fields(true);

        let foo: Foo = read_json(&config, request(r#"{"fooo": "1", "foo": "x"}"#))
            .await
            .unwrap();
        assert_eq!(foo.foo, "x");
    }

    #[tokio::test]
    async fn test_read_json_body_at_limit() {
        let body = r#"{"foo":"b"}"#;
        let config = strict().with_max_json_size(body.len() as u64);

        let foo: Foo = read_json(&config, request(body)).await.unwrap();
        assert_eq!(foo.foo, "b");
    }

    #[test]
    fn test_decode_json_nested_unknown_field() {
        let result: Result<Nested> = decode_json(&strict(), br#"{"inner": {"id": 1, "extra": true}}"#);
        assert!(matches!(result, Err(ToolkitError::UnknownField(name)) if name == "inner.extra"));
    }

    #[test]
    fn test_decode_json_missing_required_field() {
        let result: Result<Required> = decode_json(&strict(), b"{}");
        assert!(matches!(result, Err(ToolkitError::TypeMismatch(_))));
    }

    #[test]
    fn test_decode_json_syntax_error_has_position() {
        let result: Result<Foo> = decode_json(&strict(), b"{\n  \"foo\": ]\n}");
        match result {
            Err(ToolkitError::Syntax(msg)) => assert!(msg.contains("line 2"), "{msg}"),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_json_trailing_whitespace() {
        let foo: Foo = decode_json(&strict(), b"{\"foo\": \"a\"}\n\n").unwrap();
        assert_eq!(foo.foo, "a");
    }

    #[test]
    fn test_decode_json_into_value() {
        let value: Value = decode_json(&strict(), br#"{"anything": [1, 2]}"#).unwrap();
        assert_eq!(value["anything"][1], 2);
    }

    #[tokio::test]
    async fn test_write_json() {
        let mut headers = HeaderMap::new();
        headers.insert("x-foo", HeaderValue::from_static("BAR"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));

        let payload = JsonResponse::ok("foo");
        let response = write_json(StatusCode::OK, &payload, headers).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-foo"], "BAR");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let envelope = body_json(response).await;
        assert_eq!(envelope, payload);
    }

    #[test]
    fn test_write_json_omits_missing_data() {
        let json = serde_json::to_string(&JsonResponse::ok("done")).unwrap();
        assert_eq!(json, r#"{"error":false,"message":"done"}"#);
    }

    #[tokio::test]
    async fn test_write_json_with_data() {
        let payload = JsonResponse::with_data("slug", serde_json::json!({"slug": "a-b"})).unwrap();
        let response = write_json(StatusCode::CREATED, &payload, HeaderMap::new()).unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let envelope = body_json(response).await;
        assert_eq!(envelope.data.unwrap()["slug"], "a-b");
    }

    #[test]
    fn test_write_json_encoding_failure() {
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1u8], "non-string key");

        let result = write_json(StatusCode::OK, &map, HeaderMap::new());
        assert!(matches!(result, Err(ToolkitError::Encoding(_))));
    }

    #[tokio::test]
    async fn test_error_json() {
        let response = error_json("some error", Some(StatusCode::SERVICE_UNAVAILABLE)).unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let envelope = body_json(response).await;
        assert!(envelope.error);
        assert_eq!(envelope.message, "some error");
        assert!(envelope.data.is_none());
    }

    #[tokio::test]
    async fn test_error_json_default_status() {
        let response = error_json(ToolkitError::EmptyBody, None).unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await.message, "body must not be empty");
    }
}
