mod error;
mod server;
use crate::data::error::GameError;
pub use error::NetworkError;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::http::request::Parts;
use hyper::{Request, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::error::Error;
pub use server::routes::Routes;
pub use server::ultma_server::UltmaServer;
use url::form_urlencoded;

const MAX_BODY: usize = 64 * 1024;

pub type ResponseBody = Full<Bytes>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub params: HashMap<String, String>,
}

impl HttpRequest {
    /// Collects the body and flattens query, form and JSON parameters into
    /// one map. Body values override query values of the same name.
    pub async fn read<B>(request: Request<B>) -> Result<Self, NetworkError>
    where
        B: Body,
        B::Error: Into<Box<dyn Error + Send + Sync>>,
    {
        let (parts, body) = request.into_parts();
        let body = Limited::new(body, MAX_BODY)
            .collect()
            .await
            .map_err(|err| {
                if err.downcast_ref::<LengthLimitError>().is_some() {
                    NetworkError::BodyTooLarge
                } else {
                    NetworkError::MalformedRequest(err.to_string())
                }
            })?
            .to_bytes();
        Self::from_parts(&parts, &body)
    }

    fn from_parts(parts: &Parts, body: &[u8]) -> Result<Self, NetworkError> {
        let mut params = HashMap::new();
        if let Some(query) = parts.uri.query() {
            parse_form(query.as_bytes(), &mut params);
        }
        if !body.is_empty() {
            if is_json(&parts.headers) {
                parse_json(body, &mut params)?;
            } else {
                parse_form(body, &mut params);
            }
        }
        Ok(Self {
            method: parts.method.as_str().to_string(),
            path: parts.uri.path().to_string(),
            params,
        })
    }

    pub fn param(&self, name: &str) -> Result<&str, GameError> {
        self.params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| GameError::validation(format!("missing parameter '{}'", name)))
    }

    pub fn number(&self, name: &str) -> Result<usize, GameError> {
        let raw = self.param(name)?;
        raw.trim()
            .parse()
            .map_err(|_| GameError::validation(format!("parameter '{}' must be a non-negative integer, got '{}'", name, raw)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Option<String>,
}

impl HttpResponse {
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status: StatusCode::OK,
                body: Some(body),
            },
            Err(err) => Self::error(StatusCode::INTERNAL_SERVER_ERROR, "internal", &err.to_string()),
        }
    }

    pub fn error(status: StatusCode, kind: &str, message: &str) -> Self {
        let body = serde_json::json!({ "error": kind, "message": message });
        Self {
            status,
            body: Some(body.to_string()),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
        }
    }

    pub fn into_hyper(self) -> Response<ResponseBody> {
        let has_body = self.body.is_some();
        let mut response = Response::new(Full::new(Bytes::from(self.body.unwrap_or_default())));
        *response.status_mut() = self.status;
        let headers = response.headers_mut();
        if has_body {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, POST, OPTIONS"));
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
        response
    }
}

impl From<GameError> for HttpResponse {
    fn from(err: GameError) -> Self {
        let status = match err {
            GameError::Validation(_) => StatusCode::BAD_REQUEST,
            GameError::NotFound(_) => StatusCode::NOT_FOUND,
            GameError::IllegalState(_) => StatusCode::CONFLICT,
        };
        Self::error(status, err.kind(), &err.to_string())
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|kind| kind.to_str().ok())
        .map_or(false, |kind| kind.starts_with("application/json"))
}

fn parse_form(raw: &[u8], params: &mut HashMap<String, String>) {
    for (key, value) in form_urlencoded::parse(raw) {
        params.insert(key.into_owned(), value.into_owned());
    }
}

fn parse_json(raw: &[u8], params: &mut HashMap<String, String>) -> Result<(), NetworkError> {
    let value: Value = serde_json::from_slice(raw).map_err(|err| NetworkError::MalformedRequest(err.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(NetworkError::MalformedRequest("JSON body must be an object".to_string()));
    };
    for (key, value) in fields {
        let value = match value {
            Value::String(text) => text,
            Value::Null => continue,
            other => other.to_string(),
        };
        params.insert(key, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(uri: &str, content_type: &str, body: impl Into<Bytes>) -> Request<Full<Bytes>> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Full::new(body.into()))
            .expect("request")
    }

    #[test]
    fn form_pairs_decode_and_last_value_wins() {
        let mut params = HashMap::new();
        parse_form(b"w1=YNGVY&w2=vorlag&flag&w1=HARKON&name=Gandalf+the%20Grey&accent=%C3%A9", &mut params);
        assert_eq!(params.get("w1").map(String::as_str), Some("HARKON"));
        assert_eq!(params.get("w2").map(String::as_str), Some("vorlag"));
        assert_eq!(params.get("flag").map(String::as_str), Some(""));
        assert_eq!(params.get("name").map(String::as_str), Some("Gandalf the Grey"));
        assert_eq!(params.get("accent").map(String::as_str), Some("é"));
    }

    #[test]
    fn json_bodies_flatten_to_params() {
        let mut params = HashMap::new();
        parse_json(br#"{"playerName":"Alice","pos1":2,"skip":null}"#, &mut params).expect("json");
        assert_eq!(params.get("playerName").map(String::as_str), Some("Alice"));
        assert_eq!(params.get("pos1").map(String::as_str), Some("2"));
        assert!(!params.contains_key("skip"));
        assert!(parse_json(b"[1, 2]", &mut params).is_err());
    }

    #[tokio::test]
    async fn body_params_override_the_query() {
        let request = post("/api/game/cast?playerId=abc&w1=YNGVY", "application/x-www-form-urlencoded", "w1=HARKON&w2=VORLAG");
        let request = HttpRequest::read(request).await.expect("read");
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/api/game/cast");
        assert_eq!(request.param("playerId").ok(), Some("abc"));
        assert_eq!(request.param("w1").ok(), Some("HARKON"));
        assert_eq!(request.param("w2").ok(), Some("VORLAG"));
    }

    #[tokio::test]
    async fn paths_are_not_form_decoded() {
        let request = post("/api/game/a+b", "application/json", r#"{"playerName":"Alice"}"#);
        let request = HttpRequest::read(request).await.expect("read");
        assert_eq!(request.path, "/api/game/a+b");
        assert_eq!(request.param("playerName").ok(), Some("Alice"));
    }

    #[tokio::test]
    async fn oversized_and_malformed_bodies_are_rejected() {
        let big = post("/api/game/join", "text/plain", vec![b'a'; MAX_BODY + 1]);
        assert!(matches!(HttpRequest::read(big).await, Err(NetworkError::BodyTooLarge)));
        let broken = post("/api/game/join", "application/json", "{not json");
        assert!(matches!(HttpRequest::read(broken).await, Err(NetworkError::MalformedRequest(_))));
    }

    #[test]
    fn engine_errors_map_to_status_codes() {
        assert_eq!(HttpResponse::from(GameError::validation("x")).status, StatusCode::BAD_REQUEST);
        assert_eq!(HttpResponse::from(GameError::not_found("x")).status, StatusCode::NOT_FOUND);
        let conflict = HttpResponse::from(GameError::illegal_state("wrong phase"));
        assert_eq!(conflict.status, StatusCode::CONFLICT);
        let body: Value = serde_json::from_str(conflict.body.as_deref().unwrap_or("")).expect("json");
        assert_eq!(body["error"], "illegal_state");
        assert_eq!(body["message"], "wrong phase");
    }

    #[test]
    fn responses_carry_cors_headers() {
        let response = HttpResponse::json(&true).into_hyper();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let empty = HttpResponse::no_content().into_hyper();
        assert_eq!(empty.status(), StatusCode::NO_CONTENT);
        assert!(empty.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn numeric_params_are_validated() {
        let mut request = HttpRequest::default();
        request.params.insert("pos1".to_string(), "3".to_string());
        request.params.insert("pos2".to_string(), "-1".to_string());
        assert_eq!(request.number("pos1").ok(), Some(3));
        assert!(matches!(request.number("pos2"), Err(GameError::Validation(_))));
        assert!(matches!(request.param("pos3"), Err(GameError::Validation(_))));
    }
}
