use std::path::PathBuf;
use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::consultation::ConsultationService;
use crate::dictionary::DictionaryService;
use crate::exercises::ExerciseService;
use crate::token::TokenStore;
use crate::writing::WritingService;
use crate::ApiError;

pub const DEFAULT_API_URL: &str = "https://api.cdkace.com";

// Same unreserved set as `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub(crate) fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    /// Body of a response whose content type was not JSON, unchanged.
    Text(String),
}

impl Payload {
    fn empty() -> Self {
        Payload::Json(Value::Object(Map::new()))
    }

    /// Deserializes the payload, unwrapping an envelope's `data` when one is present.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            Payload::Json(value) => {
                let value = match value {
                    Value::Object(mut map) if map.get("data").is_some_and(|data| !data.is_null()) => {
                        map.remove("data").unwrap_or_default()
                    }
                    other => other,
                };
                serde_json::from_value(value).map_err(ApiError::Decode)
            }
            Payload::Text(text) => serde_json::from_value(Value::String(text.clone()))
                .map_err(|_| ApiError::UnexpectedContent(text)),
        }
    }
}

/// Where the backend lives and where the bearer token is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` keeps the token in memory only.
    pub token_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token_path: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<TokenStore>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: TokenStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: Arc::new(token),
        }
    }

    /// Builds a client, loading the persisted token when a path is configured.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let token = match &config.token_path {
            Some(path) => TokenStore::load(path)?,
            None => TokenStore::in_memory(),
        };
        Ok(Self::new(config.base_url.clone(), token))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &TokenStore {
        &self.token
    }

    pub fn dictionary(&self) -> DictionaryService<'_> {
        DictionaryService::new(self)
    }

    pub fn exercises(&self) -> ExerciseService<'_> {
        ExerciseService::new(self)
    }

    pub fn writing(&self) -> WritingService<'_> {
        WritingService::new(self)
    }

    pub fn consultation(&self) -> ConsultationService<'_> {
        ConsultationService::new(self)
    }

    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Payload, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%method, %url, "sending request");
        let result = self.send(method.clone(), &url, body).await;
        if let Err(error) = &result {
            tracing::error!(%method, %url, %error, "API request failed");
        }
        result
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<Payload, ApiError> {
        let mut req = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = self.token.get() {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        let res = req.send().await.map_err(ApiError::Network)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Payload::empty());
        }

        let is_json = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_json_content_type);
        let body = res.text().await.map_err(ApiError::Network)?;
        if !is_json {
            return Ok(Payload::Text(body));
        }
        if body.trim().is_empty() {
            return Ok(Payload::empty());
        }
        serde_json::from_str(&body)
            .map(Payload::Json)
            .map_err(ApiError::Decode)
    }

    pub async fn get(&self, endpoint: &str) -> Result<Payload, ApiError> {
        self.request::<()>(Method::GET, endpoint, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Payload, ApiError> {
        self.request(Method::POST, endpoint, Some(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Payload, ApiError> {
        self.request(Method::PUT, endpoint, Some(body)).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Payload, ApiError> {
        self.request::<()>(Method::DELETE, endpoint, None).await
    }

    pub async fn get_data<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        decoded(endpoint, self.get(endpoint).await)
    }

    pub async fn post_data<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        decoded(endpoint, self.post(endpoint, body).await)
    }

    pub async fn put_data<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        decoded(endpoint, self.put(endpoint, body).await)
    }

    pub async fn delete_data<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        decoded(endpoint, self.delete(endpoint).await)
    }
}

fn decoded<T: DeserializeOwned>(
    endpoint: &str,
    payload: Result<Payload, ApiError>,
) -> Result<T, ApiError> {
    payload?.into_data().map_err(|error| {
        tracing::error!(endpoint, %error, "unexpected response shape");
        error
    })
}

fn is_json_content_type(value: &str) -> bool {
    let mime = value.split(';').next().unwrap_or_default().trim();
    mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
}

fn status_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| format!("Server responded with status: {}", status.as_u16()));
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Word {
        word: String,
    }

    #[test]
    fn envelope_data_is_unwrapped() {
        let payload = Payload::Json(json!({
            "data": {"word": "cat"},
            "message": "ok",
            "status": 200,
            "success": true
        }));
        assert_eq!(
            payload.into_data::<Word>().unwrap(),
            Word { word: "cat".into() }
        );
    }

    #[test]
    fn bare_values_are_used_as_is() {
        let payload = Payload::Json(json!({"word": "dog"}));
        assert_eq!(
            payload.into_data::<Word>().unwrap(),
            Word { word: "dog".into() }
        );
    }

    #[test]
    fn null_data_is_not_treated_as_an_envelope() {
        let payload = Payload::Json(json!({"data": null, "word": "owl"}));
        assert_eq!(
            payload.into_data::<Word>().unwrap(),
            Word { word: "owl".into() }
        );
    }

    #[test]
    fn text_only_decodes_into_strings() {
        let text = Payload::Text("plain reply".into());
        assert_eq!(text.clone().into_data::<String>().unwrap(), "plain reply");
        assert!(matches!(
            text.into_data::<Word>(),
            Err(ApiError::UnexpectedContent(body)) if body == "plain reply"
        ));
    }

    #[test]
    fn json_content_types() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("application/json; charset=utf-8"));
        assert!(is_json_content_type("application/problem+json"));
        assert!(!is_json_content_type("text/plain; charset=utf-8"));
        assert!(!is_json_content_type("text/html"));
    }

    #[test]
    fn status_errors_prefer_server_message() {
        let error = status_error(StatusCode::BAD_REQUEST, r#"{"message":"Topic is required"}"#);
        assert_eq!(error.to_string(), "Topic is required");
        assert_eq!(error.status(), Some(400));

        let error = status_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(error.to_string(), "Server responded with status: 500");

        let error = status_error(StatusCode::NOT_FOUND, r#"{"message":""}"#);
        assert_eq!(error.to_string(), "Server responded with status: 404");
    }

    #[test]
    fn components_are_encoded_like_uri_components() {
        assert_eq!(encode_component("beat around the bush"), "beat%20around%20the%20bush");
        assert_eq!(encode_component("rock&roll?"), "rock%26roll%3F");
        assert_eq!(encode_component("self-made_(adj.)"), "self-made_(adj.)");
        assert_eq!(encode_component("café"), "caf%C3%A9");
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = ApiClient::new("http://localhost:8080/api/", TokenStore::in_memory());
        assert_eq!(client.base_url(), "http://localhost:8080/api");
    }

    #[test]
    fn config_without_token_path_stays_in_memory() {
        let client = ApiClient::from_config(&ClientConfig::default()).unwrap();
        assert_eq!(client.base_url(), DEFAULT_API_URL);
        assert_eq!(client.token().path(), None);
        assert_eq!(client.token().get(), None);
    }

    #[test]
    fn config_loads_the_persisted_token() {
        let dir = std::env::temp_dir().join(format!("engace-client-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let token_path = dir.join("auth_token");
        std::fs::write(&token_path, "saved-token\n").unwrap();

        let client = ApiClient::from_config(&ClientConfig {
            base_url: "http://localhost:5000/api/".into(),
            token_path: Some(token_path.clone()),
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(client.token().path(), Some(token_path.as_path()));
        assert_eq!(client.token().get().as_deref(), Some("saved-token"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
