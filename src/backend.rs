use crate::analytics::decode_payload;
use crate::errors::ApiError;
use crate::models::{
    AnalyticsPayload, AuthResponse, CareClient, ClientNote, LoginCredentials, NewClient, NewNote,
};
use crate::session::Session;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, warn};

/// Typed client for the care backend REST API.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

impl BackendClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn obtain_token(&self, credentials: &LoginCredentials) -> Result<AuthResponse, ApiError> {
        let request = self.http.post(self.url("/api/token/")).json(credentials);
        let resp = send(request, "token").await?;
        if resp.status() == StatusCode::UNAUTHORIZED || resp.status() == StatusCode::BAD_REQUEST {
            return Err(ApiError::Auth);
        }
        decode(resp).await
    }

    pub async fn list_clients(&self, session: &Session) -> Result<Vec<CareClient>, ApiError> {
        self.get_json(session, "/api/clients/careclients/").await
    }

    pub async fn get_client(&self, session: &Session, id: u64) -> Result<CareClient, ApiError> {
        self.get_json(session, &format!("/api/clients/careclients/{id}/")).await
    }

    pub async fn create_client(&self, session: &Session, client: &NewClient) -> Result<CareClient, ApiError> {
        let request = self
            .authorized(self.http.post(self.url("/api/clients/careclients/")), session)
            .json(client);
        decode(send(request, "create client").await?).await
    }

    pub async fn list_notes(&self, session: &Session, client_id: u64) -> Result<Vec<ClientNote>, ApiError> {
        self.get_json(session, &format!("/api/clients/client-notes/{client_id}/notes/"))
            .await
    }

    pub async fn create_note(&self, session: &Session, note: &NewNote) -> Result<ClientNote, ApiError> {
        let request = self
            .authorized(self.http.post(self.url("/api/clients/client-notes/")), session)
            .json(note);
        decode(send(request, "create note").await?).await
    }

    pub async fn note_distribution(&self, session: &Session, client_id: u64) -> Result<AnalyticsPayload, ApiError> {
        let path = format!("/api/clients/anaytics/client/{client_id}/note-distribution/");
        let request = self.authorized(self.http.get(self.url(&path)), session);
        let resp = check_status(send(request, &path).await?).await?;
        let body = resp.bytes().await?;
        decode_payload(&body)
    }

    async fn get_json<T: DeserializeOwned>(&self, session: &Session, path: &str) -> Result<T, ApiError> {
        let request = self.authorized(self.http.get(self.url(path)), session);
        decode(send(request, path).await?).await
    }

    fn authorized(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        request.header(reqwest::header::AUTHORIZATION, session.bearer())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn send(request: RequestBuilder, label: &str) -> Result<Response, ApiError> {
    let start = Instant::now();
    let resp = request.send().await.map_err(|err| {
        warn!("backend request failed - {label}: {err}");
        ApiError::Network(err.to_string())
    })?;
    debug!(
        "backend call completed - {label}, status={}, duration={:.2}s",
        resp.status(),
        start.elapsed().as_secs_f32()
    );
    Ok(resp)
}

async fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ApiError::Auth);
    }
    if !status.is_success() {
        let detail = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| format!("backend returned {status}"));
        return Err(ApiError::Network(detail));
    }
    Ok(resp)
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let resp = check_status(resp).await?;
    let body = resp.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
