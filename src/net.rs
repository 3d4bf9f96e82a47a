use chrono::{DateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::config::Config;
use crate::errors::{Error, Result};
use crate::parse;
use crate::token;
use crate::types::{Camera, LoginRequest, LoginResponse};

/// Session with the Spypoint REST API.
///
/// Every call is a single attempt. The token is refreshed lazily when it has
/// expired and dropped as soon as the service rejects it.
pub struct SpypointApi {
    client: Client,
    base_url: String,
    username: String,
    password: String,
    token: Option<String>,
    expires_at: DateTime<Utc>,
}

impl SpypointApi {
    pub fn new(client: Client, config: &Config) -> Self {
        Self::with_credentials(&config.username, &config.password, client).with_base_url(&config.base_url)
    }

    pub fn with_credentials(username: &str, password: &str, client: Client) -> Self {
        SpypointApi {
            client,
            base_url: crate::config::DEFAULT_BASE_URL.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            token: None,
            expires_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Value of the `Authorization` header, once authenticated.
    pub fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(|token| format!("Bearer {}", token))
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_token_expired(&self) -> bool {
        self.token.is_none() || self.expires_at <= Utc::now()
    }

    pub async fn authenticate(&mut self) -> Result<()> {
        let url = format!("{}/user/login", self.base_url);
        let body = LoginRequest {
            username: &self.username,
            password: &self.password,
        };

        let response = self.client.post(&url).json(&body).send().await?;
        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(Error::InvalidCredentials),
            status if !status.is_success() => return Err(Error::Api(status)),
            _ => {}
        }

        let login: LoginResponse = response.json().await?;
        self.expires_at = token::expires_at(&login.token)?;
        self.token = Some(login.token);
        log::info!("Authenticated as {}, token valid until {}", self.username, self.expires_at);
        Ok(())
    }

    pub async fn get_cameras(&mut self) -> Result<Vec<Camera>> {
        if self.is_token_expired() {
            self.authenticate().await?;
        }

        let url = format!("{}/camera/all", self.base_url);
        let mut request = self.client.get(&url).header(CONTENT_TYPE, "application/json");
        if let Some(authorization) = self.authorization() {
            request = request.header(reqwest::header::AUTHORIZATION, authorization);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            log::warn!("Camera listing rejected the token, dropping session");
            self.invalidate();
            return Err(Error::Api(status));
        }
        if !status.is_success() {
            return Err(Error::Api(status));
        }

        let body: Value = response.json().await?;
        let records = body
            .as_array()
            .ok_or_else(|| Error::UnexpectedResponse("camera listing is not a JSON array".to_string()))?;
        let cameras = parse::parse_cameras(records)?;
        log::info!("Fetched {} cameras.", cameras.len());
        Ok(cameras)
    }

    fn invalidate(&mut self) {
        self.token = None;
        self.expires_at = DateTime::<Utc>::MIN_UTC;
    }
}
