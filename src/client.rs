// src/client.rs

use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

use crate::config::{AppConfig, Credentials, render_template};
use crate::errors::{CheckError, Result};
use crate::models::{ApiEnvelope, ApiStatus, GradeableValues, TokenResponse};

pub const TOKEN_PATH: &str = "/api/token";
pub const VALUES_PATH: &str = "/api/{{semester}}/{{course}}/gradeable/{{gradeable}}/values";
pub const GRADE_PATH: &str = "/api/{{semester}}/{{course}}/gradeable/{{gradeable}}/grade";

/// Thin client over the grading platform's JSON API.
#[derive(Clone)]
pub struct SubmittyClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct TokenForm<'a> {
    user_id: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct GradeForm<'a> {
    user_id: &'a str,
    vcs_checkout: &'a str,
    git_repo_id: &'a str,
}

/// Builds a path under a course's gradeable from one of the path templates.
pub fn gradeable_path(template: &str, semester: &str, course: &str, gradeable: &str) -> String {
    render_template(
        template,
        &json!({ "semester": semester, "course": course, "gradeable": gradeable }),
    )
}

impl SubmittyClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.header("Authorization", token),
            None => builder,
        }
    }

    /// POSTs form fields and returns the response envelope.
    pub async fn post_form<T: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &T,
        token: Option<&str>,
    ) -> Result<ApiEnvelope> {
        self.post_form_as(path, form, token).await
    }

    async fn post_form_as<T, R>(&self, path: &str, form: &T, token: Option<&str>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        log::debug!("POST {}", url);
        let resp = Self::authorize(self.client.post(&url), token)
            .form(form)
            .send()
            .await?;
        Self::read_json(resp).await
    }

    /// GETs a path with query parameters and returns the response envelope.
    pub async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
        token: Option<&str>,
    ) -> Result<ApiEnvelope> {
        let url = self.url(path);
        log::debug!("GET {} {:?}", url, query);
        let resp = Self::authorize(self.client.get(&url), token)
            .query(query)
            .send()
            .await?;
        Self::read_json(resp).await
    }

    /// The platform reports most failures inside a JSON envelope, sometimes
    /// with a non-2xx status, so the body is parsed before the status is judged.
    async fn read_json<R: DeserializeOwned>(resp: Response) -> Result<R> {
        let status = resp.status();
        let body = resp.text().await?;
        log::debug!("Response {}: {}", status, body);

        match serde_json::from_str::<R>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(CheckError::ApiError {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(CheckError::UnexpectedResponse(format!(
                "response body is not the expected JSON ({}): {}",
                e, body
            ))),
        }
    }

    /// Exchanges a user id and password for an API token.
    pub async fn fetch_token(&self, credentials: &Credentials) -> Result<String> {
        let form = TokenForm {
            user_id: &credentials.user_id,
            password: &credentials.password,
        };
        let resp: TokenResponse = self.post_form_as(TOKEN_PATH, &form, None).await?;
        let message = resp.message.as_deref().unwrap_or("<no message>");

        if let Some(status) = resp.status.filter(|s| *s != ApiStatus::Success) {
            return Err(CheckError::Authentication(format!("{} ({})", message, status)));
        }

        match resp.data {
            Some(data) => Ok(data.token),
            None if resp.message.is_some() => Err(CheckError::Authentication(message.to_string())),
            None => Err(CheckError::UnexpectedResponse("token response has no data.token".to_string())),
        }
    }

    /// Raw values envelope for one user and gradeable.
    pub async fn values(
        &self,
        semester: &str,
        course: &str,
        gradeable: &str,
        user_id: &str,
        token: &str,
    ) -> Result<ApiEnvelope> {
        let path = gradeable_path(VALUES_PATH, semester, course, gradeable);
        self.get(&path, &[("user_id", user_id)], Some(token)).await
    }

    /// Typed values for one user and gradeable. A non-success envelope is an error.
    pub async fn gradeable_values(
        &self,
        semester: &str,
        course: &str,
        gradeable: &str,
        user_id: &str,
        token: &str,
    ) -> Result<GradeableValues> {
        let envelope = self.values(semester, course, gradeable, user_id, token).await?;
        if !envelope.is_success() {
            return Err(CheckError::UnexpectedResponse(format!(
                "values request returned {}: {}",
                envelope.status,
                envelope.message_or_default()
            )));
        }
        let data = envelope
            .data
            .ok_or_else(|| CheckError::UnexpectedResponse("values response has no data".to_string()))?;
        Ok(serde_json::from_value(data)?)
    }

    /// Asks the platform to check out the student's VCS repository and queue it for grading.
    pub async fn submit_grade(
        &self,
        semester: &str,
        course: &str,
        gradeable: &str,
        user_id: &str,
        token: &str,
    ) -> Result<ApiEnvelope> {
        let path = gradeable_path(GRADE_PATH, semester, course, gradeable);
        let form = GradeForm {
            user_id,
            vcs_checkout: "true",
            git_repo_id: "none",
        };
        self.post_form(&path, &form, Some(token)).await
    }
}
