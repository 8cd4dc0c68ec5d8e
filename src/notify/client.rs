//! HTTP client for the user notification API.

use super::error::{NotifyError, Result};
use super::types::{ActionResponse, NotificationList};
use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::COOKIE;
use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 5;
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// The four calls the notification center makes.
pub trait NotificationApi {
    fn list(&self) -> Result<NotificationList>;
    fn mark_read(&self, id: i64) -> Result<ActionResponse>;
    fn mark_all_read(&self) -> Result<ActionResponse>;
    fn delete(&self, id: i64) -> Result<ActionResponse>;
}

pub struct HttpNotificationApi {
    base_url: String,
    session: Option<String>,
    http: Client,
}

impl HttpNotificationApi {
    /// `session` is sent verbatim as the `Cookie` header.
    pub fn new(base_url: impl Into<String>, session: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            session,
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = match &self.session {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        };
        let response = request.send()?;
        check_response(response)
    }

    fn action(&self, request: RequestBuilder) -> Result<ActionResponse> {
        let body = self.send(request)?.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    debug!("{} {}", status.as_u16(), response.url());
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text()?;
    let message = serde_json::from_str::<ActionResponse>(&body)
        .ok()
        .and_then(|r| r.message)
        .unwrap_or(body);
    Err(NotifyError::Status {
        status: status.as_u16(),
        message,
    })
}

impl NotificationApi for HttpNotificationApi {
    fn list(&self) -> Result<NotificationList> {
        let body = self
            .send(self.http.get(self.url("/api/user/notifications")))?
            .text()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn mark_read(&self, id: i64) -> Result<ActionResponse> {
        self.action(
            self.http
                .post(self.url(&format!("/api/user/notifications/{id}/read")))
                .json(&serde_json::json!({})),
        )
    }

    fn mark_all_read(&self) -> Result<ActionResponse> {
        self.action(
            self.http
                .post(self.url("/api/user/notifications/read-all"))
                .json(&serde_json::json!({})),
        )
    }

    fn delete(&self, id: i64) -> Result<ActionResponse> {
        self.action(self.http.delete(self.url(&format!("/api/user/notifications/{id}"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_path() {
        let api = HttpNotificationApi::new("http://localhost:5000/", None).unwrap();
        assert_eq!(
            api.url("/api/user/notifications"),
            "http://localhost:5000/api/user/notifications"
        );
        let api = HttpNotificationApi::new("http://localhost:5000", None).unwrap();
        assert_eq!(
            api.url("api/user/notifications/read-all"),
            "http://localhost:5000/api/user/notifications/read-all"
        );
    }
}
