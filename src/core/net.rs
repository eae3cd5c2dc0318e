// src/core/net.rs
//
// The only place that talks to the network. Everything above it goes through
// `Transport`, so page parsing and mutation planning stay testable offline.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::config::consts::{HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::error::Result;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// One authenticated request per call. Non-2xx statuses and I/O failures are errors;
/// callers treat every error as fatal for the current command.
pub trait Transport {
    fn get(&self, url: &str) -> Result<String>;

    fn post_form(&self, url: &str, form: &[(&str, String)]) -> Result<String>;

    fn post_body(&self, url: &str, body: String, content_type: &str) -> Result<String>;
}

/// Cookie-keeping HTTPS session.
pub struct Session {
    client: Client,
}

impl Session {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for Session {
    fn get(&self, url: &str) -> Result<String> {
        debug!(url, "GET");
        let resp = self.client.get(url).send()?.error_for_status()?;
        Ok(resp.text()?)
    }

    fn post_form(&self, url: &str, form: &[(&str, String)]) -> Result<String> {
        debug!(url, fields = form.len(), "POST form");
        let resp = self.client.post(url).form(form).send()?.error_for_status()?;
        Ok(resp.text()?)
    }

    fn post_body(&self, url: &str, body: String, content_type: &str) -> Result<String> {
        debug!(url, bytes = body.len(), "POST body");
        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()?
            .error_for_status()?;
        Ok(resp.text()?)
    }
}
