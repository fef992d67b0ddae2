use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Failed to read response body: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server returned an error: {status}")]
    ServerError { status: u16 },

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// POSTs a JSON body to a handler URL and returns the decoded JSON reply.
pub trait Transport {
    fn post_json(&self, url: &str, body: &Value) -> Result<Value, RequestError>;
}

/// Blocking transport over `ureq`. Timeouts are whatever the agent carries.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_agent(ureq::AgentBuilder::new().build())
    }

    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn post_json(&self, url: &str, body: &Value) -> Result<Value, RequestError> {
        debug!(url, "posting to handler");
        let response = self
            .agent
            .post(url)
            .set("Content-Type", "application/json")
            .send_json(body)
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => RequestError::ServerError { status: code },
                other => RequestError::Http(other),
            })?;

        let text = response.into_string()?;
        Ok(serde_json::from_str(&text)?)
    }
}
