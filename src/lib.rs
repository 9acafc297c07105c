//! An async client for the threads, messages and runs endpoints of the OpenAI
//! assistants API.
//!
//! ```no_run
//! use openai_assistants::{client::OpenAiClient, Credentials};
//! use openai_assistants::assistants::runs::CreateRunRequest;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new(Credentials::from_env()?)?;
//! let run = client
//!     .create_run("thread_abc", CreateRunRequest::builder("asst_abc").build()?)
//!     .await?;
//! println!("{} is {}", run.id, run.status);
//! # Ok(())
//! # }
//! ```
use serde::Deserialize;
use std::env;

pub mod assistants;
pub mod client;

pub const BASE_URL: &str = "https://api.openai.com/v1/";

pub type ApiResponseOrError<T> = Result<T, OpenAiError>;

/// Error type used for locally built requests that never reached the network.
pub const REQUEST_CONSTRUCTION_ERROR: &str = "invalid_request_construction";
const TRANSPORT_ERROR: &str = "transport";
const DECODE_ERROR: &str = "decode";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OpenAiError {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: String,
    pub param: Option<String>,
    pub code: Option<String>,
    /// HTTP status of the response, when one was received.
    #[serde(skip)]
    pub status: Option<u16>,
}

impl OpenAiError {
    pub fn new(message: String, error_type: String) -> OpenAiError {
        OpenAiError {
            message,
            error_type,
            param: None,
            code: None,
            status: None,
        }
    }

    pub(crate) fn with_status(mut self, status: u16) -> OpenAiError {
        self.status = Some(status);
        self
    }

    pub(crate) fn decode(error: serde_json::Error, status: u16) -> OpenAiError {
        OpenAiError::new(error.to_string(), DECODE_ERROR.to_string()).with_status(status)
    }

    /// The request could not be built, so nothing was sent.
    pub fn is_request_error(&self) -> bool {
        self.error_type == REQUEST_CONSTRUCTION_ERROR
    }

    /// The request was attempted and failed on the wire or in the response.
    pub fn is_transport_error(&self) -> bool {
        !self.is_request_error()
    }
}

impl std::fmt::Display for OpenAiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {status})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for OpenAiError {}

impl From<reqwest::Error> for OpenAiError {
    fn from(value: reqwest::Error) -> Self {
        let error_type = if value.is_builder() {
            REQUEST_CONSTRUCTION_ERROR
        } else {
            TRANSPORT_ERROR
        };
        let status = value.status().map(|status| status.as_u16());
        OpenAiError {
            status,
            ..OpenAiError::new(value.to_string(), error_type.to_string())
        }
    }
}

impl From<serde_json::Error> for OpenAiError {
    fn from(value: serde_json::Error) -> Self {
        OpenAiError::new(value.to_string(), REQUEST_CONSTRUCTION_ERROR.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for OpenAiError {
    fn from(value: reqwest::header::InvalidHeaderValue) -> Self {
        OpenAiError::new(value.to_string(), REQUEST_CONSTRUCTION_ERROR.to_string())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Credentials {
    api_key: String,
    base_url: String,
}

impl Credentials {
    /// Creates credentials for the given key and API root. The base URL is
    /// normalised to end in `/` so routes can be appended directly.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            api_key: api_key.into(),
            base_url,
        }
    }

    /// Reads `OPENAI_KEY` and, if set, `OPENAI_BASE_URL`, loading a `.env`
    /// file first when one is present.
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenvy::dotenv().ok();
        let api_key = env::var("OPENAI_KEY")?;
        let base_url = env::var("OPENAI_BASE_URL").unwrap_or_else(|_| BASE_URL.to_string());
        Ok(Self::new(api_key, base_url))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
