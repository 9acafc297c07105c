use crate::{ApiResponseOrError, Credentials, OpenAiError};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION},
    Client, Method, Response,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub(crate) const OPENAI_BETA: &str = "openai-beta";
pub(crate) const ASSISTANTS_V1: &str = "assistants=v1";

/// Shared transport for every resource: one connection pool and one set of
/// credentials per instance. Cloning is cheap and shares the pool.
#[derive(Clone)]
pub struct OpenAiClient {
    credentials: Credentials,
    client: Client,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OpenAiClient({})", self.credentials.base_url())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAiErrorWrapper {
    error: OpenAiError,
}

/// Headers that opt a request into the versioned assistants API surface.
pub(crate) fn assistants_beta() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(OPENAI_BETA),
        HeaderValue::from_static(ASSISTANTS_V1),
    );
    headers
}

impl OpenAiClient {
    pub fn new(credentials: Credentials) -> ApiResponseOrError<Self> {
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", credentials.api_key()))?;
        authorization.set_sensitive(true);

        let client = Client::builder()
            .default_headers([(AUTHORIZATION, authorization)].into_iter().collect())
            .build()?;

        Ok(Self {
            credentials,
            client,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    async fn request_inner<S, R>(
        &self,
        method: Method,
        route: R,
        body: Option<S>,
        headers: HeaderMap,
    ) -> ApiResponseOrError<Response>
    where
        R: Into<String>,
        S: Serialize,
    {
        let url = format!("{}{}", self.credentials.base_url(), route.into());

        let mut request = self.client.request(method.clone(), url.as_str()).headers(headers);

        if let Some(body) = body {
            // Serialized up front so a bad body fails before anything is sent.
            let body = serde_json::to_vec(&body)?;
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let request = request.build()?;
        log::debug!("OpenAI Request[{}] {}", method, url);

        let response = self.client.execute(request).await?;

        log::debug!(
            "OpenAI Response[{}] {} {url}",
            method,
            response.status().as_str()
        );
        Ok(response)
    }

    /// Sends one request and decodes a successful JSON body into `T`. Any
    /// non-2xx status becomes an [`OpenAiError`] carrying that status.
    pub async fn request<S, R, T>(
        &self,
        method: Method,
        route: R,
        body: Option<S>,
        headers: HeaderMap,
    ) -> ApiResponseOrError<T>
    where
        R: Into<String>,
        S: Serialize,
        T: DeserializeOwned,
    {
        let response = self.request_inner(method, route, body, headers).await?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|error| OpenAiError::from(error).with_status(status.as_u16()))?;

        if !status.is_success() {
            let error = match serde_json::from_slice::<OpenAiErrorWrapper>(&bytes) {
                Ok(wrapper) => wrapper.error,
                Err(_) => OpenAiError::new(
                    String::from_utf8_lossy(&bytes).into_owned(),
                    "unknown".to_string(),
                ),
            };
            log::debug!("OpenAI Error[{}] {}", status.as_str(), error.message);
            return Err(error.with_status(status.as_u16()));
        }

        serde_json::from_slice(&bytes).map_err(|error| OpenAiError::decode(error, status.as_u16()))
    }

    pub async fn get<R, T>(&self, route: R, headers: HeaderMap) -> ApiResponseOrError<T>
    where
        R: Into<String>,
        T: DeserializeOwned,
    {
        self.request::<(), R, T>(Method::GET, route, None, headers)
            .await
    }

    pub async fn post<S, R, T>(&self, route: R, body: S, headers: HeaderMap) -> ApiResponseOrError<T>
    where
        R: Into<String>,
        S: Serialize,
        T: DeserializeOwned,
    {
        self.request(Method::POST, route, Some(body), headers).await
    }

    pub async fn delete<R, T>(&self, route: R, headers: HeaderMap) -> ApiResponseOrError<T>
    where
        R: Into<String>,
        T: DeserializeOwned,
    {
        self.request::<(), R, T>(Method::DELETE, route, None, headers)
            .await
    }
}
