use std::{collections::HashMap, io, pin::Pin, time::Duration};

use async_stream::stream;
use backon::{ExponentialBuilder, Retryable as _};
use futures::{Stream, StreamExt as _, TryStreamExt as _};
use quill_model::ConnectionId;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, REFERER};
use serde::de::DeserializeOwned;
use tokio_util::{
    codec::{FramedRead, LinesCodec},
    io::StreamReader,
};
use tracing::{error, trace, warn};

use crate::{
    error::{Error, Result},
    types::{
        request,
        response::{self, ChatCompletionError, ErrorResponse},
    },
};

/// Header carrying the user connection a request is made on behalf of.
pub const CONNECTION_HEADER: &str = "X-Connection-Id";

pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<response::ChatCompletionChunk>> + Send>>;

#[derive(Debug, Clone)]
pub struct Client {
    api_key: String,
    connection_id: ConnectionId,
    app_name: Option<String>,
    app_referrer: Option<String>,
    max_retries: usize,
    http_client: reqwest::Client,
    base_url: String,
}

impl Client {
    #[must_use]
    pub fn new(api_key: String, connection_id: ConnectionId) -> Self {
        Self {
            api_key,
            connection_id,
            app_name: None,
            app_referrer: None,
            max_retries: 3,
            http_client: reqwest::Client::new(),
            base_url: "https://api.byorouter.com".to_owned(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    #[must_use]
    pub fn with_app_referrer(mut self, app_referrer: Option<String>) -> Self {
        self.app_referrer = app_referrer;
        self
    }

    /// Set how often a request that failed before streaming started is
    /// retried. Failures after the first chunk was received are never retried.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    /// Build HTTP headers required for making API calls.
    /// Returns an error if any header value cannot be constructed.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        headers.insert(
            AUTHORIZATION,
            format!("Bearer {}", self.api_key)
                .parse()
                .map_err(|e| Error::Config(format!("Invalid API key header format: {e}")))?,
        );

        headers.insert(
            CONNECTION_HEADER,
            self.connection_id
                .as_str()
                .parse()
                .map_err(|e| Error::Config(format!("Invalid connection header: {e}")))?,
        );

        if let Some(referer) = &self.app_referrer {
            headers.insert(
                REFERER,
                referer
                    .parse()
                    .map_err(|e| Error::Config(format!("Invalid Referer header: {e}")))?,
            );
        }

        if let Some(title) = &self.app_name {
            headers.insert(
                "X-Title",
                title
                    .parse()
                    .map_err(|e| Error::Config(format!("Invalid Title header: {e}")))?,
            );
        }

        Ok(headers)
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(10))
            .with_max_delay(Duration::from_secs(5))
            .with_max_times(self.max_retries)
    }

    /// List the providers the connection holds credentials for.
    pub async fn providers(&self) -> Result<response::Providers> {
        self.get("/api/v1/providers", &[]).await
    }

    /// List the models reachable through the connection, optionally limited to
    /// a single provider.
    pub async fn models(&self, provider: Option<&str>) -> Result<response::Models> {
        match provider {
            Some(provider) => self.get("/api/v1/models", &[("provider", provider)]).await,
            None => self.get("/api/v1/models", &[]).await,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        let url = url.as_str();

        let operation = || async move {
            trace!(%url, ?query, "Triggering request.");
            let response = self
                .http_client
                .get(url)
                .headers(self.build_headers()?)
                .query(query)
                .send()
                .await?;

            let response = error_for_status(response).await?;
            response.json::<T>().await.map_err(Error::from)
        };

        operation
            .retry(self.backoff())
            .when(Error::is_transient)
            .notify(|error, delay| warn!(?error, ?delay, "Request failed. Retrying."))
            .await
    }

    /// Stream a chat completion.
    ///
    /// Establishing the stream is retried on transient errors. Once chunks
    /// are flowing, any error ends the stream.
    #[must_use]
    pub fn chat_completion_stream(&self, request: request::ChatCompletion) -> ChunkStream {
        let client = self.clone();
        let backoff = self.backoff();

        let retry_stream = stream! {
            let result = (|| client.chat_completion_stream_inner(request.clone()))
                .retry(backoff)
                .when(Error::is_transient)
                .notify(|error, delay| warn!(?error, ?delay, "Request failed. Retrying."))
                .await;

            match result {
                Ok(stream) => {
                    tokio::pin!(stream);
                    while let Some(item) = stream.next().await {
                        yield item;
                    }
                },
                Err(error) => yield Err(error),
            }
        };

        Box::pin(retry_stream)
    }

    async fn chat_completion_stream_inner(
        &self,
        request: request::ChatCompletion,
    ) -> Result<impl Stream<Item = Result<response::ChatCompletionChunk>>> {
        let url = format!("{}/api/v1/chat/completions", self.base_url);
        let headers = self.build_headers()?;

        let mut req_body = serde_json::to_value(request)?;
        req_body["stream"] = serde_json::Value::Bool(true);

        let redacted_headers = headers
            .iter()
            .map(|(k, v)| {
                if k.as_str() == AUTHORIZATION {
                    return (k.to_owned(), "[REDACTED]".to_owned());
                }

                (k.to_owned(), v.to_str().unwrap_or_default().to_owned())
            })
            .collect::<HashMap<_, _>>();

        trace!(%url, headers = ?redacted_headers, "Triggering request.");
        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&req_body)
            .send()
            .await?;

        trace!(
            status = response.status().as_u16(),
            content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .map(|v| v.to_str().unwrap_or_default()),
            "Received response."
        );

        let response = error_for_status(response).await?;

        let byte_stream = response.bytes_stream().map_err(io::Error::other);
        let lines = FramedRead::new(StreamReader::new(byte_stream), LinesCodec::new());

        let chunk_stream = lines
            .map_err(|e| Error::Stream(format!("Stream error: {e}")))
            .filter_map(|line_result| async move {
                match line_result {
                    Ok(line) => {
                        // Each data line starts with "data:", anything else
                        // (comments, keep-alives, blank separators) is skipped.
                        let data_part = line.strip_prefix("data:")?.trim();

                        // Marks the end of the SSE stream.
                        if data_part == "[DONE]" {
                            return None;
                        }

                        Some(parse_chunk(data_part))
                    }
                    Err(e) => Some(Err(e)),
                }
            });

        Ok(chunk_stream)
    }
}

async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return Ok(response);
    }

    let status = status.as_u16();
    let body = response.text().await?;

    error!(status, body, "Unexpected response.");

    Err(Error::Api {
        code: status,
        message: body,
    })
}

fn parse_chunk(chunk: &str) -> Result<response::ChatCompletionChunk> {
    use serde_json::{from_str, to_string_pretty};

    let json_error = match from_str(chunk) {
        Ok(response) => return Ok(response),
        Err(error) => error,
    };

    let Ok(ChatCompletionError { error }) = from_str::<ChatCompletionError>(chunk) else {
        return Err(Error::Json(json_error));
    };

    let ErrorResponse {
        code,
        message,
        metadata,
    } = error;

    let details = metadata
        .map(|metadata| {
            let json = to_string_pretty(&metadata.raw).unwrap_or_default();
            format!(": ({}) {json}", metadata.provider_name)
        })
        .unwrap_or_default();

    Err(Error::Api {
        code,
        message: format!("{message}{details}"),
    })
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
