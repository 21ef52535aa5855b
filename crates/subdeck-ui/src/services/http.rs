//! Browser transport built on `gloo-net`.

use crate::core::error::ApiError;
use crate::services::api::{ApiRequest, Method, RawResponse, Transport};
use async_trait::async_trait;
use gloo_net::http::{Method as HttpMethod, Request};
use gloo_timers::callback::Timeout;
use std::cell::Cell;
use std::rc::Rc;
use web_sys::AbortController;

/// `fetch`-backed transport with a fixed per-request timeout.
#[derive(Clone, Debug)]
pub(crate) struct FetchTransport {
    base_url: String,
    timeout_ms: u32,
}

impl FetchTransport {
    pub(crate) fn new(base_url: impl Into<String>, timeout_ms: u32) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms,
        }
    }
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let controller =
            AbortController::new().map_err(|err| ApiError::Transport(format!("{err:?}")))?;
        let signal = controller.signal();
        let method = match request.method {
            Method::Get => HttpMethod::GET,
            Method::Post => HttpMethod::POST,
            Method::Put => HttpMethod::PUT,
            Method::Delete => HttpMethod::DELETE,
        };
        let url = format!("{}{}", self.base_url, request.path_and_query());
        let mut builder = Request::new(&url)
            .method(method)
            .abort_signal(Some(&signal));
        if let Some(body) = &request.body {
            builder = builder
                .json(body)
                .map_err(|err| ApiError::Decode(err.to_string()))?;
        }

        let timed_out = Rc::new(Cell::new(false));
        let guard = {
            let timed_out = timed_out.clone();
            Timeout::new(self.timeout_ms, move || {
                timed_out.set(true);
                controller.abort();
            })
        };
        let outcome = builder.send().await;
        drop(guard);

        let response = match outcome {
            Ok(response) => response,
            Err(_) if timed_out.get() => return Err(ApiError::Timeout(self.timeout_ms)),
            Err(err) => return Err(ApiError::Transport(err.to_string())),
        };
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(RawResponse { status, body })
    }
}
