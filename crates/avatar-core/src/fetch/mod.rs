//! Outbound retrieval of an allowlisted image URL.
//!
//! Uses the curl crate (libcurl) on a blocking thread. The response head is
//! inspected before any byte reaches disk, and the body is handed over as a
//! bounded stream of chunks so it is never held in memory as a whole.
//!
//! curl's own redirect following is always off. A 3xx is either a failure
//! (`RedirectPolicy::Refuse`) or a new request whose target host has been
//! re-checked against the allowlist (`RedirectPolicy::Revalidate`).

mod head;
mod transfer;


use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use url::Url;

use crate::allowlist::HostAllowlist;
use head::ResponseHead;
use transfer::TransferSpec;

/// What to do when the server answers with a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectPolicy {
    Refuse,
    Revalidate { max_hops: u32 },
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Option<Duration>,
    pub timeout: Option<Duration>,
    pub redirects: RedirectPolicy,
    /// Channel depth between the transfer thread and the consumer.
    pub chunk_buffer: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            timeout: None,
            redirects: RedirectPolicy::Refuse,
            chunk_buffer: 16,
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),
    #[error("url returned a non-OK status code: HTTP {0}")]
    Status(u32),
    #[error("url returned an empty body: HTTP {0}")]
    EmptyBody(u32),
    #[error("redirect to {location} refused (HTTP {status})")]
    Redirect { status: u32, location: String },
    #[error("redirect to {location} points to a non-allowed domain")]
    RedirectDenied { location: String },
    #[error("unusable redirect location: {location}")]
    BadLocation { location: String },
    #[error("more than {0} redirects")]
    TooManyRedirects(u32),
    #[error("transfer failed: {0}")]
    Transfer(#[from] curl::Error),
    #[error("connection closed before a response head was received")]
    NoResponse,
    #[error("transfer task failed: {0}")]
    Join(String),
}

/// A byte stream consumed chunk by chunk.
#[async_trait]
pub trait BodySource: Send {
    /// `Ok(None)` at a clean end of stream.
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, FetchError>;
}

/// Successful response whose body has not been read yet.
pub struct FetchedBody {
    /// URL that produced the body (differs from the request after redirects).
    pub url: Url,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    chunks: mpsc::Receiver<Vec<u8>>,
    transfer: Option<JoinHandle<Result<(), curl::Error>>>,
}

impl std::fmt::Debug for FetchedBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchedBody")
            .field("url", &self.url.as_str())
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl BodySource for FetchedBody {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, FetchError> {
        if let Some(chunk) = self.chunks.recv().await {
            return Ok(Some(chunk));
        }
        // Sender gone: the transfer has returned, so its result tells us
        // whether the body ended cleanly.
        match self.transfer.take() {
            None => Ok(None),
            Some(handle) => match handle.await {
                Ok(Ok(())) => Ok(None),
                Ok(Err(e)) => Err(FetchError::Transfer(e)),
                Err(e) => Err(FetchError::Join(e.to_string())),
            },
        }
    }
}

/// Performs the single outbound GET for an already validated URL.
#[derive(Debug, Clone)]
pub struct Fetcher {
    options: FetchOptions,
    allowlist: HostAllowlist,
}

impl Fetcher {
    /// `allowlist` is only consulted for redirect hops; the initial URL must
    /// already have passed validation.
    pub fn new(options: FetchOptions, allowlist: HostAllowlist) -> Self {
        Self { options, allowlist }
    }

    /// GET `url`. No retries: any failure is returned as is.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedBody, FetchError> {
        let mut current = url.clone();
        let mut hops = 0u32;
        loop {
            if !matches!(current.scheme(), "http" | "https") {
                return Err(FetchError::UnsupportedScheme(current.scheme().to_string()));
            }

            let (head, chunks, transfer) = self.start(&current).await?;
            tracing::debug!(url = %current, status = head.status, "response head received");

            if let Some(location) = head.location.clone().filter(|_| head.is_redirect()) {
                let next = current
                    .join(&location)
                    .map_err(|_| FetchError::BadLocation {
                        location: location.clone(),
                    })?;
                match self.options.redirects {
                    RedirectPolicy::Refuse => {
                        return Err(FetchError::Redirect {
                            status: head.status,
                            location: next.to_string(),
                        });
                    }
                    RedirectPolicy::Revalidate { max_hops } => {
                        if hops >= max_hops {
                            return Err(FetchError::TooManyRedirects(max_hops));
                        }
                        if !self.allowlist.is_allowed(&next) {
                            return Err(FetchError::RedirectDenied {
                                location: next.to_string(),
                            });
                        }
                        hops += 1;
                        tracing::debug!(from = %current, to = %next, "following re-validated redirect");
                        current = next;
                        continue;
                    }
                }
            }

            if !head.is_success() {
                return Err(FetchError::Status(head.status));
            }
            if head.has_no_body() {
                return Err(FetchError::EmptyBody(head.status));
            }

            return Ok(FetchedBody {
                url: current,
                content_type: head.content_type,
                content_length: head.content_length,
                chunks,
                transfer: Some(transfer),
            });
        }
    }

    /// Starts the transfer and waits for the response head.
    async fn start(
        &self,
        url: &Url,
    ) -> Result<
        (
            ResponseHead,
            mpsc::Receiver<Vec<u8>>,
            JoinHandle<Result<(), curl::Error>>,
        ),
        FetchError,
    > {
        let (head_tx, head_rx) = oneshot::channel();
        let (body_tx, body_rx) = mpsc::channel(self.options.chunk_buffer.max(1));
        let spec = TransferSpec {
            url: url.to_string(),
            connect_timeout: self.options.connect_timeout,
            timeout: self.options.timeout,
        };
        let handle = tokio::task::spawn_blocking(move || transfer::run(spec, head_tx, body_tx));

        match head_rx.await {
            Ok(head) => Ok((head, body_rx, handle)),
            Err(_) => match handle.await {
                Ok(Err(e)) => Err(FetchError::Transfer(e)),
                Ok(Ok(())) => Err(FetchError::NoResponse),
                Err(e) => Err(FetchError::Join(e.to_string())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> Fetcher {
        Fetcher::new(FetchOptions::default(), HostAllowlist::new(["127.0.0.1"]))
    }

    #[tokio::test]
    async fn non_http_scheme_rejected_before_any_transfer() {
        let url = Url::parse("file:///etc/passwd").unwrap();
        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme(s) if s == "file"));
    }

    #[tokio::test]
    async fn connection_refused_is_transfer_error() {
        let port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let url = Url::parse(&format!("http://127.0.0.1:{port}/cat.png")).unwrap();
        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Transfer(_)), "got {err:?}");
    }

    #[test]
    fn default_options_refuse_redirects() {
        let opts = FetchOptions::default();
        assert_eq!(opts.redirects, RedirectPolicy::Refuse);
        assert!(opts.timeout.is_none());
    }
}
