//! Shared, long-lived connection to the procedure server.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{Channel, Endpoint};

use crate::config::BackendConfig;
use crate::error::CalcError;
use crate::http::request::X_REQUEST_ID;
use crate::rpc::proto::calculator_client::CalculatorClient;
use crate::rpc::proto::AddRequest;

/// Handle to the single channel shared by every request handler.
///
/// Cloning shares the same underlying channel.
#[derive(Clone)]
pub struct BackendConnection {
    inner: Arc<Inner>,
}

struct Inner {
    target: String,
    call_timeout: Duration,
    client: ArcSwapOption<CalculatorClient<Channel>>,
}

/// Pause between connection attempts while waiting for readiness.
const READY_RETRY_INTERVAL: Duration = Duration::from_millis(100);

impl BackendConnection {
    /// Open the channel and wait until it is connected.
    ///
    /// Refused or failed attempts are retried until `ready_timeout_secs`
    /// elapses; only then does this fail with [`CalcError::Unavailable`].
    pub async fn connect(config: &BackendConfig) -> Result<Self, CalcError> {
        let target = config.uri();
        let endpoint = Endpoint::from_shared(target.clone())
            .map_err(|e| CalcError::InvalidArgument(format!("backend target {}: {}", target, e)))?
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .tcp_nodelay(true);

        let ready_timeout = Duration::from_secs(config.ready_timeout_secs);
        tracing::info!(target = %target, ready_timeout = ?ready_timeout, "Connecting to procedure server");

        let mut attempts = 0u32;
        let mut last_error = None;
        let ready = tokio::time::timeout(ready_timeout, async {
            loop {
                attempts += 1;
                match endpoint.connect().await {
                    Ok(channel) => break channel,
                    Err(e) => {
                        tracing::debug!(target = %target, attempt = attempts, error = %e, "Procedure server not ready");
                        last_error = Some(e.to_string());
                        tokio::time::sleep(READY_RETRY_INTERVAL).await;
                    }
                }
            }
        })
        .await;

        let channel = match ready {
            Ok(channel) => channel,
            Err(_) => {
                return Err(CalcError::Unavailable(format!(
                    "{} not ready within {:?} after {} attempts: {}",
                    target,
                    ready_timeout,
                    attempts,
                    last_error.as_deref().unwrap_or("connect did not complete")
                )));
            }
        };

        tracing::info!(target = %target, attempts, "Procedure server connection ready");
        Ok(Self::from_channel(
            target,
            channel,
            Duration::from_secs(config.call_timeout_secs),
        ))
    }

    /// Wrap an already established channel.
    pub fn from_channel(target: impl Into<String>, channel: Channel, call_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                target: target.into(),
                call_timeout,
                client: ArcSwapOption::from_pointee(CalculatorClient::new(channel)),
            }),
        }
    }

    /// URI of the procedure server.
    pub fn target(&self) -> &str {
        &self.inner.target
    }

    /// Call `Add` on the shared channel.
    ///
    /// `request_id` is forwarded as `x-request-id` metadata when it is valid ASCII.
    /// A call still pending after the configured call timeout fails with
    /// [`CalcError::DeadlineExceeded`].
    pub async fn add(&self, a: i64, b: i64, request_id: Option<&str>) -> Result<i64, CalcError> {
        let mut client = match self.inner.client.load_full() {
            Some(client) => CalculatorClient::clone(&client),
            None => return Err(CalcError::Unavailable("connection closed".to_string())),
        };

        let mut request = tonic::Request::new(AddRequest { a, b });
        if let Some(value) = request_id.and_then(|id| id.parse::<MetadataValue<Ascii>>().ok()) {
            request.metadata_mut().insert(X_REQUEST_ID, value);
        }

        let call_timeout = self.inner.call_timeout;
        match tokio::time::timeout(call_timeout, client.add(request)).await {
            Ok(reply) => Ok(reply.map_err(CalcError::from)?.into_inner().sum),
            Err(_) => Err(CalcError::DeadlineExceeded(format!(
                "no reply from {} within {:?}",
                self.inner.target, call_timeout
            ))),
        }
    }

    /// Release the channel.
    ///
    /// Returns `true` the first time and `false` afterwards. Calls already in
    /// flight keep their clone of the channel and complete; new calls fail
    /// with [`CalcError::Unavailable`].
    pub fn close(&self) -> bool {
        match self.inner.client.swap(None) {
            Some(_) => {
                tracing::info!(target = %self.inner.target, "Procedure server connection closed");
                true
            }
            None => false,
        }
    }

    /// Whether [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.inner.client.load().is_none()
    }
}

impl std::fmt::Debug for BackendConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConnection")
            .field("target", &self.inner.target)
            .field("closed", &self.is_closed())
            .finish()
    }
}
