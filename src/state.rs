//! Shared runtime handle held by every accessor and facade.

use crate::error::StoreError;
use crate::settings::Settings;
use crate::store::{QueryExecutor, SqliteExecutor};
use crate::transport::{Headers, RemoteTransport};
use crate::trigger::TriggerRegistry;
use std::sync::Arc;
use std::time::Duration;

/// Cheap to clone. Accessors keep a copy; the facade registry owns the accessors, so there
/// is no cycle back to the facade.
#[derive(Clone)]
pub struct Provider {
    executor: Arc<dyn QueryExecutor>,
    transport: Option<Arc<dyn RemoteTransport>>,
    emit_delay: Duration,
    default_headers: Option<Headers>,
}

impl Provider {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Provider {
            executor,
            transport: None,
            emit_delay: Duration::ZERO,
            default_headers: None,
        }
    }

    /// Open the SQLite store described by `settings`.
    pub async fn connect(settings: &Settings) -> Result<Self, StoreError> {
        let executor = SqliteExecutor::connect(settings).await?;
        Ok(Self::new(Arc::new(executor)).with_emit_delay(settings.emit_delay))
    }

    pub fn with_transport(mut self, transport: Arc<dyn RemoteTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_emit_delay(mut self, delay: Duration) -> Self {
        self.emit_delay = delay;
        self
    }

    /// Headers sent with every request made through this provider, unless the request
    /// accessor carries its own.
    pub fn with_default_headers(mut self, headers: Headers) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn executor(&self) -> &dyn QueryExecutor {
        self.executor.as_ref()
    }

    pub fn transport(&self) -> Option<&dyn RemoteTransport> {
        self.transport.as_deref()
    }

    pub fn triggers(&self) -> &TriggerRegistry {
        self.executor.triggers()
    }

    /// Default coalescing delay for streams opened through this provider.
    pub fn emit_delay(&self) -> Duration {
        self.emit_delay
    }

    pub fn default_headers(&self) -> Option<&Headers> {
        self.default_headers.as_ref()
    }
}
