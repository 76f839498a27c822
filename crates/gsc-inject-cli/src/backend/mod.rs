//! Console backends.

mod dialect;
mod http;

use gsc_inject_core::{BackendKind, RemoteTarget, TargetProvider, TransportError};

pub use http::HttpTarget;

/// Opens [`HttpTarget`]s for a console address.
pub struct HttpProvider {
    host: Option<String>,
}

impl HttpProvider {
    pub fn new(host: Option<String>) -> Self {
        Self { host }
    }
}

impl TargetProvider for HttpProvider {
    fn open(&self, kind: BackendKind) -> Result<Box<dyn RemoteTarget>, TransportError> {
        let host = self
            .host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| {
                TransportError::Unavailable(
                    "No target address specified. Use --target or GSC_INJECT_TARGET.".to_string(),
                )
            })?;

        Ok(Box::new(HttpTarget::new(kind, host)))
    }
}
