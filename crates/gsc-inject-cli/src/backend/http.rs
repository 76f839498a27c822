use std::time::Duration;

use gsc_inject_core::{BackendKind, RemoteTarget, TransportError};
use tracing::debug;

use super::dialect::{Dialect, WRITE_CHUNK, parse_process_ids};

/// Timeout applied to every request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Console reached through its HTTP service.
pub struct HttpTarget {
    agent: ureq::Agent,
    base_url: String,
    kind: BackendKind,
    dialect: Dialect,
    pid: Option<u32>,
}

impl HttpTarget {
    pub fn new(kind: BackendKind, host: &str) -> Self {
        let dialect = Dialect::for_kind(kind);
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();

        Self {
            agent: config.into(),
            base_url: dialect.base_url(host),
            kind,
            dialect,
            pid: None,
        }
    }

    /// GET `path`. `Ok(None)` means the service answered with an error status.
    fn get(&self, path: &str) -> Result<Option<String>, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let mut response = match self.agent.get(&url).call() {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(code)) => {
                debug!("{} answered with status {}", url, code);
                return Ok(None);
            }
            Err(e) => {
                return Err(TransportError::Request {
                    endpoint: url,
                    message: e.to_string(),
                });
            }
        };

        response
            .body_mut()
            .read_to_string()
            .map(Some)
            .map_err(|e| TransportError::Request {
                endpoint: url,
                message: e.to_string(),
            })
    }
}

impl RemoteTarget for HttpTarget {
    fn connect(&mut self) -> Result<bool, TransportError> {
        Ok(self.get(self.dialect.probe_path())?.is_some())
    }

    fn attach(&mut self) -> Result<bool, TransportError> {
        let Some(body) = self.get(self.dialect.process_list_path())? else {
            return Ok(false);
        };

        // the running game is the first user process listed
        self.pid = parse_process_ids(&body).into_iter().next();
        if let Some(pid) = self.pid {
            debug!("Attached to process {:#x}", pid);
        }
        Ok(self.pid.is_some())
    }

    fn name(&mut self) -> Result<String, TransportError> {
        let name = self
            .get(self.dialect.console_name_path())?
            .map(|body| body.trim().to_string())
            .unwrap_or_default();

        if name.is_empty() {
            Ok(format!("{} target", self.kind))
        } else {
            Ok(name)
        }
    }

    fn write_u32(&mut self, address: u32, value: u32) -> Result<(), TransportError> {
        self.write_bytes(address, &value.to_be_bytes())
    }

    fn write_bytes(&mut self, address: u32, bytes: &[u8]) -> Result<(), TransportError> {
        let pid = self.pid.ok_or(TransportError::NotAttached)?;

        for (index, chunk) in bytes.chunks(WRITE_CHUNK).enumerate() {
            let chunk_address = address.wrapping_add((index * WRITE_CHUNK) as u32);
            let path = self.dialect.write_path(pid, chunk_address, chunk);
            if self.get(&path)?.is_none() {
                return Err(TransportError::UnexpectedResponse(format!(
                    "write of {} bytes at {:#010x} was rejected",
                    chunk.len(),
                    chunk_address
                )));
            }
        }

        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(pid) = self.pid.take() {
            debug!("Detached from process {:#x}", pid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_requires_attach() {
        let mut target = HttpTarget::new(BackendKind::ControlConsole, "127.0.0.1");
        let result = target.write_u32(0x1000, 0x2000);
        assert!(matches!(result, Err(TransportError::NotAttached)));
    }

    #[test]
    fn test_base_url_from_dialect() {
        let target = HttpTarget::new(BackendKind::TargetManager, "10.0.0.5");
        assert_eq!(target.base_url, "http://10.0.0.5:80");
    }
}
