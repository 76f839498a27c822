//! Remote target sessions.
//!
//! A [`Session`] is the single connected-and-attached handle to the console's
//! game process. It is only ever handed out fully attached, and it releases
//! the transport when dropped, whichever way the run ends.

#[cfg(test)]
pub mod mock;

use strum::Display;
use tracing::{debug, info};

use crate::error::{SessionError, TransportError};

/// Console API used to reach the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum BackendKind {
    #[default]
    #[strum(serialize = "TMAPI")]
    TargetManager,
    #[strum(serialize = "CCAPI")]
    ControlConsole,
}

/// Accepted selector tokens, matched after trimming and lowercasing
const BACKEND_ALIASES: &[(&str, BackendKind)] = &[
    ("tm", BackendKind::TargetManager),
    ("tmapi", BackendKind::TargetManager),
    ("targetmanager", BackendKind::TargetManager),
    ("target-manager", BackendKind::TargetManager),
    ("cc", BackendKind::ControlConsole),
    ("ccapi", BackendKind::ControlConsole),
    ("controlconsole", BackendKind::ControlConsole),
    ("control-console", BackendKind::ControlConsole),
];

impl BackendKind {
    /// Map a selector token to a backend. Unknown tokens select the target manager.
    pub fn select(name: &str) -> Self {
        let token = name.trim().to_ascii_lowercase();
        BACKEND_ALIASES
            .iter()
            .find(|(alias, _)| *alias == token)
            .map(|(_, kind)| *kind)
            .unwrap_or_else(|| {
                debug!("Unrecognized API '{}', using {}", name, Self::default());
                Self::default()
            })
    }
}

/// Transport primitives offered by a console API.
///
/// `connect` and `attach` return `Ok(false)` when the console refused;
/// `Err` is reserved for transport faults.
pub trait RemoteTarget {
    fn connect(&mut self) -> Result<bool, TransportError>;

    fn attach(&mut self) -> Result<bool, TransportError>;

    /// Human-readable name of the connected console.
    fn name(&mut self) -> Result<String, TransportError>;

    fn write_u32(&mut self, address: u32, value: u32) -> Result<(), TransportError>;

    fn write_bytes(&mut self, address: u32, bytes: &[u8]) -> Result<(), TransportError>;

    /// Release the connection. Must not fail.
    fn disconnect(&mut self) {}
}

/// Builds the transport for a backend kind.
pub trait TargetProvider {
    fn open(&self, kind: BackendKind) -> Result<Box<dyn RemoteTarget>, TransportError>;
}

/// Live, attached connection to the target process.
pub struct Session {
    backend: BackendKind,
    target_name: String,
    target: Box<dyn RemoteTarget>,
}

impl Session {
    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub(crate) fn target_mut(&mut self) -> &mut dyn RemoteTarget {
        self.target.as_mut()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!("Releasing {} session", self.backend);
        self.target.disconnect();
    }
}

/// Connect to the target and attach to its game process.
pub fn connect(provider: &dyn TargetProvider, kind: BackendKind) -> Result<Session, SessionError> {
    let transport = |source| SessionError::Transport {
        backend: kind,
        source,
    };

    let mut target = provider.open(kind).map_err(transport)?;
    if !target.connect().map_err(transport)? {
        return Err(SessionError::ConnectFailed { backend: kind });
    }

    // From here on the session owns the connection and releases it on every exit.
    let mut session = Session {
        backend: kind,
        target_name: String::new(),
        target,
    };

    if !session.target.attach().map_err(transport)? {
        return Err(SessionError::AttachFailed { backend: kind });
    }

    session.target_name = session.target.name().map_err(transport)?;
    info!(
        "Connected and attached to {} via {}",
        session.target_name, kind
    );
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::mock::{Event, MockProvider};
    use super::*;

    #[test]
    fn test_select_target_manager_aliases() {
        for token in ["tm", "tmapi", "TMAPI", " TM ", "TargetManager", "target-manager"] {
            assert_eq!(BackendKind::select(token), BackendKind::TargetManager, "{token}");
        }
    }

    #[test]
    fn test_select_control_console_aliases() {
        for token in ["cc", "ccapi", "CCAPI", "CcApi", "control-console", "ControlConsole"] {
            assert_eq!(BackendKind::select(token), BackendKind::ControlConsole, "{token}");
        }
    }

    #[test]
    fn test_select_is_total() {
        for token in ["", "ps3mapi", "ccapi2", "c c", "🎮"] {
            assert_eq!(BackendKind::select(token), BackendKind::TargetManager, "{token}");
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(BackendKind::TargetManager.to_string(), "TMAPI");
        assert_eq!(BackendKind::ControlConsole.to_string(), "CCAPI");
    }

    #[test]
    fn test_connect_success() {
        let provider = MockProvider::builder().name("CECHA01").build();
        let session = connect(&provider, BackendKind::ControlConsole).unwrap();

        assert_eq!(session.target_name(), "CECHA01");
        assert_eq!(session.backend(), BackendKind::ControlConsole);
        assert_eq!(
            provider.events(),
            vec![
                Event::Open(BackendKind::ControlConsole),
                Event::Connect,
                Event::Attach,
                Event::Name,
            ]
        );

        drop(session);
        assert_eq!(provider.events().last(), Some(&Event::Disconnect));
    }

    #[test]
    fn test_connect_refused() {
        let provider = MockProvider::builder().connect(false).build();
        let result = connect(&provider, BackendKind::TargetManager);

        assert!(matches!(result, Err(SessionError::ConnectFailed { .. })));
        assert!(!provider.events().contains(&Event::Attach));
    }

    #[test]
    fn test_attach_failure_never_returns_session() {
        let provider = MockProvider::builder().attach(false).build();
        let result = connect(&provider, BackendKind::TargetManager);

        assert!(matches!(result, Err(SessionError::AttachFailed { .. })));
        assert_eq!(provider.events().last(), Some(&Event::Disconnect));
        assert!(!provider.events().contains(&Event::Name));
    }

    #[test]
    fn test_transport_fault_is_contained() {
        let provider = MockProvider::builder().fail_connect().build();
        let result = connect(&provider, BackendKind::TargetManager);
        assert!(matches!(result, Err(SessionError::Transport { .. })));

        let provider = MockProvider::builder().fail_open().build();
        let result = connect(&provider, BackendKind::ControlConsole);
        assert!(matches!(
            result,
            Err(SessionError::Transport {
                backend: BackendKind::ControlConsole,
                ..
            })
        ));
        assert!(provider.events().is_empty());
    }
}
