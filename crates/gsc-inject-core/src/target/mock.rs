//! Scripted console transport for tests.

use std::cell::RefCell;
use std::rc::Rc;

use super::{BackendKind, RemoteTarget, TargetProvider};
use crate::error::TransportError;

/// Call recorded by the mock transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open(BackendKind),
    Connect,
    Attach,
    Name,
    WriteU32 { address: u32, value: u32 },
    WriteBytes { address: u32, bytes: Vec<u8> },
    Disconnect,
}

#[derive(Debug, Clone)]
struct Script {
    fail_open: bool,
    fail_connect: bool,
    connect: bool,
    attach: bool,
    name: String,
    fail_write_u32: bool,
    fail_write_bytes: bool,
}

/// Provider handing out mock targets that share one event log.
pub struct MockProvider {
    script: Script,
    events: Rc<RefCell<Vec<Event>>>,
}

impl MockProvider {
    pub fn builder() -> MockProviderBuilder {
        MockProviderBuilder::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Only the write events, in order
    pub fn writes(&self) -> Vec<Event> {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::WriteU32 { .. } | Event::WriteBytes { .. }))
            .cloned()
            .collect()
    }
}

impl TargetProvider for MockProvider {
    fn open(&self, kind: BackendKind) -> Result<Box<dyn RemoteTarget>, TransportError> {
        if self.script.fail_open {
            return Err(TransportError::Unavailable("mock open failure".to_string()));
        }
        self.events.borrow_mut().push(Event::Open(kind));
        Ok(Box::new(MockTarget {
            script: self.script.clone(),
            events: Rc::clone(&self.events),
        }))
    }
}

struct MockTarget {
    script: Script,
    events: Rc<RefCell<Vec<Event>>>,
}

impl MockTarget {
    fn record(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl RemoteTarget for MockTarget {
    fn connect(&mut self) -> Result<bool, TransportError> {
        self.record(Event::Connect);
        if self.script.fail_connect {
            return Err(TransportError::Request {
                endpoint: "mock".to_string(),
                message: "connection reset".to_string(),
            });
        }
        Ok(self.script.connect)
    }

    fn attach(&mut self) -> Result<bool, TransportError> {
        self.record(Event::Attach);
        Ok(self.script.attach)
    }

    fn name(&mut self) -> Result<String, TransportError> {
        self.record(Event::Name);
        Ok(self.script.name.clone())
    }

    fn write_u32(&mut self, address: u32, value: u32) -> Result<(), TransportError> {
        self.record(Event::WriteU32 { address, value });
        if self.script.fail_write_u32 {
            return Err(TransportError::UnexpectedResponse("write rejected".to_string()));
        }
        Ok(())
    }

    fn write_bytes(&mut self, address: u32, bytes: &[u8]) -> Result<(), TransportError> {
        self.record(Event::WriteBytes {
            address,
            bytes: bytes.to_vec(),
        });
        if self.script.fail_write_bytes {
            return Err(TransportError::UnexpectedResponse("write rejected".to_string()));
        }
        Ok(())
    }

    fn disconnect(&mut self) {
        self.record(Event::Disconnect);
    }
}

/// Builder for [`MockProvider`]. Defaults to a console that accepts everything.
pub struct MockProviderBuilder {
    script: Script,
}

impl Default for MockProviderBuilder {
    fn default() -> Self {
        Self {
            script: Script {
                fail_open: false,
                fail_connect: false,
                connect: true,
                attach: true,
                name: "PS3".to_string(),
                fail_write_u32: false,
                fail_write_bytes: false,
            },
        }
    }
}

impl MockProviderBuilder {
    pub fn connect(mut self, accepted: bool) -> Self {
        self.script.connect = accepted;
        self
    }

    pub fn attach(mut self, accepted: bool) -> Self {
        self.script.attach = accepted;
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.script.name = name.to_string();
        self
    }

    pub fn fail_open(mut self) -> Self {
        self.script.fail_open = true;
        self
    }

    pub fn fail_connect(mut self) -> Self {
        self.script.fail_connect = true;
        self
    }

    pub fn fail_write_u32(mut self) -> Self {
        self.script.fail_write_u32 = true;
        self
    }

    pub fn fail_write_bytes(mut self) -> Self {
        self.script.fail_write_bytes = true;
        self
    }

    pub fn build(self) -> MockProvider {
        MockProvider {
            script: self.script,
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }
}
