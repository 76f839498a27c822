//! Script deployment.
//!
//! Installing a script is two writes: the game's script pointer is aimed at
//! the reserved buffer, then the bytecode is written into that buffer. There
//! is no rollback. If the second write fails the pointer already references
//! the buffer's previous contents; the error says so and the user re-runs.

use tracing::{debug, warn};

use crate::config::GametypeProfile;
use crate::error::DeployError;
use crate::target::Session;

/// What was written where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub target_name: String,
    pub pointer_address: u32,
    pub buffer_address: u32,
    pub bytes_written: usize,
}

/// Install `buffer` into the attached process.
pub fn deploy(
    session: &mut Session,
    profile: &GametypeProfile,
    buffer: &[u8],
) -> Result<DeployReport, DeployError> {
    let pointer_address = profile.defaults.pointer_address;
    let buffer_address = profile.customs.buffer_address;
    let target = session.target_mut();

    debug!(
        "Pointing {:#010x} at buffer {:#010x}",
        pointer_address, buffer_address
    );
    target
        .write_u32(pointer_address, buffer_address)
        .map_err(|source| DeployError::PointerWrite {
            address: pointer_address,
            source,
        })?;

    debug!("Writing {} bytes at {:#010x}", buffer.len(), buffer_address);
    if let Err(source) = target.write_bytes(buffer_address, buffer) {
        warn!(
            "Script pointer at {:#010x} now references {:#010x}, which holds stale data",
            pointer_address, buffer_address
        );
        return Err(DeployError::BufferWrite {
            address: buffer_address,
            len: buffer.len(),
            source,
        });
    }

    Ok(DeployReport {
        target_name: session.target_name().to_string(),
        pointer_address,
        buffer_address,
        bytes_written: buffer.len(),
    })
}
