//! Route tables for the console web services.
//!
//! Both backends speak plain HTTP GET with query parameters; they differ in
//! port, paths, and parameter names. Everything wire-specific lives here so
//! the transport itself stays backend-agnostic.

use gsc_inject_core::BackendKind;

/// Largest payload sent in a single memory write request
pub const WRITE_CHUNK: usize = 0x200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    kind: BackendKind,
}

impl Dialect {
    pub fn for_kind(kind: BackendKind) -> Self {
        Self { kind }
    }

    pub fn default_port(&self) -> u16 {
        match self.kind {
            BackendKind::TargetManager => 80,
            BackendKind::ControlConsole => 6333,
        }
    }

    /// `http://host:port`, keeping an explicit port if the host carries one.
    pub fn base_url(&self, host: &str) -> String {
        let host = host
            .trim()
            .trim_start_matches("http://")
            .trim_end_matches('/');
        if host.contains(':') {
            format!("http://{}", host)
        } else {
            format!("http://{}:{}", host, self.default_port())
        }
    }

    pub fn probe_path(&self) -> &'static str {
        match self.kind {
            BackendKind::TargetManager => "/home.ps3mapi",
            BackendKind::ControlConsole => "/ccapi/getfirmwareinfo",
        }
    }

    pub fn process_list_path(&self) -> &'static str {
        match self.kind {
            BackendKind::TargetManager => "/processes.ps3mapi",
            BackendKind::ControlConsole => "/ccapi/getprocesslist",
        }
    }

    pub fn console_name_path(&self) -> &'static str {
        match self.kind {
            BackendKind::TargetManager => "/consolename.ps3mapi",
            BackendKind::ControlConsole => "/ccapi/getconsoleinfo",
        }
    }

    pub fn write_path(&self, pid: u32, address: u32, bytes: &[u8]) -> String {
        let value = hex::encode_upper(bytes);
        match self.kind {
            BackendKind::TargetManager => {
                format!("/setmem.ps3mapi?proc={:#x}&addr={:X}&val={}", pid, address, value)
            }
            BackendKind::ControlConsole => {
                format!("/ccapi/setmemory?pid={:#x}&addr={:#x}&value={}", pid, address, value)
            }
        }
    }
}

/// Process ids listed in a response body, in order.
///
/// Tokens are separated by whitespace, commas, or semicolons and may be
/// decimal or `0x`-prefixed hex. Zero and non-numeric tokens are skipped.
pub fn parse_process_ids(body: &str) -> Vec<u32> {
    body.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter_map(|token| {
            let token = token.trim();
            match token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
            {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => token.parse().ok(),
            }
        })
        .filter(|pid| *pid != 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url() {
        let cc = Dialect::for_kind(BackendKind::ControlConsole);
        assert_eq!(cc.base_url("192.168.1.20"), "http://192.168.1.20:6333");
        assert_eq!(cc.base_url("http://192.168.1.20:7000/"), "http://192.168.1.20:7000");

        let tm = Dialect::for_kind(BackendKind::TargetManager);
        assert_eq!(tm.base_url(" ps3.local "), "http://ps3.local:80");
    }

    #[test]
    fn test_write_paths() {
        let cc = Dialect::for_kind(BackendKind::ControlConsole);
        assert_eq!(
            cc.write_path(0x0101_0200, 0x01CB_0F20, &[0x10, 0x04, 0x00, 0x00]),
            "/ccapi/setmemory?pid=0x1010200&addr=0x1cb0f20&value=10040000"
        );

        let tm = Dialect::for_kind(BackendKind::TargetManager);
        assert_eq!(
            tm.write_path(0x0101_0200, 0x1004_0000, &[0xAB, 0xCD]),
            "/setmem.ps3mapi?proc=0x1010200&addr=10040000&val=ABCD"
        );
    }

    #[test]
    fn test_parse_process_ids() {
        assert_eq!(parse_process_ids("0x01010200\n0x01010300\n"), vec![0x0101_0200, 0x0101_0300]);
        assert_eq!(parse_process_ids("16843264, 0; junk"), vec![16_843_264]);
        assert!(parse_process_ids("").is_empty());
        assert!(parse_process_ids("none").is_empty());
    }
}
