// Licensed under the Apache-2.0 license

//! Register access through a memory tool on a remote host, one `ssh`
//! invocation per transaction.

use super::{check_width, parse_number, width_mask, Master};
use crate::error::{TransportError, TransportResult};
use log::{debug, trace};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Remote memory access tool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SshTool {
    /// BusyBox-style `devmem ADDR [BITS] [VALUE]`.
    Devmem,
    /// Any tool taking `read ADDR BYTES` and `write ADDR VALUE BYTES`.
    Custom(String),
}

impl SshTool {
    fn read_command(&self, address: u64, width_bytes: usize) -> String {
        match self {
            SshTool::Devmem if width_bytes == 4 => format!("devmem {address:#x}"),
            SshTool::Devmem => format!("devmem {address:#x} {}", width_bytes * 8),
            SshTool::Custom(tool) => format!("{tool} read {address:#x} {width_bytes}"),
        }
    }

    fn write_command(&self, address: u64, value: u64, width_bytes: usize) -> String {
        match self {
            SshTool::Devmem if width_bytes == 4 => format!("devmem {address:#x} {value:#x}"),
            SshTool::Devmem => format!("devmem {address:#x} {} {value:#x}", width_bytes * 8),
            SshTool::Custom(tool) => {
                format!("{tool} write {address:#x} {value:#x} {width_bytes}")
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct SshMaster {
    program: PathBuf,
    destination: String,
    key_file: Option<PathBuf>,
    tool: SshTool,
    timeout: Duration,
}

impl SshMaster {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const CONNECTION_TEST_TIMEOUT: Duration = Duration::from_secs(10);

    const POLL_INTERVAL: Duration = Duration::from_millis(10);

    pub fn new(host: &str) -> Self {
        Self {
            program: PathBuf::from("ssh"),
            destination: host.to_string(),
            key_file: None,
            tool: SshTool::Devmem,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn user(mut self, user: &str) -> Self {
        let host = self
            .destination
            .rsplit_once('@')
            .map_or(self.destination.as_str(), |(_, h)| h);
        self.destination = format!("{user}@{host}");
        self
    }

    pub fn key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_file = Some(path.into());
        self
    }

    pub fn tool(mut self, tool: SshTool) -> Self {
        self.tool = tool;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Program run in place of `ssh`. It receives the same arguments.
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Runs `echo test` on the remote host.
    pub fn test_connection(&self) -> TransportResult<()> {
        self.run_with_timeout("echo test", Self::CONNECTION_TEST_TIMEOUT)
            .map(drop)
    }

    fn command(&self, remote: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        if let Some(key) = &self.key_file {
            cmd.arg("-i").arg(key);
        }
        cmd.arg(&self.destination)
            .arg(remote)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Runs `remote` and returns its trimmed stdout.
    pub fn run(&self, remote: &str) -> TransportResult<String> {
        self.run_with_timeout(remote, self.timeout)
    }

    fn run_with_timeout(&self, remote: &str, timeout: Duration) -> TransportResult<String> {
        trace!("ssh {} {remote:?}", self.destination);
        let mut child = self
            .command(remote)
            .spawn()
            .map_err(|e| TransportError::io(self.program.display().to_string(), e))?;

        // Drain pipes on threads so a chatty command cannot stall on a full
        // pipe while we poll for exit.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + timeout;
        let timed_out = || TransportError::Timeout {
            target: format!("`{remote}` on {}", self.destination),
            timeout,
        };
        let status = wait_until(&mut child, deadline)
            .map_err(|e| TransportError::io(&self.destination, e))?;
        let Some(status) = status else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(timed_out());
        };

        // A background process started by the remote command can keep the
        // pipes open after `ssh` exits.
        let stdout = collect(&stdout, deadline).ok_or_else(timed_out)?;
        let stderr = collect(&stderr, deadline).unwrap_or_default();
        if !status.success() {
            return Err(TransportError::RemoteExit {
                command: remote.to_string(),
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(stdout.trim().to_string())
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut out = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut out);
        }
        let _ = tx.send(out);
    });
    rx
}

/// Output of a drain thread, or `None` if the pipe is still open at
/// `deadline`.
fn collect(rx: &mpsc::Receiver<String>, deadline: Instant) -> Option<String> {
    rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
        .ok()
}

fn wait_until(
    child: &mut Child,
    deadline: Instant,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(SshMaster::POLL_INTERVAL);
    }
}

/// Takes the first `0x` line, falling back to the whole output as decimal.
fn parse_read_output(output: &str) -> TransportResult<u64> {
    let line = output
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with("0x") || l.starts_with("0X"))
        .unwrap_or(output.trim());
    parse_number(line).ok_or_else(|| TransportError::protocol(output, "not a hex or decimal value"))
}

impl Master for SshMaster {
    fn read(&mut self, address: u64, width_bytes: usize) -> TransportResult<u64> {
        check_width(width_bytes)?;
        let output = self.run(&self.tool.read_command(address, width_bytes))?;
        let value = parse_read_output(&output)?;
        debug!("ssh read {address:#x} -> {value:#x}");
        Ok(value & width_mask(width_bytes))
    }

    fn write(&mut self, address: u64, value: u64, width_bytes: usize) -> TransportResult<()> {
        check_width(width_bytes)?;
        let value = value & width_mask(width_bytes);
        self.run(&self.tool.write_command(address, value, width_bytes))?;
        debug!("ssh write {address:#x} <- {value:#x}");
        Ok(())
    }
}
