// Licensed under the Apache-2.0 license

/*++

Abstract:

    Client for the OpenOCD TCL server.

    The protocol is line based. Each command is sent as one line terminated
    by '\n'; the server answers with free-form text terminated by a single
    0x1A byte. Memory reads answer in the form

        0x00001000: deadbeef

    and writes answer with an empty body.

--*/

use super::{check_width, width_mask, Master};
use crate::error::{TransportError, TransportResult};
use log::{debug, trace, warn};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

const TERMINATOR: u8 = 0x1a;

pub struct OpenOcdMaster {
    target: String,
    timeout: Duration,
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    closed: bool,
    /// Set when a response was abandoned. Its terminator is still in
    /// flight and must be consumed before the next command is sent.
    stale_response: bool,
}

impl OpenOcdMaster {
    pub const DEFAULT_HOST: &'static str = "localhost";
    pub const DEFAULT_PORT: u16 = 6666;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// How long to wait for a greeting after connecting. The TCL port
    /// usually sends none.
    const BANNER_TIMEOUT: Duration = Duration::from_millis(200);

    pub fn connect(host: &str, port: u16) -> TransportResult<Self> {
        Self::connect_with_timeout(host, port, Self::DEFAULT_TIMEOUT)
    }

    pub fn connect_with_timeout(host: &str, port: u16, timeout: Duration) -> TransportResult<Self> {
        let target = format!("{host}:{port}");
        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|e| TransportError::io(&target, e))?
            .next()
            .ok_or_else(|| {
                TransportError::io(
                    &target,
                    std::io::Error::new(ErrorKind::NotFound, "address did not resolve"),
                )
            })?;
        let stream = TcpStream::connect_timeout(&addr, timeout).map_err(|e| {
            if is_timeout(&e) {
                TransportError::Timeout {
                    target: target.clone(),
                    timeout,
                }
            } else {
                TransportError::io(&target, e)
            }
        })?;
        stream
            .set_nodelay(true)
            .map_err(|e| TransportError::io(&target, e))?;
        let writer = stream
            .try_clone()
            .map_err(|e| TransportError::io(&target, e))?;
        let mut master = Self {
            target,
            timeout,
            reader: BufReader::new(stream),
            writer,
            closed: false,
            stale_response: false,
        };
        master.discard_banner()?;
        debug!("Connected to OpenOCD at {}", master.target);
        Ok(master)
    }

    fn set_read_timeout(&self, timeout: Duration) -> TransportResult<()> {
        self.reader
            .get_ref()
            .set_read_timeout(Some(timeout))
            .map_err(|e| TransportError::io(&self.target, e))
    }

    fn discard_banner(&mut self) -> TransportResult<()> {
        self.set_read_timeout(Self::BANNER_TIMEOUT.min(self.timeout))?;
        let mut banner = vec![];
        match self.reader.read_until(TERMINATOR, &mut banner) {
            Ok(_) => trace!("OpenOCD banner: {:?}", String::from_utf8_lossy(&banner)),
            Err(e) if is_timeout(&e) => {}
            Err(e) => return Err(TransportError::io(&self.target, e)),
        }
        self.set_read_timeout(self.timeout)
    }

    /// Sends one command and returns the response body without its
    /// terminator.
    ///
    /// A response that timed out is discarded before the next command is
    /// sent, so a late answer is never taken for the answer to a newer
    /// command. If it still has not arrived the connection stays unusable
    /// and every command fails with [`TransportError::Protocol`].
    pub fn command(&mut self, command: &str) -> TransportResult<String> {
        self.resync()?;
        trace!("OpenOCD <- {command}");
        self.writer
            .write_all(format!("{command}\n").as_bytes())
            .and_then(|_| self.writer.flush())
            .map_err(|e| TransportError::io(&self.target, e))?;

        let mut response = vec![];
        match self.reader.read_until(TERMINATOR, &mut response) {
            Ok(_) if response.last() == Some(&TERMINATOR) => {
                response.pop();
            }
            Ok(_) => {
                return Err(TransportError::io(
                    &self.target,
                    std::io::Error::new(
                        ErrorKind::UnexpectedEof,
                        "connection closed before end of response",
                    ),
                ))
            }
            Err(e) if is_timeout(&e) => {
                self.stale_response = true;
                return Err(TransportError::Timeout {
                    target: format!("response to `{command}` from {}", self.target),
                    timeout: self.timeout,
                });
            }
            Err(e) => return Err(TransportError::io(&self.target, e)),
        }
        let response = String::from_utf8_lossy(&response).into_owned();
        trace!("OpenOCD -> {response:?}");
        Ok(response)
    }

    fn resync(&mut self) -> TransportResult<()> {
        if !self.stale_response {
            return Ok(());
        }
        let mut late = vec![];
        match self.reader.read_until(TERMINATOR, &mut late) {
            Ok(_) if late.last() == Some(&TERMINATOR) => {
                debug!(
                    "Discarded late OpenOCD response {:?}",
                    String::from_utf8_lossy(&late[..late.len() - 1])
                );
                self.stale_response = false;
                Ok(())
            }
            Ok(_) => Err(TransportError::io(
                &self.target,
                std::io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "connection closed while discarding a late response",
                ),
            )),
            Err(e) if is_timeout(&e) => Err(TransportError::protocol(
                String::from_utf8_lossy(&late).into_owned(),
                format!("{} is still answering an earlier command", self.target),
            )),
            Err(e) => Err(TransportError::io(&self.target, e)),
        }
    }

    pub fn halt(&mut self) -> TransportResult<()> {
        self.command("halt").map(drop)
    }

    pub fn resume(&mut self) -> TransportResult<()> {
        self.command("resume").map(drop)
    }

    pub fn reset(&mut self, halt: bool) -> TransportResult<()> {
        self.command(if halt { "reset halt" } else { "reset" })
            .map(drop)
    }

    /// Ends the session. Dropping the master does the same.
    pub fn close(mut self) -> TransportResult<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> TransportResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // The server may hang up without answering `exit`.
        self.writer
            .write_all(b"exit\n")
            .map_err(|e| TransportError::io(&self.target, e))?;
        let _ = self.writer.shutdown(std::net::Shutdown::Both);
        Ok(())
    }
}

impl Drop for OpenOcdMaster {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("Closing OpenOCD connection: {e}");
        }
    }
}

fn is_timeout(e: &std::io::Error) -> bool {
    matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

fn read_command(width_bytes: usize) -> &'static str {
    match width_bytes {
        1 => "mdb",
        2 => "mdh",
        4 => "mdw",
        _ => "mdd",
    }
}

fn write_command(width_bytes: usize) -> &'static str {
    match width_bytes {
        1 => "mwb",
        2 => "mwh",
        4 => "mww",
        _ => "mwd",
    }
}

/// Parses `0xADDR: VALUE ...`, taking the first token after the colon.
fn parse_read_response(response: &str) -> TransportResult<u64> {
    let (_, rest) = response
        .split_once(':')
        .ok_or_else(|| TransportError::protocol(response, "missing ':'"))?;
    let token = rest
        .split_whitespace()
        .next()
        .ok_or_else(|| TransportError::protocol(response, "no value after ':'"))?;
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u64::from_str_radix(digits, 16)
        .map_err(|e| TransportError::protocol(response, format!("bad value {token:?}: {e}")))
}

impl Master for OpenOcdMaster {
    fn read(&mut self, address: u64, width_bytes: usize) -> TransportResult<u64> {
        check_width(width_bytes)?;
        let response = self.command(&format!("{} {address:#x}", read_command(width_bytes)))?;
        parse_read_response(&response)
    }

    fn write(&mut self, address: u64, value: u64, width_bytes: usize) -> TransportResult<()> {
        check_width(width_bytes)?;
        let value = value & width_mask(width_bytes);
        self.command(&format!(
            "{} {address:#x} {value:#x}",
            write_command(width_bytes)
        ))
        .map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_read_response() {
        assert_eq!(parse_read_response("0x00001000: deadbeef ").unwrap(), 0xdead_beef);
        assert_eq!(parse_read_response("0x1000: 0x12 0x34\n").unwrap(), 0x12);
        assert!(matches!(
            parse_read_response("invalid command name \"mdx\""),
            Err(TransportError::Protocol { .. })
        ));
        assert!(matches!(
            parse_read_response("0x1000: zz"),
            Err(TransportError::Protocol { .. })
        ));
        assert!(parse_read_response("0x1000:").is_err());
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(read_command(1), "mdb");
        assert_eq!(read_command(2), "mdh");
        assert_eq!(read_command(4), "mdw");
        assert_eq!(read_command(8), "mdd");
        assert_eq!(write_command(1), "mwb");
        assert_eq!(write_command(2), "mwh");
        assert_eq!(write_command(4), "mww");
        assert_eq!(write_command(8), "mwd");
    }
}
