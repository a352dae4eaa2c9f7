//! Interactive session channel with prompt-based framing.
//!
//! A command exchange is framed by the device's echo of the command and
//! the prompt that follows it: everything from the echo up to (and
//! including) that prompt belongs to the command. Bytes that arrive ahead
//! of the echo, like a late re-prompt, are dropped. Reads are bounded by a
//! timeout, so output that never reaches a prompt surfaces as
//! [`ChannelError::PatternTimeout`] instead of silently coming back
//! truncated.

use std::time::Duration;

use log::{debug, trace, warn};
use regex::bytes::Regex;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::Instant;

use super::buffer::PatternBuffer;
use crate::error::{ChannelError, Result};

/// Bytes requested per read from the underlying stream.
const READ_CHUNK: usize = 8192;

/// Configuration for session channel behavior.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// How long to wait for the prompt after sending a command.
    pub timeout: Duration,

    /// Search depth for pattern matching.
    pub search_depth: usize,

    /// Quiet period that ends a drain of unsolicited output.
    pub drain_window: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            search_depth: 1000,
            drain_window: Duration::from_millis(20),
        }
    }
}

/// One interactive command/response stream to a device shell.
///
/// The stream is any duplex byte pipe: an SSH shell channel in production,
/// an in-memory pipe in tests. All command methods take `&mut self`, so a
/// channel can never have two commands in flight.
#[derive(Debug)]
pub struct SessionChannel<S> {
    stream: S,
    config: ChannelConfig,
    buffer: PatternBuffer,
    prompt: Regex,
    pager: Option<Regex>,
}

impl<S> SessionChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Create a channel over `stream` that ends responses at `prompt`.
    pub fn new(stream: S, prompt: Regex, config: ChannelConfig) -> Self {
        Self {
            buffer: PatternBuffer::new(config.search_depth),
            stream,
            config,
            prompt,
            pager: None,
        }
    }

    /// Answer `pager` markers (e.g. `--More--`) with a space while reading.
    pub fn with_pager(mut self, pager: Regex) -> Self {
        self.pager = Some(pager);
        self
    }

    /// Set the prompt timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.config.timeout = timeout;
    }

    /// The prompt pattern ending every response.
    pub fn prompt_pattern(&self) -> &Regex {
        &self.prompt
    }

    /// Read until the prompt matches the end of the received data.
    ///
    /// Returns everything received, prompt included, and leaves the
    /// internal buffer empty.
    pub async fn read_until_prompt(&mut self) -> Result<Vec<u8>> {
        let deadline = Instant::now() + self.config.timeout;
        self.read_prompt_after(0, deadline).await
    }

    /// Read until a prompt that starts at or after `offset` ends the data.
    async fn read_prompt_after(&mut self, offset: usize, deadline: Instant) -> Result<Vec<u8>> {
        loop {
            let prompt_at = self.buffer.find_tail(&self.prompt).map(|m| m.start);
            if prompt_at.is_some_and(|start| start >= offset) {
                trace!("prompt matched after {} bytes", self.buffer.len());
                return Ok(self.buffer.take());
            }

            let paged = match &self.pager {
                Some(pager) => self.buffer.erase_tail_match(pager),
                None => false,
            };
            if paged {
                trace!("pager marker found, requesting next page");
                self.write_raw(b" ").await?;
                continue;
            }

            self.fill(deadline).await?;
        }
    }

    /// Read until `command` is echoed back, dropping whatever came before.
    ///
    /// Anything ahead of the echo was sent before the device saw the
    /// command, such as a late prompt, and is not part of its output.
    async fn read_echo(&mut self, command: &str, deadline: Instant) -> Result<()> {
        loop {
            if let Some(echo) = self.buffer.find_literal(command.as_bytes()) {
                if echo > 0 {
                    debug!("dropping {} bytes received ahead of '{}'", echo, command);
                }
                self.buffer.discard_front(echo);
                return Ok(());
            }

            self.fill(deadline).await?;
        }
    }

    /// Append one read from the stream to the buffer.
    async fn fill(&mut self, deadline: Instant) -> Result<()> {
        let mut chunk = vec![0u8; READ_CHUNK];
        let n = tokio::time::timeout_at(deadline, self.stream.read(&mut chunk))
            .await
            .map_err(|_| ChannelError::PatternTimeout(self.config.timeout))?
            .map_err(ChannelError::Io)?;

        if n == 0 {
            return Err(ChannelError::Closed.into());
        }

        self.buffer.extend(&chunk[..n]);
        Ok(())
    }

    /// Discard unsolicited output such as a login banner or a stray prompt.
    ///
    /// Reads until the stream stays quiet for the drain window, giving up
    /// after the prompt timeout if the device keeps talking. Returns the
    /// number of bytes discarded.
    pub async fn drain_pending(&mut self) -> Result<usize> {
        let give_up = Instant::now() + self.config.timeout;
        let mut chunk = vec![0u8; READ_CHUNK];
        let mut drained = self.buffer.len();
        self.buffer.clear();

        while Instant::now() < give_up {
            match tokio::time::timeout(self.config.drain_window, self.stream.read(&mut chunk)).await
            {
                Err(_) => break,
                Ok(Ok(0)) => return Err(ChannelError::Closed.into()),
                Ok(Ok(n)) => {
                    trace!("drained: {:?}", String::from_utf8_lossy(&chunk[..n]));
                    drained += n;
                }
                Ok(Err(e)) => return Err(ChannelError::Io(e).into()),
            }
        }

        Ok(drained)
    }

    /// Write `input` followed by a line terminator.
    pub async fn write_line(&mut self, input: &str) -> Result<()> {
        let mut line = Vec::with_capacity(input.len() + 1);
        line.extend_from_slice(input.as_bytes());
        line.push(b'\n');
        self.write_raw(&line).await
    }

    async fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        self.stream.write_all(data).await.map_err(ChannelError::Io)?;
        self.stream.flush().await.map_err(ChannelError::Io)?;
        Ok(())
    }

    /// Run one command exchange and return the text received for it.
    ///
    /// Returns `Ok(None)` without touching the stream when `command` is
    /// empty. Otherwise the response starts at the device's echo of
    /// `command` and ends at the first prompt after it: echo, output and
    /// trailing prompt, minus terminal escape sequences. A prompt that
    /// arrives before the echo never ends the response.
    pub async fn send_command(&mut self, command: &str) -> Result<Option<String>> {
        if command.is_empty() {
            warn!("no command to send");
            return Ok(None);
        }

        let discarded = self.drain_pending().await?;
        if discarded > 0 {
            debug!("discarded {} pending bytes before '{}'", discarded, command);
        }

        debug!("sending: {}", command);
        self.write_line(command).await?;

        let deadline = Instant::now() + self.config.timeout;
        self.read_echo(command, deadline).await?;
        let data = self.read_prompt_after(command.len(), deadline).await?;
        Ok(Some(String::from_utf8_lossy(&data).into_owned()))
    }

    /// Write a single NUL byte to check the stream is writable.
    ///
    /// Never fails: any write error just reports the channel as dead.
    pub async fn ping_null(&mut self) -> bool {
        self.write_raw(&[0]).await.is_ok()
    }

    /// Signal end of input to the remote side.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.stream.shutdown().await.map_err(ChannelError::Io)?;
        Ok(())
    }
}

/// Run one command exchange on a channel that may not exist.
///
/// An absent channel or an empty command yields `Ok(None)`.
pub async fn send_command<S>(
    channel: Option<&mut SessionChannel<S>>,
    command: &str,
) -> Result<Option<String>>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    match channel {
        Some(channel) => channel.send_command(command).await,
        None => {
            warn!("no channel available for '{}'", command);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncBufReadExt, BufReader, DuplexStream, duplex};
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::channel::compile_prompt_pattern;
    use crate::error::Error;

    const PROMPT: &str = r"(?m)^[\w.\-@()/:]{1,63}[#>]";

    fn channel(stream: DuplexStream) -> SessionChannel<DuplexStream> {
        let config = ChannelConfig {
            timeout: Duration::from_millis(500),
            ..Default::default()
        };
        SessionChannel::new(stream, compile_prompt_pattern(PROMPT).unwrap(), config)
    }

    /// Plays a device: writes the banner, then answers each received
    /// command line with the next canned reply.
    fn spawn_device(device: DuplexStream, banner: &'static str, replies: Vec<&'static str>) {
        tokio::spawn(async move {
            let (read_half, mut write_half) = tokio::io::split(device);
            let mut reader = BufReader::new(read_half);
            write_half.write_all(banner.as_bytes()).await.unwrap();
            for reply in replies {
                let mut line = String::new();
                if reader.read_line(&mut line).await.unwrap() == 0 {
                    return;
                }
                write_half.write_all(reply.as_bytes()).await.unwrap();
            }
            // Keep the pipe open until the client hangs up
            let mut rest = Vec::new();
            let _ = reader.read_to_end(&mut rest).await;
        });
    }

    #[tokio::test]
    async fn test_read_until_prompt_consumes_banner() {
        let (client, device) = duplex(4096);
        spawn_device(device, "Welcome to Aruba\r\n\r\nap505# ", vec![]);

        let mut channel = channel(client);
        let data = channel.read_until_prompt().await.unwrap();
        assert_eq!(data, b"Welcome to Aruba\r\n\r\nap505# ");
    }

    #[tokio::test]
    async fn test_send_command_returns_received_text() {
        let (client, device) = duplex(4096);
        let reply = "show version\r\nMODEL,IAP-505\r\nap505# ";
        spawn_device(device, "ap505# ", vec![reply]);

        let mut channel = channel(client);
        channel.read_until_prompt().await.unwrap();

        let output = channel.send_command("show version").await.unwrap();
        assert_eq!(output.as_deref(), Some(reply));
    }

    #[tokio::test]
    async fn test_send_command_discards_banner() {
        let (client, device) = duplex(4096);
        let reply = "show summary\r\nName:AP1\r\nap1# ";
        spawn_device(device, "banner text\r\nap1# ", vec![reply]);

        let mut channel = channel(client);
        // Let the banner arrive before draining
        tokio::time::sleep(Duration::from_millis(10)).await;

        let output = channel.send_command("show summary").await.unwrap();
        assert_eq!(output.as_deref(), Some(reply));
    }

    #[tokio::test]
    async fn test_late_prompt_before_echo_does_not_end_response() {
        let (client, device) = duplex(4096);
        let reply = "show version\r\nMODEL,IAP-505\r\nap505# ";

        tokio::spawn(async move {
            let (read_half, mut write_half) = tokio::io::split(device);
            let mut reader = BufReader::new(read_half);
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();

            // Re-prompt from an earlier keystroke, well after the drain window
            tokio::time::sleep(Duration::from_millis(20)).await;
            write_half.write_all(b"\r\nap505# ").await.unwrap();
            tokio::time::sleep(Duration::from_millis(30)).await;
            write_half.write_all(reply.as_bytes()).await.unwrap();

            let mut rest = Vec::new();
            let _ = reader.read_to_end(&mut rest).await;
        });

        let mut channel = channel(client);
        let output = channel.send_command("show version").await.unwrap();
        assert_eq!(output.as_deref(), Some(reply));
    }

    #[tokio::test]
    async fn test_prompt_without_echo_times_out() {
        let reply = "\r\nap505# ";
        let (client, device) = duplex(4096);
        spawn_device(device, "", vec![reply]);

        let mut channel = channel(client);
        channel.set_timeout(Duration::from_millis(100));
        let err = assert_err!(channel.send_command("show version").await);
        assert!(matches!(err, Error::Channel(ChannelError::PatternTimeout(_))));
    }

    #[tokio::test]
    async fn test_output_waits_for_prompt_across_chunks() {
        let (client, mut device) = duplex(4096);
        let mut channel = channel(client);

        tokio::spawn(async move {
            device.write_all(b"line one\r\n").await.unwrap();
            tokio::time::sleep(Duration::from_millis(30)).await;
            device.write_all(b"line two\r\nap505#").await.unwrap();
            let mut rest = Vec::new();
            let _ = device.read_to_end(&mut rest).await;
        });

        let data = channel.read_until_prompt().await.unwrap();
        assert_eq!(data, b"line one\r\nline two\r\nap505#");
    }

    #[tokio::test]
    async fn test_empty_command_is_none() {
        let (client, _device) = duplex(64);
        let mut channel = channel(client);
        let output = assert_ok!(channel.send_command("").await);
        assert!(output.is_none());
    }

    #[tokio::test]
    async fn test_absent_channel_is_none() {
        let output = assert_ok!(send_command::<DuplexStream>(None, "show version").await);
        assert!(output.is_none());
    }

    #[tokio::test]
    async fn test_prompt_timeout() {
        let (client, mut device) = duplex(4096);
        let mut channel = channel(client);
        channel.set_timeout(Duration::from_millis(50));

        device.write_all(b"still working...").await.unwrap();
        let err = assert_err!(channel.read_until_prompt().await);
        assert!(matches!(err, Error::Channel(ChannelError::PatternTimeout(_))));
    }

    #[tokio::test]
    async fn test_closed_stream() {
        let (client, device) = duplex(64);
        drop(device);
        let mut channel = channel(client);
        let err = assert_err!(channel.read_until_prompt().await);
        assert!(matches!(err, Error::Channel(ChannelError::Closed)));
    }

    #[tokio::test]
    async fn test_pager_is_answered() {
        let (client, device) = duplex(4096);
        let (read_half, mut write_half) = tokio::io::split(device);

        tokio::spawn(async move {
            let mut reader = BufReader::new(read_half);
            write_half.write_all(b"page one\r\n--More--").await.unwrap();
            let mut space = [0u8; 1];
            reader.read_exact(&mut space).await.unwrap();
            assert_eq!(&space, b" ");
            write_half.write_all(b"page two\r\nap505# ").await.unwrap();
            let mut rest = Vec::new();
            let _ = reader.read_to_end(&mut rest).await;
        });

        let mut channel = channel(client).with_pager(Regex::new(r"--More--").unwrap());
        let data = channel.read_until_prompt().await.unwrap();
        assert_eq!(data, b"page one\r\npage two\r\nap505# ");
    }

    #[tokio::test]
    async fn test_ping_null() {
        let (client, mut device) = duplex(64);
        let mut channel = channel(client);
        assert!(channel.ping_null().await);

        let mut byte = [0xffu8; 1];
        device.read_exact(&mut byte).await.unwrap();
        assert_eq!(byte, [0]);

        drop(device);
        assert!(!channel.ping_null().await);
    }
}
