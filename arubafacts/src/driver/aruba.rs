//! SSH driver for Aruba Instant access points.

use std::pin::Pin;
use std::time::{Duration, Instant};

use log::{debug, warn};
use regex::bytes::Regex;
use tokio::io::{AsyncRead, AsyncWrite};

use super::Driver;
use super::response::Response;
use crate::channel::{ChannelConfig, SessionChannel};
use crate::error::{DriverError, Result};
use crate::platform::{PlatformDefinition, strip_echo_and_prompt};
use crate::transport::{ShellStream, SshConfig, SshTransport};

type ShellChannel = SessionChannel<Pin<Box<ShellStream>>>;

/// Live connection state; present only between `open()` and `close()`.
struct Session {
    transport: SshTransport,
    channel: ShellChannel,
}

/// Driver holding one SSH shell session to one device.
///
/// This handles:
/// - SSH transport management
/// - Command execution with prompt detection
/// - Failure detection from platform failure strings
pub struct ArubaDriver {
    /// SSH configuration.
    ssh_config: SshConfig,

    /// Platform definition.
    platform: PlatformDefinition,

    /// Prompt pattern compiled from the platform.
    prompt_pattern: Regex,

    /// Pager pattern compiled from the platform.
    pager_pattern: Option<Regex>,

    /// Per-command prompt timeout.
    timeout: Duration,

    /// Connection state (None when disconnected).
    session: Option<Session>,
}

impl ArubaDriver {
    /// Create a new driver. Does not connect.
    pub fn new(ssh_config: SshConfig, platform: PlatformDefinition) -> Result<Self> {
        let prompt_pattern = platform.compile_prompt()?;
        let pager_pattern = platform.compile_pager()?;

        Ok(Self {
            timeout: ssh_config.timeout,
            ssh_config,
            platform,
            prompt_pattern,
            pager_pattern,
            session: None,
        })
    }

    /// Get a reference to the platform definition.
    pub fn platform(&self) -> &PlatformDefinition {
        &self.platform
    }

    /// Get the SSH configuration.
    pub fn ssh_config(&self) -> &SshConfig {
        &self.ssh_config
    }

    /// Set the per-command timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
        if let Some(session) = self.session.as_mut() {
            session.channel.set_timeout(timeout);
        }
    }

    fn channel_config(&self) -> ChannelConfig {
        ChannelConfig {
            timeout: self.timeout,
            ..Default::default()
        }
    }
}

/// Wrap a fresh shell stream: consume the login banner, then run the
/// platform's on-open commands. The channel is only handed back once all
/// of that succeeded.
async fn prepare_shell<S>(
    stream: S,
    platform: &PlatformDefinition,
    prompt: Regex,
    pager: Option<Regex>,
    config: ChannelConfig,
) -> Result<SessionChannel<S>>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let mut channel = SessionChannel::new(stream, prompt, config);
    if let Some(pager) = pager {
        channel = channel.with_pager(pager);
    }

    let banner = channel.read_until_prompt().await?;
    debug!("banner: {}", String::from_utf8_lossy(&banner).trim());

    for command in &platform.on_open_commands {
        if let Some(response) = exchange(&mut channel, platform, command).await? {
            if let Some(failure) = &response.failure_message {
                warn!("on_open command '{}' failed: {}", command, failure);
            }
        }
    }

    Ok(channel)
}

/// Run one command and turn what came back into a [`Response`].
///
/// The echo and trailing prompt are stripped from `result`; output
/// containing one of the platform's failure strings is marked failed.
async fn exchange<S>(
    channel: &mut SessionChannel<S>,
    platform: &PlatformDefinition,
    command: &str,
) -> Result<Option<Response>>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let start = Instant::now();
    let Some(raw_result) = channel.send_command(command).await? else {
        return Ok(None);
    };
    let elapsed = start.elapsed();

    let prompt = extract_prompt(channel.prompt_pattern(), &raw_result);
    let result = strip_echo_and_prompt(&raw_result, command);
    let response = Response::new(command, result, raw_result, prompt, elapsed);

    match platform.failure_in(&response.result).map(str::to_string) {
        Some(failure) => {
            debug!("'{}' failed: {}", command, failure);
            Ok(Some(response.with_failure(failure)))
        }
        None => Ok(Some(response)),
    }
}

fn extract_prompt(prompt: &Regex, raw: &str) -> String {
    prompt
        .find(raw.as_bytes())
        .and_then(|m| raw.get(m.start()..))
        .map(|prompt| prompt.trim().to_string())
        .unwrap_or_default()
}

impl Driver for ArubaDriver {
    async fn open(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Err(DriverError::AlreadyConnected.into());
        }

        let transport = SshTransport::connect(self.ssh_config.clone()).await?;
        let config = self.channel_config();

        let prepared = match transport.open_shell().await {
            Ok(stream) => {
                prepare_shell(
                    Box::pin(stream),
                    &self.platform,
                    self.prompt_pattern.clone(),
                    self.pager_pattern.clone(),
                    config,
                )
                .await
            }
            Err(e) => Err(e),
        };
        let channel = match prepared {
            Ok(channel) => channel,
            Err(e) => {
                let _ = transport.close().await;
                return Err(e);
            }
        };

        debug!("connected to {}", self.ssh_config.host);
        self.session = Some(Session { transport, channel });
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut session) = self.session.take() {
            let _ = session.channel.shutdown().await;
            session.transport.close().await?;
            debug!("disconnected from {}", self.ssh_config.host);
        }
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<Option<Response>> {
        let Some(session) = self.session.as_mut() else {
            warn!("no channel available for '{}'", command);
            return Ok(None);
        };

        exchange(&mut session.channel, &self.platform, command).await
    }

    fn is_open(&self) -> bool {
        self.session.is_some()
    }

    async fn is_alive(&mut self) -> bool {
        match self.session.as_mut() {
            None => false,
            Some(session) => {
                !session.transport.is_closed()
                    && session.channel.ping_null().await
                    && !session.transport.is_closed()
            }
        }
    }

    fn host(&self) -> &str {
        &self.ssh_config.host
    }
}

impl Drop for ArubaDriver {
    fn drop(&mut self) {
        if self.session.is_some() {
            warn!(
                "ArubaDriver for {} dropped without close()",
                self.ssh_config.host
            );
        }
    }
}
