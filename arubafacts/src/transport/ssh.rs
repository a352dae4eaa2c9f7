//! russh client session to an access point's management interface.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};
use russh::client::{self, Handle, Msg};
use russh::keys::{PrivateKey, PrivateKeyWithHashAlg, PublicKey, load_secret_key};
use russh::{ChannelStream, Disconnect};
use secrecy::{ExposeSecret, SecretString};

use super::config::{AuthMethod, HostKeyVerification, KeyVerdict, KnownHost, SshConfig};
use crate::error::{Result, TransportError};

/// Byte stream of an interactive shell channel.
pub type ShellStream = ChannelStream<Msg>;

/// Idle sessions are kept up with SSH keepalives at this interval.
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Host-key rejection recorded by the handler for `connect()` to report.
type Rejection = Arc<Mutex<Option<TransportError>>>;

/// An authenticated SSH session.
pub struct SshTransport {
    handle: Handle<HostKeyGuard>,
    config: SshConfig,
}

impl SshTransport {
    /// Connect, verify the host key and log in.
    ///
    /// The handshake is bounded by `config.timeout`. A session whose login
    /// fails is disconnected before the error is returned.
    pub async fn connect(config: SshConfig) -> Result<Self> {
        let rejection = Rejection::default();
        let guard = HostKeyGuard::new(&config, rejection.clone());
        let client_config = Arc::new(client::Config {
            inactivity_timeout: None,
            keepalive_interval: Some(KEEPALIVE_INTERVAL),
            ..Default::default()
        });

        debug!("connecting to {} ({} auth)", config.socket_addr(), config.auth.name());

        let handshake = client::connect(client_config, (config.host.as_str(), config.port), guard);
        let mut handle = match tokio::time::timeout(config.timeout, handshake).await {
            Err(_) => return Err(TransportError::Timeout(config.timeout).into()),
            Ok(Err(source)) => {
                // russh only says UnknownKey; the guard knows why
                let rejected = rejection.lock().ok().and_then(|mut slot| slot.take());
                return Err(rejected
                    .unwrap_or(TransportError::ConnectionFailed {
                        host: config.host.clone(),
                        port: config.port,
                        source,
                    })
                    .into());
            }
            Ok(Ok(handle)) => handle,
        };

        let login = match login(&mut handle, &config).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(TransportError::AuthenticationFailed {
                user: config.username.clone(),
            }
            .into()),
            Err(e) => Err(e),
        };
        if let Err(e) = login {
            let _ = handle.disconnect(Disconnect::ByApplication, "", "en").await;
            return Err(e);
        }

        debug!("logged in to {} as {}", config.host, config.username);
        Ok(Self { handle, config })
    }

    /// Open a session channel with a PTY and a shell, as a duplex stream.
    pub async fn open_shell(&self) -> Result<ShellStream> {
        let channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .request_pty(
                true,
                "vt100",
                self.config.terminal_width,
                self.config.terminal_height,
                0,
                0,
                &[],
            )
            .await
            .map_err(TransportError::Ssh)?;
        channel
            .request_shell(true)
            .await
            .map_err(TransportError::Ssh)?;

        Ok(channel.into_stream())
    }

    /// Whether russh's session task has ended.
    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }

    /// Say goodbye to the server.
    pub async fn close(self) -> Result<()> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }
}

/// Offer the configured credentials; `Ok(false)` means the server said no.
async fn login(handle: &mut Handle<HostKeyGuard>, config: &SshConfig) -> Result<bool> {
    let user = config.username.as_str();
    let auth = match &config.auth {
        AuthMethod::None => handle.authenticate_none(user).await,
        AuthMethod::Password(password) => {
            handle.authenticate_password(user, password.expose_secret()).await
        }
        AuthMethod::PrivateKey { path, passphrase } => {
            let key = load_key(path, passphrase.as_ref())?;
            let hash_alg = handle
                .best_supported_rsa_hash()
                .await
                .map_err(TransportError::Ssh)?
                .flatten();
            handle
                .authenticate_publickey(user, PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg))
                .await
        }
    };

    Ok(auth.map_err(TransportError::Ssh)?.success())
}

fn load_key(path: &Path, passphrase: Option<&SecretString>) -> Result<PrivateKey> {
    load_secret_key(path, passphrase.map(|p| p.expose_secret()))
        .map_err(|e| TransportError::Key(format!("{}: {}", path.display(), e)).into())
}

/// russh handler applying the host-key policy against known_hosts.
struct HostKeyGuard {
    host: String,
    port: u16,
    policy: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    rejection: Rejection,
}

impl HostKeyGuard {
    fn new(config: &SshConfig, rejection: Rejection) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            policy: config.host_key_verification,
            known_hosts_path: config.known_hosts_path.clone(),
            rejection,
        }
    }

    fn lookup(&self, key: &PublicKey) -> std::result::Result<KnownHost, TransportError> {
        let found = match &self.known_hosts_path {
            Some(path) => russh::keys::check_known_hosts_path(&self.host, self.port, key, path),
            None => russh::keys::check_known_hosts(&self.host, self.port, key),
        };

        match found {
            Ok(true) => Ok(KnownHost::Matches),
            Ok(false) => Ok(KnownHost::Absent),
            Err(russh::keys::Error::KeyChanged { line }) => Ok(KnownHost::Changed { line }),
            Err(e) => Err(TransportError::KnownHosts(e.to_string())),
        }
    }

    fn learn(&self, key: &PublicKey) {
        debug!("recording host key for {}:{}", self.host, self.port);
        let saved = match &self.known_hosts_path {
            Some(path) => {
                russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, key, path)
            }
            None => russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, key),
        };
        if let Err(e) = saved {
            warn!("could not save host key for {}: {}", self.host, e);
        }
    }
}

impl client::Handler for HostKeyGuard {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        if !self.policy.needs_lookup() {
            return Ok(true);
        }

        let verdict = match self.lookup(server_public_key) {
            Ok(known) => self.policy.verdict(&self.host, self.port, known),
            Err(e) => KeyVerdict::Reject(e),
        };

        Ok(match verdict {
            KeyVerdict::Accept => true,
            KeyVerdict::Learn => {
                self.learn(server_public_key);
                true
            }
            KeyVerdict::Reject(e) => {
                warn!("rejecting host key: {}", e);
                if let Ok(mut slot) = self.rejection.lock() {
                    *slot = Some(e);
                }
                false
            }
        })
    }
}
