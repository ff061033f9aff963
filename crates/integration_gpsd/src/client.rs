//! gpsd TCP client

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, instrument, trace, warn};

use crate::config::GpsdConfig;
use crate::error::GpsdError;
use crate::models::{GpsFix, GpsdMessage};

const WATCH_COMMAND: &[u8] = b"?WATCH={\"enable\":true,\"json\":true};\n";

/// Fixes produced by a watch
///
/// A lost connection is reported as an error and the watch reconnects.
pub type FixStream = mpsc::Receiver<Result<GpsFix, GpsdError>>;

type Reports = BufReader<TcpStream>;

/// Trait for GPS position sources
#[async_trait]
pub trait GpsClient: Send + Sync {
    /// Wait for the next usable fix
    ///
    /// With `require_3d`, 2D fixes are skipped.
    async fn current_fix(&self, require_3d: bool, timeout: Duration)
    -> Result<GpsFix, GpsdError>;

    /// Stream fixes until the receiver is dropped
    async fn watch(&self, require_3d: bool) -> Result<FixStream, GpsdError>;
}

/// Client for a gpsd daemon
#[derive(Debug, Clone)]
pub struct GpsdClient {
    config: GpsdConfig,
}

impl GpsdClient {
    #[must_use]
    pub const fn new(config: GpsdConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &GpsdConfig {
        &self.config
    }

    /// Connect and enable JSON watch mode
    async fn connect(&self) -> Result<Reports, GpsdError> {
        let address = self.config.address();
        let connect_timeout = Duration::from_secs(self.config.connect_timeout_secs);

        let mut stream = tokio::time::timeout(connect_timeout, TcpStream::connect(&address))
            .await
            .map_err(|_| GpsdError::ConnectionFailed(format!("{address}: connect timed out")))?
            .map_err(|e| GpsdError::ConnectionFailed(format!("{address}: {e}")))?;

        stream.write_all(WATCH_COMMAND).await?;
        debug!(%address, "gpsd watch enabled");

        Ok(BufReader::new(stream))
    }
}

/// Read reports until a fix of the requested quality arrives
async fn next_fix(reports: &mut Reports, require_3d: bool) -> Result<GpsFix, GpsdError> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reports.read_until(b'\n', &mut buf).await? == 0 {
            return Err(GpsdError::ConnectionClosed);
        }

        // Invalid UTF-8 becomes replacement characters and fails to parse below
        let line = String::from_utf8_lossy(&buf);
        match GpsdMessage::parse(&line) {
            Ok(GpsdMessage::Tpv(tpv)) => match tpv.to_fix() {
                Some(fix) if !require_3d || fix.is_3d() => return Ok(fix),
                Some(fix) => trace!(mode = ?fix.mode, "Skipping fix below requested accuracy"),
                None => trace!(mode = tpv.mode, "TPV report without fix"),
            },
            Ok(GpsdMessage::Version { release }) => debug!(%release, "gpsd version"),
            Ok(GpsdMessage::Other) => {},
            Err(e) => debug!(error = %e, "Ignoring unparseable gpsd report"),
        }
    }
}

#[async_trait]
impl GpsClient for GpsdClient {
    #[instrument(skip(self))]
    async fn current_fix(
        &self,
        require_3d: bool,
        timeout: Duration,
    ) -> Result<GpsFix, GpsdError> {
        let mut reports = self.connect().await?;

        let fix = tokio::time::timeout(timeout, next_fix(&mut reports, require_3d))
            .await
            .map_err(|_| GpsdError::NoFix {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            })??;

        debug!(lat = fix.latitude, lon = fix.longitude, mode = ?fix.mode, "gpsd fix");
        Ok(fix)
    }

    #[instrument(skip(self))]
    async fn watch(&self, require_3d: bool) -> Result<FixStream, GpsdError> {
        let reports = self.connect().await?;
        let (tx, rx) = mpsc::channel(self.config.channel_buffer);
        let client = self.clone();

        tokio::spawn(async move {
            let mut connection = Some(reports);
            loop {
                let Some(reports) = connection.as_mut() else {
                    tokio::select! {
                        () = tx.closed() => break,
                        () = tokio::time::sleep(client.config.reconnect_delay()) => {},
                    }
                    match client.connect().await {
                        Ok(reports) => {
                            debug!("gpsd watch reconnected");
                            connection = Some(reports);
                        },
                        Err(e) => warn!(error = %e, "gpsd reconnect failed"),
                    }
                    continue;
                };

                let result = tokio::select! {
                    () = tx.closed() => break,
                    result = next_fix(reports, require_3d) => result,
                };

                if let Err(e) = &result {
                    warn!(error = %e, "gpsd watch lost its connection, reconnecting");
                    connection = None;
                }
                if tx.send(result).await.is_err() {
                    break;
                }
            }
            debug!("gpsd watch receiver dropped");
        });

        Ok(rx)
    }
}
