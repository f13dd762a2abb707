//! Sending a chord library to the practice device.
//!
//! An upload runs strictly in order: discover, connect, send the frames,
//! wait for the reply, disconnect. Discovery and the reply wait are the only
//! places that block, and both are bounded by the configured timeouts.

pub mod ble;
pub mod framing;

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ConfigError, DiscoveryError, LinkError, UploadError};
use crate::library::ChordLibrary;
use framing::Reply;

/// Finds devices.
///
/// Uploads run on a single task, so the futures returned here are not
/// required to be `Send`. The fakes in the tests rely on that.
#[allow(async_fn_in_trait)]
pub trait Central {
    type Device: Device;

    /// Scan until a device advertising `name` shows up. An empty `name`
    /// matches on the configured service instead.
    async fn discover(&mut self, name: &str) -> Result<Self::Device, LinkError>;

    /// Stop a scan left running by a failed or cancelled `discover`.
    async fn stop_scan(&mut self) -> Result<(), LinkError>;
}

/// A discovered device and its reply channel.
///
/// Like [`Central`], driven from a single task; futures need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait Device {
    async fn connect(&mut self) -> Result<(), LinkError>;

    async fn write(&mut self, frame: &[u8]) -> Result<(), LinkError>;

    /// Next reply from the device, or `None` once it has gone away.
    async fn receive(&mut self) -> Result<Option<Vec<u8>>, LinkError>;

    async fn disconnect(&mut self) -> Result<(), LinkError>;
}

/// Drives one replace-all upload.
#[derive(Debug, Clone)]
pub struct Uploader {
    device_name: String,
    scan_timeout: Duration,
    ack_timeout: Duration,
    frame_size: usize,
}

impl Uploader {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Uploader {
            device_name: config.device_name.clone(),
            scan_timeout: config.scan_timeout(),
            ack_timeout: config.ack_timeout(),
            frame_size: config.frame_size,
        })
    }

    /// Find the device and make it replace its lists with `library`.
    pub async fn upload<C: Central>(
        &self,
        central: &mut C,
        library: &ChordLibrary,
    ) -> Result<(), crate::Error> {
        let frames = framing::encode_frames(library, self.frame_size)
            .map_err(crate::error::FormatError::from)?;

        let mut device = self.discover(central).await?;

        info!("connecting to '{}'", self.device_name);
        let result = match device.connect().await {
            Ok(()) => self.send(&mut device, &frames, library.len()).await,
            Err(err) => Err(UploadError::Connect(err)),
        };

        // A failed connect can leave the link half open, so always disconnect.
        if let Err(err) = device.disconnect().await {
            warn!("disconnect failed: {err}");
        }

        Ok(result?)
    }

    async fn discover<C: Central>(&self, central: &mut C) -> Result<C::Device, DiscoveryError> {
        info!(
            "scanning for '{}' ({}s)",
            self.device_name,
            self.scan_timeout.as_secs_f32()
        );

        let outcome =
            tokio::time::timeout(self.scan_timeout, central.discover(&self.device_name)).await;

        // A successful discover stops its own scan; every other outcome
        // may leave the adapter scanning.
        if !matches!(outcome, Ok(Ok(_))) {
            if let Err(err) = central.stop_scan().await {
                warn!("could not stop scan: {err}");
            }
        }

        match outcome {
            Ok(Ok(device)) => Ok(device),
            Ok(Err(err)) => Err(DiscoveryError::Link(err)),
            Err(_) => Err(DiscoveryError::Timeout {
                name: self.device_name.clone(),
                timeout: self.scan_timeout,
            }),
        }
    }

    async fn send<D: Device>(
        &self,
        device: &mut D,
        frames: &[Vec<u8>],
        list_count: usize,
    ) -> Result<(), UploadError> {
        info!("sending {list_count} chord lists in {} frames", frames.len());
        for (i, frame) in frames.iter().enumerate() {
            debug!(frame = i, bytes = frame.len(), "write");
            device.write(frame).await.map_err(UploadError::Write)?;
        }

        let raw = tokio::time::timeout(self.ack_timeout, device.receive())
            .await
            .map_err(|_| UploadError::AckTimeout(self.ack_timeout))?
            .map_err(UploadError::Receive)?
            .ok_or(UploadError::Disconnected)?;

        let reply = Reply::parse(&raw)?;
        debug!(?reply, "device replied");
        reply.into_result(list_count)
    }
}
