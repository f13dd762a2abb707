//! Bluetooth LE backend built on btleplug.

use std::pin::Pin;

use btleplug::api::{
    Central as _, CentralEvent, Characteristic, Manager as _, Peripheral as _, ScanFilter,
    ValueNotification, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::{Stream, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{Central, Device};
use crate::config::Config;
use crate::error::LinkError;

type Notifications = Pin<Box<dyn Stream<Item = ValueNotification> + Send>>;

/// Match on the advertised local name. The service UUID is only used when no
/// name is configured, since other boards advertise the same UART service.
fn advertises_target(local_name: Option<&str>, services: &[Uuid], name: &str, service: Uuid) -> bool {
    if name.is_empty() {
        services.contains(&service)
    } else {
        local_name == Some(name)
    }
}

pub struct BleCentral {
    adapter: Adapter,
    service_uuid: Uuid,
    rx_uuid: Uuid,
    tx_uuid: Uuid,
}

impl BleCentral {
    /// Use the first Bluetooth adapter on the system.
    pub async fn new(config: &Config) -> Result<Self, LinkError> {
        let manager = Manager::new().await?;
        let adapter = manager
            .adapters()
            .await?
            .into_iter()
            .next()
            .ok_or(LinkError::NoAdapter)?;
        info!("using adapter {}", adapter.adapter_info().await?);

        Ok(BleCentral {
            adapter,
            service_uuid: config.service_uuid,
            rx_uuid: config.rx_uuid,
            tx_uuid: config.tx_uuid,
        })
    }

    /// Whether `peripheral` is the device to upload to. Peripherals that
    /// fail to report their properties are skipped, not treated as errors.
    async fn is_target(&self, peripheral: &Peripheral, name: &str) -> bool {
        match peripheral.properties().await {
            Ok(Some(properties)) => {
                debug!(address = %properties.address, local_name = ?properties.local_name, "seen");
                advertises_target(
                    properties.local_name.as_deref(),
                    &properties.services,
                    name,
                    self.service_uuid,
                )
            }
            Ok(None) => false,
            Err(err) => {
                debug!(id = ?peripheral.id(), "skipping peripheral: {err}");
                false
            }
        }
    }

    async fn found(&mut self, peripheral: Peripheral, name: &str) -> BleDevice {
        if let Err(err) = self.adapter.stop_scan().await {
            warn!("could not stop scan: {err}");
        }
        info!("found '{name}'");
        self.device(peripheral)
    }

    fn device(&self, peripheral: Peripheral) -> BleDevice {
        BleDevice {
            peripheral,
            rx_uuid: self.rx_uuid,
            tx_uuid: self.tx_uuid,
            rx: None,
            notifications: None,
        }
    }
}

impl Central for BleCentral {
    type Device = BleDevice;

    async fn discover(&mut self, name: &str) -> Result<BleDevice, LinkError> {
        let mut events = self.adapter.events().await?;
        self.adapter.start_scan(ScanFilter::default()).await?;

        // The adapter may already know the device from an earlier scan.
        for peripheral in self.adapter.peripherals().await? {
            if self.is_target(&peripheral, name).await {
                return Ok(self.found(peripheral, name).await);
            }
        }

        while let Some(event) = events.next().await {
            let id = match event {
                CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id) => id,
                _ => continue,
            };
            let peripheral = match self.adapter.peripheral(&id).await {
                Ok(peripheral) => peripheral,
                Err(err) => {
                    debug!(?id, "peripheral went away: {err}");
                    continue;
                }
            };
            if self.is_target(&peripheral, name).await {
                return Ok(self.found(peripheral, name).await);
            }
        }

        Err(LinkError::ScanEnded)
    }

    async fn stop_scan(&mut self) -> Result<(), LinkError> {
        Ok(self.adapter.stop_scan().await?)
    }
}

pub struct BleDevice {
    peripheral: Peripheral,
    rx_uuid: Uuid,
    tx_uuid: Uuid,
    rx: Option<Characteristic>,
    notifications: Option<Notifications>,
}

impl BleDevice {
    fn characteristic(&self, uuid: Uuid) -> Result<Characteristic, LinkError> {
        self.peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == uuid)
            .ok_or(LinkError::MissingCharacteristic(uuid))
    }
}

impl Device for BleDevice {
    async fn connect(&mut self) -> Result<(), LinkError> {
        self.peripheral.connect().await?;
        self.peripheral.discover_services().await?;

        let rx = self.characteristic(self.rx_uuid)?;
        let tx = self.characteristic(self.tx_uuid)?;

        self.peripheral.subscribe(&tx).await?;
        self.notifications = Some(self.peripheral.notifications().await?);
        self.rx = Some(rx);
        Ok(())
    }

    async fn write(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        let rx = self.rx.as_ref().ok_or(LinkError::NotConnected)?;
        Ok(self
            .peripheral
            .write(rx, frame, WriteType::WithResponse)
            .await?)
    }

    async fn receive(&mut self) -> Result<Option<Vec<u8>>, LinkError> {
        let notifications = self.notifications.as_mut().ok_or(LinkError::NotConnected)?;
        while let Some(notification) = notifications.next().await {
            if notification.uuid == self.tx_uuid {
                return Ok(Some(notification.value));
            }
        }
        Ok(None)
    }

    async fn disconnect(&mut self) -> Result<(), LinkError> {
        self.notifications = None;
        self.rx = None;
        if self.peripheral.is_connected().await? {
            self.peripheral.disconnect().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UART_SERVICE_UUID;

    #[test]
    fn test_name_decides_when_configured() {
        let uart = [UART_SERVICE_UUID];

        assert!(advertises_target(Some("GuitarTrainer"), &[], "GuitarTrainer", UART_SERVICE_UUID));
        assert!(!advertises_target(Some("nRF52 DK"), &uart, "GuitarTrainer", UART_SERVICE_UUID));
        assert!(!advertises_target(None, &uart, "GuitarTrainer", UART_SERVICE_UUID));
    }

    #[test]
    fn test_service_used_without_name() {
        let uart = [UART_SERVICE_UUID];

        assert!(advertises_target(Some("anything"), &uart, "", UART_SERVICE_UUID));
        assert!(!advertises_target(Some("anything"), &[], "", UART_SERVICE_UUID));
    }
}
