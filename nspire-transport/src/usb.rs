//! USB bulk transport for TI-Nspire calculators
//!
//! The calculator exposes one vendor interface with a bulk OUT and a bulk IN
//! endpoint. All protocol frames travel over that pair.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use nusb::transfer::RequestBuffer;
use nusb::Interface;
use tokio::time::timeout;
use tracing::{debug, info, trace, warn};

use nspire_core::constants::usb::{
    CONFIGURATION, ENDPOINT_IN, ENDPOINT_OUT, INTERFACE, PRODUCT_ID, VENDOR_ID,
};

use crate::{error::*, Transport};

/// USB transport for TI-Nspire calculators
pub struct UsbTransport {
    interface: Option<Interface>,
    location: String,
}

impl UsbTransport {
    /// Open the first TI-Nspire CX II found on the bus
    pub fn open() -> Result<Self> {
        Self::open_with_ids(VENDOR_ID, PRODUCT_ID)
    }

    /// Open the first device matching `vendor_id:product_id`
    ///
    /// Selects configuration 1, detaches any kernel driver and claims
    /// interface 0.
    pub fn open_with_ids(vendor_id: u16, product_id: u16) -> Result<Self> {
        debug!("Searching for {:04x}:{:04x}...", vendor_id, product_id);

        let device_info = nusb::list_devices()?
            .find(|d| d.vendor_id() == vendor_id && d.product_id() == product_id)
            .ok_or(Error::DeviceNotFound {
                vendor_id,
                product_id,
            })?;

        let location = format!(
            "bus {:03} addr {:03} ({:04x}:{:04x})",
            device_info.bus_number(),
            device_info.device_address(),
            vendor_id,
            product_id
        );

        let device = device_info.open()?;

        // Usually already active; some platforms refuse while a driver is bound.
        if let Err(e) = device.set_configuration(CONFIGURATION) {
            warn!("Setting configuration {} failed (continuing): {}", CONFIGURATION, e);
        }

        let interface = device.detach_and_claim_interface(INTERFACE)?;

        info!("Opened calculator at {}", location);

        Ok(Self {
            interface: Some(interface),
            location,
        })
    }
}

#[async_trait]
impl Transport for UsbTransport {
    async fn write(&mut self, data: &[u8], timeout_duration: Duration) -> Result<usize> {
        let interface = self.interface.as_ref().ok_or(Error::NotOpen)?;

        trace!("Sending {} bytes: {:02X?}", data.len(), &data[..data.len().min(32)]);

        let completion = timeout(timeout_duration, interface.bulk_out(ENDPOINT_OUT, data.to_vec()))
            .await
            .map_err(|_| {
                warn!("Write timeout after {:?}", timeout_duration);
                Error::WriteTimeout(timeout_duration)
            })?;

        let written = completion.into_result()?.actual_length();

        Ok(written)
    }

    async fn read(&mut self, max_len: usize, timeout_duration: Duration) -> Result<BytesMut> {
        let interface = self.interface.as_ref().ok_or(Error::NotOpen)?;

        let completion = timeout(
            timeout_duration,
            interface.bulk_in(ENDPOINT_IN, RequestBuffer::new(max_len)),
        )
        .await
        .map_err(|_| {
            warn!("Read timeout after {:?}", timeout_duration);
            Error::ReadTimeout(timeout_duration)
        })?;

        let data = completion.into_result()?;

        trace!(
            "Received {} bytes: {:02X?}",
            data.len(),
            &data[..data.len().min(32)]
        );

        Ok(BytesMut::from(data.as_slice()))
    }

    async fn release(&mut self) -> Result<()> {
        if self.interface.take().is_some() {
            debug!("Released interface {} on {}", INTERFACE, self.location);
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.interface.is_some()
    }

    fn description(&self) -> String {
        self.location.clone()
    }
}

impl Drop for UsbTransport {
    fn drop(&mut self) {
        if self.is_open() {
            warn!("USB transport dropped without release ({})", self.location);
        }
    }
}
