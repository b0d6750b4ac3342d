use std::io;
use std::time::Duration;

use log::{debug, warn};
use rusb::{UsbContext, Context, Device, DeviceDescriptor, DeviceHandle, TransferType, Direction};
use crate::Error;
use super::{PrinterDescriptor, ConnectionKind, Transport};

/// USB vendor id used by TSC
pub const TSC_VENDOR_ID: u16 = 0x1203;

/// Lists the TSC printers on the USB bus, in bus order
pub(crate) fn usb_printers() -> Result<Vec<PrinterDescriptor>, Error> {
    let context = Context::new()?;
    let mut printers = Vec::new();
    for (device, s) in tsc_devices(&context)? {
        let (name, serial) = match device.open() {
            Ok(dh) => (dh.read_product_string_ascii(&s).ok(), dh.read_serial_number_string_ascii(&s).ok()),
            Err(e) => {
                debug!("Could not read the strings of {:04x}:{:04x}: {}", s.vendor_id(), s.product_id(), e);
                (None, None)
            }
        };
        printers.push(PrinterDescriptor {
            index: printers.len(),
            name: name.unwrap_or_else(|| format!("TSC {:04x}:{:04x}", s.vendor_id(), s.product_id())),
            kind: ConnectionKind::Usb,
            vendor_id: Some(s.vendor_id()),
            product_id: Some(s.product_id()),
            serial
        });
    }
    Ok(printers)
}

fn tsc_devices(context: &Context) -> Result<Vec<(Device<Context>, DeviceDescriptor)>, Error> {
    let mut found = Vec::new();
    for device in context.devices()?.iter() {
        let s = device.device_descriptor()?;
        if s.vendor_id() == TSC_VENDOR_ID {
            found.push((device, s));
        }
    }
    Ok(found)
}

/// Bulk endpoints of a claimed printer interface
pub struct UsbTransport {
    dh: DeviceHandle<Context>,
    /// Bulk write endpoint
    endpoint_out: u8,
    /// Bulk read endpoint, status answers come through here
    endpoint_in: Option<u8>,
    /// Time to wait before giving up on a bulk transfer
    timeout: Duration,
    name: String
}

impl UsbTransport {
    /// Opens the n-th TSC printer on the bus, same order as the USB part of `list_printers`
    pub fn open(index: usize, timeout: Duration) -> Result<UsbTransport, Error> {
        let context = Context::new()?;
        let (device, s) = match tsc_devices(&context)?.into_iter().nth(index) {
            Some(found) => found,
            None => return Err(Error::Connection(format!("no USB printer at position {}", index)))
        };
        // Before opening the device, we must find the bulk endpoints
        let config_descriptor = device.active_config_descriptor()?;
        let mut endpoint_out: Option<u8> = None;
        let mut endpoint_in: Option<u8> = None;
        for interface in config_descriptor.interfaces() {
            for descriptor in interface.descriptors() {
                for endpoint in descriptor.endpoint_descriptors() {
                    match (endpoint.transfer_type(), endpoint.direction()) {
                        (TransferType::Bulk, Direction::Out) if endpoint_out.is_none() => endpoint_out = Some(endpoint.address()),
                        (TransferType::Bulk, Direction::In) if endpoint_in.is_none() => endpoint_in = Some(endpoint.address()),
                        _ => ()
                    }
                }
            }
        }
        let endpoint_out = match endpoint_out {
            Some(endpoint) => endpoint,
            None => return Err(Error::Connection("the printer exposes no bulk endpoint".to_string()))
        };

        let dh = device.open()?;
        match dh.kernel_driver_active(0) {
            Ok(true) => dh.detach_kernel_driver(0)?,
            Ok(false) => (),
            Err(_) => warn!("Could not find out if kernel driver is active, might encounter a problem soon.")
        }
        dh.claim_interface(0)?;
        let name = dh.read_product_string_ascii(&s)
            .unwrap_or_else(|_| format!("TSC {:04x}:{:04x}", s.vendor_id(), s.product_id()));
        debug!("Claimed {} (bulk out 0x{:02x}, bulk in {:?})", name, endpoint_out, endpoint_in);
        Ok(UsbTransport {
            dh,
            endpoint_out,
            endpoint_in,
            timeout,
            name
        })
    }
}

fn to_io(e: rusb::Error) -> io::Error {
    match e {
        rusb::Error::Timeout => io::Error::new(io::ErrorKind::TimedOut, e),
        rusb::Error::NoDevice => io::Error::new(io::ErrorKind::NotConnected, e),
        other => io::Error::new(io::ErrorKind::Other, other)
    }
}

impl io::Read for UsbTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.endpoint_in {
            Some(endpoint) => self.dh.read_bulk(endpoint, buf, self.timeout).map_err(to_io),
            None => Err(io::Error::new(io::ErrorKind::Unsupported, "the printer exposes no bulk read endpoint"))
        }
    }
}

impl io::Write for UsbTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.dh.write_bulk(self.endpoint_out, buf, self.timeout).map_err(to_io)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for UsbTransport {
    fn name(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

impl Drop for UsbTransport {
    fn drop(&mut self) {
        if let Err(e) = self.dh.release_interface(0) {
            debug!("Could not release the interface of {}: {}", self.name, e);
        }
    }
}

impl std::fmt::Debug for UsbTransport {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        formatter.debug_struct("UsbTransport")
            .field("name", &self.name)
            .field("endpoint_out", &self.endpoint_out)
            .field("endpoint_in", &self.endpoint_in)
            .finish()
    }
}
