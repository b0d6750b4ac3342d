//! Ways of reaching the printer
//!
//! The [TscPrinter](crate::TscPrinter) façade never talks to the printer itself, it forwards every operation to a [NativePrinterBackend]. Three backends are available:
//!
//! * [NativeBackend], which calls into the vendor `TSCLIB.dll`.
//! * [TsplBackend], which writes TSPL commands straight to a USB or network printer.
//! * [RecordingBackend], which only remembers the calls it received (dry runs and tests).

pub use self::native::NativeBackend;
pub use self::stream::{TsplBackend, Connector, SystemConnector, Transport};
pub use self::recording::{RecordingBackend, Call, Operation};
pub use self::usb::UsbTransport;

mod native;
mod stream;
mod recording;
mod usb;
mod spooler;

use serde::{Serialize, Deserialize};
use crate::{
    Error,
    label::{LabelConfiguration, InternalFontText, Barcode, WindowsFontText}
};

/// The operations a printer library has to offer
///
/// Every method is a direct, blocking call. Implementations are not expected to be reentrant, the façade serializes access.
pub trait NativePrinterBackend {
    /// Self reported name and version of the library
    fn about(&self) -> Result<String, Error>;
    /// Printers that can be opened, no open port needed
    fn list_printers(&self) -> Result<Vec<PrinterDescriptor>, Error>;
    fn open_port(&mut self, target: &PortTarget) -> Result<(), Error>;
    fn close_port(&mut self) -> Result<(), Error>;
    /// Two character status code, see [StatusCode](crate::StatusCode)
    fn query_status(&mut self) -> Result<String, Error>;
    fn setup(&mut self, configuration: &LabelConfiguration) -> Result<(), Error>;
    fn clear_buffer(&mut self) -> Result<(), Error>;
    fn printer_font(&mut self, text: &InternalFontText) -> Result<(), Error>;
    fn barcode(&mut self, barcode: &Barcode) -> Result<(), Error>;
    fn windows_font(&mut self, text: &WindowsFontText) -> Result<(), Error>;
    /// Sends a command through the ANSI entry point, unmodified
    fn send_command(&mut self, command: &str) -> Result<(), Error>;
    /// Sends a command through the multi-byte safe entry point, unmodified
    fn send_command_utf8(&mut self, command: &str) -> Result<(), Error>;
    fn print_label(&mut self, quantity: u32, copies: u32) -> Result<(), Error>;
    fn form_feed(&mut self) -> Result<(), Error>;
}

impl<B: NativePrinterBackend + ?Sized> NativePrinterBackend for Box<B> {
    fn about(&self) -> Result<String, Error> {
        (**self).about()
    }
    fn list_printers(&self) -> Result<Vec<PrinterDescriptor>, Error> {
        (**self).list_printers()
    }
    fn open_port(&mut self, target: &PortTarget) -> Result<(), Error> {
        (**self).open_port(target)
    }
    fn close_port(&mut self) -> Result<(), Error> {
        (**self).close_port()
    }
    fn query_status(&mut self) -> Result<String, Error> {
        (**self).query_status()
    }
    fn setup(&mut self, configuration: &LabelConfiguration) -> Result<(), Error> {
        (**self).setup(configuration)
    }
    fn clear_buffer(&mut self) -> Result<(), Error> {
        (**self).clear_buffer()
    }
    fn printer_font(&mut self, text: &InternalFontText) -> Result<(), Error> {
        (**self).printer_font(text)
    }
    fn barcode(&mut self, barcode: &Barcode) -> Result<(), Error> {
        (**self).barcode(barcode)
    }
    fn windows_font(&mut self, text: &WindowsFontText) -> Result<(), Error> {
        (**self).windows_font(text)
    }
    fn send_command(&mut self, command: &str) -> Result<(), Error> {
        (**self).send_command(command)
    }
    fn send_command_utf8(&mut self, command: &str) -> Result<(), Error> {
        (**self).send_command_utf8(command)
    }
    fn print_label(&mut self, quantity: u32, copies: u32) -> Result<(), Error> {
        (**self).print_label(quantity, copies)
    }
    fn form_feed(&mut self) -> Result<(), Error> {
        (**self).form_feed()
    }
}

/// Which printer to open
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PortTarget {
    /// The first USB printer
    Usb,
    /// Position in the list returned by `list_printers`
    Index(usize),
    /// Printer (driver) name, or `host:port` for a network printer
    Name(String)
}

impl Default for PortTarget {
    fn default() -> PortTarget {
        PortTarget::Usb
    }
}

impl From<usize> for PortTarget {
    fn from(index: usize) -> PortTarget {
        PortTarget::Index(index)
    }
}

impl From<&str> for PortTarget {
    fn from(name: &str) -> PortTarget {
        PortTarget::Name(name.to_string())
    }
}

impl From<String> for PortTarget {
    fn from(name: String) -> PortTarget {
        PortTarget::Name(name)
    }
}

impl std::fmt::Display for PortTarget {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            PortTarget::Usb => write!(formatter, "usb"),
            PortTarget::Index(index) => write!(formatter, "#{}", index),
            PortTarget::Name(name) => write!(formatter, "{}", name)
        }
    }
}

/// How a discovered printer is attached
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    Usb,
    /// Installed in the operating system's print spooler
    Spooler,
    Network
}

/// A printer found by `list_printers`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PrinterDescriptor {
    /// Position in the list, usable as [PortTarget::Index]
    pub index: usize,
    pub name: String,
    pub kind: ConnectionKind,
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
    pub serial: Option<String>
}

impl PrinterDescriptor {
    /// Descriptor that only carries a name
    pub fn named<T: Into<String>>(index: usize, name: T, kind: ConnectionKind) -> PrinterDescriptor {
        PrinterDescriptor {
            index,
            name: name.into(),
            kind,
            vendor_id: None,
            product_id: None,
            serial: None
        }
    }
}

/// Picks the descriptor a target designates, if any
pub(crate) fn resolve<'a>(printers: &'a [PrinterDescriptor], target: &PortTarget) -> Option<&'a PrinterDescriptor> {
    match target {
        PortTarget::Usb => printers.iter().find(|p| p.kind == ConnectionKind::Usb),
        PortTarget::Index(index) => printers.get(*index),
        PortTarget::Name(name) => printers.iter().find(|p| {
            p.name.eq_ignore_ascii_case(name) || p.serial.as_deref() == Some(name.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printers() -> Vec<PrinterDescriptor> {
        let mut usb = PrinterDescriptor::named(1, "TTP-244 Pro", ConnectionKind::Usb);
        usb.serial = Some("A1B2C3".into());
        vec![PrinterDescriptor::named(0, "TSC TE210", ConnectionKind::Spooler), usb]
    }

    #[test]
    fn resolve_targets() {
        let printers = printers();
        assert_eq!(resolve(&printers, &PortTarget::Usb).map(|p| p.index), Some(1));
        assert_eq!(resolve(&printers, &PortTarget::Index(0)).map(|p| p.index), Some(0));
        assert_eq!(resolve(&printers, &"tsc te210".into()).map(|p| p.index), Some(0));
        assert_eq!(resolve(&printers, &"A1B2C3".into()).map(|p| p.index), Some(1));
        assert!(resolve(&printers, &PortTarget::Index(5)).is_none());
    }
}
