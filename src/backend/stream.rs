use std::io::{self, Read, Write};
use std::net::{IpAddr, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use codepage_437::{IntoCp437, CP437_CONTROL};
use log::debug;
use crate::{
    Error, StatusCode,
    label::{LabelConfiguration, InternalFontText, Barcode, WindowsFontText},
    tspl::Command
};
use super::{NativePrinterBackend, PortTarget, PrinterDescriptor, ConnectionKind, UsbTransport, resolve, usb};

/// Raw port printers listen on
pub const DEFAULT_NETWORK_PORT: u16 = 9100;

/// A byte link to a printer
pub trait Transport: io::Read + io::Write {
    /// Something that identifies the other end, for logging
    fn name(&self) -> Option<String>;
}

impl Transport for TcpStream {
    fn name(&self) -> Option<String> {
        self.peer_addr().map(|addr| format!("{}", addr)).ok()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn name(&self) -> Option<String> {
        (**self).name()
    }
}

/// Knows where printers are and how to reach them
pub trait Connector {
    type Transport: Transport;

    /// Printers this connector can reach
    fn discover(&self) -> Result<Vec<PrinterDescriptor>, Error>;
    fn connect(&mut self, target: &PortTarget) -> Result<Self::Transport, Error>;
}

/// Reaches TSC printers on the USB bus, or on the network by address
///
/// Named targets that look like an ip address (optionally with a port) are reached over TCP, other names are matched against the product name or serial number of the USB printers.
#[derive(Clone, Debug)]
pub struct SystemConnector {
    /// Applies to USB transfers and TCP connect/read/write
    timeout: Duration,
    /// Used when a network target has no port
    network_port: u16
}

impl SystemConnector {
    /// Two seconds timeout, network printers on port 9100
    pub fn new() -> SystemConnector {
        SystemConnector {
            timeout: Duration::from_secs(2),
            network_port: DEFAULT_NETWORK_PORT
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> SystemConnector {
        self.timeout = timeout;
        self
    }

    pub fn with_network_port(mut self, port: u16) -> SystemConnector {
        self.network_port = port;
        self
    }

    fn network_address(&self, name: &str) -> Option<SocketAddr> {
        if let Ok(ip) = name.parse::<IpAddr>() {
            return Some(SocketAddr::new(ip, self.network_port));
        }
        if name.contains(':') {
            name.to_socket_addrs().ok()?.next()
        } else {
            None
        }
    }
}

impl Default for SystemConnector {
    fn default() -> SystemConnector {
        SystemConnector::new()
    }
}

impl Connector for SystemConnector {
    type Transport = Box<dyn Transport>;

    fn discover(&self) -> Result<Vec<PrinterDescriptor>, Error> {
        usb::usb_printers()
    }

    fn connect(&mut self, target: &PortTarget) -> Result<Box<dyn Transport>, Error> {
        match target {
            PortTarget::Usb => Ok(Box::new(UsbTransport::open(0, self.timeout)?)),
            PortTarget::Index(index) => Ok(Box::new(UsbTransport::open(*index, self.timeout)?)),
            PortTarget::Name(name) => {
                if let Some(address) = self.network_address(name) {
                    let stream = TcpStream::connect_timeout(&address, self.timeout)
                        .map_err(|e| Error::Connection(format!("{}: {}", address, e)))?;
                    stream.set_read_timeout(Some(self.timeout))?;
                    stream.set_write_timeout(Some(self.timeout))?;
                    return Ok(Box::new(stream));
                }
                let printers = self.discover()?;
                match resolve(&printers, target) {
                    Some(printer) if printer.kind == ConnectionKind::Usb => Ok(Box::new(UsbTransport::open(printer.index, self.timeout)?)),
                    _ => Err(Error::Connection(format!("no printer named {}", name)))
                }
            }
        }
    }
}

/// Backend writing TSPL straight to the printer
///
/// Every operation becomes one or more TSPL command lines. Text rendered with Windows fonts needs the vendor driver, so [windows_font](NativePrinterBackend::windows_font) is not supported here.
///
/// Raw commands go out byte for byte. TSPL is line based, so a command that does not end its line yet is followed by `\r\n`.
///
/// ```rust,no_run
/// use tsclib::{TscPrinter, PortTarget, backend::TsplBackend};
///
/// let mut printer = TscPrinter::new(TsplBackend::system());
/// printer.with_session(PortTarget::from("192.168.1.40"), |printer| {
///     printer.send_raw_command("SELFTEST")
/// })?;
/// # Ok::<(), tsclib::Error>(())
/// ```
pub struct TsplBackend<C: Connector = SystemConnector> {
    connector: C,
    transport: Option<C::Transport>
}

impl<C: Connector> TsplBackend<C> {
    pub fn new(connector: C) -> TsplBackend<C> {
        TsplBackend {
            connector,
            transport: None
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    fn transport(&mut self) -> Result<&mut C::Transport, Error> {
        self.transport.as_mut().ok_or(Error::NotOpen)
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let transport = self.transport()?;
        transport.write_all(bytes)?;
        transport.flush()?;
        Ok(())
    }

    fn write(&mut self, command: &Command) -> Result<(), Error> {
        debug!("TSPL {:?}", command.to_tspl());
        self.write_raw(&command.as_bytes())
    }

    /// Sends a command line, terminating it if the caller did not
    fn write_line(&mut self, mut bytes: Vec<u8>) -> Result<(), Error> {
        if !bytes.ends_with(b"\n") {
            bytes.extend_from_slice(b"\r\n");
        }
        self.write_raw(&bytes)
    }
}

impl TsplBackend<SystemConnector> {
    /// USB and network printers, with the default timeouts
    pub fn system() -> TsplBackend<SystemConnector> {
        TsplBackend::new(SystemConnector::new())
    }
}

impl<C: Connector> NativePrinterBackend for TsplBackend<C> {
    fn about(&self) -> Result<String, Error> {
        let link = match &self.transport {
            Some(transport) => transport.name().unwrap_or_else(|| "unnamed link".to_string()),
            None => "no open port".to_string()
        };
        Ok(format!("{} {} (TSPL, {})", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), link))
    }

    fn list_printers(&self) -> Result<Vec<PrinterDescriptor>, Error> {
        self.connector.discover()
    }

    fn open_port(&mut self, target: &PortTarget) -> Result<(), Error> {
        let transport = self.connector.connect(target)?;
        debug!("Connected to {}", transport.name().unwrap_or_else(|| target.to_string()));
        self.transport = Some(transport);
        Ok(())
    }

    fn close_port(&mut self) -> Result<(), Error> {
        match self.transport.take() {
            Some(mut transport) => Ok(transport.flush()?),
            None => Ok(())
        }
    }

    fn query_status(&mut self) -> Result<String, Error> {
        self.write(&Command::StatusQuery)?;
        let mut answer = [0u8; 1];
        self.transport()?.read_exact(&mut answer)?;
        Ok(StatusCode::from_byte(answer[0]).code().to_string())
    }

    fn setup(&mut self, configuration: &LabelConfiguration) -> Result<(), Error> {
        for command in Command::setup(configuration) {
            self.write(&command)?;
        }
        Ok(())
    }

    fn clear_buffer(&mut self) -> Result<(), Error> {
        self.write(&Command::Cls)
    }

    fn printer_font(&mut self, text: &InternalFontText) -> Result<(), Error> {
        self.write(&Command::Text(text.clone()))
    }

    fn barcode(&mut self, barcode: &Barcode) -> Result<(), Error> {
        self.write(&Command::Barcode(barcode.clone()))
    }

    fn windows_font(&mut self, _text: &WindowsFontText) -> Result<(), Error> {
        Err(Error::Unsupported("Windows font text over a raw TSPL link".to_string()))
    }

    fn send_command(&mut self, command: &str) -> Result<(), Error> {
        let bytes = command.to_string().into_cp437(&CP437_CONTROL).map_err(|e| Error::Encoding(e.into_string()))?;
        self.write_line(bytes)
    }

    fn send_command_utf8(&mut self, command: &str) -> Result<(), Error> {
        self.write_line(command.as_bytes().to_vec())
    }

    fn print_label(&mut self, quantity: u32, copies: u32) -> Result<(), Error> {
        self.write(&Command::Print{quantity, copies})
    }

    fn form_feed(&mut self) -> Result<(), Error> {
        self.write(&Command::FormFeed)
    }
}

impl<C: Connector + std::fmt::Debug> std::fmt::Debug for TsplBackend<C> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        formatter.debug_struct("TsplBackend")
            .field("connector", &self.connector)
            .field("open", &self.transport.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use crate::label::Rotation;

    /// Captures written bytes, answers reads from a fixed buffer
    struct Loopback {
        written: Arc<Mutex<Vec<u8>>>,
        answer: io::Cursor<Vec<u8>>
    }

    impl io::Read for Loopback {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.answer.read(buf)
        }
    }

    impl io::Write for Loopback {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Transport for Loopback {
        fn name(&self) -> Option<String> {
            Some("loopback".to_string())
        }
    }

    #[derive(Default)]
    struct LoopbackConnector {
        written: Arc<Mutex<Vec<u8>>>,
        answer: Vec<u8>
    }

    impl Connector for LoopbackConnector {
        type Transport = Loopback;

        fn discover(&self) -> Result<Vec<PrinterDescriptor>, Error> {
            Ok(vec![PrinterDescriptor::named(0, "loopback", ConnectionKind::Network)])
        }

        fn connect(&mut self, _target: &PortTarget) -> Result<Loopback, Error> {
            Ok(Loopback {
                written: self.written.clone(),
                answer: io::Cursor::new(self.answer.clone())
            })
        }
    }

    fn written(connector: &LoopbackConnector) -> String {
        String::from_utf8(connector.written.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn label_is_formatted_as_tspl() {
        let mut backend = TsplBackend::new(LoopbackConnector::default());
        backend.open_port(&PortTarget::Usb).unwrap();
        let label = LabelConfiguration::builder(70.0, 40.0).speed(4.0).density(10).gap(3.0, 0.0).build();
        backend.setup(&label).unwrap();
        backend.clear_buffer().unwrap();
        backend.printer_font(&InternalFontText::new(50, 50, "3", "Internal Font Test").rotation(Rotation::Deg0)).unwrap();
        backend.barcode(&Barcode::new(50, 100, "128", 70, "TEST12345")).unwrap();
        backend.send_command("BOX 50,350,600,450,3").unwrap();
        backend.print_label(1, 1).unwrap();
        backend.form_feed().unwrap();
        backend.close_port().unwrap();
        assert_eq!(written(backend.connector()), concat!(
            "SIZE 70 mm, 40 mm\r\n",
            "GAP 3 mm, 0 mm\r\n",
            "SPEED 4\r\n",
            "DENSITY 10\r\n",
            "CLS\r\n",
            "TEXT 50,50,\"3\",0,1,1,\"Internal Font Test\"\r\n",
            "BARCODE 50,100,\"128\",70,1,0,2,1,\"TEST12345\"\r\n",
            "BOX 50,350,600,450,3\r\n",
            "PRINT 1,1\r\n",
            "FORMFEED\r\n"
        ));
    }

    #[test]
    fn utf8_command_bytes_are_kept() {
        let mut backend = TsplBackend::new(LoopbackConnector::default());
        backend.open_port(&PortTarget::Usb).unwrap();
        let command = "TEXT 50,500,\"KAIU.TTF\",0,12,12,\"測試中文 UTF-8 Text\"\n";
        backend.send_command_utf8(command).unwrap();
        assert_eq!(written(backend.connector()), command);
        assert!(matches!(backend.send_command("測試"), Err(Error::Encoding(_))));
    }

    #[test]
    fn unterminated_commands_get_a_line_ending() {
        let mut backend = TsplBackend::new(LoopbackConnector::default());
        backend.open_port(&PortTarget::Usb).unwrap();
        let command = "TEXT 50,500,\"KAIU.TTF\",0,12,12,\"測試\"";
        backend.send_command_utf8(command).unwrap();
        let mut expected = command.as_bytes().to_vec();
        expected.extend_from_slice(b"\r\n");
        assert_eq!(*backend.connector().written.lock().unwrap(), expected);
    }

    #[test]
    fn status_byte_is_read_back() {
        let connector = LoopbackConnector {
            answer: vec![0x04],
            ..LoopbackConnector::default()
        };
        let mut backend = TsplBackend::new(connector);
        backend.open_port(&PortTarget::Usb).unwrap();
        assert_eq!(backend.query_status().unwrap(), "04");
        assert_eq!(written(backend.connector()).as_bytes(), &[0x1b, b'!', b'?']);
        // Nothing more to read
        assert!(matches!(backend.query_status(), Err(Error::Io(_))));
    }

    #[test]
    fn closed_backend_refuses_commands() {
        let mut backend = TsplBackend::new(LoopbackConnector::default());
        assert!(matches!(backend.clear_buffer(), Err(Error::NotOpen)));
        assert!(backend.close_port().is_ok());
        assert!(matches!(backend.windows_font(&WindowsFontText::new(0, 0, 48, "Arial", "x")), Err(Error::Unsupported(_))));
    }

    #[test]
    fn network_targets() {
        let connector = SystemConnector::new();
        assert_eq!(connector.network_address("10.0.0.7"), Some("10.0.0.7:9100".parse().unwrap()));
        assert_eq!(connector.network_address("10.0.0.7:6101"), Some("10.0.0.7:6101".parse().unwrap()));
        assert_eq!(connector.network_address("TTP-244 Pro"), None);
    }
}
