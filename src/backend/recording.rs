use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;
use crate::{
    Error,
    label::{LabelConfiguration, InternalFontText, Barcode, WindowsFontText}
};
use super::{NativePrinterBackend, PortTarget, PrinterDescriptor};

/// One call received by a [RecordingBackend](crate::backend::RecordingBackend), with its arguments
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    About,
    ListPrinters,
    OpenPort(PortTarget),
    ClosePort,
    QueryStatus,
    Setup(LabelConfiguration),
    ClearBuffer,
    PrinterFont(InternalFontText),
    Barcode(Barcode),
    WindowsFont(WindowsFontText),
    SendCommand(String),
    /// Bytes as they would reach the multi-byte entry point
    SendCommandUtf8(Vec<u8>),
    PrintLabel {
        quantity: u32,
        copies: u32
    },
    FormFeed
}

/// Backend operation, without arguments
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    About,
    ListPrinters,
    OpenPort,
    ClosePort,
    QueryStatus,
    Setup,
    ClearBuffer,
    PrinterFont,
    Barcode,
    WindowsFont,
    SendCommand,
    SendCommandUtf8,
    PrintLabel,
    FormFeed
}

impl Call {
    pub fn operation(&self) -> Operation {
        match self {
            Call::About => Operation::About,
            Call::ListPrinters => Operation::ListPrinters,
            Call::OpenPort(_) => Operation::OpenPort,
            Call::ClosePort => Operation::ClosePort,
            Call::QueryStatus => Operation::QueryStatus,
            Call::Setup(_) => Operation::Setup,
            Call::ClearBuffer => Operation::ClearBuffer,
            Call::PrinterFont(_) => Operation::PrinterFont,
            Call::Barcode(_) => Operation::Barcode,
            Call::WindowsFont(_) => Operation::WindowsFont,
            Call::SendCommand(_) => Operation::SendCommand,
            Call::SendCommandUtf8(_) => Operation::SendCommandUtf8,
            Call::PrintLabel{..} => Operation::PrintLabel,
            Call::FormFeed => Operation::FormFeed
        }
    }
}

#[derive(Debug)]
struct Journal {
    calls: Vec<Call>,
    /// Errors to surface on the next call of an operation. Each one is only surfaced once.
    faults: Vec<(Operation, Error)>,
    status: String,
    printers: Vec<PrinterDescriptor>,
    about: String
}

/// Backend that only remembers what it was asked to do
///
/// Useful for dry runs and tests. Clones share the same journal, so a clone kept aside can inspect the calls made through the printer that owns the original:
///
/// ```rust
/// use tsclib::{TscPrinter, PortTarget, backend::{RecordingBackend, Call}};
///
/// let backend = RecordingBackend::new();
/// let probe = backend.clone();
/// let mut printer = TscPrinter::new(backend);
/// printer.with_session(PortTarget::Usb, |printer| printer.clear_buffer())?;
/// assert_eq!(probe.calls(), vec![Call::OpenPort(PortTarget::Usb), Call::ClearBuffer, Call::ClosePort]);
/// # Ok::<(), tsclib::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct RecordingBackend {
    journal: Arc<Mutex<Journal>>
}

impl RecordingBackend {
    /// Ready printer, no printers to list
    pub fn new() -> RecordingBackend {
        RecordingBackend {
            journal: Arc::new(Mutex::new(Journal {
                calls: Vec::new(),
                faults: Vec::new(),
                status: "00".to_string(),
                printers: Vec::new(),
                about: format!("{} {} (recording)", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
            }))
        }
    }

    fn journal(&self) -> MutexGuard<'_, Journal> {
        self.journal.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.journal().calls.clone()
    }

    /// Number of calls received for an operation
    pub fn count(&self, operation: Operation) -> usize {
        self.journal().calls.iter().filter(|call| call.operation() == operation).count()
    }

    pub fn clear_calls(&self) {
        self.journal().calls.clear();
    }

    /// Makes the next call of `operation` fail with `error`
    pub fn fail_next(&self, operation: Operation, error: Error) {
        self.journal().faults.push((operation, error));
    }

    /// Status code answered to status queries
    pub fn set_status<T: Into<String>>(&self, code: T) {
        self.journal().status = code.into();
    }

    pub fn set_printers(&self, printers: Vec<PrinterDescriptor>) {
        self.journal().printers = printers;
    }

    pub fn set_about<T: Into<String>>(&self, about: T) {
        self.journal().about = about.into();
    }

    /// Records the call, then surfaces a pending fault for it if there is one
    fn record(&self, call: Call) -> Result<(), Error> {
        debug!("recorded {:?}", call);
        let operation = call.operation();
        let mut journal = self.journal();
        journal.calls.push(call);
        match journal.faults.iter().position(|(pending, _)| *pending == operation) {
            Some(position) => Err(journal.faults.remove(position).1),
            None => Ok(())
        }
    }
}

impl Default for RecordingBackend {
    fn default() -> RecordingBackend {
        RecordingBackend::new()
    }
}

impl NativePrinterBackend for RecordingBackend {
    fn about(&self) -> Result<String, Error> {
        self.record(Call::About)?;
        Ok(self.journal().about.clone())
    }

    fn list_printers(&self) -> Result<Vec<PrinterDescriptor>, Error> {
        self.record(Call::ListPrinters)?;
        Ok(self.journal().printers.clone())
    }

    fn open_port(&mut self, target: &PortTarget) -> Result<(), Error> {
        self.record(Call::OpenPort(target.clone()))
    }

    fn close_port(&mut self) -> Result<(), Error> {
        self.record(Call::ClosePort)
    }

    fn query_status(&mut self) -> Result<String, Error> {
        self.record(Call::QueryStatus)?;
        Ok(self.journal().status.clone())
    }

    fn setup(&mut self, configuration: &LabelConfiguration) -> Result<(), Error> {
        self.record(Call::Setup(configuration.clone()))
    }

    fn clear_buffer(&mut self) -> Result<(), Error> {
        self.record(Call::ClearBuffer)
    }

    fn printer_font(&mut self, text: &InternalFontText) -> Result<(), Error> {
        self.record(Call::PrinterFont(text.clone()))
    }

    fn barcode(&mut self, barcode: &Barcode) -> Result<(), Error> {
        self.record(Call::Barcode(barcode.clone()))
    }

    fn windows_font(&mut self, text: &WindowsFontText) -> Result<(), Error> {
        self.record(Call::WindowsFont(text.clone()))
    }

    fn send_command(&mut self, command: &str) -> Result<(), Error> {
        self.record(Call::SendCommand(command.to_string()))
    }

    fn send_command_utf8(&mut self, command: &str) -> Result<(), Error> {
        self.record(Call::SendCommandUtf8(command.as_bytes().to_vec()))
    }

    fn print_label(&mut self, quantity: u32, copies: u32) -> Result<(), Error> {
        self.record(Call::PrintLabel{quantity, copies})
    }

    fn form_feed(&mut self) -> Result<(), Error> {
        self.record(Call::FormFeed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faults_are_surfaced_once() {
        let mut backend = RecordingBackend::new();
        backend.fail_next(Operation::ClearBuffer, Error::Printer("rejected".into()));
        assert!(backend.open_port(&PortTarget::Usb).is_ok());
        assert!(matches!(backend.clear_buffer(), Err(Error::Printer(_))));
        assert!(backend.clear_buffer().is_ok());
        assert_eq!(backend.count(Operation::ClearBuffer), 2);
    }

    #[test]
    fn clones_share_the_journal() {
        let backend = RecordingBackend::new();
        let probe = backend.clone();
        backend.set_status("08");
        let mut backend = backend;
        assert_eq!(backend.query_status().unwrap(), "08");
        assert_eq!(probe.calls(), vec![Call::QueryStatus]);
        probe.clear_calls();
        assert!(backend.calls().is_empty());
    }
}
