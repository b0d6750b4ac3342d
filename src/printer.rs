use std::ops::{Deref, DerefMut};

use log::{debug, info, warn};
use crate::{
    Error, StatusCode, LabelJob, Element,
    backend::{NativePrinterBackend, PortTarget, PrinterDescriptor},
    label::{LabelConfiguration, InternalFontText, Barcode, WindowsFontText}
};

/// Port state of a [TscPrinter](crate::TscPrinter)
#[derive(Clone, Debug, PartialEq, Eq)]
enum PortState {
    Closed,
    Open {
        target: PortTarget
    }
}

/// Main tsclib structure
///
/// The printer owns a [backend](crate::backend) and forwards every operation to it, one blocking call at a time. Apart from [open](TscPrinter::open), [list_printers](TscPrinter::list_printers) and [about_info](TscPrinter::about_info), operations need an open port and fail with [NotOpen](crate::Error::NotOpen) otherwise.
///
/// ```rust
/// use tsclib::{TscPrinter, PortTarget, backend::RecordingBackend, label::*};
///
/// let mut printer = TscPrinter::new(RecordingBackend::new());
/// printer.with_session(PortTarget::Usb, |printer| {
///     printer.setup_label(&LabelConfiguration::builder(70.0, 40.0).density(10).build())?;
///     printer.clear_buffer()?;
///     printer.add_internal_font_text(&InternalFontText::new(50, 50, "3", "Internal Font Test"))?;
///     printer.add_barcode(&Barcode::new(50, 100, "128", 70, "TEST12345"))?;
///     printer.print_label(1, 1)
/// })?;
/// # Ok::<(), tsclib::Error>(())
/// ```
pub struct TscPrinter<B: NativePrinterBackend> {
    backend: B,
    state: PortState,
    /// If any status other than ready should be an error
    strict_status: bool
}

impl<B: NativePrinterBackend> TscPrinter<B> {
    /// Creates a printer with a closed port
    pub fn new(backend: B) -> TscPrinter<B> {
        TscPrinter {
            backend,
            state: PortState::Closed,
            strict_status: false
        }
    }

    /// Enables or disables strict status checks.
    ///
    /// By default, [get_status](TscPrinter::get_status) hands back whatever the printer reports and leaves the decision to the caller. In strict mode, any status other than [Ready](crate::StatusCode::Ready) (including an unreadable one) becomes an [Error::NotReady](crate::Error::NotReady).
    pub fn set_strict_status(&mut self, state: bool) {
        self.strict_status = state;
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_open(&self) -> bool {
        self.state != PortState::Closed
    }

    /// Target of the open port, if any
    pub fn target(&self) -> Option<&PortTarget> {
        match &self.state {
            PortState::Open{target} => Some(target),
            PortState::Closed => None
        }
    }

    /// Opens the port to the printer.
    ///
    /// Opening an already open printer does nothing, the first port stays in use.
    pub fn open<T: Into<PortTarget>>(&mut self, target: T) -> Result<(), Error> {
        let target = target.into();
        if let PortState::Open{target: current} = &self.state {
            warn!("Port {} is already open, ignoring request for {}", current, target);
            return Ok(());
        }
        self.backend.open_port(&target)?;
        info!("Opened port {}", target);
        self.state = PortState::Open{target};
        Ok(())
    }

    /// Closes the port. Calling it on a closed printer does nothing.
    ///
    /// Never fails: if the backend reports a problem while closing, it is logged and the port is considered closed anyway.
    pub fn close(&mut self) {
        if let PortState::Open{target} = std::mem::replace(&mut self.state, PortState::Closed) {
            match self.backend.close_port() {
                Ok(()) => info!("Closed port {}", target),
                Err(e) => warn!("Closing port {} failed: {}", target, e)
            }
        }
    }

    /// Opens the port and hands back a guard that closes it when dropped
    ///
    /// If the port was already open, the guard leaves it open: only the code that opened a port closes it.
    ///
    /// ```rust
    /// use tsclib::{TscPrinter, PortTarget, backend::RecordingBackend};
    ///
    /// let mut printer = TscPrinter::new(RecordingBackend::new());
    /// {
    ///     let mut session = printer.session(PortTarget::Index(0))?;
    ///     session.send_raw_command("BOX 50,350,600,450,3")?;
    /// }
    /// assert!(!printer.is_open());
    /// # Ok::<(), tsclib::Error>(())
    /// ```
    pub fn session<T: Into<PortTarget>>(&mut self, target: T) -> Result<Session<'_, B>, Error> {
        let owned = !self.is_open();
        self.open(target)?;
        Ok(Session {
            printer: self,
            owned
        })
    }

    /// Runs `job` with an open port, closing it afterwards whatever happens
    ///
    /// A port that was already open before the call stays open, see [session](TscPrinter::session).
    pub fn with_session<T, R, F>(&mut self, target: T, job: F) -> Result<R, Error>
    where
        T: Into<PortTarget>,
        F: FnOnce(&mut TscPrinter<B>) -> Result<R, Error>
    {
        let mut session = self.session(target)?;
        job(&mut *session)
    }

    fn ensure_open(&self) -> Result<(), Error> {
        if self.is_open() {
            Ok(())
        } else {
            Err(Error::NotOpen)
        }
    }

    /// Reads the printer status.
    ///
    /// A failing query is reported as [Unknown](crate::StatusCode::Unknown) instead of an error, unless strict status checks are enabled (see [set_strict_status](TscPrinter::set_strict_status)).
    pub fn get_status(&mut self) -> Result<StatusCode, Error> {
        self.ensure_open()?;
        let status = match self.backend.query_status() {
            Ok(code) => StatusCode::from_code(code),
            Err(e) => {
                warn!("Status query failed: {}", e);
                StatusCode::Unknown
            }
        };
        debug!("Printer status {}", status);
        if self.strict_status && !status.is_ready() {
            return Err(Error::NotReady(status));
        }
        Ok(status)
    }

    /// Sets the label geometry and print settings. Required before filling the buffer.
    pub fn setup_label(&mut self, configuration: &LabelConfiguration) -> Result<(), Error> {
        self.ensure_open()?;
        self.backend.setup(configuration)
    }

    /// Clears the printer's image buffer
    pub fn clear_buffer(&mut self) -> Result<(), Error> {
        self.ensure_open()?;
        self.backend.clear_buffer()
    }

    pub fn add_internal_font_text(&mut self, text: &InternalFontText) -> Result<(), Error> {
        self.ensure_open()?;
        text.validate()?;
        self.backend.printer_font(text)
    }

    pub fn add_barcode(&mut self, barcode: &Barcode) -> Result<(), Error> {
        self.ensure_open()?;
        barcode.validate()?;
        self.backend.barcode(barcode)
    }

    pub fn add_windows_font_text(&mut self, text: &WindowsFontText) -> Result<(), Error> {
        self.ensure_open()?;
        text.validate()?;
        self.backend.windows_font(text)
    }

    /// Sends a command as is
    ///
    /// No checks at all, the escape hatch for anything this crate has no method for.
    pub fn send_raw_command<T: AsRef<str>>(&mut self, command: T) -> Result<(), Error> {
        self.ensure_open()?;
        self.backend.send_command(command.as_ref())
    }

    /// Sends a command as is, through the multi-byte safe entry point
    ///
    /// The printer must have been switched to UTF-8 first (`CODEPAGE UTF-8`) for text to come out right.
    pub fn send_raw_command_utf8<T: AsRef<str>>(&mut self, command: T) -> Result<(), Error> {
        self.ensure_open()?;
        self.backend.send_command_utf8(command.as_ref())
    }

    /// Prints the buffer. `quantity` labels, each printed `copies` times.
    pub fn print_label(&mut self, quantity: u32, copies: u32) -> Result<(), Error> {
        self.ensure_open()?;
        if quantity == 0 || copies == 0 {
            return Err(Error::InvalidParameter("quantity and copies must be at least 1".to_string()));
        }
        self.backend.print_label(quantity, copies)
    }

    /// Feeds one blank label
    pub fn form_feed(&mut self) -> Result<(), Error> {
        self.ensure_open()?;
        self.backend.form_feed()
    }

    /// Sets up the label, fills the buffer with the job's elements and prints it
    pub fn print_job(&mut self, job: &LabelJob, quantity: u32, copies: u32) -> Result<(), Error> {
        self.setup_label(&job.label)?;
        self.clear_buffer()?;
        for element in job.elements.iter() {
            match element {
                Element::InternalText(text) => self.add_internal_font_text(text)?,
                Element::Barcode(barcode) => self.add_barcode(barcode)?,
                Element::WindowsText(text) => self.add_windows_font_text(text)?,
                Element::Command{command} => self.send_raw_command(command)?,
                Element::CommandUtf8{command} => self.send_raw_command_utf8(command)?
            }
        }
        self.print_label(quantity, copies)
    }

    /// Printers the backend can reach, no open port needed
    pub fn list_printers(&self) -> Result<Vec<PrinterDescriptor>, Error> {
        self.backend.list_printers()
    }

    /// Name and version reported by the backend, no open port needed
    pub fn about_info(&self) -> Result<String, Error> {
        self.backend.about()
    }
}

impl<B: NativePrinterBackend> Drop for TscPrinter<B> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<B: NativePrinterBackend + std::fmt::Debug> std::fmt::Debug for TscPrinter<B> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        formatter.debug_struct("TscPrinter")
            .field("backend", &self.backend)
            .field("target", &self.target())
            .field("strict_status", &self.strict_status)
            .finish()
    }
}

/// An open port, closed when the session goes out of scope
///
/// Created by [session](TscPrinter::session). Gives access to every method of the [TscPrinter](crate::TscPrinter).
pub struct Session<'a, B: NativePrinterBackend> {
    printer: &'a mut TscPrinter<B>,
    /// Whether this session opened the port
    owned: bool
}

impl<'a, B: NativePrinterBackend> Deref for Session<'a, B> {
    type Target = TscPrinter<B>;
    fn deref(&self) -> &TscPrinter<B> {
        self.printer
    }
}

impl<'a, B: NativePrinterBackend> DerefMut for Session<'a, B> {
    fn deref_mut(&mut self) -> &mut TscPrinter<B> {
        self.printer
    }
}

impl<'a, B: NativePrinterBackend> Drop for Session<'a, B> {
    fn drop(&mut self) {
        if self.owned {
            self.printer.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{RecordingBackend, Call, Operation, PrinterDescriptor, ConnectionKind};

    fn printer() -> (TscPrinter<RecordingBackend>, RecordingBackend) {
        let backend = RecordingBackend::new();
        let probe = backend.clone();
        (TscPrinter::new(backend), probe)
    }

    #[test]
    fn second_open_is_a_no_op() {
        let (mut printer, probe) = printer();
        printer.open(PortTarget::Usb).unwrap();
        printer.open(PortTarget::Index(3)).unwrap();
        assert_eq!(printer.target(), Some(&PortTarget::Usb));
        assert_eq!(probe.count(Operation::OpenPort), 1);
    }

    #[test]
    fn close_is_idempotent() {
        let (mut printer, probe) = printer();
        printer.close();
        printer.open(PortTarget::Index(0)).unwrap();
        printer.close();
        printer.close();
        drop(printer);
        assert_eq!(probe.count(Operation::ClosePort), 1);
    }

    #[test]
    fn failing_close_is_swallowed() {
        let (mut printer, probe) = printer();
        probe.fail_next(Operation::ClosePort, Error::Connection("cable pulled".into()));
        printer.open(PortTarget::Index(0)).unwrap();
        printer.close();
        assert!(!printer.is_open());
    }

    #[test]
    fn failed_open_stays_closed() {
        let (mut printer, probe) = printer();
        probe.fail_next(Operation::OpenPort, Error::Connection("busy".into()));
        assert!(matches!(printer.open(PortTarget::Index(0)), Err(Error::Connection(_))));
        assert!(!printer.is_open());
        drop(printer);
        assert_eq!(probe.count(Operation::ClosePort), 0);
    }

    #[test]
    fn commands_need_an_open_port() {
        let (mut printer, probe) = printer();
        assert!(matches!(printer.clear_buffer(), Err(Error::NotOpen)));
        assert!(matches!(printer.get_status(), Err(Error::NotOpen)));
        assert!(matches!(printer.send_raw_command("CLS"), Err(Error::NotOpen)));
        assert!(probe.calls().is_empty());
    }

    #[test]
    fn list_and_about_without_port() {
        let (printer, probe) = printer();
        probe.set_printers(vec![PrinterDescriptor::named(0, "TSC TE210", ConnectionKind::Spooler)]);
        probe.set_about("TSCLIB 2.2.2");
        assert_eq!(printer.list_printers().unwrap().len(), 1);
        assert_eq!(printer.about_info().unwrap(), "TSCLIB 2.2.2");
        assert!(!printer.is_open());
        assert_eq!(probe.calls(), vec![Call::ListPrinters, Call::About]);
    }

    #[test]
    fn status_failures_become_unknown() {
        let (mut printer, probe) = printer();
        printer.open(PortTarget::Index(0)).unwrap();
        probe.set_status("04");
        assert_eq!(printer.get_status().unwrap(), StatusCode::OutOfPaper);
        probe.fail_next(Operation::QueryStatus, Error::Printer("no answer".into()));
        assert_eq!(printer.get_status().unwrap(), StatusCode::Unknown);
    }

    #[test]
    fn strict_status() {
        let (mut printer, probe) = printer();
        printer.set_strict_status(true);
        printer.open(PortTarget::Index(0)).unwrap();
        assert_eq!(printer.get_status().unwrap(), StatusCode::Ready);
        probe.set_status("01");
        match printer.get_status() {
            Err(Error::NotReady(status)) => assert_eq!(status, StatusCode::HeadOpen),
            other => panic!("unexpected {:?}", other)
        }
        probe.fail_next(Operation::QueryStatus, Error::Printer("no answer".into()));
        assert!(matches!(printer.get_status(), Err(Error::NotReady(StatusCode::Unknown))));
    }

    #[test]
    fn invalid_elements_are_not_forwarded() {
        let (mut printer, probe) = printer();
        printer.open(PortTarget::Index(0)).unwrap();
        assert!(matches!(printer.add_barcode(&Barcode::new(0, 0, "128", 70, "")), Err(Error::InvalidParameter(_))));
        assert!(matches!(printer.print_label(0, 1), Err(Error::InvalidParameter(_))));
        assert_eq!(probe.calls(), vec![Call::OpenPort(PortTarget::Index(0))]);
    }

    #[test]
    fn session_closes_on_error() {
        let (mut printer, probe) = printer();
        probe.fail_next(Operation::Barcode, Error::Printer("bad symbology".into()));
        let result = printer.with_session(PortTarget::Usb, |printer| {
            printer.clear_buffer()?;
            printer.add_barcode(&Barcode::new(0, 0, "XX", 70, "1"))?;
            printer.print_label(1, 1)
        });
        assert!(matches!(result, Err(Error::Printer(_))));
        assert!(!printer.is_open());
        assert_eq!(probe.count(Operation::ClosePort), 1);
        assert_eq!(probe.count(Operation::PrintLabel), 0);
    }

    #[test]
    fn form_feed_needs_an_open_port() {
        let (mut printer, probe) = printer();
        assert!(matches!(printer.form_feed(), Err(Error::NotOpen)));
        printer.open(PortTarget::Usb).unwrap();
        printer.form_feed().unwrap();
        assert_eq!(probe.calls(), vec![Call::OpenPort(PortTarget::Usb), Call::FormFeed]);
    }

    #[test]
    fn session_leaves_an_earlier_port_open() {
        let (mut printer, probe) = printer();
        printer.open(PortTarget::Index(0)).unwrap();
        printer.with_session(PortTarget::Usb, |printer| printer.clear_buffer()).unwrap();
        assert_eq!(printer.target(), Some(&PortTarget::Index(0)));
        assert_eq!(probe.count(Operation::ClosePort), 0);
        printer.close();
        assert_eq!(probe.count(Operation::ClosePort), 1);
    }

    #[test]
    fn session_guard_closes_once() {
        let (mut printer, probe) = printer();
        {
            let mut session = printer.session(PortTarget::Usb).unwrap();
            session.clear_buffer().unwrap();
            session.close();
        }
        drop(printer);
        assert_eq!(probe.count(Operation::ClosePort), 1);
    }
}
