//! Library for controlling TSC label printers with rust
//!
//! The [TscPrinter](crate::TscPrinter) structure is a thin façade over a printer [backend](crate::backend): it opens and closes the port, and forwards label setup, buffer and print commands one blocking call at a time. The backend can be the vendor's `TSCLIB.dll`, a direct TSPL link over USB or the network, or a recording fake.
//!
//! ```rust,no_run
//! use tsclib::{TscPrinter, LibraryConfig, PortTarget, StatusCode, backend::NativeBackend};
//! use tsclib::label::{LabelConfiguration, InternalFontText, Barcode};
//!
//! // Fails with Error::LibraryNotFound if TSCLIB.dll is nowhere to be found
//! let backend = NativeBackend::load(&LibraryConfig::default())?;
//! let mut printer = TscPrinter::new(backend);
//! printer.with_session(PortTarget::Usb, |printer| {
//!     if printer.get_status()? != StatusCode::Ready {
//!         println!("Printer not ready");
//!     }
//!     printer.setup_label(&LabelConfiguration::builder(70.0, 40.0).speed(4.0).density(10).gap(3.0, 0.0).build())?;
//!     printer.clear_buffer()?;
//!     printer.add_internal_font_text(&InternalFontText::new(50, 50, "3", "Internal Font Test"))?;
//!     printer.add_barcode(&Barcode::new(50, 100, "128", 70, "TEST12345"))?;
//!     printer.print_label(1, 1)
//! })?;
//! # Ok::<(), tsclib::Error>(())
//! ```
//!
//! The port is closed when the closure returns, even if one of the commands failed.
//!
//! ## Errors
//!
//! Every failure ends up as an [Error](crate::Error). [Error::kind](crate::Error::kind) sorts them by what the caller can do about it: fix the installation (library not found), fix the connection, or fix the input or the printer itself (paper, ribbon, head).
//!
//! ## Status
//!
//! [get_status](crate::TscPrinter::get_status) returns a [StatusCode](crate::StatusCode) and leaves the decision to the caller. Enable [strict status](crate::TscPrinter::set_strict_status) to have anything but a ready printer turned into an error.
//!
//! ### Label jobs
//!
//! A [LabelJob](crate::LabelJob) stores a label configuration and its elements, so the same label can be printed again with [print_job](crate::TscPrinter::print_job), or stored as json.

pub use printer::{TscPrinter, Session};
pub use backend::{PortTarget, PrinterDescriptor, ConnectionKind, NativePrinterBackend};
pub use status::StatusCode;
pub use job::{LabelJob, Element};
pub use config::{LibraryConfig, LibraryConfigBuilder};
pub use error::{Error, ErrorKind};

pub mod backend;
/// Label settings and the elements drawn on a label
pub mod label;
/// Raw TSPL commands
pub mod tspl;

mod printer;
mod status;
mod job;
mod config;
mod error;
