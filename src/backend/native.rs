use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::path::{Path, PathBuf};

use codepage_437::{IntoCp437, CP437_CONTROL};
use libloading::{Library, Symbol};
use log::{debug, info};
use crate::{
    Error, LibraryConfig,
    label::{self, LabelConfiguration, InternalFontText, Barcode, WindowsFontText}
};
use super::{NativePrinterBackend, PortTarget, PrinterDescriptor, resolve, spooler, usb};

type NoArgs = unsafe extern "system" fn() -> c_int;
type OneArg = unsafe extern "system" fn(*const c_char) -> c_int;
type TwoArgs = unsafe extern "system" fn(*const c_char, *const c_char) -> c_int;
type SevenArgs = unsafe extern "system" fn(
    *const c_char, *const c_char, *const c_char, *const c_char,
    *const c_char, *const c_char, *const c_char
) -> c_int;
type NineArgs = unsafe extern "system" fn(
    *const c_char, *const c_char, *const c_char, *const c_char, *const c_char,
    *const c_char, *const c_char, *const c_char, *const c_char
) -> c_int;
type WindowsFontFn = unsafe extern "system" fn(
    c_int, c_int, c_int, c_int, c_int, c_int, *const c_char, *const c_char
) -> c_int;

/// Value returned by the library exports on success
const SUCCESS: c_int = 1;

/// Backend calling into the vendor `TSCLIB.dll`
///
/// ```rust,no_run
/// use tsclib::{TscPrinter, LibraryConfig, backend::NativeBackend};
///
/// let backend = NativeBackend::load(&LibraryConfig::default())?;
/// let mut printer = TscPrinter::new(backend);
/// println!("{}", printer.about_info()?);
/// # Ok::<(), tsclib::Error>(())
/// ```
///
/// The ANSI entry points receive their text in code page 437, the printer's default `CODEPAGE`. Use [send_raw_command_utf8](crate::TscPrinter::send_raw_command_utf8) for anything else.
pub struct NativeBackend {
    library: Library,
    path: PathBuf
}

impl NativeBackend {
    /// Finds and loads the library
    ///
    /// Fails with [LibraryNotFound](crate::Error::LibraryNotFound) if no candidate location holds the file, or if it cannot be loaded.
    pub fn load(config: &LibraryConfig) -> Result<NativeBackend, Error> {
        let (path, found) = config.locate();
        if !found {
            return Err(Error::LibraryNotFound {
                path,
                detail: "no such file".to_string()
            });
        }
        NativeBackend::load_from(&path)
    }

    /// Loads the library at exactly this location
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<NativeBackend, Error> {
        let path = path.as_ref().to_path_buf();
        // Loading runs the library initialisation code, which we have to trust
        let library = unsafe { Library::new(&path) }.map_err(|e| Error::LibraryNotFound {
            path: path.clone(),
            detail: e.to_string()
        })?;
        info!("Loaded printer library from {}", path.display());
        Ok(NativeBackend {
            library,
            path
        })
    }

    /// Location the library was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn symbol<T>(&self, name: &str) -> Result<Symbol<'_, T>, Error> {
        debug!("{} -> {}", self.path.display(), name);
        unsafe { self.library.get::<T>(name.as_bytes()) }
            .map_err(|_| Error::Unsupported(format!("{} (not exported by {})", name, self.path.display())))
    }
}

fn check(name: &str, result: c_int) -> Result<(), Error> {
    if result == SUCCESS {
        Ok(())
    } else {
        Err(Error::Printer(format!("{} returned {}", name, result)))
    }
}

/// Text for the ANSI entry points
fn ansi<T: Into<String>>(value: T) -> Result<CString, Error> {
    let bytes = value.into().into_cp437(&CP437_CONTROL).map_err(|e| Error::Encoding(e.into_string()))?;
    CString::new(bytes).map_err(|_| Error::InvalidParameter("text contains a NUL character".to_string()))
}

fn utf8(value: &str) -> Result<CString, Error> {
    CString::new(value).map_err(|_| Error::InvalidParameter("text contains a NUL character".to_string()))
}

impl NativePrinterBackend for NativeBackend {
    fn about(&self) -> Result<String, Error> {
        let about = self.symbol::<NoArgs>("about")?;
        let result = unsafe { about() };
        Ok(format!("TSCLIB ({}), about() = {}", self.path.display(), result))
    }

    fn list_printers(&self) -> Result<Vec<PrinterDescriptor>, Error> {
        if cfg!(target_os = "windows") {
            spooler::spooler_printers()
        } else {
            usb::usb_printers()
        }
    }

    fn open_port(&mut self, target: &PortTarget) -> Result<(), Error> {
        let name = match target {
            PortTarget::Usb => "usb".to_string(),
            PortTarget::Name(name) => name.clone(),
            PortTarget::Index(_) => {
                let printers = self.list_printers()?;
                match resolve(&printers, target) {
                    Some(printer) => printer.name.clone(),
                    None => return Err(Error::Connection(format!("no printer at {}", target)))
                }
            }
        };
        let port = ansi(name.as_str())?;
        let openport = self.symbol::<OneArg>("openport")?;
        let result = unsafe { openport(port.as_ptr()) };
        if result == SUCCESS {
            Ok(())
        } else {
            Err(Error::Connection(format!("openport(\"{}\") returned {}", name, result)))
        }
    }

    fn close_port(&mut self) -> Result<(), Error> {
        let closeport = self.symbol::<NoArgs>("closeport")?;
        check("closeport", unsafe { closeport() })
    }

    fn query_status(&mut self) -> Result<String, Error> {
        let query = self.symbol::<NoArgs>("usbportqueryprinter")?;
        let result = unsafe { query() };
        if (0..=0xff).contains(&result) {
            Ok(format!("{:02X}", result))
        } else {
            Err(Error::Printer(format!("usbportqueryprinter returned {}", result)))
        }
    }

    fn setup(&mut self, configuration: &LabelConfiguration) -> Result<(), Error> {
        let width = ansi(label::measure(configuration.width_mm))?;
        let height = ansi(label::measure(configuration.height_mm))?;
        let speed = ansi(label::measure(configuration.speed))?;
        let density = ansi(configuration.density.to_string())?;
        let sensor = ansi(configuration.sensor.as_token())?;
        let vertical = ansi(label::measure(configuration.gap_mm))?;
        let offset = ansi(label::measure(configuration.offset_mm))?;
        let setup = self.symbol::<SevenArgs>("setup")?;
        check("setup", unsafe {
            setup(width.as_ptr(), height.as_ptr(), speed.as_ptr(), density.as_ptr(), sensor.as_ptr(), vertical.as_ptr(), offset.as_ptr())
        })
    }

    fn clear_buffer(&mut self) -> Result<(), Error> {
        let clearbuffer = self.symbol::<NoArgs>("clearbuffer")?;
        check("clearbuffer", unsafe { clearbuffer() })
    }

    fn printer_font(&mut self, text: &InternalFontText) -> Result<(), Error> {
        let x = ansi(text.x.to_string())?;
        let y = ansi(text.y.to_string())?;
        let font = ansi(text.font.as_str())?;
        let rotation = ansi(text.rotation.as_token())?;
        let x_mul = ansi(text.x_multiplier.to_string())?;
        let y_mul = ansi(text.y_multiplier.to_string())?;
        let content = ansi(text.text.as_str())?;
        let printerfont = self.symbol::<SevenArgs>("printerfont")?;
        check("printerfont", unsafe {
            printerfont(x.as_ptr(), y.as_ptr(), font.as_ptr(), rotation.as_ptr(), x_mul.as_ptr(), y_mul.as_ptr(), content.as_ptr())
        })
    }

    fn barcode(&mut self, barcode: &Barcode) -> Result<(), Error> {
        let x = ansi(barcode.x.to_string())?;
        let y = ansi(barcode.y.to_string())?;
        let kind = ansi(barcode.kind.as_str())?;
        let height = ansi(barcode.height.to_string())?;
        let readable = ansi(barcode.readable.as_token())?;
        let rotation = ansi(barcode.rotation.as_token())?;
        let narrow = ansi(barcode.narrow.to_string())?;
        let wide = ansi(barcode.wide.to_string())?;
        let code = ansi(barcode.code.as_str())?;
        let export = self.symbol::<NineArgs>("barcode")?;
        check("barcode", unsafe {
            export(
                x.as_ptr(), y.as_ptr(), kind.as_ptr(), height.as_ptr(), readable.as_ptr(),
                rotation.as_ptr(), narrow.as_ptr(), wide.as_ptr(), code.as_ptr()
            )
        })
    }

    fn windows_font(&mut self, text: &WindowsFontText) -> Result<(), Error> {
        let face = ansi(text.face.as_str())?;
        let content = ansi(text.text.as_str())?;
        let windowsfont = self.symbol::<WindowsFontFn>("windowsfont")?;
        check("windowsfont", unsafe {
            windowsfont(
                text.x, text.y, text.height, c_int::from(text.rotation.degrees()),
                text.style.as_int(), c_int::from(text.underline), face.as_ptr(), content.as_ptr()
            )
        })
    }

    fn send_command(&mut self, command: &str) -> Result<(), Error> {
        let command = ansi(command)?;
        let sendcommand = self.symbol::<OneArg>("sendcommand")?;
        check("sendcommand", unsafe { sendcommand(command.as_ptr()) })
    }

    fn send_command_utf8(&mut self, command: &str) -> Result<(), Error> {
        let command = utf8(command)?;
        let sendcommand = self.symbol::<OneArg>("sendcommand_utf8")?;
        check("sendcommand_utf8", unsafe { sendcommand(command.as_ptr()) })
    }

    fn print_label(&mut self, quantity: u32, copies: u32) -> Result<(), Error> {
        let quantity = ansi(quantity.to_string())?;
        let copies = ansi(copies.to_string())?;
        let printlabel = self.symbol::<TwoArgs>("printlabel")?;
        check("printlabel", unsafe { printlabel(quantity.as_ptr(), copies.as_ptr()) })
    }

    fn form_feed(&mut self) -> Result<(), Error> {
        let formfeed = self.symbol::<NoArgs>("formfeed")?;
        check("formfeed", unsafe { formfeed() })
    }
}

impl std::fmt::Debug for NativeBackend {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        formatter.debug_struct("NativeBackend").field("path", &self.path).finish()
    }
}
