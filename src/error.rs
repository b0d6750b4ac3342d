use std::path::PathBuf;
use crate::StatusCode;

/// Errors that this crate throws.
#[derive(Debug)]
pub enum Error {
    /// The native printer library could not be found or loaded
    LibraryNotFound {
        /// Location that was tried last
        path: PathBuf,
        /// Reason given by the loader
        detail: String
    },
    /// The port could not be opened, or the link to the printer broke
    Connection(String),
    /// The printer (or the native library on its behalf) rejected a command
    Printer(String),
    /// A command was issued while no port is open
    NotOpen,
    /// Strict sessions refuse to continue when the printer is not ready
    NotReady(StatusCode),
    /// A required element field is empty or cannot be transmitted
    InvalidParameter(String),
    /// Text could not be converted to code page 437 for the ANSI entry point
    Encoding(String),
    /// The backend has no way to perform the requested operation
    Unsupported(String),
    /// Error related to a stream transport
    Io(std::io::Error),
    /// Error related to rusb
    UsbError(rusb::Error)
}

/// Coarse classification of an [Error](crate::Error)
///
/// Initialization errors need the caller to fix the installation, connection errors can be retried once the physical link is fixed, printer errors need either different input or a cleared fault (paper, ribbon, head).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Initialization,
    Connection,
    Printer,
    Other
}

impl Error {
    /// Tier this error belongs to
    ///
    /// ```rust
    /// use tsclib::{Error, ErrorKind};
    /// assert_eq!(Error::Printer("bad sensor".into()).kind(), ErrorKind::Printer);
    /// assert_eq!(Error::NotOpen.kind(), ErrorKind::Other);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::LibraryNotFound{..} => ErrorKind::Initialization,
            Error::Connection(_) | Error::Io(_) | Error::UsbError(_) => ErrorKind::Connection,
            Error::Printer(_) | Error::NotReady(_) | Error::InvalidParameter(_) | Error::Encoding(_) => ErrorKind::Printer,
            Error::NotOpen | Error::Unsupported(_) => ErrorKind::Other
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let content = match self {
            Error::LibraryNotFound{path, detail} => format!("Printer library not found at {}: {}", path.display(), detail),
            Error::Connection(detail) => format!("Could not communicate with the printer, {}", detail),
            Error::Printer(detail) => format!("The printer rejected the command, {}", detail),
            Error::NotOpen => "The printer port is not open".to_string(),
            Error::NotReady(status) => format!("Printer not ready: {} (status code {})", status.name(), status.code()),
            Error::InvalidParameter(detail) => format!("Invalid parameter: {}", detail),
            Error::Encoding(detail) => format!("Text cannot be sent through the ANSI entry point: {}", detail),
            Error::Unsupported(operation) => format!("The backend does not support {}", operation),
            Error::Io(e) => format!("io error: {}", e),
            Error::UsbError(e) => format!("rusb error: {}", e)
        };
        write!(formatter, "{}", content)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::UsbError(e) => Some(e),
            _ => None
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<rusb::Error> for Error {
    fn from(e: rusb::Error) -> Error {
        Error::UsbError(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers() {
        let missing = Error::LibraryNotFound{path: "TSCLIB.dll".into(), detail: "no such file".into()};
        assert_eq!(missing.kind(), ErrorKind::Initialization);
        assert_eq!(Error::Connection("busy".into()).kind(), ErrorKind::Connection);
        assert_eq!(Error::UsbError(rusb::Error::NoDevice).kind(), ErrorKind::Connection);
        assert_eq!(Error::NotReady(StatusCode::PaperJam).kind(), ErrorKind::Printer);
        assert_eq!(Error::Unsupported("windowsfont".into()).kind(), ErrorKind::Other);
    }

    #[test]
    fn display_mentions_status() {
        let message = Error::NotReady(StatusCode::HeadOpen).to_string();
        assert_eq!(message, "Printer not ready: Head Open (status code 01)");
    }
}
