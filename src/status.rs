use serde::{Serialize, Deserialize};

/// Snapshot of the printer condition
///
/// The printer reports its condition as a two character code. Only the single conditions get their own variant, anything else (for example two conditions at once, `"05"`) lands in [Other](StatusCode::Other).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// `00`
    Ready,
    /// `01`
    HeadOpen,
    /// `02`
    PaperJam,
    /// `04`
    OutOfPaper,
    /// `08`
    RibbonEmpty,
    /// `10`
    Paused,
    /// `20`
    Printing,
    /// Any other code reported by the printer
    Other(String),
    /// The status query itself failed
    Unknown
}

impl StatusCode {
    /// Code reported when the status could not be read at all
    pub const UNKNOWN_CODE: &'static str = "--";

    /// Interprets a code as returned by the printer
    ///
    /// ```rust
    /// use tsclib::StatusCode;
    /// assert_eq!(StatusCode::from_code("04"), StatusCode::OutOfPaper);
    /// assert_eq!(StatusCode::from_code("05"), StatusCode::Other("05".into()));
    /// ```
    pub fn from_code<T: AsRef<str>>(code: T) -> StatusCode {
        match code.as_ref().trim() {
            "00" => StatusCode::Ready,
            "01" => StatusCode::HeadOpen,
            "02" => StatusCode::PaperJam,
            "04" => StatusCode::OutOfPaper,
            "08" => StatusCode::RibbonEmpty,
            "10" => StatusCode::Paused,
            "20" => StatusCode::Printing,
            "" | StatusCode::UNKNOWN_CODE => StatusCode::Unknown,
            other => StatusCode::Other(other.to_uppercase())
        }
    }

    /// Interprets the raw status byte answered to `<ESC>!?`
    pub fn from_byte(byte: u8) -> StatusCode {
        StatusCode::from_code(format!("{:02X}", byte))
    }

    /// The two character code
    pub fn code(&self) -> &str {
        match self {
            StatusCode::Ready => "00",
            StatusCode::HeadOpen => "01",
            StatusCode::PaperJam => "02",
            StatusCode::OutOfPaper => "04",
            StatusCode::RibbonEmpty => "08",
            StatusCode::Paused => "10",
            StatusCode::Printing => "20",
            StatusCode::Other(code) => code,
            StatusCode::Unknown => StatusCode::UNKNOWN_CODE
        }
    }

    /// Human readable name of the condition
    pub fn name(&self) -> &'static str {
        match self {
            StatusCode::Ready => "Ready",
            StatusCode::HeadOpen => "Head Open",
            StatusCode::PaperJam => "Paper Jam",
            StatusCode::OutOfPaper => "No Paper",
            StatusCode::RibbonEmpty => "Ribbon Empty",
            StatusCode::Paused => "Paused",
            StatusCode::Printing => "Printing",
            StatusCode::Other(_) => "Not Ready",
            StatusCode::Unknown => "Unknown"
        }
    }

    pub fn is_ready(&self) -> bool {
        *self == StatusCode::Ready
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(formatter, "{} ({})", self.name(), self.code())
    }
}
