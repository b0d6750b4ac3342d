use serde::{Serialize, Deserialize};
use crate::label::{LabelConfiguration, InternalFontText, Barcode, WindowsFontText};

/// Something drawn on a label, or a raw command sent while filling the buffer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "element")]
pub enum Element {
    InternalText(InternalFontText),
    Barcode(Barcode),
    WindowsText(WindowsFontText),
    /// Sent through the ANSI entry point
    Command {
        command: String
    },
    /// Sent through the multi-byte safe entry point
    CommandUtf8 {
        command: String
    }
}

impl From<InternalFontText> for Element {
    fn from(text: InternalFontText) -> Element {
        Element::InternalText(text)
    }
}

impl From<Barcode> for Element {
    fn from(barcode: Barcode) -> Element {
        Element::Barcode(barcode)
    }
}

impl From<WindowsFontText> for Element {
    fn from(text: WindowsFontText) -> Element {
        Element::WindowsText(text)
    }
}

/// Template for a recurrent label
///
/// A job keeps the label configuration and everything drawn on it, so the same label can be printed again through [print_job](crate::TscPrinter::print_job). It implements both Serialize and Deserialize from [serde](https://docs.rs/serde), so templates can be stored, for example as json.
///
/// ```rust
/// use tsclib::{LabelJob, label::*};
///
/// let job = LabelJob::new(LabelConfiguration::builder(70.0, 40.0).build())
///     + InternalFontText::new(50, 50, "3", "Internal Font Test")
///     + Barcode::new(50, 100, "128", 70, "TEST12345");
/// assert_eq!(job.elements.len(), 2);
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LabelJob {
    pub label: LabelConfiguration,
    pub elements: Vec<Element>
}

impl LabelJob {
    /// Empty label
    pub fn new(label: LabelConfiguration) -> LabelJob {
        LabelJob {
            label,
            elements: Vec::new()
        }
    }

    pub fn push<T: Into<Element>>(&mut self, element: T) {
        self.elements.push(element.into());
    }

    /// Adds a command sent as is, through the ANSI entry point
    pub fn command<T: Into<String>>(mut self, command: T) -> LabelJob {
        self.elements.push(Element::Command{command: command.into()});
        self
    }

    /// Adds a command sent as is, through the multi-byte safe entry point
    pub fn command_utf8<T: Into<String>>(mut self, command: T) -> LabelJob {
        self.elements.push(Element::CommandUtf8{command: command.into()});
        self
    }
}

impl<T: Into<Element>> std::ops::Add<T> for LabelJob {
    type Output = LabelJob;
    fn add(mut self, rhs: T) -> LabelJob {
        self.push(rhs);
        self
    }
}

impl<T: Into<Element>> std::ops::AddAssign<T> for LabelJob {
    fn add_assign(&mut self, other: T) {
        self.push(other);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{Rotation, SensorType};

    fn job() -> LabelJob {
        let mut job = LabelJob::new(LabelConfiguration::builder(70.0, 40.0).density(10).build())
            + InternalFontText::new(50, 50, "3", "Internal Font Test")
            + Barcode::new(50, 100, "128", 70, "TEST12345").rotation(Rotation::Deg180);
        job += WindowsFontText::new(50, 250, 48, "Arial", "Windows Arial Test");
        job.command("BOX 50,350,600,450,3")
    }

    #[test]
    fn elements_keep_their_order() {
        let kinds: Vec<&str> = job().elements.iter().map(|e| match e {
            Element::InternalText(_) => "text",
            Element::Barcode(_) => "barcode",
            Element::WindowsText(_) => "windows",
            Element::Command{..} => "command",
            Element::CommandUtf8{..} => "utf8"
        }).collect();
        assert_eq!(kinds, vec!["text", "barcode", "windows", "command"]);
    }

    #[test]
    fn json_template() {
        let json = serde_json::to_value(&job()).unwrap();
        assert_eq!(json["elements"][1]["element"], "Barcode");
        assert_eq!(json["elements"][1]["kind"], "128");
        assert_eq!(json["elements"][1]["rotation"], "Deg180");
        assert_eq!(json["elements"][3]["command"], "BOX 50,350,600,450,3");
        assert_eq!(json["label"]["sensor"], "Gap");
        let back: LabelJob = serde_json::from_value(json).unwrap();
        assert_eq!(back, job());
        assert_eq!(back.label.sensor, SensorType::Gap);
    }

    #[test]
    fn json_text_with_a_barcode() {
        let stored = serde_json::to_string(&job()).unwrap();
        let back: LabelJob = serde_json::from_str(&stored).unwrap();
        assert_eq!(back, job());
        match &back.elements[1] {
            Element::Barcode(barcode) => assert_eq!(barcode.kind, "128"),
            other => panic!("unexpected {:?}", other)
        }
    }
}
