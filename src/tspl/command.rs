use serde::{Serialize, Deserialize};
use crate::label::{self, LabelConfiguration, SensorType, InternalFontText, Barcode};

/// TSPL commands this crate writes when it talks to the printer directly
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Command {
    /// Label size. Equivalent to SIZE m mm, n mm
    Size {
        width_mm: f32,
        height_mm: f32
    },
    /// Gap sensing. Equivalent to GAP m mm, n mm
    Gap {
        gap_mm: f32,
        offset_mm: f32
    },
    /// Black mark sensing. Equivalent to BLINE m mm, n mm
    BlackMark {
        mark_mm: f32,
        offset_mm: f32
    },
    Speed(f32),
    Density(u8),
    /// Clears the image buffer
    Cls,
    /// Text with an internal font
    Text(InternalFontText),
    Barcode(Barcode),
    /// Prints the buffer. Equivalent to PRINT m, n
    Print {
        quantity: u32,
        copies: u32
    },
    /// Feeds one label
    FormFeed,
    /// Immediate status inquiry, answered with a single byte. Equivalent to <ESC>!?
    StatusQuery
}

/// Quotes a string parameter, the printer reads `\["]` as a literal double quote
fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\[\"]"))
}

impl Command {
    /// Commands equivalent to the native `setup` call
    pub fn setup(configuration: &LabelConfiguration) -> Vec<Command> {
        let sensing = match configuration.sensor {
            SensorType::Gap => Command::Gap {
                gap_mm: configuration.gap_mm,
                offset_mm: configuration.offset_mm
            },
            SensorType::BlackMark => Command::BlackMark {
                mark_mm: configuration.gap_mm,
                offset_mm: configuration.offset_mm
            }
        };
        vec![
            Command::Size {
                width_mm: configuration.width_mm,
                height_mm: configuration.height_mm
            },
            sensing,
            Command::Speed(configuration.speed),
            Command::Density(configuration.density)
        ]
    }

    /// Textual form, without line terminator
    pub fn to_tspl(&self) -> String {
        match self {
            Command::Size{width_mm, height_mm} => format!("SIZE {} mm, {} mm", label::measure(*width_mm), label::measure(*height_mm)),
            Command::Gap{gap_mm, offset_mm} => format!("GAP {} mm, {} mm", label::measure(*gap_mm), label::measure(*offset_mm)),
            Command::BlackMark{mark_mm, offset_mm} => format!("BLINE {} mm, {} mm", label::measure(*mark_mm), label::measure(*offset_mm)),
            Command::Speed(speed) => format!("SPEED {}", label::measure(*speed)),
            Command::Density(density) => format!("DENSITY {}", density),
            Command::Cls => "CLS".to_string(),
            Command::Text(text) => format!(
                "TEXT {},{},{},{},{},{},{}",
                text.x, text.y, quoted(&text.font), text.rotation.as_token(),
                text.x_multiplier, text.y_multiplier, quoted(&text.text)
            ),
            Command::Barcode(barcode) => format!(
                "BARCODE {},{},{},{},{},{},{},{},{}",
                barcode.x, barcode.y, quoted(&barcode.kind), barcode.height,
                barcode.readable.as_token(), barcode.rotation.as_token(),
                barcode.narrow, barcode.wide, quoted(&barcode.code)
            ),
            Command::Print{quantity, copies} => format!("PRINT {},{}", quantity, copies),
            Command::FormFeed => "FORMFEED".to_string(),
            Command::StatusQuery => "\u{1b}!?".to_string()
        }
    }

    /// Bytes written to the printer
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut res = self.to_tspl().into_bytes();
        // Immediate commands are not line based
        if *self != Command::StatusQuery {
            res.extend_from_slice(b"\r\n");
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{BarcodeReadable, Rotation};

    #[test]
    fn setup_sequence() {
        let label = LabelConfiguration::builder(70.0, 40.0).speed(4.0).density(10).gap(3.0, 0.0).build();
        let lines: Vec<String> = Command::setup(&label).iter().map(Command::to_tspl).collect();
        assert_eq!(lines, vec!["SIZE 70 mm, 40 mm", "GAP 3 mm, 0 mm", "SPEED 4", "DENSITY 10"]);
    }

    #[test]
    fn black_mark_and_fractions() {
        let label = LabelConfiguration::builder(101.6, 76.2).speed(1.5).black_mark(2.5, 0.0).build();
        let lines: Vec<String> = Command::setup(&label).iter().map(Command::to_tspl).collect();
        assert_eq!(lines[0], "SIZE 101.6 mm, 76.2 mm");
        assert_eq!(lines[1], "BLINE 2.5 mm, 0 mm");
        assert_eq!(lines[2], "SPEED 1.5");
    }

    #[test]
    fn text_and_barcode() {
        let text = InternalFontText::new(50, 50, "3", "Internal Font Test");
        assert_eq!(Command::Text(text).to_tspl(), "TEXT 50,50,\"3\",0,1,1,\"Internal Font Test\"");
        let barcode = Barcode::new(50, 100, "128", 70, "TEST12345")
            .readable(BarcodeReadable::Yes)
            .rotation(Rotation::Deg90);
        assert_eq!(Command::Barcode(barcode).to_tspl(), "BARCODE 50,100,\"128\",70,1,90,2,1,\"TEST12345\"");
    }

    #[test]
    fn embedded_quotes_are_escaped() {
        let text = InternalFontText::new(0, 0, "2", "12\" ruler");
        assert_eq!(Command::Text(text).to_tspl(), "TEXT 0,0,\"2\",0,1,1,\"12\\[\"] ruler\"");
    }

    #[test]
    fn line_termination() {
        assert_eq!(Command::Print{quantity: 2, copies: 1}.as_bytes(), b"PRINT 2,1\r\n".to_vec());
        assert_eq!(Command::StatusQuery.as_bytes(), vec![0x1b, b'!', b'?']);
    }
}
