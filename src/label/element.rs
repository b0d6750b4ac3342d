use serde::{Serialize, Deserialize};
use crate::Error;
use super::{Rotation, BarcodeReadable};

fn required(field: &str, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        Err(Error::InvalidParameter(format!("{} must not be empty", field)))
    } else {
        Ok(())
    }
}

/// Text drawn with one of the fonts stored in the printer
///
/// ```rust
/// use tsclib::label::{InternalFontText, Rotation};
/// let text = InternalFontText::new(50, 50, "3", "Internal Font Test")
///     .rotation(Rotation::Deg90)
///     .multiplier(2, 2);
/// assert_eq!(text.x_multiplier, 2);
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct InternalFontText {
    /// Horizontal position, in dots
    pub x: u32,
    /// Vertical position, in dots
    pub y: u32,
    /// Font name, `"1"` to `"8"` for the bitmap fonts or a font file such as `"ROMAN.TTF"`
    pub font: String,
    pub rotation: Rotation,
    /// Horizontal magnification
    pub x_multiplier: u32,
    /// Vertical magnification
    pub y_multiplier: u32,
    pub text: String
}

impl InternalFontText {
    /// Unrotated text with no magnification
    pub fn new<A: Into<String>, B: Into<String>>(x: u32, y: u32, font: A, text: B) -> InternalFontText {
        InternalFontText {
            x,
            y,
            font: font.into(),
            rotation: Rotation::Deg0,
            x_multiplier: 1,
            y_multiplier: 1,
            text: text.into()
        }
    }

    pub fn rotation(mut self, rotation: Rotation) -> InternalFontText {
        self.rotation = rotation;
        self
    }

    pub fn multiplier(mut self, x_multiplier: u32, y_multiplier: u32) -> InternalFontText {
        self.x_multiplier = x_multiplier;
        self.y_multiplier = y_multiplier;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        required("font", &self.font)?;
        required("text", &self.text)
    }
}

/// One dimensional barcode
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Barcode {
    pub x: u32,
    pub y: u32,
    /// Symbology, as named by the printer (`"128"`, `"39"`, `"EAN13"`...)
    pub kind: String,
    /// Bar height, in dots
    pub height: u32,
    pub readable: BarcodeReadable,
    pub rotation: Rotation,
    /// Width of the narrow element, in dots
    pub narrow: u32,
    /// Width of the wide element, in dots
    pub wide: u32,
    /// Content to encode
    pub code: String
}

impl Barcode {
    /// Unrotated barcode with the readable line shown, narrow 2 and wide 1
    ///
    /// ```rust
    /// use tsclib::label::{Barcode, BarcodeReadable};
    /// let barcode = Barcode::new(50, 100, "128", 70, "TEST12345")
    ///     .readable(BarcodeReadable::No);
    /// assert_eq!((barcode.narrow, barcode.wide), (2, 1));
    /// ```
    pub fn new<A: Into<String>, B: Into<String>>(x: u32, y: u32, kind: A, height: u32, code: B) -> Barcode {
        Barcode {
            x,
            y,
            kind: kind.into(),
            height,
            readable: BarcodeReadable::Yes,
            rotation: Rotation::Deg0,
            narrow: 2,
            wide: 1,
            code: code.into()
        }
    }

    pub fn readable(mut self, readable: BarcodeReadable) -> Barcode {
        self.readable = readable;
        self
    }

    pub fn rotation(mut self, rotation: Rotation) -> Barcode {
        self.rotation = rotation;
        self
    }

    /// Narrow and wide element widths
    pub fn bar_widths(mut self, narrow: u32, wide: u32) -> Barcode {
        self.narrow = narrow;
        self.wide = wide;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        required("barcode type", &self.kind)?;
        required("barcode content", &self.code)
    }
}

/// Style of a Windows font
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Normal,
    Italic,
    Bold,
    BoldItalic
}

impl FontStyle {
    pub fn as_int(&self) -> i32 {
        match self {
            FontStyle::Normal => 0,
            FontStyle::Italic => 1,
            FontStyle::Bold => 2,
            FontStyle::BoldItalic => 3
        }
    }
}

/// Text rendered by the printer driver with a font installed in Windows
///
/// Only the vendor library can render these, the font has to be installed on the machine running the program.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WindowsFontText {
    pub x: i32,
    pub y: i32,
    /// Font height, in dots
    pub height: i32,
    pub rotation: Rotation,
    pub style: FontStyle,
    pub underline: bool,
    /// Font face, like `"Arial"`
    pub face: String,
    pub text: String
}

impl WindowsFontText {
    pub fn new<A: Into<String>, B: Into<String>>(x: i32, y: i32, height: i32, face: A, text: B) -> WindowsFontText {
        WindowsFontText {
            x,
            y,
            height,
            rotation: Rotation::Deg0,
            style: FontStyle::Normal,
            underline: false,
            face: face.into(),
            text: text.into()
        }
    }

    pub fn rotation(mut self, rotation: Rotation) -> WindowsFontText {
        self.rotation = rotation;
        self
    }

    pub fn style(mut self, style: FontStyle) -> WindowsFontText {
        self.style = style;
        self
    }

    pub fn underline(mut self, underline: bool) -> WindowsFontText {
        self.underline = underline;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        required("font face", &self.face)?;
        required("text", &self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_are_rejected() {
        assert!(InternalFontText::new(0, 0, "", "hi").validate().is_err());
        assert!(InternalFontText::new(0, 0, "3", "").validate().is_err());
        assert!(Barcode::new(0, 0, "128", 70, "").validate().is_err());
        assert!(Barcode::new(0, 0, "", 70, "123").validate().is_err());
        assert!(WindowsFontText::new(0, 0, 48, "", "x").validate().is_err());
        assert!(WindowsFontText::new(50, 250, 48, "Arial", "Windows Arial Test").validate().is_ok());
    }

    #[test]
    fn missing_field_is_named() {
        match Barcode::new(0, 0, "128", 70, "").validate() {
            Err(Error::InvalidParameter(detail)) => assert!(detail.contains("barcode content")),
            other => panic!("unexpected {:?}", other)
        }
    }
}
