use serde::{Serialize, Deserialize};

/// Whether the human readable line is printed below a barcode
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BarcodeReadable {
    Yes,
    No
}

impl BarcodeReadable {
    pub fn as_token(&self) -> &'static str {
        match self {
            BarcodeReadable::No => "0",
            BarcodeReadable::Yes => "1"
        }
    }
}

impl Default for BarcodeReadable {
    fn default() -> BarcodeReadable {
        BarcodeReadable::Yes
    }
}
