pub use self::sensor_type::SensorType;
pub use self::rotation::Rotation;
pub use self::barcode_readable::BarcodeReadable;
pub use self::label_configuration::{LabelConfiguration, LabelConfigurationBuilder};
pub use self::element::{InternalFontText, Barcode, WindowsFontText, FontStyle};

mod sensor_type;
mod rotation;
mod barcode_readable;
mod label_configuration;
mod element;

/// Formats a measure the way the printer expects it, without a trailing `.0`
pub(crate) fn measure(value: f32) -> String {
    format!("{}", value)
}
