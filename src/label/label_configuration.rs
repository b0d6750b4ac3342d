use serde::{Serialize, Deserialize};
use super::SensorType;

/// Geometry and print settings for a batch of labels
///
/// Sent once per batch through [setup_label](crate::TscPrinter::setup_label), before the buffer gets filled. No range checking happens here, the printer decides what it accepts. See the [builder](LabelConfiguration::builder) for a friendlier way to create one.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LabelConfiguration {
    /// Label width, in millimeters
    pub width_mm: f32,
    /// Label height, in millimeters
    pub height_mm: f32,
    /// Print speed, in inches per second
    pub speed: f32,
    /// Print darkness, 0 to 15 on most models
    pub density: u8,
    /// Paper detection mode
    pub sensor: SensorType,
    /// Gap (or black mark) height, in millimeters
    pub gap_mm: f32,
    /// Gap (or black mark) offset, in millimeters
    pub offset_mm: f32
}

impl LabelConfiguration {
    /// Creates a [LabelConfigurationBuilder](crate::label::LabelConfigurationBuilder) for a label of the given size.
    ///
    /// ```rust
    /// use tsclib::label::{LabelConfiguration, SensorType};
    /// let label = LabelConfiguration::builder(70.0, 40.0)
    ///     .speed(4.0)
    ///     .density(10)
    ///     .gap(3.0, 0.0)
    ///     .build();
    /// assert_eq!(label.sensor, SensorType::Gap);
    /// ```
    pub fn builder(width_mm: f32, height_mm: f32) -> LabelConfigurationBuilder {
        LabelConfigurationBuilder::new(width_mm, height_mm)
    }
}

/// Helper structure to create a [LabelConfiguration](crate::label::LabelConfiguration)
pub struct LabelConfigurationBuilder {
    configuration: LabelConfiguration
}

impl LabelConfigurationBuilder {
    /// By default, speed 4, density 8 and gap sensing with a 3mm gap and no offset.
    pub fn new(width_mm: f32, height_mm: f32) -> LabelConfigurationBuilder {
        LabelConfigurationBuilder {
            configuration: LabelConfiguration {
                width_mm,
                height_mm,
                speed: 4.0,
                density: 8,
                sensor: SensorType::Gap,
                gap_mm: 3.0,
                offset_mm: 0.0
            }
        }
    }

    pub fn speed(mut self, speed: f32) -> LabelConfigurationBuilder {
        self.configuration.speed = speed;
        self
    }

    pub fn density(mut self, density: u8) -> LabelConfigurationBuilder {
        self.configuration.density = density;
        self
    }

    /// Gap sensing, with the gap height and offset
    pub fn gap(mut self, gap_mm: f32, offset_mm: f32) -> LabelConfigurationBuilder {
        self.configuration.sensor = SensorType::Gap;
        self.configuration.gap_mm = gap_mm;
        self.configuration.offset_mm = offset_mm;
        self
    }

    /// Black mark sensing, with the mark height and offset
    pub fn black_mark(mut self, mark_mm: f32, offset_mm: f32) -> LabelConfigurationBuilder {
        self.configuration.sensor = SensorType::BlackMark;
        self.configuration.gap_mm = mark_mm;
        self.configuration.offset_mm = offset_mm;
        self
    }

    pub fn build(self) -> LabelConfiguration {
        self.configuration
    }
}
