use serde::{Serialize, Deserialize};

/// Paper detection mode
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SensorType {
    /// Detects the space between labels
    Gap,
    /// Detects printed registration marks
    BlackMark
}

impl SensorType {
    /// Token expected by the native `setup` export
    pub fn as_token(&self) -> &'static str {
        match self {
            SensorType::Gap => "0",
            SensorType::BlackMark => "1"
        }
    }
}

impl Default for SensorType {
    fn default() -> SensorType {
        SensorType::Gap
    }
}
