use serde::{Serialize, Deserialize};

/// Clockwise rotation of an element
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270
}

impl Rotation {
    /// Rotation in degrees
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270
        }
    }

    /// Token passed through to the printer
    pub fn as_token(&self) -> &'static str {
        match self {
            Rotation::Deg0 => "0",
            Rotation::Deg90 => "90",
            Rotation::Deg180 => "180",
            Rotation::Deg270 => "270"
        }
    }
}

impl Default for Rotation {
    fn default() -> Rotation {
        Rotation::Deg0
    }
}
