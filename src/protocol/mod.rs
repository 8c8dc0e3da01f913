use serde::{Deserialize, Serialize};

mod adalight;
mod awa;

pub use adalight::build_adalight_frame;
pub use awa::build_awa_frame;

/// Serial framing understood by the LED controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Awa,
    Adalight,
}

impl Protocol {
    /// Wrap packed pixel data (3 bytes per LED) in this protocol's frame
    pub fn build_frame(self, pixel_data: &[u8]) -> Vec<u8> {
        match self {
            Protocol::Awa => build_awa_frame(pixel_data),
            Protocol::Adalight => build_adalight_frame(pixel_data),
        }
    }
}
