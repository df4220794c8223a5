#![cfg_attr(not(test), no_std)]

pub mod analog_layer;
pub mod clock;
pub mod error;
pub mod framebuffer;
pub mod geometry;
pub mod graphics;
pub mod layer;
pub mod palette;
pub mod rtc_pcf85063;

#[cfg(feature = "esp32s3-disp143Oled")]
pub mod co5300;
#[cfg(feature = "esp32s3-disp143Oled")]
pub mod display;
#[cfg(feature = "esp32s3-disp143Oled")]
pub mod wiring;

pub use analog_layer::{AnalogFaceLayer, DialGeometry, FaceState};
pub use clock::{FixedOffset, TimeZone, Utc, WallTime};
pub use error::FaceError;
pub use layer::{Layer, LayerUpdate};
pub use palette::{FaceStyle, Paint};
