//! Rendering: settings + code -> render tree -> SVG -> PNG.
//!
//! `preview::compose` builds the render tree, `layout` gives it geometry,
//! `paint` turns it into SVG and `raster` rasterizes the SVG at a pixel ratio.

pub mod frame;
pub mod layout;
pub mod paint;
pub mod preview;
pub mod raster;

use base64::Engine as _;

pub use frame::{render_frame, Frame, ShadowLayer, ThemePalette};
pub use preview::{compose, BackgroundStyle, CodeView, Preview};

/// An sRGB color with straight alpha in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// `#rrggbb`, alpha excluded
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// An encoded PNG produced from a preview
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl Snapshot {
    /// `data:image/png;base64,...` form of the image
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png_data)
        )
    }
}
