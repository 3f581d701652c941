//! CodeCanvas
//!
//! Turns source code into a styled, shareable PNG: the code is highlighted,
//! framed in a themed window, placed on a decorative background and
//! rasterized at twice its layout size.
//!
//! # Overview
//!
//! - **Settings**: one value object ([`Settings`]) updated through sparse
//!   patches ([`SettingsPatch`])
//! - **Rendering**: a pure `(code, settings) -> Preview` derivation, serialized
//!   to SVG and rasterized with resvg
//! - **Export**: a busy-guarded pipeline that captures the current preview and
//!   delivers it as `<name>-codecanvas.png`
//!
//! # Example
//!
//! ```no_run
//! use codecanvas::{render_snapshot, Settings, SettingsPatch, WindowTheme};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::default().merge(&SettingsPatch::window_theme(WindowTheme::Glass));
//! let snapshot = render_snapshot("fn main() {}", &settings, 2.0)?;
//! std::fs::write("main-codecanvas.png", &snapshot.png_data)?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod error;
pub mod export;
pub mod highlight;
pub mod panel;
pub mod rendering;
pub mod settings;

pub use app::App;
pub use error::{Error, Result};
pub use export::{ExportConfig, ExportOutcome, ExportPipeline, ExportState};
pub use highlight::{Highlighted, Highlighter, TokenCategory};
pub use rendering::{compose, Preview, Snapshot};
pub use settings::{Background, Language, Settings, SettingsPatch, WindowTheme, DEFAULT_CODE};

/// Compose and rasterize in one step.
pub fn render_snapshot(code: &str, settings: &Settings, pixel_ratio: f32) -> Result<Snapshot> {
    let preview = compose(code, settings, Highlighter::shared());
    rendering::raster::rasterize(&preview, pixel_ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_snapshot_is_twice_the_preview() {
        let settings = Settings::default();
        let preview = compose("let x = 1;", &settings, Highlighter::shared());
        let (w, h) = preview.size();
        let snap = render_snapshot("let x = 1;", &settings, 2.0).unwrap();
        assert_eq!(snap.width, (w * 2.0).ceil() as u32);
        assert_eq!(snap.height, (h * 2.0).ceil() as u32);
    }

    #[test]
    fn noncharacters_in_code_still_render() {
        let snap = render_snapshot("let s = \"\u{FFFF}\u{FFFE}\";", &Settings::default(), 2.0).unwrap();
        assert!(snap.width > 0 && snap.height > 0);
    }
}
