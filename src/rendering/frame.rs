//! The window frame drawn around the code: header bar with three control
//! dots and a centered file name, a body holding arbitrary content, and two
//! stacked drop shadows.

use crate::rendering::Color;
use crate::settings::WindowTheme;

/// Close / minimize / zoom dots, left to right. Purely decorative.
pub const CONTROL_DOTS: [Color; 3] = [
    Color::rgb(0xff, 0x5f, 0x57),
    Color::rgb(0xfe, 0xbc, 0x2e),
    Color::rgb(0x28, 0xc8, 0x40),
];

/// Colors of one window theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemePalette {
    pub background: Color,
    pub header: Color,
    pub text: Color,
    pub header_border: Color,
    /// Outline around the whole window (glass only)
    pub outline: Option<Color>,
}

const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

const THEMES: [(WindowTheme, ThemePalette); 3] = [
    (
        WindowTheme::Dark,
        ThemePalette {
            background: Color::rgb(0x1e, 0x1e, 0x2e),
            header: Color::rgb(0x18, 0x18, 0x25),
            text: WHITE.with_alpha(0.5),
            header_border: WHITE.with_alpha(0.05),
            outline: None,
        },
    ),
    (
        WindowTheme::Light,
        ThemePalette {
            background: WHITE,
            header: Color::rgb(0xf3, 0xf4, 0xf6),
            text: Color::rgb(0x4b, 0x55, 0x63),
            header_border: Color::rgb(0xe5, 0xe7, 0xeb),
            outline: None,
        },
    ),
    (
        WindowTheme::Glass,
        ThemePalette {
            background: WHITE.with_alpha(0.1),
            header: WHITE.with_alpha(0.05),
            text: WHITE.with_alpha(0.7),
            header_border: WHITE.with_alpha(0.1),
            outline: Some(WHITE.with_alpha(0.2)),
        },
    ),
];

impl ThemePalette {
    pub fn for_theme(theme: WindowTheme) -> ThemePalette {
        THEMES
            .iter()
            .find(|(t, _)| *t == theme)
            .map(|(_, p)| *p)
            .unwrap_or(THEMES[0].1)
    }

    /// Palette for a theme identifier; unknown identifiers get the dark palette.
    pub fn for_id(id: &str) -> ThemePalette {
        Self::for_theme(WindowTheme::from_id(id))
    }
}

/// One `box-shadow` layer below the window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowLayer {
    pub offset_y: f32,
    pub blur: f32,
    /// Negative values shrink the shadow box
    pub spread: f32,
    pub opacity: f32,
}

/// Shadow layers for an intensity percentage. Not clamped.
pub fn shadow_layers(intensity: u32) -> [ShadowLayer; 2] {
    let s = intensity as f32 / 100.0;
    [
        ShadowLayer { offset_y: 25.0, blur: 80.0, spread: -20.0, opacity: s * 0.8 },
        ShadowLayer { offset_y: 10.0, blur: 30.0, spread: -10.0, opacity: s * 0.5 },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame<C> {
    pub theme: WindowTheme,
    pub palette: ThemePalette,
    pub file_name: String,
    pub shadows: [ShadowLayer; 2],
    pub body: C,
}

impl<C> Frame<C> {
    pub fn dots(&self) -> &'static [Color; 3] {
        &CONTROL_DOTS
    }
}

/// Wrap `body` in a themed window.
pub fn render_frame<C>(theme: WindowTheme, file_name: &str, shadow_intensity: u32, body: C) -> Frame<C> {
    Frame {
        theme,
        palette: ThemePalette::for_theme(theme),
        file_name: file_name.to_string(),
        shadows: shadow_layers(shadow_intensity),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_distinct_palettes() {
        let dark = ThemePalette::for_theme(WindowTheme::Dark);
        let light = ThemePalette::for_theme(WindowTheme::Light);
        let glass = ThemePalette::for_theme(WindowTheme::Glass);
        assert_ne!(dark, light);
        assert_ne!(light, glass);
        assert_eq!(dark.background.hex(), "#1e1e2e");
        assert_eq!(dark.header.hex(), "#181825");
        assert_eq!(light.background.hex(), "#ffffff");
        assert!(glass.outline.is_some());
    }

    #[test]
    fn unknown_theme_id_uses_dark() {
        assert_eq!(ThemePalette::for_id("sepia"), ThemePalette::for_theme(WindowTheme::Dark));
        assert_eq!(ThemePalette::for_id("light"), ThemePalette::for_theme(WindowTheme::Light));
    }

    #[test]
    fn shadow_scales_linearly() {
        let half = shadow_layers(50);
        assert!((half[0].opacity - 0.4).abs() < 1e-6);
        assert!((half[1].opacity - 0.25).abs() < 1e-6);

        let none = shadow_layers(0);
        assert_eq!(none[0].opacity, 0.0);
        assert_eq!(none[1].opacity, 0.0);

        // out-of-range input passes straight through
        let over = shadow_layers(200);
        assert!((over[0].opacity - 1.6).abs() < 1e-6);
    }

    #[test]
    fn frame_keeps_child_and_label() {
        let frame = render_frame(WindowTheme::Glass, "main.rs", 30, vec![1, 2, 3]);
        assert_eq!(frame.body, vec![1, 2, 3]);
        assert_eq!(frame.file_name, "main.rs");
        assert_eq!(frame.palette, ThemePalette::for_theme(WindowTheme::Glass));
        assert_eq!(frame.dots().len(), 3);
    }
}
