//! Preview composition: the pure `(code, settings) -> Preview` derivation.

use crate::highlight::{Highlighter, Span, TokenCategory};
use crate::rendering::frame::{render_frame, Frame};
use crate::rendering::layout::{self, PreviewLayout};
use crate::rendering::{paint, Color};
use crate::settings::{Background, Settings, WindowTheme};

/// A soft radial color blob of a mesh background. Positions and radius are
/// fractions of the canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundStyle {
    pub background: Background,
    pub base: Color,
    pub blobs: &'static [Blob],
}

const fn blob(cx: f32, cy: f32, radius: f32, color: Color) -> Blob {
    Blob { cx, cy, radius, color }
}

const BACKGROUNDS: [BackgroundStyle; 6] = [
    BackgroundStyle {
        background: Background::Mesh1,
        base: Color::rgb(0x0f, 0x0c, 0x29),
        blobs: &[
            blob(0.1, 0.2, 0.7, Color::rgba(0x00, 0xf5, 0xff, 0.55)),
            blob(0.9, 0.85, 0.7, Color::rgba(0xff, 0x00, 0xc8, 0.5)),
            blob(0.85, 0.1, 0.5, Color::rgba(0x7c, 0x3a, 0xed, 0.45)),
        ],
    },
    BackgroundStyle {
        background: Background::Mesh2,
        base: Color::rgb(0x2d, 0x0b, 0x1e),
        blobs: &[
            blob(0.1, 0.1, 0.7, Color::rgba(0xff, 0x51, 0x2f, 0.6)),
            blob(0.9, 0.3, 0.6, Color::rgba(0xf0, 0x98, 0x19, 0.5)),
            blob(0.5, 1.0, 0.7, Color::rgba(0xdd, 0x24, 0x76, 0.55)),
        ],
    },
    BackgroundStyle {
        background: Background::Mesh3,
        base: Color::rgb(0x02, 0x1b, 0x33),
        blobs: &[
            blob(0.2, 0.8, 0.7, Color::rgba(0x0e, 0xa5, 0xe9, 0.5)),
            blob(0.9, 0.2, 0.6, Color::rgba(0x1e, 0x3a, 0x8a, 0.6)),
            blob(0.6, 0.5, 0.5, Color::rgba(0x14, 0xb8, 0xa6, 0.35)),
        ],
    },
    BackgroundStyle {
        background: Background::Mesh4,
        base: Color::rgb(0x0b, 0x1a, 0x1a),
        blobs: &[
            blob(0.1, 0.3, 0.7, Color::rgba(0x22, 0xc5, 0x5e, 0.45)),
            blob(0.9, 0.6, 0.7, Color::rgba(0xa8, 0x55, 0xf7, 0.5)),
            blob(0.4, 0.95, 0.6, Color::rgba(0x06, 0xb6, 0xd4, 0.45)),
        ],
    },
    BackgroundStyle {
        background: Background::SolidDark,
        base: Color::rgb(0x0f, 0x17, 0x2a),
        blobs: &[],
    },
    BackgroundStyle {
        background: Background::SolidSlate,
        base: Color::rgb(0x33, 0x41, 0x55),
        blobs: &[],
    },
];

impl BackgroundStyle {
    pub fn for_background(background: Background) -> BackgroundStyle {
        BACKGROUNDS
            .iter()
            .find(|b| b.background == background)
            .copied()
            .unwrap_or(BACKGROUNDS[0])
    }

    /// Style for a background identifier; unknown identifiers get the first entry.
    pub fn for_id(id: &str) -> BackgroundStyle {
        Self::for_background(Background::from_id(id))
    }

    pub fn all() -> &'static [BackgroundStyle; 6] {
        &BACKGROUNDS
    }
}

/// Text colors for the code body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodePalette {
    pub plain: Color,
    pub gutter: Color,
    pub comment: Color,
    pub string: Color,
    pub number: Color,
    pub keyword: Color,
    pub function: Color,
    pub operator: Color,
    pub punctuation: Color,
    pub tag: Color,
    pub attribute: Color,
    pub builtin: Color,
}

const DARK_CODE: CodePalette = CodePalette {
    plain: Color::rgb(0xcd, 0xd6, 0xf4),
    gutter: Color::rgba(0xcd, 0xd6, 0xf4, 0.4),
    comment: Color::rgb(0x6c, 0x70, 0x86),
    string: Color::rgb(0xa6, 0xe3, 0xa1),
    number: Color::rgb(0xfa, 0xb3, 0x87),
    keyword: Color::rgb(0xcb, 0xa6, 0xf7),
    function: Color::rgb(0x89, 0xb4, 0xfa),
    operator: Color::rgb(0x89, 0xdc, 0xeb),
    punctuation: Color::rgb(0x93, 0x99, 0xb2),
    tag: Color::rgb(0xf3, 0x8b, 0xa8),
    attribute: Color::rgb(0xf9, 0xe2, 0xaf),
    builtin: Color::rgb(0xf9, 0xe2, 0xaf),
};

const LIGHT_CODE: CodePalette = CodePalette {
    plain: Color::rgb(0x1f, 0x29, 0x37),
    gutter: Color::rgba(0x1f, 0x29, 0x37, 0.4),
    comment: Color::rgb(0x6b, 0x72, 0x80),
    string: Color::rgb(0x15, 0x80, 0x3d),
    number: Color::rgb(0xc2, 0x41, 0x0c),
    keyword: Color::rgb(0x7c, 0x3a, 0xed),
    function: Color::rgb(0x25, 0x63, 0xeb),
    operator: Color::rgb(0x0e, 0x74, 0x90),
    punctuation: Color::rgb(0x4b, 0x55, 0x63),
    tag: Color::rgb(0xdc, 0x26, 0x26),
    attribute: Color::rgb(0xb4, 0x53, 0x09),
    builtin: Color::rgb(0xb4, 0x53, 0x09),
};

impl CodePalette {
    pub fn for_theme(theme: WindowTheme) -> CodePalette {
        match theme {
            WindowTheme::Light => LIGHT_CODE,
            WindowTheme::Dark | WindowTheme::Glass => DARK_CODE,
        }
    }

    pub fn color(&self, category: Option<TokenCategory>) -> Color {
        match category {
            None => self.plain,
            Some(TokenCategory::Comment) => self.comment,
            Some(TokenCategory::String) => self.string,
            Some(TokenCategory::Number | TokenCategory::Boolean) => self.number,
            Some(TokenCategory::Keyword) => self.keyword,
            Some(TokenCategory::Function | TokenCategory::Property) => self.function,
            Some(TokenCategory::Operator) => self.operator,
            Some(TokenCategory::Punctuation) => self.punctuation,
            Some(TokenCategory::Tag) => self.tag,
            Some(TokenCategory::Attribute) => self.attribute,
            Some(TokenCategory::Builtin) => self.builtin,
        }
    }
}

/// Highlighted code with an optional line-number gutter
#[derive(Debug, Clone, PartialEq)]
pub struct CodeView {
    pub lines: Vec<Vec<Span>>,
    /// `"1"..="n"`, one per line, when line numbers are shown
    pub line_numbers: Option<Vec<String>>,
    pub palette: CodePalette,
}

impl CodeView {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// The composed visual: background, padding, window, code
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub background: BackgroundStyle,
    pub padding: u32,
    pub frame: Frame<CodeView>,
}

impl Preview {
    pub fn layout(&self) -> PreviewLayout {
        layout::layout_preview(self)
    }

    /// Canvas size in CSS pixels
    pub fn size(&self) -> (f32, f32) {
        let canvas = self.layout().canvas;
        (canvas.width, canvas.height)
    }

    pub fn to_svg(&self) -> String {
        paint::render_svg(self)
    }
}

/// Compose the preview for `code` under `settings`. Pure: equal inputs give
/// equal previews.
pub fn compose(code: &str, settings: &Settings, highlighter: &Highlighter) -> Preview {
    let highlighted = highlighter.highlight(code, settings.language);
    let lines = highlighted.lines();
    let line_numbers: Option<Vec<String>> = settings
        .show_line_numbers
        .then(|| (1..=lines.len()).map(|n| n.to_string()).collect());

    let view = CodeView {
        lines,
        line_numbers,
        palette: CodePalette::for_theme(settings.window_theme),
    };

    Preview {
        background: BackgroundStyle::for_background(settings.background),
        padding: settings.padding,
        frame: render_frame(
            settings.window_theme,
            &settings.file_name,
            settings.shadow_intensity,
            view,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Language, SettingsPatch};

    fn settings() -> Settings {
        Settings::default()
    }

    #[test]
    fn compose_is_deterministic_for_every_background() {
        let code = "const x = 1;\nconsole.log(x);\n";
        for bg in Background::ALL {
            let s = settings().merge(&SettingsPatch::background(bg));
            let a = compose(code, &s, Highlighter::shared());
            let b = compose(code, &s, Highlighter::shared());
            assert_eq!(a, b);
            assert_eq!(a.to_svg(), b.to_svg());
            assert_eq!(a.background.background, bg);
        }
    }

    #[test]
    fn line_numbers_match_newline_split() {
        let code = "a\nb\n\nc";
        let p = compose(code, &settings(), Highlighter::shared());
        let labels = p.frame.body.line_numbers.clone().unwrap();
        assert_eq!(labels, vec!["1", "2", "3", "4"]);
        assert_eq!(p.frame.body.line_count(), 4);

        let hidden = settings().merge(&SettingsPatch::show_line_numbers(false));
        let p = compose(code, &hidden, Highlighter::shared());
        assert!(p.frame.body.line_numbers.is_none());
    }

    #[test]
    fn fibonacci_scenario() {
        let s = settings().merge(&SettingsPatch::language(Language::JavaScript));
        let p = compose("fibonacci(10)", &s, Highlighter::shared());
        assert_eq!(p.frame.body.line_numbers, Some(vec!["1".to_string()]));
        let text: String = p.frame.body.lines[0].iter().map(|s| s.text.as_str()).collect();
        assert!(text.contains("fibonacci(10)"));
    }

    #[test]
    fn unknown_background_id_uses_first_entry() {
        assert_eq!(BackgroundStyle::for_id("paisley"), BackgroundStyle::all()[0]);
        assert_eq!(
            BackgroundStyle::for_id("solid-slate").background,
            Background::SolidSlate
        );
    }

    #[test]
    fn six_backgrounds_with_solids_flat() {
        let all = BackgroundStyle::all();
        assert_eq!(all.len(), 6);
        for (style, bg) in all.iter().zip(Background::ALL) {
            assert_eq!(style.background, bg);
        }
        assert!(BackgroundStyle::for_background(Background::SolidDark).blobs.is_empty());
    }

    #[test]
    fn settings_flow_into_frame() {
        let s = settings()
            .merge(&SettingsPatch::window_theme(WindowTheme::Light))
            .merge(&SettingsPatch::file_name("index.html"))
            .merge(&SettingsPatch::padding(96));
        let p = compose("<p>hi</p>", &s, Highlighter::shared());
        assert_eq!(p.padding, 96);
        assert_eq!(p.frame.file_name, "index.html");
        assert_eq!(p.frame.theme, WindowTheme::Light);
        assert_eq!(p.frame.body.palette, CodePalette::for_theme(WindowTheme::Light));
    }
}
