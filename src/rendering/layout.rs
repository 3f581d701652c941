/// Fixed-metric layout of a preview.
///
/// Text is measured with monospace cell metrics rather than real font
/// shaping, so layout is identical on every machine regardless of installed
/// fonts.

use crate::highlight::Span;
use crate::rendering::preview::Preview;

pub const CODE_FONT_SIZE: f32 = 14.0;
pub const LINE_HEIGHT: f32 = CODE_FONT_SIZE * 1.625;
/// Horizontal advance of one code cell (0.6em)
pub const CODE_ADVANCE: f32 = CODE_FONT_SIZE * 0.6;
pub const GUTTER_FONT_SIZE: f32 = 12.0;
pub const GUTTER_ADVANCE: f32 = GUTTER_FONT_SIZE * 0.6;
/// Space between the gutter labels and the code
pub const GUTTER_GAP: f32 = 16.0;
pub const CODE_PADDING: f32 = 16.0;

pub const HEADER_HEIGHT: f32 = 40.0;
pub const HEADER_PAD_X: f32 = 16.0;
pub const HEADER_GAP: f32 = 8.0;
pub const DOT_SIZE: f32 = 12.0;
pub const DOT_GAP: f32 = 8.0;
/// Three dots and the gaps between them; the right-hand spacer has the same width
pub const DOTS_WIDTH: f32 = DOT_SIZE * 3.0 + DOT_GAP * 2.0;
pub const LABEL_FONT_SIZE: f32 = 12.0;
pub const LABEL_ADVANCE: f32 = LABEL_FONT_SIZE * 0.6;

pub const FRAME_RADIUS: f32 = 12.0;
pub const BACKGROUND_RADIUS: f32 = 16.0;
pub const TAB_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Grow (or shrink, for negative `by`) on every side
    pub fn inflate(&self, by: f32) -> Rect {
        Rect::new(self.x - by, self.y - by, self.width + by * 2.0, self.height + by * 2.0)
    }
}

/// Boxes of every part of a preview, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewLayout {
    pub canvas: Rect,
    pub frame: Rect,
    pub header: Rect,
    pub body: Rect,
    pub gutter: Option<Rect>,
    /// Where the first code cell of the first line sits
    pub code: Rect,
}

impl PreviewLayout {
    /// Top of line `index` (0-based)
    pub fn line_top(&self, index: usize) -> f32 {
        self.code.y + index as f32 * LINE_HEIGHT
    }

    /// Alphabetic baseline for a line of text with `font_size`
    pub fn baseline(&self, index: usize, font_size: f32) -> f32 {
        self.line_top(index) + (LINE_HEIGHT - font_size) / 2.0 + font_size * 0.8
    }
}

/// Display column reached after `text`, starting at `start`; tabs jump to the
/// next stop and carriage returns take no space.
pub fn advance_columns(text: &str, start: usize) -> usize {
    text.chars().fold(start, |col, ch| match ch {
        '\t' => (col / TAB_WIDTH + 1) * TAB_WIDTH,
        '\r' => col,
        _ => col + 1,
    })
}

pub fn line_columns(line: &[Span]) -> usize {
    line.iter().fold(0, |col, span| advance_columns(&span.text, col))
}

pub fn layout_preview(preview: &Preview) -> PreviewLayout {
    let view = &preview.frame.body;
    let padding = preview.padding as f32;

    let columns = view.lines.iter().map(|l| line_columns(l)).max().unwrap_or(0);
    let gutter_width = view.line_numbers.as_ref().map(|labels| {
        let digits = labels.iter().map(|l| l.chars().count()).max().unwrap_or(1);
        digits as f32 * GUTTER_ADVANCE
    });

    let text_width = columns as f32 * CODE_ADVANCE;
    let code_view_width = CODE_PADDING * 2.0 + gutter_width.map_or(0.0, |w| w + GUTTER_GAP) + text_width;

    let label_width = preview.frame.file_name.chars().count() as f32 * LABEL_ADVANCE;
    let header_width = HEADER_PAD_X * 2.0 + DOTS_WIDTH * 2.0 + HEADER_GAP * 2.0 + label_width;

    // whole pixels, so the canvas scales to exact device sizes
    let frame_width = code_view_width.max(header_width).ceil();
    let frame_height = (HEADER_HEIGHT + CODE_PADDING * 2.0 + view.line_count() as f32 * LINE_HEIGHT).ceil();
    let body_height = frame_height - HEADER_HEIGHT;

    let canvas = Rect::new(0.0, 0.0, frame_width + padding * 2.0, frame_height + padding * 2.0);
    let frame = Rect::new(padding, padding, frame_width, frame_height);
    let header = Rect::new(frame.x, frame.y, frame_width, HEADER_HEIGHT);
    let body = Rect::new(frame.x, header.bottom(), frame_width, body_height);

    let inner_x = body.x + CODE_PADDING;
    let inner_y = body.y + CODE_PADDING;
    let gutter = gutter_width.map(|w| Rect::new(inner_x, inner_y, w, view.line_count() as f32 * LINE_HEIGHT));
    let code_x = gutter.map_or(inner_x, |g| g.right() + GUTTER_GAP);
    let code = Rect::new(code_x, inner_y, text_width, view.line_count() as f32 * LINE_HEIGHT);

    PreviewLayout { canvas, frame, header, body, gutter, code }
}
