/// Paint commands for a laid-out preview and their SVG serialization.

use std::fmt::Write as _;

use crate::rendering::layout::{
    self, advance_columns, PreviewLayout, Rect, BACKGROUND_RADIUS, CODE_ADVANCE, CODE_FONT_SIZE,
    DOT_GAP, DOT_SIZE, FRAME_RADIUS, GUTTER_FONT_SIZE, HEADER_PAD_X, LABEL_FONT_SIZE,
};
use crate::rendering::preview::Preview;
use crate::rendering::Color;

const CODE_FONT: &str = "'JetBrains Mono', 'Fira Code', 'DejaVu Sans Mono', monospace";
const LABEL_FONT: &str = "Inter, 'DejaVu Sans', sans-serif";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub text: String,
    pub fill: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Start clipping following commands to a rounded rect
    PushClip { rect: Rect, radius: f32 },
    PopClip,
    RoundedRect {
        rect: Rect,
        radius: f32,
        fill: Color,
    },
    /// Rounded outline drawn inside `rect`
    Outline {
        rect: Rect,
        radius: f32,
        stroke: Color,
        width: f32,
    },
    /// Blurred rounded rect standing in for a `box-shadow` layer
    Shadow {
        rect: Rect,
        radius: f32,
        blur: f32,
        color: Color,
    },
    /// Radial color blob fading to transparent at `r`
    Glow { cx: f32, cy: f32, r: f32, color: Color },
    Circle { cx: f32, cy: f32, r: f32, fill: Color },
    HLine { x1: f32, x2: f32, y: f32, color: Color },
    Text {
        y: f32,
        size: f32,
        monospace: bool,
        anchor: Anchor,
        runs: Vec<TextRun>,
    },
}

/// Flatten a preview into paint commands, back to front.
pub fn paint_preview(preview: &Preview, l: &PreviewLayout) -> Vec<PaintCommand> {
    let mut cmds = Vec::new();
    let frame = &preview.frame;
    let palette = &frame.palette;

    // background
    cmds.push(PaintCommand::PushClip { rect: l.canvas, radius: BACKGROUND_RADIUS });
    cmds.push(PaintCommand::RoundedRect { rect: l.canvas, radius: 0.0, fill: preview.background.base });
    for blob in preview.background.blobs {
        cmds.push(PaintCommand::Glow {
            cx: l.canvas.width * blob.cx,
            cy: l.canvas.height * blob.cy,
            r: l.canvas.width.max(l.canvas.height) * blob.radius,
            color: blob.color,
        });
    }

    for shadow in &frame.shadows {
        if shadow.opacity <= 0.0 {
            continue;
        }
        let mut rect = l.frame.inflate(shadow.spread);
        rect.y += shadow.offset_y;
        cmds.push(PaintCommand::Shadow {
            rect,
            radius: FRAME_RADIUS,
            blur: shadow.blur,
            color: Color::rgba(0, 0, 0, shadow.opacity),
        });
    }

    // window
    cmds.push(PaintCommand::PushClip { rect: l.frame, radius: FRAME_RADIUS });
    cmds.push(PaintCommand::RoundedRect { rect: l.frame, radius: 0.0, fill: palette.background });
    cmds.push(PaintCommand::RoundedRect { rect: l.header, radius: 0.0, fill: palette.header });
    cmds.push(PaintCommand::HLine {
        x1: l.header.x,
        x2: l.header.right(),
        y: l.header.bottom() - 0.5,
        color: palette.header_border,
    });

    let dot_cy = l.header.y + l.header.height / 2.0;
    for (i, color) in frame.dots().iter().enumerate() {
        cmds.push(PaintCommand::Circle {
            cx: l.header.x + HEADER_PAD_X + DOT_SIZE / 2.0 + i as f32 * (DOT_SIZE + DOT_GAP),
            cy: dot_cy,
            r: DOT_SIZE / 2.0,
            fill: *color,
        });
    }

    // dots on the left and an equal spacer on the right keep the label centered
    cmds.push(PaintCommand::Text {
        y: dot_cy + LABEL_FONT_SIZE * 0.35,
        size: LABEL_FONT_SIZE,
        monospace: false,
        anchor: Anchor::Middle,
        runs: vec![TextRun {
            x: l.header.center_x(),
            text: frame.file_name.clone(),
            fill: palette.text,
        }],
    });

    let view = &frame.body;
    if let (Some(labels), Some(gutter)) = (&view.line_numbers, l.gutter) {
        for (i, label) in labels.iter().enumerate() {
            cmds.push(PaintCommand::Text {
                y: l.baseline(i, GUTTER_FONT_SIZE),
                size: GUTTER_FONT_SIZE,
                monospace: true,
                anchor: Anchor::End,
                runs: vec![TextRun { x: gutter.right(), text: label.clone(), fill: view.palette.gutter }],
            });
        }
    }

    for (i, line) in view.lines.iter().enumerate() {
        let mut col = 0;
        let mut runs = Vec::new();
        for span in line {
            let start = col;
            col = advance_columns(&span.text, col);
            let text = expand_tabs(&span.text, start);
            if text.trim().is_empty() {
                continue;
            }
            runs.push(TextRun {
                x: l.code.x + start as f32 * CODE_ADVANCE,
                text,
                fill: view.palette.color(span.category),
            });
        }
        if runs.is_empty() {
            continue;
        }
        cmds.push(PaintCommand::Text {
            y: l.baseline(i, CODE_FONT_SIZE),
            size: CODE_FONT_SIZE,
            monospace: true,
            anchor: Anchor::Start,
            runs,
        });
    }

    if let Some(outline) = palette.outline {
        cmds.push(PaintCommand::Outline { rect: l.frame, radius: FRAME_RADIUS, stroke: outline, width: 1.0 });
    }
    cmds.push(PaintCommand::PopClip);
    cmds.push(PaintCommand::PopClip);
    cmds
}

/// Replace tabs with spaces up to the next stop and drop carriage returns.
fn expand_tabs(text: &str, start: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut col = start;
    for ch in text.chars() {
        match ch {
            '\t' => {
                let next = advance_columns("\t", col);
                out.extend(std::iter::repeat(' ').take(next - col));
                col = next;
            }
            '\r' => {}
            _ => {
                out.push(ch);
                col += 1;
            }
        }
    }
    out
}

/// Serialize a preview to a standalone SVG document.
pub fn render_svg(preview: &Preview) -> String {
    let l = layout::layout_preview(preview);
    let cmds = paint_preview(preview, &l);
    to_svg(l.canvas.width, l.canvas.height, &cmds)
}

pub fn to_svg(width: f32, height: f32, cmds: &[PaintCommand]) -> String {
    let mut defs = String::new();
    let mut body = String::new();
    let mut next_id = 0usize;

    for cmd in cmds {
        match cmd {
            PaintCommand::PushClip { rect, radius } => {
                let id = format!("clip{}", next_id);
                next_id += 1;
                let _ = write!(defs, "<clipPath id=\"{}\">{}</clipPath>", id, rect_el(rect, *radius, ""));
                let _ = write!(body, "<g clip-path=\"url(#{})\">", id);
            }
            PaintCommand::PopClip => body.push_str("</g>"),
            PaintCommand::RoundedRect { rect, radius, fill } => {
                body.push_str(&rect_el(rect, *radius, &fill_attrs(fill)));
            }
            PaintCommand::Outline { rect, radius, stroke, width } => {
                let inset = rect.inflate(-width / 2.0);
                let attrs = format!(
                    "fill=\"none\" stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"{}\"",
                    stroke.hex(),
                    num(stroke.a),
                    num(*width)
                );
                body.push_str(&rect_el(&inset, (radius - width / 2.0).max(0.0), &attrs));
            }
            PaintCommand::Shadow { rect, radius, blur, color } => {
                let id = format!("blur{}", next_id);
                next_id += 1;
                // CSS blur radius is twice the gaussian standard deviation
                let _ = write!(
                    defs,
                    "<filter id=\"{}\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\">\
                     <feGaussianBlur stdDeviation=\"{}\"/></filter>",
                    id,
                    num(blur / 2.0)
                );
                let attrs = format!("{} filter=\"url(#{})\"", fill_attrs(color), id);
                body.push_str(&rect_el(rect, *radius, &attrs));
            }
            PaintCommand::Glow { cx, cy, r, color } => {
                let id = format!("glow{}", next_id);
                next_id += 1;
                let _ = write!(
                    defs,
                    "<radialGradient id=\"{id}\"><stop offset=\"0\" stop-color=\"{c}\" stop-opacity=\"{a}\"/>\
                     <stop offset=\"1\" stop-color=\"{c}\" stop-opacity=\"0\"/></radialGradient>",
                    id = id,
                    c = color.hex(),
                    a = num(color.a)
                );
                let _ = write!(
                    body,
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"url(#{})\"/>",
                    num(*cx),
                    num(*cy),
                    num(*r),
                    id
                );
            }
            PaintCommand::Circle { cx, cy, r, fill } => {
                let _ = write!(
                    body,
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" {}/>",
                    num(*cx),
                    num(*cy),
                    num(*r),
                    fill_attrs(fill)
                );
            }
            PaintCommand::HLine { x1, x2, y, color } => {
                let _ = write!(
                    body,
                    "<line x1=\"{}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"1\"/>",
                    num(*x1),
                    num(*x2),
                    color.hex(),
                    num(color.a),
                    y = num(*y)
                );
            }
            PaintCommand::Text { y, size, monospace, anchor, runs } => {
                let anchor = match anchor {
                    Anchor::Start => "start",
                    Anchor::Middle => "middle",
                    Anchor::End => "end",
                };
                let _ = write!(
                    body,
                    "<text y=\"{}\" font-family=\"{}\" font-size=\"{}\" text-anchor=\"{}\" xml:space=\"preserve\">",
                    num(*y),
                    if *monospace { CODE_FONT } else { LABEL_FONT },
                    num(*size),
                    anchor
                );
                for run in runs {
                    let _ = write!(body, "<tspan x=\"{}\" {}>", num(run.x), fill_attrs(&run.fill));
                    escape_xml_into(&run.text, &mut body);
                    body.push_str("</tspan>");
                }
                body.push_str("</text>");
            }
        }
    }

    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\
         <defs>{}</defs>{}</svg>",
        defs,
        body,
        w = num(width),
        h = num(height)
    )
}

fn rect_el(rect: &Rect, radius: f32, attrs: &str) -> String {
    let mut s = format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
        num(rect.x),
        num(rect.y),
        num(rect.width.max(0.0)),
        num(rect.height.max(0.0))
    );
    if radius > 0.0 {
        let _ = write!(s, " rx=\"{}\"", num(radius));
    }
    if !attrs.is_empty() {
        s.push(' ');
        s.push_str(attrs);
    }
    s.push_str("/>");
    s
}

fn fill_attrs(color: &Color) -> String {
    if color.a >= 1.0 {
        format!("fill=\"{}\"", color.hex())
    } else {
        format!("fill=\"{}\" fill-opacity=\"{}\"", color.hex(), num(color.a))
    }
}

/// Compact, locale-independent number formatting
fn num(v: f32) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn escape_xml_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c if is_xml_char(c) => out.push(c),
            _ => out.push('\u{fffd}'),
        }
    }
}

/// XML 1.0 `Char` without tab, LF and CR; text runs never hold those.
fn is_xml_char(c: char) -> bool {
    matches!(c as u32, 0x20..=0xd7ff | 0xe000..=0xfffd | 0x10000..=0x10ffff)
}
