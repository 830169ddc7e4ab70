/// Paint commands for a laid-out progress bar and their SVG serialization.

use std::fmt::Write as _;

use crate::params::Colors;
use crate::rendering::layout::{ProgressLayout, Rect};

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        rect: Rect,
        color: String,
    },
    RoundedRect {
        rect: Rect,
        radius: f32,
        color: String,
    },
    Text {
        x: f32,
        y: f32,
        font_size: f32,
        color: String,
        text: String,
    },
}

/// Back-to-front paint order: background, track, fill, caption lines.
pub fn paint_commands(layout: &ProgressLayout, colors: &Colors) -> Vec<PaintCommand> {
    let mut commands = vec![
        PaintCommand::SolidRect {
            rect: layout.canvas,
            color: colors.background.clone(),
        },
        PaintCommand::RoundedRect {
            rect: layout.track.rect,
            radius: layout.track.radius,
            color: colors.bar_background.clone(),
        },
    ];

    // A zero-width rect is invalid SVG; usvg would drop it anyway.
    if layout.fill.rect.width > 0.0 {
        commands.push(PaintCommand::RoundedRect {
            rect: layout.fill.rect,
            radius: layout.fill.radius,
            color: colors.bar_fill.clone(),
        });
    }

    commands.extend(layout.caption.lines.iter().map(|line| PaintCommand::Text {
        x: line.x,
        y: line.baseline,
        font_size: layout.caption.font_size,
        color: colors.text.clone(),
        text: line.text.clone(),
    }));
    commands
}

/// Escape a value for use in XML text or a double-quoted attribute.
pub fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Serialize paint commands to a standalone SVG document.
pub fn to_svg(
    width: u32,
    height: u32,
    commands: &[PaintCommand],
    font_family: &str,
    font_weight: u16,
) -> String {
    let mut svg = String::new();
    // Writing to a String cannot fail.
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    );
    for command in commands {
        let _ = match command {
            PaintCommand::SolidRect { rect, color } => write!(
                svg,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                escape_xml(color)
            ),
            PaintCommand::RoundedRect {
                rect,
                radius,
                color,
            } => write!(
                svg,
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{r}" ry="{r}" fill="{}"/>"#,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                escape_xml(color),
                r = radius
            ),
            PaintCommand::Text {
                x,
                y,
                font_size,
                color,
                text,
            } => write!(
                svg,
                r#"<text x="{}" y="{}" font-family="{}, sans-serif" font-size="{}" font-weight="{}" fill="{}" xml:space="preserve">{}</text>"#,
                x,
                y,
                escape_xml(font_family),
                font_size,
                font_weight,
                escape_xml(color),
                escape_xml(text)
            ),
        };
    }
    svg.push_str("</svg>");
    svg
}
