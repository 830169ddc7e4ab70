/// Box geometry for the progress bar image.
///
/// The image is a centred flex column: a rounded bar track with an inset fill,
/// and a caption paragraph underneath.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBox {
    pub rect: Rect,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x: f32,
    /// y of the alphabetic baseline
    pub baseline: f32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub rect: Rect,
    pub font_size: f32,
    pub lines: Vec<TextLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressLayout {
    pub canvas: Rect,
    pub track: LayoutBox,
    pub fill: LayoutBox,
    pub caption: TextBlock,
}

pub const TRACK_WIDTH_RATIO: f32 = 0.95;
pub const TRACK_HEIGHT: f32 = 48.0;
pub const TRACK_RADIUS: f32 = 8.0;
pub const FILL_INSET: f32 = 4.0;
pub const FILL_RADIUS: f32 = 4.0;
pub const FONT_SIZE: f32 = 16.0;
/// Horizontal margin around the caption.
pub const CAPTION_MARGIN_X: f32 = 4.0;
/// Paragraph margin above and below the caption (1em).
pub const CAPTION_MARGIN_Y: f32 = FONT_SIZE;
const LINE_HEIGHT_RATIO: f32 = 1.2;
const ASCENT_RATIO: f32 = 0.8;
/// Average advance of a glyph as a fraction of the font size.
const GLYPH_ADVANCE_RATIO: f32 = 0.5;

/// Estimated rendered width of `text` at `font_size`.
pub fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * GLYPH_ADVANCE_RATIO
}

/// Greedy word wrap against an estimated line width. A single word longer than
/// the line gets a line of its own.
pub fn wrap_text(text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        let candidate_width = if cur.is_empty() {
            estimate_text_width(word, font_size)
        } else {
            estimate_text_width(&cur, font_size)
                + estimate_text_width(" ", font_size)
                + estimate_text_width(word, font_size)
        };
        if candidate_width > max_width && !cur.is_empty() {
            lines.push(std::mem::take(&mut cur));
        }
        if !cur.is_empty() {
            cur.push(' ');
        }
        cur.push_str(word);
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

/// Lay out the track, fill and caption on a `width` x `height` canvas.
/// `percentage` above 100 is treated as 100.
pub fn layout_progress_bar(width: u32, height: u32, percentage: u8, text: &str) -> ProgressLayout {
    let canvas = Rect {
        x: 0.0,
        y: 0.0,
        width: width as f32,
        height: height as f32,
    };

    let line_height = FONT_SIZE * LINE_HEIGHT_RATIO;
    let wrap_width = (canvas.width - CAPTION_MARGIN_X * 2.0).max(0.0);
    let lines = wrap_text(text, wrap_width, FONT_SIZE);
    let caption_content_height = lines.len() as f32 * line_height;
    let caption_height = caption_content_height + CAPTION_MARGIN_Y * 2.0;

    // Column content is centred vertically; overflow spills evenly both ways.
    let content_height = TRACK_HEIGHT + caption_height;
    let top = (canvas.height - content_height) / 2.0;

    let track_width = canvas.width * TRACK_WIDTH_RATIO;
    let track = LayoutBox {
        rect: Rect {
            x: (canvas.width - track_width) / 2.0,
            y: top,
            width: track_width,
            height: TRACK_HEIGHT,
        },
        radius: TRACK_RADIUS,
    };

    let inner_width = (track_width - FILL_INSET * 2.0).max(0.0);
    let fill_width = (track_width * f32::from(percentage.min(100)) / 100.0).min(inner_width);
    let fill = LayoutBox {
        rect: Rect {
            x: track.rect.x + FILL_INSET,
            y: track.rect.y + FILL_INSET,
            width: fill_width,
            height: (TRACK_HEIGHT - FILL_INSET * 2.0).max(0.0),
        },
        radius: FILL_RADIUS,
    };

    // The caption block shrinks to its widest line and is centred as a whole;
    // lines inside it are left-aligned.
    let block_width = lines
        .iter()
        .map(|line| estimate_text_width(line, FONT_SIZE))
        .fold(0.0_f32, f32::max)
        .min(wrap_width);
    let block_x = (canvas.width - block_width) / 2.0;
    let block_y = top + TRACK_HEIGHT + CAPTION_MARGIN_Y;
    let half_leading = (line_height - FONT_SIZE) / 2.0;
    let caption = TextBlock {
        rect: Rect {
            x: block_x,
            y: block_y,
            width: block_width,
            height: caption_content_height,
        },
        font_size: FONT_SIZE,
        lines: lines
            .into_iter()
            .enumerate()
            .map(|(i, text)| TextLine {
                x: block_x,
                baseline: block_y + i as f32 * line_height + half_leading + FONT_SIZE * ASCENT_RATIO,
                text,
            })
            .collect(),
    };

    ProgressLayout {
        canvas,
        track,
        fill,
        caption,
    }
}
