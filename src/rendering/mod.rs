//! Image composition: layout, paint, raster.

pub mod layout;
pub mod paint;
pub mod raster;

use crate::params::RenderConfig;

/// An encoded PNG and its pixel size.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

/// Build the SVG document for a resolved request.
pub fn compose_svg(config: &RenderConfig, percentage: u8, text: &str) -> String {
    let dims = config.dimensions;
    let layout = layout::layout_progress_bar(dims.width, dims.height, percentage, text);
    let commands = paint::paint_commands(&layout, &config.colors);
    paint::to_svg(
        dims.width,
        dims.height,
        &commands,
        config.font.family.id(),
        config.font.weight,
    )
}
