/// SVG -> PNG via resvg

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, fontdb};

use crate::rendering::RenderedImage;
use crate::{Error, Result};

/// Render `svg` onto a transparent `width` x `height` canvas and encode it as
/// PNG. `font_data` is the only font available to the text; when it cannot be
/// parsed the text is dropped and the bars still render.
pub fn rasterize(
    svg: &str,
    width: u32,
    height: u32,
    font_data: Option<Vec<u8>>,
    max_pixels: u64,
) -> Result<RenderedImage> {
    let pixels = u64::from(width) * u64::from(height);
    if pixels > max_pixels {
        return Err(Error::Render(format!(
            "{}x{} canvas exceeds the {} pixel limit",
            width, height, max_pixels
        )));
    }

    let mut options = usvg::Options::default();
    if let Some(data) = font_data {
        register_font(options.fontdb_mut(), data);
    }

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| Error::Render(format!("Failed to parse SVG: {}", e)))?;

    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        Error::Render(format!("Failed to allocate {}x{} canvas", width, height))
    })?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

    let png_data = pixmap
        .encode_png()
        .map_err(|e| Error::Render(format!("Failed to encode PNG: {}", e)))?;

    Ok(RenderedImage {
        width,
        height,
        png_data,
    })
}

/// Load the font and make it answer for every generic family, so the SVG's
/// `sans-serif` fallback resolves to it whatever its internal name is.
fn register_font(db: &mut fontdb::Database, data: Vec<u8>) {
    db.load_font_data(data);
    let family = db
        .faces()
        .next()
        .and_then(|face| face.families.first())
        .map(|(name, _)| name.clone());
    match family {
        Some(name) => {
            db.set_serif_family(name.clone());
            db.set_sans_serif_family(name.clone());
            db.set_monospace_family(name.clone());
            db.set_cursive_family(name.clone());
            db.set_fantasy_family(name);
        }
        None => log::warn!("font data contained no usable face; caption will be blank"),
    }
}
