/// SVG rasterization and PNG encoding.

use std::sync::{Arc, LazyLock};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use log::debug;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;

use crate::rendering::preview::Preview;
use crate::rendering::Snapshot;
use crate::{Error, Result};

/// Largest width or height of an output image, in device pixels
pub const MAX_DIMENSION: u32 = 16384;

/// System fonts, loaded once and shared by every rasterization.
static FONTDB: LazyLock<Arc<usvg::fontdb::Database>> = LazyLock::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    debug!("Loaded {} font faces for rasterization", db.len());
    Arc::new(db)
});

/// Rasterize a preview at `pixel_ratio` device pixels per CSS pixel.
pub fn rasterize(preview: &Preview, pixel_ratio: f32) -> Result<Snapshot> {
    rasterize_svg(&preview.to_svg(), pixel_ratio)
}

pub fn rasterize_svg(svg: &str, pixel_ratio: f32) -> Result<Snapshot> {
    if !(pixel_ratio.is_finite() && pixel_ratio > 0.0) {
        return Err(Error::RenderError(format!("invalid pixel ratio {}", pixel_ratio)));
    }

    let opts = usvg::Options {
        fontdb: FONTDB.clone(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &opts)
        .map_err(|e| Error::RenderError(format!("SVG parse failed: {}", e)))?;

    let size = tree.size();
    let width = (size.width() * pixel_ratio).ceil() as u32;
    let height = (size.height() * pixel_ratio).ceil() as u32;
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Error::RenderError(format!(
            "image size {}x{} outside 1..={}",
            width, height, MAX_DIMENSION
        )));
    }

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| Error::RenderError(format!("cannot allocate {}x{} pixmap", width, height)))?;
    resvg::render(&tree, Transform::from_scale(pixel_ratio, pixel_ratio), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha; PNG wants straight alpha
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let mut png_data = Vec::new();
    PngEncoder::new_with_quality(&mut png_data, CompressionType::Best, FilterType::Adaptive)
        .write_image(&rgba, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| Error::RenderError(format!("PNG encoding failed: {}", e)))?;

    debug!("Rasterized {}x{} snapshot, {} bytes", width, height, png_data.len());
    Ok(Snapshot { width, height, png_data })
}
