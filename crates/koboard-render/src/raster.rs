//! Raster export: the SVG export rasterized with resvg and encoded as PNG.

use crate::renderer::{RenderOptions, RendererError, RenderResult};
use crate::svg::export_svg;
use koboard_core::scene::Scene;
use resvg::{tiny_skia, usvg};

/// Largest raster side we are willing to allocate.
const MAX_DIMENSION: f64 = 16384.0;

/// Decoded RGBA image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Straight (non-premultiplied) RGBA bytes, row-major.
    pub rgba: Vec<u8>,
}

/// Rasterize an SVG document at `scale` pixels per SVG unit.
pub fn rasterize_svg(svg: &str, scale: f64) -> RenderResult<RasterImage> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(RendererError::RenderFailed(format!("Invalid export scale {}", scale)));
    }
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| RendererError::RenderFailed(format!("Failed to parse SVG: {}", e)))?;

    let size = tree.size();
    let width = (f64::from(size.width()) * scale).ceil();
    let height = (f64::from(size.height()) * scale).ceil();
    if width < 1.0 || height < 1.0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(RendererError::RenderFailed(format!(
            "Export size {}x{} is out of range",
            width, height
        )));
    }
    let (width, height) = (width as u32, height as u32);

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        RendererError::RenderFailed(format!("Failed to allocate {}x{} pixmap", width, height))
    })?;
    let transform = tiny_skia::Transform::from_scale(scale as f32, scale as f32);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    let rgba = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    Ok(RasterImage { width, height, rgba })
}

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(image: &RasterImage) -> RenderResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, image.width, image.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RendererError::Encode(format!("Failed to write PNG header: {}", e)))?;
        writer
            .write_image_data(&image.rgba)
            .map_err(|e| RendererError::Encode(format!("Failed to write PNG data: {}", e)))?;
    }
    Ok(png_data)
}

/// Render the scene to PNG bytes at `options.scale`.
pub fn export_png(scene: &Scene, options: &RenderOptions) -> RenderResult<Vec<u8>> {
    let svg = export_svg(scene, options);
    let image = rasterize_svg(&svg, options.scale)?;
    let png_data = encode_png(&image)?;
    log::info!(
        "PNG export complete: {}x{}, {} bytes",
        image.width,
        image.height,
        png_data.len()
    );
    Ok(png_data)
}
