//! KoBoard Render Library
//!
//! Export of KoBoard scenes to SVG and PNG. Scenes paint through the core
//! [`Painter`](koboard_core::paint::Painter) trait; [`SvgPainter`] turns
//! those calls into SVG markup which resvg rasterizes for PNG output.

mod raster;
mod renderer;
mod svg;

pub use raster::{RasterImage, encode_png, export_png, rasterize_svg};
pub use renderer::{RenderOptions, RenderResult, RendererError};
pub use svg::{SvgPainter, export_bounds, export_svg};
