// File: crates/chart-render-skia/src/lib.rs
// Summary: Skia backend: draws core charts on CPU raster surfaces and exports PNG or RGBA pixels.

pub mod canvas;
pub mod text;

use anyhow::{anyhow, Context, Result};
use freechart_core::types::{HEIGHT, WIDTH};
use freechart_core::{Chart, ChartRenderingInfo, Color, Rect};
use log::debug;
use skia_safe as skia;

pub use canvas::SkiaCanvas;
pub use text::TextShaper;

pub struct RenderOptions {
    pub width: i32,
    pub height: i32,
    /// Cleared to before the chart draws; `None` leaves the chart background alone.
    pub background: Option<Color>,
    /// Skip text so that output does not depend on installed fonts.
    pub draw_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { width: WIDTH, height: HEIGHT, background: None, draw_labels: true }
    }
}

fn render_surface(chart: &Chart, opts: &RenderOptions) -> Result<(skia::Surface, ChartRenderingInfo)> {
    if opts.width <= 0 || opts.height <= 0 {
        return Err(anyhow!("invalid surface size {}x{}", opts.width, opts.height));
    }
    let mut surface = skia::surfaces::raster_n32_premul((opts.width, opts.height))
        .ok_or_else(|| anyhow!("failed to create raster surface"))?;
    let shaper = TextShaper::new();
    let info = {
        let sk = surface.canvas();
        if let Some(bg) = opts.background {
            sk.clear(canvas::to_skia_color(bg));
        }
        let mut canvas = SkiaCanvas::new(sk, &shaper, opts.draw_labels);
        let area = Rect::from_ltwh(0.0, 0.0, opts.width as f64, opts.height as f64);
        chart.draw(&mut canvas, area)
    };
    debug!("rendered {}x{} with {} entities", opts.width, opts.height, info.entities.len());
    Ok((surface, info))
}

/// Render to PNG bytes.
pub fn render_to_png_bytes(chart: &Chart, opts: &RenderOptions) -> Result<Vec<u8>> {
    let (mut surface, _) = render_surface(chart, opts)?;
    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or_else(|| anyhow!("encode PNG failed"))?;
    Ok(data.as_bytes().to_vec())
}

/// Render to a PNG file, creating parent directories. Returns the entities
/// of the drawn chart for image maps.
pub fn render_to_png(chart: &Chart, opts: &RenderOptions, output_png_path: impl AsRef<std::path::Path>) -> Result<ChartRenderingInfo> {
    let path = output_png_path.as_ref();
    let (mut surface, info) = render_surface(chart, opts)?;
    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or_else(|| anyhow!("encode PNG failed"))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    std::fs::write(path, data.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(info)
}

/// Render to unpremultiplied RGBA8 pixels: (pixels, width, height, stride).
pub fn render_to_rgba8(chart: &Chart, opts: &RenderOptions) -> Result<(Vec<u8>, u32, u32, usize)> {
    let (mut surface, _) = render_surface(chart, opts)?;
    let (w, h) = (opts.width as u32, opts.height as u32);
    let stride = w as usize * 4;
    let info = skia::ImageInfo::new((opts.width, opts.height), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
    let mut pixels = vec![0u8; stride * h as usize];
    if !surface.read_pixels(&info, &mut pixels, stride, (0, 0)) {
        return Err(anyhow!("read pixels failed"));
    }
    Ok((pixels, w, h, stride))
}
