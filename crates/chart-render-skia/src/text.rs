// File: crates/chart-render-skia/src/text.rs
// Summary: Text shaper using Skia textlayout, mapping core fonts onto system font families.

use freechart_core::Font;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextStyle};
use skia_safe as skia;

const SANS: [&str; 6] = ["Segoe UI", "Arial", "Helvetica", "Roboto", "DejaVu Sans", "sans-serif"];
const MONO: [&str; 5] = ["Roboto Mono", "Consolas", "Menlo", "DejaVu Sans Mono", "monospace"];
const SERIF: [&str; 4] = ["Times New Roman", "Georgia", "DejaVu Serif", "serif"];

pub struct TextShaper {
    fonts: FontCollection,
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper {
    pub fn new() -> Self {
        let mut fc = FontCollection::new();
        // Use system manager fallback
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc }
    }

    fn make_style(font: &Font, color: skia::Color) -> TextStyle {
        let mut ts = TextStyle::new();
        ts.set_font_size(font.size.max(1.0) as f32);
        ts.set_color(color);
        if font.bold {
            ts.set_font_style(skia::FontStyle::bold());
        }
        match font.family.as_str() {
            "monospace" => ts.set_font_families(&MONO),
            "serif" => ts.set_font_families(&SERIF),
            "sans-serif" => ts.set_font_families(&SANS),
            family => {
                let mut families = vec![family];
                families.extend_from_slice(&SANS);
                ts.set_font_families(&families)
            }
        };
        ts
    }

    pub fn layout(&self, text: &str, font: &Font, color: skia::Color) -> Paragraph {
        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(skia::textlayout::TextAlign::Left);
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        let style = Self::make_style(font, color);
        builder.push_style(&style);
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(10_000.0);
        paragraph
    }

    pub fn measure(&self, text: &str, font: &Font) -> (f32, f32) {
        let p = self.layout(text, font, skia::Color::TRANSPARENT);
        // width of the longest line
        (p.longest_line(), p.height())
    }

    /// Paint with the paragraph's top-left corner at (x, y).
    pub fn draw_top_left(&self, canvas: &skia::Canvas, text: &str, x: f32, y: f32, font: &Font, color: skia::Color) {
        let p = self.layout(text, font, color);
        p.paint(canvas, (x, y));
    }
}
