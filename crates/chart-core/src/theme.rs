// File: crates/chart-core/src/theme.rs
// Summary: Light/Dark theming for chart rendering colors, including the series palette.

use serde::{Deserialize, Serialize};

use crate::paint::Color;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub background: Color,
    pub plot_background: Color,
    pub outline: Color,
    pub grid: Color,
    pub axis_line: Color,
    pub axis_label: Color,
    pub tick: Color,
    pub title: Color,
    pub crosshair: Color,
    pub candle_up: Color,
    pub candle_down: Color,
    /// Handed out to series with no explicit paint, cycling by series index.
    pub series: Vec<Color>,
}

impl Theme {
    /// Palette color for `series`, cycling when there are more series than colors.
    pub fn series_paint(&self, series: usize) -> Option<Color> {
        if self.series.is_empty() { None } else { Some(self.series[series % self.series.len()]) }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark".into(),
            background: Color::from_argb(255, 18, 18, 20),
            plot_background: Color::from_argb(255, 24, 24, 28),
            outline: Color::from_argb(255, 70, 70, 78),
            grid: Color::from_argb(255, 40, 40, 45),
            axis_line: Color::from_argb(255, 180, 180, 190),
            axis_label: Color::from_argb(255, 235, 235, 245),
            tick: Color::from_argb(255, 150, 150, 160),
            title: Color::from_argb(255, 245, 245, 250),
            crosshair: Color::from_argb(255, 255, 230, 70),
            candle_up: Color::from_argb(255, 40, 200, 120),
            candle_down: Color::from_argb(255, 220, 80, 80),
            series: vec![
                Color::from_argb(255, 64, 160, 255),
                Color::from_argb(255, 255, 140, 60),
                Color::from_argb(255, 90, 210, 120),
                Color::from_argb(255, 230, 90, 160),
                Color::from_argb(255, 180, 140, 255),
                Color::from_argb(255, 240, 220, 80),
            ],
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".into(),
            background: Color::from_argb(255, 250, 250, 252),
            plot_background: Color::from_argb(255, 255, 255, 255),
            outline: Color::from_argb(255, 160, 160, 170),
            grid: Color::from_argb(255, 230, 230, 235),
            axis_line: Color::from_argb(255, 60, 60, 70),
            axis_label: Color::from_argb(255, 20, 20, 30),
            tick: Color::from_argb(255, 100, 100, 110),
            title: Color::from_argb(255, 10, 10, 20),
            crosshair: Color::from_argb(255, 30, 120, 240),
            candle_up: Color::from_argb(255, 20, 160, 90),
            candle_down: Color::from_argb(255, 200, 60, 60),
            series: vec![
                Color::from_argb(255, 32, 120, 200),
                Color::from_argb(255, 220, 110, 30),
                Color::from_argb(255, 40, 160, 80),
                Color::from_argb(255, 200, 50, 120),
                Color::from_argb(255, 120, 80, 200),
                Color::from_argb(255, 170, 150, 20),
            ],
        }
    }

    pub fn solarized_dark() -> Self {
        // Base colors from Solarized dark palette
        Self {
            name: "solarized-dark".into(),
            background: Color::from_argb(255, 0x00, 0x2b, 0x36),      // base03
            plot_background: Color::from_argb(255, 0x00, 0x2b, 0x36), // base03
            outline: Color::from_argb(255, 0x58, 0x6e, 0x75),         // base01
            grid: Color::from_argb(255, 0x07, 0x36, 0x42),            // base02
            axis_line: Color::from_argb(255, 0x93, 0xa1, 0xa1),       // base1
            axis_label: Color::from_argb(255, 0xee, 0xe8, 0xd5),      // base2
            tick: Color::from_argb(255, 0x83, 0x94, 0x96),            // base0
            title: Color::from_argb(255, 0xfd, 0xf6, 0xe3),           // base3
            crosshair: Color::from_argb(255, 0xb5, 0x89, 0x00),       // yellow
            candle_up: Color::from_argb(255, 0x2a, 0xa1, 0x98),       // cyan/green
            candle_down: Color::from_argb(255, 0xdc, 0x32, 0x2f),     // red
            series: solarized_accents(),
        }
    }

    pub fn solarized_light() -> Self {
        Self {
            name: "solarized-light".into(),
            background: Color::from_argb(255, 0xfd, 0xf6, 0xe3),      // base3
            plot_background: Color::from_argb(255, 0xfd, 0xf6, 0xe3), // base3
            outline: Color::from_argb(255, 0x93, 0xa1, 0xa1),         // base1
            grid: Color::from_argb(255, 0xee, 0xe8, 0xd5),            // base2
            axis_line: Color::from_argb(255, 0x65, 0x7b, 0x83),       // base00
            axis_label: Color::from_argb(255, 0x00, 0x2b, 0x36),      // base03
            tick: Color::from_argb(255, 0x58, 0x6e, 0x75),            // base01
            title: Color::from_argb(255, 0x07, 0x36, 0x42),           // base02
            crosshair: Color::from_argb(255, 0xcb, 0x4b, 0x16),       // orange
            candle_up: Color::from_argb(255, 0x2a, 0xa1, 0x98),
            candle_down: Color::from_argb(255, 0xdc, 0x32, 0x2f),
            series: solarized_accents(),
        }
    }

    pub fn high_contrast_dark() -> Self {
        Self {
            name: "high-contrast-dark".into(),
            background: Color::from_argb(255, 0x00, 0x00, 0x00),
            plot_background: Color::from_argb(255, 0x00, 0x00, 0x00),
            outline: Color::from_argb(255, 0xff, 0xff, 0xff),
            grid: Color::from_argb(255, 0x22, 0x22, 0x22),
            axis_line: Color::from_argb(255, 0xff, 0xff, 0xff),
            axis_label: Color::from_argb(255, 0xff, 0xff, 0xff),
            tick: Color::from_argb(255, 0xcc, 0xcc, 0xcc),
            title: Color::from_argb(255, 0xff, 0xff, 0xff),
            crosshair: Color::from_argb(255, 0xff, 0xff, 0x00),
            candle_up: Color::from_argb(255, 0x00, 0xff, 0x00),
            candle_down: Color::from_argb(255, 0xff, 0x00, 0x00),
            series: vec![
                Color::from_argb(255, 0x00, 0xff, 0xff),
                Color::from_argb(255, 0xff, 0xff, 0x00),
                Color::from_argb(255, 0xff, 0x00, 0xff),
                Color::from_argb(255, 0x00, 0xff, 0x00),
            ],
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::light()
    }
}

fn solarized_accents() -> Vec<Color> {
    vec![
        Color::from_argb(255, 0x26, 0x8b, 0xd2), // blue
        Color::from_argb(255, 0xcb, 0x4b, 0x16), // orange
        Color::from_argb(255, 0x85, 0x99, 0x00), // green
        Color::from_argb(255, 0xd3, 0x36, 0x82), // magenta
        Color::from_argb(255, 0x6c, 0x71, 0xc4), // violet
        Color::from_argb(255, 0xb5, 0x89, 0x00), // yellow
    ]
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![
        Theme::dark(),
        Theme::light(),
        Theme::solarized_dark(),
        Theme::solarized_light(),
        Theme::high_contrast_dark(),
    ]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    presets().into_iter().find(|t| t.name.eq_ignore_ascii_case(name)).unwrap_or_else(Theme::light)
}
