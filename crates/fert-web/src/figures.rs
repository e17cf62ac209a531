use fert_core::metrics::display_amount;
use fert_core::{DerivedMetrics, TokenRecord};
use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Shape};

/// Fertilizer bag drawn in the middle of every token image.
pub const BAG_WIDTH: f64 = 200.0;
pub const BAG_HEIGHT: f64 = 363.0;
pub const BAG_SVG: &str = concat!(
    "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"200\" height=\"363\" viewBox=\"0 0 200 363\">",
    "<path d=\"M30 8 L170 8 L180 60 L20 60 Z\" fill=\"#E8E8E8\" stroke=\"#3C3C3C\" stroke-width=\"4\"/>",
    "<line x1=\"26\" y1=\"34\" x2=\"174\" y2=\"34\" stroke=\"#3C3C3C\" stroke-width=\"3\" stroke-dasharray=\"8 6\"/>",
    "<path d=\"M20 60 L180 60 L195 340 Q196 358 178 358 L22 358 Q4 358 5 340 Z\" fill=\"#F5F5F5\" stroke=\"#3C3C3C\" stroke-width=\"4\"/>",
    "<rect x=\"45\" y=\"140\" width=\"110\" height=\"120\" rx=\"10\" fill=\"#46B955\"/>",
    "<path d=\"M100 235 C75 215 75 180 100 160 C125 180 125 215 100 235 Z\" fill=\"#FFFFFF\"/>",
    "<line x1=\"100\" y1=\"235\" x2=\"100\" y2=\"250\" stroke=\"#FFFFFF\" stroke-width=\"4\"/>",
    "</svg>"
);

pub const PROGRESS_FILL: &str = "#46B955";
pub const PROGRESS_OPACITY: f64 = 0.2;
pub const FONT_FAMILY: &str = "sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureConfig {
    pub width: u32,
    pub height: u32,
    pub padding: f64,
    pub title_size: f64,
    pub caption_size: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            padding: 20.0,
            title_size: 50.0,
            caption_size: 30.0,
        }
    }
}

/// Caption under the bag: unclamped percentage and remaining BPF.
pub fn progress_caption(metrics: &DerivedMetrics) -> String {
    format!(
        "{:.1}% · {:.2} BPF remaining",
        metrics.percent(),
        display_amount(metrics.remaining)
    )
}

/// Lays out the token image on a canvas without serialising it.
pub fn compose_token_canvas(
    token: &TokenRecord,
    metrics: &DerivedMetrics,
    config: &FigureConfig,
) -> Canvas {
    let width = f64::from(config.width);
    let height = f64::from(config.height);
    let mut canvas = Canvas::new(config.width, config.height);
    canvas.push(Shape::Rect {
        x: 0.0,
        y: 0.0,
        width,
        height,
        fill: "white".into(),
        opacity: None,
    });

    // Past 100% the bar runs off the top edge; below 0% it collapses.
    let fill_height = (metrics.completion * height).max(0.0);
    canvas.push(Shape::Rect {
        x: 0.0,
        y: height - fill_height,
        width,
        height: fill_height,
        fill: PROGRESS_FILL.into(),
        opacity: Some(PROGRESS_OPACITY),
    });

    canvas.push(Shape::Group {
        translate: (width / 2.0 - BAG_WIDTH / 2.0, height / 2.0 - BAG_HEIGHT / 2.0),
        children: vec![Shape::Fragment(BAG_SVG.into())],
    });

    canvas.push(Shape::Text {
        content: format!("Season {}", token.season),
        family: FONT_FAMILY.into(),
        size: config.title_size,
        x: config.padding,
        y: config.padding + config.title_size,
    });
    canvas.push(Shape::Text {
        content: progress_caption(metrics),
        family: FONT_FAMILY.into(),
        size: config.caption_size,
        x: config.padding,
        y: height - config.padding,
    });
    canvas
}

pub fn render_token_svg(
    token: &TokenRecord,
    metrics: &DerivedMetrics,
    config: &FigureConfig,
) -> String {
    compose_token_canvas(token, metrics, config).to_svg_string()
}
