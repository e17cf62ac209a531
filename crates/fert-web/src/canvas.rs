//! Minimal retained-mode SVG canvas.

/// Drawing primitive placed on a [`Canvas`].
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Filled rectangle.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
        opacity: Option<f64>,
    },
    /// Children drawn with a translation applied.
    Group {
        translate: (f64, f64),
        children: Vec<Shape>,
    },
    /// Pre-built SVG markup embedded verbatim.
    Fragment(String),
    /// Single line of text; `y` is the baseline.
    Text {
        content: String,
        family: String,
        size: f64,
        x: f64,
        y: f64,
    },
}

/// Fixed-size canvas serialised to an SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    shapes: Vec<Shape>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Appends a shape on top of everything drawn so far.
    pub fn push(&mut self, shape: Shape) -> &mut Self {
        self.shapes.push(shape);
        self
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn to_svg_string(&self) -> String {
        let mut out = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = self.width,
            h = self.height
        );
        for shape in &self.shapes {
            write_shape(&mut out, shape);
        }
        out.push_str("</svg>");
        out
    }
}

fn write_shape(out: &mut String, shape: &Shape) {
    match shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
            fill,
            opacity,
        } => {
            out.push_str(&format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"",
                num(*x),
                num(*y),
                num(*width),
                num(*height),
                escape(fill)
            ));
            if let Some(opacity) = opacity {
                out.push_str(&format!(" opacity=\"{}\"", num(*opacity)));
            }
            out.push_str("/>");
        }
        Shape::Group {
            translate,
            children,
        } => {
            out.push_str(&format!(
                "<g transform=\"translate({} {})\">",
                num(translate.0),
                num(translate.1)
            ));
            for child in children {
                write_shape(out, child);
            }
            out.push_str("</g>");
        }
        Shape::Fragment(markup) => out.push_str(markup),
        Shape::Text {
            content,
            family,
            size,
            x,
            y,
        } => {
            out.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\">{}</text>",
                num(*x),
                num(*y),
                escape(family),
                num(*size),
                escape(content)
            ));
        }
    }
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
pub fn num(value: f64) -> String {
    let text = format!("{value:.3}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".into(),
        other => other.into(),
    }
}

/// Escapes text for XML/HTML content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_compact() {
        assert_eq!(num(600.0), "600");
        assert_eq!(num(301.3244), "301.324");
        assert_eq!(num(0.2), "0.2");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(-12.5), "-12.5");
    }

    #[test]
    fn text_is_escaped() {
        let mut canvas = Canvas::new(10, 10);
        canvas.push(Shape::Text {
            content: "a < b & c".into(),
            family: "sans-serif".into(),
            size: 5.0,
            x: 0.0,
            y: 5.0,
        });
        assert!(canvas.to_svg_string().contains(">a &lt; b &amp; c</text>"));
    }
}
