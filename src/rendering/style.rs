//! Inline style builders, one per element kind.

use crate::template::{CssValue, Frame, ShapeElement, TextElement};

/// Absolute placement shared by every element.
pub fn frame_style(frame: &Frame) -> String {
    format!(
        "left: {}px; top: {}px; width: {}px; height: {}px;",
        frame.x, frame.y, frame.width, frame.height
    )
}

pub fn text_style(text: &TextElement) -> String {
    let mut style = frame_style(&text.frame);
    style.push_str(&format!(" font-size: {}px;", text.font_size));
    style.push_str(&format!(" font-weight: {};", text.font_weight));
    style.push_str(&format!(" color: {};", text.color));
    style.push_str(&format!(" font-family: {};", text.font_family));
    style
}

pub fn shape_style(shape: &ShapeElement) -> String {
    let mut style = frame_style(&shape.frame);
    style.push_str(&format!(" background: {};", shape.color));
    style.push_str(&format!(" border-radius: {};", length(&shape.border_radius)));
    style
}

/// Bare numbers are pixels, except zero which needs no unit. A string that
/// holds only a number is treated the same way; other strings pass through.
pub fn length(value: &CssValue) -> String {
    match value {
        CssValue::Number(n) => pixels(*n),
        CssValue::Text(s) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => pixels(n),
            _ => s.clone(),
        },
    }
}

fn pixels(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else {
        format!("{}px", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_style_drops_trailing_zero_fraction() {
        let f = Frame::new(10.0, 20.5, 100.0, 50.0);
        assert_eq!(
            frame_style(&f),
            "left: 10px; top: 20.5px; width: 100px; height: 50px;"
        );
    }

    #[test]
    fn length_units() {
        assert_eq!(length(&CssValue::Number(0.0)), "0");
        assert_eq!(length(&CssValue::Number(12.0)), "12px");
        assert_eq!(length(&CssValue::Text("50%".into())), "50%");
    }

    #[test]
    fn numeric_strings_get_pixel_units() {
        assert_eq!(length(&CssValue::Text("8".into())), "8px");
        assert_eq!(length(&CssValue::Text(" 2.5 ".into())), "2.5px");
        assert_eq!(length(&CssValue::Text("0".into())), "0");
        assert_eq!(length(&CssValue::Text("1em".into())), "1em");
    }
}
