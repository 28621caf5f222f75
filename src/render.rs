//! Overlay rendering: smart guides and the marquee rectangle.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! Layers themselves are painted by the host; the engine only draws the
//! interaction chrome on top, in canvas pixels.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::geom::Rect;
use crate::snap::GuideLine;

const GUIDE_COLOR: &str = "#FF00FF";
const CENTER_GUIDE_COLOR: &str = "#00BFFF";
/// Dash segment length for centre guides and the marquee outline.
const DASH_PX: f64 = 4.0;

const MARQUEE_STROKE: &str = "#1E90FF";
const MARQUEE_FILL: &str = "rgba(30, 144, 255, 0.1)";

fn dash(len: f64) -> js_sys::Array {
    let dash_array = js_sys::Array::new();
    dash_array.push(&len.into());
    dash_array.push(&len.into());
    dash_array
}

/// Stroke each guide segment, centre guides in a dashed second colour.
///
/// # Errors
///
/// Returns `Err` if a `Canvas2D` call fails.
pub fn draw_guides(ctx: &CanvasRenderingContext2d, lines: &[GuideLine]) -> Result<(), JsValue> {
    if lines.is_empty() {
        return Ok(());
    }
    ctx.save();
    ctx.set_line_width(1.0);
    for line in lines {
        if line.is_center {
            ctx.set_stroke_style_str(CENTER_GUIDE_COLOR);
            ctx.set_line_dash(&dash(DASH_PX))?;
        } else {
            ctx.set_stroke_style_str(GUIDE_COLOR);
            ctx.set_line_dash(&js_sys::Array::new())?;
        }
        ctx.begin_path();
        ctx.move_to(line.x1, line.y1);
        ctx.line_to(line.x2, line.y2);
        ctx.stroke();
    }
    ctx.set_line_dash(&js_sys::Array::new())?;
    ctx.restore();
    Ok(())
}

/// Fill and outline the marquee. `rect` is already in canvas pixels.
///
/// # Errors
///
/// Returns `Err` if a `Canvas2D` call fails.
pub fn draw_marquee(ctx: &CanvasRenderingContext2d, rect: &Rect) -> Result<(), JsValue> {
    if rect.width <= 0.0 && rect.height <= 0.0 {
        return Ok(());
    }
    ctx.save();
    ctx.set_fill_style_str(MARQUEE_FILL);
    ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    ctx.set_stroke_style_str(MARQUEE_STROKE);
    ctx.set_line_width(1.0);
    ctx.set_line_dash(&dash(DASH_PX))?;
    ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
    ctx.set_line_dash(&js_sys::Array::new())?;
    ctx.restore();
    Ok(())
}
