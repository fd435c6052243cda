//! Rendering: composes the plan scene onto a drawing [`Surface`].
//!
//! Scene composition is backend independent: [`draw`] works out every shape
//! in screen space and hands it to the surface. The browser backend is the
//! [`Surface`] impl for [`CanvasRenderingContext2d`] at the bottom of this
//! file; it is the only code that touches the canvas API. Nothing here
//! mutates application state.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::Camera;
use crate::consts::{HANDLE_SIZE_PX, ROTATE_HANDLE_RADIUS_PX, SELECTION_OUTSET_PX};
use crate::doc::{Document, Item, ItemId, Pivot};
use crate::geometry::{self, Point};
use crate::hit;
use crate::input::UiState;
use crate::measure::{self, Measure};

const ROOM_FILL: &str = "#f9fafb";
const INK: &str = "#111827";
const HANDLE_FILL: &str = "#ffffff";
const SELECTION_COLOR: &str = "#6366f1";
const ROTATE_HANDLE_COLOR: &str = "#0ea5e9";
const DIMENSION_COLOR: &str = "#94a3b8";
const SWING_COLOR: &str = "#64748b";
const NEIGHBOUR_COLOR: &str = "#64748b";
const HALO: &str = "rgba(255, 255, 255, 0.85)";

const SELECTION_DASH: [f64; 2] = [6.0, 4.0];
const MEASURE_DASH: [f64; 2] = [4.0, 4.0];

/// Labels never get closer than this to the viewport edge.
const TEXT_MARGIN_PX: f64 = 6.0;
const FONT_PX: f64 = 12.0;
/// Labels shrink to fit their box, but not below this size.
const MIN_FONT_PX: f64 = 10.0;

/// Distance of the room dimension lines from the outline.
const DIMENSION_OFFSET_PX: f64 = 24.0;
/// Dimension lines stay this far inside the viewport.
const DIMENSION_SAFE_PX: f64 = 34.0;
const TICK_PX: f64 = 6.0;

/// Drawing area in CSS pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

/// Fill and stroke for a shape. `None` skips that pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShapeStyle<'a> {
    pub fill: Option<&'a str>,
    pub stroke: Option<&'a str>,
    pub line_width: f64,
    /// Dash pattern `[on, off]` in pixels; solid when `None`.
    pub dash: Option<[f64; 2]>,
}

impl<'a> ShapeStyle<'a> {
    #[must_use]
    pub fn stroked(color: &'a str, line_width: f64) -> Self {
        Self { stroke: Some(color), line_width, ..Self::default() }
    }

    #[must_use]
    pub fn filled(fill: &'a str, stroke: &'a str, line_width: f64) -> Self {
        Self { fill: Some(fill), stroke: Some(stroke), line_width, dash: None }
    }

    #[must_use]
    pub fn dashed(self, dash: [f64; 2]) -> Self {
        Self { dash: Some(dash), ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Top,
    Middle,
    Bottom,
}

/// How a label is laid out relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    /// Shrink the font (down to a floor) until the text fits this width.
    pub max_width: Option<f64>,
    pub align: Align,
    pub baseline: Baseline,
}

impl TextStyle {
    #[must_use]
    pub fn new(align: Align, baseline: Baseline) -> Self {
        Self { size: FONT_PX, max_width: None, align, baseline }
    }

    #[must_use]
    pub fn fit(self, max_width: f64) -> Self {
        Self { max_width: Some(max_width), ..self }
    }
}

/// A 2D drawing target. All coordinates are screen pixels.
pub trait Surface {
    type Error;

    /// Reset the surface for a new frame.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn clear(&mut self, viewport: Viewport) -> Result<(), Self::Error>;

    /// Closed polygon.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn polygon(&mut self, points: &[Point], style: &ShapeStyle<'_>) -> Result<(), Self::Error>;

    /// Rectangle of size `w` × `h` centered on `center`, rotated clockwise.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn rect(&mut self, center: Point, w: f64, h: f64, rotation_deg: f64, style: &ShapeStyle<'_>) -> Result<(), Self::Error>;

    /// # Errors
    ///
    /// Backend failure.
    fn line(&mut self, a: Point, b: Point, style: &ShapeStyle<'_>) -> Result<(), Self::Error>;

    /// # Errors
    ///
    /// Backend failure.
    fn dashed_line(&mut self, a: Point, b: Point, dash: [f64; 2], style: &ShapeStyle<'_>) -> Result<(), Self::Error> {
        self.line(a, b, &style.dashed(dash))
    }

    /// Circular arc from `start` to `end` radians.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn arc(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
        style: &ShapeStyle<'_>,
    ) -> Result<(), Self::Error>;

    /// Haloed label anchored at `at`.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn text(&mut self, text: &str, at: Point, style: &TextStyle) -> Result<(), Self::Error>;
}

/// Draw the full scene: room, items, selection UI, annotations and
/// measurements.
///
/// # Errors
///
/// Returns the first surface error.
pub fn draw<S: Surface>(
    surface: &mut S,
    doc: &Document,
    camera: &Camera,
    ui: &UiState,
    viewport: Viewport,
) -> Result<(), S::Error> {
    surface.clear(viewport)?;

    if doc.room().points.len() >= 2 {
        draw_room(surface, doc, camera)?;
        draw_room_dimensions(surface, doc, camera, viewport)?;
    }

    for item in doc.items() {
        draw_item(surface, item, camera, ui.selected_id == Some(item.id))?;
    }
    for item in doc.items().iter().filter(|i| i.kind.is_opening()) {
        draw_swing_arc(surface, item, camera)?;
    }
    for item in doc.items() {
        draw_item_annotations(surface, item, &doc.room().unit, camera, viewport)?;
    }

    if doc.settings.show_measures {
        if let Some(id) = ui.selected_id {
            draw_measurements(surface, doc, &id, camera, viewport)?;
        }
    }
    Ok(())
}

// =============================================================
// Room
// =============================================================

fn draw_room<S: Surface>(surface: &mut S, doc: &Document, camera: &Camera) -> Result<(), S::Error> {
    let points: Vec<Point> = doc.room().points.iter().map(|p| camera.room_to_screen(*p)).collect();
    surface.polygon(&points, &ShapeStyle::filled(ROOM_FILL, INK, 2.0))
}

fn draw_room_dimensions<S: Surface>(
    surface: &mut S,
    doc: &Document,
    camera: &Camera,
    viewport: Viewport,
) -> Result<(), S::Error> {
    let bounds = doc.room().bounds();
    let top_left = camera.room_to_screen(Point::new(bounds.min_x, bounds.min_y));
    let top_right = camera.room_to_screen(Point::new(bounds.max_x, bounds.min_y));
    let bottom_left = camera.room_to_screen(Point::new(bounds.min_x, bounds.max_y));
    let unit = &doc.room().unit;

    // Outside the outline when there is room for it, inside otherwise.
    let mut y = top_left.y - DIMENSION_OFFSET_PX;
    if y < DIMENSION_SAFE_PX {
        y = top_left.y + DIMENSION_OFFSET_PX;
    }
    let y = soft_clamp(y, DIMENSION_SAFE_PX, viewport.height - DIMENSION_SAFE_PX);
    let mut x = top_left.x - DIMENSION_OFFSET_PX;
    if x < DIMENSION_SAFE_PX {
        x = top_left.x + DIMENSION_OFFSET_PX;
    }
    let x = soft_clamp(x, DIMENSION_SAFE_PX, viewport.width - DIMENSION_SAFE_PX);

    let style = ShapeStyle::stroked(DIMENSION_COLOR, 1.0);
    surface.line(Point::new(top_left.x, y), Point::new(top_right.x, y), &style)?;
    for tick_x in [top_left.x, top_right.x] {
        surface.line(Point::new(tick_x, y - TICK_PX), Point::new(tick_x, y + TICK_PX), &style)?;
    }
    surface.line(Point::new(x, top_left.y), Point::new(x, bottom_left.y), &style)?;
    for tick_y in [top_left.y, bottom_left.y] {
        surface.line(Point::new(x - TICK_PX, tick_y), Point::new(x + TICK_PX, tick_y), &style)?;
    }

    label(
        surface,
        &format!("{} {unit}", bounds.width().round()),
        Point::new((top_left.x + top_right.x) / 2.0, y - 8.0),
        &TextStyle::new(Align::Center, Baseline::Bottom),
        viewport,
    )?;
    label(
        surface,
        &format!("{} {unit}", bounds.height().round()),
        Point::new(x - 8.0, (top_left.y + bottom_left.y) / 2.0),
        &TextStyle::new(Align::Center, Baseline::Middle),
        viewport,
    )
}

// =============================================================
// Items
// =============================================================

fn draw_item<S: Surface>(surface: &mut S, item: &Item, camera: &Camera, selected: bool) -> Result<(), S::Error> {
    let center = camera.room_to_screen(item.center());
    let w = camera.room_dist_to_screen(item.w);
    let h = camera.room_dist_to_screen(item.h);
    surface.rect(center, w, h, item.rotation, &ShapeStyle::filled(&item.color, INK, 1.0))?;

    if !selected {
        return Ok(());
    }

    let outset = 2.0 * SELECTION_OUTSET_PX;
    let outline = ShapeStyle::stroked(SELECTION_COLOR, 2.0).dashed(SELECTION_DASH);
    surface.rect(center, w + outset, h + outset, item.rotation, &outline)?;

    let handle_style = ShapeStyle::filled(HANDLE_FILL, SELECTION_COLOR, 1.5);
    for (_, pos) in hit::corner_screen_positions(item, camera) {
        surface.rect(pos, HANDLE_SIZE_PX, HANDLE_SIZE_PX, 0.0, &handle_style)?;
    }
    surface.arc(
        hit::rotate_handle_position(item, camera),
        ROTATE_HANDLE_RADIUS_PX,
        0.0,
        TAU,
        false,
        &ShapeStyle::filled(HANDLE_FILL, ROTATE_HANDLE_COLOR, 1.5),
    )
}

/// Quarter-circle swing of a door or window, hinged on the pivot end and
/// with the opening width as radius.
fn draw_swing_arc<S: Surface>(surface: &mut S, item: &Item, camera: &Camera) -> Result<(), S::Error> {
    let angle = item.rotation.to_radians();
    let pivot = item.pivot.unwrap_or(Pivot::Left);
    let hinge_x = match pivot {
        Pivot::Left => -item.w / 2.0,
        Pivot::Right => item.w / 2.0,
    };
    let hinge = camera.room_to_screen(item.center() + geometry::rotate(Point::new(hinge_x, 0.0), angle));
    let (start, end, anticlockwise) = match pivot {
        Pivot::Left => (0.0, FRAC_PI_2, false),
        Pivot::Right => (PI, FRAC_PI_2, true),
    };
    surface.arc(
        hinge,
        camera.room_dist_to_screen(item.w),
        start + angle,
        end + angle,
        anticlockwise,
        &ShapeStyle::stroked(SWING_COLOR, 1.0).dashed(SELECTION_DASH),
    )
}

/// Label and size read-outs. Small items get their labels outside the box.
fn draw_item_annotations<S: Surface>(
    surface: &mut S,
    item: &Item,
    unit: &str,
    camera: &Camera,
    viewport: Viewport,
) -> Result<(), S::Error> {
    let bounds = geometry::axis_aligned_bounds(&item.corners().map(|c| camera.room_to_screen(c)));
    let name = if item.label.is_empty() { item.kind.tag() } else { item.label.as_str() };

    let inner_w = (bounds.width() - 12.0).max(0.0);
    let inner_h = (bounds.height() - 12.0).max(0.0);
    let (at, max_width) = if inner_w < 42.0 || inner_h < 18.0 {
        (Point::new(bounds.min_x, bounds.min_y - 20.0), bounds.width())
    } else {
        (Point::new(bounds.min_x + 6.0, bounds.min_y + 6.0), inner_w)
    };
    label(surface, name, at, &TextStyle::new(Align::Left, Baseline::Top).fit(max_width), viewport)?;

    let mid_x = (bounds.min_x + bounds.max_x) / 2.0;
    let width_text = format!("{} {unit}", item.w.round());
    if inner_w >= 60.0 && inner_h >= 26.0 {
        label(
            surface,
            &width_text,
            Point::new(mid_x, bounds.min_y + 6.0),
            &TextStyle::new(Align::Center, Baseline::Top),
            viewport,
        )?;
    } else {
        label(
            surface,
            &width_text,
            Point::new(mid_x, bounds.min_y - 10.0),
            &TextStyle::new(Align::Center, Baseline::Bottom),
            viewport,
        )?;
    }
    label(
        surface,
        &format!("{} {unit}", item.h.round()),
        Point::new(bounds.max_x + 10.0, (bounds.min_y + bounds.max_y) / 2.0),
        &TextStyle::new(Align::Left, Baseline::Middle),
        viewport,
    )
}

fn draw_measurements<S: Surface>(
    surface: &mut S,
    doc: &Document,
    id: &ItemId,
    camera: &Camera,
    viewport: Viewport,
) -> Result<(), S::Error> {
    let found = measure::measure(doc, id);
    if let Some(wall) = found.wall {
        draw_measure(surface, &wall, DIMENSION_COLOR, &doc.room().unit, camera, viewport)?;
    }
    if let Some((_, gap)) = found.neighbour {
        draw_measure(surface, &gap, NEIGHBOUR_COLOR, &doc.room().unit, camera, viewport)?;
    }
    Ok(())
}

fn draw_measure<S: Surface>(
    surface: &mut S,
    m: &Measure,
    color: &str,
    unit: &str,
    camera: &Camera,
    viewport: Viewport,
) -> Result<(), S::Error> {
    let a = camera.room_to_screen(m.from);
    let b = camera.room_to_screen(m.to);
    surface.dashed_line(a, b, MEASURE_DASH, &ShapeStyle::stroked(color, 1.0))?;
    label(
        surface,
        &format!("{} {unit}", m.distance.round()),
        a.midpoint(b),
        &TextStyle::new(Align::Center, Baseline::Middle),
        viewport,
    )
}

/// Draw a label with its anchor kept inside the viewport margin.
fn label<S: Surface>(surface: &mut S, text: &str, at: Point, style: &TextStyle, viewport: Viewport) -> Result<(), S::Error> {
    let at = Point::new(
        soft_clamp(at.x, TEXT_MARGIN_PX, viewport.width - TEXT_MARGIN_PX),
        soft_clamp(at.y, TEXT_MARGIN_PX, viewport.height - TEXT_MARGIN_PX),
    );
    surface.text(text, at, style)
}

/// Clamp that tolerates `lo > hi` (tiny viewports) by preferring `hi`.
fn soft_clamp(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

// =============================================================
// Canvas backend
// =============================================================

impl Surface for CanvasRenderingContext2d {
    type Error = JsValue;

    fn clear(&mut self, viewport: Viewport) -> Result<(), JsValue> {
        self.set_transform(viewport.dpr, 0.0, 0.0, viewport.dpr, 0.0, 0.0)?;
        self.clear_rect(0.0, 0.0, viewport.width, viewport.height);
        Ok(())
    }

    fn polygon(&mut self, points: &[Point], style: &ShapeStyle<'_>) -> Result<(), JsValue> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        self.save();
        self.begin_path();
        self.move_to(first.x, first.y);
        for p in rest {
            self.line_to(p.x, p.y);
        }
        self.close_path();
        paint_path(self, style)?;
        self.restore();
        Ok(())
    }

    fn rect(&mut self, center: Point, w: f64, h: f64, rotation_deg: f64, style: &ShapeStyle<'_>) -> Result<(), JsValue> {
        self.save();
        self.translate(center.x, center.y)?;
        self.rotate(rotation_deg.to_radians())?;
        apply_dash(self, style.dash)?;
        if let Some(fill) = style.fill {
            self.set_fill_style_str(fill);
            self.fill_rect(-w / 2.0, -h / 2.0, w, h);
        }
        if let Some(stroke) = style.stroke {
            self.set_stroke_style_str(stroke);
            self.set_line_width(style.line_width);
            self.stroke_rect(-w / 2.0, -h / 2.0, w, h);
        }
        self.restore();
        Ok(())
    }

    fn line(&mut self, a: Point, b: Point, style: &ShapeStyle<'_>) -> Result<(), JsValue> {
        self.save();
        self.begin_path();
        self.move_to(a.x, a.y);
        self.line_to(b.x, b.y);
        paint_path(self, &ShapeStyle { fill: None, ..*style })?;
        self.restore();
        Ok(())
    }

    fn arc(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
        style: &ShapeStyle<'_>,
    ) -> Result<(), JsValue> {
        self.save();
        self.begin_path();
        self.arc_with_anticlockwise(center.x, center.y, radius, start, end, anticlockwise)?;
        paint_path(self, style)?;
        self.restore();
        Ok(())
    }

    fn text(&mut self, text: &str, at: Point, style: &TextStyle) -> Result<(), JsValue> {
        self.save();
        let mut size = style.size;
        for _ in 0..6 {
            self.set_font(&format!("{size}px 'Inter', sans-serif"));
            let width = self.measure_text(text)?.width();
            if style.max_width.is_none_or(|max| width <= max) || size <= MIN_FONT_PX {
                break;
            }
            size -= 1.0;
        }
        self.set_text_align(match style.align {
            Align::Left => "left",
            Align::Center => "center",
        });
        self.set_text_baseline(match style.baseline {
            Baseline::Top => "top",
            Baseline::Middle => "middle",
            Baseline::Bottom => "bottom",
        });
        self.set_line_width(4.0);
        self.set_stroke_style_str(HALO);
        self.stroke_text(text, at.x, at.y)?;
        self.set_fill_style_str(INK);
        self.fill_text(text, at.x, at.y)?;
        self.restore();
        Ok(())
    }
}

/// Fill then stroke the current path.
fn paint_path(ctx: &CanvasRenderingContext2d, style: &ShapeStyle<'_>) -> Result<(), JsValue> {
    apply_dash(ctx, style.dash)?;
    if let Some(fill) = style.fill {
        ctx.set_fill_style_str(fill);
        ctx.fill();
    }
    if let Some(stroke) = style.stroke {
        ctx.set_stroke_style_str(stroke);
        ctx.set_line_width(style.line_width);
        ctx.stroke();
    }
    Ok(())
}

fn apply_dash(ctx: &CanvasRenderingContext2d, dash: Option<[f64; 2]>) -> Result<(), JsValue> {
    let segments = js_sys::Array::new();
    if let Some([on, off]) = dash {
        segments.push(&on.into());
        segments.push(&off.into());
    }
    ctx.set_line_dash(&segments)
}
