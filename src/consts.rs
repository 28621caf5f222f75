//! Shared numeric constants for the canvas engine.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest zoom factor allowed by default.
pub const DEFAULT_MIN_ZOOM: f64 = 0.1;

/// Largest zoom factor allowed by default.
pub const DEFAULT_MAX_ZOOM: f64 = 5.0;

/// Default duration of an animated zoom, in milliseconds.
pub const DEFAULT_ZOOM_DURATION_MS: f64 = 300.0;

/// Padding in CSS pixels subtracted from the container when fitting the background image.
pub const FIT_WINDOW_PADDING_PX: f64 = 40.0;

/// Padding in content units added on every side by `zoom_to_fit_bounds`.
pub const FIT_BOUNDS_PADDING: f64 = 50.0;

/// Zoom change applied per wheel notch when zooming with Ctrl held.
pub const WHEEL_ZOOM_STEP: f64 = 0.1;

// ── Grid / snapping ─────────────────────────────────────────────

/// Default grid spacing in content units.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;

/// Default smart-guide snap distance in content units.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 8.0;

// ── Handles ─────────────────────────────────────────────────────

/// Half-width in screen pixels of the square hit region around a resize handle.
pub const HANDLE_HALF_SIZE_PX: f64 = 6.0;

/// Distance from the top edge to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

/// Angle step in degrees used when rotation snapping is requested.
pub const ROTATION_SNAP_DEG: f64 = 15.0;

// ── Geometry ────────────────────────────────────────────────────

/// Smallest width/height a resize can produce, in content units.
pub const MIN_LAYER_SIZE: f64 = 1.0;

/// Font size assumed for text layers that do not carry one.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Average glyph advance as a fraction of the font size (monospace estimate).
pub const TEXT_CHAR_WIDTH_RATIO: f64 = 0.6;

/// Line height as a multiple of the font size.
pub const TEXT_LINE_HEIGHT_RATIO: f64 = 1.2;

/// Offset applied to duplicated layers, in content units.
pub const DUPLICATE_OFFSET: f64 = 20.0;
