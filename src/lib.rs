//! Canvas geometry and interaction engine for the vector annotation editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser next to the
//! host's rendering layer. It owns the geometry of every annotation layer and
//! the interaction state around them: viewport pan/zoom and coordinate
//! conversion, marquee and click selection, handle hit-testing with
//! move/resize/rotate transforms, align/distribute, and smart-guide snapping.
//! The host JavaScript layer wires DOM events into [`engine::Engine`] and
//! applies the resulting [`engine::Action`]s (redraws, undo checkpoints,
//! cursor and readout updates).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`layer`] | Annotation layers and their shapes |
//! | [`doc`] | Ordered in-memory layer store |
//! | [`geom`] | Points, rectangles, bounds and affine transforms |
//! | [`bounds`] | Axis-aligned and rotation-aware layer bounds |
//! | [`viewport`] | Zoom, pan, grid and client/content conversion |
//! | [`animation`] | Eased zoom animation |
//! | [`selection`] | Selection set, key object, delete and duplicate |
//! | [`marquee`] | Rubber-band selection |
//! | [`hit`] | Handle and layer hit-testing |
//! | [`transform`] | Move, resize and rotate gestures |
//! | [`align`] | Align and distribute commands |
//! | [`snap`] | Smart-guide snapping |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`render`] | Guide and marquee overlay drawing |
//! | [`config`] | Host options and their validation |
//! | [`consts`] | Shared numeric constants (zoom limits, handle sizes, etc.) |

pub mod align;
pub mod animation;
pub mod bounds;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod layer;
pub mod marquee;
pub mod render;
pub mod selection;
pub mod snap;
pub mod transform;
pub mod viewport;
