//! Isometric multi-floor map renderer.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It turns a
//! multi-floor indoor map and an optional route into a pseudo-3D isometric
//! drawing on a 2D canvas, and drives an orbit camera from drag, wheel and
//! timer input. The host page supplies the map, route and toggles and is
//! told when the viewer picks a floor; nothing here touches the network.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`]: lifecycle, gestures, auto-rotate |
//! | [`web`] | Browser host binding the core to a canvas element |
//! | [`map`] | Map, route and toggle input types |
//! | [`scene`] | Flattens the map into typed render objects |
//! | [`depth`] | Back-to-front ordering of render objects |
//! | [`render`] | Painter: camera transform and per-object shapes |
//! | [`shade`] | Color parsing and face shading |
//! | [`surface`] | Drawing surface trait with browser and recording backends |
//! | [`camera`] | Orbit camera and presets |
//! | [`input`] | Pointer/wheel types and the gesture state machine |
//! | [`config`] | Host-supplied renderer configuration |
//! | [`consts`] | Shared numeric constants (spacing, clamps, sensitivities) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod depth;
pub mod engine;
pub mod input;
pub mod map;
pub mod render;
pub mod scene;
pub mod shade;
pub mod surface;
pub mod web;
