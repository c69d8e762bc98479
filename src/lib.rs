//! Procedural mesh widgets for engine user interfaces.
//!
//! The main widget is the [`ArcGauge`](widgets::ArcGauge), a segmented ring whose sections
//! fill along the arc. Widgets generate their geometry on the CPU, only when their
//! configuration changes, and publish it through a double buffered mesh the renderer reads.

pub mod abs;
pub mod logger;
pub mod widgets;
