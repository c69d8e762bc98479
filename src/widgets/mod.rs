//! Procedural mesh widgets.

pub mod arcgauge;

pub use arcgauge::ArcGauge;
