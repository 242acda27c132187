//! Command-line shell around the hlsview player core.

pub mod app;
pub mod probe;

pub use probe::ManifestProbe;
