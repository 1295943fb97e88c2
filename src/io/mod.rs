//! Readers for files produced by interactive GIS tools

pub mod points;

pub use points::{gcps_from_arcgis, gcps_from_qgis};
