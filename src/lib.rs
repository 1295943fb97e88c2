//! selenography: geospatial raster utilities for lunar imagery
//!
//! Reprojection into the two fixed lunar coordinate systems, pixel-grid
//! alignment against a reference raster, cropping to named or literal
//! bounding boxes, format and bit-depth conversion, and ground-control-point
//! georeferencing through an external GDAL toolkit.

pub mod types;
pub mod regions;
pub mod warp;
pub mod io;
pub mod core;

// Re-export main types and functions for easier access
pub use types::{BoundingBox, GroundControlPoint, LunarCrs, SelenoError, SelenoResult, NO_DATA};

pub use crate::core::{
    align_pixels, apply_gcps, convert_to_8bit, convert_to_gtif, crop_with_bbox,
    gcp_list_to_shell_string, project_to_equidistant_cylindrical, project_to_gcs_moon_2000,
    CommandOutput, CondaRun, CropTarget, GdalCommandRunner,
};
pub use io::{gcps_from_arcgis, gcps_from_qgis};
