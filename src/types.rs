use gdal::spatial_ref::SpatialRef;
use std::str::FromStr;

/// No-data sentinel written into every float raster this crate produces.
pub const NO_DATA: f64 = -999.0;

/// Axis-aligned rectangle in map coordinates.
///
/// Degrees for the geographic lunar CRS, meters for the projected one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

/// A single ground control point tying a pixel to a map location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundControlPoint {
    pub row: f64,
    pub col: f64,
    pub x: f64, // map x (longitude or easting)
    pub y: f64, // map y (latitude or northing)
}

/// The two lunar coordinate reference systems this crate projects into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LunarCrs {
    /// Geographic Moon 2000 (ESRI:104903), degrees
    GcsMoon2000,
    /// Moon 2000 Equidistant Cylindrical (ESRI:103881), meters
    EquidistantCylindrical,
}

impl LunarCrs {
    /// Authority code understood by OSR, e.g. "ESRI:104903".
    pub fn authority(&self) -> &'static str {
        match self {
            LunarCrs::GcsMoon2000 => "ESRI:104903",
            LunarCrs::EquidistantCylindrical => "ESRI:103881",
        }
    }

    /// Canonical CRS name as reported by GDAL for this system.
    pub fn crs_name(&self) -> &'static str {
        match self {
            LunarCrs::GcsMoon2000 => "GCS_Moon_2000",
            LunarCrs::EquidistantCylindrical => "Moon_2000_Equidistant_Cylindrical",
        }
    }

    /// Suffix appended to output file stems for this system.
    pub fn path_suffix(&self) -> &'static str {
        match self {
            LunarCrs::GcsMoon2000 => "_gcs",
            LunarCrs::EquidistantCylindrical => "_edcm",
        }
    }

    /// Resolve the authority code into an OSR spatial reference.
    pub fn spatial_ref(&self) -> SelenoResult<SpatialRef> {
        Ok(SpatialRef::from_definition(self.authority())?)
    }

    /// Match a canonical CRS name (as read from a dataset or .prj file).
    pub fn from_crs_name(name: &str) -> Option<LunarCrs> {
        match name {
            "GCS_Moon_2000" => Some(LunarCrs::GcsMoon2000),
            "Moon_2000_Equidistant_Cylindrical" => Some(LunarCrs::EquidistantCylindrical),
            _ => None,
        }
    }
}

impl std::fmt::Display for LunarCrs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LunarCrs::GcsMoon2000 => write!(f, "gcs"),
            LunarCrs::EquidistantCylindrical => write!(f, "edcm"),
        }
    }
}

impl FromStr for LunarCrs {
    type Err = SelenoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gcs" => Ok(LunarCrs::GcsMoon2000),
            "edcm" => Ok(LunarCrs::EquidistantCylindrical),
            other => Err(SelenoError::InvalidFamilyTag(other.to_string())),
        }
    }
}

/// Error types for lunar raster processing
#[derive(Debug, thiserror::Error)]
pub enum SelenoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("unrecognized projection: {0}")]
    UnrecognizedProjection(String),

    #[error("unrecognized CRS family tag: {0} (expected \"gcs\" or \"edcm\")")]
    InvalidFamilyTag(String),

    #[error("invalid points file: {0}")]
    InvalidPoints(String),

    #[error("command `{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stdout: String,
        stderr: String,
    },

    #[error("warp error: {0}")]
    Warp(String),

    #[error("processing error: {0}")]
    Processing(String),
}

/// Result type for lunar raster operations
pub type SelenoResult<T> = Result<T, SelenoError>;
