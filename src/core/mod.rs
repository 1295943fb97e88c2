//! Core lunar raster processing modules

pub mod project;
pub mod align;
pub mod crop;
pub mod convert;
pub mod georeference;

// Re-export main types
pub use project::{project_to_equidistant_cylindrical, project_to_gcs_moon_2000};
pub use align::align_pixels;
pub use crop::{crop_with_bbox, CropTarget};
pub use convert::{convert_to_8bit, convert_to_gtif};
pub use georeference::{
    apply_gcps, gcp_list_to_shell_string, CommandOutput, CondaRun, GdalCommandRunner,
};

use std::path::{Path, PathBuf};

/// Build `<stem><suffix>.tif` next to `path`.
pub(crate) fn path_with_stem_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    path.with_file_name(format!("{}{}.tif", stem, suffix))
}
