use crate::core::path_with_stem_suffix;
use crate::types::{SelenoResult, NO_DATA};
use crate::warp;
use gdal::{Dataset, DriverManager, GeoTransform};
use std::path::{Path, PathBuf};

/// Re-grid `target` onto the pixel grid of `reference`.
///
/// The output copies the reference's transform (forced north-up), raster size
/// and CRS, keeps the target's band count, and is written next to the target
/// as `<stem>_aligned.tif` (Float32, no-data -999, bilinear resampling). Each
/// band is warped from the target's own georeferencing onto the new grid.
pub fn align_pixels<P, Q>(reference_path: P, target_path: Q) -> SelenoResult<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let reference = Dataset::open(reference_path.as_ref())?;
    let ref_transform = reference.geo_transform()?;
    let ref_projection = reference.projection();
    let (ref_width, ref_height) = reference.raster_size();

    let target = Dataset::open(target_path.as_ref())?;
    let band_count = target.raster_count();

    log::info!(
        "Aligning {} to the {}x{} grid of {}",
        target_path.as_ref().display(),
        ref_height,
        ref_width,
        reference_path.as_ref().display()
    );

    // Reference origin with north-up pixel sizes, rotation terms dropped.
    let aligned_transform: GeoTransform = [
        ref_transform[0],
        ref_transform[1].abs(),
        0.0,
        ref_transform[3],
        0.0,
        -ref_transform[5].abs(),
    ];

    let save_path = path_with_stem_suffix(target_path.as_ref(), "_aligned");
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut dst = driver.create_with_band_type::<f32, _>(
        &save_path,
        ref_width as isize,
        ref_height as isize,
        band_count,
    )?;
    dst.set_geo_transform(&aligned_transform)?;
    dst.set_projection(&ref_projection)?;

    for band in 1..=band_count {
        dst.rasterband(band)?.set_no_data_value(Some(NO_DATA))?;
        warp::reproject_band(&target, &dst, band)?;
    }

    log::info!("Aligned raster saved to {}", save_path.display());
    Ok(save_path)
}
