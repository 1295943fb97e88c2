use crate::core::path_with_stem_suffix;
use crate::types::{LunarCrs, SelenoResult, NO_DATA};
use crate::warp;
use gdal::{Dataset, DriverManager};
use std::path::{Path, PathBuf};

/// Reproject a raster into the geographic Moon 2000 CRS (ESRI:104903).
///
/// The output is a Float32 GeoTIFF with no-data -999, resampled bilinearly
/// onto the grid GDAL suggests for the CRS change. When `dst_path` is `None`
/// the result lands next to the source as `<stem>_gcs.tif`.
pub fn project_to_gcs_moon_2000<P: AsRef<Path>>(
    src_path: P,
    dst_path: Option<&Path>,
) -> SelenoResult<PathBuf> {
    reproject_to(src_path.as_ref(), dst_path, LunarCrs::GcsMoon2000)
}

/// Reproject a raster into the Moon 2000 equidistant cylindrical CRS
/// (ESRI:103881).
///
/// Same output conventions as [`project_to_gcs_moon_2000`]; the default
/// destination is `<stem>_edcm.tif`.
pub fn project_to_equidistant_cylindrical<P: AsRef<Path>>(
    src_path: P,
    dst_path: Option<&Path>,
) -> SelenoResult<PathBuf> {
    reproject_to(src_path.as_ref(), dst_path, LunarCrs::EquidistantCylindrical)
}

fn reproject_to(src_path: &Path, dst_path: Option<&Path>, crs: LunarCrs) -> SelenoResult<PathBuf> {
    let src = Dataset::open(src_path)?;
    let (src_width, src_height) = src.raster_size();
    let band_count = src.raster_count();
    log::info!(
        "Reprojecting {} ({}x{} pixels, {} bands) to {}",
        src_path.display(),
        src_height,
        src_width,
        band_count,
        crs.crs_name()
    );

    // Resolve the target grid before any output file exists, so a failed
    // transform calculation leaves nothing behind.
    let dst_srs = crs.spatial_ref()?;
    let geometry = warp::suggested_geometry(&src, &dst_srs)?;

    let save_path = match dst_path {
        Some(path) => path.to_path_buf(),
        None => path_with_stem_suffix(src_path, crs.path_suffix()),
    };

    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut dst = driver.create_with_band_type::<f32, _>(
        &save_path,
        geometry.width as isize,
        geometry.height as isize,
        band_count,
    )?;
    dst.set_geo_transform(&geometry.transform)?;
    dst.set_spatial_ref(&dst_srs)?;

    for band in 1..=band_count {
        dst.rasterband(band)?.set_no_data_value(Some(NO_DATA))?;
        warp::reproject_band(&src, &dst, band)?;
    }

    log::info!("Reprojected raster saved to {}", save_path.display());
    Ok(save_path)
}
