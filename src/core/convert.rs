use crate::core::path_with_stem_suffix;
use crate::types::{SelenoError, SelenoResult};
use gdal::raster::Buffer;
use gdal::{Dataset, DriverManager};
use ndarray::Array2;
use std::path::{Path, PathBuf};

/// Rewrite a raster into a GeoTIFF container next to the source as
/// `<stem>.tif`. Bands, georeferencing and metadata are copied unchanged.
pub fn convert_to_gtif<P: AsRef<Path>>(src_path: P) -> SelenoResult<PathBuf> {
    let src_path = src_path.as_ref();
    let src = Dataset::open(src_path)?;
    let save_path = src_path.with_extension("tif");

    log::info!("Converting {} to GeoTIFF", src_path.display());
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    src.create_copy(&driver, &save_path, &[])?;

    log::info!("GeoTIFF saved to {}", save_path.display());
    Ok(save_path)
}

/// Rescale band 1 of a raster to 8-bit and save it as `<stem>_8bit.tif`.
///
/// Values are stretched linearly from the band's min/max onto 0..=255 with a
/// truncating cast; a constant band maps to 0. Additional bands are
/// deliberately discarded. The output carries the source geometry and CRS
/// with no-data 0.
pub fn convert_to_8bit<P: AsRef<Path>>(src_path: P) -> SelenoResult<PathBuf> {
    let src_path = src_path.as_ref();
    let src = Dataset::open(src_path)?;
    let (width, height) = src.raster_size();

    let band = src.rasterband(1)?;
    let band_data = band.read_as::<f32>((0, 0), (width, height), (width, height), None)?;
    let image = Array2::from_shape_vec((height, width), band_data.data)
        .map_err(|e| SelenoError::Processing(format!("Failed to reshape band data: {}", e)))?;

    let min = image.fold(f32::INFINITY, |acc, &v| acc.min(v));
    let max = image.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
    let range = max - min;
    log::debug!("Band 1 value range: {} to {}", min, max);

    let scaled: Vec<u8> = image
        .iter()
        .map(|&v| {
            if range > 0.0 {
                ((v - min) / range * 255.0) as u8
            } else {
                0
            }
        })
        .collect();

    let save_path = path_with_stem_suffix(src_path, "_8bit");
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut dst =
        driver.create_with_band_type::<u8, _>(&save_path, width as isize, height as isize, 1)?;
    dst.set_geo_transform(&src.geo_transform()?)?;
    dst.set_projection(&src.projection())?;

    let buffer = Buffer::new((width, height), scaled);
    let mut dst_band = dst.rasterband(1)?;
    dst_band.write((0, 0), (width, height), &buffer)?;
    dst_band.set_no_data_value(Some(0.0))?;

    log::info!("8-bit raster saved to {}", save_path.display());
    Ok(save_path)
}
