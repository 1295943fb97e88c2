use crate::core::path_with_stem_suffix;
use crate::regions;
use crate::types::{BoundingBox, LunarCrs, SelenoError, SelenoResult};
use gdal::raster::{GdalDataType, GdalType, RasterCreationOption};
use gdal::{Dataset, DriverManager, GeoTransform, GeoTransformEx, Metadata};
use std::path::{Path, PathBuf};

/// Where a crop takes its rectangle from.
#[derive(Debug, Clone, PartialEq)]
pub enum CropTarget {
    /// An explicit rectangle in the raster's map coordinates.
    Literal(BoundingBox),
    /// A region registered for the given lunar CRS.
    Named { crs: LunarCrs, name: String },
}

/// Crop a raster to a bounding box, preserving band type, band count, CRS,
/// no-data values and GTiff compression.
///
/// The rectangle is mapped onto the source grid through the inverted
/// transform and rounded to whole pixels. Output naming: a literal rectangle
/// appends `_{left}_{bottom}_{right}_{top}` (one decimal place), a named
/// region appends `_{name}` with spaces turned into underscores. A rectangle
/// that misses the source extent is not pre-validated; it surfaces as a GDAL
/// error from the windowed read or output creation.
pub fn crop_with_bbox<P: AsRef<Path>>(src_path: P, target: &CropTarget) -> SelenoResult<PathBuf> {
    let src_path = src_path.as_ref();
    let (bbox, suffix) = match target {
        CropTarget::Literal(bbox) => (
            *bbox,
            format!(
                "_{:.1}_{:.1}_{:.1}_{:.1}",
                bbox.left, bbox.bottom, bbox.right, bbox.top
            ),
        ),
        CropTarget::Named { crs, name } => {
            let bbox = regions::lookup(*crs, name).ok_or_else(|| {
                SelenoError::UnknownRegion(format!(
                    "{:?} is not a registered {} region (known regions: {})",
                    name,
                    crs,
                    regions::region_names(*crs).join(", ")
                ))
            })?;
            (bbox, format!("_{}", name.replace(' ', "_")))
        }
    };

    let src = Dataset::open(src_path)?;
    let transform = src.geo_transform()?;
    let inverse = transform.invert()?;
    let (col_off_f, row_off_f) = inverse.apply(bbox.left, bbox.top);
    let (col_end_f, row_end_f) = inverse.apply(bbox.right, bbox.bottom);
    let col_off = col_off_f.round() as isize;
    let row_off = row_off_f.round() as isize;
    let width = (col_end_f.round() as isize - col_off).max(0) as usize;
    let height = (row_end_f.round() as isize - row_off).max(0) as usize;

    log::info!(
        "Cropping {} to ({}, {}, {}, {}): {}x{} window at ({}, {})",
        src_path.display(),
        bbox.left,
        bbox.bottom,
        bbox.right,
        bbox.top,
        width,
        height,
        col_off,
        row_off
    );

    // Same grid, re-anchored at the window origin.
    let (origin_x, origin_y) = transform.apply(col_off as f64, row_off as f64);
    let cropped_transform: GeoTransform = [
        origin_x,
        transform[1],
        transform[2],
        origin_y,
        transform[4],
        transform[5],
    ];

    let save_path = path_with_stem_suffix(src_path, &suffix);
    let compression = src.metadata_item("COMPRESSION", "IMAGE_STRUCTURE");

    match src.rasterband(1)?.band_type() {
        GdalDataType::UInt8 => copy_window::<u8>(
            &src,
            &save_path,
            (col_off, row_off),
            (width, height),
            &cropped_transform,
            compression.as_deref(),
        )?,
        GdalDataType::UInt16 => copy_window::<u16>(
            &src,
            &save_path,
            (col_off, row_off),
            (width, height),
            &cropped_transform,
            compression.as_deref(),
        )?,
        GdalDataType::Int16 => copy_window::<i16>(
            &src,
            &save_path,
            (col_off, row_off),
            (width, height),
            &cropped_transform,
            compression.as_deref(),
        )?,
        GdalDataType::UInt32 => copy_window::<u32>(
            &src,
            &save_path,
            (col_off, row_off),
            (width, height),
            &cropped_transform,
            compression.as_deref(),
        )?,
        GdalDataType::Int32 => copy_window::<i32>(
            &src,
            &save_path,
            (col_off, row_off),
            (width, height),
            &cropped_transform,
            compression.as_deref(),
        )?,
        GdalDataType::Float32 => copy_window::<f32>(
            &src,
            &save_path,
            (col_off, row_off),
            (width, height),
            &cropped_transform,
            compression.as_deref(),
        )?,
        GdalDataType::Float64 => copy_window::<f64>(
            &src,
            &save_path,
            (col_off, row_off),
            (width, height),
            &cropped_transform,
            compression.as_deref(),
        )?,
        other => {
            return Err(SelenoError::Processing(format!(
                "unsupported band type {:?} in {}",
                other,
                src_path.display()
            )))
        }
    }

    log::info!("Cropped raster saved to {}", save_path.display());
    Ok(save_path)
}

fn copy_window<T: GdalType + Copy>(
    src: &Dataset,
    save_path: &Path,
    window: (isize, isize),
    size: (usize, usize),
    transform: &GeoTransform,
    compression: Option<&str>,
) -> SelenoResult<()> {
    let band_count = src.raster_count();
    let mut creation_options = Vec::new();
    if let Some(value) = compression {
        creation_options.push(RasterCreationOption {
            key: "COMPRESS",
            value,
        });
    }

    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut dst = driver.create_with_band_type_with_options::<T, _>(
        save_path,
        size.0 as isize,
        size.1 as isize,
        band_count,
        &creation_options,
    )?;
    dst.set_geo_transform(transform)?;
    dst.set_projection(&src.projection())?;

    for band in 1..=band_count {
        let src_band = src.rasterband(band)?;
        let buffer = src_band.read_as::<T>(window, size, size, None)?;
        let mut dst_band = dst.rasterband(band)?;
        dst_band.write((0, 0), size, &buffer)?;
        if let Some(nodata) = src_band.no_data_value() {
            dst_band.set_no_data_value(Some(nodata))?;
        }
    }

    Ok(())
}
