use crate::types::{SelenoError, SelenoResult};
use gdal::cpl::CslStringList;
use gdal::spatial_ref::SpatialRef;
use gdal::{Dataset, GeoTransform};
use std::ffi::{c_char, c_double, c_int, CStr, CString};

const FALSE: c_int = 0;

/// Output grid suggested by GDAL for reprojecting a dataset into a new CRS.
#[derive(Debug, Clone)]
pub struct WarpGeometry {
    pub transform: GeoTransform,
    pub width: usize,
    pub height: usize,
}

/// Compute the transform and raster size that cover `src` once reprojected
/// into `dst_srs`, without creating any output dataset.
pub fn suggested_geometry(src: &Dataset, dst_srs: &SpatialRef) -> SelenoResult<WarpGeometry> {
    let wkt = dst_srs.to_wkt()?;
    let target_srs = CString::new(wkt)
        .map_err(|e| SelenoError::Warp(format!("target CRS WKT contains NUL: {}", e)))?;

    // The destination dataset handle is omitted so the transformer maps
    // source pixel/line coordinates to destination georeferenced coordinates.
    unsafe {
        let transformer_arg = check_pointer(
            gdal_sys::GDALCreateGenImgProjTransformer(
                src.c_dataset(),
                std::ptr::null(),
                std::ptr::null_mut(),
                target_srs.as_ptr(),
                FALSE,
                0.0,
                0,
            ),
            "GDALCreateGenImgProjTransformer",
        )?;

        let mut transform: GeoTransform = [0.0; 6];
        let mut cols: c_int = 0;
        let mut rows: c_int = 0;

        let rc = gdal_sys::GDALSuggestedWarpOutput(
            src.c_dataset(),
            Some(gdal_sys::GDALGenImgProjTransform),
            transformer_arg,
            transform.as_mut_ptr(),
            &mut cols,
            &mut rows,
        );

        gdal_sys::GDALDestroyGenImgProjTransformer(transformer_arg);
        check_rc(rc, "GDALSuggestedWarpOutput")?;

        Ok(WarpGeometry {
            transform,
            width: cols as usize,
            height: rows as usize,
        })
    }
}

/// Reproject one band of `src` into the matching band of `dst` with bilinear
/// resampling. Destination pixels without source coverage are initialized to
/// the destination band's no-data value.
///
/// Both datasets must already carry their georeferencing; the warp reads the
/// source grid and CRS from the dataset itself.
pub fn reproject_band(src: &Dataset, dst: &Dataset, band: isize) -> SelenoResult<()> {
    let mut str_options = CslStringList::new();
    str_options.add_string("INIT_DEST=NO_DATA")?;

    let src_nodata = src.rasterband(band)?.no_data_value();
    let dst_nodata = dst.rasterband(band)?.no_data_value();
    let (dst_width, dst_height) = dst.raster_size();

    unsafe {
        let warp_options = gdal_sys::GDALCreateWarpOptions();
        (*warp_options).papszWarpOptions = gdal_sys::CSLDuplicate(str_options.as_ptr());
        (*warp_options).hSrcDS = src.c_dataset();
        (*warp_options).hDstDS = dst.c_dataset();
        (*warp_options).nBandCount = 1;
        (*warp_options).panSrcBands =
            gdal_sys::CPLMalloc(std::mem::size_of::<c_int>()).cast::<c_int>();
        (*warp_options).panSrcBands.write(band as c_int);
        (*warp_options).panDstBands =
            gdal_sys::CPLMalloc(std::mem::size_of::<c_int>()).cast::<c_int>();
        (*warp_options).panDstBands.write(band as c_int);
        (*warp_options).pfnTransformer = Some(gdal_sys::GDALGenImgProjTransform);
        (*warp_options).eResampleAlg = gdal_sys::GDALResampleAlg::GRA_Bilinear;

        // Freed by GDALDestroyWarpOptions.
        if let Some(nodata) = src_nodata {
            (*warp_options).padfSrcNoDataReal =
                gdal_sys::CPLMalloc(std::mem::size_of::<c_double>()).cast::<c_double>();
            (*warp_options).padfSrcNoDataReal.write(nodata);
        }
        if let Some(nodata) = dst_nodata {
            (*warp_options).padfDstNoDataReal =
                gdal_sys::CPLMalloc(std::mem::size_of::<c_double>()).cast::<c_double>();
            (*warp_options).padfDstNoDataReal.write(nodata);
        }

        (*warp_options).pTransformerArg = gdal_sys::GDALCreateGenImgProjTransformer(
            src.c_dataset(),
            std::ptr::null(),
            dst.c_dataset(),
            std::ptr::null(),
            FALSE,
            0.0,
            0,
        );
        if (*warp_options).pTransformerArg.is_null() {
            let msg = last_error_message();
            gdal_sys::GDALDestroyWarpOptions(warp_options);
            return Err(SelenoError::Warp(format!(
                "GDALCreateGenImgProjTransformer: {}",
                msg
            )));
        }

        let operation = gdal_sys::GDALCreateWarpOperation(warp_options);
        if operation.is_null() {
            let msg = last_error_message();
            gdal_sys::GDALDestroyGenImgProjTransformer((*warp_options).pTransformerArg);
            gdal_sys::GDALDestroyWarpOptions(warp_options);
            return Err(SelenoError::Warp(format!("GDALCreateWarpOperation: {}", msg)));
        }

        let rc = gdal_sys::GDALChunkAndWarpImage(
            operation,
            0,
            0,
            dst_width as c_int,
            dst_height as c_int,
        );

        gdal_sys::GDALDestroyWarpOperation(operation);
        gdal_sys::GDALDestroyGenImgProjTransformer((*warp_options).pTransformerArg);
        gdal_sys::GDALDestroyWarpOptions(warp_options);
        check_rc(rc, "GDALChunkAndWarpImage")?;
    }

    Ok(())
}

/// Canonical name of the CRS described by a WKT string, as OSR reports it.
pub fn crs_name_from_wkt(wkt: &str) -> SelenoResult<String> {
    let c_wkt = CString::new(wkt.trim())
        .map_err(|e| SelenoError::Warp(format!("CRS WKT contains NUL: {}", e)))?;

    unsafe {
        let srs = check_pointer(
            gdal_sys::OSRNewSpatialReference(c_wkt.as_ptr()),
            "OSRNewSpatialReference",
        )?;
        let name_ptr = gdal_sys::OSRGetName(srs);
        let name = if name_ptr.is_null() {
            None
        } else {
            Some(c_string(name_ptr))
        };
        gdal_sys::OSRDestroySpatialReference(srs);

        name.ok_or_else(|| SelenoError::Warp("spatial reference carries no name".to_string()))
    }
}

fn check_rc(rc: gdal_sys::CPLErr::Type, method_name: &'static str) -> SelenoResult<()> {
    if rc != gdal_sys::CPLErr::CE_None {
        Err(SelenoError::Warp(format!(
            "{}: {}",
            method_name,
            last_error_message()
        )))
    } else {
        Ok(())
    }
}

fn check_pointer<T>(ptr: *mut T, method_name: &'static str) -> SelenoResult<*mut T> {
    if ptr.is_null() {
        let msg = last_error_message();
        unsafe { gdal_sys::CPLErrorReset() };
        Err(SelenoError::Warp(format!("{}: {}", method_name, msg)))
    } else {
        Ok(ptr)
    }
}

fn last_error_message() -> String {
    unsafe { c_string(gdal_sys::CPLGetLastErrorMsg()) }
}

unsafe fn c_string(raw_ptr: *const c_char) -> String {
    CStr::from_ptr(raw_ptr).to_string_lossy().into_owned()
}
