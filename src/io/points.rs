use crate::types::{GroundControlPoint, SelenoError, SelenoResult};
use gdal::{Dataset, GeoTransformEx};
use std::fs;
use std::path::Path;

/// Read a `.points` file written by a hand-georeference in ArcGIS.
///
/// Rows are whitespace-delimited numbers: the map position of a pixel in the
/// raster's current georeferencing, then the asserted map x and y. Pixel
/// row/col come from pushing the first pair through the raster's inverted
/// transform, floored. Blank lines and `#` comments are skipped; file order
/// is preserved.
pub fn gcps_from_arcgis<P, Q>(
    raster_path: P,
    points_path: Q,
) -> SelenoResult<Vec<GroundControlPoint>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let points_path = points_path.as_ref();
    let contents = fs::read_to_string(points_path)?;

    let dataset = Dataset::open(raster_path.as_ref())?;
    let inverse = dataset.geo_transform()?.invert()?;

    let mut gcps = Vec::new();
    for (number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields = parse_fields(line.split_whitespace(), points_path, number)?;
        let (col, row) = inverse.apply(fields[0], fields[1]);
        gcps.push(GroundControlPoint {
            row: row.floor(),
            col: col.floor(),
            x: fields[2],
            y: fields[3],
        });
    }

    Ok(gcps)
}

/// Read a `.points` file written by the QGIS georeferencer.
///
/// Lines are comma-delimited with a fixed two-line header; only the first
/// four fields count: asserted map x and y, then the map position of the
/// pixel. Pixel col/row come from the raster's transform assuming no
/// rotation, unrounded. File order is preserved.
pub fn gcps_from_qgis<P, Q>(raster_path: P, points_path: Q) -> SelenoResult<Vec<GroundControlPoint>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let points_path = points_path.as_ref();
    let contents = fs::read_to_string(points_path)?;

    let dataset = Dataset::open(raster_path.as_ref())?;
    let (width, height) = dataset.raster_size();
    log::info!("WIDTH: {}", width);
    log::info!("HEIGHT: {}", height);

    let transform = dataset.geo_transform()?;
    let (origin_x, pixel_width) = (transform[0], transform[1]);
    let (origin_y, pixel_height) = (transform[3], transform[5]);

    let mut gcps = Vec::new();
    for (number, line) in contents.lines().enumerate().skip(2) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields = parse_fields(line.split(',').take(4), points_path, number)?;
        let col = (fields[2] - origin_x) / pixel_width;
        let row = (fields[3] - origin_y) / pixel_height;
        gcps.push(GroundControlPoint {
            row,
            col,
            x: fields[0],
            y: fields[1],
        });
    }

    Ok(gcps)
}

fn parse_fields<'a, I>(fields: I, path: &Path, line_number: usize) -> SelenoResult<[f64; 4]>
where
    I: Iterator<Item = &'a str>,
{
    let mut parsed = [0.0; 4];
    let mut count = 0;
    for field in fields.take(4) {
        parsed[count] = field.trim().parse::<f64>().map_err(|_| {
            SelenoError::InvalidPoints(format!(
                "{} line {}: {:?} is not numeric",
                path.display(),
                line_number + 1,
                field.trim()
            ))
        })?;
        count += 1;
    }
    if count < 4 {
        return Err(SelenoError::InvalidPoints(format!(
            "{} line {}: expected at least 4 fields, found {}",
            path.display(),
            line_number + 1,
            count
        )));
    }
    Ok(parsed)
}
