use gdal::raster::{Buffer, GdalDataType};
use gdal::{Dataset, DriverManager};
use selenography::{convert_to_8bit, convert_to_gtif};
use std::path::Path;
use tempfile::TempDir;

fn write_f32_raster(path: &Path, transform: [f64; 6], width: usize, height: usize, bands: &[Vec<f32>]) {
    let driver = DriverManager::get_driver_by_name("GTiff").expect("GTiff driver");
    let mut dataset = driver
        .create_with_band_type::<f32, _>(path, width as isize, height as isize, bands.len() as isize)
        .expect("create raster");
    dataset.set_geo_transform(&transform).expect("set transform");
    for (index, values) in bands.iter().enumerate() {
        let buffer = Buffer::new((width, height), values.clone());
        dataset
            .rasterband(index as isize + 1)
            .expect("band")
            .write((0, 0), (width, height), &buffer)
            .expect("write band");
    }
}

#[test]
fn test_gtif_conversion_replaces_extension() {
    let dir = TempDir::new().expect("temp dir");
    let src = dir.path().join("scene.img");
    let values: Vec<f32> = (0..12).map(|i| i as f32 * 0.5).collect();
    write_f32_raster(&src, [5.0, 1.0, 0.0, 50.0, 0.0, -1.0], 4, 3, &[values.clone()]);

    let out = convert_to_gtif(&src).expect("convert");
    assert_eq!(out, dir.path().join("scene.tif"));

    let dataset = Dataset::open(&out).expect("open converted");
    assert_eq!(dataset.raster_size(), (4, 3));
    assert_eq!(
        dataset.geo_transform().expect("transform"),
        [5.0, 1.0, 0.0, 50.0, 0.0, -1.0]
    );
    let data = dataset
        .rasterband(1)
        .expect("band")
        .read_as::<f32>((0, 0), (4, 3), (4, 3), None)
        .expect("read")
        .data;
    assert_eq!(data, values);
}

#[test]
fn test_8bit_scales_band_range_to_full_width() {
    let dir = TempDir::new().expect("temp dir");
    let src = dir.path().join("dn.tif");
    write_f32_raster(
        &src,
        [0.0, 1.0, 0.0, 2.0, 0.0, -1.0],
        2,
        2,
        &[vec![-4.0, 0.0, 6.0, 16.0]],
    );

    let out = convert_to_8bit(&src).expect("convert");
    assert_eq!(out, dir.path().join("dn_8bit.tif"));

    let dataset = Dataset::open(&out).expect("open converted");
    assert_eq!(dataset.raster_count(), 1);
    let rasterband = dataset.rasterband(1).expect("band");
    assert_eq!(rasterband.band_type(), GdalDataType::UInt8);
    assert_eq!(rasterband.no_data_value(), Some(0.0));

    let data = rasterband
        .read_as::<u8>((0, 0), (2, 2), (2, 2), None)
        .expect("read")
        .data;
    assert_eq!(data, vec![0, 51, 127, 255]);
    assert_eq!(
        dataset.geo_transform().expect("transform"),
        [0.0, 1.0, 0.0, 2.0, 0.0, -1.0]
    );
}

#[test]
fn test_8bit_takes_first_band_only() {
    let dir = TempDir::new().expect("temp dir");
    let src = dir.path().join("pair.tif");
    write_f32_raster(
        &src,
        [0.0, 1.0, 0.0, 1.0, 0.0, -1.0],
        2,
        1,
        &[vec![0.0, 10.0], vec![500.0, 900.0]],
    );

    let out = convert_to_8bit(&src).expect("convert");
    let dataset = Dataset::open(&out).expect("open converted");
    assert_eq!(dataset.raster_count(), 1);
    let data = dataset
        .rasterband(1)
        .expect("band")
        .read_as::<u8>((0, 0), (2, 1), (2, 1), None)
        .expect("read")
        .data;
    // Scaled from band 1 alone: 0..10 maps to 0..255.
    assert_eq!(data, vec![0, 255]);
}

#[test]
fn test_8bit_constant_band_collapses_to_zero() {
    let dir = TempDir::new().expect("temp dir");
    let src = dir.path().join("flat.tif");
    write_f32_raster(
        &src,
        [0.0, 1.0, 0.0, 1.0, 0.0, -1.0],
        3,
        1,
        &[vec![5.5, 5.5, 5.5]],
    );

    let out = convert_to_8bit(&src).expect("convert");
    let dataset = Dataset::open(&out).expect("open converted");
    let data = dataset
        .rasterband(1)
        .expect("band")
        .read_as::<u8>((0, 0), (3, 1), (3, 1), None)
        .expect("read")
        .data;
    assert_eq!(data, vec![0, 0, 0]);
}
