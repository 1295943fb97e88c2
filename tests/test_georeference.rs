use gdal::raster::Buffer;
use gdal::DriverManager;
use selenography::{
    apply_gcps, CommandOutput, GdalCommandRunner, LunarCrs, SelenoError, SelenoResult,
};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const WGS84_WKT: &str = "GEOGCS[\"WGS 84\",DATUM[\"WGS_1984\",SPHEROID[\"WGS 84\",6378137,298.257223563]],PRIMEM[\"Greenwich\",0],UNIT[\"degree\",0.0174532925199433]]";

/// Records every command instead of launching GDAL.
struct MockRunner {
    commands: RefCell<Vec<String>>,
}

impl MockRunner {
    fn new() -> Self {
        MockRunner {
            commands: RefCell::new(Vec::new()),
        }
    }
}

impl GdalCommandRunner for MockRunner {
    fn run(&self, command: &str) -> SelenoResult<CommandOutput> {
        self.commands.borrow_mut().push(command.to_string());
        Ok(CommandOutput {
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

/// Fails on the first command, like a missing conda environment would.
struct FailingRunner {
    commands: RefCell<Vec<String>>,
}

impl GdalCommandRunner for FailingRunner {
    fn run(&self, command: &str) -> SelenoResult<CommandOutput> {
        self.commands.borrow_mut().push(command.to_string());
        Err(SelenoError::Processing("simulated launch failure".to_string()))
    }
}

fn lunar_crs_available() -> bool {
    LunarCrs::GcsMoon2000.spatial_ref().is_ok()
        && LunarCrs::EquidistantCylindrical.spatial_ref().is_ok()
}

fn write_scene(path: &Path, with_lunar_srs: bool) {
    let driver = DriverManager::get_driver_by_name("GTiff").expect("GTiff driver");
    let mut dataset = driver
        .create_with_band_type::<f32, _>(path, 50, 50, 1)
        .expect("create raster");
    dataset
        .set_geo_transform(&[-46.0, 0.1, 0.0, 43.0, 0.0, -0.1])
        .expect("set transform");
    if with_lunar_srs {
        let srs = LunarCrs::GcsMoon2000.spatial_ref().expect("lunar srs");
        dataset.set_spatial_ref(&srs).expect("set srs");
    }
    let buffer = Buffer::new((50, 50), vec![1.0f32; 2500]);
    dataset
        .rasterband(1)
        .expect("band")
        .write((0, 0), (50, 50), &buffer)
        .expect("write band");
}

fn write_qgis_points(path: &Path) {
    fs::write(
        path,
        "mapX,mapY,pixelX,pixelY,enable\n\
         #CRS: none\n\
         -44.0,41.0,-45.5,42.5,1\n\
         -41.0,39.0,-44.0,40.0,1\n",
    )
    .expect("write points");
}

#[test]
fn test_georeferencing_runs_translate_then_warp() {
    let _ = env_logger::try_init();
    if !lunar_crs_available() {
        println!("Lunar CRS definitions not available, skipping test");
        return;
    }

    let dir = TempDir::new().expect("temp dir");
    let src = dir.path().join("scene.tif");
    let prj = dir.path().join("scene.prj");
    let points = dir.path().join("scene.points");
    write_scene(&src, true);
    let wkt = LunarCrs::GcsMoon2000
        .spatial_ref()
        .expect("lunar srs")
        .to_wkt()
        .expect("wkt");
    fs::write(&prj, wkt).expect("write prj");
    write_qgis_points(&points);

    let runner = MockRunner::new();
    let out = apply_gcps(&src, &prj, &points, &runner).expect("apply gcps");
    assert_eq!(out, dir.path().join("scene_gcp.tif"));

    let commands = runner.commands.borrow();
    assert_eq!(commands.len(), 2);

    assert!(commands[0].starts_with("gdal_translate -gcp "));
    assert_eq!(commands[0].matches("-gcp").count(), 2);
    assert!(commands[0].contains("projected.tif"));
    assert!(commands[0].ends_with("translated.tif"));

    assert!(commands[1].starts_with("gdalwarp -r near -tps -t_srs "));
    assert!(commands[1].contains(&prj.display().to_string()));
    assert!(commands[1].ends_with("scene_gcp.tif"));
}

#[test]
fn test_georeferencing_stops_after_failed_translate() {
    if !lunar_crs_available() {
        println!("Lunar CRS definitions not available, skipping test");
        return;
    }

    let dir = TempDir::new().expect("temp dir");
    let src = dir.path().join("scene.tif");
    let prj = dir.path().join("scene.prj");
    let points = dir.path().join("scene.points");
    write_scene(&src, true);
    let wkt = LunarCrs::GcsMoon2000
        .spatial_ref()
        .expect("lunar srs")
        .to_wkt()
        .expect("wkt");
    fs::write(&prj, wkt).expect("write prj");
    write_qgis_points(&points);

    let runner = FailingRunner {
        commands: RefCell::new(Vec::new()),
    };
    let result = apply_gcps(&src, &prj, &points, &runner);
    assert!(result.is_err());
    assert_eq!(runner.commands.borrow().len(), 1);
}

#[test]
fn test_non_lunar_projection_is_rejected_before_any_command() {
    let dir = TempDir::new().expect("temp dir");
    let src = dir.path().join("scene.tif");
    let prj = dir.path().join("scene.prj");
    let points = dir.path().join("scene.points");
    write_scene(&src, false);
    fs::write(&prj, WGS84_WKT).expect("write prj");
    write_qgis_points(&points);

    let runner = MockRunner::new();
    let err = apply_gcps(&src, &prj, &points, &runner).expect_err("must reject WGS 84");

    match err {
        SelenoError::UnrecognizedProjection(message) => {
            assert!(message.contains("WGS 84"));
        }
        other => panic!("expected UnrecognizedProjection, got {:?}", other),
    }
    assert!(runner.commands.borrow().is_empty());
    assert!(!dir.path().join("scene_gcp.tif").exists());
}

#[test]
fn test_unparseable_projection_file_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let src = dir.path().join("scene.tif");
    let prj = dir.path().join("scene.prj");
    let points = dir.path().join("scene.points");
    write_scene(&src, false);
    fs::write(&prj, "not well known text").expect("write prj");
    write_qgis_points(&points);

    let runner = MockRunner::new();
    let result = apply_gcps(&src, &prj, &points, &runner);
    assert!(result.is_err());
    assert!(runner.commands.borrow().is_empty());
}
