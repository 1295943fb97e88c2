use crate::core::{path_with_stem_suffix, project};
use crate::io::points;
use crate::types::{GroundControlPoint, LunarCrs, SelenoError, SelenoResult};
use crate::warp;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured output of a successfully completed external command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Executes the generated georeferencing commands.
///
/// A command that cannot be spawned or exits non-zero is an error; the
/// captured stdout/stderr travel with it.
pub trait GdalCommandRunner {
    fn run(&self, command: &str) -> SelenoResult<CommandOutput>;
}

/// Runs commands through `conda run` inside a named environment.
#[derive(Debug, Clone)]
pub struct CondaRun {
    pub env_name: String,
}

impl CondaRun {
    pub fn new<S: Into<String>>(env_name: S) -> Self {
        CondaRun {
            env_name: env_name.into(),
        }
    }
}

impl Default for CondaRun {
    fn default() -> Self {
        CondaRun::new("gdal_only")
    }
}

impl GdalCommandRunner for CondaRun {
    fn run(&self, command: &str) -> SelenoResult<CommandOutput> {
        log::info!("Running in conda env {}: {}", self.env_name, command);
        let output = Command::new("conda")
            .args(["run", "-n"])
            .arg(&self.env_name)
            .args(command.split_whitespace())
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        log::debug!("STDOUT: {}", stdout);
        log::debug!("STDERR: {}", stderr);

        if !output.status.success() {
            return Err(SelenoError::CommandFailed {
                command: command.to_string(),
                status: output.status,
                stdout,
                stderr,
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

/// Format a list of GCPs into a `gdal_translate` command string.
///
/// Clauses keep list order: `gdal_translate -gcp <col> <row> <x> <y> ...
/// <src> <dst>`. Paths are interpolated as-is, so paths containing
/// whitespace will not survive the runner's whitespace split.
pub fn gcp_list_to_shell_string<P, Q>(gcps: &[GroundControlPoint], src: P, dst: Q) -> String
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let clauses: Vec<String> = gcps
        .iter()
        .map(|gcp| format!("{} {} {} {}", gcp.col, gcp.row, gcp.x, gcp.y))
        .collect();
    format!(
        "gdal_translate -gcp {} {} {}",
        clauses.join(" -gcp "),
        src.as_ref().display(),
        dst.as_ref().display()
    )
}

/// Georeference a raster with hand-picked control points.
///
/// The raster is first projected into the CRS named by the `.prj` file,
/// which must be one of the two recognized lunar systems. QGIS control
/// points are read against that intermediate, then the external
/// `gdal_translate`/`gdalwarp` pair stamps the GCPs and warps with thin
/// plate splines into the target CRS. The result lands next to the source
/// as `<stem>_gcp.tif`, written by the external tool.
pub fn apply_gcps<P, Q, S, R>(
    src_path: P,
    prj_path: Q,
    points_path: S,
    runner: &R,
) -> SelenoResult<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    S: AsRef<Path>,
    R: GdalCommandRunner,
{
    let src_path = src_path.as_ref();
    let prj_path = prj_path.as_ref();

    let wkt = fs::read_to_string(prj_path)?;
    let crs_name = warp::crs_name_from_wkt(&wkt)?;
    let crs = LunarCrs::from_crs_name(&crs_name).ok_or_else(|| {
        SelenoError::UnrecognizedProjection(format!(
            "{} names CRS {:?}, which is not a recognized lunar system",
            prj_path.display(),
            crs_name
        ))
    })?;

    let scratch = tempfile::tempdir()?;
    let projected = scratch.path().join("projected.tif");
    match crs {
        LunarCrs::GcsMoon2000 => {
            project::project_to_gcs_moon_2000(src_path, Some(&projected))?;
        }
        LunarCrs::EquidistantCylindrical => {
            project::project_to_equidistant_cylindrical(src_path, Some(&projected))?;
        }
    }

    let gcps = points::gcps_from_qgis(&projected, points_path.as_ref())?;

    let translated = scratch.path().join("translated.tif");
    let gcp_path = path_with_stem_suffix(src_path, "_gcp");
    let translate_command = gcp_list_to_shell_string(&gcps, &projected, &translated);
    let warp_command = format!(
        "gdalwarp -r near -tps -t_srs {} {} {}",
        prj_path.display(),
        translated.display(),
        gcp_path.display()
    );

    runner.run(&translate_command)?;
    runner.run(&warp_command)?;

    Ok(gcp_path)
}
