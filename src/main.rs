//! Grows 3D tree skeletons from L-system grammars
//!
//! The main entrypoint is actually in [`cli::run`] ('src/cli.rs'), which parses the arguments
//! and then calls the `run` method on [`AppSettings`]. The grammar engine itself lives in the
//! library, under `tree_skeleton::gen`.

use std::fs::File;
use std::io::{self, Write};
use std::process::exit;

use eyre::WrapErr;
use serde::Serialize;

mod cli;
mod logging;

use tree_skeleton::gen::{self, FromJsonGrammar};
use tree_skeleton::img::{ImageConfig, PixelCount, View};
use tree_skeleton::skeleton::{Bounds, Sphere};
use tree_skeleton::{GrowthConfig, GrowthReport, Skeleton, TreeGenerator};

struct AppSettings<'cli> {
    model: cli::Model<'cli>,
    overrides: cli::Overrides,
    display_method: cli::DisplayMethod<'cli>,
}

/// Padding added around rendered images, in pixels
const IMAGE_PADDING: PixelCount = 40;

fn main() {
    // Internally calls `AppSettings::run`
    cli::run()
}

impl AppSettings<'_> {
    /// Runs the app until completion, using the settings filled by the `cli` module
    fn run(&self) {
        if let Err(e) = self.try_run() {
            eprintln!("{:?}", e);
            exit(1)
        }
    }

    fn try_run(&self) -> eyre::Result<()> {
        let config = self.make_config().wrap_err("failed to construct model")?;

        let mut generator =
            TreeGenerator::new(config).wrap_err("invalid parameters for growing the tree")?;
        let report = generator.grow();
        let skeleton = generator.skeleton();

        tracing::debug!(
            bounds = ?skeleton.bounds(),
            ground = ?skeleton.ground_level(),
            "skeleton grown"
        );

        match &self.display_method {
            cli::DisplayMethod::Csv { file } => {
                let mut writer = open_output(*file)?;
                write_csv(&mut writer, skeleton).wrap_err("failed to write CSV")
            }
            cli::DisplayMethod::Json { file } => {
                let mut writer = open_output(*file)?;
                write_json(&mut writer, skeleton, report).wrap_err("failed to write JSON")
            }
            cli::DisplayMethod::Png { file, view, size } => {
                Self::save_png(skeleton, file, *view, *size)
            }
        }
    }

    /// Produces the configuration to grow, with any command-line overrides applied
    fn make_config(&self) -> eyre::Result<GrowthConfig> {
        use gen::presets::{DEFAULT_BRANCH_LENGTH, DEFAULT_ITERATIONS};

        let mut config = match &self.model {
            cli::Model::FromJson { file } => FromJsonGrammar::from_file(file)?.into_config(),
            cli::Model::Preset(preset) => preset.config(DEFAULT_ITERATIONS, DEFAULT_BRANCH_LENGTH),
        };

        let o = &self.overrides;
        if let Some(n) = o.iterations {
            config.iterations = n;
        }
        if let Some(len) = o.initial_branch_length {
            config.initial_branch_length = len;
        }
        if let Some(r) = o.length_reduction_factor {
            config.length_reduction_factor = r;
        }

        Ok(config)
    }

    fn save_png(skeleton: &Skeleton, file: &str, view: View, size: PixelCount) -> eyre::Result<()> {
        let img_config = ImageConfig::fit(skeleton, view, size, IMAGE_PADDING);
        tracing::debug!(
            width = img_config.width,
            height = img_config.height,
            scale = img_config.scale,
            "rendering image"
        );

        img_config
            .make_image(skeleton)
            .save(file)
            .wrap_err_with(|| format!("failed to write image to {:?}", file))?;

        tracing::info!(%file, "wrote image");
        Ok(())
    }
}

/// Opens the file for writing, or returns a handle to stdout if there isn't one
fn open_output(file: Option<&str>) -> eyre::Result<Box<dyn Write>> {
    match file {
        Some(f) => {
            let w = File::create(f)
                .wrap_err_with(|| format!("failed to open file {:?} for writing", f))?;
            Ok(Box::new(io::BufWriter::new(w)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Writes every point, then every segment, as lines of CSV
///
/// Points only fill in the first three coordinates; segments give both ends.
fn write_csv(writer: &mut impl Write, skeleton: &Skeleton) -> io::Result<()> {
    writeln!(writer, "kind,index,x,y,z,end_x,end_y,end_z")?;

    for (i, p) in skeleton.points().iter().enumerate() {
        writeln!(writer, "point,{},{},{},{},,,", i, p.x, p.y, p.z)?;
    }

    for (i, s) in skeleton.segments().iter().enumerate() {
        let (a, b) = (s.start, s.end);
        writeln!(
            writer,
            "segment,{},{},{},{},{},{},{}",
            i, a.x, a.y, a.z, b.x, b.y, b.z
        )?;
    }

    writer.flush()
}

/// Everything written by the `json` display method
#[derive(Serialize)]
struct JsonOutput<'a> {
    report: GrowthReport,
    bounds: Option<Bounds>,
    bounding_sphere: Option<Sphere>,
    skeleton: &'a Skeleton,
}

fn write_json(writer: &mut impl Write, skeleton: &Skeleton, report: GrowthReport) -> eyre::Result<()> {
    let output = JsonOutput {
        report,
        bounds: skeleton.bounds(),
        bounding_sphere: skeleton.bounding_sphere(),
        skeleton,
    };

    serde_json::to_writer_pretty(&mut *writer, &output)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
