//! Command-line argument handling, producing the [`AppSettings`] that the rest of the app runs

use crate::{logging, AppSettings};
use tree_skeleton::img::{PixelCount, View};
use tree_skeleton::{Float, Preset};

use clap::{value_t, App, Arg, ArgMatches, SubCommand};
use std::path::Path;
use std::str::FromStr;

/// Where the grammar and its parameters come from
pub enum Model<'cli> {
    Preset(Preset),
    FromJson { file: &'cli Path },
}

/// Values given on the command line that take precedence over the model's own
#[derive(Debug, Default)]
pub struct Overrides {
    pub iterations: Option<usize>,
    pub initial_branch_length: Option<Float>,
    pub length_reduction_factor: Option<Float>,
}

/// How the generated skeleton should be output
pub enum DisplayMethod<'cli> {
    /// Writes every point and segment as a CSV line, to the file or stdout
    Csv { file: Option<&'cli str> },
    /// Writes the skeleton and a summary of it as JSON, to the file or stdout
    Json { file: Option<&'cli str> },
    /// Renders the skeleton to a PNG image
    Png {
        file: &'cli str,
        view: View,
        size: PixelCount,
    },
}

fn app() -> App<'static, 'static> {
    App::new("tree-skeleton")
        .version(clap::crate_version!())
        .about("Grows 3D tree skeletons from L-system grammars")
        .setting(clap::AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("preset")
                .long("preset")
                .takes_value(true)
                .value_name("NAME")
                .conflicts_with("json")
                .help("Grow one of the built-in grammars: tree1, tree2, tree3, or tree4 [default: tree1]"),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .takes_value(true)
                .value_name("FILE")
                .help("Read the grammar and growth parameters from a JSON file"),
        )
        .arg(
            Arg::with_name("iterations")
                .short("n")
                .long("iterations")
                .takes_value(true)
                .value_name("COUNT")
                .help("Number of times to rewrite the axiom"),
        )
        .arg(
            Arg::with_name("length")
                .long("length")
                .takes_value(true)
                .value_name("LENGTH")
                .help("Length of the first branch"),
        )
        .arg(
            Arg::with_name("reduction")
                .long("reduction")
                .takes_value(true)
                .value_name("FACTOR")
                .help("Fraction by which each branch is shorter than the last, within [0, 1)"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log at debug level (overridden by RUST_LOG)"),
        )
        .subcommand(
            SubCommand::with_name("csv")
                .about("Write points and segments as CSV")
                .arg(file_arg().help("Output file [default: stdout]")),
        )
        .subcommand(
            SubCommand::with_name("json")
                .about("Write the skeleton as JSON")
                .arg(file_arg().help("Output file [default: stdout]")),
        )
        .subcommand(
            SubCommand::with_name("png")
                .about("Render the skeleton to a PNG image")
                .arg(file_arg().required(true).help("Output file"))
                .arg(
                    Arg::with_name("view")
                        .long("view")
                        .takes_value(true)
                        .possible_values(&["front", "side", "top"])
                        .default_value("side")
                        .help("Direction to view the tree from"),
                )
                .arg(
                    Arg::with_name("size")
                        .long("size")
                        .takes_value(true)
                        .value_name("PIXELS")
                        .default_value("800")
                        .help("Size of the larger side of the image, before padding"),
                ),
        )
}

fn file_arg() -> Arg<'static, 'static> {
    Arg::with_name("file")
        .short("f")
        .long("file")
        .takes_value(true)
        .value_name("FILE")
}

/// Parses the argument if it's present, exiting with clap's usual error if it's malformed
fn optional_value<T>(matches: &ArgMatches, name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match matches.is_present(name) {
        true => Some(value_t!(matches, name, T).unwrap_or_else(|e| e.exit())),
        false => None,
    }
}

/// Parses the command-line arguments and runs the app
pub fn run() {
    let matches = app().get_matches();

    logging::init_logging(matches.is_present("verbose"));

    let model = match matches.value_of("json") {
        Some(file) => Model::FromJson {
            file: Path::new(file),
        },
        None => Model::Preset(optional_value(&matches, "preset").unwrap_or(Preset::Tree1)),
    };

    let overrides = Overrides {
        iterations: optional_value(&matches, "iterations"),
        initial_branch_length: optional_value(&matches, "length"),
        length_reduction_factor: optional_value(&matches, "reduction"),
    };

    let display_method = match matches.subcommand() {
        ("csv", Some(sub)) => DisplayMethod::Csv {
            file: sub.value_of("file"),
        },
        ("json", Some(sub)) => DisplayMethod::Json {
            file: sub.value_of("file"),
        },
        ("png", Some(sub)) => DisplayMethod::Png {
            file: sub.value_of("file").unwrap_or_default(),
            view: value_t!(sub, "view", View).unwrap_or_else(|e| e.exit()),
            size: value_t!(sub, "size", PixelCount).unwrap_or_else(|e| e.exit()),
        },
        // SubcommandRequiredElseHelp means clap has already exited otherwise
        _ => unreachable!(),
    };

    AppSettings {
        model,
        overrides,
        display_method,
    }
    .run()
}
