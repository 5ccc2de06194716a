//! ri - convert px measurements in style sheets to resolution-independent units

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use resolution_independence::util::decode_text;
use resolution_independence::{Error, Options, Processor, Result};

#[derive(Parser)]
#[command(name = "ri")]
#[command(version, about = "Convert px measurements to resolution-independent units", long_about = None)]
#[command(after_help = "EXAMPLES:
    ri styles.css -o styles.ri.css        Convert a style sheet
    ri --base-size 32 < in.css > out.css  Read stdin, write stdout
    ri --value '48px 2.4px,36px'          Convert a single value
    ri --config ri.json styles.css        Read options from a JSON file")]
struct Cli {
    /// Input style sheet (stdin if omitted or `-`)
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<String>,

    /// Convert this declaration value instead of reading a style sheet
    #[arg(long, conflicts_with = "input")]
    value: Option<String>,

    /// Treat the input as a declaration list (`a: 1px; b: 2px`) rather than a style sheet
    #[arg(long)]
    declarations: bool,

    /// JSON file with options (`{"baseSize": 24, "riUnit": "rem", ...}`)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Root font size conversions are based on
    #[arg(long, allow_negative_numbers = true)]
    base_size: Option<f64>,

    /// Unit for resolution-independent output
    #[arg(long)]
    ri_unit: Option<String>,

    /// Unit to convert
    #[arg(long)]
    unit: Option<String>,

    /// Unit relabeled 1:1 to --unit
    #[arg(long)]
    absolute_unit: Option<String>,

    /// Smallest size a measurement may shrink to at the lowest resolution
    #[arg(long, allow_negative_numbers = true)]
    min_unit_size: Option<f64>,

    /// Root font size at the lowest supported resolution
    #[arg(long, allow_negative_numbers = true)]
    min_size: Option<f64>,

    /// Maximum fractional digits in converted output
    #[arg(long, allow_negative_numbers = true)]
    precision: Option<i64>,

    /// Fail on malformed values instead of passing them through
    #[arg(long)]
    strict: bool,

    /// Log what was converted (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let processor = Processor::new(options(cli)?.into_rules()?).strict(cli.strict);

    let output = if let Some(ref value) = cli.value {
        let mut out = processor.transform_value(value)?;
        out.push('\n');
        out
    } else {
        let css = read_input(cli.input.as_deref())?;
        if cli.declarations {
            processor.process_declarations(&css)?
        } else {
            processor.process_stylesheet(&css)?
        }
    };

    match cli.output.as_deref() {
        Some(path) => fs::write(path, output)?,
        None => io::stdout().write_all(output.as_bytes())?,
    }
    Ok(())
}

/// Defaults, then the config file, then individual flags.
fn options(cli: &Cli) -> Result<Options> {
    let mut options = match cli.config.as_deref() {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            serde_json::from_str(&json).map_err(|e| Error::Config(format!("{path}: {e}")))?
        }
        None => Options::default(),
    };

    if let Some(base_size) = cli.base_size {
        options.base_size = base_size;
    }
    if let Some(ref ri_unit) = cli.ri_unit {
        options.ri_unit.clone_from(ri_unit);
    }
    if let Some(ref unit) = cli.unit {
        options.unit.clone_from(unit);
    }
    if let Some(ref absolute_unit) = cli.absolute_unit {
        options.absolute_unit.clone_from(absolute_unit);
    }
    if let Some(min_unit_size) = cli.min_unit_size {
        options.min_unit_size = min_unit_size;
    }
    if let Some(min_size) = cli.min_size {
        options.min_size = min_size;
    }
    if let Some(precision) = cli.precision {
        options.precision = precision;
    }
    Ok(options)
}

fn read_input(path: Option<&str>) -> Result<String> {
    let bytes = match path {
        None | Some("-") => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
        Some(path) => fs::read(path)?,
    };
    Ok(decode_text(&bytes).into_owned())
}
