use std::error::Error;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use lovelace_compiler::{CompileOptions, compile_with};
use lovelace_netlist::Netlist;
use lovelace_syntax::{TokenizerOptions, print_tree, tokenize_with};
use tracing::{debug, warn};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Format {
    #[default]
    Json,
    Dot,
    Text,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Format::Json),
            "dot" => Ok(Format::Dot),
            "text" => Ok(Format::Text),
            _ => Err(format!("unknown output format {s:?}")),
        }
    }
}

#[derive(Debug)]
struct Arguments {
    input: PathBuf,
    output: Option<PathBuf>,
    format: Format,
    tokenize: bool,
    verbose: bool,
    simulate: bool,
    json: bool,
    server_mode: bool,
    max_depth: usize,
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            format: Format::default(),
            tokenize: false,
            verbose: false,
            simulate: false,
            json: false,
            server_mode: false,
            max_depth: CompileOptions::default().max_depth,
        }
    }
}

fn parse_args() -> Arguments {
    let mut args = Arguments::default();
    {
        let mut ap = argparse::ArgumentParser::new();
        ap.set_description("Compile and simulate Lovelace circuits.");
        ap.refer(&mut args.tokenize).add_option(&["--tokenize"], argparse::StoreTrue, "Print the token tree and exit");
        ap.refer(&mut args.verbose).add_option(
            &["-v", "--verbose"],
            argparse::StoreTrue,
            "Print the token tree and netlist before the result",
        );
        ap.refer(&mut args.simulate).add_option(&["--simulate"], argparse::StoreTrue, "Simulate after compiling");
        ap.refer(&mut args.json).add_option(&["--json"], argparse::StoreTrue, "Read a JSON summary instead of source");
        ap.refer(&mut args.max_depth).add_option(&["--max-depth"], argparse::Store, "Block invocation depth limit");
        ap.refer(&mut args.server_mode).add_option(
            &["--server-mode"],
            argparse::StoreTrue,
            "Reject imports that are not standard library collections",
        );
        ap.refer(&mut args.format).add_option(&["-f", "--format"], argparse::Store, "Output format (json, dot, text)");
        ap.refer(&mut args.output).add_option(&["-o", "--output"], argparse::StoreOption, "Output file");
        ap.refer(&mut args.input).add_argument("INPUT", argparse::Store, "Input file").required();
        ap.parse_args_or_exit();
    }
    args
}

fn setup_tracing() {
    let filter = EnvFilter::builder().with_default_directive(LevelFilter::WARN.into()).from_env_lossy();
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_tree::HierarchicalLayer::new(2).with_writer(io::stderr).with_targets(true))
        .init();
}

#[derive(Debug)]
struct ReadError {
    path: PathBuf,
    error: io::Error,
}

impl Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error reading file {}: {}", self.path.display(), self.error)
    }
}

impl Error for ReadError {}

fn read_error(path: &Path) -> impl FnOnce(io::Error) -> ReadError + '_ {
    move |error| ReadError { path: path.to_owned(), error }
}

fn load(args: &Arguments) -> Result<Option<Netlist>, Box<dyn Error>> {
    if args.json {
        let mut file = File::open(&args.input).map_err(read_error(&args.input))?;
        return Ok(Some(lovelace_json::import(&mut file)?));
    }

    let source = std::fs::read_to_string(&args.input).map_err(read_error(&args.input))?;
    let nodes = tokenize_with(&source, &TokenizerOptions { server_mode: args.server_mode })?;
    if args.tokenize || args.verbose {
        print_tree(&mut io::stdout().lock(), &nodes)?;
    }
    if args.tokenize {
        return Ok(None);
    }
    Ok(Some(compile_with(&nodes, &CompileOptions { max_depth: args.max_depth })?))
}

fn run(args: &Arguments) -> Result<(), Box<dyn Error>> {
    let Some(mut netlist) = load(args)? else { return Ok(()) };
    if args.verbose {
        print!("{netlist}");
    }

    if args.simulate {
        let simulation = lovelace_sim::simulate(&mut netlist);
        if !simulation.converged {
            warn!(rounds = simulation.rounds, "simulation did not converge");
        }
    }

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    match args.format {
        Format::Json => lovelace_json::export(&mut writer, &netlist)?,
        Format::Dot => lovelace_graphviz::describe(&mut writer, &netlist)?,
        Format::Text => write!(writer, "{netlist}")?,
    }
    writer.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    setup_tracing();
    let args = parse_args();
    debug!(?args, "starting");
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}
