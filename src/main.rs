extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate term_grid;

pub mod assembler;

use clap::{Arg, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use std::fs::File;
use std::io::{self, BufWriter, Read};
use std::panic;
use std::path::Path;

use assembler::ast::Program;
use assembler::error::ErrorKind;
use assembler::{lexer, parser, xml};

const SUCCESS: i32 = 0;
const PARAMETER_ERROR: i32 = 10;
const OUTPUT_ERROR: i32 = 12;

const RETURN_CODES: &str = "\
RETURN CODES:
    0     success
    10    invalid parameters
    11    input error
    12    output error
    21    invalid or absent source header
    22    unknown or invalid opcode in source code
    23    other lexical or syntax error in source code
    99    internal error";

/// Everything the command line configures.
struct Config {
    input:       Option<String>,
    output:      Option<String>,
    verbosity:   u64,
    quiet:       bool,
    print_debug: bool,
}

fn main() {
    let config = match process_arguments() {
        Ok(config) => config,
        Err(err) => match err.kind {
            clap::ErrorKind::HelpDisplayed | clap::ErrorKind::VersionDisplayed => err.exit(),
            _ => {
                eprintln!("{}", err.message);
                std::process::exit(PARAMETER_ERROR);
            },
        },
    };
    initialize_logging(&config);

    debug!("Arguments:\n\tVerbosity: {}\n\tQuiet: {}\n\tPrint Debug: {}\n\tOutfile: {}\n\tInfile: {}",
        level_filter(&config),
        config.quiet,
        config.print_debug,
        config.output.as_deref().unwrap_or("<stdout>"),
        config.input.as_deref().unwrap_or("<stdin>")
    );

    silence_panics(&config);
    let code = match panic::catch_unwind(|| run(&config)) {
        Ok(code) => code,
        Err(_) => {
            error!("fatal: internal error, parsing aborted");
            ErrorKind::Internal.exit_code()
        },
    };
    std::process::exit(code);
}

/// Parses the input and writes the XML, returning the process exit status.
fn run(config: &Config) -> i32 {
    let reader: Box<dyn Read> = match &config.input {
        Some(ifile) => {
            let ipath = Path::new(ifile);
            match File::open(&ipath) {
                Err(err) => {
                    error!("fatal: unable to open input file `{}`: {}", ipath.display(), err);
                    return ErrorKind::Input.exit_code();
                },
                Ok(file) => Box::new(file),
            }
        },
        None => Box::new(io::stdin()),
    };

    let program = match parser::Parser::new(lexer::lines(reader)).run() {
        Ok(program) => program,
        Err(err) => {
            error!("{}", err);
            return err.kind().exit_code();
        },
    };

    if config.print_debug {
        print_debug_grid(&program);
    }

    let written = match &config.output {
        Some(ofile) => {
            let opath = Path::new(ofile);
            File::create(&opath)
                .and_then(|file| xml::write_program(&program, &mut BufWriter::new(file)))
                .map_err(|err| format!("unable to write to output file `{}`: {}", opath.display(), err))
        },
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            xml::write_program(&program, &mut handle)
                .map_err(|err| format!("unable to write to standard output: {}", err))
        },
    };

    if let Err(msg) = written {
        error!("fatal: {}", msg);
        return OUTPUT_ERROR;
    }

    info!("Successfully parsed {} instruction(s).", program.len());
    SUCCESS
}

fn print_debug_grid(program: &Program) {
    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });

    for ins in program.instructions() {
        grid.add(Cell::from(format!("{:>4}:", ins.order)));
        grid.add(Cell::from(ins.opcode.to_string()));
        grid.add(Cell::from("=>".to_string()));
        grid.add(Cell::from(
            ins.operands.iter()
                .map(|op| format!("{}:{}", op.type_name(), op.value()))
                .collect::<Vec<String>>()
                .join(" ")
        ));
    }

    eprintln!("{}", grid.fit_into_columns(4));
}

fn process_arguments() -> Result<Config, clap::Error> {
    let args = App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .after_help(RETURN_CODES)
        .arg(Arg::with_name("INPUT")
            .help("Sets the input file to use (standard input when omitted)")
            .required(false)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("quiet")
            .short("q")
            .takes_value(false)
            .conflicts_with("verbose")
            .help("suppresses all diagnostics on STDERR"))
        .arg(Arg::with_name("output")
            .short("o")
            .takes_value(true)
            .help("write output to an outfile instead of STDOUT"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .alias("show")
            .alias("s")
            .takes_value(false)
            .help("prints the parsed instructions as a table to STDERR"))
        .get_matches_safe()?;

    Ok(Config {
        input:       args.value_of("INPUT").map(str::to_owned),
        output:      args.value_of("output").map(str::to_owned),
        verbosity:   args.occurrences_of("verbose"),
        quiet:       args.is_present("quiet"),
        print_debug: args.is_present("print-debug"),
    })
}

/// Under `-q` a panic is still reported through the exit status, but the
/// default hook no longer prints it. Returns whether the hook was replaced.
fn silence_panics(config: &Config) -> bool {
    if config.quiet {
        panic::set_hook(Box::new(|_| {}));
    }
    config.quiet
}

fn level_filter(config: &Config) -> log::LevelFilter {
    if config.quiet {
        return log::LevelFilter::Off;
    }
    match config.verbosity {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn initialize_logging(config: &Config) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level_filter(config))
        // STDOUT carries the XML.
        .chain(std::io::stderr())
        .apply().ok();
}
