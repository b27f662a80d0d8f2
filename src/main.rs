
extern crate aegis_asm;
extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate term_grid;

use aegis_asm::assembler;
use clap::{Arg, ArgMatches, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use std::fs;
use std::path::Path;

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    debug!("Arguments:\n\tVerbosity: {}\n\tOutfile: {}\n\tInfile: {}",
        level_for(args.occurrences_of("verbose")),
        args.value_of("output").unwrap_or("None"),
        args.value_of("INPUT").unwrap_or("None (sample program)")
    );

    let source = match args.value_of("INPUT") {
        Some(ifile) => {
            let ipath = Path::new(ifile);
            match fs::read_to_string(&ipath) {
                Err(err) => {
                    error!("fatal: unable to read input file `{}`: {}", ipath.display(), err);
                    std::process::exit(1);
                },
                Ok(text) => text,
            }
        },
        None => {
            info!("no input file given, assembling the sample program");
            assembler::SAMPLE_PROGRAM.to_owned()
        },
    };

    let program = match assembler::parser::parse(&source) {
        Err(err) => {
            error!("fatal: {}", err);
            std::process::exit(1);
        },
        Ok(program) => program,
    };

    let mut asm = assembler::Assembler::new();
    let out = asm.assemble(&program);

    for diag in out.diagnostics.iter() {
        warn!("{}", diag);
    }

    if args.is_present("print-debug") {
        print_debug(&asm, &out);
    }

    match args.value_of("output") {
        Some(filename) => {
            let opath = Path::new(filename);
            if let Err(err) = fs::write(&opath, &out.listing) {
                error!("fatal: unable to write to output file `{}`: {}", opath.display(), err);
                std::process::exit(1);
            }
            info!("wrote {} word(s) to `{}`", out.words.len(), opath.display());
        },
        None => print!("{}", out.listing),
    }
}

/// Prints the symbol table and the assembled words side by side.
fn print_debug(asm: &assembler::Assembler, out: &assembler::Assembly) {
    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });

    for (name, addr) in asm.symbols().iter() {
        grid.add(Cell::from(format!("{}:", name)));
        grid.add(Cell::from(format!("{:02}", addr)));
    }
    eprintln!("Symbols:\n{}", grid.fit_into_columns(4));

    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });

    for (addr, word) in out.words.iter() {
        grid.add(Cell::from(format!("{:02}:", addr)));
        grid.add(Cell::from(format!("{:>4}", word)));
    }
    eprintln!("Words:\n{}", grid.fit_into_columns(8));
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(Arg::with_name("INPUT")
            .help("Sets the input file to use. The sample program is used if omitted")
            .required(false)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("output")
            .short("o")
            .takes_value(true)
            .help("write the listing to an outfile"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .alias("show")
            .alias("s")
            .takes_value(false)
            .help("prints the symbol table and assembled words to STDERR"))
        .get_matches()
}

fn level_for(verbosity: u64) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

// Log output goes to stderr so the listing can be piped.
fn initialize_logging(verbosity: u64) {
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
        .level(level_for(verbosity))
        .chain(std::io::stderr())
        .apply().ok();
}
