//! Parses command line arguments, builds the `App` from a config file and
//! flag overrides and runs it until ctrl+c, SIGTERM or the requested
//! amount of samples.
//!
//! Exits with status 1 if the run ended with a fatal error.
use clap::{self, crate_authors, crate_name, crate_version, value_t, Arg, ArgMatches};
use failure::Error;
use log::debug;
use polnoise::{
    log::{init_logging, log_fatal},
    App, Config,
};
use std::process::exit;

fn main() {
    if bootstrap().is_err() {
        exit(1);
    }
}

fn bootstrap() -> Result<(), Error> {
    let matches = clap::App::new(crate_name!())
        .version(crate_version!())
        .about("Shows white noise on a stimulus monitor while sampling a polarimeter.")
        .author(crate_authors!())
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .value_name("FILE")
                .help("YAML file with run settings")
                .long_help(
                    "Loads run settings from a YAML file. \
                     Flags given on the command line take precedence over the file.",
                ),
        )
        .arg(
            Arg::with_name("fps")
                .long("fps")
                .takes_value(true)
                .value_name("FPS")
                .help("Stimulus frames per second, at most 60"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("DIR")
                .help("Directory for histogram.txt and azimuth.txt"),
        )
        .arg(
            Arg::with_name("samples")
                .short("n")
                .long("samples")
                .takes_value(true)
                .value_name("COUNT")
                .help("Stop after taking this many samples")
                .long_help(
                    "Stops acquisition after the given amount of ticks. \
                     Without it, acquisition runs until ctrl+c or SIGTERM.",
                ),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .value_name("SEED")
                .help("Seed for reproducible white noise"),
        )
        .arg(
            Arg::with_name("no-prompt")
                .long("no-prompt")
                .help("Retry missing polarimeter without asking")
                .long_help(
                    "When no polarimeter is found, log and retry right away instead of \
                     waiting for enter to be pressed on the terminal.",
                ),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .help("Silence warnings and errors")
                .long_help("Turn off logging completely, including warnings and errors."),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Verbose logging")
                .long_help(
                    "Print non-essential output with diagnostic information to stderr. \
                     Multiple occurrences increase logging verbosity. -vvv is the highest verbosity, \
                     printing every tick.",
                )
                .conflicts_with("quiet"),
        )
        .get_matches();

    let verbosity_level = if matches.is_present("quiet") {
        None
    } else {
        Some(matches.occurrences_of("verbose"))
    };
    init_logging(verbosity_level);

    let result = load_config(&matches)
        .and_then(build_app)
        .and_then(|app| {
            debug!("initialization complete, starting");
            app.run()
        });

    match result {
        Ok(_) => debug!("exiting after normal operation."),
        Err(ref err) => log_fatal(err),
    }

    result.map(|_| ())
}

fn load_config(matches: &ArgMatches) -> Result<Config, Error> {
    let mut config = match matches.value_of("config") {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };

    if matches.is_present("fps") {
        config.fps = value_t!(matches, "fps", f64)?;
    }
    if let Some(output) = matches.value_of("output") {
        config.output = output.into();
    }
    if matches.is_present("samples") {
        config.samples = Some(value_t!(matches, "samples", usize)?);
    }
    if matches.is_present("seed") {
        config.seed = Some(value_t!(matches, "seed", u64)?);
    }
    if matches.is_present("no-prompt") {
        config.prompt = false;
    }

    Ok(config)
}

fn build_app(config: Config) -> Result<App, Error> {
    let mut app = App::builder();
    app.config(config);
    app.terminate_on_ctrlc_and_sigterm();
    app.build()
}
