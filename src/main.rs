mod transcode;

use std::fs::{self, File};
use std::io::{self, Read, Write};

use anyhow::{bail, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utf_codec::{ConvertOptions, Truncation, DEFAULT_CHUNK_BYTES};

use crate::transcode::{transcode, write_lines, Format, LineSettings, ENCODING_NAMES};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "UTFCONV_LOG";

fn main() -> Result<()> {
    let default_chunk = DEFAULT_CHUNK_BYTES.to_string();

    let args = App::new("utfconv")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts text between utf8, utf16, and utf32")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .global(true)
                .help("Log debugging information to stderr"),
        )
        .subcommand(
            SubCommand::with_name("convert")
                .about("Converts a whole file from one encoding to another")
                .arg(encoding_arg("from").help("Encoding of the input"))
                .arg(encoding_arg("to").help("Encoding of the output"))
                .arg(
                    Arg::with_name("default-char")
                        .long("default-char")
                        .value_name("CHAR")
                        .takes_value(true)
                        .help("Character to substitute for invalid input [default: ?]"),
                )
                .arg(
                    Arg::with_name("strict")
                        .long("strict")
                        .conflicts_with("default-char")
                        .help("Fail on invalid input instead of substituting for it"),
                )
                .arg(
                    Arg::with_name("report-truncation")
                        .long("report-truncation")
                        .help("Fail if the input ends partway through a character"),
                )
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .value_name("OUTPUT")
                        .takes_value(true)
                        .help("File to write to [default: stdout]"),
                )
                .arg(
                    Arg::with_name("INPUT")
                        .index(1)
                        .help("File to read from [default: stdin]"),
                ),
        )
        .subcommand(
            SubCommand::with_name("lines")
                .about("Prints a file line by line as utf8")
                .arg(encoding_arg("encoding").help("Encoding of the input"))
                .arg(
                    Arg::with_name("chunk-size")
                        .long("chunk-size")
                        .value_name("BYTES")
                        .takes_value(true)
                        .default_value(&default_chunk)
                        .validator(|v| {
                            v.parse::<usize>()
                                .map(|_| ())
                                .map_err(|e| format!("{}", e))
                        })
                        .help("Number of bytes to read at a time"),
                )
                .arg(
                    Arg::with_name("number")
                        .short("n")
                        .long("number")
                        .help("Prefix each line with its line number"),
                )
                .arg(
                    Arg::with_name("INPUT")
                        .index(1)
                        .required(true)
                        .help("File to read from"),
                ),
        )
        .get_matches();

    match args.subcommand() {
        ("convert", Some(sub)) => {
            init_logging(args.is_present("verbose") || sub.is_present("verbose"));
            convert(sub)
        }
        ("lines", Some(sub)) => {
            init_logging(args.is_present("verbose") || sub.is_present("verbose"));
            lines(sub)
        }
        (name, _) => bail!("unknown subcommand {:?}", name),
    }
}

fn encoding_arg(name: &str) -> Arg {
    Arg::with_name(name)
        .long(name)
        .value_name("ENC")
        .takes_value(true)
        .required(true)
        .possible_values(ENCODING_NAMES)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn convert_options(args: &ArgMatches) -> Result<ConvertOptions> {
    let mut options = if args.is_present("strict") {
        ConvertOptions::strict()
    } else {
        ConvertOptions::new()
    };

    if let Some(text) = args.value_of("default-char") {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => options = options.with_default_char(Some(c)),
            _ => bail!("--default-char takes exactly one character, got {:?}", text),
        }
    }

    if args.is_present("report-truncation") {
        options = options.with_truncation(Truncation::Report);
    }
    Ok(options)
}

fn convert(args: &ArgMatches) -> Result<()> {
    let from = Format::parse(args.value_of("from").unwrap_or_default())?;
    let to = Format::parse(args.value_of("to").unwrap_or_default())?;
    let options = convert_options(args)?;

    let input = match args.value_of("INPUT") {
        Some(path) => fs::read(path).with_context(|| format!("failed to read {}", path))?,
        None => {
            let mut input = Vec::new();
            io::stdin()
                .read_to_end(&mut input)
                .context("failed to read stdin")?;
            input
        }
    };
    info!(bytes = input.len(), ?from, ?to, "converting");

    let output = transcode(&input, from, to, &options)?;

    match args.value_of("output") {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("failed to write {}", path))?
        }
        None => {
            let stdout = io::stdout();
            let mut stdout = stdout.lock();
            stdout
                .write_all(&output)
                .and_then(|_| stdout.flush())
                .context("failed to write stdout")?;
        }
    }
    Ok(())
}

fn lines(args: &ArgMatches) -> Result<()> {
    let format = Format::parse(args.value_of("encoding").unwrap_or_default())?;
    let chunk_bytes = args
        .value_of("chunk-size")
        .unwrap_or_default()
        .parse::<usize>()
        .context("invalid --chunk-size")?;
    let path = args.value_of("INPUT").unwrap_or_default();
    let file = File::open(path).with_context(|| format!("failed to open {}", path))?;

    let settings = LineSettings {
        chunk_bytes,
        number: args.is_present("number"),
        options: ConvertOptions::new(),
    };

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    let count = write_lines(file, format, &settings, &mut stdout)
        .with_context(|| format!("failed to read lines from {}", path))?;
    stdout.flush().context("failed to write stdout")?;
    info!(lines = count, "done");
    Ok(())
}
