//! Command line front end: parse one log, emit the CSV table plus a
//! terminal summary, optionally the status document.

use std::path::{Path, PathBuf};
use std::process::exit;

use clap::{Arg, ArgAction, ArgMatches, Command};
use env_logger::{Builder, Target};

use rtcm_health::prelude::*;

fn cli() -> ArgMatches {
    Command::new("rtcm-health")
        .author("Guillaume W. Bres, <guillaume.bressaix@gmail.com>")
        .version(env!("CARGO_PKG_VERSION"))
        .about("RTCM3 base station daily health report")
        .arg(
            Arg::new("file")
                .required(true)
                .help("Path to RTCM3 log file (plain or gzip compressed)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("CSV output path (default: reports/<input>_summary.csv)"),
        )
        .arg(
            Arg::new("summary-only")
                .long("summary-only")
                .action(ArgAction::SetTrue)
                .help("Print summary only, skip CSV"),
        )
        .arg(
            Arg::new("detail")
                .long("detail")
                .action(ArgAction::SetTrue)
                .help("Print full detailed report instead of compact summary"),
        )
        .arg(
            Arg::new("status")
                .long("status")
                .action(ArgAction::SetTrue)
                .help("Write <input>.status.json next to the input file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .get_matches()
}

fn main() {
    let matches = cli();

    let mut builder = Builder::from_default_env();
    builder.target(Target::Stdout);
    if matches.get_flag("verbose") {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    let path = PathBuf::from(matches.get_one::<String>("file").expect("required argument"));

    if let Err(error) = run(&path, &matches) {
        eprintln!("Error: {}", error);
        exit(1);
    }
}

fn run(path: &Path, matches: &ArgMatches) -> Result<(), Error> {
    let session = Session::from_path(path);
    println!("Parsing {} ...", session.file_name);

    let result = parse(path)?;

    let output = if matches.get_flag("summary-only") {
        None
    } else {
        let output = resolve_output(matches, path)?;
        let rows = build_epoch_rows(&result, &session);
        write_csv(&rows, &output)?;
        println!("Wrote {} rows to {}", rows.len(), output.display());
        Some(output)
    };

    if matches.get_flag("status") {
        let status_path = input_stem(path).with_extension("status.json");
        StatusDocument::new(&result, &session, now_utc()).write(&status_path)?;
        println!("Wrote status to {}", status_path.display());
    }

    let report = if matches.get_flag("detail") {
        detail_summary(&result, &session, output.as_deref())
    } else {
        compact_summary(&result, &session, output.as_deref())
    };
    print!("{}", report);

    Ok(())
}

fn parse(path: &Path) -> Result<ParseResult, Error> {
    #[cfg(feature = "flate2")]
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
    {
        return ParseResult::from_gzip_file(path);
    }

    ParseResult::from_file(path)
}

/// Input path without the trailing `.gz` / `.RTCM3` extensions.
fn input_stem(path: &Path) -> PathBuf {
    let mut stem = path.to_path_buf();
    loop {
        match stem.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("gz") || ext.eq_ignore_ascii_case("rtcm3") => {
                stem = stem.with_extension("");
            },
            _ => return stem,
        }
    }
}

fn resolve_output(matches: &ArgMatches, input: &Path) -> Result<PathBuf, Error> {
    if let Some(output) = matches.get_one::<String>("output") {
        return Ok(PathBuf::from(output));
    }

    // reports/ sibling to the invoking program; the working directory
    // only when the executable location cannot be determined
    let reports = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("reports")))
        .unwrap_or_else(|| PathBuf::from("reports"));
    std::fs::create_dir_all(&reports)?;

    let stem = input_stem(input);
    let name = stem
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());

    Ok(reports.join(format!("{}_summary.csv", name)))
}
