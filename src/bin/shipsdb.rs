//! SHIPS diagnostics archive manager.

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use ships_data::{
    default_root, get_diag_names, validate_diag_names, Archive, Basin, Diag, StormTimeSeries,
    TIME_KEY,
};
use std::{
    error::Error,
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(name = "shipsdb", version)]
#[command(about = "Manage an archive of SHIPS tropical cyclone diagnostics.", long_about = None)]
struct Cli {
    /// Path to the archive. Defaults to '${HOME}/ships/'
    #[arg(short, long, env = "SHIPS_ROOT")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new archive.
    Create {
        /// Overwrite any existing archive at `root`.
        #[arg(long)]
        force: bool,
    },
    /// Parse the raw lsdiag files and replace the contents of the archive.
    Rebuild {
        /// Atlantic raw file, defaults to the one in the raw directory.
        #[arg(long)]
        al: Option<PathBuf>,
        /// Eastern Pacific raw file, defaults to the one in the raw directory.
        #[arg(long)]
        ep: Option<PathBuf>,
        /// Central Pacific raw file, defaults to the one in the raw directory.
        #[arg(long)]
        cp: Option<PathBuf>,
    },
    /// Show the diagnostics for a storm.
    Storm {
        /// ATCF storm identifier, e.g. AL052019.
        atcf_id: String,
        /// Only show this time, formatted YYYY-MM-DDTHH.
        #[arg(short, long, value_parser = parse_time)]
        time: Option<NaiveDateTime>,
        /// Parameters to show, defaults to all those with any data.
        #[arg(short, long, num_args = 1..)]
        param: Vec<String>,
    },
    /// List the diagnostic parameter names.
    Names,
    /// List the storms in the archive.
    Storms {
        /// Only storms from this basin.
        #[arg(short, long, value_parser = parse_basin)]
        basin: Option<Basin>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(ref e) = run() {
        println!("error: {}", e);

        let mut err: &dyn Error = e.as_ref();
        while let Some(cause) = err.source() {
            println!("caused by: {}", cause);
            err = cause;
        }

        ::std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let root = match cli.root {
        Some(root) => root,
        None => default_root()?,
    };

    match cli.command {
        Command::Create { force } => create(&root, force),
        Command::Rebuild { al, ep, cp } => rebuild(&root, al, ep, cp),
        Command::Storm {
            atcf_id,
            time,
            param,
        } => storm(&root, &atcf_id, time, &param),
        Command::Names => {
            for name in get_diag_names() {
                let diag = Diag::from_name(name)?;
                let desc = diag.descriptor();
                println!("{:<5} {:<10} {}", name, desc.units(), desc.description);
            }
            Ok(())
        }
        Command::Storms { basin } => {
            let arch = Archive::connect(&root)?;
            for id in arch.storm_ids(basin)? {
                println!("{}", id);
            }
            Ok(())
        }
    }
}

fn create(root: &Path, force: bool) -> Result<(), Box<dyn Error>> {
    // Check if the archive already exists. (try connecting to it)
    let already_exists: bool = Archive::connect(&root).is_ok();

    if already_exists && force {
        ::std::fs::remove_dir_all(root)?;
    } else if already_exists {
        return Err("Archive already exists, must use --force to overwrite.".into());
    }

    Archive::create(&root)?;

    Ok(())
}

fn rebuild(
    root: &Path,
    al: Option<PathBuf>,
    ep: Option<PathBuf>,
    cp: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let mut arch = Archive::connect(&root)?;

    for (basin, path) in [(Basin::AL, al), (Basin::EP, ep), (Basin::CP, cp)] {
        if let Some(path) = path {
            arch.set_raw_file(basin, path);
        }
    }

    let summary = arch.parse_and_save_to_db()?;

    for report in &summary.basins {
        match &report.outcome {
            Ok(parsed) => {
                println!("{}: {}", report.basin, parsed);
                for err in &parsed.errors {
                    println!("    {}", err);
                }
            }
            Err(err) => println!("{}: skipped, {}", report.basin, err),
        }
    }
    println!("{} rows written.", summary.rows);

    Ok(())
}

fn storm(
    root: &Path,
    atcf_id: &str,
    time: Option<NaiveDateTime>,
    params: &[String],
) -> Result<(), Box<dyn Error>> {
    let arch = Archive::connect(&root)?;

    let series = match time {
        Some(time) => StormTimeSeries::from(arch.get_storm_obs_at(atcf_id, time)?),
        None => arch.get_storm_obs(atcf_id)?,
    };

    let diags: Vec<Diag> = if params.is_empty() {
        series
            .iter()
            .filter(|(_, vals)| vals.iter().any(Option::is_some))
            .map(|(diag, _)| diag)
            .collect()
    } else {
        validate_diag_names(params)?
    };

    print!("{:<16}", TIME_KEY);
    for diag in &diags {
        print!(" {:>8}", diag.name());
    }
    println!();

    for (i, time) in series.times().iter().enumerate() {
        print!("{:<16}", time.format("%Y-%m-%d %HZ").to_string());
        for diag in &diags {
            match series.series(*diag)[i] {
                Some(val) => print!(" {:>8.1}", val),
                None => print!(" {:>8}", "-"),
            }
        }
        println!();
    }

    Ok(())
}

fn parse_time(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(&format!("{}:00", s), "%Y-%m-%dT%H:%M")
        .map_err(|_| format!("expected a time like 2019-08-24T06, got '{}'", s))
}

fn parse_basin(s: &str) -> Result<Basin, String> {
    Basin::parse(s).map_err(|err| err.to_string())
}
