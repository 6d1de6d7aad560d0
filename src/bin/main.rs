use serde_json::json;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{error, info};
use rtkit::encoder::{
    clean, splice, RotatingMrtWriter, TableDumpConfig, TableDumper, TimeWindow, WriterConfig,
    DEFAULT_FILE_SIZE,
};
use rtkit::{ParserError, RtkitParser};

/// rtkit reads, merges and rewrites MRT archives of BGP, IS-IS and OSPF traffic.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Opts {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the records of MRT files
    Parse {
        /// MRT files, local or remote
        #[clap(name = "FILE", required = true)]
        files: Vec<String>,

        /// Output as JSON objects
        #[clap(long)]
        json: bool,

        /// Pretty-print JSON output
        #[clap(long)]
        pretty: bool,

        /// Count MRT records instead of printing them
        #[clap(short, long)]
        records_count: bool,

        #[clap(flatten)]
        window: Window,
    },
    /// Replay BGP updates into a prefix table and write periodic TABLE_DUMP snapshots
    Table {
        /// MRT files holding BGP or BGP4MP updates, in time order
        #[clap(name = "FILE", required = true)]
        files: Vec<String>,

        /// TABLE_DUMP files to seed the table from
        #[clap(long)]
        seed: Vec<String>,

        /// Minutes of record time between dumps; only a final dump is written without it
        #[clap(short, long)]
        interval_mins: Option<u32>,

        /// Output file prefix
        #[clap(short, long, default_value = "table")]
        output: PathBuf,

        /// Ignore records before this unix timestamp
        #[clap(short = 't', long)]
        start_ts: Option<u32>,
    },
    /// Merge MRT files into size-bounded files ordered by record time
    Splice {
        #[clap(name = "FILE", required = true)]
        files: Vec<String>,

        /// Output file prefix
        #[clap(short, long, default_value = "mrt")]
        output: PathBuf,

        /// Rotate output files at this many bytes
        #[clap(short = 'z', long, default_value_t = DEFAULT_FILE_SIZE)]
        file_size: u64,

        #[clap(flatten)]
        window: Window,
    },
    /// Copy only the records that decode to FILE.clean
    Clean {
        #[clap(name = "FILE", required = true)]
        files: Vec<String>,
    },
}

#[derive(Parser, Debug)]
struct Window {
    /// Filter by start unix timestamp inclusive
    #[clap(short = 't', long)]
    start_ts: Option<u32>,

    /// Filter by end unix timestamp inclusive
    #[clap(short = 'T', long)]
    end_ts: Option<u32>,
}

impl From<&Window> for TimeWindow {
    fn from(w: &Window) -> Self {
        TimeWindow::new(w.start_ts, w.end_ts)
    }
}

fn open(path: &str) -> RtkitParser<Box<dyn std::io::Read + Send>> {
    match RtkitParser::new(path) {
        Ok(p) => p,
        Err(err) => {
            eprintln!("{}: {}", path, err);
            std::process::exit(1);
        }
    }
}

fn run_parse(
    files: Vec<String>,
    json: bool,
    pretty: bool,
    records_count: bool,
    window: TimeWindow,
) -> Result<(), ParserError> {
    let mut stdout = std::io::stdout();
    let mut count = 0;
    for file in files {
        for record in open(&file) {
            if !window.contains(record.common_header.timestamp) {
                continue;
            }
            count += 1;
            if records_count {
                continue;
            }
            let output_str = if json {
                let val = json!(record);
                if pretty {
                    serde_json::to_string_pretty(&val).unwrap_or_default()
                } else {
                    val.to_string()
                }
            } else {
                format!(
                    "{}|{:?}|{}|{:?}",
                    record.common_header.timestamp,
                    record.common_header.entry_type,
                    record.common_header.entry_subtype,
                    record.message
                )
            };
            if let Err(e) = writeln!(stdout, "{}", &output_str) {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
                return Ok(());
            }
        }
    }
    if records_count {
        println!("total records: {}", count);
    }
    Ok(())
}

fn run_table(
    files: Vec<String>,
    seed: Vec<String>,
    interval_mins: Option<u32>,
    output: PathBuf,
    start_ts: Option<u32>,
) -> Result<(), ParserError> {
    let mut config = TableDumpConfig::new(output, interval_mins.map(|m| m.saturating_mul(60)));
    config.start_time = start_ts;
    let mut dumper = TableDumper::new(config);

    for file in seed {
        let seeded = open(&file)
            .into_iter()
            .filter(|record| dumper.seed(record))
            .count();
        info!("seeded {} entries from {}", seeded, file);
    }
    for file in files {
        for record in open(&file) {
            dumper.process(&record)?;
        }
    }
    for path in dumper.finish()? {
        println!("{}", path.display());
    }
    Ok(())
}

fn run_splice(
    files: Vec<String>,
    output: PathBuf,
    file_size: u64,
    window: TimeWindow,
) -> Result<(), ParserError> {
    let sources = files
        .iter()
        .map(|f| open(f).into_raw_record_iter())
        .collect();
    let mut writer = RotatingMrtWriter::new(WriterConfig::new(output, file_size));
    let count = splice(sources, window, &mut writer)?;
    info!("spliced {} records", count);
    for path in writer.finish()? {
        println!("{}", path.display());
    }
    Ok(())
}

fn run_clean(files: Vec<String>) -> Result<(), ParserError> {
    for file in files {
        let reader = oneio::get_reader(&file)?;
        let out_path = format!("{}.clean", file);
        let mut writer = std::io::BufWriter::new(std::fs::File::create(&out_path)?);
        let stats = clean(reader, &mut writer)?;
        println!(
            "{}: {} clean, {} dirty -> {}",
            file, stats.clean, stats.dirty, out_path
        );
    }
    Ok(())
}

fn main() {
    let opts: Opts = Opts::parse();

    env_logger::init();

    let result = match opts.command {
        Command::Parse {
            files,
            json,
            pretty,
            records_count,
            window,
        } => run_parse(files, json, pretty, records_count, (&window).into()),
        Command::Table {
            files,
            seed,
            interval_mins,
            output,
            start_ts,
        } => run_table(files, seed, interval_mins, output, start_ts),
        Command::Splice {
            files,
            output,
            file_size,
            window,
        } => run_splice(files, output, file_size, (&window).into()),
        Command::Clean { files } => run_clean(files),
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
