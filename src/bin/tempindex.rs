//! Thin CLI pass-through: parses flags, reads the stream file line by
//! line, and drives [tempindex::driver::Driver]. Argument parsing, stream
//! reading and the timing harness are external concerns; this binary
//! wires them to the library and nothing more.

use std::{fs, io::BufRead, path::PathBuf, process};

use structopt::StructOpt;

use tempindex::driver::{Driver, DriverConfig};
use tempindex::live_index::BackendKind;
use tempindex::types::Reduce;

#[derive(Clone, StructOpt)]
#[structopt(name = "tempindex")]
struct Opt {
    /// Live-index backend: MAP, VECTOR, or ENHANCEDHASHMAP.
    #[structopt(short = "b", long = "backend", default_value = "MAP")]
    backend: String,

    /// Capacity bound on the live index; mutually exclusive with -d.
    #[structopt(short = "c", long = "capacity")]
    capacity: Option<usize>,

    /// Duration bound on the live index; mutually exclusive with -c.
    #[structopt(short = "d", long = "duration")]
    duration: Option<i64>,

    /// Number of times to repeat each query, for benchmarking.
    #[structopt(short = "r", long = "repeats", default_value = "1")]
    repeats: usize,

    /// Reduce queries by count instead of XOR.
    #[structopt(long = "count")]
    count: bool,

    /// Path to the event stream file.
    stream: PathBuf,
}

fn run() -> tempindex::Result<()> {
    let opt = Opt::from_args();

    if opt.capacity.is_some() && opt.duration.is_some() {
        return Err(tempindex::Error::UsageError("-c and -d are mutually exclusive".to_string()));
    }

    let backend = BackendKind::parse(&opt.backend)?;
    let mut config = DriverConfig::new(backend).set_repeats(opt.repeats);
    if let Some(capacity) = opt.capacity {
        config = config.set_capacity(capacity);
    }
    if let Some(duration) = opt.duration {
        config = config.set_duration(duration);
    }
    if opt.count {
        config = config.set_reduce(Reduce::Count);
    }

    let file = fs::File::open(&opt.stream)
        .map_err(|e| tempindex::Error::InvalidFile(format!("{}: {}", opt.stream.display(), e)))?;
    let reader = std::io::BufReader::new(file);

    let mut driver = Driver::new(config);
    for line in reader.lines() {
        let line = line?;
        match driver.apply_line(&line) {
            Ok(Some(result)) => println!("{}", result),
            Ok(None) => {}
            Err(tempindex::Error::NotFound(msg)) => log::warn!(target: "driver", "{}", msg),
            Err(e) => return Err(e),
        }
    }

    println!("{}", driver.report());
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("tempindex: {}", e);
        process::exit(1);
    }
}
