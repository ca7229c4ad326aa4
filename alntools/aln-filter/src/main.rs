//! Core module for routing alignments by their sparse records
//! Alejandro Gonzales-Irribarren, 2025
//!
//! Every file in the input directory is read record by record,
//! classified as PASS or FAIL and copied into the output directory.
//! Failing files are renamed with a leading prefix.

use clap::Parser;
use config::ArgCheck;
use log::{error, info, Level};
use simple_logger::init_with_level;

use aln_filter::{cli::Args, core::route};

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();

    let args: Args = Args::parse();
    args.check().unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    info!("INFO: running aln-filter with args: {:?}", &args);

    let config = args.to_config();
    let mut stdout = std::io::stdout().lock();
    route(&args.indir, &args.outdir, &config, args.policy(), &mut stdout).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}
