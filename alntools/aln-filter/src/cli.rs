use clap::{ArgAction, Parser};
use config::{
    ArgCheck, FilterConfig, DEFAULT_INDIR, DEFAULT_OUTDIR, FAIL_PREFIX, GAP_SYMBOLS,
    GAP_THRESHOLD, MAX_EMPTY,
};
use std::path::PathBuf;

use crate::core::ErrorPolicy;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(
        short = 'i',
        long = "indir",
        required = false,
        value_name = "PATH",
        help = "Directory with alignment files to filter",
        default_value(DEFAULT_INDIR)
    )]
    pub indir: PathBuf,

    #[arg(
        short = 'o',
        long = "outdir",
        required = false,
        value_name = "PATH",
        help = "Directory where to save filtered alignments",
        default_value(DEFAULT_OUTDIR)
    )]
    pub outdir: PathBuf,

    #[arg(
        short = 'e',
        long = "empty",
        required = false,
        value_name = "VALUE",
        help = "Alignments pass only with fewer sparse records than this value",
        default_value_t = MAX_EMPTY
    )]
    pub empty: usize,

    #[arg(
        short = 't',
        long = "threshold",
        required = false,
        value_name = "VALUE",
        help = "Fraction of gap/N symbols above which a record is sparse. Must be [0-1]",
        default_value_t = GAP_THRESHOLD
    )]
    pub threshold: f64,

    #[arg(
        short = 'g',
        long = "gaps",
        required = false,
        value_name = "SYMBOLS",
        help = "Symbols counted as gap or unknown base (case-insensitive)",
        default_value(GAP_SYMBOLS)
    )]
    pub gaps: String,

    #[arg(
        short = 'p',
        long = "prefix",
        required = false,
        value_name = "PREFIX",
        help = "Prefix added to the names of failing alignments",
        default_value(FAIL_PREFIX)
    )]
    pub prefix: String,

    #[arg(
        short = 'k',
        long = "keep-going",
        required = false,
        value_name = "FLAG",
        help = "Skip unreadable or malformed files instead of aborting the run",
        default_missing_value("true"),
        default_value("false"),
        num_args(0..=1),
        require_equals(true),
        action = ArgAction::Set,
    )]
    pub keep_going: bool,
}

impl Args {
    pub fn from(args: Vec<String>) -> Self {
        let mut full_args = vec![env!("CARGO_PKG_NAME").to_string()];
        full_args.extend(args);

        Args::parse_from(full_args)
    }

    pub fn to_config(&self) -> FilterConfig {
        FilterConfig::new(self.empty, self.threshold)
            .with_gaps(&self.gaps)
            .with_prefix(&self.prefix)
    }

    pub fn policy(&self) -> ErrorPolicy {
        if self.keep_going {
            ErrorPolicy::Continue
        } else {
            ErrorPolicy::Abort
        }
    }
}

impl ArgCheck for Args {
    fn get_indir(&self) -> &PathBuf {
        &self.indir
    }

    fn get_outdir(&self) -> &PathBuf {
        &self.outdir
    }

    fn get_threshold(&self) -> f64 {
        self.threshold
    }

    fn get_gaps(&self) -> &str {
        &self.gaps
    }

    fn get_prefix(&self) -> &str {
        &self.prefix
    }
}
