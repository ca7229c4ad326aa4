//! Core module for routing alignments by their sparse records
//! Alejandro Gonzales-Irribarren, 2025
//!
//! This module contains the main function for classifying every
//! alignment in a directory as passing or failing and copying it
//! into an output directory.
//!
//! In short, each FASTA record is sparse when its fraction of gap
//! or unknown symbols is above a threshold. An alignment passes when
//! it carries fewer sparse records than the allowed maximum. Passing
//! files are copied unchanged, failing ones get a prefix (`_` by
//! default) so downstream steps can ignore them.

pub mod cli;
pub mod core;
pub mod utils;

use anyhow::Result;
use config::ArgCheck;

use crate::core::{route, RouteSummary};

pub fn lib_aln_filter(args: Vec<String>) -> Result<RouteSummary> {
    let args = cli::Args::from(args);
    args.check()?;

    let config = args.to_config();
    let mut stdout = std::io::stdout().lock();
    let summary = route(&args.indir, &args.outdir, &config, args.policy(), &mut stdout)?;

    Ok(summary)
}
