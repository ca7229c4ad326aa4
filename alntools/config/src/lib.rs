//! Shared configuration for alntools
//! Alejandro Gonzales-Irribarren, 2025
//!
//! This crate holds the universal constants, the immutable filter
//! configuration and the argument checks used by every alntools
//! binary. Nothing in here keeps state: each tool builds its own
//! [`FilterConfig`] from the CLI and passes it down explicitly.

use std::path::{Path, PathBuf};
use thiserror::Error;

// symbols
pub const GAP_SYMBOLS: &str = "N-"; // INFO: unknown base + alignment gap
pub const FAIL_PREFIX: &str = "_";
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// numeric values
pub const MAX_EMPTY: usize = 0;
pub const GAP_THRESHOLD: f64 = 0.0;

// dirs
pub const DEFAULT_INDIR: &str = ".";
pub const DEFAULT_OUTDIR: &str = "./filtered";

/// immutable filter settings shared by the record and file classifiers
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    gaps: Vec<u8>,
    max_sparse: usize,
    threshold: f64,
    prefix: String,
}

impl FilterConfig {
    pub fn new(max_sparse: usize, threshold: f64) -> Self {
        Self {
            gaps: normalize_symbols(GAP_SYMBOLS),
            max_sparse,
            threshold,
            prefix: FAIL_PREFIX.to_string(),
        }
    }

    /// replace the gap/unknown symbol set; matching is case-insensitive
    pub fn with_gaps(mut self, gaps: &str) -> Self {
        self.gaps = normalize_symbols(gaps);
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    #[inline(always)]
    pub fn is_gap(&self, symbol: u8) -> bool {
        self.gaps.contains(&symbol.to_ascii_uppercase())
    }

    pub fn gaps(&self) -> &[u8] {
        &self.gaps
    }

    pub fn max_sparse(&self) -> usize {
        self.max_sparse
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new(MAX_EMPTY, GAP_THRESHOLD)
    }
}

fn normalize_symbols(symbols: &str) -> Vec<u8> {
    let mut gaps: Vec<u8> = symbols.bytes().map(|b| b.to_ascii_uppercase()).collect();
    gaps.sort_unstable();
    gaps.dedup();
    gaps
}

/// argument checker for all subcommands
pub trait ArgCheck {
    fn check(&self) -> Result<(), CliError> {
        self.validate_args()
    }

    fn validate_args(&self) -> Result<(), CliError> {
        self.check_dirs()?;
        self.check_threshold()?;
        self.check_symbols()?;

        Ok(())
    }

    fn check_dirs(&self) -> Result<(), CliError> {
        validate_dir(self.get_indir())?;

        let outdir = self.get_outdir();
        if outdir.exists() && !outdir.is_dir() {
            return Err(CliError::InvalidInput(format!(
                "ERROR: {:?} exists and is not a directory",
                outdir
            )));
        }

        Ok(())
    }

    fn check_threshold(&self) -> Result<(), CliError> {
        let threshold = self.get_threshold();
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(CliError::InvalidInput(format!(
                "ERROR: threshold must be within [0, 1], got {}",
                threshold
            )));
        }

        Ok(())
    }

    fn check_symbols(&self) -> Result<(), CliError> {
        if self.get_gaps().is_empty() {
            let err = "ERROR: no gap/unknown symbols provided".to_string();
            return Err(CliError::InvalidInput(err));
        }

        let prefix = self.get_prefix();
        if prefix.is_empty() {
            let err = "ERROR: fail prefix cannot be empty".to_string();
            return Err(CliError::InvalidInput(err));
        }
        if prefix.chars().any(std::path::is_separator) {
            return Err(CliError::InvalidInput(format!(
                "ERROR: fail prefix {:?} contains a path separator",
                prefix
            )));
        }

        Ok(())
    }

    fn get_indir(&self) -> &PathBuf;
    fn get_outdir(&self) -> &PathBuf;
    fn get_threshold(&self) -> f64;
    fn get_gaps(&self) -> &str;
    fn get_prefix(&self) -> &str;
}

/// error handling for CLI
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// directory validation
pub fn validate_dir(arg: &Path) -> Result<(), CliError> {
    if !arg.exists() {
        return Err(CliError::InvalidInput(format!(
            "ERROR: {:?} does not exist",
            arg
        )));
    }

    if !arg.is_dir() {
        return Err(CliError::InvalidInput(format!(
            "ERROR: {:?} is not a directory",
            arg
        )));
    }

    match std::fs::read_dir(arg) {
        Ok(_) => Ok(()),
        Err(e) => Err(CliError::IoError(e)),
    }
}
