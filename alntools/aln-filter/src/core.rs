//! Core module for classifying and routing alignment files
//! Alejandro Gonzales-Irribarren, 2025
//!
//! This module contains the record and file classifiers and the
//! directory router that copies every alignment into the output
//! directory, prefixing the ones that fail.
//!
//! In short, a record is sparse when its share of gap/unknown
//! symbols is above the threshold. A file passes when it holds
//! fewer sparse records than the allowed maximum. Errors are
//! returned per file and the caller decides, through an
//! [`ErrorPolicy`], whether one bad file stops the whole run.

use bio::io::fasta;
use config::FilterConfig;
use log::{info, warn};
use thiserror::Error;

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::utils::{alignment_alphabet, open_reader, resolve};

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("ERROR: cannot list directory {path:?}: {source}")]
    DirectoryRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("ERROR: cannot create output directory {path:?}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("ERROR: output directory {path:?} is the input directory")]
    SameDir { path: PathBuf },
    #[error("ERROR: cannot open {path:?}: {source}")]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("ERROR: malformed alignment {path:?}: {reason}")]
    FileParse { path: PathBuf, reason: String },
    #[error("ERROR: {path:?} is not a regular file")]
    NotRegularFile { path: PathBuf },
    #[error("ERROR: cannot copy {from:?} to {to:?}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[error("ERROR: cannot write verdict: {0}")]
    Report(#[from] std::io::Error),
}

impl FilterError {
    /// errors confined to a single input file
    pub fn is_file_scoped(&self) -> bool {
        matches!(
            self,
            FilterError::FileOpen { .. }
                | FilterError::FileParse { .. }
                | FilterError::NotRegularFile { .. }
                | FilterError::Copy { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    Abort,
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn from_count(sparse: usize, max_sparse: usize) -> Self {
        if sparse < max_sparse {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub name: String,
    pub records: usize,
    pub sparse: usize,
    pub verdict: Verdict,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RouteSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// share of gap/unknown symbols in a sequence, 0 when empty
#[inline(always)]
pub fn gap_fraction(seq: &[u8], config: &FilterConfig) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }

    let gaps = seq.iter().filter(|&&b| config.is_gap(b)).count();
    gaps as f64 / seq.len() as f64
}

#[inline(always)]
pub fn is_sparse(seq: &[u8], config: &FilterConfig) -> bool {
    gap_fraction(seq, config) > config.threshold()
}

/// Count the sparse records of a FASTA file and decide its verdict
///
/// # Arguments
///
/// * `path` - plain or gzipped FASTA file
/// * `config` - gap symbols and thresholds
///
/// # Example
///
/// ```rust, no_run
/// use aln_filter::core::check_file;
/// use config::FilterConfig;
///
/// let report = check_file("aln.fa", &FilterConfig::new(1, 0.5)).unwrap();
/// println!("{}: {}", report.name, report.verdict);
/// ```
pub fn check_file<P: AsRef<Path>>(path: P, config: &FilterConfig) -> Result<FileReport, FilterError> {
    let path = path.as_ref();
    let reader = open_reader(path).map_err(|source| FilterError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let alphabet = alignment_alphabet(config);

    let mut records = 0;
    let mut sparse = 0;

    for record in fasta::Reader::from_bufread(reader).records() {
        let record = record.map_err(|e| FilterError::FileParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        record.check().map_err(|reason| FilterError::FileParse {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        })?;

        if let Some(&symbol) = record.seq().iter().find(|&&b| !alphabet.is_word([b])) {
            return Err(FilterError::FileParse {
                path: path.to_path_buf(),
                reason: format!(
                    "record {} has invalid symbol {:?}",
                    record.id(),
                    symbol as char
                ),
            });
        }

        records += 1;
        if is_sparse(record.seq(), config) {
            sparse += 1;
        }
    }

    let name = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(FileReport {
        name,
        records,
        sparse,
        verdict: Verdict::from_count(sparse, config.max_sparse()),
    })
}

/// copy a regular file byte by byte, returning the bytes written
pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<u64, FilterError> {
    let (src, dst) = (src.as_ref(), dst.as_ref());

    let metadata = std::fs::metadata(src).map_err(|source| FilterError::FileOpen {
        path: src.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(FilterError::NotRegularFile {
            path: src.to_path_buf(),
        });
    }

    std::fs::copy(src, dst).map_err(|source| FilterError::Copy {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source,
    })
}

/// output path of a file given its verdict, keeping the raw file name
pub fn destination(outdir: &Path, name: &OsStr, verdict: Verdict, config: &FilterConfig) -> PathBuf {
    match verdict {
        Verdict::Pass => outdir.join(name),
        Verdict::Fail => {
            let mut prefixed = OsString::from(config.prefix());
            prefixed.push(name);
            outdir.join(prefixed)
        }
    }
}

/// Classify every file in `indir` and copy it into `outdir`
///
/// One `File <name>: PASS|FAIL` line per classified and copied file
/// is written to `out`. Entries are visited in file-name order. With
/// [`ErrorPolicy::Abort`] the first file error ends the run; files
/// copied before it stay in place.
pub fn route<W: Write>(
    indir: &Path,
    outdir: &Path,
    config: &FilterConfig,
    policy: ErrorPolicy,
    out: &mut W,
) -> Result<RouteSummary, FilterError> {
    std::fs::create_dir_all(outdir).map_err(|source| FilterError::OutputDir {
        path: outdir.to_path_buf(),
        source,
    })?;

    let outdir_abs = resolve(outdir);
    if outdir_abs.is_some() && outdir_abs == resolve(indir) {
        return Err(FilterError::SameDir {
            path: outdir.to_path_buf(),
        });
    }

    let mut entries = std::fs::read_dir(indir)
        .and_then(|dir| dir.collect::<Result<Vec<_>, _>>())
        .map_err(|source| FilterError::DirectoryRead {
            path: indir.to_path_buf(),
            source,
        })?;
    entries.sort_by_key(|entry| entry.file_name());

    info!("Found {} entries in {}", entries.len(), indir.display());

    let mut summary = RouteSummary::default();
    for entry in entries {
        let path = entry.path();

        if outdir_abs.is_some() && resolve(&path) == outdir_abs {
            warn!("Skipping output directory {}", path.display());
            continue;
        }

        match route_file(&path, outdir, config, out) {
            Ok(report) if report.verdict.is_pass() => summary.passed += 1,
            Ok(_) => summary.failed += 1,
            Err(e) if e.is_file_scoped() && policy == ErrorPolicy::Continue => {
                warn!("{}. Skipping...", e);
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Passed: {}, failed: {}, skipped: {}",
        summary.passed, summary.failed, summary.skipped
    );

    Ok(summary)
}

fn route_file<W: Write>(
    path: &Path,
    outdir: &Path,
    config: &FilterConfig,
    out: &mut W,
) -> Result<FileReport, FilterError> {
    let report = check_file(path, config)?;
    info!(
        "{}: {} records, {} sparse",
        report.name, report.records, report.sparse
    );

    let name = path.file_name().unwrap_or_default();
    let target = destination(outdir, name, report.verdict, config);
    copy_file(path, &target)?;

    writeln!(out, "File {}: {}", report.name, report.verdict)?;

    Ok(report)
}
