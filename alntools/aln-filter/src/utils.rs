use bio::alphabets::{dna, Alphabet};
use config::{FilterConfig, GZIP_MAGIC};
use flate2::read::MultiGzDecoder;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

// INFO: alignment padding symbols accepted on top of IUPAC
const PADDING: &[u8] = b"-. ";

/// open a plain or gzipped file, sniffing the gzip magic bytes
pub fn open_reader<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path.as_ref())?;
    let mut reader = BufReader::new(file);

    let gzipped = reader.fill_buf()?.starts_with(&GZIP_MAGIC);
    let mut reader: Box<dyn BufRead> = if gzipped {
        log::debug!("{} is gzipped", path.as_ref().display());
        Box::new(BufReader::new(MultiGzDecoder::new(reader)))
    } else {
        Box::new(reader)
    };

    skip_leading_blanks(&mut reader)?;
    Ok(reader)
}

/// consume whitespace ahead of the first header
pub fn skip_leading_blanks<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<()> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(());
        }

        let blanks = buf.iter().take_while(|b| b.is_ascii_whitespace()).count();
        let done = blanks < buf.len();
        reader.consume(blanks);

        if done {
            return Ok(());
        }
    }
}

/// IUPAC nucleotides plus padding and the configured gap symbols
pub fn alignment_alphabet(config: &FilterConfig) -> Alphabet {
    let mut alphabet = dna::iupac_alphabet();
    for &symbol in PADDING.iter().chain(config.gaps()) {
        alphabet.insert(symbol.to_ascii_uppercase());
        alphabet.insert(symbol.to_ascii_lowercase());
    }

    alphabet
}

/// canonical form of a path, None if it cannot be resolved
pub fn resolve<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
    std::fs::canonicalize(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Read, Write};

    #[test]
    fn test_open_plain_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, ">r1\nACGT\n").unwrap();

        let mut contents = String::new();
        open_reader(file.path())
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();

        assert_eq!(contents, ">r1\nACGT\n");
    }

    #[test]
    fn test_open_gzipped_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
        encoder.write_all(b">r1\nNN-A\n").unwrap();
        encoder.finish().unwrap();

        let mut contents = String::new();
        open_reader(file.path())
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();

        assert_eq!(contents, ">r1\nNN-A\n");
    }

    #[test]
    fn test_open_skips_leading_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\n  \r\n>r1\nACGT\n").unwrap();

        let mut contents = String::new();
        open_reader(file.path())
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();

        assert_eq!(contents, ">r1\nACGT\n");
    }

    #[test]
    fn test_skip_leading_blanks_across_buffer_refills() {
        let data = format!("{}>r1\nAC\n", "\n".repeat(64));
        let mut reader = BufReader::with_capacity(8, data.as_bytes());

        skip_leading_blanks(&mut reader).unwrap();
        let mut contents = String::new();
        reader.read_to_string(&mut contents).unwrap();

        assert_eq!(contents, ">r1\nAC\n");
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_reader(dir.path().join("nope.fa")).is_err());
    }

    #[test]
    fn test_alphabet_accepts_alignment_symbols() {
        let alphabet = alignment_alphabet(&FilterConfig::default());

        assert!(alphabet.is_word(b"ACGTRYKMacgtn-.N"));
        assert!(alphabet.is_word(b"AC GT"));
        assert!(!alphabet.is_word(b"ACGT1"));

        let alphabet = alignment_alphabet(&FilterConfig::default().with_gaps("?"));
        assert!(alphabet.is_word(b"AC?T"));
    }
}
