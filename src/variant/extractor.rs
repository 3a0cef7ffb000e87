//! Best-effort extraction of pharmacogene calls from VCF-style text.
//!
//! Every line is classified on its own. A line that is a header, is too short,
//! or carries no usable `GENE=` entry is skipped and counted; only an input
//! that cannot be read at all is an error.

use super::gene::Gene;
use super::record::{MISSING_FIELD, VariantRecord};
use crate::error::ExtractionError;
use ahash::AHashMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Number of positional columns a data line must carry:
/// CHROM, POS, ID, REF, ALT, QUAL, FILTER, INFO.
pub const MIN_FIELDS: usize = 8;

const ID_COLUMN: usize = 2;
const INFO_COLUMN: usize = 7;

const GENE_KEY: &str = "GENE";
const STAR_KEY: &str = "STAR";

/// Why a line did not produce a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Meta-information or column header line (`#` prefix).
    Header,
    /// Fewer than eight tab-separated columns, blank lines included.
    TooFewFields,
    /// The info column has no non-empty `GENE` entry.
    MissingGene,
    /// The gene is real but outside the target allow-list.
    UntargetedGene,
    /// The line could not be decoded.
    Malformed,
}

/// The result of classifying one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Record(VariantRecord),
    Skipped(SkipReason),
}

/// Records extracted from one input, plus per-reason skip counts.
#[derive(Debug, Clone, Default)]
pub struct ExtractionSummary {
    pub records: Vec<VariantRecord>,
    pub lines: usize,
    pub skipped: AHashMap<SkipReason, usize>,
}

impl ExtractionSummary {
    /// How many lines were skipped for `reason`.
    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Looks up the first `key=value` entry for `key` in a `;`-separated info column.
/// Entries without `=` are ignored; the value is everything after the first `=`.
pub fn info_value<'a>(info: &'a str, key: &str) -> Option<&'a str> {
    info.split(';')
        .filter_map(|item| item.split_once('='))
        .find_map(|(k, v)| (k == key).then_some(v))
}

/// Classifies a single raw line (with or without its trailing newline).
pub fn classify_line(raw: &[u8]) -> LineOutcome {
    if raw.starts_with(b"#") {
        return LineOutcome::Skipped(SkipReason::Header);
    }

    let Ok(text) = std::str::from_utf8(raw) else {
        return LineOutcome::Skipped(SkipReason::Malformed);
    };

    let fields: Vec<&str> = text.trim().split('\t').collect();
    if fields.len() < MIN_FIELDS {
        return LineOutcome::Skipped(SkipReason::TooFewFields);
    }

    let info = fields[INFO_COLUMN];
    let gene = match info_value(info, GENE_KEY) {
        None | Some("") => return LineOutcome::Skipped(SkipReason::MissingGene),
        Some(symbol) => match Gene::from_symbol(symbol) {
            Some(gene) => gene,
            None => return LineOutcome::Skipped(SkipReason::UntargetedGene),
        },
    };

    let variant_id = match fields[ID_COLUMN] {
        "" => MISSING_FIELD,
        id => id,
    };
    let star_allele = match info_value(info, STAR_KEY) {
        None | Some("") => MISSING_FIELD,
        Some(star) => star,
    };

    LineOutcome::Record(VariantRecord::new(gene, variant_id, star_allele))
}

/// Splits on `\n`, `\r` or `\r\n`, keeping each terminator with its line.
fn split_lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut rest = bytes;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = match rest.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(i) if rest[i] == b'\r' && rest.get(i + 1) == Some(&b'\n') => i + 2,
            Some(i) => i + 1,
            None => rest.len(),
        };
        let (line, tail) = rest.split_at(end);
        rest = tail;
        Some(line)
    })
}

/// Extracts records from an in-memory buffer. Never fails.
///
/// Lines may end in `\n`, `\r\n` or a bare `\r`.
pub fn extract_bytes(bytes: &[u8]) -> ExtractionSummary {
    let mut summary = ExtractionSummary::default();

    for line in split_lines(bytes) {
        summary.lines += 1;
        match classify_line(line) {
            LineOutcome::Record(record) => summary.records.push(record),
            LineOutcome::Skipped(reason) => *summary.skipped.entry(reason).or_insert(0) += 1,
        }
    }

    debug!(
        lines = summary.lines,
        records = summary.records.len(),
        skipped = summary.total_skipped(),
        malformed = summary.skipped_for(SkipReason::Malformed),
        untargeted = summary.skipped_for(SkipReason::UntargetedGene),
        "Extracted pharmacogene calls"
    );
    summary
}

/// Extracts records from already-loaded file contents.
pub fn extract(contents: &str) -> Vec<VariantRecord> {
    extract_bytes(contents.as_bytes()).records
}

/// Reads an entire source and extracts records from it.
pub fn extract_reader<R: Read>(mut reader: R) -> Result<ExtractionSummary, ExtractionError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(ExtractionError::Unreadable)?;
    Ok(extract_bytes(&bytes))
}

/// Opens `path` and extracts records from it.
///
/// Fails only when the file cannot be opened or read.
pub fn extract_path(path: impl AsRef<Path>) -> Result<ExtractionSummary, ExtractionError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| ExtractionError::InvalidFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(extract_bytes(&bytes))
}
