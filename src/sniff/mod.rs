//! Heuristic dialect and header detection.
//!
//! The sniffer inspects a text sample and infers the dialect the sample
//! was most plausibly written under: candidate delimiters are counted per
//! line outside quoted regions, and the highest-priority candidate whose
//! count is stable across a majority of lines wins. Header detection
//! compares the first row against a per-column type signature computed
//! from the remaining rows.
//!
//! # Example
//!
//! ```
//! use loquat_csv::Sniffer;
//!
//! let sniffer = Sniffer::new();
//! let dialect = sniffer.sniff("a;b;c\n1;2;3\n4;5;6\n", None)?;
//! assert_eq!(dialect.delimiter, b';');
//!
//! assert!(sniffer.has_header("name,age\nJohn,30\nJane,25\n"));
//! assert!(!sniffer.has_header("1,2\n3,4\n5,6\n"));
//! # Ok::<(), loquat_csv::Error>(())
//! ```

use std::collections::HashMap;

use crate::common::{Error, Result};
use crate::dialect::Dialect;
use crate::read::Reader;

/// Candidate delimiters tried in priority order when none are supplied
const DEFAULT_DELIMITERS: [u8; 5] = [b',', b'\t', b';', b' ', b':'];

/// Provisional quote character assumed while counting delimiters
const PROVISIONAL_QUOTE: u8 = b'"';

/// Heuristic dialect and header detector.
///
/// Stateless; one instance can sniff any number of samples. Errors are
/// terminal — no partial dialect is ever returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sniffer;

impl Sniffer {
    /// Create a new sniffer.
    pub fn new() -> Self {
        Sniffer
    }

    /// Infer a [`Dialect`] from `sample`.
    ///
    /// `delimiters` restricts the candidate set; when `None`, the
    /// candidates are `,`, tab, `;`, space, and `:`, in that priority
    /// order. A candidate is accepted when its per-line count outside
    /// quoted regions is the same nonzero number on a majority of
    /// non-empty lines; the earliest such candidate wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sniff`] when the sample has fewer than two
    /// non-empty lines or no candidate is consistent.
    pub fn sniff(&self, sample: &str, delimiters: Option<&[u8]>) -> Result<Dialect> {
        let lines: Vec<&str> = sample.lines().filter(|line| !line.is_empty()).collect();
        if lines.len() < 2 {
            return Err(Error::Sniff(
                "sample must contain at least two non-empty lines".to_string(),
            ));
        }

        // Candidates are tried in priority order; the first consistent one
        // wins
        let candidates = delimiters.unwrap_or(&DEFAULT_DELIMITERS);
        let delimiter = candidates
            .iter()
            .copied()
            .find(|&candidate| is_consistent(&lines, candidate))
            .ok_or_else(|| {
                Error::Sniff("no candidate delimiter is consistent across the sample".to_string())
            })?;

        let mut dialect = Dialect::excel().with_delimiter(delimiter);
        if delimiter != b' ' && delimiter_always_followed_by_space(&lines, delimiter) {
            dialect = dialect.with_skipinitialspace(true);
        }
        if has_doubled_quotes(sample.as_bytes()) {
            dialect = dialect.with_doublequote(true);
        }
        Ok(dialect)
    }

    /// Guess whether the first row of `sample` is a header.
    ///
    /// The sample is parsed under the sniffed dialect (falling back to
    /// excel when sniffing fails). For every column a type signature is
    /// computed over rows 2..N — all-numeric, or consistent text length —
    /// and the first row votes for a header wherever it disagrees with
    /// that signature. Fewer than two data rows always answer `false`.
    pub fn has_header(&self, sample: &str) -> bool {
        let dialect = self
            .sniff(sample, None)
            .unwrap_or_else(|_| Dialect::excel());
        let Ok(parsed) = Reader::with_dialect(sample.as_bytes(), dialect) else {
            return false;
        };
        let mut rows: Vec<Vec<String>> = Vec::new();
        for row in parsed {
            match row {
                Ok(row) => rows.push(row),
                Err(_) => return false,
            }
        }
        if rows.len() < 3 {
            return false;
        }

        let header = &rows[0];
        let data = &rows[1..];
        let mut votes: i32 = 0;

        for (column, name) in header.iter().enumerate() {
            let values: Vec<&str> = data
                .iter()
                .filter_map(|row| row.get(column).map(String::as_str))
                .collect();
            if values.len() < data.len() {
                // Ragged column, no reliable signature
                continue;
            }

            if values.iter().all(|value| is_numeric(value)) {
                votes += if is_numeric(name) { -1 } else { 1 };
            } else {
                let length = values[0].chars().count();
                if values.iter().all(|value| value.chars().count() == length)
                    && name.chars().count() != length
                {
                    votes += 1;
                }
            }
        }
        votes > 0
    }
}

/// Whether `value` parses as a number.
fn is_numeric(value: &str) -> bool {
    !value.is_empty() && fast_float2::parse::<f64, _>(value).is_ok()
}

/// Count occurrences of `target` in `line` outside quoted regions.
fn count_unquoted(line: &[u8], target: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for &byte in line {
        if byte == PROVISIONAL_QUOTE {
            in_quotes = !in_quotes;
        } else if byte == target && !in_quotes {
            count += 1;
        }
    }
    count
}

/// Whether the per-line count of `candidate` outside quoted regions is the
/// same nonzero number on a strict majority of lines.
fn is_consistent(lines: &[&str], candidate: u8) -> bool {
    let mut frequency: HashMap<usize, usize> = HashMap::new();
    for line in lines {
        let count = count_unquoted(line.as_bytes(), candidate);
        *frequency.entry(count).or_insert(0) += 1;
    }
    match frequency.iter().max_by_key(|&(&count, &hits)| (hits, count)) {
        Some((&modal, &hits)) => modal > 0 && hits * 2 > lines.len(),
        None => false,
    }
}

/// Whether every unquoted occurrence of `delimiter` is followed by a space.
fn delimiter_always_followed_by_space(lines: &[&str], delimiter: u8) -> bool {
    let mut seen = false;
    for line in lines {
        let bytes = line.as_bytes();
        let mut in_quotes = false;
        for (index, &byte) in bytes.iter().enumerate() {
            if byte == PROVISIONAL_QUOTE {
                in_quotes = !in_quotes;
            } else if byte == delimiter && !in_quotes {
                seen = true;
                if bytes.get(index + 1) != Some(&b' ') {
                    return false;
                }
            }
        }
    }
    seen
}

/// Whether the sample contains a doubled quote inside a quoted region.
fn has_doubled_quotes(sample: &[u8]) -> bool {
    let mut in_quotes = false;
    let mut index = 0;
    while index < sample.len() {
        if sample[index] == PROVISIONAL_QUOTE {
            if in_quotes && sample.get(index + 1) == Some(&PROVISIONAL_QUOTE) {
                return true;
            }
            in_quotes = !in_quotes;
        }
        index += 1;
    }
    false
}
