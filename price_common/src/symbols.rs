//! Symbol list helpers shared by the configuration loader and the CLI.

use std::io::BufRead;

use crate::error::PollerError;

/// Trait providing line-oriented parsing of symbol lists.
pub trait SymbolParser {
    /// Parses symbols from a buffered reader.
    ///
    /// Each non-empty line (after trimming) is one symbol. Order and duplicates
    /// are preserved. Returns an error if the reader fails or yields no symbols.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<String>, PollerError>;
}

/// Plain-text symbol list, one symbol per line.
pub struct SymbolFile;

impl SymbolParser for SymbolFile {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<String>, PollerError> {
        let mut symbols = Vec::new();

        for (number, line_result) in reader.lines().enumerate() {
            let line = line_result
                .map_err(|e| PollerError::ParseSymbolsFile(format!("line {}: {}", number + 1, e)))?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() {
                continue;
            }
            symbols.push(trimmed_line.to_string());
        }

        if symbols.is_empty() {
            return Err(PollerError::ParseSymbolsFile(
                "file contains no symbols".to_string(),
            ));
        }
        Ok(symbols)
    }
}

/// Ensures every symbol is non-empty after trimming and returns the trimmed list.
pub fn normalize_symbols(symbols: Vec<String>) -> Result<Vec<String>, PollerError> {
    if symbols.is_empty() {
        return Err(PollerError::Config("symbols list is empty".to_string()));
    }
    symbols
        .into_iter()
        .enumerate()
        .map(|(idx, s)| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(PollerError::Config(format!("symbol #{} is empty", idx)))
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}
