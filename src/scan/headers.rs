//! Extra HTTP headers sent with every probe

use crate::error::ScanError;
use crate::scan::models::Expansion;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderName, HeaderValue};

/// `Name: value`, at least one whitespace after the colon
static HEADER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^:\s]+):\s+(.*\S)\s*$").expect("Invalid header regex"));

pub struct HeaderParser;

impl HeaderParser {
    pub fn load(tokens: &[String]) -> Expansion<(HeaderName, HeaderValue)> {
        let mut expansion = Expansion::default();

        for token in tokens {
            match Self::parse_line(token) {
                Ok(header) => expansion.items.push(header),
                Err(e) => {
                    warn!("Skipping header: {}", e);
                    expansion.rejected.push(e);
                }
            }
        }

        expansion
    }

    pub fn parse_line(line: &str) -> Result<(HeaderName, HeaderValue), ScanError> {
        let line = line.trim();
        let caps = HEADER_REGEX
            .captures(line)
            .ok_or_else(|| ScanError::invalid_header(line, "expected 'Name: value'"))?;

        let name = HeaderName::from_bytes(caps[1].as_bytes())
            .map_err(|e| ScanError::invalid_header(line, e.to_string()))?;
        let value = HeaderValue::from_str(&caps[2])
            .map_err(|e| ScanError::invalid_header(line, e.to_string()))?;

        Ok((name, value))
    }
}
