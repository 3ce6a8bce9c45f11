//! Byte-level input handling and import loading: charset detection,
//! decoding, the fetch capability, and the recursive descent through
//! `@import`ed sheets.

use std::collections::HashSet;
use std::io;

use thiserror::Error;
use url::Url;

use crate::extract::Preparator;
use crate::model::{ImportRecord, Origin, Rule};
use crate::recovery::{Warning, WarningKind};

/// Unrecoverable failures. Anything syntax-level stays out of here; broken
/// CSS comes back as warnings on a best-effort sheet.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: io::Error,
    },
    #[error("no fetch support for '{0}'")]
    UnsupportedProtocol(String),
    #[error("invalid url")]
    InvalidUrl(#[from] url::ParseError),
}

/// Fetch capability handed in by the embedder. `resolve` follows standard
/// URL join semantics and rarely needs overriding.
pub trait NetworkFetcher {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, ParseError>;

    fn resolve(&self, base: Option<&Url>, href: &str) -> Result<Url, ParseError> {
        match base {
            Some(base) => Ok(base.join(href)?),
            None => Ok(Url::parse(href)?),
        }
    }
}

/// Built-in fetcher for `file:` and plain-text `data:` URLs. Network
/// protocols are left to embedders with an actual transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFetcher;

impl NetworkFetcher for DefaultFetcher {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, ParseError> {
        match url.scheme() {
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|()| ParseError::UnsupportedProtocol(url.to_string()))?;
                std::fs::read(path).map_err(|source| ParseError::Fetch {
                    url: url.to_string(),
                    source,
                })
            }
            "data" => decode_data_url(url),
            _ => Err(ParseError::UnsupportedProtocol(url.to_string())),
        }
    }
}

fn decode_data_url(url: &Url) -> Result<Vec<u8>, ParseError> {
    let payload = match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    };
    let comma = payload.find(',').ok_or_else(|| ParseError::Fetch {
        url: url.to_string(),
        source: io::Error::new(io::ErrorKind::InvalidData, "data url without a comma"),
    })?;
    let meta = &payload[..comma];
    if meta.ends_with(";base64") {
        return Err(ParseError::Fetch {
            url: url.to_string(),
            source: io::Error::new(
                io::ErrorKind::Unsupported,
                "base64 data urls are not supported",
            ),
        });
    }
    Ok(percent_decode(&payload[comma + 1..]))
}

fn percent_decode(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

/// Decodes stylesheet bytes. Encoding priority: a UTF-8 BOM, then the
/// transport-declared encoding, then an `@charset` prefix, then UTF-8.
/// Whatever wins, the whole buffer is decoded from the start under it;
/// partially decoded prefixes are never kept.
pub fn decode_bytes(bytes: &[u8], declared: Option<&str>) -> (String, Vec<Warning>) {
    let mut warnings = Vec::new();
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        let text = decode_utf8(rest, &mut warnings);
        return (text, warnings);
    }
    let charset = declared
        .map(str::to_string)
        .or_else(|| sniff_charset(bytes));
    if let Some(charset) = charset {
        let name = charset.trim().to_ascii_lowercase();
        if !matches!(name.as_str(), "utf-8" | "utf8" | "us-ascii" | "ascii") {
            log::warn!(
                target: "css.source",
                "declared encoding '{charset}' unsupported, decoding as utf-8"
            );
            warnings.push(Warning::new(
                WarningKind::UnsupportedEncoding { encoding: charset },
                1,
                1,
            ));
        }
    }
    let text = decode_utf8(bytes, &mut warnings);
    (text, warnings)
}

fn decode_utf8(bytes: &[u8], warnings: &mut Vec<Warning>) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            warnings.push(Warning::new(
                WarningKind::InvalidData {
                    reason: "malformed utf-8 sequences replaced".to_string(),
                },
                1,
                1,
            ));
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Reads the charset name out of an `@charset "..."` byte prefix. Only the
/// first kilobyte is considered.
fn sniff_charset(bytes: &[u8]) -> Option<String> {
    let rest = bytes.strip_prefix(b"@charset \"")?;
    let window = &rest[..rest.len().min(1024)];
    let end = window.iter().position(|&b| b == b'"')?;
    let name = std::str::from_utf8(&window[..end]).ok()?;
    Some(name.to_string())
}

/// Loads every recorded import depth-first, in source order. A failed or
/// repeated import contributes nothing and the walk goes on; `visited`
/// spans the whole session and is what breaks import cycles.
pub(crate) fn load_imports<F, P>(
    imports: &[ImportRecord],
    base: Option<&Url>,
    origin: Origin,
    fetcher: &F,
    preparator: &P,
    visited: &mut HashSet<Url>,
    warnings: &mut Vec<Warning>,
) -> Vec<Rule>
where
    F: NetworkFetcher + ?Sized,
    P: Preparator,
{
    let mut rules = Vec::new();
    for record in imports {
        let (line, column) = record
            .source
            .as_ref()
            .map(|s| (s.line, s.column))
            .unwrap_or((1, 1));
        let url = match fetcher.resolve(base, &record.uri) {
            Ok(url) => url,
            Err(err) => {
                log::warn!(target: "css.source", "cannot resolve import '{}': {err}", record.uri);
                warnings.push(Warning::new(
                    WarningKind::ImportFailed {
                        uri: record.uri.clone(),
                        reason: err.to_string(),
                    },
                    line,
                    column,
                ));
                continue;
            }
        };
        if !visited.insert(url.clone()) {
            log::debug!(target: "css.source", "skipping already loaded import '{url}'");
            warnings.push(Warning::new(
                WarningKind::ImportCycle {
                    uri: record.uri.clone(),
                },
                line,
                column,
            ));
            continue;
        }
        let bytes = match fetcher.fetch(&url) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!(target: "css.source", "cannot fetch import '{url}': {err}");
                warnings.push(Warning::new(
                    WarningKind::ImportFailed {
                        uri: record.uri.clone(),
                        reason: err.to_string(),
                    },
                    line,
                    column,
                ));
                continue;
            }
        };
        let (css, mut decode_warnings) = decode_bytes(&bytes, None);
        warnings.append(&mut decode_warnings);
        let (mut sheet, mut sheet_warnings) = crate::pipeline(&css, Some(url.clone()), origin);
        warnings.append(&mut sheet_warnings);
        let mut loaded = load_imports(
            &sheet.imports,
            Some(&url),
            origin,
            fetcher,
            preparator,
            visited,
            warnings,
        );
        loaded.append(&mut sheet.rules);
        rules.extend(preparator.wrap_import(loaded, &record.media));
    }
    rules
}
