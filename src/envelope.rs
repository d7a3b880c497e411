//! # Legacy HTTP-Cache Envelope Decoder
//!
//! Best-effort decoder for the versioned cache-entry container pip's HTTP
//! cache inherited from CacheControl: a `cc=<digit>,` tag followed by a
//! version-dependent payload. Nothing in the serving path depends on this
//! module; it exists for the `inspect` command so a cache entry can be
//! examined without firing up Python.
//!
//! Decoding is a total function over arbitrary bytes. Entries that are not
//! envelopes, or whose payload fails to decode, come back as
//! [`EnvelopeOutcome::Skip`]; versions this decoder cannot represent (the
//! pickled v1 format, or unknown future digits) come back as
//! [`EnvelopeOutcome::UnsupportedVersion`].

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use flate2::read::ZlibDecoder;
use serde_json::Value;
use tracing::debug;

use crate::error::AppResult;

/// Envelope tag prefix; the byte after it is an ASCII version digit.
const ENVELOPE_MAGIC: &[u8] = b"cc=";

/// Length of the `cc=<digit>,` tag.
const ENVELOPE_TAG_LEN: usize = 5;

/// An HTTP response recovered from a cache envelope.
#[derive(Debug, Default)]
pub struct CachedResponse {
    pub status: Option<u16>,
    pub reason: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    /// Vary header values captured at cache time; `None` marks a header
    /// that was absent on the original request
    pub vary: BTreeMap<String, Option<String>>,
}

/// Result of decoding one cache entry.
#[derive(Debug)]
pub enum EnvelopeOutcome {
    /// A response this decoder could fully recover
    Parsed(CachedResponse),
    /// Not an envelope, or a payload this decoder drops (v3/v4, corrupt v2)
    Skip,
    /// A version tag this decoder recognizes but cannot represent
    UnsupportedVersion(u8),
}

/// Decode one cache entry's raw bytes.
pub fn decode_envelope(data: &[u8]) -> EnvelopeOutcome {
    if data.len() < ENVELOPE_TAG_LEN || !data.starts_with(ENVELOPE_MAGIC) {
        return EnvelopeOutcome::Skip;
    }
    let version_byte = data[ENVELOPE_MAGIC.len()];
    if !version_byte.is_ascii_digit() {
        debug!(byte = version_byte, "Malformed envelope version tag");
        return EnvelopeOutcome::Skip;
    }
    let version = version_byte - b'0';

    match version {
        // v0 entries are the raw response bytes with no further framing
        0 => EnvelopeOutcome::Parsed(CachedResponse {
            body: data.to_vec(),
            ..CachedResponse::default()
        }),
        // v1 payloads are Python pickles
        1 => EnvelopeOutcome::UnsupportedVersion(1),
        2 => match decode_v2(&data[ENVELOPE_TAG_LEN..]) {
            Some(response) => EnvelopeOutcome::Parsed(response),
            None => {
                debug!("Undecodable v2 envelope payload");
                EnvelopeOutcome::Skip
            }
        },
        // v3 and v4 entries carry nothing this index can use
        3 | 4 => EnvelopeOutcome::Skip,
        n => EnvelopeOutcome::UnsupportedVersion(n),
    }
}

/// Read a cache entry file and decode it.
pub fn inspect_envelope(path: &Path) -> AppResult<EnvelopeOutcome> {
    let data = std::fs::read(path)?;
    Ok(decode_envelope(&data))
}

/// v2 payload: zlib-deflated JSON whose body, header names/values, reason,
/// and vary entries are all base64-encoded.
fn decode_v2(payload: &[u8]) -> Option<CachedResponse> {
    let mut json_bytes = Vec::new();
    ZlibDecoder::new(payload).read_to_end(&mut json_bytes).ok()?;
    let value: Value = serde_json::from_slice(&json_bytes).ok()?;

    let response = value.get("response")?;
    let body = BASE64.decode(response.get("body")?.as_str()?).ok()?;
    let status = response
        .get("status")
        .and_then(Value::as_u64)
        .map(|s| s as u16);
    let reason = response
        .get("reason")
        .and_then(Value::as_str)
        .and_then(b64_string);

    let mut headers = BTreeMap::new();
    if let Some(map) = response.get("headers").and_then(Value::as_object) {
        for (key, val) in map {
            let name = b64_string(key)?;
            let value = b64_string(val.as_str()?)?;
            headers.insert(name, value);
        }
    }

    let mut vary = BTreeMap::new();
    if let Some(map) = value.get("vary").and_then(Value::as_object) {
        for (key, val) in map {
            let name = b64_string(key)?;
            let value = match val {
                Value::Null => None,
                other => Some(b64_string(other.as_str()?)?),
            };
            vary.insert(name, value);
        }
    }

    Some(CachedResponse {
        status,
        reason,
        headers,
        body,
        vary,
    })
}

fn b64_string(encoded: &str) -> Option<String> {
    String::from_utf8(BASE64.decode(encoded).ok()?).ok()
}
