//! OAuth 1.0a request signing with HMAC-SHA256.
//!
//! Mediawire verifies signatures with a canonicalization that differs from
//! stock RFC 5849 in small but signature-breaking ways: parameters are
//! percent-encoded before sorting, values sharing a key order naturally
//! (numeric-aware), encoded text has any literal `+` turned back into a
//! space, and the HTTP method is encoded as given rather than uppercased.
//! Every step here keeps byte parity with that verifier.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use hmac::{Hmac, KeyInit, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};
use sha2::Sha256;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

/// RFC 3986 unreserved characters stay literal; everything else is encoded.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Signs one request, returning the base64-encoded signature value.
///
/// A pre-existing `oauth_signature` entry in `params` is excluded from the
/// base string, so re-signing an already signed set yields the same value.
/// The token secret is always empty for launches, making the signing key
/// `enc(secret)&`. An empty consumer secret still signs; rejecting it is the
/// provider's call, not ours.
#[must_use]
pub fn sign(method: &str, url: &str, params: &BTreeMap<String, String>, secret: &str) -> String {
    let pairs: Vec<(&str, &str)> = params
        .iter()
        .filter(|(key, _)| key.as_str() != "oauth_signature")
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();

    let base = signature_base_string(method, url, &pairs);
    let key = format!("{}&", oauth_encode(secret));

    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(base.as_bytes());
    BASE64_STANDARD.encode(mac.finalize().into_bytes())
}

/// `enc(method)&enc(normalized url)&enc(canonical query)`.
///
/// The canonical query is percent-encoded a second time here; the verifier
/// decodes one layer when it rebuilds the base string.
fn signature_base_string(method: &str, url: &str, pairs: &[(&str, &str)]) -> String {
    format!(
        "{}&{}&{}",
        oauth_encode(method),
        oauth_encode(&normalize_url(url)),
        oauth_encode(&canonical_query(pairs))
    )
}

/// Reduces a URL to `scheme://host/path` for the base string.
///
/// Port, userinfo, query and fragment are dropped. Input the URL parser
/// rejects degrades to truncation at the first `?` or `#`; normalization
/// never fails.
fn normalize_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => format!(
            "{}://{}{}",
            parsed.scheme(),
            parsed.host_str().unwrap_or(""),
            parsed.path()
        ),
        Err(_) => {
            let end = url.find(['?', '#']).unwrap_or(url.len());
            url[..end].to_owned()
        }
    }
}

/// Builds the canonical query: encode keys and values first, sort by encoded
/// key bytewise, then join `key=value` pairs with `&`.
///
/// Values under the same encoded key sort among themselves in natural order.
/// The launch parameter set never carries duplicate keys, but the verifier
/// orders duplicates this way, so the comparator must too.
fn canonical_query(pairs: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = pairs
        .iter()
        .map(|(key, value)| (oauth_encode(key), oauth_encode(value)))
        .collect();
    encoded.sort_by(|(ka, va), (kb, vb)| ka.cmp(kb).then_with(|| natural_cmp(va, vb)));

    encoded
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Percent-encodes with [`OAUTH_ENCODE_SET`] (uppercase hex), then replaces
/// any literal `+` with a space.
///
/// The encoder never emits `+` itself, so the replacement is inert for all
/// inputs; it mirrors the verifier's own fix-up and stays for byte parity.
fn oauth_encode(input: &str) -> String {
    percent_encode(input.as_bytes(), OAUTH_ENCODE_SET)
        .to_string()
        .replace('+', " ")
}

/// Natural-order comparison: runs of digits compare numerically, all other
/// bytes compare as-is. `item2` sorts before `item10`; runs of equal value
/// order the more zero-padded one first, so `001` < `01` < `1`.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let mut i = 0;
    let mut j = 0;

    loop {
        match (a.get(i), b.get(j)) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(&ca), Some(&cb)) => {
                if ca.is_ascii_digit() && cb.is_ascii_digit() {
                    let ord = if ca == b'0' || cb == b'0' {
                        compare_digits_left(a, &mut i, b, &mut j)
                    } else {
                        compare_digits_right(a, &mut i, b, &mut j)
                    };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                } else {
                    if ca != cb {
                        return ca.cmp(&cb);
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
    }
}

/// Left-aligned digit-run compare for zero-led runs: the first differing
/// digit decides, and a run that ends first is smaller.
fn compare_digits_left(a: &[u8], i: &mut usize, b: &[u8], j: &mut usize) -> Ordering {
    loop {
        let da = a.get(*i).filter(|c| c.is_ascii_digit());
        let db = b.get(*j).filter(|c| c.is_ascii_digit());
        match (da, db) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) => {
                if ca != cb {
                    return ca.cmp(cb);
                }
                *i += 1;
                *j += 1;
            }
        }
    }
}

/// Right-aligned digit-run compare: the longer run wins; between runs of
/// equal length the first differing digit decides.
fn compare_digits_right(a: &[u8], i: &mut usize, b: &[u8], j: &mut usize) -> Ordering {
    let mut bias = Ordering::Equal;
    loop {
        let da = a.get(*i).filter(|c| c.is_ascii_digit());
        let db = b.get(*j).filter(|c| c.is_ascii_digit());
        match (da, db) {
            (None, None) => return bias,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) => {
                if bias == Ordering::Equal {
                    bias = ca.cmp(cb);
                }
                *i += 1;
                *j += 1;
            }
        }
    }
}
