//! Urlencoded form and query-string grammars.
//!
//! Both the POST body of the record-creation endpoint and the trailing
//! query string of the listing endpoint use the same `key=value&...` pair
//! grammar, so the splitting and percent-decoding live here.

use crate::parser::error::Error;

/// A parsed record-creation form: exactly the two fields `first` and `last`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormData {
    pub first: String,
    pub last: String,
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Decode one urlencoded component: `+` becomes a space, `%XX` the byte it
/// names. Invalid escapes pass through untouched, the decoder is total.
pub fn decode_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Split a `key=value&...` string into decoded pairs.
///
/// Anything that is not exactly `key=value` (no `=`, or more than one) is
/// dropped rather than rejected; callers that need stricter shapes check
/// the pair count themselves.
pub fn parse_pairs(s: &str) -> Vec<(String, String)> {
    s.split('&')
        .filter_map(|pair| {
            let parts: Vec<&str> = pair.split('=').collect();
            if parts.len() == 2 {
                Some((decode_component(parts[0]), decode_component(parts[1])))
            } else {
                None
            }
        })
        .collect()
}

/// Parse a record-creation body: a urlencoded form with exactly the two
/// fields `first` and `last`, in either order.
pub fn parse_form(body: &[u8]) -> Result<FormData, Error> {
    let text = std::str::from_utf8(body)
        .map_err(|_| Error::MalformedForm("invalid UTF-8".to_string()))?;

    let raw_pairs: Vec<&str> = text.split('&').collect();
    if raw_pairs.len() != 2 {
        return Err(Error::MalformedForm(text.to_string()));
    }

    let pairs = parse_pairs(text);
    if pairs.len() != 2 {
        return Err(Error::MalformedForm(text.to_string()));
    }

    let mut first = None;
    let mut last = None;
    for (key, value) in pairs {
        match key.as_str() {
            "first" => first = Some(value),
            "last" => last = Some(value),
            _ => return Err(Error::MalformedForm(text.to_string())),
        }
    }

    match (first, last) {
        (Some(first), Some(last)) => Ok(FormData { first, last }),
        _ => Err(Error::MalformedForm(text.to_string())),
    }
}
