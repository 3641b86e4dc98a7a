//! Merging of default and per-request headers and cookies.

use std::collections::BTreeMap;

pub(crate) const COOKIE: &str = "cookie";

/// Insert a header, replacing any existing header with the same case-insensitive name.
pub(crate) fn insert_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
    headers.push((name, value));
}

/// Apply the defaults first, then write the overrides over them.
pub(crate) fn merge_headers(
    defaults: &BTreeMap<String, String>,
    overrides: Vec<(String, String)>,
) -> Vec<(String, String)> {
    let mut merged = Vec::with_capacity(defaults.len() + overrides.len());
    for (name, value) in defaults {
        insert_header(&mut merged, name.clone(), value.clone());
    }
    for (name, value) in overrides {
        insert_header(&mut merged, name, value);
    }
    merged
}

/// Apply the defaults first, then write the overrides over them.
pub(crate) fn merge_cookies(
    defaults: &BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = defaults.clone();
    merged.extend(overrides);
    merged
}

/// Fold the cookies into the header list as a single `Cookie` header. A `Cookie` header already
/// present keeps its pairs in front of the rendered ones.
pub(crate) fn apply_cookies(
    headers: &mut Vec<(String, String)>,
    cookies: &BTreeMap<String, String>,
) {
    if cookies.is_empty() {
        return;
    }
    let rendered = cookies
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("; ");
    match headers
        .iter_mut()
        .find(|(k, _)| k.eq_ignore_ascii_case(COOKIE))
    {
        Some((_, existing)) if !existing.is_empty() => {
            existing.push_str("; ");
            existing.push_str(&rendered);
        }
        Some((_, existing)) => *existing = rendered,
        None => headers.push((COOKIE.to_owned(), rendered)),
    }
}
