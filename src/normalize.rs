// src/normalize.rs
//! Canonicalization helpers shared by clustering and scoring: URL cleanup,
//! host extraction, best-effort timestamp parsing and feed-text normalization.
//!
//! Everything here is pure and deterministic; fingerprints depend on it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;

/// Canonical form of a URL used for fingerprinting: lowercased, query string
/// and fragment stripped, trailing slash removed. Empty input stays empty.
///
/// Idempotent: `canonical_url(canonical_url(x)) == canonical_url(x)`.
pub fn canonical_url(url: &str) -> String {
    let u = url.trim();
    if u.is_empty() {
        return String::new();
    }
    let cut = u.find(['?', '#']).unwrap_or(u.len());
    u[..cut].to_ascii_lowercase().trim_end_matches('/').to_string()
}

/// Extract the host from a URL, lowercased and with a leading "www." removed.
/// Returns an empty string when no host can be parsed.
pub fn domain_from_url(url: &str) -> String {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"(?i)^https?://([^/\s]+)").expect("host regex"));
    match re.captures(url.trim()) {
        Some(caps) => {
            let host = caps[1].to_ascii_lowercase();
            host.strip_prefix("www.").unwrap_or(&host).to_string()
        }
        None => String::new(),
    }
}

/// Path component of a URL ("/" when absent). Used by the noise penalty to
/// match low-signal sections like `/policia/`.
pub fn path_from_url(url: &str) -> String {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"(?i)^https?://[^/\s]+(/\S*)").expect("path regex"));
    match re.captures(url.trim()) {
        Some(caps) => caps[1].to_string(),
        None => "/".to_string(),
    }
}

/// Best-effort free-text date parse. Accepts RFC 3339/2822 and a handful of
/// common feed formats; naive datetimes are assumed UTC. `None` on failure —
/// callers decide between "use now" and "skip" (see ingest).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(t) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(t, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    for fmt in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(t, fmt) {
            return Some(Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0)?));
        }
    }
    None
}

/// Hours elapsed between `published_at` and `now`, floored at zero so items
/// timestamped in the future don't get a freshness boost.
pub fn hours_since(published_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    ((now - published_at).num_seconds() as f64 / 3600.0).max(0.0)
}

/// Normalize feed text: decode HTML entities, strip tags, fold smart quotes,
/// collapse whitespace, trim trailing sentence punctuation, cap length.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize typographic quotes to ASCII
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("ws regex"));
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Strip trailing sentence punctuation (keep quotes)
    while let Some(last) = out.chars().last() {
        if matches!(last, '!' | '?' | '.' | ',') {
            out.pop();
        } else {
            break;
        }
    }

    // 6) Length cap: 1500 chars
    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn canonical_url_strips_query_fragment_and_slash() {
        assert_eq!(
            canonical_url("https://Valor.Globo.com/x?utm=1"),
            "https://valor.globo.com/x"
        );
        assert_eq!(canonical_url("https://a.com/path/#frag"), "https://a.com/path");
        assert_eq!(canonical_url(""), "");
    }

    #[test]
    fn canonical_url_is_idempotent() {
        let once = canonical_url("HTTPS://www.Example.com/News/?q=1#top");
        assert_eq!(canonical_url(&once), once);
    }

    #[test]
    fn domain_strips_www_and_lowercases() {
        assert_eq!(domain_from_url("https://WWW.InfoMoney.com.br/feed"), "infomoney.com.br");
        assert_eq!(domain_from_url("not a url"), "");
    }

    #[test]
    fn path_defaults_to_root() {
        assert_eq!(path_from_url("https://g1.globo.com/sp/noticia.html"), "/sp/noticia.html");
        assert_eq!(path_from_url("https://g1.globo.com"), "/");
    }

    #[test]
    fn parse_timestamp_accepts_common_formats() {
        let a = parse_timestamp("2025-01-01T10:00:00Z").unwrap();
        assert_eq!(a.hour(), 10);
        assert!(parse_timestamp("Wed, 01 Jan 2025 10:00:00 GMT").is_some());
        assert!(parse_timestamp("2025-01-01 10:00:00").is_some());
        assert!(parse_timestamp("2025-01-01").is_some());
        assert!(parse_timestamp("yesterday-ish").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn normalize_text_collapses_ws_and_punct() {
        let s = "  Hello,&nbsp;&nbsp; world!!!  ";
        assert_eq!(normalize_text(s), "Hello, world");
    }
}
