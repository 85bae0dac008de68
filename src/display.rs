//! Timestamp parsing and the presentation helpers shared by the email and
//! PDF templates.

use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

pub const UNSET_DATE: &str = "Não definida";

/// Parses a client-supplied instant.
///
/// Accepts RFC 3339, an HTML `datetime-local` value (`2025-01-05T10:00`,
/// optionally with seconds, read as wall-clock time at `local`) or a bare
/// date (midnight UTC).
pub fn parse_timestamp(raw: &str, local: UtcOffset) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(ts);
    }
    let local_with_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    if let Ok(ts) = PrimitiveDateTime::parse(raw, &local_with_seconds) {
        return Some(ts.assume_offset(local));
    }
    let local_minutes = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    if let Ok(ts) = PrimitiveDateTime::parse(raw, &local_minutes) {
        return Some(ts.assume_offset(local));
    }
    let date = format_description!("[year]-[month]-[day]");
    Date::parse(raw, &date)
        .ok()
        .map(|d| d.midnight().assume_utc())
}

/// `dd/mm/yyyy, HH:MM:SS` in the given offset.
pub fn format_timestamp(ts: OffsetDateTime, offset: UtcOffset) -> String {
    let fmt = format_description!("[day]/[month]/[year], [hour]:[minute]:[second]");
    let local = ts.to_offset(offset);
    local.format(&fmt).unwrap_or_else(|_| local.to_string())
}

pub fn format_optional(ts: Option<OffsetDateTime>, offset: UtcOffset) -> String {
    ts.map(|t| format_timestamp(t, offset))
        .unwrap_or_else(|| UNSET_DATE.to_string())
}

pub fn status_label(completed: bool) -> &'static str {
    if completed {
        "Concluída"
    } else {
        "Em aberto"
    }
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
