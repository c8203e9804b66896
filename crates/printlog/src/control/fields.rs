//! Reading attribute values out of decoded control-file text.
//!
//! Control files are IPP attribute dumps: `tag, name-length(2), name,
//! value-length(2), value`. Decoded as text, a value shows up as the run of
//! printable characters after its attribute name, followed by the next
//! attribute's tag character and a NUL.

use crate::model::JobId;

pub const JOB_NAME_MARKER: &str = "job-name";
pub const USER_MARKER: &str = "job-originating-user-name";
pub const PRINTER_SEGMENT: &str = "/printers/";
pub const JOB_ID_MARKER: &[u8] = b"job-id";

/// Substrings that identify IPP attribute names rather than user data.
pub const ATTRIBUTE_MARKERS: &[&str] = &["job-", "printer-", "document-format", "attributes-"];

/// Attribute names that leak into the tail of an extracted document name.
const LEAK_MARKERS: &[&str] = &[
    "document-format",
    "job-priority",
    "job-uuid",
    "job-originating",
    "job-sheets",
    "printer-uri",
    "attributes-",
];

const NO_NAME: &str = "%N";

/// Minimum length, in characters, of an accepted document name.
pub const MIN_NAME_LEN: usize = 3;

/// IPP value tags that print as ASCII: integer, enum, and 0x41..=0x4A.
pub fn is_ipp_tag(c: char) -> bool {
    matches!(c, '!' | '#' | 'A'..='J')
}

/// Returns the value following the marker that ends at byte `start`.
///
/// When the two bytes after the marker are a value length that lands on the
/// next attribute (or the end tag), exactly that many bytes are the value.
/// Otherwise leading control characters are skipped and the value stops at
/// the next control character; a trailing tag character directly before a
/// NUL belongs to the next attribute and is dropped.
pub fn value_after(content: &str, start: usize) -> &str {
    let rest = content.get(start..).unwrap_or_default();
    if let Some(value) = length_prefixed(rest) {
        return value;
    }

    let rest = rest.trim_start_matches(|c: char| c.is_control());
    let end = rest.find(|c: char| c.is_control()).unwrap_or(rest.len());
    let value = &rest[..end];

    if rest[end..].starts_with('\0') {
        if let Some(last) = value.chars().last().filter(|c| is_ipp_tag(*c)) {
            return &value[..value.len() - last.len_utf8()];
        }
    }
    value
}

fn length_prefixed(rest: &str) -> Option<&str> {
    let bytes = rest.as_bytes();
    let [hi, lo, ..] = bytes else {
        return None;
    };
    let len = u16::from_be_bytes([*hi, *lo]) as usize;
    let end = 2 + len;
    if len == 0 || end > bytes.len() {
        return None;
    }

    // Next comes the end tag, or a value tag followed by a short name length.
    let lands_on_attribute = match &bytes[end..] {
        [] | [0x03, ..] => true,
        [tag, 0x00, ..] => tag.is_ascii(),
        _ => false,
    };
    let value = rest.get(2..end)?;
    (lands_on_attribute && !value.contains(|c: char| c.is_control())).then_some(value)
}

/// Value of the first occurrence of `marker`, matched ASCII case-insensitively.
pub fn marker_value<'a>(content: &'a str, marker: &str) -> Option<&'a str> {
    // ASCII lowercasing keeps byte offsets aligned with `content`.
    let lowered = content.to_ascii_lowercase();
    let pos = lowered.find(&marker.to_ascii_lowercase())?;
    Some(value_after(content, pos + marker.len()))
}

/// Cleans a raw name candidate. Returns `None` when nothing usable is left.
pub fn normalize_name(raw: &str) -> Option<String> {
    if raw.trim() == NO_NAME {
        return None;
    }

    let kept: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '.' | '(' | ')'))
        .collect();
    let cut = cut_leakage(&kept);
    let collapsed = cut.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() < MIN_NAME_LEN {
        return None;
    }
    Some(collapsed)
}

fn cut_leakage(name: &str) -> &str {
    let lowered = name.to_ascii_lowercase();
    let Some(pos) = LEAK_MARKERS.iter().filter_map(|m| lowered.find(m)).min() else {
        return name;
    };

    let head = &name[..pos];
    match head.chars().last() {
        Some(tag) if is_ipp_tag(tag) && tag.is_ascii_uppercase() => &head[..head.len() - 1],
        _ => head,
    }
}

/// Cleans a user or printer value to word characters, `-` and `.`.
pub fn clean_identity(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.starts_with('!') {
        return None;
    }

    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect();
    if cleaned.is_empty() || contains_marker(&cleaned) {
        return None;
    }
    Some(cleaned)
}

pub fn contains_marker(text: &str) -> bool {
    let lowered = text.to_ascii_lowercase();
    ATTRIBUTE_MARKERS.iter().any(|m| lowered.contains(m))
}

/// Job id from the `job-id` attribute, as ASCII digits or an IPP integer.
pub fn content_job_id(bytes: &[u8]) -> Option<JobId> {
    let mut offset = 0;
    while let Some(found) = find_bytes(&bytes[offset..], JOB_ID_MARKER) {
        let after = &bytes[offset + found + JOB_ID_MARKER.len()..];

        let digits: Vec<u8> = after
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .copied()
            .collect();
        if !digits.is_empty() {
            return std::str::from_utf8(&digits).ok().and_then(JobId::new);
        }

        if let [0x00, 0x04, a, b, c, d, ..] = after {
            let value = u32::from_be_bytes([*a, *b, *c, *d]);
            return JobId::new(&value.to_string());
        }

        offset += found + JOB_ID_MARKER.len();
    }
    None
}

/// Job id from a control-file name such as `c00042`.
pub fn file_name_job_id(file_name: &str, prefix: &str) -> Option<JobId> {
    let digits = file_name.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    JobId::new(digits)
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
