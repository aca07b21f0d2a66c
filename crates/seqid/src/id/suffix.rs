use core::cmp::Ordering;

/// Splits `s` into its leading part and its trailing run of ASCII digits.
///
/// This is the `(\d+)$` capture: the digit run is as long as possible and must
/// be non-empty. Returns `None` when `s` does not end in a digit.
///
/// # Example
///
/// ```
/// use seqid::split_suffix;
///
/// assert_eq!(split_suffix("RA-COMRESH0042"), Some(("RA-COMRESH", "0042")));
/// assert_eq!(split_suffix("RA-COMRESH"), None);
/// ```
pub fn split_suffix(s: &str) -> Option<(&str, &str)> {
    let head_len = s.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if head_len == s.len() {
        return None;
    }
    Some(s.split_at(head_len))
}

/// Returns `true` when `id` is exactly `prefix` followed by one or more ASCII
/// digits, i.e. `id` matches `^<prefix>\d+$`.
///
/// The prefix is compared literally; it is never interpreted as a pattern.
pub fn matches_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Orders two identifiers by the numeric value of their trailing digits.
///
/// Leading zeros are ignored, so `"A9"` sorts before `"A10"` and `"A0100"`
/// sorts after `"A99"`, even though plain string order says otherwise. Values
/// are compared as digit strings, so suffixes wider than `u64` still order
/// correctly. Numerically equal suffixes (`"A010"` vs `"A10"`) and identifiers
/// without a suffix fall back to lexicographic order.
pub fn compare_suffix(a: &str, b: &str) -> Ordering {
    let (Some((_, da)), Some((_, db))) = (split_suffix(a), split_suffix(b)) else {
        return a.cmp(b);
    };
    let da = da.trim_start_matches('0');
    let db = db.trim_start_matches('0');
    da.len()
        .cmp(&db.len())
        .then_with(|| da.cmp(db))
        .then_with(|| a.cmp(b))
}

/// Renders the identifier issued when the store cannot be consulted:
/// `prefix` followed by the last 8 decimal digits of `millis`, zero-padded to
/// exactly 8 digits.
///
/// # Example
///
/// ```
/// use seqid::fallback_id;
///
/// assert_eq!(fallback_id("RA-COMSESH", 1_718_000_123_456), "RA-COMSESH00123456");
/// ```
pub fn fallback_id(prefix: &str, millis: u64) -> String {
    format!("{prefix}{:08}", millis % 100_000_000)
}
