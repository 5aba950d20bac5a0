/// Label prefixed to every exported file name.
pub const DEFAULT_LABEL: &str = "Shot Formatted";

/// Derive the download name: `"{label} {stem}.{ext}"`.
///
/// The stem is everything before the last `.`; a name without a dot is used whole. Leading dots
/// (`.hidden`) count as part of the stem.
pub fn output_file_name(label: &str, original: &str, ext: &str) -> String {
    let stem = match original.rfind('.') {
        Some(idx) if idx > 0 => &original[..idx],
        _ => original,
    };
    format!("{label} {stem}.{ext}")
}
