/// Returns the lowercase, dot-prefixed extension of a filename.
///
/// Splits on the last `.`; a name with no dot yields the empty string.
pub fn file_extension(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) => format!(".{}", ext.to_lowercase()),
        None => String::new(),
    }
}

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Formats a byte count using binary units (base 1024).
///
/// Rounds to two decimals and trims trailing zeros: `1024` → `"1 KB"`,
/// `1536` → `"1.5 KB"`, `0` → `"0 B"`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let mut text = format!("{value:.2}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    format!("{text} {}", SIZE_UNITS[unit])
}
