/// Local file name for a server-supplied artifact name.
///
/// Path separators and characters Windows refuses are replaced with `_`,
/// runs of `_` collapse, and reserved device names get a trailing `_`.
/// The extension survives truncation.
pub fn safe_file_name(input: &str) -> String {
    let last_segment = input.rsplit(['/', '\\']).next().unwrap_or(input);
    let cleaned: String = last_segment
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]);

    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    if compacted.is_empty() {
        compacted = "download".to_string();
    }

    let mut name = truncate_keeping_extension(compacted, MAX_LEN);
    let stem = name.split('.').next().unwrap_or(&name);
    if is_reserved_windows_name(stem) {
        name.insert(stem.len(), '_');
    }
    name
}

const MAX_LEN: usize = 120;

fn truncate_keeping_extension(name: String, max: usize) -> String {
    if name.chars().count() <= max {
        return name;
    }
    let (stem, ext) = match name.rfind('.') {
        Some(idx) if name.len() - idx <= 10 => (&name[..idx], &name[idx..]),
        _ => (name.as_str(), ""),
    };
    let keep = max.saturating_sub(ext.chars().count());
    let stem: String = stem.chars().take(keep).collect();
    format!("{stem}{ext}")
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
