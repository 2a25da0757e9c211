fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((idx, _)) => &s[..idx],
    }
}

pub fn get_version_string() -> String {
    format!(
        "{} v{}-{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        truncate(option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"), 8)
    )
}
