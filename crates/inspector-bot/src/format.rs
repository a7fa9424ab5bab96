//! HTML formatting helpers for metadata replies.

#[cfg(test)]
#[path = "format_tests.rs"]
mod format_tests;

use teloxide::utils::html::escape;

/// Render labelled rows as the bot's HTML metadata tree.
///
/// The first row is the section header; the following rows render as
/// `├`/`└` branches and are dropped when they carry no value. Values are
/// escaped and wrapped in `<code>`.
pub fn text_tree(rows: &[(&str, Option<String>)]) -> String {
    let mut lines = Vec::with_capacity(rows.len());

    for (index, (header, value)) in rows.iter().enumerate() {
        let value = value
            .as_ref()
            .map(|v| format!("<code>{}</code>", escape(v)))
            .unwrap_or_default();

        if index == 0 {
            lines.push(format!("<b>{}</b>: {}", header, value));
        } else if !value.is_empty() {
            let branch = if index == rows.len() - 1 { "└" } else { "├" };
            lines.push(format!("<b> {} {}</b>: {}", branch, header, value));
        }
    }

    lines.join("\n")
}

/// Human-readable byte size, stepping from bytes up to petabytes.
pub fn file_size(bytes: u64) -> String {
    const STEPS: [(f64, &str); 5] = [
        (1.126e15, " PB"),
        (1.1e12, " TB"),
        (1.074e9, " GB"),
        (1.049e6, " MB"),
        (1024.0, " KB"),
    ];

    let bytes_f = bytes as f64;
    for (factor, suffix) in STEPS {
        if bytes_f >= factor {
            let amount = (bytes_f / factor * 10.0).round() / 10.0;
            return format!("{}{}", amount, suffix);
        }
    }

    if bytes == 1 {
        "1 byte".to_string()
    } else {
        format!("{} bytes", bytes)
    }
}

/// `H:MM:SS` duration, the way the platform clients render it.
pub fn duration(seconds: u32) -> String {
    let hours = seconds / 3600;
    let rest = seconds % 3600;
    format!("{}:{:02}:{:02}", hours, rest / 60, rest % 60)
}
