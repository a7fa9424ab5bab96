#[cfg(test)]
mod tests {
    use crate::format::{duration, file_size, text_tree};

    #[test]
    fn test_text_tree_branches() {
        let text = text_tree(&[
            ("👤Name", Some("Ada".to_string())),
            ("Username", Some("@ada".to_string())),
            ("ID", Some("42".to_string())),
        ]);

        assert_eq!(
            text,
            "<b>👤Name</b>: <code>Ada</code>\n\
             <b> ├ Username</b>: <code>@ada</code>\n\
             <b> └ ID</b>: <code>42</code>"
        );
    }

    #[test]
    fn test_text_tree_skips_empty_values() {
        let text = text_tree(&[
            ("🖼Photo", None),
            ("Width", None),
            ("Height", Some("512".to_string())),
        ]);

        assert_eq!(text, "<b>🖼Photo</b>: \n<b> └ Height</b>: <code>512</code>");
    }

    #[test]
    fn test_text_tree_escapes_html() {
        let text = text_tree(&[("Name", Some("<cat & dog>".to_string()))]);
        assert_eq!(text, "<b>Name</b>: <code>&lt;cat &amp; dog&gt;</code>");
    }

    #[test]
    fn test_file_size_steps() {
        assert_eq!(file_size(1), "1 byte");
        assert_eq!(file_size(512), "512 bytes");
        assert_eq!(file_size(2048), "2 KB");
        assert_eq!(file_size(1_500_000), "1.4 MB");
        assert_eq!(file_size(2_147_483_648), "2 GB");
    }

    #[test]
    fn test_duration_formats_as_clock() {
        assert_eq!(duration(5), "0:00:05");
        assert_eq!(duration(65), "0:01:05");
        assert_eq!(duration(3725), "1:02:05");
    }
}
