#[cfg(test)]
mod tests {
    use crate::config::*;

    #[test]
    fn test_default_export_config() {
        let config = ExportConfig::default();
        assert_eq!(config.batch_size, 30);
        assert_eq!(config.thumbnail_attempts, 3);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [telegram]
            bot_token = "123:abc"
            operator_chat_id = 4242

            [export]
            batch_size = 10
            thumbnail_attempts = 5
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.telegram.bot_token, "123:abc");
        assert_eq!(config.telegram.operator_chat_id, Some(4242));
        assert_eq!(config.export.batch_size, 10);
        assert_eq!(config.export.thumbnail_attempts, 5);
    }

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let toml = r#"
            [telegram]
            bot_token = "123:abc"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.telegram.operator_chat_id, None);
        assert_eq!(config.export.batch_size, 30);
        assert_eq!(config.export.thumbnail_attempts, 3);
    }

    #[test]
    fn test_export_options_mirror_config() {
        let toml = r#"
            [telegram]
            bot_token = "123:abc"

            [export]
            batch_size = 12
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        let options = config.export_options();
        assert_eq!(options.batch_size, 12);
        assert_eq!(options.thumbnail_attempts, 3);
    }
}
