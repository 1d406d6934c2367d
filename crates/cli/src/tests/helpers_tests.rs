#[cfg(test)]
mod tests {
    use crate::cmd::helpers;

    #[test]
    fn default_config_path_not_empty() {
        let path = helpers::default_config_path();
        assert!(path.ends_with("cloudkeep/alarms.yml"));
    }

    #[test]
    fn load_config_missing_explicit_file() {
        let result = helpers::load_config(Some("/nonexistent/path.yml"));
        assert!(result.is_err());
    }

    #[test]
    fn load_config_from_tempfile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alarms.yml");
        std::fs::write(
            &path,
            r#"
tag_key: Shutdown
max_concurrency: 2
template:
  threshold: 5
"#,
        )
        .unwrap();

        let cfg = helpers::load_config(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(cfg.tag_key, "Shutdown");
        assert_eq!(cfg.max_concurrency, 2);
        assert_eq!(cfg.template.threshold, 5.0);
    }

    #[test]
    fn load_config_reports_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alarms.yml");
        std::fs::write(&path, "max_concurrency: 0\n").unwrap();

        let err = helpers::load_config(Some(path.to_str().unwrap())).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("loading config"));
        assert!(chain.contains("max_concurrency"));
    }

    #[test]
    fn parse_inline_json() {
        let value = helpers::parse_json_data(r#"{"ID":"a"}"#).unwrap();
        assert_eq!(value["ID"], "a");
    }

    #[test]
    fn parse_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rule.json");
        std::fs::write(&path, r#"{"ID":"from-file","Status":"Enabled"}"#).unwrap();

        let value = helpers::parse_json_data(path.to_str().unwrap()).unwrap();
        assert_eq!(value["ID"], "from-file");
    }

    #[test]
    fn parse_invalid_json() {
        assert!(helpers::parse_json_data("{not json").is_err());
    }
}
