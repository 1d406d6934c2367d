#[cfg(test)]
mod tests {
    use crate::cmd::alarms::AlarmsCmd;
    use crate::cmd::lifecycle::LifecycleCmd;
    use crate::cmd::Commands;
    use crate::Opts;
    use clap::Parser;

    fn parse(args: &[&str]) -> Opts {
        let mut full = vec!["cloudkeep"];
        full.extend_from_slice(args);
        Opts::parse_from(full)
    }

    fn try_parse(args: &[&str]) -> Result<Opts, clap::Error> {
        let mut full = vec!["cloudkeep"];
        full.extend_from_slice(args);
        Opts::try_parse_from(full)
    }

    #[test]
    fn parse_version() {
        let opts = parse(&["version"]);
        assert!(matches!(opts.cmd, Commands::Version));
    }

    #[test]
    fn parse_json_flag() {
        let opts = parse(&["--json", "version"]);
        assert!(opts.json);
        assert_eq!(opts.output_mode(), crate::output::OutputMode::Json);
    }

    #[test]
    fn parse_human_flag_default() {
        let opts = parse(&["version"]);
        assert!(!opts.json);
        assert_eq!(opts.output_mode(), crate::output::OutputMode::Human);
    }

    #[test]
    fn parse_region_flag_is_global() {
        let opts = parse(&["alarms", "reconcile", "--region", "eu-west-1"]);
        assert_eq!(opts.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn parse_add_tiering_defaults() {
        let opts = parse(&["lifecycle", "add-tiering", "my-bucket"]);
        match opts.cmd {
            Commands::Lifecycle(LifecycleCmd::AddTiering(args)) => {
                assert_eq!(args.bucket, "my-bucket");
                assert!(args.rule.is_none());
                assert!(!args.dry_run);
                assert!(!args.yes);
            }
            _ => panic!("expected lifecycle add-tiering"),
        }
    }

    #[test]
    fn parse_add_tiering_all_flags() {
        let opts = parse(&[
            "lifecycle",
            "add-tiering",
            "logs",
            "--rule",
            r#"{"ID":"x","Status":"Enabled"}"#,
            "--dry-run",
            "--yes",
        ]);
        match opts.cmd {
            Commands::Lifecycle(LifecycleCmd::AddTiering(args)) => {
                assert_eq!(args.rule.as_deref(), Some(r#"{"ID":"x","Status":"Enabled"}"#));
                assert!(args.dry_run);
                assert!(args.yes);
            }
            _ => panic!("expected lifecycle add-tiering"),
        }
    }

    #[test]
    fn add_tiering_requires_bucket() {
        let err = try_parse(&["lifecycle", "add-tiering"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parse_lifecycle_show() {
        let opts = parse(&["lifecycle", "show", "logs"]);
        assert!(matches!(opts.cmd, Commands::Lifecycle(LifecycleCmd::Show(_))));
    }

    #[test]
    fn parse_reconcile_without_arguments() {
        let opts = parse(&["alarms", "reconcile"]);
        match opts.cmd {
            Commands::Alarms(AlarmsCmd::Reconcile(args)) => {
                assert!(args.config.is_none());
                assert!(!args.dry_run);
            }
            _ => panic!("expected alarms reconcile"),
        }
    }

    #[test]
    fn parse_reconcile_with_config() {
        let opts = parse(&["alarms", "reconcile", "--config", "/tmp/alarms.yml", "--dry-run"]);
        match opts.cmd {
            Commands::Alarms(AlarmsCmd::Reconcile(args)) => {
                assert_eq!(args.config.as_deref(), Some("/tmp/alarms.yml"));
                assert!(args.dry_run);
            }
            _ => panic!("expected alarms reconcile"),
        }
    }

    #[test]
    fn parse_alarms_config() {
        let opts = parse(&["--json", "alarms", "config"]);
        assert!(matches!(opts.cmd, Commands::Alarms(AlarmsCmd::Config(_))));
    }

    #[test]
    fn unknown_subcommand_rejected() {
        assert!(try_parse(&["rules", "list"]).is_err());
    }
}
