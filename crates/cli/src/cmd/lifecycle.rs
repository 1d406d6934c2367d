use std::io::IsTerminal;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use cloudkeep_lifecycle::{
    default_tiering_rule, ApplyOptions, MergeAction, MergeReport, PolicyMerger, PolicyStore, Rule,
    S3PolicyStore,
};

use super::helpers;
use crate::output::{
    confirm, print_json, print_success, print_warning, rules_table, spinner, theme, OutputMode,
};

#[derive(Subcommand)]
pub enum LifecycleCmd {
    /// Add the intelligent-tiering rule to a bucket, replacing any rule with the same ID
    AddTiering(AddTieringArgs),
    /// Show the lifecycle rules of a bucket
    Show(ShowArgs),
}

#[derive(clap::Args)]
pub struct AddTieringArgs {
    #[arg(help = "Bucket name")]
    pub bucket: String,
    #[arg(long, help = "Rule as a JSON file path or inline JSON (default: intelligent tiering)")]
    pub rule: Option<String>,
    #[arg(long, help = "Compute the merged policy without uploading it")]
    pub dry_run: bool,
    #[arg(long, help = "Skip confirmation prompt")]
    pub yes: bool,
}

#[derive(clap::Args)]
pub struct ShowArgs {
    #[arg(help = "Bucket name")]
    pub bucket: String,
}

pub async fn execute(cmd: LifecycleCmd, mode: OutputMode, region: Option<String>) -> Result<()> {
    let sdk = helpers::aws_config(region.as_deref()).await;
    let merger = PolicyMerger::new(S3PolicyStore::new(aws_sdk_s3::Client::new(&sdk)));

    match cmd {
        LifecycleCmd::AddTiering(args) => add_tiering(&merger, args, mode).await.map(|_| ()),
        LifecycleCmd::Show(args) => show(&merger, args, mode).await,
    }
}

pub fn resolve_rule(data: Option<&str>) -> Result<Rule> {
    match data {
        Some(data) => {
            let value = helpers::parse_json_data(data)?;
            Rule::from_value(value).context("invalid lifecycle rule")
        }
        None => Ok(default_tiering_rule()),
    }
}

/// Returns `None` when the user declined the replacement.
pub async fn add_tiering<S: PolicyStore>(
    merger: &PolicyMerger<S>,
    args: AddTieringArgs,
    mode: OutputMode,
) -> Result<Option<MergeReport>> {
    let rule = resolve_rule(args.rule.as_deref())?;
    let bucket = args.bucket.as_str();

    let sp = spinner::start(mode, &format!("Reading lifecycle policy of {bucket}..."));
    let plan = match merger.plan(bucket, rule).await {
        Ok(plan) => plan,
        Err(e) => {
            if let Some(sp) = &sp {
                spinner::finish_err(sp, "Could not read lifecycle policy");
            }
            return Err(e).with_context(|| format!("planning lifecycle update for {bucket}"));
        }
    };
    if let Some(sp) = &sp {
        spinner::finish_clear(sp);
    }

    let replacing = matches!(plan.action, MergeAction::Replaced { .. });
    if replacing && mode.is_human() && !args.dry_run && !args.yes {
        let rule_id = plan.rule_id().unwrap_or_default();
        if !confirm_replacement(rule_id, bucket, std::io::stdin().is_terminal())? {
            theme::print_dim("Cancelled.");
            return Ok(None);
        }
    }

    let sp = (plan.action.changes_policy() && !args.dry_run)
        .then(|| spinner::start(mode, "Uploading lifecycle policy..."))
        .flatten();
    let report = match merger.commit(plan, ApplyOptions { dry_run: args.dry_run }).await {
        Ok(report) => report,
        Err(e) => {
            if let Some(sp) = &sp {
                spinner::finish_err(sp, "Upload failed");
            }
            return Err(e).with_context(|| format!("updating lifecycle policy of {bucket}"));
        }
    };
    if let Some(sp) = &sp {
        spinner::finish_ok(sp, "Lifecycle policy uploaded");
    }

    match mode {
        OutputMode::Json => print_json(&report)?,
        OutputMode::Human => print_merge_report(&report),
    }
    Ok(Some(report))
}

/// Without a terminal there is nobody to ask, so a replacement needs `--yes`.
pub fn confirm_replacement(rule_id: &str, bucket: &str, interactive: bool) -> Result<bool> {
    if !interactive {
        bail!("rule '{rule_id}' already exists on {bucket}; pass --yes to replace it");
    }
    Ok(confirm::confirm_action(&format!(
        "Rule '{rule_id}' already exists on {bucket}. Replace it?"
    )))
}

fn print_merge_report(report: &MergeReport) {
    theme::print_header(&format!("Lifecycle · {}", report.bucket));
    theme::print_kv("Rule", &report.rule_id);
    theme::print_kv("Action", report.action.as_str());
    theme::print_kv(
        "Rules",
        &format!("{} → {}", report.rules_before, report.rules_after),
    );
    println!("{}", rules_table(&report.rules));

    if report.uploaded {
        print_success("Lifecycle policy updated");
    } else if report.action.changes_policy() {
        print_warning("Dry run: nothing uploaded");
    } else {
        print_success("Rule already in place, nothing to upload");
    }
}

pub async fn show<S: PolicyStore>(merger: &PolicyMerger<S>, args: ShowArgs, mode: OutputMode) -> Result<()> {
    let sp = spinner::start(mode, &format!("Reading lifecycle policy of {}...", args.bucket));
    let rules = merger.fetch_rules(&args.bucket).await;
    if let Some(sp) = &sp {
        spinner::finish_clear(sp);
    }
    let rules = rules.with_context(|| format!("reading lifecycle policy of {}", args.bucket))?;

    match mode {
        OutputMode::Json => print_json(&rules)?,
        OutputMode::Human => {
            if rules.is_empty() {
                print_success(&format!("No lifecycle rules on {}", args.bucket));
                return Ok(());
            }
            theme::print_header(&format!("Lifecycle · {}", args.bucket));
            println!("{}", rules_table(&rules));
        }
    }
    Ok(())
}
