use anyhow::{bail, Context, Result};
use clap::Subcommand;
use cloudkeep_alarms::{
    AlarmReconciler, CloudWatchMonitoring, Ec2Inventory, Inventory, Monitoring, ReconcileReport,
    ReconcilerConfig, RunOptions,
};

use super::helpers;
use crate::output::{
    failures_table, print_error, print_json, print_success, print_warning, spinner, theme,
    OutputMode,
};

#[derive(Subcommand)]
pub enum AlarmsCmd {
    /// Create the idle-shutdown alarm for every tagged instance that lacks one
    Reconcile(ReconcileArgs),
    /// Print the effective reconciler configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct ReconcileArgs {
    #[arg(long, help = "Path to the reconciler config (YAML)")]
    pub config: Option<String>,
    #[arg(long, help = "List the alarms that would be created without creating them")]
    pub dry_run: bool,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[arg(long, help = "Path to the reconciler config (YAML)")]
    pub config: Option<String>,
}

pub async fn execute(cmd: AlarmsCmd, mode: OutputMode, region: Option<String>) -> Result<()> {
    match cmd {
        AlarmsCmd::Reconcile(args) => {
            let mut config = helpers::load_config(args.config.as_deref())?;
            if region.is_some() {
                config.region = region;
            }
            let sdk = helpers::aws_config(config.region.as_deref()).await;
            let resolved = sdk.region().map(|r| r.to_string());
            let region = config.effective_region(resolved.as_deref());
            let reconciler = AlarmReconciler::new(
                Ec2Inventory::new(aws_sdk_ec2::Client::new(&sdk)),
                CloudWatchMonitoring::new(aws_sdk_cloudwatch::Client::new(&sdk)),
                config,
                region,
            );
            let report = reconcile(&reconciler, RunOptions { dry_run: args.dry_run }, mode).await?;
            ensure_success(&report)
        }
        AlarmsCmd::Config(args) => {
            let mut config = helpers::load_config(args.config.as_deref())?;
            if region.is_some() {
                config.region = region;
            }
            show_config(&config, mode)
        }
    }
}

pub async fn reconcile<I: Inventory, M: Monitoring>(
    reconciler: &AlarmReconciler<I, M>,
    opts: RunOptions,
    mode: OutputMode,
) -> Result<ReconcileReport> {
    let sp = spinner::start(mode, "Reconciling idle-shutdown alarms...");
    let report = match reconciler.run(opts).await {
        Ok(report) => report,
        Err(e) => {
            if let Some(sp) = &sp {
                spinner::finish_err(sp, "Reconciliation failed");
            }
            return Err(e).context("reconciling alarms");
        }
    };
    if let Some(sp) = &sp {
        spinner::finish_clear(sp);
    }

    match mode {
        OutputMode::Json => print_json(&report)?,
        OutputMode::Human => print_reconcile_report(reconciler, &report),
    }
    Ok(report)
}

/// Any failed creation turns into a non-zero exit.
pub fn ensure_success(report: &ReconcileReport) -> Result<()> {
    if !report.is_success() {
        bail!(
            "{} of {} alarm(s) could not be created",
            report.failed.len(),
            report.pending.len()
        );
    }
    Ok(())
}

fn print_reconcile_report<I: Inventory, M: Monitoring>(
    reconciler: &AlarmReconciler<I, M>,
    report: &ReconcileReport,
) {
    theme::print_header("Idle-shutdown alarms");
    theme::print_kv("Region", reconciler.region());
    theme::print_kv("Targets", &report.targets.len().to_string());
    theme::print_kv("With alarm", &report.existing.len().to_string());
    theme::print_kv("Pending", &theme::id_list(&report.pending));

    if report.pending.is_empty() {
        print_success("Every tagged instance already has an alarm");
        return;
    }

    if report.dry_run {
        theme::print_section("Would create");
        for id in &report.pending {
            let spec = reconciler.render(id, &reconciler.config().template);
            theme::print_dim(&spec.name);
        }
        println!();
        print_warning("Dry run: no alarms created");
        return;
    }

    theme::print_kv_colored("Created", &theme::id_list(&report.created), true);
    if report.is_success() {
        print_success(&format!("{} alarm(s) created", report.created.len()));
    } else {
        println!("{}", failures_table(&report.failed));
        print_error(&format!("{} alarm(s) failed", report.failed.len()));
    }
}

fn show_config(config: &ReconcilerConfig, mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Json => print_json(config)?,
        OutputMode::Human => {
            let yaml = serde_yaml::to_string(config).context("rendering config")?;
            theme::print_header("Reconciler config");
            print!("{yaml}");
        }
    }
    Ok(())
}
