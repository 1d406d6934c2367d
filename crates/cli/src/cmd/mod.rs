pub(crate) mod alarms;
pub(crate) mod helpers;
pub(crate) mod lifecycle;
pub(crate) mod version;

use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Bucket lifecycle rules
    #[command(subcommand)]
    Lifecycle(lifecycle::LifecycleCmd),
    /// Idle-instance shutdown alarms
    #[command(subcommand)]
    Alarms(alarms::AlarmsCmd),
    Version,
}

pub async fn run(opts: crate::Opts) -> Result<()> {
    let mode = opts.output_mode();
    match opts.cmd {
        Commands::Lifecycle(cmd) => lifecycle::execute(cmd, mode, opts.region).await,
        Commands::Alarms(cmd) => alarms::execute(cmd, mode, opts.region).await,
        Commands::Version => version::execute(mode),
    }
}
