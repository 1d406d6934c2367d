mod cmd;
mod output;
#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use cloudkeep_common::telemetry::{self, LogFormat};
use cmd::Commands;
use output::OutputMode;

#[derive(Parser)]
#[command(
    name = "cloudkeep",
    version,
    about = "Keeps bucket lifecycle rules and idle-instance alarms in place"
)]
pub struct Opts {
    #[clap(subcommand)]
    cmd: Commands,

    #[arg(long, global = true, help = "Output as JSON")]
    json: bool,

    #[arg(long, global = true, help = "AWS region (overrides the SDK default chain)")]
    region: Option<String>,
}

impl Opts {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init(LogFormat::from_env());
    let opts = Opts::parse();
    cmd::run(opts).await
}
