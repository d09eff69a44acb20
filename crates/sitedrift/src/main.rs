use crate::prelude::*;
use clap::Parser;

mod compare;
mod error;
mod fetch;
mod prelude;
mod run;
mod store;
mod summary;
mod urls;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Compare live web pages against their archived snapshots and report how much their content has drifted"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "SITEDRIFT_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Compare every URL of a list and append the results to the output store
    Run(crate::run::RunOptions),

    /// Print the change histogram of an existing output store
    Summary(crate::summary::SummaryOptions),

    /// Compare a single URL (or two local HTML files) and print the result
    Compare(crate::compare::CompareOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Run(options) => crate::run::run(options, app.global).await,
        SubCommands::Summary(options) => crate::summary::run(options, app.global).await,
        SubCommands::Compare(options) => crate::compare::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
