use std::path::PathBuf;

use tracing::info;

use crate::{command::TreeArg, output::ReportOutput};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BuildArg {
    #[clap(flatten)]
    tree: TreeArg,
    /// Report file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &BuildArg) -> anyhow::Result<()> {
    let BuildArg { tree, output } = arg;
    let (_store, root) = tree.load_tree()?;

    let report = format!("{}\n{root}\n", tree.matchup());
    let mut output = ReportOutput::create(output.as_deref())?;
    output.emit("tree report", |w| w.write_all(report.as_bytes()))?;
    info!(output = output.target(), "report written");
    Ok(())
}
