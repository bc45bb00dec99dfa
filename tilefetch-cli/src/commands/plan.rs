//! Plan command - show what a download would fetch without fetching it.

use tilefetch::orchestrator::DownloadPlan;

use super::common::{print_plan, resolve_download_config, AreaArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the plan command.
pub fn run(area: AreaArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("plan");

    let config = resolve_download_config(&area, &runner.config().download)?;
    let plan = DownloadPlan::from_config(&config)?;

    print_plan(&config, &plan);

    for range in plan.ranges() {
        println!(
            "  Zoom {}: x {}..={}, y {}..={}",
            range.zoom, range.x_min, range.x_max, range.y_min, range.y_max
        );
    }

    Ok(())
}
