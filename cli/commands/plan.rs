use crate::cli_args::PlanArgs;
use crate::load_config_for_command;
use crate::output::{print_data_or_text, print_plan_table};
use anyhow::{Context, Result};
use log;
use repomerge_core::{Config, plan_directory};

pub fn handle_plan_command(args: PlanArgs) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let config = load_config_for_command(&project_root, &args.project_config)
        .context("Failed to load configuration for plan command")?;

    let repo_name = config.get_effective_repo_name(&project_root);
    let filter = config.path_filter_for(&project_root, &repo_name);
    let plan = plan_directory(&project_root, &filter)
        .with_context(|| format!("Failed to walk {}", project_root.display()))?;
    log::debug!("Plan covers {} paths", plan.len());

    if args.format_output.format.as_deref() == Some("json") {
        print_data_or_text(&plan, None, &args.format_output, "json")
    } else {
        print_plan_table(&plan)
    }
}
