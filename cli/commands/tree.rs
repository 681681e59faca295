use crate::cli_args::TreeArgs;
use crate::load_config_for_command;
use crate::output::write_to_stdout;
use anyhow::{Context, Result};
use repomerge_core::{Config, render_tree};

pub fn handle_tree_command(args: TreeArgs) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;
    let config = load_config_for_command(&project_root, &args.project_config)
        .context("Failed to load configuration for tree command")?;

    let repo_name = config.get_effective_repo_name(&project_root);
    let tree = render_tree(&project_root, &repo_name)
        .with_context(|| format!("Failed to render tree for {}", project_root.display()))?;
    write_to_stdout(&tree)
}
