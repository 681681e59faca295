use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        long,
        help = "Directory to combine and to look up the config file in (default: current dir).",
        help_heading = "Project Setup",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        long,
        help = "Path of the TOML config file (default: .repomerge/repomerge.toml).",
        value_name = "CONFIG_FILE",
        conflicts_with = "disable_config",
        help_heading = "Project Setup"
    )]
    pub config: Option<String>,

    #[arg(
        long,
        help = "Disable loading any TOML config file.",
        conflicts_with = "config",
        help_heading = "Project Setup"
    )]
    pub disable_config: bool,

    #[arg(
        short = 'n',
        long,
        help = "Repository name used in the header and output filename (overrides config/dir name).",
        value_name = "NAME",
        help_heading = "Project Setup"
    )]
    pub name: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FormatOutputOpts {
    #[arg(short = 'f', long, help = "Set the report format.", value_name = "FORMAT", value_parser = ["text", "json"], help_heading = "Output Formatting")]
    pub format: Option<String>,

    #[arg(
        long,
        help = "Print JSON reports on a single line.",
        help_heading = "Output Formatting"
    )]
    pub minify_json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CombineOutputOpts {
    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Directory the combined file is written to [default: uploads].",
        help_heading = "Output Control",
        conflicts_with = "stdout"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "FILENAME",
        help = "Name of the combined file [default: <repo>.md].",
        help_heading = "Output Control"
    )]
    pub filename: Option<String>,

    #[arg(
        long,
        help = "Print the combined document instead of writing a file.",
        help_heading = "Output Control"
    )]
    pub stdout: bool,

    #[arg(
        long,
        help = "Embed the file tree in the combined document [default: enabled].",
        overrides_with = "no_tree",
        help_heading = "Output Control"
    )]
    pub tree: bool,

    #[arg(
        long,
        help = "Leave the file tree out of the combined document.",
        overrides_with = "tree",
        help_heading = "Output Control"
    )]
    pub no_tree: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "repomerge",
    author,
    version,
    about = "Combine a directory of source files into one Markdown document.",
    long_about = "repomerge walks a directory (or a set of uploaded files), drops binaries, \nconfig files and build output, and writes every remaining file into one \nMarkdown document with a file tree and language-tagged code blocks.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  repomerge combine --project-root ./my-repo\n  repomerge pack src/*.rs README.md --stdout\n  repomerge tree\n  repomerge plan -f json",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "c",
        about = "Combine every eligible file under a directory."
    )]
    Combine(CombineArgs),

    #[command(
        visible_alias = "p",
        about = "Rebuild a tree from a list of files, then combine it."
    )]
    Pack(PackArgs),

    #[command(visible_alias = "t", about = "Print the directory tree.")]
    Tree(TreeArgs),

    #[command(about = "Show which files would be combined and why others are skipped.")]
    Plan(PlanArgs),

    #[command(about = "Show or save the default configuration file.")]
    Config(ConfigArgs),

    #[command(about = "Generate or save shell completion scripts.")]
    Completion(CompletionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CombineArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub output: CombineOutputOpts,
    #[clap(flatten)]
    pub format_output: FormatOutputOpts,
}

#[derive(Args, Debug, Clone)]
pub struct PackArgs {
    #[arg(
        required = true,
        value_name = "FILES",
        help = "Files or directories to upload; directories contribute every file beneath them."
    )]
    pub files: Vec<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Upload paths are taken relative to this directory [default: current dir]."
    )]
    pub base: Option<PathBuf>,

    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub output: CombineOutputOpts,
    #[clap(flatten)]
    pub format_output: FormatOutputOpts,
}

#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub format_output: FormatOutputOpts,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        long,
        help = "Project directory the config is saved under (default: current dir).",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        long,
        help = "Save the default config to .repomerge/repomerge.toml under the project root."
    )]
    pub save: bool,

    #[arg(long, requires = "save", help = "Overwrite an existing config file.")]
    pub force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(
        long,
        value_enum,
        value_name = "SHELL",
        help = "Shell to generate completions for [default: fish]"
    )]
    pub shell: Option<Shell>,

    #[arg(long, help = "Save completion script to the shell's default location.")]
    pub save: bool,

    #[arg(long, requires = "save", help = "Overwrite an existing completion script.")]
    pub force: bool,
}
