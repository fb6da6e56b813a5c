mod commands;
mod shell;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use taxon_api::CategoryId;
use taxon_core::{ResolverConfig, SelectionController, StaleIdPolicy};
use taxon_runtime::{JsonFileTreeProvider, TreeFormat};

#[derive(Parser)]
#[command(
    name = "taxon",
    version,
    about = "Hierarchical category selection resolver",
    long_about = "Taxon resolves category selections against a category tree: it expands explicit \
                  picks with their implied ancestors, collapses persisted selections back to their \
                  leaf-most members, and keeps a single primary category consistent with the selection."
)]
pub struct Cli {
    /// Also log to stderr (file logs are always written)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Handling of selected ids missing from the tree (overrides TAXON_STALE_IDS)
    #[arg(long, global = true, value_enum)]
    pub stale_ids: Option<CliStaleIds>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[clap(rename_all = "lowercase")]
pub enum CliStaleIds {
    Keep,
    Prune,
}

impl From<CliStaleIds> for StaleIdPolicy {
    fn from(policy: CliStaleIds) -> Self {
        match policy {
            CliStaleIds::Keep => StaleIdPolicy::Keep,
            CliStaleIds::Prune => StaleIdPolicy::Prune,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
#[clap(rename_all = "lowercase")]
pub enum CliTreeFormat {
    #[default]
    Nested,
    Flat,
}

impl From<CliTreeFormat> for TreeFormat {
    fn from(format: CliTreeFormat) -> Self {
        match format {
            CliTreeFormat::Nested => TreeFormat::Nested,
            CliTreeFormat::Flat => TreeFormat::Flat,
        }
    }
}

/// Where to read the category tree from.
#[derive(Args, Clone, Debug)]
pub struct TreeArgs {
    /// Path to the category tree JSON document
    #[arg(long, value_name = "TREE_JSON")]
    pub tree: PathBuf,

    /// Document layout: nested `children` arrays or flat `parent_id` rows
    #[arg(long, value_enum, default_value_t = CliTreeFormat::Nested)]
    pub format: CliTreeFormat,
}

impl TreeArgs {
    pub fn provider(&self) -> JsonFileTreeProvider {
        JsonFileTreeProvider::new(&self.tree, self.format.into())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the category tree with depth and parent of every node
    Tree {
        #[command(flatten)]
        tree: TreeArgs,
    },
    /// Expand explicit picks into checked, half-checked and effective sets
    Derive {
        #[command(flatten)]
        tree: TreeArgs,
        /// Explicitly selected category ids (comma separated)
        #[arg(long, value_delimiter = ',', num_args = 0..)]
        explicit: Vec<CategoryId>,
    },
    /// Collapse a persisted effective set back to its explicit selection
    #[command(
        long_about = "Loads a persisted selection the way a saved product is restored: ancestors \
                      implied by a more specific member are dropped and the primary is repaired."
    )]
    Restore {
        #[command(flatten)]
        tree: TreeArgs,
        /// Persisted effective category ids (comma separated)
        #[arg(long, value_delimiter = ',', num_args = 0..)]
        categories: Vec<CategoryId>,
        /// Persisted primary category id
        #[arg(long)]
        primary: Option<CategoryId>,
    },
    /// Normalize a primary category against an explicit selection
    Primary {
        #[command(flatten)]
        tree: TreeArgs,
        /// Explicitly selected category ids (comma separated)
        #[arg(long, value_delimiter = ',', num_args = 0..)]
        explicit: Vec<CategoryId>,
        /// Requested primary category id
        #[arg(long)]
        primary: Option<CategoryId>,
    },
    /// Run a script of selection commands and print the persisted result
    #[command(
        long_about = "Reads one shell command per line (see `taxon shell` and `help` inside it) from \
                      the script file, or stdin when no script is given. Blank lines and lines starting \
                      with '#' are skipped."
    )]
    Session {
        #[command(flatten)]
        tree: TreeArgs,
        /// Script file; defaults to stdin
        #[arg(long, value_name = "SCRIPT")]
        script: Option<PathBuf>,
    },
    /// Start an interactive selection shell
    Shell {
        #[command(flatten)]
        tree: TreeArgs,
    },
    /// Print JSON schemas of the tree and persistence documents
    Schema,
}

/// Resolver configuration from the environment, with CLI overrides applied.
pub fn resolver_config(cli_policy: Option<CliStaleIds>) -> taxon_core::Result<ResolverConfig> {
    let mut config = ResolverConfig::from_env()?;
    if let Some(policy) = cli_policy {
        config.stale_ids = policy.into();
    }
    Ok(config)
}

/// A controller with the tree from `args` already installed.
pub(crate) fn load_controller(
    rt: &tokio::runtime::Runtime,
    args: &TreeArgs,
    config: ResolverConfig,
) -> Result<SelectionController, Box<dyn std::error::Error>> {
    let mut controller = SelectionController::new(config);
    let provider = args.provider();
    let ticket = controller.request_tree();
    rt.block_on(taxon_runtime::refresh_tree(
        &mut controller,
        &provider,
        ticket,
    ))?;
    Ok(controller)
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let component = match &cli.command {
        Commands::Shell { .. } => "shell",
        _ => "cli",
    };
    // The interactive shell owns the terminal; keep its logs in the file only
    let to_stderr = cli.verbose && !matches!(cli.command, Commands::Shell { .. });
    let _guard = taxon_runtime::init_logging(component, to_stderr);

    let config = resolver_config(cli.stale_ids)?;
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::Tree { tree } => commands::tree::run(&rt, &tree, config),
        Commands::Derive { tree, explicit } => {
            commands::derive::run(&rt, &tree, config, &explicit)
        }
        Commands::Restore {
            tree,
            categories,
            primary,
        } => commands::restore::run(&rt, &tree, config, &categories, primary),
        Commands::Primary {
            tree,
            explicit,
            primary,
        } => commands::primary::run(&rt, &tree, config, &explicit, primary),
        Commands::Session { tree, script } => {
            shell::run_script(rt, &tree, config, script.as_deref())
        }
        Commands::Shell { tree } => shell::run_interactive(rt, &tree, config),
        Commands::Schema => commands::schema::run(),
    }
}
