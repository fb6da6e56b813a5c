use crate::TreeArgs;
use taxon_api::CategoryId;
use taxon_core::{FetchTicket, ResolverConfig, SelectionController};
use taxon_runtime::JsonFileTreeProvider;
use tracing::warn;

/// State shared by all shell commands: one selection session and its tree source.
pub struct ShellContext {
    pub controller: SelectionController,
    provider: JsonFileTreeProvider,
    rt: tokio::runtime::Runtime,
}

impl ShellContext {
    pub fn new(
        rt: tokio::runtime::Runtime,
        args: &TreeArgs,
        config: ResolverConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let controller = crate::load_controller(&rt, args, config)?;
        Ok(Self {
            controller,
            provider: args.provider(),
            rt,
        })
    }

    /// Fetch the tree for `ticket`. Failures are reported but leave the
    /// session on its previous tree.
    pub fn refresh(&mut self, ticket: FetchTicket) -> Option<String> {
        let result = self.rt.block_on(taxon_runtime::refresh_tree(
            &mut self.controller,
            &self.provider,
            ticket,
        ));
        match result {
            Ok(true) => None,
            Ok(false) => Some("Tree refresh superseded by a newer request.".to_string()),
            Err(e) => {
                warn!("Keeping previous category tree: {}", e);
                Some(format!("Warning: tree refresh failed, keeping previous tree: {}", e))
            }
        }
    }

    /// `(id, name)` of every category, for completion.
    pub fn category_names(&self) -> Vec<(CategoryId, String)> {
        let index = self.controller.tree();
        super::view::CategoryRow::preorder(index)
            .into_iter()
            .map(|row| {
                let id = CategoryId(row.id);
                (id, index.name_of(id).unwrap_or_default().to_string())
            })
            .collect()
    }
}
