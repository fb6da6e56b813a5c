pub mod provider;

pub use provider::{JsonFileTreeProvider, StaticTreeProvider, TreeFormat};

use taxon_api::TreeProvider;
use taxon_core::{FetchTicket, SelectionController, TaxonError, TreeIndex};

/// Fetch a tree snapshot for `ticket` and install it into `controller`.
///
/// The snapshot is validated before installation. On any failure the error
/// is returned and the controller keeps the index it already had.
/// `Ok(false)` means the fetch succeeded but a newer snapshot was already
/// installed.
pub async fn refresh_tree(
    controller: &mut SelectionController,
    provider: &dyn TreeProvider,
    ticket: FetchTicket,
) -> taxon_core::Result<bool> {
    let tree = match provider.fetch_tree().await {
        Ok(tree) => tree,
        Err(e) => {
            tracing::warn!("Category tree fetch failed (ticket {}): {}", ticket.generation(), e);
            return Err(TaxonError::Provider(e));
        }
    };

    let index = TreeIndex::try_build(&tree).inspect_err(|e| {
        tracing::warn!("Rejecting category tree (ticket {}): {}", ticket.generation(), e);
    })?;

    Ok(controller.install_index(ticket, index))
}

/// Start file logging for `component` (`cli`, `shell`, ...), mirrored to
/// stderr when `to_stderr` is set. Keep the returned guard alive until exit
/// so buffered lines are flushed.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(taxon_core::logging::init_logging(component, to_stderr))
}
