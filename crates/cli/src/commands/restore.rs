use crate::TreeArgs;
use serde::Serialize;
use taxon_api::{CategoryId, PersistedSelection, SelectedCategory};
use taxon_core::ResolverConfig;

#[derive(Serialize)]
struct RestoreOutput {
    explicit: Vec<SelectedCategory>,
    persisted: PersistedSelection,
    stale: Vec<CategoryId>,
}

pub fn run(
    rt: &tokio::runtime::Runtime,
    args: &TreeArgs,
    config: ResolverConfig,
    categories: &[CategoryId],
    primary: Option<CategoryId>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = crate::load_controller(rt, args, config)?;
    controller.initialize_from_persisted(categories, primary);

    let output = RestoreOutput {
        explicit: controller.selected_categories(),
        persisted: controller.persisted(),
        stale: controller.stale_ids(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
