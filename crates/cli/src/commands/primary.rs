use crate::TreeArgs;
use taxon_api::CategoryId;
use taxon_core::{IdSet, ResolverConfig, normalize_primary};

pub fn run(
    rt: &tokio::runtime::Runtime,
    args: &TreeArgs,
    config: ResolverConfig,
    explicit: &[CategoryId],
    primary: Option<CategoryId>,
) -> Result<(), Box<dyn std::error::Error>> {
    let controller = crate::load_controller(rt, args, config)?;
    let explicit: IdSet = explicit.iter().copied().collect();

    let normalized = normalize_primary(controller.tree(), primary, &explicit);
    let output = serde_json::json!({
        "requested": primary,
        "primary_category_id": normalized,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
