use crate::TreeArgs;
use serde::Serialize;
use taxon_api::CategoryId;
use taxon_core::{IdSet, ResolverConfig, effective_from_explicit};

#[derive(Serialize)]
struct DeriveOutput {
    checked: Vec<CategoryId>,
    half_checked: Vec<CategoryId>,
    effective: Vec<CategoryId>,
}

pub fn run(
    rt: &tokio::runtime::Runtime,
    args: &TreeArgs,
    config: ResolverConfig,
    explicit: &[CategoryId],
) -> Result<(), Box<dyn std::error::Error>> {
    let controller = crate::load_controller(rt, args, config)?;
    let explicit: IdSet = explicit.iter().copied().collect();

    let derivation = effective_from_explicit(controller.tree(), &explicit);
    let output = DeriveOutput {
        checked: derivation.checked.into_iter().collect(),
        half_checked: derivation.half_checked.into_iter().collect(),
        effective: derivation.effective.into_iter().collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
