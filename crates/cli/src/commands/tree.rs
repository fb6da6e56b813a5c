use crate::TreeArgs;
use crate::shell::view::CategoryRow;
use tabled::{Table, settings::Style};
use taxon_core::ResolverConfig;

pub fn run(
    rt: &tokio::runtime::Runtime,
    args: &TreeArgs,
    config: ResolverConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let controller = crate::load_controller(rt, args, config)?;
    let index = controller.tree();

    if index.is_empty() {
        println!("NO CATEGORIES FOUND");
        return Ok(());
    }

    let rows = CategoryRow::preorder(index);
    println!("{}", Table::new(&rows).with(Style::psql()));
    println!(
        "{} categories, {} roots, max depth {}",
        index.len(),
        index.roots().len(),
        index.max_depth()
    );
    Ok(())
}
