use schemars::schema_for;
use taxon_api::{CategoryTree, FlatCategory, PersistedSelection};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Category tree document (--format nested):");
    println!("{}", serde_json::to_string_pretty(&schema_for!(CategoryTree))?);

    println!("\nFlat category row (--format flat expects an array of these):");
    println!("{}", serde_json::to_string_pretty(&schema_for!(FlatCategory))?);

    println!("\nPersisted selection:");
    println!(
        "{}",
        serde_json::to_string_pretty(&schema_for!(PersistedSelection))?
    );

    Ok(())
}
