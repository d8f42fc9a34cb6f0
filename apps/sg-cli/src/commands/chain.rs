// chain.rs — `sg chain`: print a type's ancestor chain.
//
// Useful when writing `match = "subtypes"` filters: shows exactly which
// roots a type descends from under the given type table.

use std::path::PathBuf;

use clap::Args;
use sg_types::{HierarchyResolver, TypeName};

#[derive(Args)]
pub struct ChainArgs {
    /// Host type table (.toml, .yaml or .yml).
    #[arg(long)]
    pub types: PathBuf,
    /// Fully qualified type name.
    pub type_name: String,
}

pub fn execute(args: &ChainArgs) -> anyhow::Result<()> {
    let resolver = super::load_resolver(Some(args.types.as_path()))?;
    for line in render(resolver.as_ref(), &TypeName::from(args.type_name.as_str())) {
        println!("{}", line);
    }
    Ok(())
}

/// Most derived first, each ancestor indented one step further.
fn render(resolver: &dyn HierarchyResolver, type_name: &TypeName) -> Vec<String> {
    resolver
        .ancestor_chain(type_name)
        .iter()
        .enumerate()
        .map(|(depth, name)| format!("{}{}", "  ".repeat(depth), name))
        .collect()
}
