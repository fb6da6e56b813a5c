use tabled::Tabled;
use taxon_api::{CategoryId, CheckState};
use taxon_core::TreeIndex;

/// One category of the tree listing
#[derive(Tabled, Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub depth: usize,
    pub parent: String,
}

impl CategoryRow {
    /// All categories in display order, names indented by depth.
    pub fn preorder(index: &TreeIndex) -> Vec<Self> {
        let mut rows = Vec::with_capacity(index.len());
        let mut stack: Vec<CategoryId> = index.roots().iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            let depth = index.depth_of(id);
            rows.push(Self {
                id: id.get(),
                name: format!(
                    "{}{}",
                    "  ".repeat(depth.saturating_sub(1)),
                    index.name_of(id).unwrap_or("-")
                ),
                depth,
                parent: index
                    .parent_of(id)
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            });
            stack.extend(index.children_of(id).iter().rev().copied());
        }

        rows
    }
}

/// One selected or implied category
#[derive(Tabled, Debug, Clone, PartialEq, Eq)]
pub struct SelectionRow {
    pub id: i64,
    pub name: String,
    pub state: String,
}

impl SelectionRow {
    pub fn from_state(
        index: &TreeIndex,
        state: &CheckState,
        primary: Option<CategoryId>,
    ) -> Vec<Self> {
        let name = |id: CategoryId| index.name_of(id).unwrap_or("(unknown)").to_string();

        let checked = state.checked.iter().map(|&id| Self {
            id: id.get(),
            name: name(id),
            state: if primary == Some(id) {
                "checked, primary".to_string()
            } else {
                "checked".to_string()
            },
        });
        let implied = state.half_checked.iter().map(|&id| Self {
            id: id.get(),
            name: name(id),
            state: "implied".to_string(),
        });

        checked.chain(implied).collect()
    }
}
