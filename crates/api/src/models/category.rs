use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend identifier of a category.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
#[serde(transparent)]
pub struct CategoryId(pub i64);

impl CategoryId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for CategoryId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CategoryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

/// A category and its ordered subcategories, as delivered by the tree provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct CategoryNode {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn leaf(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        children: Vec<CategoryNode>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children,
        }
    }
}

/// A full tree snapshot: the ordered list of root categories.
///
/// Serialized as a bare JSON array of nodes.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(transparent)]
pub struct CategoryTree(pub Vec<CategoryNode>);

impl CategoryTree {
    pub fn new(roots: Vec<CategoryNode>) -> Self {
        Self(roots)
    }

    pub fn roots(&self) -> &[CategoryNode] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of nodes across all levels.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&CategoryNode> = self.0.iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

impl From<Vec<CategoryNode>> for CategoryTree {
    fn from(roots: Vec<CategoryNode>) -> Self {
        Self(roots)
    }
}

/// One row of a flat category listing (`parent_id` is null for roots).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct FlatCategory {
    pub id: CategoryId,
    pub name: String,
    pub parent_id: Option<CategoryId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_deserializes_without_children_field() {
        let json = r#"[{"id": 1, "name": "Electronics", "children": [{"id": 2, "name": "Phones"}]}]"#;
        let tree: CategoryTree = serde_json::from_str(json).unwrap();

        assert_eq!(tree.roots().len(), 1);
        assert_eq!(tree.roots()[0].children[0].id, CategoryId(2));
        assert!(tree.roots()[0].children[0].children.is_empty());
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn test_category_id_is_transparent() {
        let json = serde_json::to_string(&CategoryId(42)).unwrap();
        assert_eq!(json, "42");
        assert_eq!(" 7 ".parse::<CategoryId>().unwrap(), CategoryId(7));
        assert!("seven".parse::<CategoryId>().is_err());
    }
}
