use super::category::CategoryId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The pair a host stores on the product record.
///
/// `categories` is the effective selection (explicit picks plus implied
/// ancestors) and is order-insensitive.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct PersistedSelection {
    #[serde(default)]
    pub categories: Vec<CategoryId>,
    #[serde(default)]
    pub primary_category_id: Option<CategoryId>,
}

/// Check state for a tree widget: fully checked ids and indeterminate ancestors.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct CheckState {
    pub checked: Vec<CategoryId>,
    pub half_checked: Vec<CategoryId>,
}

/// An explicitly selected category as shown in the selection summary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct SelectedCategory {
    pub id: CategoryId,
    /// `None` when the id is not present in the current tree snapshot.
    pub name: Option<String>,
    pub primary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_selection_field_names() {
        let selection = PersistedSelection {
            categories: vec![CategoryId(1), CategoryId(2)],
            primary_category_id: Some(CategoryId(2)),
        };
        let value = serde_json::to_value(&selection).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"categories": [1, 2], "primary_category_id": 2})
        );
    }

    #[test]
    fn test_persisted_selection_defaults_missing_fields() {
        let selection: PersistedSelection = serde_json::from_str("{}").unwrap();
        assert!(selection.categories.is_empty());
        assert_eq!(selection.primary_category_id, None);
    }
}
