use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use taxon_api::{ApiError, ApiResult, CategoryTree, FlatCategory, TreeProvider};
use taxon_core::tree::assemble_flat;

/// Layout of a tree document on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TreeFormat {
    /// `[{"id", "name", "children": [...]}]`
    #[default]
    Nested,
    /// `[{"id", "name", "parent_id"}]`
    Flat,
}

impl FromStr for TreeFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> ApiResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nested" => Ok(Self::Nested),
            "flat" => Ok(Self::Flat),
            other => Err(ApiError::InvalidArgument(format!(
                "unknown tree format '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for TreeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nested => f.write_str("nested"),
            Self::Flat => f.write_str("flat"),
        }
    }
}

/// Reads the category tree from a JSON document on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileTreeProvider {
    path: PathBuf,
    format: TreeFormat,
}

impl JsonFileTreeProvider {
    pub fn new(path: impl Into<PathBuf>, format: TreeFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn parse(&self, bytes: &[u8]) -> ApiResult<CategoryTree> {
        let invalid = |e: &dyn fmt::Display| {
            ApiError::InvalidArgument(format!("{}: {}", self.path.display(), e))
        };

        match self.format {
            TreeFormat::Nested => serde_json::from_slice(bytes).map_err(|e| invalid(&e)),
            TreeFormat::Flat => {
                let records: Vec<FlatCategory> =
                    serde_json::from_slice(bytes).map_err(|e| invalid(&e))?;
                assemble_flat(&records).map_err(|e| invalid(&e))
            }
        }
    }
}

#[async_trait]
impl TreeProvider for JsonFileTreeProvider {
    async fn fetch_tree(&self) -> ApiResult<CategoryTree> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                ApiError::NotFound(format!("tree document {}", self.path.display()))
            }
            _ => ApiError::Unavailable(format!("{}: {}", self.path.display(), e)),
        })?;
        let tree = self.parse(&bytes)?;
        tracing::debug!(
            "Read {} categories from {} ({})",
            tree.node_count(),
            self.path.display(),
            self.format
        );
        Ok(tree)
    }
}

/// Serves a fixed snapshot; for hosts that already hold the tree in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticTreeProvider {
    tree: CategoryTree,
}

impl StaticTreeProvider {
    pub fn new(tree: CategoryTree) -> Self {
        Self { tree }
    }
}

#[async_trait]
impl TreeProvider for StaticTreeProvider {
    async fn fetch_tree(&self) -> ApiResult<CategoryTree> {
        Ok(self.tree.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxon_api::CategoryId;

    #[test]
    fn test_format_parsing() {
        assert_eq!("Flat".parse::<TreeFormat>().unwrap(), TreeFormat::Flat);
        assert_eq!("nested".parse::<TreeFormat>().unwrap(), TreeFormat::Nested);
        assert!("xml".parse::<TreeFormat>().is_err());
    }

    #[tokio::test]
    async fn test_reads_flat_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        std::fs::write(
            &path,
            r#"[{"id": 2, "name": "Phones", "parent_id": 1}, {"id": 1, "name": "Electronics", "parent_id": null}]"#,
        )
        .unwrap();

        let provider = JsonFileTreeProvider::new(&path, TreeFormat::Flat);
        let tree = provider.fetch_tree().await.unwrap();

        assert_eq!(tree.roots().len(), 1);
        assert_eq!(tree.roots()[0].children[0].id, CategoryId(2));
    }

    #[tokio::test]
    async fn test_missing_document_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonFileTreeProvider::new(dir.path().join("nope.json"), TreeFormat::Nested);

        assert!(matches!(
            provider.fetch_tree().await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_flat_listing_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        std::fs::write(&path, r#"[{"id": 2, "name": "Orphan", "parent_id": 7}]"#).unwrap();

        let provider = JsonFileTreeProvider::new(&path, TreeFormat::Flat);
        assert!(matches!(
            provider.fetch_tree().await,
            Err(ApiError::InvalidArgument(_))
        ));
    }
}
