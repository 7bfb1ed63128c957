//! In-memory category hierarchy used for path derivation and cycle checks.
//!
//! The database stores each category's `full_path` as a denormalized string.
//! [`CategoryForest`] recomputes those strings from the parent pointers so the
//! service layer can detect and rewrite stale values after a rename or move.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::Category;

/// Separator between ancestor names in a display path.
pub const PATH_SEPARATOR: &str = " > ";

/// Storage path used for items without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// The subset of a category needed to walk the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    /// Category ID.
    pub id: Uuid,
    /// Category name.
    pub name: String,
    /// Parent category ID.
    pub parent_id: Option<Uuid>,
    /// Stored full path, possibly stale.
    pub full_path: Option<String>,
}

impl From<&Category> for CategoryNode {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            parent_id: category.parent_id,
            full_path: category.full_path.clone(),
        }
    }
}

/// A snapshot of every category keyed by ID.
#[derive(Debug, Clone, Default)]
pub struct CategoryForest {
    nodes: HashMap<Uuid, CategoryNode>,
}

impl CategoryForest {
    /// Build a forest from category nodes.
    pub fn new(nodes: impl IntoIterator<Item = CategoryNode>) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.id, n)).collect(),
        }
    }

    /// Build a forest from full category rows.
    pub fn from_categories<'a>(categories: impl IntoIterator<Item = &'a Category>) -> Self {
        Self::new(categories.into_iter().map(CategoryNode::from))
    }

    /// Look up a node.
    pub fn get(&self, id: Uuid) -> Option<&CategoryNode> {
        self.nodes.get(&id)
    }

    /// Number of categories in the snapshot.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct children of `id`, sorted by name for deterministic output.
    pub fn children(&self, id: Uuid) -> Vec<&CategoryNode> {
        let mut children: Vec<_> = self
            .nodes
            .values()
            .filter(|n| n.parent_id == Some(id))
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        children
    }

    /// Names from the root down to `id`, visiting at most `max_depth`
    /// categories starting at `id`. Unknown IDs end the walk.
    pub fn ancestor_names(&self, id: Uuid, max_depth: usize) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            if names.len() >= max_depth {
                break;
            }
            let Some(node) = self.nodes.get(&cur) else {
                break;
            };
            names.push(node.name.as_str());
            current = node.parent_id;
        }
        names.reverse();
        names
    }

    /// Display path such as `"Clothing > T-Shirts > Oversize"`.
    ///
    /// Returns an empty string for unknown IDs.
    pub fn display_path(&self, id: Uuid, max_depth: usize) -> String {
        self.ancestor_names(id, max_depth).join(PATH_SEPARATOR)
    }

    /// Path of a category placed under `parent_id` with `name`, walking at
    /// most `max_depth` ancestors of the parent.
    pub fn path_for_child(&self, parent_id: Option<Uuid>, name: &str, max_depth: usize) -> String {
        let parent_path = parent_id
            .map(|pid| self.display_path(pid, max_depth))
            .unwrap_or_default();
        join_path(&parent_path, name)
    }

    /// Filesystem-safe directory path such as `"Clothing/T-Shirts"`.
    ///
    /// Falls back to [`UNCATEGORIZED`] when the category is missing.
    pub fn storage_path(&self, id: Option<Uuid>, max_depth: usize) -> String {
        let segments: Vec<String> = id
            .map(|id| {
                self.ancestor_names(id, max_depth)
                    .into_iter()
                    .map(sanitize_segment)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if segments.is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            segments.join("/")
        }
    }

    /// Whether `node` equals `possible_ancestor` or has it among its first
    /// `walk_limit` ancestors.
    pub fn is_descendant(&self, node: Uuid, possible_ancestor: Uuid, walk_limit: usize) -> bool {
        if node == possible_ancestor {
            return true;
        }
        let mut current = Some(node);
        let mut steps = 0;
        while let Some(cur) = current {
            if steps >= walk_limit {
                break;
            }
            if cur == possible_ancestor {
                return true;
            }
            current = self.nodes.get(&cur).and_then(|n| n.parent_id);
            steps += 1;
        }
        false
    }

    /// New `full_path` values for every descendant of `root` whose stored
    /// path differs from `root`'s path joined with the descendant names.
    ///
    /// `root`'s own stored path is trusted, so callers update it first.
    /// The walk visits each node once even if the data contains a cycle.
    pub fn descendant_path_rewrites(&self, root: Uuid) -> Vec<(Uuid, String)> {
        let Some(root_node) = self.nodes.get(&root) else {
            return Vec::new();
        };
        let root_path = root_node
            .full_path
            .clone()
            .unwrap_or_else(|| root_node.name.clone());

        let mut rewrites = Vec::new();
        let mut visited = std::collections::HashSet::from([root]);
        let mut stack = vec![(root, root_path)];

        while let Some((parent, parent_path)) = stack.pop() {
            for child in self.children(parent) {
                if !visited.insert(child.id) {
                    continue;
                }
                let expected = join_path(&parent_path, &child.name);
                if child.full_path.as_deref() != Some(expected.as_str()) {
                    rewrites.push((child.id, expected.clone()));
                }
                stack.push((child.id, expected));
            }
        }
        rewrites
    }
}

fn join_path(parent_path: &str, name: &str) -> String {
    if parent_path.is_empty() {
        name.to_string()
    } else {
        format!("{parent_path}{PATH_SEPARATOR}{name}")
    }
}

/// Replace characters that are unsafe in directory names.
pub fn sanitize_segment(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    cleaned.trim().trim_matches('.').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u128, name: &str, parent: Option<u128>, path: Option<&str>) -> CategoryNode {
        CategoryNode {
            id: Uuid::from_u128(id),
            name: name.to_string(),
            parent_id: parent.map(Uuid::from_u128),
            full_path: path.map(str::to_string),
        }
    }

    fn clothing_forest() -> CategoryForest {
        CategoryForest::new([
            node(1, "Clothing", None, Some("Clothing")),
            node(2, "T-Shirts", Some(1), Some("Clothing > T-Shirts")),
            node(3, "Oversize", Some(2), Some("Clothing > T-Shirts > Oversize")),
            node(4, "Hoodies", Some(1), Some("Clothing > Hoodies")),
            node(5, "Packaging", None, Some("Packaging")),
        ])
    }

    #[test]
    fn test_display_path_walks_ancestors() {
        let forest = clothing_forest();
        assert_eq!(
            forest.display_path(Uuid::from_u128(3), 5),
            "Clothing > T-Shirts > Oversize"
        );
        assert_eq!(forest.display_path(Uuid::from_u128(99), 5), "");
    }

    #[test]
    fn test_display_path_depth_cap() {
        let forest = CategoryForest::new((1..=7u128).map(|i| {
            node(i, &format!("L{i}"), if i == 1 { None } else { Some(i - 1) }, None)
        }));
        assert_eq!(
            forest.display_path(Uuid::from_u128(7), 5),
            "L3 > L4 > L5 > L6 > L7"
        );
    }

    #[test]
    fn test_path_for_child() {
        let forest = clothing_forest();
        assert_eq!(
            forest.path_for_child(Some(Uuid::from_u128(2)), "Cropped", 5),
            "Clothing > T-Shirts > Cropped"
        );
        assert_eq!(forest.path_for_child(None, "Stationery", 5), "Stationery");
    }

    #[test]
    fn test_storage_path_sanitizes_and_defaults() {
        let forest = CategoryForest::new([
            node(1, "Bags/Totes", None, None),
            node(2, "Large: 40\"", Some(1), None),
        ]);
        assert_eq!(
            forest.storage_path(Some(Uuid::from_u128(2)), 5),
            "Bags_Totes/Large_ 40_"
        );
        assert_eq!(forest.storage_path(None, 5), UNCATEGORIZED);
        assert_eq!(forest.storage_path(Some(Uuid::from_u128(42)), 5), UNCATEGORIZED);
    }

    #[test]
    fn test_is_descendant() {
        let forest = clothing_forest();
        let root = Uuid::from_u128(1);
        let leaf = Uuid::from_u128(3);
        assert!(forest.is_descendant(leaf, root, 20));
        assert!(forest.is_descendant(root, root, 20));
        assert!(!forest.is_descendant(root, leaf, 20));
        assert!(!forest.is_descendant(Uuid::from_u128(5), root, 20));
    }

    #[test]
    fn test_is_descendant_stops_on_cycle() {
        let forest = CategoryForest::new([node(1, "A", Some(2), None), node(2, "B", Some(1), None)]);
        assert!(!forest.is_descendant(Uuid::from_u128(1), Uuid::from_u128(3), 20));
    }

    #[test]
    fn test_rename_rewrites_all_descendants() {
        let mut nodes = vec![
            node(1, "Apparel", None, Some("Apparel")),
            node(2, "T-Shirts", Some(1), Some("Clothing > T-Shirts")),
            node(3, "Oversize", Some(2), Some("Clothing > T-Shirts > Oversize")),
            node(4, "Hoodies", Some(1), Some("Clothing > Hoodies")),
        ];
        let forest = CategoryForest::new(nodes.clone());
        let rewrites = forest.descendant_path_rewrites(Uuid::from_u128(1));
        assert_eq!(rewrites.len(), 3);

        for (id, path) in &rewrites {
            if let Some(n) = nodes.iter_mut().find(|n| n.id == *id) {
                n.full_path = Some(path.clone());
            }
        }
        let updated = CategoryForest::new(nodes);
        for n in [2u128, 3, 4] {
            let id = Uuid::from_u128(n);
            assert_eq!(
                updated.get(id).and_then(|n| n.full_path.clone()).unwrap(),
                updated.display_path(id, 5)
            );
        }
        assert!(updated.descendant_path_rewrites(Uuid::from_u128(1)).is_empty());
    }

    #[test]
    fn test_move_rewrites_only_stale_paths() {
        let forest = CategoryForest::new([
            node(1, "Clothing", None, Some("Clothing")),
            node(5, "Packaging", None, Some("Packaging")),
            node(2, "T-Shirts", Some(5), Some("Packaging > T-Shirts")),
            node(3, "Oversize", Some(2), Some("Clothing > T-Shirts > Oversize")),
        ]);
        let rewrites = forest.descendant_path_rewrites(Uuid::from_u128(2));
        assert_eq!(
            rewrites,
            vec![(
                Uuid::from_u128(3),
                "Packaging > T-Shirts > Oversize".to_string()
            )]
        );
    }
}
