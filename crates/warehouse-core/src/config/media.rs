//! Item image storage.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where uploaded item images live and how they are addressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Directory served under `url_prefix`.
    pub root: String,
    /// Public URL prefix stored in item image fields.
    pub url_prefix: String,
    /// `Cache-Control` max-age for served images, in seconds.
    pub max_age_seconds: u64,
    /// Largest accepted image upload, in bytes.
    pub max_image_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: "./data/uploads".to_string(),
            url_prefix: "/api/storage/local".to_string(),
            max_age_seconds: 24 * 60 * 60,
            max_image_bytes: 10 * 1024 * 1024,
        }
    }
}

impl MediaConfig {
    /// File under the media root for a relative path, or `None` if the
    /// path would escape the root.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        sanitize_relative_path(relative).map(|clean| Path::new(&self.root).join(clean))
    }

    /// Public URL of a file stored at `relative`.
    pub fn url_for(&self, relative: &Path) -> String {
        let relative = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{relative}", self.url_prefix.trim_end_matches('/'))
    }

    /// Local file behind a stored image URL. `None` for URLs outside
    /// `url_prefix`, such as images hosted elsewhere.
    pub fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let prefix = self.url_prefix.trim_end_matches('/');
        let relative = url.strip_prefix(prefix)?.strip_prefix('/')?;
        self.resolve(relative)
    }
}

/// Relative path made only of normal components, or `None` if `raw`
/// escapes the media root.
pub fn sanitize_relative_path(raw: &str) -> Option<PathBuf> {
    if raw.contains('\\') || raw.contains('\0') {
        return None;
    }

    let mut clean = PathBuf::new();
    for component in Path::new(raw).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    (!clean.as_os_str().is_empty()).then_some(clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_rejects_traversal() {
        assert_eq!(
            sanitize_relative_path("warehouse/clothing/tshirt.webp"),
            Some(PathBuf::from("warehouse/clothing/tshirt.webp"))
        );
        assert_eq!(
            sanitize_relative_path("./warehouse/a.png"),
            Some(PathBuf::from("warehouse/a.png"))
        );
        assert_eq!(sanitize_relative_path("../etc/passwd"), None);
        assert_eq!(sanitize_relative_path("warehouse/../../secret"), None);
        assert_eq!(sanitize_relative_path("/etc/passwd"), None);
        assert_eq!(sanitize_relative_path("..\\windows"), None);
        assert_eq!(sanitize_relative_path(""), None);
    }

    #[test]
    fn test_url_round_trips_to_local_path() {
        let media = MediaConfig {
            root: "/srv/uploads".into(),
            url_prefix: "/api/storage/local/".into(),
            ..MediaConfig::default()
        };
        let url = media.url_for(Path::new("SKU/Одежда/Футболка/item-1.jpg"));
        assert_eq!(url, "/api/storage/local/SKU/Одежда/Футболка/item-1.jpg");
        assert_eq!(
            media.path_for_url(&url),
            Some(PathBuf::from("/srv/uploads/SKU/Одежда/Футболка/item-1.jpg"))
        );

        assert_eq!(media.path_for_url("https://cdn.example.com/a.jpg"), None);
        assert_eq!(media.path_for_url("/api/storage/local/../secret"), None);
        assert_eq!(media.path_for_url("/api/storage/localx/a.jpg"), None);
    }
}
