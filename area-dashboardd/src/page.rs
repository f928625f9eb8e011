//! In-memory page made of named mount points.
//!
//! Each mount point is a `watch` channel holding its current contents, so
//! the HTTP layer can read the latest render at any time.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use shared::protocol::{GRID_ID, REFRESH_LABEL_ID};

/// A writable region of the page.
#[derive(Clone)]
pub struct MountPoint {
    tx: Arc<watch::Sender<String>>,
}

impl MountPoint {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(String::new());
        Self { tx: Arc::new(tx) }
    }

    /// Replace the whole contents.
    pub fn replace(&self, contents: String) {
        self.tx.send_replace(contents);
    }

    pub fn contents(&self) -> String {
        self.tx.borrow().clone()
    }
}

/// The set of mount points the dashboard may write into.
#[derive(Clone, Default)]
pub struct Page {
    mounts: Arc<HashMap<String, MountPoint>>,
}

impl Page {
    pub fn with_mounts<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mounts = ids
            .into_iter()
            .map(|id| (id.to_string(), MountPoint::new()))
            .collect();
        Self {
            mounts: Arc::new(mounts),
        }
    }

    /// The dashboard page: card grid plus freshness label.
    pub fn standard() -> Self {
        Self::with_mounts([GRID_ID, REFRESH_LABEL_ID])
    }

    pub fn element(&self, id: &str) -> Option<&MountPoint> {
        self.mounts.get(id)
    }

    /// Current contents of a mount point, or empty if it doesn't exist.
    pub fn contents(&self, id: &str) -> String {
        self.element(id).map(MountPoint::contents).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_page_mounts() {
        let page = Page::standard();

        assert!(page.element(GRID_ID).is_some());
        assert!(page.element(REFRESH_LABEL_ID).is_some());
        assert!(page.element("nope").is_none());
        assert_eq!(page.contents("nope"), "");
    }

    #[test]
    fn test_clones_share_mounts() {
        let page = Page::standard();
        let other = page.clone();

        page.element(GRID_ID).unwrap().replace("<div>card</div>".to_string());
        assert_eq!(other.contents(GRID_ID), "<div>card</div>");
    }

    #[test]
    fn test_replace_overwrites() {
        let page = Page::with_mounts([GRID_ID]);
        let grid = page.element(GRID_ID).unwrap();

        grid.replace("<div>a</div><div>b</div>".to_string());
        grid.replace(String::new());
        assert_eq!(page.contents(GRID_ID), "");
    }
}
