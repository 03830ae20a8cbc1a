//! Ordered, duplicate-free list of script includes.

use std::collections::HashSet;

/// The scripts a bundle loads, in load order.
///
/// The first insertion of a path fixes its position; later insertions of the
/// same path are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeSet {
    paths: Vec<String>,
    seen: HashSet<String>,
}

impl IncludeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.paths.push(path);
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.seen.contains(path)
    }

    pub fn position(&self, path: &str) -> Option<usize> {
        self.paths.iter().position(|p| p == path)
    }

    /// Remove every path containing any of `markers` as a substring.
    ///
    /// Survivors keep their relative order. Returns the removed paths.
    pub fn filter_out(&mut self, markers: &[&str]) -> Vec<String> {
        let (removed, kept): (Vec<String>, Vec<String>) = std::mem::take(&mut self.paths)
            .into_iter()
            .partition(|path| markers.iter().any(|m| path.contains(m)));
        for path in &removed {
            self.seen.remove(path);
        }
        self.paths = kept;
        removed
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.paths.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.paths
    }

    pub fn into_vec(self) -> Vec<String> {
        self.paths
    }
}

impl<S: Into<String>> Extend<S> for IncludeSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for path in iter {
            self.insert(path);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for IncludeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a IncludeSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_insert_keeps_first_position() {
        let mut set = IncludeSet::new();
        assert!(set.insert("a.js"));
        assert!(set.insert("b.js"));
        for _ in 0..5 {
            assert!(!set.insert("a.js"));
        }
        assert_eq!(set.len(), 2);
        assert_eq!(set.position("a.js"), Some(0));
        assert_eq!(set.as_slice(), ["a.js", "b.js"]);
    }

    #[test]
    fn filter_out_removes_all_and_only_matches() {
        let mut set: IncludeSet = [
            "core.js",
            "pixi-renderers/layer-pixi-renderer.js",
            "events.js",
            "pixi-renderers/pixi-filters-tools.js",
            "sound.js",
        ]
        .into_iter()
        .collect();

        let removed = set.filter_out(&["pixi-renderer", "pixi-filter"]);
        assert_eq!(removed.len(), 2);
        assert_eq!(set.as_slice(), ["core.js", "events.js", "sound.js"]);
    }

    #[test]
    fn filtered_path_can_be_inserted_again() {
        let mut set: IncludeSet = ["x-cocos-renderer.js"].into_iter().collect();
        set.filter_out(&["cocos-renderer"]);
        assert!(set.is_empty());
        assert!(set.insert("x-cocos-renderer.js"));
    }

    #[test]
    fn filter_out_without_markers_is_noop() {
        let mut set: IncludeSet = ["a.js", "b.js"].into_iter().collect();
        assert!(set.filter_out(&[]).is_empty());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn extend_preserves_first_seen_order() {
        let mut set = IncludeSet::new();
        set.extend(["b.js", "a.js", "b.js", "c.js", "a.js"]);
        assert_eq!(set.as_slice(), ["b.js", "a.js", "c.js"]);
    }
}
