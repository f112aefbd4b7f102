use std::collections::HashSet;

/// An insert-or-check set of identifiers with a lazily sorted view
///
/// Membership is the only thing that matters for dedup. The alphabetical
/// view exists for reporting; it is built on first request and cached
/// until the next successful [`register`](Self::register).
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    items: HashSet<String>,
    sorted: Option<Vec<String>>,
}

impl VisitedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `id` if absent
    ///
    /// Returns true iff the id was newly added.
    pub fn register(&mut self, id: &str) -> bool {
        if self.items.contains(id) {
            return false;
        }
        self.items.insert(id.to_string());
        self.sorted = None;
        true
    }

    /// Returns true if `id` has been registered
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All registered ids in lexicographic order
    pub fn sorted_view(&mut self) -> &[String] {
        let items = &self.items;
        self.sorted.get_or_insert_with(|| {
            let mut view: Vec<String> = items.iter().cloned().collect();
            view.sort();
            view
        })
    }

    #[cfg(test)]
    fn is_view_cached(&self) -> bool {
        self.sorted.is_some()
    }
}

/// The two dedup namespaces used during a run
///
/// URLs and filenames live in separate sets so a filename that happens to
/// look like a URL never blocks a fetch, and vice versa.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    /// Pages explored and files probed
    pub urls: VisitedSet,

    /// Filenames written to disk
    pub filenames: VisitedSet,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }
}
