//! Immutable parent/child relation over the modules of a scan.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;

use crate::error::HierarchyError;
use crate::module::{InputModule, ProjectModule};
use crate::path_resolver::relativize;

/// Tree of modules rooted at a single project.
///
/// Built once from a root and a child→parent mapping, then only read. The
/// children view is the precomputed inverse of the parent map, so every
/// lookup is a single hash probe.
///
/// The mapping is trusted to form one tree rooted at `root`; it is not
/// checked unless [`ModuleHierarchy::validate`] is called. Queries stay
/// total either way: unknown modules yield empty or absent results.
#[derive(Debug, Clone)]
pub struct ModuleHierarchy<M: ProjectModule = InputModule> {
    root: M,
    parents: HashMap<M, M>,
    children: HashMap<M, Vec<M>>,
    /// Every non-root module, sorted by key.
    ordered: Vec<M>,
}

impl<M: ProjectModule> ModuleHierarchy<M> {
    /// Hierarchy of a single-module project.
    pub fn new(root: M) -> Self {
        Self {
            root,
            parents: HashMap::new(),
            children: HashMap::new(),
            ordered: Vec::new(),
        }
    }

    /// Build from a child→parent map. The map is copied; later changes to it
    /// do not reach the hierarchy.
    pub fn with_parents(root: M, parents: &HashMap<M, M>) -> Self {
        Self::from_pairs(
            root,
            parents
                .iter()
                .map(|(child, parent)| (child.clone(), parent.clone())),
        )
    }

    /// Build from `(child, parent)` pairs. A child listed twice keeps its
    /// last parent.
    pub fn from_pairs<I>(root: M, pairs: I) -> Self
    where
        I: IntoIterator<Item = (M, M)>,
    {
        let parents: HashMap<M, M> = pairs.into_iter().collect();

        let mut children: HashMap<M, Vec<M>> = HashMap::new();
        for (child, parent) in &parents {
            children
                .entry(parent.clone())
                .or_default()
                .push(child.clone());
        }
        for list in children.values_mut() {
            list.sort_by(|a, b| a.key().cmp(b.key()));
        }

        let mut ordered: Vec<M> = parents.keys().cloned().collect();
        ordered.sort_by(|a, b| a.key().cmp(b.key()));

        log::debug!(
            "Built module hierarchy rooted at '{}' with {} module(s)",
            root.key(),
            ordered.len() + 1
        );

        Self {
            root,
            parents,
            children,
            ordered,
        }
    }

    pub fn root(&self) -> &M {
        &self.root
    }

    /// Immediate children of `module`; empty when it has none or is unknown.
    pub fn children(&self, module: &M) -> &[M] {
        self.children
            .get(module)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Recorded parent of `module`; `None` for the root and unknown modules.
    pub fn parent(&self, module: &M) -> Option<&M> {
        self.parents.get(module)
    }

    pub fn is_root(&self, module: &M) -> bool {
        self.root == *module
    }

    /// Path of `module` relative to its parent's base directory.
    ///
    /// The root yields `""`. `None` means the module has no recorded parent
    /// or its base directory is not nested under the parent's.
    pub fn relative_path(&self, module: &M) -> Option<String> {
        if self.is_root(module) {
            return Some(String::new());
        }
        let parent = self.parent(module)?;
        let path = relativize(parent.base_dir(), module.base_dir());
        if path.is_none() {
            log::debug!(
                "Module '{}' ({}) is not nested under its parent '{}' ({})",
                module.key(),
                module.base_dir().display(),
                parent.key(),
                parent.base_dir().display()
            );
        }
        path
    }

    /// Path of `module` relative to the root's base directory, regardless of
    /// intermediate modules. `None` when it is not nested under the root.
    pub fn relative_path_to_root(&self, module: &M) -> Option<String> {
        relativize(self.root.base_dir(), module.base_dir())
    }

    /// Whether `module` is the root or has a recorded parent.
    pub fn contains(&self, module: &M) -> bool {
        self.is_root(module) || self.parents.contains_key(module)
    }

    /// Number of modules, root included.
    ///
    /// Counts the root plus every module with a recorded parent, so it is
    /// exact only for a hierarchy that passes [`validate`](Self::validate).
    /// A parent that is never itself a child is not counted, and a root
    /// with a recorded parent is counted twice.
    pub fn len(&self) -> usize {
        self.ordered.len() + 1
    }

    /// Always `false`: a hierarchy holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All modules: the root first, then the others by key.
    ///
    /// Yields the root and the modules with a recorded parent. Like
    /// [`len`](Self::len) this covers every module only when the hierarchy
    /// is valid.
    pub fn modules(&self) -> impl Iterator<Item = &M> + '_ {
        std::iter::once(&self.root).chain(self.ordered.iter())
    }

    /// Walk from the parent of `module` up to the root.
    pub fn ancestors<'a>(&'a self, module: &'a M) -> Ancestors<'a, M> {
        Ancestors {
            hierarchy: self,
            current: module,
            remaining: self.parents.len(),
        }
    }

    /// Distance to the root: 0 for the root, `None` for unknown modules.
    pub fn depth(&self, module: &M) -> Option<usize> {
        if !self.contains(module) {
            return None;
        }
        Some(self.ancestors(module).count())
    }

    /// Check that the parent map forms a single tree rooted at the root.
    ///
    /// Reports the first problem found, looking at modules in key order.
    pub fn validate(&self) -> Result<(), HierarchyError> {
        if self.parents.contains_key(&self.root) {
            return Err(HierarchyError::RootHasParent {
                key: self.root.key().to_string(),
            });
        }

        // Edges point parent -> child.
        let mut graph: DiGraph<&M, ()> = DiGraph::new();
        let mut nodes: HashMap<&M, NodeIndex> = HashMap::new();
        let root_idx = graph.add_node(&self.root);
        nodes.insert(&self.root, root_idx);

        let mut keyed: Vec<(&M, &M)> = self.parents.iter().collect();
        keyed.sort_by(|a, b| a.0.key().cmp(b.0.key()));
        for (child, parent) in keyed {
            let c = *nodes.entry(child).or_insert_with(|| graph.add_node(child));
            let p = *nodes.entry(parent).or_insert_with(|| graph.add_node(parent));
            graph.add_edge(p, c, ());
        }

        if let Err(cycle) = toposort(&graph, None) {
            return Err(HierarchyError::Cycle {
                key: graph[cycle.node_id()].key().to_string(),
            });
        }

        let mut reached = vec![false; graph.node_count()];
        let mut dfs = Dfs::new(&graph, root_idx);
        while let Some(idx) = dfs.next(&graph) {
            reached[idx.index()] = true;
        }

        let mut detached: Vec<&M> = graph
            .node_indices()
            .filter(|idx| !reached[idx.index()])
            .map(|idx| graph[idx])
            .collect();
        detached.sort_by(|a, b| a.key().cmp(b.key()));
        match detached.first() {
            Some(module) => Err(HierarchyError::Detached {
                key: module.key().to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Iterator over the ancestors of a module, nearest first.
///
/// Bounded by the number of recorded parents, so a malformed map with a
/// cycle terminates instead of looping.
pub struct Ancestors<'a, M: ProjectModule> {
    hierarchy: &'a ModuleHierarchy<M>,
    current: &'a M,
    remaining: usize,
}

impl<'a, M: ProjectModule> Iterator for Ancestors<'a, M> {
    type Item = &'a M;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let parent = self.hierarchy.parents.get(self.current)?;
        self.remaining -= 1;
        self.current = parent;
        Some(parent)
    }
}
