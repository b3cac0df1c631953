//! Hierarchy store behaviour over arbitrary module types.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use canopy_core::{InputModule, ModuleHierarchy, ProjectModule};
use pretty_assertions::assert_eq;

/// A module type unrelated to `InputModule`, to exercise the trait seam.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Dir {
    id: String,
    path: PathBuf,
}

fn dir(id: &str, path: &str) -> Dir {
    Dir {
        id: id.to_string(),
        path: PathBuf::from(path),
    }
}

impl ProjectModule for Dir {
    fn key(&self) -> &str {
        &self.id
    }

    fn base_dir(&self) -> &Path {
        &self.path
    }
}

/// R(/proj) -> A(/proj/a) -> B(/proj/a/b), R -> C(/proj/c), A -> X(/other/x)
fn sample() -> (ModuleHierarchy<Dir>, HashMap<Dir, Dir>) {
    let r = dir("R", "/proj");
    let a = dir("A", "/proj/a");
    let b = dir("B", "/proj/a/b");
    let c = dir("C", "/proj/c");
    let x = dir("X", "/other/x");
    let mut parents = HashMap::new();
    parents.insert(a.clone(), r.clone());
    parents.insert(b, a.clone());
    parents.insert(c, r.clone());
    parents.insert(x, a);
    (ModuleHierarchy::with_parents(r, &parents), parents)
}

#[test]
fn root_only_hierarchy() {
    let r = dir("R", "/proj");
    let h = ModuleHierarchy::new(r.clone());
    assert!(h.is_root(&r));
    assert!(h.children(&r).is_empty());
    assert_eq!(h.parent(&r), None);
    assert_eq!(h.relative_path(&r).as_deref(), Some(""));
    assert_eq!(h.relative_path_to_root(&r).as_deref(), Some(""));
}

#[test]
fn every_child_is_listed_under_its_parent() {
    let (h, parents) = sample();
    for (child, parent) in &parents {
        assert!(h.children(parent).contains(child), "{} missing", child.id);
        assert_eq!(h.parent(child), Some(parent));
    }
    let total: usize = h.modules().map(|m| h.children(m).len()).sum();
    assert_eq!(total, parents.len());
}

#[test]
fn children_lists_are_sorted_by_key() {
    let (h, _) = sample();
    let under_a: Vec<&str> = h.children(&dir("A", "/proj/a")).iter().map(|d| d.key()).collect();
    assert_eq!(under_a, vec!["B", "X"]);
}

#[test]
fn relative_paths() {
    let (h, _) = sample();
    let a = dir("A", "/proj/a");
    let b = dir("B", "/proj/a/b");
    assert_eq!(h.relative_path(&a).as_deref(), Some("a"));
    assert_eq!(h.relative_path_to_root(&a).as_deref(), Some("a"));
    assert_eq!(h.relative_path(&b).as_deref(), Some("b"));
    assert_eq!(h.relative_path_to_root(&b).as_deref(), Some("a/b"));
}

#[test]
fn non_nested_module_paths_are_absent() {
    let (h, _) = sample();
    let x = dir("X", "/other/x");
    assert_eq!(h.relative_path(&x), None);
    assert_eq!(h.relative_path_to_root(&x), None);
    assert!(h.contains(&x));
}

#[test]
fn unknown_modules_are_total() {
    let (h, _) = sample();
    let ghost = dir("GHOST", "/proj/ghost");
    assert!(h.children(&ghost).is_empty());
    assert_eq!(h.parent(&ghost), None);
    assert!(!h.is_root(&ghost));
    assert_eq!(h.relative_path(&ghost), None);
    // Root-relative paths only look at directories.
    assert_eq!(h.relative_path_to_root(&ghost).as_deref(), Some("ghost"));
}

#[test]
fn caller_mutation_does_not_leak() {
    let (h, mut parents) = sample();
    let b = dir("B", "/proj/a/b");
    let c = dir("C", "/proj/c");
    parents.insert(b.clone(), c.clone());
    parents.clear();

    assert_eq!(h.parent(&b).map(|p| p.key()), Some("A"));
    assert!(h.children(&c).is_empty());
    assert_eq!(h.len(), 5);
}

#[test]
fn empty_mapping_equals_root_only() {
    let r = dir("R", "/proj");
    let a = ModuleHierarchy::new(r.clone());
    let b = ModuleHierarchy::with_parents(r.clone(), &HashMap::new());
    let c = ModuleHierarchy::from_pairs(r.clone(), Vec::<(Dir, Dir)>::new());
    for h in [&a, &b, &c] {
        assert_eq!(h.len(), 1);
        assert!(h.children(&r).is_empty());
        assert_eq!(h.relative_path(&r).as_deref(), Some(""));
    }
    assert!(b.validate().is_ok());
}

#[test]
fn sample_is_a_valid_tree() {
    let (h, _) = sample();
    assert!(h.validate().is_ok());
    assert_eq!(h.depth(&dir("B", "/proj/a/b")), Some(2));
}

#[test]
fn concurrent_readers_agree() {
    let root = InputModule::new("proj", "/proj");
    let pairs: Vec<(InputModule, InputModule)> = (0..32)
        .map(|i| {
            (
                InputModule::new(format!("proj:m{i:02}"), format!("/proj/m{i:02}")),
                root.clone(),
            )
        })
        .collect();
    let h = Arc::new(ModuleHierarchy::from_pairs(root.clone(), pairs));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let h = Arc::clone(&h);
            thread::spawn(move || {
                h.children(h.root())
                    .iter()
                    .map(|m| h.relative_path(m).unwrap_or_default())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let expected: Vec<String> = (0..32).map(|i| format!("m{i:02}")).collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
