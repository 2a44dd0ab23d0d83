//! Chains of tree files with optional row-aligned friends.

use std::path::{Path, PathBuf};

use crate::dataset::Dataset;
use crate::error::Result;
use crate::parquet_io::read_tree_parquet;

/// Builder that concatenates files holding the same tree and joins friends.
///
/// # Example
///
/// ```no_run
/// use tp_tree::Chain;
///
/// let events = Chain::new("h1")
///     .add("pdk/pdk_100k.parquet")
///     .add_friend("treePDK", "pdk/pdk_100k_friend.parquet")
///     .load()
///     .unwrap();
/// println!("{} entries", events.entries());
/// ```
#[derive(Debug, Clone)]
pub struct Chain {
    tree_name: String,
    files: Vec<PathBuf>,
    friends: Vec<(String, PathBuf)>,
}

impl Chain {
    /// Start a chain for `tree_name`.
    pub fn new(tree_name: impl Into<String>) -> Self {
        Self { tree_name: tree_name.into(), files: Vec::new(), friends: Vec::new() }
    }

    /// Add a file to the chain.
    pub fn add(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Attach the tree `tree_name` in `path` as a friend.
    pub fn add_friend(mut self, tree_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.friends.push((tree_name.into(), path.into()));
        self
    }

    /// Read every file and assemble the joined dataset.
    pub fn load(&self) -> Result<Dataset> {
        let mut ds = Dataset::new(&self.tree_name);
        for path in &self.files {
            ds.append(read_tree_parquet(path, &self.tree_name)?)?;
        }
        for (name, path) in &self.friends {
            ds.add_friend(read_tree_parquet(path, name)?)?;
        }
        log::debug!(
            "chain '{}': {} file(s), {} friend(s), {} entries",
            self.tree_name,
            self.files.len(),
            self.friends.len(),
            ds.entries()
        );
        Ok(ds)
    }
}

/// Open `base/primary` as tree `primary_tree`, with `base/friend` attached as
/// `friend_tree` when given.
pub fn open_chained_dataset(
    base: &Path,
    primary: &str,
    friend: Option<&str>,
    primary_tree: &str,
    friend_tree: &str,
) -> Result<Dataset> {
    let mut chain = Chain::new(primary_tree).add(base.join(primary));
    if let Some(f) = friend {
        chain = chain.add_friend(friend_tree, base.join(f));
    }
    chain.load()
}
