//! In-memory columnar event tree.

use std::collections::HashMap;

use crate::error::{Result, TreeError};

/// A named set of row-aligned `f64` columns.
///
/// Columns keep insertion order. Friend columns are registered under
/// `friend.column` and, unless the primary tree already owns the bare name,
/// under `column` as well.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    name: String,
    entries: u64,
    names: Vec<String>,
    data: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
    friends: Vec<String>,
}

impl Dataset {
    /// Create an empty tree with zero entries.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// Build a tree from `(column, values)` pairs.
    pub fn from_columns<S: Into<String>>(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = (S, Vec<f64>)>,
    ) -> Result<Self> {
        let mut ds = Self::new(name);
        for (col, values) in columns {
            ds.push_column(col, values)?;
        }
        Ok(ds)
    }

    /// Tree name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Names of the primary tree's own columns, in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Names of attached friend trees.
    pub fn friends(&self) -> &[String] {
        &self.friends
    }

    /// Look up a column by bare or `friend.column` name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.index.get(name).map(|&i| self.data[i].as_slice())
    }

    /// Whether `name` resolves to a column.
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Append a column. The first column fixes the row count.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(TreeError::SchemaMismatch(format!(
                "duplicate column '{name}' in tree '{}'",
                self.name
            )));
        }
        if self.data.is_empty() {
            self.entries = values.len() as u64;
        } else if values.len() as u64 != self.entries {
            return Err(TreeError::SchemaMismatch(format!(
                "column '{name}' has {} rows, tree '{}' has {}",
                values.len(),
                self.name,
                self.entries
            )));
        }
        self.index.insert(name.clone(), self.data.len());
        self.names.push(name);
        self.data.push(values);
        Ok(())
    }

    /// Append the rows of `other`, which must have the same columns.
    pub fn append(&mut self, other: Dataset) -> Result<()> {
        if self.data.is_empty() && self.entries == 0 {
            let name = std::mem::take(&mut self.name);
            *self = other;
            self.name = name;
            return Ok(());
        }
        if !self.friends.is_empty() {
            return Err(TreeError::SchemaMismatch(format!(
                "cannot chain '{}' onto '{}' after friends were attached",
                other.name, self.name
            )));
        }
        if self.names != other.names {
            return Err(TreeError::SchemaMismatch(format!(
                "cannot chain '{}': columns {:?} differ from {:?}",
                other.name, other.names, self.names
            )));
        }
        for (dst, src) in self.data.iter_mut().zip(other.data) {
            dst.extend(src);
        }
        self.entries += other.entries;
        Ok(())
    }

    /// Attach `friend`'s columns, joined by row number.
    pub fn add_friend(&mut self, friend: Dataset) -> Result<()> {
        if friend.entries != self.entries {
            return Err(TreeError::FriendMismatch {
                friend: friend.name,
                entries: self.entries,
                friend_entries: friend.entries,
            });
        }
        let Dataset { name: fname, names, data, .. } = friend;
        for (col, values) in names.into_iter().zip(data) {
            let slot = self.data.len();
            self.data.push(values);
            self.index.insert(format!("{fname}.{col}"), slot);
            self.index.entry(col).or_insert(slot);
        }
        self.friends.push(fname);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(name: &str, x: Vec<f64>) -> Dataset {
        Dataset::from_columns(name, [("x", x)]).unwrap()
    }

    #[test]
    fn columns_must_align() {
        let mut ds = tree("t", vec![1.0, 2.0]);
        assert!(ds.push_column("y", vec![1.0]).is_err());
        assert!(ds.push_column("x", vec![1.0, 2.0]).is_err());
        ds.push_column("y", vec![3.0, 4.0]).unwrap();
        assert_eq!(ds.column_names().collect::<Vec<_>>(), ["x", "y"]);
    }

    #[test]
    fn append_concatenates_rows() {
        let mut ds = Dataset::new("h1");
        ds.append(tree("a", vec![1.0, 2.0])).unwrap();
        ds.append(tree("b", vec![3.0])).unwrap();
        assert_eq!(ds.name(), "h1");
        assert_eq!(ds.entries(), 3);
        assert_eq!(ds.column("x").unwrap(), &[1.0, 2.0, 3.0]);

        let other = Dataset::from_columns("c", [("z", vec![0.0])]).unwrap();
        assert!(matches!(ds.append(other), Err(TreeError::SchemaMismatch(_))));
    }

    #[test]
    fn friend_columns_resolve_by_both_names() {
        let mut ds = Dataset::from_columns("h1", [("x", vec![1.0, 2.0])]).unwrap();
        let friend =
            Dataset::from_columns("treePDK", [("x", vec![9.0, 9.0]), ("y", vec![5.0, 6.0])])
                .unwrap();
        ds.add_friend(friend).unwrap();

        assert_eq!(ds.column("x").unwrap(), &[1.0, 2.0]);
        assert_eq!(ds.column("treePDK.x").unwrap(), &[9.0, 9.0]);
        assert_eq!(ds.column("y").unwrap(), &[5.0, 6.0]);
        assert_eq!(ds.friends(), ["treePDK"]);
    }

    #[test]
    fn friend_length_mismatch() {
        let mut ds = tree("h1", vec![1.0, 2.0]);
        let err = ds.add_friend(tree("f", vec![1.0])).unwrap_err();
        assert!(matches!(err, TreeError::FriendMismatch { entries: 2, friend_entries: 1, .. }));
    }
}
