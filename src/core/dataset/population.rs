use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetSplit {
    Train,
    Validation,
}

impl DatasetSplit {
    pub fn as_str(&self) -> &str {
        match self {
            DatasetSplit::Train => "train",
            DatasetSplit::Validation => "validation",
        }
    }
}

impl std::fmt::Display for DatasetSplit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How populations are laid out under each class directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// `<class>/<sub-class>/...`: every sub-class is its own population.
    #[default]
    Nested,
    /// `<class>/...`: the whole class directory is one population.
    Flat,
}

impl Layout {
    pub fn as_str(&self) -> &str {
        match self {
            Layout::Nested => "nested",
            Layout::Flat => "flat",
        }
    }
}

/// An unordered collection of eligible image paths.
///
/// Populations are never mutated in place by the partition code: shuffling,
/// truncating and splitting all consume a population and hand back new ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePopulation {
    files: Vec<PathBuf>,
}

impl FilePopulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.files.iter()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.iter().any(|p| p == path)
    }

    /// Concatenate another population onto this one (used when pooling).
    pub fn extend(&mut self, other: FilePopulation) {
        self.files.extend(other.files);
    }

    pub fn into_vec(self) -> Vec<PathBuf> {
        self.files
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.files
    }
}

impl From<Vec<PathBuf>> for FilePopulation {
    fn from(files: Vec<PathBuf>) -> Self {
        Self { files }
    }
}

impl FromIterator<PathBuf> for FilePopulation {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FilePopulation {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl<'a> IntoIterator for &'a FilePopulation {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
