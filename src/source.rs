//! Labeled sample providers.
//!
//! The split builder only needs two things from a source: its ordered label
//! vocabulary, and a lazy one-pass sequence of samples per split. Dropping the
//! sequence must stop any further work on the source side.

use jwalk::WalkDir;
use log::debug;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{Sample, SampleImage, IMG_FORMATS};
use crate::utils::{extension_set, has_image_extension};

pub type SampleIter<'a> = Box<dyn Iterator<Item = Result<Sample>> + 'a>;

pub trait SampleSource {
    /// Ordered label names; a label's position is its id.
    fn taxonomy(&self) -> Result<Vec<String>>;

    /// Samples of `split` in source order.
    fn samples<'a>(&'a self, split: &str) -> Result<SampleIter<'a>>;
}

/// Directory-backed source laid out as `<root>/<split>/<class>/<image>`.
///
/// The taxonomy comes from `<root>/classes.txt` (one label per line) when that
/// file exists, otherwise from the sorted class directory names of all splits.
pub struct ImageFolderSource {
    root: PathBuf,
    taxonomy: Vec<String>,
    label_ids: HashMap<String, usize>,
    extensions: HashSet<String>,
}

impl ImageFolderSource {
    pub const CLASSES_FILE: &'static str = "classes.txt";

    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::NotADirectory(root.to_path_buf()));
        }

        let classes_file = root.join(Self::CLASSES_FILE);
        let taxonomy = if classes_file.is_file() {
            read_classes_file(&classes_file)?
        } else {
            discover_class_dirs(root)?
        };
        debug!(
            "Source {} has {} labels",
            root.display(),
            taxonomy.len()
        );

        let label_ids = taxonomy
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();

        Ok(Self {
            root: root.to_path_buf(),
            taxonomy,
            label_ids,
            extensions: extension_set(IMG_FORMATS),
        })
    }
}

impl SampleSource for ImageFolderSource {
    fn taxonomy(&self) -> Result<Vec<String>> {
        Ok(self.taxonomy.clone())
    }

    fn samples<'a>(&'a self, split: &str) -> Result<SampleIter<'a>> {
        let split_dir = self.root.join(split);
        if !split_dir.is_dir() {
            return Err(Error::MissingSplit(split.to_string()));
        }

        let entries = WalkDir::new(&split_dir)
            .sort(true)
            .skip_hidden(true)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(move |entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => return Some(Err(Error::from(e))),
                };
                if !entry.file_type().is_file() {
                    return None;
                }
                let path = entry.path();
                if !has_image_extension(&path, &self.extensions) {
                    return None;
                }
                let class_name = path
                    .parent()
                    .and_then(|dir| dir.file_name())
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Some(match self.label_ids.get(&class_name) {
                    Some(&label) => Ok(Sample {
                        label,
                        image: SampleImage::File(path),
                    }),
                    None => Err(Error::UnknownLabel(class_name)),
                })
            });

        Ok(Box::new(entries))
    }
}

fn read_classes_file(path: &Path) -> Result<Vec<String>> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

// Union of class directory names across every split directory, sorted
fn discover_class_dirs(root: &Path) -> Result<Vec<String>> {
    let mut names = BTreeSet::new();
    for entry in WalkDir::new(root)
        .skip_hidden(true)
        .min_depth(2)
        .max_depth(2)
    {
        let entry = entry?;
        if entry.file_type().is_dir() {
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names.into_iter().collect())
}
