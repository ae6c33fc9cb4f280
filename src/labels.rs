use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::types::ClassSelection;
use crate::utils::class_dir_name;

/// Resolved label space: every taxonomy id with its name, plus the selected
/// subset in selection order.
#[derive(Debug, Clone)]
pub struct LabelIndex {
    id_to_name: Vec<String>,
    target_names: Vec<String>,
    target_ids: HashSet<usize>,
}

impl LabelIndex {
    pub fn name(&self, id: usize) -> Option<&str> {
        self.id_to_name.get(id).map(String::as_str)
    }

    /// Selected class names, in selection order. Duplicate ids keep both entries.
    pub fn target_names(&self) -> &[String] {
        &self.target_names
    }

    pub fn target_ids(&self) -> &HashSet<usize> {
        &self.target_ids
    }

    pub fn is_target(&self, id: usize) -> bool {
        self.target_ids.contains(&id)
    }

    pub fn taxonomy_len(&self) -> usize {
        self.id_to_name.len()
    }
}

/// Build the label index for `selection` against the source taxonomy.
/// Target names are the taxonomy's names for the selected ids.
///
/// Every target name must map to its own non-empty class directory; two names
/// that sanitize to the same directory would merge their samples.
pub fn map_labels(taxonomy: &[String], selection: &ClassSelection) -> Result<LabelIndex> {
    let mut target_names = Vec::with_capacity(selection.len());
    let mut target_ids = HashSet::with_capacity(selection.len());
    let mut class_dirs: HashMap<String, &str> = HashMap::with_capacity(selection.len());

    for entry in selection.entries() {
        let name = taxonomy.get(entry.id).ok_or_else(|| Error::UnknownClassId {
            name: entry.name.clone(),
            id: entry.id,
            taxonomy_len: taxonomy.len(),
        })?;

        let dir = class_dir_name(name);
        if dir.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "class '{}' (id {}) has no usable directory name",
                name, entry.id
            )));
        }
        match class_dirs.get(&dir) {
            Some(&other) if other != name.as_str() => {
                return Err(Error::InvalidArgument(format!(
                    "classes '{}' and '{}' both map to directory '{}'",
                    other, name, dir
                )));
            }
            Some(_) => {}
            None => {
                class_dirs.insert(dir, name.as_str());
            }
        }

        target_names.push(name.clone());
        target_ids.insert(entry.id);
    }

    Ok(LabelIndex {
        id_to_name: taxonomy.to_vec(),
        target_names,
        target_ids,
    })
}
