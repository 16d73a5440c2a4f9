use std::collections::BTreeMap;

use super::model::{Dataset, DatasetSummary};

/// Read-only lookup from dataset identifier (file name) to [`Dataset`].
///
/// Built once by [`super::loader::load_folder`] before the server starts and
/// never mutated afterwards, so handlers read it without locking.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    datasets: BTreeMap<String, Dataset>,
}

impl Registry {
    /// Assemble a registry, refusing two datasets with the same name.
    pub fn from_datasets(
        datasets: impl IntoIterator<Item = Dataset>,
    ) -> Result<Self, DuplicateName> {
        let mut map = BTreeMap::new();
        for ds in datasets {
            let name = ds.name().to_string();
            if map.insert(name.clone(), ds).is_some() {
                return Err(DuplicateName(name));
            }
        }
        Ok(Registry { datasets: map })
    }

    pub fn get(&self, id: &str) -> Option<&Dataset> {
        self.datasets.get(id)
    }

    /// Metadata for every dataset, ordered by name.
    pub fn summaries(&self) -> Vec<DatasetSummary> {
        self.datasets.values().map(Dataset::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("two datasets are named {0}")]
pub struct DuplicateName(pub String);
