use std::{collections::HashMap, path::Path};

/// One ImageNet class: WordNet id plus human-readable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLabel {
    pub id: String,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LabelsError {
    #[error("failed to read class index: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse class index: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("class index key '{0}' is not a number")]
    InvalidKey(String),
    #[error("class index is missing entry {0}")]
    MissingIndex(usize),
    #[error("class index is empty")]
    Empty,
}

/// Class-index table mapping model output positions to labels.
#[derive(Debug, Clone)]
pub struct ClassLabels {
    labels: Vec<ClassLabel>,
}

impl ClassLabels {
    pub fn new(labels: Vec<ClassLabel>) -> Self {
        Self { labels }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LabelsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses the Keras `imagenet_class_index.json` layout:
    /// `{"0": ["n01440764", "tench"], "1": [...], ...}`.
    pub fn from_json(text: &str) -> Result<Self, LabelsError> {
        let raw: HashMap<String, (String, String)> = serde_json::from_str(text)?;
        if raw.is_empty() {
            return Err(LabelsError::Empty);
        }

        let mut indexed = Vec::with_capacity(raw.len());
        for (key, (id, name)) in raw {
            let index = key
                .trim()
                .parse::<usize>()
                .map_err(|_| LabelsError::InvalidKey(key.clone()))?;
            indexed.push((index, ClassLabel { id, name }));
        }
        indexed.sort_by_key(|(index, _)| *index);

        for (expected, (index, _)) in indexed.iter().enumerate() {
            if *index != expected {
                return Err(LabelsError::MissingIndex(expected));
            }
        }

        Ok(Self::new(indexed.into_iter().map(|(_, label)| label).collect()))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, index: usize) -> Option<&ClassLabel> {
        self.labels.get(index)
    }
}
