use std::collections::BTreeMap;

/// Assigns a stable column to every distinct name in a vocabulary.
///
/// Columns follow the lexicographic order of the names, so the same set of
/// names always yields the same mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureIndex {
    columns: BTreeMap<String, usize>,
}

impl FeatureIndex {
    pub fn from_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut columns: BTreeMap<String, usize> = names
            .into_iter()
            .filter(|name| !name.is_empty())
            .map(|name| (name.to_string(), 0))
            .collect();

        for (i, column) in columns.values_mut().enumerate() {
            *column = i;
        }

        Self { columns }
    }

    /// Returns the column of `name`, or `None` if it is outside the vocabulary.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
