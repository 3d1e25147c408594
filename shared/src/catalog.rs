use std::collections::HashMap;

use crate::visit::PlaceId;

/// One entry of the place selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOption {
    pub id: PlaceId,
    pub name: String,
}

impl PlaceOption {
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.id)
    }
}

/// Place id -> display name. Built once from the geography data set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceCatalog {
    names: HashMap<PlaceId, String>,
    options: Vec<PlaceOption>,
}

impl PlaceCatalog {
    /// Later duplicates of an id are ignored. Options sort by name, then id.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<PlaceId>,
        V: Into<String>,
    {
        let mut names = HashMap::new();
        let mut options = Vec::new();
        for (id, name) in entries {
            let id = id.into();
            let name = name.into();
            if id.is_empty() || names.contains_key(&id) {
                continue;
            }
            names.insert(id.clone(), name.clone());
            options.push(PlaceOption { id, name });
        }
        options.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Self { names, options }
    }

    pub fn name(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Display name, falling back to the raw id for unknown places.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.name(id).unwrap_or(id)
    }

    /// Selector options in display order.
    pub fn options(&self) -> &[PlaceOption] {
        &self.options
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|option| option.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
