use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Property;

/// Workflow-level parameters keyed by name.
///
/// Backed by a [`BTreeMap`] so iteration order never depends on hashing.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalParams(pub BTreeMap<String, Property>);

impl GlobalParams {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Insert a property under its own name, replacing an existing entry.
    pub fn insert(&mut self, property: Property) -> &mut Self {
        self.0.insert(property.prop.clone(), property);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.0.get(name)
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<Property> for GlobalParams {
    fn from_iter<T: IntoIterator<Item = Property>>(iter: T) -> Self {
        let mut out = Self::new();
        for p in iter {
            out.insert(p);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_in_name_order() {
        let g: GlobalParams = [Property::input("z", "1"), Property::input("a", "2")]
            .into_iter()
            .collect();
        let names: Vec<_> = g.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "z"]);
    }

    #[test]
    fn insert_replaces_same_name() {
        let mut g = GlobalParams::new();
        g.insert(Property::input("a", "1")).insert(Property::input("a", "2"));
        assert_eq!(g.len(), 1);
        assert_eq!(g.get("a").unwrap().value, "2");
    }
}
