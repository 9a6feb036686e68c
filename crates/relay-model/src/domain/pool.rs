use serde::{Deserialize, Serialize};

use crate::{
    Property,
    error::{ModelError, ModelResult},
};

/// Ordered working set of variables produced by upstream tasks.
///
/// Serialized as a transparent JSON array.
/// Order is irrelevant for hashing but decides which entry wins when pools are merged: the first writer wins.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VarPool(pub Vec<Property>);

impl VarPool {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Parse a pool from its JSON form.
    ///
    /// Blank text is an empty pool.
    pub fn from_json(text: &str) -> ModelResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_json::from_str(text).map_err(|e| ModelError::InvalidVarPool(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Property> {
        self.0.iter()
    }

    /// Append a property, keeping any earlier entry with the same name in front of it.
    pub fn push(&mut self, property: Property) {
        self.0.push(property);
    }

    /// Returns `true` if some entry carries the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|p| p.prop == name)
    }

    /// First entry with the given name.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.0.iter().find(|p| p.prop == name)
    }

    pub fn into_inner(self) -> Vec<Property> {
        self.0
    }
}

impl From<Vec<Property>> for VarPool {
    fn from(v: Vec<Property>) -> Self {
        Self(v)
    }
}

impl FromIterator<Property> for VarPool {
    fn from_iter<T: IntoIterator<Item = Property>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_json_is_empty_pool() {
        assert!(VarPool::from_json("").unwrap().is_empty());
        assert!(VarPool::from_json("  \n").unwrap().is_empty());
        assert!(VarPool::from_json("[]").unwrap().is_empty());
    }

    #[test]
    fn parses_property_list() {
        let pool = VarPool::from_json(
            r#"[{"prop":"a","direct":"IN","type":"VARCHAR","value":"1"},{"prop":"b","direct":"OUT","value":"2"}]"#,
        )
        .unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get("a").map(|p| p.value.as_str()), Some("1"));
        assert!(!pool.get("b").unwrap().is_input());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = VarPool::from_json("{not json").unwrap_err();
        assert!(matches!(err, ModelError::InvalidVarPool(_)));
    }

    #[test]
    fn first_entry_wins_on_lookup() {
        let mut pool = VarPool::new();
        pool.push(Property::input("a", "first"));
        pool.push(Property::input("a", "second"));
        assert!(pool.contains("a"));
        assert_eq!(pool.get("a").unwrap().value, "first");
    }

    #[test]
    fn serde_transparent_roundtrip_json() {
        let pool: VarPool = vec![Property::input("x", "1")].into();
        let json = serde_json::to_string(&pool).unwrap();
        assert!(json.starts_with('['));
        let back: VarPool = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pool);
    }
}
