use std::fmt;

/// Identifies one league season's standings in every storage tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    alias: String,
    season: String,
}

impl Key {
    pub fn new(alias: impl Into<String>, season: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            season: season.into(),
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn season(&self) -> &str {
        &self.season
    }

    /// Wire form used as the cache key and the indexed document field.
    pub fn storage_key(&self) -> String {
        format!("{}_{}", self.alias, self.season)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.alias, self.season)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn value_equality() {
        assert_eq!(Key::new("epl", "2020"), Key::new("epl", "2020"));
        assert_ne!(Key::new("epl", "2020"), Key::new("epl", "2019"));
        assert_ne!(Key::new("epl", "2020"), Key::new("seriea", "2020"));
    }

    #[test]
    fn interchangeable_as_map_keys() {
        let mut map = HashMap::new();
        map.insert(Key::new("epl", "2020"), 1);
        assert_eq!(map.get(&Key::new("epl", "2020")), Some(&1));
        assert_eq!(map.get(&Key::new("epl", "2019")), None);
    }

    #[test]
    fn wire_form() {
        let key = Key::new("epl", "2020");
        assert_eq!(key.storage_key(), "epl_2020");
        assert_eq!(key.to_string(), key.storage_key());
        assert_eq!(key.alias(), "epl");
        assert_eq!(key.season(), "2020");
    }
}
