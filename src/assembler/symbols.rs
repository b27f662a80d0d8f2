//! Label addresses, collected in the first pass.
use std::collections::HashMap;

use super::ast::Address;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct SymbolTable {
    labels: HashMap<String, Address>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable { labels: HashMap::new() }
    }

    /// Binds a label to an address. A label that is defined twice
    /// keeps the last address it was given.
    pub fn record(&mut self, label: &str, address: Address) {
        if let Some(old) = self.labels.insert(label.to_owned(), address) {
            debug!("label '{}' moved from {:02} to {:02}", label, old, address);
        }
    }

    pub fn lookup(&self, label: &str) -> Option<Address> {
        self.labels.get(label).copied()
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All labels, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Address)> {
        let mut entries: Vec<(&str, Address)> = self.labels
            .iter()
            .map(|(name, addr)| (name.as_str(), *addr))
            .collect();
        entries.sort();
        entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_lookup() {
        let mut table = SymbolTable::new();
        assert!(table.is_empty());
        table.record("loop", 0);
        table.record("end", 4);

        assert_eq!(table.lookup("loop"), Some(0));
        assert_eq!(table.lookup("end"), Some(4));
        assert_eq!(table.lookup("nosuch"), None);
        // Names are case-sensitive.
        assert_eq!(table.lookup("LOOP"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_last_write_wins() {
        let mut table = SymbolTable::new();
        table.record("x", 1);
        table.record("x", 7);
        assert_eq!(table.lookup("x"), Some(7));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_iter_sorted_and_clear() {
        let mut table = SymbolTable::new();
        table.record("b", 2);
        table.record("a", 5);
        table.record("c", 0);
        let names: Vec<&str> = table.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.lookup("a"), None);
    }
}
