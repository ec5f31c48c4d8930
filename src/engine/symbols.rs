use std::collections::BTreeMap;

/// One unit of input: a single character.
pub type Symbol = char;

/// Occurrence count per distinct symbol, in ascending symbol order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<Symbol, usize>,
}

impl FrequencyTable {
    pub fn count(text: &str) -> Self {
        let mut counts = BTreeMap::new();
        for symbol in text.chars() {
            *counts.entry(symbol).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, symbol: Symbol) -> Option<usize> {
        self.counts.get(&symbol).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, usize)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }

    /// Total number of symbols counted.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl From<BTreeMap<Symbol, usize>> for FrequencyTable {
    fn from(counts: BTreeMap<Symbol, usize>) -> Self {
        Self { counts }
    }
}
