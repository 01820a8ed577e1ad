use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::{cardname::CardName, scryfallcard::ScryfallCard, setcode::SetCode};
use crate::utilities::file_management::{load_from_json_file, save_to_file, JsonFileError};

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("could not access collection file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("collection file {path} is corrupt: {reason}")]
    CorruptData { path: String, reason: String },
}

impl From<JsonFileError> for CollectionError {
    fn from(e: JsonFileError) -> Self {
        match e {
            JsonFileError::Io { path, source } => CollectionError::Io { path, source },
            JsonFileError::Json { path, source } => CollectionError::CorruptData {
                path,
                reason: source.to_string(),
            },
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub card: ScryfallCard,
    pub count: u32,
}

impl fmt::Display for CollectionEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {}, Count: {})",
            self.card.name, self.card.set, self.card.rarity, self.card.type_line, self.count
        )
    }
}

fn sort_key(card: &ScryfallCard) -> (&CardName, &SetCode) {
    (&card.name, &card.set)
}

/// Rows of one set, kept sorted by (name, set) with a name -> row index.
#[derive(Debug, Clone, Default)]
pub struct SetTable {
    entries: Vec<CollectionEntry>,
    index: HashMap<CardName, usize>,
}

impl PartialEq for SetTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl SetTable {
    pub fn entries(&self) -> &[CollectionEntry] {
        &self.entries
    }

    pub fn get(&self, name: &CardName) -> Option<&CollectionEntry> {
        self.index.get(name).map(|&pos| &self.entries[pos])
    }

    fn add(&mut self, card: ScryfallCard) -> usize {
        if let Some(&pos) = self.index.get(&card.name) {
            let entry = &mut self.entries[pos];
            entry.count = entry.count.saturating_add(1);
            return pos;
        }

        let pos = self
            .entries
            .partition_point(|e| sort_key(&e.card) < sort_key(&card));
        for row in self.index.values_mut() {
            if *row >= pos {
                *row += 1;
            }
        }
        self.index.insert(card.name.clone(), pos);
        self.entries.insert(pos, CollectionEntry { card, count: 1 });
        pos
    }

    /// Builds a table from snapshot rows, rejecting rows that break the
    /// table invariants.
    fn from_entries(set: &SetCode, mut entries: Vec<CollectionEntry>) -> Result<Self, String> {
        for entry in &entries {
            if entry.count == 0 {
                return Err(format!("{} has a count of 0", entry.card));
            }
            if &entry.card.set != set {
                return Err(format!("{} is stored under set {}", entry.card, set));
            }
        }

        entries.sort_by(|a, b| sort_key(&a.card).cmp(&sort_key(&b.card)));

        let mut index = HashMap::with_capacity(entries.len());
        for (pos, entry) in entries.iter().enumerate() {
            if index.insert(entry.card.name.clone(), pos).is_some() {
                return Err(format!("{} appears more than once", entry.card));
            }
        }
        Ok(SetTable { entries, index })
    }
}

/// The user's card collection: one table per set, iterated in set order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionStore {
    sets: BTreeMap<SetCode, SetTable>,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one copy of `card`. A card already in the collection with the
    /// same name and set gets its count bumped, nothing else changes.
    pub fn add_card(&mut self, card: ScryfallCard) -> &CollectionEntry {
        let table = self.sets.entry(card.set.clone()).or_default();
        let pos = table.add(card);
        let entry = &table.entries[pos];
        debug!("Added {}, count is now {}", entry.card, entry.count);
        entry
    }

    pub fn get(&self, set: &SetCode, name: &CardName) -> Option<&CollectionEntry> {
        self.sets.get(set)?.get(name)
    }

    pub fn sets(&self) -> impl Iterator<Item = (&SetCode, &[CollectionEntry])> {
        self.sets.iter().map(|(set, table)| (set, table.entries()))
    }

    /// All entries, set by set, each set in table order.
    pub fn entries(&self) -> impl Iterator<Item = &CollectionEntry> {
        self.sets.values().flat_map(|table| table.entries().iter())
    }

    /// Number of distinct (name, set) entries.
    pub fn len(&self) -> usize {
        self.sets.values().map(|table| table.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of copies across all entries.
    pub fn total_cards(&self) -> u64 {
        self.entries().map(|entry| u64::from(entry.count)).sum()
    }

    fn snapshot(&self) -> BTreeMap<&SetCode, &[CollectionEntry]> {
        self.sets().collect()
    }

    pub fn save(&self, path: &Path) -> Result<(), CollectionError> {
        save_to_file(path, &self.snapshot()).map_err(|source| CollectionError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!(
            "Saved {} entries ({} cards) to {}",
            self.len(),
            self.total_cards(),
            path.display()
        );
        Ok(())
    }

    /// Replaces the whole collection with the snapshot at `path`. On any
    /// error the current collection is kept as it was.
    pub fn load(&mut self, path: &Path) -> Result<(), CollectionError> {
        let snapshot: BTreeMap<SetCode, Vec<CollectionEntry>> = load_from_json_file(path)?;

        let mut sets = BTreeMap::new();
        for (set, entries) in snapshot {
            let table = SetTable::from_entries(&set, entries).map_err(|reason| {
                CollectionError::CorruptData {
                    path: path.display().to_string(),
                    reason,
                }
            })?;
            sets.insert(set, table);
        }

        self.sets = sets;
        info!(
            "Loaded {} entries ({} cards) from {}",
            self.len(),
            self.total_cards(),
            path.display()
        );
        Ok(())
    }
}
