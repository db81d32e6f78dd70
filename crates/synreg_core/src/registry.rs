//! Immutable registry of node kinds for one protocol version.
//!
//! Built once from a [`KindTable`], validated, then only read. A newer grammar
//! replaces the whole registry (see [`crate::current::RegistryHandle`]); a
//! registry is never mutated in place.

use crate::builtin;
use crate::consts::{KindCode, CODE_TOKEN, CODE_UNKNOWN, NAME_TOKEN, NAME_UNKNOWN};
use crate::errors::{self, EvolutionError, RegistryError};
use crate::kind::{Category, Layout, NodeKind};
use crate::table::{KindTable, TableEntry};
use crate::version::table_checksum;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Registry {
    /// Sorted by code.
    kinds: Vec<NodeKind>,
    by_name: HashMap<Box<str>, usize>,
    by_code: HashMap<KindCode, usize>,
    layout: Layout,
    checksum: u64,
}

fn primitive_name(code: KindCode) -> &'static str {
    if code == CODE_TOKEN { NAME_TOKEN } else { NAME_UNKNOWN }
}

impl Registry {
    /// Validate `table` against its own layout (or the default one).
    pub fn build(table: &KindTable) -> Result<Self, RegistryError> {
        Self::build_with_layout(table, table.layout())
    }

    pub fn build_with_layout(table: &KindTable, layout: Layout) -> Result<Self, RegistryError> {
        let mut kinds = vec![
            NodeKind::primitive(NAME_TOKEN, CODE_TOKEN),
            NodeKind::primitive(NAME_UNKNOWN, CODE_UNKNOWN),
        ];
        let mut names: HashSet<&str> = HashSet::with_capacity(table.len() + 2);
        let mut codes: HashSet<KindCode> = HashSet::with_capacity(table.len() + 2);
        names.extend([NAME_TOKEN, NAME_UNKNOWN]);
        codes.extend([CODE_TOKEN, CODE_UNKNOWN]);

        // Primitives restated by the table, indexed by code.
        let mut restated = [false; 2];
        for e in table.entries() {
            if e.code <= CODE_UNKNOWN {
                // Restating a primitive at its own code is allowed, once.
                let restates = e.name == primitive_name(e.code)
                    && matches!(e.category, None | Some(Category::Unclassified));
                if restates {
                    let seen = &mut restated[e.code as usize];
                    if *seen {
                        return Err(RegistryError::DuplicateName(e.name.clone()));
                    }
                    *seen = true;
                    continue;
                }
                return Err(RegistryError::ReservedCode(e.code));
            }
            if !names.insert(e.name.as_str()) {
                return Err(RegistryError::DuplicateName(e.name.clone()));
            }
            if !codes.insert(e.code) {
                return Err(RegistryError::DuplicateCode(e.code));
            }
            kinds.push(classify(e, &layout)?);
        }

        kinds.sort_by_key(|k| k.code);
        let by_name = kinds.iter().enumerate().map(|(i, k)| (k.name.clone(), i)).collect();
        let by_code = kinds.iter().enumerate().map(|(i, k)| (k.code, i)).collect();
        let checksum = table_checksum(&kinds);
        debug!(kinds = kinds.len(), checksum = format_args!("{checksum:016x}"), "registry built");
        Ok(Self { kinds, by_name, by_code, layout, checksum })
    }

    /// Read a table file and build it.
    pub fn load(path: impl AsRef<Path>) -> errors::Result<Self> {
        Ok(Self::build(&KindTable::load(path)?)?)
    }

    /// Registry over the builtin PHP grammar table.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::build(&builtin::table())
    }

    #[inline]
    pub fn by_name(&self, name: &str) -> Option<&NodeKind> {
        self.by_name.get(name).map(|&i| &self.kinds[i])
    }

    #[inline]
    pub fn by_code(&self, code: KindCode) -> Option<&NodeKind> {
        self.by_code.get(&code).map(|&i| &self.kinds[i])
    }

    #[inline]
    pub fn code_of(&self, name: &str) -> Option<KindCode> {
        self.by_name(name).map(|k| k.code)
    }

    #[inline]
    pub fn name_of(&self, code: KindCode) -> Option<&str> {
        self.by_code(code).map(|k| &*k.name)
    }

    /// Kinds in code order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeKind> {
        self.kinds.iter()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Stable hash of the sorted (name, code, category) triples.
    pub fn checksum(&self) -> u64 {
        self.checksum
    }

    /// Table form, sorted by code, with every category spelled out.
    /// Primitives are implicit and left out.
    pub fn to_table(&self) -> KindTable {
        let mut t = KindTable::with_layout(self.layout.clone());
        for k in self.kinds.iter().filter(|k| !k.is_primitive()) {
            t.push_tagged(&*k.name, k.code, k.category);
        }
        t
    }

    /// Check that `self` only appends to `previous`: every published kind keeps
    /// its code and category, and no published code names something else.
    pub fn check_evolution(&self, previous: &Registry) -> Result<(), EvolutionError> {
        for old in previous.iter() {
            if let Some(now) = self.by_code(old.code) {
                if now.name != old.name {
                    return Err(EvolutionError::ReusedCode {
                        code: old.code,
                        old: old.name.to_string(),
                        new: now.name.to_string(),
                    });
                }
            }
            let Some(now) = self.by_name(&old.name) else {
                return Err(EvolutionError::RemovedKind(old.name.to_string()));
            };
            if now.code != old.code {
                return Err(EvolutionError::ReassignedCode {
                    name: old.name.to_string(),
                    old: old.code,
                    new: now.code,
                });
            }
            if now.category != old.category {
                return Err(EvolutionError::Recategorized {
                    name: old.name.to_string(),
                    old: old.category,
                    new: now.category,
                });
            }
        }
        Ok(())
    }
}

fn classify(e: &TableEntry, layout: &Layout) -> Result<NodeKind, RegistryError> {
    let range = layout.classify(e.code);
    let violation = |expected| RegistryError::RangeViolation {
        name: e.name.clone(),
        code: e.code,
        expected,
    };
    let (category, family) = match (e.category, range) {
        (None, Some(c)) => (c, c),
        (None, None) => {
            return Err(RegistryError::UnclassifiedCode { name: e.name.clone(), code: e.code })
        }
        (Some(Category::Collection), Some(c)) => (Category::Collection, c),
        (Some(declared), Some(c)) if declared == c => (c, c),
        (Some(declared), _) => return Err(violation(declared)),
    };
    Ok(NodeKind { name: e.name.as_str().into(), code: e.code, category, family })
}
