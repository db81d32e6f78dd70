//! Kind table source: the ordered `(name, code[, category])` list a grammar
//! author edits. It carries no behavior; [`crate::Registry::build`] enforces
//! every invariant.

use crate::consts::KindCode;
use crate::errors::TableError;
use crate::kind::{Category, Layout};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub name: String,
    pub code: KindCode,
    /// Explicit tag. Required for collections; otherwise inferred from the code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Table file format:
/// ```json
/// { "ranges": [ {"category": "decl", "start": 2, "end": 1000} ],
///   "kinds":  [ {"name": "SourceFile", "code": 44},
///               {"name": "NameList", "code": 45, "category": "collection"} ] }
/// ```
/// `ranges` is optional and defaults to [`Layout::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ranges: Option<Layout>,
    kinds: Vec<TableEntry>,
}

impl KindTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: Layout) -> Self {
        Self { ranges: Some(layout), kinds: Vec::new() }
    }

    pub fn push(&mut self, name: impl Into<String>, code: KindCode) -> &mut Self {
        self.kinds.push(TableEntry { name: name.into(), code, category: None });
        self
    }

    pub fn push_tagged(&mut self, name: impl Into<String>, code: KindCode, category: Category) -> &mut Self {
        self.kinds.push(TableEntry { name: name.into(), code, category: Some(category) });
        self
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.kinds
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn layout(&self) -> Layout {
        self.ranges.clone().unwrap_or_default()
    }

    pub fn from_json(s: &str) -> Result<Self, TableError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, TableError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let s = fs::read_to_string(path)?;
        Self::from_json(&s)
    }

    pub fn save_atomic(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let path = path.as_ref();
        let tmp = path.with_extension("json.tmp");
        let mut f = fs::File::create(&tmp)?;
        f.write_all(self.to_json_pretty()?.as_bytes())?;
        f.sync_all()?;
        drop(f);
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, KindCode)> for KindTable {
    fn from_iter<I: IntoIterator<Item = (S, KindCode)>>(iter: I) -> Self {
        let mut t = KindTable::new();
        for (name, code) in iter {
            t.push(name, code);
        }
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn json_keeps_order_and_tags() {
        let t = KindTable::from_json(
            r#"{"kinds":[{"name":"B","code":3},{"name":"A","code":2},{"name":"AList","code":9,"category":"collection"}]}"#,
        )
        .unwrap();
        let names: Vec<_> = t.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["B", "A", "AList"]);
        assert_eq!(t.entries()[2].category, Some(Category::Collection));
        assert_eq!(t.layout(), Layout::default());
    }

    #[test]
    fn save_and_load() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("kinds.json");
        let mut t = KindTable::new();
        t.push("A", 2).push_tagged("AList", 3, Category::Collection);
        t.save_atomic(&path).unwrap();
        assert_eq!(KindTable::load(&path).unwrap(), t);
    }
}
