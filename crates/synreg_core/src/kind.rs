//! Node kinds and the category ranges that partition the code space.
//!
//! Codes 0 and 1 are hand-assigned to the primitive kinds `Token` and
//! `Unknown`. Every other code must lie inside a [`CategoryRange`]; the
//! ranges themselves are checked once when a [`Layout`] is built.

use crate::consts::{KindCode, CODE_TOKEN, CODE_UNKNOWN, DECL_RANGE, EXPR_RANGE, STMT_RANGE};
use crate::errors::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Decl,
    Expr,
    Stmt,
    Collection,
    Unclassified,
}

impl Category {
    /// Stable byte used when hashing a registry. Never renumber.
    pub fn tag(self) -> u8 {
        match self {
            Category::Unclassified => 0,
            Category::Decl => 1,
            Category::Expr => 2,
            Category::Stmt => 3,
            Category::Collection => 4,
        }
    }

    /// Only these own a code range; collections borrow their family's range.
    pub fn is_broad(self) -> bool {
        matches!(self, Category::Decl | Category::Expr | Category::Stmt)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Decl => "decl",
            Category::Expr => "expr",
            Category::Stmt => "stmt",
            Category::Collection => "collection",
            Category::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open interval `[start, end)` reserved for one broad category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRange {
    pub category: Category,
    pub start: KindCode,
    pub end: KindCode,
}

impl CategoryRange {
    pub const fn new(category: Category, start: KindCode, end: KindCode) -> Self {
        Self { category, start, end }
    }

    #[inline]
    pub fn contains(&self, code: KindCode) -> bool {
        self.start <= code && code < self.end
    }
}

/// The closed set of category ranges a registry is validated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Layout {
    ranges: Vec<CategoryRange>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            ranges: vec![
                CategoryRange::new(Category::Decl, DECL_RANGE.0, DECL_RANGE.1),
                CategoryRange::new(Category::Expr, EXPR_RANGE.0, EXPR_RANGE.1),
                CategoryRange::new(Category::Stmt, STMT_RANGE.0, STMT_RANGE.1),
            ],
        }
    }
}

impl Layout {
    pub fn new(mut ranges: Vec<CategoryRange>) -> Result<Self, RegistryError> {
        for r in &ranges {
            if !r.category.is_broad() {
                return Err(RegistryError::BadLayout(format!("{} cannot own a range", r.category)));
            }
            if r.start >= r.end {
                return Err(RegistryError::BadLayout(format!(
                    "{} range [{}, {}) is empty",
                    r.category, r.start, r.end
                )));
            }
            if r.start <= CODE_UNKNOWN {
                return Err(RegistryError::BadLayout(format!(
                    "{} range [{}, {}) covers a reserved code",
                    r.category, r.start, r.end
                )));
            }
        }
        ranges.sort_by_key(|r| r.start);
        for w in ranges.windows(2) {
            if w[0].end > w[1].start {
                return Err(RegistryError::BadLayout(format!(
                    "{} [{}, {}) overlaps {} [{}, {})",
                    w[0].category, w[0].start, w[0].end, w[1].category, w[1].start, w[1].end
                )));
            }
        }
        Ok(Self { ranges })
    }

    pub fn ranges(&self) -> &[CategoryRange] {
        &self.ranges
    }

    /// Broad category whose range covers `code`, if any.
    pub fn classify(&self, code: KindCode) -> Option<Category> {
        self.ranges.iter().find(|r| r.contains(code)).map(|r| r.category)
    }
}

impl<'de> Deserialize<'de> for Layout {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let ranges = Vec::<CategoryRange>::deserialize(d)?;
        Layout::new(ranges).map_err(serde::de::Error::custom)
    }
}

/// One registered syntactic construct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKind {
    pub name: Box<str>,
    pub code: KindCode,
    pub category: Category,
    /// Broad category of the range the code sits in; equals `category`
    /// except for collections and primitives.
    pub family: Category,
}

impl NodeKind {
    pub(crate) fn primitive(name: &str, code: KindCode) -> Self {
        Self {
            name: name.into(),
            code,
            category: Category::Unclassified,
            family: Category::Unclassified,
        }
    }

    /// Tokens are the only leaves that carry payload bytes.
    #[inline]
    pub fn is_token(&self) -> bool {
        self.code == CODE_TOKEN
    }

    #[inline]
    pub fn is_primitive(&self) -> bool {
        self.code <= CODE_UNKNOWN
    }

    #[inline]
    pub fn is_collection(&self) -> bool {
        self.category == Category::Collection
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.name, self.code, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_classifies_bounds() {
        let l = Layout::default();
        assert_eq!(l.classify(0), None);
        assert_eq!(l.classify(1), None);
        assert_eq!(l.classify(2), Some(Category::Decl));
        assert_eq!(l.classify(999), Some(Category::Decl));
        assert_eq!(l.classify(1000), None);
        assert_eq!(l.classify(1001), Some(Category::Expr));
        assert_eq!(l.classify(2000), None);
        assert_eq!(l.classify(2999), Some(Category::Stmt));
        assert_eq!(l.classify(3000), None);
    }

    #[test]
    fn layout_rejects_overlap_and_reserved() {
        let overlap = Layout::new(vec![
            CategoryRange::new(Category::Decl, 2, 100),
            CategoryRange::new(Category::Expr, 50, 200),
        ]);
        assert!(matches!(overlap, Err(RegistryError::BadLayout(_))));

        let reserved = Layout::new(vec![CategoryRange::new(Category::Decl, 1, 100)]);
        assert!(matches!(reserved, Err(RegistryError::BadLayout(_))));

        let collection = Layout::new(vec![CategoryRange::new(Category::Collection, 10, 20)]);
        assert!(matches!(collection, Err(RegistryError::BadLayout(_))));
    }

    #[test]
    fn layout_from_json_is_validated() {
        let ok: Layout = serde_json::from_str(
            r#"[{"category":"stmt","start":20,"end":30},{"category":"decl","start":2,"end":10}]"#,
        )
        .unwrap();
        assert_eq!(ok.classify(25), Some(Category::Stmt));
        assert_eq!(ok.ranges()[0].category, Category::Decl);

        let bad = serde_json::from_str::<Layout>(r#"[{"category":"decl","start":9,"end":9}]"#);
        assert!(bad.is_err());
    }
}
