//! Suffix catalog — which type mnemonics a trigger identifier may take.
//!
//! Dust spells a variable's type as a suffix after the last underscore:
//! `count_i` is an int, `buf_u8a` a `uint8_t` array, `hero_Playerp` an owned
//! pointer to the user type `Player`. The catalog answers "what can follow
//! this `name_`?" as an ordered list of named [`Category`] groups.
//!
//! # Two shapes
//!
//! | Base identifier         | Result                                     |
//! |-------------------------|--------------------------------------------|
//! | starts lowercase / `""` | the five built-in categories, in order     |
//! | starts uppercase        | one synthetic "User-defined Types" category |
//!
//! The built-in table is constructed once and never mutated. The
//! user-defined category is built fresh for every query because its entries
//! embed the base name.

use std::borrow::Cow;
use std::fmt::Write as _;

/// Name of the synthetic category offered for capitalized identifiers.
pub const USER_DEFINED: &str = "User-defined Types";

// ---------------------------------------------------------------------------
// Entries and categories
// ---------------------------------------------------------------------------

/// One selectable mnemonic and what it means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixEntry {
    pub mnemonic: Cow<'static, str>,
    pub description: Cow<'static, str>,
}

impl SuffixEntry {
    #[must_use]
    pub const fn fixed(mnemonic: &'static str, description: &'static str) -> Self {
        Self {
            mnemonic: Cow::Borrowed(mnemonic),
            description: Cow::Borrowed(description),
        }
    }

    fn owned(mnemonic: &'static str, description: String) -> Self {
        Self {
            mnemonic: Cow::Borrowed(mnemonic),
            description: Cow::Owned(description),
        }
    }
}

/// How a chosen entry rewrites the trigger token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// Keep the token (marker included) and append the mnemonic:
    /// `count_` + `i` → `count_i`.
    Append,
    /// Replace the whole token with this name plus the mnemonic:
    /// `Player_` + `p` → `Playerp`.
    Rename(String),
}

/// A named, ordered group of related mnemonics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: Cow<'static, str>,
    pub entries: Vec<SuffixEntry>,
    pub insertion: Insertion,
}

impl Category {
    fn fixed(name: &'static str, entries: &[SuffixEntry]) -> Self {
        Self {
            name: Cow::Borrowed(name),
            entries: entries.to_vec(),
            insertion: Insertion::Append,
        }
    }

    /// The text that replaces `token` when `entry` is chosen.
    #[must_use]
    pub fn replacement(&self, token: &str, entry: &SuffixEntry) -> String {
        match &self.insertion {
            Insertion::Append => format!("{token}{}", entry.mnemonic),
            Insertion::Rename(name) => format!("{name}{}", entry.mnemonic),
        }
    }

    /// What the popup shows for `entry`: the bare mnemonic for appended
    /// suffixes, the full name for renames.
    #[must_use]
    pub fn label(&self, entry: &SuffixEntry) -> String {
        match &self.insertion {
            Insertion::Append => entry.mnemonic.to_string(),
            Insertion::Rename(name) => format!("{name}{}", entry.mnemonic),
        }
    }
}

// ---------------------------------------------------------------------------
// Built-in table
// ---------------------------------------------------------------------------

const PRIMITIVES: &[SuffixEntry] = &[
    SuffixEntry::fixed("i", "int"),
    SuffixEntry::fixed("bl", "bool"),
    SuffixEntry::fixed("f", "float"),
    SuffixEntry::fixed("c", "char"),
    SuffixEntry::fixed("s", "string (char*)"),
    SuffixEntry::fixed("v", "void"),
];

const POINTERS: &[SuffixEntry] = &[
    SuffixEntry::fixed("ip", "int pointer (owned)"),
    SuffixEntry::fixed("ib", "int pointer (borrowed)"),
    SuffixEntry::fixed("ir", "int pointer (reference)"),
    SuffixEntry::fixed("cp", "char pointer (owned)"),
    SuffixEntry::fixed("cb", "char pointer (borrowed)"),
    SuffixEntry::fixed("cr", "char pointer (reference)"),
    SuffixEntry::fixed("vp", "void pointer (owned)"),
    SuffixEntry::fixed("cvp", "const void pointer (borrowed)"),
    SuffixEntry::fixed("rp", "restrict void pointer"),
    SuffixEntry::fixed("fp", "function pointer"),
    SuffixEntry::fixed("p", "owned pointer"),
    SuffixEntry::fixed("b", "borrowed pointer"),
    SuffixEntry::fixed("r", "reference pointer"),
];

const ARRAYS: &[SuffixEntry] = &[
    SuffixEntry::fixed("ia", "int array"),
    SuffixEntry::fixed("fa", "float array"),
    SuffixEntry::fixed("ca", "char array"),
    SuffixEntry::fixed("u8a", "uint8_t array"),
];

const FIXED_WIDTH: &[SuffixEntry] = &[
    SuffixEntry::fixed("u8", "uint8_t"),
    SuffixEntry::fixed("u16", "uint16_t"),
    SuffixEntry::fixed("u32", "uint32_t"),
    SuffixEntry::fixed("u64", "uint64_t"),
    SuffixEntry::fixed("i8", "int8_t"),
    SuffixEntry::fixed("i16", "int16_t"),
    SuffixEntry::fixed("i32", "int32_t"),
    SuffixEntry::fixed("i64", "int64_t"),
];

const SYSTEM: &[SuffixEntry] = &[
    SuffixEntry::fixed("st", "size_t"),
    SuffixEntry::fixed("ux", "uintptr_t (native word)"),
    SuffixEntry::fixed("ix", "intptr_t"),
    SuffixEntry::fixed("off", "off_t"),
];

// ---------------------------------------------------------------------------
// SuffixCatalog
// ---------------------------------------------------------------------------

/// The immutable table of suffix categories.
///
/// Build it once (usually [`SuffixCatalog::builtin`]) and hand it to the
/// engine. There is no mutation API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixCatalog {
    categories: Vec<Category>,
}

impl SuffixCatalog {
    /// The Dust language's standard suffix set.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            Category::fixed("Primitives", PRIMITIVES),
            Category::fixed("Pointers", POINTERS),
            Category::fixed("Arrays", ARRAYS),
            Category::fixed("Fixed-width", FIXED_WIDTH),
            Category::fixed("System", SYSTEM),
        ])
    }

    /// A catalog with a custom category table (e.g. for a dialect). Empty
    /// categories are dropped so every resolved category has an item.
    #[must_use]
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories: categories
                .into_iter()
                .filter(|c| !c.entries.is_empty())
                .collect(),
        }
    }

    /// The static categories, in display order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The categories offered for `base` (the trigger minus its marker).
    #[must_use]
    pub fn resolve(&self, base: &str) -> Vec<Category> {
        if base.chars().next().is_some_and(char::is_uppercase) {
            vec![user_defined(base)]
        } else {
            self.categories.clone()
        }
    }

    /// Explain the suffix of a full identifier such as `count_u32` or
    /// `hero_Playerp`. `None` when there is no suffix or it is unknown.
    ///
    /// `user_types` lists the declared type names; a capitalized suffix is
    /// split into name + modifier only when the name is one of them, so
    /// `hero_Player` never reads as a reference to `Playe`.
    #[must_use]
    pub fn describe(&self, identifier: &str, user_types: &[&str]) -> Option<SuffixEntry> {
        let (_, suffix) = identifier.rsplit_once('_')?;
        if suffix.is_empty() {
            return None;
        }
        if suffix.chars().next().is_some_and(char::is_uppercase) {
            return Some(describe_user_type(suffix, user_types));
        }
        self.categories
            .iter()
            .flat_map(|c| c.entries.iter())
            .find(|e| e.mnemonic == suffix)
            .cloned()
    }

    /// The printable suffix reference, one block per category.
    #[must_use]
    pub fn reference(&self) -> String {
        let title = "Dust Language Suffix Reference";
        let mut out = format!("{title}\n{}\n", "=".repeat(title.len()));
        for category in &self.categories {
            let _ = writeln!(out, "\n{}:", category.name.to_uppercase());
            for entry in &category.entries {
                let _ = writeln!(out, "  {:<5} - {}", entry.mnemonic, entry.description);
            }
        }
        let _ = writeln!(out, "\n{}:", USER_DEFINED.to_uppercase());
        for entry in user_defined("Name").entries {
            let _ = writeln!(out, "  Name{:<1} - {}", entry.mnemonic, entry.description);
        }
        out
    }
}

impl Default for SuffixCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The synthetic category for a capitalized base name.
fn user_defined(name: &str) -> Category {
    Category {
        name: Cow::Borrowed(USER_DEFINED),
        entries: vec![
            SuffixEntry::owned("", format!("{name} instance")),
            SuffixEntry::fixed("p", "owned pointer"),
            SuffixEntry::fixed("b", "borrowed/const pointer"),
            SuffixEntry::fixed("r", "reference pointer"),
            SuffixEntry::owned("a", format!("array of {name}")),
        ],
        insertion: Insertion::Rename(name.to_string()),
    }
}

/// Describe `TypeName` or `TypeName` + one of `p`/`b`/`r`/`a`.
///
/// Unknown names are read as a plain instance of that name.
fn describe_user_type(suffix: &str, user_types: &[&str]) -> SuffixEntry {
    let (name, modifier) = match suffix.char_indices().last() {
        Some((i, m @ ('p' | 'b' | 'r' | 'a')))
            if !user_types.contains(&suffix) && user_types.contains(&&suffix[..i]) =>
        {
            (&suffix[..i], Some(m))
        }
        _ => (suffix, None),
    };
    let entries = user_defined(name).entries;
    let index = match modifier {
        None => 0,
        Some('p') => 1,
        Some('b') => 2,
        Some('r') => 3,
        Some(_) => 4,
    };
    let entry = &entries[index];
    let description = if index == 0 || index == 4 {
        entry.description.to_string()
    } else {
        format!("{} to {name}", entry.description)
    };
    SuffixEntry {
        mnemonic: Cow::Owned(suffix.to_string()),
        description: Cow::Owned(description),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(categories: &[Category]) -> Vec<&str> {
        categories.iter().map(|c| c.name.as_ref()).collect()
    }

    // -- resolve --------------------------------------------------------------

    #[test]
    fn lowercase_base_gets_builtin_categories_in_order() {
        let catalog = SuffixCatalog::builtin();
        let resolved = catalog.resolve("count");
        assert_eq!(
            names(&resolved),
            vec!["Primitives", "Pointers", "Arrays", "Fixed-width", "System"]
        );
        assert_eq!(resolved, catalog.categories());
    }

    #[test]
    fn primitives_start_with_int() {
        let resolved = SuffixCatalog::builtin().resolve("count");
        let first = &resolved[0].entries[0];
        assert_eq!(first.mnemonic, "i");
        assert_eq!(first.description, "int");
    }

    #[test]
    fn empty_base_takes_lowercase_branch() {
        let catalog = SuffixCatalog::builtin();
        assert_eq!(catalog.resolve(""), catalog.categories());
    }

    #[test]
    fn digit_or_underscore_base_takes_lowercase_branch() {
        let catalog = SuffixCatalog::builtin();
        assert_eq!(catalog.resolve("_tmp").len(), 5);
        assert_eq!(catalog.resolve("2d").len(), 5);
    }

    #[test]
    fn uppercase_base_gets_user_defined_types() {
        let resolved = SuffixCatalog::builtin().resolve("Player");
        assert_eq!(names(&resolved), vec![USER_DEFINED]);

        let category = &resolved[0];
        let labels: Vec<String> = category.entries.iter().map(|e| category.label(e)).collect();
        assert_eq!(labels, vec!["Player", "Playerp", "Playerb", "Playerr", "Playera"]);
        assert_eq!(category.entries[0].description, "Player instance");
        assert_eq!(category.entries[4].description, "array of Player");
    }

    #[test]
    fn resolve_is_deterministic() {
        let catalog = SuffixCatalog::builtin();
        assert_eq!(catalog.resolve("Node"), catalog.resolve("Node"));
        assert_eq!(catalog.resolve("x"), catalog.resolve("x"));
    }

    #[test]
    fn mnemonics_are_unique_across_builtin_categories() {
        let catalog = SuffixCatalog::builtin();
        let mut seen = std::collections::HashSet::new();
        for entry in catalog.categories().iter().flat_map(|c| &c.entries) {
            assert!(seen.insert(entry.mnemonic.clone()), "duplicate {}", entry.mnemonic);
        }
    }

    #[test]
    fn custom_catalog_drops_empty_categories() {
        let catalog = SuffixCatalog::new(vec![
            Category::fixed("Empty", &[]),
            Category::fixed("Primitives", PRIMITIVES),
        ]);
        assert_eq!(names(catalog.categories()), vec!["Primitives"]);
    }

    // -- replacement ----------------------------------------------------------

    #[test]
    fn append_keeps_marker() {
        let category = Category::fixed("Primitives", PRIMITIVES);
        assert_eq!(category.replacement("count_", &category.entries[0]), "count_i");
    }

    #[test]
    fn rename_drops_marker() {
        let category = user_defined("Player");
        assert_eq!(category.replacement("Player_", &category.entries[0]), "Player");
        assert_eq!(category.replacement("Player_", &category.entries[1]), "Playerp");
    }

    // -- describe -------------------------------------------------------------

    #[test]
    fn describe_builtin_suffix() {
        let catalog = SuffixCatalog::builtin();
        assert_eq!(catalog.describe("count_u32", &[]).unwrap().description, "uint32_t");
        assert_eq!(catalog.describe("my_buf_u8a", &[]).unwrap().description, "uint8_t array");
    }

    #[test]
    fn describe_user_type_suffix() {
        let catalog = SuffixCatalog::builtin();
        let types = ["Player"];
        assert_eq!(
            catalog.describe("hero_Playerp", &types).unwrap().description,
            "owned pointer to Player"
        );
        assert_eq!(
            catalog.describe("hero_Player", &types).unwrap().description,
            "Player instance"
        );
        assert_eq!(
            catalog.describe("team_Playera", &types).unwrap().description,
            "array of Player"
        );
    }

    #[test]
    fn describe_undeclared_user_type_is_an_instance() {
        let catalog = SuffixCatalog::builtin();
        let entry = catalog.describe("hero_Playerp", &[]).unwrap();
        assert_eq!(entry.mnemonic, "Playerp");
        assert_eq!(entry.description, "Playerp instance");
    }

    #[test]
    fn describe_unknown_or_missing_suffix() {
        let catalog = SuffixCatalog::builtin();
        assert_eq!(catalog.describe("count", &[]), None);
        assert_eq!(catalog.describe("count_", &[]), None);
        assert_eq!(catalog.describe("count_zz", &[]), None);
    }

    // -- reference ------------------------------------------------------------

    #[test]
    fn reference_lists_every_category() {
        let text = SuffixCatalog::builtin().reference();
        assert!(text.starts_with("Dust Language Suffix Reference\n"));
        assert!(text.contains("\nPRIMITIVES:\n  i     - int\n"));
        assert!(text.contains("\nSYSTEM:\n"));
        assert!(text.contains("  Namep - owned pointer\n"));
    }
}
