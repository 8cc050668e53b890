// src/extract/assets.rs
// =============================================================================
// The asset classes we recognise and the per-class URL sets.
//
// Each class is an independent set: the same URL may appear in two classes
// if it matches both passes. BTreeSet keeps every set sorted, which is also
// the order we download in.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The five kinds of asset a page can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Stylesheet,
    Script,
    Image,
    Font,
    Media,
}

impl AssetClass {
    /// Every class, in download order.
    pub const ALL: [AssetClass; 5] = [
        AssetClass::Stylesheet,
        AssetClass::Script,
        AssetClass::Image,
        AssetClass::Font,
        AssetClass::Media,
    ];

    /// Short label used in progress output.
    pub fn label(self) -> &'static str {
        match self {
            AssetClass::Stylesheet => "CSS",
            AssetClass::Script => "JS",
            AssetClass::Image => "image",
            AssetClass::Font => "font",
            AssetClass::Media => "media",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Deduplicated absolute URLs, one set per class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetSet {
    pub stylesheet: BTreeSet<String>,
    pub script: BTreeSet<String>,
    pub image: BTreeSet<String>,
    pub font: BTreeSet<String>,
    pub media: BTreeSet<String>,
}

impl AssetSet {
    pub fn get(&self, class: AssetClass) -> &BTreeSet<String> {
        match class {
            AssetClass::Stylesheet => &self.stylesheet,
            AssetClass::Script => &self.script,
            AssetClass::Image => &self.image,
            AssetClass::Font => &self.font,
            AssetClass::Media => &self.media,
        }
    }

    fn get_mut(&mut self, class: AssetClass) -> &mut BTreeSet<String> {
        match class {
            AssetClass::Stylesheet => &mut self.stylesheet,
            AssetClass::Script => &mut self.script,
            AssetClass::Image => &mut self.image,
            AssetClass::Font => &mut self.font,
            AssetClass::Media => &mut self.media,
        }
    }

    /// Adds a URL to a class. Returns false if it was already there.
    pub fn insert(&mut self, class: AssetClass, url: String) -> bool {
        self.get_mut(class).insert(url)
    }

    /// Walks the classes in download order.
    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, &BTreeSet<String>)> + '_ {
        AssetClass::ALL.into_iter().map(move |class| (class, self.get(class)))
    }

    /// Sum of all class sizes (cross-class duplicates counted twice).
    pub fn total(&self) -> usize {
        self.iter().map(|(_, urls)| urls.len()).sum()
    }
}
