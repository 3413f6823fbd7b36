//! Package categories and allow-lists

use super::Package;
use std::collections::BTreeSet;

/// Toolchain packages (compilers, binutils)
pub const TOOLCHAIN: &str = "toolchain";
/// Analysis tools
pub const ANALYZER: &str = "analyzer";
/// Board images
pub const BOARD_IMAGE: &str = "board-image";
/// Emulators
pub const EMULATOR: &str = "emulator";
/// Source packages meant for extraction
pub const SOURCE: &str = "source";

/// Allow-list of category strings
///
/// Membership is exact string equality. Categories not in the set are excluded,
/// never an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategorySet(BTreeSet<String>);

impl CategorySet {
    /// Build an allow-list
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(categories.into_iter().map(Into::into).collect())
    }

    /// `{toolchain}`
    pub fn toolchains() -> Self {
        Self::new([TOOLCHAIN])
    }

    /// `{source}`
    pub fn sources() -> Self {
        Self::new([SOURCE])
    }

    /// `{toolchain, analyzer, board-image, emulator}`
    pub fn installable() -> Self {
        Self::new([TOOLCHAIN, ANALYZER, BOARD_IMAGE, EMULATOR])
    }

    /// Whether `category` is allowed
    pub fn contains(&self, category: &str) -> bool {
        self.0.contains(category)
    }

    /// Keep only packages whose category is allowed, preserving order
    pub fn retain(&self, packages: Vec<Package>) -> Vec<Package> {
        packages
            .into_iter()
            .filter(|p| self.contains(&p.category))
            .collect()
    }

    /// Iterate over the allowed categories
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CategorySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
