use std::{fmt, ops, str::FromStr};

use smallvec::SmallVec;

use crate::error::Error;

/// Rendering behaviors requested by a caller, as a bitmask.
///
/// Bits a converter does not understand are carried along untouched and
/// simply never read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ConverterOptions(u32);

impl ConverterOptions {
    pub const NONE: Self = Self(0);
    pub const NO_SMARTYPANTS: Self = Self(1 << 0);
    pub const NO_SUPERSCRIPT: Self = Self(1 << 1);
    pub const NO_TABLES: Self = Self(1 << 2);
    pub const NO_STRIKETHROUGH: Self = Self(1 << 3);
    pub const AUTOLINK: Self = Self(1 << 4);
    pub const EXTRA_FOOTNOTES: Self = Self(1 << 5);
    pub const NO_HTML: Self = Self(1 << 6);
    pub const NO_IMAGES: Self = Self(1 << 7);
    pub const NO_LINKS: Self = Self(1 << 8);
    pub const TABLE_OF_CONTENTS: Self = Self(1 << 9);
    pub const NO_STYLES: Self = Self(1 << 10);

    const NAMED: [(&'static str, Self); 11] = [
        ("no-smartypants", Self::NO_SMARTYPANTS),
        ("no-superscript", Self::NO_SUPERSCRIPT),
        ("no-tables", Self::NO_TABLES),
        ("no-strikethrough", Self::NO_STRIKETHROUGH),
        ("autolink", Self::AUTOLINK),
        ("footnotes", Self::EXTRA_FOOTNOTES),
        ("no-html", Self::NO_HTML),
        ("no-images", Self::NO_IMAGES),
        ("no-links", Self::NO_LINKS),
        ("toc", Self::TABLE_OF_CONTENTS),
        ("no-styles", Self::NO_STYLES),
    ];

    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Named flags set in `self`, in declaration order.
    pub fn iter_names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(_, flag)| self.contains(*flag))
            .map(|(name, _)| name)
    }
}

impl ops::BitOr for ConverterOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl ops::BitOrAssign for ConverterOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl ops::BitAnd for ConverterOptions {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl fmt::Display for ConverterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.iter_names().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

/// Parses a comma-separated list of flag names, e.g. `no-html,toc`.
impl FromStr for ConverterOptions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .try_fold(Self::NONE, |acc, name| {
                Self::NAMED
                    .iter()
                    .find_map(|(n, flag)| (*n == name).then_some(acc | *flag))
                    .ok_or_else(|| Error::UnknownOption(name.to_owned()))
            })
    }
}

/// Flat set of named toggles handed to the markdown library's constructors.
///
/// Iteration follows insertion order; setting a name twice keeps the first
/// position and the last value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionMapping(SmallVec<[(&'static str, bool); 8]>);

impl OptionMapping {
    #[must_use]
    pub const fn new() -> Self {
        Self(SmallVec::new_const())
    }

    #[must_use]
    pub fn with(mut self, name: &'static str, value: bool) -> Self {
        if let Some(entry) = self.0.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.0.push((name, value));
        }
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        self.0.iter().find_map(|(n, v)| (*n == name).then_some(*v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(&'static str, bool)> for OptionMapping {
    fn from_iter<T: IntoIterator<Item = (&'static str, bool)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |mapping, (name, value)| mapping.with(name, value))
    }
}

/// `name: value` pairs joined with `, `.
impl fmt::Display for OptionMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}
