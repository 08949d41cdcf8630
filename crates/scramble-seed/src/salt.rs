//! salts and derivation paths
//!
//! a salt is a public, human-auditable ascii label (event id, round,
//! attempt, the literal "commitment", ...). a path is an ordered list of
//! salts, most general context first. its textual form is slash-separated:
//!
//! ```text
//! EBNLEND@.../scrambles/333/r1/g1/a1/333/sub1
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// separator of the textual path form
pub const PATH_SEPARATOR: char = '/';

/// check that every byte of a salt is 7-bit ascii
pub fn validate_salt(bytes: &[u8]) -> Result<()> {
    match bytes.iter().position(|&b| b > 0x7f) {
        Some(index) => Err(Error::NonAsciiSalt {
            index,
            byte: bytes[index],
        }),
        None => Ok(()),
    }
}

/// ascii context label mixed into one derivation step
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Salt(String);

impl Salt {
    /// build a salt from raw bytes; any length, ascii only
    pub fn new(bytes: impl AsRef<[u8]>) -> Result<Self> {
        let bytes = bytes.as_ref();
        validate_salt(bytes)?;
        Ok(Self(bytes.iter().map(|&b| char::from(b)).collect()))
    }

    /// caller guarantees `text` is ascii
    pub(crate) fn from_ascii(text: String) -> Self {
        debug_assert!(text.is_ascii());
        Self(text)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Salt {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Salt {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        validate_salt(s.as_bytes())?;
        Ok(Self(s))
    }
}

impl From<Salt> for String {
    fn from(salt: Salt) -> Self {
        salt.0
    }
}

impl AsRef<[u8]> for Salt {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ordered salts folded from a root seed down to a leaf seed
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DerivationPath(Vec<Salt>);

impl DerivationPath {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, salt: Salt) {
        self.0.push(salt);
    }

    /// builder form of [`DerivationPath::push`]
    pub fn with(mut self, salt: Salt) -> Self {
        self.0.push(salt);
        self
    }

    /// parse and append one textual label
    pub fn with_label(self, label: &str) -> Result<Self> {
        Ok(self.with(label.parse()?))
    }

    pub fn salts(&self) -> &[Salt] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Salt> {
        self.0.iter()
    }

    /// slash-separated form; fails if a salt cannot be represented
    pub fn to_text(&self) -> Result<String> {
        for salt in &self.0 {
            if salt.is_empty() {
                return Err(Error::EmptySalt);
            }
            if salt.as_str().contains(PATH_SEPARATOR) {
                return Err(Error::SaltContainsSeparator);
            }
        }
        let labels: Vec<&str> = self.0.iter().map(Salt::as_str).collect();
        Ok(labels.join("/"))
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    /// the empty string is the empty path
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(Self::new());
        }
        s.split(PATH_SEPARATOR)
            .map(|label| {
                if label.is_empty() {
                    Err(Error::EmptySalt)
                } else {
                    label.parse()
                }
            })
            .collect()
    }
}

impl From<Vec<Salt>> for DerivationPath {
    fn from(salts: Vec<Salt>) -> Self {
        Self(salts)
    }
}

impl FromIterator<Salt> for DerivationPath {
    fn from_iter<I: IntoIterator<Item = Salt>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DerivationPath {
    type Item = &'a Salt;
    type IntoIter = std::slice::Iter<'a, Salt>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
