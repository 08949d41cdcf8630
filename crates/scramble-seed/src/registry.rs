//! event registry: which scramble generator serves an event, or
//! which subevents it is composed of
//!
//! the registry is static configuration; it can be loaded from json:
//!
//! ```json
//! {
//!   "333":   { "kind": "monoscramble" },
//!   "333oh": { "kind": "monoscramble", "generator": "333" },
//!   "333mbf": {
//!     "kind": "subevents",
//!     "subevents": [{ "event_id": "333bf" }]
//!   }
//! }
//! ```

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::salt::Salt;
use crate::{Error, Result};

/// event identifier such as `333` or `333oh`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// the event id used as a derivation salt
    pub fn to_salt(&self) -> Result<Salt> {
        self.0.parse()
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Borrow<str> for EventId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// one component of a composite event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubeventEntry {
    pub event_id: EventId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_number_of_scrambles: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventSpec {
    /// own generator, or the generator of another event
    Monoscramble {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        generator: Option<EventId>,
    },
    Subevents { subevents: Vec<SubeventEntry> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventRegistry {
    events: BTreeMap<EventId, EventSpec>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// the registry shipped with the crate
    pub fn builtin() -> Self {
        let own = || EventSpec::Monoscramble { generator: None };
        let fixed_one = |id: &str| SubeventEntry {
            event_id: id.into(),
            fixed_number_of_scrambles: Some(1),
        };

        let mut registry = Self::new();
        registry.insert("333".into(), own());
        registry.insert(
            "333oh".into(),
            EventSpec::Monoscramble {
                generator: Some("333".into()),
            },
        );
        registry.insert("333bf".into(), own());
        registry.insert(
            "333mbf".into(),
            EventSpec::Subevents {
                subevents: vec![SubeventEntry {
                    event_id: "333bf".into(),
                    fixed_number_of_scrambles: None,
                }],
            },
        );
        registry.insert(
            "unofficial-guildford".into(),
            EventSpec::Subevents {
                subevents: vec![
                    fixed_one("222"),
                    fixed_one("333"),
                    fixed_one("333oh"),
                    fixed_one("sq1"),
                ],
            },
        );
        registry
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let registry: Self = serde_json::from_str(json)?;
        for (id, spec) in &registry.events {
            if let EventSpec::Subevents { subevents } = spec {
                if subevents.is_empty() {
                    return Err(Error::Config(format!("event {} has no subevents", id)));
                }
            }
        }
        debug!(events = registry.events.len(), "event registry loaded");
        Ok(registry)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn insert(&mut self, id: EventId, spec: EventSpec) -> Option<EventSpec> {
        self.events.insert(id, spec)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.events.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Result<&EventSpec> {
        self.events
            .get(id)
            .ok_or_else(|| Error::UnknownEvent(id.to_owned()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EventId, &EventSpec)> {
        self.events.iter()
    }

    /// follow delegation until an event with its own generator
    pub fn generator_for(&self, id: &str) -> Result<&EventId> {
        let mut seen = BTreeSet::new();
        let (mut current, mut spec) = self
            .events
            .get_key_value(id)
            .ok_or_else(|| Error::UnknownEvent(id.to_owned()))?;

        loop {
            match spec {
                EventSpec::Monoscramble { generator: None } => return Ok(current),
                EventSpec::Monoscramble {
                    generator: Some(next),
                } => {
                    if !seen.insert(current) {
                        return Err(Error::DelegationCycle(current.to_string()));
                    }
                    (current, spec) = self
                        .events
                        .get_key_value(next.as_str())
                        .ok_or_else(|| Error::UnknownEvent(next.to_string()))?;
                }
                EventSpec::Subevents { .. } => {
                    return Err(Error::NotMonoscramble(current.to_string()))
                }
            }
        }
    }

    /// components of a composite event; empty for a monoscramble event
    pub fn subevents(&self, id: &str) -> Result<&[SubeventEntry]> {
        match self.get(id)? {
            EventSpec::Monoscramble { .. } => Ok(&[]),
            EventSpec::Subevents { subevents } => Ok(subevents.as_slice()),
        }
    }
}
