//! Ordered set of triggers known to the channel.
//!
//! Built once at startup and read-only afterwards; safe to share behind an
//! `Arc` without locking.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::naming::display_name;
use crate::trigger::{Fields, Trigger};

/// A feed as shown on the human-facing listing page.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub display_name: String,
    pub slug: String,
    pub fields: Fields,
}

pub struct TriggerRegistry {
    triggers: Vec<Arc<dyn Trigger>>,
    by_slug: HashMap<String, usize>,
}

impl TriggerRegistry {
    /// Build the registry, rejecting unusable or colliding slugs and
    /// colliding trigger names (the self-test keys).
    pub fn new(triggers: Vec<Arc<dyn Trigger>>) -> Result<Self, RegistryError> {
        let mut by_slug = HashMap::with_capacity(triggers.len());
        let mut by_name: HashMap<String, usize> = HashMap::with_capacity(triggers.len());

        for (idx, trigger) in triggers.iter().enumerate() {
            let slug = trigger.slug();
            if slug.is_empty() || slug.contains('/') {
                return Err(RegistryError::InvalidSlug {
                    trigger: trigger.name().to_string(),
                    slug,
                });
            }
            if let Some(&prev) = by_slug.get(&slug) {
                let first: &Arc<dyn Trigger> = &triggers[prev];
                return Err(RegistryError::DuplicateSlug {
                    slug,
                    first: first.name().to_string(),
                    second: trigger.name().to_string(),
                });
            }
            let name = trigger.trigger_name();
            if let Some(&prev) = by_name.get(&name) {
                return Err(RegistryError::DuplicateName {
                    name,
                    first: triggers[prev].name().to_string(),
                    second: trigger.name().to_string(),
                });
            }
            by_slug.insert(slug, idx);
            by_name.insert(name, idx);
        }

        Ok(Self { triggers, by_slug })
    }

    pub fn get(&self, slug: &str) -> Option<&Arc<dyn Trigger>> {
        self.by_slug.get(slug).map(|&idx| &self.triggers[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Trigger>> {
        self.triggers.iter()
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Self-test samples keyed by trigger name; triggers without fields are omitted.
    pub fn samples(&self) -> Fields {
        self.triggers
            .iter()
            .filter(|t| !t.default_fields().is_empty())
            .map(|t| {
                (
                    t.trigger_name(),
                    serde_json::Value::Object(t.default_fields().clone()),
                )
            })
            .collect()
    }

    /// Listing entries in registration order; triggers without fields are omitted.
    pub fn feeds(&self) -> Vec<FeedEntry> {
        self.triggers
            .iter()
            .filter(|t| !t.default_fields().is_empty())
            .map(|t| FeedEntry {
                display_name: display_name(&t.trigger_name()),
                slug: t.slug(),
                fields: t.default_fields().clone(),
            })
            .collect()
    }
}
