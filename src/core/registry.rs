//! Reference registry - reusable catalogs of makes, models, colors, and
//! transport partners
//!
//! The registry is independent of the arrival store: deleting a catalog
//! entry never touches arrival records that reference it, so existing
//! arrivals keep their (now stale) descriptive strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::events::{DispatchEvent, EventKind};

/// Which catalog an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Make,
    Model,
    Color,
    Transporter,
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogKind::Make => write!(f, "make"),
            CatalogKind::Model => write!(f, "model"),
            CatalogKind::Color => write!(f, "color"),
            CatalogKind::Transporter => write!(f, "transporter"),
        }
    }
}

/// Errors that can occur during registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{kind} \"{name}\" already exists")]
    DuplicateName { kind: CatalogKind, name: String },

    #[error("unknown make \"{name}\"")]
    UnknownMake { name: String },
}

/// Case-insensitive membership test
fn contains_ci(list: &[String], name: &str) -> bool {
    list.iter().any(|entry| entry.eq_ignore_ascii_case(name))
}

/// Insert keeping the list sorted case-insensitively
fn insert_sorted(list: &mut Vec<String>, name: String) {
    let key = name.to_lowercase();
    let idx = list.partition_point(|entry| entry.to_lowercase() < key);
    list.insert(idx, name);
}

/// Case-insensitive substring match; an empty term matches everything
fn matches_term(value: &str, term: &str) -> bool {
    term.is_empty() || value.to_lowercase().contains(&term.to_lowercase())
}

/// Target of a pending catalog deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Make(String),
    Model { make: String, name: String },
    Color(String),
    Transporter(String),
}

impl DeleteTarget {
    pub fn kind(&self) -> CatalogKind {
        match self {
            DeleteTarget::Make(_) => CatalogKind::Make,
            DeleteTarget::Model { .. } => CatalogKind::Model,
            DeleteTarget::Color(_) => CatalogKind::Color,
            DeleteTarget::Transporter(_) => CatalogKind::Transporter,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DeleteTarget::Make(name)
            | DeleteTarget::Model { name, .. }
            | DeleteTarget::Color(name)
            | DeleteTarget::Transporter(name) => name,
        }
    }
}

/// A pending catalog deletion awaiting caller confirmation
///
/// The registry never deletes on its own: the caller requests a deletion,
/// renders the warning, and either applies the confirmation or drops it.
/// Dropping cancels with no side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    target: DeleteTarget,
    cascaded_models: usize,
}

impl DeleteConfirmation {
    pub fn target(&self) -> &DeleteTarget {
        &self.target
    }

    /// Warning text for the caller's confirmation prompt
    pub fn warning(&self) -> String {
        match &self.target {
            DeleteTarget::Make(name) => format!(
                "Delete make \"{}\"? All {} associated model(s) will be removed.",
                name, self.cascaded_models
            ),
            DeleteTarget::Model { make, name } => {
                format!("Delete model \"{}\" from make \"{}\"?", name, make)
            }
            DeleteTarget::Color(name) => format!("Delete color \"{}\"?", name),
            DeleteTarget::Transporter(name) => {
                format!("Delete transporter \"{}\"?", name)
            }
        }
    }

    /// Apply the deletion
    pub fn apply(self, registry: &mut ReferenceRegistry) -> DispatchEvent {
        registry.apply_delete(self.target)
    }
}

/// The four reference catalogs
///
/// Makes and per-make model lists are kept sorted; name uniqueness within
/// each catalog is case-insensitive. Catalogs share no constraints with
/// each other, so a color may legitimately carry the same name as a make.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceRegistry {
    makes: Vec<String>,
    models_by_make: BTreeMap<String, Vec<String>>,
    colors: Vec<String>,
    transporters: Vec<String>,
}

impl ReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn makes(&self) -> &[String] {
        &self.makes
    }

    /// Model list for a make, or None when the make is not in the catalog
    pub fn models(&self, make: &str) -> Option<&[String]> {
        let key = self.canonical_make(make)?;
        self.models_by_make.get(&key).map(|models| models.as_slice())
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn transporters(&self) -> &[String] {
        &self.transporters
    }

    /// Resolve the stored spelling of a make, matching case-insensitively
    fn canonical_make(&self, make: &str) -> Option<String> {
        self.makes
            .iter()
            .find(|entry| entry.eq_ignore_ascii_case(make))
            .cloned()
    }

    pub fn add_make(&mut self, name: impl Into<String>) -> Result<DispatchEvent, RegistryError> {
        let name = name.into();
        if contains_ci(&self.makes, &name) {
            return Err(RegistryError::DuplicateName {
                kind: CatalogKind::Make,
                name,
            });
        }
        insert_sorted(&mut self.makes, name.clone());
        self.models_by_make.insert(name.clone(), Vec::new());
        info!(make = %name, "make added to catalog");
        Ok(DispatchEvent::now(EventKind::CatalogEntryAdded {
            kind: CatalogKind::Make,
            name,
        }))
    }

    pub fn add_model(
        &mut self,
        make: &str,
        name: impl Into<String>,
    ) -> Result<DispatchEvent, RegistryError> {
        let name = name.into();
        let key = self
            .canonical_make(make)
            .ok_or_else(|| RegistryError::UnknownMake {
                name: make.to_string(),
            })?;

        let models = self.models_by_make.entry(key).or_default();
        if contains_ci(models, &name) {
            return Err(RegistryError::DuplicateName {
                kind: CatalogKind::Model,
                name,
            });
        }
        insert_sorted(models, name.clone());
        info!(make = %make, model = %name, "model added to catalog");
        Ok(DispatchEvent::now(EventKind::CatalogEntryAdded {
            kind: CatalogKind::Model,
            name,
        }))
    }

    pub fn add_color(&mut self, name: impl Into<String>) -> Result<DispatchEvent, RegistryError> {
        let name = name.into();
        if contains_ci(&self.colors, &name) {
            return Err(RegistryError::DuplicateName {
                kind: CatalogKind::Color,
                name,
            });
        }
        insert_sorted(&mut self.colors, name.clone());
        info!(color = %name, "color added to catalog");
        Ok(DispatchEvent::now(EventKind::CatalogEntryAdded {
            kind: CatalogKind::Color,
            name,
        }))
    }

    pub fn add_transporter(
        &mut self,
        name: impl Into<String>,
    ) -> Result<DispatchEvent, RegistryError> {
        let name = name.into();
        if contains_ci(&self.transporters, &name) {
            return Err(RegistryError::DuplicateName {
                kind: CatalogKind::Transporter,
                name,
            });
        }
        insert_sorted(&mut self.transporters, name.clone());
        info!(transporter = %name, "transporter added to catalog");
        Ok(DispatchEvent::now(EventKind::CatalogEntryAdded {
            kind: CatalogKind::Transporter,
            name,
        }))
    }

    /// Start a deletion; the caller must apply the returned confirmation
    /// for anything to change
    pub fn request_delete(&self, target: DeleteTarget) -> DeleteConfirmation {
        let cascaded_models = match &target {
            DeleteTarget::Make(name) => self
                .models(name)
                .map(|models| models.len())
                .unwrap_or_default(),
            _ => 0,
        };
        DeleteConfirmation {
            target,
            cascaded_models,
        }
    }

    /// Remove the target from its catalog
    ///
    /// Removal of a name that is no longer present is a no-op; arrivals
    /// referencing the deleted entry are deliberately left untouched.
    fn apply_delete(&mut self, target: DeleteTarget) -> DispatchEvent {
        let kind = target.kind();
        let name = target.name().to_string();
        let mut cascaded_models = 0;

        match &target {
            DeleteTarget::Make(make) => {
                if let Some(key) = self.canonical_make(make) {
                    self.makes.retain(|entry| !entry.eq_ignore_ascii_case(make));
                    cascaded_models = self
                        .models_by_make
                        .remove(&key)
                        .map(|models| models.len())
                        .unwrap_or_default();
                }
            }
            DeleteTarget::Model { make, name } => {
                if let Some(key) = self.canonical_make(make) {
                    if let Some(models) = self.models_by_make.get_mut(&key) {
                        models.retain(|entry| !entry.eq_ignore_ascii_case(name));
                    }
                }
            }
            DeleteTarget::Color(color) => {
                self.colors.retain(|entry| !entry.eq_ignore_ascii_case(color));
            }
            DeleteTarget::Transporter(transporter) => {
                self.transporters
                    .retain(|entry| !entry.eq_ignore_ascii_case(transporter));
            }
        }

        info!(kind = %kind, name = %name, cascaded_models, "catalog entry removed");
        DispatchEvent::now(EventKind::CatalogEntryRemoved {
            kind,
            name,
            cascaded_models,
        })
    }

    /// Makes matching a search term
    ///
    /// A make is included when its own name matches or when any of its
    /// models matches.
    pub fn filter_makes(&self, term: &str) -> Vec<&str> {
        self.makes
            .iter()
            .filter(|make| {
                matches_term(make, term)
                    || self
                        .models_by_make
                        .get(*make)
                        .is_some_and(|models| models.iter().any(|m| matches_term(m, term)))
            })
            .map(|make| make.as_str())
            .collect()
    }

    /// Models of a make matching a search term
    pub fn filter_models(&self, make: &str, term: &str) -> Vec<&str> {
        self.models(make)
            .map(|models| {
                models
                    .iter()
                    .filter(|model| matches_term(model, term))
                    .map(|model| model.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn filter_colors(&self, term: &str) -> Vec<&str> {
        self.colors
            .iter()
            .filter(|color| matches_term(color, term))
            .map(|color| color.as_str())
            .collect()
    }

    pub fn filter_transporters(&self, term: &str) -> Vec<&str> {
        self.transporters
            .iter()
            .filter(|transporter| matches_term(transporter, term))
            .map(|transporter| transporter.as_str())
            .collect()
    }
}
