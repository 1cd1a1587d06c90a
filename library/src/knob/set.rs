//! Canonical per-node knob storage.

use std::collections::BTreeMap;

use log::debug;

use super::definition::{KnobDefinition, KnobPage, PageId};
use super::event::{KnobChangeEvent, TimeValue, ValueChangedReason, ViewSetSpec};
use super::KnobId;
use super::value::KnobValue;
use crate::error::LibraryError;

/// A knob instance: its definition plus the current value.
#[derive(Debug, Clone, PartialEq)]
pub struct Knob {
    pub definition: KnobDefinition,
    pub page: PageId,
    value: KnobValue,
}

impl Knob {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn value(&self) -> &KnobValue {
        &self.value
    }
}

/// Owns every knob and page of one node.
///
/// Other components refer to knobs through `KnobId` handles; lookups with a
/// handle that does not belong to this set return `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnobSet {
    knobs: Vec<Knob>,
    pages: Vec<KnobPage>,
}

impl KnobSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_page(&mut self, name: &str, label: &str) -> PageId {
        if let Some(index) = self.pages.iter().position(|p| p.name == name) {
            return PageId(index);
        }
        self.pages.push(KnobPage {
            name: name.to_string(),
            label: label.to_string(),
            knobs: Vec::new(),
        });
        PageId(self.pages.len() - 1)
    }

    pub fn add_knob(
        &mut self,
        page: PageId,
        definition: KnobDefinition,
    ) -> Result<KnobId, LibraryError> {
        if self.find(&definition.name).is_some() {
            return Err(LibraryError::knob(format!(
                "Knob '{}' already exists",
                definition.name
            )));
        }
        let Some(page_entry) = self.pages.get_mut(page.0) else {
            return Err(LibraryError::knob(format!("Page {} not found", page.0)));
        };

        let id = KnobId(self.knobs.len());
        page_entry.knobs.push(id);
        debug!(
            "KnobSet: added knob '{}' to page '{}'",
            definition.name, page_entry.name
        );
        self.knobs.push(Knob {
            value: definition.default_value.clone(),
            definition,
            page,
        });
        Ok(id)
    }

    pub fn find(&self, name: &str) -> Option<KnobId> {
        self.knobs
            .iter()
            .position(|k| k.definition.name == name)
            .map(KnobId)
    }

    pub fn get(&self, id: KnobId) -> Option<&Knob> {
        self.knobs.get(id.0)
    }

    pub fn value(&self, id: KnobId) -> Option<&KnobValue> {
        self.get(id).map(|k| &k.value)
    }

    pub fn get_bool(&self, id: KnobId) -> Option<bool> {
        self.value(id).and_then(|v| v.get_as::<bool>())
    }

    pub fn get_bool_by_name(&self, name: &str) -> Option<bool> {
        self.find(name).and_then(|id| self.get_bool(id))
    }

    pub fn pages(&self) -> &[KnobPage] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.knobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knobs.is_empty()
    }

    /// Store a new value and build the change event for it.
    pub fn set_value(
        &mut self,
        id: KnobId,
        value: KnobValue,
        reason: ValueChangedReason,
    ) -> Result<KnobChangeEvent, LibraryError> {
        self.set_value_with(id, value, reason, ViewSetSpec::All, TimeValue::default())
    }

    pub fn set_value_with(
        &mut self,
        id: KnobId,
        value: KnobValue,
        reason: ValueChangedReason,
        view: ViewSetSpec,
        time: TimeValue,
    ) -> Result<KnobChangeEvent, LibraryError> {
        let knob = self
            .knobs
            .get_mut(id.0)
            .ok_or_else(|| LibraryError::knob(format!("Knob {} not found", id.0)))?;

        if !knob.value.same_kind(&value) {
            return Err(LibraryError::knob(format!(
                "Knob '{}' holds a {} value, got {}",
                knob.definition.name,
                knob.value.kind_name(),
                value.kind_name()
            )));
        }

        knob.value = value.clone();
        Ok(KnobChangeEvent {
            knob: id,
            name: knob.definition.name.clone(),
            value,
            reason,
            view,
            time,
        })
    }

    /// Store a boolean without producing a change event.
    ///
    /// Returns the previous value, or `None` when the handle is stale or the
    /// knob is not boolean (nothing is written in that case).
    pub fn set_bool(&mut self, id: KnobId, value: bool) -> Option<bool> {
        let knob = self.knobs.get_mut(id.0)?;
        let previous = knob.value.get_as::<bool>()?;
        knob.value = KnobValue::Bool(value);
        Some(previous)
    }

    /// Silently restore a persisted value by internal name.
    pub fn restore(&mut self, name: &str, value: KnobValue) -> Result<(), LibraryError> {
        let id = self
            .find(name)
            .ok_or_else(|| LibraryError::knob(format!("Knob '{}' not found", name)))?;
        let knob = &mut self.knobs[id.0];
        if !knob.value.same_kind(&value) {
            return Err(LibraryError::knob(format!(
                "Cannot restore {} value into {} knob '{}'",
                value.kind_name(),
                knob.value.kind_name(),
                name
            )));
        }
        knob.value = value;
        Ok(())
    }

    /// Current values keyed by internal name.
    pub fn values(&self) -> BTreeMap<String, KnobValue> {
        self.knobs
            .iter()
            .map(|k| (k.definition.name.clone(), k.value.clone()))
            .collect()
    }
}
