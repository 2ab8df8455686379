//! Incident type selection.
//!
//! Which kind of incident a dispatched point turns out to be is decided
//! outside the dispatch core. The engine asks its `IncidentTypeSelector`
//! once per `dispatch_next()`; the default draws uniformly from the catalog.

use crate::{config::IncidentCatalog, rng::StreamRng};

/// The contract every incident type selector must fulfill.
pub trait IncidentTypeSelector: Send {
    /// Unique stable name for this selector.
    fn name(&self) -> &'static str;

    /// Pick a type name for the next dispatch.
    ///
    /// - `catalog`: the engine's read-only incident catalog (never empty)
    /// - `rng`:     the engine's incident-type stream
    ///
    /// A name missing from the catalog makes the dispatch fail with
    /// `UnknownIncidentType`.
    fn select(&mut self, catalog: &IncidentCatalog, rng: &mut StreamRng) -> String;
}

/// Uniform draw over the catalog.
#[derive(Debug, Default)]
pub struct UniformTypeSelector;

impl IncidentTypeSelector for UniformTypeSelector {
    fn name(&self) -> &'static str {
        "uniform"
    }

    fn select(&mut self, catalog: &IncidentCatalog, rng: &mut StreamRng) -> String {
        let index = rng.next_u64_below(catalog.len() as u64) as usize;
        catalog
            .by_index(index)
            .map(|t| t.name.clone())
            .unwrap_or_default()
    }
}

/// Always the same type. Handy for scripted scenarios.
#[derive(Debug, Clone)]
pub struct FixedTypeSelector(pub String);

impl IncidentTypeSelector for FixedTypeSelector {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn select(&mut self, _catalog: &IncidentCatalog, _rng: &mut StreamRng) -> String {
        self.0.clone()
    }
}
