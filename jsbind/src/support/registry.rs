///
/// External Reference Registry
///
/// One registry lives for one compilation unit. It hands out exactly one
/// local identifier per distinct external reference (library, stable
/// name, operator id) and per pooled global property. Lookups and inserts
/// happen under one lock, so two racing requests for an unseen reference
/// still produce a single identifier.
///
/// At the end of the unit, `imports` turns the recorded references into
/// the `import` and `const` declarations the module needs.
///

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::BackendConfig;
use crate::js::{JsIdentifierName, NameAllocator, Statement};
use crate::source::Span;

use super::{ExternalReference, LibraryId, PropertyReference, Requirement, TypeReference};

#[derive(Debug, Default)]
struct RegistryState {
    references: IndexMap<ExternalReference, JsIdentifierName>,
    properties: IndexMap<PropertyReference, JsIdentifierName>,
}

#[derive(Debug, Default)]
pub struct ExternalReferenceRegistry {
    names: NameAllocator,
    state: Mutex<RegistryState>,
}

impl ExternalReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The unit's fresh-name allocator.
    pub fn names(&self) -> &NameAllocator {
        &self.names
    }

    pub fn require(&self, reference: &ExternalReference) -> JsIdentifierName {
        let mut state = self.state.lock();
        if let Some(name) = state.references.get(reference) {
            trace!(stable_name = %reference.stable_name, local = %name, "reference hit");
            return name.clone();
        }
        let name = self.names.fresh(reference.stable_name.as_str());
        debug!(
            library = %reference.library,
            stable_name = %reference.stable_name,
            local = %name,
            "allocated external reference"
        );
        state.references.insert(reference.clone(), name.clone());
        name
    }

    pub fn require_type(&self, reference: &TypeReference) -> JsIdentifierName {
        match reference {
            TypeReference::Global(name) => name.clone(),
            TypeReference::External(reference) => self.require(reference),
        }
    }

    pub fn require_property(&self, property: &PropertyReference) -> JsIdentifierName {
        let mut state = self.state.lock();
        if let Some(name) = state.properties.get(property) {
            trace!(object = property.object, property = property.property, local = %name, "property hit");
            return name.clone();
        }
        let name = self.names.fresh(property.property);
        debug!(object = property.object, property = property.property, local = %name, "pooled property");
        state.properties.insert(*property, name.clone());
        name
    }

    pub fn satisfy(&self, requirement: &Requirement) -> JsIdentifierName {
        match requirement {
            Requirement::Property(property) => self.require_property(property),
            Requirement::Reference(reference) => self.require(reference),
        }
    }

    pub fn len(&self) -> usize {
        let state = self.state.lock();
        state.references.len() + state.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// References in first-request order.
    pub fn references(&self) -> Vec<(ExternalReference, JsIdentifierName)> {
        let state = self.state.lock();
        state.references.iter().map(|(r, n)| (r.clone(), n.clone())).collect()
    }

    /// Import declarations grouped by library, then pooled property constants.
    pub fn imports(&self, config: &BackendConfig) -> Vec<Statement> {
        let state = self.state.lock();

        let mut by_library: IndexMap<LibraryId, Vec<(JsIdentifierName, JsIdentifierName)>> =
            IndexMap::new();
        for (reference, local) in &state.references {
            let bindings = by_library.entry(reference.library).or_default();
            let binding = (reference.stable_name.clone(), local.clone());
            if !bindings.contains(&binding) {
                bindings.push(binding);
            }
        }

        let mut statements: Vec<Statement> = by_library
            .into_iter()
            .map(|(library, bindings)| Statement::Import {
                specifier: config.specifier(library).to_string(),
                bindings,
            })
            .collect();

        for (property, local) in &state.properties {
            statements.push(Statement::Const {
                span: Span::dummy(),
                name: local.clone(),
                value: property.to_expr(Span::dummy()),
            });
        }
        statements
    }
}
