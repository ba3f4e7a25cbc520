//! Identity → schema registry.
//!
//! Population happens once through a `RegistryBuilder`; `build()` freezes it
//! into an `OperatorRegistry` that has no way to register more operators.
//! `extend()` reopens a registry as a new builder for plugins.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use once_cell::sync::OnceCell;
use polyalg_core::error::{Error, Result};
use polyalg_core::hash::{fingerprint_serde, Fingerprint};
use polyalg_core::id::OperatorId;
use polyalg_core::schema::DataModel;
use serde_json::Value;

use crate::builtin;
use crate::declaration::{NodeCreator, OperatorSchema};
use crate::export::build_export;

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    by_identity: BTreeMap<OperatorId, OperatorSchema>,
    by_name: HashMap<String, OperatorId>,
    carried_export: Option<Value>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder pre-populated with the relational, document, graph and
    /// common operators.
    pub fn with_builtins() -> Self {
        let mut b = Self::new();
        builtin::register_builtins(&mut b);
        b
    }

    /// Panics if the identity, the op name or one of its aliases is taken.
    pub fn register(&mut self, identity: OperatorId, schema: OperatorSchema) -> &mut Self {
        if self.by_identity.contains_key(&identity) {
            panic!("operator {identity} is registered twice");
        }
        let names = std::iter::once(schema.op_name()).chain(schema.op_aliases().iter().map(String::as_str));
        for name in names {
            if let Some(owner) = self.by_name.get(name) {
                panic!("operator name '{name}' of {identity} is already used by {owner}");
            }
            self.by_name.insert(name.to_string(), identity.clone());
        }
        self.by_identity.insert(identity, schema);
        self
    }

    /// Attaches the node constructor an engine provides for `op_name` (or an alias).
    pub fn register_creator(&mut self, op_name: &str, creator: NodeCreator) -> Result<&mut Self> {
        let identity = self
            .by_name
            .get(op_name)
            .ok_or_else(|| Error::UnknownOperator(op_name.to_string()))?;
        let schema = self
            .by_identity
            .get_mut(identity)
            .ok_or_else(|| Error::Invariant(format!("{op_name} has a name but no schema")))?;
        schema.set_creator(creator);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.by_identity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_identity.is_empty()
    }

    pub fn build(self) -> OperatorRegistry {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            operators = self.by_identity.len(),
            names = self.by_name.len(),
            "operator registry frozen"
        );
        let export = OnceCell::new();
        if let Some(v) = self.carried_export {
            let _ = export.set(v);
        }
        OperatorRegistry {
            by_identity: self.by_identity,
            by_name: self.by_name,
            export,
        }
    }
}

#[derive(Debug)]
pub struct OperatorRegistry {
    by_identity: BTreeMap<OperatorId, OperatorSchema>,
    by_name: HashMap<String, OperatorId>,
    export: OnceCell<Value>,
}

static GLOBAL: OnceCell<OperatorRegistry> = OnceCell::new();

impl OperatorRegistry {
    /// Process-wide registry. Holds the built-ins unless `install_global`
    /// ran first.
    pub fn global() -> &'static OperatorRegistry {
        GLOBAL.get_or_init(|| RegistryBuilder::with_builtins().build())
    }

    /// Installs `registry` as the process-wide one. Fails (returning it) if
    /// `global()` was already initialized.
    pub fn install_global(registry: OperatorRegistry) -> std::result::Result<(), OperatorRegistry> {
        GLOBAL.set(registry)
    }

    /// Schema registered for `identity`, or a parameterless schema named
    /// after its simple name with the given model and arity.
    pub fn lookup_by_identity(
        &self,
        identity: &OperatorId,
        default_model: DataModel,
        arity: usize,
    ) -> Cow<'_, OperatorSchema> {
        match self.by_identity.get(identity) {
            Some(schema) => Cow::Borrowed(schema),
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(operator = %identity, "no PolyAlg schema registered; synthesizing one");
                Cow::Owned(OperatorSchema::synthesized(
                    identity.simple_name(),
                    default_model,
                    arity,
                ))
            }
        }
    }

    pub fn lookup_by_name(&self, name_or_alias: &str) -> Option<&OperatorId> {
        self.by_name.get(name_or_alias)
    }

    pub fn lookup_schema_by_name(&self, name_or_alias: &str) -> Option<&OperatorSchema> {
        self.by_identity.get(self.lookup_by_name(name_or_alias)?)
    }

    pub fn contains_name(&self, name_or_alias: &str) -> bool {
        self.by_name.contains_key(name_or_alias)
    }

    pub fn len(&self) -> usize {
        self.by_identity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_identity.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OperatorId, &OperatorSchema)> {
        self.by_identity.iter()
    }

    /// All names (canonical and aliases) with their identity.
    pub fn names(&self) -> impl Iterator<Item = (&str, &OperatorId)> {
        self.by_name.iter().map(|(n, id)| (n.as_str(), id))
    }

    /// JSON description of every declaration and enum, computed on first use.
    pub fn export_schema(&self) -> &Value {
        self.export.get_or_init(|| build_export(self))
    }

    pub fn export_fingerprint(&self) -> Result<Fingerprint> {
        fingerprint_serde(self.export_schema())
    }

    /// Reopens this registry for more registrations. An export computed
    /// before is carried over as-is and will not list operators added later.
    pub fn extend(self) -> RegistryBuilder {
        if self.export.get().is_some() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                operators = self.by_identity.len(),
                "reopening a registry whose schema export was already computed; the export stays as it is"
            );
        }
        RegistryBuilder {
            by_identity: self.by_identity,
            by_name: self.by_name,
            carried_export: self.export.into_inner(),
        }
    }
}
