//! Attribute-style views over relations, contexts and charm options.
//!
//! Templates and charm code read relation data through a
//! [`RelationAdapter`], whose accessor table is built once from the
//! properties the underlying [`RelationInterface`] advertises. Accessors read
//! the interface on every call, so values are never stale. A
//! [`RelationAdapters`] collection groups the adapters of every relation the
//! charm knows about together with raw contexts and the charm's options.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use charmkit_config::ConfigValue;
use tracing::debug;

use crate::host::{ConfigStore, RelationData};

const ADAPTERS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::adapters");

/// Name under which the charm options appear in a [`RelationAdapters`].
pub const OPTIONS_NAME: &str = "options";

/// Converts a host-style name (`shared-db`) into an attribute-style one
/// (`shared_db`).
#[must_use]
pub fn normalise_name(name: &str) -> String {
    name.replace('-', "_")
}

/// A relation endpoint exposing named properties.
pub trait RelationInterface {
    /// Endpoint the relation was established on.
    fn endpoint_name(&self) -> &str;

    /// Names of the properties the interface provides.
    fn property_names(&self) -> Vec<String>;

    /// Current value of a property, or `None` when it is not yet available.
    fn property(&self, name: &str) -> Option<String>;
}

/// Reads one value from a relation interface.
pub type Accessor = Box<dyn Fn(&dyn RelationInterface) -> Option<String>>;

/// Builds an adapter for a relation on a particular endpoint.
pub type AdapterFactory = Box<dyn Fn(Rc<dyn RelationInterface>) -> RelationAdapter>;

/// Accessor table over a single relation.
pub struct RelationAdapter {
    relation: Rc<dyn RelationInterface>,
    accessors: BTreeMap<String, Accessor>,
}

impl RelationAdapter {
    /// Builds an adapter exposing every advertised property of `relation`.
    #[must_use]
    pub fn new(relation: Rc<dyn RelationInterface>) -> Self {
        let accessors = relation
            .property_names()
            .into_iter()
            .map(|name| {
                let key = name.clone();
                let accessor: Accessor =
                    Box::new(move |iface: &dyn RelationInterface| iface.property(&key));
                (name, accessor)
            })
            .collect();
        Self {
            relation,
            accessors,
        }
    }

    /// Adds or replaces a derived accessor.
    #[must_use]
    pub fn with_accessor<F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&dyn RelationInterface) -> Option<String> + 'static,
    {
        self.accessors.insert(name.into(), Box::new(accessor));
        self
    }

    /// Endpoint of the wrapped relation.
    #[must_use]
    pub fn endpoint_name(&self) -> &str {
        self.relation.endpoint_name()
    }

    /// Reads an accessor. Unknown names and unavailable values both yield
    /// `None`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.accessors
            .get(name)
            .and_then(|accessor| accessor(self.relation.as_ref()))
    }

    /// Returns `true` when an accessor with this name exists.
    #[must_use]
    pub fn has_accessor(&self, name: &str) -> bool {
        self.accessors.contains_key(name)
    }

    /// Accessor names in name order.
    pub fn accessor_names(&self) -> impl Iterator<Item = &str> {
        self.accessors.keys().map(String::as_str)
    }

    /// Reads every accessor that currently has a value.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.accessors
            .iter()
            .filter_map(|(name, accessor)| {
                accessor(self.relation.as_ref()).map(|value| (name.clone(), value))
            })
            .collect()
    }
}

impl fmt::Debug for RelationAdapter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RelationAdapter")
            .field("endpoint", &self.endpoint_name())
            .field("accessors", &self.accessors.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Snapshot of the charm's options with `-` in names replaced by `_`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationAdapter {
    options: BTreeMap<String, ConfigValue>,
}

impl ConfigurationAdapter {
    /// Copies every option currently set in `config`.
    #[must_use]
    pub fn new(config: &dyn ConfigStore) -> Self {
        let options = config
            .keys()
            .into_iter()
            .filter_map(|key| {
                config
                    .get(&key)
                    .map(|value| (normalise_name(&key), value))
            })
            .collect();
        Self { options }
    }

    /// Value of an option, by its normalised name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.options.get(name)
    }

    /// Options in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.options
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Number of options captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns `true` when no options were set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// One named member of a [`RelationAdapters`] collection.
#[derive(Debug, Clone, Copy)]
pub enum AdapterEntry<'a> {
    /// A relation wrapped in an adapter.
    Relation(&'a RelationAdapter),
    /// A raw context.
    Context(&'a RelationData),
    /// The charm options.
    Options(&'a ConfigurationAdapter),
}

/// Everything a charm renders its templates from, keyed by normalised name.
///
/// Custom adapter factories must be registered before the relations they
/// apply to are added; other relations get a plain [`RelationAdapter`].
pub struct RelationAdapters {
    factories: BTreeMap<String, AdapterFactory>,
    relations: BTreeMap<String, RelationAdapter>,
    contexts: BTreeMap<String, RelationData>,
    options: ConfigurationAdapter,
}

impl RelationAdapters {
    /// Creates a collection holding only the charm options.
    #[must_use]
    pub fn new(options: ConfigurationAdapter) -> Self {
        Self {
            factories: BTreeMap::new(),
            relations: BTreeMap::new(),
            contexts: BTreeMap::new(),
            options,
        }
    }

    /// Registers a custom adapter factory for an endpoint.
    #[must_use]
    pub fn with_factory<F>(mut self, endpoint: &str, factory: F) -> Self
    where
        F: Fn(Rc<dyn RelationInterface>) -> RelationAdapter + 'static,
    {
        self.factories
            .insert(normalise_name(endpoint), Box::new(factory));
        self
    }

    /// Wraps a relation and stores it under its normalised endpoint name,
    /// returning that name.
    pub fn add_relation(&mut self, relation: Rc<dyn RelationInterface>) -> String {
        let name = normalise_name(relation.endpoint_name());
        let adapter = self.factories.get(&name).map_or_else(
            || RelationAdapter::new(Rc::clone(&relation)),
            |factory| factory(Rc::clone(&relation)),
        );
        debug!(
            target: ADAPTERS_TARGET,
            event = "relation_adapted",
            relation = %name,
            custom = self.factories.contains_key(&name),
            "relation adapter created"
        );
        self.relations.insert(name.clone(), adapter);
        name
    }

    /// Wraps every relation in `relations`.
    pub fn add_relations<I>(&mut self, relations: I)
    where
        I: IntoIterator<Item = Rc<dyn RelationInterface>>,
    {
        for relation in relations {
            self.add_relation(relation);
        }
    }

    /// Stores a raw context under `name`.
    pub fn add_context(&mut self, name: impl Into<String>, context: RelationData) {
        self.contexts.insert(name.into(), context);
    }

    /// Adapter of a relation, by normalised endpoint name.
    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&RelationAdapter> {
        self.relations.get(name)
    }

    /// A raw context, by name.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&RelationData> {
        self.contexts.get(name)
    }

    /// The charm options.
    #[must_use]
    pub const fn options(&self) -> &ConfigurationAdapter {
        &self.options
    }

    /// Looks up any member by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<AdapterEntry<'_>> {
        if name == OPTIONS_NAME {
            return Some(AdapterEntry::Options(&self.options));
        }
        self.relations
            .get(name)
            .map(AdapterEntry::Relation)
            .or_else(|| self.contexts.get(name).map(AdapterEntry::Context))
    }

    /// Every relation, context and the options, in name order.
    ///
    /// Each name appears once and resolves to the member [`Self::get`]
    /// returns for it.
    #[must_use]
    pub fn entries(&self) -> Vec<(&str, AdapterEntry<'_>)> {
        let mut entries: BTreeMap<&str, AdapterEntry<'_>> = self
            .contexts
            .iter()
            .map(|(name, context)| (name.as_str(), AdapterEntry::Context(context)))
            .collect();
        entries.extend(
            self.relations
                .iter()
                .map(|(name, adapter)| (name.as_str(), AdapterEntry::Relation(adapter))),
        );
        entries.insert(OPTIONS_NAME, AdapterEntry::Options(&self.options));
        entries.into_iter().collect()
    }
}

impl fmt::Debug for RelationAdapters {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RelationAdapters")
            .field("relations", &self.relations)
            .field("contexts", &self.contexts)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
