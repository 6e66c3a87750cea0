//! Script registry.
//!
//! [`ScriptStore`] keeps every loaded [`ScriptSet`] behind an `Arc`, keyed by
//! name, so controllers bound to the same script share one copy. It is an ECS
//! resource for systems and can also be installed once as a process-wide
//! store with [`init_global_store`] for code that has no world at hand.

use std::error::Error;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use bevy_ecs::prelude::Resource;
use log::{info, warn};
use rustc_hash::FxHashMap;

use crate::action::loader::{load_script_sets, parse_script_sets};
use crate::action::script::ScriptSet;

static GLOBAL_STORE: OnceLock<ScriptStore> = OnceLock::new();

/// Loaded scripts keyed by name, in load order.
#[derive(Resource, Default, Debug, Clone)]
pub struct ScriptStore {
    scripts: FxHashMap<String, Arc<ScriptSet>>,
    order: Vec<String>,
}

impl ScriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every script set in a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let mut store = Self::new();
        store.extend(load_script_sets(path)?);
        Ok(store)
    }

    pub fn from_json_str(json: &str) -> Result<Self, Box<dyn Error>> {
        let mut store = Self::new();
        store.extend(parse_script_sets(json)?);
        Ok(store)
    }

    /// Add a script set. The first set registered under a name wins.
    ///
    /// Returns `false` (and drops `set`) if the name is already taken.
    pub fn insert(&mut self, set: ScriptSet) -> bool {
        if self.scripts.contains_key(set.name()) {
            warn!("Script list '{}' already loaded, duplicate ignored", set.name());
            return false;
        }
        let name = set.name().to_string();
        self.order.push(name.clone());
        self.scripts.insert(name, set.into_shared());
        true
    }

    pub fn extend(&mut self, sets: impl IntoIterator<Item = ScriptSet>) {
        for set in sets {
            self.insert(set);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<ScriptSet>> {
        self.scripts.get(name).cloned()
    }

    /// First script loaded, if any.
    pub fn first(&self) -> Option<Arc<ScriptSet>> {
        self.order.first().and_then(|name| self.get(name))
    }

    /// Script names in load order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Install the process-wide store.
///
/// Only the first call takes effect; later calls are logged and return
/// `false`.
pub fn init_global_store(store: ScriptStore) -> bool {
    let count = store.len();
    match GLOBAL_STORE.set(store) {
        Ok(()) => {
            info!("Global script store initialised with {} list(s)", count);
            true
        }
        Err(_) => {
            warn!("Global script store already initialised, new store dropped");
            false
        }
    }
}

/// The process-wide store, if [`init_global_store`] has run.
pub fn global_store() -> Option<&'static ScriptStore> {
    GLOBAL_STORE.get()
}
