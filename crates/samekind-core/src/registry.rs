//! Process-wide table of configuration records, keyed by host type.
//!
//! Records are created on first access and live for the rest of the
//! process. Every lookup for the same type returns the same `Arc`.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};

use tracing::debug;

use crate::config::Configuration;
use crate::traverse::Traverse;

type Record = Arc<dyn Any + Send + Sync>;

static RECORDS: LazyLock<RwLock<HashMap<TypeId, Record>>> = LazyLock::new(Default::default);

/// The shared configuration record for `H`, created on first use.
pub fn configuration<H: Traverse>() -> Arc<Configuration<H>> {
    let id = TypeId::of::<H>();

    let existing = RECORDS
        .read()
        .expect("configuration registry poisoned")
        .get(&id)
        .cloned();
    let record = match existing {
        Some(record) => record,
        None => RECORDS
            .write()
            .expect("configuration registry poisoned")
            .entry(id)
            .or_insert_with(|| {
                debug!(host = type_name::<H>(), "configuration record created");
                let record: Record = Arc::new(Configuration::<H>::new());
                record
            })
            .clone(),
    };

    match record.downcast::<Configuration<H>>() {
        Ok(config) => config,
        Err(_) => unreachable!("registry entry for {} has a foreign type", type_name::<H>()),
    }
}

/// Whether `H` has a record in the registry.
pub fn contains<H: Traverse>() -> bool {
    RECORDS
        .read()
        .expect("configuration registry poisoned")
        .contains_key(&TypeId::of::<H>())
}

/// Number of host types that have a record.
pub fn registered() -> usize {
    RECORDS.read().expect("configuration registry poisoned").len()
}
