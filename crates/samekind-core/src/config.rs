//! Per-type configuration records.
//!
//! A [`Configuration`] belongs to a host type, not to an instance: every
//! instance of the type reads the same record, so a change is visible to
//! existing and future instances alike. Records are obtained through
//! [`Traverse::configuration`], which by default consults the process-wide
//! registry in [`crate::registry`].

use std::any::{type_name, Any};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RewrapError, RewrapResult};
use crate::traverse::Traverse;

/// Builds a host instance from an ordered element sequence.
pub type Factory<H> = Arc<dyn Fn(Vec<<H as Traverse>::Item>) -> RewrapResult<H> + Send + Sync>;

// ---------------------------------------------------------------------------
// MapOp
// ---------------------------------------------------------------------------

/// The mapping operations whose output may be rewrapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapOp {
    /// `map` and its synonym `collect`.
    Map,
    /// `flat_map` and its synonym `collect_concat`.
    FlatMap,
}

impl MapOp {
    pub const ALL: [MapOp; 2] = [MapOp::Map, MapOp::FlatMap];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::FlatMap => "flat_map",
        }
    }
}

impl fmt::Display for MapOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapOp {
    type Err = RewrapError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "map" | "collect" => Ok(Self::Map),
            "flat_map" | "collect_concat" => Ok(Self::FlatMap),
            other => Err(RewrapError::Configuration(format!(
                "'{other}' is not a mapping operation (expected map, collect, flat_map or collect_concat)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// MappingGate
// ---------------------------------------------------------------------------

/// Predicate every mapped element must satisfy before the output is rewrapped.
///
/// Elements are offered as `&dyn Any` so the gate can test their runtime type.
#[derive(Clone)]
pub struct MappingGate(Arc<dyn Fn(&dyn Any) -> bool + Send + Sync>);

impl MappingGate {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&dyn Any) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    /// Accept only elements of type `T`.
    pub fn type_is<T: Any>() -> Self {
        Self::new(|value| value.is::<T>())
    }

    /// Accept any primitive integer or float.
    pub fn numeric() -> Self {
        Self::new(|value| {
            value.is::<i8>()
                || value.is::<i16>()
                || value.is::<i32>()
                || value.is::<i64>()
                || value.is::<i128>()
                || value.is::<isize>()
                || value.is::<u8>()
                || value.is::<u16>()
                || value.is::<u32>()
                || value.is::<u64>()
                || value.is::<u128>()
                || value.is::<usize>()
                || value.is::<f32>()
                || value.is::<f64>()
        })
    }

    pub fn allows(&self, value: &dyn Any) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for MappingGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MappingGate(..)")
    }
}

// ---------------------------------------------------------------------------
// MappingSettings
// ---------------------------------------------------------------------------

/// Serializable part of a mapping configuration.
///
/// ```toml
/// include = ["map"]
/// ```
///
/// An omitted `include` selects every mapping operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSettings {
    #[serde(default = "MappingSettings::all_names")]
    pub include: Vec<String>,
}

impl Default for MappingSettings {
    fn default() -> Self {
        Self {
            include: Self::all_names(),
        }
    }
}

impl MappingSettings {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_toml_str(source: &str) -> RewrapResult<Self> {
        toml::from_str(source).map_err(|e| RewrapError::Configuration(e.to_string()))
    }

    /// Validate the operation names.
    pub fn resolve(&self) -> RewrapResult<BTreeSet<MapOp>> {
        self.include.iter().map(|name| name.parse()).collect()
    }

    fn all_names() -> Vec<String> {
        MapOp::ALL.iter().map(|op| op.as_str().to_owned()).collect()
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct MappingState {
    rewrap: BTreeSet<MapOp>,
    gate: Option<MappingGate>,
}

/// Point-in-time view of a configuration record, for logging and tests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConfigSnapshot {
    pub host: &'static str,
    pub custom_factory: bool,
    pub rewrap: BTreeSet<MapOp>,
    pub gated: bool,
}

/// The configuration record of host type `H`.
pub struct Configuration<H: Traverse> {
    factory: RwLock<Option<Factory<H>>>,
    mapping: RwLock<MappingState>,
}

impl<H: Traverse> Default for Configuration<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Traverse> Configuration<H> {
    /// A fresh record: conventional constructor, no mapping rewrapped.
    pub fn new() -> Self {
        Self {
            factory: RwLock::new(None),
            mapping: RwLock::new(MappingState::default()),
        }
    }

    /// The factory used for reconstruction.
    pub fn factory(&self) -> Factory<H> {
        match self.factory.read().expect("factory lock poisoned").clone() {
            Some(custom) => custom,
            None => Arc::new(H::from_elements),
        }
    }

    /// Replace the factory for every instance of `H`.
    pub fn set_factory<F>(&self, factory: F)
    where
        F: Fn(Vec<H::Item>) -> RewrapResult<H> + Send + Sync + 'static,
    {
        *self.factory.write().expect("factory lock poisoned") = Some(Arc::new(factory));
        debug!(host = type_name::<H>(), "custom factory installed");
    }

    /// Go back to [`Traverse::from_elements`].
    pub fn reset_factory(&self) {
        *self.factory.write().expect("factory lock poisoned") = None;
        debug!(host = type_name::<H>(), "factory reset to conventional constructor");
    }

    /// Choose which mapping operations rewrap, and optionally gate them.
    ///
    /// Operations not named return plain sequences. Fails without changing
    /// anything if a name is not a mapping operation.
    pub fn configure_mapping<I, S>(&self, include: I, gate: Option<MappingGate>) -> RewrapResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rewrap = include
            .into_iter()
            .map(|name| name.as_ref().parse())
            .collect::<RewrapResult<BTreeSet<MapOp>>>()?;
        self.install_mapping(rewrap, gate);
        Ok(())
    }

    /// Apply deserialized settings, with an optional gate.
    pub fn apply_settings(
        &self,
        settings: &MappingSettings,
        gate: Option<MappingGate>,
    ) -> RewrapResult<()> {
        let rewrap = settings.resolve()?;
        self.install_mapping(rewrap, gate);
        Ok(())
    }

    /// Stop rewrapping every mapping operation and drop the gate.
    pub fn clear_mapping(&self) {
        self.install_mapping(BTreeSet::new(), None);
    }

    /// Whether `op` is currently configured to rewrap.
    pub fn rewraps(&self, op: MapOp) -> bool {
        self.mapping
            .read()
            .expect("mapping lock poisoned")
            .rewrap
            .contains(&op)
    }

    pub fn gate(&self) -> Option<MappingGate> {
        self.mapping.read().expect("mapping lock poisoned").gate.clone()
    }

    pub fn snapshot(&self) -> ConfigSnapshot {
        let mapping = self.mapping.read().expect("mapping lock poisoned");
        ConfigSnapshot {
            host: type_name::<H>(),
            custom_factory: self.factory.read().expect("factory lock poisoned").is_some(),
            rewrap: mapping.rewrap.clone(),
            gated: mapping.gate.is_some(),
        }
    }

    fn install_mapping(&self, rewrap: BTreeSet<MapOp>, gate: Option<MappingGate>) {
        debug!(
            host = type_name::<H>(),
            ops = ?rewrap,
            gated = gate.is_some(),
            "mapping configuration updated"
        );
        *self.mapping.write().expect("mapping lock poisoned") = MappingState { rewrap, gate };
    }
}

impl<H: Traverse> fmt::Debug for Configuration<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::Arg;
    use crate::traverse::Elements;

    struct Row(Vec<u8>);

    impl Traverse for Row {
        type Item = u8;

        fn traverse(&self, _args: &[Arg]) -> RewrapResult<Elements<'_, u8>> {
            Ok(Box::new(self.0.iter().copied()))
        }

        fn from_elements(elements: Vec<u8>) -> RewrapResult<Self> {
            Ok(Row(elements))
        }
    }

    #[test]
    fn fresh_record_uses_conventional_constructor() {
        let config = Configuration::<Row>::new();
        let row = (config.factory())(vec![1, 2]).unwrap();
        assert_eq!(row.0, vec![1, 2]);
        assert!(!config.snapshot().custom_factory);
        assert!(!config.rewraps(MapOp::Map));
        assert!(!config.rewraps(MapOp::FlatMap));
    }

    #[test]
    fn custom_factory_replaces_and_resets() {
        let config = Configuration::<Row>::new();
        config.set_factory(|mut v: Vec<u8>| {
            v.reverse();
            Ok(Row(v))
        });
        assert_eq!((config.factory())(vec![1, 2]).unwrap().0, vec![2, 1]);
        assert!(config.snapshot().custom_factory);

        config.reset_factory();
        assert_eq!((config.factory())(vec![1, 2]).unwrap().0, vec![1, 2]);
    }

    #[test]
    fn mapping_accepts_synonyms() {
        let config = Configuration::<Row>::new();
        config.configure_mapping(["collect"], None).unwrap();
        assert!(config.rewraps(MapOp::Map));
        assert!(!config.rewraps(MapOp::FlatMap));

        config.configure_mapping(["collect_concat"], Some(MappingGate::numeric())).unwrap();
        assert!(!config.rewraps(MapOp::Map));
        assert!(config.rewraps(MapOp::FlatMap));
        assert!(config.snapshot().gated);
    }

    #[test]
    fn invalid_mapping_name_leaves_record_unchanged() {
        let config = Configuration::<Row>::new();
        config.configure_mapping(["map"], None).unwrap();

        let err = config.configure_mapping(["map", "select"], None).unwrap_err();
        assert!(matches!(err, RewrapError::Configuration(_)));
        assert!(config.rewraps(MapOp::Map));
    }

    #[test]
    fn clear_mapping_drops_gate() {
        let config = Configuration::<Row>::new();
        config.configure_mapping(["map", "flat_map"], Some(MappingGate::numeric())).unwrap();
        config.clear_mapping();
        let snapshot = config.snapshot();
        assert!(snapshot.rewrap.is_empty());
        assert!(!snapshot.gated);
    }

    #[test]
    fn gates_check_runtime_type() {
        let numeric = MappingGate::numeric();
        assert!(numeric.allows(&-1i64));
        assert!(numeric.allows(&2.5f64));
        assert!(!numeric.allows(&"1".to_string()));

        let text = MappingGate::type_is::<String>();
        assert!(text.allows(&"a".to_string()));
        assert!(!text.allows(&1u8));
    }

    #[test]
    fn settings_from_toml() {
        let settings = MappingSettings::from_toml_str(r#"include = ["map"]"#).unwrap();
        assert_eq!(settings.resolve().unwrap(), BTreeSet::from([MapOp::Map]));

        let everything = MappingSettings::from_toml_str("").unwrap();
        assert_eq!(everything, MappingSettings::default());
        assert_eq!(everything.resolve().unwrap().len(), 2);

        let bad = MappingSettings::from_toml_str(r#"include = ["sort"]"#).unwrap();
        assert!(bad.resolve().is_err());

        assert!(MappingSettings::from_toml_str("include = 3").is_err());
    }

    #[test]
    fn apply_settings_installs_ops() {
        let config = Configuration::<Row>::new();
        config
            .apply_settings(&MappingSettings::only(["flat_map"]), None)
            .unwrap();
        assert!(config.rewraps(MapOp::FlatMap));
        assert!(!config.rewraps(MapOp::Map));
    }
}
