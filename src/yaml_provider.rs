use anyhow::Result;
use serde::Serialize;

pub use serde_yaml::Value as YamlValue;

/// Renders a YAML value tree to text. The writer goes through this seam so
/// serialization can be swapped out in tests.
pub trait YamlProvider: Send + Sync {
    fn dump_value(&self, value: &YamlValue) -> Result<String>;
}

/// Block-style output from `serde_yaml`, non-ASCII emitted literally.
pub struct SerdeYamlProvider;

impl YamlProvider for SerdeYamlProvider {
    fn dump_value(&self, value: &YamlValue) -> Result<String> {
        Ok(serde_yaml::to_string(value)?)
    }
}

static DEFAULT_PROVIDER: SerdeYamlProvider = SerdeYamlProvider;

pub fn provider() -> &'static dyn YamlProvider {
    &DEFAULT_PROVIDER
}

pub fn to_value<T: Serialize>(value: &T) -> Result<YamlValue> {
    Ok(serde_yaml::to_value(value)?)
}
