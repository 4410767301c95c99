use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::providers::Serialized;
use figment::value::{Dict, Value};
use figment::{Figment, Provider};
use serde::de::DeserializeOwned;

/// A flat mapping of option name to value.
pub type Options = Dict;

/// Build [`Options`] from `(name, value)` pairs.
///
/// ```rust
/// use filemeta_config::options;
///
/// let defaults = options([("raster_dpi", 90u32)]);
/// assert!(defaults.contains_key("raster_dpi"));
/// ```
pub fn options<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Options
where
    K: Into<String>,
    V: Into<Value>,
{
    pairs.into_iter().map(|(key, value)| (key.into(), value.into())).collect()
}

/// An ordered stack of option layers; later layers win.
///
/// # Examples
///
/// ```rust
/// use filemeta_config::{Layered, options};
///
/// let config = Layered::new()
///     .layer(&options([("sniff_bytes", 8192u64), ("raster_dpi", 72u64)]))
///     .layer(&options([("raster_dpi", 90u64)]));
///
/// assert_eq!(config.get::<u64>("sniff_bytes").unwrap(), 8192);
/// assert_eq!(config.get::<u64>("raster_dpi").unwrap(), 90);
/// assert!(config.get::<u64>("missing").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct Layered {
    figment: Figment,
}
impl Default for Layered {
    fn default() -> Self {
        Self::new()
    }
}
impl Layered {
    pub fn new() -> Self {
        Self { figment: Figment::new() }
    }

    /// Push a layer of options on top of the existing ones.
    #[must_use]
    pub fn layer(self, options: &Options) -> Self {
        self.provider(Serialized::defaults(options))
    }

    /// Push any [`figment`] provider as a layer.
    #[must_use]
    pub fn provider(self, provider: impl Provider) -> Self {
        Self { figment: self.figment.merge(provider) }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.figment.contains(key)
    }

    /// Resolve `key` through every layer.
    ///
    /// # Errors
    ///
    /// - [`UnknownKey`](ErrorKind::UnknownKey) if no layer defines `key`.
    /// - [`InvalidValue`](ErrorKind::InvalidValue) if the winning value can't
    ///   be deserialized into `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        if !self.contains(key) {
            exn::bail!(ErrorKind::UnknownKey(key.to_string()));
        }
        self.figment.extract_inner::<T>(key).or_raise(|| ErrorKind::InvalidValue(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    // Three layers standing in for a general → intermediate → specific chain.
    #[fixture]
    fn chain() -> Layered {
        Layered::new()
            .layer(&options([("only_general", "a"), ("shared", "a"), ("general_and_middle", "a")]))
            .layer(&options([("general_and_middle", "b"), ("only_middle", "b")]))
            .layer(&options([("shared", "c")]))
    }

    #[rstest]
    #[case("only_general", "a")]
    #[case("only_middle", "b")]
    #[case("general_and_middle", "b")]
    #[case("shared", "c")]
    fn test_most_specific_wins(chain: Layered, #[case] key: &str, #[case] expected: &str) {
        assert_eq!(chain.get::<String>(key).unwrap(), expected);
    }

    #[rstest]
    fn test_call_override_wins_over_every_layer(chain: Layered) {
        let config = chain.layer(&options([("shared", "call"), ("only_general", "call")]));
        assert_eq!(config.get::<String>("shared").unwrap(), "call");
        assert_eq!(config.get::<String>("only_general").unwrap(), "call");
        assert_eq!(config.get::<String>("only_middle").unwrap(), "b");
    }

    #[rstest]
    fn test_unknown_key(chain: Layered) {
        let err = chain.get::<String>("nope").unwrap_err();
        assert_eq!(*err, ErrorKind::UnknownKey("nope".to_string()));
    }

    #[test]
    fn test_invalid_value() {
        let config = Layered::new().layer(&options([("max_decompressed_size", "lots")]));
        let err = config.get::<u64>("max_decompressed_size").unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidValue("max_decompressed_size".to_string()));
    }

    #[test]
    fn test_empty_layer_changes_nothing() {
        let config = Layered::new().layer(&options([("facial_landmarks", true)])).layer(&Options::new());
        assert!(config.get::<bool>("facial_landmarks").unwrap());
    }
}
