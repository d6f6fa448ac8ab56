//! Extension protocol (BEP 10) message ids negotiated with one peer.
use hashbrown::HashMap;

/// Name of the metadata exchange extension (BEP 9).
pub const UT_METADATA: &str = "ut_metadata";

/// Name of the peer exchange extension (BEP 11).
pub const UT_PEX: &str = "ut_pex";

/// Mapping of extension names to the ids the peer announced in the `m`
/// dictionary of its extended handshake.
///
/// The id `0` means the extension is not supported, so it is never stored.
#[derive(Debug, Clone, Default)]
pub struct ExtensionIds {
    ids: HashMap<String, u8>,
}

impl ExtensionIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `name` with `id`, replacing a previous id. Registering `0`
    /// disables the extension.
    pub fn register(&mut self, name: impl Into<String>, id: u8) {
        let name = name.into();
        if id == 0 {
            self.ids.remove(&name);
        } else {
            self.ids.insert(name, id);
        }
    }

    /// Returns `0` if the extension was not negotiated.
    pub fn id(&self, name: &str) -> u8 {
        self.ids.get(name).copied().unwrap_or(0)
    }

    /// Name that `id` was negotiated for.
    pub fn name(&self, id: u8) -> Option<&str> {
        if id == 0 {
            return None;
        }
        // a session negotiates a handful of extensions at most
        self.ids
            .iter()
            .find(|(_, v)| **v == id)
            .map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.ids.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_is_zero() {
        let ext = ExtensionIds::new();
        assert_eq!(ext.id("x"), 0);
        assert_eq!(ext.name(0), None);
        assert_eq!(ext.name(1), None);
    }

    #[test]
    fn lookups_both_ways() {
        let mut ext = ExtensionIds::new();
        ext.register(UT_METADATA, 2);
        ext.register(UT_PEX, 1);

        assert_eq!(ext.id(UT_METADATA), 2);
        assert_eq!(ext.name(2), Some(UT_METADATA));
        assert_eq!(ext.name(1), Some(UT_PEX));
        assert_eq!(ext.len(), 2);
    }

    #[test]
    fn register_overwrites() {
        let mut ext = ExtensionIds::new();
        ext.register(UT_METADATA, 2);
        ext.register(UT_METADATA, 3);

        assert_eq!(ext.id(UT_METADATA), 3);
        assert_eq!(ext.name(2), None);
        assert_eq!(ext.name(3), Some(UT_METADATA));
    }

    #[test]
    fn zero_disables() {
        let mut ext = ExtensionIds::new();
        ext.register(UT_PEX, 1);
        ext.register(UT_PEX, 0);

        assert_eq!(ext.id(UT_PEX), 0);
        assert_eq!(ext.name(0), None);
        assert!(ext.is_empty());
    }
}
