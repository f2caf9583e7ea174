//! Client-side configuration.

use std::path::PathBuf;

/// Default item file location.
pub const DEFAULT_ITEM_FILE: &str = "pub/dat001.eif";

/// Default NPC file location.
pub const DEFAULT_NPC_FILE: &str = "pub/dtn001.enf";

/// Default class file location.
pub const DEFAULT_CLASS_FILE: &str = "pub/dat001.ecf";

/// Default spell file location.
pub const DEFAULT_SPELL_FILE: &str = "pub/dsl001.esf";

/// Default capacity of the event broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Default capacity of the inbound frame channel.
pub const DEFAULT_FRAME_CHANNEL_CAPACITY: usize = 256;

/// Locations of the four game data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub items: PathBuf,
    pub npcs: PathBuf,
    pub classes: PathBuf,
    pub spells: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            items: DEFAULT_ITEM_FILE.into(),
            npcs: DEFAULT_NPC_FILE.into(),
            classes: DEFAULT_CLASS_FILE.into(),
            spells: DEFAULT_SPELL_FILE.into(),
        }
    }
}

impl DataPaths {
    /// Creates paths using the default file names.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the default file names under `root` instead of the working directory.
    #[must_use]
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            items: root.join(DEFAULT_ITEM_FILE),
            npcs: root.join(DEFAULT_NPC_FILE),
            classes: root.join(DEFAULT_CLASS_FILE),
            spells: root.join(DEFAULT_SPELL_FILE),
        }
    }

    #[must_use]
    pub fn items(mut self, path: impl Into<PathBuf>) -> Self {
        self.items = path.into();
        self
    }

    #[must_use]
    pub fn npcs(mut self, path: impl Into<PathBuf>) -> Self {
        self.npcs = path.into();
        self
    }

    #[must_use]
    pub fn classes(mut self, path: impl Into<PathBuf>) -> Self {
        self.classes = path.into();
        self
    }

    #[must_use]
    pub fn spells(mut self, path: impl Into<PathBuf>) -> Self {
        self.spells = path.into();
        self
    }
}

/// Configuration for [`GameClient`](crate::client::GameClient).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
    /// Capacity of the channel between the transport and the packet processor.
    pub frame_channel_capacity: usize,
    /// Offset from UTC applied to movement timestamps.
    pub utc_offset_secs: i32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
            frame_channel_capacity: DEFAULT_FRAME_CHANNEL_CAPACITY,
            utc_offset_secs: 0,
        }
    }

    /// Sets the event channel capacity.
    #[must_use]
    pub const fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Sets the frame channel capacity.
    #[must_use]
    pub const fn frame_channel_capacity(mut self, capacity: usize) -> Self {
        self.frame_channel_capacity = capacity;
        self
    }

    /// Sets the timestamp offset from UTC, in seconds.
    #[must_use]
    pub const fn utc_offset(mut self, secs: i32) -> Self {
        self.utc_offset_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_paths_defaults() {
        let paths = DataPaths::new();
        assert_eq!(paths.items, PathBuf::from("pub/dat001.eif"));
        assert_eq!(paths.spells, PathBuf::from("pub/dsl001.esf"));
    }

    #[test]
    fn test_data_paths_builder() {
        let paths = DataPaths::under("/srv/eo").npcs("custom.enf");
        assert_eq!(paths.items, PathBuf::from("/srv/eo/pub/dat001.eif"));
        assert_eq!(paths.npcs, PathBuf::from("custom.enf"));
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .event_capacity(8)
            .frame_channel_capacity(4)
            .utc_offset(-3600);
        assert_eq!(config.event_capacity, 8);
        assert_eq!(config.frame_channel_capacity, 4);
        assert_eq!(config.utc_offset_secs, -3600);
        assert_eq!(ClientConfig::default().utc_offset_secs, 0);
        assert_eq!(ClientConfig::default().event_capacity, DEFAULT_EVENT_CAPACITY);
    }
}
