//! Game data files.
//!
//! Four record-oriented file formats share one container layout:
//! - Items (`EIF`), versions 0 and 1
//! - NPCs (`ENF`)
//! - Classes (`ECF`)
//! - Spells (`ESF`)
//!
//! [`GameData`] loads all four once and is shared read-only, usually behind an
//! `Arc`.

pub mod class;
pub mod file;
pub mod item;
pub mod npc;
pub mod record;
pub mod spell;

pub use class::{ClassFile, ClassRecord};
pub use file::DataFile;
pub use item::{
    EquipLocation, ItemFile, ItemRecord, ItemSize, ItemSpecial, ItemSpecific, ItemSubType,
    ItemType,
};
pub use npc::{NpcFile, NpcRecord, NpcType};
pub use record::{DataRecord, RecordKind};
pub use spell::{SpellFile, SpellRecord, SpellTarget, SpellTargetRestrict, SpellType};

use crate::config::DataPaths;
use crate::error::Result;

/// All game data files.
#[derive(Debug, Clone)]
pub struct GameData {
    pub items: ItemFile,
    pub npcs: NpcFile,
    pub classes: ClassFile,
    pub spells: SpellFile,
}

impl GameData {
    /// Loads every data file.
    ///
    /// # Errors
    ///
    /// Returns the first file's load error.
    pub fn load(paths: &DataPaths) -> Result<Self> {
        Ok(Self {
            items: ItemFile::load(&paths.items)?,
            npcs: NpcFile::load(&paths.npcs)?,
            classes: ClassFile::load(&paths.classes)?,
            spells: SpellFile::load(&paths.spells)?,
        })
    }

    #[must_use]
    pub fn item(&self, id: u32) -> Option<&ItemRecord> {
        self.items.find_by_id(id)
    }

    #[must_use]
    pub fn npc(&self, id: u32) -> Option<&NpcRecord> {
        self.npcs.find_by_id(id)
    }

    #[must_use]
    pub fn class(&self, id: u32) -> Option<&ClassRecord> {
        self.classes.find_by_id(id)
    }

    #[must_use]
    pub fn spell(&self, id: u32) -> Option<&SpellRecord> {
        self.spells.find_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_load_all() {
        let root = std::env::temp_dir().join(format!("eocodec-gamedata-{}", std::process::id()));
        let paths = DataPaths::under(&root);
        std::fs::create_dir_all(root.join("pub")).unwrap();

        let item = ItemRecord {
            id: 1,
            name: "Apple".into(),
            item_type: ItemType::Heal,
            hp: 10,
            ..ItemRecord::default()
        };
        ItemFile::new(1, [0; 4], vec![item]).save(&paths.items).unwrap();
        NpcFile::new(0, [0; 4], vec![]).save(&paths.npcs).unwrap();
        ClassFile::new(0, [0; 4], vec![]).save(&paths.classes).unwrap();
        SpellFile::new(0, [0; 4], vec![]).save(&paths.spells).unwrap();

        let data = GameData::load(&paths).unwrap();
        std::fs::remove_dir_all(&root).ok();

        assert_eq!(data.item(1).map(|i| i.hp), Some(10));
        assert!(data.item(2).is_none());
        assert!(data.npc(1).is_none());
        assert!(data.class(1).is_none());
        assert!(data.spell(1).is_none());
    }

    #[test]
    fn test_missing_files() {
        let paths = DataPaths::under("/nonexistent/eocodec");
        assert!(matches!(
            GameData::load(&paths),
            Err(Error::FileLoad { .. })
        ));
    }
}
