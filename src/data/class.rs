//! Character class definitions (`ECF` files).

use crate::data::file::DataFile;
use crate::data::record::{DataRecord, FieldBlock, Fields, RecordKind};
use crate::error::{Error, Result};

/// Class file.
pub type ClassFile = DataFile<ClassRecord>;

/// One character class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassRecord {
    pub id: u32,
    pub name: String,
    /// Class this one derives from.
    pub base: u8,
    pub class_type: u8,
    pub strength: u16,
    pub intelligence: u16,
    pub wisdom: u16,
    pub agility: u16,
    pub constitution: u16,
    pub charisma: u16,
}

impl DataRecord for ClassRecord {
    const KIND: RecordKind = RecordKind::Class;
    const DATA_SIZE: usize = 14;
    const NAME_COUNT: usize = 1;

    fn id(&self) -> u32 {
        self.id
    }

    fn names(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn supports_version(version: u8) -> bool {
        version == 0
    }

    fn deserialize(id: u32, names: Vec<String>, version: u8, fields: &[u8]) -> Result<Self> {
        if !Self::supports_version(version) {
            return Err(Error::UnsupportedVersion {
                kind: Self::KIND,
                version,
            });
        }

        let f = Fields::new(fields);
        Ok(Self {
            id,
            name: names.into_iter().next().unwrap_or_default(),
            base: f.char(0)?,
            class_type: f.char(1)?,
            strength: f.short(2)?,
            intelligence: f.short(4)?,
            wisdom: f.short(6)?,
            agility: f.short(8)?,
            constitution: f.short(10)?,
            charisma: f.short(12)?,
        })
    }

    fn write_fields(&self, block: &mut FieldBlock) {
        block.put(0, u32::from(self.base), 1);
        block.put(1, u32::from(self.class_type), 1);
        for (offset, value) in [
            (2, self.strength),
            (4, self.intelligence),
            (6, self.wisdom),
            (8, self.agility),
            (10, self.constitution),
            (12, self.charisma),
        ] {
            block.put(offset, u32::from(value), 2);
        }
    }
}
