//! NPC definitions (`ENF` files).

use crate::data::file::DataFile;
use crate::data::record::{DataRecord, FieldBlock, Fields, RecordKind};
use crate::error::{Error, Result};

/// NPC file.
pub type NpcFile = DataFile<NpcRecord>;

/// NPC behaviour category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NpcType {
    #[default]
    Npc,
    Passive,
    Aggressive,
    Unknown1,
    Unknown2,
    Unknown3,
    Shop,
    Inn,
    Unknown4,
    Bank,
    Barber,
    Guild,
    Priest,
    Law,
    Skills,
    Quest,
    Other(u16),
}

impl NpcType {
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        match raw {
            0 => Self::Npc,
            1 => Self::Passive,
            2 => Self::Aggressive,
            3 => Self::Unknown1,
            4 => Self::Unknown2,
            5 => Self::Unknown3,
            6 => Self::Shop,
            7 => Self::Inn,
            8 => Self::Unknown4,
            9 => Self::Bank,
            10 => Self::Barber,
            11 => Self::Guild,
            12 => Self::Priest,
            13 => Self::Law,
            14 => Self::Skills,
            15 => Self::Quest,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        match self {
            Self::Npc => 0,
            Self::Passive => 1,
            Self::Aggressive => 2,
            Self::Unknown1 => 3,
            Self::Unknown2 => 4,
            Self::Unknown3 => 5,
            Self::Shop => 6,
            Self::Inn => 7,
            Self::Unknown4 => 8,
            Self::Bank => 9,
            Self::Barber => 10,
            Self::Guild => 11,
            Self::Priest => 12,
            Self::Law => 13,
            Self::Skills => 14,
            Self::Quest => 15,
            Self::Other(raw) => raw,
        }
    }

    /// Returns true for NPCs the player can fight.
    #[must_use]
    pub const fn is_attackable(self) -> bool {
        matches!(self, Self::Passive | Self::Aggressive)
    }
}

/// One NPC definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NpcRecord {
    pub id: u32,
    pub name: String,
    pub graphic: u16,
    pub boss: u16,
    pub child: u16,
    pub npc_type: NpcType,
    pub vendor_id: u16,
    pub hp: u32,
    pub min_damage: u16,
    pub max_damage: u16,
    pub accuracy: u16,
    pub evade: u16,
    pub armor: u16,
    pub exp: u16,
}

impl DataRecord for NpcRecord {
    const KIND: RecordKind = RecordKind::Npc;
    const DATA_SIZE: usize = 39;
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
            graphic: f.short(0)?,
            boss: f.short(3)?,
            child: f.short(5)?,
            npc_type: NpcType::from_raw(f.short(7)?),
            vendor_id: f.short(9)?,
            hp: f.three(11)?,
            min_damage: f.short(16)?,
            max_damage: f.short(18)?,
            accuracy: f.short(20)?,
            evade: f.short(22)?,
            armor: f.short(24)?,
            exp: f.short(36)?,
        })
    }

    fn write_fields(&self, block: &mut FieldBlock) {
        block.put(0, u32::from(self.graphic), 2);
        block.put(3, u32::from(self.boss), 2);
        block.put(5, u32::from(self.child), 2);
        block.put(7, u32::from(self.npc_type.raw()), 2);
        block.put(9, u32::from(self.vendor_id), 2);
        block.put(11, self.hp, 3);
        block.put(16, u32::from(self.min_damage), 2);
        block.put(18, u32::from(self.max_damage), 2);
        block.put(20, u32::from(self.accuracy), 2);
        block.put(22, u32::from(self.evade), 2);
        block.put(24, u32::from(self.armor), 2);
        block.put(36, u32::from(self.exp), 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::number::FILL_BYTE;

    fn goat() -> NpcRecord {
        NpcRecord {
            id: 4,
            name: "Goat".into(),
            graphic: 22,
            boss: 0,
            child: 1,
            npc_type: NpcType::Aggressive,
            vendor_id: 0,
            hp: 120_000,
            min_damage: 3,
            max_damage: 9,
            accuracy: 12,
            evade: 5,
            armor: 7,
            exp: 640,
        }
    }

    #[test]
    fn test_round_trip() {
        let npc = goat();
        let raw = npc.to_bytes();
        assert_eq!(raw.len(), NpcRecord::DATA_SIZE + 1 + 4);
        assert_eq!(NpcRecord::from_bytes(npc.id, 0, &raw).unwrap(), npc);
    }

    #[test]
    fn test_gaps_are_filled() {
        let raw = goat().to_bytes();
        let block = &raw[5..];
        assert_eq!(block[2], FILL_BYTE);
        assert_eq!(block[14], FILL_BYTE);
        assert_eq!(block[15], FILL_BYTE);
        assert!(block[26..36].iter().all(|&b| b == FILL_BYTE));
        assert_eq!(block[38], FILL_BYTE);
    }

    #[test]
    fn test_unsupported_version() {
        let raw = goat().to_bytes();
        assert!(matches!(
            NpcRecord::from_bytes(4, 1, &raw),
            Err(Error::UnsupportedVersion {
                kind: RecordKind::Npc,
                version: 1
            })
        ));
    }

    #[test]
    fn test_undefined_type_preserved() {
        let npc = NpcRecord {
            id: 1,
            name: "Mod".into(),
            npc_type: NpcType::Other(300),
            ..NpcRecord::default()
        };
        let decoded = NpcRecord::from_bytes(1, 0, &npc.to_bytes()).unwrap();
        assert_eq!(decoded.npc_type, NpcType::Other(300));
        assert!(!decoded.npc_type.is_attackable());
    }
}
