//! Spell definitions (`ESF` files).
//!
//! Spells carry two names: the display name and the shout spoken on cast.

use crate::data::file::DataFile;
use crate::data::record::{DataRecord, FieldBlock, Fields, RecordKind};
use crate::error::{Error, Result};

/// Spell file.
pub type SpellFile = DataFile<SpellRecord>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SpellType {
    #[default]
    Heal,
    Damage,
    Bard,
    Other(u8),
}

impl SpellType {
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Heal,
            1 => Self::Damage,
            2 => Self::Bard,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::Heal => 0,
            Self::Damage => 1,
            Self::Bard => 2,
            Self::Other(raw) => raw,
        }
    }
}

/// Who a spell may be cast on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SpellTargetRestrict {
    #[default]
    NpcOnly,
    Friendly,
    Opponent,
    Other(u8),
}

impl SpellTargetRestrict {
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::NpcOnly,
            1 => Self::Friendly,
            2 => Self::Opponent,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::NpcOnly => 0,
            Self::Friendly => 1,
            Self::Opponent => 2,
            Self::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SpellTarget {
    #[default]
    Normal,
    /// The caster only.
    Caster,
    Unknown1,
    Group,
    Other(u8),
}

impl SpellTarget {
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Normal,
            1 => Self::Caster,
            2 => Self::Unknown1,
            3 => Self::Group,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Caster => 1,
            Self::Unknown1 => 2,
            Self::Group => 3,
            Self::Other(raw) => raw,
        }
    }
}

/// One spell definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpellRecord {
    pub id: u32,
    pub name: String,
    pub shout: String,
    pub icon: u16,
    pub graphic: u16,
    pub tp: u16,
    pub sp: u16,
    pub cast_time: u8,
    pub spell_type: SpellType,
    pub target_restrict: SpellTargetRestrict,
    pub target: SpellTarget,
    pub min_damage: u16,
    pub max_damage: u16,
    pub accuracy: u16,
    pub hp: u16,
}

impl DataRecord for SpellRecord {
    const KIND: RecordKind = RecordKind::Spell;
    const DATA_SIZE: usize = 51;
    const NAME_COUNT: usize = 2;

    fn id(&self) -> u32 {
        self.id
    }

    fn names(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.shout.as_str()]
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

        let mut names = names.into_iter();
        let f = Fields::new(fields);
        Ok(Self {
            id,
            name: names.next().unwrap_or_default(),
            shout: names.next().unwrap_or_default(),
            icon: f.short(0)?,
            graphic: f.short(2)?,
            tp: f.short(4)?,
            sp: f.short(6)?,
            cast_time: f.char(8)?,
            spell_type: SpellType::from_raw(f.char(11)?),
            target_restrict: SpellTargetRestrict::from_raw(f.char(17)?),
            target: SpellTarget::from_raw(f.char(18)?),
            min_damage: f.short(23)?,
            max_damage: f.short(25)?,
            accuracy: f.short(27)?,
            hp: f.short(34)?,
        })
    }

    fn write_fields(&self, block: &mut FieldBlock) {
        block.put(0, u32::from(self.icon), 2);
        block.put(2, u32::from(self.graphic), 2);
        block.put(4, u32::from(self.tp), 2);
        block.put(6, u32::from(self.sp), 2);
        block.put(8, u32::from(self.cast_time), 1);
        block.put(11, u32::from(self.spell_type.raw()), 1);
        block.put(17, u32::from(self.target_restrict.raw()), 1);
        block.put(18, u32::from(self.target.raw()), 1);
        block.put(23, u32::from(self.min_damage), 2);
        block.put(25, u32::from(self.max_damage), 2);
        block.put(27, u32::from(self.accuracy), 2);
        block.put(34, u32::from(self.hp), 2);
    }
}
