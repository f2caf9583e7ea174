//! Item definitions (`EIF` files).

use crate::data::file::DataFile;
use crate::data::record::{DataRecord, FieldBlock, Fields, RecordKind};
use crate::error::{Error, Result};

/// Item ID of the legacy "Gun" entry whose sub type is wrong in shipped files.
pub const GUN_ITEM_ID: u32 = 365;

/// Name the Gun correction is keyed on.
pub const GUN_ITEM_NAME: &str = "Gun";

/// Item file.
pub type ItemFile = DataFile<ItemRecord>;

/// Item category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ItemType {
    #[default]
    Static,
    UnknownType1,
    Money,
    Heal,
    Teleport,
    Spell,
    ExpReward,
    StatReward,
    SkillReward,
    Key,
    Weapon,
    Shield,
    Armor,
    Hat,
    Boots,
    Gloves,
    Accessory,
    Belt,
    Necklace,
    Ring,
    Armlet,
    Bracer,
    Beer,
    EffectPotion,
    HairDye,
    CureCurse,
    /// Value not defined by this library (modded files).
    Other(u8),
}

impl ItemType {
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Static,
            1 => Self::UnknownType1,
            2 => Self::Money,
            3 => Self::Heal,
            4 => Self::Teleport,
            5 => Self::Spell,
            6 => Self::ExpReward,
            7 => Self::StatReward,
            8 => Self::SkillReward,
            9 => Self::Key,
            10 => Self::Weapon,
            11 => Self::Shield,
            12 => Self::Armor,
            13 => Self::Hat,
            14 => Self::Boots,
            15 => Self::Gloves,
            16 => Self::Accessory,
            17 => Self::Belt,
            18 => Self::Necklace,
            19 => Self::Ring,
            20 => Self::Armlet,
            21 => Self::Bracer,
            22 => Self::Beer,
            23 => Self::EffectPotion,
            24 => Self::HairDye,
            25 => Self::CureCurse,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::Static => 0,
            Self::UnknownType1 => 1,
            Self::Money => 2,
            Self::Heal => 3,
            Self::Teleport => 4,
            Self::Spell => 5,
            Self::ExpReward => 6,
            Self::StatReward => 7,
            Self::SkillReward => 8,
            Self::Key => 9,
            Self::Weapon => 10,
            Self::Shield => 11,
            Self::Armor => 12,
            Self::Hat => 13,
            Self::Boots => 14,
            Self::Gloves => 15,
            Self::Accessory => 16,
            Self::Belt => 17,
            Self::Necklace => 18,
            Self::Ring => 19,
            Self::Armlet => 20,
            Self::Bracer => 21,
            Self::Beer => 22,
            Self::EffectPotion => 23,
            Self::HairDye => 24,
            Self::CureCurse => 25,
            Self::Other(raw) => raw,
        }
    }

    /// Paperdoll slot an item of this type is worn in.
    #[must_use]
    pub const fn equip_location(self) -> EquipLocation {
        match self {
            Self::Accessory => EquipLocation::Accessory,
            Self::Armlet => EquipLocation::Armlet1,
            Self::Armor => EquipLocation::Armor,
            Self::Belt => EquipLocation::Belt,
            Self::Boots => EquipLocation::Boots,
            Self::Bracer => EquipLocation::Bracer1,
            Self::Gloves => EquipLocation::Gloves,
            Self::Hat => EquipLocation::Hat,
            Self::Necklace => EquipLocation::Necklace,
            Self::Ring => EquipLocation::Ring1,
            Self::Shield => EquipLocation::Shield,
            Self::Weapon => EquipLocation::Weapon,
            _ => EquipLocation::PaperdollMax,
        }
    }
}

/// Item sub type. `FaceMask` and `HideHair` are the version 1 additions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ItemSubType {
    #[default]
    None,
    Ranged,
    Arrows,
    Wings,
    /// Worn on the head with hair still drawn.
    FaceMask,
    /// Worn on the head with hair hidden.
    HideHair,
    Other(u8),
}

impl ItemSubType {
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::None,
            1 => Self::Ranged,
            2 => Self::Arrows,
            3 => Self::Wings,
            4 => Self::FaceMask,
            5 => Self::HideHair,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Ranged => 1,
            Self::Arrows => 2,
            Self::Wings => 3,
            Self::FaceMask => 4,
            Self::HideHair => 5,
            Self::Other(raw) => raw,
        }
    }
}

/// Item rarity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ItemSpecial {
    #[default]
    Normal,
    Rare,
    UnknownSpecial2,
    Unique,
    Lore,
    Cursed,
    Other(u8),
}

impl ItemSpecial {
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Normal,
            1 => Self::Rare,
            2 => Self::UnknownSpecial2,
            3 => Self::Unique,
            4 => Self::Lore,
            5 => Self::Cursed,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Rare => 1,
            Self::UnknownSpecial2 => 2,
            Self::Unique => 3,
            Self::Lore => 4,
            Self::Cursed => 5,
            Self::Other(raw) => raw,
        }
    }
}

/// Inventory footprint (columns x rows).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ItemSize {
    #[default]
    Size1x1,
    Size1x2,
    Size1x3,
    Size1x4,
    Size2x1,
    Size2x2,
    Size2x3,
    Size2x4,
    Other(u8),
}

impl ItemSize {
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Size1x1,
            1 => Self::Size1x2,
            2 => Self::Size1x3,
            3 => Self::Size1x4,
            4 => Self::Size2x1,
            5 => Self::Size2x2,
            6 => Self::Size2x3,
            7 => Self::Size2x4,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::Size1x1 => 0,
            Self::Size1x2 => 1,
            Self::Size1x3 => 2,
            Self::Size1x4 => 3,
            Self::Size2x1 => 4,
            Self::Size2x2 => 5,
            Self::Size2x3 => 6,
            Self::Size2x4 => 7,
            Self::Other(raw) => raw,
        }
    }
}

/// Paperdoll equipment slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EquipLocation {
    Boots = 0,
    Accessory = 1,
    Gloves = 2,
    Belt = 3,
    Armor = 4,
    Necklace = 5,
    Hat = 6,
    Shield = 7,
    Weapon = 8,
    Ring1 = 9,
    Ring2 = 10,
    Armlet1 = 11,
    Armlet2 = 12,
    Bracer1 = 13,
    Bracer2 = 14,
    /// Not equippable.
    PaperdollMax = 15,
}

impl EquipLocation {
    #[must_use]
    pub const fn is_equippable(self) -> bool {
        !matches!(self, Self::PaperdollMax)
    }
}

/// The three type-dependent item parameters.
///
/// Files store them in shared slots (3 bytes, 1 byte, 1 byte) whose meaning
/// depends on the item type; this enum names them per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemSpecific {
    /// Teleport scroll destination.
    Teleport { map: u32, x: u8, y: u8 },
    Weapon {
        doll_graphic: u32,
        dual_wield_doll_graphic: u8,
    },
    /// `gender` is 0 for female, 1 for male.
    Armor { doll_graphic: u32, gender: u8 },
    /// Hats, shields and boots.
    Worn { doll_graphic: u32 },
    ExpReward { exp: u32 },
    HairDye { color: u32 },
    EffectPotion { effect: u32 },
    Key { key: u32 },
    /// Types without named parameters.
    Generic { param1: u32, param2: u8, param3: u8 },
}

impl Default for ItemSpecific {
    fn default() -> Self {
        Self::Generic {
            param1: 0,
            param2: 0,
            param3: 0,
        }
    }
}

impl ItemSpecific {
    /// Interprets raw parameter slots for an item type.
    #[must_use]
    pub const fn from_params(item_type: ItemType, param1: u32, param2: u8, param3: u8) -> Self {
        match item_type {
            ItemType::Teleport => Self::Teleport {
                map: param1,
                x: param2,
                y: param3,
            },
            ItemType::Weapon => Self::Weapon {
                doll_graphic: param1,
                dual_wield_doll_graphic: param3,
            },
            ItemType::Armor => Self::Armor {
                doll_graphic: param1,
                gender: param2,
            },
            ItemType::Hat | ItemType::Shield | ItemType::Boots => Self::Worn {
                doll_graphic: param1,
            },
            ItemType::ExpReward => Self::ExpReward { exp: param1 },
            ItemType::HairDye => Self::HairDye { color: param1 },
            ItemType::EffectPotion => Self::EffectPotion { effect: param1 },
            ItemType::Key => Self::Key { key: param1 },
            _ => Self::Generic {
                param1,
                param2,
                param3,
            },
        }
    }

    /// Raw parameter slots; slots a variant does not use are 0.
    #[must_use]
    pub const fn params(self) -> (u32, u8, u8) {
        match self {
            Self::Teleport { map, x, y } => (map, x, y),
            Self::Weapon {
                doll_graphic,
                dual_wield_doll_graphic,
            } => (doll_graphic, 0, dual_wield_doll_graphic),
            Self::Armor {
                doll_graphic,
                gender,
            } => (doll_graphic, gender, 0),
            Self::Worn { doll_graphic } => (doll_graphic, 0, 0),
            Self::ExpReward { exp: value }
            | Self::HairDye { color: value }
            | Self::EffectPotion { effect: value }
            | Self::Key { key: value } => (value, 0, 0),
            Self::Generic {
                param1,
                param2,
                param3,
            } => (param1, param2, param3),
        }
    }

    /// Graphic drawn on the paperdoll, for worn items.
    #[must_use]
    pub const fn doll_graphic(self) -> Option<u32> {
        match self {
            Self::Weapon { doll_graphic, .. }
            | Self::Armor { doll_graphic, .. }
            | Self::Worn { doll_graphic } => Some(doll_graphic),
            _ => None,
        }
    }
}

/// Attribute bonuses granted while equipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StatBonuses {
    pub strength: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub agility: u8,
    pub constitution: u8,
    pub charisma: u8,
}

/// Elemental bonuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ElementBonuses {
    pub light: u8,
    pub dark: u8,
    pub earth: u8,
    pub air: u8,
    pub water: u8,
    pub fire: u8,
}

/// Requirements to use or equip the item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ItemRequirements {
    pub level: u16,
    pub class: u16,
    pub strength: u16,
    pub intelligence: u16,
    pub wisdom: u16,
    pub agility: u16,
    pub constitution: u16,
    pub charisma: u16,
}

/// One item definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: u32,
    pub name: String,
    pub graphic: u16,
    pub item_type: ItemType,
    pub sub_type: ItemSubType,
    pub special: ItemSpecial,
    pub hp: u16,
    pub tp: u16,
    pub min_damage: u16,
    pub max_damage: u16,
    pub accuracy: u16,
    pub evade: u16,
    pub armor: u16,
    pub stats: StatBonuses,
    pub elements: ElementBonuses,
    /// Raw parameter slots; see [`ItemRecord::specific`] for their meaning.
    pub param1: u32,
    pub param2: u8,
    pub param3: u8,
    pub requirements: ItemRequirements,
    pub weight: u8,
    pub size: ItemSize,
}

impl ItemRecord {
    /// Paperdoll slot this item is worn in.
    #[must_use]
    pub const fn equip_location(&self) -> EquipLocation {
        self.item_type.equip_location()
    }

    /// Parameters interpreted for this item's type.
    #[must_use]
    pub const fn specific(&self) -> ItemSpecific {
        ItemSpecific::from_params(self.item_type, self.param1, self.param2, self.param3)
    }

    /// Replaces the parameter slots. Slots `specific` does not name become 0.
    pub fn set_specific(&mut self, specific: ItemSpecific) {
        (self.param1, self.param2, self.param3) = specific.params();
    }

    /// Shipped files list the Gun without its ranged sub type.
    fn apply_corrections(&mut self) {
        if self.id == GUN_ITEM_ID && self.name == GUN_ITEM_NAME {
            self.sub_type = ItemSubType::Ranged;
        }
    }
}

impl DataRecord for ItemRecord {
    const KIND: RecordKind = RecordKind::Item;
    const DATA_SIZE: usize = 58;
    const NAME_COUNT: usize = 1;

    fn id(&self) -> u32 {
        self.id
    }

    fn names(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn supports_version(version: u8) -> bool {
        matches!(version, 0 | 1)
    }

    fn deserialize(id: u32, names: Vec<String>, version: u8, fields: &[u8]) -> Result<Self> {
        if !Self::supports_version(version) {
            return Err(Error::UnsupportedVersion {
                kind: Self::KIND,
                version,
            });
        }

        let f = Fields::new(fields);
        let item_type = ItemType::from_raw(f.char(2)?);

        let mut record = Self {
            id,
            name: names.into_iter().next().unwrap_or_default(),
            graphic: f.short(0)?,
            item_type,
            sub_type: ItemSubType::from_raw(f.char(3)?),
            special: ItemSpecial::from_raw(f.char(4)?),
            hp: f.short(5)?,
            tp: f.short(7)?,
            min_damage: f.short(9)?,
            max_damage: f.short(11)?,
            accuracy: f.short(13)?,
            evade: f.short(15)?,
            armor: f.short(17)?,
            stats: StatBonuses {
                strength: f.char(20)?,
                intelligence: f.char(21)?,
                wisdom: f.char(22)?,
                agility: f.char(23)?,
                constitution: f.char(24)?,
                charisma: f.char(25)?,
            },
            elements: ElementBonuses {
                light: f.char(26)?,
                dark: f.char(27)?,
                earth: f.char(28)?,
                air: f.char(29)?,
                water: f.char(30)?,
                fire: f.char(31)?,
            },
            param1: f.three(32)?,
            param2: f.char(35)?,
            param3: f.char(36)?,
            requirements: ItemRequirements {
                level: f.short(37)?,
                class: f.short(39)?,
                strength: f.short(41)?,
                intelligence: f.short(43)?,
                wisdom: f.short(45)?,
                agility: f.short(47)?,
                constitution: f.short(49)?,
                charisma: f.short(51)?,
            },
            weight: f.char(55)?,
            size: ItemSize::from_raw(f.char(57)?),
        };
        record.apply_corrections();
        Ok(record)
    }

    fn write_fields(&self, block: &mut FieldBlock) {
        block.put(0, u32::from(self.graphic), 2);
        block.put(2, u32::from(self.item_type.raw()), 1);
        block.put(3, u32::from(self.sub_type.raw()), 1);
        block.put(4, u32::from(self.special.raw()), 1);
        block.put(5, u32::from(self.hp), 2);
        block.put(7, u32::from(self.tp), 2);
        block.put(9, u32::from(self.min_damage), 2);
        block.put(11, u32::from(self.max_damage), 2);
        block.put(13, u32::from(self.accuracy), 2);
        block.put(15, u32::from(self.evade), 2);
        block.put(17, u32::from(self.armor), 2);

        let stats = self.stats;
        for (offset, value) in [
            (20, stats.strength),
            (21, stats.intelligence),
            (22, stats.wisdom),
            (23, stats.agility),
            (24, stats.constitution),
            (25, stats.charisma),
        ] {
            block.put(offset, u32::from(value), 1);
        }

        let elements = self.elements;
        for (offset, value) in [
            (26, elements.light),
            (27, elements.dark),
            (28, elements.earth),
            (29, elements.air),
            (30, elements.water),
            (31, elements.fire),
        ] {
            block.put(offset, u32::from(value), 1);
        }

        block.put(32, self.param1, 3);
        block.put(35, u32::from(self.param2), 1);
        block.put(36, u32::from(self.param3), 1);

        let req = self.requirements;
        for (offset, value) in [
            (37, req.level),
            (39, req.class),
            (41, req.strength),
            (43, req.intelligence),
            (45, req.wisdom),
            (47, req.agility),
            (49, req.constitution),
            (51, req.charisma),
        ] {
            block.put(offset, u32::from(value), 2);
        }

        block.put(55, u32::from(self.weight), 1);
        block.put(57, u32::from(self.size.raw()), 1);
    }
}

impl DataFile<ItemRecord> {
    /// Finds the item of `item_type` drawn with `doll_graphic` on the paperdoll.
    #[must_use]
    pub fn find_by_doll_graphic(&self, item_type: ItemType, doll_graphic: u32) -> Option<&ItemRecord> {
        self.find_first(|item| {
            item.item_type == item_type && item.specific().doll_graphic() == Some(doll_graphic)
        })
    }
}
