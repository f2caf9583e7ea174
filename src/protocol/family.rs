//! Packet family and action identifiers.
//!
//! Every packet starts with a family byte and an action byte. Together they
//! form the key used to route an inbound packet to its handler.

use std::fmt;

/// Packet families (message categories).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketFamily {
    /// Connection keep-alive and handshake follow-up.
    Connection = 1,
    /// Account creation and management.
    Account = 2,
    /// Character creation and selection.
    Character = 3,
    /// Login.
    Login = 4,
    /// Entering the game world.
    Welcome = 5,
    /// Player movement.
    Walk = 6,
    /// Changing facing direction.
    Face = 7,
    /// Sitting on chairs.
    Chair = 8,
    /// Emotes.
    Emote = 9,
    /// Attacks.
    Attack = 11,
    /// Spell casting.
    Spell = 12,
    /// Shops.
    Shop = 13,
    /// Inventory items.
    Item = 14,
    /// Stat and skill training.
    StatSkill = 16,
    /// Global chat.
    Global = 17,
    /// Local chat.
    Talk = 18,
    /// Warping between maps.
    Warp = 19,
    /// Jukebox.
    JukeBox = 21,
    /// Online player list.
    Players = 22,
    /// Character avatars.
    Avatar = 23,
    /// Parties.
    Party = 24,
    /// Map refresh.
    Refresh = 25,
    /// NPC updates.
    Npc = 26,
    /// Players in range.
    PlayerRange = 27,
    /// NPCs in range.
    NpcRange = 28,
    /// Everything in range.
    Range = 29,
    /// Paperdolls.
    Paperdoll = 30,
    /// Map effects.
    Effect = 31,
    /// Trading.
    Trade = 32,
    /// Chests.
    Chest = 33,
    /// Doors.
    Door = 34,
    /// Server messages and ping.
    Message = 35,
    /// Bank.
    Bank = 36,
    /// Locker.
    Locker = 37,
    /// Barber.
    Barber = 38,
    /// Guilds.
    Guild = 39,
    /// Music.
    Music = 40,
    /// Sitting on the floor.
    Sit = 41,
    /// HP/TP recovery.
    Recover = 42,
    /// Message boards.
    Board = 43,
    /// Casting (targeted spells).
    Cast = 44,
    /// Arena.
    Arena = 45,
    /// Priest.
    Priest = 46,
    /// Marriage.
    Marriage = 47,
    /// Admin interaction.
    AdminInteract = 48,
    /// Citizenship.
    Citizen = 49,
    /// Quests.
    Quest = 50,
    /// Quest book.
    Book = 51,
}

impl PacketFamily {
    /// Attempts to parse a family from its identifier.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(Self::Connection),
            2 => Some(Self::Account),
            3 => Some(Self::Character),
            4 => Some(Self::Login),
            5 => Some(Self::Welcome),
            6 => Some(Self::Walk),
            7 => Some(Self::Face),
            8 => Some(Self::Chair),
            9 => Some(Self::Emote),
            11 => Some(Self::Attack),
            12 => Some(Self::Spell),
            13 => Some(Self::Shop),
            14 => Some(Self::Item),
            16 => Some(Self::StatSkill),
            17 => Some(Self::Global),
            18 => Some(Self::Talk),
            19 => Some(Self::Warp),
            21 => Some(Self::JukeBox),
            22 => Some(Self::Players),
            23 => Some(Self::Avatar),
            24 => Some(Self::Party),
            25 => Some(Self::Refresh),
            26 => Some(Self::Npc),
            27 => Some(Self::PlayerRange),
            28 => Some(Self::NpcRange),
            29 => Some(Self::Range),
            30 => Some(Self::Paperdoll),
            31 => Some(Self::Effect),
            32 => Some(Self::Trade),
            33 => Some(Self::Chest),
            34 => Some(Self::Door),
            35 => Some(Self::Message),
            36 => Some(Self::Bank),
            37 => Some(Self::Locker),
            38 => Some(Self::Barber),
            39 => Some(Self::Guild),
            40 => Some(Self::Music),
            41 => Some(Self::Sit),
            42 => Some(Self::Recover),
            43 => Some(Self::Board),
            44 => Some(Self::Cast),
            45 => Some(Self::Arena),
            46 => Some(Self::Priest),
            47 => Some(Self::Marriage),
            48 => Some(Self::AdminInteract),
            49 => Some(Self::Citizen),
            50 => Some(Self::Quest),
            51 => Some(Self::Book),
            _ => None,
        }
    }
}

impl From<PacketFamily> for u8 {
    fn from(family: PacketFamily) -> Self {
        family as Self
    }
}

/// Packet actions (operation within a family).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketAction {
    Request = 1,
    Accept = 2,
    Reply = 3,
    Remove = 4,
    Agree = 5,
    Create = 6,
    Add = 7,
    Player = 8,
    Take = 9,
    Use = 10,
    Buy = 11,
    Sell = 12,
    Open = 13,
    Close = 14,
    Message = 15,
    Spec = 16,
    Admin = 17,
    List = 18,
    Tell = 20,
    Report = 21,
    Announce = 22,
    Server = 23,
    Drop = 24,
    Junk = 25,
    Obtain = 26,
    Get = 27,
    Kick = 28,
    Rank = 29,
    TargetSelf = 30,
    TargetOther = 31,
    TargetGroup = 33,
    Dialog = 34,
    Ping = 240,
    Pong = 241,
    Net3 = 242,
}

impl PacketAction {
    /// Attempts to parse an action from its identifier.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(Self::Request),
            2 => Some(Self::Accept),
            3 => Some(Self::Reply),
            4 => Some(Self::Remove),
            5 => Some(Self::Agree),
            6 => Some(Self::Create),
            7 => Some(Self::Add),
            8 => Some(Self::Player),
            9 => Some(Self::Take),
            10 => Some(Self::Use),
            11 => Some(Self::Buy),
            12 => Some(Self::Sell),
            13 => Some(Self::Open),
            14 => Some(Self::Close),
            15 => Some(Self::Message),
            16 => Some(Self::Spec),
            17 => Some(Self::Admin),
            18 => Some(Self::List),
            20 => Some(Self::Tell),
            21 => Some(Self::Report),
            22 => Some(Self::Announce),
            23 => Some(Self::Server),
            24 => Some(Self::Drop),
            25 => Some(Self::Junk),
            26 => Some(Self::Obtain),
            27 => Some(Self::Get),
            28 => Some(Self::Kick),
            29 => Some(Self::Rank),
            30 => Some(Self::TargetSelf),
            31 => Some(Self::TargetOther),
            33 => Some(Self::TargetGroup),
            34 => Some(Self::Dialog),
            240 => Some(Self::Ping),
            241 => Some(Self::Pong),
            242 => Some(Self::Net3),
            _ => None,
        }
    }
}

impl From<PacketAction> for u8 {
    fn from(action: PacketAction) -> Self {
        action as Self
    }
}

/// The routing key of a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FamilyActionPair {
    pub family: PacketFamily,
    pub action: PacketAction,
}

impl FamilyActionPair {
    #[must_use]
    pub const fn new(family: PacketFamily, action: PacketAction) -> Self {
        Self { family, action }
    }
}

impl fmt::Display for FamilyActionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}", self.family, self.action)
    }
}
