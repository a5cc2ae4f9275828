use crate::binary::field::Field;
use crate::foundation::version::Game;

/// Static description of one schema-variant action type.
#[derive(Debug)]
pub struct ActionSchema {
    pub action_type: u16,
    pub name: &'static str,
    /// Every logical parameter the action has in any game. A game's layout
    /// may use only some of them; the rest keep their defaults.
    pub params: &'static [ParamDef],
    pub games: GameTable,
    pub quirk: Option<ExtraFieldQuirk>,
}

impl ActionSchema {
    pub fn param(&self, name: &str) -> Option<&'static ParamDef> {
        self.params.iter().find(|p| p.name == name)
    }
}

#[derive(Debug)]
pub struct ParamDef {
    pub name: &'static str,
    pub default: ParamDefault,
}

/// Default value of a parameter. The default also fixes whether the
/// parameter lives in a field list or a property list, and a field's type.
#[derive(Debug)]
pub enum ParamDefault {
    Field(Field),
    /// Constant property with these components.
    Property(&'static [f32]),
}

impl ParamDefault {
    pub fn is_property(&self) -> bool {
        matches!(self, Self::Property(_))
    }
}

/// One entry per game.
#[derive(Debug)]
pub struct GameTable {
    pub dark_souls3: GameEntry,
    pub sekiro: GameEntry,
    pub elden_ring: GameEntry,
    pub armored_core6: GameEntry,
}

impl GameTable {
    pub fn get(&self, game: Game) -> &GameEntry {
        match game {
            Game::DarkSouls3 => &self.dark_souls3,
            Game::Sekiro => &self.sekiro,
            Game::EldenRing => &self.elden_ring,
            Game::ArmoredCore6 => &self.armored_core6,
        }
    }
}

#[derive(Debug)]
pub enum GameEntry {
    Layout(LayoutDef),
    /// Same record as another game.
    Alias(Game),
    /// The action does not exist in this game.
    Unsupported,
}

#[derive(Debug)]
pub struct LayoutDef {
    pub fields1: ListDef,
    pub fields2: ListDef,
    pub properties1: ListDef,
    pub properties2: ListDef,
}

impl LayoutDef {
    pub fn list(&self, list: RawList) -> &ListDef {
        match list {
            RawList::Fields1 => &self.fields1,
            RawList::Fields2 => &self.fields2,
            RawList::Properties1 => &self.properties1,
            RawList::Properties2 => &self.properties2,
        }
    }
}

#[derive(Debug)]
pub enum ListDef {
    Literal(&'static [&'static str]),
    /// Same-named list of another game's record.
    Alias(Game),
}

/// The four raw lists of a generic action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RawList {
    Fields1,
    Fields2,
    Properties1,
    Properties2,
}

impl RawList {
    pub const ALL: [RawList; 4] = [
        RawList::Fields1,
        RawList::Fields2,
        RawList::Properties1,
        RawList::Properties2,
    ];

    pub fn is_property(self) -> bool {
        matches!(self, Self::Properties1 | Self::Properties2)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Fields1 => "fields1",
            Self::Fields2 => "fields2",
            Self::Properties1 => "properties1",
            Self::Properties2 => "properties2",
        }
    }
}

/// A file quirk: files written by `game` carry one undeclared int at `index`
/// of `fields2`, always holding `value`.
#[derive(Clone, Copy, Debug)]
pub struct ExtraFieldQuirk {
    pub game: Game,
    pub index: usize,
    pub value: u32,
}
