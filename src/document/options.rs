use crate::foundation::version::Game;

/// Options for [`Document::read`](crate::Document::read).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadOptions {
    /// Game whose action layouts are used. Version 5 files do not record the
    /// game that wrote them.
    pub game: Game,
    /// Turn actions with a known layout into named-parameter actions. When
    /// off, every action is kept as raw lists.
    pub parse_schema_actions: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            game: Game::EldenRing,
            parse_schema_actions: true,
        }
    }
}

impl ReadOptions {
    pub fn for_game(game: Game) -> Self {
        Self {
            game,
            ..Self::default()
        }
    }
}

/// Options for [`Document::write`](crate::Document::write).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    pub game: Game,
    /// Rebuild the cross-reference lists from the tree instead of writing the
    /// stored ones.
    pub recompute_references: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            game: Game::EldenRing,
            recompute_references: true,
        }
    }
}

impl WriteOptions {
    pub fn for_game(game: Game) -> Self {
        Self {
            game,
            ..Self::default()
        }
    }
}
