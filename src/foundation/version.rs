/// Engine generation a document is read for or written for.
///
/// Action layouts are keyed by game. The wire format only distinguishes two
/// versions (see [`FxrVersion`]), so a version 5 file does not say which of the
/// newer games produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum Game {
    DarkSouls3,
    Sekiro,
    EldenRing,
    ArmoredCore6,
}

impl Game {
    pub const ALL: [Game; 4] = [
        Game::DarkSouls3,
        Game::Sekiro,
        Game::EldenRing,
        Game::ArmoredCore6,
    ];

    pub fn version(self) -> FxrVersion {
        match self {
            Self::DarkSouls3 => FxrVersion::V4,
            Self::Sekiro | Self::EldenRing | Self::ArmoredCore6 => FxrVersion::V5,
        }
    }

    /// Whether per-component curve properties exist in this game's format.
    pub fn has_component_curves(self) -> bool {
        self == Self::ArmoredCore6
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::DarkSouls3 => "Dark Souls III",
            Self::Sekiro => "Sekiro",
            Self::EldenRing => "Elden Ring",
            Self::ArmoredCore6 => "Armored Core VI",
        }
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Wire format version stored in the file header.
///
/// - 4: Dark Souls III
/// - 5: Sekiro and every later engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FxrVersion {
    V4,
    V5,
}

impl FxrVersion {
    pub fn code(self) -> i16 {
        match self {
            Self::V4 => 4,
            Self::V5 => 5,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            4 => Some(Self::V4),
            5 => Some(Self::V5),
            _ => None,
        }
    }

    /// Whether the header carries the three cross-reference lists.
    pub fn has_cross_references(self) -> bool {
        self >= Self::V5
    }

    /// Whether action headers carry a Section10 count and offset.
    pub fn has_section10(self) -> bool {
        self >= Self::V5
    }
}

impl std::fmt::Display for FxrVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
