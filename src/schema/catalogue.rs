//! Built-in action schemas.
//!
//! Parameter names are shared across games; each game's record says which raw
//! list and index a parameter occupies. Parameters missing from a game's
//! record are not stored for that game.

use crate::binary::field::Field;
use crate::foundation::version::Game;
use crate::schema::table::{
    ActionSchema, ExtraFieldQuirk, GameEntry, GameTable, LayoutDef, ListDef, ParamDef,
    ParamDefault,
};

const fn field(name: &'static str, default: Field) -> ParamDef {
    ParamDef {
        name,
        default: ParamDefault::Field(default),
    }
}

const fn property(name: &'static str, default: &'static [f32]) -> ParamDef {
    ParamDef {
        name,
        default: ParamDefault::Property(default),
    }
}

const fn literal(
    fields1: &'static [&'static str],
    fields2: &'static [&'static str],
    properties1: &'static [&'static str],
    properties2: &'static [&'static str],
) -> GameEntry {
    GameEntry::Layout(LayoutDef {
        fields1: ListDef::Literal(fields1),
        fields2: ListDef::Literal(fields2),
        properties1: ListDef::Literal(properties1),
        properties2: ListDef::Literal(properties2),
    })
}

const NONE: &[&str] = &[];

const NODE_TRANSLATION: ActionSchema = ActionSchema {
    action_type: 35,
    name: "NodeTranslation",
    params: &[property("translation", &[0.0, 0.0, 0.0])],
    games: GameTable {
        dark_souls3: literal(NONE, NONE, &["translation"], NONE),
        sekiro: GameEntry::Alias(Game::DarkSouls3),
        elden_ring: GameEntry::Alias(Game::DarkSouls3),
        armored_core6: GameEntry::Alias(Game::DarkSouls3),
    },
    quirk: None,
};

const NODE_ACCELERATION: ActionSchema = ActionSchema {
    action_type: 55,
    name: "NodeAcceleration",
    params: &[
        property("acceleration", &[0.0, 0.0, 0.0]),
        property("acceleration_multiplier", &[1.0]),
        property("max_speed", &[-1.0]),
        field("align_with_acceleration", Field::Bool(false)),
        field("unk_er_f1_1", Field::Int(0)),
        field("unk_er_f1_2", Field::Float(1.0)),
    ],
    games: GameTable {
        dark_souls3: literal(
            &["align_with_acceleration"],
            NONE,
            &["acceleration", "acceleration_multiplier", "max_speed"],
            NONE,
        ),
        sekiro: GameEntry::Alias(Game::DarkSouls3),
        elden_ring: GameEntry::Layout(LayoutDef {
            fields1: ListDef::Literal(&["align_with_acceleration", "unk_er_f1_1", "unk_er_f1_2"]),
            fields2: ListDef::Alias(Game::DarkSouls3),
            properties1: ListDef::Alias(Game::DarkSouls3),
            properties2: ListDef::Alias(Game::DarkSouls3),
        }),
        armored_core6: GameEntry::Alias(Game::EldenRing),
    },
    quirk: None,
};

const POINT_LIGHT_FIELDS2_DS3: &[&str] = &[
    "diffuse_multiplier",
    "specular_multiplier",
    "jitter_and_flicker",
    "jitter_acceleration",
    "shadows",
    "separate_specular",
    "fade_out_time",
    "shadow_dark_fade",
];

const POINT_LIGHT_FIELDS2_SDT: &[&str] = &[
    "diffuse_multiplier",
    "specular_multiplier",
    "jitter_and_flicker",
    "jitter_acceleration",
    "shadows",
    "separate_specular",
    "fade_out_time",
    "shadow_dark_fade",
    "volume_density",
    "phase_function",
    "asymmetry_param",
    "falloff_exponent",
];

const POINT_LIGHT_FIELDS2_AC6: &[&str] = &[
    "diffuse_multiplier",
    "specular_multiplier",
    "jitter_and_flicker",
    "jitter_acceleration",
    "shadows",
    "separate_specular",
    "fade_out_time",
    "shadow_dark_fade",
    "volume_density",
    "phase_function",
    "asymmetry_param",
    "falloff_exponent",
    "unk_ac6_f2_12",
];

const POINT_LIGHT: ActionSchema = ActionSchema {
    action_type: 609,
    name: "PointLight",
    params: &[
        property("diffuse_color", &[1.0, 1.0, 1.0, 1.0]),
        property("specular_color", &[1.0, 1.0, 1.0, 1.0]),
        property("radius", &[10.0]),
        field("diffuse_multiplier", Field::Float(1.0)),
        field("specular_multiplier", Field::Float(1.0)),
        field("jitter_and_flicker", Field::Bool(false)),
        field("jitter_acceleration", Field::Float(1.0)),
        field("shadows", Field::Bool(false)),
        field("separate_specular", Field::Bool(false)),
        field("fade_out_time", Field::Int(0)),
        field("shadow_dark_fade", Field::Float(1.0)),
        field("volume_density", Field::Float(0.0)),
        field("phase_function", Field::Bool(true)),
        field("asymmetry_param", Field::Float(0.75)),
        field("falloff_exponent", Field::Float(1.0)),
        field("unk_ac6_f2_12", Field::Int(0)),
    ],
    games: GameTable {
        dark_souls3: literal(
            NONE,
            POINT_LIGHT_FIELDS2_DS3,
            &["diffuse_color", "specular_color", "radius"],
            NONE,
        ),
        sekiro: GameEntry::Layout(LayoutDef {
            fields1: ListDef::Alias(Game::DarkSouls3),
            fields2: ListDef::Literal(POINT_LIGHT_FIELDS2_SDT),
            properties1: ListDef::Alias(Game::DarkSouls3),
            properties2: ListDef::Alias(Game::DarkSouls3),
        }),
        elden_ring: GameEntry::Alias(Game::Sekiro),
        armored_core6: GameEntry::Layout(LayoutDef {
            fields1: ListDef::Alias(Game::DarkSouls3),
            fields2: ListDef::Literal(POINT_LIGHT_FIELDS2_AC6),
            properties1: ListDef::Alias(Game::DarkSouls3),
            properties2: ListDef::Alias(Game::DarkSouls3),
        }),
    },
    quirk: Some(ExtraFieldQuirk {
        game: Game::Sekiro,
        index: 8,
        value: 0,
    }),
};

const SPOT_LIGHT: ActionSchema = ActionSchema {
    action_type: 614,
    name: "SpotLight",
    params: &[
        property("diffuse_color", &[1.0, 1.0, 1.0, 1.0]),
        property("specular_color", &[1.0, 1.0, 1.0, 1.0]),
        property("distance", &[10.0]),
        property("spread", &[30.0]),
        field("diffuse_multiplier", Field::Float(1.0)),
        field("specular_multiplier", Field::Float(1.0)),
        field("shadows", Field::Bool(false)),
        field("volume_density", Field::Float(0.0)),
    ],
    games: GameTable {
        dark_souls3: GameEntry::Unsupported,
        sekiro: literal(
            NONE,
            &[
                "diffuse_multiplier",
                "specular_multiplier",
                "shadows",
                "volume_density",
            ],
            &["diffuse_color", "specular_color", "distance", "spread"],
            NONE,
        ),
        elden_ring: GameEntry::Alias(Game::Sekiro),
        armored_core6: GameEntry::Alias(Game::Sekiro),
    },
    quirk: None,
};

const PARTICLE_FORCE_COLLISION: ActionSchema = ActionSchema {
    action_type: 800,
    name: "ParticleForceCollision",
    params: &[
        property("radius", &[1.0]),
        field("bounciness", Field::Float(0.5)),
        field("lifetime_loss", Field::Float(0.0)),
    ],
    games: GameTable {
        dark_souls3: GameEntry::Unsupported,
        sekiro: GameEntry::Unsupported,
        elden_ring: literal(&["bounciness", "lifetime_loss"], NONE, &["radius"], NONE),
        armored_core6: GameEntry::Alias(Game::EldenRing),
    },
    quirk: None,
};

const SFX_REFERENCE: ActionSchema = ActionSchema {
    action_type: 10012,
    name: "SfxReference",
    params: &[field("sfx", Field::Int(0))],
    games: GameTable {
        dark_souls3: literal(&["sfx"], NONE, NONE, NONE),
        sekiro: GameEntry::Alias(Game::DarkSouls3),
        elden_ring: GameEntry::Alias(Game::DarkSouls3),
        armored_core6: GameEntry::Alias(Game::DarkSouls3),
    },
    quirk: None,
};

const LEVELS_OF_DETAIL_THRESHOLDS: ActionSchema = ActionSchema {
    action_type: 10500,
    name: "LevelsOfDetailThresholds",
    params: &[
        property("duration", &[-1.0]),
        field("threshold0", Field::Int(1000)),
        field("threshold1", Field::Int(1000)),
        field("threshold2", Field::Int(1000)),
        field("threshold3", Field::Int(1000)),
        field("threshold4", Field::Int(1000)),
    ],
    games: GameTable {
        dark_souls3: literal(
            &[
                "threshold0",
                "threshold1",
                "threshold2",
                "threshold3",
                "threshold4",
            ],
            NONE,
            &["duration"],
            NONE,
        ),
        sekiro: GameEntry::Alias(Game::DarkSouls3),
        elden_ring: GameEntry::Alias(Game::DarkSouls3),
        armored_core6: GameEntry::Alias(Game::DarkSouls3),
    },
    quirk: None,
};

pub static CATALOGUE: &[ActionSchema] = &[
    NODE_TRANSLATION,
    NODE_ACCELERATION,
    POINT_LIGHT,
    SPOT_LIGHT,
    PARTICLE_FORCE_COLLISION,
    SFX_REFERENCE,
    LEVELS_OF_DETAIL_THRESHOLDS,
];

#[cfg(test)]
#[path = "../../tests/unit/schema/catalogue.rs"]
mod tests;
