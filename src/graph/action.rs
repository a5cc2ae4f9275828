use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::binary::field::Field;
use crate::foundation::error::{FxrError, FxrResult};
use crate::foundation::version::Game;
use crate::schema::resolve::{ResolvedLayout, lookup, resolve};
use crate::schema::table::{ActionSchema, ParamDef, ParamDefault, RawList};
use crate::value::property::Property;
use crate::value::vector::Value;

/// Numeric action type code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionType(pub u16);

impl ActionType {
    /// Empty slot.
    pub const NONE: Self = Self(0);
    pub const NODE_TRANSLATION: Self = Self(35);
    pub const NODE_ACCELERATION: Self = Self(55);
    pub const POINT_LIGHT: Self = Self(609);
    pub const SPOT_LIGHT: Self = Self(614);
    pub const PARTICLE_FORCE_COLLISION: Self = Self(800);
    /// Embeds another effect file by id (`sfx` field).
    pub const SFX_REFERENCE: Self = Self(10012);
    pub const LEVELS_OF_DETAIL_THRESHOLDS: Self = Self(10500);

    pub fn schema(self) -> Option<&'static ActionSchema> {
        lookup(self.0)
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.schema() {
            Some(schema) => write!(f, "{} ({})", schema.name, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Value of one logical parameter of a schema action.
#[derive(Clone, Debug, PartialEq)]
pub enum Param {
    Field(Field),
    Property(Property),
}

impl Param {
    fn from_default(def: &ParamDef) -> Self {
        match def.default {
            ParamDefault::Field(f) => Self::Field(f),
            ParamDefault::Property(v) => Self::Property(Property::constant(
                v.iter().copied().collect::<Value>(),
            )),
        }
    }

    pub fn as_field(&self) -> Option<Field> {
        match self {
            Self::Field(f) => Some(*f),
            Self::Property(_) => None,
        }
    }

    pub fn as_property(&self) -> Option<&Property> {
        match self {
            Self::Field(_) => None,
            Self::Property(p) => Some(p),
        }
    }
}

impl From<Field> for Param {
    fn from(f: Field) -> Self {
        Self::Field(f)
    }
}

impl From<Property> for Param {
    fn from(p: Property) -> Self {
        Self::Property(p)
    }
}

/// An action stored as its raw lists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenericAction {
    pub action_type: ActionType,
    pub fields1: Vec<Field>,
    pub fields2: Vec<Field>,
    pub properties1: Vec<Property>,
    pub properties2: Vec<Property>,
    /// Integer lists stored in the Section10 table (version 5 only).
    pub section10s: Vec<Vec<i32>>,
}

impl GenericAction {
    pub fn new(action_type: ActionType) -> Self {
        Self {
            action_type,
            ..Self::default()
        }
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties1.iter().chain(self.properties2.iter())
    }
}

/// An action whose parameters are addressed by name.
///
/// Only parameters that differ from their defaults are stored. The raw
/// layout is resolved from the action's schema when the action is written
/// for a particular game.
#[derive(Clone, Debug)]
pub struct SchemaAction {
    schema: &'static ActionSchema,
    params: BTreeMap<&'static str, Param>,
    pub section10s: Vec<Vec<i32>>,
}

impl SchemaAction {
    /// A schema action with every parameter at its default.
    pub fn new(action_type: ActionType) -> FxrResult<Self> {
        let schema = action_type.schema().ok_or_else(|| {
            FxrError::validation(format!("action type {} has no schema", action_type.0))
        })?;
        Ok(Self {
            schema,
            params: BTreeMap::new(),
            section10s: Vec::new(),
        })
    }

    pub fn schema(&self) -> &'static ActionSchema {
        self.schema
    }

    pub fn action_type(&self) -> ActionType {
        ActionType(self.schema.action_type)
    }

    fn def(&self, name: &str) -> FxrResult<&'static ParamDef> {
        self.schema.param(name).ok_or_else(|| {
            FxrError::validation(format!("{} has no parameter `{name}`", self.schema.name))
        })
    }

    /// Current value of `name`, falling back to its default.
    pub fn get(&self, name: &str) -> FxrResult<Cow<'_, Param>> {
        let def = self.def(name)?;
        Ok(match self.params.get(def.name) {
            Some(p) => Cow::Borrowed(p),
            None => Cow::Owned(Param::from_default(def)),
        })
    }

    /// Set `name`. Fields are coerced to the parameter's field type and plain
    /// fields given for a property parameter become constants.
    pub fn set(&mut self, name: &str, value: impl Into<Param>) -> FxrResult<()> {
        let def = self.def(name)?;
        let value = match (&def.default, value.into()) {
            (ParamDefault::Field(d), Param::Field(f)) => Param::Field(f.coerce(d.field_type())),
            (ParamDefault::Property(_), Param::Field(f)) => {
                Param::Property(Property::constant(f.as_f32()))
            }
            (ParamDefault::Property(_), p @ Param::Property(_)) => p,
            (ParamDefault::Field(_), Param::Property(_)) => {
                return Err(FxrError::validation(format!(
                    "{}.{} is a field, not a property",
                    self.schema.name, def.name
                )));
            }
        };
        if value == Param::from_default(def) {
            self.params.remove(def.name);
        } else {
            self.params.insert(def.name, value);
        }
        Ok(())
    }

    pub fn with(mut self, name: &str, value: impl Into<Param>) -> FxrResult<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Parameters that differ from their defaults.
    pub fn explicit_params(&self) -> impl Iterator<Item = (&'static str, &Param)> {
        self.params.iter().map(|(name, p)| (*name, p))
    }

    /// Lower to the raw lists used by `game`.
    pub fn to_generic(&self, game: Game) -> FxrResult<GenericAction> {
        let action_type = self.action_type();
        let layout = resolve(action_type.0, game)?;
        if let Some((name, _)) = self
            .params
            .iter()
            .find(|(name, _)| layout.slot_of(name).is_none())
        {
            return Err(FxrError::unsupported(
                format!("parameter `{name}` of action {action_type}"),
                game,
            ));
        }

        let mut out = GenericAction::new(action_type);
        out.section10s = self.section10s.clone();
        for list in RawList::ALL {
            for name in layout.list(list) {
                match (list.is_property(), self.get(name)?.into_owned()) {
                    (false, Param::Field(f)) => match list {
                        RawList::Fields1 => out.fields1.push(f),
                        _ => out.fields2.push(f),
                    },
                    (true, Param::Property(p)) => match list {
                        RawList::Properties1 => out.properties1.push(p),
                        _ => out.properties2.push(p),
                    },
                    _ => {
                        return Err(FxrError::schema(format!(
                            "{}.{name} is in {} but has the wrong kind of default",
                            self.schema.name,
                            list.name()
                        )));
                    }
                }
            }
        }
        Ok(out)
    }

    /// Name the raw lists of `raw` using `layout`. Returns `None` when the
    /// list lengths do not match the layout.
    pub fn from_generic(raw: &GenericAction, layout: &ResolvedLayout) -> Option<Self> {
        let fits = raw.fields1.len() == layout.fields1.len()
            && raw.fields2.len() == layout.fields2.len()
            && raw.properties1.len() == layout.properties1.len()
            && raw.properties2.len() == layout.properties2.len();
        if !fits {
            return None;
        }
        let mut action = Self::new(raw.action_type).ok()?;
        action.section10s = raw.section10s.clone();

        let fields = layout
            .fields1
            .iter()
            .zip(&raw.fields1)
            .chain(layout.fields2.iter().zip(&raw.fields2));
        for (name, field) in fields {
            let def = action.schema.param(name)?;
            let ParamDefault::Field(default) = def.default else {
                return None;
            };
            let value = field.reinterpret(default.field_type());
            if value != default {
                action.params.insert(def.name, Param::Field(value));
            }
        }

        let properties = layout
            .properties1
            .iter()
            .zip(&raw.properties1)
            .chain(layout.properties2.iter().zip(&raw.properties2));
        for (name, property) in properties {
            let def = action.schema.param(name)?;
            if !def.default.is_property() {
                return None;
            }
            let value = Param::Property(property.clone());
            if value != Param::from_default(def) {
                action.params.insert(def.name, value);
            }
        }
        Some(action)
    }
}

impl PartialEq for SchemaAction {
    fn eq(&self, other: &Self) -> bool {
        self.schema.action_type == other.schema.action_type
            && self.section10s == other.section10s
            && self.params == other.params
    }
}

/// One behavior instance in a node or effect.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Generic(GenericAction),
    Schema(SchemaAction),
}

impl Action {
    /// An empty slot.
    pub fn none() -> Self {
        Self::Generic(GenericAction::new(ActionType::NONE))
    }

    pub fn action_type(&self) -> ActionType {
        match self {
            Self::Generic(a) => a.action_type,
            Self::Schema(a) => a.action_type(),
        }
    }

    pub fn section10s(&self) -> &[Vec<i32>] {
        match self {
            Self::Generic(a) => &a.section10s,
            Self::Schema(a) => &a.section10s,
        }
    }

    /// Properties stored on this action. Schema actions report only the
    /// properties that differ from their defaults.
    pub fn properties(&self) -> Vec<&Property> {
        match self {
            Self::Generic(a) => a.properties().collect(),
            Self::Schema(a) => a
                .explicit_params()
                .filter_map(|(_, p)| p.as_property())
                .collect(),
        }
    }

    /// Referenced effect id of an SFX reference action.
    pub fn sfx_reference(&self) -> Option<i32> {
        if self.action_type() != ActionType::SFX_REFERENCE {
            return None;
        }
        match self {
            Self::Generic(a) => a.fields1.first().map(|f| f.as_i32()),
            Self::Schema(a) => a.get("sfx").ok()?.as_field().map(Field::as_i32),
        }
    }

    /// Raw lists for `game`, borrowing when the action is already generic.
    pub fn to_generic(&self, game: Game) -> FxrResult<Cow<'_, GenericAction>> {
        match self {
            Self::Generic(a) => Ok(Cow::Borrowed(a)),
            Self::Schema(a) => Ok(Cow::Owned(a.to_generic(game)?)),
        }
    }
}

impl From<GenericAction> for Action {
    fn from(a: GenericAction) -> Self {
        Self::Generic(a)
    }
}

impl From<SchemaAction> for Action {
    fn from(a: SchemaAction) -> Self {
        Self::Schema(a)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/action.rs"]
mod tests;
