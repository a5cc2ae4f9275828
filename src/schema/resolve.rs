use std::collections::HashMap;
use std::sync::OnceLock;

use crate::foundation::error::{FxrError, FxrResult};
use crate::foundation::version::Game;
use crate::schema::catalogue::CATALOGUE;
use crate::schema::table::{ActionSchema, GameEntry, LayoutDef, ListDef, RawList};

/// The four literal name lists of an action for one game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedLayout {
    pub fields1: &'static [&'static str],
    pub fields2: &'static [&'static str],
    pub properties1: &'static [&'static str],
    pub properties2: &'static [&'static str],
    /// Alias hops taken to reach the literal lists (at most 2).
    pub hops: usize,
}

impl ResolvedLayout {
    pub fn list(&self, list: RawList) -> &'static [&'static str] {
        match list {
            RawList::Fields1 => self.fields1,
            RawList::Fields2 => self.fields2,
            RawList::Properties1 => self.properties1,
            RawList::Properties2 => self.properties2,
        }
    }

    pub fn field_count(&self) -> usize {
        self.fields1.len() + self.fields2.len()
    }

    pub fn property_count(&self) -> usize {
        self.properties1.len() + self.properties2.len()
    }

    /// Raw list and index holding `name`, if this game uses it.
    pub fn slot_of(&self, name: &str) -> Option<(RawList, usize)> {
        RawList::ALL.into_iter().find_map(|list| {
            self.list(list)
                .iter()
                .position(|n| *n == name)
                .map(|i| (list, i))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + use<> {
        let lists = [self.fields1, self.fields2, self.properties1, self.properties2];
        lists.into_iter().flatten().copied()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum LayoutIssue {
    Unsupported,
    Chain(String),
}

type Cache = HashMap<(u16, Game), Result<ResolvedLayout, LayoutIssue>>;

static CACHE: OnceLock<Cache> = OnceLock::new();

/// Schema of `action_type`, if it has one.
pub fn lookup(action_type: u16) -> Option<&'static ActionSchema> {
    CATALOGUE.iter().find(|s| s.action_type == action_type)
}

/// Resolved layout of `action_type` for `game`.
///
/// Results are computed once for the whole catalogue on first use.
pub fn resolve(action_type: u16, game: Game) -> FxrResult<&'static ResolvedLayout> {
    let cache = CACHE.get_or_init(|| {
        let mut cache = HashMap::with_capacity(CATALOGUE.len() * Game::ALL.len());
        for schema in CATALOGUE {
            for game in Game::ALL {
                cache.insert((schema.action_type, game), resolve_schema(schema, game));
            }
        }
        cache
    });
    match cache.get(&(action_type, game)) {
        None => Err(FxrError::validation(format!(
            "action type {action_type} has no schema"
        ))),
        Some(Ok(layout)) => Ok(layout),
        Some(Err(LayoutIssue::Unsupported)) => Err(FxrError::unsupported(
            format!("action type {action_type}"),
            game,
        )),
        Some(Err(LayoutIssue::Chain(msg))) => Err(FxrError::schema(msg.clone())),
    }
}

/// Chase the aliases of `schema` for `game`: at most one whole-record hop,
/// then at most one further hop per list.
pub(crate) fn resolve_schema(
    schema: &'static ActionSchema,
    game: Game,
) -> Result<ResolvedLayout, LayoutIssue> {
    let (record_hops, layout) = match schema.games.get(game) {
        GameEntry::Layout(layout) => (0, layout),
        GameEntry::Unsupported => return Err(LayoutIssue::Unsupported),
        GameEntry::Alias(target) => match schema.games.get(*target) {
            GameEntry::Layout(layout) => (1, layout),
            GameEntry::Unsupported => return Err(LayoutIssue::Unsupported),
            GameEntry::Alias(next) => {
                return Err(LayoutIssue::Chain(format!(
                    "{} ({}): {game} aliases {target}, which aliases {next}",
                    schema.name, schema.action_type
                )));
            }
        },
    };

    let mut list_hops = 0;
    let mut literal = |list: RawList| -> Result<&'static [&'static str], LayoutIssue> {
        match layout.list(list) {
            ListDef::Literal(names) => Ok(*names),
            ListDef::Alias(target) => {
                list_hops = 1;
                match aliased_layout(schema, *target).map(|l| l.list(list)) {
                    Some(ListDef::Literal(names)) => Ok(*names),
                    _ => Err(LayoutIssue::Chain(format!(
                        "{} ({}): {} for {game} aliases {target}, which has no literal list",
                        schema.name,
                        schema.action_type,
                        list.name()
                    ))),
                }
            }
        }
    };
    let fields1 = literal(RawList::Fields1)?;
    let fields2 = literal(RawList::Fields2)?;
    let properties1 = literal(RawList::Properties1)?;
    let properties2 = literal(RawList::Properties2)?;
    Ok(ResolvedLayout {
        fields1,
        fields2,
        properties1,
        properties2,
        hops: record_hops + list_hops,
    })
}

fn aliased_layout(schema: &'static ActionSchema, game: Game) -> Option<&'static LayoutDef> {
    match schema.games.get(game) {
        GameEntry::Layout(layout) => Some(layout),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/resolve.rs"]
mod tests;
