use crate::foundation::error::{FxrError, FxrResult};
use crate::graph::action::Action;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Proxy,
    LevelsOfDetail,
    Basic,
    SharedEmitter,
    Other(i32),
}

impl NodeKind {
    pub fn code(self) -> i32 {
        match self {
            Self::Root => 2000,
            Self::Proxy => 2001,
            Self::LevelsOfDetail => 2002,
            Self::Basic => 2200,
            Self::SharedEmitter => 2202,
            Self::Other(code) => code,
        }
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            2000 => Self::Root,
            2001 => Self::Proxy,
            2002 => Self::LevelsOfDetail,
            2200 => Self::Basic,
            2202 => Self::SharedEmitter,
            other => Self::Other(other),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    LevelsOfDetail,
    Basic,
    SharedEmitter,
    Other(i32),
}

impl EffectKind {
    pub fn code(self) -> i32 {
        match self {
            Self::LevelsOfDetail => 1002,
            Self::Basic => 1004,
            Self::SharedEmitter => 1005,
            Self::Other(code) => code,
        }
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            1002 => Self::LevelsOfDetail,
            1004 => Self::Basic,
            1005 => Self::SharedEmitter,
            other => Self::Other(other),
        }
    }

    /// Number of action slots an effect of this kind has, if fixed.
    pub fn slot_count(self) -> Option<usize> {
        match self {
            Self::LevelsOfDetail => Some(1),
            Self::Basic => Some(15),
            Self::SharedEmitter => Some(10),
            Self::Other(_) => None,
        }
    }
}

/// Element of the effect tree. Nodes own their children; there are no back
/// references.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub effects: Vec<Effect>,
    pub actions: Vec<Action>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            effects: Vec::new(),
            actions: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn root() -> Self {
        Self::new(NodeKind::Root)
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_action(mut self, action: impl Into<Action>) -> Self {
        self.actions.push(action.into());
        self
    }
}

/// A fixed array of action slots.
#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub actions: Vec<Action>,
}

impl Effect {
    /// An effect with every slot empty.
    pub fn new(kind: EffectKind) -> Self {
        let slots = kind.slot_count().unwrap_or(0);
        Self {
            kind,
            actions: (0..slots).map(|_| Action::none()).collect(),
        }
    }

    pub fn set_slot(&mut self, slot: usize, action: impl Into<Action>) -> FxrResult<()> {
        let len = self.actions.len();
        let Some(target) = self.actions.get_mut(slot) else {
            return Err(FxrError::validation(format!(
                "effect {} has {len} action slots, not {}",
                self.kind.code(),
                slot + 1
            )));
        };
        *target = action.into();
        Ok(())
    }

    pub fn with_slot(mut self, slot: usize, action: impl Into<Action>) -> FxrResult<Self> {
        self.set_slot(slot, action)?;
        Ok(self)
    }
}
