//! State table: a list of states, each holding comparison conditions that
//! select the next state.

use crate::binary::reader::Reader;
use crate::binary::section::{Section, SectionEntry};
use crate::binary::writer::{Slot, SlotKind, Writer};
use crate::foundation::error::{FxrError, FxrResult};
use crate::graph::write::{begin_section, end_section};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConditionOperator {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    Other(i32),
}

impl ConditionOperator {
    pub fn code(self) -> i32 {
        match self {
            Self::Equal => 0,
            Self::NotEqual => 1,
            Self::Greater => 2,
            Self::GreaterOrEqual => 3,
            Self::Less => 4,
            Self::LessOrEqual => 5,
            Self::Other(code) => code,
        }
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Equal,
            1 => Self::NotEqual,
            2 => Self::Greater,
            3 => Self::GreaterOrEqual,
            4 => Self::Less,
            5 => Self::LessOrEqual,
            other => Self::Other(other),
        }
    }
}

/// One side of a comparison.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConditionOperand {
    Literal(f32),
    /// Host-supplied value with this id.
    ExternalValue(i32),
    /// Time spent in the current state.
    StateTime,
}

impl ConditionOperand {
    fn kind(self) -> i32 {
        match self {
            Self::Literal(_) => 0,
            Self::ExternalValue(_) => 1,
            Self::StateTime => 2,
        }
    }

    fn raw(self) -> i32 {
        match self {
            Self::Literal(v) => v.to_bits() as i32,
            Self::ExternalValue(id) => id,
            Self::StateTime => 0,
        }
    }

    fn read(r: &mut Reader<'_>) -> FxrResult<Self> {
        let at = r.position();
        let kind = r.read_i32()?;
        let raw = r.read_i32()?;
        match kind {
            0 => Ok(Self::Literal(f32::from_bits(raw as u32))),
            1 => Ok(Self::ExternalValue(raw)),
            2 => Ok(Self::StateTime),
            other => Err(FxrError::format(
                at,
                format!("unknown condition operand kind {other}"),
            )),
        }
    }

    fn write(self, w: &mut Writer) {
        w.write_i32(self.kind());
        w.write_i32(self.raw());
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    pub operator: ConditionOperator,
    /// State to switch to when the comparison holds.
    pub next_state: Option<usize>,
    pub left: ConditionOperand,
    pub right: ConditionOperand,
}

impl Condition {
    pub fn new(
        operator: ConditionOperator,
        left: ConditionOperand,
        right: ConditionOperand,
    ) -> Self {
        Self {
            operator,
            next_state: None,
            left,
            right,
        }
    }

    pub fn with_next_state(mut self, state: usize) -> Self {
        self.next_state = Some(state);
        self
    }

    fn read(r: &mut Reader<'_>) -> FxrResult<Self> {
        let operator = ConditionOperator::from_code(r.read_i32()?);
        let at = r.position();
        let next_state = match r.read_i32()? {
            -1 => None,
            next => Some(usize::try_from(next).map_err(|_| {
                FxrError::format(at, format!("invalid next state {next}"))
            })?),
        };
        let left = ConditionOperand::read(r)?;
        let right = ConditionOperand::read(r)?;
        Ok(Self {
            operator,
            next_state,
            left,
            right,
        })
    }

    fn write(&self, w: &mut Writer) -> FxrResult<()> {
        w.write_i32(self.operator.code());
        match self.next_state {
            Some(next) => w.write_count(next)?,
            None => w.write_i32(-1),
        }
        self.left.write(w);
        self.right.write(w);
        Ok(())
    }

    pub fn operands(&self) -> [ConditionOperand; 2] {
        [self.left, self.right]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct State {
    pub conditions: Vec<Condition>,
}

impl State {
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }
}

pub(crate) fn read_states(r: &mut Reader<'_>, entry: SectionEntry) -> FxrResult<Vec<State>> {
    r.read_list_at(entry.offset, entry.count, |r| {
        let count = r.read_count()?;
        r.assert_i32(&[0])?;
        let offset = r.read_offset64()?;
        let conditions = r.read_list_at(offset, count, Condition::read)?;
        Ok(State { conditions })
    })
}

/// State headers, then every state's conditions, in one section.
pub(crate) fn write_states(w: &mut Writer, states: &[State]) -> FxrResult<()> {
    let offset = begin_section(w, Section::States)?;
    for (i, state) in states.iter().enumerate() {
        w.write_count(state.conditions.len())?;
        w.write_i32(0);
        w.reserve_offset64(Slot::new(SlotKind::StateConditions, i))?;
    }
    for (i, state) in states.iter().enumerate() {
        w.fill_position(Slot::new(SlotKind::StateConditions, i))?;
        for condition in &state.conditions {
            condition.write(w)?;
        }
    }
    end_section(w, Section::States, offset, states.len())
}
