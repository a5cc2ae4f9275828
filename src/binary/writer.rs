use crate::binary::section::Section;
use crate::foundation::error::{FxrError, FxrResult};

/// Kind of offset placeholder a writer can reserve.
///
/// Each kind is indexed by the position of the referencing entity in that
/// entity's flat, order-of-first-encounter list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotKind {
    SectionOffset,
    SectionCount,
    StateConditions,
    NodeEffects,
    NodeActions,
    NodeChildren,
    EffectActions,
    ActionFields1,
    ActionFields2,
    ActionSection10,
    ActionProperties,
    PropertyFields,
    PropertyModifiers,
    ModifierFields,
    ModifierProperties,
    ModifierPropertyFields,
    Section10Fields,
}

impl SlotKind {
    const COUNT: usize = 17;

    fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SectionOffset => "SectionOffset",
            Self::SectionCount => "SectionCount",
            Self::StateConditions => "StateConditions",
            Self::NodeEffects => "NodeEffects",
            Self::NodeActions => "NodeActions",
            Self::NodeChildren => "NodeChildren",
            Self::EffectActions => "EffectActions",
            Self::ActionFields1 => "ActionFields1",
            Self::ActionFields2 => "ActionFields2",
            Self::ActionSection10 => "ActionSection10",
            Self::ActionProperties => "ActionProperties",
            Self::PropertyFields => "PropertyFields",
            Self::PropertyModifiers => "PropertyModifiers",
            Self::ModifierFields => "ModifierFields",
            Self::ModifierProperties => "ModifierProperties",
            Self::ModifierPropertyFields => "ModifierPropertyFields",
            Self::Section10Fields => "Section10Fields",
        }
    }
}

/// Address of one reservation: a slot kind plus the running index of the
/// entity that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Slot {
    pub kind: SlotKind,
    pub index: usize,
}

impl Slot {
    pub fn new(kind: SlotKind, index: usize) -> Self {
        Self { kind, index }
    }

    pub fn section_offset(section: Section) -> Self {
        Self::new(SlotKind::SectionOffset, section.index())
    }

    pub fn section_count(section: Section) -> Self {
        Self::new(SlotKind::SectionCount, section.index())
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.kind.name(), self.index)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotState {
    Reserved(usize),
    Filled,
}

/// Patch records grouped per slot kind and addressed by index.
#[derive(Debug)]
struct Reservations {
    slots: Vec<Vec<Option<SlotState>>>,
}

impl Reservations {
    fn new() -> Self {
        Self {
            slots: vec![Vec::new(); SlotKind::COUNT],
        }
    }

    fn reserve(&mut self, slot: Slot, pos: usize) -> FxrResult<()> {
        let list = &mut self.slots[slot.kind.index()];
        if list.len() <= slot.index {
            list.resize(slot.index + 1, None);
        }
        if list[slot.index].is_some() {
            return Err(FxrError::reservation(format!("{slot} reserved twice")));
        }
        list[slot.index] = Some(SlotState::Reserved(pos));
        Ok(())
    }

    fn take(&mut self, slot: Slot) -> FxrResult<usize> {
        let Some(entry) = self.slots[slot.kind.index()].get_mut(slot.index) else {
            return Err(FxrError::reservation(format!("{slot} was never reserved")));
        };
        match *entry {
            Some(SlotState::Reserved(pos)) => {
                *entry = Some(SlotState::Filled);
                Ok(pos)
            }
            Some(SlotState::Filled) => Err(FxrError::reservation(format!("{slot} filled twice"))),
            None => Err(FxrError::reservation(format!("{slot} was never reserved"))),
        }
    }

    fn unfilled(&self) -> Vec<Slot> {
        let mut out = Vec::new();
        for (kind_idx, list) in self.slots.iter().enumerate() {
            for (index, state) in list.iter().enumerate() {
                if let Some(SlotState::Reserved(_)) = state {
                    out.push(Slot::new(SLOT_KINDS[kind_idx], index));
                }
            }
        }
        out
    }
}

const SLOT_KINDS: [SlotKind; SlotKind::COUNT] = [
    SlotKind::SectionOffset,
    SlotKind::SectionCount,
    SlotKind::StateConditions,
    SlotKind::NodeEffects,
    SlotKind::NodeActions,
    SlotKind::NodeChildren,
    SlotKind::EffectActions,
    SlotKind::ActionFields1,
    SlotKind::ActionFields2,
    SlotKind::ActionSection10,
    SlotKind::ActionProperties,
    SlotKind::PropertyFields,
    SlotKind::PropertyModifiers,
    SlotKind::ModifierFields,
    SlotKind::ModifierProperties,
    SlotKind::ModifierPropertyFields,
    SlotKind::Section10Fields,
];

/// Append-only byte sink with reserve-now, fill-later offset slots.
/// All writes are little-endian.
pub struct Writer {
    buf: Vec<u8>,
    reservations: Reservations,
}

impl Writer {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            reservations: Reservations::new(),
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
            reservations: Reservations::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn write_magic(&mut self, magic: &[u8; 4]) {
        self.buf.extend_from_slice(magic);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Write a length as an int32 count.
    pub fn write_count(&mut self, len: usize) -> FxrResult<()> {
        let v = to_i32(len, "count")?;
        self.write_i32(v);
        Ok(())
    }

    /// Zero-pad to the next multiple of `align`.
    pub fn pad_to(&mut self, align: usize) {
        while !self.buf.len().is_multiple_of(align) {
            self.buf.push(0);
        }
    }

    /// Write a zeroed int32 placeholder and remember its position under `slot`.
    pub fn reserve(&mut self, slot: Slot) -> FxrResult<()> {
        self.reservations.reserve(slot, self.buf.len())?;
        self.write_i32(0);
        Ok(())
    }

    /// Reserve an offset slot followed by its known-zero high half.
    pub fn reserve_offset64(&mut self, slot: Slot) -> FxrResult<()> {
        self.reserve(slot)?;
        self.write_i32(0);
        Ok(())
    }

    /// Overwrite the placeholder reserved under `slot` with `value`.
    pub fn fill(&mut self, slot: Slot, value: i32) -> FxrResult<()> {
        let pos = self.reservations.take(slot)?;
        self.buf[pos..pos + 4].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Fill `slot` with the current write position.
    pub fn fill_position(&mut self, slot: Slot) -> FxrResult<()> {
        let pos = to_i32(self.buf.len(), "offset")?;
        self.fill(slot, pos)
    }

    /// Fill `slot` with a length.
    pub fn fill_count(&mut self, slot: Slot, len: usize) -> FxrResult<()> {
        let v = to_i32(len, "count")?;
        self.fill(slot, v)
    }

    /// Consume the writer, failing if any reservation was left unfilled.
    pub fn finish(self) -> FxrResult<Vec<u8>> {
        let unfilled = self.reservations.unfilled();
        if let Some(first) = unfilled.first() {
            return Err(FxrError::reservation(format!(
                "{} reservation(s) never filled, first is {first}",
                unfilled.len()
            )));
        }
        Ok(self.buf)
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_i32(v: usize, what: &str) -> FxrResult<i32> {
    i32::try_from(v).map_err(|_| FxrError::validation(format!("{what} {v} does not fit in int32")))
}

#[cfg(test)]
#[path = "../../tests/unit/binary/writer.rs"]
mod tests;
