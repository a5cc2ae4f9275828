use crate::binary::reader::Reader;
use crate::binary::writer::Writer;
use crate::foundation::error::FxrResult;

/// Primitive wire type of a field. All three occupy 4 bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    Bool,
    Int,
    Float,
}

/// One 4-byte value from the field pool.
///
/// Fields compare by their stored bits: the pool is untyped, so `Float(0.0)`
/// and `Int(0)` are the same field, while `0.0` and `-0.0` are not.
#[derive(Clone, Copy, Debug)]
pub enum Field {
    /// Stored as int32 0 or 1.
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Eq for Field {}

impl Field {
    pub fn field_type(self) -> FieldType {
        match self {
            Self::Bool(_) => FieldType::Bool,
            Self::Int(_) => FieldType::Int,
            Self::Float(_) => FieldType::Float,
        }
    }

    pub fn to_bits(self) -> u32 {
        match self {
            Self::Bool(v) => u32::from(v),
            Self::Int(v) => v as u32,
            Self::Float(v) => v.to_bits(),
        }
    }

    /// Interpret raw bits as a field of type `ty`.
    pub fn from_bits(bits: u32, ty: FieldType) -> Self {
        match ty {
            FieldType::Bool => Self::Bool(bits != 0),
            FieldType::Int => Self::Int(bits as i32),
            FieldType::Float => Self::Float(f32::from_bits(bits)),
        }
    }

    /// Guess the type of an untyped word.
    ///
    /// Bit patterns that would be zero, subnormal, infinite or NaN as a float
    /// are taken as integers; everything else is a float. Either way the bits
    /// are written back unchanged.
    pub fn infer(bits: u32) -> Self {
        let exponent = bits & 0x7F80_0000;
        if exponent == 0 || exponent == 0x7F80_0000 {
            Self::Int(bits as i32)
        } else {
            Self::Float(f32::from_bits(bits))
        }
    }

    /// Same bits, different type.
    pub fn reinterpret(self, ty: FieldType) -> Self {
        Self::from_bits(self.to_bits(), ty)
    }

    /// Same value, different type.
    pub fn coerce(self, ty: FieldType) -> Self {
        match ty {
            FieldType::Bool => Self::Bool(self.as_bool()),
            FieldType::Int => Self::Int(self.as_i32()),
            FieldType::Float => Self::Float(self.as_f32()),
        }
    }

    pub fn as_bool(self) -> bool {
        match self {
            Self::Bool(v) => v,
            Self::Int(v) => v != 0,
            Self::Float(v) => v != 0.0,
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            Self::Bool(v) => i32::from(v),
            Self::Int(v) => v,
            Self::Float(v) => v as i32,
        }
    }

    pub fn as_f32(self) -> f32 {
        match self {
            Self::Bool(v) => f32::from(u8::from(v)),
            Self::Int(v) => v as f32,
            Self::Float(v) => v,
        }
    }

    pub fn read(r: &mut Reader<'_>, ty: FieldType) -> FxrResult<Self> {
        Ok(Self::from_bits(r.read_u32()?, ty))
    }

    pub fn write(self, w: &mut Writer) {
        w.write_u32(self.to_bits());
    }

    /// Read `count` untyped fields at `offset` without moving the reader.
    pub fn read_many_at(r: &mut Reader<'_>, offset: usize, count: usize) -> FxrResult<Vec<Self>> {
        Ok(r
            .read_words_at(offset, count)?
            .into_iter()
            .map(Self::infer)
            .collect())
    }
}

impl From<bool> for Field {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Field {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for Field {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/binary/field.rs"]
mod tests;
