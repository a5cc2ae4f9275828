use crate::foundation::error::{FxrError, FxrResult};

/// Read cursor over a byte slice. All reads are little-endian.
///
/// Sections of the format are addressed by `(offset, count)` pairs with the
/// element size implied by context. [`Reader::step_in`] jumps to such an offset
/// and [`Reader::step_out`] returns to where the reader was before, so a parent
/// header can be read sequentially around nested lookups.
#[derive(Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    stack: Vec<usize>,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            stack: Vec::new(),
        }
    }

    /// Current byte position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of underlying data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Remaining bytes from current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Number of positions saved by unmatched `step_in` calls.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Save the current position and move to `offset`.
    pub fn step_in(&mut self, offset: usize) -> FxrResult<()> {
        if offset > self.data.len() {
            return Err(FxrError::format(
                self.pos,
                format!(
                    "offset {offset:#x} points past the end of the data ({:#x})",
                    self.data.len()
                ),
            ));
        }
        self.stack.push(self.pos);
        self.pos = offset;
        Ok(())
    }

    /// Return to the position saved by the matching `step_in`.
    pub fn step_out(&mut self) -> FxrResult<()> {
        let Some(pos) = self.stack.pop() else {
            return Err(FxrError::format(
                self.pos,
                "step_out without a matching step_in",
            ));
        };
        self.pos = pos;
        Ok(())
    }

    /// Skip `n` bytes forward.
    pub fn skip(&mut self, n: usize) -> FxrResult<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Read a slice of `n` bytes without copying.
    pub fn read_bytes(&mut self, n: usize) -> FxrResult<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> FxrResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> FxrResult<u8> {
        self.ensure(1)?;
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    pub fn read_i16(&mut self) -> FxrResult<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u16(&mut self) -> FxrResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> FxrResult<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> FxrResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> FxrResult<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    /// Read a 4-byte magic and fail unless it matches `expected`.
    pub fn assert_magic(&mut self, expected: &[u8; 4]) -> FxrResult<()> {
        let offset = self.pos;
        let found: [u8; 4] = self.read_array()?;
        if &found != expected {
            return Err(FxrError::format(
                offset,
                format!("invalid magic: expected {expected:?}, found {found:?}"),
            ));
        }
        Ok(())
    }

    pub fn assert_u8(&mut self, allowed: &[u8]) -> FxrResult<u8> {
        let offset = self.pos;
        let v = self.read_u8()?;
        check_allowed(offset, v, allowed)
    }

    pub fn assert_i16(&mut self, allowed: &[i16]) -> FxrResult<i16> {
        let offset = self.pos;
        let v = self.read_i16()?;
        check_allowed(offset, v, allowed)
    }

    pub fn assert_i32(&mut self, allowed: &[i32]) -> FxrResult<i32> {
        let offset = self.pos;
        let v = self.read_i32()?;
        check_allowed(offset, v, allowed)
    }

    /// Read an element count; negative counts are rejected.
    pub fn read_count(&mut self) -> FxrResult<usize> {
        let offset = self.pos;
        let v = self.read_i32()?;
        usize::try_from(v).map_err(|_| FxrError::format(offset, format!("negative count {v}")))
    }

    /// Read an int32 offset followed by its known-zero high half.
    pub fn read_offset64(&mut self) -> FxrResult<usize> {
        let offset = self.pos;
        let v = self.read_i32()?;
        self.assert_i32(&[0])?;
        usize::try_from(v).map_err(|_| FxrError::format(offset, format!("negative offset {v}")))
    }

    /// Read `count` consecutive 4-byte words starting at `offset`, leaving the
    /// current position untouched.
    pub fn read_words_at(&mut self, offset: usize, count: usize) -> FxrResult<Vec<u32>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        self.step_in(offset)?;
        self.ensure(count.saturating_mul(4))?;
        let mut words = Vec::with_capacity(count);
        for _ in 0..count {
            words.push(self.read_u32()?);
        }
        self.step_out()?;
        Ok(words)
    }

    /// Run `read_one` `count` times at `offset`, leaving the current position
    /// untouched.
    pub fn read_list_at<T>(
        &mut self,
        offset: usize,
        count: usize,
        mut read_one: impl FnMut(&mut Self) -> FxrResult<T>,
    ) -> FxrResult<Vec<T>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        self.step_in(offset)?;
        let mut out = Vec::with_capacity(count.min(self.remaining() / 4 + 1));
        for _ in 0..count {
            out.push(read_one(self)?);
        }
        self.step_out()?;
        Ok(out)
    }

    fn ensure(&self, n: usize) -> FxrResult<()> {
        if self.pos.saturating_add(n) > self.data.len() {
            return Err(FxrError::UnexpectedEof {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        Ok(())
    }
}

fn check_allowed<T>(offset: usize, v: T, allowed: &[T]) -> FxrResult<T>
where
    T: Copy + PartialEq + std::fmt::Debug,
{
    if allowed.contains(&v) {
        return Ok(v);
    }
    Err(FxrError::format(
        offset,
        format!("expected one of {allowed:?}, found {v:?}"),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/binary/reader.rs"]
mod tests;
