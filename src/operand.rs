use yaxpeax_arch::{Arch, Reader, StandardDecodeError};

use crate::GPL;

/// the fixed cpu RAM address direct and indirect operands are relative to. `@>10` is `>8310`.
pub const WORKSPACE_BASE: u16 = 0x8300;

/// which memory an operand refers to.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum Space {
    /// cpu RAM, relative to [`WORKSPACE_BASE`].
    Cpu,
    /// video display processor RAM.
    Vdp,
    /// graphics ROM, where GPL code itself lives.
    Grom,
}

#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum Operand {
    /// no operand in this position.
    Nothing,
    /// an 8-bit literal.
    ImmB { imm: u8 },
    /// a 16-bit literal, stored big-endian in the instruction stream.
    ImmW { imm: u16 },
    /// one of the VDP write-only registers, `R@0` through `R@7`. only reachable as the
    /// destination of a `MOVE`.
    VRegister { num: u8 },
    /// a memory reference.
    ///
    /// `address` is as encoded: for cpu operands and any indirect operand it is an offset from
    /// [`WORKSPACE_BASE`], see [`Operand::effective_address`]. `index`, if present, names the
    /// workspace byte (again relative to `WORKSPACE_BASE`) holding the index value.
    Memory { space: Space, indirect: bool, address: u16, index: Option<u8> },
}

impl Default for Operand {
    fn default() -> Operand {
        Operand::Nothing
    }
}

impl Operand {
    /// a short-form operand: direct, cpu space, no index.
    pub fn direct(address: u16) -> Operand {
        Operand::Memory { space: Space::Cpu, indirect: false, address, index: None }
    }

    /// a direct GROM address, as used by branch and call targets.
    pub fn grom(address: u16) -> Operand {
        Operand::Memory { space: Space::Grom, indirect: false, address, index: None }
    }

    pub fn is_immediate(&self) -> bool {
        matches!(self, Operand::ImmB { .. } | Operand::ImmW { .. })
    }

    /// the raw address (or literal) carried by this operand, if any.
    pub fn address(&self) -> Option<u16> {
        match *self {
            Operand::Nothing => None,
            Operand::ImmB { imm } => Some(imm as u16),
            Operand::ImmW { imm } => Some(imm),
            Operand::VRegister { num } => Some(num as u16),
            Operand::Memory { address, .. } => Some(address),
        }
    }

    /// the address this operand refers to once biased by the workspace base. cpu-space operands
    /// and every indirect operand are workspace-relative; direct VDP and GROM operands are not.
    pub fn effective_address(&self) -> Option<u16> {
        match *self {
            Operand::Memory { space, indirect, address, .. } => {
                if indirect || space == Space::Cpu {
                    Some(address.wrapping_add(WORKSPACE_BASE))
                } else {
                    Some(address)
                }
            }
            _ => None,
        }
    }

    /// the cpu address of the index byte, for indexed operands.
    pub fn index_address(&self) -> Option<u16> {
        match *self {
            Operand::Memory { index: Some(index), .. } => Some(WORKSPACE_BASE + index as u16),
            _ => None,
        }
    }
}

/// the width of an immediate operand.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Width {
    Byte,
    Word,
}

impl Width {
    pub(crate) fn from_bit(word: bool) -> Width {
        if word { Width::Word } else { Width::Byte }
    }
}

/// byte-level reading shared by the instruction and format decoders. every read goes through
/// the `Reader`, so an operand running off the end of the input is reported as
/// `ExhaustedInput` rather than read out of bounds.
pub(crate) trait DecodeHandler<T: Reader<<GPL as Arch>::Address, <GPL as Arch>::Word>> {
    #[inline(always)]
    fn read_u8(&mut self, words: &mut T) -> Result<u8, <GPL as Arch>::DecodeError> {
        let b = words.next()?;
        self.on_word_read(b);
        Ok(b)
    }
    #[inline(always)]
    fn read_u16(&mut self, words: &mut T) -> Result<u16, <GPL as Arch>::DecodeError> {
        let mut buf = [0u8; 2];
        words.next_n(&mut buf).ok().ok_or(StandardDecodeError::ExhaustedInput)?;
        self.on_word_read(buf[0]);
        self.on_word_read(buf[1]);
        Ok(u16::from_be_bytes(buf))
    }
    /// the general address operand.
    ///
    /// short form is one byte, `0aaaaaaa`, a direct workspace offset. long form starts
    /// `1xvi aaaa`: `x` indexed, `v` VDP space, `i` indirect, and `aaaa` the high nibble of a
    /// 12-bit address completed by the next byte. a high nibble of `1111` instead means the next
    /// two bytes are a full 16-bit address. indexed operands end with one more byte naming the
    /// index register.
    fn read_address_operand(&mut self, words: &mut T) -> Result<Operand, <GPL as Arch>::DecodeError> {
        let b0 = self.read_u8(words)?;
        if b0 & 0x80 == 0 {
            return Ok(Operand::direct(b0 as u16));
        }

        let indexed = b0 & 0x40 != 0;
        let space = if b0 & 0x20 != 0 { Space::Vdp } else { Space::Cpu };
        let indirect = b0 & 0x10 != 0;

        let b1 = self.read_u8(words)?;
        let address = if b0 & 0x0f == 0x0f {
            let b2 = self.read_u8(words)?;
            u16::from_be_bytes([b1, b2])
        } else {
            u16::from_be_bytes([b0 & 0x0f, b1])
        };

        let index = if indexed {
            Some(self.read_u8(words)?)
        } else {
            None
        };

        Ok(Operand::Memory { space, indirect, address, index })
    }
    fn read_immediate(&mut self, width: Width, words: &mut T) -> Result<Operand, <GPL as Arch>::DecodeError> {
        match width {
            Width::Byte => Ok(Operand::ImmB { imm: self.read_u8(words)? }),
            Width::Word => Ok(Operand::ImmW { imm: self.read_u16(words)? }),
        }
    }
    /// a `MOVE` source or destination: either a general address operand, or a 16-bit GROM
    /// address optionally followed by an index byte.
    fn read_move_operand(&mut self, address_form: bool, indexed: bool, words: &mut T) -> Result<Operand, <GPL as Arch>::DecodeError> {
        if address_form {
            return self.read_address_operand(words);
        }
        let address = self.read_u16(words)?;
        let index = if indexed {
            Some(self.read_u8(words)?)
        } else {
            None
        };
        Ok(Operand::Memory { space: Space::Grom, indirect: false, address, index })
    }
    fn on_decode_start(&mut self) {}
    fn on_word_read(&mut self, _word: <GPL as Arch>::Word) {}
}

/// counts bytes for a bare operand decode.
struct ByteCount(u8);

impl<T: Reader<<GPL as Arch>::Address, <GPL as Arch>::Word>> DecodeHandler<T> for ByteCount {
    fn on_word_read(&mut self, _word: u8) {
        self.0 += 1;
    }
}

/// decode one general address operand from `words`, returning it with the number of bytes it
/// occupied (1 to 4).
pub fn decode_operand<T: Reader<<GPL as Arch>::Address, <GPL as Arch>::Word>>(words: &mut T) -> Result<(Operand, u8), <GPL as Arch>::DecodeError> {
    let mut count = ByteCount(0);
    let operand = count.read_address_operand(words)?;
    Ok((operand, count.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaxpeax_arch::U8Reader;

    fn decode(bytes: &[u8]) -> Result<(Operand, u8), StandardDecodeError> {
        decode_operand(&mut U8Reader::new(bytes))
    }

    #[test]
    fn short_form_is_one_byte() {
        for b in 0..0x80u8 {
            let (op, len) = decode(&[b, 0xff, 0xff]).expect("short form decodes");
            assert_eq!(len, 1);
            assert_eq!(op, Operand::direct(b as u16));
            assert_eq!(op.address(), Some(b as u16));
        }
    }

    #[test]
    fn long_forms() {
        // indirect cpu, 12-bit
        assert_eq!(
            decode(&[0x90, 0x42]),
            Ok((Operand::Memory { space: Space::Cpu, indirect: true, address: 0x0042, index: None }, 2))
        );
        // vdp, 12-bit
        assert_eq!(
            decode(&[0xa3, 0x80]),
            Ok((Operand::Memory { space: Space::Vdp, indirect: false, address: 0x0380, index: None }, 2))
        );
        // extended, vdp
        assert_eq!(
            decode(&[0xaf, 0x12, 0x34]),
            Ok((Operand::Memory { space: Space::Vdp, indirect: false, address: 0x1234, index: None }, 3))
        );
        // extended, indexed
        assert_eq!(
            decode(&[0xef, 0x12, 0x34, 0x5e]),
            Ok((Operand::Memory { space: Space::Vdp, indirect: false, address: 0x1234, index: Some(0x5e) }, 4))
        );
    }

    #[test]
    fn truncated_operands_are_errors() {
        assert_eq!(decode(&[]), Err(StandardDecodeError::ExhaustedInput));
        assert_eq!(decode(&[0x80]), Err(StandardDecodeError::ExhaustedInput));
        assert_eq!(decode(&[0x8f, 0x00]), Err(StandardDecodeError::ExhaustedInput));
        assert_eq!(decode(&[0xc0, 0x00]), Err(StandardDecodeError::ExhaustedInput));
    }

    #[test]
    fn effective_addresses() {
        assert_eq!(Operand::direct(0x10).effective_address(), Some(0x8310));
        assert_eq!(Operand::grom(0x6010).effective_address(), Some(0x6010));
        let vdp_indirect = Operand::Memory { space: Space::Vdp, indirect: true, address: 0x20, index: None };
        assert_eq!(vdp_indirect.effective_address(), Some(0x8320));
        // cpu addresses wrap past the top of memory
        assert_eq!(Operand::direct(0x7d00).effective_address(), Some(0x0000));
    }
}
