use yaxpeax_arch::{Arch, Reader, StandardDecodeError};

use crate::opcodes::{FormatHigh, FormatShape, FORMAT_HIGH_OPS, FORMAT_LOW_OPS};
use crate::operand::{DecodeHandler, Operand, Width};
use crate::GPL;

/// an operation in the `FMT` sub-language.
#[allow(non_camel_case_types)]
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum FormatOpcode {
    /// horizontal text
    HTEX,
    /// vertical text
    VTEX,
    /// horizontal repeated character
    HCHA,
    /// vertical repeated character
    VCHA,
    COL_PLUS,
    ROW_PLUS,
    /// repeat block, closed by `NEXT`
    RPTB,
    /// horizontal string from memory
    HSTR,
    NEXT,
    SCRO,
    ROW,
    COL,
}

/// up to 32 bytes of screen text carried inline by `HTEX` or `VTEX`.
#[derive(Copy, Clone, Hash, PartialEq, Eq)]
pub struct TextRun {
    bytes: [u8; 32],
    len: u8,
}

impl TextRun {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

impl core::fmt::Debug for TextRun {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_tuple("TextRun").field(&self.as_bytes()).finish()
    }
}

#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum FormatOperands {
    /// literal text, its count implied by its length.
    Text(TextRun),
    /// a repeat or offset count, 1 to 32.
    Count(u8),
    /// a count and what it applies to.
    CountOperand(u8, Operand),
    Operand(Operand),
}

/// one decoded unit of the format sub-language.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct FormatOp {
    opcode: FormatOpcode,
    operands: FormatOperands,
    length: u8,
}

impl Default for FormatOp {
    fn default() -> FormatOp {
        FormatOp {
            opcode: FormatOpcode::HTEX,
            operands: FormatOperands::Count(1),
            length: 0,
        }
    }
}

impl FormatOp {
    pub fn opcode(&self) -> FormatOpcode {
        self.opcode
    }

    pub fn operands(&self) -> &FormatOperands {
        &self.operands
    }

    /// the length of this op in bytes, opcode included.
    pub fn length(&self) -> u8 {
        self.length
    }

    /// `RPTB` nests one level deeper.
    pub fn opens_block(&self) -> bool {
        self.opcode == FormatOpcode::RPTB
    }

    /// `NEXT` closes the innermost `RPTB`.
    pub fn closes_block(&self) -> bool {
        self.opcode == FormatOpcode::NEXT
    }
}

impl<T: Reader<<GPL as Arch>::Address, <GPL as Arch>::Word>> DecodeHandler<T> for FormatOp {
    fn on_decode_start(&mut self) {
        *self = FormatOp::default();
    }
    fn on_word_read(&mut self, _word: <GPL as Arch>::Word) {
        self.length += 1;
    }
}

/// decodes the format sub-language.
///
/// `0xfb` always decodes as `NEXT` here. at the outermost level the same byte ends format mode
/// altogether; telling the two apart needs the nesting depth, which is [`Region`](crate::Region)'s
/// business.
#[derive(Debug, Default, Copy, Clone)]
pub struct FormatDecoder;

impl FormatDecoder {
    pub fn decode<T: Reader<<GPL as Arch>::Address, <GPL as Arch>::Word>>(&self, words: &mut T) -> Result<FormatOp, StandardDecodeError> {
        let mut op = FormatOp::default();
        self.decode_into(&mut op, words)?;
        Ok(op)
    }

    pub fn decode_into<T: Reader<<GPL as Arch>::Address, <GPL as Arch>::Word>>(&self, op: &mut FormatOp, words: &mut T) -> Result<(), StandardDecodeError> {
        DecodeHandler::<T>::on_decode_start(op);

        let b = op.read_u8(words)?;

        if b < 0xfb {
            let (opcode, shape) = FORMAT_LOW_OPS[(b >> 5) as usize];
            let count = (b & 0x1f) + 1;
            op.opcode = opcode;
            op.operands = match shape {
                FormatShape::Text => {
                    let mut bytes = [0u8; 32];
                    for i in 0..count as usize {
                        bytes[i] = op.read_u8(words)?;
                    }
                    FormatOperands::Text(TextRun { bytes, len: count })
                }
                FormatShape::CountByte => {
                    FormatOperands::CountOperand(count, op.read_immediate(Width::Byte, words)?)
                }
                FormatShape::CountAddress => {
                    FormatOperands::CountOperand(count, op.read_address_operand(words)?)
                }
                FormatShape::Count => FormatOperands::Count(count),
            };
        } else {
            let (opcode, shape) = FORMAT_HIGH_OPS[(b - 0xfb) as usize];
            op.opcode = opcode;
            let operand = match shape {
                FormatHigh::GromWord => Operand::grom(op.read_u16(words)?),
                FormatHigh::ImmByte => op.read_immediate(Width::Byte, words)?,
                FormatHigh::Address => op.read_address_operand(words)?,
            };
            op.operands = FormatOperands::Operand(operand);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaxpeax_arch::U8Reader;

    fn decode(bytes: &[u8]) -> Result<FormatOp, StandardDecodeError> {
        FormatDecoder.decode(&mut U8Reader::new(bytes))
    }

    #[test]
    fn text_consumes_its_count() {
        let op = decode(&[0x02, b'A', b'B', b'C', 0xff]).expect("decodes");
        assert_eq!(op.opcode(), FormatOpcode::HTEX);
        assert_eq!(op.length(), 4);
        match op.operands() {
            FormatOperands::Text(text) => assert_eq!(text.as_bytes(), b"ABC"),
            other => panic!("unexpected operands {:?}", other),
        }

        let op = decode(&[0x3f; 33]).expect("decodes");
        assert_eq!(op.opcode(), FormatOpcode::VTEX);
        assert_eq!(op.length(), 33);
    }

    #[test]
    fn repeat_blocks() {
        let rptb = decode(&[0xc3]).expect("decodes");
        assert!(rptb.opens_block());
        assert_eq!(rptb.operands(), &FormatOperands::Count(4));
        assert_eq!(rptb.length(), 1);

        let next = decode(&[0xfb, 0x60, 0x10]).expect("decodes");
        assert!(next.closes_block());
        assert_eq!(next.operands(), &FormatOperands::Operand(Operand::grom(0x6010)));
        assert_eq!(next.length(), 3);
    }

    #[test]
    fn truncated() {
        assert_eq!(decode(&[0x01, b'A']), Err(StandardDecodeError::ExhaustedInput));
        assert_eq!(decode(&[0x40]), Err(StandardDecodeError::ExhaustedInput));
        assert_eq!(decode(&[0xfb, 0x60]), Err(StandardDecodeError::ExhaustedInput));
    }
}
