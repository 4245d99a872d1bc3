//! # `yaxpeax-gpl`, a decoder for TI GPL
//!
//! GPL ("graphics programming language") is the byte-coded interpreted language the TI-99/4A runs
//! out of its GROMs. it is irregular in the way byte codes for 8-bit-era machines tend to be:
//! opcode classes are sorted by value range, operands are one to four bytes depending on flags in
//! their first byte, and one opcode (`FMT`) switches the following bytes into a separate screen
//! formatting sub-language with its own opcode space and its own nesting.
//!
//! instructions are decoded through [`InstDecoder`], which implements
//! [`yaxpeax_arch::Decoder`] for the unit struct [`GPL`]:
//! ```
//! use yaxpeax_arch::{Decoder, U8Reader};
//! use yaxpeax_gpl::InstDecoder;
//!
//! let inst = InstDecoder::default().decode(&mut U8Reader::new(&[0x87, 0x10])).unwrap();
//! assert_eq!("DCLR  @>8310", inst.to_string());
//! ```
//!
//! format sub-language bytes decode through [`FormatDecoder`]. walking a whole GROM image,
//! switching between the two and treating inline subroutine arguments as data, is the job of
//! [`Region`].

mod call_args;
mod display;
mod format;
pub mod opcodes;
mod operand;
mod region;

use yaxpeax_arch::{AddressDiff, Arch, Decoder, LengthedInstruction, Reader, StandardDecodeError};

pub use call_args::{CallArgs, CallArgsError};
pub use format::{FormatDecoder, FormatOp, FormatOpcode, FormatOperands, TextRun};
pub use operand::{decode_operand, Operand, Space, Width, WORKSPACE_BASE};
pub use region::{DecodeState, Line, Mode, Region, RegionError, Unit};

use opcodes::{Type23, TYPE1_OPS, TYPE23_OPS, TYPE4_OPS, TYPE5_OPS};
use operand::DecodeHandler;

/// a trivial struct for [`yaxpeax_arch::Arch`] to be implemented on.
#[derive(Hash, Eq, PartialEq, Debug, Copy, Clone)]
pub struct GPL;

impl Arch for GPL {
    type Address = u16;
    type Word = u8;
    type Instruction = Instruction;
    type DecodeError = StandardDecodeError;
    type Decoder = InstDecoder;
    type Operand = Operand;
}

/// a GPL instruction.
///
/// GPL instructions have an [`Opcode`] and up to three [`Operand`]s. only `MOVE` has three;
/// two-operand instructions store the source first.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct Instruction {
    opcode: Opcode,
    operands: [Operand; 3],
    word: bool,
    length: u8,
}

impl Default for Instruction {
    fn default() -> Instruction {
        Instruction {
            opcode: Opcode::RTN,
            operands: [Operand::Nothing, Operand::Nothing, Operand::Nothing],
            word: false,
            length: 1,
        }
    }
}

impl Instruction {
    fn reset(&mut self) {
        self.opcode = Opcode::RTN;
        self.operands = [Operand::Nothing, Operand::Nothing, Operand::Nothing];
        self.word = false;
        self.length = 0;
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// the operands present on this instruction, in display order.
    pub fn operands(&self) -> &[Operand] {
        &self.operands[..self.operand_count() as usize]
    }

    pub fn operand_count(&self) -> u8 {
        self.operands.iter().take_while(|op| **op != Operand::Nothing).count() as u8
    }

    /// `true` for the word (`D`-prefixed) form of a byte/word instruction.
    pub fn is_word(&self) -> bool {
        self.word
    }

    /// the length of this instruction in bytes, opcode included.
    pub fn length(&self) -> u8 {
        self.length
    }

    /// `true` if the bytes after this instruction are format sub-language.
    pub fn enters_format(&self) -> bool {
        self.opcode == Opcode::FMT
    }

    /// for `CALL`, the GROM address called.
    pub fn call_target(&self) -> Option<u16> {
        if self.opcode == Opcode::CALL {
            self.operands[0].address()
        } else {
            None
        }
    }
}

impl LengthedInstruction for Instruction {
    type Unit = AddressDiff<<GPL as Arch>::Address>;
    fn min_size() -> Self::Unit {
        AddressDiff::from_const(1)
    }
    fn len(&self) -> Self::Unit {
        AddressDiff::from_const(self.length as u16)
    }
}

impl yaxpeax_arch::Instruction for Instruction {
    // every opcode byte has a defined decoding
    fn well_defined(&self) -> bool { true }
}

/// a GPL instruction's operation. `XG` opcodes are the undocumented ones; `Display` renders the
/// mnemonic as the TI assembler spells it.
#[allow(non_camel_case_types)]
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum Opcode {
    RTN,
    RTNC,
    RAND,
    SCAN,
    BACK,
    B,
    CALL,
    ALL,
    FMT,
    H,
    GT,
    EXIT,
    CARRY,
    OVF,
    PARSE,
    XML,
    CONT,
    EXEC,
    RTNB,
    RTGR,
    XG_4,
    XG_5,
    XG_6,
    XG_7,
    XG_8,
    XG_9,
    XG_A,
    XG_B,
    XG_C,
    XG_D,
    XG_E,
    XG_DOLLAR,
    MOVE,
    BR,
    BS,
    ABS,
    NEG,
    INV,
    CLR,
    FETCH,
    CASE,
    PUSH,
    CZ,
    INC,
    DEC,
    INCT,
    DECT,
    XG_0,
    XG_1,
    XG_2,
    XG_3,
    ADD,
    SUB,
    MUL,
    DIV,
    AND,
    OR,
    XOR,
    ST,
    EX,
    CH,
    CHE,
    CGT,
    CGE,
    CEQ,
    CLOG,
    SRA,
    SLL,
    SRL,
    SRC,
    COINC,
    XG_F,
    IO,
    SWGR,
    XG_G,
}

/// decodes GPL instructions.
///
/// GPL branches carry only the low 13 bits of their target; the rest comes from the address of
/// the branch itself. a decoder built with [`InstDecoder::at`] resolves targets against that
/// address. the default decoder assumes address 0.
#[derive(Debug, Default, Copy, Clone)]
pub struct InstDecoder {
    address: u16,
}

impl InstDecoder {
    /// a decoder for the instruction at GROM address `address`.
    pub fn at(address: u16) -> Self {
        InstDecoder { address }
    }
}

impl<T: Reader<<GPL as Arch>::Address, <GPL as Arch>::Word>> DecodeHandler<T> for Instruction {
    fn on_decode_start(&mut self) {
        self.reset();
    }
    fn on_word_read(&mut self, _word: <GPL as Arch>::Word) {
        self.length += 1;
    }
}

impl Decoder<GPL> for InstDecoder {
    fn decode_into<T: Reader<<GPL as Arch>::Address, <GPL as Arch>::Word>>(&self, inst: &mut Instruction, words: &mut T) -> Result<(), <GPL as Arch>::DecodeError> {
        decode_inst(self, inst, words)
    }
}

fn decode_inst<T: Reader<<GPL as Arch>::Address, <GPL as Arch>::Word>>(decoder: &InstDecoder, inst: &mut Instruction, words: &mut T) -> Result<(), <GPL as Arch>::DecodeError> {
    DecodeHandler::<T>::on_decode_start(inst);

    let op = inst.read_u8(words)?;

    if op < 0x20 {
        let (opcode, shape) = TYPE23_OPS[op as usize];
        inst.opcode = opcode;
        match shape {
            Type23::Bare => {}
            Type23::ImmByte => {
                inst.operands[0] = inst.read_immediate(Width::Byte, words)?;
            }
            Type23::GromWord => {
                inst.operands[0] = Operand::grom(inst.read_u16(words)?);
            }
        }
    } else if op < 0x40 {
        // 0 0 1 g r v c i
        // `i`: count is a word immediate rather than an address operand.
        // `g`/`r`: destination is an address operand / indexed GROM address. both set means a VDP
        // register.
        // `v`/`c`: same for the source, without the register case.
        let g = op & 0b1_0000 != 0;
        let r = op & 0b0_1000 != 0;
        let v = op & 0b0_0100 != 0;
        let c = op & 0b0_0010 != 0;
        inst.opcode = Opcode::MOVE;
        let count = if op & 1 != 0 {
            inst.read_immediate(Width::Word, words)?
        } else {
            inst.read_address_operand(words)?
        };
        let mut dest = inst.read_move_operand(g, r, words)?;
        if g && r {
            let num = dest.address().unwrap_or(0) & 0b111;
            dest = Operand::VRegister { num: num as u8 };
        }
        let source = inst.read_move_operand(v, c, words)?;
        inst.operands = [count, source, dest];
    } else if op < 0x80 {
        inst.opcode = TYPE4_OPS[((op - 0x40) >> 5) as usize];
        let low = inst.read_u8(words)?;
        let target = (decoder.address & !0x1fff) | u16::from_be_bytes([op & 0x1f, low]);
        inst.operands[0] = Operand::grom(target);
    } else if op < 0xa0 {
        inst.opcode = TYPE5_OPS[((op - 0x80) >> 1) as usize];
        inst.word = op & 1 != 0;
        inst.operands[0] = inst.read_address_operand(words)?;
    } else {
        inst.opcode = TYPE1_OPS[((op - 0xa0) >> 2) as usize];
        inst.word = op & 1 != 0;
        let dest = inst.read_address_operand(words)?;
        let source = if op & 0b10 != 0 {
            inst.read_immediate(Width::from_bit(inst.word), words)?
        } else {
            inst.read_address_operand(words)?
        };
        inst.operands[0] = source;
        inst.operands[1] = dest;
    }

    Ok(())
}

/// parse a hexadecimal number the way GPL listings write them: bare, or prefixed with `>`, `$` or
/// `0x`.
pub fn parse_hex(text: &str) -> Result<u32, core::num::ParseIntError> {
    let text = text.trim();
    let digits = text
        .strip_prefix('>')
        .or_else(|| text.strip_prefix('$'))
        .or_else(|| text.strip_prefix("0x"))
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u32::from_str_radix(digits, 16)
}

#[test]
fn hex_prefixes() {
    assert_eq!(parse_hex("6000"), Ok(0x6000));
    assert_eq!(parse_hex(">6000"), Ok(0x6000));
    assert_eq!(parse_hex("0x6a0f"), Ok(0x6a0f));
    assert_eq!(parse_hex(" $ff "), Ok(0xff));
    assert!(parse_hex("g000").is_err());
    assert!(parse_hex("").is_err());
}
