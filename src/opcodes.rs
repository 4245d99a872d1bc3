//! opcode tables for GPL and its format sub-language.
//!
//! GPL sorts opcodes into classes by value range rather than by any field layout:
//! * `0x00-0x1f`: no operands, or one immediate.
//! * `0x20-0x3f`: `MOVE`, with the shape of its three operands spelled by the low five bits.
//! * `0x40-0x7f`: `BR` and `BS`, with a 13-bit bank-relative target.
//! * `0x80-0x9f`: one general operand, low bit selects byte or word.
//! * `0xa0-0xff`: two operands, bit 0 selects byte or word and bit 1 an immediate source.

use crate::{FormatOpcode, Opcode};

/// operand shape for the `0x00-0x1f` class.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Type23 {
    /// nothing follows the opcode.
    Bare,
    /// one byte literal follows.
    ImmByte,
    /// a 16-bit GROM address follows.
    GromWord,
}

pub(crate) const TYPE23_OPS: [(Opcode, Type23); 32] = [
    /* 0x00 */ (Opcode::RTN, Type23::Bare),
    /* 0x01 */ (Opcode::RTNC, Type23::Bare),
    /* 0x02 */ (Opcode::RAND, Type23::ImmByte),
    /* 0x03 */ (Opcode::SCAN, Type23::Bare),
    /* 0x04 */ (Opcode::BACK, Type23::ImmByte),
    /* 0x05 */ (Opcode::B, Type23::GromWord),
    /* 0x06 */ (Opcode::CALL, Type23::GromWord),
    /* 0x07 */ (Opcode::ALL, Type23::ImmByte),
    /* 0x08 */ (Opcode::FMT, Type23::Bare),
    /* 0x09 */ (Opcode::H, Type23::Bare),
    /* 0x0a */ (Opcode::GT, Type23::Bare),
    /* 0x0b */ (Opcode::EXIT, Type23::Bare),
    /* 0x0c */ (Opcode::CARRY, Type23::Bare),
    /* 0x0d */ (Opcode::OVF, Type23::Bare),
    /* 0x0e */ (Opcode::PARSE, Type23::ImmByte),
    /* 0x0f */ (Opcode::XML, Type23::ImmByte),
    /* 0x10 */ (Opcode::CONT, Type23::Bare),
    /* 0x11 */ (Opcode::EXEC, Type23::Bare),
    /* 0x12 */ (Opcode::RTNB, Type23::Bare),
    /* 0x13 */ (Opcode::RTGR, Type23::Bare),
    /* 0x14 */ (Opcode::XG_4, Type23::Bare),
    /* 0x15 */ (Opcode::XG_5, Type23::Bare),
    /* 0x16 */ (Opcode::XG_6, Type23::Bare),
    /* 0x17 */ (Opcode::XG_7, Type23::Bare),
    /* 0x18 */ (Opcode::XG_8, Type23::Bare),
    /* 0x19 */ (Opcode::XG_9, Type23::Bare),
    /* 0x1a */ (Opcode::XG_A, Type23::Bare),
    /* 0x1b */ (Opcode::XG_B, Type23::Bare),
    /* 0x1c */ (Opcode::XG_C, Type23::Bare),
    /* 0x1d */ (Opcode::XG_D, Type23::Bare),
    /* 0x1e */ (Opcode::XG_E, Type23::Bare),
    /* 0x1f */ (Opcode::XG_DOLLAR, Type23::Bare),
];

/// indexed by bit 5.
pub(crate) const TYPE4_OPS: [Opcode; 2] = [
    /* 0x40-0x5f */ Opcode::BR,
    /* 0x60-0x7f */ Opcode::BS,
];

/// indexed by `(op - 0x80) >> 1`.
pub(crate) const TYPE5_OPS: [Opcode; 16] = [
    /* 0x80-0x81 */ Opcode::ABS,
    /* 0x82-0x83 */ Opcode::NEG,
    /* 0x84-0x85 */ Opcode::INV,
    /* 0x86-0x87 */ Opcode::CLR,
    /* 0x88-0x89 */ Opcode::FETCH,
    /* 0x8a-0x8b */ Opcode::CASE,
    /* 0x8c-0x8d */ Opcode::PUSH,
    /* 0x8e-0x8f */ Opcode::CZ,
    /* 0x90-0x91 */ Opcode::INC,
    /* 0x92-0x93 */ Opcode::DEC,
    /* 0x94-0x95 */ Opcode::INCT,
    /* 0x96-0x97 */ Opcode::DECT,
    /* 0x98-0x99 */ Opcode::XG_0,
    /* 0x9a-0x9b */ Opcode::XG_1,
    /* 0x9c-0x9d */ Opcode::XG_2,
    /* 0x9e-0x9f */ Opcode::XG_3,
];

/// indexed by `(op - 0xa0) >> 2`.
pub(crate) const TYPE1_OPS: [Opcode; 24] = [
    /* 0xa0-0xa3 */ Opcode::ADD,
    /* 0xa4-0xa7 */ Opcode::SUB,
    /* 0xa8-0xab */ Opcode::MUL,
    /* 0xac-0xaf */ Opcode::DIV,
    /* 0xb0-0xb3 */ Opcode::AND,
    /* 0xb4-0xb7 */ Opcode::OR,
    /* 0xb8-0xbb */ Opcode::XOR,
    /* 0xbc-0xbf */ Opcode::ST,
    /* 0xc0-0xc3 */ Opcode::EX,
    /* 0xc4-0xc7 */ Opcode::CH,
    /* 0xc8-0xcb */ Opcode::CHE,
    /* 0xcc-0xcf */ Opcode::CGT,
    /* 0xd0-0xd3 */ Opcode::CGE,
    /* 0xd4-0xd7 */ Opcode::CEQ,
    /* 0xd8-0xdb */ Opcode::CLOG,
    /* 0xdc-0xdf */ Opcode::SRA,
    /* 0xe0-0xe3 */ Opcode::SLL,
    /* 0xe4-0xe7 */ Opcode::SRL,
    /* 0xe8-0xeb */ Opcode::SRC,
    /* 0xec-0xef */ Opcode::COINC,
    /* 0xf0-0xf3 */ Opcode::XG_F,
    /* 0xf4-0xf7 */ Opcode::IO,
    /* 0xf8-0xfb */ Opcode::SWGR,
    /* 0xfc-0xff */ Opcode::XG_G,
];

/// operand shape for format opcodes below [`FORMAT_END`]. every one of these carries a count,
/// `(op & 0x1f) + 1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum FormatShape {
    /// `count` bytes of literal screen text follow.
    Text,
    /// the count and one byte literal.
    CountByte,
    /// the count and one general address operand.
    CountAddress,
    /// the count alone.
    Count,
}

/// indexed by `op >> 5`.
pub(crate) const FORMAT_LOW_OPS: [(FormatOpcode, FormatShape); 8] = [
    /* 0x00-0x1f */ (FormatOpcode::HTEX, FormatShape::Text),
    /* 0x20-0x3f */ (FormatOpcode::VTEX, FormatShape::Text),
    /* 0x40-0x5f */ (FormatOpcode::HCHA, FormatShape::CountByte),
    /* 0x60-0x7f */ (FormatOpcode::VCHA, FormatShape::CountByte),
    /* 0x80-0x9f */ (FormatOpcode::COL_PLUS, FormatShape::Count),
    /* 0xa0-0xbf */ (FormatOpcode::ROW_PLUS, FormatShape::Count),
    /* 0xc0-0xdf */ (FormatOpcode::RPTB, FormatShape::Count),
    /* 0xe0-0xfa */ (FormatOpcode::HSTR, FormatShape::CountAddress),
];

/// the single operand of format opcodes `0xfb-0xff`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum FormatHigh {
    GromWord,
    ImmByte,
    Address,
}

/// indexed by `op - 0xfb`.
pub(crate) const FORMAT_HIGH_OPS: [(FormatOpcode, FormatHigh); 5] = [
    /* 0xfb */ (FormatOpcode::NEXT, FormatHigh::GromWord),
    /* 0xfc */ (FormatOpcode::SCRO, FormatHigh::ImmByte),
    /* 0xfd */ (FormatOpcode::SCRO, FormatHigh::Address),
    /* 0xfe */ (FormatOpcode::ROW, FormatHigh::ImmByte),
    /* 0xff */ (FormatOpcode::COL, FormatHigh::ImmByte),
];

/// `CALL`. subroutines may take inline argument bytes after the call.
pub const CALL_OPCODE: u8 = 0x06;
/// `FMT`. the bytes following are format sub-language.
pub const FORMAT_ENTRY_OPCODE: u8 = 0x08;
/// ends the outermost format block, or closes a `RPTB` repeat block as `NEXT`.
pub const FORMAT_END: u8 = 0xfb;
/// the range of `RPTB`, which opens a repeat block.
pub const FORMAT_REPEAT: core::ops::RangeInclusive<u8> = 0xc0..=0xdf;
