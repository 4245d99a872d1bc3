use core::cmp;
use core::fmt;

use log::{debug, trace};
use thiserror::Error;
use yaxpeax_arch::{Decoder, DecodeError, StandardDecodeError, U8Reader};

use crate::opcodes::FORMAT_END;
use crate::{CallArgs, FormatDecoder, FormatOp, InstDecoder, Instruction};

/// what the bytes at the cursor are, absent pending call arguments.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// inside `FMT`. `depth` is 1 at the outermost level and grows by one per open `RPTB`.
    Format { depth: u32 },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DecodeState {
    Decoding(Mode),
    /// `remaining` bytes of inline `CALL` arguments are still to come. takes priority over
    /// whatever mode it interrupted, which resumes afterward.
    PendingData { remaining: u32, interrupted: Mode },
}

#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error("unit at >{address:04X} runs past the end of the image ({available} bytes left)")]
    Truncated { address: u16, available: usize },
    #[error("unit at >{address:04X} could not be decoded: {description}")]
    Undecodable { address: u16, description: &'static str },
}

/// one listing line's worth of decoded bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Unit<'a> {
    Instruction(Instruction),
    Format(FormatOp),
    /// the `0xfb` that closes the outermost format block.
    FormatEnd,
    Data(&'a [u8]),
}

impl<'a> Unit<'a> {
    /// bytes this unit occupies.
    pub fn len(&self) -> usize {
        match self {
            Unit::Instruction(inst) => inst.length() as usize,
            Unit::Format(op) => op.length() as usize,
            Unit::FormatEnd => 1,
            Unit::Data(bytes) => bytes.len(),
        }
    }
}

impl<'a> fmt::Display for Unit<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Unit::Instruction(inst) => write!(f, "{}", inst),
            Unit::Format(op) => write!(f, "{}", op),
            Unit::FormatEnd => f.write_str("FEND"),
            Unit::Data(bytes) => {
                f.write_str("DATA  ")?;
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, ">{:02X}", b)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    pub address: u16,
    pub unit: Unit<'a>,
}

impl<'a> fmt::Display for Line<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, ">{:04X} : {}", self.address, self.unit)
    }
}

/// walks a run of GPL bytes from start to end, yielding one [`Line`] per instruction, format op,
/// or run of call arguments.
///
/// the walk stops at the end of `bytes`, or after yielding an error for a unit that does not fit
/// in what is left.
pub struct Region<'a> {
    bytes: &'a [u8],
    start: u16,
    offset: usize,
    state: DecodeState,
    call_args: &'a CallArgs,
    failed: bool,
}

impl<'a> Region<'a> {
    /// `bytes` are loaded at GROM address `start`.
    pub fn new(start: u16, bytes: &'a [u8], call_args: &'a CallArgs) -> Self {
        Region {
            bytes,
            start,
            offset: 0,
            state: DecodeState::Decoding(Mode::Normal),
            call_args,
            failed: false,
        }
    }

    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn step(&mut self, address: u16) -> Result<Unit<'a>, RegionError> {
        let bytes: &'a [u8] = self.bytes;
        let rest = &bytes[self.offset..];
        match self.state {
            DecodeState::PendingData { remaining, interrupted } => {
                let n = cmp::min(remaining as usize, rest.len());
                let remaining = remaining - n as u32;
                self.state = if remaining == 0 {
                    DecodeState::Decoding(interrupted)
                } else {
                    DecodeState::PendingData { remaining, interrupted }
                };
                Ok(Unit::Data(&rest[..n]))
            }
            DecodeState::Decoding(Mode::Format { depth: 1 }) if rest[0] == FORMAT_END => {
                trace!(">{:04X}: leaving format mode", address);
                self.state = DecodeState::Decoding(Mode::Normal);
                Ok(Unit::FormatEnd)
            }
            DecodeState::Decoding(Mode::Format { depth }) => {
                let op = self.decode(address, rest, |words| FormatDecoder.decode(words))?;
                let op = match op {
                    Some(op) => op,
                    None => return Ok(Unit::Data(&rest[..1])),
                };
                if op.opens_block() {
                    self.state = DecodeState::Decoding(Mode::Format { depth: depth + 1 });
                } else if op.closes_block() {
                    self.state = DecodeState::Decoding(Mode::Format { depth: depth - 1 });
                }
                Ok(Unit::Format(op))
            }
            DecodeState::Decoding(Mode::Normal) => {
                let inst = self.decode(address, rest, |words| InstDecoder::at(address).decode(words))?;
                let inst = match inst {
                    Some(inst) => inst,
                    None => return Ok(Unit::Data(&rest[..1])),
                };
                if let Some(target) = inst.call_target() {
                    let remaining = self.call_args.get(target);
                    if remaining > 0 {
                        trace!(">{:04X}: {} bytes of arguments to >{:04X}", address, remaining, target);
                        self.state = DecodeState::PendingData { remaining, interrupted: Mode::Normal };
                    }
                } else if inst.enters_format() {
                    trace!(">{:04X}: entering format mode", address);
                    self.state = DecodeState::Decoding(Mode::Format { depth: 1 });
                }
                Ok(Unit::Instruction(inst))
            }
        }
    }

    /// run `decode` over `rest`. an opcode the decoder rejects comes back as `None`, to be listed
    /// as a single data byte; running out of bytes is an error.
    ///
    /// every GPL opcode byte currently has a decoding, so neither decoder reports `bad_opcode()`
    /// or any other error besides exhausted input. those arms decide what the listing does if
    /// a table entry is ever marked invalid.
    fn decode<T>(
        &self,
        address: u16,
        rest: &'a [u8],
        decode: impl FnOnce(&mut U8Reader<'a>) -> Result<T, StandardDecodeError>,
    ) -> Result<Option<T>, RegionError> {
        let mut words = U8Reader::new(rest);
        match decode(&mut words) {
            Ok(unit) => Ok(Some(unit)),
            Err(e) if e.data_exhausted() => Err(RegionError::Truncated { address, available: rest.len() }),
            Err(e) if e.bad_opcode() => {
                debug!(">{:04X}: {} >{:02X}, listed as data", address, e.description(), rest[0]);
                Ok(None)
            }
            Err(e) => Err(RegionError::Undecodable { address, description: e.description() }),
        }
    }
}

impl<'a> Iterator for Region<'a> {
    type Item = Result<Line<'a>, RegionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }
        let address = self.start.wrapping_add(self.offset as u16);
        match self.step(address) {
            Ok(unit) => {
                self.offset += unit.len();
                Some(Ok(Line { address, unit }))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl<'a> core::iter::FusedIterator for Region<'a> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(start: u16, bytes: &[u8], call_args: &CallArgs) -> Vec<String> {
        Region::new(start, bytes, call_args)
            .map(|line| line.expect("decodes").to_string())
            .collect()
    }

    #[test]
    fn state_follows_format_nesting() {
        let args = CallArgs::new();
        // FMT, RPTB 2, HTEX 'A', NEXT G@>6000, FEND
        let bytes = [0x08, 0xc1, 0x00, b'A', 0xfb, 0x60, 0x00, 0xfb];
        let mut region = Region::new(0x6000, &bytes, &args);

        region.next();
        assert_eq!(region.state(), DecodeState::Decoding(Mode::Format { depth: 1 }));
        region.next();
        assert_eq!(region.state(), DecodeState::Decoding(Mode::Format { depth: 2 }));
        region.next();
        assert_eq!(region.state(), DecodeState::Decoding(Mode::Format { depth: 2 }));
        region.next();
        assert_eq!(region.state(), DecodeState::Decoding(Mode::Format { depth: 1 }));
        region.next();
        assert_eq!(region.state(), DecodeState::Decoding(Mode::Normal));
        assert!(region.next().is_none());
        assert_eq!(region.offset(), bytes.len());
    }

    #[test]
    fn pending_data_is_capped_at_the_end() {
        let mut args = CallArgs::new();
        args.insert(0x0100, 10);
        let lines = listing(0x6000, &[0x06, 0x01, 0x00, 0xaa, 0xbb], &args);
        assert_eq!(lines, vec![
            ">6000 : CALL  G@>0100",
            ">6003 : DATA  >AA,>BB",
        ]);
    }

    #[test]
    fn truncation_stops_the_walk() {
        let args = CallArgs::new();
        let mut region = Region::new(0x6000, &[0x00, 0x87], &args);
        assert!(matches!(region.next(), Some(Ok(_))));
        assert_eq!(region.next(), Some(Err(RegionError::Truncated { address: 0x6001, available: 1 })));
        assert_eq!(region.next(), None);
    }

    #[test]
    fn rejected_opcodes_become_data() {
        let args = CallArgs::new();
        let bytes = [0x42, 0x00];
        let region = Region::new(0x6000, &bytes, &args);
        let rejected: Result<Option<Instruction>, _> =
            region.decode(0x6000, &bytes, |_| Err(StandardDecodeError::InvalidOpcode));
        assert_eq!(rejected, Ok(None));

        let bad_operand: Result<Option<Instruction>, _> =
            region.decode(0x6000, &bytes, |_| Err(StandardDecodeError::InvalidOperand));
        assert_eq!(
            bad_operand,
            Err(RegionError::Undecodable { address: 0x6000, description: "invalid operand" })
        );

        let exhausted: Result<Option<Instruction>, _> =
            region.decode(0x6000, &bytes, |_| Err(StandardDecodeError::ExhaustedInput));
        assert_eq!(exhausted, Err(RegionError::Truncated { address: 0x6000, available: 2 }));
    }

    #[test]
    fn addresses_wrap() {
        let args = CallArgs::new();
        let lines = listing(0xffff, &[0x00, 0x01], &args);
        assert_eq!(lines, vec![">FFFF : RTN", ">0000 : RTNC"]);
    }
}
