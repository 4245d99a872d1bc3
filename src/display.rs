use core::fmt;

use crate::{FormatOp, FormatOpcode, FormatOperands, Instruction, Opcode, Operand, Space, TextRun};

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Operand::Nothing => Ok(()),
            Operand::ImmB { imm } => write!(f, ">{:02X}", imm),
            Operand::ImmW { imm } => write!(f, ">{:04X}", imm),
            Operand::VRegister { num } => write!(f, "R@{}", num),
            Operand::Memory { space, indirect, .. } => {
                match space {
                    Space::Vdp => f.write_str("V")?,
                    Space::Grom => f.write_str("G")?,
                    Space::Cpu => {}
                }
                f.write_str(if indirect { "*" } else { "@" })?;
                if let Some(address) = self.effective_address() {
                    write!(f, ">{:04X}", address)?;
                }
                if let Some(index) = self.index_address() {
                    write!(f, "(@>{:04X})", index)?;
                }
                Ok(())
            }
        }
    }
}

impl Opcode {
    pub fn name(&self) -> &'static str {
        match self {
            Opcode::RTN => "RTN",
            Opcode::RTNC => "RTNC",
            Opcode::RAND => "RAND",
            Opcode::SCAN => "SCAN",
            Opcode::BACK => "BACK",
            Opcode::B => "B",
            Opcode::CALL => "CALL",
            Opcode::ALL => "ALL",
            Opcode::FMT => "FMT",
            Opcode::H => "H",
            Opcode::GT => "GT",
            Opcode::EXIT => "EXIT",
            Opcode::CARRY => "CARRY",
            Opcode::OVF => "OVF",
            Opcode::PARSE => "PARSE",
            Opcode::XML => "XML",
            Opcode::CONT => "CONT",
            Opcode::EXEC => "EXEC",
            Opcode::RTNB => "RTNB",
            Opcode::RTGR => "RTGR",
            Opcode::XG_4 => "XG-4",
            Opcode::XG_5 => "XG-5",
            Opcode::XG_6 => "XG-6",
            Opcode::XG_7 => "XG-7",
            Opcode::XG_8 => "XG-8",
            Opcode::XG_9 => "XG-9",
            Opcode::XG_A => "XG-A",
            Opcode::XG_B => "XG-B",
            Opcode::XG_C => "XG-C",
            Opcode::XG_D => "XG-D",
            Opcode::XG_E => "XG-E",
            Opcode::XG_DOLLAR => "XG-$",
            Opcode::MOVE => "MOVE",
            Opcode::BR => "BR",
            Opcode::BS => "BS",
            Opcode::ABS => "ABS",
            Opcode::NEG => "NEG",
            Opcode::INV => "INV",
            Opcode::CLR => "CLR",
            Opcode::FETCH => "FETCH",
            Opcode::CASE => "CASE",
            Opcode::PUSH => "PUSH",
            Opcode::CZ => "CZ",
            Opcode::INC => "INC",
            Opcode::DEC => "DEC",
            Opcode::INCT => "INCT",
            Opcode::DECT => "DECT",
            Opcode::XG_0 => "XG-0",
            Opcode::XG_1 => "XG-1",
            Opcode::XG_2 => "XG-2",
            Opcode::XG_3 => "XG-3",
            Opcode::ADD => "ADD",
            Opcode::SUB => "SUB",
            Opcode::MUL => "MUL",
            Opcode::DIV => "DIV",
            Opcode::AND => "AND",
            Opcode::OR => "OR",
            Opcode::XOR => "XOR",
            Opcode::ST => "ST",
            Opcode::EX => "EX",
            Opcode::CH => "CH",
            Opcode::CHE => "CHE",
            Opcode::CGT => "CGT",
            Opcode::CGE => "CGE",
            Opcode::CEQ => "CEQ",
            Opcode::CLOG => "CLOG",
            Opcode::SRA => "SRA",
            Opcode::SLL => "SLL",
            Opcode::SRL => "SRL",
            Opcode::SRC => "SRC",
            Opcode::COINC => "COINC",
            Opcode::XG_F => "XG-F",
            Opcode::IO => "I/O",
            Opcode::SWGR => "SWGR",
            Opcode::XG_G => "XG-G",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FormatOpcode {
    pub fn name(&self) -> &'static str {
        match self {
            FormatOpcode::HTEX => "HTEX",
            FormatOpcode::VTEX => "VTEX",
            FormatOpcode::HCHA => "HCHA",
            FormatOpcode::VCHA => "VCHA",
            FormatOpcode::COL_PLUS => "COL+",
            FormatOpcode::ROW_PLUS => "ROW+",
            FormatOpcode::RPTB => "RPTB",
            FormatOpcode::HSTR => "HSTR",
            FormatOpcode::NEXT => "NEXT",
            FormatOpcode::SCRO => "SCRO",
            FormatOpcode::ROW => "ROW",
            FormatOpcode::COL => "COL",
        }
    }
}

impl fmt::Display for FormatOpcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// the mnemonic column: six wide, with word forms spelled `D<op>`.
fn write_mnemonic(f: &mut fmt::Formatter, name: &str, word: bool) -> fmt::Result {
    if word {
        write!(f, "D{:<5}", name)
    } else {
        write!(f, "{:<6}", name)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ops = self.operands();
        if ops.is_empty() {
            return write!(f, "{}", self.opcode());
        }
        write_mnemonic(f, self.opcode().name(), self.is_word())?;
        for (i, op) in ops.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

/// printable runs are quoted, anything outside `0x20-0x7e` is written as a hex byte.
impl fmt::Display for TextRun {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = |b: &u8| (0x20..=0x7e).contains(b);
        let mut rest = self.as_bytes();
        let mut first = true;
        while let Some(&b) = rest.first() {
            if !first {
                f.write_str(",")?;
            }
            first = false;
            if printable(&b) {
                let run = rest.iter().take_while(|b| printable(*b)).count();
                f.write_str("'")?;
                for &c in &rest[..run] {
                    write!(f, "{}", c as char)?;
                }
                f.write_str("'")?;
                rest = &rest[run..];
            } else {
                write!(f, ">{:02X}", b)?;
                rest = &rest[1..];
            }
        }
        Ok(())
    }
}

impl fmt::Display for FormatOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_mnemonic(f, self.opcode().name(), false)?;
        match self.operands() {
            FormatOperands::Text(text) => write!(f, "{}", text),
            FormatOperands::Count(count) => write!(f, "{}", Operand::ImmB { imm: *count }),
            FormatOperands::CountOperand(count, op) => {
                write!(f, "{},{}", Operand::ImmB { imm: *count }, op)
            }
            FormatOperands::Operand(op) => write!(f, "{}", op),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Operand, Space};

    #[test]
    fn operand_sigils() {
        assert_eq!(Operand::direct(0x10).to_string(), "@>8310");
        assert_eq!(Operand::grom(0x6123).to_string(), "G@>6123");
        assert_eq!(Operand::ImmB { imm: 0x0a }.to_string(), ">0A");
        assert_eq!(Operand::ImmW { imm: 0x0a }.to_string(), ">000A");
        assert_eq!(Operand::VRegister { num: 7 }.to_string(), "R@7");
        let op = Operand::Memory { space: Space::Vdp, indirect: true, address: 0x4a, index: None };
        assert_eq!(op.to_string(), "V*>834A");
        let op = Operand::Memory { space: Space::Vdp, indirect: false, address: 0x0300, index: Some(0x5e) };
        assert_eq!(op.to_string(), "V@>0300(@>835E)");
        let op = Operand::Memory { space: Space::Cpu, indirect: true, address: 0x20, index: Some(0x02) };
        assert_eq!(op.to_string(), "*>8320(@>8302)");
    }
}
