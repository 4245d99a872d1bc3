use std::collections::HashMap;
use std::num::IntErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};
use thiserror::Error;

use crate::parse_hex;

#[derive(Debug, Error)]
pub enum CallArgsError {
    #[error("failed to read call argument table {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// how many bytes of inline arguments follow a `CALL` to each subroutine.
///
/// GPL subroutines may read their arguments straight out of the instruction stream after the
/// `CALL`, so those bytes are data, not code. nothing in the byte code says how many there are;
/// this table is supplied by whoever is reading the listing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CallArgs {
    counts: HashMap<u16, u32>,
}

impl CallArgs {
    pub fn new() -> Self {
        CallArgs::default()
    }

    pub fn insert(&mut self, target: u16, count: u32) {
        self.counts.insert(target, count);
    }

    /// inline argument bytes after a call to `target`, 0 if unknown.
    pub fn get(&self, target: u16) -> u32 {
        self.counts.get(&target).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// parse `<hex address> : <decimal count>` lines.
    ///
    /// anything else is skipped. addresses that do not fit in 16 bits are skipped with a warning.
    pub fn parse(text: &str) -> CallArgs {
        let mut table = CallArgs::new();
        for (number, line) in text.lines().enumerate() {
            let Some((address, count)) = line.split_once(':') else {
                trace!("call args line {}: no `:`, skipped", number + 1);
                continue;
            };
            let parsed = parse_address(address);
            if parsed == Err(BadAddress::Malformed) {
                trace!("call args line {}: bad address {:?}, skipped", number + 1, address.trim());
                continue;
            }
            let count = match count.split_whitespace().next().map(str::parse::<u32>) {
                Some(Ok(count)) => count,
                _ => {
                    trace!("call args line {}: bad count {:?}, skipped", number + 1, count.trim());
                    continue;
                }
            };
            match parsed {
                Ok(address) => table.insert(address, count),
                Err(_) => warn!("call args line {}: address {} is out of range", number + 1, address.trim()),
            }
        }
        debug!("{} call argument entries", table.len());
        table
    }

    pub fn load(path: &Path) -> Result<CallArgs, CallArgsError> {
        let text = std::fs::read_to_string(path).map_err(|source| CallArgsError::Io {
            path: path.to_owned(),
            source,
        })?;
        Ok(CallArgs::parse(&text))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum BadAddress {
    Malformed,
    /// hex, but wider than 16 bits.
    OutOfRange,
}

fn parse_address(text: &str) -> Result<u16, BadAddress> {
    let address = parse_hex(text).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => BadAddress::OutOfRange,
        _ => BadAddress::Malformed,
    })?;
    u16::try_from(address).map_err(|_| BadAddress::OutOfRange)
}
