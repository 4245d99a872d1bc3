use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, error, warn};

use yaxpeax_gpl::{parse_hex, CallArgs, Region};

/// GROM images are at most 64K.
const MAX_IMAGE: u64 = 0x10000;

/// disassemble TI GPL byte code from a raw GROM image
#[derive(Parser, Debug)]
#[command(name = "gpl-dis", version)]
struct Args {
    /// raw image file
    image: PathBuf,

    /// GROM address of the first byte of the image, in hex
    #[arg(value_parser = hex_address)]
    base: u16,

    /// address to start disassembling at, in hex (default: base)
    #[arg(value_parser = hex_address)]
    start: Option<u16>,

    /// file of `<hex address> : <count>` lines giving inline argument bytes after calls to each
    /// address
    call_args: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn hex_address(text: &str) -> Result<u16, String> {
    let value = parse_hex(text).map_err(|e| format!("`{}` is not a hex address: {}", text, e))?;
    u16::try_from(value).map_err(|_| format!("`{}` does not fit in 16 bits", text))
}

/// read at most [`MAX_IMAGE`] bytes. the flag is set if there was more.
fn read_capped<R: Read>(reader: R) -> io::Result<(Vec<u8>, bool)> {
    let mut image = Vec::new();
    reader.take(MAX_IMAGE + 1).read_to_end(&mut image)?;
    let oversized = image.len() as u64 > MAX_IMAGE;
    image.truncate(MAX_IMAGE as usize);
    Ok((image, oversized))
}

fn read_image(args: &Args) -> Result<Vec<u8>> {
    let file = File::open(&args.image)
        .with_context(|| format!("Failed to open {}", args.image.display()))?;
    let (image, oversized) = read_capped(file)
        .with_context(|| format!("Failed to read {}", args.image.display()))?;
    if oversized {
        warn!("{} is larger than 64K, only the first 64K is used", args.image.display());
    }
    debug!("loaded {} bytes from {}", image.len(), args.image.display());
    Ok(image)
}

/// offset of `start` into an image of `len` bytes loaded at `base`.
fn start_offset(base: u16, start: u16, len: usize) -> Result<usize> {
    match start.checked_sub(base) {
        Some(offset) if (offset as usize) < len => Ok(offset as usize),
        _ => bail!("Start address outside of image"),
    }
}

fn run(args: &Args) -> Result<()> {
    let call_args = match &args.call_args {
        Some(path) => CallArgs::load(path).unwrap_or_else(|e| {
            warn!("{:#}", anyhow::Error::from(e));
            CallArgs::new()
        }),
        None => CallArgs::new(),
    };

    let image = read_image(args)?;

    let start = args.start.unwrap_or(args.base);
    let offset = start_offset(args.base, start, image.len())?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for line in Region::new(start, &image[offset..], &call_args) {
        match line {
            Ok(line) => writeln!(out, "{}", line)?,
            Err(e) => {
                error!("{}", e);
                break;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        process::exit(if e.use_stderr() { 1 } else { 0 });
    });

    let log_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    run(&args)
}
