#![no_main]
use libfuzzer_sys::fuzz_target;

use std::fmt::Write;

fuzz_target!(|data: &[u8]| {

    // the first byte is a call argument count given to a few call targets, so pending data gets
    // exercised too. the second is the high byte of the load address.
    let (args, start, image) = match data {
        [count, start, rest @ ..] => {
            let mut args = yaxpeax_gpl::CallArgs::new();
            for target in rest.chunks(2).take(8) {
                if let [hi, lo] = target {
                    args.insert(u16::from_be_bytes([*hi, *lo]), *count as u32);
                }
            }
            (args, u16::from(*start) << 8, rest)
        }
        _ => (yaxpeax_gpl::CallArgs::new(), 0x6000, data),
    };

    let mut consumed = 0;
    let mut region = yaxpeax_gpl::Region::new(start, image, &args);
    for line in &mut region {
        // may be ok or not, but should not panic
        if let Ok(line) = line {
            consumed += line.unit.len();
            write!(&mut String::new(), "{}", line).expect("formatting does not panic either");
        }
    }
    assert_eq!(consumed, region.offset());
    assert!(region.offset() <= image.len());
});
