//! decoding into a pre-existing instruction should not result in different outcomes compared to
//! decoding into a fresh instruction. if decoding succeeds, both outcomes should be equal.

#![no_main]
use libfuzzer_sys::fuzz_target;

use yaxpeax_arch::Decoder;

fuzz_target!(|data: &[u8]| {

    let decoder = yaxpeax_gpl::InstDecoder::at(0x6000);
    let mut reused_inst = yaxpeax_gpl::Instruction::default();

    let mut words = yaxpeax_arch::U8Reader::new(data);
    if let Ok(()) = decoder.decode_into(&mut reused_inst, &mut words) {
        let mut words = yaxpeax_arch::U8Reader::new(data);
        let fresh_inst = decoder.decode(&mut words).expect("decoded before, can decode again");
        assert_eq!(reused_inst, fresh_inst);
    }

    let format = yaxpeax_gpl::FormatDecoder;
    let mut reused_op = yaxpeax_gpl::FormatOp::default();

    let mut words = yaxpeax_arch::U8Reader::new(data);
    if let Ok(()) = format.decode_into(&mut reused_op, &mut words) {
        let mut words = yaxpeax_arch::U8Reader::new(data);
        let fresh_op = format.decode(&mut words).expect("decoded before, can decode again");
        assert_eq!(reused_op, fresh_op);
    }
});
