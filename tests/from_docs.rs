use yaxpeax_arch::{Decoder, U8Reader};
use yaxpeax_gpl::{FormatDecoder, InstDecoder, Opcode};

// expected text follows the listing conventions of the TI GPL manual: `>` hex, `@` direct,
// `*` indirect, `V`/`G` for VDP and GROM space, `D` prefix for word operations.

fn test_display(bytes: &[u8], text: &str) {
    test_display_at(0, bytes, text);
}

fn test_display_at(address: u16, bytes: &[u8], text: &str) {
    let decoder = InstDecoder::at(address);
    let inst = decoder.decode(&mut U8Reader::new(bytes)).expect("decode succeeds");
    let rendered = format!("{}", inst);
    assert_eq!(rendered, text);
    assert_eq!(inst.length() as usize, bytes.len(), "length of {}", text);
}

fn test_format(bytes: &[u8], text: &str) {
    let op = FormatDecoder.decode(&mut U8Reader::new(bytes)).expect("decode succeeds");
    assert_eq!(op.to_string(), text);
    assert_eq!(op.length() as usize, bytes.len(), "length of {}", text);
}

#[test]
fn zero_and_immediate_operands() {
    test_display(&[0x00], "RTN");
    test_display(&[0x03], "SCAN");
    test_display(&[0x08], "FMT");
    test_display(&[0x1f], "XG-$");
    test_display(&[0x02, 0x09], "RAND  >09");
    test_display(&[0x04, 0x07], "BACK  >07");
    test_display(&[0x0f, 0x17], "XML   >17");
    test_display(&[0x05, 0x60, 0x4a], "B     G@>604A");
    test_display(&[0x06, 0x00, 0x10], "CALL  G@>0010");
}

#[test]
fn one_operand() {
    test_display(&[0x87, 0x10], "DCLR  @>8310");
    test_display(&[0x86, 0xa3, 0x80], "CLR   V@>0380");
    test_display(&[0x90, 0x90, 0x42], "INC   *>8342");
    test_display(&[0x93, 0xaf, 0x12, 0x34], "DDEC  V@>1234");
    test_display(&[0x82, 0xe0, 0x20, 0x5e], "NEG   V@>0020(@>835E)");
    test_display(&[0x9e, 0x00], "XG-3  @>8300");
}

#[test]
fn two_operands() {
    test_display(&[0xbc, 0x10, 0x20], "ST    @>8320,@>8310");
    test_display(&[0xbe, 0x10, 0x41], "ST    >41,@>8310");
    test_display(&[0xbf, 0x10, 0x12, 0x34], "DST   >1234,@>8310");
    test_display(&[0xa2, 0xa0, 0x40, 0x01], "ADD   >01,V@>0040");
    test_display(&[0xf6, 0x10, 0x01], "I/O   >01,@>8310");
    test_display(&[0xd5, 0x4a, 0x8f, 0x12, 0x34], "DCEQ  @>9534,@>834A");
}

#[test]
fn branches_stay_in_their_bank() {
    test_display_at(0x6010, &[0x45, 0x20], "BR    G@>6520");
    test_display_at(0x7ffe, &[0x7f, 0xff], "BS    G@>7FFF");
    test_display_at(0x8000, &[0x40, 0x00], "BR    G@>8000");
}

#[test]
fn moves() {
    let decoder = InstDecoder::default();
    let inst = decoder.decode(&mut U8Reader::new(&[0x31, 0x00, 0x08, 0xa3, 0x00, 0x60, 0x00])).unwrap();
    assert_eq!(inst.opcode(), Opcode::MOVE);
    assert_eq!(inst.operand_count(), 3);

    test_display(&[0x31, 0x00, 0x08, 0xa3, 0x00, 0x60, 0x00], "MOVE  >0008,G@>6000,V@>0300");
    test_display(&[0x39, 0x00, 0x01, 0x01, 0x60, 0x00], "MOVE  >0001,G@>6000,R@1");
    test_display(&[0x20, 0x10, 0x60, 0x00, 0x70, 0x00], "MOVE  @>8310,G@>7000,G@>6000");
    test_display(&[0x2b, 0x00, 0x04, 0x60, 0x00, 0x02, 0x70, 0x00, 0x04], "MOVE  >0004,G@>7000(@>8304),G@>6000(@>8302)");
    test_display(&[0x35, 0x00, 0x10, 0xa0, 0x00, 0x20], "MOVE  >0010,@>8320,V@>0000");
}

#[test]
fn format_ops() {
    test_format(&[0x00, 0x41], "HTEX  'A'");
    test_format(&[0x03, 0x01, b'H', b'I', 0x80], "HTEX  >01,'HI',>80");
    test_format(&[0x21, b'O', b'K'], "VTEX  'OK'");
    test_format(&[0x43, 0x2a], "HCHA  >04,>2A");
    test_format(&[0x60, 0x2a], "VCHA  >01,>2A");
    test_format(&[0x80], "COL+  >01");
    test_format(&[0xbf], "ROW+  >20");
    test_format(&[0xc4], "RPTB  >05");
    test_format(&[0xe1, 0x10], "HSTR  >02,@>8310");
    test_format(&[0xfa, 0x90, 0x10], "HSTR  >1B,*>8310");
    test_format(&[0xfb, 0x60, 0x10], "NEXT  G@>6010");
    test_format(&[0xfc, 0x60], "SCRO  >60");
    test_format(&[0xfd, 0x10], "SCRO  @>8310");
    test_format(&[0xfe, 0x05], "ROW   >05");
    test_format(&[0xff, 0x05], "COL   >05");
}

#[test]
fn every_opcode_decodes_within_its_input() {
    for op in 0..=0xffu8 {
        let mut bytes = [0u8; 16];
        bytes[0] = op;
        let inst = InstDecoder::default().decode(&mut U8Reader::new(&bytes)).expect("decode succeeds");
        let len = inst.length() as usize;
        assert!(len >= 1 && len <= bytes.len(), "opcode {:02x} length {}", op, len);
        // decoding exactly the claimed bytes succeeds too: nothing past `len` was needed
        let again = InstDecoder::default().decode(&mut U8Reader::new(&bytes[..len])).expect("decode succeeds");
        assert_eq!(inst, again);
    }
}
