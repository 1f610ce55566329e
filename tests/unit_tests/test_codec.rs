use sdsql::codec::{ByteReader, ByteWriter, CodecError, MAX_STRING_LEN};

#[test]
fn test_big_endian_integers() {
    let mut w = ByteWriter::new();
    w.put_u16(0x0102);
    w.put_u32(0x0A);
    assert_eq!(w.as_slice(), [0x01, 0x02, 0x00, 0x00, 0x00, 0x0A]);

    let frozen = w.freeze();
    let mut r = ByteReader::new(&frozen);
    assert_eq!(r.read_u16().expect("u16"), 0x0102);
    // four wire bytes 00 00 00 0A decode to 0x0A
    assert_eq!(r.read_u32().expect("u32"), 0x0A);
    assert!(r.is_empty());
}

#[test]
fn test_u64_roundtrip_high_word_first() {
    let mut w = ByteWriter::new();
    w.put_u64(0xDEAD_BEEF_0000_0042);
    assert_eq!(
        w.as_slice(),
        [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x00, 0x00, 0x42]
    );
    let frozen = w.freeze();
    let mut r = ByteReader::new(&frozen);
    assert_eq!(r.read_u64().expect("u64"), 0xDEAD_BEEF_0000_0042);
}

#[test]
fn test_string_roundtrip() {
    let mut w = ByteWriter::new();
    w.put_string("héllo");
    // length counts bytes, not code points
    assert_eq!(&w.as_slice()[..4], [0, 0, 0, 6]);

    let frozen = w.freeze();
    let mut r = ByteReader::new(&frozen);
    assert_eq!(r.read_string().expect("string"), "héllo");
}

#[test]
fn test_empty_string() {
    let mut w = ByteWriter::new();
    w.put_string("");
    let frozen = w.freeze();
    let mut r = ByteReader::new(&frozen);
    assert_eq!(r.read_string().expect("string"), "");
    assert!(r.is_empty());
}

#[test]
fn test_string_over_one_mib_is_rejected() {
    let mut w = ByteWriter::new();
    w.put_u32((MAX_STRING_LEN + 1) as u32);
    let frozen = w.freeze();
    let mut r = ByteReader::new(&frozen);
    assert_eq!(
        r.read_string(),
        Err(CodecError::StringTooLong(MAX_STRING_LEN + 1))
    );
}

#[test]
fn test_string_at_exactly_one_mib_is_accepted() {
    let body = "x".repeat(MAX_STRING_LEN);
    let mut w = ByteWriter::new();
    w.put_string(&body);
    let frozen = w.freeze();
    let mut r = ByteReader::new(&frozen);
    assert_eq!(r.read_string().expect("string").len(), MAX_STRING_LEN);
}

#[test]
fn test_truncated_string_reports_insufficient_data() {
    let mut w = ByteWriter::new();
    w.put_u32(10);
    w.put_bytes(b"abc");
    let frozen = w.freeze();
    let mut r = ByteReader::new(&frozen);
    assert!(matches!(
        r.read_string(),
        Err(CodecError::InsufficientData { needed: 10, .. })
    ));
}

#[test]
fn test_invalid_utf8_is_a_format_error() {
    let mut w = ByteWriter::new();
    w.put_u32(2);
    w.put_bytes(&[0xFF, 0xFE]);
    let frozen = w.freeze();
    let mut r = ByteReader::new(&frozen);
    assert_eq!(r.read_string(), Err(CodecError::InvalidFormat("string")));
}

#[test]
fn test_skip_and_remaining() {
    let buf = [1u8, 2, 3, 4, 5];
    let mut r = ByteReader::new(&buf);
    r.skip(2).expect("skip");
    assert_eq!(r.remaining(), 3);
    assert_eq!(r.read_u8().expect("u8"), 3);
    assert!(r.skip(3).is_err());
}
