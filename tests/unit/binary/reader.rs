use super::*;

fn bytes(words: &[i32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

#[test]
fn typed_reads_are_little_endian() {
    let data = [0x01, 0x02, 0x03, 0x04, 0x00, 0x00, 0x80, 0x3F];
    let mut r = Reader::new(&data);
    assert_eq!(r.read_u16().unwrap(), 0x0201);
    assert_eq!(r.read_i16().unwrap(), 0x0403);
    assert_eq!(r.read_f32().unwrap(), 1.0);
    assert_eq!(r.remaining(), 0);
}

#[test]
fn step_in_and_out_restore_position() {
    let data = bytes(&[8, 0, 42, 7]);
    let mut r = Reader::new(&data);
    let offset = r.read_offset64().unwrap();
    assert_eq!(r.position(), 8);

    r.step_in(offset).unwrap();
    assert_eq!(r.read_i32().unwrap(), 42);
    r.step_in(12).unwrap();
    assert_eq!(r.read_i32().unwrap(), 7);
    assert_eq!(r.depth(), 2);
    r.step_out().unwrap();
    assert_eq!(r.position(), 12);
    r.step_out().unwrap();
    assert_eq!(r.position(), 8);
    assert_eq!(r.depth(), 0);
}

#[test]
fn step_out_without_step_in_fails() {
    let data = [0u8; 4];
    let mut r = Reader::new(&data);
    assert!(r.step_out().is_err());
}

#[test]
fn step_in_past_end_fails() {
    let data = [0u8; 4];
    let mut r = Reader::new(&data);
    assert!(r.step_in(5).is_err());
    assert!(r.step_in(4).is_ok());
}

#[test]
fn assert_rejects_values_outside_the_allowed_set() {
    let data = bytes(&[5, 3]);
    let mut r = Reader::new(&data);
    assert_eq!(r.assert_i32(&[4, 5]).unwrap(), 5);
    let err = r.assert_i32(&[0]).unwrap_err();
    assert!(matches!(err, FxrError::Format { offset: 4, .. }));
}

#[test]
fn assert_magic_reports_found_bytes() {
    let mut r = Reader::new(b"FXS\0");
    let err = r.assert_magic(b"FXR\0").unwrap_err();
    assert!(err.to_string().contains("invalid magic"));
}

#[test]
fn offset64_requires_zero_high_half() {
    let data = bytes(&[16, 1]);
    let mut r = Reader::new(&data);
    assert!(r.read_offset64().is_err());
}

#[test]
fn negative_counts_are_format_errors() {
    let data = bytes(&[-1]);
    let mut r = Reader::new(&data);
    assert!(r.read_count().unwrap_err().is_format());
}

#[test]
fn truncated_read_reports_eof() {
    let data = [0u8; 3];
    let mut r = Reader::new(&data);
    let err = r.read_i32().unwrap_err();
    assert!(matches!(
        err,
        FxrError::UnexpectedEof {
            offset: 0,
            need: 4,
            have: 3
        }
    ));
}

#[test]
fn list_reads_do_not_move_the_cursor() {
    let data = bytes(&[1, 2, 3, 4]);
    let mut r = Reader::new(&data);
    r.skip(4).unwrap();
    let words = r.read_words_at(8, 2).unwrap();
    assert_eq!(words, vec![3, 4]);
    let pairs = r.read_list_at(0, 2, |r| r.read_i32()).unwrap();
    assert_eq!(pairs, vec![1, 2]);
    assert_eq!(r.position(), 4);
}
