use super::*;

#[test]
fn reserve_then_fill_patches_the_placeholder() {
    let mut w = Writer::new();
    w.write_i32(7);
    let slot = Slot::new(SlotKind::NodeChildren, 0);
    w.reserve_offset64(slot).unwrap();
    w.write_i32(9);
    w.fill_position(slot).unwrap();
    let bytes = w.finish().unwrap();
    assert_eq!(&bytes[4..8], &16i32.to_le_bytes());
    assert_eq!(&bytes[8..12], &0i32.to_le_bytes());
}

#[test]
fn filling_twice_is_a_reservation_error() {
    let mut w = Writer::new();
    let slot = Slot::new(SlotKind::PropertyFields, 3);
    w.reserve(slot).unwrap();
    w.fill(slot, 1).unwrap();
    let err = w.fill(slot, 2).unwrap_err();
    assert!(matches!(err, FxrError::Reservation(_)));
    assert!(err.to_string().contains("PropertyFields3"));
}

#[test]
fn filling_an_unreserved_slot_fails() {
    let mut w = Writer::new();
    w.reserve(Slot::new(SlotKind::ActionFields1, 0)).unwrap();
    assert!(w.fill(Slot::new(SlotKind::ActionFields1, 1), 0).is_err());
    assert!(w.fill(Slot::new(SlotKind::ActionFields2, 0), 0).is_err());
}

#[test]
fn reserving_twice_fails() {
    let mut w = Writer::new();
    let slot = Slot::new(SlotKind::EffectActions, 0);
    w.reserve(slot).unwrap();
    assert!(w.reserve(slot).is_err());
}

#[test]
fn finish_rejects_unfilled_reservations() {
    let mut w = Writer::new();
    w.reserve(Slot::section_offset(Section::Nodes)).unwrap();
    let err = w.finish().unwrap_err();
    assert!(err.to_string().contains("SectionOffset1"));
}

#[test]
fn pad_to_aligns_with_zeros() {
    let mut w = Writer::new();
    w.write_u8(1);
    w.pad_to(16);
    assert_eq!(w.position(), 16);
    w.pad_to(16);
    assert_eq!(w.position(), 16);
    let bytes = w.finish().unwrap();
    assert!(bytes[1..].iter().all(|&b| b == 0));
}
