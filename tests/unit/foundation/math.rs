use super::*;

#[test]
fn fnv1a32_known_vectors() {
    assert_eq!(Fnv1a32::new_default().finish(), 2_166_136_261);

    let mut h = Fnv1a32::new_default();
    h.write_str("a");
    assert_eq!(h.finish(), 0xe40c_292c);
}

#[test]
fn fnv1a32_is_streaming() {
    let mut a = Fnv1a32::new_default();
    a.write_str("hello ");
    a.write_str("world");

    let mut b = Fnv1a32::new_default();
    b.write_bytes(b"hello world");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn xorshift32_sequence_from_one() {
    let mut rng = XorShift32::new(1);
    assert_eq!(rng.next_u32(), 270_369);
    assert_eq!(rng.next_u32(), 67_634_689);
    assert_eq!(rng.next_u32(), 2_647_435_461);
}

#[test]
fn xorshift32_zero_seed_does_not_stick() {
    let mut rng = XorShift32::new(0);
    assert_eq!(rng.next_u32(), 1_359_758_873);
    assert_ne!(rng.next_u32(), 0);
}

#[test]
fn unit_values_are_half_open() {
    let mut rng = XorShift32::new(42);
    for _ in 0..1000 {
        let v = rng.next_unit();
        assert!((0.0..1.0).contains(&v));
    }
}

#[test]
fn ranged_values_stay_inclusive() {
    let mut rng = XorShift32::new(7);
    for _ in 0..1000 {
        let v = rng.next_in_range(14, 45);
        assert!((14..=45).contains(&v));
    }
    assert_eq!(rng.next_in_range(5, 5), 5);
    assert_eq!(rng.next_in_range(9, 3), 9);
}

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(255, 128), 128);
    assert_eq!(mul_div255_u8(0, 200), 0);
}
