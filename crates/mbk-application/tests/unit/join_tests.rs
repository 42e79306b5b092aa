//! Tests for the two-signal completion barrier

use mbk_application::lifecycle::PairBarrier;

#[test]
fn test_fires_on_second_signal_in_either_order() {
    let mut left_first: PairBarrier<&str, u32> = PairBarrier::new();
    assert_eq!(left_first.offer_left("paid"), None);
    assert_eq!(left_first.offer_right(7), Some(("paid", 7)));

    let mut right_first: PairBarrier<&str, u32> = PairBarrier::new();
    assert_eq!(right_first.offer_right(7), None);
    assert_eq!(right_first.offer_left("paid"), Some(("paid", 7)));
}

#[test]
fn test_repeated_signals_are_counted_once() {
    let mut barrier: PairBarrier<(), ()> = PairBarrier::new();

    assert_eq!(barrier.offer_right(()), None);
    assert_eq!(barrier.offer_right(()), None);
    assert!(barrier.has_right());
    assert_eq!(barrier.offer_left(()), Some(((), ())));
    assert!(barrier.has_fired());

    assert_eq!(barrier.offer_left(()), None);
    assert_eq!(barrier.offer_right(()), None);
}

#[test]
fn test_reset_rearms() {
    let mut barrier: PairBarrier<u8, u8> = PairBarrier::default();
    barrier.offer_left(1);
    barrier.offer_right(2);

    barrier.reset();

    assert!(!barrier.has_fired());
    assert!(!barrier.has_left());
    assert_eq!(barrier.offer_right(3), None);
    assert_eq!(barrier.offer_left(4), Some((4, 3)));
}
