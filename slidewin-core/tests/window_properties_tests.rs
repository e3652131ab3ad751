//! Behavioural tests for the window buffer facade
//!
//! Sequential scenarios covering ordering, eviction, clearing and peeking,
//! plus property tests over arbitrary capacities and append counts.

use proptest::prelude::*;
use slidewin_core::{Bucket, Timestamp, WindowBuffer, WindowError};

fn bucket(n: u64) -> Bucket<u64> {
    Bucket::new(Timestamp::from_millis(n * 100), n)
}

fn payloads(buffer: &WindowBuffer<u64>) -> Vec<u64> {
    buffer.iterate().iter().map(|b| *b.payload()).collect()
}

/// Appending up to capacity keeps every bucket in order
#[test]
fn test_order_preserved_below_capacity() {
    let buffer = WindowBuffer::new(5).expect("valid capacity");
    for n in 1..=5 {
        buffer.add_last(bucket(n));
        assert_eq!(buffer.size(), n as usize);
    }
    assert_eq!(payloads(&buffer), vec![1, 2, 3, 4, 5]);
}

/// Appending capacity + 1 buckets evicts exactly the first
#[test]
fn test_fifo_eviction() {
    let buffer = WindowBuffer::new(4).expect("valid capacity");
    for n in 1..=5 {
        buffer.add_last(bucket(n));
    }
    assert_eq!(buffer.size(), 4);
    assert_eq!(payloads(&buffer), vec![2, 3, 4, 5]);
    assert_eq!(buffer.stats().evictions(), 1);
}

/// Clearing twice is the same as clearing once
#[test]
fn test_clear_idempotence() {
    let buffer = WindowBuffer::new(3).expect("valid capacity");
    buffer.add_last(bucket(1));
    buffer.add_last(bucket(2));

    buffer.clear();
    assert_eq!(buffer.size(), 0);
    assert!(payloads(&buffer).is_empty());
    assert!(buffer.peek_last().is_none());

    buffer.clear();
    assert_eq!(buffer.size(), 0);
    assert!(payloads(&buffer).is_empty());
    assert!(buffer.peek_last().is_none());

    // Still usable afterwards
    buffer.add_last(bucket(3));
    assert_eq!(payloads(&buffer), vec![3]);
}

/// The last appended bucket is what peek_last returns
#[test]
fn test_peek_consistency() {
    let buffer = WindowBuffer::new(2).expect("valid capacity");
    for n in 0..10 {
        let b = bucket(n);
        buffer.add_last(b.clone());
        let last = buffer.peek_last().expect("just appended");
        assert!(last.ptr_eq(&b));
    }
}

/// Capacity 3, append A B C D, then clear
#[test]
fn test_concrete_scenario() {
    let buffer = WindowBuffer::new(3).expect("valid capacity");
    for (i, name) in ["A", "B", "C", "D"].into_iter().enumerate() {
        buffer.add_last(Bucket::new(Timestamp::from_millis(i as u64), name));
    }

    assert_eq!(buffer.size(), 3);
    let names: Vec<&str> = buffer.iterate().iter().map(|b| *b.payload()).collect();
    assert_eq!(names, vec!["B", "C", "D"]);
    assert_eq!(buffer.peek_last().map(|b| *b.payload()), Some("D"));

    buffer.clear();
    assert_eq!(buffer.size(), 0);
    assert_eq!(buffer.iterate().len(), 0);
}

#[test]
fn test_zero_capacity_is_invalid_argument() {
    match WindowBuffer::<u64>::new(0) {
        Err(WindowError::InvalidArgument { parameter, .. }) => assert_eq!(parameter, "capacity"),
        other => panic!("expected InvalidArgument, got {:?}", other.map(|_| ())),
    }
}

/// A capacity with no room for the spare slot fails instead of panicking
#[test]
fn test_max_capacity_is_invalid_argument() {
    let result = std::panic::catch_unwind(|| WindowBuffer::<u8>::new(usize::MAX).map(|_| ()));
    match result {
        Ok(Err(WindowError::InvalidArgument { parameter, .. })) => {
            assert_eq!(parameter, "capacity")
        }
        Ok(Ok(())) => panic!("expected InvalidArgument, got a buffer"),
        Err(_) => panic!("construction panicked"),
    }
}

/// Buckets keep their window start through the buffer
#[test]
fn test_window_start_preserved() {
    let buffer = WindowBuffer::new(3).expect("valid capacity");
    buffer.add_last(bucket(7));

    let last = buffer.peek_last().expect("non-empty");
    assert_eq!(last.window_start(), Timestamp::from_millis(700));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The window always holds the newest min(count, capacity) buckets in order
    #[test]
    fn prop_window_holds_newest_in_order(capacity in 1usize..32, count in 0u64..100) {
        let buffer = WindowBuffer::new(capacity).unwrap();
        for n in 0..count {
            buffer.add_last(bucket(n));
        }

        let expected_len = (count as usize).min(capacity);
        prop_assert_eq!(buffer.size(), expected_len);

        let expected: Vec<u64> = (count - expected_len as u64..count).collect();
        prop_assert_eq!(payloads(&buffer), expected);
        prop_assert_eq!(
            buffer.stats().evictions(),
            count.saturating_sub(capacity as u64)
        );
    }

    /// Clearing at an arbitrary point leaves only what came after it
    #[test]
    fn prop_clear_resets_window(capacity in 1usize..16, before in 0u64..40, after in 0u64..40) {
        let buffer = WindowBuffer::new(capacity).unwrap();
        for n in 0..before {
            buffer.add_last(bucket(n));
        }
        buffer.clear();
        for n in 0..after {
            buffer.add_last(bucket(1000 + n));
        }

        let kept = (after as usize).min(capacity);
        let expected: Vec<u64> = (1000 + after - kept as u64..1000 + after).collect();
        prop_assert_eq!(payloads(&buffer), expected);
    }
}
