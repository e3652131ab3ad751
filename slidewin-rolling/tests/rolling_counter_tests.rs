//! Integration tests for rolling counters
//!
//! Drive the counter with a manual clock from several threads and check
//! that bucket roll-over creates each bucket exactly once and loses no
//! increments.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use slidewin_core::time::ManualClock;
use slidewin_rolling::{CounterEvent, RollingCfg, RollingCounter, WindowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    Success,
    Failure,
    Timeout,
}

impl CounterEvent for Request {
    fn all() -> &'static [Self] {
        &[Request::Success, Request::Failure, Request::Timeout]
    }

    fn ordinal(self) -> usize {
        self as usize
    }
}

type TestCounter = RollingCounter<Request, Arc<ManualClock>>;

fn counter_at(start: u64, cfg: RollingCfg) -> (Arc<ManualClock>, TestCounter) {
    let clock = Arc::new(ManualClock::new(start));
    let counter = RollingCounter::with_clock(cfg, Arc::clone(&clock)).expect("valid cfg");
    (clock, counter)
}

/// Old buckets fall out of the window one at a time
#[test]
fn test_buckets_expire_in_order() {
    let (clock, counter) = counter_at(0, RollingCfg::new(1_000, 10));

    for _ in 0..10 {
        counter.increment(Request::Success);
        clock.advance(100);
    }
    // t = 1000: eleventh bucket evicts the first
    assert_eq!(counter.rolling_sum(Request::Success), 9);
    assert_eq!(counter.window().size(), 10);
    assert_eq!(counter.values(Request::Success).last(), Some(&0));

    clock.advance(500);
    assert_eq!(counter.rolling_sum(Request::Success), 4);
    assert_eq!(counter.cumulative_sum(Request::Success), 10);
}

#[test]
fn test_events_are_counted_independently() {
    let (_clock, counter) = counter_at(42, RollingCfg::default());

    counter.add(Request::Success, 7);
    counter.increment(Request::Failure);
    counter.increment(Request::Failure);

    assert_eq!(counter.rolling_sum(Request::Success), 7);
    assert_eq!(counter.rolling_sum(Request::Failure), 2);
    assert_eq!(counter.rolling_sum(Request::Timeout), 0);
    assert_eq!(counter.latest_value(Request::Failure), 2);
}

#[test]
fn test_invalid_geometry() {
    let clock = Arc::new(ManualClock::new(0));
    let err = RollingCounter::<Request, _>::with_clock(RollingCfg::new(1_000, 3), clock)
        .expect_err("1000ms does not split into 3 buckets");

    assert!(matches!(
        err,
        WindowError::InvalidArgument {
            parameter: "bucket_count",
            ..
        }
    ));
}

/// Concurrent writers crossing bucket boundaries together
///
/// Each boundary must produce exactly one new bucket and every increment
/// must be counted, since nothing ages out of the window during the run.
#[test]
fn test_concurrent_rollover_creates_each_bucket_once() {
    const THREADS: usize = 8;
    const PER_THREAD: i64 = 2_000;
    let (clock, counter) = counter_at(0, RollingCfg::new(1_000, 10));
    let counter = Arc::new(counter);
    let barrier = Arc::new(Barrier::new(THREADS + 1));
    let done = Arc::new(AtomicBool::new(false));

    let ticker = {
        let clock = Arc::clone(&clock);
        let barrier = Arc::clone(&barrier);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..900 {
                if done.load(Ordering::Acquire) {
                    break;
                }
                clock.advance(1);
                thread::yield_now();
            }
        })
    };

    let writers: Vec<_> = (0..THREADS)
        .map(|_| {
            let counter = Arc::clone(&counter);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..PER_THREAD {
                    counter.increment(Request::Success);
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().expect("writer panicked");
    }
    done.store(true, Ordering::Release);
    ticker.join().expect("ticker panicked");

    assert_eq!(
        counter.rolling_sum(Request::Success),
        THREADS as i64 * PER_THREAD
    );

    let starts: Vec<u64> = counter
        .window()
        .iterate()
        .iter()
        .map(|b| b.window_start().as_millis())
        .collect();
    for pair in starts.windows(2) {
        assert_eq!(pair[1], pair[0] + 100, "duplicate or missing bucket: {:?}", starts);
    }
    assert_eq!(starts.first(), Some(&0));
}

/// Resets racing with writers that cross bucket boundaries
///
/// Every bucket is folded into the cumulative totals at most once. An
/// increment that lands in a bucket after it was folded is missed, so the
/// total may fall short but can never exceed what was written.
#[test]
fn test_concurrent_reset_never_double_counts() {
    const WRITERS: usize = 4;
    const RESETTERS: usize = 2;
    const PER_THREAD: i64 = 2_000;
    let (clock, counter) = counter_at(0, RollingCfg::new(100, 10));
    let counter = Arc::new(counter);
    let barrier = Arc::new(Barrier::new(WRITERS + RESETTERS + 1));
    let done = Arc::new(AtomicBool::new(false));

    let ticker = {
        let clock = Arc::clone(&clock);
        let barrier = Arc::clone(&barrier);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            barrier.wait();
            while !done.load(Ordering::Acquire) {
                clock.advance(3);
                thread::yield_now();
            }
        })
    };

    let resetters: Vec<_> = (0..RESETTERS)
        .map(|_| {
            let counter = Arc::clone(&counter);
            let barrier = Arc::clone(&barrier);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                barrier.wait();
                while !done.load(Ordering::Acquire) {
                    counter.reset();
                    thread::yield_now();
                }
            })
        })
        .collect();

    let writers: Vec<_> = (0..WRITERS)
        .map(|_| {
            let counter = Arc::clone(&counter);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..PER_THREAD {
                    counter.increment(Request::Success);
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().expect("writer panicked");
    }
    done.store(true, Ordering::Release);
    for resetter in resetters {
        resetter.join().expect("resetter panicked");
    }
    ticker.join().expect("ticker panicked");

    counter.reset();
    assert!(counter.window().is_empty());

    let total = counter.cumulative_sum(Request::Success);
    assert!(
        total <= WRITERS as i64 * PER_THREAD,
        "cumulative {} exceeds {} increments",
        total,
        WRITERS as i64 * PER_THREAD
    );
    assert_eq!(counter.rolling_sum(Request::Success), 0);
}
