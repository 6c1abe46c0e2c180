/*!
 * Side Lock Semantics Integration Tests
 *
 * End-to-end coverage of the lock contract: side mutual exclusion,
 * same-side sharing, holder counting, blocking behavior, and the accepted
 * no-FIFO (barging) property.
 */

use sidelock::{Side, SideLock, StrategyType, SyncConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

/// Spawn a thread that acquires LEFT, reports the acquisition, and holds the
/// side until told to release.
fn spawn_left_holder(lock: Arc<SideLock>) -> (thread::JoinHandle<()>, mpsc::Sender<()>) {
    let (release_tx, release_rx) = mpsc::channel();
    let (acquired_tx, acquired_rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        lock.lock_left();
        acquired_tx.send(()).unwrap();
        // Hold until the test says otherwise
        release_rx.recv().ok();
        lock.release_left();
    });

    acquired_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("holder thread failed to acquire LEFT");
    (handle, release_tx)
}

#[test]
fn acquiring_left_excludes_acquiring_right() {
    let lock = Arc::new(SideLock::new());
    lock.lock_left();

    let lock_clone = lock.clone();
    let acquired = thread::spawn(move || lock_clone.try_lock_right())
        .join()
        .unwrap();

    assert!(!acquired, "RIGHT must not be acquirable while LEFT is held");
}

#[test]
fn acquiring_right_excludes_acquiring_left() {
    let lock = Arc::new(SideLock::new());
    lock.lock_right();

    let lock_clone = lock.clone();
    let acquired = thread::spawn(move || lock_clone.try_lock_left())
        .join()
        .unwrap();

    assert!(!acquired, "LEFT must not be acquirable while RIGHT is held");
}

#[test]
fn same_thread_can_stack_same_side_acquisitions() {
    // Counting, not reentrance: each acquisition needs its own release
    let lock = SideLock::new();
    lock.lock_left();
    assert!(lock.try_lock_left());
    assert_eq!(lock.holders(), -2);

    lock.release_left();
    assert!(!lock.try_lock_right());
    lock.release_left();
    assert!(lock.try_lock_right());
}

#[test]
fn multiple_threads_can_share_the_left_side() {
    let lock = Arc::new(SideLock::new());
    lock.lock_left();

    let lock_clone = lock.clone();
    let acquired = thread::spawn(move || lock_clone.try_lock_left())
        .join()
        .unwrap();

    assert!(acquired, "LEFT is shared within itself");
}

#[test]
fn multiple_threads_can_share_the_right_side() {
    let lock = Arc::new(SideLock::new());
    lock.lock_right();

    let lock_clone = lock.clone();
    let acquired = thread::spawn(move || lock_clone.try_lock_right())
        .join()
        .unwrap();

    assert!(acquired, "RIGHT is shared within itself");
}

#[test]
fn keeps_count_of_all_threads_holding_the_side() {
    let lock = Arc::new(SideLock::new());

    let (holder_a, release_a) = spawn_left_holder(lock.clone());
    let (holder_b, release_b) = spawn_left_holder(lock.clone());

    // First holder releases; the second still excludes RIGHT
    release_a.send(()).unwrap();
    holder_a.join().unwrap();
    assert!(
        !lock.try_lock_right(),
        "a LEFT holder remains; RIGHT must stay excluded"
    );

    release_b.send(()).unwrap();
    holder_b.join().unwrap();
    assert!(lock.try_lock_right(), "all LEFT holders released");
    lock.release_right();
}

#[test]
fn blocks_right_acquisition_while_left_is_held() {
    let lock = Arc::new(SideLock::new());
    lock.lock_left();

    let done = Arc::new(AtomicBool::new(false));
    let lock_clone = lock.clone();
    let done_clone = done.clone();
    let handle = thread::spawn(move || {
        lock_clone.lock_right();
        done_clone.store(true, Ordering::Release);
    });

    // The blocked thread must still be parked after a generous delay
    thread::sleep(Duration::from_millis(100));
    assert!(!done.load(Ordering::Acquire), "lock_right must block");

    lock.release_left();
    handle.join().unwrap();
    assert!(done.load(Ordering::Acquire));
}

#[test]
fn free_after_release() {
    let lock = SideLock::new();
    lock.lock_left();
    lock.release_left();
    assert!(lock.try_lock_right());
}

#[test]
fn free_after_multiple_threads_release() {
    let lock = Arc::new(SideLock::new());

    let (holder_a, release_a) = spawn_left_holder(lock.clone());
    let (holder_b, release_b) = spawn_left_holder(lock.clone());

    release_a.send(()).unwrap();
    release_b.send(()).unwrap();
    holder_a.join().unwrap();
    holder_b.join().unwrap();

    assert!(lock.try_lock_right());
}

#[test]
fn blocked_right_completes_once_every_left_holder_releases() {
    let lock = Arc::new(SideLock::new());

    let (holder_a, release_a) = spawn_left_holder(lock.clone());
    let (holder_b, release_b) = spawn_left_holder(lock.clone());

    let (running_tx, running_rx) = mpsc::channel();
    let lock_clone = lock.clone();
    let right_task = thread::spawn(move || {
        assert!(
            !lock_clone.try_lock_right(),
            "LEFT is still held; the try must fail before blocking"
        );
        running_tx.send(()).unwrap();
        lock_clone.lock_right();
        true
    });

    running_rx.recv_timeout(Duration::from_secs(2)).unwrap();

    release_a.send(()).unwrap();
    release_b.send(()).unwrap();
    holder_a.join().unwrap();
    holder_b.join().unwrap();

    assert!(right_task.join().unwrap());
    assert_eq!(lock.holders(), 1);
}

#[test]
fn reference_scenario_full_round_trip() {
    // Free → lock_left → concurrent try_lock_right fails → release_left →
    // try_lock_right succeeds
    let lock = Arc::new(SideLock::new());

    lock.lock_left();

    let lock_clone = lock.clone();
    let first_try = thread::spawn(move || lock_clone.try_lock_right())
        .join()
        .unwrap();
    assert!(!first_try);

    lock.release_left();

    let lock_clone = lock.clone();
    let second_try = thread::spawn(move || lock_clone.try_lock_right())
        .join()
        .unwrap();
    assert!(second_try);
}

#[test]
fn timed_acquire_expires_while_opposite_side_is_held() {
    let lock = Arc::new(SideLock::new());
    lock.lock_left();

    let lock_clone = lock.clone();
    let start = Instant::now();
    let acquired = thread::spawn(move || {
        lock_clone.try_lock_right_for(Duration::from_millis(50))
    })
    .join()
    .unwrap();

    assert!(!acquired);
    assert!(start.elapsed() >= Duration::from_millis(50));
    assert_eq!(lock.holders(), -1, "a timed-out acquire holds nothing");
}

#[test]
fn timed_acquire_succeeds_on_a_free_lock() {
    let lock = SideLock::new();
    assert!(lock.try_lock_left_for(Duration::from_millis(50)));
    assert_eq!(lock.holders(), -1);
    lock.release_left();
}

#[test]
fn newcomers_barge_onto_the_active_side_past_parked_waiters() {
    // Accepted property, not a bug: there is no FIFO order. While a RIGHT
    // acquirer is parked, a newly arriving LEFT acquirer still gets in.
    let lock = Arc::new(SideLock::new());
    lock.lock_left();

    let lock_clone = lock.clone();
    let parked_right = thread::spawn(move || {
        lock_clone.lock_right();
        lock_clone.release_right();
    });

    // Give the RIGHT acquirer time to park
    thread::sleep(Duration::from_millis(100));
    assert!(
        lock.try_lock_left(),
        "a newcomer joins the active side ahead of the parked waiter"
    );

    lock.release_left();
    lock.release_left();
    parked_right.join().unwrap();
}

#[test]
fn mutual_exclusion_holds_under_every_strategy() {
    let _ = env_logger::builder().is_test(true).try_init();

    for strategy in [
        StrategyType::Futex,
        StrategyType::Condvar,
        StrategyType::SpinWait,
    ] {
        let config = SyncConfig {
            strategy,
            ..Default::default()
        };
        let lock = Arc::new(SideLock::with_config(config));
        lock.lock_left();

        let done = Arc::new(AtomicBool::new(false));
        let lock_clone = lock.clone();
        let done_clone = done.clone();
        let handle = thread::spawn(move || {
            lock_clone.lock_right();
            done_clone.store(true, Ordering::Release);
            lock_clone.release_right();
        });

        thread::sleep(Duration::from_millis(50));
        assert!(
            !done.load(Ordering::Acquire),
            "{:?}: blocked acquire completed while LEFT was held",
            strategy
        );

        lock.release_left();
        handle.join().unwrap();
        assert!(done.load(Ordering::Acquire), "{:?}: waiter never woke", strategy);
    }
}

#[test]
fn contended_ping_pong_between_sides_converges() {
    // Many threads per side, each acquiring and releasing repeatedly. The
    // invariant checked on every acquisition: the holder snapshot never
    // carries the opposite sign.
    let lock = Arc::new(SideLock::new());
    let mut handles = Vec::new();

    for side in [Side::Left, Side::Right] {
        for _ in 0..4 {
            let lock = lock.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..200 {
                    lock.lock(side);
                    let snapshot = lock.holders();
                    assert!(
                        snapshot != 0 && (snapshot < 0) == (side.unit() < 0),
                        "held {} but counter was {}",
                        side,
                        snapshot
                    );
                    lock.release(side);
                }
            }));
        }
    }

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(lock.holders(), 0);
}
