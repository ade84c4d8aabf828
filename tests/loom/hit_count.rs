#![cfg(loom)]

use jittrap::counters::HitCount;
use loom::sync::Arc;
use loom::thread;

#[test]
fn concurrent_increments_are_counted() {
  loom::model(|| {
    let count: Arc<HitCount> = Arc::new(HitCount::new());

    let threads: Vec<_> = (0..2)
      .map(|_| {
        let count: Arc<HitCount> = Arc::clone(&count);

        thread::spawn(move || {
          count.increment();
          count.increment();
        })
      })
      .collect();

    for handle in threads {
      handle.join().unwrap();
    }

    assert_eq!(count.get(), 4, "lost an increment");
  });
}

#[test]
fn increment_returns_distinct_values() {
  loom::model(|| {
    let count: Arc<HitCount> = Arc::new(HitCount::new());

    let t1 = {
      let count: Arc<HitCount> = Arc::clone(&count);
      thread::spawn(move || count.increment())
    };

    let t2 = {
      let count: Arc<HitCount> = Arc::clone(&count);
      thread::spawn(move || count.increment())
    };

    let mut values: [u64; 2] = [t1.join().unwrap(), t2.join().unwrap()];
    values.sort_unstable();

    assert_eq!(values, [1, 2]);
  });
}
