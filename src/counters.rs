//! Dynamic hit counts for recoverable invariant guards.
//!
//! Every evaluated `noway_assert!` records one hit for its [`Site`] before the
//! condition is checked, so the counts rank guards by how often they execute,
//! not by how often they fail. Recording is active only when
//! [`Config::measures_noway`] holds.
//!
//! The table is process-wide. Entries are created on first hit and never
//! removed; counts are only read for reporting.

use hashbrown::DefaultHashBuilder;
use hashbrown::HashMap;
use parking_lot::RwLock;
use parking_lot::RwLockReadGuard;
use parking_lot::RwLockWriteGuard;
use std::cmp::Reverse;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::io;
use std::io::Write;
use std::sync::LazyLock;

use crate::config::Config;
use crate::consts::CAP_HIT_COUNT_SITES;
use crate::error::Site;
use crate::loom::sync::atomic::AtomicU64;
use crate::loom::sync::atomic::Ordering;

static TABLE: LazyLock<CounterTable> = LazyLock::new(CounterTable::new);

// -----------------------------------------------------------------------------
// Hit Count
// -----------------------------------------------------------------------------

/// A counter which can be incremented concurrently.
#[repr(transparent)]
pub struct HitCount {
  inner: AtomicU64,
}

impl HitCount {
  /// Creates a new counter starting at zero.
  #[inline]
  pub fn new() -> Self {
    Self {
      inner: AtomicU64::new(0),
    }
  }

  /// Adds one hit, returning the updated count.
  #[inline]
  pub fn increment(&self) -> u64 {
    self.inner.fetch_add(1, Ordering::Relaxed) + 1
  }

  /// Returns the current count.
  #[inline]
  pub fn get(&self) -> u64 {
    self.inner.load(Ordering::Relaxed)
  }
}

impl Debug for HitCount {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Debug::fmt(&self.get(), f)
  }
}

impl Default for HitCount {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

// -----------------------------------------------------------------------------
// Counter Table
// -----------------------------------------------------------------------------

/// Thread-safe mapping from guard sites to hit counts.
///
/// Lookups of known sites only take a read lock; the write lock is taken the
/// first time a site is hit.
#[repr(transparent)]
pub struct CounterTable {
  inner: RwLock<HashMap<Site, HitCount, DefaultHashBuilder>>,
}

impl CounterTable {
  /// Creates a new empty table.
  #[inline]
  pub fn new() -> Self {
    Self {
      inner: RwLock::new(HashMap::with_capacity(CAP_HIT_COUNT_SITES)),
    }
  }

  /// Records one hit for `site`, returning the updated count.
  pub fn increment(&self, site: &Site) -> u64 {
    // -------------------------------------------------------------------------
    // 1. Fast Path - Known Site
    // -------------------------------------------------------------------------

    {
      let guard: RwLockReadGuard<'_, _> = self.inner.read();

      if let Some(count) = guard.get(site) {
        return count.increment();
      }
    }

    // -------------------------------------------------------------------------
    // 2. Slow Path - New Site
    // -------------------------------------------------------------------------

    let mut guard: RwLockWriteGuard<'_, _> = self.inner.write();

    // Another thread may have inserted the site between the two locks.
    guard.entry(*site).or_default().increment()
  }

  /// Returns the number of hits recorded for `site`.
  pub fn count(&self, site: &Site) -> u64 {
    self.inner.read().get(site).map_or(0, HitCount::get)
  }

  /// Returns the number of distinct sites hit.
  pub fn len(&self) -> usize {
    self.inner.read().len()
  }

  /// Returns `true` if no site has been hit.
  pub fn is_empty(&self) -> bool {
    self.inner.read().is_empty()
  }

  /// Returns every site with its count, most frequent first.
  ///
  /// Sites with equal counts are ordered by file, then line.
  pub fn snapshot(&self) -> Vec<(Site, u64)> {
    let mut entries: Vec<(Site, u64)> = self
      .inner
      .read()
      .iter()
      .map(|(site, count)| (*site, count.get()))
      .collect();

    entries.sort_unstable_by_key(|(site, count)| (Reverse(*count), *site));
    entries
  }

  /// Writes the ranking as `count, file, line, "text"` lines.
  pub fn write_report<W>(&self, writer: &mut W) -> io::Result<()>
  where
    W: Write,
  {
    for (site, count) in self.snapshot() {
      writeln!(
        writer,
        "{count}, {}, {}, \"{}\"",
        site.file(),
        site.line(),
        site.text(),
      )?;
    }

    Ok(())
  }
}

impl Debug for CounterTable {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_map().entries(self.snapshot()).finish()
  }
}

impl Default for CounterTable {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

// -----------------------------------------------------------------------------
// Process-Wide Table
// -----------------------------------------------------------------------------

/// Records one guard evaluation at `site`.
///
/// Does nothing unless the current configuration measures guards.
#[inline]
pub fn record(site: &Site) {
  if Config::current().measures_noway() {
    TABLE.increment(site);
  }
}

/// Returns the number of evaluations recorded for `site`.
#[inline]
pub fn count(site: &Site) -> u64 {
  TABLE.count(site)
}

/// Returns every recorded site with its count, most frequent first.
#[inline]
pub fn snapshot() -> Vec<(Site, u64)> {
  TABLE.snapshot()
}

/// Writes the process-wide ranking to `writer`.
///
/// See [`CounterTable::write_report`] for the line format.
#[inline]
pub fn write_report<W>(writer: &mut W) -> io::Result<()>
where
  W: Write,
{
  TABLE.write_report(writer)
}

/// Emits the process-wide ranking as `info` events.
pub fn report() {
  let entries: Vec<(Site, u64)> = snapshot();

  tracing::info!(target: "jittrap", sites = entries.len(), "noway_assert hit counts");

  for (site, count) in entries {
    tracing::info!(
      target: "jittrap",
      count,
      file = site.file(),
      line = site.line(),
      "{}",
      site.text(),
    );
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use parking_lot::Mutex;
  use std::io;
  use std::thread;
  use triomphe::Arc;
  use tracing::Level;

  use crate::config::BuildMode;
  use crate::config::Config;
  use crate::config::Features;
  use crate::counters;
  use crate::counters::CounterTable;
  use crate::error::Site;
  use crate::loom::sync::Barrier;

  static MEASURING: Config = Config::diagnostic().with_features(Features::MEASURE_NOWAY);
  static SILENT: Config = Config::new()
    .with_mode(BuildMode::Production)
    .with_features(Features::MEASURE_NOWAY);

  const LOWER: Site = Site::new("src/lower.rs", 40, "node.is_leaf()");
  const IMPORT: Site = Site::new("src/import.rs", 9, "depth < 64");
  const EMIT: Site = Site::new("src/emit.rs", 3, "size != 0");

  struct Capture(Arc<Mutex<Vec<u8>>>);

  impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
      self.0.lock().extend_from_slice(buf);
      Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
      Ok(())
    }
  }

  #[test]
  fn test_increment_counts() {
    let table: CounterTable = CounterTable::new();

    assert_eq!(table.increment(&LOWER), 1);
    assert_eq!(table.increment(&LOWER), 2);
    assert_eq!(table.count(&LOWER), 2);
    assert_eq!(table.count(&IMPORT), 0);
    assert_eq!(table.len(), 1);
  }

  #[test]
  fn test_snapshot_order() {
    let table: CounterTable = CounterTable::new();

    table.increment(&EMIT);
    table.increment(&IMPORT);
    table.increment(&LOWER);
    table.increment(&LOWER);

    let sites: Vec<Site> = table.snapshot().into_iter().map(|(site, _)| site).collect();

    assert_eq!(sites, [LOWER, EMIT, IMPORT]);
  }

  #[test]
  fn test_write_report() {
    let table: CounterTable = CounterTable::new();
    let mut output: Vec<u8> = Vec::new();

    table.increment(&IMPORT);
    table.increment(&LOWER);
    table.increment(&LOWER);
    table.write_report(&mut output).unwrap();

    assert_eq!(
      String::from_utf8(output).unwrap(),
      "2, src/lower.rs, 40, \"node.is_leaf()\"\n1, src/import.rs, 9, \"depth < 64\"\n",
    );
  }

  #[test]
  fn test_record_requires_diagnostic() {
    const SITE: Site = Site::new("src/counters.rs", 1, "production only");

    SILENT.scope(|| counters::record(&SITE));
    assert_eq!(counters::count(&SITE), 0);

    MEASURING.scope(|| counters::record(&SITE));
    assert_eq!(counters::count(&SITE), 1);
  }

  #[test]
  fn test_report_emits_events() {
    const SITE: Site = Site::new("src/regalloc.rs", 218, "spill.is_some()");

    let buffer: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
    let writer: Arc<Mutex<Vec<u8>>> = Arc::clone(&buffer);

    let subscriber = tracing_subscriber::fmt()
      .with_ansi(false)
      .with_max_level(Level::INFO)
      .with_writer(move || Capture(Arc::clone(&writer)))
      .finish();

    MEASURING.scope(|| counters::record(&SITE));
    tracing::subscriber::with_default(subscriber, counters::report);

    let output: String = String::from_utf8(buffer.lock().clone()).unwrap();

    assert!(output.contains("noway_assert hit counts"));
    assert!(output.contains("spill.is_some()"));
    assert!(output.contains("file=\"src/regalloc.rs\""));
    assert!(output.contains("line=218"));
  }

  #[test]
  fn stress_concurrent_same_site() {
    let table: Arc<CounterTable> = Arc::new(CounterTable::new());
    let barrier: Arc<Barrier> = Arc::new(Barrier::new(100));

    let threads: Vec<_> = (0..100)
      .map(|_| {
        let table: Arc<CounterTable> = Arc::clone(&table);
        let barrier: Arc<Barrier> = Arc::clone(&barrier);

        thread::spawn(move || {
          barrier.wait();

          for _ in 0..10 {
            table.increment(&LOWER);
          }
        })
      })
      .collect();

    for handle in threads {
      handle.join().unwrap();
    }

    assert_eq!(table.count(&LOWER), 1000);
    assert_eq!(table.len(), 1);
  }
}
