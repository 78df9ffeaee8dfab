use std::{
    collections::BTreeMap,
    fmt::Display,
    sync::{Arc, Mutex},
    time::Instant,
};

use lazy_static::lazy_static;

pub type StatsNode = Arc<Mutex<Stats>>;

lazy_static! {
    static ref ROOT_STATS: StatsNode = Arc::new(Mutex::new(Stats::new(1)));
}

/// A node in the hierarchical timing tree.
pub struct Stats {
    /// The hierarchical depth of the stats node
    depth: usize,

    /// The accumulated timings of the node in nanoseconds
    timings_ns: u128,

    /// The number of recorded timings
    num_calls: u64,

    /// Further children timings, sorted by name
    children: BTreeMap<String, StatsNode>,
}

/// Guard that adds the time elapsed since its creation to a stats node when dropped.
pub struct TimeRecording {
    dst_node: StatsNode,
    t0: Instant,
}

pub trait StatsNodeTrait {
    /// Starts a new timing for the node, which ends when the returned guard is dropped.
    fn register_timing(&self) -> TimeRecording;

    /// Returns the child node with the given name and creates it if needed.
    fn get_child(&self, name: &str) -> StatsNode;
}

impl TimeRecording {
    pub fn new(dst_node: StatsNode) -> Self {
        let t0 = Instant::now();

        Self { dst_node, t0 }
    }
}

impl Drop for TimeRecording {
    #[inline]
    fn drop(&mut self) {
        let ns = self.t0.elapsed().as_nanos();

        let mut node = self.dst_node.lock().unwrap();
        node.timings_ns += ns;
        node.num_calls += 1;
    }
}

impl Stats {
    /// Returns the root stats node
    #[inline]
    pub fn root() -> StatsNode {
        ROOT_STATS.clone()
    }

    /// Creates a new detached root node, e.g., for collecting the timings of a single run.
    pub fn new_root() -> StatsNode {
        Arc::new(Mutex::new(Stats::new(1)))
    }

    /// Returns a children time node for the given identifier.
    ///
    /// # Arguments
    /// * `name` - The name of the children time.
    #[inline]
    pub fn get_child(&mut self, name: String) -> StatsNode {
        let depth = self.depth;
        let node = self
            .children
            .entry(name)
            .or_insert_with(|| Arc::new(Mutex::new(Stats::new(depth + 1))));

        node.clone()
    }

    /// Returns the elapsed time of the node in nano-seconds
    #[inline]
    pub fn as_nanos(&self) -> u128 {
        self.timings_ns
    }

    /// Returns the elapsed time of the node in milli-seconds
    #[inline]
    pub fn as_millis(&self) -> u128 {
        self.timings_ns / 1000000u128
    }

    /// Returns the number of recorded timings.
    #[inline]
    pub fn num_calls(&self) -> u64 {
        self.num_calls
    }

    /// Returns the average time per recorded timing in milli-seconds.
    pub fn average_millis(&self) -> f64 {
        if self.num_calls == 0 {
            0f64
        } else {
            self.timings_ns as f64 / self.num_calls as f64 / 1e6f64
        }
    }

    /// Internal function for creating a new time node.
    fn new(depth: usize) -> Self {
        Self {
            depth,
            timings_ns: 0u128,
            num_calls: 0,
            children: BTreeMap::new(),
        }
    }

    fn fmt_timing(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.num_calls > 1 {
            write!(
                f,
                "{} ms ({} calls, avg {:.3} ms)",
                self.as_millis(),
                self.num_calls,
                self.average_millis()
            )
        } else {
            write!(f, "{} ms", self.as_millis())
        }
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.children.is_empty() {
            self.fmt_timing(f)?;
            writeln!(f, ",")
        } else {
            if self.num_calls == 0 {
                writeln!(f, "{{")?;
            } else {
                self.fmt_timing(f)?;
                writeln!(f, " {{")?;
            }

            for (name, child) in self.children.iter() {
                // add indenting
                for _ in 0..(self.depth * 2) {
                    write!(f, " ")?;
                }

                write!(f, "{}: ", name)?;
                child.lock().unwrap().fmt(f)?;
            }

            for _ in 0..((self.depth - 1) * 2) {
                write!(f, " ")?;
            }

            writeln!(f, "}},")
        }
    }
}

impl StatsNodeTrait for StatsNode {
    #[inline]
    fn register_timing(&self) -> TimeRecording {
        TimeRecording::new(self.clone())
    }

    #[inline]
    fn get_child(&self, name: &str) -> StatsNode {
        self.lock().unwrap().get_child(name.to_owned())
    }
}
