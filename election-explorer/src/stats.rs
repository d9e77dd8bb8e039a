use serde::{Deserialize, Serialize};

/// Event counts indexed by path depth. Grows to the deepest depth recorded.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepthHistogram(Vec<u64>);

impl DepthHistogram {
    pub fn increment(&mut self, depth: usize) {
        if self.0.len() <= depth {
            self.0.resize(depth + 1, 0);
        }
        self.0[depth] += 1;
    }

    pub fn at(&self, depth: usize) -> u64 {
        self.0.get(depth).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    pub fn counts(&self) -> &[u64] {
        &self.0
    }
}

/// Counters accumulated by one exploration run. Counters only ever grow.
#[derive(Clone, Debug, Default)]
pub struct RunStatistics {
    visits: DepthHistogram,
    dead_messages: DepthHistogram,
    mirrors: DepthHistogram,
    solutions: DepthHistogram,
    failures: DepthHistogram,
    violations: DepthHistogram,
    limit_hits: DepthHistogram,
    loops: u64,
    /// Live messages tried across all calls, i.e. edges of the search tree.
    breadth: u64,
    applied: u64,
    max_depth: usize,
}

impl RunStatistics {
    pub fn new() -> Self {
        RunStatistics::default()
    }

    pub fn record_visit(&mut self, depth: usize) {
        self.visits.increment(depth);
        self.max_depth = self.max_depth.max(depth);
    }

    pub fn record_dead_message(&mut self, depth: usize) {
        self.dead_messages.increment(depth);
    }

    pub fn record_mirror(&mut self, depth: usize) {
        self.mirrors.increment(depth);
    }

    pub fn record_solution(&mut self, depth: usize) {
        self.solutions.increment(depth);
    }

    pub fn record_failure(&mut self, depth: usize) {
        self.failures.increment(depth);
    }

    pub fn record_violation(&mut self, depth: usize) {
        self.violations.increment(depth);
    }

    pub fn record_limit_hit(&mut self, depth: usize) {
        self.limit_hits.increment(depth);
    }

    pub fn record_loop(&mut self) {
        self.loops += 1;
    }

    pub fn record_branch(&mut self) {
        self.breadth += 1;
    }

    /// Count one message application.
    ///
    /// # Returns
    /// The number of messages applied so far, this one included.
    pub fn record_applied(&mut self) -> u64 {
        self.applied += 1;
        self.applied
    }

    pub fn solutions(&self) -> u64 {
        self.solutions.total()
    }
    pub fn mirrors(&self) -> u64 {
        self.mirrors.total()
    }
    pub fn failures(&self) -> u64 {
        self.failures.total()
    }
    pub fn violations(&self) -> u64 {
        self.violations.total()
    }
    pub fn limit_hits(&self) -> u64 {
        self.limit_hits.total()
    }
    pub fn loops(&self) -> u64 {
        self.loops
    }
    pub fn applied(&self) -> u64 {
        self.applied
    }
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn summarize(&self) -> RunSummary {
        RunSummary {
            solutions: self.solutions(),
            mirrors: self.mirrors(),
            loops: self.loops,
            limit_hits: self.limit_hits(),
            violations: self.violations(),
            failures: self.failures(),
            dead_messages: self.dead_messages.total(),
            breadth: self.breadth,
            applied: self.applied,
            max_depth: self.max_depth,
            visits_at: self.visits.clone(),
            dead_messages_at: self.dead_messages.clone(),
            mirrors_at: self.mirrors.clone(),
            solutions_at: self.solutions.clone(),
            failures_at: self.failures.clone(),
            violations_at: self.violations.clone(),
            limit_hits_at: self.limit_hits.clone(),
        }
    }
}

/// Snapshot of [`RunStatistics`] taken at the end of a run.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub solutions: u64,
    pub mirrors: u64,
    pub loops: u64,
    pub limit_hits: u64,
    pub violations: u64,
    pub failures: u64,
    pub dead_messages: u64,
    pub breadth: u64,
    pub applied: u64,
    pub max_depth: usize,
    pub visits_at: DepthHistogram,
    pub dead_messages_at: DepthHistogram,
    pub mirrors_at: DepthHistogram,
    pub solutions_at: DepthHistogram,
    pub failures_at: DepthHistogram,
    pub violations_at: DepthHistogram,
    pub limit_hits_at: DepthHistogram,
}
