use serde::Serialize;
use tracing::{debug, error, info, warn};

use election_core::{broadcast, DirectedMessage, Message, Participant};

use crate::canonical::{global_digest, Unrepresentable};
use crate::error::ExploreError;
use crate::mirror::MirrorCache;
use crate::params::ExplorerParams;
use crate::report::{banner, format_messages, state_dump};
use crate::stats::{RunStatistics, RunSummary};
use crate::terminal::{evaluate, Verdict};

/// What a subtree of the search reported back to its parent.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Outcome {
    /// Some path below was cut off by the depth limit and not yet classified.
    pub limit_hit: bool,
    /// No message changed any state, so the search ended here.
    pub leaf: bool,
    /// A safe majority, or a state already explored, was reached below.
    pub saw_success: bool,
}

impl Outcome {
    fn new(limit_hit: bool, leaf: bool, saw_success: bool) -> Self {
        Outcome {
            limit_hit,
            leaf,
            saw_success,
        }
    }
}

/// Messages delivered from the initial state to a noteworthy one.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RecordedPath<M> {
    pub depth: usize,
    pub path: Vec<DirectedMessage<M>>,
}

/// Everything a finished run has to say.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport<M> {
    pub summary: RunSummary,
    /// Number of distinct global states expanded.
    pub distinct_states: usize,
    /// Outcome of the initial state.
    pub outcome: Outcome,
    /// The first solution paths found, up to the configured cap.
    pub solutions: Vec<RecordedPath<M>>,
    /// The first safety violation paths found, up to the configured cap.
    pub violations: Vec<RecordedPath<M>>,
}

/// Tracks which kinds of state have already been dumped at debug level.
#[derive(Default)]
struct Dumped {
    limit_hit: bool,
    solution: bool,
    failure: bool,
}

/// A single exhaustive exploration.
///
/// Owns everything that outlives one call of the search: the mirror cache, the
/// statistics, the path of the branch being explored and the recorded paths. A
/// `Run` is consumed by [`Run::explore`], so nothing leaks from one run into the next.
pub struct Run<'a, M> {
    params: &'a ExplorerParams,
    mirrors: MirrorCache,
    stats: RunStatistics,
    path: Vec<DirectedMessage<M>>,
    solutions: Vec<RecordedPath<M>>,
    violations: Vec<RecordedPath<M>>,
    dumped: Dumped,
}

impl<'a, M: Message> Run<'a, M> {
    pub fn new(params: &'a ExplorerParams) -> Self {
        Run {
            params,
            mirrors: MirrorCache::new(),
            stats: RunStatistics::new(),
            path: Vec::new(),
            solutions: Vec::new(),
            violations: Vec::new(),
            dumped: Dumped::default(),
        }
    }

    /// Deliver `queue` to `participants` in every possible order.
    ///
    /// # Params
    /// - queue: The messages pending in the initial state.
    /// - participants: The initial state. Every participant is handed back exactly
    ///   as it was passed in, whether or not the run succeeds.
    ///
    /// # Returns
    /// The report of the run, or the condition that aborted it.
    pub fn explore<P>(
        mut self,
        queue: &[DirectedMessage<M>],
        participants: &mut [P],
    ) -> Result<RunReport<M>, ExploreError>
    where
        P: Participant<Message = M>,
    {
        self.params.validate()?;
        info!(
            participants = participants.len(),
            pending = queue.len(),
            depth_limit = self.params.depth_limit(),
            loop_horizon = ?self.params.loop_horizon(),
            "starting exploration"
        );

        let outcome = self.dive(queue, participants, 0)?;
        let summary = self.stats.summarize();
        info!(
            applied = summary.applied,
            solutions = summary.solutions,
            mirrors = summary.mirrors,
            loops = summary.loops,
            violations = summary.violations,
            failures = summary.failures,
            max_depth = summary.max_depth,
            "exploration finished"
        );

        Ok(RunReport {
            summary,
            distinct_states: self.mirrors.len(),
            outcome,
            solutions: self.solutions,
            violations: self.violations,
        })
    }

    fn dive<P>(
        &mut self,
        queue: &[DirectedMessage<M>],
        participants: &mut [P],
        depth: usize,
    ) -> Result<Outcome, ExploreError>
    where
        P: Participant<Message = M>,
    {
        self.stats.record_visit(depth);

        if depth >= self.params.depth_limit() {
            self.stats.record_limit_hit(depth);
            if !self.dumped.limit_hit {
                self.dumped.limit_hit = true;
                debug!("{}", state_dump("Hit Limit", &self.stats, participants, &self.path, queue, depth));
            }
            return Ok(Outcome::new(true, false, false));
        }

        match evaluate(participants) {
            Verdict::SafeMajority { priority, committed } => {
                self.stats.record_solution(depth);
                self.record_path(depth, true);
                if !self.dumped.solution {
                    self.dumped.solution = true;
                    debug!(?priority, committed, "first solution");
                    debug!("{}", state_dump("Solution", &self.stats, participants, &self.path, queue, depth));
                }
                return Ok(Outcome::new(false, true, true));
            }
            Verdict::SafetyViolation {
                first,
                first_priority,
                second,
                second_priority,
            } => {
                self.stats.record_violation(depth);
                self.record_path(depth, false);
                warn!(
                    depth,
                    first,
                    ?first_priority,
                    second,
                    ?second_priority,
                    "committed leaders disagree\n{}",
                    format_messages(&self.path)
                );
            }
            Verdict::Unresolved => {}
        }

        if depth > 0 {
            let digest = match global_digest(participants) {
                Ok(digest) => digest,
                Err(Unrepresentable(participant)) => {
                    let path = format_messages(&self.path);
                    error!(participant, depth, "participant state cannot be canonicalized\n{}", path);
                    return Err(ExploreError::StateUnrepresentable {
                        participant,
                        depth,
                        path,
                    });
                }
            };
            if !self.mirrors.insert(digest) {
                self.stats.record_mirror(depth);
                return Ok(Outcome::new(false, false, true));
            }
        }

        let mut outcome = Outcome::new(false, true, false);
        let mut working = queue.to_vec();
        for idx in StridedOrder::new(queue.len()) {
            let directed = working.remove(idx);
            let target = directed.target();
            let saved = participants[target].clone();
            let (generated, changed) = participants[target].execute(directed.msg(), depth);
            self.count_applied(depth);

            if !changed {
                self.stats.record_dead_message(depth);
                participants[target] = saved;
                working.insert(idx, directed);
                continue;
            }

            self.stats.record_branch();
            outcome.leaf = false;
            let base_len = working.len();
            if let Some(generated) = generated {
                working.extend(broadcast(&generated, target, participants.len()));
            }

            self.path.push(directed.clone());
            let child = self.dive(&working, participants, depth + 1);
            self.path.pop();
            participants[target] = saved;
            working.truncate(base_len);
            working.insert(idx, directed);

            let child = child?;
            outcome.limit_hit |= child.limit_hit;
            outcome.saw_success |= child.saw_success;
        }

        if outcome.limit_hit {
            outcome.leaf = false;
            if self.params.loop_horizon() == Some(depth) {
                if outcome.saw_success {
                    self.stats.record_loop();
                } else {
                    self.record_failure("Loops Fail", participants, queue, depth);
                }
                outcome.limit_hit = false;
            }
        } else if outcome.leaf {
            self.record_failure("Fail", participants, queue, depth);
        }

        Ok(outcome)
    }

    fn count_applied(&mut self, depth: usize) {
        let applied = self.stats.record_applied();
        let interval = self.params.progress_interval();
        if interval > 0 && applied % interval == 0 {
            info!("{}", banner(&self.stats, depth));
        }
    }

    fn record_path(&mut self, depth: usize, solution: bool) {
        let recorded = if solution {
            &mut self.solutions
        } else {
            &mut self.violations
        };
        if recorded.len() < self.params.max_recorded_paths() {
            recorded.push(RecordedPath {
                depth,
                path: self.path.clone(),
            });
        }
    }

    fn record_failure<P>(&mut self, title: &str, participants: &[P], queue: &[DirectedMessage<M>], depth: usize)
    where
        P: Participant<Message = M>,
    {
        self.stats.record_failure(depth);
        if !self.dumped.failure {
            self.dumped.failure = true;
            debug!("{}", state_dump(title, &self.stats, participants, &self.path, queue, depth));
        }
    }
}

/// Visits every index below `len` exactly once, stepping by a stride coprime
/// with `len` so that neighbouring messages are not tried back to back.
struct StridedOrder {
    len: usize,
    stride: usize,
    next: usize,
    remaining: usize,
}

impl StridedOrder {
    fn new(len: usize) -> Self {
        let stride = (3..=len + 1).find(|stride| gcd(*stride, len) == 1).unwrap_or(1);
        StridedOrder {
            len,
            stride,
            next: if len == 0 { 0 } else { stride % len },
            remaining: len,
        }
    }
}

impl Iterator for StridedOrder {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next;
        self.next = (self.next + self.stride) % self.len;
        Some(current)
    }
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
