//! Text renderings of run statistics and explorer state for logs and the CLI.

use std::fmt::Write;

use election_core::{DirectedMessage, Message, Participant};

use crate::stats::{DepthHistogram, RunStatistics, RunSummary};

const HISTOGRAM_ROW: usize = 16;

/// Render `value` with `,` between groups of three digits.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, digit) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Render the non-zero buckets of `histogram` as `count[depth]`, sixteen to a row.
pub fn format_histogram(histogram: &DepthHistogram) -> String {
    let cells: Vec<String> = histogram
        .counts()
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(depth, count)| format!("{:>12}", format!("{}[{:>3}]", group_thousands(*count), depth)))
        .collect();

    if cells.is_empty() {
        return "    None Found".to_string();
    }
    cells
        .chunks(HISTOGRAM_ROW)
        .map(|row| row.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render delivered or pending messages, one interpreter line each, numbered in
/// a trailing comment so the output can be fed back to the interpreter.
pub fn format_messages<M: Message>(msgs: &[DirectedMessage<M>]) -> String {
    let mut out = String::new();
    for (idx, directed) in msgs.iter().enumerate() {
        let _ = writeln!(out, "{} # {}", directed, idx);
    }
    out
}

/// One line with the headline counters, logged as progress.
pub fn banner(stats: &RunStatistics, depth: usize) -> String {
    format!(
        "applied {} depth {:>3} max {:>3} solutions {} mirrors {} loops {} limits {} violations {} failures {}",
        group_thousands(stats.applied()),
        depth,
        stats.max_depth(),
        group_thousands(stats.solutions()),
        group_thousands(stats.mirrors()),
        group_thousands(stats.loops()),
        group_thousands(stats.limit_hits()),
        group_thousands(stats.violations()),
        group_thousands(stats.failures()),
    )
}

/// Full picture of one explorer call: counters, every participant, the path that
/// led here and what is still pending.
pub fn state_dump<P: Participant>(
    title: &str,
    stats: &RunStatistics,
    participants: &[P],
    path: &[DirectedMessage<P::Message>],
    pending: &[DirectedMessage<P::Message>],
    depth: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "==================== {} @ depth {} ====================", title, depth);
    let _ = writeln!(out, "{}", banner(stats, depth));
    for participant in participants {
        let _ = writeln!(out, "{}", participant);
    }
    let _ = writeln!(out, "# Path:");
    out.push_str(&format_messages(path));
    let _ = writeln!(out, "# Pending:");
    out.push_str(&format_messages(pending));
    out
}

/// Totals and per-depth histograms of a finished run.
pub fn summary_table(summary: &RunSummary) -> String {
    let mut out = String::new();
    let totals = [
        ("messages applied", summary.applied),
        ("breadth", summary.breadth),
        ("solutions", summary.solutions),
        ("mirrors", summary.mirrors),
        ("loops", summary.loops),
        ("limit hits", summary.limit_hits),
        ("safety violations", summary.violations),
        ("failures", summary.failures),
        ("dead messages", summary.dead_messages),
    ];
    for (name, value) in totals {
        let _ = writeln!(out, "{:<18} {:>14}", name, group_thousands(value));
    }
    let _ = writeln!(out, "{:<18} {:>14}", "deepest depth", summary.max_depth);

    let histograms = [
        ("Visits", &summary.visits_at),
        ("Solutions", &summary.solutions_at),
        ("Mirrors", &summary.mirrors_at),
        ("Limit hits", &summary.limit_hits_at),
        ("Safety violations", &summary.violations_at),
        ("Failures", &summary.failures_at),
        ("Dead messages", &summary.dead_messages_at),
    ];
    for (name, histogram) in histograms {
        let _ = writeln!(out, "= {}", name);
        let _ = writeln!(out, "{}", format_histogram(histogram));
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::test_utils::participants::{directed, Scripted, TestMessage};

    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(12_345_678), "12,345,678");
    }

    #[test]
    fn histogram_skips_empty_buckets_and_wraps_rows() {
        let mut histogram = DepthHistogram::default();
        assert_eq!(format_histogram(&histogram), "    None Found");

        for depth in 0..20 {
            histogram.increment(depth);
        }
        histogram.increment(21);
        let rendered = format_histogram(&histogram);
        let rows: Vec<&str> = rendered.lines().collect();

        assert_eq!(rows.len(), 2);
        assert!(rows[0].trim_start().starts_with("1[  0]"));
        assert!(!rendered.contains("[ 20]"));
        assert!(rows[1].trim_end().ends_with("1[ 21]"));
    }

    #[test]
    fn messages_render_in_interpreter_notation() {
        let msgs = vec![directed(1, TestMessage::Tick), directed(0, TestMessage::Commit(2))];
        assert_eq!(format_messages(&msgs), "tick { 1 } # 0\ncommit 2 { 0 } # 1\n");
    }

    #[test]
    fn state_dump_lists_participants_path_and_pending() {
        let participants = vec![Scripted::with_value(0, 3), Scripted::committed_with(1, 2)];
        let path = vec![directed(0, TestMessage::Tick)];
        let pending = vec![directed(1, TestMessage::Noop)];

        let dump = state_dump("Fail", &RunStatistics::new(), &participants, &path, &pending, 1);

        assert!(dump.contains("Fail @ depth 1"));
        assert!(dump.contains("S0 value 3"));
        assert!(dump.contains("S1 value 0 p2 COMMITTED"));
        assert!(dump.contains("# Path:\ntick { 0 } # 0\n"));
        assert!(dump.contains("# Pending:\nnoop { 1 } # 0\n"));
    }
}
