// src/pipeline/emit.rs

//! Picking the record to surface and what stays queued.

use crate::models::QueueMode;

/// Outcome of emitting from a candidate list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Emission {
    /// Record to surface this run, if any
    pub output: Option<String>,

    /// Records to persist for later runs
    pub backlog: Vec<String>,
}

/// Take the head of the candidate list.
///
/// In [`QueueMode::Compat`] the head is only dropped from the backlog when
/// more than two candidates exist; shorter lists are persisted unchanged and
/// the same record is surfaced again next run. [`QueueMode::Fixed`] always
/// drops it.
pub fn emit(candidates: Vec<String>, mode: QueueMode) -> Emission {
    let Some(head) = candidates.first().cloned() else {
        return Emission::default();
    };

    let backlog = match mode {
        QueueMode::Compat if candidates.len() <= 2 => candidates,
        _ => candidates.into_iter().skip(1).collect(),
    };

    Emission {
        output: Some(head),
        backlog,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_candidates() {
        let emission = emit(Vec::new(), QueueMode::Compat);
        assert_eq!(emission.output, None);
        assert!(emission.backlog.is_empty());
    }

    #[test]
    fn test_compat_two_candidates_retained() {
        let emission = emit(lines(&["1%%a%%x", "2%%b%%y"]), QueueMode::Compat);
        assert_eq!(emission.output.as_deref(), Some("1%%a%%x"));
        assert_eq!(emission.backlog, lines(&["1%%a%%x", "2%%b%%y"]));
    }

    #[test]
    fn test_compat_single_candidate_retained() {
        let emission = emit(lines(&["1%%a%%x"]), QueueMode::Compat);
        assert_eq!(emission.output.as_deref(), Some("1%%a%%x"));
        assert_eq!(emission.backlog, lines(&["1%%a%%x"]));
    }

    #[test]
    fn test_compat_three_candidates_trimmed() {
        let emission = emit(lines(&["1%%a%%x", "2%%b%%y", "3%%c%%z"]), QueueMode::Compat);
        assert_eq!(emission.output.as_deref(), Some("1%%a%%x"));
        assert_eq!(emission.backlog, lines(&["2%%b%%y", "3%%c%%z"]));
    }

    #[test]
    fn test_fixed_always_trims() {
        let emission = emit(lines(&["1%%a%%x", "2%%b%%y"]), QueueMode::Fixed);
        assert_eq!(emission.output.as_deref(), Some("1%%a%%x"));
        assert_eq!(emission.backlog, lines(&["2%%b%%y"]));

        let emission = emit(lines(&["1%%a%%x"]), QueueMode::Fixed);
        assert!(emission.backlog.is_empty());
    }
}
