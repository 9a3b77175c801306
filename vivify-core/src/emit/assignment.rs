// vivify-core - Deferred assignment list
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Deferred assignments: the patch statements appended after the root
//! expression to close cycles and wire shared references.
//!
//! Three shapes exist: indexed property writes, map `.set` calls, and
//! set `.add` calls. Resolution coalesces mergeable neighbours to keep
//! the output short:
//!
//! - consecutive indexed writes of the same value chain into
//!   `a=b=value`;
//! - consecutive `.set` calls on one source chain into
//!   `s.set(k1,v1).set(k2,v2)`;
//! - consecutive `.add` calls likewise.
//!
//! Any other adjacency flushes the buffered entry, so the relative
//! order of non-mergeable patches is preserved.

/// One deferred patch.
#[derive(Debug, Clone)]
pub(crate) enum Assignment {
    /// `target=value`, target is an indexed or dotted property path.
    Index { target: String, value: String },
    /// `source.set(key,value)`.
    Set {
        source: String,
        key: String,
        value: String,
    },
    /// `source.add(value)`.
    Add { source: String, value: String },
}

enum Buffered {
    Index { targets: Vec<String>, value: String },
    Set { source: String, calls: Vec<(String, String)> },
    Add { source: String, values: Vec<String> },
}

impl Buffered {
    fn start(assignment: Assignment) -> Buffered {
        match assignment {
            Assignment::Index { target, value } => Buffered::Index {
                targets: vec![target],
                value,
            },
            Assignment::Set { source, key, value } => Buffered::Set {
                source,
                calls: vec![(key, value)],
            },
            Assignment::Add { source, value } => Buffered::Add {
                source,
                values: vec![value],
            },
        }
    }

    /// Merge the next entry in, or give it back when not mergeable.
    fn merge(&mut self, assignment: Assignment) -> Option<Assignment> {
        match (self, assignment) {
            (Buffered::Index { targets, value }, Assignment::Index { target, value: next })
                if *value == next =>
            {
                targets.push(target);
                None
            }
            (Buffered::Set { source, calls }, Assignment::Set { source: next, key, value })
                if *source == next =>
            {
                calls.push((key, value));
                None
            }
            (Buffered::Add { source, values }, Assignment::Add { source: next, value })
                if *source == next =>
            {
                values.push(value);
                None
            }
            (_, other) => Some(other),
        }
    }

    fn flush(self) -> String {
        match self {
            Buffered::Index { targets, value } => {
                let mut out = targets.join("=");
                out.push('=');
                out.push_str(&value);
                out
            }
            Buffered::Set { source, calls } => {
                let mut out = source;
                for (key, value) in calls {
                    out.push_str(".set(");
                    out.push_str(&key);
                    out.push(',');
                    out.push_str(&value);
                    out.push(')');
                }
                out
            }
            Buffered::Add { source, values } => {
                let mut out = source;
                for value in values {
                    out.push_str(".add(");
                    out.push_str(&value);
                    out.push(')');
                }
                out
            }
        }
    }
}

/// Merge and render the patch list; `None` when there is nothing to do.
pub(crate) fn resolve(assignments: Vec<Assignment>) -> Option<String> {
    let mut iter = assignments.into_iter();
    let mut buffered = Buffered::start(iter.next()?);
    let mut flushed: Vec<String> = Vec::new();
    for next in iter {
        if let Some(unmerged) = buffered.merge(next) {
            let done = std::mem::replace(&mut buffered, Buffered::start(unmerged));
            flushed.push(done.flush());
        }
    }
    flushed.push(buffered.flush());
    Some(flushed.join(","))
}
