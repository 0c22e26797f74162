//! # Contact Plan Module
//!
//! A contact plan describes how generated contacts are named. The simple form
//! is a single label applied to every contact with a monotonically increasing
//! counter ("Client" → "Client 1", "Client 2", …). The grouped form is an
//! ordered list of `(label, count)` pairs consumed left to right ("Alice 2
//! Bob 1" → "Alice 1", "Alice 2", "Bob 1", …).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::PipelineError;

/// An entry of a grouped contact plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub label: String,
    pub count: usize,
}

/// An ordered naming plan for generated contacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactPlan {
    /// One label for every contact, counter never resets
    Single(String),
    /// Ordered `(label, count)` groups; order is significant
    Sequential(Vec<PlanEntry>),
}

impl ContactPlan {
    /// Parse a plan from user text.
    ///
    /// One whitespace token is a single-label plan. More than one token must
    /// form an even sequence of alternating `label count` pairs, every count
    /// a number of at least 1. Anything else is a `MalformedPlan` carrying
    /// the fragment that failed.
    pub fn parse(input: &str) -> Result<Self, PipelineError> {
        let tokens: Vec<&str> = input.split_whitespace().collect();

        match tokens.len() {
            0 => Err(PipelineError::InvalidInput(
                "contact name must not be empty".to_string(),
            )),
            1 => Ok(ContactPlan::Single(tokens[0].to_string())),
            n if n % 2 != 0 => Err(PipelineError::MalformedPlan(
                tokens[n - 1].to_string(),
            )),
            _ => {
                let mut entries = Vec::with_capacity(tokens.len() / 2);
                for pair in tokens.chunks(2) {
                    let (label, count_token) = (pair[0], pair[1]);
                    let count: usize = count_token.parse().map_err(|_| {
                        PipelineError::MalformedPlan(format!("{label} {count_token}"))
                    })?;
                    if count < 1 {
                        return Err(PipelineError::MalformedPlan(format!(
                            "{label} {count_token}"
                        )));
                    }
                    entries.push(PlanEntry {
                        label: label.to_string(),
                        count,
                    });
                }
                debug!(groups = entries.len(), "Parsed grouped contact plan");
                Ok(ContactPlan::Sequential(entries))
            }
        }
    }

    /// Total capacity of a grouped plan; `None` for the unbounded single form.
    pub fn capacity(&self) -> Option<usize> {
        match self {
            ContactPlan::Single(_) => None,
            ContactPlan::Sequential(entries) => {
                Some(entries.iter().map(|entry| entry.count).sum())
            }
        }
    }
}

/// One display-name assignment produced by the allocator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameAssignment {
    pub label: String,
    pub sequence: usize,
}

impl NameAssignment {
    /// The display name rendered into the vCard `FN` field
    pub fn display_name(&self) -> String {
        format!("{} {}", self.label, self.sequence)
    }
}

/// Cursor over a contact plan, called once per validated number in input order.
///
/// A grouped plan that runs out of capacity keeps yielding the last label
/// with sequence 1 rather than failing; leftover numbers still get a name.
#[derive(Debug)]
pub struct ContactAllocator {
    plan: ContactPlan,
    entry_index: usize,
    used_in_entry: usize,
    counter: usize,
}

impl ContactAllocator {
    pub fn new(plan: ContactPlan) -> Self {
        Self {
            plan,
            entry_index: 0,
            used_in_entry: 0,
            counter: 1,
        }
    }

    /// Produce the label and per-label sequence number for the next contact.
    pub fn next_assignment(&mut self) -> NameAssignment {
        match &self.plan {
            ContactPlan::Single(label) => {
                let assignment = NameAssignment {
                    label: label.clone(),
                    sequence: self.counter,
                };
                self.counter += 1;
                assignment
            }
            ContactPlan::Sequential(entries) => {
                let entry = &entries[self.entry_index];
                if self.used_in_entry >= entry.count {
                    // Plan exhausted: reuse the last label, sequence pinned to 1
                    return NameAssignment {
                        label: entry.label.clone(),
                        sequence: 1,
                    };
                }

                let assignment = NameAssignment {
                    label: entry.label.clone(),
                    sequence: self.counter,
                };
                self.used_in_entry += 1;
                self.counter += 1;

                if self.used_in_entry >= entry.count && self.entry_index + 1 < entries.len() {
                    self.entry_index += 1;
                    self.used_in_entry = 0;
                    self.counter = 1;
                }

                assignment
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take(allocator: &mut ContactAllocator, n: usize) -> Vec<(String, usize)> {
        (0..n)
            .map(|_| {
                let a = allocator.next_assignment();
                (a.label, a.sequence)
            })
            .collect()
    }

    #[test]
    fn test_single_label_monotonic_counter() {
        let plan = ContactPlan::parse("Client").unwrap();
        let mut allocator = ContactAllocator::new(plan);

        assert_eq!(
            take(&mut allocator, 3),
            vec![
                ("Client".to_string(), 1),
                ("Client".to_string(), 2),
                ("Client".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_grouped_plan_allocation_and_exhaustion() {
        let plan = ContactPlan::parse("A 2 B 1").unwrap();
        let mut allocator = ContactAllocator::new(plan);

        // Five numbers against capacity three: last label repeats once exhausted
        assert_eq!(
            take(&mut allocator, 5),
            vec![
                ("A".to_string(), 1),
                ("A".to_string(), 2),
                ("B".to_string(), 1),
                ("B".to_string(), 1),
                ("B".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_counter_resets_between_groups() {
        let plan = ContactPlan::parse("Alice 2 Bob 2").unwrap();
        let mut allocator = ContactAllocator::new(plan);

        assert_eq!(
            take(&mut allocator, 4),
            vec![
                ("Alice".to_string(), 1),
                ("Alice".to_string(), 2),
                ("Bob".to_string(), 1),
                ("Bob".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_odd_token_count() {
        let err = ContactPlan::parse("Alice 2 Bob").unwrap_err();
        assert_eq!(err, PipelineError::MalformedPlan("Bob".to_string()));
    }

    #[test]
    fn test_parse_rejects_non_numeric_count() {
        let err = ContactPlan::parse("Alice two").unwrap_err();
        assert_eq!(err, PipelineError::MalformedPlan("Alice two".to_string()));
    }

    #[test]
    fn test_parse_rejects_zero_count() {
        let err = ContactPlan::parse("Alice 0").unwrap_err();
        assert_eq!(err, PipelineError::MalformedPlan("Alice 0".to_string()));
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert!(matches!(
            ContactPlan::parse("   "),
            Err(PipelineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_capacity() {
        assert_eq!(ContactPlan::parse("X").unwrap().capacity(), None);
        assert_eq!(ContactPlan::parse("A 2 B 3").unwrap().capacity(), Some(5));
    }

    #[test]
    fn test_display_name() {
        let assignment = NameAssignment {
            label: "Alice".to_string(),
            sequence: 7,
        };
        assert_eq!(assignment.display_name(), "Alice 7");
    }
}
