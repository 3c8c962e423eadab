//! Round-robin staff sequence
//!
//! Maintains the `sequence_order` slots the round-robin rule walks through.
//! Orders stay unique and, after any edit made here, contiguous from 1.
//! Editing the sequence never assigns anything.

use thiserror::Error;

use crate::matching::sequence_cmp;
use crate::roster::Roster;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("staff member not found: {0}")]
    StaffNotFound(String),

    #[error("staff member '{staff_id}' is already in the sequence at #{order}")]
    AlreadySequenced { staff_id: String, order: u32 },

    #[error("staff member '{0}' is not in the sequence")]
    NotSequenced(String),

    #[error("no order left after #{last} for staff member '{staff_id}'; normalize the sequence first")]
    OrdersExhausted { staff_id: String, last: u32 },
}

/// Edits the round-robin order of a roster
///
/// # Examples
///
/// ```
/// use tripdesk::roster::{Roster, StaffMember};
/// use tripdesk::sequencer::StaffSequencer;
///
/// let mut roster = Roster::new();
/// roster.add_staff(StaffMember::new("a", "A", 3)).unwrap();
/// roster.add_staff(StaffMember::new("b", "B", 3)).unwrap();
///
/// let mut sequencer = StaffSequencer::new(&mut roster);
/// sequencer.add_to_sequence("b").unwrap();
/// sequencer.add_to_sequence("a").unwrap();
/// sequencer.move_up("a").unwrap();
/// assert_eq!(sequencer.sequence(), vec!["a", "b"]);
/// ```
pub struct StaffSequencer<'a> {
    roster: &'a mut Roster,
}

impl<'a> StaffSequencer<'a> {
    pub fn new(roster: &'a mut Roster) -> Self {
        Self { roster }
    }

    /// Sequenced staff ids, first to last.
    pub fn sequence(&self) -> Vec<String> {
        let mut sequenced: Vec<_> = self
            .roster
            .staff_members()
            .filter(|member| member.sequence_order.is_some())
            .collect();
        sequenced.sort_by(|a, b| sequence_cmp(a, b));
        sequenced.into_iter().map(|member| member.id.clone()).collect()
    }

    /// Append a staff member to the end of the sequence.
    ///
    /// Returns the order assigned (`max + 1`).
    pub fn add_to_sequence(&mut self, staff_id: &str) -> Result<u32, SequenceError> {
        let member = self
            .roster
            .staff(staff_id)
            .ok_or_else(|| SequenceError::StaffNotFound(staff_id.to_string()))?;
        if let Some(order) = member.sequence_order {
            return Err(SequenceError::AlreadySequenced {
                staff_id: staff_id.to_string(),
                order,
            });
        }

        let last = self
            .roster
            .staff_members()
            .filter_map(|member| member.sequence_order)
            .max()
            .unwrap_or(0);
        let next = last
            .checked_add(1)
            .ok_or_else(|| SequenceError::OrdersExhausted {
                staff_id: staff_id.to_string(),
                last,
            })?;
        self.set_order(staff_id, Some(next));
        tracing::info!(staff_id = %staff_id, order = next, "Added to round-robin sequence");
        Ok(next)
    }

    /// Take a staff member out of the sequence and close the gap.
    ///
    /// Returns the order the member held.
    pub fn remove_from_sequence(&mut self, staff_id: &str) -> Result<u32, SequenceError> {
        let order = self.order_of(staff_id)?;
        self.set_order(staff_id, None);
        self.normalize();
        tracing::info!(staff_id = %staff_id, order, "Removed from round-robin sequence");
        Ok(order)
    }

    /// Swap places with the previous member. `Ok(false)` at the top.
    pub fn move_up(&mut self, staff_id: &str) -> Result<bool, SequenceError> {
        self.order_of(staff_id)?;
        let sequence = self.sequence();
        let position = sequence.iter().position(|id| id == staff_id).unwrap_or(0);
        if position == 0 {
            return Ok(false);
        }
        self.swap(&sequence[position - 1], staff_id);
        Ok(true)
    }

    /// Swap places with the next member. `Ok(false)` at the bottom.
    pub fn move_down(&mut self, staff_id: &str) -> Result<bool, SequenceError> {
        self.order_of(staff_id)?;
        let sequence = self.sequence();
        let Some(position) = sequence.iter().position(|id| id == staff_id) else {
            return Ok(false);
        };
        if position + 1 >= sequence.len() {
            return Ok(false);
        }
        self.swap(staff_id, &sequence[position + 1]);
        Ok(true)
    }

    /// Renumber the sequence to 1..=n, keeping its order.
    ///
    /// Returns `true` if any order changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        for (index, staff_id) in self.sequence().iter().enumerate() {
            let order = index as u32 + 1;
            if self.roster.staff(staff_id).and_then(|m| m.sequence_order) != Some(order) {
                self.set_order(staff_id, Some(order));
                changed = true;
            }
        }
        changed
    }

    fn order_of(&self, staff_id: &str) -> Result<u32, SequenceError> {
        self.roster
            .staff(staff_id)
            .ok_or_else(|| SequenceError::StaffNotFound(staff_id.to_string()))?
            .sequence_order
            .ok_or_else(|| SequenceError::NotSequenced(staff_id.to_string()))
    }

    fn swap(&mut self, first: &str, second: &str) {
        let a = self.roster.staff(first).and_then(|m| m.sequence_order);
        let b = self.roster.staff(second).and_then(|m| m.sequence_order);
        self.set_order(first, b);
        self.set_order(second, a);
        tracing::debug!(first = %first, second = %second, "Swapped sequence positions");
    }

    fn set_order(&mut self, staff_id: &str, order: Option<u32>) {
        if let Some(member) = self.roster.staff_mut(staff_id) {
            member.sequence_order = order;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::StaffMember;

    fn roster() -> Roster {
        let mut roster = Roster::new();
        roster.add_staff(StaffMember::new("a", "A", 3).with_sequence_order(1)).unwrap();
        roster.add_staff(StaffMember::new("b", "B", 3).with_sequence_order(2)).unwrap();
        roster.add_staff(StaffMember::new("c", "C", 3).with_sequence_order(3)).unwrap();
        roster.add_staff(StaffMember::new("d", "D", 3)).unwrap();
        roster
    }

    fn orders(roster: &Roster) -> Vec<(String, Option<u32>)> {
        roster
            .staff_members()
            .map(|m| (m.id.clone(), m.sequence_order))
            .collect()
    }

    #[test]
    fn add_appends_after_max() {
        let mut roster = roster();
        let mut sequencer = StaffSequencer::new(&mut roster);
        assert_eq!(sequencer.add_to_sequence("d").unwrap(), 4);
        assert_eq!(sequencer.sequence(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn add_to_empty_sequence_starts_at_one() {
        let mut roster = Roster::new();
        roster.add_staff(StaffMember::new("x", "X", 1)).unwrap();
        let mut sequencer = StaffSequencer::new(&mut roster);
        assert_eq!(sequencer.add_to_sequence("x").unwrap(), 1);
    }

    #[test]
    fn add_rejects_already_sequenced() {
        let mut roster = roster();
        let mut sequencer = StaffSequencer::new(&mut roster);
        assert_eq!(
            sequencer.add_to_sequence("b"),
            Err(SequenceError::AlreadySequenced {
                staff_id: "b".to_string(),
                order: 2
            })
        );
    }

    #[test]
    fn add_after_highest_possible_order_fails_cleanly() {
        let mut roster = Roster::new();
        roster
            .add_staff(StaffMember::new("a", "A", 1).with_sequence_order(u32::MAX))
            .unwrap();
        roster.add_staff(StaffMember::new("b", "B", 1)).unwrap();

        let mut sequencer = StaffSequencer::new(&mut roster);
        assert_eq!(
            sequencer.add_to_sequence("b"),
            Err(SequenceError::OrdersExhausted {
                staff_id: "b".to_string(),
                last: u32::MAX
            })
        );
        assert_eq!(roster.staff("b").unwrap().sequence_order, None);

        let mut sequencer = StaffSequencer::new(&mut roster);
        assert!(sequencer.normalize());
        assert_eq!(sequencer.add_to_sequence("b").unwrap(), 2);
    }

    #[test]
    fn remove_compacts_orders() {
        let mut roster = roster();
        let mut sequencer = StaffSequencer::new(&mut roster);
        assert_eq!(sequencer.remove_from_sequence("a").unwrap(), 1);
        assert_eq!(sequencer.sequence(), vec!["b", "c"]);
        assert_eq!(
            orders(&roster),
            vec![
                ("a".to_string(), None),
                ("b".to_string(), Some(1)),
                ("c".to_string(), Some(2)),
                ("d".to_string(), None),
            ]
        );
    }

    #[test]
    fn remove_unsequenced_fails() {
        let mut roster = roster();
        let mut sequencer = StaffSequencer::new(&mut roster);
        assert_eq!(
            sequencer.remove_from_sequence("d"),
            Err(SequenceError::NotSequenced("d".to_string()))
        );
        assert_eq!(
            sequencer.remove_from_sequence("zz"),
            Err(SequenceError::StaffNotFound("zz".to_string()))
        );
    }

    #[test]
    fn move_up_and_down_swap_neighbors() {
        let mut roster = roster();
        let mut sequencer = StaffSequencer::new(&mut roster);
        assert!(sequencer.move_up("c").unwrap());
        assert_eq!(sequencer.sequence(), vec!["a", "c", "b"]);
        assert!(sequencer.move_down("a").unwrap());
        assert_eq!(sequencer.sequence(), vec!["c", "a", "b"]);
    }

    #[test]
    fn moves_are_noops_at_boundaries() {
        let mut roster = roster();
        let mut sequencer = StaffSequencer::new(&mut roster);
        assert!(!sequencer.move_up("a").unwrap());
        assert!(!sequencer.move_down("c").unwrap());
        assert_eq!(sequencer.sequence(), vec!["a", "b", "c"]);
    }

    #[test]
    fn normalize_closes_gaps() {
        let mut roster = Roster::new();
        roster.add_staff(StaffMember::new("a", "A", 1).with_sequence_order(4)).unwrap();
        roster.add_staff(StaffMember::new("b", "B", 1).with_sequence_order(9)).unwrap();
        let mut sequencer = StaffSequencer::new(&mut roster);
        assert!(sequencer.normalize());
        assert!(!sequencer.normalize());
        assert_eq!(roster.staff("b").unwrap().sequence_order, Some(2));
    }

    #[test]
    fn editing_sequence_never_assigns() {
        let mut roster = roster();
        let mut sequencer = StaffSequencer::new(&mut roster);
        sequencer.add_to_sequence("d").unwrap();
        sequencer.move_up("d").unwrap();
        sequencer.remove_from_sequence("b").unwrap();
        assert_eq!(roster.total_assigned(), 0);
    }
}
