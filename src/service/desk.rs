//! The desk: roster, rule catalog and decision journal in one owned value

use serde::Serialize;

use crate::config::DeskConfig;
use crate::error::DeskError;
use crate::executor::{AssignError, Assignment, AssignmentDecision, BatchReport, Executor};
use crate::matching::{Match, Matcher, Recommendation};
use crate::roster::{Query, Roster, StaffMember};
use crate::rules::{AssignmentRule, RuleCatalog};
use crate::sequencer::StaffSequencer;

/// Everything one assignment desk needs.
///
/// All assignment state changes go through the executor; the desk only
/// wires it to the current rule catalog and keeps an audit journal of
/// every decision it produced.
///
/// The journal is not persisted and grows with every decision until
/// [`Desk::drain_journal`] hands it off. Long-running owners should drain
/// it periodically.
#[derive(Debug, Clone, Default)]
pub struct Desk {
    roster: Roster,
    catalog: RuleCatalog,
    matcher: Matcher,
    /// Decisions not yet drained, oldest first
    journal: Vec<AssignmentDecision>,
}

/// Read-only copy of a desk, published after every change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeskSnapshot {
    /// Incremented on every published change
    pub version: u64,
    pub staff: Vec<StaffMember>,
    /// Arrival order
    pub queries: Vec<Query>,
    pub rules: Vec<AssignmentRule>,
    pub journal_len: usize,
}

impl DeskSnapshot {
    pub fn staff(&self, id: &str) -> Option<&StaffMember> {
        self.staff.iter().find(|member| member.id == id)
    }

    pub fn query(&self, id: &str) -> Option<&Query> {
        self.queries.iter().find(|query| query.id == id)
    }
}

impl Desk {
    pub fn new(roster: Roster, catalog: RuleCatalog, matcher: Matcher) -> Self {
        Self {
            roster,
            catalog,
            matcher,
            journal: Vec::new(),
        }
    }

    /// Build a desk from a validated desk file.
    pub fn from_config(config: &DeskConfig) -> Result<Self, DeskError> {
        config.validate()?;

        let catalog = RuleCatalog::from_rules(config.rules.clone())?;
        let mut roster = Roster::new();
        for member in &config.staff {
            roster.add_staff(member.clone())?;
        }
        for query in &config.queries {
            roster.add_query(query.clone())?;
        }

        tracing::debug!(
            staff = roster.staff_count(),
            queries = roster.query_count(),
            rules = catalog.len(),
            "Desk loaded"
        );
        Ok(Self::new(roster, catalog, config.matching.into()))
    }

    /// Copy of `base` with this desk's rules, staff and queries.
    pub fn to_config(&self, base: &DeskConfig) -> DeskConfig {
        DeskConfig {
            rules: self.catalog.rules().to_vec(),
            staff: self.roster.staff_members().cloned().collect(),
            queries: self.roster.queries().cloned().collect(),
            ..base.clone()
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Roster administration: adding staff and queries, relationships,
    /// activity flags.
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut RuleCatalog {
        &mut self.catalog
    }

    pub fn matcher(&self) -> Matcher {
        self.matcher
    }

    /// Decisions made since the last drain, oldest first.
    pub fn journal(&self) -> &[AssignmentDecision] {
        &self.journal
    }

    /// Take every journaled decision, leaving the journal empty.
    pub fn drain_journal(&mut self) -> Vec<AssignmentDecision> {
        let drained = std::mem::take(&mut self.journal);
        if !drained.is_empty() {
            tracing::debug!(decisions = drained.len(), "Drained decision journal");
        }
        drained
    }

    pub fn sequencer(&mut self) -> StaffSequencer<'_> {
        StaffSequencer::new(&mut self.roster)
    }

    /// Manual assignment.
    pub fn assign(&mut self, query_id: &str, staff_id: &str) -> Result<Assignment, AssignError> {
        let assignment = Executor::new(&mut self.roster, self.matcher).assign(query_id, staff_id)?;
        self.journal.push(assignment.decision.clone());
        Ok(assignment)
    }

    /// Auto-assign the given queries in order with the enabled rules.
    pub fn auto_assign(&mut self, query_ids: &[String]) -> BatchReport {
        let rules = self.catalog.list_enabled_by_priority();
        let report = Executor::new(&mut self.roster, self.matcher).auto_assign_batch(query_ids, &rules);
        self.journal.extend(report.decisions().cloned());
        report
    }

    /// Auto-assign every `new` query in arrival order.
    pub fn auto_assign_pending(&mut self) -> BatchReport {
        let rules = self.catalog.list_enabled_by_priority();
        let report = Executor::new(&mut self.roster, self.matcher).auto_assign_pending(&rules);
        self.journal.extend(report.decisions().cloned());
        report
    }

    /// What auto-assignment would pick for a query right now.
    pub fn find_best_match(&self, query_id: &str) -> Result<Option<Match>, AssignError> {
        let query = self
            .roster
            .query(query_id)
            .ok_or_else(|| AssignError::QueryNotFound(query_id.to_string()))?;
        Ok(self.matcher.find_best_match(
            query,
            &self.roster,
            &self.catalog.list_enabled_by_priority(),
        ))
    }

    /// Ranked staff list for manual assignment of a query.
    pub fn recommend(&self, query_id: &str) -> Result<Vec<Recommendation>, AssignError> {
        let query = self
            .roster
            .query(query_id)
            .ok_or_else(|| AssignError::QueryNotFound(query_id.to_string()))?;
        Ok(self
            .matcher
            .recommend(query, &self.roster, &self.catalog.list_enabled_by_priority()))
    }

    pub fn start(&mut self, query_id: &str) -> Result<(), AssignError> {
        Executor::new(&mut self.roster, self.matcher).start(query_id)
    }

    pub fn complete(&mut self, query_id: &str) -> Result<u32, AssignError> {
        Executor::new(&mut self.roster, self.matcher).complete(query_id)
    }

    pub fn snapshot(&self, version: u64) -> DeskSnapshot {
        DeskSnapshot {
            version,
            staff: self.roster.staff_members().cloned().collect(),
            queries: self.roster.queries().cloned().collect(),
            rules: self.catalog.rules().to_vec(),
            journal_len: self.journal.len(),
        }
    }
}
