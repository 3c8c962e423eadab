use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::executor::AssignmentDecision;

/// Lifecycle of a customer query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum QueryStatus {
    /// Received, nobody handles it yet
    #[default]
    New,
    /// Handed to a staff member
    Assigned,
    /// Staff member is actively working on it
    InProgress,
    /// Closed; no longer counts towards anyone's load
    Completed,
}

impl QueryStatus {
    /// Whether a query in this state counts towards its staff member's load.
    pub fn is_open_assignment(self) -> bool {
        matches!(self, QueryStatus::Assigned | QueryStatus::InProgress)
    }
}

impl FromStr for QueryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(QueryStatus::New),
            "assigned" => Ok(QueryStatus::Assigned),
            "in-progress" | "in_progress" => Ok(QueryStatus::InProgress),
            "completed" => Ok(QueryStatus::Completed),
            _ => Err(format!(
                "Invalid status: {}. Use: new, assigned, in-progress, completed",
                s
            )),
        }
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryStatus::New => write!(f, "new"),
            QueryStatus::Assigned => write!(f, "assigned"),
            QueryStatus::InProgress => write!(f, "in-progress"),
            QueryStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Where the customer wants to go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub country: String,
    /// Cities in visiting order
    #[serde(default)]
    pub cities: Vec<String>,
}

impl Destination {
    pub fn new<I, S>(country: impl Into<String>, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            country: country.into(),
            cities: cities.into_iter().map(Into::into).collect(),
        }
    }
}

/// Traveller head counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Pax {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl Pax {
    /// Saturates at `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.adults
            .saturating_add(self.children)
            .saturating_add(self.infants)
    }
}

/// Inclusive travel window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelDates {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TravelDates {
    /// Number of calendar days covered, counting both ends.
    pub fn days(&self) -> u32 {
        ((self.end - self.start).num_days() + 1).max(0) as u32
    }
}

/// The agent (B2B partner) who sent the query in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A customer inquiry waiting to be handled.
///
/// Status and assignment are private: only the executor changes them.
///
/// # Examples
///
/// ```
/// use tripdesk::roster::{Destination, Query, QueryStatus};
///
/// let query = Query::new("q-1", Destination::new("France", ["Paris", "Nice"]), "agent-7");
/// assert_eq!(query.status(), QueryStatus::New);
/// assert!(query.assigned_staff().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub id: String,
    #[serde(default)]
    status: QueryStatus,
    /// Trip length in days as quoted by the agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
    pub destination: Destination,
    #[serde(default)]
    pub pax: Pax,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_dates: Option<TravelDates>,
    pub agent: Agent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assignment: Option<AssignmentDecision>,
}

impl Query {
    pub fn new(id: impl Into<String>, destination: Destination, agent_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            destination,
            pax: Pax::default(),
            travel_dates: None,
            duration_days: None,
            agent: Agent {
                id: agent_id.into(),
                name: String::new(),
            },
            status: QueryStatus::New,
            assignment: None,
        }
    }

    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent.name = name.into();
        self
    }

    pub fn with_pax(mut self, adults: u32, children: u32, infants: u32) -> Self {
        self.pax = Pax {
            adults,
            children,
            infants,
        };
        self
    }

    pub fn with_travel_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.travel_dates = Some(TravelDates { start, end });
        self
    }

    pub fn with_duration_days(mut self, days: u32) -> Self {
        self.duration_days = Some(days);
        self
    }

    pub fn status(&self) -> QueryStatus {
        self.status
    }

    /// The decision currently in force, if the query was ever assigned.
    pub fn assignment(&self) -> Option<&AssignmentDecision> {
        self.assignment.as_ref()
    }

    /// Staff member holding this query while it is open.
    pub fn assigned_staff(&self) -> Option<&str> {
        if self.status.is_open_assignment() {
            self.assignment.as_ref().map(|d| d.staff_id.as_str())
        } else {
            None
        }
    }

    /// Trip length: the quoted duration, otherwise derived from the dates.
    pub fn trip_days(&self) -> Option<u32> {
        self.duration_days
            .or_else(|| self.travel_dates.map(|dates| dates.days()))
    }

    /// Country followed by cities, the terms expertise is matched against.
    pub fn destination_terms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.destination.country.as_str())
            .chain(self.destination.cities.iter().map(String::as_str))
    }

    pub(crate) fn set_status(&mut self, status: QueryStatus) {
        self.status = status;
    }

    pub(crate) fn set_assignment(&mut self, decision: AssignmentDecision) {
        self.assignment = Some(decision);
    }
}
