//! Scoring helpers for expertise and workload comparison

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::roster::{normalize_term, Query, StaffMember};

/// How a country hit is weighed against city hits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExpertiseWeighting {
    /// Knowing the country outranks any number of city hits
    #[default]
    CountryDominant,
    /// Plain fraction of destination terms matched
    Fractional,
}

impl FromStr for ExpertiseWeighting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "country_dominant" => Ok(ExpertiseWeighting::CountryDominant),
            "fractional" => Ok(ExpertiseWeighting::Fractional),
            _ => Err(format!("Unknown expertise weighting: {}", s)),
        }
    }
}

/// How well a staff member's expertise covers a query's destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpertiseScore {
    /// The destination country itself is in the expertise set
    pub country_match: bool,
    /// Distinct destination terms found in the expertise set
    pub matched: u32,
    /// Distinct destination terms in the query
    pub total: u32,
}

impl ExpertiseScore {
    /// Score a staff member against the query's country and cities.
    ///
    /// Terms are compared trimmed and lowercased; repeated terms count once.
    pub fn compute(query: &Query, staff: &StaffMember) -> Self {
        let country = normalize_term(&query.destination.country);
        let mut terms: Vec<String> = Vec::new();
        for term in query.destination_terms() {
            let term = normalize_term(term);
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }

        let known: Vec<String> = staff.expertise.iter().map(|e| normalize_term(e)).collect();
        let hit = |term: &String| known.iter().any(|k| k == term);

        Self {
            country_match: !country.is_empty() && hit(&country),
            matched: terms.iter().filter(|term| hit(term)).count() as u32,
            total: terms.len() as u32,
        }
    }

    pub fn is_match(&self) -> bool {
        self.matched > 0
    }

    /// Fraction of destination terms matched, in [0, 1].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.matched) / f64::from(self.total)
        }
    }

    /// Score in [0, 1] for display.
    ///
    /// Under `CountryDominant` a country hit lands in (0.5, 1] and a
    /// cities-only hit in (0, 0.5).
    pub fn value(&self, weighting: ExpertiseWeighting) -> f64 {
        match weighting {
            ExpertiseWeighting::Fractional => self.fraction(),
            ExpertiseWeighting::CountryDominant => {
                let base = if self.country_match { 0.5 } else { 0.0 };
                base + 0.5 * self.fraction()
            }
        }
    }

    /// Compare two scores for the same query; `Greater` means stronger.
    ///
    /// Every score for one query shares `total`, so comparing matched
    /// counts is exact.
    pub fn compare(&self, other: &Self, weighting: ExpertiseWeighting) -> Ordering {
        match weighting {
            ExpertiseWeighting::CountryDominant => self
                .country_match
                .cmp(&other.country_match)
                .then(self.matched.cmp(&other.matched)),
            ExpertiseWeighting::Fractional => self.matched.cmp(&other.matched),
        }
    }
}

/// Compare `assigned / capacity` ratios without floating point.
pub fn compare_load(a: &StaffMember, b: &StaffMember) -> Ordering {
    let lhs = u64::from(a.assigned()) * u64::from(b.workload_capacity.max(1));
    let rhs = u64::from(b.assigned()) * u64::from(a.workload_capacity.max(1));
    lhs.cmp(&rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Destination;

    fn query(country: &str, cities: &[&str]) -> Query {
        Query::new("q", Destination::new(country, cities.iter().copied()), "agent")
    }

    fn staff(expertise: &[&str]) -> StaffMember {
        StaffMember::new("s", "S", 5).with_expertise(expertise.iter().copied())
    }

    #[test]
    fn weighting_from_str() {
        assert_eq!(
            "country_dominant".parse::<ExpertiseWeighting>().unwrap(),
            ExpertiseWeighting::CountryDominant
        );
        assert_eq!(
            "Fractional".parse::<ExpertiseWeighting>().unwrap(),
            ExpertiseWeighting::Fractional
        );
        assert!("loose".parse::<ExpertiseWeighting>().is_err());
    }

    #[test]
    fn country_only_match() {
        let score = ExpertiseScore::compute(&query("France", &[]), &staff(&["France"]));
        assert!(score.country_match);
        assert_eq!((score.matched, score.total), (1, 1));
        assert_eq!(score.value(ExpertiseWeighting::CountryDominant), 1.0);
    }

    #[test]
    fn match_is_case_insensitive() {
        let score = ExpertiseScore::compute(&query(" france ", &["PARIS"]), &staff(&["France", "paris"]));
        assert!(score.country_match);
        assert_eq!(score.matched, 2);
    }

    #[test]
    fn repeated_terms_count_once() {
        let score = ExpertiseScore::compute(
            &query("Singapore", &["Singapore", "Sentosa", "sentosa"]),
            &staff(&["Sentosa"]),
        );
        assert_eq!(score.total, 2);
        assert_eq!(score.matched, 1);
        assert!(!score.country_match);
    }

    #[test]
    fn no_overlap_is_not_a_match() {
        let score = ExpertiseScore::compute(&query("Japan", &["Kyoto"]), &staff(&["France"]));
        assert!(!score.is_match());
        assert_eq!(score.value(ExpertiseWeighting::CountryDominant), 0.0);
    }

    #[test]
    fn country_hit_outranks_more_city_hits() {
        let q = query("Italy", &["Rome", "Florence", "Venice"]);
        let country_only = ExpertiseScore::compute(&q, &staff(&["Italy"]));
        let three_cities = ExpertiseScore::compute(&q, &staff(&["Rome", "Florence", "Venice"]));

        assert_eq!(
            country_only.compare(&three_cities, ExpertiseWeighting::CountryDominant),
            Ordering::Greater
        );
        assert!(
            country_only.value(ExpertiseWeighting::CountryDominant)
                > three_cities.value(ExpertiseWeighting::CountryDominant)
        );
        // Plain fractions favour the city expert
        assert_eq!(
            country_only.compare(&three_cities, ExpertiseWeighting::Fractional),
            Ordering::Less
        );
    }

    #[test]
    fn compare_load_uses_ratio() {
        let light = StaffMember::new("a", "A", 10).with_assigned(3);
        let heavy = StaffMember::new("b", "B", 4).with_assigned(2);
        assert_eq!(compare_load(&light, &heavy), Ordering::Less);

        let same = StaffMember::new("c", "C", 8).with_assigned(4);
        assert_eq!(compare_load(&heavy, &same), Ordering::Equal);
    }
}
