//! Jurisdiction and work location models.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Where a shift is physically worked.
///
/// Codes follow ISO 3166: `country` is the alpha-2 country code and
/// `subdivision` the subdivision suffix (e.g. `"CA"` for California).
///
/// # Example
///
/// ```
/// use compliance_engine::models::WorkLocation;
///
/// let location = WorkLocation::subdivision("US", "CA");
/// assert_eq!(location.to_string(), "US-CA");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkLocation {
    /// The country code (e.g. "US", "FR").
    pub country: String,
    /// Optional subdivision code within the country (e.g. "CA").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdivision: Option<String>,
}

impl WorkLocation {
    /// A country-level location.
    pub fn country(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            subdivision: None,
        }
    }

    /// A location within a country subdivision.
    pub fn subdivision(country: impl Into<String>, subdivision: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            subdivision: Some(subdivision.into()),
        }
    }

    /// Returns true if both locations are in the same country.
    pub fn same_country(&self, other: &WorkLocation) -> bool {
        self.country.eq_ignore_ascii_case(&other.country)
    }
}

impl std::fmt::Display for WorkLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.subdivision {
            Some(subdivision) => write!(f, "{}-{}", self.country, subdivision),
            None => write!(f, "{}", self.country),
        }
    }
}

fn default_week_start() -> Weekday {
    Weekday::Mon
}

/// A legal region whose labor rules may apply to a shift.
///
/// Jurisdictions form a tree through `parent`: a subdivision points at its
/// national jurisdiction, a member state at a supranational one. A
/// jurisdiction with neither `country` nor `subdivision` (such as `EU`) is
/// only reachable as a parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jurisdiction {
    /// Unique jurisdiction code (e.g. "US-CA", "US-FEDERAL", "EU").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Country this jurisdiction matches directly, if any.
    #[serde(default)]
    pub country: Option<String>,
    /// Subdivision this jurisdiction matches directly, if any.
    #[serde(default)]
    pub subdivision: Option<String>,
    /// The next less specific jurisdiction.
    #[serde(default)]
    pub parent: Option<String>,
    /// First day of the calendar week for weekly hour limits.
    #[serde(default = "default_week_start")]
    pub week_start: Weekday,
}

impl Jurisdiction {
    /// Returns true if this jurisdiction matches the location exactly,
    /// including the subdivision (or lack of one).
    pub fn matches_exactly(&self, location: &WorkLocation) -> bool {
        let country_matches = self
            .country
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(&location.country));
        let subdivision_matches = match (&self.subdivision, &location.subdivision) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (None, None) => true,
            _ => false,
        };
        country_matches && subdivision_matches
    }

    /// Returns true if this is the country-level jurisdiction for the location.
    pub fn matches_country(&self, location: &WorkLocation) -> bool {
        self.subdivision.is_none()
            && self
                .country
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(&location.country))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn california() -> Jurisdiction {
        Jurisdiction {
            code: "US-CA".to_string(),
            name: "California".to_string(),
            country: Some("US".to_string()),
            subdivision: Some("CA".to_string()),
            parent: Some("US-FEDERAL".to_string()),
            week_start: Weekday::Sun,
        }
    }

    #[test]
    fn test_location_display() {
        assert_eq!(WorkLocation::country("FR").to_string(), "FR");
        assert_eq!(WorkLocation::subdivision("US", "CA").to_string(), "US-CA");
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let location = WorkLocation::subdivision("us", "ca");
        assert!(california().matches_exactly(&location));
    }

    #[test]
    fn test_subdivision_does_not_match_country_only_location() {
        assert!(!california().matches_exactly(&WorkLocation::country("US")));
        assert!(!california().matches_country(&WorkLocation::country("US")));
    }

    #[test]
    fn test_same_country() {
        let a = WorkLocation::subdivision("US", "CA");
        let b = WorkLocation::subdivision("US", "NV");
        assert!(a.same_country(&b));
        assert!(!a.same_country(&WorkLocation::country("FR")));
    }

    #[test]
    fn test_deserialize_defaults_week_start_to_monday() {
        let yaml = r#"
code: FR
name: France
country: FR
parent: EU
"#;
        let jurisdiction: Jurisdiction = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(jurisdiction.week_start, Weekday::Mon);
        assert_eq!(jurisdiction.parent.as_deref(), Some("EU"));
        assert!(jurisdiction.subdivision.is_none());
    }

    #[test]
    fn test_deserialize_week_start() {
        let yaml = r#"
code: US-FEDERAL
name: United States (federal)
country: US
week_start: Sun
"#;
        let jurisdiction: Jurisdiction = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(jurisdiction.week_start, Weekday::Sun);
    }
}
