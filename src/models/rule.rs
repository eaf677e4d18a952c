//! Rule definitions and their typed parameters.
//!
//! Each rule type carries its own parameter struct. Catalog entries arrive
//! with a loosely typed parameter bag; [`RuleParameters::from_value`] turns
//! that bag into the matching variant and validates it, so the evaluator
//! only ever sees well-formed parameters.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Longest reference period a rule may average over.
const MAX_REFERENCE_PERIOD_WEEKS: u32 = 520;

/// Longest rest a rule may require, in hours.
const MAX_REST_HOURS: u32 = 168;

/// Ceiling for hour parameters measured within one shift.
const MAX_SHIFT_HOURS: u32 = 24;

/// Category of constraint a rule expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    /// Maximum working hours per day, week or reference period.
    WorkingTime,
    /// Minimum rest between shifts or per week.
    RestPeriod,
    /// Mandatory breaks within long shifts.
    Break,
    /// Limits on hours worked during the night window.
    NightWork,
    /// Minimum ages and protections for young workers.
    AgeRestriction,
    /// Overtime pay multipliers.
    Overtime,
    /// Other wage premiums computed like overtime.
    Wage,
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RuleType::WorkingTime => "working_time",
            RuleType::RestPeriod => "rest_period",
            RuleType::Break => "break",
            RuleType::NightWork => "night_work",
            RuleType::AgeRestriction => "age_restriction",
            RuleType::Overtime => "overtime",
            RuleType::Wage => "wage",
        };
        write!(f, "{}", name)
    }
}

/// How a failed rule affects scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Enforcement {
    /// Prevent the shift from being confirmed.
    HardBlock,
    /// Allow the shift but flag it.
    SoftWarning,
    /// Allow the shift and record the outcome.
    LogOnly,
}

impl std::fmt::Display for Enforcement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Enforcement::HardBlock => write!(f, "hard_block"),
            Enforcement::SoftWarning => write!(f, "soft_warning"),
            Enforcement::LogOnly => write!(f, "log_only"),
        }
    }
}

/// The window a working-time limit is measured over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkingTimePeriod {
    /// The calendar day containing the shift start.
    Daily,
    /// The calendar week containing the shift start.
    Weekly,
    /// A trailing multi-week window, averaged per week.
    ReferencePeriod,
}

/// Parameters for `working_time` rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkingTimeParams {
    /// Which window the limit applies to.
    pub period: WorkingTimePeriod,
    /// Maximum hours (per week, for reference periods).
    pub max_hours: Decimal,
    /// Length of the reference period in weeks.
    #[serde(default)]
    pub reference_period_weeks: Option<u32>,
}

/// Whether a rest rule applies between shifts or across a week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestScope {
    /// Rest between the previous shift and the candidate.
    #[default]
    Daily,
    /// Longest uninterrupted rest in the trailing seven days.
    Weekly,
}

/// Parameters for `rest_period` rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestPeriodParams {
    /// Minimum rest in hours.
    pub min_hours: Decimal,
    /// Daily or weekly rest.
    #[serde(default)]
    pub scope: RestScope,
    /// Weekly rest must be granted on top of the daily rest.
    #[serde(default)]
    pub additional_to_daily: bool,
    /// Daily rest hours added to the weekly requirement.
    #[serde(default)]
    pub daily_rest_hours: Option<Decimal>,
}

impl RestPeriodParams {
    /// The uninterrupted rest the rule requires, in hours.
    pub fn required_hours(&self) -> Decimal {
        match (self.additional_to_daily, self.daily_rest_hours) {
            (true, Some(daily)) => self.min_hours + daily,
            _ => self.min_hours,
        }
    }
}

/// Parameters for `break` rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BreakParams {
    /// Shifts longer than this many worked hours need a break.
    pub threshold_hours: Decimal,
    /// Minimum length of the required break.
    pub break_minutes: u32,
    /// Longest shift for which a mutual waiver is honoured.
    #[serde(default)]
    pub waiver_max_hours: Option<Decimal>,
    /// The break must start within this many hours of the shift start.
    #[serde(default)]
    pub latest_start_after_hours: Option<Decimal>,
}

/// A daily time-of-day window, `[start_hour, end_hour)`.
///
/// When `end_hour <= start_hour` the window crosses midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightWindow {
    /// Hour of day the window opens (0-23).
    pub start_hour: u32,
    /// Hour of day the window closes (0-23).
    pub end_hour: u32,
}

impl NightWindow {
    /// Returns true if the window spans midnight.
    pub fn crosses_midnight(&self) -> bool {
        self.end_hour <= self.start_hour
    }

    fn validate(&self) -> Result<(), String> {
        if self.start_hour > 23 || self.end_hour > 23 {
            return Err("night window hours must be between 0 and 23".to_string());
        }
        if self.start_hour == self.end_hour {
            return Err("night window start and end must differ".to_string());
        }
        Ok(())
    }
}

/// Parameters for `night_work` rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NightWorkParams {
    /// Hour of day the night window opens.
    pub night_start_hour: u32,
    /// Hour of day the night window closes.
    pub night_end_hour: u32,
    /// Maximum night hours per night worked.
    pub max_hours_per_night: Decimal,
    /// Average over the trailing reference period instead of the single shift.
    #[serde(default)]
    pub reference_period_weeks: Option<u32>,
}

impl NightWorkParams {
    /// The night window this rule measures.
    pub fn night_window(&self) -> NightWindow {
        NightWindow {
            start_hour: self.night_start_hour,
            end_hour: self.night_end_hour,
        }
    }
}

/// Parameters for `age_restriction` rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgeRestrictionParams {
    /// Absolute minimum working age.
    #[serde(default)]
    pub min_working_age: Option<u32>,
    /// Workers younger than this may not work during the night window.
    #[serde(default)]
    pub min_age_for_night_work: Option<u32>,
    /// Hour of day the night window opens.
    #[serde(default)]
    pub night_start_hour: Option<u32>,
    /// Hour of day the night window closes.
    #[serde(default)]
    pub night_end_hour: Option<u32>,
}

impl AgeRestrictionParams {
    /// The night window, when the rule restricts night work.
    pub fn night_window(&self) -> Option<NightWindow> {
        match (self.night_start_hour, self.night_end_hour) {
            (Some(start_hour), Some(end_hour)) => Some(NightWindow {
                start_hour,
                end_hour,
            }),
            _ => None,
        }
    }
}

/// One step of a multiplier table: from `from_hours` onwards, `multiplier` applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OvertimeTier {
    /// Cumulative hours at which this tier starts.
    pub from_hours: Decimal,
    /// Wage multiplier for hours in this tier.
    pub multiplier: Decimal,
}

/// Parameters for `overtime` and `wage` rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OvertimeParams {
    /// Tiers over hours worked in the calendar day.
    #[serde(default)]
    pub daily_tiers: Vec<OvertimeTier>,
    /// Tiers over hours worked in the calendar week.
    #[serde(default)]
    pub weekly_tiers: Vec<OvertimeTier>,
}

/// Typed parameters, one variant per rule type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleParameters {
    /// Working-time limit.
    WorkingTime(WorkingTimeParams),
    /// Minimum rest.
    RestPeriod(RestPeriodParams),
    /// Mandatory break.
    Break(BreakParams),
    /// Night-work limit.
    NightWork(NightWorkParams),
    /// Age restriction.
    AgeRestriction(AgeRestrictionParams),
    /// Overtime multipliers.
    Overtime(OvertimeParams),
    /// Wage premium multipliers.
    Wage(OvertimeParams),
}

impl RuleParameters {
    /// The rule type implied by this variant.
    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleParameters::WorkingTime(_) => RuleType::WorkingTime,
            RuleParameters::RestPeriod(_) => RuleType::RestPeriod,
            RuleParameters::Break(_) => RuleType::Break,
            RuleParameters::NightWork(_) => RuleType::NightWork,
            RuleParameters::AgeRestriction(_) => RuleType::AgeRestriction,
            RuleParameters::Overtime(_) => RuleType::Overtime,
            RuleParameters::Wage(_) => RuleType::Wage,
        }
    }

    /// Builds typed parameters for `rule_type` from an untyped parameter bag.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRuleDefinition`] when the bag is missing
    /// fields, has unknown fields, or holds values outside their valid range.
    ///
    /// # Example
    ///
    /// ```
    /// use compliance_engine::models::{RuleParameters, RuleType};
    ///
    /// let raw = serde_json::json!({ "min_hours": 11 });
    /// let params = RuleParameters::from_value("REST_PERIOD_DAILY", RuleType::RestPeriod, &raw).unwrap();
    /// assert_eq!(params.rule_type(), RuleType::RestPeriod);
    ///
    /// let bad = serde_json::json!({ "min_hours": 0 });
    /// assert!(RuleParameters::from_value("REST_PERIOD_DAILY", RuleType::RestPeriod, &bad).is_err());
    /// ```
    pub fn from_value(
        rule_code: &str,
        rule_type: RuleType,
        raw: &serde_json::Value,
    ) -> EngineResult<Self> {
        let invalid = |message: String| EngineError::InvalidRuleDefinition {
            rule_code: rule_code.to_string(),
            message,
        };

        let params = match rule_type {
            RuleType::WorkingTime => RuleParameters::WorkingTime(parse_bag(raw).map_err(invalid)?),
            RuleType::RestPeriod => RuleParameters::RestPeriod(parse_bag(raw).map_err(invalid)?),
            RuleType::Break => RuleParameters::Break(parse_bag(raw).map_err(invalid)?),
            RuleType::NightWork => RuleParameters::NightWork(parse_bag(raw).map_err(invalid)?),
            RuleType::AgeRestriction => {
                RuleParameters::AgeRestriction(parse_bag(raw).map_err(invalid)?)
            }
            RuleType::Overtime => RuleParameters::Overtime(parse_bag(raw).map_err(invalid)?),
            RuleType::Wage => RuleParameters::Wage(parse_bag(raw).map_err(invalid)?),
        };

        params.validate().map_err(invalid)?;
        Ok(params)
    }

    /// Checks value ranges and cross-field requirements.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            RuleParameters::WorkingTime(p) => {
                require_positive("max_hours", p.max_hours)?;
                match (p.period, p.reference_period_weeks) {
                    (WorkingTimePeriod::ReferencePeriod, None) => {
                        Err("reference_period requires reference_period_weeks".to_string())
                    }
                    (WorkingTimePeriod::ReferencePeriod, Some(weeks)) => {
                        validate_reference_weeks(weeks)
                    }
                    (WorkingTimePeriod::Daily | WorkingTimePeriod::Weekly, Some(_)) => Err(
                        "reference_period_weeks is only valid with period reference_period"
                            .to_string(),
                    ),
                    _ => Ok(()),
                }
            }
            RuleParameters::RestPeriod(p) => {
                require_positive("min_hours", p.min_hours)?;
                require_at_most("min_hours", p.min_hours, MAX_REST_HOURS)?;
                if p.additional_to_daily {
                    if p.scope != RestScope::Weekly {
                        return Err("additional_to_daily requires scope weekly".to_string());
                    }
                    match p.daily_rest_hours {
                        Some(daily) => {
                            require_positive("daily_rest_hours", daily)?;
                            require_at_most("daily_rest_hours", daily, MAX_REST_HOURS)?;
                        }
                        None => {
                            return Err(
                                "additional_to_daily requires daily_rest_hours".to_string()
                            );
                        }
                    }
                }
                Ok(())
            }
            RuleParameters::Break(p) => {
                if p.threshold_hours < Decimal::ZERO {
                    return Err("threshold_hours must not be negative".to_string());
                }
                require_at_most("threshold_hours", p.threshold_hours, MAX_SHIFT_HOURS)?;
                if p.break_minutes == 0 {
                    return Err("break_minutes must be positive".to_string());
                }
                if let Some(waiver) = p.waiver_max_hours {
                    require_positive("waiver_max_hours", waiver)?;
                    require_at_most("waiver_max_hours", waiver, MAX_SHIFT_HOURS)?;
                }
                if let Some(latest) = p.latest_start_after_hours {
                    require_positive("latest_start_after_hours", latest)?;
                    require_at_most("latest_start_after_hours", latest, MAX_SHIFT_HOURS)?;
                }
                Ok(())
            }
            RuleParameters::NightWork(p) => {
                p.night_window().validate()?;
                require_positive("max_hours_per_night", p.max_hours_per_night)?;
                match p.reference_period_weeks {
                    Some(weeks) => validate_reference_weeks(weeks),
                    None => Ok(()),
                }
            }
            RuleParameters::AgeRestriction(p) => {
                if p.min_working_age.is_none() && p.min_age_for_night_work.is_none() {
                    return Err(
                        "one of min_working_age or min_age_for_night_work is required".to_string(),
                    );
                }
                match (p.min_age_for_night_work, p.night_window()) {
                    (Some(_), Some(window)) => window.validate(),
                    (Some(_), None) => Err(
                        "min_age_for_night_work requires night_start_hour and night_end_hour"
                            .to_string(),
                    ),
                    (None, _) => Ok(()),
                }
            }
            RuleParameters::Overtime(p) | RuleParameters::Wage(p) => {
                if p.daily_tiers.is_empty() && p.weekly_tiers.is_empty() {
                    return Err("at least one of daily_tiers or weekly_tiers is required".to_string());
                }
                validate_tiers("daily_tiers", &p.daily_tiers)?;
                validate_tiers("weekly_tiers", &p.weekly_tiers)
            }
        }
    }
}

fn parse_bag<T: DeserializeOwned>(raw: &serde_json::Value) -> Result<T, String> {
    serde_json::from_value(raw.clone()).map_err(|e| e.to_string())
}

fn require_positive(field: &str, value: Decimal) -> Result<(), String> {
    if value > Decimal::ZERO {
        Ok(())
    } else {
        Err(format!("{} must be positive, got {}", field, value))
    }
}

fn require_at_most(field: &str, value: Decimal, max: u32) -> Result<(), String> {
    if value <= Decimal::from(max) {
        Ok(())
    } else {
        Err(format!("{} must be at most {}, got {}", field, max, value))
    }
}

fn validate_reference_weeks(weeks: u32) -> Result<(), String> {
    if weeks == 0 {
        Err("reference_period_weeks must be at least 1".to_string())
    } else if weeks > MAX_REFERENCE_PERIOD_WEEKS {
        Err(format!(
            "reference_period_weeks must be at most {}, got {}",
            MAX_REFERENCE_PERIOD_WEEKS, weeks
        ))
    } else {
        Ok(())
    }
}

fn validate_tiers(field: &str, tiers: &[OvertimeTier]) -> Result<(), String> {
    let Some(first) = tiers.first() else {
        return Ok(());
    };
    if first.from_hours != Decimal::ZERO {
        return Err(format!("{} must start at from_hours 0", field));
    }
    for pair in tiers.windows(2) {
        if pair[1].from_hours <= pair[0].from_hours {
            return Err(format!("{} must have strictly increasing from_hours", field));
        }
    }
    if tiers.iter().any(|t| t.multiplier <= Decimal::ZERO) {
        return Err(format!("{} multipliers must be positive", field));
    }
    Ok(())
}

/// A jurisdiction-specific labor rule.
///
/// Definitions are immutable once loaded; the engine never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Code of the jurisdiction that imposes the rule.
    pub jurisdiction: String,
    /// Unique rule code (e.g. "WTD_WEEKLY_MAX").
    pub rule_code: String,
    /// Human-readable name.
    pub name: String,
    /// Typed parameters; the variant determines the rule type.
    pub parameters: RuleParameters,
    /// How a failure affects scheduling.
    pub enforcement: Enforcement,
    /// Whether a worker may consent to exceed the limit.
    pub allows_opt_out: bool,
    /// Notice period, in days, before an opt-out withdrawal takes effect.
    pub opt_out_notice_days: u32,
    /// Inactive rules are never applied.
    pub is_active: bool,
    /// First date on which the rule applies.
    pub effective_from: NaiveDate,
    /// Citation of the legal source.
    #[serde(default)]
    pub legal_reference: Option<String>,
}

impl RuleDefinition {
    /// The rule's category.
    pub fn rule_type(&self) -> RuleType {
        self.parameters.rule_type()
    }

    /// Returns true if the rule is active and in force at `as_of`.
    pub fn is_in_force(&self, as_of: NaiveDateTime) -> bool {
        self.is_active && self.effective_from <= as_of.date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn parse(rule_type: RuleType, raw: serde_json::Value) -> EngineResult<RuleParameters> {
        RuleParameters::from_value("TEST_RULE", rule_type, &raw)
    }

    #[test]
    fn test_reference_period_working_time_parses() {
        let params = parse(
            RuleType::WorkingTime,
            json!({"period": "reference_period", "max_hours": 48, "reference_period_weeks": 17}),
        )
        .unwrap();

        match params {
            RuleParameters::WorkingTime(p) => {
                assert_eq!(p.period, WorkingTimePeriod::ReferencePeriod);
                assert_eq!(p.max_hours, dec("48"));
                assert_eq!(p.reference_period_weeks, Some(17));
            }
            other => panic!("Expected WorkingTime, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_period_without_weeks_is_rejected() {
        let result = parse(
            RuleType::WorkingTime,
            json!({"period": "reference_period", "max_hours": 48}),
        );
        match result {
            Err(EngineError::InvalidRuleDefinition { rule_code, message }) => {
                assert_eq!(rule_code, "TEST_RULE");
                assert!(message.contains("reference_period_weeks"));
            }
            other => panic!("Expected InvalidRuleDefinition, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_period_beyond_ten_years_is_rejected() {
        let result = parse(
            RuleType::WorkingTime,
            json!({"period": "reference_period", "max_hours": 48, "reference_period_weeks": 20000000}),
        );
        match result {
            Err(EngineError::InvalidRuleDefinition { message, .. }) => {
                assert!(message.contains("at most 520"));
            }
            other => panic!("Expected InvalidRuleDefinition, got {:?}", other),
        }

        assert!(parse(
            RuleType::NightWork,
            json!({"night_start_hour": 22, "night_end_hour": 6, "max_hours_per_night": 8, "reference_period_weeks": 521}),
        )
        .is_err());
        assert!(parse(
            RuleType::WorkingTime,
            json!({"period": "reference_period", "max_hours": 48, "reference_period_weeks": 520}),
        )
        .is_ok());
    }

    #[test]
    fn test_oversized_hour_parameters_are_rejected() {
        assert!(parse(RuleType::RestPeriod, json!({"min_hours": 1000000000})).is_err());
        assert!(parse(
            RuleType::RestPeriod,
            json!({"min_hours": 24, "scope": "weekly", "additional_to_daily": true, "daily_rest_hours": 169}),
        )
        .is_err());
        assert!(parse(
            RuleType::Break,
            json!({"threshold_hours": 5, "break_minutes": 30, "latest_start_after_hours": 100000000000i64}),
        )
        .is_err());
        assert!(parse(
            RuleType::Break,
            json!({"threshold_hours": 5, "break_minutes": 30, "waiver_max_hours": 25}),
        )
        .is_err());
        assert!(parse(
            RuleType::Break,
            json!({"threshold_hours": 25, "break_minutes": 30}),
        )
        .is_err());
        assert!(parse(RuleType::RestPeriod, json!({"min_hours": 168})).is_ok());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let result = parse(RuleType::Break, json!({"threshold_hours": 5}));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = parse(RuleType::RestPeriod, json!({"min_hours": 11, "min_hourz": 12}));
        assert!(result.is_err());
    }

    #[test]
    fn test_weekly_rest_additional_to_daily_adds_daily_hours() {
        let params = parse(
            RuleType::RestPeriod,
            json!({"min_hours": 24, "scope": "weekly", "additional_to_daily": true, "daily_rest_hours": 11}),
        )
        .unwrap();

        match params {
            RuleParameters::RestPeriod(p) => assert_eq!(p.required_hours(), dec("35")),
            other => panic!("Expected RestPeriod, got {:?}", other),
        }
    }

    #[test]
    fn test_additional_to_daily_on_daily_scope_is_rejected() {
        let result = parse(
            RuleType::RestPeriod,
            json!({"min_hours": 11, "additional_to_daily": true, "daily_rest_hours": 11}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_night_window_with_equal_hours_is_rejected() {
        let result = parse(
            RuleType::NightWork,
            json!({"night_start_hour": 22, "night_end_hour": 22, "max_hours_per_night": 8}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_age_rule_night_limit_requires_window() {
        let result = parse(RuleType::AgeRestriction, json!({"min_age_for_night_work": 18}));
        assert!(result.is_err());

        let ok = parse(
            RuleType::AgeRestriction,
            json!({"min_age_for_night_work": 18, "night_start_hour": 22, "night_end_hour": 6}),
        )
        .unwrap();
        match ok {
            RuleParameters::AgeRestriction(p) => {
                assert!(p.night_window().unwrap().crosses_midnight());
            }
            other => panic!("Expected AgeRestriction, got {:?}", other),
        }
    }

    #[test]
    fn test_overtime_tiers_must_start_at_zero_and_increase() {
        assert!(parse(
            RuleType::Overtime,
            json!({"daily_tiers": [{"from_hours": 8, "multiplier": 1.5}]}),
        )
        .is_err());

        assert!(parse(
            RuleType::Overtime,
            json!({"daily_tiers": [
                {"from_hours": 0, "multiplier": 1.0},
                {"from_hours": 12, "multiplier": 2.0},
                {"from_hours": 8, "multiplier": 1.5}
            ]}),
        )
        .is_err());

        let ok = parse(
            RuleType::Wage,
            json!({"weekly_tiers": [
                {"from_hours": 0, "multiplier": 1.0},
                {"from_hours": 40, "multiplier": 1.5}
            ]}),
        )
        .unwrap();
        assert_eq!(ok.rule_type(), RuleType::Wage);
    }

    #[test]
    fn test_overtime_without_tiers_is_rejected() {
        assert!(parse(RuleType::Overtime, json!({})).is_err());
    }

    #[test]
    fn test_rule_type_display_matches_serde() {
        for rule_type in [
            RuleType::WorkingTime,
            RuleType::RestPeriod,
            RuleType::Break,
            RuleType::NightWork,
            RuleType::AgeRestriction,
            RuleType::Overtime,
            RuleType::Wage,
        ] {
            let json = serde_json::to_string(&rule_type).unwrap();
            assert_eq!(json, format!("\"{}\"", rule_type));
        }
    }

    #[test]
    fn test_is_in_force() {
        let rule = RuleDefinition {
            jurisdiction: "EU".to_string(),
            rule_code: "REST_PERIOD_DAILY".to_string(),
            name: "Daily rest".to_string(),
            parameters: parse(RuleType::RestPeriod, json!({"min_hours": 11})).unwrap(),
            enforcement: Enforcement::HardBlock,
            allows_opt_out: false,
            opt_out_notice_days: 0,
            is_active: true,
            effective_from: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            legal_reference: None,
        };

        let before = NaiveDate::from_ymd_opt(2026, 2, 28)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let on = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(!rule.is_in_force(before));
        assert!(rule.is_in_force(on));

        let inactive = RuleDefinition {
            is_active: false,
            ..rule
        };
        assert!(!inactive.is_in_force(on));
    }
}
