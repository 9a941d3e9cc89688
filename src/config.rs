//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::schedule::day_profile::DayProfile;
use crate::schedule::synth::SynthesisOptions;
use crate::schedule::types::{DAYS_PER_YEAR, PeopleLoad, ScheduleRef, Space, ThresholdPolicy};
use crate::store::{MemoryStore, RulesetSchedule, ScheduleRule};

/// Top-level scenario configuration parsed from TOML.
///
/// Describes the schedules, spaces, and synthesis parameters for one run of
/// the demo binary. Load from TOML with [`ScenarioConfig::from_toml_file`]
/// or use a named preset via [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Synthesis parameters.
    #[serde(default)]
    pub synthesis: SynthesisSection,
    /// Named rule-based schedules available to spaces.
    #[serde(default)]
    pub schedules: Vec<ScheduleSection>,
    /// Spaces contributing people loads.
    #[serde(default)]
    pub spaces: Vec<SpaceSection>,
}

/// Synthesis parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthesisSection {
    /// Reference calendar year.
    pub year: i32,
    /// Threshold policy: `"none"`, `"value"`, `"normalized_daily_range"`,
    /// or `"normalized_annual_range"`.
    pub threshold: String,
    /// Threshold fraction in `[0.0, 1.0]`, ignored when policy is `"none"`.
    pub tau: f64,
}

impl Default for SynthesisSection {
    fn default() -> Self {
        Self {
            year: 2009,
            threshold: "none".to_string(),
            tau: 0.5,
        }
    }
}

/// One named rule-based schedule.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleSection {
    /// Schedule name referenced by spaces.
    pub name: String,
    /// Default day profile as `(until_hour, value)` pairs.
    pub default: Vec<[f64; 2]>,
    /// Explicit rules in definition order; later rules take priority.
    #[serde(default)]
    pub rules: Vec<RuleSection>,
}

/// One explicit rule of a schedule.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSection {
    /// Day names (`"monday"`..`"sunday"`) or the shortcuts `"weekdays"` /
    /// `"weekend"`.
    pub days: Vec<String>,
    /// Day profile as `(until_hour, value)` pairs.
    pub profile: Vec<[f64; 2]>,
    /// First day of year the rule applies to (1-based, inclusive).
    #[serde(default = "default_start_day")]
    pub start_day: u16,
    /// Last day of year the rule applies to (1-based, inclusive).
    #[serde(default = "default_end_day")]
    pub end_day: u16,
}

fn default_start_day() -> u16 {
    1
}

fn default_end_day() -> u16 {
    DAYS_PER_YEAR
}

/// One space and its people loads.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpaceSection {
    /// Space name, used in diagnostics.
    pub name: String,
    /// Name of the space's hours-of-operation schedule, if any.
    #[serde(default)]
    pub hours_of_operation: Option<String>,
    /// People loads assigned to the space.
    #[serde(default)]
    pub people: Vec<PeopleSection>,
}

/// One people load: exactly one of `schedule` or `constant` must be set.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeopleSection {
    /// Name of a schedule from `[[schedules]]`.
    #[serde(default)]
    pub schedule: Option<String>,
    /// Constant occupancy fraction instead of a named schedule.
    #[serde(default)]
    pub constant: Option<f64>,
    /// Design occupant count used as the aggregation weight.
    pub occupants: f64,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field} — {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"synthesis.tau"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Domain objects built from a validated [`ScenarioConfig`].
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Store holding every configured schedule.
    pub store: MemoryStore,
    /// Spaces with resolved schedule references.
    pub spaces: Vec<Space>,
    /// Synthesis options.
    pub options: SynthesisOptions,
}

/// Recognized threshold policy names.
pub const THRESHOLDS: &[&str] = &[
    "none",
    "value",
    "normalized_daily_range",
    "normalized_annual_range",
];

fn day_flags(names: &[String]) -> Result<[bool; 7], String> {
    const DAY_NAMES: [&str; 7] = [
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
    ];
    let mut flags = [false; 7];
    for name in names {
        match name.as_str() {
            "weekdays" => flags[..5].fill(true),
            "weekend" => flags[5..].fill(true),
            day => match DAY_NAMES.iter().position(|&d| d == day) {
                Some(index) => flags[index] = true,
                None => return Err(format!("unknown day name \"{day}\"")),
            },
        }
    }
    Ok(flags)
}

fn check_profile(field: &str, pairs: &[[f64; 2]], errors: &mut Vec<ConfigError>) {
    let mut prev = 0.0;
    for &[until, value] in pairs {
        if until <= prev || until > 24.0 {
            errors.push(ConfigError::new(
                field,
                "breakpoint hours must be strictly increasing within (0, 24]",
            ));
            return;
        }
        if !value.is_finite() || value < 0.0 {
            errors.push(ConfigError::new(field, "values must be finite and >= 0"));
            return;
        }
        prev = until;
    }
    if prev != 24.0 {
        errors.push(ConfigError::new(field, "final breakpoint must be hour 24"));
    }
}

fn profile_from(field: &str, pairs: &[[f64; 2]]) -> Result<DayProfile, ConfigError> {
    DayProfile::new(pairs.iter().map(|&[until, value]| (until, value)).collect())
        .map_err(|e| ConfigError::new(field, e.to_string()))
}

impl ScenarioConfig {
    /// Returns the office preset: three office spaces sharing one occupancy
    /// schedule, fractional output.
    pub fn office() -> Self {
        let office_occupancy = ScheduleSection {
            name: "office_occupancy".to_string(),
            default: vec![
                [6.0, 0.0],
                [7.0, 0.1],
                [12.0, 0.9],
                [13.0, 0.5],
                [18.0, 0.9],
                [22.0, 0.1],
                [24.0, 0.0],
            ],
            rules: vec![
                RuleSection {
                    days: vec!["saturday".to_string()],
                    profile: vec![[8.0, 0.0], [14.0, 0.3], [24.0, 0.0]],
                    start_day: 1,
                    end_day: DAYS_PER_YEAR,
                },
                RuleSection {
                    days: vec!["sunday".to_string()],
                    profile: vec![[24.0, 0.0]],
                    start_day: 1,
                    end_day: DAYS_PER_YEAR,
                },
            ],
        };
        let office_hours = ScheduleSection {
            name: "office_hours".to_string(),
            default: vec![[8.0, 0.0], [18.0, 1.0], [24.0, 0.0]],
            rules: vec![
                RuleSection {
                    days: vec!["saturday".to_string()],
                    profile: vec![[8.0, 0.0], [12.0, 1.0], [24.0, 0.0]],
                    start_day: 1,
                    end_day: DAYS_PER_YEAR,
                },
                RuleSection {
                    days: vec!["sunday".to_string()],
                    profile: vec![[24.0, 0.0]],
                    start_day: 1,
                    end_day: DAYS_PER_YEAR,
                },
            ],
        };
        Self {
            synthesis: SynthesisSection::default(),
            schedules: vec![office_occupancy, office_hours],
            spaces: vec![
                SpaceSection {
                    name: "open_office".to_string(),
                    hours_of_operation: Some("office_hours".to_string()),
                    people: vec![PeopleSection {
                        schedule: Some("office_occupancy".to_string()),
                        constant: None,
                        occupants: 25.0,
                    }],
                },
                SpaceSection {
                    name: "conference".to_string(),
                    hours_of_operation: Some("office_hours".to_string()),
                    people: vec![PeopleSection {
                        schedule: Some("office_occupancy".to_string()),
                        constant: None,
                        occupants: 10.0,
                    }],
                },
                SpaceSection {
                    name: "lobby".to_string(),
                    hours_of_operation: Some("office_hours".to_string()),
                    people: vec![PeopleSection {
                        schedule: None,
                        constant: Some(0.2),
                        occupants: 4.0,
                    }],
                },
            ],
        }
    }

    /// Returns the office preset discretized with a fixed 5% threshold.
    pub fn office_binary() -> Self {
        let mut cfg = Self::office();
        cfg.synthesis.threshold = "value".to_string();
        cfg.synthesis.tau = 0.05;
        cfg
    }

    /// Returns the mixed-use preset: office plus an evening retail space,
    /// discretized against each day's own occupancy range.
    pub fn mixed_use() -> Self {
        let mut cfg = Self::office();
        cfg.synthesis.threshold = "normalized_daily_range".to_string();
        cfg.synthesis.tau = 0.25;
        cfg.schedules.push(ScheduleSection {
            name: "retail_occupancy".to_string(),
            default: vec![
                [10.0, 0.0],
                [17.0, 0.6],
                [21.0, 0.9],
                [24.0, 0.0],
            ],
            rules: vec![RuleSection {
                days: vec!["sunday".to_string()],
                profile: vec![[11.0, 0.0], [18.0, 0.5], [24.0, 0.0]],
                start_day: 1,
                end_day: DAYS_PER_YEAR,
            }],
        });
        cfg.spaces.push(SpaceSection {
            name: "retail_floor".to_string(),
            hours_of_operation: None,
            people: vec![PeopleSection {
                schedule: Some("retail_occupancy".to_string()),
                constant: None,
                occupants: 18.0,
            }],
        });
        cfg
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["office", "office_binary", "mixed_use"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "office" => Ok(Self::office()),
            "office_binary" => Ok(Self::office_binary()),
            "mixed_use" => Ok(Self::mixed_use()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.synthesis;

        if !(1900..=2100).contains(&s.year) {
            errors.push(ConfigError::new(
                "synthesis.year",
                "must be in [1900, 2100]",
            ));
        }
        if !THRESHOLDS.contains(&s.threshold.as_str()) {
            errors.push(ConfigError::new(
                "synthesis.threshold",
                format!(
                    "must be one of {}, got \"{}\"",
                    THRESHOLDS.join(", "),
                    s.threshold
                ),
            ));
        }
        if !(0.0..=1.0).contains(&s.tau) {
            errors.push(ConfigError::new("synthesis.tau", "must be in [0.0, 1.0]"));
        }

        if self.spaces.is_empty() {
            errors.push(ConfigError::new("spaces", "at least one space is required"));
        }

        for schedule in &self.schedules {
            let field = format!("schedules.{}", schedule.name);
            check_profile(&format!("{field}.default"), &schedule.default, &mut errors);
            for (i, rule) in schedule.rules.iter().enumerate() {
                let rule_field = format!("{field}.rules[{i}]");
                check_profile(&format!("{rule_field}.profile"), &rule.profile, &mut errors);
                if rule.days.is_empty() {
                    errors.push(ConfigError::new(
                        format!("{rule_field}.days"),
                        "at least one day is required",
                    ));
                }
                if let Err(message) = day_flags(&rule.days) {
                    errors.push(ConfigError::new(format!("{rule_field}.days"), message));
                }
                if rule.start_day == 0
                    || rule.end_day > DAYS_PER_YEAR
                    || rule.start_day > rule.end_day
                {
                    errors.push(ConfigError::new(
                        format!("{rule_field}.start_day"),
                        "must satisfy 1 <= start_day <= end_day <= 365",
                    ));
                }
            }
        }

        for space in &self.spaces {
            let field = format!("spaces.{}", space.name);
            if let Some(name) = &space.hours_of_operation
                && !self.schedules.iter().any(|s| &s.name == name)
            {
                errors.push(ConfigError::new(
                    format!("{field}.hours_of_operation"),
                    format!("references unknown schedule \"{name}\""),
                ));
            }
            for (i, person) in space.people.iter().enumerate() {
                let person_field = format!("{field}.people[{i}]");
                match (&person.schedule, person.constant) {
                    (Some(_), Some(_)) | (None, None) => {
                        errors.push(ConfigError::new(
                            &person_field,
                            "exactly one of `schedule` or `constant` must be set",
                        ));
                    }
                    (Some(name), None) => {
                        if !self.schedules.iter().any(|s| &s.name == name) {
                            errors.push(ConfigError::new(
                                format!("{person_field}.schedule"),
                                format!("references unknown schedule \"{name}\""),
                            ));
                        }
                    }
                    (None, Some(constant)) => {
                        if !constant.is_finite() || constant < 0.0 {
                            errors.push(ConfigError::new(
                                format!("{person_field}.constant"),
                                "must be finite and >= 0",
                            ));
                        }
                    }
                }
                if !person.occupants.is_finite() || person.occupants < 0.0 {
                    errors.push(ConfigError::new(
                        format!("{person_field}.occupants"),
                        "must be finite and >= 0",
                    ));
                }
            }
        }

        errors
    }

    /// Builds the domain objects for a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` encountered; call [`Self::validate`]
    /// beforehand for the full list.
    pub fn build(&self) -> Result<Scenario, ConfigError> {
        let mut store = MemoryStore::new();
        for schedule in &self.schedules {
            let field = format!("schedules.{}", schedule.name);
            let mut ruleset =
                RulesetSchedule::new(profile_from(&format!("{field}.default"), &schedule.default)?);
            for (i, rule) in schedule.rules.iter().enumerate() {
                let rule_field = format!("{field}.rules[{i}]");
                let profile = profile_from(&format!("{rule_field}.profile"), &rule.profile)?;
                let days_of_week = day_flags(&rule.days)
                    .map_err(|message| ConfigError::new(format!("{rule_field}.days"), message))?;
                ruleset.add_rule(ScheduleRule {
                    profile,
                    days_of_week,
                    start_day: rule.start_day,
                    end_day: rule.end_day,
                });
            }
            store.insert(schedule.name.as_str(), ruleset);
        }

        let mut spaces = Vec::with_capacity(self.spaces.len());
        for space in &self.spaces {
            let mut people = Vec::with_capacity(space.people.len());
            for (i, person) in space.people.iter().enumerate() {
                let schedule = match (&person.schedule, person.constant) {
                    (Some(name), None) => ScheduleRef::Ruleset(name.clone()),
                    (None, Some(constant)) => ScheduleRef::Constant(constant),
                    _ => {
                        return Err(ConfigError::new(
                            format!("spaces.{}.people[{i}]", space.name),
                            "exactly one of `schedule` or `constant` must be set",
                        ));
                    }
                };
                people.push(PeopleLoad {
                    schedule,
                    occupants: person.occupants,
                });
            }
            spaces.push(Space {
                name: space.name.clone(),
                hours_of_operation: space
                    .hours_of_operation
                    .as_ref()
                    .map(|name| ScheduleRef::Ruleset(name.clone())),
                people,
            });
        }

        let s = &self.synthesis;
        let policy = match s.threshold.as_str() {
            "none" => ThresholdPolicy::None,
            "value" => ThresholdPolicy::Value(s.tau),
            "normalized_daily_range" => ThresholdPolicy::NormalizedDailyRange(s.tau),
            "normalized_annual_range" => ThresholdPolicy::NormalizedAnnualRange(s.tau),
            other => {
                return Err(ConfigError::new(
                    "synthesis.threshold",
                    format!("unknown threshold policy \"{other}\""),
                ));
            }
        };

        Ok(Scenario {
            store,
            spaces,
            options: SynthesisOptions::new(s.year, policy),
        })
    }
}
