use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use utoipa::ToSchema;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}
id_newtype!(EmployeeId);
id_newtype!(ShiftTypeId);

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub max_weekly_hours: f64,
    pub min_rest_hours: f64,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub preferences: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShiftType {
    pub id: ShiftTypeId,
    pub name: String,
    /// Wall-clock start, `HH:MM` or `HH:MM:SS`.
    pub start_time: String,
    pub end_time: String,
    pub duration_hours: f64,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedShift {
    pub employee_id: EmployeeId,
    pub shift_type_id: ShiftTypeId,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    /// Rank score the employee had when the slot was filled.
    #[serde(default)]
    pub score: f64,
}

pub type Solution = Vec<GeneratedShift>;

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictKind {
    DoubleBooking,
    ConflictsWithTimeOff,
    InsufficientRest,
    ExcessiveHours,
}

/// Points a conflict back at the shift that triggered it.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRef {
    pub index: usize,
    pub employee_id: EmployeeId,
    pub shift_type_id: ShiftTypeId,
    pub date: NaiveDate,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct Conflict {
    pub r#type: ConflictKind,
    pub severity: Severity,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<ShiftRef>,
}

fn default_min_staff() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationConfig {
    pub employees: Vec<Employee>,
    pub shift_types: Vec<ShiftType>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub time_off_dates: HashMap<EmployeeId, Vec<NaiveDate>>,
    #[serde(default)]
    pub existing_shifts: Vec<GeneratedShift>,
    #[serde(default = "default_min_staff")]
    pub min_staff_per_shift: u32,
    /// Accepted for forward compatibility, not consulted by the optimizer.
    #[serde(default)]
    pub max_staff_per_shift: Option<u32>,
}

impl OptimizationConfig {
    /// Staff needed per slot; zero falls back to one.
    pub fn required_staff(&self) -> u32 {
        self.min_staff_per_shift.max(1)
    }

    pub fn employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| &e.id == id)
    }

    pub fn shift_type(&self, id: &ShiftTypeId) -> Option<&ShiftType> {
        self.shift_types.iter().find(|t| &t.id == id)
    }

    pub fn is_on_time_off(&self, id: &EmployeeId, date: NaiveDate) -> bool {
        self.time_off_dates
            .get(id)
            .map_or(false, |days| days.contains(&date))
    }
}

fn default_max_iterations() -> u32 {
    1000
}
fn default_initial_temperature() -> f64 {
    100.0
}
fn default_cooling_rate() -> f64 {
    0.95
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnnealingParams {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "default_initial_temperature")]
    pub initial_temperature: f64,
    #[serde(default = "default_cooling_rate")]
    pub cooling_rate: f64,
}

impl Default for AnnealingParams {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            initial_temperature: default_initial_temperature(),
            cooling_rate: default_cooling_rate(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeParams {
    /// Fixed seed for reproducible runs; OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub annealing: AnnealingParams,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct OptimizeEnvelope {
    pub config: OptimizationConfig,
    #[serde(default)]
    pub params: OptimizeParams,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_shifts: usize,
    pub employee_utilization: f64,
    pub fairness_score: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct OptimizationResult {
    pub success: bool,
    pub score: f64,
    pub shifts: Vec<GeneratedShift>,
    pub conflicts: Vec<Conflict>,
    pub statistics: Statistics,
}
