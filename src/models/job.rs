use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle stage of a job.
///
/// Stages are not ordered by the server: a job may be moved back to an
/// earlier stage without complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStage {
    Planning,
    MaterialsOrdered,
    InProgress,
    Finishing,
    Complete,
}

impl JobStage {
    /// All stages in display order (used by the portal timeline)
    pub const ALL: [JobStage; 5] = [
        JobStage::Planning,
        JobStage::MaterialsOrdered,
        JobStage::InProgress,
        JobStage::Finishing,
        JobStage::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStage::Planning => "planning",
            JobStage::MaterialsOrdered => "materials_ordered",
            JobStage::InProgress => "in_progress",
            JobStage::Finishing => "finishing",
            JobStage::Complete => "complete",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobStage::Planning => "Planning",
            JobStage::MaterialsOrdered => "Materials Ordered",
            JobStage::InProgress => "In Progress",
            JobStage::Finishing => "Finishing",
            JobStage::Complete => "Complete",
        }
    }

    /// Fixed progress-bar percentage for the stage
    pub fn progress(&self) -> u8 {
        match self {
            JobStage::Planning => 10,
            JobStage::MaterialsOrdered => 30,
            JobStage::InProgress => 50,
            JobStage::Finishing => 80,
            JobStage::Complete => 100,
        }
    }

    pub fn position(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job stage '{0}'")]
pub struct UnknownStage(pub String);

impl FromStr for JobStage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}

/// Progress percentage for a raw stage string; unrecognized stages are 0.
pub fn stage_progress(stage: &str) -> u8 {
    stage.parse::<JobStage>().map(|s| s.progress()).unwrap_or(0)
}

/// Display label for a raw stage string.
///
/// Unrecognized values are title-cased word by word so that a stage added on
/// the server still renders as something readable.
pub fn stage_label(stage: &str) -> String {
    match stage.parse::<JobStage>() {
        Ok(s) => s.label().to_string(),
        Err(_) => stage
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub address: Option<String>,
    pub stage: JobStage,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn progress(&self) -> u8 {
        self.stage.progress()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_stage_maps_to_its_fixed_percentage() {
        let expected = [
            ("planning", 10),
            ("materials_ordered", 30),
            ("in_progress", 50),
            ("finishing", 80),
            ("complete", 100),
        ];
        for (stage, pct) in expected {
            assert_eq!(stage_progress(stage), pct, "stage {}", stage);
        }
    }

    #[test]
    fn unrecognized_stage_is_zero() {
        assert_eq!(stage_progress(""), 0);
        assert_eq!(stage_progress("demolition"), 0);
        assert_eq!(stage_progress("Planning"), 0);
    }

    #[test]
    fn materials_ordered_label_and_progress() {
        assert_eq!(stage_label("materials_ordered"), "Materials Ordered");
        assert_eq!(stage_progress("materials_ordered"), 30);
    }

    #[test]
    fn finishing_label_and_progress() {
        assert_eq!(stage_label("finishing"), "Finishing");
        assert_eq!(stage_progress("finishing"), 80);
    }

    #[test]
    fn unknown_stage_label_is_title_cased() {
        assert_eq!(stage_label("final_walk_through"), "Final Walk Through");
    }

    #[test]
    fn stage_serializes_snake_case() {
        let json = serde_json::to_string(&JobStage::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let back: JobStage = serde_json::from_str("\"materials_ordered\"").unwrap();
        assert_eq!(back, JobStage::MaterialsOrdered);
    }
}
