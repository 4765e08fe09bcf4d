//! Student grade roster.
//!
//! Students carry a list of scores on a [`GradeScale`]; the roster reports
//! each student's average and whether it clears the scale's pass mark.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::key::normalize;
use crate::types::Validate;

/// Default roster snapshot file name inside the data directory.
pub const ROSTER_FILE: &str = "alumnos.json";

/// Score range and pass mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeScale {
    pub max: f64,
    pub pass_mark: f64,
}

impl GradeScale {
    /// Scores 0–100, passing at 60.
    pub const PERCENT: Self = Self {
        max: 100.0,
        pass_mark: 60.0,
    };

    /// Scores 0–5, passing at 3.0.
    pub const FIVE_POINT: Self = Self {
        max: 5.0,
        pass_mark: 3.0,
    };

    /// Reject scores outside `0..=max`.
    pub fn check(&self, score: f64) -> Result<(), CatalogError> {
        if !score.is_finite() || !(0.0..=self.max).contains(&score) {
            return Err(CatalogError::validation(format!(
                "score {score} is outside 0-{}",
                self.max
            )));
        }
        Ok(())
    }

    pub fn standing(&self, average: f64) -> Standing {
        if average >= self.pass_mark {
            Standing::Passed
        } else {
            Standing::Failed
        }
    }
}

impl FromStr for GradeScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "percent" | "100" => Ok(Self::PERCENT),
            "five-point" | "five_point" | "5" => Ok(Self::FIVE_POINT),
            other => Err(format!("unknown grade scale '{other}' (expected percent or five-point)")),
        }
    }
}

/// Pass/fail outcome for one student.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    Passed,
    Failed,
}

impl Standing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One student and their recorded scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "notas", default)]
    pub scores: Vec<f64>,
}

impl Student {
    pub fn new(name: impl Into<String>, scores: Vec<f64>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            scores,
        }
    }

    pub fn average(&self) -> Option<f64> {
        if self.scores.is_empty() {
            return None;
        }
        Some(self.scores.iter().sum::<f64>() / self.scores.len() as f64)
    }

    /// A student with no scores has not passed.
    pub fn standing(&self, scale: GradeScale) -> Standing {
        self.average()
            .map_or(Standing::Failed, |avg| scale.standing(avg))
    }
}

impl Validate for Student {
    fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::validation("student name must not be empty"));
        }
        if let Some(bad) = self.scores.iter().find(|s| !s.is_finite() || **s < 0.0) {
            return Err(CatalogError::validation(format!(
                "score {bad} of '{}' is not a non-negative number",
                self.name
            )));
        }
        Ok(())
    }
}

/// One line of a roster report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub name: String,
    pub scores: Vec<f64>,
    pub average: Option<f64>,
    pub standing: Standing,
}

/// Ordered collection of students.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_students(students: Vec<Student>) -> Self {
        Self { students }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Append scores to the student with this name, creating them if new.
    ///
    /// Every score is checked against `scale` before anything is stored.
    pub fn record(
        &mut self,
        name: &str,
        scores: &[f64],
        scale: GradeScale,
    ) -> Result<&Student, CatalogError> {
        if name.trim().is_empty() {
            return Err(CatalogError::validation("student name must not be empty"));
        }
        for score in scores {
            scale.check(*score)?;
        }

        let key = normalize(name);
        let index = match self.students.iter().position(|s| normalize(&s.name) == key) {
            Some(i) => {
                self.students[i].scores.extend_from_slice(scores);
                i
            }
            None => {
                self.students.push(Student::new(name, scores.to_vec()));
                self.students.len() - 1
            }
        };
        Ok(&self.students[index])
    }

    pub fn report(&self, scale: GradeScale) -> Vec<ReportRow> {
        self.students
            .iter()
            .map(|s| ReportRow {
                name: s.name.clone(),
                scores: s.scores.clone(),
                average: s.average(),
                standing: s.standing(scale),
            })
            .collect()
    }
}

/// Scores parsed out of untrusted text, and the entries that were not numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedScores {
    pub scores: Vec<i64>,
    pub rejected: Vec<String>,
}

/// Parse a mixed list of textual entries as integer scores.
pub fn clean_scores<S: AsRef<str>>(raw: &[S]) -> CleanedScores {
    let mut cleaned = CleanedScores::default();
    for entry in raw {
        let entry = entry.as_ref().trim();
        match entry.parse::<i64>() {
            Ok(score) => cleaned.scores.push(score),
            Err(_) => {
                log::warn!("Discarding corrupt score entry: {entry}");
                cleaned.rejected.push(entry.to_string());
            }
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_parses_aliases() {
        assert_eq!("percent".parse::<GradeScale>().unwrap(), GradeScale::PERCENT);
        assert_eq!("5".parse::<GradeScale>().unwrap(), GradeScale::FIVE_POINT);
        assert!("letters".parse::<GradeScale>().is_err());
    }

    #[test]
    fn pass_mark_is_inclusive() {
        assert_eq!(GradeScale::PERCENT.standing(60.0), Standing::Passed);
        assert_eq!(GradeScale::PERCENT.standing(59.9), Standing::Failed);
        assert_eq!(GradeScale::FIVE_POINT.standing(3.0), Standing::Passed);
    }
}
