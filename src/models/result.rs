use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Letter grade on the university's eleven-step scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
    #[serde(other)]
    Unknown,
}

/// Lower mark bound of each grade, highest first.
const SCALE: [(f64, Grade); 11] = [
    (85.0, Grade::APlus),
    (80.0, Grade::A),
    (75.0, Grade::AMinus),
    (70.0, Grade::BPlus),
    (65.0, Grade::B),
    (60.0, Grade::BMinus),
    (55.0, Grade::CPlus),
    (50.0, Grade::C),
    (45.0, Grade::CMinus),
    (40.0, Grade::D),
    (0.0, Grade::F),
];

impl Grade {
    pub fn from_marks(marks: f64) -> Grade {
        SCALE
            .iter()
            .find(|(floor, _)| marks >= *floor)
            .map(|(_, grade)| *grade)
            .unwrap_or(Grade::F)
    }

    pub fn points(&self) -> f64 {
        match self {
            Grade::APlus => 4.3,
            Grade::A => 4.0,
            Grade::AMinus => 3.7,
            Grade::BPlus => 3.3,
            Grade::B => 3.0,
            Grade::BMinus => 2.7,
            Grade::CPlus => 2.3,
            Grade::C => 2.0,
            Grade::CMinus => 1.7,
            Grade::D => 1.0,
            Grade::F | Grade::Unknown => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::D => "D",
            Grade::F => "F",
            Grade::Unknown => "?",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Grade::APlus | Grade::A => "Excellent",
            Grade::AMinus | Grade::BPlus => "Very Good",
            Grade::B | Grade::BMinus => "Good",
            Grade::CPlus | Grade::C => "Satisfactory",
            Grade::CMinus => "Pass",
            Grade::D => "Poor",
            Grade::F => "Fail",
            Grade::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credit-weighted grade point average, rounded to two decimals.
/// Zero when there is nothing to average.
pub fn compute_gpa<I>(entries: I) -> f64
where
    I: IntoIterator<Item = (Grade, u32)>,
{
    let (points, credits) = entries
        .into_iter()
        .fold((0.0_f64, 0_u32), |(points, credits), (grade, c)| {
            (points + grade.points() * c as f64, credits + c)
        });

    if credits == 0 {
        return 0.0;
    }
    ((points / credits as f64) * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResult {
    pub id: i64,
    #[serde(default)]
    pub student_number: String,
    pub course_code: String,
    #[serde(default)]
    pub course_title: String,
    #[serde(default)]
    pub credits: u32,
    pub marks: f64,
    pub grade: Grade,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub is_released: bool,
    #[serde(default)]
    pub graded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub released_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledStudent {
    pub student_id: i64,
    #[serde(default)]
    pub student_number: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub existing_result: Option<CourseResult>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSubmission {
    pub student_id: i64,
    pub course_id: i64,
    pub marks: f64,
    pub remarks: String,
}

/// Figures shown above a results table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub gpa: f64,
    pub total_credits: u32,
    pub released: usize,
    pub unreleased: usize,
}

impl ResultSummary {
    pub fn from_results(results: &[CourseResult]) -> Self {
        let released = results.iter().filter(|r| r.is_released).count();
        Self {
            gpa: compute_gpa(results.iter().map(|r| (r.grade, r.credits))),
            total_credits: results.iter().map(|r| r.credits).sum(),
            released,
            unreleased: results.len() - released,
        }
    }
}
