//! Score aggregation for the student dashboard.
//!
//! Everything in here is a pure function over borrowed records. Two kinds of
//! aggregate exist and they are deliberately not interchangeable:
//!
//! - **Averages** (`average_of`) take the mean of per-record percentages over
//!   present records only.
//! - **Rollups** (`ScoreTotals`, `subject_rollup`) sum raw scores and max scores
//!   first and divide once. Absent and excused records add nothing to the score
//!   sum but their max score still counts toward the denominator.
//!
//! The two give different numbers as soon as max scores differ between records.

use chrono::NaiveDate;
use shared::{
    AttendanceStatus, Assessment, MonthlyExam, PerformanceBand, ScoreStatus, Student,
    StudentStatistics, Subject, SubjectRollup, TrendPoint,
};

/// Number of weekly assessments shown in the trend chart
pub const TREND_LENGTH: usize = 8;

/// Lower bound (inclusive) of the excellent band
pub const EXCELLENT_BAND_THRESHOLD: f64 = 85.0;

/// Lower bound (inclusive) of the strong band
pub const STRONG_BAND_THRESHOLD: f64 = 70.0;

/// Lower bound (inclusive) of the fair band
pub const FAIR_BAND_THRESHOLD: f64 = 50.0;

/// A per-subject record carrying a score out of a maximum
pub trait ScoredRecord {
    fn subject(&self) -> Subject;
    fn score(&self) -> f64;
    fn max_score(&self) -> f64;
    fn status(&self) -> ScoreStatus;
    fn date(&self) -> Option<NaiveDate>;

    fn is_present(&self) -> bool {
        self.status().is_present()
    }

    /// Percentage of this record, or `None` when the student did not sit it
    fn percentage(&self) -> Option<f64> {
        if self.is_present() {
            Some(percentage_of(self.score(), self.max_score()))
        } else {
            None
        }
    }
}

impl ScoredRecord for Assessment {
    fn subject(&self) -> Subject {
        self.subject
    }
    fn score(&self) -> f64 {
        self.score
    }
    fn max_score(&self) -> f64 {
        self.max_score
    }
    fn status(&self) -> ScoreStatus {
        self.status
    }
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl ScoredRecord for MonthlyExam {
    fn subject(&self) -> Subject {
        self.subject
    }
    fn score(&self) -> f64 {
        self.score
    }
    fn max_score(&self) -> f64 {
        self.max_score
    }
    fn status(&self) -> ScoreStatus {
        self.status
    }
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// `score / max_score * 100`, unclamped. A zero maximum yields 0.
pub fn percentage_of(score: f64, max_score: f64) -> f64 {
    if max_score == 0.0 {
        return 0.0;
    }
    (score / max_score) * 100.0
}

/// Mean percentage over present records. Empty input (or no present record) yields 0.
pub fn average_of<'a, T, I>(records: I) -> f64
where
    T: ScoredRecord + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let (sum, count) = records
        .into_iter()
        .filter_map(|record| record.percentage())
        .fold((0.0, 0usize), |(sum, count), pct| (sum + pct, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Round to the nearest integer with halves going up, as the dashboard displays it
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// `average_of` rounded for display
pub fn display_average<'a, T, I>(records: I) -> i64
where
    T: ScoredRecord + 'a,
    I: IntoIterator<Item = &'a T>,
{
    round_half_up(average_of(records))
}

/// Raw score and max-score sums over a set of records
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreTotals {
    pub count: usize,
    pub score: f64,
    pub max: f64,
}

impl ScoreTotals {
    pub fn of<'a, T, I>(records: I) -> Self
    where
        T: ScoredRecord + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        records.into_iter().fold(Self::default(), |totals, record| {
            let earned = if record.is_present() { record.score() } else { 0.0 };
            ScoreTotals {
                count: totals.count + 1,
                score: totals.score + earned,
                max: totals.max + record.max_score(),
            }
        })
    }

    pub fn combine(self, other: ScoreTotals) -> ScoreTotals {
        ScoreTotals {
            count: self.count + other.count,
            score: self.score + other.score,
            max: self.max + other.max,
        }
    }

    /// Sum-then-divide percentage; 0 when nothing is out of
    pub fn percentage(&self) -> f64 {
        if self.max > 0.0 {
            (self.score / self.max) * 100.0
        } else {
            0.0
        }
    }
}

pub fn performance_band(percentage: f64) -> PerformanceBand {
    if percentage >= EXCELLENT_BAND_THRESHOLD {
        PerformanceBand::Excellent
    } else if percentage >= STRONG_BAND_THRESHOLD {
        PerformanceBand::Strong
    } else if percentage >= FAIR_BAND_THRESHOLD {
        PerformanceBand::Fair
    } else {
        PerformanceBand::Weak
    }
}

/// Combined weekly + monthly rollup for one subject.
///
/// Returns `None` when the student has no record at all in the subject.
pub fn subject_rollup(student: &Student, subject: Subject) -> Option<SubjectRollup> {
    let weekly = ScoreTotals::of(
        student
            .weekly_assessments
            .iter()
            .filter(|a| a.subject == subject),
    );
    let monthly = ScoreTotals::of(student.monthly_exams.iter().filter(|e| e.subject == subject));

    if weekly.count == 0 && monthly.count == 0 {
        return None;
    }

    let total = weekly.combine(monthly);
    let percentage = total.percentage();

    Some(SubjectRollup {
        subject,
        weekly_count: weekly.count,
        monthly_count: monthly.count,
        weekly_score: weekly.score,
        weekly_max: weekly.max,
        monthly_score: monthly.score,
        monthly_max: monthly.max,
        total_score: total.score,
        total_max: total.max,
        percentage,
        band: performance_band(percentage),
    })
}

/// Rollups for every subject in `subjects` that has data, in the given order
pub fn subject_rollups(student: &Student, subjects: &[Subject]) -> Vec<SubjectRollup> {
    subjects
        .iter()
        .filter_map(|subject| subject_rollup(student, *subject))
        .collect()
}

/// The last `TREND_LENGTH` weekly assessments, oldest first
pub fn weekly_trend(assessments: &[Assessment]) -> Vec<TrendPoint> {
    let start = assessments.len().saturating_sub(TREND_LENGTH);
    assessments[start..]
        .iter()
        .map(|assessment| TrendPoint {
            assessment_id: assessment.id.clone(),
            title: assessment.title.clone(),
            subject: assessment.subject,
            percentage: assessment.percentage(),
        })
        .collect()
}

pub fn student_statistics(student: &Student) -> StudentStatistics {
    let weekly_average = display_average(&student.weekly_assessments);
    let monthly_average = display_average(&student.monthly_exams);
    let present_days = student
        .attendance_records
        .iter()
        .filter(|r| r.status == AttendanceStatus::Present)
        .count();

    StudentStatistics {
        weekly_average,
        monthly_average,
        headline_score: weekly_average.max(monthly_average),
        present_days,
        total_assessments: student.weekly_assessments.len() + student.monthly_exams.len(),
        weekly_trend: weekly_trend(&student.weekly_assessments),
    }
}
