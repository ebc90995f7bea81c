//! Attendance risk and achievement classification.
//!
//! There are two independent notions of "risk" here and they must stay apart:
//!
//! - [`classify_risk`] drives the student detail view. It only looks at how many
//!   absence days remain out of [`MAX_ALLOWED_ABSENCE`].
//! - [`is_roster_at_risk`] flags rows on the teacher roster. It combines weekly
//!   performance with a raw absence count and uses its own thresholds.
//!
//! A student can be `Safe` on one and at risk on the other.

use shared::{
    Achievement, AttendanceRecord, AttendanceStatus, AttendanceSummary, RiskTier, Student,
    StudentStatistics, Subject,
};

use super::statistics::{average_of, ScoredRecord};

/// Absence days allowed per school year
pub const MAX_ALLOWED_ABSENCE: usize = 30;

/// Remaining allowance at or below which the tier becomes a warning
pub const WARNING_REMAINING_THRESHOLD: usize = 7;

/// Roster flag: more absences than this marks a student at risk
pub const ROSTER_ABSENCE_LIMIT: usize = 6;

/// Roster flag: weekly performance ratio below this marks a student at risk
pub const ROSTER_PERFORMANCE_RATIO: f64 = 0.5;

pub const WEEKLY_CHAMPION_AVERAGE: i64 = 90;
pub const MONTHLY_STAR_AVERAGE: i64 = 85;
pub const MATHEMATICS_GENIUS_RATIO: f64 = 0.9;

fn count_status(records: &[AttendanceRecord], status: AttendanceStatus) -> usize {
    records.iter().filter(|r| r.status == status).count()
}

pub fn absent_count(records: &[AttendanceRecord]) -> usize {
    count_status(records, AttendanceStatus::Absent)
}

/// `max(0, MAX_ALLOWED_ABSENCE - absent)`
pub fn remaining_allowance(absent: usize) -> usize {
    MAX_ALLOWED_ABSENCE.saturating_sub(absent)
}

/// Share of the allowance used so far, capped at 100
pub fn absence_percentage(absent: usize) -> f64 {
    (absent as f64 / MAX_ALLOWED_ABSENCE as f64 * 100.0).min(100.0)
}

pub fn classify_risk(remaining: usize) -> RiskTier {
    if remaining == 0 {
        RiskTier::Critical
    } else if remaining <= WARNING_REMAINING_THRESHOLD {
        RiskTier::Warning
    } else {
        RiskTier::Safe
    }
}

pub fn attendance_summary(records: &[AttendanceRecord]) -> AttendanceSummary {
    let absent = absent_count(records);
    let remaining = remaining_allowance(absent);

    AttendanceSummary {
        present_count: count_status(records, AttendanceStatus::Present),
        absent_count: absent,
        late_count: count_status(records, AttendanceStatus::Late),
        excused_count: count_status(records, AttendanceStatus::Excused),
        max_allowed_absence: MAX_ALLOWED_ABSENCE,
        remaining_allowance: remaining,
        absence_percentage: absence_percentage(absent),
        risk_tier: classify_risk(remaining),
    }
}

/// Ratio of the first Mathematics monthly exam. A zero max counts as 1 and an
/// exam the student did not sit scores 0.
fn mathematics_ratio(student: &Student) -> f64 {
    let Some(exam) = student
        .monthly_exams
        .iter()
        .find(|e| e.subject == Subject::Mathematics)
    else {
        return 0.0;
    };

    let score = if exam.is_present() { exam.score } else { 0.0 };
    let max = if exam.max_score == 0.0 { 1.0 } else { exam.max_score };
    score / max
}

/// Badges earned by the student. Each predicate is evaluated on its own and the
/// result keeps evaluation order.
pub fn evaluate_achievements(
    student: &Student,
    statistics: &StudentStatistics,
    absent: usize,
) -> Vec<Achievement> {
    let mut earned = Vec::new();

    if absent == 0 {
        earned.push(Achievement::PerfectAttendance);
    }
    if statistics.weekly_average >= WEEKLY_CHAMPION_AVERAGE {
        earned.push(Achievement::WeeklyChampion);
    }
    if statistics.monthly_average >= MONTHLY_STAR_AVERAGE {
        earned.push(Achievement::MonthlyStar);
    }
    if mathematics_ratio(student) >= MATHEMATICS_GENIUS_RATIO {
        earned.push(Achievement::MathematicsGenius);
    }

    earned
}

/// Weekly-only present average as a ratio (0.0 - 1.0 for in-range scores)
pub fn weekly_performance_ratio(student: &Student) -> f64 {
    average_of(&student.weekly_assessments) / 100.0
}

/// Roster "at risk" flag
pub fn is_roster_at_risk(student: &Student) -> bool {
    weekly_performance_ratio(student) < ROSTER_PERFORMANCE_RATIO
        || absent_count(&student.attendance_records) > ROSTER_ABSENCE_LIMIT
}
