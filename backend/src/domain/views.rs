//! Read models assembled from the derivation functions.

use chrono::NaiveDate;
use shared::{
    Assessment, MonthlyExam, RosterRow, Student, StudentDashboard, StudentRecordsResponse, Subject,
};

use super::announcements::announcement_views;
use super::classifier::{attendance_summary, evaluate_achievements, is_roster_at_risk};
use super::roster_filter::{filter_by_date_range, filter_by_subject, SubjectFilter};
use super::statistics::{display_average, student_statistics, subject_rollups};

/// Record filter for the student records view. Attendance has no subject and
/// is only narrowed by date.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecordFilter {
    pub subject: SubjectFilter,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub fn student_records(student: &Student, filter: &RecordFilter) -> StudentRecordsResponse {
    let weekly: Vec<Assessment> = filter_by_subject(&student.weekly_assessments, filter.subject)
        .into_iter()
        .cloned()
        .collect();
    let monthly: Vec<MonthlyExam> = filter_by_subject(&student.monthly_exams, filter.subject)
        .into_iter()
        .cloned()
        .collect();

    StudentRecordsResponse {
        student_id: student.id.clone(),
        weekly_assessments: filter_by_date_range(&weekly, filter.from, filter.to)
            .into_iter()
            .cloned()
            .collect(),
        monthly_exams: filter_by_date_range(&monthly, filter.from, filter.to)
            .into_iter()
            .cloned()
            .collect(),
        attendance_records: filter_by_date_range(
            &student.attendance_records,
            filter.from,
            filter.to,
        )
        .into_iter()
        .cloned()
        .collect(),
    }
}

/// Everything the student detail view shows. Rollups cover `subjects` in order,
/// skipping subjects with no records.
pub fn student_dashboard(
    student: &Student,
    subjects: &[Subject],
    today: NaiveDate,
) -> StudentDashboard {
    let statistics = student_statistics(student);
    let attendance = attendance_summary(&student.attendance_records);
    let achievements = evaluate_achievements(student, &statistics, attendance.absent_count);

    StudentDashboard {
        student_id: student.id.clone(),
        name: student.name.clone(),
        grade: student.grade.clone(),
        subjects: subject_rollups(student, subjects),
        announcements: announcement_views(student, today),
        statistics,
        attendance,
        achievements,
    }
}

/// Score of the first monthly exam in `subject`, as stored
pub fn subject_exam_score(student: &Student, subject: Subject) -> Option<f64> {
    student
        .monthly_exams
        .iter()
        .find(|exam| exam.subject == subject)
        .map(|exam| exam.score)
}

pub fn roster_row(student: &Student, subject: Option<Subject>, recently_saved: bool) -> RosterRow {
    let attendance = attendance_summary(&student.attendance_records);
    RosterRow {
        id: student.id.clone(),
        name: student.name.clone(),
        grade: student.grade.clone(),
        weekly_average: display_average(&student.weekly_assessments),
        monthly_average: display_average(&student.monthly_exams),
        absent_count: attendance.absent_count,
        risk_tier: attendance.risk_tier,
        at_risk: is_roster_at_risk(student),
        subject_score: subject.and_then(|s| subject_exam_score(student, s)),
        recently_saved,
    }
}
