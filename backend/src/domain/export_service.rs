//! Export service domain logic for the school dashboard.
//!
//! Produces the JSON document of the full collection, parses it back for
//! import, and renders the roster summary as CSV. The service is stateless;
//! callers pass the collection they want exported.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::Student;
use std::collections::HashSet;
use tracing::{error, info};

use super::errors::DomainError;
use super::views::roster_row;

/// One line of the roster CSV
#[derive(Debug, Serialize)]
struct RosterCsvRow<'a> {
    id: &'a str,
    name: &'a str,
    grade: &'a str,
    weekly_average: i64,
    monthly_average: i64,
    absent_count: usize,
    risk_tier: &'static str,
    at_risk: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    /// The full collection as a pretty-printed JSON array
    pub fn export_json(&self, students: &[Student]) -> Result<String> {
        info!("📄 EXPORT: Exporting {} students as JSON", students.len());
        serde_json::to_string_pretty(students).context("Failed to serialize students")
    }

    /// Parse an exported document. Rejects documents with repeated student ids.
    pub fn parse_json(&self, content: &str) -> Result<Vec<Student>> {
        let students: Vec<Student> =
            serde_json::from_str(content).context("Import document is not a valid student list")?;

        let mut seen = HashSet::new();
        for student in &students {
            if !seen.insert(student.id.as_str()) {
                error!("❌ IMPORT: Duplicate student id in import: {}", student.id);
                return Err(DomainError::DuplicateStudent(student.id.clone()).into());
            }
        }

        info!("✅ IMPORT: Parsed {} students", students.len());
        Ok(students)
    }

    /// Roster summary, one row per student in collection order
    pub fn export_roster_csv(&self, students: &[Student]) -> Result<String> {
        info!("📄 EXPORT: Exporting roster summary for {} students", students.len());

        let mut writer = csv::Writer::from_writer(Vec::new());
        for student in students {
            let row = roster_row(student, None, false);
            writer.serialize(RosterCsvRow {
                id: &student.id,
                name: &student.name,
                grade: &student.grade,
                weekly_average: row.weekly_average,
                monthly_average: row.monthly_average,
                absent_count: row.absent_count,
                risk_tier: row.risk_tier.as_str(),
                at_risk: row.at_risk,
            })?;
        }

        let bytes = writer.into_inner().context("Failed to flush roster CSV")?;
        String::from_utf8(bytes).context("Roster CSV is not valid UTF-8")
    }

    /// Download filename, e.g. `students_20261016.json`
    pub fn export_filename(&self, extension: &str, now: DateTime<Utc>) -> String {
        format!("students_{}.{}", now.format("%Y%m%d"), extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use shared::{
        Announcement, Assessment, AttendanceRecord, AttendanceStatus, Importance, MonthlyExam,
        ScoreStatus, Subject, TargetGrade,
    };

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn full_student() -> Student {
        let mut student = Student::new("S-1", "Layla \"Lulu\", Haddad", "Grade 5");
        student.weekly_assessments = vec![Assessment {
            id: "weekly::1".to_string(),
            subject: Subject::Science,
            title: "Plants".to_string(),
            score: 7.5,
            max_score: 10.0,
            status: ScoreStatus::Present,
            date: Some(day(2)),
            note: Some("good effort".to_string()),
        }];
        student.monthly_exams = vec![MonthlyExam {
            id: "monthly::1".to_string(),
            subject: Subject::Mathematics,
            score: 0.0,
            max_score: 100.0,
            status: ScoreStatus::Excused,
            date: None,
            note: None,
        }];
        student.attendance_records = vec![AttendanceRecord {
            id: "attendance::1".to_string(),
            date: day(6),
            status: AttendanceStatus::Late,
            lesson: Some("Period 1".to_string()),
            note: None,
            late_time: chrono::NaiveTime::from_hms_opt(8, 15, 0),
        }];
        student.announcements = vec![Announcement {
            id: "announcement::1".to_string(),
            title: "Trip".to_string(),
            content: "Museum visit".to_string(),
            date: day(10),
            author: "Office".to_string(),
            importance: Importance::High,
            target_grade: TargetGrade::Grade("Grade 5".to_string()),
        }];
        student
    }

    #[test]
    fn test_json_export_round_trips() {
        let service = ExportService::new();
        let students = vec![full_student(), Student::new("S-2", "Omar", "Grade 6")];

        let json = service.export_json(&students).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("\"weeklyAssessments\""));

        let parsed = service.parse_json(&json).unwrap();
        assert_eq!(parsed, students);
    }

    #[test]
    fn test_parse_json_rejects_duplicates() {
        let service = ExportService::new();
        let json = service
            .export_json(&[
                Student::new("S-1", "Layla", "Grade 5"),
                Student::new("S-1", "Layla again", "Grade 5"),
            ])
            .unwrap();

        let err = service.parse_json(&json).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DomainError>(),
            Some(&DomainError::DuplicateStudent("S-1".to_string()))
        );
    }

    #[test]
    fn test_parse_json_rejects_garbage() {
        assert!(ExportService::new().parse_json("{\"students\": 1}").is_err());
    }

    #[test]
    fn test_roster_csv() {
        let service = ExportService::new();
        let csv = service.export_roster_csv(&[full_student()]).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("id,name,grade,weekly_average,monthly_average,absent_count,risk_tier,at_risk")
        );
        assert_eq!(
            lines.next(),
            Some("S-1,\"Layla \"\"Lulu\"\", Haddad\",Grade 5,75,0,0,safe,false")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_export_filename() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        assert_eq!(
            ExportService::new().export_filename("csv", now),
            "students_20261016.csv"
        );
    }
}
