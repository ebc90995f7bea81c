//! Teacher-authored edits expressed as pure transformations.
//!
//! Functions here take the current collection (or one student) by reference and
//! return the next value. Nothing is mutated in place and nothing is persisted;
//! the student service decides what to do with the result.

use chrono::NaiveDate;
use shared::{
    BulkUpdateEntry, MonthlyExam, ScoreInput, ScoreStatus, Student, StudentUpdate, Subject,
};

use super::errors::DomainError;
use super::validation::{parse_score_input, ScorePolicy, ScoreValidationError};

/// Max score given to exams created or rewritten by the quick-edit path
pub const QUICK_EDIT_MAX_SCORE: f64 = 100.0;

/// Outcome of a quick-edit of a monthly score
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyScoreEdit {
    pub exam: MonthlyExam,
    /// True when a new exam record was synthesized
    pub created: bool,
}

impl MonthlyScoreEdit {
    pub fn to_update(&self) -> StudentUpdate {
        StudentUpdate::UpsertMonthlyExam(self.exam.clone())
    }
}

/// Set the student's monthly exam score for `subject`.
///
/// The first exam in that subject is rewritten in place (same id, note kept);
/// when there is none a new one is created with max score 100 dated `today`.
/// Input outside 0-100 is rejected and nothing changes.
pub fn upsert_monthly_score(
    student: &Student,
    subject: Subject,
    input: &ScoreInput,
    today: NaiveDate,
) -> Result<MonthlyScoreEdit, ScoreValidationError> {
    let score = ScorePolicy::QuickEdit.check_score(parse_score_input(input)?)?;

    let edit = match student.monthly_exams.iter().find(|e| e.subject == subject) {
        Some(existing) => MonthlyScoreEdit {
            exam: MonthlyExam {
                id: existing.id.clone(),
                subject,
                score,
                max_score: QUICK_EDIT_MAX_SCORE,
                status: ScoreStatus::Present,
                date: Some(today),
                note: existing.note.clone(),
            },
            created: false,
        },
        None => MonthlyScoreEdit {
            exam: MonthlyExam {
                id: MonthlyExam::generate_id(),
                subject,
                score,
                max_score: QUICK_EDIT_MAX_SCORE,
                status: ScoreStatus::Present,
                date: Some(today),
                note: None,
            },
            created: true,
        },
    };

    Ok(edit)
}

/// Check every score carried by a full-record update against the record editor policy
pub fn validate_update_scores(update: &StudentUpdate) -> Result<(), ScoreValidationError> {
    let policy = ScorePolicy::RecordEditor;
    match update {
        StudentUpdate::ReplaceWeeklyAssessments(items) => items
            .iter()
            .try_for_each(|a| policy.check_record(a.score, a.max_score)),
        StudentUpdate::ReplaceMonthlyExams(items) => items
            .iter()
            .try_for_each(|e| policy.check_record(e.score, e.max_score)),
        StudentUpdate::UpsertWeeklyAssessment(a) => policy.check_record(a.score, a.max_score),
        StudentUpdate::UpsertMonthlyExam(e) => policy.check_record(e.score, e.max_score),
        _ => Ok(()),
    }
}

/// Subjects referenced by an update, for catalog checks
pub fn update_subjects(update: &StudentUpdate) -> Vec<Subject> {
    match update {
        StudentUpdate::ReplaceWeeklyAssessments(items) => items.iter().map(|a| a.subject).collect(),
        StudentUpdate::ReplaceMonthlyExams(items) => items.iter().map(|e| e.subject).collect(),
        StudentUpdate::UpsertWeeklyAssessment(a) => vec![a.subject],
        StudentUpdate::UpsertMonthlyExam(e) => vec![e.subject],
        _ => Vec::new(),
    }
}

fn position_of(students: &[Student], student_id: &str) -> Result<usize, DomainError> {
    students
        .iter()
        .position(|s| s.id == student_id)
        .ok_or_else(|| DomainError::StudentNotFound(student_id.to_string()))
}

pub fn apply_update(
    students: &[Student],
    student_id: &str,
    update: &StudentUpdate,
) -> Result<Vec<Student>, DomainError> {
    let index = position_of(students, student_id)?;
    let mut next = students.to_vec();
    next[index] = students[index].with_update(update);
    Ok(next)
}

/// Apply every entry in order. Any unknown student id fails the whole batch.
pub fn apply_bulk(
    students: &[Student],
    updates: &[BulkUpdateEntry],
) -> Result<Vec<Student>, DomainError> {
    for entry in updates {
        position_of(students, &entry.student_id)?;
    }

    let mut next = students.to_vec();
    for entry in updates {
        let index = position_of(&next, &entry.student_id)?;
        entry.update.apply_to(&mut next[index]);
    }
    Ok(next)
}

pub fn insert_student(students: &[Student], student: Student) -> Result<Vec<Student>, DomainError> {
    if students.iter().any(|s| s.id == student.id) {
        return Err(DomainError::DuplicateStudent(student.id));
    }
    let mut next = students.to_vec();
    next.push(student);
    Ok(next)
}

pub fn remove_student(students: &[Student], student_id: &str) -> Result<Vec<Student>, DomainError> {
    position_of(students, student_id)?;
    Ok(students
        .iter()
        .filter(|s| s.id != student_id)
        .cloned()
        .collect())
}

/// Typed updates turning `before` into `after` (same student id)
pub fn student_changes(before: &Student, after: &Student) -> Vec<StudentUpdate> {
    let mut changes = Vec::new();
    if before.name != after.name {
        changes.push(StudentUpdate::Rename(after.name.clone()));
    }
    if before.grade != after.grade {
        changes.push(StudentUpdate::ChangeGrade(after.grade.clone()));
    }
    if before.weekly_assessments != after.weekly_assessments {
        changes.push(StudentUpdate::ReplaceWeeklyAssessments(
            after.weekly_assessments.clone(),
        ));
    }
    if before.monthly_exams != after.monthly_exams {
        changes.push(StudentUpdate::ReplaceMonthlyExams(after.monthly_exams.clone()));
    }
    if before.attendance_records != after.attendance_records {
        changes.push(StudentUpdate::ReplaceAttendanceRecords(
            after.attendance_records.clone(),
        ));
    }
    if before.announcements != after.announcements {
        // no replace kind for announcements: clear, then append in order
        changes.extend(
            before
                .announcements
                .iter()
                .map(|old| StudentUpdate::RemoveAnnouncement(old.id.clone())),
        );
        changes.extend(
            after
                .announcements
                .iter()
                .cloned()
                .map(StudentUpdate::AppendAnnouncement),
        );
    }
    changes
}

/// What changed between two versions of the collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionChanges {
    pub created: Vec<Student>,
    pub deleted: Vec<String>,
    pub updated: Vec<BulkUpdateEntry>,
}

impl CollectionChanges {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty() && self.updated.is_empty()
    }
}

pub fn collection_changes(before: &[Student], after: &[Student]) -> CollectionChanges {
    let mut changes = CollectionChanges::default();

    for student in after {
        match before.iter().find(|s| s.id == student.id) {
            None => changes.created.push(student.clone()),
            Some(previous) => {
                changes
                    .updated
                    .extend(student_changes(previous, student).into_iter().map(|update| {
                        BulkUpdateEntry {
                            student_id: student.id.clone(),
                            update,
                        }
                    }));
            }
        }
    }

    changes.deleted = before
        .iter()
        .filter(|s| !after.iter().any(|a| a.id == s.id))
        .map(|s| s.id.clone())
        .collect();

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Announcement, Importance, TargetGrade};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn exam(id: &str, subject: Subject, score: f64) -> MonthlyExam {
        MonthlyExam {
            id: id.to_string(),
            subject,
            score,
            max_score: 50.0,
            status: ScoreStatus::Absent,
            date: None,
            note: Some("make-up pending".to_string()),
        }
    }

    #[test]
    fn test_upsert_creates_then_replaces() {
        let student = Student::new("S-1", "Layla", "Grade 5");

        let first = upsert_monthly_score(
            &student,
            Subject::Science,
            &ScoreInput::Number(77.0),
            today(),
        )
        .unwrap();
        assert!(first.created);
        assert_eq!(first.exam.subject, Subject::Science);
        assert_eq!(first.exam.score, 77.0);
        assert_eq!(first.exam.max_score, 100.0);
        assert_eq!(first.exam.status, ScoreStatus::Present);
        assert_eq!(first.exam.date, Some(today()));

        let student = student.with_update(&first.to_update());
        assert_eq!(student.monthly_exams.len(), 1);

        let second = upsert_monthly_score(
            &student,
            Subject::Science,
            &ScoreInput::Text("88".to_string()),
            today(),
        )
        .unwrap();
        assert!(!second.created);
        assert_eq!(second.exam.id, first.exam.id);

        let student = student.with_update(&second.to_update());
        assert_eq!(student.monthly_exams.len(), 1);
        assert_eq!(student.monthly_exams[0].score, 88.0);
    }

    #[test]
    fn test_upsert_rewrites_existing_fields_but_keeps_note() {
        let mut student = Student::new("S-1", "Layla", "Grade 5");
        student.monthly_exams = vec![
            exam("m-art", Subject::Art, 10.0),
            exam("m-math", Subject::Mathematics, 20.0),
        ];

        let edit = upsert_monthly_score(
            &student,
            Subject::Mathematics,
            &ScoreInput::Number(64.0),
            today(),
        )
        .unwrap();
        let updated = student.with_update(&edit.to_update());

        assert_eq!(updated.monthly_exams[1].id, "m-math");
        assert_eq!(updated.monthly_exams[1].max_score, 100.0);
        assert_eq!(updated.monthly_exams[1].status, ScoreStatus::Present);
        assert_eq!(updated.monthly_exams[1].note.as_deref(), Some("make-up pending"));
        assert_eq!(updated.monthly_exams[0], student.monthly_exams[0]);
    }

    #[test]
    fn test_upsert_rejects_invalid_input() {
        let student = Student::new("S-1", "Layla", "Grade 5");
        for input in [
            ScoreInput::Number(101.0),
            ScoreInput::Number(-1.0),
            ScoreInput::Text("eighty".to_string()),
            ScoreInput::Number(f64::NAN),
        ] {
            assert!(upsert_monthly_score(&student, Subject::Art, &input, today()).is_err());
        }
    }

    #[test]
    fn test_validate_update_scores() {
        let ok = StudentUpdate::UpsertMonthlyExam(exam("m", Subject::Art, 180.0));
        assert!(validate_update_scores(&ok).is_ok());

        let bad = StudentUpdate::ReplaceMonthlyExams(vec![exam("m", Subject::Art, -3.0)]);
        assert!(validate_update_scores(&bad).is_err());

        assert!(validate_update_scores(&StudentUpdate::Rename("x".to_string())).is_ok());
    }

    #[test]
    fn test_apply_update_unknown_student() {
        let students = vec![Student::new("S-1", "Layla", "Grade 5")];
        let result = apply_update(&students, "S-9", &StudentUpdate::Rename("x".to_string()));
        assert_eq!(result, Err(DomainError::StudentNotFound("S-9".to_string())));
    }

    #[test]
    fn test_apply_bulk_is_all_or_nothing() {
        let students = vec![
            Student::new("S-1", "Layla", "Grade 5"),
            Student::new("S-2", "Omar", "Grade 5"),
        ];
        let updates = vec![
            BulkUpdateEntry {
                student_id: "S-1".to_string(),
                update: StudentUpdate::ChangeGrade("Grade 6".to_string()),
            },
            BulkUpdateEntry {
                student_id: "S-2".to_string(),
                update: StudentUpdate::Rename("Omar F.".to_string()),
            },
        ];

        let next = apply_bulk(&students, &updates).unwrap();
        assert_eq!(next[0].grade, "Grade 6");
        assert_eq!(next[1].name, "Omar F.");
        assert_eq!(students[0].grade, "Grade 5");

        let mut with_unknown = updates.clone();
        with_unknown.push(BulkUpdateEntry {
            student_id: "S-404".to_string(),
            update: StudentUpdate::Rename("ghost".to_string()),
        });
        assert!(apply_bulk(&students, &with_unknown).is_err());
    }

    #[test]
    fn test_insert_and_remove_student() {
        let students = vec![Student::new("S-1", "Layla", "Grade 5")];
        assert!(insert_student(&students, Student::new("S-1", "Dup", "Grade 5")).is_err());

        let next = insert_student(&students, Student::new("S-2", "Omar", "Grade 5")).unwrap();
        assert_eq!(next.len(), 2);

        let removed = remove_student(&next, "S-1").unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, "S-2");
        assert!(remove_student(&removed, "S-1").is_err());
    }

    #[test]
    fn test_collection_changes_reproduce_target() {
        let mut layla = Student::new("S-1", "Layla", "Grade 5");
        layla.monthly_exams = vec![exam("m", Subject::Art, 10.0)];
        layla.announcements = vec![Announcement {
            id: "n-1".to_string(),
            title: "Exams".to_string(),
            content: "Exams start Sunday".to_string(),
            date: today(),
            author: "Office".to_string(),
            importance: Importance::High,
            target_grade: TargetGrade::All,
        }];
        let before = vec![layla.clone(), Student::new("S-2", "Omar", "Grade 5")];

        let mut changed = layla.clone();
        changed.name = "Layla H.".to_string();
        changed.monthly_exams.clear();
        changed.announcements[0].title = "Final exams".to_string();
        let after = vec![changed, Student::new("S-3", "Sara", "Grade 6")];

        let changes = collection_changes(&before, &after);
        assert_eq!(changes.created.len(), 1);
        assert_eq!(changes.deleted, vec!["S-2".to_string()]);

        let mut replayed = remove_student(&before, "S-2").unwrap();
        replayed = apply_bulk(&replayed, &changes.updated).unwrap();
        for student in changes.created {
            replayed = insert_student(&replayed, student).unwrap();
        }
        assert_eq!(replayed, after);
    }

    #[test]
    fn test_collection_changes_empty_when_equal() {
        let students = vec![Student::new("S-1", "Layla", "Grade 5")];
        assert!(collection_changes(&students, &students).is_empty());
    }
}
