//! Student service domain logic.
//!
//! Owns the [`StudentStore`] and is the only place that mutates it. Every change
//! is applied to the store first and then handed to the [`WriteQueue`] while the
//! store lock is still held, so storage sees writes in the same order as the
//! store. Storage failures are logged and never rolled back. Successful edits
//! mark the student as recently saved.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use shared::{
    BulkUpdateRequest, BulkUpdateResponse, CreateStudentRequest, HighlightsResponse,
    HistoryStatus, QuickScoreRequest, QuickScoreResponse, RosterResponse, Student,
    StudentDashboard, StudentRecordsResponse, StudentResponse, StudentUpdate, Subject,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

use super::commands::StoreAction;
use super::errors::DomainError;
use super::mutations::{
    collection_changes, update_subjects, upsert_monthly_score, validate_update_scores,
};
use super::roster_filter::{apply_roster_query, RosterQuery};
use super::save_highlight::SaveHighlighter;
use super::student_store::StudentStore;
use super::views::{roster_row, student_dashboard, student_records, RecordFilter};
use crate::config::SchoolCatalog;
use crate::storage::{StorageWrite, StudentStorage, WriteQueue};

#[derive(Clone)]
pub struct StudentService {
    store: Arc<Mutex<StudentStore>>,
    storage: Arc<dyn StudentStorage>,
    writer: WriteQueue,
    catalog: SchoolCatalog,
    highlighter: SaveHighlighter,
}

impl StudentService {
    /// Must be called from within a tokio runtime
    pub fn new(
        storage: Arc<dyn StudentStorage>,
        catalog: SchoolCatalog,
        history_limit: usize,
    ) -> Self {
        Self {
            store: Arc::new(Mutex::new(StudentStore::new(history_limit))),
            writer: WriteQueue::spawn(Arc::clone(&storage)),
            storage,
            catalog,
            highlighter: SaveHighlighter::default(),
        }
    }

    fn store(&self) -> MutexGuard<'_, StudentStore> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the in-memory collection with what storage holds
    pub async fn load(&self) -> Result<usize> {
        let students = self
            .storage
            .fetch_all_students()
            .await
            .context("Failed to load students from storage")?;
        let count = students.len();
        self.store().dispatch(StoreAction::Load(students))?;
        info!("Loaded {} students", count);
        Ok(count)
    }

    /// Wait for queued storage writes to finish
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    pub fn catalog(&self) -> &SchoolCatalog {
        &self.catalog
    }

    pub fn list_students(&self) -> Vec<Student> {
        self.store().students().to_vec()
    }

    pub fn get_student(&self, student_id: &str) -> Result<Student> {
        self.store()
            .get(student_id)
            .cloned()
            .ok_or_else(|| DomainError::StudentNotFound(student_id.to_string()).into())
    }

    pub fn create_student(&self, request: CreateStudentRequest) -> Result<StudentResponse> {
        info!("Creating student: {:?}", request);

        let id = request.id.trim();
        if id.is_empty() {
            return Err(DomainError::EmptyStudentId.into());
        }
        let name = request.name.trim();
        if name.is_empty() {
            return Err(DomainError::EmptyStudentName.into());
        }
        self.check_grade(&request.grade)?;

        let student = Student::new(id, name, request.grade.as_str());
        {
            let mut store = self.store();
            store.dispatch(StoreAction::Create(student.clone()))?;
            self.writer.enqueue(StorageWrite::Store(student.clone()));
        }
        self.highlighter.mark_saved(&student.id);

        info!("Created student {}", student.id);
        Ok(StudentResponse {
            success_message: format!("Student {} added", student.name),
            student,
        })
    }

    pub fn update_student(
        &self,
        student_id: &str,
        update: StudentUpdate,
    ) -> Result<StudentResponse> {
        info!("Updating student {} ({})", student_id, update.kind());
        self.check_update(&update)?;

        let student = {
            let mut store = self.store();
            store.dispatch(StoreAction::Update {
                student_id: student_id.to_string(),
                update: update.clone(),
            })?;
            let student = store
                .get(student_id)
                .cloned()
                .ok_or_else(|| DomainError::StudentNotFound(student_id.to_string()))?;
            self.writer.enqueue(StorageWrite::Update {
                student_id: student_id.to_string(),
                update,
            });
            student
        };

        self.highlighter.mark_saved(student_id);

        Ok(StudentResponse {
            success_message: format!("Changes to {} saved", student.name),
            student,
        })
    }

    /// Apply every update as one step. Any invalid entry rejects the whole request.
    pub fn bulk_update(&self, request: BulkUpdateRequest) -> Result<BulkUpdateResponse> {
        info!("Bulk update of {} changes", request.updates.len());
        for entry in &request.updates {
            self.check_update(&entry.update)?;
        }

        let updated_count = request.updates.len();
        {
            let mut store = self.store();
            store.dispatch(StoreAction::BulkUpdate(request.updates.clone()))?;
            self.writer.enqueue(StorageWrite::Bulk(request.updates.clone()));
        }

        for entry in &request.updates {
            self.highlighter.mark_saved(&entry.student_id);
        }

        Ok(BulkUpdateResponse {
            updated_count,
            success_message: format!("{} changes saved", updated_count),
        })
    }

    pub fn delete_student(&self, student_id: &str) -> Result<()> {
        info!("Deleting student {}", student_id);
        let mut store = self.store();
        store.dispatch(StoreAction::Delete(student_id.to_string()))?;
        self.writer.enqueue(StorageWrite::Delete(student_id.to_string()));
        Ok(())
    }

    /// Quick-edit the student's monthly exam score in `subject`
    pub fn set_monthly_score(
        &self,
        student_id: &str,
        subject: Subject,
        request: &QuickScoreRequest,
        today: NaiveDate,
    ) -> Result<QuickScoreResponse> {
        info!("Setting {} monthly score for student {}", subject, student_id);
        if !self.catalog.offers_subject(subject) {
            return Err(DomainError::SubjectNotOffered(subject).into());
        }

        let edit = {
            let mut store = self.store();
            let student = store
                .get(student_id)
                .ok_or_else(|| DomainError::StudentNotFound(student_id.to_string()))?;
            let edit = upsert_monthly_score(student, subject, &request.score, today)
                .map_err(DomainError::from)?;
            store.dispatch(StoreAction::Update {
                student_id: student_id.to_string(),
                update: edit.to_update(),
            })?;
            self.writer.enqueue(StorageWrite::Update {
                student_id: student_id.to_string(),
                update: edit.to_update(),
            });
            edit
        };

        self.highlighter.mark_saved(student_id);

        Ok(QuickScoreResponse {
            success_message: format!("{} score saved", subject.display_name()),
            exam: edit.exam,
            created: edit.created,
        })
    }

    pub fn student_dashboard(
        &self,
        student_id: &str,
        today: NaiveDate,
    ) -> Result<StudentDashboard> {
        let store = self.store();
        let student = store
            .get(student_id)
            .ok_or_else(|| DomainError::StudentNotFound(student_id.to_string()))?;
        Ok(student_dashboard(student, &self.catalog.subjects, today))
    }

    pub fn student_records(
        &self,
        student_id: &str,
        filter: &RecordFilter,
    ) -> Result<StudentRecordsResponse> {
        let store = self.store();
        let student = store
            .get(student_id)
            .ok_or_else(|| DomainError::StudentNotFound(student_id.to_string()))?;
        Ok(student_records(student, filter))
    }

    /// Roster rows after search, grade filter and sort. `subject` selects the
    /// exam score column.
    pub fn roster(&self, query: &RosterQuery, subject: Option<Subject>) -> RosterResponse {
        let store = self.store();
        let rows = apply_roster_query(store.students(), query)
            .into_iter()
            .map(|student| {
                roster_row(student, subject, self.highlighter.is_highlighted(&student.id))
            })
            .collect();
        RosterResponse { rows }
    }

    pub fn highlights(&self) -> HighlightsResponse {
        HighlightsResponse {
            student_ids: self.highlighter.highlighted_ids(),
        }
    }

    pub fn history_status(&self) -> HistoryStatus {
        self.store().history_status()
    }

    pub fn undo(&self) -> Result<HistoryStatus> {
        let mut store = self.store();
        let before = store.undo()?;
        self.persist_transition(&before, store.students());
        info!("Undo applied");
        Ok(store.history_status())
    }

    pub fn redo(&self) -> Result<HistoryStatus> {
        let mut store = self.store();
        let before = store.redo()?;
        self.persist_transition(&before, store.students());
        info!("Redo applied");
        Ok(store.history_status())
    }

    /// Replace the whole collection, e.g. from an import. Every student is held
    /// to the same rules as a created or edited one. History starts over.
    pub fn replace_all(&self, students: Vec<Student>) -> Result<usize> {
        for student in &students {
            self.check_student(student)?;
        }

        let count = students.len();
        {
            let mut store = self.store();
            let before = store.students().to_vec();
            store.dispatch(StoreAction::Load(students))?;
            self.persist_transition(&before, store.students());
        }
        info!("Replaced collection with {} students", count);
        Ok(count)
    }

    /// Enqueue the writes turning `before` into `after`. Call with the store locked.
    fn persist_transition(&self, before: &[Student], after: &[Student]) {
        let changes = collection_changes(before, after);
        if changes.is_empty() {
            return;
        }
        for student_id in changes.deleted {
            self.writer.enqueue(StorageWrite::Delete(student_id));
        }
        if !changes.updated.is_empty() {
            self.writer.enqueue(StorageWrite::Bulk(changes.updated));
        }
        for student in changes.created {
            self.writer.enqueue(StorageWrite::Store(student));
        }
    }

    fn check_grade(&self, grade: &str) -> Result<(), DomainError> {
        if !self.catalog.has_grade(grade) {
            warn!("Rejected unknown grade: {}", grade);
            return Err(DomainError::UnknownGrade(grade.to_string()));
        }
        Ok(())
    }

    /// Validate a whole student record as if it had been created and then edited
    fn check_student(&self, student: &Student) -> Result<(), DomainError> {
        if student.id.trim().is_empty() {
            return Err(DomainError::EmptyStudentId);
        }
        if student.name.trim().is_empty() {
            return Err(DomainError::EmptyStudentName);
        }
        self.check_grade(&student.grade)?;
        self.check_update(&StudentUpdate::ReplaceWeeklyAssessments(
            student.weekly_assessments.clone(),
        ))?;
        self.check_update(&StudentUpdate::ReplaceMonthlyExams(
            student.monthly_exams.clone(),
        ))
    }

    fn check_update(&self, update: &StudentUpdate) -> Result<(), DomainError> {
        validate_update_scores(update)?;
        match update {
            StudentUpdate::Rename(name) if name.trim().is_empty() => {
                return Err(DomainError::EmptyStudentName)
            }
            StudentUpdate::ChangeGrade(grade) => self.check_grade(grade)?,
            _ => {}
        }
        if let Some(subject) = update_subjects(update)
            .into_iter()
            .find(|s| !self.catalog.offers_subject(*s))
        {
            return Err(DomainError::SubjectNotOffered(subject));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::roster_filter::{GradeFilter, SortKey, SubjectFilter};
    use crate::storage::MemoryStudentRepository;
    use shared::{
        Assessment, AttendanceRecord, AttendanceStatus, BulkUpdateEntry, MonthlyExam, ScoreInput,
        ScoreStatus,
    };
    use std::time::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn catalog() -> SchoolCatalog {
        SchoolCatalog {
            subjects: vec![Subject::Mathematics, Subject::Science],
            grades: vec!["Grade 5".to_string(), "Grade 6".to_string()],
        }
    }

    async fn setup_service(
        students: Vec<Student>,
    ) -> (StudentService, Arc<MemoryStudentRepository>) {
        let storage = Arc::new(MemoryStudentRepository::with_students(students));
        let service = StudentService::new(storage.clone(), catalog(), 50);
        service.load().await.expect("load failed");
        (service, storage)
    }

    fn create_request(id: &str, name: &str, grade: &str) -> CreateStudentRequest {
        CreateStudentRequest {
            id: id.to_string(),
            name: name.to_string(),
            grade: grade.to_string(),
        }
    }

    fn weekly(id: &str, score: f64) -> Assessment {
        Assessment {
            id: id.to_string(),
            subject: Subject::Mathematics,
            title: "Quiz".to_string(),
            score,
            max_score: 100.0,
            status: ScoreStatus::Present,
            date: None,
            note: None,
        }
    }

    fn domain_error(err: &anyhow::Error) -> Option<&DomainError> {
        err.downcast_ref::<DomainError>()
    }

    #[tokio::test]
    async fn test_load_reads_storage() {
        let (service, _storage) =
            setup_service(vec![Student::new("S-1", "Layla", "Grade 5")]).await;
        assert_eq!(service.list_students().len(), 1);
        assert!(!service.history_status().can_undo);
    }

    #[tokio::test]
    async fn test_create_student_persists_and_validates() {
        let (service, storage) = setup_service(Vec::new()).await;

        let response = service
            .create_student(create_request(" S-1 ", " Layla ", "Grade 5"))
            .unwrap();
        assert_eq!(response.student.id, "S-1");
        assert_eq!(response.student.name, "Layla");

        let duplicate = service
            .create_student(create_request("S-1", "Other", "Grade 5"))
            .unwrap_err();
        assert_eq!(
            domain_error(&duplicate),
            Some(&DomainError::DuplicateStudent("S-1".to_string()))
        );

        let unknown_grade = service
            .create_student(create_request("S-2", "Omar", "Grade 9"))
            .unwrap_err();
        assert_eq!(
            domain_error(&unknown_grade),
            Some(&DomainError::UnknownGrade("Grade 9".to_string()))
        );

        let empty = service.create_student(create_request("  ", "Omar", "Grade 5")).unwrap_err();
        assert_eq!(domain_error(&empty), Some(&DomainError::EmptyStudentId));

        service.flush().await;
        assert_eq!(storage.fetch_all_students().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_rejects_subject_outside_catalog() {
        let (service, _storage) =
            setup_service(vec![Student::new("S-1", "Layla", "Grade 5")]).await;
        let mut art = weekly("w1", 50.0);
        art.subject = Subject::Art;

        let err = service
            .update_student("S-1", StudentUpdate::UpsertWeeklyAssessment(art))
            .unwrap_err();
        assert_eq!(domain_error(&err), Some(&DomainError::SubjectNotOffered(Subject::Art)));
        assert!(!service.history_status().can_undo);
    }

    #[tokio::test]
    async fn test_update_rejects_negative_scores() {
        let (service, _storage) =
            setup_service(vec![Student::new("S-1", "Layla", "Grade 5")]).await;
        let err = service
            .update_student("S-1", StudentUpdate::UpsertWeeklyAssessment(weekly("w1", -4.0)))
            .unwrap_err();
        assert!(matches!(domain_error(&err), Some(DomainError::InvalidScore(_))));
    }

    #[tokio::test]
    async fn test_set_monthly_score_upserts() {
        let (service, storage) =
            setup_service(vec![Student::new("S-1", "Layla", "Grade 5")]).await;
        let request = |score: f64| QuickScoreRequest {
            score: ScoreInput::Number(score),
        };

        let first = service
            .set_monthly_score("S-1", Subject::Mathematics, &request(77.0), today())
            .unwrap();
        assert!(first.created);

        let second = service
            .set_monthly_score("S-1", Subject::Mathematics, &request(88.0), today())
            .unwrap();
        assert!(!second.created);
        assert_eq!(second.exam.id, first.exam.id);

        let invalid =
            service.set_monthly_score("S-1", Subject::Mathematics, &request(140.0), today());
        assert!(invalid.is_err());

        service.flush().await;
        let stored = storage.fetch_all_students().await.unwrap();
        assert_eq!(stored[0].monthly_exams.len(), 1);
        assert_eq!(stored[0].monthly_exams[0].score, 88.0);
    }

    #[tokio::test]
    async fn test_set_monthly_score_unknown_subject_or_student() {
        let (service, _storage) =
            setup_service(vec![Student::new("S-1", "Layla", "Grade 5")]).await;
        let request = QuickScoreRequest {
            score: ScoreInput::Number(50.0),
        };

        let err = service
            .set_monthly_score("S-1", Subject::Art, &request, today())
            .unwrap_err();
        assert_eq!(domain_error(&err), Some(&DomainError::SubjectNotOffered(Subject::Art)));

        let err = service
            .set_monthly_score("S-9", Subject::Science, &request, today())
            .unwrap_err();
        assert_eq!(domain_error(&err), Some(&DomainError::StudentNotFound("S-9".to_string())));
    }

    #[tokio::test]
    async fn test_undo_redo_persist() {
        let (service, storage) =
            setup_service(vec![Student::new("S-1", "Layla", "Grade 5")]).await;

        service
            .update_student("S-1", StudentUpdate::Rename("Layla H.".to_string()))
            .unwrap();
        let status = service.undo().unwrap();
        assert!(status.can_redo);
        assert_eq!(service.get_student("S-1").unwrap().name, "Layla");

        service.flush().await;
        assert_eq!(storage.fetch_all_students().await.unwrap()[0].name, "Layla");

        service.redo().unwrap();
        service.flush().await;
        assert_eq!(storage.fetch_all_students().await.unwrap()[0].name, "Layla H.");
    }

    #[tokio::test]
    async fn test_undo_delete_restores_in_storage() {
        let (service, storage) =
            setup_service(vec![Student::new("S-1", "Layla", "Grade 5")]).await;

        service.delete_student("S-1").unwrap();
        service.undo().unwrap();
        service.flush().await;

        let stored = storage.fetch_all_students().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, "S-1");
    }

    #[tokio::test]
    async fn test_undo_with_empty_history() {
        let (service, _storage) = setup_service(Vec::new()).await;
        let err = service.undo().unwrap_err();
        assert_eq!(domain_error(&err), Some(&DomainError::NothingToUndo));
    }

    #[tokio::test]
    async fn test_bulk_update_unknown_student_changes_nothing() {
        let (service, _storage) =
            setup_service(vec![Student::new("S-1", "Layla", "Grade 5")]).await;
        let request = BulkUpdateRequest {
            updates: vec![
                BulkUpdateEntry {
                    student_id: "S-1".to_string(),
                    update: StudentUpdate::ChangeGrade("Grade 6".to_string()),
                },
                BulkUpdateEntry {
                    student_id: "S-2".to_string(),
                    update: StudentUpdate::ChangeGrade("Grade 6".to_string()),
                },
            ],
        };
        assert!(service.bulk_update(request).is_err());
        assert_eq!(service.get_student("S-1").unwrap().grade, "Grade 5");
    }

    #[tokio::test]
    async fn test_roster_query_and_subject_column() {
        let mut strong = Student::new("S-1", "Layla", "Grade 5");
        strong.weekly_assessments = vec![weekly("w1", 90.0)];
        strong.monthly_exams = vec![MonthlyExam {
            id: "m1".to_string(),
            subject: Subject::Science,
            score: 64.0,
            max_score: 100.0,
            status: ScoreStatus::Present,
            date: None,
            note: None,
        }];
        let mut weak = Student::new("S-2", "Amir", "Grade 5");
        weak.weekly_assessments = vec![weekly("w2", 30.0)];
        let other_grade = Student::new("S-3", "Zaid", "Grade 6");

        let (service, _storage) = setup_service(vec![strong, weak, other_grade]).await;
        let query = RosterQuery {
            search: None,
            grade: GradeFilter::Only("Grade 5".to_string()),
            sort: Some(SortKey::Performance),
        };

        let roster = service.roster(&query, Some(Subject::Science));
        let ids: Vec<&str> = roster.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["S-1", "S-2"]);
        assert_eq!(roster.rows[0].subject_score, Some(64.0));
        assert!(!roster.rows[0].at_risk);
        assert!(roster.rows[1].at_risk);
    }

    #[tokio::test(start_paused = true)]
    async fn test_saved_highlight_expires() {
        let (service, _storage) =
            setup_service(vec![Student::new("S-1", "Layla", "Grade 5")]).await;

        service
            .update_student("S-1", StudentUpdate::Rename("Layla H.".to_string()))
            .unwrap();
        assert_eq!(service.highlights().student_ids, vec!["S-1"]);
        assert!(service.roster(&RosterQuery::default(), None).rows[0].recently_saved);

        tokio::time::sleep(Duration::from_millis(2001)).await;
        assert!(service.highlights().student_ids.is_empty());
    }

    #[tokio::test]
    async fn test_replace_all_resets_history_and_storage() {
        let (service, storage) =
            setup_service(vec![Student::new("S-1", "Layla", "Grade 5")]).await;
        service
            .update_student("S-1", StudentUpdate::Rename("Layla H.".to_string()))
            .unwrap();

        let imported = vec![Student::new("S-7", "Nour", "Grade 6")];
        assert_eq!(service.replace_all(imported.clone()).unwrap(), 1);
        assert!(!service.history_status().can_undo);

        service.flush().await;
        assert_eq!(storage.fetch_all_students().await.unwrap(), imported);

        let bad = vec![Student::new("S-8", "Hana", "Grade 12")];
        assert!(service.replace_all(bad).is_err());
        assert_eq!(service.list_students(), imported);
    }

    #[tokio::test]
    async fn test_replace_all_validates_every_record() {
        let original = vec![Student::new("S-1", "Layla", "Grade 5")];
        let (service, storage) = setup_service(original.clone()).await;

        let mut art_exam = Student::new("S-2", "Omar", "Grade 5");
        art_exam.monthly_exams = vec![MonthlyExam {
            id: "m1".to_string(),
            subject: Subject::Art,
            score: 40.0,
            max_score: 50.0,
            status: ScoreStatus::Present,
            date: None,
            note: None,
        }];
        let mut negative_max = Student::new("S-3", "Sara", "Grade 5");
        negative_max.weekly_assessments = vec![Assessment {
            max_score: -5.0,
            ..weekly("w1", 4.0)
        }];

        let cases = [
            (Student::new("", "Nour", "Grade 5"), DomainError::EmptyStudentId),
            (Student::new("S-4", "  ", "Grade 5"), DomainError::EmptyStudentName),
            (art_exam, DomainError::SubjectNotOffered(Subject::Art)),
        ];
        for (student, expected) in cases {
            let err = service.replace_all(vec![student]).unwrap_err();
            assert_eq!(domain_error(&err), Some(&expected));
        }
        let err = service.replace_all(vec![negative_max]).unwrap_err();
        assert!(matches!(domain_error(&err), Some(DomainError::InvalidScore(_))));

        service.flush().await;
        assert_eq!(service.list_students(), original);
        assert_eq!(storage.fetch_all_students().await.unwrap(), original);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_edits_reach_storage_in_store_order() {
        let (service, storage) =
            setup_service(vec![Student::new("S-1", "Layla", "Grade 5")]).await;

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let service = service.clone();
                tokio::task::spawn_blocking(move || {
                    for n in 0..20 {
                        let record = AttendanceRecord {
                            id: format!("t{}-{}", worker, n),
                            date: today(),
                            status: AttendanceStatus::Present,
                            lesson: None,
                            note: None,
                            late_time: None,
                        };
                        service
                            .update_student("S-1", StudentUpdate::AppendAttendanceRecord(record))
                            .unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.await.unwrap();
        }
        service.flush().await;

        let attendance_ids = |student: &Student| -> Vec<String> {
            student.attendance_records.iter().map(|r| r.id.clone()).collect()
        };
        let in_memory = attendance_ids(&service.get_student("S-1").unwrap());
        let stored = storage.fetch_all_students().await.unwrap();
        assert_eq!(in_memory.len(), 160);
        assert_eq!(attendance_ids(&stored[0]), in_memory);
    }

    #[tokio::test]
    async fn test_student_records_by_subject() {
        let mut student = Student::new("S-1", "Layla", "Grade 5");
        let mut science = weekly("w2", 40.0);
        science.subject = Subject::Science;
        student.weekly_assessments = vec![weekly("w1", 80.0), science];
        let (service, _storage) = setup_service(vec![student]).await;

        let filter = RecordFilter {
            subject: SubjectFilter::Only(Subject::Science),
            ..RecordFilter::default()
        };
        let records = service.student_records("S-1", &filter).unwrap();
        assert_eq!(records.weekly_assessments.len(), 1);
        assert_eq!(records.weekly_assessments[0].id, "w2");

        let err = service.student_records("S-9", &filter).unwrap_err();
        assert_eq!(domain_error(&err), Some(&DomainError::StudentNotFound("S-9".to_string())));
    }

    #[tokio::test]
    async fn test_dashboard_for_unknown_student() {
        let (service, _storage) = setup_service(Vec::new()).await;
        let err = service.student_dashboard("S-1", today()).unwrap_err();
        assert_eq!(domain_error(&err), Some(&DomainError::StudentNotFound("S-1".to_string())));
    }
}
