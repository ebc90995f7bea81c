use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Subjects taught at the school. This is a closed set: records never carry
/// free-text subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Arabic,
    Mathematics,
    English,
    Science,
    SocialStudies,
    ComputerScience,
    Religion,
    Art,
    Activity,
}

impl Subject {
    /// Every subject, in timetable order
    pub const ALL: [Subject; 9] = [
        Subject::Arabic,
        Subject::Mathematics,
        Subject::English,
        Subject::Science,
        Subject::SocialStudies,
        Subject::ComputerScience,
        Subject::Religion,
        Subject::Art,
        Subject::Activity,
    ];

    /// Wire identifier, identical to the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Arabic => "arabic",
            Subject::Mathematics => "mathematics",
            Subject::English => "english",
            Subject::Science => "science",
            Subject::SocialStudies => "social_studies",
            Subject::ComputerScience => "computer_science",
            Subject::Religion => "religion",
            Subject::Art => "art",
            Subject::Activity => "activity",
        }
    }

    /// Human-readable subject name
    pub fn display_name(&self) -> &'static str {
        match self {
            Subject::Arabic => "Arabic Language",
            Subject::Mathematics => "Mathematics",
            Subject::English => "English Language",
            Subject::Science => "Science",
            Subject::SocialStudies => "Social Studies",
            Subject::ComputerScience => "Computer Science",
            Subject::Religion => "Religious Education",
            Subject::Art => "Art",
            Subject::Activity => "Activity",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownSubjectError(pub String);

impl fmt::Display for UnknownSubjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown subject: {}", self.0)
    }
}

impl std::error::Error for UnknownSubjectError {}

impl FromStr for Subject {
    type Err = UnknownSubjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .iter()
            .copied()
            .find(|subject| subject.as_str() == s)
            .ok_or_else(|| UnknownSubjectError(s.to_string()))
    }
}

/// Attendance state of a scored record (weekly assessment or monthly exam)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreStatus {
    Present,
    Absent,
    Excused,
}

impl ScoreStatus {
    /// Only present records carry a meaningful score
    pub fn is_present(self) -> bool {
        self == ScoreStatus::Present
    }
}

/// Status of a single attendance entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Normal,
    High,
}

/// Audience of an announcement. Serialized as the grade label, or `"all"`
/// for a school-wide broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetGrade {
    All,
    Grade(String),
}

impl TargetGrade {
    pub const WILDCARD: &'static str = "all";

    /// Whether a student in `grade` is part of the audience
    pub fn includes(&self, grade: &str) -> bool {
        match self {
            TargetGrade::All => true,
            TargetGrade::Grade(target) => target == grade,
        }
    }
}

impl From<String> for TargetGrade {
    fn from(value: String) -> Self {
        if value == Self::WILDCARD {
            TargetGrade::All
        } else {
            TargetGrade::Grade(value)
        }
    }
}

impl From<TargetGrade> for String {
    fn from(value: TargetGrade) -> Self {
        match value {
            TargetGrade::All => TargetGrade::WILDCARD.to_string(),
            TargetGrade::Grade(grade) => grade,
        }
    }
}

/// Generate a record ID in format: "<kind>::<uuid v4>"
pub fn generate_record_id(kind: &str) -> String {
    format!("{}::{}", kind, Uuid::new_v4())
}

/// Anything stored in an id-keyed collection
pub trait Identified {
    fn id(&self) -> &str;
}

/// Weekly, per-subject assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: String,
    pub subject: Subject,
    pub title: String,
    /// Raw score; ignored by aggregation unless `status` is present
    pub score: f64,
    pub max_score: f64,
    pub status: ScoreStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Assessment {
    pub fn generate_id() -> String {
        generate_record_id("weekly")
    }
}

/// Monthly, per-subject exam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyExam {
    pub id: String,
    pub subject: Subject,
    pub score: f64,
    pub max_score: f64,
    pub status: ScoreStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl MonthlyExam {
    pub fn generate_id() -> String {
        generate_record_id("monthly")
    }
}

/// A dated presence/absence/lateness entry, optionally tied to a lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Arrival time, only meaningful when `status` is late
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_time: Option<NaiveTime>,
}

impl AttendanceRecord {
    pub fn generate_id() -> String {
        generate_record_id("attendance")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: NaiveDate,
    pub author: String,
    pub importance: Importance,
    pub target_grade: TargetGrade,
}

impl Announcement {
    pub fn generate_id() -> String {
        generate_record_id("announcement")
    }
}

impl Identified for Assessment {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for MonthlyExam {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for AttendanceRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Announcement {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Student {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A student together with every record the dashboard shows for them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// External student ID (unique across the school)
    pub id: String,
    pub name: String,
    /// Grade label, drawn from the configured grade list
    pub grade: String,
    #[serde(default)]
    pub weekly_assessments: Vec<Assessment>,
    #[serde(default)]
    pub monthly_exams: Vec<MonthlyExam>,
    #[serde(default)]
    pub attendance_records: Vec<AttendanceRecord>,
    #[serde(default)]
    pub announcements: Vec<Announcement>,
}

impl Student {
    /// A student with no records yet
    pub fn new(id: impl Into<String>, name: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grade: grade.into(),
            weekly_assessments: Vec::new(),
            monthly_exams: Vec::new(),
            attendance_records: Vec::new(),
            announcements: Vec::new(),
        }
    }

    /// Return a copy of this student with `update` applied
    pub fn with_update(&self, update: &StudentUpdate) -> Student {
        let mut next = self.clone();
        update.apply_to(&mut next);
        next
    }
}

/// A single kind of change to one student record.
///
/// Serialized as `{"kind": "...", "value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StudentUpdate {
    Rename(String),
    ChangeGrade(String),
    ReplaceWeeklyAssessments(Vec<Assessment>),
    ReplaceMonthlyExams(Vec<MonthlyExam>),
    ReplaceAttendanceRecords(Vec<AttendanceRecord>),
    AppendAttendanceRecord(AttendanceRecord),
    AppendAnnouncement(Announcement),
    /// Replace the assessment with the same id, or append it
    UpsertWeeklyAssessment(Assessment),
    /// Replace the exam with the same id, or append it
    UpsertMonthlyExam(MonthlyExam),
    RemoveWeeklyAssessment(String),
    RemoveMonthlyExam(String),
    RemoveAttendanceRecord(String),
    RemoveAnnouncement(String),
}

impl StudentUpdate {
    /// Apply this change to `student` in place
    pub fn apply_to(&self, student: &mut Student) {
        match self {
            StudentUpdate::Rename(name) => student.name = name.clone(),
            StudentUpdate::ChangeGrade(grade) => student.grade = grade.clone(),
            StudentUpdate::ReplaceWeeklyAssessments(items) => {
                student.weekly_assessments = items.clone()
            }
            StudentUpdate::ReplaceMonthlyExams(items) => student.monthly_exams = items.clone(),
            StudentUpdate::ReplaceAttendanceRecords(items) => {
                student.attendance_records = items.clone()
            }
            StudentUpdate::AppendAttendanceRecord(record) => {
                student.attendance_records.push(record.clone())
            }
            StudentUpdate::AppendAnnouncement(announcement) => {
                student.announcements.push(announcement.clone())
            }
            StudentUpdate::UpsertWeeklyAssessment(item) => {
                upsert_by_id(&mut student.weekly_assessments, item.clone())
            }
            StudentUpdate::UpsertMonthlyExam(item) => {
                upsert_by_id(&mut student.monthly_exams, item.clone())
            }
            StudentUpdate::RemoveWeeklyAssessment(id) => {
                student.weekly_assessments.retain(|item| item.id != *id)
            }
            StudentUpdate::RemoveMonthlyExam(id) => {
                student.monthly_exams.retain(|item| item.id != *id)
            }
            StudentUpdate::RemoveAttendanceRecord(id) => {
                student.attendance_records.retain(|item| item.id != *id)
            }
            StudentUpdate::RemoveAnnouncement(id) => {
                student.announcements.retain(|item| item.id != *id)
            }
        }
    }

    /// Short name used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            StudentUpdate::Rename(_) => "rename",
            StudentUpdate::ChangeGrade(_) => "change_grade",
            StudentUpdate::ReplaceWeeklyAssessments(_) => "replace_weekly_assessments",
            StudentUpdate::ReplaceMonthlyExams(_) => "replace_monthly_exams",
            StudentUpdate::ReplaceAttendanceRecords(_) => "replace_attendance_records",
            StudentUpdate::AppendAttendanceRecord(_) => "append_attendance_record",
            StudentUpdate::AppendAnnouncement(_) => "append_announcement",
            StudentUpdate::UpsertWeeklyAssessment(_) => "upsert_weekly_assessment",
            StudentUpdate::UpsertMonthlyExam(_) => "upsert_monthly_exam",
            StudentUpdate::RemoveWeeklyAssessment(_) => "remove_weekly_assessment",
            StudentUpdate::RemoveMonthlyExam(_) => "remove_monthly_exam",
            StudentUpdate::RemoveAttendanceRecord(_) => "remove_attendance_record",
            StudentUpdate::RemoveAnnouncement(_) => "remove_announcement",
        }
    }
}

/// Replace the element sharing `item`'s id, keeping its position, or append.
pub fn upsert_by_id<T: Identified>(items: &mut Vec<T>, item: T) {
    match items.iter().position(|existing| existing.id() == item.id()) {
        Some(index) => items[index] = item,
        None => items.push(item),
    }
}

/// Request for creating a new student
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub id: String,
    pub name: String,
    pub grade: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub student: Student,
    pub success_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentListResponse {
    pub students: Vec<Student>,
}

/// One entry of a bulk update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateEntry {
    pub student_id: String,
    pub update: StudentUpdate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateRequest {
    pub updates: Vec<BulkUpdateEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateResponse {
    pub updated_count: usize,
    pub success_message: String,
}

/// Raw score typed into the quick-edit cell. The UI may send either the
/// text of the input box or a number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ScoreInput {
    Number(f64),
    Text(String),
}

/// Request for setting a student's monthly exam score in one subject
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuickScoreRequest {
    pub score: ScoreInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuickScoreResponse {
    pub exam: MonthlyExam,
    /// True when no exam existed for the subject and one was created
    pub created: bool,
    pub success_message: String,
}

/// Three-level classification of the remaining absence allowance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Safe,
    Warning,
    Critical,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Safe => "safe",
            RiskTier::Warning => "warning",
            RiskTier::Critical => "critical",
        }
    }
}

/// Colour band of a subject percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceBand {
    Excellent,
    Strong,
    Fair,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    /// No absences at all
    PerfectAttendance,
    /// Weekly average of 90 or more
    WeeklyChampion,
    /// Monthly average of 85 or more
    MonthlyStar,
    /// Mathematics monthly exam at 90% or more
    MathematicsGenius,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub present_count: usize,
    pub absent_count: usize,
    pub late_count: usize,
    pub excused_count: usize,
    pub max_allowed_absence: usize,
    pub remaining_allowance: usize,
    /// Share of the allowance already used, capped at 100
    pub absence_percentage: f64,
    pub risk_tier: RiskTier,
}

/// Sum-then-divide aggregate of one subject's weekly and monthly records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRollup {
    pub subject: Subject,
    pub weekly_count: usize,
    pub monthly_count: usize,
    pub weekly_score: f64,
    pub weekly_max: f64,
    pub monthly_score: f64,
    pub monthly_max: f64,
    pub total_score: f64,
    pub total_max: f64,
    pub percentage: f64,
    pub band: PerformanceBand,
}

/// One bar of the weekly trend chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub assessment_id: String,
    pub title: String,
    pub subject: Subject,
    /// None when the student did not sit the assessment
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStatistics {
    pub weekly_average: i64,
    pub monthly_average: i64,
    /// Best of the weekly and monthly averages
    pub headline_score: i64,
    pub present_days: usize,
    pub total_assessments: usize,
    pub weekly_trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementView {
    pub announcement: Announcement,
    /// Published within the last few days
    pub is_new: bool,
}

/// Everything the student detail view renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub student_id: String,
    pub name: String,
    pub grade: String,
    pub statistics: StudentStatistics,
    pub attendance: AttendanceSummary,
    pub subjects: Vec<SubjectRollup>,
    pub achievements: Vec<Achievement>,
    pub announcements: Vec<AnnouncementView>,
}

/// A row of the teacher roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterRow {
    pub id: String,
    pub name: String,
    pub grade: String,
    pub weekly_average: i64,
    pub monthly_average: i64,
    pub absent_count: usize,
    pub risk_tier: RiskTier,
    pub at_risk: bool,
    /// Score of the first monthly exam in the teacher's subject, if requested
    pub subject_score: Option<f64>,
    /// Saved within the last couple of seconds
    pub recently_saved: bool,
}

/// A student's records narrowed by subject and date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecordsResponse {
    pub student_id: String,
    pub weekly_assessments: Vec<Assessment>,
    pub monthly_exams: Vec<MonthlyExam>,
    pub attendance_records: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterResponse {
    pub rows: Vec<RosterRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
    pub undo_depth: usize,
    pub redo_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectInfo {
    pub id: Subject,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub subjects: Vec<SubjectInfo>,
    pub grades: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightsResponse {
    pub student_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub imported_count: usize,
    pub success_message: String,
}
