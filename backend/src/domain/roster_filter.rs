//! Filtering and sorting for roster and record views.
//!
//! All functions borrow their input and return a new `Vec` of references; the
//! underlying student records are never touched. No match is an empty `Vec`.

use chrono::NaiveDate;
use serde::Deserialize;
use shared::{Announcement, AttendanceRecord, Student, Subject};
use std::cmp::Ordering;
use std::str::FromStr;

use super::statistics::{average_of, ScoredRecord};

/// Wildcard accepted wherever a subject or grade filter is parsed
pub const FILTER_WILDCARD: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubjectFilter {
    #[default]
    All,
    Only(Subject),
}

impl SubjectFilter {
    pub fn matches(&self, subject: Subject) -> bool {
        match self {
            SubjectFilter::All => true,
            SubjectFilter::Only(wanted) => *wanted == subject,
        }
    }
}

impl FromStr for SubjectFilter {
    type Err = shared::UnknownSubjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == FILTER_WILDCARD {
            Ok(SubjectFilter::All)
        } else {
            s.parse().map(SubjectFilter::Only)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GradeFilter {
    #[default]
    All,
    Only(String),
}

impl GradeFilter {
    pub fn parse(value: &str) -> Self {
        if value == FILTER_WILDCARD {
            GradeFilter::All
        } else {
            GradeFilter::Only(value.to_string())
        }
    }

    pub fn matches(&self, grade: &str) -> bool {
        match self {
            GradeFilter::All => true,
            GradeFilter::Only(wanted) => wanted == grade,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Alphabetical by name
    Name,
    /// Lexicographic by student ID
    Id,
    /// Weekly present average, best first
    Performance,
}

/// Records carrying an optional calendar date
pub trait Dated {
    fn record_date(&self) -> Option<NaiveDate>;
}

impl Dated for shared::Assessment {
    fn record_date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Dated for shared::MonthlyExam {
    fn record_date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Dated for AttendanceRecord {
    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

impl Dated for Announcement {
    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

pub fn filter_by_subject<T: ScoredRecord>(records: &[T], filter: SubjectFilter) -> Vec<&T> {
    records
        .iter()
        .filter(|record| filter.matches(record.subject()))
        .collect()
}

/// Inclusive date range filter. Records without a date are dropped as soon as
/// either bound is set.
pub fn filter_by_date_range<T: Dated>(
    records: &[T],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<&T> {
    if from.is_none() && to.is_none() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|record| match record.record_date() {
            Some(date) => from.map_or(true, |f| date >= f) && to.map_or(true, |t| date <= t),
            None => false,
        })
        .collect()
}

pub fn filter_by_grade<'a, I>(students: I, filter: &GradeFilter) -> Vec<&'a Student>
where
    I: IntoIterator<Item = &'a Student>,
{
    students
        .into_iter()
        .filter(|student| filter.matches(&student.grade))
        .collect()
}

/// Case-sensitive substring match on name or ID. An empty term keeps everyone.
pub fn filter_by_search<'a, I>(students: I, term: &str) -> Vec<&'a Student>
where
    I: IntoIterator<Item = &'a Student>,
{
    students
        .into_iter()
        .filter(|student| {
            term.is_empty() || student.name.contains(term) || student.id.contains(term)
        })
        .collect()
}

/// Name ordering used for display: case-insensitive first, raw text as tie-break
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Stable sort of a student view
pub fn sort_students<'a>(students: Vec<&'a Student>, key: SortKey) -> Vec<&'a Student> {
    match key {
        SortKey::Name => {
            let mut sorted = students;
            sorted.sort_by(|a, b| compare_names(&a.name, &b.name));
            sorted
        }
        SortKey::Id => {
            let mut sorted = students;
            sorted.sort_by(|a, b| a.id.cmp(&b.id));
            sorted
        }
        SortKey::Performance => {
            let mut keyed: Vec<(f64, &'a Student)> = students
                .into_iter()
                .map(|student| (average_of(&student.weekly_assessments), student))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| b.total_cmp(a));
            keyed.into_iter().map(|(_, student)| student).collect()
        }
    }
}

/// Combined roster query: search, then grade, then optional sort
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterQuery {
    pub search: Option<String>,
    pub grade: GradeFilter,
    pub sort: Option<SortKey>,
}

pub fn apply_roster_query<'a>(students: &'a [Student], query: &RosterQuery) -> Vec<&'a Student> {
    let searched = filter_by_search(students, query.search.as_deref().unwrap_or(""));
    let graded = filter_by_grade(searched, &query.grade);
    match query.sort {
        Some(key) => sort_students(graded, key),
        None => graded,
    }
}
