//! Announcement visibility for the student view.

use chrono::NaiveDate;
use shared::{Announcement, AnnouncementView, Student};

/// Announcements dated within this many days of today are shown as new
pub const NEW_ANNOUNCEMENT_DAYS: i64 = 3;

/// Announcements addressed to everyone or to the student's grade, in stored order
pub fn visible_announcements(student: &Student) -> Vec<&Announcement> {
    student
        .announcements
        .iter()
        .filter(|a| a.target_grade.includes(&student.grade))
        .collect()
}

pub fn is_recent(date: NaiveDate, today: NaiveDate) -> bool {
    (today - date).num_days().abs() <= NEW_ANNOUNCEMENT_DAYS
}

pub fn announcement_views(student: &Student, today: NaiveDate) -> Vec<AnnouncementView> {
    visible_announcements(student)
        .into_iter()
        .map(|announcement| AnnouncementView {
            is_new: is_recent(announcement.date, today),
            announcement: announcement.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Importance, TargetGrade};

    fn announcement(id: &str, target: TargetGrade, date: NaiveDate) -> Announcement {
        Announcement {
            id: id.to_string(),
            title: "Trip".to_string(),
            content: "Museum visit on Thursday".to_string(),
            date,
            author: "Ms. Noor".to_string(),
            importance: Importance::Normal,
            target_grade: target,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_visible_announcements_respect_target_grade() {
        let mut student = Student::new("S-1", "Layla", "Grade 5");
        student.announcements = vec![
            announcement("a1", TargetGrade::All, day(1)),
            announcement("a2", TargetGrade::Grade("Grade 6".to_string()), day(2)),
            announcement("a3", TargetGrade::Grade("Grade 5".to_string()), day(3)),
        ];

        let ids: Vec<&str> = visible_announcements(&student)
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a1", "a3"]);
    }

    #[test]
    fn test_is_recent_window() {
        assert!(is_recent(day(13), day(16)));
        assert!(!is_recent(day(12), day(16)));
        assert!(is_recent(day(16), day(16)));
        // future-dated announcements count by distance too
        assert!(is_recent(day(19), day(16)));
    }

    #[test]
    fn test_announcement_views_flag_new() {
        let mut student = Student::new("S-1", "Layla", "Grade 5");
        student.announcements = vec![
            announcement("old", TargetGrade::All, day(1)),
            announcement("fresh", TargetGrade::All, day(15)),
        ];

        let views = announcement_views(&student, day(16));
        assert!(!views[0].is_new);
        assert!(views[1].is_new);
    }
}
