//! Derived-event generation: study sessions ahead of an exam.
//!
//! Builds candidate events only; conflict-aware insertion happens in the
//! service layer, which hands the affected window to resolution in one pass.

use crate::model::event::Event;
use chrono::{Duration, TimeZone, Utc};

/// Options controlling generated study sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudyPlanOptions {
    /// Number of sessions, one per day immediately preceding the exam.
    pub sessions: u32,
    /// Length of each session in minutes.
    pub session_minutes: i64,
    /// Local-day hour each session starts at.
    pub start_hour: u32,
}

impl Default for StudyPlanOptions {
    fn default() -> Self {
        Self {
            sessions: 3,
            session_minutes: 120,
            start_hour: 14,
        }
    }
}

/// Builds one study session per day on the `options.sessions` days before
/// the exam, each carrying the exam title for traceability.
///
/// Sessions are flexible so the resolution pass may move them around
/// higher-priority occupants; the exam itself is left untouched.
pub fn build_study_sessions(
    exam: &Event,
    options: &StudyPlanOptions,
    study_category: &str,
) -> Vec<Event> {
    let session_duration = Duration::minutes(options.session_minutes);
    let mut sessions = Vec::with_capacity(options.sessions as usize);

    for i in 0..options.sessions {
        let days_before = i64::from(options.sessions - i);
        let day = exam.start - Duration::days(days_before);
        let Some(start_naive) = day.date_naive().and_hms_opt(options.start_hour, 0, 0) else {
            continue;
        };
        let start = Utc.from_utc_datetime(&start_naive);

        let mut session = Event::new(
            exam.owner,
            format!("Study for {}", exam.title),
            study_category,
            start,
            start + session_duration,
        );
        session.description = format!("Preparation session {} for {}", i + 1, exam.title);
        sessions.push(session);
    }

    sessions
}

#[cfg(test)]
mod tests {
    use super::{build_study_sessions, StudyPlanOptions};
    use crate::model::event::Event;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn exam_in_days(days: i64) -> Event {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap() + Duration::days(days);
        Event::new(Uuid::new_v4(), "Algebra final", "Exam", start, start + Duration::hours(3))
    }

    #[test]
    fn sessions_land_on_the_days_before_the_exam() {
        let exam = exam_in_days(5);
        let sessions = build_study_sessions(&exam, &StudyPlanOptions::default(), "Study");

        assert_eq!(sessions.len(), 3);
        for (i, session) in sessions.iter().enumerate() {
            let expected_day = exam.start.date_naive() - chrono::Days::new(3 - i as u64);
            assert_eq!(session.start.date_naive(), expected_day);
            assert_eq!(session.start.time().to_string(), "14:00:00");
            assert_eq!(session.duration(), Duration::minutes(120));
            assert_eq!(session.category, "Study");
            assert!(session.title.contains("Algebra final"));
            assert!(session.flexible);
        }
    }

    #[test]
    fn session_count_follows_options() {
        let exam = exam_in_days(10);
        let options = StudyPlanOptions {
            sessions: 2,
            ..StudyPlanOptions::default()
        };
        let sessions = build_study_sessions(&exam, &options, "Study");
        assert_eq!(sessions.len(), 2);
    }
}
