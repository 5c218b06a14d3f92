use crate::store::{Attendance, AttendanceStatus, Grade, Student, Teacher};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

/// One-decimal rounding used for displayed marks and rates. Derived values fed
/// into threshold comparisons are never rounded first.
#[allow(dead_code)]
pub fn round_off_1_decimal(x: f64) -> f64 {
    ((10.0 * x) + 0.5).floor() / 10.0
}

/// Sort key matching the dashboard's pt-BR name ordering: accented letters
/// collate with their base letter, case-insensitively. Ties fall back to the
/// raw string so the order stays deterministic.
fn fold_pt_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

pub fn name_sort_key(name: &str) -> String {
    name.chars()
        .flat_map(|c| c.to_lowercase())
        .map(fold_pt_char)
        .collect()
}

pub fn compare_names(a: &str, b: &str) -> Ordering {
    name_sort_key(a)
        .cmp(&name_sort_key(b))
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStat {
    pub student_id: String,
    pub name: String,
    pub total_sessions: usize,
    pub present_count: usize,
    pub absent_count: usize,
    pub attendance_rate_percent: f64,
}

fn attendance_rate(attendances: &[Attendance], student_id: &str) -> (usize, usize, f64) {
    let mut total = 0_usize;
    let mut present = 0_usize;
    for a in attendances {
        if a.student_id != student_id {
            continue;
        }
        total += 1;
        if a.status == AttendanceStatus::Present {
            present += 1;
        }
    }
    // A student with no recorded sessions counts as fully attending.
    let rate = if total > 0 {
        (present as f64 / total as f64) * 100.0
    } else {
        100.0
    };
    (total, present, rate)
}

/// Per-student session counts and attendance rate, ordered by student name.
pub fn compute_attendance_stats(
    students: &[Student],
    attendances: &[Attendance],
) -> Vec<AttendanceStat> {
    let mut rows: Vec<AttendanceStat> = students
        .iter()
        .map(|s| {
            let (total, present, rate) = attendance_rate(attendances, &s.id);
            AttendanceStat {
                student_id: s.id.clone(),
                name: s.name.clone(),
                total_sessions: total,
                present_count: present,
                absent_count: total - present,
                attendance_rate_percent: rate,
            }
        })
        .collect();
    rows.sort_by(|a, b| compare_names(&a.name, &b.name));
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtRiskStudent {
    pub name: String,
    pub average_grade: f64,
    pub attendance_rate_percent: f64,
}

fn grade_average(grades: &[Grade], student_id: &str) -> f64 {
    let mut sum = 0.0_f64;
    let mut count = 0_usize;
    for g in grades {
        if g.student_id == student_id {
            sum += g.value;
            count += 1;
        }
    }
    if count > 0 {
        sum / count as f64
    } else {
        0.0
    }
}

/// Students whose unrounded grade average is below 5 or whose attendance rate
/// is below 75%. Order follows the input roster; this view applies no re-sort.
pub fn compute_at_risk_students(
    students: &[Student],
    grades: &[Grade],
    attendances: &[Attendance],
) -> Vec<AtRiskStudent> {
    students
        .iter()
        .filter_map(|s| {
            let avg = grade_average(grades, &s.id);
            let (_, _, rate) = attendance_rate(attendances, &s.id);
            if avg < 5.0 || rate < 75.0 {
                Some(AtRiskStudent {
                    name: s.name.clone(),
                    average_grade: avg,
                    attendance_rate_percent: rate,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Distinct subjects in teacher-roster order. The grade report is keyed off
/// the roster, so a subject with grades but no teacher entry never shows up.
pub fn distinct_subjects(teachers: &[Teacher]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut subjects = Vec::new();
    for t in teachers {
        if seen.insert(t.subject.as_str()) {
            subjects.push(t.subject.clone());
        }
    }
    subjects
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAverage {
    pub subject: String,
    /// `None` means the student has no grades in this subject, which is not
    /// the same thing as an average of zero.
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAverages {
    pub student_id: String,
    pub name: String,
    pub per_subject: Vec<SubjectAverage>,
    pub overall_average: f64,
}

/// Per-student averages per roster subject plus the overall average across all
/// of the student's grades regardless of subject. Ordered by student name.
pub fn compute_subject_averages(
    students: &[Student],
    grades: &[Grade],
    subjects: &[String],
) -> Vec<StudentAverages> {
    let mut rows: Vec<StudentAverages> = students
        .iter()
        .map(|s| {
            let student_grades: Vec<&Grade> =
                grades.iter().filter(|g| g.student_id == s.id).collect();
            let per_subject = subjects
                .iter()
                .map(|subject| {
                    let mut sum = 0.0_f64;
                    let mut count = 0_usize;
                    for g in &student_grades {
                        if g.subject == *subject {
                            sum += g.value;
                            count += 1;
                        }
                    }
                    SubjectAverage {
                        subject: subject.clone(),
                        average: if count > 0 {
                            Some(sum / count as f64)
                        } else {
                            None
                        },
                    }
                })
                .collect();
            let overall_average = if student_grades.is_empty() {
                0.0
            } else {
                student_grades.iter().map(|g| g.value).sum::<f64>()
                    / student_grades.len() as f64
            };
            StudentAverages {
                student_id: s.id.clone(),
                name: s.name.clone(),
                per_subject,
                overall_average,
            }
        })
        .collect();
    rows.sort_by(|a, b| compare_names(&a.name, &b.name));
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedAttendance {
    pub present_total: usize,
    pub absent_total: usize,
    /// Chart segment value only: 1 when there is nothing to draw, so the
    /// proportion view always renders. Never used in numeric stats.
    pub display_present_total: usize,
}

pub fn compute_consolidated_attendance(attendances: &[Attendance]) -> ConsolidatedAttendance {
    let present_total = attendances
        .iter()
        .filter(|a| a.status == AttendanceStatus::Present)
        .count();
    let absent_total = attendances.len() - present_total;
    let display_present_total = if present_total == 0 && absent_total == 0 {
        1
    } else {
        present_total
    };
    ConsolidatedAttendance {
        present_total,
        absent_total,
        display_present_total,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub student_count: usize,
    pub teacher_count: usize,
    /// Distinct lesson plans with at least one attendance record.
    pub recorded_session_count: usize,
}

pub fn compute_totals(
    students: &[Student],
    teachers: &[Teacher],
    attendances: &[Attendance],
) -> Totals {
    let recorded: HashSet<&str> = attendances
        .iter()
        .map(|a| a.lesson_plan_id.as_str())
        .collect();
    Totals {
        student_count: students.len(),
        teacher_count: teachers.len(),
        recorded_session_count: recorded.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SchoolingLevel, Shift, Weekday};

    fn student(id: &str, name: &str) -> Student {
        Student {
            id: id.to_string(),
            name: name.to_string(),
            cpf: String::new(),
            dob: "2010-01-01".to_string(),
            schooling: SchoolingLevel::FundamentalOne,
        }
    }

    fn teacher(id: &str, subject: &str, day: Weekday, shift: Shift) -> Teacher {
        Teacher {
            id: id.to_string(),
            name: format!("Prof {}", id),
            subject: subject.to_string(),
            day_of_week: day,
            shift,
        }
    }

    fn att(student_id: &str, plan_id: &str, status: AttendanceStatus) -> Attendance {
        Attendance {
            student_id: student_id.to_string(),
            lesson_plan_id: plan_id.to_string(),
            status,
        }
    }

    fn grade(student_id: &str, subject: &str, value: f64) -> Grade {
        Grade {
            id: format!("g-{}-{}-{}", student_id, subject, value),
            student_id: student_id.to_string(),
            subject: subject.to_string(),
            description: "Prova".to_string(),
            value,
        }
    }

    #[test]
    fn no_sessions_means_full_attendance() {
        let stats = compute_attendance_stats(&[student("s1", "Ana")], &[]);
        assert_eq!(stats.len(), 1);
        let row = &stats[0];
        assert_eq!(row.student_id, "s1");
        assert_eq!(row.name, "Ana");
        assert_eq!(row.total_sessions, 0);
        assert_eq!(row.present_count, 0);
        assert_eq!(row.absent_count, 0);
        assert_eq!(row.attendance_rate_percent, 100.0);
    }

    #[test]
    fn attendance_rate_counts_per_student() {
        let students = [student("s1", "Ana"), student("s2", "Bruno")];
        let attendances = [
            att("s1", "p1", AttendanceStatus::Present),
            att("s1", "p2", AttendanceStatus::Absent),
            att("s1", "p3", AttendanceStatus::Present),
            att("s1", "p4", AttendanceStatus::Present),
            att("s2", "p1", AttendanceStatus::Absent),
        ];
        let stats = compute_attendance_stats(&students, &attendances);
        assert_eq!(stats[0].present_count, 3);
        assert_eq!(stats[0].absent_count, 1);
        assert_eq!(stats[0].attendance_rate_percent, 75.0);
        assert_eq!(stats[1].name, "Bruno");
        assert_eq!(stats[1].attendance_rate_percent, 0.0);
        for s in &stats {
            assert!((0.0..=100.0).contains(&s.attendance_rate_percent));
        }
    }

    #[test]
    fn stats_are_ordered_by_folded_name() {
        let students = [
            student("s1", "Érica"),
            student("s2", "ana"),
            student("s3", "Átila"),
            student("s4", "Bruno"),
        ];
        let stats = compute_attendance_stats(&students, &[]);
        let names: Vec<&str> = stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["ana", "Átila", "Bruno", "Érica"]);
    }

    #[test]
    fn at_risk_boundaries_are_strict() {
        let students = [student("s1", "Ana"), student("s2", "Bruno")];
        // Ana: average exactly 5.0, rate exactly 75% -> not at risk.
        let grades = [grade("s1", "Matemática", 4.0), grade("s1", "Matemática", 6.0)];
        let attendances = [
            att("s1", "p1", AttendanceStatus::Present),
            att("s1", "p2", AttendanceStatus::Present),
            att("s1", "p3", AttendanceStatus::Present),
            att("s1", "p4", AttendanceStatus::Absent),
        ];
        let risk = compute_at_risk_students(&students, &grades, &attendances);
        // Bruno has no grades at all -> average 0 -> at risk.
        assert_eq!(risk.len(), 1);
        assert_eq!(risk[0].name, "Bruno");
        assert_eq!(risk[0].average_grade, 0.0);
        assert_eq!(risk[0].attendance_rate_percent, 100.0);
    }

    #[test]
    fn at_risk_uses_unrounded_average() {
        // 4.99 would display as 5.0 after one-decimal rounding, but the
        // threshold must see the raw value.
        let students = [student("s1", "Ana")];
        let grades = [grade("s1", "Matemática", 4.99)];
        let risk = compute_at_risk_students(&students, &grades, &[]);
        assert_eq!(risk.len(), 1);
        assert!(risk[0].average_grade < 5.0);
        assert_eq!(round_off_1_decimal(risk[0].average_grade), 5.0);
    }

    #[test]
    fn at_risk_keeps_roster_order() {
        let students = [
            student("s1", "Zeca"),
            student("s2", "Ana"),
            student("s3", "Mia"),
        ];
        let risk = compute_at_risk_students(&students, &[], &[]);
        let names: Vec<&str> = risk.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Zeca", "Ana", "Mia"]);
    }

    #[test]
    fn subjects_come_from_roster_in_first_appearance_order() {
        let teachers = [
            teacher("t1", "História", Weekday::Monday, Shift::First),
            teacher("t2", "Matemática", Weekday::Monday, Shift::Second),
            teacher("t3", "História", Weekday::Tuesday, Shift::First),
        ];
        assert_eq!(
            distinct_subjects(&teachers),
            vec!["História".to_string(), "Matemática".to_string()]
        );
    }

    #[test]
    fn subject_average_of_ten_and_four_is_seven() {
        let students = [student("s1", "Ana")];
        let grades = [grade("s1", "Matemática", 10.0), grade("s1", "Matemática", 4.0)];
        let subjects = vec!["Matemática".to_string()];
        let rows = compute_subject_averages(&students, &grades, &subjects);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].per_subject[0].average, Some(7.0));
        assert_eq!(rows[0].overall_average, 7.0);
    }

    #[test]
    fn missing_subject_is_none_not_zero() {
        let students = [student("s1", "Ana")];
        let grades = [grade("s1", "História", 8.0)];
        let subjects = vec!["História".to_string(), "Matemática".to_string()];
        let rows = compute_subject_averages(&students, &grades, &subjects);
        assert_eq!(rows[0].per_subject[0].average, Some(8.0));
        assert_eq!(rows[0].per_subject[1].average, None);
        assert_eq!(rows[0].overall_average, 8.0);
    }

    #[test]
    fn overall_average_ignores_subject_grouping() {
        // A grade in a subject absent from the roster still counts overall.
        let students = [student("s1", "Ana")];
        let grades = [grade("s1", "História", 10.0), grade("s1", "Artes", 2.0)];
        let subjects = vec!["História".to_string()];
        let rows = compute_subject_averages(&students, &grades, &subjects);
        assert_eq!(rows[0].per_subject[0].average, Some(10.0));
        assert_eq!(rows[0].overall_average, 6.0);
    }

    #[test]
    fn consolidated_placeholder_only_when_empty() {
        let empty = compute_consolidated_attendance(&[]);
        assert_eq!(empty.present_total, 0);
        assert_eq!(empty.absent_total, 0);
        assert_eq!(empty.display_present_total, 1);

        let only_absent =
            compute_consolidated_attendance(&[att("s1", "p1", AttendanceStatus::Absent)]);
        assert_eq!(only_absent.present_total, 0);
        assert_eq!(only_absent.absent_total, 1);
        assert_eq!(only_absent.display_present_total, 0);
    }

    #[test]
    fn totals_count_distinct_recorded_sessions() {
        let students = [student("s1", "Ana"), student("s2", "Bruno")];
        let teachers = [teacher("t1", "História", Weekday::Monday, Shift::First)];
        let attendances = [
            att("s1", "p1", AttendanceStatus::Present),
            att("s2", "p1", AttendanceStatus::Absent),
            att("s1", "p2", AttendanceStatus::Present),
        ];
        let totals = compute_totals(&students, &teachers, &attendances);
        assert_eq!(totals.student_count, 2);
        assert_eq!(totals.teacher_count, 1);
        assert_eq!(totals.recorded_session_count, 2);
    }
}
