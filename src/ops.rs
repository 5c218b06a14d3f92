use crate::store::{
    Attendance, AttendanceStatus, Grade, LessonPlan, Shift, Student, Teacher, Weekday,
};
use chrono::NaiveDate;
use serde_json::json;

/// Rejection signal for a mutation. Never panics across this boundary; the
/// IPC layer decides how to surface it.
#[derive(Debug, Clone, PartialEq)]
pub enum OpError {
    SlotConflict {
        message: String,
        details: serde_json::Value,
    },
    Invalid {
        message: String,
    },
}

impl OpError {
    fn teacher_slot(day: Weekday, shift: Shift) -> Self {
        OpError::SlotConflict {
            message: format!(
                "o horário {} ({}) já está ocupado por outro docente",
                day.label(),
                shift.label()
            ),
            details: json!({ "dayOfWeek": day.label(), "shift": shift.label() }),
        }
    }

    fn lesson_slot(date: &str, shift: Shift) -> Self {
        OpError::SlotConflict {
            message: "já existe um planejamento lançado para esta data e horário".to_string(),
            details: json!({ "date": date, "shift": shift.label() }),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        OpError::Invalid {
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            OpError::SlotConflict { .. } => "slot_conflict",
            OpError::Invalid { .. } => "invalid_input",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            OpError::SlotConflict { message, .. } => message,
            OpError::Invalid { message } => message,
        }
    }

    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            OpError::SlotConflict { details, .. } => Some(details.clone()),
            OpError::Invalid { .. } => None,
        }
    }
}

/// True iff any existing plan occupies (date, shift). Exact equality on the
/// stored date string, no range tolerance.
pub fn is_lesson_slot_taken(plans: &[LessonPlan], date: &str, shift: Shift) -> bool {
    plans.iter().any(|p| p.date == date && p.shift == shift)
}

/// True iff a teacher other than `exclude_teacher_id` occupies (day, shift).
/// Editing a teacher passes their own id so re-saving into the same slot is
/// allowed.
pub fn is_teacher_slot_taken(
    teachers: &[Teacher],
    day: Weekday,
    shift: Shift,
    exclude_teacher_id: Option<&str>,
) -> bool {
    teachers.iter().any(|t| {
        t.day_of_week == day && t.shift == shift && Some(t.id.as_str()) != exclude_teacher_id
    })
}

pub fn create_student(students: &[Student], student: Student) -> Vec<Student> {
    let mut next = students.to_vec();
    next.push(student);
    next
}

/// Full-field replacement by id; an unknown id leaves the roster unchanged.
pub fn update_student(students: &[Student], student: Student) -> Vec<Student> {
    students
        .iter()
        .map(|s| {
            if s.id == student.id {
                student.clone()
            } else {
                s.clone()
            }
        })
        .collect()
}

pub fn delete_student(students: &[Student], id: &str) -> Vec<Student> {
    students.iter().filter(|s| s.id != id).cloned().collect()
}

pub fn create_teacher(teachers: &[Teacher], teacher: Teacher) -> Result<Vec<Teacher>, OpError> {
    if is_teacher_slot_taken(teachers, teacher.day_of_week, teacher.shift, None) {
        return Err(OpError::teacher_slot(teacher.day_of_week, teacher.shift));
    }
    let mut next = teachers.to_vec();
    next.push(teacher);
    Ok(next)
}

pub fn update_teacher(teachers: &[Teacher], teacher: Teacher) -> Result<Vec<Teacher>, OpError> {
    if is_teacher_slot_taken(
        teachers,
        teacher.day_of_week,
        teacher.shift,
        Some(teacher.id.as_str()),
    ) {
        return Err(OpError::teacher_slot(teacher.day_of_week, teacher.shift));
    }
    Ok(teachers
        .iter()
        .map(|t| {
            if t.id == teacher.id {
                teacher.clone()
            } else {
                t.clone()
            }
        })
        .collect())
}

pub fn delete_teacher(teachers: &[Teacher], id: &str) -> Vec<Teacher> {
    teachers.iter().filter(|t| t.id != id).cloned().collect()
}

/// New plans are prepended: the timeline lists most-recent-first regardless of
/// the date value.
pub fn create_lesson_plan(
    plans: &[LessonPlan],
    plan: LessonPlan,
) -> Result<Vec<LessonPlan>, OpError> {
    if plan.teacher_id.trim().is_empty() {
        return Err(OpError::invalid("selecione um professor"));
    }
    if NaiveDate::parse_from_str(&plan.date, "%Y-%m-%d").is_err() {
        return Err(OpError::invalid(format!(
            "data inválida: {:?} (esperado AAAA-MM-DD)",
            plan.date
        )));
    }
    if is_lesson_slot_taken(plans, &plan.date, plan.shift) {
        return Err(OpError::lesson_slot(&plan.date, plan.shift));
    }
    let mut next = Vec::with_capacity(plans.len() + 1);
    next.push(plan);
    next.extend(plans.iter().cloned());
    Ok(next)
}

/// Removal only. Attendance records referencing the plan are left behind and
/// must resolve to "unknown" downstream.
pub fn delete_lesson_plan(plans: &[LessonPlan], id: &str) -> Vec<LessonPlan> {
    plans.iter().filter(|p| p.id != id).cloned().collect()
}

/// Upsert by (student_id, lesson_plan_id): any prior record for the pair is
/// dropped and the new one is appended last.
pub fn set_attendance(
    attendances: &[Attendance],
    student_id: &str,
    lesson_plan_id: &str,
    status: AttendanceStatus,
) -> Vec<Attendance> {
    let mut next: Vec<Attendance> = attendances
        .iter()
        .filter(|a| !(a.student_id == student_id && a.lesson_plan_id == lesson_plan_id))
        .cloned()
        .collect();
    next.push(Attendance {
        student_id: student_id.to_string(),
        lesson_plan_id: lesson_plan_id.to_string(),
        status,
    });
    next
}

pub fn create_grade(grades: &[Grade], grade: Grade) -> Result<Vec<Grade>, OpError> {
    if grade.student_id.trim().is_empty() {
        return Err(OpError::invalid("selecione um estudante"));
    }
    if grade.subject.trim().is_empty() {
        return Err(OpError::invalid("selecione uma matéria"));
    }
    if !grade.value.is_finite() || !(0.0..=10.0).contains(&grade.value) {
        return Err(OpError::invalid("a nota deve estar entre 0 e 10"));
    }
    let mut next = grades.to_vec();
    next.push(grade);
    Ok(next)
}

pub fn delete_grade(grades: &[Grade], id: &str) -> Vec<Grade> {
    grades.iter().filter(|g| g.id != id).cloned().collect()
}
