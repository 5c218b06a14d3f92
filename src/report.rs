use crate::calc::{AttendanceStat, StudentAverages};
use crate::store::{LessonPlan, Teacher};
use serde::Serialize;

/// Fixed placeholder for "no data" cells. Rendering a zero here would conflate
/// "no grades" with "average of zero".
pub const NO_DATA: &str = "-";

/// Flat tabular model handed to the export collaborator. Row order and header
/// label order are preserved exactly as built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTable {
    pub report_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// General-attendance table, one row per student in the stats order (already
/// name-sorted by the aggregation).
pub fn attendance_report(stats: &[AttendanceStat]) -> ReportTable {
    ReportTable {
        report_name: "Frequencia_Geral_SME".to_string(),
        headers: vec![
            "Nome".to_string(),
            "Presencas".to_string(),
            "Faltas".to_string(),
            "Taxa_Frequencia".to_string(),
        ],
        rows: stats
            .iter()
            .map(|s| {
                vec![
                    s.name.clone(),
                    s.present_count.to_string(),
                    s.absent_count.to_string(),
                    format!("{:.1}%", s.attendance_rate_percent),
                ]
            })
            .collect(),
    }
}

/// Grade-averages table: one column per roster subject plus the overall
/// average, one row per student in the averages order.
pub fn grades_report(averages: &[StudentAverages], subjects: &[String]) -> ReportTable {
    let mut headers = Vec::with_capacity(subjects.len() + 2);
    headers.push("Nome".to_string());
    headers.extend(subjects.iter().cloned());
    headers.push("Média_Geral".to_string());

    let rows = averages
        .iter()
        .map(|s| {
            let mut row = Vec::with_capacity(subjects.len() + 2);
            row.push(s.name.clone());
            for per in &s.per_subject {
                row.push(match per.average {
                    Some(avg) => format!("{:.2}", avg),
                    None => NO_DATA.to_string(),
                });
            }
            row.push(format!("{:.2}", s.overall_average));
            row
        })
        .collect();

    ReportTable {
        report_name: "Relatorio_Notas_SME".to_string(),
        headers,
        rows,
    }
}

pub fn teachers_report(teachers: &[Teacher]) -> ReportTable {
    ReportTable {
        report_name: "Lista_Docentes_SME".to_string(),
        headers: vec![
            "Nome".to_string(),
            "Materia".to_string(),
            "Dia".to_string(),
            "Horario".to_string(),
        ],
        rows: teachers
            .iter()
            .map(|t| {
                vec![
                    t.name.clone(),
                    t.subject.clone(),
                    t.day_of_week.label().to_string(),
                    t.shift.label().to_string(),
                ]
            })
            .collect(),
    }
}

/// Timeline table in collection order (most-recent-first). A plan whose
/// teacher was deleted keeps its row; the teacher cells fall back to the
/// placeholder.
pub fn plans_report(plans: &[LessonPlan], teachers: &[Teacher]) -> ReportTable {
    ReportTable {
        report_name: "Planejamentos_SME".to_string(),
        headers: vec![
            "Data".to_string(),
            "Docente".to_string(),
            "Materia".to_string(),
            "Turno".to_string(),
            "Plano".to_string(),
        ],
        rows: plans
            .iter()
            .map(|p| {
                let teacher = teachers.iter().find(|t| t.id == p.teacher_id);
                vec![
                    p.date.clone(),
                    teacher.map(|t| t.name.clone()).unwrap_or_else(|| NO_DATA.to_string()),
                    teacher
                        .map(|t| t.subject.clone())
                        .unwrap_or_else(|| NO_DATA.to_string()),
                    p.shift.label().to_string(),
                    p.description.clone(),
                ]
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::SubjectAverage;
    use crate::store::{Shift, Weekday};

    fn stat(name: &str, present: usize, absent: usize, rate: f64) -> AttendanceStat {
        AttendanceStat {
            student_id: format!("s-{}", name),
            name: name.to_string(),
            total_sessions: present + absent,
            present_count: present,
            absent_count: absent,
            attendance_rate_percent: rate,
        }
    }

    #[test]
    fn attendance_report_keeps_order_and_formats_rate() {
        let table = attendance_report(&[
            stat("Ana", 3, 1, 75.0),
            stat("Bruno", 0, 0, 100.0),
        ]);
        assert_eq!(table.report_name, "Frequencia_Geral_SME");
        assert_eq!(
            table.headers,
            vec!["Nome", "Presencas", "Faltas", "Taxa_Frequencia"]
        );
        assert_eq!(table.rows[0], vec!["Ana", "3", "1", "75.0%"]);
        assert_eq!(table.rows[1], vec!["Bruno", "0", "0", "100.0%"]);
    }

    #[test]
    fn grades_report_renders_no_data_as_placeholder() {
        let subjects = vec!["História".to_string(), "Matemática".to_string()];
        let averages = vec![StudentAverages {
            student_id: "s1".to_string(),
            name: "Ana".to_string(),
            per_subject: vec![
                SubjectAverage {
                    subject: "História".to_string(),
                    average: Some(8.5),
                },
                SubjectAverage {
                    subject: "Matemática".to_string(),
                    average: None,
                },
            ],
            overall_average: 8.5,
        }];
        let table = grades_report(&averages, &subjects);
        assert_eq!(
            table.headers,
            vec!["Nome", "História", "Matemática", "Média_Geral"]
        );
        assert_eq!(table.rows[0], vec!["Ana", "8.50", "-", "8.50"]);
        // The sentinel must never collapse into a numeric zero.
        assert_ne!(table.rows[0][2], "0");
        assert_ne!(table.rows[0][2], "0.00");
    }

    #[test]
    fn plans_report_tolerates_dangling_teacher_reference() {
        let teachers = vec![Teacher {
            id: "t1".to_string(),
            name: "Carla".to_string(),
            subject: "Matemática".to_string(),
            day_of_week: Weekday::Monday,
            shift: Shift::First,
        }];
        let plans = vec![
            LessonPlan {
                id: "p1".to_string(),
                teacher_id: "t1".to_string(),
                date: "2024-03-10".to_string(),
                shift: Shift::First,
                description: "Frações".to_string(),
            },
            LessonPlan {
                id: "p2".to_string(),
                teacher_id: "t-gone".to_string(),
                date: "2024-03-11".to_string(),
                shift: Shift::Second,
                description: "Revisão".to_string(),
            },
        ];
        let table = plans_report(&plans, &teachers);
        assert_eq!(
            table.rows[0],
            vec!["2024-03-10", "Carla", "Matemática", "1º Horário", "Frações"]
        );
        assert_eq!(
            table.rows[1],
            vec!["2024-03-11", "-", "-", "2º Horário", "Revisão"]
        );
    }

    #[test]
    fn teachers_report_uses_wire_labels() {
        let table = teachers_report(&[Teacher {
            id: "t1".to_string(),
            name: "Carla".to_string(),
            subject: "Matemática".to_string(),
            day_of_week: Weekday::Saturday,
            shift: Shift::Second,
        }]);
        assert_eq!(table.headers, vec!["Nome", "Materia", "Dia", "Horario"]);
        assert_eq!(
            table.rows[0],
            vec!["Carla", "Matemática", "Sábado", "2º Horário"]
        );
    }
}
