use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SNAPSHOT_FILE: &str = "educontrol.json";

/// Turnos fixed by the school day: first or second period block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    #[serde(rename = "1º Horário")]
    First,
    #[serde(rename = "2º Horário")]
    Second,
}

impl Shift {
    pub fn label(self) -> &'static str {
        match self {
            Shift::First => "1º Horário",
            Shift::Second => "2º Horário",
        }
    }
}

/// The six school days a teacher slot can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "Segunda-feira")]
    Monday,
    #[serde(rename = "Terça-feira")]
    Tuesday,
    #[serde(rename = "Quarta-feira")]
    Wednesday,
    #[serde(rename = "Quinta-feira")]
    Thursday,
    #[serde(rename = "Sexta-feira")]
    Friday,
    #[serde(rename = "Sábado")]
    Saturday,
}

impl Weekday {
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "Segunda-feira",
            Weekday::Tuesday => "Terça-feira",
            Weekday::Wednesday => "Quarta-feira",
            Weekday::Thursday => "Quinta-feira",
            Weekday::Friday => "Sexta-feira",
            Weekday::Saturday => "Sábado",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchoolingLevel {
    #[serde(rename = "Fundamental I")]
    FundamentalOne,
    #[serde(rename = "Fundamental II")]
    FundamentalTwo,
    #[serde(rename = "Ensino Médio")]
    EnsinoMedio,
    #[serde(rename = "Superior")]
    Superior,
}

/// Attendance status uses the dashboard's single-letter wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    #[serde(rename = "P")]
    Present,
    #[serde(rename = "F")]
    Absent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub cpf: String,
    pub dob: String,
    pub schooling: SchoolingLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub day_of_week: Weekday,
    pub shift: Shift,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlan {
    pub id: String,
    pub teacher_id: String,
    /// ISO `YYYY-MM-DD`; the slot key compares this string exactly.
    pub date: String,
    pub shift: Shift,
    pub description: String,
}

/// Keyed by (student_id, lesson_plan_id); at most one record per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub student_id: String,
    pub lesson_plan_id: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: String,
    pub student_id: String,
    pub subject: String,
    pub description: String,
    pub value: f64,
}

/// The whole-application snapshot. Mutations never edit in place: a handler
/// builds the replacement collection, swaps it in, and saves the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub lesson_plans: Vec<LessonPlan>,
    #[serde(default)]
    pub attendances: Vec<Attendance>,
    #[serde(default)]
    pub grades: Vec<Grade>,
    #[serde(default)]
    pub portal_url: Option<String>,
}

impl Snapshot {
    /// Validate an untrusted payload (workspace file or restored backup).
    /// Absent collection fields default to empty; present fields must hold
    /// well-formed records, closed enums included.
    pub fn from_value(value: serde_json::Value) -> anyhow::Result<Self> {
        if !value.is_object() {
            anyhow::bail!("snapshot payload must be a JSON object");
        }
        serde_json::from_value(value).context("snapshot payload failed shape validation")
    }

    pub fn from_slice(bytes: &[u8]) -> anyhow::Result<Self> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).context("snapshot payload is not valid JSON")?;
        Self::from_value(value)
    }
}

pub fn snapshot_path(workspace: &Path) -> PathBuf {
    workspace.join(SNAPSHOT_FILE)
}

/// Open a workspace directory and load its snapshot. A missing file means a
/// fresh workspace; an unreadable or malformed file degrades to the empty
/// default so the daemon always starts usable.
pub fn open_workspace(workspace: &Path) -> anyhow::Result<Snapshot> {
    std::fs::create_dir_all(workspace).with_context(|| {
        format!(
            "failed to create workspace {}",
            workspace.to_string_lossy()
        )
    })?;
    let path = snapshot_path(workspace);
    if !path.is_file() {
        return Ok(Snapshot::default());
    }
    let bytes = match std::fs::read(&path) {
        Ok(b) => b,
        Err(e) => {
            eprintln!(
                "educontrold: failed to read {}: {}; starting empty",
                path.to_string_lossy(),
                e
            );
            return Ok(Snapshot::default());
        }
    };
    match Snapshot::from_slice(&bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            eprintln!(
                "educontrold: {} is not a valid snapshot ({}); starting empty",
                path.to_string_lossy(),
                e
            );
            Ok(Snapshot::default())
        }
    }
}

/// Persist the snapshot. Written to a temp file first, then swapped in, so a
/// failed write never leaves a truncated workspace file behind.
pub fn save_snapshot(workspace: &Path, snapshot: &Snapshot) -> anyhow::Result<()> {
    let path = snapshot_path(workspace);
    let tmp = workspace.join(format!("{}.saving", SNAPSHOT_FILE));
    let payload = serde_json::to_vec(snapshot).context("failed to serialize snapshot")?;
    std::fs::write(&tmp, payload)
        .with_context(|| format!("failed to write {}", tmp.to_string_lossy()))?;
    std::fs::rename(&tmp, &path)
        .with_context(|| format!("failed to move snapshot to {}", path.to_string_lossy()))?;
    Ok(())
}
