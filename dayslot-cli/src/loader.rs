//! Load a day plan from disk.
//!
//! JSON: an array of task objects (fields as in `dayslot_core::Task`).
//!
//! CSV: a header row, then one task per row:
//! id,description,duration,dependencies,strict_start,w1,w2,w3,w4,multitask
//! with `dependencies` separated by `;` (empty for none).

use anyhow::{Context, Result, bail};
use dayslot_core::{Minutes, Task, TaskId, ValueDimensions};
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::Path;

// Blank cells deserialize as `None` and fall back to the task defaults.
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: TaskId,
    description: String,
    duration: Minutes,
    #[serde(default)]
    dependencies: String,
    #[serde(default)]
    strict_start: Option<Minutes>,
    #[serde(default)]
    w1: Option<i32>,
    #[serde(default)]
    w2: Option<i32>,
    #[serde(default)]
    w3: Option<i32>,
    #[serde(default)]
    w4: Option<i32>,
    #[serde(default)]
    multitask: Option<bool>,
}

impl CsvRow {
    fn into_task(self) -> Result<Task> {
        let deps = parse_dependency_list(&self.dependencies)
            .with_context(|| format!("task {}: dependencies", self.id))?;
        Ok(Task::new(self.id, self.description, self.duration)
            .with_dependencies(deps)
            .with_value_dimensions(ValueDimensions::new(
                self.strict_start.unwrap_or_default(),
                self.w1.unwrap_or_default(),
                self.w2.unwrap_or_default(),
                self.w3.unwrap_or_default(),
                self.w4.unwrap_or_default(),
            ))
            .with_multitask(self.multitask.unwrap_or_default()))
    }
}

fn parse_dependency_list(s: &str) -> Result<Vec<TaskId>> {
    s.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<TaskId>()
                .map_err(|e| anyhow::anyhow!("invalid task id '{p}': {e}"))
        })
        .collect()
}

pub fn load_tasks(path: impl AsRef<Path>) -> Result<Vec<Task>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("json") => {
            let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            parse_tasks_json(&s).with_context(|| format!("parsing {}", path.display()))
        }
        Some("csv") => {
            let f = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
            parse_tasks_csv(f).with_context(|| format!("parsing {}", path.display()))
        }
        _ => bail!(
            "unsupported task file {} (expected .json or .csv)",
            path.display()
        ),
    }
}

pub fn parse_tasks_json(s: &str) -> Result<Vec<Task>> {
    Ok(serde_json::from_str(s)?)
}

pub fn parse_tasks_csv(reader: impl Read) -> Result<Vec<Task>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut tasks = Vec::new();
    for (line, result) in rdr.deserialize::<CsvRow>().enumerate() {
        // +2: header row and 1-based lines
        let row = result.with_context(|| format!("row {}", line + 2))?;
        tasks.push(row.into_task()?);
    }
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
id,description,duration,dependencies,strict_start,w1,w2,w3,w4,multitask
1,fry eggs,5,,0,0,0,0,0,false
2,heat bread,5,,0,0,0,0,0,false
3,enjoy the breakfast,10,1;2,520,0,1,0,1,true
";

    #[test]
    fn parses_csv_rows() {
        let tasks = parse_tasks_csv(CSV.as_bytes()).unwrap();
        assert_eq!(tasks.len(), 3);

        let breakfast = &tasks[2];
        assert_eq!(breakfast.id, 3);
        assert_eq!(breakfast.duration, 10);
        assert!(breakfast.multitask);
        assert_eq!(breakfast.dependencies.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(breakfast.value_dimensions, ValueDimensions::new(520, 0, 1, 0, 1));
        assert!(tasks[0].dependencies.is_empty());
    }

    #[test]
    fn blank_optional_cells_use_defaults() {
        let csv = "\
id,description,duration,dependencies,strict_start,w1,w2,w3,w4,multitask
1,stretch,5,,,,,,,
2,coffee,10,1,,1,,,,true
";
        let tasks = parse_tasks_csv(csv.as_bytes()).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].value_dimensions, ValueDimensions::default());
        assert!(!tasks[0].multitask);
        assert_eq!(tasks[1].value_dimensions, ValueDimensions::new(0, 1, 0, 0, 0));
        assert!(tasks[1].multitask);
    }

    #[test]
    fn rejects_bad_dependency_ids() {
        let csv = "id,description,duration,dependencies\n1,a,5,x;2\n";
        let err = parse_tasks_csv(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid task id 'x'"));
    }

    #[test]
    fn parses_json_tasks() {
        let tasks = parse_tasks_json(
            r#"[{"id": 1, "description": "a", "duration": 5},
                {"id": 2, "description": "b", "duration": 10, "dependencies": [1], "multitask": true}]"#,
        )
        .unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks[1].multitask);
        assert!(tasks[1].dependencies.contains(&1));
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let err = load_tasks("plan.yaml").unwrap_err();
        assert!(err.to_string().contains("unsupported task file"));
    }

    #[test]
    fn bundled_demo_files_load() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../demos");
        assert_eq!(load_tasks(root.join("seoul_day.json")).unwrap().len(), 16);
        assert_eq!(load_tasks(root.join("morning.csv")).unwrap().len(), 8);
    }
}
