//! Python bindings (feature `python`).

use chrono::NaiveDate;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::models::{Dependency, DependencyType, Task};
use crate::{advisor, critical_path, cycles, dates, dependents, ScheduleConfig, ScheduleMode};

/// A task as seen from Python.
#[pyclass(name = "TaskSpec")]
#[derive(Clone, Debug)]
pub struct PyTask {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub duration: u32,
    #[pyo3(get, set)]
    pub start_date: Option<NaiveDate>,
    #[pyo3(get, set)]
    pub due_date: Option<NaiveDate>,
}

#[pymethods]
impl PyTask {
    #[new]
    #[pyo3(signature = (id, duration, start_date=None, due_date=None))]
    fn new(
        id: String,
        duration: u32,
        start_date: Option<NaiveDate>,
        due_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            duration,
            start_date,
            due_date,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "TaskSpec(id={:?}, duration={}, start={:?}, due={:?})",
            self.id, self.duration, self.start_date, self.due_date
        )
    }
}

impl From<&PyTask> for Task {
    fn from(t: &PyTask) -> Self {
        Task {
            id: t.id.clone(),
            duration: t.duration,
            start_date: t.start_date,
            due_date: t.due_date,
        }
    }
}

/// A dependency as seen from Python. `kind` accepts "FS", "finish_to_start", etc.
#[pyclass(name = "DependencySpec")]
#[derive(Clone, Debug)]
pub struct PyDependency {
    #[pyo3(get, set)]
    pub predecessor_id: String,
    #[pyo3(get, set)]
    pub successor_id: String,
    #[pyo3(get, set)]
    pub kind: String,
    #[pyo3(get, set)]
    pub lag: i64,
}

#[pymethods]
impl PyDependency {
    #[new]
    #[pyo3(signature = (predecessor_id, successor_id, kind=None, lag=0))]
    fn new(
        predecessor_id: String,
        successor_id: String,
        kind: Option<String>,
        lag: i64,
    ) -> PyResult<Self> {
        let kind = kind.unwrap_or_else(|| "FinishToStart".to_string());
        if DependencyType::parse(&kind).is_none() {
            return Err(PyValueError::new_err(format!(
                "Unknown dependency type: {}",
                kind
            )));
        }
        Ok(Self {
            predecessor_id,
            successor_id,
            kind,
            lag,
        })
    }

    fn __repr__(&self) -> String {
        format!(
            "DependencySpec({:?} -> {:?}, kind={}, lag={})",
            self.predecessor_id, self.successor_id, self.kind, self.lag
        )
    }
}

impl PyDependency {
    fn to_dependency(&self) -> PyResult<Dependency> {
        let kind = DependencyType::parse(&self.kind).ok_or_else(|| {
            PyValueError::new_err(format!("Unknown dependency type: {}", self.kind))
        })?;
        Ok(Dependency::new(
            self.predecessor_id.clone(),
            self.successor_id.clone(),
            kind,
            self.lag,
        ))
    }
}

/// Critical path summary returned to Python.
#[pyclass(name = "CriticalPathSummary")]
#[derive(Clone, Debug)]
pub struct PyCriticalPathSummary {
    #[pyo3(get)]
    pub critical_path: Vec<String>,
    #[pyo3(get)]
    pub critical_duration: i64,
    #[pyo3(get)]
    pub slack_by_task: HashMap<String, i64>,
}

#[pymethods]
impl PyCriticalPathSummary {
    fn __repr__(&self) -> String {
        format!(
            "CriticalPathSummary(duration={}, critical_path={:?})",
            self.critical_duration, self.critical_path
        )
    }
}

fn convert(tasks: &[PyTask], dependencies: &[PyDependency]) -> PyResult<(Vec<Task>, Vec<Dependency>)> {
    let tasks = tasks.iter().map(Task::from).collect();
    let dependencies = dependencies
        .iter()
        .map(PyDependency::to_dependency)
        .collect::<PyResult<Vec<_>>>()?;
    Ok((tasks, dependencies))
}

/// Compute the critical path.
///
/// # Raises
/// * ValueError if a circular dependency is detected (unless best_effort=True)
#[pyfunction]
#[pyo3(signature = (tasks, dependencies, best_effort=false))]
fn calculate_critical_path(
    tasks: Vec<PyTask>,
    dependencies: Vec<PyDependency>,
    best_effort: bool,
) -> PyResult<PyCriticalPathSummary> {
    let (tasks, dependencies) = convert(&tasks, &dependencies)?;
    let mode = if best_effort {
        ScheduleMode::BestEffort
    } else {
        ScheduleMode::Strict
    };
    let config = ScheduleConfig::default().with_mode(mode);

    match critical_path::compute_schedule(&tasks, &dependencies, &config) {
        Ok(result) => {
            let summary = result.summary();
            Ok(PyCriticalPathSummary {
                critical_path: summary.critical_path,
                critical_duration: summary.critical_duration,
                slack_by_task: summary.slack_by_task.into_iter().collect(),
            })
        }
        Err(e) => Err(PyValueError::new_err(e.to_string())),
    }
}

#[pyfunction]
fn has_circular_dependency(tasks: Vec<PyTask>, dependencies: Vec<PyDependency>) -> PyResult<bool> {
    let (tasks, dependencies) = convert(&tasks, &dependencies)?;
    Ok(cycles::has_circular_dependency(&tasks, &dependencies))
}

#[pyfunction]
fn would_create_cycle(
    tasks: Vec<PyTask>,
    dependencies: Vec<PyDependency>,
    candidate: PyDependency,
) -> PyResult<bool> {
    let (tasks, dependencies) = convert(&tasks, &dependencies)?;
    let candidate = candidate.to_dependency()?;
    Ok(cycles::would_create_cycle(&tasks, &dependencies, &candidate))
}

/// Returns (start_date, end_date).
#[pyfunction]
fn calculate_task_dates(
    task: PyTask,
    tasks: Vec<PyTask>,
    dependencies: Vec<PyDependency>,
    project_start: NaiveDate,
) -> PyResult<(NaiveDate, NaiveDate)> {
    let (tasks, dependencies) = convert(&tasks, &dependencies)?;
    let computed =
        dates::calculate_task_dates(&Task::from(&task), &tasks, &dependencies, project_start);
    Ok((computed.start_date, computed.end_date))
}

/// Returns (valid, errors).
#[pyfunction]
fn validate_task_dates(
    task: PyTask,
    tasks: Vec<PyTask>,
    dependencies: Vec<PyDependency>,
) -> PyResult<(bool, Vec<String>)> {
    let (tasks, dependencies) = convert(&tasks, &dependencies)?;
    let report = dates::validate_task_dates(&Task::from(&task), &tasks, &dependencies);
    Ok((report.valid, report.errors))
}

#[pyfunction]
fn get_dependent_tasks(task_id: String, dependencies: Vec<PyDependency>) -> PyResult<Vec<String>> {
    let (_, dependencies) = convert(&[], &dependencies)?;
    Ok(dependents::get_dependent_tasks(&task_id, &dependencies))
}

/// Returns a list of (type, description, impact, task_ids).
#[pyfunction]
#[pyo3(signature = (tasks, dependencies, reallocation_slack_threshold=5))]
fn suggest_optimizations(
    tasks: Vec<PyTask>,
    dependencies: Vec<PyDependency>,
    reallocation_slack_threshold: i64,
) -> PyResult<Vec<(String, String, String, Vec<String>)>> {
    let (tasks, dependencies) = convert(&tasks, &dependencies)?;
    let config =
        ScheduleConfig::default().with_reallocation_slack_threshold(reallocation_slack_threshold);

    let suggestions = advisor::suggest_optimizations(&tasks, &dependencies, &config)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    Ok(suggestions
        .into_iter()
        .map(|s| {
            let kind = match s.kind {
                advisor::SuggestionType::Parallelization => "parallelization",
                advisor::SuggestionType::ResourceReallocation => "resource_reallocation",
            };
            let impact = match s.impact {
                advisor::Impact::Low => "low",
                advisor::Impact::Medium => "medium",
            };
            (kind.to_string(), s.description, impact.to_string(), s.task_ids)
        })
        .collect())
}

/// The cpm_scheduler Python module.
#[pymodule]
fn cpm_scheduler(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTask>()?;
    m.add_class::<PyDependency>()?;
    m.add_class::<PyCriticalPathSummary>()?;

    m.add_function(wrap_pyfunction!(calculate_critical_path, m)?)?;
    m.add_function(wrap_pyfunction!(has_circular_dependency, m)?)?;
    m.add_function(wrap_pyfunction!(would_create_cycle, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_task_dates, m)?)?;
    m.add_function(wrap_pyfunction!(validate_task_dates, m)?)?;
    m.add_function(wrap_pyfunction!(get_dependent_tasks, m)?)?;
    m.add_function(wrap_pyfunction!(suggest_optimizations, m)?)?;

    Ok(())
}
