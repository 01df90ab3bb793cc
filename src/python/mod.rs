use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use crate::calendar::{store, BusinessCalendar, CalendarProvider, HolidayRegion, HolidaySet, WeekendHolidayProvider};
use crate::core::{parse_date, parse_instant, Error};
use crate::sla::{BusinessHoursCalculator, BusinessWindow, Priority, SlaPolicy};
use std::path::Path;

fn to_py_err(err: Error) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn date_arg(raw: &str) -> PyResult<chrono::NaiveDate> {
    parse_date(raw).ok_or_else(|| PyValueError::new_err(format!("invalid date `{}`", raw)))
}

// --- Calendar Bindings ---

#[pyclass(name = "BusinessCalendar")]
pub struct PyBusinessCalendar {
    inner: BusinessCalendar,
}

#[pymethods]
impl PyBusinessCalendar {
    #[staticmethod]
    fn load(path: String) -> PyResult<Self> {
        let inner = store::load(Path::new(&path)).map_err(to_py_err)?;
        Ok(PyBusinessCalendar { inner })
    }

    #[staticmethod]
    #[pyo3(signature = (start, end, region = "none"))]
    fn generate(start: &str, end: &str, region: &str) -> PyResult<Self> {
        let region = match region {
            "br" => HolidayRegion::Br,
            "none" => HolidayRegion::None,
            other => return Err(PyValueError::new_err(format!("unknown region `{}`", other))),
        };
        let provider = WeekendHolidayProvider::new(HolidaySet::for_region(region));
        let inner = provider
            .build(date_arg(start)?, date_arg(end)?)
            .map_err(to_py_err)?;
        Ok(PyBusinessCalendar { inner })
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn is_business_day(&self, date: &str) -> PyResult<bool> {
        Ok(self.inner.is_business_day(date_arg(date)?))
    }

    #[pyo3(signature = (created_at, resolved_at, start_hour = 0, end_hour = 24))]
    fn calculate_business_hours(
        &self,
        created_at: Option<&str>,
        resolved_at: Option<&str>,
        start_hour: u32,
        end_hour: u32,
    ) -> PyResult<f64> {
        let window = BusinessWindow::new(start_hour, end_hour).map_err(to_py_err)?;
        Ok(BusinessHoursCalculator::new(&self.inner, window).compute_str(created_at, resolved_at))
    }

    #[pyo3(signature = (created_at, resolved_at, priority, start_hour = 0, end_hour = 24))]
    fn check_sla_compliance<'py>(
        &self,
        py: Python<'py>,
        created_at: Option<&str>,
        resolved_at: Option<&str>,
        priority: &str,
        start_hour: u32,
        end_hour: u32,
    ) -> PyResult<&'py PyDict> {
        let window = BusinessWindow::new(start_hour, end_hour).map_err(to_py_err)?;
        let created = created_at.and_then(parse_instant);
        let resolved = resolved_at.and_then(parse_instant);

        let policy = SlaPolicy::default();
        let hours = BusinessHoursCalculator::new(&self.inner, window).compute(created, resolved);
        let expected = policy.expected_hours(&Priority::from(priority));
        let met = policy.verdict(hours, expected, created.is_some() && resolved.is_some());

        let result = PyDict::new(py);
        result.set_item("resolution_hours", hours)?;
        result.set_item("sla_expected_hours", expected)?;
        result.set_item("is_sla_met", met)?;
        Ok(result)
    }
}

// --- Module ---

#[pymodule]
fn bizhours_sla(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyBusinessCalendar>()?;
    Ok(())
}
