use super::{OptimizerError, VariableLayout};
use crate::domain::Schedule;

/// Slices a solved variable vector back into named series.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleExtractor {
    layout: VariableLayout,
}

impl ScheduleExtractor {
    pub fn new(layout: VariableLayout) -> Self {
        Self { layout }
    }

    pub fn extract(&self, values: &[f64]) -> Result<Schedule, OptimizerError> {
        if values.len() != self.layout.len() {
            return Err(OptimizerError::Solver(format!(
                "solution has {} values, expected {}",
                values.len(),
                self.layout.len()
            )));
        }

        Ok(Schedule {
            charge_kw: values[self.layout.charge_range()].to_vec(),
            discharge_kw: values[self.layout.discharge_range()].to_vec(),
            soc_kwh: values[self.layout.soc_range()].to_vec(),
        })
    }
}
