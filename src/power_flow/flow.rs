use itertools::izip;

use crate::domain::{Schedule, TimeSeriesInputs};

/// Net flow at the point of connection per interval (kW).
///
/// Sign convention: positive = export to the grid, negative = import.
/// `grid_flow[t] = solar[t] - load[t] + discharge[t] - charge[t]`
pub fn grid_flow_kw(inputs: &TimeSeriesInputs, schedule: &Schedule) -> Vec<f64> {
    izip!(
        inputs.solar_kw(),
        inputs.load_kw(),
        &schedule.discharge_kw,
        &schedule.charge_kw
    )
    .map(|(solar, load, discharge, charge)| solar - load + discharge - charge)
    .collect()
}
