//! Shared logic behind the REST handlers

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

use crate::dashboard::{
    render, render_drilldown, Dashboard, DashboardState, DrillDown, DrillDownSelection, Panel,
};
use crate::error::DashboardError;
use crate::filter::{resolve_range, DateRange};
use crate::join::JoinReport;
use crate::loader::Dataset;

/// Raw control values as they arrive from a request
#[derive(Debug, Clone, Default)]
pub struct Controls {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub category: Option<String>,
    pub state: Option<String>,
}

pub struct DashboardService {
    dataset: Arc<Dataset>,
}

impl DashboardService {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn bounds(&self) -> Option<DateRange> {
        self.dataset.bounds()
    }

    pub fn rows(&self) -> usize {
        self.dataset.len()
    }

    pub fn join_report(&self) -> &JoinReport {
        self.dataset.report()
    }

    fn state(&self, controls: Controls) -> Result<DashboardState, DashboardError> {
        let range = resolve_range(self.dataset.bounds(), controls.start, controls.end)?;
        Ok(DashboardState {
            range,
            selection: DrillDownSelection {
                category: controls.category,
                state: controls.state,
            },
        })
    }

    pub fn dashboard(&self, controls: Controls) -> Result<Dashboard, DashboardError> {
        let state = self.state(controls)?;
        debug!("Rendering dashboard for {:?}", state);
        render(&self.dataset, &state)
    }

    pub fn drilldown(&self, controls: Controls) -> Result<Panel<DrillDown>, DashboardError> {
        let state = self.state(controls)?;
        render_drilldown(&self.dataset, &state)
    }
}
