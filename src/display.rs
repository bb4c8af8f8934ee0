use std::path::{Path, PathBuf};

use tracing::info;

use crate::{
    BenchError,
    chart::{ChartPlan, render_views},
    sampler::{SampleObserver, SampleUpdate},
    series::Series,
};

/// Re-renders both chart views as samples arrive, or once at the end.
pub struct LiveDisplay {
    plan: ChartPlan,
    dir: PathBuf,
    incremental: bool,
    renders: usize,
}

impl LiveDisplay {
    pub fn new(plan: ChartPlan, dir: &Path, incremental: bool) -> Self {
        Self {
            plan,
            dir: dir.to_path_buf(),
            incremental,
            renders: 0,
        }
    }

    pub fn plan(&self) -> &ChartPlan {
        &self.plan
    }

    pub fn renders(&self) -> usize {
        self.renders
    }

    fn render(&mut self, series: &Series) -> Result<Vec<PathBuf>, BenchError> {
        let paths = render_views(&self.plan, series.points(), &self.dir)?;
        self.renders += 1;
        Ok(paths)
    }
}

impl SampleObserver for LiveDisplay {
    fn on_sample(&mut self, update: &SampleUpdate<'_>) -> Result<(), BenchError> {
        if self.incremental {
            self.render(update.series)?;
        }
        Ok(())
    }

    fn on_finish(&mut self, series: &Series) -> Result<(), BenchError> {
        let paths = self.render(series)?;
        info!(series = %series.name, charts = ?paths, "charts written");
        Ok(())
    }
}
