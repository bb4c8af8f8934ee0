//! Linear and log-log SVG timing charts.
//!
//! The benchmarked candidate is drawn solid; every series already in the store
//! is drawn dashed in the colour it was first given.

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use serde::Serialize;

use crate::{
    BenchError,
    series::{SamplePoint, SeriesStore},
};

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 400;

const LOG_FLOOR: f64 = 1e-6;

/// Category10.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ChartView {
    Linear,
    LogLog,
}

impl ChartView {
    pub const ALL: [ChartView; 2] = [ChartView::Linear, ChartView::LogLog];

    pub fn file_name(self) -> &'static str {
        match self {
            ChartView::Linear => "linear.svg",
            ChartView::LogLog => "loglog.svg",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartView::Linear => "Timing (linear)",
            ChartView::LogLog => "Timing (log)",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinePlan {
    pub name: String,
    pub color_index: usize,
    pub style: LineStyle,
    pub points: Vec<SamplePoint>,
}

impl LinePlan {
    pub fn color(&self) -> RGBColor {
        PALETTE[self.color_index % PALETTE.len()]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartPlan {
    pub references: Vec<LinePlan>,
    pub current: LinePlan,
}

impl ChartPlan {
    /// Snapshots the store as reference lines and assigns the current line its colour.
    pub fn build(store: &SeriesStore, current: &str) -> Self {
        let references: Vec<LinePlan> = store
            .iter()
            .enumerate()
            .map(|(idx, series)| LinePlan {
                name: series.name.clone(),
                color_index: idx,
                style: LineStyle::Dashed,
                points: series.points().to_vec(),
            })
            .collect();
        let color_index = store.position(current).unwrap_or(references.len());
        Self {
            references,
            current: LinePlan {
                name: current.to_string(),
                color_index,
                style: LineStyle::Solid,
                points: Vec::new(),
            },
        }
    }

    fn max_size(&self, current: &[SamplePoint]) -> u64 {
        self.references
            .iter()
            .flat_map(|line| line.points.iter())
            .chain(current.iter())
            .map(|p| p.size)
            .max()
            .unwrap_or(1)
    }

    fn max_seconds(&self, current: &[SamplePoint]) -> f64 {
        self.references
            .iter()
            .flat_map(|line| line.points.iter())
            .chain(current.iter())
            .map(|p| p.seconds)
            .fold(0.0, f64::max)
    }
}

/// Count label in the `1.5 k` style.
pub fn format_count(value: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "t"), (1e9, "b"), (1e6, "m"), (1e3, "k")];
    let (scaled, suffix) = UNITS
        .iter()
        .find(|(scale, _)| value.abs() >= *scale)
        .map(|(scale, suffix)| (value / scale, *suffix))
        .unwrap_or((value, ""));
    let rounded = (scaled * 10.0).round() / 10.0;
    let number = if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    };
    if suffix.is_empty() {
        number
    } else {
        format!("{number} {suffix}")
    }
}

pub fn render_chart(
    plan: &ChartPlan,
    current: &[SamplePoint],
    view: ChartView,
    path: &Path,
) -> Result<(), BenchError> {
    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let x_max = (plan.max_size(current) as f64).max(10.0);
    let y_max = plan.max_seconds(current).max(1.0);
    match view {
        ChartView::Linear => {
            let mut chart = chart_builder(&root, view)
                .build_cartesian_2d(0f64..x_max * 1.05, 0f64..y_max)
                .map_err(render_err)?;
            chart
                .configure_mesh()
                .x_desc("Primes")
                .y_desc("Seconds")
                .x_label_formatter(&|x| format_count(*x))
                .y_label_formatter(&|y| format!("{y:.1}"))
                .draw()
                .map_err(render_err)?;
            draw_lines(&mut chart, plan, current, 0.0)?;
            draw_legend(&mut chart)?;
        }
        ChartView::LogLog => {
            let mut chart = chart_builder(&root, view)
                .build_cartesian_2d(
                    (1f64..x_max * 1.5).log_scale(),
                    (LOG_FLOOR..y_max).log_scale(),
                )
                .map_err(render_err)?;
            chart
                .configure_mesh()
                .x_desc("Primes")
                .y_desc("Seconds")
                .x_label_formatter(&|x| format_count(*x))
                .y_label_formatter(&|y| format!("{y:.0e}"))
                .draw()
                .map_err(render_err)?;
            draw_lines(&mut chart, plan, current, LOG_FLOOR)?;
            draw_legend(&mut chart)?;
        }
    }
    root.present().map_err(render_err)?;
    Ok(())
}

/// Writes both views into `dir` and returns the file paths.
pub fn render_views(
    plan: &ChartPlan,
    current: &[SamplePoint],
    dir: &Path,
) -> Result<Vec<PathBuf>, BenchError> {
    std::fs::create_dir_all(dir)?;
    ChartView::ALL
        .iter()
        .map(|view| {
            let path = dir.join(view.file_name());
            render_chart(plan, current, *view, &path)?;
            Ok(path)
        })
        .collect()
}

/// Removes rendered charts from `dir`, ignoring files that are not there.
pub fn clear_views(dir: &Path) -> Result<(), BenchError> {
    for view in ChartView::ALL {
        match std::fs::remove_file(dir.join(view.file_name())) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn chart_builder<'a, 'b>(
    root: &'a DrawingArea<SVGBackend<'b>, Shift>,
    view: ChartView,
) -> ChartBuilder<'a, 'b, SVGBackend<'b>> {
    let mut builder = ChartBuilder::on(root);
    builder
        .caption(view.title(), ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60);
    builder
}

fn draw_lines<'a, 'b: 'a, X, Y>(
    chart: &mut ChartContext<'a, SVGBackend<'b>, Cartesian2d<X, Y>>,
    plan: &ChartPlan,
    current: &[SamplePoint],
    floor: f64,
) -> Result<(), BenchError>
where
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    let coords = |points: &[SamplePoint]| -> Vec<(f64, f64)> {
        points
            .iter()
            .filter(|p| p.seconds >= floor)
            .map(|p| (p.size as f64, p.seconds))
            .collect()
    };
    for line in &plan.references {
        let data = coords(&line.points);
        let color = line.color();
        chart
            .draw_series(DashedLineSeries::new(
                data.clone(),
                6,
                4,
                color.stroke_width(2),
            ))
            .map_err(render_err)?
            .label(line.name.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart
            .draw_series(data.into_iter().map(|p| Circle::new(p, 3, color.filled())))
            .map_err(render_err)?;
    }
    let data = coords(current);
    let color = plan.current.color();
    chart
        .draw_series(LineSeries::new(data.clone(), color.stroke_width(2)))
        .map_err(render_err)?
        .label(plan.current.name.clone())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    chart
        .draw_series(data.into_iter().map(|p| Circle::new(p, 3, color.filled())))
        .map_err(render_err)?;
    Ok(())
}

fn draw_legend<'a, 'b: 'a, X, Y>(
    chart: &mut ChartContext<'a, SVGBackend<'b>, Cartesian2d<X, Y>>,
) -> Result<(), BenchError>
where
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(&WHITE.mix(0.5))
        .border_style(&BLACK)
        .draw()
        .map_err(render_err)
}

fn render_err<E: std::fmt::Display>(err: E) -> BenchError {
    BenchError::render(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Series;

    fn series(name: &str, sizes: &[u64]) -> Series {
        let mut series = Series::new(name);
        for (i, &size) in sizes.iter().enumerate() {
            series
                .push(SamplePoint {
                    size,
                    seconds: 0.001 * (i + 1) as f64,
                })
                .unwrap();
        }
        series
    }

    #[test]
    fn test_empty_store_has_no_references() {
        let plan = ChartPlan::build(&SeriesStore::new(), "f");
        assert!(plan.references.is_empty());
        assert_eq!(plan.current.color_index, 0);
        assert_eq!(plan.current.style, LineStyle::Solid);
    }

    #[test]
    fn test_rerun_reuses_colour() {
        let mut store = SeriesStore::new();
        store.insert(series("a", &[1, 2]));
        store.insert(series("b", &[1, 2]));
        assert_eq!(ChartPlan::build(&store, "a").current.color_index, 0);
        assert_eq!(ChartPlan::build(&store, "b").current.color_index, 1);
        let fresh = ChartPlan::build(&store, "c");
        assert_eq!(fresh.current.color_index, 2);
        assert!(fresh.references.iter().all(|l| l.style == LineStyle::Dashed));
    }

    #[test]
    fn test_palette_wraps() {
        let line = LinePlan {
            name: "x".into(),
            color_index: 12,
            style: LineStyle::Solid,
            points: Vec::new(),
        };
        assert_eq!(line.color(), PALETTE[2]);
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(500.0), "500");
        assert_eq!(format_count(1000.0), "1 k");
        assert_eq!(format_count(1500.0), "1.5 k");
        assert_eq!(format_count(2_000_000.0), "2 m");
    }

    #[test]
    fn test_render_views_writes_svg() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SeriesStore::new();
        store.insert(series("old", &[1, 2, 5, 10]));
        let plan = ChartPlan::build(&store, "new");
        let current = series("new", &[1, 2, 5]);
        let paths = render_views(&plan, current.points(), dir.path()).unwrap();
        assert_eq!(paths.len(), 2);
        for path in &paths {
            let svg = std::fs::read_to_string(path).unwrap();
            assert!(svg.contains("<svg"));
        }
        clear_views(dir.path()).unwrap();
        assert!(paths.iter().all(|p| !p.exists()));
        clear_views(dir.path()).unwrap();
    }
}
