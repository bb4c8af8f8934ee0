use serde::{Deserialize, Serialize};

use crate::BenchError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub size: u64,
    pub seconds: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    points: Vec<SamplePoint>,
    #[serde(default)]
    frozen: bool,
}

impl Series {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
            frozen: false,
        }
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn sizes(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.size).collect()
    }

    pub fn push(&mut self, point: SamplePoint) -> Result<(), BenchError> {
        self.check_mutable()?;
        if let Some(last) = self.points.last() {
            if point.size <= last.size {
                return Err(BenchError::invalid_input(format!(
                    "size {} does not follow {} in series {}",
                    point.size, last.size, self.name
                )));
            }
        }
        self.points.push(point);
        Ok(())
    }

    /// Keeps the smaller of the recorded and the new time. Returns whether the point was lowered.
    pub fn improve(&mut self, index: usize, seconds: f64) -> Result<bool, BenchError> {
        self.check_mutable()?;
        let point = self.point_mut(index)?;
        if seconds < point.seconds {
            point.seconds = seconds;
            return Ok(true);
        }
        Ok(false)
    }

    /// Lowers every point from `index` onward by `delta`, for cumulative timings.
    pub fn lower_from(&mut self, index: usize, delta: f64) -> Result<(), BenchError> {
        self.check_mutable()?;
        if delta < 0.0 {
            return Err(BenchError::invalid_input("delta must not be negative"));
        }
        self.point_mut(index)?;
        for point in &mut self.points[index..] {
            point.seconds = (point.seconds - delta).max(0.0);
        }
        Ok(())
    }

    fn point_mut(&mut self, index: usize) -> Result<&mut SamplePoint, BenchError> {
        let len = self.points.len();
        self.points.get_mut(index).ok_or_else(|| {
            BenchError::invalid_input(format!("point {index} out of range for {len} points"))
        })
    }

    fn check_mutable(&self) -> Result<(), BenchError> {
        if self.frozen {
            return Err(BenchError::invalid_input(format!(
                "series {} is frozen",
                self.name
            )));
        }
        Ok(())
    }
}

/// Series kept in first-benchmarked order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesStore {
    series: Vec<Series>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.series.iter().position(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Series> {
        self.series.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }

    /// Replaces a series of the same name in place, otherwise appends.
    pub fn insert(&mut self, series: Series) {
        match self.position(&series.name) {
            Some(idx) => self.series[idx] = series,
            None => self.series.push(series),
        }
    }

    pub fn clear(&mut self) {
        self.series.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(size: u64, seconds: f64) -> SamplePoint {
        SamplePoint { size, seconds }
    }

    #[test]
    fn test_push_rejects_non_increasing_size() {
        let mut series = Series::new("f");
        series.push(point(1, 0.1)).unwrap();
        series.push(point(2, 0.2)).unwrap();
        assert!(series.push(point(2, 0.3)).is_err());
        assert!(series.push(point(1, 0.3)).is_err());
        assert_eq!(series.sizes(), vec![1, 2]);
    }

    #[test]
    fn test_improve_keeps_best_time() {
        let mut series = Series::new("f");
        series.push(point(1, 0.5)).unwrap();
        assert!(!series.improve(0, 0.7).unwrap());
        assert!(series.improve(0, 0.2).unwrap());
        assert_eq!(series.points()[0].seconds, 0.2);
    }

    #[test]
    fn test_lower_from_shifts_tail() {
        let mut series = Series::new("f");
        for (size, secs) in [(1, 0.1), (2, 0.3), (5, 0.6)] {
            series.push(point(size, secs)).unwrap();
        }
        series.lower_from(1, 0.05).unwrap();
        let secs: Vec<f64> = series.points().iter().map(|p| p.seconds).collect();
        assert_eq!(secs[0], 0.1);
        assert!((secs[1] - 0.25).abs() < 1e-12);
        assert!((secs[2] - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_frozen_series_rejects_mutation() {
        let mut series = Series::new("f");
        series.push(point(1, 0.1)).unwrap();
        series.freeze();
        assert!(series.push(point(2, 0.1)).is_err());
        assert!(series.improve(0, 0.0).is_err());
    }

    #[test]
    fn test_store_replaces_in_place() {
        let mut store = SeriesStore::new();
        store.insert(Series::new("a"));
        store.insert(Series::new("b"));
        let mut again = Series::new("a");
        again.push(point(1, 0.1)).unwrap();
        store.insert(again);
        assert_eq!(store.names(), vec!["a", "b"]);
        assert_eq!(store.get("a").map(Series::len), Some(1));
        store.clear();
        assert!(store.is_empty());
    }
}
