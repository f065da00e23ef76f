//! NAV Chart Series
//!
//! Time-ordered NAV points prepared for plotting, plus a text sparkline for
//! terminal output.

use serde::Serialize;

use super::format::format_short_date;
use crate::loader::NavHistoryPoint;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub timestamp: u64,
    pub nav: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
    pub min: f64,
    pub max: f64,
}

impl ChartSeries {
    /// Build a series; a line needs at least two points
    pub fn from_history(history: &[NavHistoryPoint]) -> Option<Self> {
        if history.len() < 2 {
            return None;
        }

        let points: Vec<ChartPoint> = history
            .iter()
            .map(|p| ChartPoint {
                label: format_short_date(p.timestamp),
                timestamp: p.timestamp,
                nav: p.nav,
            })
            .collect();

        let min = points.iter().map(|p| p.nav).fold(f64::INFINITY, f64::min);
        let max = points.iter().map(|p| p.nav).fold(f64::NEG_INFINITY, f64::max);

        Some(Self { points, min, max })
    }

    pub fn first(&self) -> &ChartPoint {
        &self.points[0]
    }

    pub fn last(&self) -> &ChartPoint {
        &self.points[self.points.len() - 1]
    }

    /// One block character per point, scaled between min and max
    pub fn sparkline(&self) -> String {
        let range = self.max - self.min;
        let top = SPARK_LEVELS.len() - 1;

        self.points
            .iter()
            .map(|p| {
                if range <= f64::EPSILON {
                    return SPARK_LEVELS[top / 2];
                }
                let level = ((p.nav - self.min) / range * top as f64).round() as usize;
                SPARK_LEVELS[level.min(top)]
            })
            .collect()
    }
}
