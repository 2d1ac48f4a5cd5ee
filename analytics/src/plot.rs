//! 3D scatter series built from the current grid view.

use serde::Serialize;

use crate::columns::{Column, ViewMode};
use crate::error::{AnalyticsError, Result};
use crate::row::GridRow;

const GROUPED_OPACITY: f64 = 0.25;
const DIMMED_OPACITY: f64 = 0.01;
const IDLE_OPACITY: f64 = 0.15;
const SELECTED_OPACITY: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlotAxes {
    pub x: Column,
    pub y: Column,
    pub z: Column,
    pub hue: Column,
}

impl PlotAxes {
    fn validate(&self) -> Result<()> {
        for column in [self.x, self.y, self.z, self.hue] {
            if !column.is_numeric() {
                return Err(AnalyticsError::NonNumericAxis(column.id().to_string()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub hue: f64,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlotSeries {
    pub points: Vec<PlotPoint>,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPlot {
    pub unselected: PlotSeries,
    pub selected: PlotSeries,
}

/// Hover text for a point.
pub fn point_label(source: &str, page: Option<u32>) -> String {
    let page = page.map(|page| page.to_string()).unwrap_or_default();
    format!("Source : {source}\nPage: {page}")
}

/// Opacity of the unselected series. Document rows are always drawn at the
/// same weight; flat rows fade out once anything is selected.
pub fn unselected_opacity(mode: ViewMode, any_selected: bool) -> f64 {
    match mode {
        ViewMode::Document => GROUPED_OPACITY,
        ViewMode::PageSegment if any_selected => DIMMED_OPACITY,
        ViewMode::PageSegment => IDLE_OPACITY,
    }
}

/// Split `rows` into unselected and selected point series.
pub fn build_scatter<R: GridRow>(
    rows: &[&R],
    axes: &PlotAxes,
    mode: ViewMode,
) -> Result<ScatterPlot> {
    axes.validate()?;
    let mut unselected = Vec::new();
    let mut selected = Vec::new();
    for row in rows {
        let value = |column: Column| row.numeric(column).unwrap_or_default();
        let point = PlotPoint {
            x: value(axes.x),
            y: value(axes.y),
            z: value(axes.z),
            hue: value(axes.hue),
            label: point_label(row.source(), row.page()),
        };
        if row.is_selected() {
            selected.push(point);
        } else {
            unselected.push(point);
        }
    }
    let any_selected = !selected.is_empty();
    Ok(ScatterPlot {
        unselected: PlotSeries {
            points: unselected,
            opacity: unselected_opacity(mode, any_selected),
        },
        selected: PlotSeries {
            points: selected,
            opacity: SELECTED_OPACITY,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tests::record;
    use pretty_assertions::assert_eq;

    fn axes() -> PlotAxes {
        PlotAxes {
            x: Column::Coord1,
            y: Column::Coord2,
            z: Column::Coord3,
            hue: Column::RelevanceScore,
        }
    }

    #[test]
    fn splits_rows_by_selection() {
        let mut first = record("1", "a.pdf", 0.8);
        first.selected = true;
        first.coord_1 = 2.5;
        let second = record("2", "b.pdf", 0.4);
        let rows = vec![&first, &second];

        let plot = build_scatter(&rows, &axes(), ViewMode::PageSegment).unwrap();
        assert_eq!(plot.selected.points.len(), 1);
        assert_eq!(plot.selected.points[0].x, 2.5);
        assert_eq!(plot.selected.points[0].hue, 0.8);
        assert_eq!(plot.unselected.points[0].label, "Source : b.pdf\nPage: 1");
        assert_eq!(plot.unselected.opacity, 0.01);
    }

    #[test]
    fn opacity_follows_mode_and_selection() {
        assert_eq!(unselected_opacity(ViewMode::Document, true), 0.25);
        assert_eq!(unselected_opacity(ViewMode::Document, false), 0.25);
        assert_eq!(unselected_opacity(ViewMode::PageSegment, false), 0.15);
    }

    #[test]
    fn rejects_text_axes() {
        let rows: Vec<&crate::record::ContentRecord> = Vec::new();
        let bad = PlotAxes {
            hue: Column::Document,
            ..axes()
        };
        assert!(matches!(
            build_scatter(&rows, &bad, ViewMode::Document),
            Err(AnalyticsError::NonNumericAxis(_))
        ));
    }
}
