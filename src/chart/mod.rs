//! Chart composition: turn bucketed series into renderable chart specs.

pub mod google;

pub use self::google::GoogleImageCharts;

use anyhow::Result;

use crate::stats::Aggregation;

/// Fixed 14-color palette. Feed at legend position `i` is always drawn
/// in `PALETTE[i % 14]`, so colors stay stable between reports.
pub const PALETTE: [&str; 14] = [
    "00FFFF", "0000FF", "FF00FF", "008000", "808080", "00FF00", "800000", "000080", "808000",
    "800080", "FF0000", "C0C0C0", "008080", "FFFF00",
];

/// A textual value marker placed above one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub bucket: usize,
    pub value: u64,
}

/// One named data series within a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub name: Option<String>,
    pub values: Vec<u64>,
}

/// Complete specification of one stacked vertical bar chart. A pure
/// value: renderers turn it into an image reference without touching
/// the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartDescriptor {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub bucket_labels: Vec<String>,
    pub series: Vec<Series>,
    /// Left axis range is always [0, axis_max].
    pub axis_max: u64,
    /// Per-bucket value markers; single-series charts only.
    pub markers: Vec<Marker>,
    /// Legend entries and palette colors; multi-series charts only.
    pub legend: Vec<String>,
    pub colors: Vec<&'static str>,
}

/// A chart rendering collaborator: spec in, opaque image reference out.
pub trait ChartRenderer {
    fn render(&self, chart: &ChartDescriptor) -> Result<String>;
}

/// Build a chart descriptor from an aggregation result.
///
/// Global aggregations produce a single series with a value marker at
/// every nonzero bucket. Per-feed aggregations instead carry a legend
/// and one deterministic palette color per feed, with no markers.
pub fn compose(title: &str, width: u32, height: u32, aggregation: &Aggregation) -> ChartDescriptor {
    let mut chart = ChartDescriptor {
        title: title.to_string(),
        width,
        height,
        bucket_labels: Vec::new(),
        series: Vec::new(),
        axis_max: aggregation.max_value(),
        markers: Vec::new(),
        legend: Vec::new(),
        colors: Vec::new(),
    };

    match aggregation {
        Aggregation::Global(series) => {
            chart.bucket_labels = series.dimension.labels();
            chart.markers = series
                .values
                .iter()
                .enumerate()
                .filter(|(_, v)| **v > 0)
                .map(|(bucket, v)| Marker { bucket, value: *v })
                .collect();
            chart.series.push(Series {
                name: None,
                values: series.values.clone(),
            });
        }
        Aggregation::PerFeed(set) => {
            chart.bucket_labels = set.dimension.labels();
            for (i, (feed, series)) in set.legend.iter().zip(&set.series).enumerate() {
                chart.series.push(Series {
                    name: Some(feed.clone()),
                    values: series.values.clone(),
                });
                chart.colors.push(PALETTE[i % PALETTE.len()]);
            }
            chart.legend = set.legend.clone();
        }
    }

    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{BucketSeries, Dimension, FeedSeriesSet};

    fn global(values: Vec<u64>) -> Aggregation {
        Aggregation::Global(BucketSeries {
            dimension: Dimension::Weekday,
            values,
        })
    }

    #[test]
    fn test_single_series_markers_on_nonzero_buckets() {
        let chart = compose("test", 220, 200, &global(vec![0, 4, 0, 0, 9, 0, 0]));
        assert_eq!(chart.series.len(), 1);
        assert_eq!(
            chart.markers,
            vec![
                Marker { bucket: 1, value: 4 },
                Marker { bucket: 4, value: 9 },
            ]
        );
        assert!(chart.legend.is_empty());
        assert_eq!(chart.axis_max, 9);
    }

    #[test]
    fn test_per_feed_chart_has_legend_and_colors_no_markers() {
        let set = FeedSeriesSet {
            dimension: Dimension::Weekday,
            legend: vec!["b".into(), "a".into(), "c".into()],
            series: vec![
                BucketSeries { dimension: Dimension::Weekday, values: vec![2, 0, 0, 0, 0, 0, 0] },
                BucketSeries { dimension: Dimension::Weekday, values: vec![0, 5, 0, 0, 0, 0, 0] },
                BucketSeries { dimension: Dimension::Weekday, values: vec![0, 0, 1, 0, 0, 0, 0] },
            ],
        };
        let chart = compose("by feed", 350, 200, &Aggregation::PerFeed(set));
        assert_eq!(chart.legend, ["b", "a", "c"]);
        assert_eq!(chart.colors, [PALETTE[0], PALETTE[1], PALETTE[2]]);
        assert!(chart.markers.is_empty());
        assert_eq!(chart.axis_max, 5);
    }

    #[test]
    fn test_palette_wraps_after_fourteen_feeds() {
        let legend: Vec<String> = (0..16).map(|i| format!("feed{i}")).collect();
        let series = legend
            .iter()
            .map(|_| BucketSeries {
                dimension: Dimension::Weekday,
                values: vec![1, 0, 0, 0, 0, 0, 0],
            })
            .collect();
        let set = FeedSeriesSet {
            dimension: Dimension::Weekday,
            legend,
            series,
        };
        let chart = compose("wrap", 350, 200, &Aggregation::PerFeed(set));
        assert_eq!(chart.colors[14], PALETTE[0]);
        assert_eq!(chart.colors[15], PALETTE[1]);
    }

    #[test]
    fn test_empty_aggregation_axis_floor() {
        let chart = compose("empty", 220, 200, &global(vec![0; 7]));
        assert_eq!(chart.axis_max, 0);
        assert!(chart.markers.is_empty());
    }
}
