//! Google Image Charts renderer.
//!
//! Renders a [`ChartDescriptor`] as a chart URL. This is a pure function
//! of the descriptor: the URL is the image reference and nothing here
//! fetches or validates it.

use anyhow::Result;

use super::{ChartDescriptor, ChartRenderer};

const BASE_URL: &str = "https://chart.googleapis.com/chart";

/// Marker text color and size, matching the historical reports.
const MARKER_COLOR: &str = "000000";
const MARKER_SIZE: u32 = 13;

#[derive(Debug, Default)]
pub struct GoogleImageCharts;

impl GoogleImageCharts {
    pub fn new() -> Self {
        Self
    }
}

impl ChartRenderer for GoogleImageCharts {
    fn render(&self, chart: &ChartDescriptor) -> Result<String> {
        let mut params: Vec<String> = Vec::new();

        // Stacked vertical bar chart.
        params.push("cht=bvs".to_string());
        params.push(format!("chs={}x{}", chart.width, chart.height));
        params.push(format!("chtt={}", urlencoding::encode(&chart.title)));

        // Text-encoded data, one block per series, scaled to the axis range.
        let data = chart
            .series
            .iter()
            .map(|s| {
                s.values
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("|");
        params.push(format!("chd=t:{data}"));
        params.push(format!("chds=0,{}", chart.axis_max.max(1)));

        // Bottom axis bucket labels, left axis range [0, max].
        params.push("chxt=x,y".to_string());
        params.push(format!("chxl=0:|{}", chart.bucket_labels.join("|")));
        params.push(format!("chxr=1,0,{}", chart.axis_max));

        if !chart.markers.is_empty() {
            let markers = chart
                .markers
                .iter()
                .map(|m| format!("t{},{MARKER_COLOR},0,{},{MARKER_SIZE}", m.value, m.bucket))
                .collect::<Vec<_>>()
                .join("|");
            params.push(format!("chm={markers}"));
        }

        if !chart.legend.is_empty() {
            params.push(format!("chco={}", chart.colors.join(",")));
            let legend = chart
                .legend
                .iter()
                .map(|name| urlencoding::encode(name).into_owned())
                .collect::<Vec<_>>()
                .join("|");
            params.push(format!("chdl={legend}"));
        }

        Ok(format!("{BASE_URL}?{}", params.join("&")))
    }
}
