//! The purchases over time chart.
//!
//! The chart is generated as JSON configuration for the ECharts library and
//! rendered with an HTML container and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisType, Tooltip, Trigger},
    series::Line,
};
use maud::{Markup, PreEscaped, html};
use time::Date;

use crate::{html::HeadElement, purchase::format_date};

/// Where the ECharts library is loaded from.
pub(super) const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// A chart with its HTML container ID and ECharts configuration.
pub(super) struct SummaryChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML container for `chart`.
pub(super) fn chart_view(chart: &SummaryChart) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div
                id=(chart.id)
                class="min-h-[380px] rounded dark:bg-gray-100"
            {}
        }
    )
}

/// Generates the JavaScript that initializes `chart` once the page has loaded.
///
/// The chart follows the system dark mode setting and resizes with the window.
pub(super) fn chart_script(chart: &SummaryChart) -> HeadElement {
    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chartDom = document.getElementById("{}");
            const chart = echarts.init(chartDom);
            const option = {};
            chart.setOption(option);

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                const isDarkMode = darkModeMediaQuery.matches;
                chart.setTheme(isDarkMode ? 'dark' : 'default');
            }}
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }});"#,
        chart.id, chart.options
    );

    HeadElement::ScriptSource(PreEscaped(script))
}

/// A line chart of the number of purchases made on each day in `daily_counts`.
pub(super) fn purchases_over_time_chart(daily_counts: &[(Date, usize)]) -> Chart {
    let labels: Vec<String> = daily_counts
        .iter()
        .map(|(date, _)| format_date(*date))
        .collect();
    let values: Vec<i64> = daily_counts
        .iter()
        .map(|(_, count)| i64::try_from(*count).unwrap_or(i64::MAX))
        .collect();

    Chart::new()
        .title(Title::new().text("Purchases Over Time"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value).name("Purchases"))
        .series(Line::new().name("Purchases").data(values))
}

#[cfg(test)]
mod chart_tests {
    use time::macros::date;

    use crate::summary::charts::purchases_over_time_chart;

    #[test]
    fn chart_has_one_point_per_day() {
        let chart = purchases_over_time_chart(&[
            (date!(2024 - 01 - 01), 2),
            (date!(2024 - 01 - 02), 1),
        ]);

        let options: String = chart
            .to_string()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        assert!(
            options.contains(r#"["2024-01-01","2024-01-02"]"#),
            "want date labels in chart options, got {options}"
        );
        assert!(
            options.contains("[2,1]"),
            "want daily counts in chart options, got {options}"
        );
    }
}
