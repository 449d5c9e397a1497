//! Chart generation for the reports page.
//!
//! The chart is generated as JSON configuration for the ECharts library and
//! rendered into an HTML container with JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::Bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{html::HeadElement, report::summary::ReportSummary};

/// The HTML element ID of the report chart container.
const CHART_ID: &str = "category-totals-chart";

/// A bar chart of the three per-category totals.
pub(super) fn category_totals_chart(summary: &ReportSummary) -> Chart {
    Chart::new()
        .title(Title::new().text("Totals by category"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter())
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(vec![
            "Income",
            "Fixed expenses",
            "Variable expenses",
        ]))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Total").data(vec![
            summary.total_income,
            summary.total_fixed_expense,
            summary.total_variable_expense,
        ]))
}

/// Renders the HTML container for the report chart.
pub(super) fn chart_view() -> Markup {
    html!(
        section id="chart" class="w-full max-w-4xl mx-auto mb-4"
        {
            div id=(CHART_ID) class="min-h-[380px] rounded dark:bg-gray-100" {}
        }
    )
}

/// Generates JavaScript initialization code for the report chart.
pub(super) fn chart_script(chart: &Chart) -> HeadElement {
    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chartDom = document.getElementById("{CHART_ID}");
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
        chart
    );

    HeadElement::ScriptSource(PreEscaped(script))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}
