//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for the selected date range:
//! - **Income Chart**: A pie of income per transaction type
//! - **Expenses Chart**: A pie of expenses per transaction type
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Legend, Title},
    element::{ItemStyle, JsFunction, Orient, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    html::{HeadElement, to_chart_value},
    ledger::CategorySums,
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Charts are initialized immediately when the document has already loaded,
/// which is the case for content swapped in by HTMX.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    HeadElement::ScriptSource(PreEscaped(init_charts_source(charts)))
}

/// The chart initialization script as an inline element for HTMX partials.
pub(super) fn charts_inline_script(charts: &[DashboardChart]) -> Markup {
    html!(
        script { (PreEscaped(init_charts_source(charts))) }
    )
}

fn init_charts_source(charts: &[DashboardChart]) -> String {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom) {{
                        return;
                    }}
                    echarts.dispose(chartDom);
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);
                    chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
                }})();"#,
                chart.id,
                escape_script(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    // The resize and theme listeners are installed once per page and apply to
    // every chart on it.
    format!(
        "(function() {{\n\
            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');\n\
            const forEachChart = function(callback) {{\n\
                document.querySelectorAll('[_echarts_instance_]').forEach(function(dom) {{\n\
                    const chart = echarts.getInstanceByDom(dom);\n\
                    if (chart) {{\n\
                        callback(chart);\n\
                    }}\n\
                }});\n\
            }};\n\
            if (!window.dashboardChartListeners) {{\n\
                window.dashboardChartListeners = true;\n\
                window.addEventListener('resize', function() {{\n\
                    forEachChart(function(chart) {{ chart.resize(); }});\n\
                }});\n\
                darkModeMediaQuery.addEventListener('change', function() {{\n\
                    const theme = darkModeMediaQuery.matches ? 'dark' : 'default';\n\
                    forEachChart(function(chart) {{ chart.setTheme(theme); }});\n\
                }});\n\
            }}\n\
            const initCharts = function() {{\n{script_content}\n}};\n\
            if (document.readyState === 'loading') {{\n\
                document.addEventListener('DOMContentLoaded', initCharts);\n\
            }} else {{\n\
                initCharts();\n\
            }}\n\
        }})();"
    )
}

/// Stop text from the chart options closing the surrounding script element.
fn escape_script(source: &str) -> String {
    source.replace("</", "<\\/")
}

pub(super) fn income_chart(income: &CategorySums) -> Chart {
    category_pie_chart("Income", "Per transaction type", income)
}

pub(super) fn expenses_chart(expenses: &CategorySums) -> Chart {
    category_pie_chart("Expenses", "Per transaction type", expenses)
}

fn category_pie_chart(title: &str, subtitle: &str, sums: &CategorySums) -> Chart {
    let data: Vec<(f64, &str)> = sums
        .iter()
        .map(|(label, amount)| (to_chart_value(amount), label))
        .collect();

    Chart::new()
        .title(Title::new().text(title).subtext(subtitle).left("center"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().orient(Orient::Vertical).left("left"))
        .series(
            Pie::new()
                .name(title)
                .radius(vec!["40%", "70%"])
                .item_style(ItemStyle::new().border_radius(4))
                .data(data),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('nb-NO', {
              style: 'currency',
              currency: 'NOK'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}
