//! Chart generation and rendering for the summary page.
//!
//! Two ECharts visualizations are built from a [TransactionSummary]:
//! - **Income vs expense**: a pie chart with one slice each for income and expenses
//! - **Expenses by category**: a doughnut chart with one slice per category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a HTML container and JavaScript initialization code.

use charming::{
    Chart,
    component::{Legend, Title},
    element::{JsFunction, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};

use crate::{html::HeadElement, transaction::TransactionSummary};

/// The path of the ECharts library under the static file route.
pub(super) const ECHARTS_SCRIPT: &str = "/static/echarts.6.0.0.min.js";

pub(super) const INCOME_EXPENSE_CHART_ID: &str = "income-expense-chart";
pub(super) const EXPENSE_CATEGORY_CHART_ID: &str = "expense-category-chart";

pub(super) const NO_EXPENSE_DATA_MSG: &str = "No expense data in the selected range";

/// A summary chart with its HTML container ID and ECharts configuration.
pub(super) struct SummaryChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Build the charts for `summary`.
///
/// The expense chart is left out when there are no expenses.
pub(super) fn build_summary_charts(summary: &TransactionSummary) -> Vec<SummaryChart> {
    let mut charts = vec![SummaryChart {
        id: INCOME_EXPENSE_CHART_ID,
        options: income_expense_chart(summary).to_string(),
    }];

    if !summary.category_totals.is_empty() {
        charts.push(SummaryChart {
            id: EXPENSE_CATEGORY_CHART_ID,
            options: expense_category_chart(summary).to_string(),
        });
    }

    charts
}

/// Renders the HTML containers for the summary charts.
///
/// If `charts` has no expense chart, a message is shown in its place.
pub(super) fn charts_view(charts: &[SummaryChart]) -> Markup {
    let has_expense_chart = charts
        .iter()
        .any(|chart| chart.id == EXPENSE_CATEGORY_CHART_ID);

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

                @if !has_expense_chart {
                    div
                        id="no-expense-data"
                        class="flex items-center justify-center min-h-[380px] rounded
                            bg-white dark:bg-gray-800 text-gray-500 dark:text-gray-400"
                    {
                        (NO_EXPENSE_DATA_MSG)
                    }
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for the summary charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[SummaryChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            // Category names end up in string literals here, and a "</" in one
            // would close the surrounding script element.
            let options = chart.options.replace("</", "<\\/");

            format!(
                r#"(function() {{
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
                }})();"#,
                chart.id, options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

fn income_expense_chart(summary: &TransactionSummary) -> Chart {
    Chart::new()
        .title(Title::new().text("Income vs expense").left("center"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().bottom("2%").left("center"))
        .series(
            Pie::new()
                .name("Income vs expense")
                .radius("60%")
                .data(vec![
                    (summary.total_income.as_f64(), "Income"),
                    (summary.total_expense.as_f64(), "Expense"),
                ]),
        )
}

fn expense_category_chart(summary: &TransactionSummary) -> Chart {
    let data: Vec<(f64, &str)> = summary
        .category_totals
        .iter()
        .map(|(category, amount)| (amount.as_f64(), category.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Expenses by category").left("center"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().bottom("2%").left("center"))
        .series(
            Pie::new()
                .name("Expenses by category")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
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

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Item)
        .value_formatter(currency_formatter())
}

#[cfg(test)]
mod tests {
    use maud::PreEscaped;
    use serde_json::Value;

    use crate::{
        html::HeadElement,
        transaction::{Amount, TransactionSummary},
    };

    use super::{
        EXPENSE_CATEGORY_CHART_ID, INCOME_EXPENSE_CHART_ID, build_summary_charts, charts_script,
        expense_category_chart, income_expense_chart,
    };

    fn summary() -> TransactionSummary {
        TransactionSummary {
            total_income: Amount::from_cents(10_000),
            total_expense: Amount::from_cents(5_000),
            category_totals: vec![
                ("Food".to_owned(), Amount::from_cents(4_000)),
                ("Transport".to_owned(), Amount::from_cents(1_000)),
            ],
        }
    }

    /// The `[name, value]` pairs of the first series in `options`.
    ///
    /// Only the plain JSON part is parsed, the formatter functions make the
    /// full options invalid JSON.
    fn series_data(options: &str) -> Vec<(String, f64)> {
        let start = options.find("\"data\"").expect("No series data found");
        let array_start = start + options[start..].find('[').unwrap();
        let array_end = array_start + options[array_start..].find(']').unwrap();
        let data: Value = serde_json::from_str(&options[array_start..=array_end]).unwrap();

        data.as_array()
            .unwrap()
            .iter()
            .map(|item| {
                (
                    item["name"].as_str().unwrap().to_owned(),
                    item["value"].as_f64().unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn income_expense_chart_has_two_slices() {
        let options = income_expense_chart(&summary()).to_string();

        assert_eq!(
            series_data(&options),
            [("Income".to_owned(), 100.0), ("Expense".to_owned(), 50.0)]
        );
    }

    #[test]
    fn expense_chart_has_one_slice_per_category() {
        let options = expense_category_chart(&summary()).to_string();

        assert_eq!(
            series_data(&options),
            [("Food".to_owned(), 40.0), ("Transport".to_owned(), 10.0)]
        );
        assert!(options.contains("\"40%\""), "want doughnut radius in {options}");
    }

    #[test]
    fn expense_chart_is_skipped_without_expenses() {
        let summary = TransactionSummary {
            total_income: Amount::from_cents(100),
            ..Default::default()
        };

        let ids: Vec<_> = build_summary_charts(&summary)
            .iter()
            .map(|chart| chart.id)
            .collect();

        assert_eq!(ids, [INCOME_EXPENSE_CHART_ID]);
    }

    #[test]
    fn both_charts_are_built_with_expenses() {
        let ids: Vec<_> = build_summary_charts(&summary())
            .iter()
            .map(|chart| chart.id)
            .collect();

        assert_eq!(ids, [INCOME_EXPENSE_CHART_ID, EXPENSE_CATEGORY_CHART_ID]);
    }

    #[test]
    fn category_names_cannot_close_the_script_element() {
        let summary = TransactionSummary {
            total_income: Amount::ZERO,
            total_expense: Amount::from_cents(100),
            category_totals: vec![(
                "</script><script>alert(1)</script>".to_owned(),
                Amount::from_cents(100),
            )],
        };

        let HeadElement::ScriptSource(PreEscaped(source)) =
            charts_script(&build_summary_charts(&summary))
        else {
            panic!("want charts script to be inline source");
        };

        assert!(
            !source.to_lowercase().contains("</script"),
            "want no closing script tag in {source}"
        );
        assert!(source.contains(r"<\/script><script>alert(1)<\/script>"));
    }
}
