//! The form for choosing the time window shown on the summary page.
//!
//! The form is submitted with a plain GET so the selection lives in the URL
//! and survives a reload.

use maud::{Markup, html};
use time::{Date, Month};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE,
    },
    transaction::{DATE_RANGE_MODE, FilterQuery, MONTH_MODE},
};

/// How many years, counting the current one, are offered in the year select.
const YEARS_OFFERED: i32 = 5;

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

fn raw(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or_default()
}

fn mode_radio(value: &str, label: &str, checked: bool) -> Markup {
    let id = format!("mode-{value}");

    html! {
        div class="flex items-center gap-2"
        {
            input
                type="radio"
                name="mode"
                id=(id)
                value=(value)
                checked[checked]
                class=(FORM_RADIO_INPUT_STYLE);

            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (label) }
        }
    }
}

/// Renders the filter form with the current selection in `query`.
///
/// The form is expanded whenever a filter is set. `today` decides which
/// years are offered.
pub(super) fn filter_form_view(query: &FilterQuery, today: Date) -> Markup {
    let is_date_range_mode = query.is_date_range_mode();
    let selected_month = raw(&query.month);
    let selected_year = match raw(&query.year) {
        "" => today.year().to_string(),
        year => year.to_owned(),
    };
    let has_selection = [&query.month, &query.start, &query.end]
        .into_iter()
        .any(|value| !raw(value).is_empty());
    let years = (0..YEARS_OFFERED).map(|offset| today.year() - offset);

    html! {
        details id="filter" class="w-full" open[has_selection]
        {
            summary class="cursor-pointer text-lg font-semibold mb-2" { "Filter" }

            form
                method="get"
                action=(endpoints::SUMMARY_VIEW)
                class="bg-gray-50 dark:bg-gray-800 p-4 rounded-lg space-y-4"
            {
                fieldset class="grid grid-cols-2 gap-3"
                {
                    legend class=(FORM_LABEL_STYLE) { "Filter by" }
                    (mode_radio(MONTH_MODE, "Month", !is_date_range_mode))
                    (mode_radio(DATE_RANGE_MODE, "Date range", is_date_range_mode))
                }

                div class="grid grid-cols-2 gap-3"
                {
                    div
                    {
                        label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                        select name="month" id="month" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            option value="" selected[selected_month.is_empty()] { "All months" }

                            @for month in MONTHS {
                                @let value = (month as u8).to_string();
                                option value=(value) selected[selected_month == value] { (month.to_string()) }
                            }
                        }
                    }

                    div
                    {
                        label for="year" class=(FORM_LABEL_STYLE) { "Year" }

                        select name="year" id="year" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            @for year in years {
                                @let value = year.to_string();
                                option value=(value) selected[selected_year == value] { (year) }
                            }
                        }
                    }
                }

                div class="grid grid-cols-2 gap-3"
                {
                    div
                    {
                        label for="start" class=(FORM_LABEL_STYLE) { "From" }

                        input
                            type="date"
                            name="start"
                            id="start"
                            value=(raw(&query.start))
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="end" class=(FORM_LABEL_STYLE) { "To" }

                        input
                            type="date"
                            name="end"
                            id="end"
                            value=(raw(&query.end))
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div class="flex items-center gap-4"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }

                    a id="reset-filter" href=(endpoints::SUMMARY_VIEW) class=(LINK_STYLE) { "Reset" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{endpoints, test_utils::must_select, transaction::FilterQuery};

    use super::filter_form_view;

    fn render(query: &FilterQuery) -> Html {
        Html::parse_fragment(&filter_form_view(query, date!(2024 - 06 - 15)).into_string())
    }

    fn option_values(html: &Html, selector: &str) -> Vec<String> {
        html.select(&Selector::parse(selector).unwrap())
            .map(|option| option.value().attr("value").unwrap_or_default().to_owned())
            .collect()
    }

    #[test]
    fn form_submits_to_summary_page_with_get() {
        let html = render(&FilterQuery::default());

        let form = must_select(&html, "form");
        assert_eq!(form.value().attr("method"), Some("get"));
        assert_eq!(form.value().attr("action"), Some(endpoints::SUMMARY_VIEW));
        let reset = must_select(&html, "#reset-filter");
        assert_eq!(reset.value().attr("href"), Some(endpoints::SUMMARY_VIEW));
    }

    #[test]
    fn offers_last_five_years() {
        let html = render(&FilterQuery::default());

        assert_eq!(
            option_values(&html, "select[name=year] option"),
            ["2024", "2023", "2022", "2021", "2020"]
        );
        assert_eq!(
            option_values(&html, "select[name=year] option[selected]"),
            ["2024"]
        );
    }

    #[test]
    fn offers_every_month() {
        let html = render(&FilterQuery::default());

        let months = option_values(&html, "select[name=month] option");
        assert_eq!(months.len(), 13);
        assert_eq!(months[0], "");
        assert_eq!(months[12], "12");
    }

    #[test]
    fn defaults_to_month_mode_and_collapsed() {
        let html = render(&FilterQuery::default());

        let checked = must_select(&html, "input[name=mode][checked]");
        assert_eq!(checked.value().attr("value"), Some("month"));
        assert!(must_select(&html, "details").value().attr("open").is_none());
    }

    #[test]
    fn keeps_month_selection() {
        let query = FilterQuery {
            mode: Some("month".to_owned()),
            month: Some("1".to_owned()),
            year: Some("2023".to_owned()),
            ..Default::default()
        };

        let html = render(&query);

        assert_eq!(
            option_values(&html, "select[name=month] option[selected]"),
            ["1"]
        );
        assert_eq!(
            option_values(&html, "select[name=year] option[selected]"),
            ["2023"]
        );
        assert!(must_select(&html, "details").value().attr("open").is_some());
    }

    #[test]
    fn keeps_date_range_selection() {
        let query = FilterQuery {
            mode: Some("date_range".to_owned()),
            start: Some("2024-01-01".to_owned()),
            end: Some("2024-01-31".to_owned()),
            ..Default::default()
        };

        let html = render(&query);

        let checked = must_select(&html, "input[name=mode][checked]");
        assert_eq!(checked.value().attr("value"), Some("date_range"));
        assert_eq!(
            must_select(&html, "input[name=start]").value().attr("value"),
            Some("2024-01-01")
        );
        assert_eq!(
            must_select(&html, "input[name=end]").value().attr("value"),
            Some("2024-01-31")
        );
    }
}
