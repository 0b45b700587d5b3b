//! Cards showing the totals for the selected time window.

use maud::{Markup, html};

use crate::{html::format_currency, transaction::TransactionSummary};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col gap-2";

struct Card {
    id: &'static str,
    title: &'static str,
    value: String,
    value_style: &'static str,
}

fn card_view(card: &Card) -> Markup {
    html! {
        div id=(card.id) class=(CARD_STYLE) data-card
        {
            h3 class="text-sm font-medium text-gray-600 dark:text-gray-400" { (card.title) }
            p class={ "text-2xl font-bold " (card.value_style) } data-card-value { (card.value) }
        }
    }
}

/// Renders the income, expense, balance and recommended savings cards.
pub(super) fn summary_cards_view(summary: &TransactionSummary) -> Markup {
    let balance = summary.balance();
    let balance_style = if balance.cents() < 0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-gray-900 dark:text-white"
    };

    let cards = [
        Card {
            id: "total-income",
            title: "Total income",
            value: format_currency(summary.total_income),
            value_style: "text-green-700 dark:text-green-300",
        },
        Card {
            id: "total-expense",
            title: "Total expense",
            value: format_currency(summary.total_expense),
            value_style: "text-red-700 dark:text-red-300",
        },
        Card {
            id: "balance",
            title: "Balance",
            value: format_currency(balance),
            value_style: balance_style,
        },
        Card {
            id: "recommended-savings",
            title: "Recommended savings",
            value: format_currency(summary.recommended_savings()),
            value_style: "text-blue-700 dark:text-blue-300",
        },
    ];

    html! {
        section id="summary-cards" class="w-full grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
        {
            @for card in &cards {
                (card_view(card))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use crate::{
        test_utils::select_text,
        transaction::{Amount, TransactionSummary},
    };

    use super::summary_cards_view;

    fn render(summary: &TransactionSummary) -> Html {
        Html::parse_fragment(&summary_cards_view(summary).into_string())
    }

    #[test]
    fn shows_totals() {
        let summary = TransactionSummary {
            total_income: Amount::from_cents(10_000),
            total_expense: Amount::from_cents(4_000),
            category_totals: vec![("Food".to_owned(), Amount::from_cents(4_000))],
        };

        let html = render(&summary);

        assert_eq!(select_text(&html, "#total-income [data-card-value]"), ["$100.00"]);
        assert_eq!(select_text(&html, "#total-expense [data-card-value]"), ["$40.00"]);
        assert_eq!(select_text(&html, "#balance [data-card-value]"), ["$60.00"]);
        assert_eq!(
            select_text(&html, "#recommended-savings [data-card-value]"),
            ["$20.00"]
        );
    }

    #[test]
    fn negative_balance_is_red() {
        let summary = TransactionSummary {
            total_income: Amount::ZERO,
            total_expense: Amount::from_cents(1_050),
            category_totals: vec![("Food".to_owned(), Amount::from_cents(1_050))],
        };

        let html = render(&summary);

        assert_eq!(select_text(&html, "#balance [data-card-value]"), ["-$10.50"]);
        let balance = html
            .select(&scraper::Selector::parse("#balance [data-card-value]").unwrap())
            .next()
            .unwrap();
        assert!(balance.value().attr("class").unwrap().contains("text-red-700"));
    }
}
