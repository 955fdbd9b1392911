//! Ranking tables for the dashboard overview.

use maud::{Markup, html};

use crate::{
    aggregation::EntityStats,
    comparison::YearPairComparison,
    html::{
        CARD_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, amount_color_class,
        format_currency, format_currency_compact,
    },
};

/// How many pharmacist rows the two-year comparison table shows.
const COMPARISON_TABLE_ROWS: usize = 8;

/// Renders the revenue-by-location table with each location's share of the
/// total.
pub fn revenue_by_location_table(locations: &[EntityStats], total_revenue: f64) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            h3 class="text-xl font-semibold mb-4" { "Revenue by Location" }

            table class="w-full text-sm text-left"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th class=(TABLE_CELL_STYLE) { "Location" }
                        th class=(TABLE_CELL_STYLE) { "Revenue" }
                        th class=(TABLE_CELL_STYLE) { "Percentage" }
                    }
                }
                tbody
                {
                    @for location in locations {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (location.name) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(location.net_revenue)) }
                            td class=(TABLE_CELL_STYLE) { (share_of_total(location.net_revenue, total_revenue)) }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the top-pharmacists ranking table.
pub fn top_pharmacists_table(pharmacists: &[EntityStats], total_revenue: f64) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            h3 class="text-xl font-semibold mb-4" { "Top Pharmacists Performance" }

            table class="w-full text-sm text-left"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th class=(TABLE_CELL_STYLE) { "Rank" }
                        th class=(TABLE_CELL_STYLE) { "Pharmacist" }
                        th class=(TABLE_CELL_STYLE) { "Revenue" }
                        th class=(TABLE_CELL_STYLE) { "Percentage" }
                    }
                }
                tbody
                {
                    @for (index, pharmacist) in pharmacists.iter().enumerate() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { "#" (index + 1) }
                            td class=(TABLE_CELL_STYLE) { (pharmacist.name) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(pharmacist.net_revenue)) }
                            td class=(TABLE_CELL_STYLE) { (share_of_total(pharmacist.net_revenue, total_revenue)) }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the pharmacist ranking as a two-year growth comparison.
pub fn pharmacist_year_comparison_table(comparison: &YearPairComparison) -> Markup {
    let rows = &comparison.rows[..comparison.rows.len().min(COMPARISON_TABLE_ROWS)];

    html! {
        div class=(CARD_STYLE)
        {
            h3 class="text-xl font-semibold mb-4" { "Top Pharmacists Performance - Year Comparison" }

            table class="w-full text-sm text-left"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th class=(TABLE_CELL_STYLE) { "Rank" }
                        th class=(TABLE_CELL_STYLE) { "Pharmacist" }
                        th class=(TABLE_CELL_STYLE) { (comparison.first_year) " Revenue" }
                        th class=(TABLE_CELL_STYLE) { (comparison.second_year) " Revenue" }
                        th class=(TABLE_CELL_STYLE) { "Growth" }
                        th class=(TABLE_CELL_STYLE) { "Growth %" }
                    }
                }
                tbody
                {
                    @for (index, row) in rows.iter().enumerate() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { "#" (index + 1) }
                            td class=(TABLE_CELL_STYLE) { (row.name) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(row.revenue_first)) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(row.revenue_second)) }
                            td class=(format!("{TABLE_CELL_STYLE} {}", amount_color_class(row.growth)))
                            {
                                @if row.growth >= 0.0 { "+" }
                                (format_currency_compact(row.growth))
                            }
                            td class=(format!("{TABLE_CELL_STYLE} {}", amount_color_class(row.growth_rate)))
                            {
                                @if row.growth_rate >= 0.0 { "+" }
                                (format!("{:.1}", row.growth_rate)) "%"
                            }
                        }
                    }
                }
            }
        }
    }
}

fn share_of_total(amount: f64, total: f64) -> String {
    if total != 0.0 {
        format!("{:.1}%", amount / total * 100.0)
    } else {
        "0.0%".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        aggregation::EntityStats,
        comparison::{PharmacistGrowthRow, YearPairComparison},
    };

    use super::{
        pharmacist_year_comparison_table, revenue_by_location_table, share_of_total,
        top_pharmacists_table,
    };

    fn entity(name: &str, net_revenue: f64) -> EntityStats {
        EntityStats {
            name: name.to_owned(),
            gross_revenue: net_revenue,
            gross_transactions: 1,
            returns_value: 0.0,
            returns_count: 0,
            net_revenue,
            net_transactions: 1,
        }
    }

    #[test]
    fn location_table_shows_revenue_share() {
        let html =
            revenue_by_location_table(&[entity("Main Branch", 75.0)], 100.0).into_string();

        assert!(html.contains("Main Branch"));
        assert!(html.contains("$75.00"));
        assert!(html.contains("75.0%"));
    }

    #[test]
    fn pharmacist_table_ranks_from_one() {
        let html = top_pharmacists_table(
            &[entity("Jane Mary", 75.0), entity("John Smith", 25.0)],
            100.0,
        )
        .into_string();

        assert!(html.contains("#1"));
        assert!(html.contains("#2"));
        assert!(html.contains("Jane Mary"));
    }

    #[test]
    fn comparison_table_caps_the_row_count() {
        let rows = (0..12)
            .map(|index| PharmacistGrowthRow {
                name: format!("Pharmacist {index}"),
                revenue_first: 100.0,
                revenue_second: 150.0,
                growth: 50.0,
                growth_rate: 50.0,
            })
            .collect();

        let html = pharmacist_year_comparison_table(&YearPairComparison {
            first_year: 2024,
            second_year: 2025,
            rows,
        })
        .into_string();

        assert!(html.contains("Pharmacist 7"));
        assert!(!html.contains("Pharmacist 8"));
        assert!(html.contains("2024 Revenue"));
        assert!(html.contains("+50.0%"));
    }

    #[test]
    fn share_of_total_guards_division_by_zero() {
        assert_eq!(share_of_total(50.0, 0.0), "0.0%");
        assert_eq!(share_of_total(50.0, 200.0), "25.0%");
    }
}
