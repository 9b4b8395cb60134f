use super::ui;
use crate::core::{ExchangeRate, ExchangeRateRepository};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use comfy_table::Cell;

fn display_as_table(base: &str, date: Option<NaiveDate>, rates: &[ExchangeRate]) -> String {
    let title = match date {
        Some(date) => format!("Exchange rates for {base} on {}", date.format("%Y-%m-%d")),
        None => format!("Latest exchange rates for {base}"),
    };

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Per 1 {base}")),
    ]);
    for rate in rates {
        table.add_row(vec![
            Cell::new(&rate.target_currency.code),
            ui::number_cell(rate.rate, 6),
        ]);
    }

    format!(
        "{}\n\n{}\n{}",
        ui::style_text(&title, ui::StyleType::Title),
        table,
        ui::style_text(
            &format!("{} currencies", rates.len()),
            ui::StyleType::Subtle
        )
    )
}

pub async fn run(
    repository: &ExchangeRateRepository,
    base: &str,
    date: Option<NaiveDate>,
) -> Result<()> {
    let base = base.to_uppercase();

    let pb = ui::new_spinner(&format!("Fetching {base} exchange rates..."));
    let result = match date {
        Some(date) => {
            repository
                .get_historical_exchange_rates(&date.format("%Y-%m-%d").to_string(), &base)
                .await
        }
        None => repository.get_latest_exchange_rates(&base).await,
    };
    pb.finish_and_clear();

    let Ok(rates) = result else {
        bail!("Failed to load exchange rates for {base}.");
    };

    println!("{}", display_as_table(&base, date, &rates));
    Ok(())
}
