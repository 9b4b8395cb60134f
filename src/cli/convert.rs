use super::ui;
use crate::core::ConverterSession;
use crate::core::session::SessionState;
use anyhow::{Context, Result, bail};
use comfy_table::Cell;

fn display_as_table(state: &SessionState) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Amount"),
        ui::header_cell("From"),
        ui::header_cell("Converted"),
        ui::header_cell("To"),
        ui::header_cell("Rate"),
    ]);

    let (amount, converted, rate) = match &state.last_result {
        Some(result) => (
            ui::number_cell(result.amount, 2),
            ui::number_cell(result.converted_amount, 2),
            ui::number_cell(result.exchange_rate, 6),
        ),
        None => (
            Cell::new(&state.amount),
            ui::na_cell(),
            ui::na_cell(),
        ),
    };

    table.add_row(vec![
        amount,
        Cell::new(&state.base_currency),
        converted,
        Cell::new(&state.target_currency),
        rate,
    ]);

    let mut output = table.to_string();
    match &state.last_result {
        Some(_) => output.push_str(&format!(
            "\n\n{} = {}",
            ui::style_text(
                &format!("{} {}", state.amount, state.base_currency),
                ui::StyleType::TotalLabel
            ),
            ui::style_text(
                &format!("{} {}", state.converted_amount, state.target_currency),
                ui::StyleType::TotalValue
            ),
        )),
        None => output.push_str(&format!(
            "\n\n{}",
            ui::style_text(
                &format!(
                    "No exchange rate available from {} to {}",
                    state.base_currency, state.target_currency
                ),
                ui::StyleType::Error
            )
        )),
    }
    output
}

/// Parses a command line amount, rejecting `inf` and `NaN`.
pub fn parse_amount(text: &str) -> Result<f64> {
    let amount: f64 = text
        .trim()
        .parse()
        .with_context(|| format!("Invalid amount: {text}"))?;
    if !amount.is_finite() {
        bail!("Amount must be a finite number, got {text}");
    }
    Ok(amount)
}

pub async fn run(session: &ConverterSession, amount: f64) -> Result<()> {
    if !amount.is_finite() {
        bail!("Amount must be a finite number, got {amount}");
    }

    let base = session.state().base_currency;

    let pb = ui::new_spinner(&format!("Fetching {base} exchange rates..."));
    session.fetch_latest_rates(&base).await;
    pb.finish_and_clear();

    session.set_amount(&amount.to_string());

    let state = session.state();
    if let Some(message) = state.error_message {
        bail!(message);
    }

    println!("{}", display_as_table(&state));
    Ok(())
}
