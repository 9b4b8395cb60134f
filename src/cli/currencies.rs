use super::ui;
use crate::core::ExchangeRateRepository;
use anyhow::{Result, bail};

const CODES_PER_ROW: usize = 10;

fn display_as_table(codes: &[String]) -> String {
    let mut table = ui::new_styled_table();
    for row in codes.chunks(CODES_PER_ROW) {
        table.add_row(row.to_vec());
    }

    format!(
        "{}\n\n{}\n{}",
        ui::style_text("Available currencies", ui::StyleType::Title),
        table,
        ui::style_text(&format!("{} currencies", codes.len()), ui::StyleType::Subtle)
    )
}

pub async fn run(repository: &ExchangeRateRepository) -> Result<()> {
    let pb = ui::new_spinner("Fetching available currencies...");
    let result = repository.get_available_currency_codes().await;
    pb.finish_and_clear();

    let Ok(codes) = result else {
        bail!("Failed to load available currencies.");
    };

    println!("{}", display_as_table(&codes));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_wrap_into_rows() {
        let codes: Vec<String> = (0..23).map(|i| format!("C{i:02}")).collect();
        let output = console::strip_ansi_codes(&display_as_table(&codes)).to_string();

        assert!(output.contains("C00"));
        assert!(output.contains("C22"));
        assert!(output.contains("23 currencies"));
    }
}
