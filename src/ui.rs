//! Interface de terminal do provisionador — spinner e saída colorida.
//!
//! Usa `indicatif` para o spinner de progresso e `console` para cores.
//! O [`ProvisionProgress`] acompanha visualmente uma execução no terminal.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::dispatcher::Response;
use crate::workflow::ProvisioningReport;

/// Indicador visual de progresso para uma execução de provisionamento.
pub struct ProvisionProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
    yellow: Style,
}

impl ProvisionProgress {
    /// Inicia o spinner com o número de série e o part number.
    pub fn start(serial: &str, part_number: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Provisioning {serial} ({part_number})"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Finaliza o spinner e exibe o corpo da resposta.
    ///
    /// 200 em verde com checkmark; 400 em amarelo; 500 em vermelho com X.
    pub fn complete(&self, response: &Response) {
        self.pb.finish_and_clear();
        match response.status_code {
            200 => println!("  {} {}", self.green.apply_to("✓"), response.body),
            400 => println!(
                "  {} [{}] {}",
                self.yellow.apply_to("!"),
                response.status_code,
                response.body
            ),
            _ => println!(
                "  {} [{}] {}",
                self.red.apply_to("✗"),
                response.status_code,
                response.body
            ),
        }
    }

    /// Imprime o relatório da execução em JSON.
    pub fn print_report(&self, report: &ProvisioningReport) {
        let style = if report.outcome.is_success() {
            &self.green
        } else {
            &self.red
        };
        println!();
        println!("{}", style.apply_to("─── Provisioning Report ───"));
        println!(
            "{}",
            serde_json::to_string_pretty(report).unwrap_or_default()
        );
    }
}
