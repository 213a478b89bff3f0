//! Interface de linha de comando do provisionador baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (provision, config)
//! e flags globais (--config, --verbose, --log-format).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// lte-provision — grava e registra LTE Nodes na linha de produção.
#[derive(Debug, Parser)]
#[command(name = "lte-provision", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração (padrão: ./lte-provision.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Formato dos logs emitidos em stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Texto legível com cores, para uso no terminal.
    Pretty,
    /// Uma linha JSON por evento, para coletores de log.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Provisiona um dispositivo: imagem inicial, IMEI, registro, imagem de aplicação.
    Provision {
        /// Número de série do dispositivo.
        #[arg(long)]
        serial: Option<String>,

        /// Part number do dispositivo (padrão: L001).
        #[arg(long)]
        partnum: Option<String>,

        /// Imprime o relatório da execução em JSON ao final.
        #[arg(long, default_value_t = false)]
        report: bool,
    },

    /// Mostra a configuração efetiva em TOML.
    Config,
}
