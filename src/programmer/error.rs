//! Tipos de erro para o adaptador da ferramenta de gravação.
//!
//! Toda falha do processo externo vira uma variante de [`ProgramError`];
//! nada escapa da fronteira do adaptador como pânico.

use std::time::Duration;

use thiserror::Error;

/// Erros que podem ocorrer ao gravar uma imagem no dispositivo.
#[derive(Debug, Error)]
pub enum ProgramError {
    /// A ferramenta não pôde ser iniciada (caminho inexistente, sem permissão).
    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// O processo terminou com status diferente de zero.
    /// `output` preserva stdout e stderr combinados para diagnóstico.
    #[error("flashing tool failed ({status}): {output}")]
    Failed {
        code: Option<i32>,
        status: String,
        output: String,
    },

    /// A gravação excedeu o tempo limite e o processo foi encerrado.
    #[error("flashing tool timed out after {timeout:?}")]
    TimedOut { timeout: Duration },

    /// Falha de E/S ao aguardar o processo.
    #[error("failed to collect flashing tool output: {0}")]
    Io(#[source] std::io::Error),
}
