mod cli;
mod config;
mod dispatcher;
mod error;
mod identity;
mod logging;
mod programmer;
mod registration;
mod ui;
mod workflow;

use std::collections::HashMap;
use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use config::ProvisionConfig;
use dispatcher::{Dispatcher, PARAM_PART_NUMBER, PARAM_SERIAL, PartNumber, Response};
use error::ProvisionError;
use identity::PlaceholderIdentityReader;
use programmer::CommanderProgrammer;
use registration::RegistrationClient;
use workflow::LteNodeProvisioner;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format);

    let config = ProvisionConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Command::Provision {
            serial,
            partnum,
            report,
        } => {
            let dispatcher = build_dispatcher(&config)?;
            let label = partnum
                .clone()
                .unwrap_or_else(|| PartNumber::default().to_string());
            let progress = ui::ProvisionProgress::start(serial.as_deref().unwrap_or("?"), &label);

            let response = dispatcher.handle(&query_params(serial, partnum)).await;

            progress.complete(&response);
            if report && let Some(run) = &response.report {
                progress.print_report(run);
            }
            Ok(exit_code(&response))
        }
        Command::Config => {
            println!("{}", config.to_toml()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_dispatcher(
    config: &ProvisionConfig,
) -> Result<Dispatcher<CommanderProgrammer, PlaceholderIdentityReader, RegistrationClient>, ProvisionError>
{
    // The host environment is captured once here and handed to the tool explicitly.
    let host_env: HashMap<OsString, OsString> = std::env::vars_os().collect();
    let programmer =
        CommanderProgrammer::new(config.commander_path.clone(), host_env, config.program_timeout());
    let registrar =
        RegistrationClient::new(config.registration_url.clone(), config.registration_timeout())?;
    let reader = PlaceholderIdentityReader::new(config.placeholder_imei.clone());

    tracing::debug!(
        tool = %programmer.tool_path().display(),
        registration_url = %registrar.url(),
        "Provisioner configured"
    );

    Ok(Dispatcher::new(LteNodeProvisioner::new(
        programmer,
        reader,
        registrar,
        config.images(),
    )))
}

/// Build the trigger's query parameters from CLI arguments.
fn query_params(serial: Option<String>, partnum: Option<String>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(serial) = serial {
        params.insert(PARAM_SERIAL.to_string(), serial);
    }
    if let Some(partnum) = partnum {
        params.insert(PARAM_PART_NUMBER.to_string(), partnum);
    }
    params
}

fn exit_code(response: &Response) -> ExitCode {
    if response.is_success() {
        ExitCode::SUCCESS
    } else if response.status_code == 400 {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}
