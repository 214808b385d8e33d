// crates/peer-cli/src/main.rs
// ============================================================================
// Module: Peer CLI Entry Point
// Description: Command dispatcher for chaincode deployment and ACL checks.
// Purpose: Wire configuration, identity, transport, and deploy flows together.
// Dependencies: clap, peer-acl, peer-chaincode, peer-config, peer-core, thiserror
// ============================================================================

//! ## Overview
//! `peer chaincode instantiate` deploys a chaincode on a channel, picking the
//! legacy or config-based lifecycle from the channel's capabilities.
//! `peer acl check` evaluates the configured ACL against a saved signed
//! proposal. Security posture: inputs are untrusted; all file reads are
//! bounded and configuration is validated before use.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use peer_acl::IdentityInfo;
use peer_acl::acl_provider;
use peer_acl::register_acl_provider;
use peer_chaincode::DeployContext;
use peer_chaincode::InstantiateRequest;
use peer_chaincode::chaincode_deploy;
use peer_chaincode::lscc_instantiate;
use peer_cli::files::load_signed_proposal;
use peer_cli::files::load_signing_identity;
use peer_cli::logging::init_logging;
use peer_cli::transport::HttpBroadcastClient;
use peer_cli::transport::HttpEndorserClient;
use peer_cli::transport::HttpTransportConfig;
use peer_config::PeerConfig;
use peer_core::ChaincodeLanguage;
use peer_core::ChaincodeName;
use peer_core::ChannelId;
use peer_core::RequestContext;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: CLI Definitions
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "peer", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Chaincode operations.
    Chaincode {
        /// Selected chaincode subcommand.
        #[command(subcommand)]
        command: ChaincodeCommand,
    },
    /// Access-control utilities.
    Acl {
        /// Selected ACL subcommand.
        #[command(subcommand)]
        command: AclCommand,
    },
}

/// Chaincode subcommands.
#[derive(Subcommand, Debug)]
enum ChaincodeCommand {
    /// Deploy the specified chaincode to the network.
    Instantiate(InstantiateCommand),
}

/// ACL subcommands.
#[derive(Subcommand, Debug)]
enum AclCommand {
    /// Evaluate the configured ACL for a saved signed proposal.
    Check(AclCheckCommand),
}

/// Connection and configuration flags shared by commands.
#[derive(Args, Debug, Clone, Default)]
struct ConnectionArgs {
    /// Path to the peer configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Endorser base URL (overrides `peer.endorser_url`).
    #[arg(long, value_name = "URL")]
    endorser: Option<String>,
    /// Ordering service base URL (overrides `peer.orderer_url`).
    #[arg(long, value_name = "URL")]
    orderer: Option<String>,
}

/// Arguments for `chaincode instantiate`.
#[derive(Args, Debug)]
struct InstantiateCommand {
    /// Language the chaincode is written in.
    #[arg(short = 'l', long = "lang", default_value = "golang")]
    lang: String,
    /// Constructor message for the chaincode in JSON format.
    #[arg(short = 'c', long = "ctor", default_value = "{}")]
    ctor: String,
    /// Name of the chaincode.
    #[arg(short = 'n', long = "name")]
    name: String,
    /// The channel on which this command should be executed.
    #[arg(short = 'C', long = "channelID", default_value = "")]
    channel_id: String,
    /// Version of the chaincode.
    #[arg(short = 'v', long = "version", default_value = "")]
    version: String,
    /// The endorsement policy associated to this chaincode.
    #[arg(short = 'P', long = "policy", default_value = "")]
    policy: String,
    /// The name of the endorsement system chaincode to be used.
    #[arg(short = 'E', long = "escc")]
    escc: Option<String>,
    /// The name of the verification system chaincode to be used.
    #[arg(short = 'V', long = "vscc")]
    vscc: Option<String>,
    /// Write the definition update envelope to this file instead of sending it.
    #[arg(long, value_name = "PATH", conflicts_with = "resource_envelope_load_path")]
    resource_envelope_save_path: Option<PathBuf>,
    /// Send the definition update envelope stored in this file.
    #[arg(long, value_name = "PATH")]
    resource_envelope_load_path: Option<PathBuf>,
    /// Connection flags.
    #[command(flatten)]
    connection: ConnectionArgs,
}

/// Arguments for `acl check`.
#[derive(Args, Debug)]
struct AclCheckCommand {
    /// Resource identifier to check.
    #[arg(long, value_name = "RESOURCE")]
    resource: String,
    /// Channel the check applies to.
    #[arg(long, value_name = "CHANNEL")]
    channel: String,
    /// Path to a JSON signed proposal.
    #[arg(long, value_name = "FILE")]
    proposal: PathBuf,
    /// Path to the peer configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a display message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    if cli.show_version {
        write_stdout_line(&format!("peer {}", env!("CARGO_PKG_VERSION")))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }
    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };
    match command {
        Commands::Chaincode {
            command: ChaincodeCommand::Instantiate(command),
        } => command_instantiate(&command),
        Commands::Acl {
            command: AclCommand::Check(command),
        } => command_acl_check(&command),
    }
}

// ============================================================================
// SECTION: Chaincode Instantiate
// ============================================================================

/// Runs `chaincode instantiate`.
fn command_instantiate(command: &InstantiateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.connection.config.as_deref())?;
    let request = build_instantiate_request(command, &config)?;
    let ctx = build_deploy_context(&config, &command.connection)?;
    chaincode_deploy(&ctx, &request, |ctx| lscc_instantiate(ctx, &request))
        .map_err(|err| CliError::new(format!("error instantiating chaincode: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

/// Builds the deploy request from flags and configured defaults.
fn build_instantiate_request(
    command: &InstantiateCommand,
    config: &PeerConfig,
) -> CliResult<InstantiateRequest> {
    let language: ChaincodeLanguage =
        command.lang.parse().map_err(|err| CliError::new(format!("invalid --lang: {err}")))?;
    let mut request = InstantiateRequest::new(
        ChannelId::new(command.channel_id.trim()),
        ChaincodeName::new(command.name.trim()),
        command.version.trim(),
    );
    request.language = language;
    request.constructor.clone_from(&command.ctor);
    request.policy.clone_from(&command.policy);
    request.escc = command.escc.clone().unwrap_or_else(|| config.chaincode.escc.clone());
    request.vscc = command.vscc.clone().unwrap_or_else(|| config.chaincode.vscc.clone());
    request.resource_envelope_save_path.clone_from(&command.resource_envelope_save_path);
    request.resource_envelope_load_path.clone_from(&command.resource_envelope_load_path);
    Ok(request)
}

/// Builds signer and transports from configuration.
fn build_deploy_context(
    config: &PeerConfig,
    connection: &ConnectionArgs,
) -> CliResult<DeployContext> {
    let key_path = config.identity.signing_key_path.as_deref().ok_or_else(|| {
        CliError::new("identity.signing_key_path must be configured to sign proposals".to_string())
    })?;
    let signer = load_signing_identity(&config.identity.msp_id, key_path)
        .map_err(|err| CliError::new(format!("failed to load signing identity: {err}")))?;

    let transport = transport_config(config);
    let endorser_url =
        parse_url("endorser", connection.endorser.as_deref(), &config.peer.endorser_url)?;
    let orderer_url =
        parse_url("orderer", connection.orderer.as_deref(), &config.peer.orderer_url)?;
    let endorser = HttpEndorserClient::new(&endorser_url, transport)
        .map_err(|err| CliError::new(format!("error getting endorser client: {err}")))?;
    let broadcast = HttpBroadcastClient::new(&orderer_url, transport)
        .map_err(|err| CliError::new(format!("error getting broadcast client: {err}")))?;

    let request_ctx = RequestContext::background().with_timeout(transport.request_timeout);
    Ok(DeployContext::new(Arc::new(signer), Arc::new(endorser), Arc::new(broadcast))
        .with_request_context(request_ctx))
}

/// Converts configured limits into transport settings.
const fn transport_config(config: &PeerConfig) -> HttpTransportConfig {
    HttpTransportConfig {
        connect_timeout: Duration::from_millis(config.peer.connect_timeout_ms),
        request_timeout: Duration::from_millis(config.peer.request_timeout_ms),
        max_response_bytes: config.peer.max_response_bytes,
    }
}

/// Parses a base URL, preferring the flag over the configured value.
fn parse_url(label: &str, flag: Option<&str>, configured: &str) -> CliResult<Url> {
    let raw = flag.unwrap_or(configured).trim();
    let url = Url::parse(raw)
        .map_err(|err| CliError::new(format!("invalid {label} url {raw}: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => {
            Err(CliError::new(format!("invalid {label} url {raw}: unsupported scheme {other}")))
        }
    }
}

// ============================================================================
// SECTION: ACL Check
// ============================================================================

/// Runs `acl check`.
fn command_acl_check(command: &AclCheckCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let provider = config
        .acl
        .build_provider()
        .map_err(|err| CliError::new(format!("invalid acl configuration: {err}")))?;
    register_acl_provider(Some(Arc::new(provider)));

    let proposal = load_signed_proposal(&command.proposal)
        .map_err(|err| CliError::new(format!("failed to read proposal: {err}")))?;
    let channel = ChannelId::new(command.channel.trim());
    acl_provider()
        .check_acl(&command.resource, &channel, &IdentityInfo::from(&proposal))
        .map_err(|err| CliError::new(format!("access denied: {err}")))?;
    write_stdout_line("allowed").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads and validates configuration.
fn load_config(path: Option<&Path>) -> CliResult<PeerConfig> {
    PeerConfig::load(path).map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    let help = command.render_help().to_string();
    write_stdout_line(help.trim_end()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Formats an output stream failure.
fn output_error(stream: &str, err: &std::io::Error) -> String {
    format!("failed to write to {stream}: {err}")
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Reports an error on stderr and returns the failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(&format!("Error: {message}"));
    ExitCode::FAILURE
}
