use std::{fs, path::Path, path::PathBuf};

use alloy_primitives::{Address, FixedBytes, U256};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gavel_types::ActionInfo;
use serde::de::DeserializeOwned;
use serde_json::json;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod encoder;
mod types;

use encoder::{Domain, Vote};
use types::{ActionJson, CreateActionRequest, SignedOutput, SignedPayload};

/// Off-chain helper for a Gavel governance core: hashes actions and permissions, and signs
/// `createActionBySig` / `castApprovalBySig` / `castDisapprovalBySig` payloads for relayers.
///
/// Output is JSON on stdout; logs go to stderr.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hash an action JSON file the way the core stores it.
    InfoHash {
        #[arg(long)]
        action: PathBuf,
    },
    /// Permission id a role needs to create actions for (target, selector, strategy).
    PermissionId {
        #[arg(long)]
        target: Address,
        #[arg(long)]
        selector: FixedBytes<4>,
        #[arg(long)]
        strategy: Address,
    },
    /// Sign a create-action request JSON file.
    SignCreate {
        #[command(flatten)]
        signer: SignerArgs,
        #[arg(long)]
        request: PathBuf,
    },
    /// Sign an approval of the action in an action JSON file.
    SignApproval(VoteArgs),
    /// Sign a disapproval of the action in an action JSON file.
    SignDisapproval(VoteArgs),
}

#[derive(Args, Debug)]
struct SignerArgs {
    /// Hex secp256k1 secret of the policyholder.
    #[arg(long, env = "GAVEL_PRIVATE_KEY", hide_env_values = true)]
    private_key: String,

    /// Name the core was deployed with (part of the EIP-712 domain).
    #[arg(long, env = "GAVEL_CORE_NAME", default_value = "Gavel")]
    core_name: String,

    #[arg(long, env = "GAVEL_CORE_ADDRESS")]
    core: Address,

    #[arg(long, env = "GAVEL_CHAIN_ID")]
    chain_id: u64,

    /// The policyholder's current nonce for this operation.
    #[arg(long, default_value = "0")]
    nonce: U256,
}

impl SignerArgs {
    fn domain(&self) -> Domain {
        Domain {
            name: self.core_name.clone(),
            chain_id: self.chain_id,
            core: self.core,
        }
    }
}

#[derive(Args, Debug)]
struct VoteArgs {
    #[command(flatten)]
    signer: SignerArgs,

    #[arg(long)]
    action: PathBuf,

    #[arg(long)]
    role: u8,

    #[arg(long, default_value = "")]
    reason: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = match cli.command {
        Command::InfoHash { action } => {
            let info: ActionInfo = read_json::<ActionJson>(&action)?.into();
            json!({
                "id": info.id,
                "info_hash": info.info_hash(),
                "permission_id": info.permission_id(),
            })
        }
        Command::PermissionId {
            target,
            selector,
            strategy,
        } => json!({ "permission_id": encoder::permission_id(target, selector, strategy) }),
        Command::SignCreate { signer, request } => {
            let request: CreateActionRequest = read_json(&request)?;
            let key = encoder::parse_signing_key(&signer.private_key)?;
            let payload =
                encoder::sign_create_action(&key, &signer.domain(), &request, signer.nonce)?;
            signed(payload)?
        }
        Command::SignApproval(args) => sign_vote(Vote::Approval, args)?,
        Command::SignDisapproval(args) => sign_vote(Vote::Disapproval, args)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn sign_vote(vote: Vote, args: VoteArgs) -> Result<serde_json::Value> {
    let info: ActionInfo = read_json::<ActionJson>(&args.action)?.into();
    let key = encoder::parse_signing_key(&args.signer.private_key)?;
    let payload = encoder::sign_vote(
        &key,
        &args.signer.domain(),
        vote,
        args.role,
        &info,
        &args.reason,
        args.signer.nonce,
    )?;
    signed(payload)
}

fn signed(payload: SignedPayload) -> Result<serde_json::Value> {
    info!(policyholder = %payload.policyholder, nonce = %payload.nonce, "payload signed");
    let output = SignedOutput {
        payload,
        signed_at: OffsetDateTime::now_utc().format(&Rfc3339)?,
    };
    Ok(serde_json::to_value(output)?)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!(path = %path.display(), "reading input");
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().without_time().with_writer(std::io::stderr))
        .init();
}
