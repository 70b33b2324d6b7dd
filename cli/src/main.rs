//! VoteChain CLI: list elections, cast votes, and create elections against a
//! deployed voting contract.

mod report;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use votechain_chain::{HttpChainClient, RpcTransport};
use votechain_dashboard::{ClientConfig, ElectionCard, ElectionForm, VotingWorkflow, WorkflowError};
use report::{tally_lines, ConsoleRefresher};
use votechain_elections::ElectionRepository;
use votechain_types::{Bucket, Clock, ElectionId, SystemClock, WalletAddress};
use votechain_utils::{init_logging, LogFormat, Notifier, TracingNotifier};
use votechain_wallet::RpcWalletSigner;

#[derive(Parser)]
#[command(name = "votechain", about = "VoteChain election client")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "VOTECHAIN_CONFIG")]
    config: Option<PathBuf>,

    /// Node JSON-RPC endpoint.
    #[arg(long, env = "VOTECHAIN_NODE_URL")]
    node_url: Option<String>,

    /// Address of the voting contract.
    #[arg(long, env = "VOTECHAIN_CONTRACT")]
    contract: Option<WalletAddress>,

    /// Account that signs votes and new elections.
    #[arg(long, env = "VOTECHAIN_ACCOUNT")]
    account: Option<WalletAddress>,

    /// Seconds to wait for a transaction to be confirmed.
    #[arg(long, env = "VOTECHAIN_CONFIRMATION_TIMEOUT")]
    confirmation_timeout: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "VOTECHAIN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "VOTECHAIN_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// List elections, one bucket or all three.
    Elections {
        /// "active", "upcoming" or "past".
        #[arg(long)]
        bucket: Option<Bucket>,
    },
    /// Show one election with its candidates and tallies.
    Show { id: ElectionId },
    /// Vote for a candidate (zero-based index) in an election.
    Vote { id: ElectionId, candidate: usize },
    /// Create a new election.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Unix seconds or YYYY-MM-DDTHH:MM (UTC).
        #[arg(long)]
        start: String,
        /// Unix seconds or YYYY-MM-DDTHH:MM (UTC).
        #[arg(long)]
        end: String,
        /// Comma-separated candidate names.
        #[arg(long)]
        candidates: String,
    },
    /// Print the effective configuration as TOML.
    Config,
}

/// Prints outcomes for the person at the terminal and keeps them in the log.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify_success(&self, message: &str) {
        TracingNotifier.notify_success(message);
        println!("{message}");
    }

    fn notify_error(&self, message: &str) {
        TracingNotifier.notify_error(message);
        eprintln!("error: {message}");
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match cli.config {
        Some(ref path) => ClientConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(ref url) = cli.node_url {
        config.node_url = url.clone();
    }
    if let Some(ref contract) = cli.contract {
        config.contract_address = Some(contract.clone());
    }
    if let Some(ref account) = cli.account {
        config.account = Some(account.clone());
    }
    if let Some(secs) = cli.confirmation_timeout {
        config.confirmation_timeout_secs = secs;
    }
    if let Some(ref level) = cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.log_format = format.clone();
    }
    Ok(config)
}

fn connect(config: &ClientConfig) -> anyhow::Result<(RpcTransport, Arc<HttpChainClient>)> {
    let contract = config.contract()?.clone();
    let transport = RpcTransport::new(&config.node_url, config.request_timeout())?;
    let chain = HttpChainClient::new(
        transport.clone(),
        contract,
        config.receipt_poll_interval(),
    );
    Ok((transport, Arc::new(chain)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(LogFormat::from_name(&config.log_format), &config.log_level);
    if let Some(ref path) = cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Elections { bucket } => {
            let (_, chain) = connect(&config)?;
            let listing = ConsoleRefresher::new(ElectionRepository::new(chain), Arc::new(SystemClock));
            let buckets = match bucket {
                Some(b) => vec![b],
                None => Bucket::ALL.to_vec(),
            };
            for bucket in buckets {
                let lines = listing
                    .report(bucket)
                    .await
                    .with_context(|| format!("loading {bucket} elections"))?;
                for line in lines {
                    println!("{line}");
                }
            }
        }
        Command::Show { id } => {
            let (_, chain) = connect(&config)?;
            let repository = ElectionRepository::new(chain);
            let election = repository.fetch_details(id).await?;
            let card = ElectionCard::new(&election, SystemClock.now());
            println!("{} {}", election.id, election.title);
            if !election.description.is_empty() {
                println!("{}", election.description);
            }
            println!("{} ({})", card.status, card.time_label);
            println!("created by {}", election.creator.short());
            for line in tally_lines(&election) {
                println!("{line}");
            }
        }
        Command::Vote { id, candidate } => {
            let (workflow, repository) = build_workflow(&config)?;
            let refresher = ConsoleRefresher::new(repository, Arc::new(SystemClock)).focused_on(id);
            finish(workflow.submit_vote(Some(id), Some(candidate), &refresher).await)?;
        }
        Command::Create {
            title,
            description,
            start,
            end,
            candidates,
        } => {
            let form = ElectionForm {
                title,
                description,
                start_time: start,
                end_time: end,
                candidates,
            };
            let (workflow, repository) = build_workflow(&config)?;
            let refresher = ConsoleRefresher::new(repository, Arc::new(SystemClock));
            finish(workflow.submit_new_election(&form, &refresher).await)?;
        }
    }

    Ok(())
}

fn build_workflow(config: &ClientConfig) -> anyhow::Result<(VotingWorkflow, ElectionRepository)> {
    let (transport, chain) = connect(config)?;
    let signer = RpcWalletSigner::new(
        transport,
        config.contract()?.clone(),
        config.signer_account()?.clone(),
    );
    let workflow = VotingWorkflow::new(
        Arc::new(signer),
        chain.clone(),
        Arc::new(ConsoleNotifier),
        config.confirmation_timeout(),
    );
    Ok((workflow, ElectionRepository::new(chain)))
}

/// Failures already shown by the notifier only set the exit code.
fn finish<T>(result: Result<T, WorkflowError>) -> anyhow::Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.is_notifiable() => std::process::exit(1),
        Err(e) => Err(e.into()),
    }
}
