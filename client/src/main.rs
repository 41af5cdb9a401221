use anyhow::{bail, format_err, Result};
use clap::Parser;
use configparser::ini::Ini;
use hotdoge_staking::{
    contract::{Wallet, WalletType},
    states::{format_duration, now_unix, ActionOutcome, ActionStatus, PoolInfo, PoolPosition},
    sync::{Collaborators, PoolSynchronizer},
    Address, ApprovalPolicy, Orchestrator, StakingSession, TokenAmount, DEFAULT_DECIMALS,
};
use log::warn;
use std::{sync::Arc, thread, time::Duration};

mod instructions;
mod toast;
use instructions::rpc::RpcClient;
use instructions::staking_instructions::EvmStakingContract;
use instructions::token_instructions::Erc20;
use instructions::utils::{check_network, NodeWallet};
use toast::ConsoleNotifier;

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    http_url: String,
    network_id: u64,
    network_name: String,
    staking_address: Address,
    token_address: Address,
    account: Option<Address>,
    decimals: u8,
    poll_interval: Duration,
    receipt_poll: Duration,
    receipt_timeout: Duration,
    approval_policy: ApprovalPolicy,
}

const SECTION: &str = "Global";

fn required(config: &Ini, key: &str) -> Result<String> {
    config
        .get(SECTION, key)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| format_err!("{} must not be empty", key))
}

fn optional_uint(config: &Ini, key: &str, default: u64) -> Result<u64> {
    config
        .getuint(SECTION, key)
        .map(|value| value.unwrap_or(default))
        .map_err(|err| format_err!("{}: {}", key, err))
}

fn load_cfg(client_config: &str) -> Result<ClientConfig> {
    let mut config = Ini::new();
    config
        .load(client_config)
        .map_err(|err| format_err!("failed to load {}: {}", client_config, err))?;

    let http_url = required(&config, "http_url")?;
    let network_id = optional_uint(&config, "network_id", 1)?;
    let network_name = config
        .get(SECTION, "network_name")
        .unwrap_or_else(|| format!("chain {}", network_id));
    let staking_address = Address::parse(&required(&config, "staking_address")?)?;
    let token_address = Address::parse(&required(&config, "token_address")?)?;
    let account = config
        .get(SECTION, "account")
        .filter(|value| !value.is_empty())
        .map(|value| Address::parse(&value))
        .transpose()?;
    let decimals = u8::try_from(optional_uint(&config, "decimals", DEFAULT_DECIMALS as u64)?)
        .map_err(|_| format_err!("decimals must fit in a u8"))?;
    let poll_interval = Duration::from_secs(optional_uint(&config, "poll_interval_secs", 10)?);
    let receipt_poll = Duration::from_millis(optional_uint(&config, "receipt_poll_ms", 1_000)?);
    let receipt_timeout =
        Duration::from_secs(optional_uint(&config, "receipt_timeout_secs", 120)?);
    let abort = config
        .getbool(SECTION, "abort_deposit_on_failed_approval")
        .map_err(|err| format_err!("abort_deposit_on_failed_approval: {}", err))?
        .unwrap_or(false);

    Ok(ClientConfig {
        http_url,
        network_id,
        network_name,
        staking_address,
        token_address,
        account,
        decimals,
        poll_interval,
        receipt_poll,
        receipt_timeout,
        approval_policy: if abort {
            ApprovalPolicy::Abort
        } else {
            ApprovalPolicy::Proceed
        },
    })
}

#[derive(Debug, Parser)]
pub struct Opts {
    /// Path to the INI configuration.
    #[arg(long, default_value = "client_config.ini")]
    pub config: String,
    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,
    #[clap(subcommand)]
    pub command: StakingCommands,
}

#[derive(Debug, Parser)]
pub enum StakingCommands {
    Pools {},
    Position {
        #[arg(long)]
        pid: usize,
    },
    Fee {
        #[arg(long)]
        amount: Option<String>,
    },
    Rewards {},
    Balance {
        #[arg(long)]
        token: Option<Address>,
    },
    Deposit {
        #[arg(long)]
        pid: usize,
        #[arg(long)]
        amount: String,
    },
    Withdraw {
        #[arg(long)]
        pid: usize,
        #[arg(long)]
        amount: String,
    },
    WithdrawAll {
        #[arg(long)]
        pid: usize,
    },
    EmergencyWithdraw {
        #[arg(long)]
        pid: usize,
    },
    Claim {
        #[arg(long)]
        pid: usize,
    },
    Watch {
        /// Number of poll intervals to print before exiting.
        #[arg(long, default_value_t = 6)]
        ticks: u32,
    },
}

fn print_pools(pools: &[PoolInfo]) {
    if pools.is_empty() {
        println!("no pools");
    }
    for (pid, pool) in pools.iter().enumerate() {
        let lockup = if pool.has_lockup() {
            format_duration(pool.lockup_duration as i64)
        } else {
            "None".to_string()
        };
        println!(
            "[{}] stake {}{} | reward {} | {} per block | lockup {} | deposited {}",
            pid,
            pool.stake_token,
            if pool.lp_pool { " (LP)" } else { "" },
            pool.reward_token,
            pool.reward_per_block,
            lockup,
            pool.deposited_amount,
        );
    }
}

fn print_position(position: &PoolPosition) {
    let now = now_unix();
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };
    println!("pool {}", position.pid);
    println!("  total staked        {}", position.pool.deposited_amount);
    println!("  your stake          {}", position.staked());
    println!("  your share          {}%", position.user_share_percent());
    println!("  wallet balance      {}", position.balance);
    println!("  pending reward      {}", position.reward);
    println!("  deposit fee         {}", position.fee);
    println!(
        "  withdrawable in     {}",
        format_duration(position.remaining_lockup(now))
    );
    println!("  can withdraw        {}", yes_no(position.can_withdraw(now)));
    println!(
        "  can emergency exit  {}",
        yes_no(position.can_emergency_withdraw())
    );
    println!("  can harvest         {}", yes_no(position.can_claim()));
}

fn print_rewards(rewards: &[TokenAmount]) {
    let line: Vec<String> = rewards
        .iter()
        .enumerate()
        .map(|(pid, reward)| format!("[{}] {}", pid, reward))
        .collect();
    println!("{}", line.join("  "));
}

fn report(outcome: &ActionOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    }
    match &outcome.status {
        ActionStatus::Success { tx_hash } => {
            if !json {
                println!("{}", tx_hash);
            }
            Ok(())
        }
        ActionStatus::Failure { reason } => bail!("{}: {}", outcome.message(), reason),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = Opts::parse();
    let pool_config = load_cfg(&opts.config)?;

    // json-rpc client.
    let rpc = Arc::new(RpcClient::new(
        pool_config.http_url.clone(),
        pool_config.receipt_poll,
        pool_config.receipt_timeout,
    ));
    check_network(&rpc, pool_config.network_id, &pool_config.network_name);

    let wallet = Arc::new(NodeWallet::new(rpc.clone(), pool_config.account.clone()));
    if let Err(err) = wallet.connect(WalletType::MetaMask) {
        warn!("wallet not connected, continuing read-only: {}", err);
    }

    let token = Arc::new(Erc20::new(rpc.clone(), pool_config.decimals));
    let sync = Arc::new(PoolSynchronizer::with_decimals(
        Collaborators {
            staking: Arc::new(EvmStakingContract::new(
                rpc.clone(),
                pool_config.staking_address.clone(),
            )),
            token: token.clone(),
            balances: token,
            wallet: wallet.clone(),
            notifier: Arc::new(ConsoleNotifier),
        },
        pool_config.decimals,
    ));
    let orchestrator =
        Orchestrator::new(sync.clone()).with_approval_policy(pool_config.approval_policy);
    let parse_amount = |text: &str| TokenAmount::parse(text, pool_config.decimals);

    match opts.command {
        StakingCommands::Pools {} => {
            sync.refresh_pools()?;
            let pools = sync.pools();
            if opts.json {
                println!("{}", serde_json::to_string_pretty(&*pools)?);
            } else {
                print_pools(&pools);
            }
        }
        StakingCommands::Position { pid } => {
            sync.refresh_fee();
            sync.refresh_pools()?;
            sync.refresh_rewards();
            let position = sync.position(pid)?;
            if opts.json {
                println!("{}", serde_json::to_string_pretty(&position)?);
            } else {
                print_position(&position);
            }
        }
        StakingCommands::Fee { amount } => {
            let fee = sync.refresh_fee();
            match amount {
                Some(amount) => {
                    let amount = parse_amount(&amount)?;
                    println!("{} of {} is {}", fee, amount, fee.apply(&amount)?);
                }
                None => println!("{}", fee),
            }
        }
        StakingCommands::Rewards {} => {
            sync.refresh_pools()?;
            let rewards = sync.refresh_rewards();
            if opts.json {
                println!("{}", serde_json::to_string_pretty(&*rewards)?);
            } else {
                print_rewards(&rewards);
            }
        }
        StakingCommands::Balance { token } => {
            let token = token.unwrap_or_else(|| pool_config.token_address.clone());
            if wallet.account().is_none() {
                bail!("no wallet account to read a balance for");
            }
            println!("{}", sync.token_balance(&token));
        }
        StakingCommands::Deposit { pid, amount } => {
            let amount = parse_amount(&amount)?;
            sync.refresh_pools()?;
            report(&orchestrator.deposit(pid, &amount), opts.json)?;
        }
        StakingCommands::Withdraw { pid, amount } => {
            let amount = parse_amount(&amount)?;
            report(&orchestrator.withdraw(pid, &amount), opts.json)?;
        }
        StakingCommands::WithdrawAll { pid } => {
            report(&orchestrator.withdraw_all(pid), opts.json)?;
        }
        StakingCommands::EmergencyWithdraw { pid } => {
            report(&orchestrator.emergency_withdraw(pid), opts.json)?;
        }
        StakingCommands::Claim { pid } => {
            sync.refresh_pools()?;
            report(&orchestrator.claim(pid), opts.json)?;
        }
        StakingCommands::Watch { ticks } => {
            let mut session = StakingSession::new(sync.clone())
                .with_poll_interval(pool_config.poll_interval)
                .with_approval_policy(pool_config.approval_policy);
            session.start()?;
            for _ in 0..ticks {
                print_rewards(&sync.rewards());
                thread::sleep(pool_config.poll_interval);
            }
            session.shutdown();
        }
    }
    Ok(())
}
