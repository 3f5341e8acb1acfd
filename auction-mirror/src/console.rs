use {
    crate::{
        auction::service::{
            ban_seller::BanSellerInput,
            cancel_auction::CancelAuctionInput,
            change_owner::ChangeOwnerInput,
            create_auction::CreateAuctionInput,
            fulfill_auction::FulfillAuctionInput,
            place_bid::PlaceBidInput,
            Service,
        },
        config::ActionCommand,
        engine::{
            EXIT_CHECK_INTERVAL,
            SHOULD_EXIT,
        },
        error::EngineError,
        kernel::{
            entities::{
                parse_address,
                AuctionId,
            },
            wallet::EvmWallet,
        },
    },
    clap::Parser,
    ethers::types::H256,
    std::{
        io::BufRead,
        sync::{
            atomic::Ordering,
            Arc,
        },
    },
    tokio::sync::mpsc,
};

const CONSOLE_CHANNEL_SIZE: usize = 16;

/// Commands accepted on stdin while the mirror runs.
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(multicall = true)]
pub enum ConsoleCommand {
    /// Print the mirrored contract state.
    Status,
    /// Reload the whole contract state.
    Refresh,
    /// Switch the connected account to one of the loaded keys.
    Account { address: String },
    /// Disconnect the current account.
    Disconnect,
    /// Remember a bid amount for an auction, used by `bid` without `--amount`.
    SetBid {
        auction_id: AuctionId,
        amount:     String,
    },
    /// Stop the mirror.
    Quit,
    #[command(flatten)]
    Action(ActionCommand),
}

pub async fn dispatch_action(service: &Service, action: ActionCommand) -> Result<H256, EngineError> {
    match action {
        ActionCommand::CreateAuction {
            title,
            start_amount,
            duration_blocks,
        } => {
            service
                .create_auction(CreateAuctionInput {
                    title,
                    start_amount,
                    duration_blocks,
                })
                .await
        }
        ActionCommand::Bid { auction_id, amount } => {
            service
                .place_bid(PlaceBidInput { auction_id, amount })
                .await
        }
        ActionCommand::Cancel { auction_id } => {
            service
                .cancel_auction(CancelAuctionInput { auction_id })
                .await
        }
        ActionCommand::Fulfill { auction_id } => {
            service
                .fulfill_auction(FulfillAuctionInput { auction_id })
                .await
        }
        ActionCommand::Claim => service.claim().await,
        ActionCommand::Withdraw => service.withdraw().await,
        ActionCommand::ChangeOwner { new_owner } => {
            service
                .change_owner(ChangeOwnerInput { new_owner })
                .await
        }
        ActionCommand::BanSeller { seller } => service.ban_seller(BanSellerInput { seller }).await,
        ActionCommand::Destroy => service.destroy().await,
    }
}

/// Splits a console line into arguments, double quotes group words.
fn split_args(line: &str) -> Vec<String> {
    let mut args = vec![];
    let mut current = String::new();
    let mut quoted = false;
    let mut has_arg = false;
    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                has_arg = true;
            }
            c if c.is_whitespace() && !quoted => {
                if has_arg {
                    args.push(std::mem::take(&mut current));
                    has_arg = false;
                }
            }
            c => {
                current.push(c);
                has_arg = true;
            }
        }
    }
    if has_arg {
        args.push(current);
    }
    args
}

async fn handle_command(service: &Service, wallet: &EvmWallet, command: ConsoleCommand) {
    match command {
        ConsoleCommand::Status => service.get_snapshot().log_summary(),
        ConsoleCommand::Refresh => {
            let outcome = service.refresh_all().await;
            tracing::info!(outcome = ?outcome, "Refresh finished");
        }
        ConsoleCommand::Account { address } => {
            match parse_address(&address, "account").and_then(|account| wallet.select_account(account)) {
                Ok(()) => tracing::info!(address = %address, "Account selected"),
                Err(e) => tracing::error!(error = %e, "Failed to select account"),
            }
        }
        ConsoleCommand::Disconnect => wallet.disconnect(),
        ConsoleCommand::SetBid { auction_id, amount } => {
            service.set_bid_input(auction_id, amount).await;
        }
        ConsoleCommand::Quit => SHOULD_EXIT.store(true, Ordering::Release),
        ConsoleCommand::Action(action) => match dispatch_action(service, action).await {
            Ok(tx_hash) => tracing::info!(tx_hash = ?tx_hash, "Request confirmed"),
            Err(e) => tracing::error!(error = %e, "Request failed"),
        },
    }
}

fn spawn_stdin_reader() -> mpsc::Receiver<std::io::Result<String>> {
    let (sender, receiver) = mpsc::channel(CONSOLE_CHANNEL_SIZE);
    // Blocking stdin reads live on their own thread so shutdown never waits for input.
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if sender.blocking_send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

/// Reads console commands from stdin until shutdown or end of input.
pub async fn run_console(service: Service, wallet: Arc<EvmWallet>) -> anyhow::Result<()> {
    tracing::info!("Starting console, type `help` for the list of commands...");
    let mut lines = spawn_stdin_reader();
    let mut exit_check_interval = tokio::time::interval(EXIT_CHECK_INTERVAL);
    while !SHOULD_EXIT.load(Ordering::Acquire) {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else {
                    tracing::info!("Console input closed");
                    SHOULD_EXIT.store(true, Ordering::Release);
                    break;
                };
                let args = split_args(&line?);
                if args.is_empty() {
                    continue;
                }
                match ConsoleCommand::try_parse_from(args) {
                    Ok(command) => handle_command(&service, &wallet, command).await,
                    Err(e) => println!("{}", e),
                }
            }
            _ = exit_check_interval.tick() => {}
        }
    }
    tracing::info!("Shutting down console...");
    Ok(())
}
