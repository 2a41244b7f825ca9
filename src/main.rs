use clap::{Parser, Subcommand};
use tickbook::book::Orderbook;
use tickbook::config::{self, AppConfig};
use tickbook::order::{Order, OrderModify, OrderType, Side};
use tickbook::trade::Trades;
use tracing::info;

#[derive(Parser)]
#[command(name = "tickbook", about = "Tickbook Limit Order Book")]
struct Cli {
    #[arg(short, long, default_value = "config.toml")]
    config_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted order flow against a fresh book.
    Demo,
}

fn init_logging(cfg: &AppConfig) {
    match cfg.logger.format {
        config::LogFormat::JSON => {
            tracing_subscriber::fmt()
                .json()
                .with_max_level(cfg.logger.level)
                .init();
        }
        config::LogFormat::COMPACT => {
            tracing_subscriber::fmt()
                .compact()
                .with_max_level(cfg.logger.level)
                .init();
        }
    }
}

fn log_trades(trades: &Trades) {
    for trade in trades {
        info!(
            bid = trade.bid.order_id,
            ask = trade.ask.order_id,
            price = trade.ask.price,
            quantity = trade.bid.quantity,
            "trade"
        );
    }
}

fn demo(config: &AppConfig) {
    let book = Orderbook::with_close(config.market.close);

    // Rest liquidity on both sides.
    for (id, side, price, quantity) in [
        (1u64, Side::Sell, 101i32, 2u32),
        (2, Side::Sell, 103, 2),
        (3, Side::Buy, 99, 5),
    ] {
        book.add_order(Order::new(id, side, OrderType::GoodTillCancel, price, quantity));
    }
    info!(size = book.size(), "seeded book");

    // A market buy sweeps the whole ask ladder and rests its residual at
    // the worst ask price.
    let trades = book.add_order(Order::market(4, Side::Buy, 10));
    log_trades(&trades);

    // A fill-or-kill that cannot fully fill is rejected outright.
    let trades = book.add_order(Order::new(5, Side::Sell, OrderType::FillOrKill, 99, 50));
    info!(trades = trades.len(), "oversized fill-or-kill came back empty");

    // A fill-and-kill takes what it can and never rests.
    let trades = book.add_order(Order::new(6, Side::Sell, OrderType::FillAndKill, 99, 8));
    log_trades(&trades);

    // Reprice the remaining bid; the order keeps its type but loses its
    // place in the queue.
    let trades = book.modify_order(OrderModify::new(3, Side::Buy, 100, 3));
    log_trades(&trades);

    let depth = book.get_order_infos();
    for level in &depth.bids {
        info!(price = level.price, quantity = level.quantity, "bid level");
    }
    for level in &depth.asks {
        info!(price = level.price, quantity = level.quantity, "ask level");
    }
    info!(size = book.size(), "demo finished");
}

fn main() {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config_path.as_ref()).expect("could not load config");

    init_logging(&config);

    match cli.command {
        Commands::Demo => demo(&config),
    }
}
