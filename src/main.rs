use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pizza_cart::csv::{read_operations, write_summary};
use pizza_cart::notice::TracingSink;
use pizza_cart::{CartEngine, CartStore, FileStore, PricingConfig};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// Apply a csv script of cart operations and print the resulting cart.
#[derive(Debug, Parser)]
#[command(name = "pizza-cart", version)]
struct Args {
    /// Operations csv (op,line,item,name,price,quantity,size,toppings,code)
    operations: PathBuf,

    /// Directory holding the persisted cart
    #[arg(long, env = "PIZZA_CART_STORE_DIR", default_value = ".pizza-cart")]
    store_dir: PathBuf,

    /// JSON pricing config; defaults to the built-in constants
    #[arg(long)]
    pricing: Option<PathBuf>,

    /// Discard any persisted cart before applying operations
    #[arg(long)]
    fresh: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if args.operations.extension().is_none_or(|ext| ext != "csv") {
        warn!(path = %args.operations.display(), "input file seems to not be a csv file");
    }

    let config = match args.pricing.as_deref().map(PricingConfig::from_path) {
        None => PricingConfig::default(),
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut store = match FileStore::open(&args.store_dir) {
        Ok(store) => store,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if args.fresh {
        if let Err(e) = store.remove(pizza_cart::store::CART_STORAGE_KEY) {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    }

    let operations = match read_operations(args.operations.clone()) {
        Ok(operations) => operations,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut engine = CartEngine::new(store, config);
    let (op_sender, op_receiver) = tokio::sync::mpsc::channel(16);

    // csv reading is blocking; keep it off the engine's task
    tokio::task::spawn_blocking(move || {
        for result in operations {
            match result {
                Ok(op) => {
                    if op_sender.blocking_send(op).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    engine
        .run(ReceiverStream::new(op_receiver), &mut TracingSink)
        .await;

    if let Err(e) = write_summary(engine.cart(), io::stdout().lock()) {
        error!("{e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
