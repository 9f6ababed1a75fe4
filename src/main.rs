//! Coffee Cart
//!
//! Loads the cart, applies the requested changes and prints the receipt.

use std::{io, process::ExitCode};

use thiserror::Error;
use tracing::{error, info};

use coffee_cart::{
    cart::Mutation,
    config::Config,
    observability,
    pricing::PricingError,
    receipt::{Receipt, ReceiptError},
    session::{CartSession, SessionError},
};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            _ = err.print();

            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(err) = observability::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln"
        )]
        {
            eprintln!("{err}");
        }

        return ExitCode::FAILURE;
    }

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> Result<(), CliError> {
    let options = config.cart.session_options()?;
    let mut session = CartSession::mount(config.cart.source(), options)?;

    session.loaded().await?;

    for id in &config.actions.increments {
        report("increment", id, session.increment(id)?);
    }

    for id in &config.actions.decrements {
        report("decrement", id, session.decrement(id)?);
    }

    for id in &config.actions.removals {
        report("remove", id, session.remove(id)?);
    }

    let snapshot = session.snapshot();

    Receipt::from(&snapshot).write_to(io::stdout().lock())?;

    session.unmount();

    Ok(())
}

fn report(action: &str, id: &str, mutation: Mutation) {
    info!(action, item = id, ?mutation, "cart action");
}
