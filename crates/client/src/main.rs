//! Headless command line for the medicine inventory.
//!
//! Runs the same client as the browser page, with terminal dialogs, and
//! prints the resulting view.

#[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
mod cli {
    use std::rc::Rc;

    use anyhow::{Result, bail};
    use clap::{Parser, Subcommand};

    use medstock_client::native::{LocalTaskScheduler, TerminalDialogs};
    use medstock_client::{ClientConfig, HttpInventoryApi, InventoryClient, ViewState};

    #[derive(Parser, Debug)]
    #[clap(name = "medstock", version, about = "Medicine inventory client.")]
    pub struct Cli {
        /// Inventory API base URL (overrides MEDSTOCK_API_URL).
        #[clap(long, global = true)]
        api_url: Option<String>,

        #[clap(subcommand)]
        command: Command,
    }

    #[derive(Subcommand, Debug)]
    enum Command {
        /// List all medicines.
        List,
        /// Add a medicine.
        Add { name: String, price: String },
        /// Change the price of a listed medicine.
        SetPrice { name: String, price: String },
        /// Delete a medicine.
        Delete {
            name: String,
            /// Skip the confirmation prompt.
            #[clap(long)]
            yes: bool,
        },
        /// Show the server-computed average price.
        Average,
    }

    pub async fn run(cli: Cli) -> Result<()> {
        let config = match cli.api_url {
            Some(url) => ClientConfig::new(url),
            None => ClientConfig::from_env(),
        };
        tracing::info!(api_url = config.api_url(), "using inventory api");

        let assume_yes = matches!(cli.command, Command::Delete { yes: true, .. });
        let client = InventoryClient::new(
            Rc::new(HttpInventoryApi::new(config)),
            Rc::new(TerminalDialogs::new(assume_yes)),
            Rc::new(LocalTaskScheduler),
        );

        match cli.command {
            Command::List => {
                client.fetch_medicines().await;
                print_list(&client.document().snapshot());
            }
            Command::Add { name, price } => {
                client.set_form_name(&name);
                client.set_form_price(&price);
                client.add_medicine().await;
                let view = client.document().snapshot();
                if let Some(message) = &view.form_message {
                    println!("{}", message.text);
                }
                print_list(&view);
            }
            Command::SetPrice { name, price } => {
                client.fetch_medicines().await;
                let Some(row) = client.document().read(|view| view.list.find(&name).map(|r| r.key))
                else {
                    bail!("no medicine named `{name}` is listed");
                };
                client.activate_edit_control(row).await;
                client.edit_price_input(row, &price);
                client.activate_edit_control(row).await;
                print_list(&client.document().snapshot());
            }
            Command::Delete { name, .. } => {
                client.delete_medicine(&name).await;
                print_list(&client.document().snapshot());
            }
            Command::Average => {
                client.calculate_average_price().await;
                if let Some(text) = client.document().read(|view| view.average.clone()) {
                    println!("{text}");
                }
            }
        }
        Ok(())
    }

    fn print_list(view: &ViewState) {
        print!("{}", view.list);
    }
}

#[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    use clap::Parser;

    dotenvy::dotenv().ok();
    medstock_observability::init();

    let cli = cli::Cli::parse();
    tokio::task::LocalSet::new().run_until(cli::run(cli)).await
}

#[cfg(not(all(feature = "cli", not(target_arch = "wasm32"))))]
fn main() {
    eprintln!("This binary requires the 'cli' feature on a native target.");
    eprintln!("Build with: cargo build --features cli");
    std::process::exit(1);
}
