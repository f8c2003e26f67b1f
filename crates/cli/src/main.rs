use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use stockwise_infra::{AppConfig, InventoryReader, PostgresInventoryStore, RestockPredictor};
use stockwise_inventory::{ALERT_THRESHOLD, low_stock_alert};

#[derive(Parser)]
#[command(version, about = "Inventory restock suggestions")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Low-stock items with their suggested restock quantity.
    Suggest {
        /// Show items with stock below this (overrides LOW_STOCK_THRESHOLD).
        #[arg(long)]
        threshold: Option<u32>,
        /// Stock level used when no prediction exists (overrides RESTOCK_TARGET).
        #[arg(long)]
        target: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Raw forecast for every item.
    Predict {
        #[arg(long)]
        json: bool,
    },
    /// Print the low-stock alert text, if any item needs one.
    Alerts,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;
    stockwise_observability::init();

    let store = PostgresInventoryStore::connect_lazy(&config.store)?;

    match cli.cmd {
        Cmd::Suggest {
            threshold,
            target,
            json,
        } => {
            let mut policy = config.suggestions;
            if let Some(t) = threshold {
                policy.low_stock_threshold = t;
            }
            if let Some(t) = target {
                policy.target_stock = t;
            }

            let rows = RestockPredictor::new(store)
                .suggestions(&policy)
                .await
                .context("failed to load low-stock items")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No items below {} units.", policy.low_stock_threshold);
            } else {
                println!(
                    "{:<32} {:>6} {:>8} {:>10}",
                    "ITEM", "STOCK", "RESTOCK", "TREND/DAY"
                );
                for r in &rows {
                    let marker = if r.predicted { "" } else { " *" };
                    println!(
                        "{:<32} {:>6} {:>8} {:>10.2}{marker}",
                        r.name, r.remaining_stock, r.quantity, r.trend
                    );
                }
                if rows.iter().any(|r| !r.predicted) {
                    println!(
                        "* no forecast available; topped up to {} units",
                        policy.target_stock
                    );
                }
            }
        }
        Cmd::Predict { json } => {
            let forecast = RestockPredictor::new(store).predict().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&forecast)?);
            } else {
                for (id, qty) in &forecast.predictions {
                    let trend = forecast.trend(*id).unwrap_or(0.0);
                    println!("item {id}: restock {qty} (trend {trend:.2}/day)");
                }
            }
        }
        Cmd::Alerts => {
            let low = store
                .low_stock_items(ALERT_THRESHOLD)
                .await
                .context("failed to load low-stock items")?;
            match low_stock_alert(&low) {
                Some(alert) => {
                    tracing::info!(subject = %alert.subject, "low stock alert raised");
                    println!("Subject: {}\n\n{}", alert.subject, alert.body);
                }
                None => tracing::info!("stock levels healthy"),
            }
        }
    }

    Ok(())
}
