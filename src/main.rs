use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};
use cmi_payment::application::callback::CallbackProcessor;
use cmi_payment::application::checkout;
use cmi_payment::config::MerchantConfig;
use cmi_payment::domain::field_map::FieldMap;
use cmi_payment::domain::order::PaymentRequest;
use cmi_payment::domain::ports::{TransactionStore, TransactionStoreBox};
use cmi_payment::domain::signature::{self, HASH_FIELD};
use cmi_payment::infrastructure::in_memory::InMemoryTransactionStore;
use cmi_payment::interfaces::csv::transaction_reader::TransactionReader;
use cmi_payment::interfaces::http::{self, AppState};
use miette::{IntoDiagnostic, Result, miette};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct MerchantArgs {
    /// Merchant id assigned by the gateway
    #[arg(long, env = "CMI_MERCHANT_ID")]
    merchant_id: String,

    /// Merchant store key shared with the gateway
    #[arg(long, env = "CMI_MERCHANT_KEY", hide_env_values = true)]
    merchant_key: String,

    /// Hosted payment page url
    #[arg(long, env = "CMI_GATEWAY_URL")]
    gateway_url: String,

    /// Capture approved payments immediately
    #[arg(long, env = "CMI_AUTO_CONFIRM", default_value_t = true, action = clap::ArgAction::Set)]
    auto_confirm: bool,
}

impl MerchantArgs {
    fn into_config(self) -> Result<MerchantConfig> {
        MerchantConfig::new(
            self.merchant_id,
            self.merchant_key,
            self.gateway_url,
            self.auto_confirm,
        )
        .into_diagnostic()
    }
}

#[derive(Subcommand)]
enum Command {
    /// Serve the callback, return and redirect endpoints
    Serve {
        #[command(flatten)]
        merchant: MerchantArgs,

        /// Address to listen on
        #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
        bind: String,

        /// Public address of the shop
        #[arg(long, env = "BASE_URL")]
        base_url: String,

        /// CSV file of pending transactions to load at startup
        #[arg(long)]
        transactions: Option<PathBuf>,
    },
    /// Print the signed redirect fields for a JSON payment request
    Sign {
        #[command(flatten)]
        merchant: MerchantArgs,

        /// JSON payment request file
        request: PathBuf,

        /// Public address of the shop
        #[arg(long, env = "BASE_URL")]
        base_url: String,

        /// Fixed nonce instead of a random one
        #[arg(long)]
        rnd: Option<String>,
    },
    /// Check the signature of a form-encoded callback payload
    Verify {
        /// File holding the raw callback body
        payload: PathBuf,

        /// Merchant store key shared with the gateway
        #[arg(long, env = "CMI_MERCHANT_KEY", hide_env_values = true, value_parser = NonEmptyStringValueParser::new())]
        merchant_key: String,
    },
}

async fn load_transactions(store: &InMemoryTransactionStore, path: PathBuf) -> Result<()> {
    let file = File::open(path).into_diagnostic()?;
    let reader = TransactionReader::new(file);
    for tx_result in reader.transactions() {
        match tx_result {
            Ok(tx) => store.store(tx).await.into_diagnostic()?,
            Err(e) => tracing::warn!(error = %e, "error reading transaction"),
        }
    }
    Ok(())
}

async fn serve(
    merchant: MerchantArgs,
    bind: String,
    base_url: String,
    transactions: Option<PathBuf>,
) -> Result<()> {
    let config = merchant.into_config()?;

    let store = InMemoryTransactionStore::new();
    if let Some(path) = transactions {
        load_transactions(&store, path).await?;
    }
    let ts_store: TransactionStoreBox = Box::new(store);

    let state = AppState::new(CallbackProcessor::new(config, ts_store), base_url);
    let app = http::router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await.into_diagnostic()?;
    tracing::info!("listening on {}", bind);
    axum::serve(listener, app).await.into_diagnostic()?;
    Ok(())
}

fn sign(
    merchant: MerchantArgs,
    request: PathBuf,
    base_url: String,
    rnd: Option<String>,
) -> Result<()> {
    let config = merchant.into_config()?;
    let file = File::open(request).into_diagnostic()?;
    let request: PaymentRequest = serde_json::from_reader(file).into_diagnostic()?;

    let rnd = rnd.unwrap_or_else(checkout::generate_rnd);
    let fields = checkout::build_redirect_fields(&config, &request, &base_url, &rnd)
        .into_diagnostic()?;

    let output = serde_json::json!({
        "action": config.gateway_url,
        "fields": fields,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}

fn verify(payload: PathBuf, merchant_key: String) -> Result<ExitCode> {
    let raw = std::fs::read_to_string(payload).into_diagnostic()?;
    let fields: FieldMap = serde_urlencoded::from_str(raw.trim()).into_diagnostic()?;
    let claimed = fields
        .get(HASH_FIELD)
        .ok_or_else(|| miette!("payload has no {HASH_FIELD} field"))?;

    if signature::verify(&fields, &merchant_key, claimed) {
        println!("valid");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("invalid");
        Ok(ExitCode::FAILURE)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            merchant,
            bind,
            base_url,
            transactions,
        } => serve(merchant, bind, base_url, transactions).await?,
        Command::Sign {
            merchant,
            request,
            base_url,
            rnd,
        } => sign(merchant, request, base_url, rnd)?,
        Command::Verify {
            payload,
            merchant_key,
        } => return verify(payload, merchant_key),
    }

    Ok(ExitCode::SUCCESS)
}
