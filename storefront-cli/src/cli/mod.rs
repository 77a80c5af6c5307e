use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use storefront_client::{CartStore, ClientConfig, NetworkHttpClient, SessionStorage};

mod cart;
mod checkout;
mod products;
mod token;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Skincare storefront CLI", long_about = None)]
pub(crate) struct Cli {
    /// Backend base URL; defaults to API_URL, BACKEND_URL, SERVER_URL or
    /// API_BASE_URL, then http://localhost:4000
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session directory holding the cart and bearer token
    #[arg(long, global = true, env = "STOREFRONT_DATA_DIR", default_value = ".storefront")]
    data_dir: PathBuf,

    /// Bearer token; overrides the token saved in the session
    #[arg(long, global = true, env = "STOREFRONT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Write logs to a daily rolling file in this directory
    #[arg(long, global = true, env = "STOREFRONT_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the catalog
    Products(products::ProductsArgs),
    /// Show one product
    Product(products::ProductArgs),
    /// Inspect or edit the cart
    Cart(cart::CartCommand),
    /// Place an order for the cart
    Checkout(checkout::CheckoutArgs),
    /// List accepted payment methods
    PaymentMethods,
    /// Manage the saved bearer token
    Token(token::TokenCommand),
}

/// Resolved configuration shared by every command
#[derive(Debug, Clone)]
pub(crate) struct Context {
    config: ClientConfig,
    session: SessionStorage,
}

impl Context {
    pub(crate) fn client(&self) -> anyhow::Result<NetworkHttpClient> {
        Ok(self.config.build_http_client()?)
    }

    pub(crate) fn cart(&self) -> CartStore {
        CartStore::with_storage(&self.session)
    }

    pub(crate) fn session(&self) -> &SessionStorage {
        &self.session
    }
}

impl Cli {
    pub(crate) fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }

    fn context(&self) -> Context {
        let session = SessionStorage::new(&self.data_dir);
        let mut config = match &self.api_url {
            Some(url) => ClientConfig::new(url.trim()),
            None => ClientConfig::from_env(),
        };
        config = config.with_token_path(session.token_file().path());
        if let Some(token) = self.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            config = config.with_token(token);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        tracing::debug!(base_url = %config.base_url, data_dir = %self.data_dir.display(), "Resolved configuration");
        Context { config, session }
    }

    pub(crate) async fn run(self) -> anyhow::Result<()> {
        let ctx = self.context();
        match self.command {
            Commands::Products(args) => products::list(&ctx, args).await,
            Commands::Product(args) => products::show(&ctx, args).await,
            Commands::Cart(command) => cart::run(&ctx, command).await,
            Commands::Checkout(args) => checkout::run(&ctx, args).await,
            Commands::PaymentMethods => {
                checkout::print_payment_methods();
                Ok(())
            }
            Commands::Token(command) => token::run(&ctx, command),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_explicit_api_url_and_token() {
        let cli = Cli::try_parse_from([
            "storefront",
            "--api-url",
            "http://shop.test/",
            "--token",
            " secret ",
            "--data-dir",
            "/tmp/sf",
            "payment-methods",
        ])
        .unwrap();
        let ctx = cli.context();
        assert_eq!(ctx.config.base_url, "http://shop.test");
        assert_eq!(ctx.config.token.as_deref(), Some("secret"));
        assert_eq!(
            ctx.config.token_path.as_deref(),
            Some(Path::new("/tmp/sf/token"))
        );
    }

    #[test]
    fn test_cart_set_accepts_negative_quantity() {
        let cli =
            Cli::try_parse_from(["storefront", "cart", "set", "p1", "-1"]).unwrap();
        assert!(matches!(cli.command, Commands::Cart(_)));
    }
}
