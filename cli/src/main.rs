//! Momentum CLI - run account wizards against a Momentum server
//!
//! # Wizards
//!
//! ```bash
//! momentum register                                 # Employee self-registration
//! momentum create-account --account-type admin      # Admin or supervisor account
//! ```
//!
//! # Utilities
//!
//! ```bash
//! momentum check email ana@momentum.io              # One-shot uniqueness check
//! momentum definition account-creation -o form.json # Export a preset as JSON
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use momentum_cli::{run_wizard, CliConfig, CliResult, HttpGateway, TerminalUi};
use momentum_wizard::{
    presets, AccountType, CheckKind, HostUi, Notice, UniquenessChecker, WizardController,
    WizardDefinition,
};

#[derive(Parser)]
#[command(name = "momentum")]
#[command(about = "Register employees and create accounts on a Momentum server", long_about = None)]
struct Cli {
    /// Server root (overrides MOMENTUM_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Load the wizard definition from a JSON file
    #[arg(long, global = true)]
    definition: Option<PathBuf>,

    /// CSRF token to use when the server sets no cookie
    #[arg(long, global = true)]
    csrf_token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the employee registration wizard
    Register,

    /// Run the account creation wizard
    CreateAccount {
        /// Kind of account to create
        #[arg(long, value_enum)]
        account_type: ManagedAccount,
    },

    /// Check whether an email or username is already registered
    Check {
        #[command(subcommand)]
        target: CheckTarget,
    },

    /// Print a built-in wizard definition as JSON
    Definition {
        /// Preset to print
        #[arg(value_enum, default_value = "registration")]
        preset: Preset,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CheckTarget {
    /// Check an email address
    Email { value: String },

    /// Check a username
    Username { value: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum ManagedAccount {
    Admin,
    Supervisor,
}

impl From<ManagedAccount> for AccountType {
    fn from(account: ManagedAccount) -> Self {
        match account {
            ManagedAccount::Admin => AccountType::Admin,
            ManagedAccount::Supervisor => AccountType::Supervisor,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Registration,
    AccountCreation,
}

impl Preset {
    fn definition(self) -> WizardDefinition {
        match self {
            Preset::Registration => presets::registration(),
            Preset::AccountCreation => presets::account_creation(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = CliConfig::from_env()?.with_overrides(cli.base_url, cli.csrf_token)?;
    let custom = cli.definition.as_deref();

    match cli.command {
        Commands::Register => {
            let definition = load_definition(custom, Preset::Registration)?;
            cmd_wizard(&config, definition, AccountType::Employee).await
        }

        Commands::CreateAccount { account_type } => {
            let definition = load_definition(custom, Preset::AccountCreation)?;
            cmd_wizard(&config, definition, account_type.into()).await
        }

        Commands::Check { target } => match target {
            CheckTarget::Email { value } => cmd_check(&config, CheckKind::Email, &value).await,
            CheckTarget::Username { value } => cmd_check(&config, CheckKind::Username, &value).await,
        },

        Commands::Definition { preset, output } => cmd_definition(preset, output.as_deref()),
    }
}

fn load_definition(path: Option<&Path>, preset: Preset) -> CliResult<WizardDefinition> {
    match path {
        Some(path) => {
            eprintln!("📄 Loading definition: {}", path.display());
            Ok(WizardDefinition::from_file(path)?)
        }
        None => Ok(preset.definition()),
    }
}

async fn cmd_wizard(
    config: &CliConfig,
    definition: WizardDefinition,
    account_type: AccountType,
) -> CliResult<()> {
    let gateway = HttpGateway::new(config)?;
    let ui = TerminalUi::new(&definition);

    eprintln!("🚀 {} wizard ({}) on {}", definition.name, account_type, gateway.base_url());
    if let Err(e) = gateway.prime_session("/").await {
        log::warn!("Could not fetch session cookies: {}", e);
        ui.show_notice(&Notice::warning(
            "No session cookie from the server, submission may be refused.",
        ));
    }

    let controller = WizardController::with_config(
        definition,
        config.controller_config(),
        gateway.clone(),
        gateway,
        ui,
    )?;

    match run_wizard(&controller, account_type).await? {
        Some(result) => {
            eprintln!("\n✨ Done! {}", result.message);
            if controller.ui().reloaded() {
                eprintln!("   🔄 Reload the dashboard to see the new account.");
            }
        }
        None => controller.ui().show_notice(&Notice::info("Cancelled.")),
    }
    Ok(())
}

async fn cmd_check(config: &CliConfig, kind: CheckKind, value: &str) -> CliResult<()> {
    let gateway = HttpGateway::new(config)?;
    let result = gateway.check(kind, kind.default_endpoint(), value.trim()).await?;

    if result.exists {
        eprintln!("❌ {}", kind.conflict_message());
    } else {
        eprintln!("✅ {} '{}' is available", kind, value.trim());
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn cmd_definition(preset: Preset, output: Option<&Path>) -> CliResult<()> {
    let json = preset.definition().to_json()?;
    write_output(&json, output)
}

fn write_output(content: &str, path: Option<&Path>) -> CliResult<()> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Saved to: {}", p.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
