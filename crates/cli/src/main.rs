use api_client::{HttpRecordGateway, PostalLookupClient, StaticIdentity};
use clap::{Parser, Subcommand};
use medireg_core::{
    gateway_config_from_env_values, steps, validate_field, AddressLookup,
    AddressLookupService, FieldId, FormController, GatewayConfig, HealthRecordController,
    HealthRecordField, Submission, STEPS,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod register;

#[derive(Parser)]
#[command(name = "medireg")]
#[command(about = "MediReg patient registration CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registration steps and their fields
    Steps,
    /// Validate a single field value
    Validate {
        /// Field name, e.g. `mobile` or `postalCode`
        field: String,
        /// Value to check
        value: String,
        /// Password to compare against when validating `confirmPassword`
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Look up district and state for a postal code
    Lookup {
        /// Six-digit postal code
        postal_code: String,
    },
    /// Register a new user interactively
    Register,
    /// Add a health record for a patient
    NewRecord {
        /// Patient identifier
        #[arg(long)]
        patient_id: String,
        #[arg(long, default_value = "")]
        diagnosis: String,
        #[arg(long, default_value = "")]
        prescription: String,
        #[arg(long, default_value = "")]
        status: String,
        #[arg(long, default_value = "")]
        notes: String,
        /// Signed-in doctor's identifier
        #[arg(long, env = "MEDIREG_DOCTOR_ID")]
        doctor_id: Option<String>,
    },
}

fn config_from_env() -> anyhow::Result<Arc<GatewayConfig>> {
    let cfg = gateway_config_from_env_values(
        std::env::var("MEDIREG_API_BASE_URL").ok(),
        std::env::var("MEDIREG_POSTAL_LOOKUP_URL").ok(),
        std::env::var("MEDIREG_SUCCESS_ROUTE").ok(),
    )?;
    Ok(Arc::new(cfg))
}

fn print_steps() {
    for (index, step) in STEPS.iter().enumerate() {
        println!("{}. {}", index + 1, step.title);
        for spec in step.fields {
            let required = if spec.required { "required" } else { "optional" };
            println!("   {:<22} {}", spec.field.as_str(), required);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medireg_cli=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Steps) => print_steps(),
        Some(Commands::Validate {
            field,
            value,
            password,
        }) => {
            let field: FieldId = field.parse()?;
            match validate_field(field, &value, steps::is_required(field), &password) {
                Ok(()) => println!("{} is valid", field.label()),
                Err(e) => anyhow::bail!("{e}"),
            }
        }
        Some(Commands::Lookup { postal_code }) => {
            let client = PostalLookupClient::new(config_from_env()?)?;
            match client.lookup(&postal_code).await? {
                AddressLookup::Found { district, state } => {
                    println!("District: {district}, State: {state}")
                }
                AddressLookup::NotFound => println!("No post office found for {postal_code}"),
            }
        }
        Some(Commands::Register) => {
            let cfg = config_from_env()?;
            let gateway = HttpRecordGateway::new(cfg.clone())?;
            let lookup = PostalLookupClient::new(cfg.clone())?;
            let mut controller = FormController::new(cfg.success_route());

            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut output = std::io::stdout();
            let outcome =
                register::run(&mut controller, &mut input, &mut output, &gateway, &lookup).await?;
            if outcome != Submission::Accepted {
                anyhow::bail!("registration was not completed");
            }
        }
        Some(Commands::NewRecord {
            patient_id,
            diagnosis,
            prescription,
            status,
            notes,
            doctor_id,
        }) => {
            let gateway = HttpRecordGateway::new(config_from_env()?)?;
            let identity = StaticIdentity::new(doctor_id);
            let mut controller =
                HealthRecordController::initialise(&identity, Some(patient_id.as_str())).await;
            controller.change_field(HealthRecordField::Diagnosis, diagnosis);
            controller.change_field(HealthRecordField::Prescription, prescription);
            controller.change_field(HealthRecordField::Status, status);
            controller.change_field(HealthRecordField::Notes, notes);

            let outcome = controller.submit(&gateway).await;
            for notice in controller.take_notices() {
                println!("{}", notice.message);
            }
            if outcome? != Submission::Accepted {
                anyhow::bail!("health record was not added");
            }
        }
        None => {
            println!("Use 'medireg --help' for commands");
        }
    }

    Ok(())
}
