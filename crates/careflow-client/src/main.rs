//! `careflow` - command-line access to the CareFlow API.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use careflow_client::schema::{
    Appointment, AppointmentFilter, AppointmentStatus, ChatRequest, LoginRequest, NewAppointment,
    NewComment, NewUser, ReportUpload, Role, SignupRequest, TermSearchRequest,
};
use careflow_client::{
    can_create_appointment, ApiClient, AuthState, ClientConfig, FileTokenStore, ScheduleSource,
    ScheduleView,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API base URL (overrides CAREFLOW_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Token file (overrides CAREFLOW_TOKEN_FILE)
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the API is up
    Health,
    /// Create a patient account and sign in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in and keep the token for later commands
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "patient")]
        role: Role,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List appointments
    Appointments(ListArgs),
    /// Book an appointment (doctors and receptionists)
    Book(BookArgs),
    /// Comment on an appointment
    Comment {
        id: String,
        content: String,
    },
    /// Mark an appointment cancelled
    Cancel { id: String },
    /// Delete an appointment
    Delete { id: String },
    /// List users, optionally by role
    Users {
        #[arg(long)]
        role: Option<Role>,
    },
    /// Create a user with an explicit role
    AddUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        role: Role,
    },
    /// Upload a health report (PDF, JPG, PNG) for AI analysis
    Analyze { file: PathBuf },
    /// Ask the AI nurse a question
    Ask {
        question: String,
        #[arg(long)]
        report_id: Option<String>,
    },
    /// Look up a medical term
    Term { query: String },
    /// Show popular medical terms
    PopularTerms,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// scheduled, completed, cancelled or all
    #[arg(long, default_value = "all")]
    status: String,
    #[arg(long)]
    patient: Option<String>,
    #[arg(long)]
    doctor: Option<String>,
    /// Show the bundled sample schedule instead of calling the API
    #[arg(long)]
    mock: bool,
}

#[derive(Args, Debug)]
struct BookArgs {
    #[arg(long)]
    patient_id: String,
    #[arg(long)]
    patient_name: String,
    #[arg(long)]
    doctor_id: String,
    #[arg(long)]
    doctor_name: String,
    /// YYYY-MM-DD
    #[arg(long)]
    date: String,
    #[arg(long)]
    time: String,
    #[arg(long)]
    reason: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::default();
    if let Some(url) = cli.api_url {
        config = config.with_base_url(url);
    }
    if let Some(path) = cli.token_file {
        config.token_file = path;
    }
    debug!(base_url = %config.base_url, token_file = %config.token_file.display(), "client config");

    let store = Arc::new(FileTokenStore::new(config.token_file.clone()));
    let auth = AuthState::restore(store)
        .await
        .context("Failed to read stored token")?;
    let client = ApiClient::new(config, auth).context("Failed to create HTTP client")?;

    match cli.command {
        Command::Health => {
            let health = client.health().await.context("Health check failed")?;
            println!(
                "{} ({})",
                health.status,
                health.service.as_deref().unwrap_or("CareFlow API")
            );
        }
        Command::Signup {
            name,
            email,
            password,
        } => {
            let user = client
                .signup(&SignupRequest {
                    email,
                    name,
                    password,
                })
                .await
                .context("Signup failed")?;
            println!("Welcome, {} ({})", user.name, user.role);
        }
        Command::Login {
            email,
            password,
            role,
        } => {
            let user = client
                .login(&LoginRequest {
                    email,
                    password,
                    role,
                })
                .await
                .context("Login failed")?;
            println!("Signed in as {} ({})", user.name, user.role);
        }
        Command::Logout => {
            client.logout().await.context("Logout failed")?;
            println!("Signed out");
        }
        Command::Whoami => match client.restore_session().await? {
            Some(user) => println!("{} <{}> - {}", user.name, user.email, user.role),
            None => println!("Not signed in"),
        },
        Command::Appointments(args) => list_appointments(&client, args).await?,
        Command::Book(args) => {
            let user = client.current_user().await.context("Could not verify session")?;
            if !can_create_appointment(user.role) {
                anyhow::bail!("{} accounts cannot book appointments", user.role);
            }
            let appointment = client
                .create_appointment(&NewAppointment {
                    patient_id: args.patient_id,
                    patient_name: args.patient_name,
                    doctor_id: args.doctor_id,
                    doctor_name: args.doctor_name,
                    date: args.date,
                    time: args.time,
                    reason: args.reason,
                })
                .await
                .context("Booking failed")?;
            info!(id = %appointment.id, "appointment created");
            print_appointment(&appointment);
        }
        Command::Comment { id, content } => {
            let comment = client
                .add_comment(&id, &NewComment { content })
                .await
                .context("Comment failed")?;
            println!("Comment {} added by {}", comment.id, comment.user_name);
        }
        Command::Cancel { id } => {
            let appointment = client
                .cancel_appointment(&id)
                .await
                .context("Cancel failed")?;
            print_appointment(&appointment);
        }
        Command::Delete { id } => {
            let ack = client
                .delete_appointment(&id)
                .await
                .context("Delete failed")?;
            println!("{}", ack.message);
        }
        Command::Users { role } => {
            let users = client.list_users(role).await.context("Listing users failed")?;
            for user in &users {
                println!("{:<26} {:<32} {:<13} {}", user.id, user.email, user.role, user.name);
            }
            println!("{} user(s)", users.len());
        }
        Command::AddUser {
            name,
            email,
            password,
            role,
        } => {
            let user = client
                .create_user(&NewUser {
                    email,
                    name,
                    role,
                    password,
                })
                .await
                .context("Creating user failed")?;
            println!("Created {} ({}) id={}", user.name, user.role, user.id);
        }
        Command::Analyze { file } => {
            let upload = ReportUpload::read(&file)
                .await
                .with_context(|| format!("Cannot upload {}", file.display()))?;
            let result = client
                .analyze_report(&upload)
                .await
                .context("Report analysis failed")?;
            println!("📄 {}\n", result.file_name);
            println!("Summary:\n{}\n", result.summary);
            println!("Analysis:\n{}", result.analysis);
        }
        Command::Ask {
            question,
            report_id,
        } => {
            let reply = client
                .nurse_chat(&ChatRequest {
                    question,
                    report_id,
                    conversation_history: None,
                })
                .await
                .context("AI nurse request failed")?;
            println!("{}", reply.answer);
        }
        Command::Term { query } => {
            let def = client
                .search_term(&TermSearchRequest { query })
                .await
                .context("Term search failed")?;
            println!("{}\n  {}", def.term, def.definition);
            for example in &def.examples {
                println!("  - {example}");
            }
        }
        Command::PopularTerms => {
            let popular = client
                .popular_terms()
                .await
                .context("Fetching popular terms failed")?;
            println!("{}", popular.terms.join(", "));
        }
    }
    Ok(())
}

async fn list_appointments(client: &ApiClient, args: ListArgs) -> Result<()> {
    let status = AppointmentStatus::parse_filter(&args.status)?;
    let filter = AppointmentFilter {
        status,
        patient: args.patient,
        doctor: args.doctor,
    };

    let source = if args.mock {
        ScheduleSource::Mock
    } else {
        if !client.auth().is_authenticated().await {
            anyhow::bail!("Not signed in; run `careflow login` or pass --mock");
        }
        ScheduleSource::Live
    };
    // Sample data ignores the server-side filters, so re-apply the status here.
    let view = ScheduleView::load_filtered(client, source, &filter).await;

    if let Some(message) = &view.error {
        eprintln!("⚠️  {message}");
    }
    let shown = view.filtered(status);
    for appointment in &shown {
        print_appointment(appointment);
    }
    println!(
        "{} appointment(s){}",
        shown.len(),
        if view.source == ScheduleSource::Mock {
            " [sample data]"
        } else {
            ""
        }
    );
    Ok(())
}

fn print_appointment(a: &Appointment) {
    println!(
        "{:<26} {} {:<9} {:<10} {} with Dr. {}{}",
        a.id,
        a.date,
        a.time,
        a.status,
        a.patient_name,
        a.doctor_name,
        a.reason
            .as_deref()
            .map(|r| format!(" - {r}"))
            .unwrap_or_default()
    );
    for comment in &a.comments {
        println!(
            "    💬 {} ({}), {}: {}",
            comment.user_name,
            comment.user_role,
            comment.timestamp.format("%Y-%m-%d %H:%M"),
            comment.content
        );
    }
}
