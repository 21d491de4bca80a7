use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
};

use anyhow::{bail, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{
    display::format_short_date, load_settings_from, normalize_server_url, AppointmentStore,
    AppointmentsClient, BookingState, ClientSettings, Phase,
};
use shared::{
    domain::{AppointmentId, FormField, Gender, VisitStatus},
    protocol::{Appointment, AppointmentDraft},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Book and manage doctor appointments")]
struct Cli {
    /// Overrides the configured appointment service URL.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, default_value = client_core::config::DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every stored appointment.
    List,
    /// Book a new appointment.
    Book(FieldArgs),
    /// Change the given fields of an existing appointment.
    Update {
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete an appointment after confirmation.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(ClapArgs, Debug, Default)]
struct FieldArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    doctor: Option<String>,
    #[arg(long)]
    gender: Option<Gender>,
    #[arg(long)]
    age: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    status: Option<VisitStatus>,
}

impl FieldArgs {
    fn values(&self) -> Vec<(FormField, String)> {
        [
            (FormField::Name, self.name.clone()),
            (FormField::PhoneNumber, self.phone.clone()),
            (FormField::DoctorName, self.doctor.clone()),
            (FormField::Gender, self.gender.map(|g| g.as_str().to_string())),
            (FormField::Age, self.age.clone()),
            (FormField::Date, self.date.clone()),
            (FormField::Time, self.time.clone()),
            (FormField::Status, self.status.map(|s| s.as_str().to_string())),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field, value)))
        .collect()
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings_from(&cli.config)?;
    apply_server_override(&mut settings, cli.server_url.as_deref())?;
    let client =
        AppointmentsClient::with_timeout(&settings.server_url, settings.request_timeout())?;
    let store = AppointmentStore::new(Arc::new(client), settings.notice_ttl());

    let outcome = run(&store, cli.command).await;
    store.shutdown().await;
    outcome
}

fn apply_server_override(settings: &mut ClientSettings, url: Option<&str>) -> Result<()> {
    if let Some(url) = url {
        settings.server_url = normalize_server_url(url)?;
    }
    Ok(())
}

async fn run(store: &AppointmentStore, command: Command) -> Result<ExitCode> {
    match command {
        Command::List => {
            store.list().await;
            let state = store.snapshot().await;
            print_appointments(&state.mirror);
            Ok(ExitCode::SUCCESS)
        }
        Command::Book(fields) => {
            for (field, value) in fields.values() {
                store.set_field(field, value).await;
            }
            store.submit().await;
            let state = store.snapshot().await;
            if report_field_errors(&state) {
                return Ok(ExitCode::from(2));
            }
            if state.form != AppointmentDraft::default() {
                bail!("appointment was not saved; the service rejected or ignored the request");
            }
            match state.mirror.last() {
                Some(created) => println!("Booked appointment {}", created.id),
                None => println!("Booked appointment"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Update { id, fields } => {
            let id = AppointmentId::new(id);
            store.list().await;
            store.begin_edit(id.clone()).await;
            if store.snapshot().await.editing_id() != Some(&id) {
                bail!("no appointment with id {id}");
            }
            for (field, value) in fields.values() {
                store.set_field(field, value).await;
            }
            store.submit().await;
            let state = store.snapshot().await;
            if report_field_errors(&state) {
                return Ok(ExitCode::from(2));
            }
            if state.phase != Phase::Idle {
                bail!("appointment {id} was not updated; the edit is still open");
            }
            println!("Updated appointment {id}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Delete { id, yes } => {
            let id = AppointmentId::new(id);
            store.request_delete(id.clone()).await;
            let confirmed = yes || confirm("Are you sure you want to delete this appointment?")?;
            if !confirmed {
                store.cancel_delete().await;
                println!("Kept appointment {id}");
                return Ok(ExitCode::SUCCESS);
            }
            store.confirm_delete().await;
            match store.snapshot().await.notice {
                Some(notice) => {
                    println!("{}", notice.kind.message());
                    Ok(ExitCode::SUCCESS)
                }
                None => bail!("appointment {id} was not deleted"),
            }
        }
    }
}

fn report_field_errors(state: &BookingState) -> bool {
    if state.errors.is_valid() {
        return false;
    }
    for (field, message) in state.errors.iter() {
        eprintln!("{}: {message}", field.label());
    }
    true
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_appointments(appointments: &[Appointment]) {
    if appointments.is_empty() {
        println!("No appointment found.");
        return;
    }
    println!(
        "{:<26} {:<20} {:<12} {:<22} {:<7} {:>3} {:<11} {:<6} {}",
        "ID", "NAME", "PHONE", "DOCTOR", "GENDER", "AGE", "DATE", "TIME", "STATUS"
    );
    for appointment in appointments {
        let d = &appointment.details;
        println!(
            "{:<26} {:<20} {:<12} {:<22} {:<7} {:>3} {:<11} {:<6} {}",
            appointment.id,
            d.name,
            d.phone_number,
            d.doctor_name,
            d.gender,
            d.age,
            format_short_date(&d.date),
            d.time,
            d.status
        );
    }
}
