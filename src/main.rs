use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Duration, Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use comfy_table::{Attribute, Cell, Table};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use vtc_facture::config::{AppPaths, Configuration};
use vtc_facture::stats::Window;
use vtc_facture::workflow::{HistoryFilter, Workspace};
use vtc_facture::{FactureError, InvoiceStatus, TripDraft, quote_fare, round_commercial};

#[derive(Parser)]
#[command(name = "vtc-facture", version, about = "Factures VTC : courses, TVA, historique, tableau de bord")]
struct Cli {
    /// Data directory (database, invoices, configuration)
    #[arg(long, global = true, env = "VTC_FACTURE_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new invoice
    New {
        /// Trip date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Trip time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        time: NaiveTime,
        /// Pick-up place
        #[arg(long)]
        from: String,
        /// Drop-off place
        #[arg(long)]
        to: String,
        /// Distance in km
        #[arg(long)]
        km: Decimal,
        /// Duration in minutes
        #[arg(long)]
        minutes: u32,
        /// Base fare before VAT (€)
        #[arg(long)]
        fare: Decimal,
        /// Client email
        #[arg(long)]
        email: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Suggest a base fare from the billing settings
    Quote {
        #[arg(long)]
        km: Decimal,
        #[arg(long)]
        minutes: u32,
    },
    /// List invoices, optionally exporting them
    History {
        /// First trip date (default: 30 days ago)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last trip date (default: today)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// issued, paid or cancelled
        #[arg(long)]
        status: Option<InvoiceStatus>,
        /// Export the listed invoices to a CSV file
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        export: Option<PathBuf>,
    },
    /// Show dashboard statistics
    Dashboard {
        /// 7d, 30d, year or all
        #[arg(long, default_value = "7d")]
        period: Window,
    },
    /// Regenerate the PDF of a stored invoice
    Render { id: i64 },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current configuration as JSON
    Show,
    /// Replace the configuration with the given JSON file
    Save { file: PathBuf },
    /// Store a PNG or JPEG logo
    Logo { file: PathBuf },
    /// Delete the configuration and logo
    Reset,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = AppPaths::new(resolve_data_dir(cli.data_dir));

    match run(cli.command, paths) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| {
            ProjectDirs::from("fr", "vtc", "vtc-facture").map(|dirs| dirs.data_dir().to_path_buf())
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| format!("invalid time '{s}' (expected HH:MM)"))
}

fn run(command: Commands, paths: AppPaths) -> Result<(), FactureError> {
    let workspace = Workspace::open(paths)?;
    let now = Local::now().naive_local();

    match command {
        Commands::New {
            date,
            time,
            from,
            to,
            km,
            minutes,
            fare,
            email,
            notes,
        } => {
            let draft = TripDraft {
                trip_date: date.and_time(time),
                origin: from,
                destination: to,
                distance_km: km,
                duration_min: minutes,
                base_fare: fare,
                client_email: email,
                notes,
            };
            let issued = workspace.issue(draft, now)?;
            println!("✅ Facture {} générée", issued.record.invoice_number);
            println!(
                "   TVA {:.2} €, total TTC {:.2} €",
                round_commercial(issued.record.tax_amount, 2),
                round_commercial(issued.record.total_amount, 2)
            );
            println!("   {}", issued.document.display());
        }
        Commands::Quote { km, minutes } => {
            let config = workspace.configuration();
            let quote = quote_fare(km, minutes, &config.billing.tariff());
            println!("Tarif suggéré : {:.2} € HT", round_commercial(quote, 2));
        }
        Commands::History {
            from,
            to,
            status,
            export,
        } => {
            let today = now.date();
            let filter = HistoryFilter {
                from: from.unwrap_or(today - Duration::days(30)),
                to: to.unwrap_or(today),
                status,
            };
            let records = workspace.history(&filter)?;
            if records.is_empty() {
                println!("Aucune facture sur la période.");
            } else {
                print_history(&records);
            }
            if let Some(target) = export {
                let target = (!target.as_os_str().is_empty()).then_some(target);
                let path = workspace.export_history(&filter, target)?;
                println!("✅ Export réalisé : {}", path.display());
            }
        }
        Commands::Dashboard { period } => {
            let dashboard = workspace.dashboard(period, now)?;
            print_dashboard(&dashboard);
        }
        Commands::Render { id } => {
            let path = workspace.rerender(id)?;
            println!("✅ {}", path.display());
        }
        Commands::Settings { action } => settings(&workspace, action)?,
    }
    Ok(())
}

fn settings(workspace: &Workspace, action: SettingsAction) -> Result<(), FactureError> {
    let store = workspace.settings();
    match action {
        SettingsAction::Show => {
            let config = workspace.configuration();
            let mut shown = config.clone();
            if !shown.email.email_password.is_empty() {
                shown.email.email_password = "********".into();
            }
            let json = serde_json::to_string_pretty(&shown)
                .map_err(|e| FactureError::Config(e.to_string()))?;
            println!("{json}");
        }
        SettingsAction::Save { file } => {
            let raw = std::fs::read_to_string(&file)
                .map_err(|e| FactureError::Config(format!("cannot read {}: {e}", file.display())))?;
            let config: Configuration = serde_json::from_str(&raw)
                .map_err(|e| FactureError::Config(format!("malformed {}: {e}", file.display())))?;
            store.save(&config)?;
            println!("✅ Paramètres sauvegardés");
        }
        SettingsAction::Logo { file } => {
            let bytes = std::fs::read(&file)
                .map_err(|e| FactureError::Config(format!("cannot read {}: {e}", file.display())))?;
            let path = store.save_logo(&bytes)?;
            println!("✅ Logo enregistré : {}", path.display());
        }
        SettingsAction::Reset => {
            store.reset()?;
            println!("✅ Paramètres réinitialisés");
        }
    }
    Ok(())
}

fn print_history(records: &[vtc_facture::InvoiceRecord]) {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("N° facture").add_attribute(Attribute::Bold),
        Cell::new("Date").add_attribute(Attribute::Bold),
        Cell::new("Départ").add_attribute(Attribute::Bold),
        Cell::new("Arrivée").add_attribute(Attribute::Bold),
        Cell::new("Km").add_attribute(Attribute::Bold),
        Cell::new("Durée").add_attribute(Attribute::Bold),
        Cell::new("Total TTC").add_attribute(Attribute::Bold),
        Cell::new("Statut").add_attribute(Attribute::Bold),
    ]);
    for r in records {
        table.add_row(vec![
            Cell::new(&r.invoice_number),
            Cell::new(r.trip_date.format("%d/%m/%Y %H:%M")),
            Cell::new(&r.origin),
            Cell::new(&r.destination),
            Cell::new(format!("{:.1} km", round_commercial(r.distance_km, 1))),
            Cell::new(format!("{} min", r.duration_min)),
            Cell::new(format!("{:.2} €", round_commercial(r.total_amount, 2))),
            Cell::new(r.status.label()),
        ]);
    }
    println!("{table}");
}

fn print_dashboard(dashboard: &vtc_facture::stats::Dashboard) {
    println!("📊 Tableau de bord : {}", dashboard.window);
    let stats = &dashboard.stats;
    if stats.is_empty() {
        println!("Aucune course sur la période.");
        return;
    }

    let mut kpis = Table::new();
    kpis.set_header(vec!["Courses", "CA total", "Distance", "Ticket moyen", "Durée moyenne", "Courses / jour"]);
    kpis.add_row(vec![
        stats.total_trips.to_string(),
        format!("{:.2} €", round_commercial(stats.total_revenue, 2)),
        format!("{:.1} km", round_commercial(stats.total_distance_km, 1)),
        format!("{:.2} €", round_commercial(stats.mean_ticket, 2)),
        format!("{:.0} min", round_commercial(stats.mean_duration_min, 0)),
        format!("{:.1}", round_commercial(stats.mean_trips_per_day, 1)),
    ]);
    println!("{kpis}");

    let mut daily = Table::new();
    daily.set_header(vec!["Jour", "CA", "Courses"]);
    for ((day, revenue), (_, trips)) in dashboard.daily_revenue.iter().zip(&dashboard.daily_trips) {
        daily.add_row(vec![
            day.format("%d/%m/%Y").to_string(),
            format!("{:.2} €", round_commercial(*revenue, 2)),
            trips.to_string(),
        ]);
    }
    println!("{daily}");
}
