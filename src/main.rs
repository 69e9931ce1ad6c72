use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use visit_log::config::{config_file, data_dir, expand_path, load_config, CONFIG_TEMPLATE};
use visit_log::date::{display, month_start, parse_date, today};
use visit_log::query::export_to_file;
use visit_log::{
    add_client, register_visit, Client, ClientStore, Config, Result, Selection, Visit, VisitError,
    VisitFilter, VisitForm, VisitStore,
};

#[derive(Parser)]
#[command(name = "visit-log")]
#[command(version, about = "Minimal CLI log of commercial sales visits", long_about = None)]
struct Cli {
    /// Path to data directory (default: platform data dir or ~/.visit-log)
    #[arg(short = 'D', long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize data directory with config template and empty stores
    Init,

    /// List saved clients
    Clients {
        /// Only print the distinct client names, sorted
        #[arg(long)]
        names: bool,
    },

    /// Show the stored details of a client
    Client {
        /// Client name (the first client with this name is shown)
        name: String,
    },

    /// Save a client unless one with the same name and company exists
    AddClient {
        #[arg(long)]
        name: String,
        #[arg(long)]
        company: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long)]
        locality: String,
        #[arg(long, default_value = "")]
        zone: String,
    },

    /// Register a visit, saving the client if it is new
    Register {
        /// Visit date, YYYY-MM-DD or DD/MM/YYYY (default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Pre-fill client fields from a saved client with this name
        #[arg(short, long)]
        client: Option<String>,

        /// Contact name
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        locality: Option<String>,
        #[arg(long)]
        zone: Option<String>,

        /// Subject of the visit
        #[arg(short, long)]
        subject: Option<String>,
    },

    /// List visits, most recent first
    Visits {
        /// Only visits on or after this date
        #[arg(long, conflicts_with = "this_month")]
        from: Option<String>,

        /// Only visits since the first day of the current month
        #[arg(long)]
        this_month: bool,

        /// Filter by client name ("all" for every name)
        #[arg(long)]
        name: Option<String>,

        /// Filter by locality ("all" for every locality)
        #[arg(long)]
        locality: Option<String>,

        /// Filter by zone ("all" for every zone)
        #[arg(long)]
        zone: Option<String>,

        /// Print the matching visits as JSON
        #[arg(long, conflicts_with = "export")]
        json: bool,

        /// Write the matching visits to a CSV file (default name from config.toml)
        #[arg(long, value_name = "FILE", num_args = 0..=1)]
        export: Option<Option<PathBuf>>,
    },

    /// Show the values available for each visit filter
    Filters {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show store locations and record counts
    Status,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(p) => p,
        None => data_dir()?,
    };

    let config = load_config(&data_dir)?;
    init_logging(&config, cli.verbose);
    tracing::debug!(data_dir = %data_dir.display(), "using data directory");

    match cli.command {
        Commands::Init => cmd_init(&data_dir, &config),
        Commands::Clients { names } => cmd_clients(&data_dir, &config, names),
        Commands::Client { name } => cmd_client(&data_dir, &config, &name),
        Commands::AddClient {
            name,
            company,
            phone,
            locality,
            zone,
        } => cmd_add_client(&data_dir, &config, &name, &company, &phone, &locality, &zone),
        Commands::Register {
            date,
            client,
            name,
            company,
            phone,
            locality,
            zone,
            subject,
        } => {
            let typed = TypedFields {
                name,
                company,
                phone,
                locality,
                zone,
                subject,
            };
            cmd_register(&data_dir, &config, date, client, typed)
        }
        Commands::Visits {
            from,
            this_month,
            name,
            locality,
            zone,
            json,
            export,
        } => {
            let min_date = match from {
                Some(s) => Some(parse_date(&s)?),
                None if this_month => Some(month_start(today())),
                None => None,
            };
            let filter = VisitFilter {
                min_date,
                name: Selection::from(name),
                locality: Selection::from(locality),
                zone: Selection::from(zone),
            };
            cmd_visits(&data_dir, &config, &filter, json, export)
        }
        Commands::Filters { json } => cmd_filters(&data_dir, &config, json),
        Commands::Status => cmd_status(&data_dir, &config),
    }
}

/// RUST_LOG wins over config.toml; --verbose wins over both
fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.logging.level))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_clients(data_dir: &Path, config: &Config) -> Result<ClientStore> {
    ClientStore::open(config.clients_path(data_dir))
}

fn open_visits(data_dir: &Path, config: &Config) -> Result<VisitStore> {
    VisitStore::open(config.visits_path(data_dir))
}

/// Initialize data directory with config template and empty stores
fn cmd_init(data_dir: &Path, config: &Config) -> Result<()> {
    let cfg_path = config_file(data_dir);
    if cfg_path.exists() {
        return Err(VisitError::AlreadyInitialized(data_dir.to_path_buf()));
    }

    fs::create_dir_all(data_dir)?;
    fs::write(&cfg_path, CONFIG_TEMPLATE)?;

    let clients = open_clients(data_dir, config)?;
    let visits = open_visits(data_dir, config)?;

    println!("Initialized visit log at: {}", data_dir.display());
    println!("  Clients: {}", clients.path().display());
    println!("  Visits:  {}", visits.path().display());
    println!();
    println!("Register your first visit:");
    println!(
        "  visit-log register --name <name> --company <company> --locality <locality> --subject <subject>"
    );

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "Nombre")]
    name: String,
    #[tabled(rename = "Empresa")]
    company: String,
    #[tabled(rename = "Tlf")]
    phone: String,
    #[tabled(rename = "Localidad")]
    locality: String,
    #[tabled(rename = "Zona")]
    zone: String,
}

impl From<&Client> for ClientRow {
    fn from(c: &Client) -> Self {
        Self {
            name: c.name.clone(),
            company: c.company.clone(),
            phone: c.phone.clone(),
            locality: c.locality.clone(),
            zone: c.zone.clone(),
        }
    }
}

#[derive(Tabled)]
struct VisitRow {
    #[tabled(rename = "Fecha")]
    date: String,
    #[tabled(rename = "Nombre")]
    name: String,
    #[tabled(rename = "Empresa")]
    company: String,
    #[tabled(rename = "Tlf")]
    phone: String,
    #[tabled(rename = "Localidad")]
    locality: String,
    #[tabled(rename = "Zona")]
    zone: String,
    #[tabled(rename = "Asunto")]
    subject: String,
}

impl From<&Visit> for VisitRow {
    fn from(v: &Visit) -> Self {
        Self {
            date: display(v.date),
            name: v.name.clone(),
            company: v.company.clone(),
            phone: v.phone.clone(),
            locality: v.locality.clone(),
            zone: v.zone.clone(),
            subject: v.subject.clone(),
        }
    }
}

/// List saved clients
fn cmd_clients(data_dir: &Path, config: &Config, names_only: bool) -> Result<()> {
    let clients = open_clients(data_dir, config)?;

    if clients.is_empty() {
        println!("No clients saved yet.");
        println!("Clients are saved when you register a visit or run 'add-client'.");
        return Ok(());
    }

    if names_only {
        for name in clients.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let rows: Vec<ClientRow> = clients.list().iter().map(ClientRow::from).collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Show the stored details of a client
fn cmd_client(data_dir: &Path, config: &Config, name: &str) -> Result<()> {
    let clients = open_clients(data_dir, config)?;
    let client = clients
        .find_by_name(name)
        .ok_or_else(|| VisitError::ClientNotFound(name.trim().to_string()))?;

    println!("Nombre:    {}", client.name);
    println!("Empresa:   {}", client.company);
    println!("Tlf:       {}", client.phone);
    println!("Localidad: {}", client.locality);
    println!("Zona:      {}", client.zone);

    Ok(())
}

/// Save a client unless it already exists
fn cmd_add_client(
    data_dir: &Path,
    config: &Config,
    name: &str,
    company: &str,
    phone: &str,
    locality: &str,
    zone: &str,
) -> Result<()> {
    let mut clients = open_clients(data_dir, config)?;

    if add_client(&mut clients, name, company, phone, locality, zone)? {
        println!("Saved client {} ({})", name.trim(), company.trim());
    } else {
        println!(
            "Client {} ({}) already exists; stored details left unchanged",
            name.trim(),
            company.trim()
        );
    }

    Ok(())
}

/// Client and subject values given on the command line
struct TypedFields {
    name: Option<String>,
    company: Option<String>,
    phone: Option<String>,
    locality: Option<String>,
    zone: Option<String>,
    subject: Option<String>,
}

/// Register a visit, saving the client if it is new
fn cmd_register(
    data_dir: &Path,
    config: &Config,
    date: Option<String>,
    client_name: Option<String>,
    typed: TypedFields,
) -> Result<()> {
    let date = match date {
        Some(s) => parse_date(&s)?,
        None => today(),
    };

    let mut clients = open_clients(data_dir, config)?;
    let mut visits = open_visits(data_dir, config)?;

    let subject = typed.subject.unwrap_or_default();
    let mut form = match client_name {
        Some(name) => {
            let client = clients
                .find_by_name(&name)
                .ok_or_else(|| VisitError::ClientNotFound(name.trim().to_string()))?;
            VisitForm::from_client(date, client, &subject)
        }
        None => VisitForm {
            date,
            name: String::new(),
            company: String::new(),
            phone: String::new(),
            locality: String::new(),
            zone: String::new(),
            subject,
        },
    };

    // Explicit flags override pre-filled values
    let overrides = [
        (&mut form.name, typed.name),
        (&mut form.company, typed.company),
        (&mut form.phone, typed.phone),
        (&mut form.locality, typed.locality),
        (&mut form.zone, typed.zone),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            *field = value;
        }
    }

    let registration = register_visit(&mut clients, &mut visits, &form)?;

    if registration.client_saved {
        println!(
            "Saved new client {} ({})",
            form.name.trim(),
            form.company.trim()
        );
    }
    println!(
        "Visit with {} on {} registered",
        form.name.trim(),
        display(form.date)
    );

    Ok(())
}

/// List, dump or export filtered visits
fn cmd_visits(
    data_dir: &Path,
    config: &Config,
    filter: &VisitFilter,
    json: bool,
    export: Option<Option<PathBuf>>,
) -> Result<()> {
    let visits = open_visits(data_dir, config)?;
    let rows = visits.query(filter);

    if let Some(target) = export {
        let path = target.unwrap_or_else(|| expand_path(&config.export.file_name));
        let written = export_to_file(&path, &rows)?;
        println!("Exported {written} visit(s) to {}", path.display());
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Results ({} visits):", rows.len());
    if rows.is_empty() {
        println!("No visits match the selected filters.");
        return Ok(());
    }

    let table_rows: Vec<VisitRow> = rows.iter().map(VisitRow::from).collect();
    let table = Table::new(table_rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Show the values available for each visit filter
fn cmd_filters(data_dir: &Path, config: &Config, json: bool) -> Result<()> {
    let visits = open_visits(data_dir, config)?;
    let options = visits.filter_options();

    if json {
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    let sections = [
        ("Names", &options.names),
        ("Localities", &options.localities),
        ("Zones", &options.zones),
    ];
    for (label, values) in sections {
        println!("{label}:");
        println!("  all");
        for value in values {
            println!("  {value}");
        }
    }

    Ok(())
}

/// Show store locations and record counts
fn cmd_status(data_dir: &Path, config: &Config) -> Result<()> {
    let clients = open_clients(data_dir, config)?;
    let visits = open_visits(data_dir, config)?;

    println!("Visit Log Status");
    println!("{}", "-".repeat(50));

    let cfg_path = config_file(data_dir);
    if cfg_path.exists() {
        println!("Config:         {}", cfg_path.display());
    } else {
        println!("Config:         {} (defaults)", cfg_path.display());
    }
    println!("Data directory: {}", data_dir.display());
    println!("Clients file:   {}", clients.path().display());
    println!("Visits file:    {}", visits.path().display());
    println!("Clients:        {}", clients.len());
    println!("Visits:         {}", visits.len());

    if !visits.is_empty() {
        println!();
        println!("Recent visits:");
        for visit in visits.query(&VisitFilter::default()).iter().take(5) {
            println!(
                "  {} - {} ({}) - {}",
                display(visit.date),
                visit.name,
                visit.company,
                visit.subject
            );
        }
    }

    Ok(())
}
