//! Hotel booking: command line client
//!
//! Thin front-end over the `hotel_booking` library: every command goes
//! through the same session store, clients and workflow a GUI host would use.
//!
//! ```sh
//! # Rooms free for a stay
//! hotel-booking rooms --from 2024-06-01 --to 2024-06-04
//!
//! # Sign in once; the credential is kept for later runs
//! hotel-booking login alice@example.com --password secret
//!
//! # Book room 3 for three nights
//! hotel-booking book 3 --from 2024-06-01 --to 2024-06-04
//!
//! # Validate config without contacting the backend
//! hotel-booking --check
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use hotel_booking::{
    default_config_path, init_tracing, AppConfig, AuthIntent, Booking, BookingId, ClientError,
    ClientHandle, Room, RoomId, StayPeriod, UserRole, WorkflowState,
};

/// Hotel booking client: browse rooms, sign in and manage bookings.
#[derive(Parser, Debug)]
#[command(
    name = "hotel-booking",
    version,
    about = "Client for the hotel reservation API",
    long_about = "Browse the room catalog, sign in and submit or cancel bookings \
                  against a hotel reservation backend.\n\n\
                  Default config: ~/.config/hotel-booking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "HOTEL_BOOKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the backend base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit.
    #[arg(long)]
    check: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List rooms, or only those free for a stay.
    Rooms {
        #[arg(long, requires = "to")]
        from: Option<String>,
        #[arg(long, requires = "from")]
        to: Option<String>,
    },
    /// Show one room.
    Room { id: i64 },
    /// Sign in.
    Login {
        email: String,
        #[arg(long, env = "HOTEL_BOOKING_PASSWORD")]
        password: String,
    },
    /// Create an account and sign in.
    Register {
        email: String,
        #[arg(long, env = "HOTEL_BOOKING_PASSWORD")]
        password: String,
        /// Register with the admin role.
        #[arg(long)]
        admin: bool,
    },
    /// Sign out and forget the stored credential.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Book a room for a stay.
    Book {
        room: i64,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// List your bookings.
    Bookings,
    /// Show one booking.
    Booking { id: i64 },
    /// Cancel a booking.
    Cancel {
        id: i64,
        #[arg(long)]
        reason: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Some(config) => config,
        None => std::process::exit(2),
    };

    if cli.check {
        println!("✅ Configuration is valid");
        println!("   Base URL    : {}", config.api.base_url);
        println!("   Timeout     : {}s", config.api.timeout_secs);
        println!("   Credential  : {}", config.session.credential_path().display());
        println!("   Log level   : {}", config.logging.level);
        return;
    }

    let Some(command) = cli.command else {
        eprintln!("No command given, see --help");
        std::process::exit(2);
    };

    if let Err(e) = run(&config, command).await {
        error!(error = %e, "Command failed");
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Option<AppConfig> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let explicit = cli.config.is_some();

    let (mut config, load_error) = if explicit || config_path.exists() {
        match AppConfig::load(&config_path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (AppConfig::default(), Some(e)),
        }
    } else {
        (AppConfig::default(), None)
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref url) = cli.base_url {
        config.api.base_url = url.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config);

    if let Some(e) = load_error {
        error!("Failed to load config from {}: {}", config_path.display(), e);
        if explicit || cli.check {
            return None;
        }
        error!("Using default configuration.");
    } else {
        info!("Configuration: {}", config_path.display());
    }

    if let Err(e) = config.validate() {
        error!("{}", e);
        return None;
    }
    Some(config)
}

async fn run(config: &AppConfig, command: Command) -> Result<(), ClientError> {
    let client = ClientHandle::from_config(config)?;
    let workflow = &client.workflow;

    // Recover a stored session before anything else.
    workflow.start().await;

    match command {
        Command::Rooms { from, to } => {
            let rooms = match (from, to) {
                (Some(from), Some(to)) => {
                    let period = StayPeriod::parse(&from, &to)?;
                    workflow.available_rooms(&period).await?
                }
                _ => workflow.rooms().await?,
            };
            if rooms.is_empty() {
                println!("No rooms found");
            }
            for room in &rooms {
                print_room(room);
            }
        }
        Command::Room { id } => {
            let room = client.catalog.get_room(RoomId(id)).await?;
            print_room(&room);
            if let Some(description) = &room.description {
                println!("    {description}");
            }
        }
        Command::Login { email, password } => {
            let session = workflow.submit_auth(AuthIntent::login(email, password)).await?;
            println!("Signed in as {} ({})", session.user.email, session.user.role);
        }
        Command::Register {
            email,
            password,
            admin,
        } => {
            let role = if admin { UserRole::Admin } else { UserRole::Customer };
            let intent = AuthIntent::Register {
                email,
                password,
                role,
            };
            let session = workflow.submit_auth(intent).await?;
            println!("Registered and signed in as {}", session.user.email);
        }
        Command::Logout => {
            workflow.logout().await;
            println!("Signed out");
        }
        Command::Whoami => match workflow.session() {
            Some(session) => println!("{} ({})", session.user.email, session.user.role),
            None => println!("Not signed in"),
        },
        Command::Book { room, from, to } => {
            let period = StayPeriod::parse(&from, &to)?;
            let room = client.catalog.get_room(RoomId(room)).await?;
            if let WorkflowState::Unauthenticated { .. } = workflow.select_room(room) {
                return Err(ClientError::SessionExpired(
                    "run `hotel-booking login` first".into(),
                ));
            }
            let booking = workflow.submit_booking(period).await?;
            println!("Booking confirmed:");
            print_booking(&booking);
        }
        Command::Bookings => {
            let bookings = client.booking.list_bookings().await?;
            if bookings.is_empty() {
                println!("No bookings");
            }
            for booking in &bookings {
                print_booking(booking);
            }
        }
        Command::Booking { id } => {
            let booking = client.booking.get_booking(BookingId(id)).await?;
            print_booking(&booking);
        }
        Command::Cancel { id, reason } => {
            let booking = client.booking.cancel_booking(BookingId(id), &reason).await?;
            println!("Booking {} is now {}", booking.id, booking.status);
        }
    }

    Ok(())
}

fn print_room(room: &Room) {
    println!(
        "#{:<4} {:<14} {:>8}/night  {} guests{}",
        room.id,
        room.room_type,
        room.price,
        room.capacity,
        if room.available { "" } else { "  (unavailable)" }
    );
}

fn print_booking(booking: &Booking) {
    println!(
        "#{:<4} room {:<4} {} → {}  {:>8}  {}",
        booking.id,
        booking.room_id,
        booking.start_date.format("%Y-%m-%d"),
        booking.end_date.format("%Y-%m-%d"),
        booking.total_price,
        booking.status
    );
}
