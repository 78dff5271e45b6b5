use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use dotenvy::dotenv;
use rust_decimal::Decimal;
use tracing::{error, info};

use ride_admin::config::environment::EnvironmentConfig;
use ride_admin::controllers::{MutationDispatcher, PageView, Severity};
use ride_admin::dto::auth_dto::LoginForm;
use ride_admin::dto::document_dto::DocumentTypeForm;
use ride_admin::dto::pricing_dto::FareRequest;
use ride_admin::dto::reward_dto::{AdjustmentDirection, RewardForm};
use ride_admin::models::ride::count_by_status;
use ride_admin::models::{
    AdminProfile, DocumentStatus, DriverFilters, EntityId, PricingField, Ride, UserType,
    VehicleType,
};
use ride_admin::{AppError, AppResult, AppState};

#[derive(Parser)]
#[command(name = "ride-admin")]
#[command(about = "Administration console for the ride-hailing platform")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with an admin account
    Login {
        /// Account email
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },

    /// Clear the stored session
    Logout,

    /// Show the signed-in admin
    Whoami,

    /// Aggregate metrics and recent rides
    Dashboard,

    /// List drivers
    Drivers {
        /// Search name, email, phone or plate
        #[arg(short, long, default_value = "")]
        search: String,

        /// electric, regular or suv (default: all)
        #[arg(long)]
        vehicle_type: Option<VehicleType>,

        /// Only active (true) or inactive (false) drivers
        #[arg(long)]
        active: Option<bool>,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page (default: DEFAULT_PAGE_SIZE)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Driver details with documents and rides
    Driver {
        id: String,
    },

    /// Activate or deactivate a driver
    SetDriverActive {
        id: String,

        #[arg(action = ArgAction::Set)]
        active: bool,
    },

    /// Delete a driver account
    DeleteDriver {
        id: String,
    },

    /// Review a driver document
    ReviewDocument {
        driver: String,

        document: String,

        /// notSubmitted, pending, verified, rejected, expired
        status: DocumentStatus,

        /// Required when rejecting
        #[arg(long, default_value = "")]
        reason: String,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// List riders
    Riders {
        #[arg(short, long, default_value = "")]
        search: String,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Rider details with rides and reward points
    Rider {
        id: String,
    },

    /// Add or consume reward points for a rider
    AdjustPoints {
        rider: String,

        /// add or consume
        direction: AdjustmentDirection,

        /// Number of points (positive)
        magnitude: i64,

        description: String,
    },

    /// Delete one reward-point ledger entry of a rider
    DeletePoints {
        rider: String,

        entry: String,
    },

    /// Delete a rider account
    DeleteRider {
        id: String,
    },

    /// List the reward catalog
    Rewards {
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Create a reward
    CreateReward {
        title: String,

        description: String,

        points: i64,
    },

    /// Delete a reward
    DeleteReward {
        id: String,
    },

    /// List the document-type catalog
    DocumentTypes {
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Add an entry to the document-type catalog
    CreateDocumentType {
        /// Internal name (lowercase, digits, underscores)
        name: String,

        display_name: String,

        /// driver or rider
        #[arg(long, default_value = "driver")]
        user_type: UserType,

        #[arg(long, default_value = "")]
        description: String,

        /// Mark the document as required
        #[arg(long)]
        required: bool,
    },

    /// Edit an entry of the document-type catalog
    UpdateDocumentType {
        id: String,

        #[arg(long)]
        display_name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        required: Option<bool>,
    },

    /// Delete an entry of the document-type catalog
    DeleteDocumentType {
        id: String,
    },

    /// List pricing rules
    Pricing,

    /// Update one field of a pricing rule
    SetPrice {
        /// Rule id or name
        rule: String,

        /// base_price, price_per_km, price_per_minute, min_fare, cancel_fee,
        /// refund_distance_in_m, minimum_billable_distance, commission_percentage
        field: PricingField,

        value: String,
    },

    /// Compute a fare with a pricing rule
    Fare {
        /// Rule id or name
        rule: String,

        km: Decimal,

        minutes: Decimal,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv().ok();

    let level = std::env::var("RUST_LOG_LEVEL")
        .ok()
        .and_then(|raw| raw.parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = EnvironmentConfig::from_env()?;
    let state = AppState::new(config)?;

    match run(cli.command, &state).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!("❌ {}", e);
            eprintln!("Error: {}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(command: Commands, state: &AppState) -> AppResult<()> {
    let auth = state.auth_service()?;

    match command {
        Commands::Login { email, password } => {
            state.config.require_identity_key()?;
            let profile = auth.login(&LoginForm { email, password }).await?;
            info!("🚀 Sesión lista");
            println!("Logged in as {} <{}>", profile.name, profile.email);
            return Ok(());
        }
        Commands::Logout => {
            auth.logout().await?;
            println!("Logged out");
            return Ok(());
        }
        _ => {}
    }

    let profile = auth.restore().await?.ok_or_else(|| {
        AppError::Authentication("Not logged in. Run `ride-admin login` first.".to_string())
    })?;

    match command {
        Commands::Login { .. } | Commands::Logout => Ok(()),
        Commands::Whoami => {
            print_profile(&profile);
            Ok(())
        }
        Commands::Dashboard => dashboard(state).await,
        Commands::Drivers {
            search,
            vehicle_type,
            active,
            page,
            page_size,
        } => {
            let mut drivers = state.drivers();
            drivers.load().await?;
            let list = drivers.list_mut();
            if let Some(size) = page_size {
                list.set_page_size(size);
            }
            list.set_query(search);
            list.set_filters(DriverFilters {
                vehicle_type,
                active,
            });
            list.set_page(page.saturating_sub(1));

            let view = drivers.page();
            println!(
                "{:<8} {:<24} {:<28} {:<10} {:<7} {}",
                "ID", "NAME", "EMAIL", "VEHICLE", "ACTIVE", "PENDING DOCS"
            );
            for driver in &view.rows {
                println!(
                    "{:<8} {:<24} {:<28} {:<10} {:<7} {}",
                    driver.id,
                    driver.name,
                    driver.email,
                    driver.vehicle_type.map(|v| v.to_string()).unwrap_or_default(),
                    driver.is_active,
                    driver.pending_documents()
                );
            }
            print_page_footer(&view);
            Ok(())
        }
        Commands::Driver { id } => {
            let mut drivers = state.drivers();
            drivers.load().await?;
            drivers.open_detail(&EntityId::new(id)).await?;

            if let Some(detail) = drivers.detail().view() {
                let driver = &detail.driver;
                println!("{} <{}> {}", driver.name, driver.email, driver.phone);
                if let Some(vehicle) = driver.vehicle_type {
                    println!("Vehicle: {}", vehicle.label());
                }
                if let Some(details) = &driver.vehicle_details {
                    println!(
                        "         {} {} {} ({})",
                        details.color, details.make, details.model, details.year
                    );
                }
                println!(
                    "Active: {}  Rating: {:.1}  Rides: {}",
                    driver.is_active, driver.rating, driver.total_rides
                );
                println!();
                println!("Documents:");
                for doc in &detail.documents {
                    let reason = doc.rejection_reason.as_deref().unwrap_or("");
                    println!(
                        "  {:<6} {:<20} {:<13} {}",
                        doc.id,
                        doc.document_type.title(),
                        doc.status,
                        reason
                    );
                }
                if driver.all_documents_verified() {
                    println!("  All required documents are verified");
                }
                if let Some(updated) = driver.last_document_update() {
                    println!("  Last update: {}", updated.format("%Y-%m-%d %H:%M"));
                }
                println!();
                print_rides(&detail.rides);
            }
            Ok(())
        }
        Commands::SetDriverActive { id, active } => {
            let mut drivers = state.drivers();
            drivers.load().await?;
            let result = drivers.set_active(&EntityId::new(id), active).await;
            print_notifications(drivers.dispatcher_mut());
            result
        }
        Commands::DeleteDriver { id } => {
            let mut drivers = state.drivers();
            drivers.load().await?;
            let result = drivers.delete_driver(&EntityId::new(id)).await;
            print_notifications(drivers.dispatcher_mut());
            result
        }
        Commands::ReviewDocument {
            driver,
            document,
            status,
            reason,
            notes,
        } => {
            let mut drivers = state.drivers();
            drivers.load().await?;
            drivers.open_detail(&EntityId::new(driver)).await?;
            drivers.open_review(&EntityId::new(document))?;

            let form = drivers.review_form_mut().values_mut();
            form.status = status;
            form.rejection_reason = reason;
            form.notes = notes;

            let result = drivers.submit_review().await.map(|_| ());
            drivers.close_detail();
            print_notifications(drivers.dispatcher_mut());
            result
        }
        Commands::Riders {
            search,
            page,
            page_size,
        } => {
            let mut riders = state.riders();
            riders.load().await?;
            if let Some(size) = page_size {
                riders.list_mut().set_page_size(size);
            }
            riders.list_mut().set_query(search);
            riders.list_mut().set_page(page.saturating_sub(1));

            let view = riders.page();
            println!("{:<8} {:<24} {:<28} {:<14} {}", "ID", "NAME", "EMAIL", "PHONE", "RIDES");
            for rider in &view.rows {
                println!(
                    "{:<8} {:<24} {:<28} {:<14} {}",
                    rider.id, rider.name, rider.email, rider.phone, rider.total_rides
                );
            }
            print_page_footer(&view);
            Ok(())
        }
        Commands::Rider { id } => {
            let mut riders = state.riders();
            riders.load().await?;
            riders.open_detail(&EntityId::new(id)).await?;

            if let Some(detail) = riders.detail().view() {
                println!("{} <{}> {}", detail.rider.name, detail.rider.email, detail.rider.phone);
                let (completed, canceled) = detail.ride_counts();
                println!("Reward points: {}", detail.total_points());
                println!("Completed rides: {}  Canceled rides: {}", completed, canceled);
                println!();
                println!("Ledger:");
                for entry in &detail.ledger {
                    println!(
                        "  {:<6} {:>7} {}",
                        entry.id,
                        entry.amount,
                        entry.description
                    );
                }
                println!();
                print_rides(&detail.rides);
            }
            Ok(())
        }
        Commands::AdjustPoints {
            rider,
            direction,
            magnitude,
            description,
        } => {
            let mut riders = state.riders();
            riders.load().await?;
            riders.open_detail(&EntityId::new(rider)).await?;
            riders.open_adjustment(direction);

            let form = riders.adjustment_form_mut().values_mut();
            form.magnitude = magnitude;
            form.description = description;

            let result = riders.submit_adjustment().await;
            if let Some(detail) = riders.detail().view() {
                println!("Reward points: {}", detail.total_points());
            }
            print_notifications(riders.dispatcher_mut());
            result
        }
        Commands::DeletePoints { rider, entry } => {
            let mut riders = state.riders();
            riders.load().await?;
            riders.open_detail(&EntityId::new(rider)).await?;
            let result = riders.delete_ledger_entry(&EntityId::new(entry)).await;
            if let Some(detail) = riders.detail().view() {
                println!("Reward points: {}", detail.total_points());
            }
            print_notifications(riders.dispatcher_mut());
            result
        }
        Commands::DeleteRider { id } => {
            let mut riders = state.riders();
            riders.load().await?;
            let result = riders.delete_rider(&EntityId::new(id)).await;
            print_notifications(riders.dispatcher_mut());
            result
        }
        Commands::Rewards { search } => {
            let mut rewards = state.rewards();
            rewards.load().await?;
            rewards.list_mut().set_query(search);

            let view = rewards.page();
            println!("{:<8} {:<24} {:>8} {}", "ID", "TITLE", "POINTS", "DESCRIPTION");
            for reward in &view.rows {
                println!(
                    "{:<8} {:<24} {:>8} {}",
                    reward.id, reward.title, reward.point_required, reward.description
                );
            }
            print_page_footer(&view);
            Ok(())
        }
        Commands::CreateReward {
            title,
            description,
            points,
        } => {
            let mut rewards = state.rewards();
            rewards.form_mut().open_with(RewardForm {
                title,
                description,
                point_required: points,
            });
            let result = rewards.create().await.map(|_| ());
            print_notifications(rewards.dispatcher_mut());
            result
        }
        Commands::DeleteReward { id } => {
            let mut rewards = state.rewards();
            rewards.load().await?;
            let result = rewards.delete(&EntityId::new(id)).await;
            print_notifications(rewards.dispatcher_mut());
            result
        }
        Commands::DocumentTypes { search } => {
            let mut document_types = state.document_types();
            document_types.load().await?;
            document_types.list_mut().set_query(search);

            let view = document_types.page();
            println!(
                "{:<6} {:<24} {:<28} {:<8} {}",
                "ID", "NAME", "DISPLAY NAME", "FOR", "REQUIRED"
            );
            for definition in &view.rows {
                println!(
                    "{:<6} {:<24} {:<28} {:<8} {}",
                    definition.id,
                    definition.name,
                    definition.display_name,
                    definition.user_type.as_str(),
                    definition.is_required
                );
            }
            print_page_footer(&view);
            Ok(())
        }
        Commands::CreateDocumentType {
            name,
            display_name,
            user_type,
            description,
            required,
        } => {
            let mut document_types = state.document_types();
            document_types.open_create();
            *document_types.form_mut().values_mut() = DocumentTypeForm {
                name,
                display_name,
                description,
                is_required: required,
                user_type,
            };
            let result = document_types.save().await.map(|_| ());
            print_notifications(document_types.dispatcher_mut());
            result
        }
        Commands::UpdateDocumentType {
            id,
            display_name,
            description,
            required,
        } => {
            let mut document_types = state.document_types();
            document_types.load().await?;
            document_types.open_edit(&EntityId::new(id))?;

            let form = document_types.form_mut().values_mut();
            if let Some(display_name) = display_name {
                form.display_name = display_name;
            }
            if let Some(description) = description {
                form.description = description;
            }
            if let Some(required) = required {
                form.is_required = required;
            }

            let result = document_types.save().await.map(|_| ());
            print_notifications(document_types.dispatcher_mut());
            result
        }
        Commands::DeleteDocumentType { id } => {
            let mut document_types = state.document_types();
            document_types.load().await?;
            let result = document_types.delete(&EntityId::new(id)).await;
            print_notifications(document_types.dispatcher_mut());
            result
        }
        Commands::Pricing => {
            let mut pricing = state.pricing();
            pricing.load().await?;

            println!(
                "{:<6} {:<10} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>6}",
                "ID", "NAME", "BASE", "PER KM", "PER MIN", "MIN KM", "CANCEL", "MIN FARE", "COMM%"
            );
            for rule in pricing.rules() {
                println!(
                    "{:<6} {:<10} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>6}",
                    rule.id,
                    rule.name,
                    rule.base_price,
                    rule.price_per_km,
                    rule.price_per_minute,
                    rule.minimum_billable_distance,
                    rule.cancel_fee,
                    rule.min_fare,
                    rule.commission_percentage
                );
            }
            Ok(())
        }
        Commands::SetPrice { rule, field, value } => {
            let mut pricing = state.pricing();
            pricing.load().await?;
            let id = pricing
                .find(&rule)
                .map(|r| r.id.clone())
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown pricing rule '{}'", rule)))?;

            pricing.edit_field(&id, field, &value)?;
            let result = pricing.save(&id).await.map(|_| ());
            print_notifications(pricing.dispatcher_mut());
            result
        }
        Commands::Fare { rule, km, minutes } => {
            let mut pricing = state.pricing();
            pricing.load().await?;
            let id = pricing
                .find(&rule)
                .map(|r| r.id.clone())
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown pricing rule '{}'", rule)))?;

            let fare = pricing.fare(
                &id,
                &FareRequest {
                    distance_km: km,
                    duration_minutes: minutes,
                },
            )?;
            println!("Base fare:        {:>10}", fare.base_fare.round_dp(2));
            println!("Distance fare:    {:>10}", fare.distance_fare.round_dp(2));
            println!("Duration fare:    {:>10}", fare.duration_fare.round_dp(2));
            println!("Total fare:       {:>10}", fare.total_fare.round_dp(2));
            println!(
                "Commission ({}%): {:>10}",
                fare.commission_percentage,
                fare.commission_amount.round_dp(2)
            );
            println!("Driver earnings:  {:>10}", fare.driver_earnings.round_dp(2));
            println!("Points awarded:   {:>10}", fare.points_awarded);
            Ok(())
        }
    }
}

async fn dashboard(state: &AppState) -> AppResult<()> {
    let mut dashboard = state.dashboard();
    dashboard.load().await?;

    if let Some(view) = dashboard.view() {
        let stats = &view.stats;
        println!("Rides:               {}", stats.ride_count);
        println!("Active drivers:      {}", stats.active_drivers);
        println!("Total revenue:       {}", stats.total_revenue.round_dp(2));
        println!("Platform commission: {}", stats.platform_commission.round_dp(2));
        for ride_type in &stats.ride_type_counts {
            println!("  {:<10} {}", ride_type.name, ride_type.count);
        }
        println!();
        print_rides(&view.recent_rides);
    }
    Ok(())
}

fn print_profile(profile: &AdminProfile) {
    println!("{} <{}>", profile.name, profile.email);
    println!("Role: {:?}", profile.role);
}

fn print_rides(rides: &[Ride]) {
    let (completed, canceled) = count_by_status(rides);
    println!("Rides ({} completed, {} canceled):", completed, canceled);
    for ride in rides {
        println!(
            "  {:<8} {:<12} {:>8} {} -> {}",
            ride.id,
            format!("{:?}", ride.status),
            ride.base_fare.round_dp(2),
            ride.pickup_address,
            ride.dropoff_address
        );
    }
}

fn print_page_footer<T>(view: &PageView<'_, T>) {
    println!(
        "-- page {}/{} ({} matches)",
        view.page + 1,
        view.page_count,
        view.total_matches
    );
}

fn print_notifications(dispatcher: &mut MutationDispatcher) {
    for notification in dispatcher.notifications_mut().drain() {
        match notification.severity {
            Severity::Success | Severity::Info => println!("{}", notification.message),
            Severity::Error => eprintln!("{}", notification.message),
        }
    }
}
