use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use colored::*;
use surplus_catalog::{countdown_label, filter_meals, home_feed, DietaryPreference, Meal};
use surplus_config::load as load_config;
use surplus_runtime::{
    map_links, shutdown_signal, spawn_countdown, telemetry, AppServices, LocalFileSource,
    PhotoCapability, ReservationOptions, SystemClock,
};
use surplus_users::utils::{validate_address, validate_email, validate_user_name};
use surplus_users::ImpactSummary;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "surplus")]
#[command(about = "Browse and reserve discounted surplus meals")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Express deals and regular meals (default)
    Home,
    /// Search meals by name or restaurant, honoring dietary preferences
    Search {
        #[arg(default_value = "")]
        query: String,
    },
    /// Meal details
    Show { meal_id: String },
    /// Reserve a meal
    Reserve {
        meal_id: String,
        /// Add the solidarity surcharge and donate a meal
        #[arg(long)]
        solidarity: bool,
    },
    /// Toggle a dietary preference (vegetarian, vegan, gluten-free, ...)
    Diet { tag: DietaryPreference },
    /// Toggle a favorite restaurant
    Favorite { restaurant_id: String },
    /// Show or edit the profile
    Profile(ProfileArgs),
    /// Impact dashboard
    Impact,
    /// Live countdown for an express meal
    Countdown { meal_id: String },
    /// Map links for a meal's restaurant
    Maps { meal_id: String },
}

#[derive(Args)]
struct ProfileArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    address: Option<String>,
    /// Image file to use as profile photo
    #[arg(long, conflicts_with = "clear_photo")]
    photo: Option<PathBuf>,
    /// Ask for the camera instead of the gallery
    #[arg(long, requires = "photo")]
    camera: bool,
    #[arg(long)]
    clear_photo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config().context("failed to load configuration")?;
    telemetry::init_tracing(&config.telemetry.level).context("failed to initialise tracing")?;

    let services = AppServices::initialise(&config)
        .await
        .context("failed to initialise app services")?;

    let result = match cli.command.unwrap_or(Commands::Home) {
        Commands::Home => show_home(&services),
        Commands::Search { query } => search(&services, &query),
        Commands::Show { meal_id } => show_meal(&services, &meal_id),
        Commands::Reserve {
            meal_id,
            solidarity,
        } => reserve(&services, &meal_id, solidarity).await,
        Commands::Diet { tag } => toggle_diet(&services, tag),
        Commands::Favorite { restaurant_id } => toggle_favorite(&services, &restaurant_id),
        Commands::Profile(args) => profile(&services, args).await,
        Commands::Impact => show_impact(&services),
        Commands::Countdown { meal_id } => countdown(&services, &meal_id).await,
        Commands::Maps { meal_id } => show_maps(&services, &meal_id),
    };

    services.shutdown().await;
    result
}

fn show_home(services: &AppServices) -> anyhow::Result<()> {
    let feed = home_feed(&services.catalog, services.home_regular_limit);
    let now = Utc::now();

    println!("{}", "⚡ Express".bold().yellow());
    if feed.express.is_empty() {
        println!("  (sem ofertas express)");
    }
    for meal in &feed.express {
        let remaining = meal
            .express_expires_at
            .map(|deadline| countdown_label(deadline, now))
            .unwrap_or_default();
        print_meal_line(meal);
        println!("      {} {}", "⏱".yellow(), remaining.yellow());
    }

    println!();
    println!("{}", "Refeições".bold());
    for meal in &feed.regular {
        print_meal_line(meal);
    }
    Ok(())
}

fn search(services: &AppServices, query: &str) -> anyhow::Result<()> {
    let preferences = services.users.preferences();
    let results = filter_meals(&services.catalog, query, &preferences.dietary_preferences);
    debug!(query, results = results.len(), "search");

    if !preferences.dietary_preferences.is_empty() {
        let tags: Vec<_> = preferences
            .dietary_preferences
            .iter()
            .map(|tag| tag.label())
            .collect();
        println!("Filtros: {}", tags.join(", ").cyan());
    }
    if results.is_empty() {
        println!("Nenhuma refeição encontrada");
        return Ok(());
    }
    println!("{} resultados", results.len().to_string().yellow());
    for meal in results {
        print_meal_line(meal);
    }
    Ok(())
}

fn show_meal(services: &AppServices, meal_id: &str) -> anyhow::Result<()> {
    let meal = services.catalog.find(meal_id)?;
    let restaurant = &meal.restaurant;

    let title = if meal.is_express {
        format!("{} {}", meal.name.bold(), "EXPRESS".yellow().bold())
    } else {
        meal.name.bold().to_string()
    };
    println!("{title}");
    println!("{}", meal.description);
    println!(
        "{}  {} · {} km",
        restaurant.name.green(),
        restaurant.address,
        restaurant.distance
    );
    println!(
        "Recolha {} - {}",
        meal.pickup_time.start, meal.pickup_time.end
    );
    println!("{} kg CO₂ evitado", meal.carbon_saved);
    println!("{} refeições disponíveis", meal.available_quantity);
    if !meal.dietary_info.is_empty() {
        let tags: Vec<_> = meal.dietary_info.iter().map(|tag| tag.label()).collect();
        println!("{}", tags.join(" · ").cyan());
    }
    println!(
        "{} {}  (-{}%)",
        format!("{:.2}€", meal.original_price).strikethrough(),
        format!("{:.2}€", meal.discounted_price).green().bold(),
        meal.discount_percent()
    );
    if services.users.preferences().is_favorite(&restaurant.id) {
        println!("{}", "★ Restaurante favorito".yellow());
    }
    Ok(())
}

async fn reserve(services: &AppServices, meal_id: &str, solidarity: bool) -> anyhow::Result<()> {
    let meal = services.catalog.find(meal_id)?.clone();
    let options = ReservationOptions { solidarity };

    println!(
        "A reservar {} por {}...",
        meal.name.bold(),
        format!("{:.2}€", services.reservations.quote(&meal, options)).green()
    );
    let receipt = services
        .reservations
        .reserve_detached(meal, options)
        .await
        .context("reservation task failed")??;

    println!(
        "{} Reserva confirmada: {:.2}€",
        "✓".green(),
        receipt.total_price
    );
    if receipt.donated {
        println!("{} Obrigado! Doaste uma refeição.", "♥".red());
    }
    info!(meal_id = %receipt.meal_id, "reservation finished");
    Ok(())
}

fn toggle_diet(services: &AppServices, tag: DietaryPreference) -> anyhow::Result<()> {
    let preferences = services.users.toggle_dietary_preference(tag)?;
    let state = if preferences.has_dietary_preference(tag) {
        "ativado".green()
    } else {
        "desativado".red()
    };
    println!("{}: {}", tag.label(), state);
    Ok(())
}

fn toggle_favorite(services: &AppServices, restaurant_id: &str) -> anyhow::Result<()> {
    let preferences = services.users.toggle_favorite_restaurant(restaurant_id)?;
    if preferences.is_favorite(restaurant_id) {
        println!("{} adicionado aos favoritos", restaurant_id.green());
    } else {
        println!("{} removido dos favoritos", restaurant_id.yellow());
    }
    Ok(())
}

async fn profile(services: &AppServices, args: ProfileArgs) -> anyhow::Result<()> {
    // Validate everything before changing anything.
    let name = args.name.as_deref().map(validate_user_name).transpose()?;
    let email = args.email.as_deref().map(validate_email).transpose()?;
    let address = args.address.as_deref().map(validate_address).transpose()?;

    let users = &services.users;
    if let Some(name) = name {
        users.update_user_name(name)?;
    }
    if let Some(email) = email {
        users.update_user_email(email)?;
    }
    if let Some(address) = address {
        users.update_user_address(address)?;
    }
    if args.clear_photo {
        users.update_profile_photo(None)?;
    }
    if let Some(path) = args.photo {
        let capability = if args.camera {
            PhotoCapability::Camera
        } else {
            PhotoCapability::Gallery
        };
        let source = LocalFileSource::new(path);
        match services.platform.choose_photo(&source, capability).await {
            Some(uri) => {
                users.update_profile_photo(Some(uri))?;
            }
            None => println!("{}", "Permissão necessária para atualizar a foto".yellow()),
        }
    }

    let preferences = users.preferences();
    println!("{}", preferences.user_name.bold());
    println!(
        "Email: {}",
        preferences.email().unwrap_or("Adicionar email")
    );
    println!(
        "Morada: {}",
        preferences.address().unwrap_or("Adicionar morada")
    );
    println!(
        "Foto: {}",
        preferences
            .profile_photo_uri
            .as_deref()
            .unwrap_or("(predefinida)")
    );
    Ok(())
}

fn show_impact(services: &AppServices) -> anyhow::Result<()> {
    let summary = ImpactSummary::from(&services.users.impact());

    println!("{}", "O teu impacto".bold().green());
    println!("  Refeições salvas:  {}", summary.meals_saved.to_string().yellow());
    println!("  CO₂ evitado:       {:.1} kg", summary.co2_saved);
    println!("                     {}", summary.km_avoided_label());
    println!("  Poupança:          {}", summary.money_saved_label().green());
    println!("  Refeições doadas:  {}", summary.meals_donated);
    println!("  Sequência:         {}", summary.current_streak);
    Ok(())
}

async fn countdown(services: &AppServices, meal_id: &str) -> anyhow::Result<()> {
    let meal = services.catalog.find(meal_id)?;
    let Some(expires_at) = meal.express_expires_at else {
        bail!("meal {meal_id} is not an express deal");
    };

    let mut receiver = spawn_countdown(expires_at, Arc::new(SystemClock));
    println!("{}", receiver.borrow_and_update().to_string().yellow());

    let ticks = async {
        while receiver.changed().await.is_ok() {
            println!("{}", receiver.borrow_and_update().to_string().yellow());
        }
    };
    tokio::select! {
        _ = ticks => {}
        _ = shutdown_signal() => {}
    }
    Ok(())
}

fn show_maps(services: &AppServices, meal_id: &str) -> anyhow::Result<()> {
    let meal = services.catalog.find(meal_id)?;
    println!("{}", meal.restaurant.name.bold());
    for link in map_links(&meal.restaurant) {
        println!("  {:<20} {}", link.provider.label(), link.url.cyan());
    }
    Ok(())
}

fn print_meal_line(meal: &Meal) {
    println!(
        "  [{}] {} · {}  {} {}",
        meal.id,
        meal.name.bold(),
        meal.restaurant.name,
        format!("{:.2}€", meal.discounted_price).green(),
        format!("-{}%", meal.discount_percent()).red()
    );
}
