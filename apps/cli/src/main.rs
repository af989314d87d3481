mod config;
mod preferences;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    analytics::{tick_label, top_locations, trend_direction, TrafficSource},
    landing_for, ApiClient, ClientError, Landing, LeadMagnetController, LeadMagnetDraft,
    LinkDraft, LinkListController, LinkPatch, ProfileDraft, SessionContext,
};
use serde::Serialize;
use shared::{
    domain::{LeadMagnetId, LinkIcon, LinkId, Niche},
    protocol::{DateRange, Link},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{config::Settings, preferences::Preferences};

#[derive(Parser, Debug)]
#[command(name = "bioboard", about = "Manage a creator link page from the terminal")]
struct Args {
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange an OAuth callback code for a session.
    Login {
        #[arg(long)]
        code: String,
    },
    Whoami,
    Logout,
    #[command(subcommand)]
    Links(LinksCommand),
    #[command(subcommand)]
    Magnets(MagnetsCommand),
    Analytics {
        #[arg(long, default_value = "30days")]
        range: DateRange,
    },
    Dashboard,
    Onboard(ProfileArgs),
    Profile(ProfileArgs),
    /// List the icons a link may use.
    Icons,
    #[command(subcommand)]
    Theme(ThemeCommand),
}

#[derive(Subcommand, Debug)]
enum LinksCommand {
    List,
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        #[arg(long, default_value = "Link")]
        icon: String,
    },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    Remove {
        id: String,
    },
    /// Move a link into another link's slot.
    Move {
        moved: String,
        target: String,
    },
}

#[derive(Subcommand, Debug)]
enum MagnetsCommand {
    List,
    Add(MagnetArgs),
    Edit {
        id: String,
        #[command(flatten)]
        fields: MagnetArgs,
    },
    Remove {
        id: String,
    },
}

#[derive(clap::Args, Debug)]
struct MagnetArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    download_url: String,
}

impl MagnetArgs {
    fn draft(&self) -> LeadMagnetDraft {
        LeadMagnetDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            download_url: self.download_url.clone(),
        }
    }
}

#[derive(clap::Args, Debug)]
struct ProfileArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    username: String,
    #[arg(long)]
    niche: String,
    #[arg(long)]
    avatar: Option<String>,
}

impl ProfileArgs {
    fn draft(&self) -> ProfileDraft {
        ProfileDraft {
            name: self.name.clone(),
            username: self.username.clone(),
            niche: self.niche.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum ThemeCommand {
    Show,
    Toggle,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = config::load_settings(&args.config)?;
    init_tracing(&settings);

    let result = run(&args, &settings).await;
    if let Err(err) = &result {
        if err
            .downcast_ref::<ClientError>()
            .is_some_and(ClientError::requires_reauth)
        {
            eprintln!("Session expired or missing. Run `bioboard login --code <code>` first.");
        }
    }
    result
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn connect(settings: &Settings) -> Result<ApiClient> {
    let mut context = SessionContext::new(settings.api_base_url.clone());
    if let Some(token) = &settings.api_token {
        context = context.with_bearer_token(token.clone());
    }
    if let Some(timeout) = settings.request_timeout() {
        context = context.with_request_timeout(timeout);
    }
    info!(api_base_url = %context.base_url(), "connecting");
    ApiClient::new(context).context("failed to set up api client")
}

async fn run(args: &Args, settings: &Settings) -> Result<()> {
    match &args.command {
        Command::Login { code } => {
            let mut client = connect(settings)?;
            let response = client.login(code).await?;
            println!("Signed in as {} (@{})", response.user.name, response.user.username);
            if let Some(token) = &response.token {
                println!("export BIOBOARD_API_TOKEN={token}");
            }
            if landing_for(&response.user) == Landing::Onboarding {
                println!("Finish setup with `bioboard onboard`.");
            }
        }
        Command::Whoami => {
            let user = connect(settings)?.current_user().await?;
            if args.json {
                return print_json(&user);
            }
            let niche = user.niche.map(|niche| niche.label()).unwrap_or("-");
            println!("{} (@{}) <{}> niche: {niche}", user.name, user.username, user.email);
            if landing_for(&user) == Landing::Onboarding {
                println!("Onboarding is not complete.");
            }
        }
        Command::Logout => {
            connect(settings)?.logout().await?;
            println!("Signed out. Unset BIOBOARD_API_TOKEN to forget the token.");
        }
        Command::Links(command) => run_links(command, args.json, settings).await?,
        Command::Magnets(command) => run_magnets(command, args.json, settings).await?,
        Command::Analytics { range } => {
            let data = connect(settings)?.analytics(*range).await?;
            if args.json {
                return print_json(&data);
            }
            println!("Clicks, {}:", range.label());
            for point in &data.time_series {
                println!("  {:>16}  {}", tick_label(*range, &point.date), point.clicks);
            }
            println!("Top links:");
            for link in &data.top_links {
                println!("  {}  {}", link.title, link.clicks);
            }
            println!("Sources:");
            for source in &data.sources {
                println!(
                    "  {} ({:?})  {}  {:+.1}%",
                    source.name,
                    TrafficSource::from_name(&source.name),
                    source.value,
                    source.change
                );
            }
            println!("Locations:");
            for location in top_locations(&data, 5) {
                println!("  {}  {}", location.name, location.value);
            }
        }
        Command::Dashboard => {
            let stats = connect(settings)?.dashboard_stats().await?;
            if args.json {
                return print_json(&stats);
            }
            println!("Total clicks: {}", stats.total_clicks);
            println!(
                "Last 30 days: {} ({:?})",
                stats.last30_days_clicks,
                trend_direction(&stats)
            );
            println!("Lead magnet downloads: {}", stats.lead_magnet_downloads);
            if let Some(top) = &stats.top_link {
                println!("Top link: {} ({} clicks)", top.title, top.clicks);
            }
        }
        Command::Onboard(profile) => {
            connect(settings)?.onboard(&profile.draft()).await?;
            println!("Welcome aboard, @{}.", profile.username.trim());
        }
        Command::Profile(profile) => {
            connect(settings)?.update_profile(&profile.draft()).await?;
            println!("Profile updated.");
        }
        Command::Icons => {
            for icon in LinkIcon::ALL {
                println!("{} {}", icon.glyph(), icon.key());
            }
            println!();
            println!(
                "Niches: {}",
                Niche::ALL.map(Niche::label).join(", ")
            );
        }
        Command::Theme(command) => {
            let mut prefs = Preferences::load(&settings.preferences_path)?;
            if let ThemeCommand::Toggle = command {
                prefs.toggle_dark_mode();
                prefs.save(&settings.preferences_path)?;
            }
            println!("Theme: {}", prefs.theme_name());
        }
    }
    Ok(())
}

async fn run_links(command: &LinksCommand, json: bool, settings: &Settings) -> Result<()> {
    let controller = LinkListController::new(Arc::new(connect(settings)?));
    controller.load().await?;

    match command {
        LinksCommand::List => {}
        LinksCommand::Add { title, url, icon } => {
            let created = controller.add(&LinkDraft::new(title, url, icon)).await?;
            info!(link_id = %created.id, "link added");
        }
        LinksCommand::Edit {
            id,
            title,
            url,
            icon,
        } => {
            let patch = LinkPatch {
                title: title.clone(),
                url: url.clone(),
                icon: icon.clone(),
            };
            controller.update(&LinkId::new(id.as_str()), &patch).await?;
        }
        LinksCommand::Remove { id } => match controller.remove(&LinkId::new(id.as_str())).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => eprintln!("Link {id} was already gone."),
            Err(err) => return Err(err.into()),
        },
        LinksCommand::Move { moved, target } => {
            controller
                .reorder(&LinkId::new(moved.as_str()), &LinkId::new(target.as_str()))
                .await?;
        }
    }

    print_links(&controller.links().await, json)
}

async fn run_magnets(command: &MagnetsCommand, json: bool, settings: &Settings) -> Result<()> {
    let controller = LeadMagnetController::new(Arc::new(connect(settings)?));
    controller.load().await?;

    match command {
        MagnetsCommand::List => {}
        MagnetsCommand::Add(fields) => {
            controller.add(&fields.draft()).await?;
        }
        MagnetsCommand::Edit { id, fields } => {
            controller
                .update(&LeadMagnetId::new(id.as_str()), &fields.draft())
                .await?;
        }
        MagnetsCommand::Remove { id } => {
            match controller.remove(&LeadMagnetId::new(id.as_str())).await {
                Ok(()) => {}
                Err(err) if err.is_not_found() => eprintln!("Lead magnet {id} was already gone."),
                Err(err) => return Err(err.into()),
            }
        }
    }

    let items = controller.lead_magnets().await;
    if json {
        return print_json(&items);
    }
    if items.is_empty() {
        println!("No lead magnets yet.");
    }
    for item in &items {
        println!(
            "{}  {}  {}  downloads={}",
            item.id, item.title, item.download_url, item.downloads
        );
    }
    Ok(())
}

fn print_links(links: &[Link], json: bool) -> Result<()> {
    if json {
        return print_json(&links);
    }
    if links.is_empty() {
        println!("No links yet.");
    }
    for (position, link) in links.iter().enumerate() {
        println!(
            "{:>2}. {} {}  {}  clicks={}  [{}]",
            position + 1,
            link.icon.glyph(),
            link.title,
            link.url,
            link.clicks,
            link.id
        );
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
