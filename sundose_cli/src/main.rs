use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use sundose_core::*;

#[derive(Parser)]
#[command(name = "sundose")]
#[command(about = "Sunlight exposure log and vitamin D estimator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a sunlight session for today
    Log(SessionArgs),

    /// Estimate a session without logging it
    Estimate(SessionArgs),

    /// Show one day's sessions (default)
    Day {
        /// Day to show in DD-MM-YYYY form; today when omitted
        date: Option<String>,
    },

    /// Show totals for the last 7 recorded days
    Week,

    /// Show or update the user profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Args)]
struct SessionArgs {
    /// Session start time (HH:MM)
    #[arg(long)]
    start: String,

    /// Session end time (HH:MM)
    #[arg(long)]
    end: String,

    /// Exposed body regions, comma separated (e.g. head,torso,left_palm)
    #[arg(long, value_delimiter = ',')]
    expose: Vec<String>,

    /// Location label; the profile's home label when omitted
    #[arg(long)]
    location: Option<String>,

    /// Clear-sky UV index maximum; read from forecast.json when omitted
    #[arg(long)]
    uv: Option<f64>,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print the stored profile
    Show,

    /// Create the profile, or update the given fields of an existing one
    Set {
        /// Age in whole years
        #[arg(long)]
        age: Option<u32>,

        /// Daily vitamin D target in IU
        #[arg(long)]
        target: Option<u32>,

        /// Fitzpatrick skin type (1-6)
        #[arg(long)]
        skin_type: Option<u8>,

        /// Home location label
        #[arg(long)]
        location: Option<String>,

        /// Home latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Home longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    sundose_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Some(Commands::Log(args)) => cmd_log(data_dir, &config, args, false),
        Some(Commands::Estimate(args)) => cmd_log(data_dir, &config, args, true),
        Some(Commands::Day { date }) => cmd_day(data_dir, date),
        Some(Commands::Week) => cmd_week(data_dir),
        Some(Commands::Profile { action }) => match action {
            ProfileAction::Show => cmd_profile_show(data_dir),
            ProfileAction::Set {
                age,
                target,
                skin_type,
                location,
                lat,
                lon,
            } => cmd_profile_set(data_dir, age, target, skin_type, location, lat, lon),
        },
        None => {
            // Default to showing today
            cmd_day(data_dir, None)
        }
    }
}

fn cmd_log(data_dir: PathBuf, config: &Config, args: SessionArgs, dry_run: bool) -> Result<()> {
    let entries_path = data_dir.join("entries.json");
    let profile_path = data_dir.join("profile.json");
    let forecast_path = data_dir.join("forecast.json");

    let profile = require_profile(&profile_path)?;

    let start_time: LogTime = args.start.parse()?;
    let end_time: LogTime = args.end.parse()?;
    let body = parse_mask(&args.expose)?;
    let uv_clear_sky_max = resolve_uv(args.uv, &forecast_path, config)?;

    let draft = EntryDraft {
        start_time,
        end_time,
        location: args
            .location
            .unwrap_or_else(|| profile.location.label.clone()),
        body,
    };
    let duration_seconds = start_time.abs_duration_secs(end_time);

    if dry_run {
        let reading_iu = estimate_vitamin_d(
            &draft.body,
            start_time,
            duration_seconds,
            profile.skin_type,
            profile.age,
            uv_clear_sky_max,
        );
        display_session(&draft, &profile, duration_seconds, reading_iu, uv_clear_sky_max);
        println!("\n[Estimate only - session not logged]");
        return Ok(());
    }

    let today = LogDate::today();
    let mut reading_iu = 0;
    let store = EntryStore::update(&entries_path, today, |store| {
        reading_iu = store.process_entry(today, &draft, &profile, uv_clear_sky_max);
        Ok(())
    })?;

    display_session(&draft, &profile, duration_seconds, reading_iu, uv_clear_sky_max);
    println!("\n✓ Session logged for {}", today);
    println!(
        "  Today so far: {} IU (target {} IU)",
        store.daily_total(today),
        profile.target_iu
    );

    Ok(())
}

fn cmd_day(data_dir: PathBuf, date: Option<String>) -> Result<()> {
    let entries_path = data_dir.join("entries.json");
    let profile_path = data_dir.join("profile.json");

    let today = LogDate::today();
    let day = date.map(|s| s.parse()).transpose()?.unwrap_or(today);

    let store = EntryStore::load(&entries_path, today)?;

    println!("\n╭─────────────────────────────────────────╮");
    if day == today {
        println!("│  TODAY ({})", day);
    } else {
        println!("│  {}", day);
    }
    println!("╰─────────────────────────────────────────╯");
    println!();

    let times = store.sorted_times(day);
    if times.is_empty() {
        println!("  No sessions recorded.");
    } else {
        for time in &times {
            if let Some(entry) = store.entry(day, *time) {
                println!(
                    "  {}  {:>5} s  {:>6} IU  {}  [{}]",
                    time,
                    entry.duration_seconds,
                    entry.reading_iu,
                    entry.location,
                    region_list(&entry.body)
                );
            }
        }
    }

    println!();
    println!("  Total: {} IU", store.daily_total(day));
    if let Some(profile) = UserProfile::load(&profile_path)? {
        println!("  Target: {} IU", profile.target_iu);
    }

    Ok(())
}

fn cmd_week(data_dir: PathBuf) -> Result<()> {
    let entries_path = data_dir.join("entries.json");
    let profile_path = data_dir.join("profile.json");

    let today = LogDate::today();
    let store = EntryStore::load(&entries_path, today)?;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  LAST 7 DAYS");
    println!("╰─────────────────────────────────────────╯");
    println!();

    let mut week_total: u32 = 0;
    for day in store.last_7_days() {
        let total = store.daily_total(day);
        week_total += total;
        let marker = if day == today { "  (today)" } else { "" };
        println!("  {}  {:>6} IU{}", day, total, marker);
    }

    println!();
    println!("  Week total: {} IU", week_total);
    if let Some(profile) = UserProfile::load(&profile_path)? {
        println!("  Daily target: {} IU", profile.target_iu);
    }

    Ok(())
}

fn cmd_profile_show(data_dir: PathBuf) -> Result<()> {
    let profile_path = data_dir.join("profile.json");

    match UserProfile::load(&profile_path)? {
        Some(profile) => {
            println!("\n╭─────────────────────────────────────────╮");
            println!("│  PROFILE");
            println!("╰─────────────────────────────────────────╯");
            println!();
            print_profile(&profile);
        }
        None => {
            println!("No profile yet - run `sundose profile set` to create one.");
        }
    }

    Ok(())
}

fn cmd_profile_set(
    data_dir: PathBuf,
    age: Option<u32>,
    target: Option<u32>,
    skin_type: Option<u8>,
    location: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<()> {
    let profile_path = data_dir.join("profile.json");
    let existing = UserProfile::load(&profile_path)?;

    // Flags win over the stored profile; anything still unset is missing
    let age = age.or(existing.as_ref().map(|p| p.age));
    let target_iu = target.or(existing.as_ref().map(|p| p.target_iu));
    let skin_type = skin_type
        .map(SkinType::try_from)
        .transpose()?
        .or(existing.as_ref().map(|p| p.skin_type));
    let label = location.or_else(|| existing.as_ref().map(|p| p.location.label.clone()));
    let latitude = lat.or(existing.as_ref().map(|p| p.location.latitude));
    let longitude = lon.or(existing.as_ref().map(|p| p.location.longitude));

    let mut missing = Vec::new();
    if age.is_none() {
        missing.push("--age");
    }
    if target_iu.is_none() {
        missing.push("--target");
    }
    if skin_type.is_none() {
        missing.push("--skin-type");
    }
    if label.is_none() {
        missing.push("--location");
    }
    if latitude.is_none() {
        missing.push("--lat");
    }
    if longitude.is_none() {
        missing.push("--lon");
    }

    match (age, target_iu, skin_type, label, latitude, longitude) {
        (Some(age), Some(target_iu), Some(skin_type), Some(label), Some(latitude), Some(longitude)) => {
            let profile = UserProfile {
                age,
                target_iu,
                location: HomeLocation {
                    label,
                    latitude,
                    longitude,
                },
                skin_type,
            };
            profile.save(&profile_path)?;

            println!("✓ Profile saved");
            print_profile(&profile);
            Ok(())
        }
        _ => Err(Error::Profile(format!(
            "missing required fields: {}",
            missing.join(", ")
        ))),
    }
}

fn require_profile(path: &Path) -> Result<UserProfile> {
    UserProfile::load(path)?.ok_or_else(|| {
        Error::Profile(
            "no profile yet - run `sundose profile set --age ... --target ... \
             --skin-type ... --location ... --lat ... --lon ...` first"
                .into(),
        )
    })
}

fn parse_mask(expose: &[String]) -> Result<ExposureMask> {
    let mut mask = ExposureMask::none();
    for name in expose {
        let region: BodyRegion = name.trim().parse()?;
        mask.set(region, true);
    }
    Ok(mask)
}

/// Resolve the clear-sky UV maximum: explicit flag first, then the
/// forecast file dropped off by an external fetcher
fn resolve_uv(flag: Option<f64>, forecast_path: &Path, config: &Config) -> Result<f64> {
    if let Some(uv) = flag {
        return Ok(uv);
    }

    if let Some(forecast) = load_uv_forecast(forecast_path)? {
        if forecast.is_stale(chrono::Utc::now(), config.forecast.max_age_hours) {
            tracing::warn!(
                "Forecast at {:?} is older than {}h",
                forecast_path,
                config.forecast.max_age_hours
            );
            eprintln!(
                "Warning: forecast.json is older than {} hours",
                config.forecast.max_age_hours
            );
        }
        if let Some(uv) = forecast.clear_sky_max_today() {
            return Ok(uv);
        }
    }

    Err(Error::Input(
        "no UV data: pass --uv or drop a forecast.json in the data directory".into(),
    ))
}

fn display_session(
    draft: &EntryDraft,
    profile: &UserProfile,
    duration_seconds: u32,
    reading_iu: u32,
    uv_clear_sky_max: f64,
) {
    let bsa = compute_bsa(&draft.body, profile.age);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  SUNLIGHT SESSION");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  {} - {} ({} s) at {}",
        draft.start_time, draft.end_time, duration_seconds, draft.location
    );
    println!(
        "  Exposed: {} ({:.1}% of body)",
        region_list(&draft.body),
        bsa * 100.0
    );
    println!("  Clear-sky UV max: {}", uv_clear_sky_max);
    println!();
    println!("  → Estimated: {} IU vitamin D", reading_iu);
}

fn print_profile(profile: &UserProfile) {
    println!("  Age:        {}", profile.age);
    println!("  Skin type:  {}", u8::from(profile.skin_type));
    println!("  Target:     {} IU/day", profile.target_iu);
    println!(
        "  Home:       {} ({:.4}, {:.4})",
        profile.location.label, profile.location.latitude, profile.location.longitude
    );
}

fn region_list(mask: &ExposureMask) -> String {
    if mask.exposed_count() == 0 {
        return "nothing".to_string();
    }
    mask.exposed_regions()
        .map(|region| region.key())
        .collect::<Vec<_>>()
        .join(", ")
}
