use crate::components::{raid_helper::RaidHelper, ComponentManager, RaidHelperHandle};
use crate::components::raid_helper::{RaidEvent, Schedule};
use crate::config::Config;
use crate::error::Error;
use crate::utils::time::{parse_timezone, week_label, WeekLabel};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Run one user-triggered aggregation and print the schedule
pub async fn run(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    // Initialize component manager
    let mut component_manager = ComponentManager::new(Arc::clone(&config));

    // Register the Raid Helper component
    component_manager.register(RaidHelper::new());

    let component_manager = Arc::new(component_manager);
    component_manager.init_all(Arc::clone(&config)).await?;

    // Fetch the Raid Helper handle from the component manager
    let handle = match component_manager
        .get_component_by_name("raid_helper")
        .and_then(|component| component.as_any().downcast_ref::<RaidHelper>())
    {
        Some(component) => match component.get_handle().await {
            Some(handle) => handle,
            None => {
                tracing::debug!("No handle in Raid Helper component, creating new one");
                RaidHelperHandle::new(Arc::clone(&config))
            }
        },
        None => {
            tracing::debug!("Raid Helper component not found, creating standalone handle");
            RaidHelperHandle::new(Arc::clone(&config))
        }
    };

    let schedule = handle.fetch_schedule().await?;

    let (servers_total, tz) = {
        let config_read = config.read().await;
        (
            config_read.server_ids.len(),
            parse_timezone(&config_read.timezone)?,
        )
    };
    let today = Utc::now().with_timezone(&tz).date_naive();

    println!("{}", render_schedule(&schedule, servers_total, tz, today));

    component_manager.shutdown_all().await?;

    Ok(())
}

/// Format the schedule for the terminal: summary line, per-server failures,
/// then one block per day with week labels relative to today
pub fn render_schedule(
    schedule: &Schedule,
    servers_total: usize,
    tz: Tz,
    today: NaiveDate,
) -> String {
    let loaded = servers_total.saturating_sub(schedule.errors.len());
    let mut out = format!("Loaded {} of {} servers\n", loaded, servers_total);

    for reason in schedule.errors.values() {
        out.push_str(&format!("  ! {}\n", reason));
    }
    if schedule.skipped > 0 {
        out.push_str(&format!(
            "Skipped {} malformed event record(s)\n",
            schedule.skipped
        ));
    }

    if schedule.groups.is_empty() {
        out.push_str("\nNo events found\n");
        return out;
    }

    for group in &schedule.groups {
        let label = match week_label(group.date, today) {
            WeekLabel::ThisWeek => " (this week)",
            WeekLabel::NextWeek => " (next week)",
            WeekLabel::Other => "",
        };
        out.push_str(&format!(
            "\n{}{}\n",
            group.date.format("%a %-d.%-m.%Y"),
            label
        ));

        for event in &group.events {
            out.push_str(&render_event(event, &tz));
            out.push('\n');
        }
    }

    out
}

/// One display line per event: local start time, title, server, extras
fn render_event(event: &RaidEvent, tz: &Tz) -> String {
    let time = event.start_time.with_timezone(tz).format("%H:%M");
    let server = event.server_name.as_deref().unwrap_or(&event.server_id);
    let mut line = format!("  {}  {} [{}]", time, event.title, server);

    if let Some(leader) = &event.leader {
        line.push_str(&format!(", led by {}", leader));
    }
    if let Some(count) = event.signup_count {
        line.push_str(&format!(" ({} signed up)", count));
    }
    if let Some(channel) = &event.channel_name {
        line.push_str(&format!(" #{}", channel));
    }

    line
}
