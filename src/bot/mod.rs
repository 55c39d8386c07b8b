pub mod commands;
pub mod handlers;

use crate::attendance::AttendanceService;
use crate::config::Config;
use crate::database;
use crate::store::SqliteStore;
use crate::utils::time::LocalCalendar;
use sqlx::SqlitePool;
use anyhow::Result;
use poise::serenity_prelude as serenity;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

#[derive(Clone)]
pub struct Data {
    pub pool: SqlitePool,
    pub config: Config,
    pub attendance: AttendanceService<SqliteStore>,
}

impl Data {
    pub fn calendar(&self) -> &LocalCalendar {
        self.attendance.calendar()
    }
}

pub async fn create_bot(config: Config) -> Result<serenity::Client> {
    let pool = database::create_connection(&config.database_url).await?;
    let calendar = LocalCalendar::new(config.timezone);

    tracing::info!(timezone = ?config.timezone, "Calendar days follow this zone");

    let data = Data {
        pool: pool.clone(),
        config: config.clone(),
        attendance: AttendanceService::new(SqliteStore::new(pool), calendar),
    };

    let intents = serenity::GatewayIntents::non_privileged();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::attendance::clock_in(),
                commands::attendance::clock_out(),
                commands::status::status(),
                commands::reports::history(),
                commands::schedule::schedule(),
                commands::schedule::my_schedule(),
                commands::admin::active_staff(),
                commands::admin::overtime(),
                commands::admin::attendance_fix(),
                commands::admin::attendance_delete(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(handlers::on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await?;

    Ok(client)
}
