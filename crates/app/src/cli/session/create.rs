use agora_app::{
    auth::PgAuthService,
    database::{self, Db},
    domain::accounts::records::AccountUuid,
};
use clap::Args;
use jiff::Span;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateSessionArgs {
    /// Account to mint the session for
    #[arg(long)]
    account_uuid: Uuid,

    /// Session lifetime in hours; omit for a session that never expires
    #[arg(long)]
    ttl_hours: Option<i64>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateSessionArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgAuthService::new(Db::new(pool));

    let ttl = args
        .ttl_hours
        .map(|hours| Span::new().try_hours(hours))
        .transpose()
        .map_err(|error| format!("invalid session lifetime: {error}"))?;

    let session = service
        .create_session(AccountUuid::from_uuid(args.account_uuid), ttl)
        .await
        .map_err(|error| format!("failed to create session: {error}"))?;

    println!("session_token: {}", session.token);
    println!("account_uuid: {}", session.account_uuid);
    match session.expires_at {
        Some(expires_at) => println!("expires_at: {expires_at}"),
        None => println!("expires_at: never"),
    }

    Ok(())
}
