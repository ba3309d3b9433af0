use agora_app::{
    database::{self, Db},
    domain::accounts::{
        AccountsService, PgAccountsService,
        data::NewAccount,
        records::{AccountRole, AccountUuid},
    },
};
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateAccountArgs {
    /// Account holder's display name
    #[arg(long)]
    name: String,

    /// Contact email
    #[arg(long)]
    email: String,

    /// Contact phone number
    #[arg(long)]
    phone: String,

    /// Account role: customer or admin
    #[arg(long, default_value = "customer")]
    role: AccountRole,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional account UUID; generated when omitted
    #[arg(long)]
    account_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateAccountArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgAccountsService::new(Db::new(pool));
    let uuid = args
        .account_uuid
        .map_or_else(AccountUuid::new, AccountUuid::from_uuid);

    let account = service
        .create_account(NewAccount {
            uuid,
            name: args.name,
            email: args.email,
            phone: args.phone,
            role: args.role,
        })
        .await
        .map_err(|error| format!("failed to create account: {error}"))?;

    println!("account_uuid: {}", account.uuid);
    println!("account_name: {}", account.name);
    println!("role: {}", account.role);

    Ok(())
}
