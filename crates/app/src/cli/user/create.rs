use clap::Args;
use souk_app::{
    auth::PgAuthService,
    database::{self, Db},
    domain::users::{
        PgUsersService, UsersService,
        data::NewUser,
        records::{UserRole, UserUuid},
    },
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// User email address
    #[arg(long)]
    email: String,

    /// Optional phone number for SMS notifications
    #[arg(long)]
    phone: Option<String>,

    /// Create the user as an administrator
    #[arg(long)]
    admin: bool,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional user UUID; generated when omitted
    #[arg(long)]
    user_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let users = PgUsersService::new(Db::new(pool.clone()));
    let auth = PgAuthService::new(pool);

    let role = if args.admin {
        UserRole::Admin
    } else {
        UserRole::Customer
    };

    let user = users
        .create_user(NewUser {
            uuid: args
                .user_uuid
                .map_or_else(UserUuid::new, UserUuid::from_uuid),
            email: args.email,
            phone: args.phone,
            role,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    let issued = auth
        .issue_api_token(user.uuid)
        .await
        .map_err(|error| format!("failed to issue token: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_email: {}", user.email);
    println!("user_role: {}", user.role);
    println!("token_uuid: {}", issued.metadata.uuid);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
