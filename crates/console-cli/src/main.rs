//! Command-line front end for the voter console API.
//!
//! Each invocation is one short-lived session: authenticate, run the
//! requested operation, and exit. Credentials come from flags or the
//! `CONSOLE_USERNAME` / `CONSOLE_PASSWORD` environment variables.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use console_config::{Config, init_logging};
use console_resources::{LookupService, UsersService, VotersService};
use console_session::SessionStore;
use console_transport::{ApiClient, ReqwestTransport};
use console_types::{Gender, Role, UserDraft, UserFilters, VoterDraft, VoterFilters};
use std::sync::Arc;
use tracing::debug;

#[derive(Parser)]
#[command(name = "console", about = "Voter console API client", version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Base address of the console REST API.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Credentials {
    #[arg(long, env = "CONSOLE_USERNAME")]
    username: String,

    #[arg(long, env = "CONSOLE_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand)]
enum Command {
    /// Verify credentials and print the granted identity.
    Login {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Print the identity behind the current credentials.
    Whoami {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Operator account management.
    Users {
        #[command(flatten)]
        credentials: Credentials,
        #[command(subcommand)]
        command: UsersCommand,
    },
    /// Voter registry operations.
    Voters {
        #[command(flatten)]
        credentials: Credentials,
        #[command(subcommand)]
        command: VotersCommand,
    },
    /// Geography lookup data.
    Lookups {
        #[command(flatten)]
        credentials: Credentials,
        #[command(subcommand)]
        command: LookupsCommand,
    },
}

#[derive(Subcommand)]
enum UsersCommand {
    /// List operator accounts, paginated.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_parser = parse_role)]
        role: Option<Role>,
    },
    /// Show one account as an editable draft.
    Get { id: i64 },
    /// Create an operator account.
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_parser = parse_role, default_value = "user")]
        role: Role,
    },
    /// Update an operator account. Omitting --password keeps the stored one.
    Update {
        id: i64,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: Option<String>,
        #[arg(long, value_parser = parse_role)]
        role: Role,
    },
    /// Delete an operator account.
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum VotersCommand {
    /// List voters, paginated and filterable.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        region_id: Option<i64>,
        #[arg(long)]
        district_id: Option<i64>,
        #[arg(long)]
        vote_center_id: Option<i64>,
        /// Registration date lower bound (YYYY-MM-DD).
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Registration date upper bound (YYYY-MM-DD).
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Register a voter.
    Create {
        #[command(flatten)]
        draft: VoterDraftArgs,
    },
    /// Update a voter record.
    Update {
        id: i64,
        #[command(flatten)]
        draft: VoterDraftArgs,
    },
    /// Delete a voter record.
    Delete { id: i64 },
}

#[derive(Args)]
struct VoterDraftArgs {
    #[arg(long)]
    full_name: String,
    /// Date of birth (YYYY-MM-DD).
    #[arg(long)]
    dob: Option<NaiveDate>,
    #[arg(long, value_parser = parse_gender)]
    gender: Option<Gender>,
    #[arg(long)]
    reference_number: String,
    #[arg(long)]
    region_id: i64,
    #[arg(long)]
    district_id: i64,
    #[arg(long)]
    vote_center_id: Option<i64>,
    #[arg(long)]
    mobile_number: Option<String>,
    /// Registration date (YYYY-MM-DD).
    #[arg(long)]
    registration_date: NaiveDate,
}

impl From<VoterDraftArgs> for VoterDraft {
    fn from(args: VoterDraftArgs) -> Self {
        Self {
            full_name: args.full_name,
            dob: args.dob,
            gender: args.gender,
            reference_number: args.reference_number,
            region_id: args.region_id,
            district_id: args.district_id,
            vote_center_id: args.vote_center_id,
            mobile_number: args.mobile_number,
            registration_date: args.registration_date,
        }
    }
}

#[derive(Subcommand)]
enum LookupsCommand {
    /// List all regions.
    Regions,
    /// List districts within a region.
    Districts {
        #[arg(long)]
        region_id: i64,
    },
    /// List vote centers within a district.
    VoteCenters {
        #[arg(long)]
        district_id: i64,
    },
}

fn parse_role(value: &str) -> Result<Role, String> {
    match value.to_ascii_lowercase().as_str() {
        "admin" => Ok(Role::Admin),
        "user" => Ok(Role::User),
        other => Err(format!("unknown role '{}', expected admin or user", other)),
    }
}

fn parse_gender(value: &str) -> Result<Gender, String> {
    match value.to_ascii_lowercase().as_str() {
        "male" => Ok(Gender::Male),
        "female" => Ok(Gender::Female),
        other => Err(format!(
            "unknown gender '{}', expected male or female",
            other
        )),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn authenticated_client(
    config: &Config,
    credentials: &Credentials,
) -> Result<(Arc<ApiClient>, Arc<SessionStore>), Box<dyn std::error::Error>> {
    let transport = Arc::new(ReqwestTransport::new(config.api_base()?));
    let client = Arc::new(ApiClient::new(transport));
    let store = SessionStore::start(client.clone());
    store
        .login(&credentials.username, &credentials.password)
        .await?;
    debug!(username = %credentials.username, "authenticated");
    Ok((client, store))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = Config::new();
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    init_logging(&config.log_level);

    match cli.command {
        Command::Login { credentials } => {
            let (_, store) = authenticated_client(&config, &credentials).await?;
            if let Some(user) = store.current_user() {
                print_json(&user)?;
            }
            store.logout().await;
        }
        Command::Whoami { credentials } => {
            let (_, store) = authenticated_client(&config, &credentials).await?;
            store.initialize().await;
            match store.current_user() {
                Some(user) => print_json(&user)?,
                None => println!("not logged in"),
            }
            store.logout().await;
        }
        Command::Users {
            credentials,
            command,
        } => {
            let (client, store) = authenticated_client(&config, &credentials).await?;
            let users = UsersService::new(client);
            match command {
                UsersCommand::List {
                    page,
                    page_size,
                    search,
                    role,
                } => {
                    let filters = UserFilters {
                        page,
                        page_size,
                        search,
                        role,
                    };
                    print_json(&users.list(&filters).await?)?;
                }
                UsersCommand::Get { id } => print_json(&users.get(id).await?)?,
                UsersCommand::Create {
                    username,
                    password,
                    role,
                } => {
                    let draft = UserDraft {
                        username,
                        password: Some(password),
                        role,
                    };
                    print_json(&users.create(&draft).await?)?;
                }
                UsersCommand::Update {
                    id,
                    username,
                    password,
                    role,
                } => {
                    let draft = UserDraft {
                        username,
                        password,
                        role,
                    };
                    print_json(&users.update(id, &draft).await?)?;
                }
                UsersCommand::Delete { id } => {
                    users.delete(id).await?;
                    println!("deleted user {}", id);
                }
            }
            store.logout().await;
        }
        Command::Voters {
            credentials,
            command,
        } => {
            let (client, store) = authenticated_client(&config, &credentials).await?;
            let voters = VotersService::new(client);
            match command {
                VotersCommand::List {
                    page,
                    page_size,
                    search,
                    region_id,
                    district_id,
                    vote_center_id,
                    from,
                    to,
                } => {
                    let filters = VoterFilters {
                        page,
                        page_size,
                        search,
                        region_id,
                        district_id,
                        vote_center_id,
                        from,
                        to,
                    };
                    print_json(&voters.list(&filters).await?)?;
                }
                VotersCommand::Create { draft } => {
                    print_json(&voters.create(&draft.into()).await?)?;
                }
                VotersCommand::Update { id, draft } => {
                    print_json(&voters.update(id, &draft.into()).await?)?;
                }
                VotersCommand::Delete { id } => {
                    voters.delete(id).await?;
                    println!("deleted voter {}", id);
                }
            }
            store.logout().await;
        }
        Command::Lookups {
            credentials,
            command,
        } => {
            let (client, store) = authenticated_client(&config, &credentials).await?;
            let lookups = LookupService::new(client);
            match command {
                LookupsCommand::Regions => print_json(&lookups.regions().await?)?,
                LookupsCommand::Districts { region_id } => {
                    print_json(&lookups.districts(region_id).await?)?
                }
                LookupsCommand::VoteCenters { district_id } => {
                    print_json(&lookups.vote_centers(district_id).await?)?
                }
            }
            store.logout().await;
        }
    }

    Ok(())
}
