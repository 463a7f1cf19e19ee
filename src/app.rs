//! Command-line front end: parses commands, calls the API, renders results.

use crate::api::{ApiError, BlogApi};
use crate::config::{AuthMode, Config};
use crate::http::ReqwestTransport;
use crate::output::{self, OutputFormat};
use crate::session::{session_dir, CookieJar, TokenStore, COOKIES_FILE, CREDENTIALS_FILE};
use crate::types::{BlogDraft, BlogPatch, ImageUpload, RegisterRequest};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, warn};

const EXIT_LOGIN_REQUIRED: u8 = 2;

/// blogdesk - read, write and moderate posts on the blog backend
#[derive(Debug, Parser)]
#[command(name = "blogdesk", version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in as a reader
    Login(Credentials),
    /// Sign in to the admin dashboard
    AdminLogin(Credentials),
    /// Create a reader account
    Register(RegisterArgs),
    /// End the current session
    Logout,
    /// Browse and manage posts
    #[command(subcommand)]
    Blogs(BlogsCommand),
    /// Read and write feedback on a post
    #[command(subcommand)]
    Feedback(FeedbackCommand),
    /// Moderation
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Debug, Args)]
pub struct Credentials {
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub full_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub confirm_password: String,
}

#[derive(Debug, Args)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

#[derive(Debug, Args)]
pub struct PatchArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    /// Replacement image file
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum BlogsCommand {
    /// Everyone's posts
    Landing(PageArgs),
    /// Your posts
    Mine(PageArgs),
    View { id: i64 },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Update {
        id: i64,
        #[command(flatten)]
        patch: PatchArgs,
    },
    Delete { id: i64 },
    Like { id: i64 },
    Dislike { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum FeedbackCommand {
    List {
        blog_id: i64,
        #[command(flatten)]
        page: PageArgs,
    },
    Add { blog_id: i64, comment: String },
    Edit { feedback_id: i64, comment: String },
    Delete { feedback_id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    Users(PageArgs),
    /// Block or unblock a user
    ToggleUser { user_id: i64 },
    Blogs(PageArgs),
    UpdateBlog {
        id: i64,
        #[command(flatten)]
        patch: PatchArgs,
    },
    /// Block or unblock a post
    ToggleBlog { id: i64 },
    Feedbacks {
        blog_id: i64,
        #[command(flatten)]
        page: PageArgs,
    },
    /// List or hide a feedback entry
    ToggleFeedback { feedback_id: i64 },
}

/// Builds the transport for one CLI run. With `remember_token` set, the session left by
/// the previous run is picked up from `dir`: the bearer token in bearer mode, the
/// cookie jar in cookie mode.
pub async fn open_transport(config: &Config, dir: &Path) -> anyhow::Result<ReqwestTransport> {
    let mut tokens = TokenStore::in_memory();
    let mut cookies = CookieJar::in_memory();
    if config.remember_token {
        match config.auth_mode {
            AuthMode::Bearer => {
                let path = dir.join(CREDENTIALS_FILE);
                debug!(path = %path.display(), "using persisted bearer token");
                tokens = TokenStore::persistent(path);
            }
            AuthMode::Cookie => {
                let path = dir.join(COOKIES_FILE);
                debug!(path = %path.display(), "using persisted cookie jar");
                cookies = CookieJar::load(path).await.context("loading cookie jar")?;
            }
        }
    }
    ReqwestTransport::with_cookie_jar(config, tokens, Arc::new(cookies))
        .context("building http client")
}

/// Persists whatever the run left in the cookie jar, including a session renewed by
/// a refresh.
pub async fn close_transport(transport: &ReqwestTransport) {
    if let Err(e) = transport.cookies().save().await {
        warn!(error = %e, "failed to save cookie jar");
    }
}

async fn load_image(path: Option<&PathBuf>) -> anyhow::Result<Option<ImageUpload>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let image = ImageUpload::from_path(path)
        .await
        .with_context(|| format!("reading image {}", path.display()))?;
    Ok(Some(image))
}

async fn to_patch(args: &PatchArgs) -> anyhow::Result<BlogPatch> {
    Ok(BlogPatch {
        title: args.title.clone(),
        content: args.content.clone(),
        image: load_image(args.image.as_ref()).await?,
    })
}

async fn sign_in(
    api: &BlogApi<ReqwestTransport>,
    config: &Config,
    creds: &Credentials,
    admin: bool,
) -> anyhow::Result<()> {
    let token = if admin {
        api.admin_login(&creds.email, &creds.password).await?
    } else {
        api.login(&creds.email, &creds.password).await?
    };
    if config.auth_mode == AuthMode::Bearer {
        api.client()
            .transport()
            .tokens()
            .replace(&token.access_token)
            .await
            .context("storing access token")?;
    }
    output::print_success("Logged in");
    Ok(())
}

async fn dispatch(cli: Cli, config: &Config) -> anyhow::Result<()> {
    let dir = if config.remember_token {
        session_dir().context("locating session directory")?
    } else {
        PathBuf::new()
    };
    let api = BlogApi::from_config(open_transport(config, &dir).await?, config);
    let result = run_command(&api, cli, config).await;
    close_transport(api.client().transport()).await;
    result
}

async fn run_command(
    api: &BlogApi<ReqwestTransport>,
    cli: Cli,
    config: &Config,
) -> anyhow::Result<()> {
    let format = cli.format;

    match cli.command {
        Command::Login(creds) => sign_in(api, config, &creds, false).await?,
        Command::AdminLogin(creds) => sign_in(api, config, &creds, true).await?,
        Command::Register(args) => {
            let form = RegisterRequest {
                full_name: args.full_name.trim().to_string(),
                email: args.email.trim().to_string(),
                password: args.password,
                confirm_password: args.confirm_password,
            };
            let message = api.register(&form).await?;
            output::print_message(&message, "Registered", format);
        }
        Command::Logout => {
            let result = api.logout().await;
            let transport = api.client().transport();
            transport
                .tokens()
                .forget_all()
                .await
                .context("clearing stored token")?;
            transport
                .cookies()
                .clear()
                .await
                .context("clearing cookie jar")?;
            match result {
                Ok(message) => output::print_message(&message, "Logged out successfully", format),
                Err(e) => {
                    warn!(error = %e, "logout request failed");
                    output::print_warning("Logout completed");
                }
            }
        }
        Command::Blogs(cmd) => match cmd {
            BlogsCommand::Landing(p) => output::print_blog_page(&api.landing(p.page).await?, format),
            BlogsCommand::Mine(p) => output::print_blog_page(&api.my_blogs(p.page).await?, format),
            BlogsCommand::View { id } => output::print_blog(&api.view_blog(id).await?, format),
            BlogsCommand::Create {
                title,
                content,
                image,
            } => {
                let draft = BlogDraft {
                    title,
                    content,
                    image: load_image(image.as_ref()).await?,
                };
                output::print_message(&api.create_blog(&draft).await?, "Blog created", format);
            }
            BlogsCommand::Update { id, patch } => {
                let patch = to_patch(&patch).await?;
                output::print_message(&api.update_blog(id, &patch).await?, "Blog updated", format);
            }
            BlogsCommand::Delete { id } => {
                output::print_message(&api.delete_blog(id).await?, "Blog deleted", format)
            }
            BlogsCommand::Like { id } => output::print_message(&api.like(id).await?, "Liked", format),
            BlogsCommand::Dislike { id } => {
                output::print_message(&api.dislike(id).await?, "Disliked", format)
            }
        },
        Command::Feedback(cmd) => match cmd {
            FeedbackCommand::List { blog_id, page } => {
                output::print_feedback_page(&api.feedbacks(blog_id, page.page).await?, format)
            }
            FeedbackCommand::Add { blog_id, comment } => output::print_message(
                &api.add_feedback(blog_id, &comment).await?,
                "Feedback added",
                format,
            ),
            FeedbackCommand::Edit {
                feedback_id,
                comment,
            } => output::print_message(
                &api.edit_feedback(feedback_id, &comment).await?,
                "Feedback updated",
                format,
            ),
            FeedbackCommand::Delete { feedback_id } => output::print_message(
                &api.delete_feedback(feedback_id).await?,
                "Feedback deleted",
                format,
            ),
        },
        Command::Admin(cmd) => match cmd {
            AdminCommand::Users(p) => output::print_user_page(&api.admin_users(p.page).await?, format),
            AdminCommand::ToggleUser { user_id } => output::print_message(
                &api.admin_toggle_user(user_id).await?,
                "User status updated",
                format,
            ),
            AdminCommand::Blogs(p) => output::print_blog_page(&api.admin_blogs(p.page).await?, format),
            AdminCommand::UpdateBlog { id, patch } => {
                let patch = to_patch(&patch).await?;
                output::print_message(
                    &api.admin_update_blog(id, &patch).await?,
                    "Blog updated",
                    format,
                );
            }
            AdminCommand::ToggleBlog { id } => output::print_message(
                &api.admin_toggle_blog(id).await?,
                "Blog status updated",
                format,
            ),
            AdminCommand::Feedbacks { blog_id, page } => output::print_feedback_page(
                &api.admin_feedbacks(blog_id, page.page).await?,
                format,
            ),
            AdminCommand::ToggleFeedback { feedback_id } => output::print_message(
                &api.admin_toggle_feedback(feedback_id).await?,
                "Feedback status updated",
                format,
            ),
        },
    }
    Ok(())
}

/// Renders a failure for the user and picks the exit status. An unrecoverable session
/// is the "navigate to login" case and gets its own status.
fn report(err: &anyhow::Error, config: &Config) -> u8 {
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::RedirectRequired(target)) => {
            output::print_error("Session expired. Please login again.");
            eprintln!("  sign in: {}", config.login_url(target));
            EXIT_LOGIN_REQUIRED
        }
        Some(ApiError::Transport(e)) => {
            output::print_error(&format!("Network error. Please try again. ({e})"));
            1
        }
        Some(ApiError::Upstream { message, .. }) => {
            output::print_error(message);
            1
        }
        _ => {
            output::print_error(&format!("{err:#}"));
            1
        }
    }
}

pub async fn run(cli: Cli) -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            output::print_error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };
    match dispatch(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => ExitCode::from(report(&err, &config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::TransportError;

    #[test]
    fn cli_parses_nested_commands() {
        let cli = Cli::parse_from(["blogdesk", "--format", "json", "blogs", "landing", "--page", "3"]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Command::Blogs(BlogsCommand::Landing(PageArgs { page: 3 }))
        ));

        let cli = Cli::parse_from(["blogdesk", "admin", "feedbacks", "7"]);
        assert!(matches!(
            cli.command,
            Command::Admin(AdminCommand::Feedbacks { blog_id: 7, page: PageArgs { page: 1 } })
        ));
    }

    #[test]
    fn report_uses_distinct_status_for_login_redirect() {
        let config = Config::default();
        let redirect = anyhow::Error::new(ApiError::RedirectRequired("/user/login/".to_string()));
        assert_eq!(report(&redirect, &config), EXIT_LOGIN_REQUIRED);

        let network = anyhow::Error::new(ApiError::Transport(TransportError::TimedOut));
        assert_eq!(report(&network, &config), 1);
    }

    #[tokio::test]
    async fn each_mode_persists_only_its_own_credential() {
        let dir = tempfile::tempdir().unwrap();

        let cookie = Config {
            auth_mode: AuthMode::Cookie,
            ..Config::default()
        };
        let transport = open_transport(&cookie, dir.path()).await.unwrap();
        assert!(transport.tokens().file().is_none());
        assert_eq!(transport.cookies().file(), Some(dir.path().join(COOKIES_FILE).as_path()));

        let bearer = Config::default();
        let transport = open_transport(&bearer, dir.path()).await.unwrap();
        assert_eq!(
            transport.tokens().file(),
            Some(dir.path().join(CREDENTIALS_FILE).as_path())
        );
        assert!(transport.cookies().file().is_none());

        let forgetful = Config {
            remember_token: false,
            ..Config::default()
        };
        let transport = open_transport(&forgetful, dir.path()).await.unwrap();
        assert!(transport.tokens().file().is_none());
    }
}
