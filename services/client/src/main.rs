use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use client::{
    ApiError, ApiResult, BlogClient, ClientConfig, ErrorKind, SessionStore,
    services::CommentThread,
};
use common::{
    models::{Post, RegisterRequest},
    query::{CategoryFilter, PageFilter, Pagination, PostFilter},
};

#[derive(Parser)]
#[command(name = "blog")]
#[command(about = "Command-line client for the blog API")]
struct Cli {
    /// REST API root, overrides the configured one
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account and log in
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        full_name: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    #[command(subcommand)]
    Posts(PostsCommand),
    /// List categories with their post counts
    Categories,
    Tags,
    /// Show the comment threads of a post
    Comments { post_id: String },
    /// Post totals and recent posts of the logged-in user
    Dashboard,
}

#[derive(Subcommand)]
enum PostsCommand {
    /// List published posts
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one post by slug
    Show { slug: String },
    /// Search published posts
    Search { query: String },
    /// List your own posts, drafts included
    Mine,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::load()?;
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }
    info!("Using API at {}", config.api_base_url);

    let session = SessionStore::file(&config.session_file)?;
    let client = BlogClient::from_config(&config, session)?;

    if let Err(e) = run(&client, cli.command).await {
        match e.kind() {
            ErrorKind::SessionExpired => eprintln!("{e} Run `blog login` to start a new session."),
            ErrorKind::Precondition => eprintln!("{e}. Run `blog login` first."),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(client: &BlogClient, command: Command) -> ApiResult<()> {
    match command {
        Command::Login { email, password } => {
            let context = client.session_context();
            let user = context.login(&email, &password).await?;
            println!("Logged in as {} ({})", user.display_name(), user.email);
        }
        Command::Register {
            email,
            username,
            password,
            full_name,
        } => {
            let request = RegisterRequest {
                email,
                username,
                full_name,
                password,
            };
            let user = client.session_context().register(&request).await?;
            println!("Welcome, {}! You are now logged in.", user.display_name());
        }
        Command::Logout => {
            client.session_context().logout();
            println!("Logged out");
        }
        Command::Whoami => {
            let context = client.session_context();
            context.initialize().await;
            match context.user() {
                Some(user) => {
                    println!("{} <{}>", user.display_name(), user.email);
                    if let Some(bio) = &user.bio {
                        println!("{bio}");
                    }
                    println!("Member since {}", user.created_at.format("%B %Y"));
                }
                None => println!("Not logged in"),
            }
        }
        Command::Posts(command) => run_posts(client, command).await?,
        Command::Categories => {
            let filter = CategoryFilter {
                with_post_count: Some(true),
                ..CategoryFilter::default()
            };
            for category in client.categories.list(&filter).await? {
                println!(
                    "{:<20} {:>3} posts  /{}",
                    category.name,
                    category.post_count.unwrap_or_default(),
                    category.slug
                );
            }
        }
        Command::Tags => {
            let tags = client.tags.list(&Pagination::default()).await?;
            let names: Vec<String> = tags.iter().map(|tag| format!("#{}", tag.slug)).collect();
            println!("{}", names.join(" "));
        }
        Command::Comments { post_id } => {
            let threads = client.comments.threads_for_post(&post_id).await?;
            if threads.is_empty() {
                println!("No comments yet");
            }
            for thread in &threads {
                print_thread(thread, 0);
            }
        }
        Command::Dashboard => {
            let user = client.auth.get_current_user().await?;
            let stats = client.posts.author_stats(&user.user_id).await?;
            println!("Dashboard for {}", user.display_name());
            println!(
                "  {} posts: {} published, {} drafts",
                stats.total_posts, stats.published_posts, stats.draft_posts
            );

            let recent = PageFilter {
                limit: Some(5),
                ..PageFilter::default()
            };
            for post in client.posts.list_by_user(&user.user_id, &recent).await? {
                print_post_line(&post);
            }
        }
    }

    Ok(())
}

async fn run_posts(client: &BlogClient, command: PostsCommand) -> ApiResult<()> {
    match command {
        PostsCommand::List {
            category,
            tag,
            skip,
            limit,
        } => {
            let filter = PostFilter {
                skip,
                limit,
                category_id: category,
                tag_id: tag,
                ..PostFilter::published()
            };
            for post in client.posts.list(&filter).await? {
                print_post_line(&post);
            }
        }
        PostsCommand::Show { slug } => {
            let post = client.posts.get_by_slug(&slug).await?;
            print_post(&post);
        }
        PostsCommand::Search { query } => {
            let posts = client.posts.search(&query, &PostFilter::published()).await?;
            println!("{} result(s) for \"{}\"", posts.len(), query);
            for post in &posts {
                print_post_line(post);
            }
        }
        PostsCommand::Mine => {
            let user = client
                .auth
                .stored_user()
                .ok_or(ApiError::NotAuthenticated("No user is logged in"))?;
            for post in client
                .posts
                .list_by_user(&user.user_id, &PageFilter::default())
                .await?
            {
                print_post_line(&post);
            }
        }
    }

    Ok(())
}

fn print_post_line(post: &Post) {
    let status = if post.is_published { "" } else { " [draft]" };
    let date = post
        .published_at
        .unwrap_or(post.created_at)
        .format("%Y-%m-%d");
    println!("{date}  {}{status}  /{}", post.title, post.slug);
}

fn print_post(post: &Post) {
    println!("{}", post.title);
    let mut meta = vec![
        post.published_at
            .unwrap_or(post.created_at)
            .format("%B %-d, %Y")
            .to_string(),
    ];
    if let Some(reading_time) = &post.reading_time {
        meta.push(reading_time.clone());
    }
    if let Some(views) = post.views {
        meta.push(format!("{views} views"));
    }
    println!("{}", meta.join(" · "));

    let labels: Vec<&str> = post
        .categories
        .iter()
        .map(|c| c.name.as_str())
        .chain(post.tags.iter().map(|t| t.name.as_str()))
        .collect();
    if !labels.is_empty() {
        println!("[{}]", labels.join(", "));
    }

    println!();
    if let Some(summary) = &post.summary {
        println!("{summary}\n");
    }
    println!("{}", post.content);
}

fn print_thread(thread: &CommentThread, depth: usize) {
    let comment = &thread.comment;
    println!(
        "{:indent$}- {} (user {}, {})",
        "",
        comment.content,
        comment.user_id,
        comment.created_at.format("%Y-%m-%d %H:%M"),
        indent = depth * 2
    );
    for reply in &thread.replies {
        print_thread(reply, depth + 1);
    }
}
