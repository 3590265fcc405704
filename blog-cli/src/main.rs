use blog_client::{BlogClientHttp, NewPost, Post};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "Command-line client for the date-keyed blog API")]
struct Cli {
    #[arg(short, long, env = "BLOG_SERVER", default_value = "http://127.0.0.1:8080")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

/// Date segments; unset ones are left for the server to decide.
#[derive(Args, Debug, Default, PartialEq)]
struct DateArgs {
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    month: Option<i32>,
    #[arg(long)]
    day: Option<i32>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the server to greet NAME.
    Hello { name: String },
    /// Check that the server can reach its database.
    Ping,
    /// List up to ten posts, oldest date first.
    List,
    /// Show posts for a date; unset segments match any value.
    Get {
        #[command(flatten)]
        date: DateArgs,
    },
    /// Create a post (date defaults to today).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[command(flatten)]
        date: DateArgs,
    },
    /// Replace title and content of the post on a date.
    Update {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[command(flatten)]
        date: DateArgs,
    },
    /// Delete the post on a date (defaults to today).
    Delete {
        #[command(flatten)]
        date: DateArgs,
    },
}

fn print_list(posts: &[Post]) {
    println!("Posts ({})", posts.len());
    for post in posts {
        println!(
            "- [{}-{:02}-{:02}] {} ({})",
            post.year, post.month, post.day, post.title, post.id
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let client = BlogClientHttp::connect(&args.server).await?;

    match args.command {
        Command::Hello { name } => {
            println!("{}", client.hello(&name).await?);
        }
        Command::Ping => {
            client.ping().await?;
            println!("Pong");
        }
        Command::List => {
            print_list(&client.list_posts().await?);
        }
        Command::Get { date } => {
            let posts = client.posts_by_date(date.year, date.month, date.day).await?;
            for post in posts {
                println!("{post}\n");
            }
        }
        Command::Create {
            title,
            content,
            date,
        } => {
            let draft = NewPost::new(title, content).on(date.year, date.month, date.day);
            let post = client.create_post(&draft).await?;
            println!("Post created! ID: {}", post.id);
        }
        Command::Update {
            title,
            content,
            date,
        } => {
            let draft = NewPost::new(title, content).on(date.year, date.month, date.day);
            let post = client.update_post(&draft).await?;
            println!("Post updated:\n{post}");
        }
        Command::Delete { date } => {
            client.delete_post(date.year, date.month, date.day).await?;
            println!("Post deleted!");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn create_takes_optional_date() {
        let cli = Cli::try_parse_from([
            "blog-cli", "create", "--title", "t", "--content", "c", "--day", "23",
        ])
        .unwrap();

        match cli.command {
            Command::Create {
                title,
                content,
                date,
            } => {
                assert_eq!((title.as_str(), content.as_str()), ("t", "c"));
                assert_eq!(
                    date,
                    DateArgs {
                        day: Some(23),
                        ..DateArgs::default()
                    }
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn update_requires_content() {
        let err = Cli::try_parse_from(["blog-cli", "update", "--title", "t"]).unwrap_err();

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn server_flag_overrides_default() {
        let cli =
            Cli::try_parse_from(["blog-cli", "--server", "http://blog.local:9000", "ping"]).unwrap();

        assert_eq!(cli.server, "http://blog.local:9000");
        assert!(matches!(cli.command, Command::Ping));
    }

    #[test]
    fn get_without_segments_matches_everything() {
        let cli = Cli::try_parse_from(["blog-cli", "get"]).unwrap();

        assert!(matches!(cli.command, Command::Get { date } if date == DateArgs::default()));
    }
}
