use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use lovewall_engine::live::{watch_remote, DEFAULT_POLL_PERIOD};
use lovewall_engine::muse::{reaction_to, FALLBACK_REACTION};
use lovewall_engine::theme::tokens;
use lovewall_engine::{prompts, AppContext, Config, Wall};
use lovewall_shared::{Post, PostId, PostStatus, Theme, FREEFORM_PROMPT};

#[derive(Parser)]
#[command(name = "lovewall", about = "An optimistic confession wall in your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the wall (use --watch to follow live updates)
    Feed {
        #[arg(long)]
        watch: bool,
    },
    /// Post an anonymous confession
    Post { message: String },
    /// List the daily prompts
    Prompts,
    /// Answer a daily prompt by number and get the muse's reaction
    Answer { number: usize, message: String },
    /// Like a post once
    Like { id: String },
    /// Reply to a confirmed post
    Reply { id: String, message: String },
    /// Retry a failed post
    Retry { id: String },
    /// Accept the valentine
    Accept,
    /// Show or set the theme
    Theme { name: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let ctx = AppContext::from_config(config).context("wiring collaborators")?;
    let wall = Wall::open(&ctx);

    match cli.command {
        Command::Feed { watch } => feed(&ctx, &wall, watch).await?,
        Command::Post { message } => post(&ctx, &wall, FREEFORM_PROMPT, &message, false).await?,
        Command::Prompts => {
            for (i, p) in prompts::PROMPTS.iter().enumerate() {
                println!("  {}. {p}", i + 1);
            }
        }
        Command::Answer { number, message } => {
            let prompt = prompts::PROMPTS
                .get(number.checked_sub(1).unwrap_or(usize::MAX))
                .copied()
                .with_context(|| format!("no prompt #{number}; see `lovewall prompts`"))?;
            post(&ctx, &wall, prompt, &message, true).await?;
        }
        Command::Like { id } => {
            let id = parse_id(&id)?;
            if wall.like(id) {
                println!("liked {id}");
            } else {
                println!("already liked (or no such post)");
            }
        }
        Command::Reply { id, message } => {
            let id = parse_id(&id)?;
            let reply = wall.reply(id, &message).await?;
            println!("replied to {id} as {}", reply.author);
        }
        Command::Retry { id } => {
            let id = parse_id(&id)?;
            wall.retry_post(id)?;
            wait_settled(&wall).await;
            render_feed(&ctx, &wall.feed());
        }
        Command::Accept => {
            ctx.mirror().set_accepted(true);
            println!("Yay! You made my heart skip a beat! 💕");
        }
        Command::Theme { name } => match name {
            Some(name) => {
                let theme = Theme::parse(&name)
                    .with_context(|| format!("unknown theme {name:?} (try rose, midnight, retro, noir)"))?;
                ctx.mirror().save_theme(theme);
                println!("{} {}", tokens(theme).heart, theme.name());
            }
            None => {
                let current = ctx.mirror().theme();
                for t in Theme::ALL {
                    let marker = if t == current { "*" } else { " " };
                    println!("{marker} {} {}", tokens(t).heart, t.name());
                }
            }
        },
    }
    Ok(())
}

async fn feed(ctx: &AppContext, wall: &Arc<Wall>, watch: bool) -> anyhow::Result<()> {
    if let Err(e) = wall.refresh().await {
        tracing::warn!(error = %e, "refresh failed");
    }
    if wall.is_offline() {
        if let Some(muse) = &ctx.muse {
            wall.seed_offline(muse.as_ref()).await;
        }
    }
    render_feed(ctx, &wall.feed());

    if !watch {
        return Ok(());
    }
    let Some(remote) = ctx.remote.clone() else {
        bail!("--watch needs a configured remote store");
    };

    let mut sub = watch_remote(remote, DEFAULT_POLL_PERIOD);
    let mut changes = wall.changes();
    println!("(watching — ctrl-c to stop)");
    loop {
        tokio::select! {
            ev = sub.next_event() => {
                match ev {
                    Some(ev) => wall.apply_live_event(ev),
                    None => break,
                }
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                render_feed(ctx, &wall.feed());
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

async fn post(
    ctx: &AppContext,
    wall: &Arc<Wall>,
    prompt: &str,
    message: &str,
    with_reaction: bool,
) -> anyhow::Result<()> {
    let posted = wall.submit_post(prompt, message)?;
    println!("posted as {} ({})", posted.author, posted.id);
    wait_settled(wall).await;

    if with_reaction {
        let reaction = match &ctx.muse {
            Some(muse) => reaction_to(muse.as_ref(), &ctx.mirror(), prompt, message).await,
            None => ctx
                .mirror()
                .cached_reaction()
                .unwrap_or_else(|| FALLBACK_REACTION.to_string()),
        };
        println!("✨ {reaction}");
    }
    render_feed(ctx, &wall.feed());
    Ok(())
}

/// Wait briefly for background reconciliation to settle.
async fn wait_settled(wall: &Arc<Wall>) {
    if wall.is_offline() {
        return;
    }
    let mut changes = wall.changes();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while wall.feed().iter().any(|p| p.status == PostStatus::Pending) {
        match tokio::time::timeout_at(deadline, changes.changed()).await {
            Ok(Ok(())) => continue,
            _ => break,
        }
    }
}

fn parse_id(raw: &str) -> anyhow::Result<PostId> {
    if let Some(seq) = raw.strip_prefix("local-") {
        return Ok(PostId::Provisional(seq.parse()?));
    }
    Ok(PostId::Authoritative(raw.parse()?))
}

fn render_feed(ctx: &AppContext, feed: &[Post]) {
    let t = tokens(ctx.mirror().theme());
    let reset = "\x1b[0m";
    println!("{} {} {}", t.heart, t.banner, t.heart);
    if feed.is_empty() {
        println!("  the wall is quiet... why not be the first to post?");
        return;
    }
    for post in feed {
        let status = match post.status {
            PostStatus::Pending => " (sending…)",
            PostStatus::Failed => " (failed — `lovewall retry` to resend)",
            PostStatus::Confirmed => "",
        };
        println!(
            "{}[{}] {}{}{}  {} ♥{}",
            t.accent,
            post.id,
            post.author,
            status,
            reset,
            post.created_at.format("%H:%M"),
            post.likes,
        );
        if post.prompt != FREEFORM_PROMPT {
            println!("    {}Q: {}{}", t.muted, post.prompt, reset);
        }
        println!("    “{}”", post.body);
        for reply in &post.replies {
            println!("      ↳ {}: {}", reply.author, reply.body);
        }
    }
}
