mod config;
mod session;
mod status;

use anyhow::Context;
use domain::{Author, Comment, PostId, UserId};
use dotenvy::dotenv;
use tracing::info;

use config::{BackendSettings, Settings};
use remote::BackendConfig;
use session::PostSession;
use status::ActionKind;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let settings = Settings::new().context("Failed to load configuration")?;

    let backend_config = match settings.backend {
        BackendSettings::Http { base_url } => BackendConfig::Http(remote::HttpConfig { base_url }),
        BackendSettings::Demo => BackendConfig::Demo,
    };
    let backend = remote::connect(backend_config);

    let viewer = Author {
        id: UserId::new(settings.viewer.id).map_err(|e| anyhow::anyhow!(e))?,
        name: settings.viewer.name,
    };
    let post_id = PostId::new(settings.post.id).map_err(|e| anyhow::anyhow!(e))?;

    let session = PostSession::new(backend, post_id, viewer);

    println!("\n[1/4] Loading post with comments...");
    if !session.load().await {
        let status = session.status(ActionKind::Load);
        anyhow::bail!(
            "load failed: {}",
            status.error.unwrap_or_else(|| "unknown error".into())
        );
    }
    if let Some(post) = session.post() {
        println!("   -> {} — {}", post.title, post.body);
    }
    print_thread(&session);

    println!("\n[2/4] Replying to the first root comment...");
    let target = session.root_comments().first().map(|c| c.id.clone());
    match target {
        Some(parent_id) => {
            if session
                .create_comment("Replying from the Rust client!", Some(parent_id.clone()))
                .await
            {
                println!("   -> Reply accepted (appears first among siblings).");
            } else {
                let status = session.status(ActionKind::Create);
                println!("   -> Reply failed: {:?}", status.error);
            }
        }
        None => println!("   -> No comments to reply to, skipping."),
    }

    println!("\n[3/4] Toggling a like on the first root comment...");
    if let Some(root) = session.root_comments().first().map(|c| c.id.clone()) {
        session.toggle_like(root.clone()).await;
        session.toggle_like(root).await;
        println!("   -> Liked and unliked again (count back where it started).");
    }

    println!("\n[4/4] Final thread:");
    print_thread(&session);

    for kind in [
        ActionKind::Load,
        ActionKind::Create,
        ActionKind::Update,
        ActionKind::Delete,
        ActionKind::Like,
    ] {
        let s = session.status(kind);
        info!(
            "action {:?}: in_flight={} error={:?}",
            kind, s.in_flight, s.error
        );
    }

    session.close();
    Ok(())
}

fn print_thread(session: &PostSession) {
    let roots = session.root_comments();
    if roots.is_empty() {
        println!("   (no comments)");
        return;
    }
    for root in &roots {
        print_subtree(session, root, 1);
    }
}

fn print_subtree(session: &PostSession, comment: &Comment, depth: usize) {
    let indent = "  ".repeat(depth);
    let body = match &comment.message {
        Some(m) => m.as_str(),
        None => "[deleted]",
    };
    println!(
        "{}- {} ({} like(s)){}: {}",
        indent,
        comment.author.display_name(),
        comment.like_count,
        if comment.liked_by_me { " ♥" } else { "" },
        body
    );
    for reply in session.replies_of(&comment.id) {
        print_subtree(session, &reply, depth + 1);
    }
}
