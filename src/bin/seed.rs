//! Replaces the user set with the fixed demo roster. Safe to re-run: it
//! deletes all users first, so repeated runs converge on the same state.

use taskboard::auth::password::hash_password;
use taskboard::auth::repo::{Role, User};
use taskboard::state::AppState;

const DEMO_PASSWORD: &str = "password123";

const DEMO_USERS: &[(&str, &str, Role)] = &[
    ("Alice Admin", "alice@admin.com", Role::Admin),
    ("Mike Manager", "mike@manager.com", Role::Manager),
    ("Maya Member", "maya@member.com", Role::Member),
    ("John Member", "john@member.com", Role::Member),
    ("Sara Member", "sara@member.com", Role::Member),
    ("Liam Member", "liam@member.com", Role::Member),
    ("Zara Member", "zara@member.com", Role::Member),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "taskboard=info".to_string());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let state = AppState::init().await?;

    sqlx::migrate!("./migrations").run(&state.db).await?;

    // Tasks reference users by id; they go first.
    sqlx::query("DELETE FROM tasks").execute(&state.db).await?;
    let removed = User::delete_all(&state.db).await?;
    tracing::info!(removed, "cleared existing users");

    for (name, email, role) in DEMO_USERS {
        let hash = hash_password(DEMO_PASSWORD)?;
        let user = User::create(&state.db, name, email, &hash, *role).await?;
        tracing::info!(user_id = %user.id, email = %user.email, role = %user.role, "seeded user");
    }

    tracing::info!("demo users seeded");
    Ok(())
}
