//! Workspace name handling.

use rand::seq::IndexedRandom;

/// Name jj gives the primary checkout. Never used as an ordinary workspace name.
pub const DEFAULT_WORKSPACE: &str = "default";

pub const ADJECTIVES: &[&str] = &[
    "blue", "green", "red", "gold", "silver", "swift", "brave", "calm", "wild", "bold", "keen",
    "wise", "silent", "fierce", "noble", "cosmic", "crystal", "electric", "frozen", "iron",
    "lunar", "mystic", "northern", "radiant", "shadow", "ember", "frost", "storm", "stellar",
    "amber",
];

pub const NOUNS: &[&str] = &[
    "castle", "forest", "river", "mountain", "eagle", "wolf", "phoenix", "falcon", "hawk", "raven",
    "tiger", "bear", "beacon", "forge", "gateway", "kernel", "oracle", "sentinel", "tower", "fox",
    "owl", "panther", "viper", "crane", "otter", "lynx", "cedar", "oak", "pine", "reef",
];

/// Map a user-supplied name to the form used on disk and passed to jj.
///
/// Every `/` becomes `-`; nothing else changes. Total and idempotent, so
/// `feature/auth/login` and `feature-auth-login` name the same workspace.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.replace('/', "-")
}

/// True if `name` refers to the default workspace.
#[must_use]
pub fn is_default(name: &str) -> bool {
    name == DEFAULT_WORKSPACE
}

/// Random `adjective-noun` name for `create --random`.
pub fn generate_workspace_name() -> String {
    let mut rng = rand::rng();
    let adj = ADJECTIVES.choose(&mut rng).unwrap_or(&"swift");
    let noun = NOUNS.choose(&mut rng).unwrap_or(&"agent");
    format!("{adj}-{noun}")
}
