use std::fmt;

/// Prefix every well-formed OpenAI secret key starts with.
pub const CREDENTIAL_PREFIX: &str = "sk-";

/// Name of the environment variable consulted when no key is typed in.
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// Bearer token used to authenticate against the completion API.
///
/// Held exactly as given; shells trim typed or pasted input before building
/// one. The key is never printed in full: `Debug` shows the masked form only.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(key.as_ref().to_string())
    }

    /// Matches `^sk-.+`: the prefix at the very start, then at least one
    /// character that is not a line break.
    pub fn is_well_formed(&self) -> bool {
        self.0
            .strip_prefix(CREDENTIAL_PREFIX)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c != '\n')
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Mask the key with asterisks, keeping the last four chars visible
    pub fn masked(&self) -> String {
        mask_secret(&self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}

pub fn mask_secret(secret: &str) -> String {
    let char_count = secret.chars().count();
    if char_count <= 4 {
        return "*".repeat(char_count);
    }
    let masked_len = char_count - 4;
    let last_four: String = secret.chars().skip(masked_len).collect();
    format!("{}...{}", "*".repeat(masked_len.min(20)), last_four)
}

/// Pick the credential to use: the typed-in value wins when it is not blank,
/// otherwise fall back to the environment value. Surrounding whitespace from
/// either source is dropped here, before validation sees it.
pub fn pick_credential(interactive: Option<&str>, env_value: Option<&str>) -> Option<Credential> {
    interactive
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .or(env_value.map(str::trim).filter(|k| !k.is_empty()))
        .map(Credential::new)
}

/// Resolve the credential from a typed-in value or `OPENAI_API_KEY`.
pub fn resolve_credential(interactive: Option<&str>) -> Option<Credential> {
    let env_value = std::env::var(API_KEY_ENV_VAR).ok();
    pick_credential(interactive, env_value.as_deref())
}
