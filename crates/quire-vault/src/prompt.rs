// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token acquisition via the QUIRE_TOKEN environment variable or a hidden TTY prompt.

use quire_core::QuireError;
use secrecy::SecretString;

use crate::store::CredentialName;

/// The environment variable that supplies a token non-interactively.
pub const TOKEN_ENV_VAR: &str = "QUIRE_TOKEN";

/// Get the token to store for `name`.
///
/// Priority:
/// 1. `QUIRE_TOKEN` environment variable (scripts, CI)
/// 2. Hidden interactive prompt via `rpassword`
pub fn read_token(name: CredentialName) -> Result<SecretString, QuireError> {
    if let Some(token) = std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty()) {
        return Ok(SecretString::from(token));
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let token = rpassword::prompt_password(format!("{name} token: "))
            .map_err(|e| QuireError::Vault(format!("failed to read token: {e}")))?;
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(QuireError::Vault("empty token not allowed".to_string()));
        }
        return Ok(SecretString::from(token));
    }

    Err(QuireError::Vault(format!(
        "No token provided. Set {TOKEN_ENV_VAR} or run interactively."
    )))
}
