// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `quire set|get|remove|clear` command implementations.

use quire_core::{QuireError, StorageScope};
use quire_vault::{CredentialName, SaveStatus, mask_secret, read_token};
use secrecy::ExposeSecret;

use crate::context::Context;

pub async fn run_set(ctx: &Context, name: CredentialName) -> Result<(), QuireError> {
    let token = read_token(name)?;
    match ctx.store().save(name, token.expose_secret()).await? {
        SaveStatus::Saved => {
            println!("{name} saved ({})", mask_secret(token.expose_secret()));
            if name.scope() == StorageScope::Session {
                println!("note: session credentials are discarded when this process exits");
            }
            Ok(())
        }
        SaveStatus::Rejected => Err(QuireError::Vault(format!("{name} token was rejected"))),
        SaveStatus::WriteFailed => Err(QuireError::Vault(format!(
            "could not write {name} to {} storage",
            name.scope()
        ))),
    }
}

pub async fn run_get(ctx: &Context, name: CredentialName, reveal: bool) -> Result<(), QuireError> {
    match ctx.store().load(name).await? {
        Some(secret) if reveal => println!("{}", secret.expose_secret()),
        Some(secret) => println!("{name}: {}", mask_secret(secret.expose_secret())),
        None => println!("{name}: not set"),
    }
    Ok(())
}

pub async fn run_remove(ctx: &Context, name: CredentialName) -> Result<(), QuireError> {
    if ctx.store().remove(name).await? {
        println!("{name} removed");
        Ok(())
    } else {
        Err(QuireError::Vault(format!("could not remove {name}")))
    }
}

pub async fn run_clear(ctx: &Context) -> Result<(), QuireError> {
    if ctx.store().clear_all().await? {
        println!("all credentials removed");
        Ok(())
    } else {
        Err(QuireError::Vault(
            "some credentials could not be removed".to_string(),
        ))
    }
}
