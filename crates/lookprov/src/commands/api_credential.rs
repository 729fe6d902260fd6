//! API credential command handlers.

use secrecy::ExposeSecret;
use tabled::Tabled;
use tokio_util::sync::CancellationToken;

use lookprov_api::models::ApiCredential;
use lookprov_core::{ApiCredentialConfig, ApiCredentialState, CoreError, Provider, Resource};

use crate::cli::{ApiCredentialArgs, ApiCredentialCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct CredentialRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Client ID")]
    client_id: String,
    #[tabled(rename = "Type")]
    credential_type: String,
    #[tabled(rename = "Disabled")]
    disabled: &'static str,
}

impl From<&ApiCredential> for CredentialRow {
    fn from(c: &ApiCredential) -> Self {
        Self {
            id: c.id.clone(),
            client_id: c.client_id.clone(),
            credential_type: c.credential_type.clone(),
            disabled: if c.is_disabled { "yes" } else { "no" },
        }
    }
}

pub async fn handle(
    provider: &Provider,
    args: ApiCredentialArgs,
    global: &GlobalOpts,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    let credentials = provider.api_credentials();

    match args.command {
        ApiCredentialCommand::List { user_id } => {
            let mut all = provider
                .client()
                .list_api_credentials(&user_id, cancel)
                .await
                .map_err(CoreError::from)?
                .into_body();
            for cred in &mut all {
                cred.client_secret = None;
            }
            let out = output::render_list(
                global.output,
                &all,
                |c| CredentialRow::from(c),
                |c| format!("{user_id}/{}", c.id),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ApiCredentialCommand::Show { id } => {
            let state = credentials.import(&id, cancel).await?;
            let out = output::render_single(global.output, &state, ApiCredentialState::import_id);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ApiCredentialCommand::Create {
            user_id,
            credential_type,
            disabled,
        } => {
            let config = ApiCredentialConfig {
                user_id,
                credential_type,
                is_disabled: disabled,
            };
            let state = credentials.create(&config, cancel).await?;

            // The server never returns the secret again.
            match &state.client_secret {
                Some(secret) => eprintln!(
                    "Client secret (shown once, store it now): {}",
                    secret.expose_secret()
                ),
                None => eprintln!("The server returned no client secret for this credential"),
            }

            let out = output::render_single(global.output, &state, ApiCredentialState::import_id);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ApiCredentialCommand::Delete { id } => {
            let (user_id, credential_id) = lookprov_core::api_credential::parse_import_id(&id)?;
            if !util::confirm(
                &format!("Revoke API credential {credential_id} of user {user_id}?"),
                "api-credential delete",
                global.yes,
            )? {
                return Ok(());
            }
            let mut state = ApiCredentialState {
                id: credential_id.to_owned(),
                user_id: user_id.to_owned(),
                ..ApiCredentialState::default()
            };
            credentials.delete(&mut state, cancel).await?;
            if !global.quiet {
                eprintln!("API credential revoked");
            }
            Ok(())
        }
    }
}
