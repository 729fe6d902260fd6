// Resource modules against a mocked Looker instance.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lookprov_api::Credentials;
use lookprov_core::setting::SETTING_ID;
use lookprov_core::{
    ApiCredentialConfig, ApiCredentialState, CoreError, DataSource, DesiredSettings, FolderConfig,
    FolderQuery, ModelSetConfig, Provider, ProviderConfig, Resource,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Provider) {
    let server = MockServer::start().await;
    let config = ProviderConfig::new(
        Url::parse(&format!("{}/api", server.uri())).unwrap(),
        Credentials::Token(SecretString::from("test-token")),
    );
    let provider = Provider::connect(&config, &CancellationToken::new())
        .await
        .unwrap();
    (server, provider)
}

fn folder_json(id: &str, name: &str, parent_id: Option<&str>) -> serde_json::Value {
    json!({ "id": id, "name": name, "parent_id": parent_id, "child_count": 0, "creator_id": "18" })
}

// ── Folders ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_folder_lookup_by_name_takes_last_exact_match() {
    let (server, provider) = setup().await;
    let cancel = CancellationToken::new();

    Mock::given(method("GET"))
        .and(path("/api/4.0/folders/search"))
        .and(query_param("name", "Engineering"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            folder_json("11", "Engineering", Some("1")),
            folder_json("12", "Engineering Archive", Some("1")),
            folder_json("13", "Engineering", Some("1")),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/4.0/folders/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(folder_json("1", "Shared", None)))
        .mount(&server)
        .await;

    let query = FolderQuery {
        id: None,
        name: Some("Engineering".into()),
    };
    let found = provider.folder_lookup().read(&query, &cancel).await.unwrap();

    assert_eq!(found.id, "13");
    assert_eq!(found.parent_id, "1");
    assert_eq!(found.parent_name, "Shared");
}

#[tokio::test]
async fn test_folder_lookup_of_root_has_empty_parent() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/4.0/folders/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(folder_json("1", "Shared", None)))
        .mount(&server)
        .await;

    let query = FolderQuery {
        id: Some("1".into()),
        name: None,
    };
    let found = provider
        .folder_lookup()
        .read(&query, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(found.parent_id, "");
    assert_eq!(found.parent_name, "");
}

#[tokio::test]
async fn test_folder_lookup_without_exact_match_is_not_found() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/4.0/folders/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            folder_json("12", "Engineering Archive", Some("1")),
        ])))
        .mount(&server)
        .await;

    let query = FolderQuery {
        id: None,
        name: Some("Engineering".into()),
    };
    let err = provider
        .folder_lookup()
        .read(&query, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "{err:?}");
}

#[tokio::test]
async fn test_folder_lookup_rejects_both_keys_before_any_call() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let query = FolderQuery {
        id: Some("1".into()),
        name: Some("Shared".into()),
    };
    let err = provider
        .folder_lookup()
        .read(&query, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }), "{err:?}");
}

#[tokio::test]
async fn test_folder_create_then_read_agree() {
    let (server, provider) = setup().await;
    let cancel = CancellationToken::new();
    let folders = provider.folders();

    Mock::given(method("POST"))
        .and(path("/api/4.0/folders"))
        .and(body_json(json!({ "name": "Finance", "parent_id": "1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(folder_json("40", "Finance", Some("1"))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/4.0/folders/40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(folder_json("40", "Finance", Some("1"))))
        .mount(&server)
        .await;

    let config = FolderConfig {
        name: "Finance".into(),
        parent_id: "1".into(),
    };
    let created = folders.create(&config, &cancel).await.unwrap();
    let read = folders.read(&created, &cancel).await.unwrap();

    assert_eq!(read, Some(created));
}

#[tokio::test]
async fn test_folder_update_sends_changed_fields_only() {
    let (server, provider) = setup().await;
    let cancel = CancellationToken::new();

    Mock::given(method("GET"))
        .and(path("/api/4.0/folders/40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(folder_json("40", "Finance", Some("1"))))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/4.0/folders/40"))
        .and(body_json(json!({ "name": "Finance & Ops" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(folder_json("40", "Finance & Ops", Some("1"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let folders = provider.folders();
    let state = folders.import("40", &cancel).await.unwrap();
    let config = FolderConfig {
        name: "Finance & Ops".into(),
        parent_id: "1".into(),
    };
    let updated = folders.update(&state, &config, &cancel).await.unwrap();
    assert_eq!(updated.name, "Finance & Ops");
}

#[tokio::test]
async fn test_folder_read_of_deleted_folder_is_none() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/4.0/folders/40"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not found" })))
        .mount(&server)
        .await;

    let state = lookprov_core::FolderState {
        id: "40".into(),
        ..Default::default()
    };
    let read = provider
        .folders()
        .read(&state, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(read, None);
}

// ── Model sets ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_model_set_create_then_read_agree() {
    let (server, provider) = setup().await;
    let cancel = CancellationToken::new();
    let model_sets = provider.model_sets();
    let wire = json!({
        "id": "5",
        "name": "finance_models",
        "models": ["ledger", "billing"],
        "all_access": false,
        "built_in": false
    });

    Mock::given(method("POST"))
        .and(path("/api/4.0/model_sets"))
        .and(body_json(json!({ "name": "finance_models", "models": ["billing", "ledger"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(wire.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/4.0/model_sets/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wire))
        .mount(&server)
        .await;

    let config = ModelSetConfig {
        name: "finance_models".into(),
        models: ["ledger".to_owned(), "billing".to_owned()].into(),
    };
    let created = model_sets.create(&config, &cancel).await.unwrap();
    let read = model_sets.read(&created, &cancel).await.unwrap().unwrap();

    assert_eq!(read, created);
    assert_eq!(read.models, config.models);
}

#[tokio::test]
async fn test_model_set_update_without_drift_sends_nothing() {
    let (server, provider) = setup().await;
    let cancel = CancellationToken::new();

    Mock::given(method("GET"))
        .and(path("/api/4.0/model_sets/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "5", "name": "finance_models", "models": ["billing", "ledger"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let model_sets = provider.model_sets();
    let state = model_sets.import("5", &cancel).await.unwrap();
    let config = ModelSetConfig {
        name: "finance_models".into(),
        models: ["ledger".to_owned(), "billing".to_owned()].into(),
    };
    let updated = model_sets.update(&state, &config, &cancel).await.unwrap();
    assert_eq!(updated, state);
}

// ── API credentials ─────────────────────────────────────────────────

fn credential_config() -> ApiCredentialConfig {
    ApiCredentialConfig {
        user_id: "18".into(),
        credential_type: "api3".into(),
        is_disabled: false,
    }
}

#[tokio::test]
async fn test_api_credential_secret_survives_read() {
    let (server, provider) = setup().await;
    let cancel = CancellationToken::new();
    let credentials = provider.api_credentials();

    Mock::given(method("POST"))
        .and(path("/api/4.0/users/18/credentials_api3"))
        .and(body_json(json!({ "type": "api3", "is_disabled": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "8",
            "client_id": "abc123",
            "client_secret": "supersecretvalue",
            "type": "api3",
            "is_disabled": false
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/4.0/users/18/credentials_api3/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "8",
            "client_id": "abc123",
            "type": "api3",
            "is_disabled": false
        })))
        .mount(&server)
        .await;

    let created = credentials.create(&credential_config(), &cancel).await.unwrap();
    assert_eq!(
        created.client_secret.as_ref().map(|s| s.expose_secret().to_owned()),
        Some("supersecretvalue".to_owned())
    );

    let read = credentials.read(&created, &cancel).await.unwrap().unwrap();
    assert_eq!(read, created);
    assert_eq!(read.import_id(), "18/8");
}

#[tokio::test]
async fn test_api_credential_update_is_refused_without_a_call() {
    let (server, provider) = setup().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let state = ApiCredentialState {
        id: "9".into(),
        user_id: "18".into(),
        credential_type: "api3".into(),
        ..Default::default()
    };
    let config = ApiCredentialConfig {
        is_disabled: true,
        ..credential_config()
    };
    let err = provider
        .api_credentials()
        .update(&state, &config, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::UpdateNotSupported { .. }), "{err:?}");
}

#[tokio::test]
async fn test_api_credential_delete_clears_id() {
    let (server, provider) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/4.0/users/18/credentials_api3/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut state = ApiCredentialState {
        id: "9".into(),
        user_id: "18".into(),
        credential_type: "api3".into(),
        ..Default::default()
    };
    provider
        .api_credentials()
        .delete(&mut state, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(state.id, "");
}

#[tokio::test]
async fn test_api_credential_import_by_user_and_id() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/4.0/users/18/credentials_api3/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "9", "client_id": "xyz", "type": "api3", "is_disabled": true
        })))
        .mount(&server)
        .await;

    let state = provider
        .api_credentials()
        .import("18/9", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(state.user_id, "18");
    assert!(state.is_disabled);
    assert!(state.client_secret.is_none());
}

// ── Settings ────────────────────────────────────────────────────────

fn fetched_settings() -> serde_json::Value {
    json!({
        "instance_config": { "feature_flags": { "beta": true }, "license_features": {} },
        "timezone": "UTC",
        "embed_enabled": true,
        "marketplace_site": "https://cdn.example",
        "privatelabel_configuration": {
            "custom_welcome_email_advanced": true,
            "default_title": "Acme",
            "logo_url": "https://logo.example"
        },
        "custom_welcome_email": { "enabled": true, "content": "<p>old</p>" },
        "embed_config": { "embed_enabled": false, "sso_auth_enabled": false }
    })
}

async fn mount_settings_get(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/4.0/setting"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fetched_settings()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_settings_apply_patches_without_read_only_members() {
    let (server, provider) = setup().await;
    mount_settings_get(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/api/4.0/setting"))
        .and(body_json(json!({
            "timezone": "Europe/Berlin",
            "privatelabel_configuration": {
                "custom_welcome_email_advanced": true,
                "default_title": "Acme",
                "logo_file": "aGk="
            },
            "custom_welcome_email": {
                "enabled": true,
                "content": "<p>old</p>",
                "subject": "Hello"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(fetched_settings()))
        .expect(1)
        .mount(&server)
        .await;

    let desired = DesiredSettings::from_json(&json!({
        "timezone": "Europe/Berlin",
        "marketplace_site": "https://ignored.example",
        "privatelabel_configuration": { "logo_file": "aGk=" },
        "custom_welcome_email": { "subject": "Hello" }
    }))
    .unwrap();

    let (state, plan) = provider
        .settings()
        .apply(&desired, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(state.id, SETTING_ID);
    assert_eq!(plan.changes.changes().len(), 3);
}

#[tokio::test]
async fn test_settings_violation_sends_no_patch() {
    let (server, provider) = setup().await;
    mount_settings_get(&server).await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let desired = DesiredSettings::from_json(&json!({
        "embed_config": { "embed_cookieless_v2": true }
    }))
    .unwrap();
    let err = provider
        .settings()
        .create(&desired, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "embed_config.embed_cookieless_v2 cannot be set to true when \
         embed_config.embed_enabled is false (was true)"
    );
}

#[tokio::test]
async fn test_settings_advanced_off_clears_subject_and_null_clears_host() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/4.0/setting"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "host_url": "https://old.example",
            "privatelabel_configuration": { "custom_welcome_email_advanced": true },
            "custom_welcome_email": { "enabled": true, "subject": "Old subject" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/4.0/setting"))
        .and(body_json(json!({
            "host_url": null,
            "privatelabel_configuration": { "custom_welcome_email_advanced": false },
            "custom_welcome_email": { "enabled": true }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let desired = DesiredSettings::from_json(&json!({
        "host_url": null,
        "privatelabel_configuration": { "custom_welcome_email_advanced": false }
    }))
    .unwrap();

    let (_, plan) = provider
        .settings()
        .apply(&desired, &CancellationToken::new())
        .await
        .unwrap();

    let cleared: Vec<_> = plan.changes.cleared().iter().map(|c| c.path).collect();
    assert_eq!(cleared, vec!["custom_welcome_email.subject"]);
}

#[tokio::test]
async fn test_settings_delete_and_import_touch_nothing_remote() {
    let (server, provider) = setup().await;
    mount_settings_get(&server).await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let settings = provider.settings();
    let cancel = CancellationToken::new();
    let mut state = settings.import("anything", &cancel).await.unwrap();
    assert_eq!(state.id, SETTING_ID);

    settings.delete(&mut state, &cancel).await.unwrap();
    assert_eq!(state.id, "");
}

// ── Connection ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_connect_with_client_credentials_logs_in() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/4.0/login"))
        .and(body_string_contains("client_id=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "issued-token",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/4.0/folders/1"))
        .and(header("authorization", "token issued-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(folder_json("1", "Shared", None)))
        .expect(1)
        .mount(&server)
        .await;

    let config = ProviderConfig::new(
        Url::parse(&format!("{}/api", server.uri())).unwrap(),
        Credentials::ApiClient {
            client_id: "abc".into(),
            client_secret: SecretString::from("shh"),
        },
    );
    let cancel = CancellationToken::new();
    let provider = Provider::connect(&config, &cancel).await.unwrap();
    let state = provider.folders().import("1", &cancel).await.unwrap();
    assert_eq!(state.name, "Shared");
}
