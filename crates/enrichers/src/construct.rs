use flowsint_core::{Record, UserId, Value};
use flowsint_error::FlowError;
use flowsint_secrets::{SecretRef, SecretStore};

use crate::metadata::EnricherMetadata;

/// Check a flow node's declared `params` against an enricher's metadata and
/// resolve any `vaultSecret` references before the enricher is constructed.
///
/// A `vaultSecret` param is `{"vaultSecret": "<logical name>"}`, optionally
/// with a sibling `"vaultId"` naming the specific vault entry the user
/// selected; when present it is tried before the logical-name override and
/// the environment, per [`SecretStore::resolve`]'s order.
///
/// Every param is checked, not just the first offending one, mirroring the
/// type system's validation behavior; resolution runs after validation
/// passes, since there is no point resolving secrets for an otherwise
/// invalid node.
pub async fn resolve_params(
    metadata: &EnricherMetadata,
    params: &Record,
    secrets: &SecretStore,
    user_id: UserId,
) -> Result<Record, FlowError> {
    let mut errors = Vec::new();
    for spec in metadata.params() {
        let value = params.get(&spec.name);
        if is_vault_secret_marker(value) {
            continue;
        }
        if let Err(reason) = spec.check(value) {
            errors.push(reason);
        }
    }
    if !errors.is_empty() {
        return Err(FlowError::validation(errors.join("; ")));
    }

    let mut resolved = params.clone();
    for spec in metadata.params() {
        let Some(Value::Object(obj)) = params.get(&spec.name) else {
            continue;
        };
        let Some(Value::String(logical_name)) = obj.get("vaultSecret") else {
            continue;
        };
        let mut secret_ref = SecretRef::named(logical_name.clone());
        if let Some(Value::String(vault_id)) = obj.get("vaultId") {
            secret_ref = secret_ref.with_vault_id(vault_id.clone());
        }
        let value = secrets.resolve(user_id, &secret_ref).await?;
        resolved.insert(spec.name.clone(), Value::String(value));
    }

    for spec in metadata.params() {
        if !resolved.contains_key(&spec.name) {
            if let Some(default) = &spec.default {
                resolved.insert(spec.name.clone(), default.clone());
            }
        }
    }

    Ok(resolved)
}

fn is_vault_secret_marker(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Object(obj)) if obj.contains_key("vaultSecret"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{ParamKind, ParamSpec};
    use serde_json::json;
    use std::sync::Arc;

    fn metadata() -> EnricherMetadata {
        EnricherMetadata::builder("pdcp_lookup")
            .with_param(ParamSpec::required("api_key", ParamKind::String))
            .with_param(ParamSpec::optional("timeout_ms", ParamKind::Number, json!(5000)))
            .build()
    }

    #[tokio::test]
    async fn resolves_vault_secret_param() {
        let meta = metadata();
        let backend = Arc::new(flowsint_secrets::InMemoryBackend::new());
        backend.insert("vault-1", "sk-live-abc");
        let secrets = SecretStore::new(backend);
        let user = UserId::v4();
        secrets.set_user_override(user, "pdcp_api_key", "sk-live-abc");

        let params: Record = [(
            "api_key".to_string(),
            json!({"vaultSecret": "pdcp_api_key"}),
        )]
        .into();

        let resolved = resolve_params(&meta, &params, &secrets, user).await.unwrap();
        assert_eq!(resolved.get("api_key").unwrap(), &json!("sk-live-abc"));
    }

    #[tokio::test]
    async fn vault_id_on_the_marker_is_tried_before_the_user_override() {
        let meta = metadata();
        let backend = Arc::new(flowsint_secrets::InMemoryBackend::new());
        backend.insert("vault-123", "from-vault-entry");
        let secrets = SecretStore::new(backend);
        let user = UserId::v4();
        secrets.set_user_override(user, "pdcp_api_key", "from-user-override");

        let params: Record = [(
            "api_key".to_string(),
            json!({"vaultSecret": "pdcp_api_key", "vaultId": "vault-123"}),
        )]
        .into();

        let resolved = resolve_params(&meta, &params, &secrets, user).await.unwrap();
        assert_eq!(resolved.get("api_key").unwrap(), &json!("from-vault-entry"));
    }

    #[tokio::test]
    async fn missing_required_param_fails_before_resolving_secrets() {
        let meta = metadata();
        let backend = Arc::new(flowsint_secrets::InMemoryBackend::new());
        let secrets = SecretStore::new(backend);
        let params = Record::new();

        let err = resolve_params(&meta, &params, &secrets, UserId::v4()).await.unwrap_err();
        assert_eq!(err.kind(), flowsint_error::ErrorKind::Validation);
    }

    #[tokio::test]
    async fn default_is_applied_when_optional_param_is_absent() {
        let meta = metadata();
        let backend = Arc::new(flowsint_secrets::InMemoryBackend::new());
        let secrets = SecretStore::new(backend);
        let params: Record = [(
            "api_key".to_string(),
            json!({"vaultSecret": "pdcp_api_key"}),
        )]
        .into();
        let user = UserId::v4();
        secrets.set_user_override(user, "pdcp_api_key", "sk-live-abc");

        let resolved = resolve_params(&meta, &params, &secrets, user).await.unwrap();
        assert_eq!(resolved.get("timeout_ms").unwrap(), &json!(5000));
    }
}
