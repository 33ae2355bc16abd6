/// Environment variable naming the model to serve.
pub const MODEL_ID_ENV: &str = "MODEL_NAME";

/// Sentiment model served when neither the CLI nor the environment names one.
pub const DEFAULT_MODEL_ID: &str = "distilbert-base-uncased-finetuned-sst-2-english";

/// Resolve the model identifier: CLI flag, then `MODEL_NAME`, then the default.
pub fn resolve_model_id(cli_model_id: Option<&str>) -> String {
    if let Some(id) = cli_model_id {
        return id.to_string();
    }
    match std::env::var(MODEL_ID_ENV) {
        Ok(id) if !id.is_empty() => id,
        _ => DEFAULT_MODEL_ID.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_id_resolution_order() {
        // CLI flag wins over everything else.
        assert_eq!(resolve_model_id(Some("org/custom-model")), "org/custom-model");

        std::env::set_var(MODEL_ID_ENV, "org/env-model");
        assert_eq!(resolve_model_id(None), "org/env-model");

        std::env::remove_var(MODEL_ID_ENV);
        assert_eq!(resolve_model_id(None), DEFAULT_MODEL_ID);
    }
}
