use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        grist_api_key: get_env("GRIST_API_KEY"),
        grist_doc_id: get_env("GRIST_DOC_ID"),
        grist_base_url: get_env_or_default("GRIST_BASE_URL", "https://grist.numerique.gouv.fr/api"),
        grist_table_id: get_env("GRIST_TABLE_ID"),
        ds_api_token: get_env_opt("API_TOKEN_AIDE"),
        demarche_id: get_env_opt("DEMARCHE_ID"),
        config_file_path: get_env_opt("CONFIG_FILE_PATH"),
    }
});

pub struct Config {
    pub grist_api_key: String,
    pub grist_doc_id: String,
    pub grist_base_url: String,
    pub grist_table_id: String,
    /// Token for the Démarches Simplifiées prefill API. Optional: without it
    /// the service still answers searches, with an error string in place of
    /// each generated URL.
    pub ds_api_token: Option<String>,
    pub demarche_id: Option<String>,
    pub config_file_path: Option<String>,
}

fn get_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("Missing required environment variable: {key}"))
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}
