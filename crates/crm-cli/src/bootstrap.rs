use anyhow::Context;
use crm_config::CrmConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration (`.env` first), then apply `--api-url`.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<CrmConfig> {
    let config = CrmConfig::load_with_dotenv().context("failed to load crm configuration")?;
    apply_overrides(config, flags)
}

fn apply_overrides(mut config: CrmConfig, flags: &GlobalFlags) -> anyhow::Result<CrmConfig> {
    if let Some(api_url) = &flags.api_url {
        config.api.base_url.clone_from(api_url);
        config
            .validate()
            .with_context(|| format!("invalid --api-url '{api_url}'"))?;
    }
    Ok(config)
}
