use clap::{Args, Subcommand};
use serde_json::Value;

/// Organization commands.
#[derive(Clone, Debug, Subcommand)]
pub enum OrgCommands {
    /// Show your organization.
    Mine,
    /// List all organizations (admin only).
    List,
    /// Create an organization.
    Create(OrgCreateArgs),
    /// Update your organization.
    Update(OrgUpdateArgs),
}

#[derive(Clone, Debug, Args)]
pub struct OrgCreateArgs {
    pub name: String,
    /// Industry type, e.g. retail.
    #[arg(long)]
    pub industry: Option<String>,
    /// Subscription plan, e.g. free or pro.
    #[arg(long)]
    pub plan: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct OrgUpdateArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub industry: Option<String>,
    #[arg(long)]
    pub plan: Option<String>,
    /// Setting as key=value; the value is read as JSON when it parses.
    #[arg(long = "setting", value_parser = parse_setting)]
    pub settings: Vec<(String, Value)>,
}

fn parse_setting(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty setting key in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::parse_setting;

    #[test]
    fn setting_values_are_json_when_possible() {
        assert_eq!(
            parse_setting("max_users=25").expect("parse"),
            ("max_users".to_string(), json!(25))
        );
        assert_eq!(
            parse_setting("notify=true").expect("parse"),
            ("notify".to_string(), json!(true))
        );
        assert_eq!(
            parse_setting("currency=EUR").expect("parse"),
            ("currency".to_string(), json!("EUR"))
        );
        assert_eq!(
            parse_setting("motto=a=b").expect("parse"),
            ("motto".to_string(), json!("a=b"))
        );
    }

    #[test]
    fn setting_requires_a_key() {
        assert!(parse_setting("no-equals").is_err());
        assert!(parse_setting(" =1").is_err());
    }
}
