use serde::de::DeserializeOwned;

/// Loads a service configuration from the process environment.
///
/// Variable names are matched case-insensitively against the struct's fields,
/// so `PORT` fills `port` and `USERS_API_URL` fills `users_api_url`.
pub fn from_env<T>() -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    load(config::Environment::default())
}

/// Loads a service configuration from an explicit set of variables instead of
/// the process environment.
pub fn from_vars<T, I, K, V>(vars: I) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let source: config::Map<String, String> = vars
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect();
    load(config::Environment::default().source(Some(source)))
}

fn load<T: DeserializeOwned>(environment: config::Environment) -> anyhow::Result<T> {
    let settings = config::Config::builder()
        .add_source(environment)
        .build()?;

    let config: T = settings.try_deserialize()?;
    Ok(config)
}
