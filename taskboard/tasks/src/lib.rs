pub mod config {
    use serde::Deserialize;
    use std::time::Duration;

    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        #[serde(default = "default_port")]
        pub port: u16,
        /// Base URL of the users service used for the existence check.
        #[serde(default = "default_users_api_url")]
        pub users_api_url: String,
        #[serde(default = "default_users_api_timeout_ms")]
        pub users_api_timeout_ms: u64,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            taskboard_common::config::from_env()
        }

        /// Upper bound for a single existence-check round trip.
        pub fn users_api_timeout(&self) -> Duration {
            Duration::from_millis(self.users_api_timeout_ms)
        }
    }

    fn default_port() -> u16 {
        3002
    }

    fn default_users_api_url() -> String {
        "http://localhost:3001".to_string()
    }

    fn default_users_api_timeout_ms() -> u64 {
        5000
    }

}

pub mod clock;
pub mod directory;
pub mod task;
pub mod web;
