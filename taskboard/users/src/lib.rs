pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        #[serde(default = "default_port")]
        pub port: u16,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            taskboard_common::config::from_env()
        }
    }

    fn default_port() -> u16 {
        3001
    }

}

pub mod user;
pub mod web;
