pub mod logging;
pub mod provider;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_HOST: &str = "host";
pub const ARG_PORT: &str = "port";
pub const ARG_DISABLE_ME: &str = "disable-me";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("vet-api")
        .about("Auth gateway for a hosted identity provider")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_HOST)
                .long(ARG_HOST)
                .help("Address to listen on")
                .default_value("0.0.0.0")
                .env("VET_API_HOST"),
        )
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("3000")
                .env("VET_API_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_DISABLE_ME)
                .long(ARG_DISABLE_ME)
                .help("Do not mount GET /me")
                .env("VET_API_DISABLE_ME")
                .action(clap::ArgAction::SetTrue),
        );

    let command = provider::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use self::provider::{ARG_ANON_KEY, ARG_PROVIDER_TIMEOUT, ARG_SERVICE_ROLE_KEY, ARG_SUPABASE_URL};

    const PROVIDER_ENV: [&str; 3] = [
        "SUPABASE_URL",
        "SUPABASE_SERVICE_ROLE_KEY",
        "SUPABASE_ANON_KEY",
    ];

    fn without_provider_env<F: FnOnce()>(f: F) {
        temp_env::with_vars_unset(PROVIDER_ENV, f);
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "vet-api");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Auth gateway for a hosted identity provider".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                ("VET_API_HOST", None::<&str>),
                ("VET_API_PORT", None),
                ("VET_API_DISABLE_ME", None),
                ("VET_API_PROVIDER_TIMEOUT", None),
            ],
            || {
                let matches = new().get_matches_from(vec![
                    "vet-api",
                    "--supabase-url",
                    "https://abc.supabase.co",
                    "--supabase-service-role-key",
                    "service",
                    "--supabase-anon-key",
                    "anon",
                ]);

                assert_eq!(
                    matches.get_one::<String>(ARG_HOST).cloned(),
                    Some("0.0.0.0".to_string())
                );
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(3000));
                assert!(!matches.get_flag(ARG_DISABLE_ME));
                assert_eq!(
                    matches.get_one::<u64>(ARG_PROVIDER_TIMEOUT).copied(),
                    Some(10)
                );
            },
        );
    }

    #[test]
    fn test_check_args() {
        without_provider_env(|| {
            let matches = new().get_matches_from(vec![
                "vet-api",
                "--port",
                "8080",
                "--supabase-url",
                "https://abc.supabase.co",
                "--supabase-service-role-key",
                "service",
                "--supabase-anon-key",
                "anon",
                "--disable-me",
            ]);

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(8080));
            assert_eq!(
                matches.get_one::<String>(ARG_SUPABASE_URL).cloned(),
                Some("https://abc.supabase.co".to_string())
            );
            assert_eq!(
                matches.get_one::<String>(ARG_SERVICE_ROLE_KEY).cloned(),
                Some("service".to_string())
            );
            assert_eq!(
                matches.get_one::<String>(ARG_ANON_KEY).cloned(),
                Some("anon".to_string())
            );
            assert!(matches.get_flag(ARG_DISABLE_ME));
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("SUPABASE_URL", Some("https://abc.supabase.co")),
                ("SUPABASE_SERVICE_ROLE_KEY", Some("service")),
                ("SUPABASE_ANON_KEY", Some("anon")),
                ("VET_API_PORT", Some("443")),
                ("VET_API_DISABLE_ME", Some("true")),
                ("VET_API_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["vet-api"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>(ARG_SUPABASE_URL).cloned(),
                    Some("https://abc.supabase.co".to_string())
                );
                assert!(matches.get_flag(ARG_DISABLE_ME));
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_missing_provider_config_fails() {
        without_provider_env(|| {
            let result = new().try_get_matches_from(vec!["vet-api"]);
            assert!(result.is_err());
            if let Err(err) = result {
                assert!(err.to_string().contains("--supabase-url"));
            }
        });
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("VET_API_LOG_LEVEL", Some(level)),
                    ("SUPABASE_URL", Some("https://abc.supabase.co")),
                    ("SUPABASE_SERVICE_ROLE_KEY", Some("service")),
                    ("SUPABASE_ANON_KEY", Some("anon")),
                ],
                || {
                    let matches = new().get_matches_from(vec!["vet-api"]);
                    assert_eq!(
                        matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                        u8::try_from(index).ok()
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5_u8 {
            temp_env::with_vars(
                [
                    ("VET_API_LOG_LEVEL", None::<&str>),
                    ("SUPABASE_URL", Some("https://abc.supabase.co")),
                    ("SUPABASE_SERVICE_ROLE_KEY", Some("service")),
                    ("SUPABASE_ANON_KEY", Some("anon")),
                ],
                || {
                    let mut args = vec!["vet-api".to_string()];

                    // Add the appropriate number of "-v" flags based on the index
                    if index > 0 {
                        args.push(format!("-{}", "v".repeat(usize::from(index))));
                    }

                    let matches = new().get_matches_from(args);

                    assert_eq!(
                        matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                        Some(index)
                    );
                },
            );
        }
    }

    #[test]
    fn test_log_json_flag() {
        temp_env::with_vars(
            [
                ("VET_API_LOG_JSON", None::<&str>),
                ("SUPABASE_URL", Some("https://abc.supabase.co")),
                ("SUPABASE_SERVICE_ROLE_KEY", Some("service")),
                ("SUPABASE_ANON_KEY", Some("anon")),
            ],
            || {
                let matches = new().get_matches_from(vec!["vet-api", "--log-json"]);
                assert!(matches.get_flag(logging::ARG_LOG_JSON));
            },
        );
    }
}
