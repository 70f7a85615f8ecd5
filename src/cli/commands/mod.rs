use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("veriface")
        .about("Face authentication with email OTP activation")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("VERIFACE_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("face-threshold")
                .long("face-threshold")
                .help("Maximum cosine distance for a face match")
                .default_value("0.6")
                .env("VERIFACE_FACE_THRESHOLD")
                .value_parser(clap::value_parser!(f32)),
        )
        .arg(
            Arg::new("otp-ttl")
                .long("otp-ttl")
                .help("Verification code lifetime in seconds")
                .default_value("600")
                .env("VERIFACE_OTP_TTL")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("otp-resend-cooldown")
                .long("otp-resend-cooldown")
                .help("Minimum seconds between verification code resends")
                .default_value("60")
                .env("VERIFACE_OTP_RESEND_COOLDOWN")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("signup-rate-cap")
                .long("signup-rate-cap")
                .help("Signup attempts allowed per source address per window")
                .default_value("5")
                .env("VERIFACE_SIGNUP_RATE_CAP")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("signup-rate-window")
                .long("signup-rate-window")
                .help("Signup rate limit window in seconds")
                .default_value("900")
                .env("VERIFACE_SIGNUP_RATE_WINDOW")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("session-ttl")
                .long("session-ttl")
                .help("Session lifetime in seconds")
                .default_value("43200")
                .env("VERIFACE_SESSION_TTL")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("VERIFACE_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "veriface");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Face authentication with email OTP activation"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                ("VERIFACE_PORT", None::<String>),
                ("VERIFACE_FACE_THRESHOLD", None),
                ("VERIFACE_OTP_TTL", None),
                ("VERIFACE_SIGNUP_RATE_CAP", None),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["veriface"]);

                assert_eq!(matches.get_one::<u16>("port").copied(), Some(8080));
                assert_eq!(
                    matches.get_one::<f32>("face-threshold").copied(),
                    Some(0.6)
                );
                assert_eq!(matches.get_one::<u64>("otp-ttl").copied(), Some(600));
                assert_eq!(
                    matches.get_one::<u64>("otp-resend-cooldown").copied(),
                    Some(60)
                );
                assert_eq!(
                    matches.get_one::<usize>("signup-rate-cap").copied(),
                    Some(5)
                );
                assert_eq!(
                    matches.get_one::<u64>("signup-rate-window").copied(),
                    Some(900)
                );
                assert_eq!(
                    matches.get_one::<u64>("session-ttl").copied(),
                    Some(43200)
                );
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("VERIFACE_PORT", Some("443")),
                ("VERIFACE_FACE_THRESHOLD", Some("0.45")),
                ("VERIFACE_OTP_TTL", Some("120")),
                ("VERIFACE_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["veriface"]);

                assert_eq!(matches.get_one::<u16>("port").copied(), Some(443));
                assert_eq!(
                    matches.get_one::<f32>("face-threshold").copied(),
                    Some(0.45)
                );
                assert_eq!(matches.get_one::<u64>("otp-ttl").copied(), Some(120));
                assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("VERIFACE_LOG_LEVEL", Some(level))], || {
                let command = new();
                let matches = command.get_matches_from(vec!["veriface"]);
                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    Some(index as u8)
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("VERIFACE_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["veriface".to_string()];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let command = new();

                let matches = command.get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    Some(index as u8)
                );
            });
        }
    }
}
