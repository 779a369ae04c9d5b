use std::collections::BTreeMap;

/// Which entry point the process runs.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Mode {
    Client,
    Server,
}

/// Flags each mode accepts, with the values allowed for them.
type AllowList = &'static [(&'static str, &'static [&'static str])];

const CLIENT_ARGS: AllowList = &[("-test", &["1234"]), ("-fullscreen", &["true", "false"])];
const SERVER_ARGS: AllowList = &[("-test", &["4321"])];

/// Parsed command line: the selected mode plus the allow-listed `-flag value` pairs.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LaunchArgs {
    pub mode: Mode,
    pub args: BTreeMap<String, String>,
}

impl LaunchArgs {
    /// Parses arguments (without the program name).
    ///
    /// `-env server` selects server mode; anything else, including no `-env`,
    /// selects the client. Pairs not on the mode's allow-list are dropped.
    pub fn parse<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let pairs = pairs(&args.into_iter().collect::<Vec<_>>());

        let mode = match pairs.get("-env").map(String::as_str) {
            Some("server") => Mode::Server,
            _ => Mode::Client,
        };

        let allowed = match mode {
            Mode::Client => CLIENT_ARGS,
            Mode::Server => SERVER_ARGS,
        };

        let args = pairs
            .into_iter()
            .filter(|(key, value)| {
                let keep = key != "-env" && is_allowed(allowed, key, value);
                if !keep && key != "-env" && key.starts_with('-') {
                    log::debug!("ignoring argument {key} {value}");
                }
                keep
            })
            .collect();

        Self { mode, args }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.args.get(key).map(String::as_str)
    }
}

/// Pairs every token with the token after it. A later occurrence of a key
/// replaces an earlier one.
///
/// Value tokens become keys too; the allow-list filters them out.
fn pairs(tokens: &[String]) -> BTreeMap<String, String> {
    tokens
        .windows(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}

fn is_allowed(allowed: AllowList, key: &str, value: &str) -> bool {
    allowed
        .iter()
        .any(|(flag, values)| *flag == key && values.contains(&value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> LaunchArgs {
        LaunchArgs::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn missing_env_selects_client() {
        let launch = parse(&[]);
        assert_eq!(launch.mode, Mode::Client);
        assert!(launch.args.is_empty());
    }

    #[test]
    fn env_server_selects_server() {
        assert_eq!(parse(&["-env", "server"]).mode, Mode::Server);
        assert_eq!(parse(&["-env", "client"]).mode, Mode::Client);
        assert_eq!(parse(&["-env", "SERVER"]).mode, Mode::Client);
    }

    #[test]
    fn allow_list_depends_on_mode() {
        let client = parse(&["-env", "client", "-test", "1234"]);
        assert_eq!(client.get("-test"), Some("1234"));

        let server = parse(&["-env", "server", "-test", "1234"]);
        assert_eq!(server.get("-test"), None);

        let server = parse(&["-env", "server", "-test", "4321"]);
        assert_eq!(server.get("-test"), Some("4321"));
    }

    #[test]
    fn unknown_flags_and_values_are_dropped() {
        let launch = parse(&["-test", "9999", "-port", "80", "-fullscreen", "true"]);
        assert_eq!(launch.args.len(), 1);
        assert_eq!(launch.get("-fullscreen"), Some("true"));
    }

    #[test]
    fn env_is_not_forwarded() {
        let launch = parse(&["-env", "server", "-test", "4321"]);
        assert!(launch.get("-env").is_none());
    }

    #[test]
    fn stray_tokens_and_trailing_flags_are_skipped() {
        let launch = parse(&["stray", "-test", "1234", "-fullscreen"]);
        assert_eq!(launch.get("-test"), Some("1234"));
        assert_eq!(launch.get("-fullscreen"), None);
    }

    #[test]
    fn flag_without_value_does_not_hide_the_next_pair() {
        let launch = parse(&["-test", "-fullscreen", "true"]);
        assert_eq!(launch.get("-fullscreen"), Some("true"));
        assert_eq!(launch.get("-test"), None);
    }

    #[test]
    fn value_tokens_never_become_arguments() {
        let launch = parse(&["-fullscreen", "-test", "1234"]);
        assert_eq!(launch.args.len(), 1);
        assert_eq!(launch.get("-test"), Some("1234"));
    }

    #[test]
    fn later_flag_wins() {
        let launch = parse(&["-fullscreen", "true", "-fullscreen", "false"]);
        assert_eq!(launch.get("-fullscreen"), Some("false"));
    }
}
