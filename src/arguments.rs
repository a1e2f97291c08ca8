/// Centralized argument handling for rsiwatch
///
/// Features:
/// - Centralized CMD_ARGS storage with thread-safe access
/// - Flag/value lookup helpers, both against the global store and against
///   an explicit slice (the slice form keeps config building pure)
/// - Help output listing recognized options and defaults
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
/// Used by tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => {
            // Fallback to env::args if mutex is poisoned
            env::args().collect()
        }
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    has_arg_in(&get_cmd_args(), arg)
}

/// Gets the value following a flag, or None if absent
pub fn get_arg_value(flag: &str) -> Option<String> {
    arg_value_in(&get_cmd_args(), flag)
}

/// Slice-based form of `has_arg`
pub fn has_arg_in(args: &[String], arg: &str) -> bool {
    args.iter().any(|a| a == arg)
}

/// Slice-based form of `get_arg_value`
pub fn arg_value_in(args: &[String], flag: &str) -> Option<String> {
    for (i, arg) in args.iter().enumerate() {
        if arg == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

// =============================================================================
// HELP SYSTEM
// =============================================================================

/// Displays the help menu with all recognized options and their defaults
pub fn print_help() {
    println!("rsiwatch - Binance RSI / Bollinger Telegram alert monitor");
    println!();
    println!("USAGE:");
    println!("    rsiwatch [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --symbol <SYMBOL>      Trading pair, auto-suffixed with the quote asset (default: BTC)");
    println!("    --quote <ASSET>        Quote asset used for auto-suffixing (default: USDT)");
    println!("    --timeframes <LIST>    Comma-separated kline intervals (default: 15m,1h,4h)");
    println!("    --period <N>           RSI smoothing period (default: 6)");
    println!("    --down <VALUE>         Lower RSI threshold, LONG side (default: 40)");
    println!("    --up <VALUE>           Upper RSI threshold, SHORT side (default: 60)");
    println!("    --sleep <SECONDS>      Sleep between successful cycles (default: 300)");
    println!("    --bb-period <N>        Bollinger lookback period (default: 20)");
    println!("    --bb-std <FACTOR>      Bollinger standard-deviation multiplier (default: 2.0)");
    println!("    --strategy <NAME>      Alert strategy: rsi | rsi-bb (default: rsi)");
    println!("    --long-op <OP>         Comparator for the LONG rule: < <= > >= == (default: <)");
    println!("    --short-op <OP>        Comparator for the SHORT rule (default: >)");
    println!("    --help, -h             Show this help message");
    println!();
    println!("DEBUG FLAGS:");
    println!("    --debug-system --debug-monitor --debug-market");
    println!("    --debug-indicator --debug-alert --debug-telegram");
    println!();
    println!("ENVIRONMENT (config.env or process env):");
    println!("    TELEGRAM_TOKEN         Telegram bot token (required)");
    println!("    CHAT_ID                Telegram chat id to notify (required)");
    println!();
    println!("EXAMPLES:");
    println!("    rsiwatch --symbol DOT --timeframes 15m,1h,4h --down 25 --up 70");
    println!("    rsiwatch --symbol BTC --strategy rsi-bb --timeframes 1h");
}

// =============================================================================
// COMMON ARGUMENT PATTERNS
// =============================================================================

pub mod patterns {
    use super::*;

    /// Checks for help flags
    pub fn is_help_requested() -> bool {
        has_arg("--help") || has_arg("-h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The tests below mutate the shared CMD_ARGS store; serialize them so
    // they cannot interleave.
    static ARGS_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_and_get_args() {
        let _guard = ARGS_LOCK.lock().unwrap();
        let test_args = vec![
            "rsiwatch".to_string(),
            "--symbol".to_string(),
            "DOT".to_string(),
        ];

        set_cmd_args(test_args.clone());
        assert_eq!(get_cmd_args(), test_args);
        assert!(has_arg("--symbol"));
        assert!(!has_arg("--strategy"));
        assert_eq!(get_arg_value("--symbol"), Some("DOT".to_string()));
        assert_eq!(get_arg_value("--quote"), None);
    }

    #[test]
    fn test_slice_helpers() {
        let args = vec![
            "rsiwatch".to_string(),
            "--period".to_string(),
            "14".to_string(),
            "--debug-monitor".to_string(),
        ];

        assert!(has_arg_in(&args, "--debug-monitor"));
        assert!(!has_arg_in(&args, "--debug-market"));
        assert_eq!(arg_value_in(&args, "--period"), Some("14".to_string()));
        // Trailing flag with no value
        assert_eq!(arg_value_in(&args, "--debug-monitor"), None);
    }

    #[test]
    fn test_help_pattern() {
        let _guard = ARGS_LOCK.lock().unwrap();
        set_cmd_args(vec!["rsiwatch".to_string(), "-h".to_string()]);
        assert!(patterns::is_help_requested());

        set_cmd_args(vec!["rsiwatch".to_string()]);
        assert!(!patterns::is_help_requested());
    }
}
