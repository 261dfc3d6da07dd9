const CYAN: &str = "\x1b[36m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";

macro_rules! env_or {
    ($key:literal, $default:literal) => {
        option_env!($key).unwrap_or($default)
    };
}

pub struct BannerInfo {
    pub version: &'static str,
    pub build_time: &'static str,
    pub commit_short: &'static str,
    pub profile: &'static str,
}

impl Default for BannerInfo {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            build_time: env_or!("BUILD_TIME_HUMAN", "unknown"),
            commit_short: env_or!("GIT_COMMIT_SHORT", "unknown"),
            profile: if cfg!(debug_assertions) {
                "debug"
            } else {
                "release"
            },
        }
    }
}

/// Prints the banner to stderr; stdout is reserved for the report.
pub fn print_banner(info: &BannerInfo) {
    eprintln!();
    eprintln!("{CYAN}    __    _ ___                                          {RESET}");
    eprintln!("{CYAN}   / /_  (_) (_)______  ______ ___  ____ ___  ____ ________  __{RESET}");
    eprintln!("{CYAN}  / __ \\/ / / / ___/ / / / __ `__ \\/ __ `__ \\/ __ `/ ___/ / / /{RESET}");
    eprintln!("{CYAN} / /_/ / / / (__  ) /_/ / / / / / / / / / / / /_/ / /  / /_/ / {RESET}");
    eprintln!("{CYAN}/_.___/_/_/_/____/\\__,_/_/ /_/ /_/_/ /_/ /_/\\__,_/_/   \\__, /  {RESET}");
    eprintln!("{CYAN}                                                      /____/   {RESET}");
    eprintln!("{DIM}========================================{RESET}");
    eprintln!();

    print_row("Version", info.version, CYAN);
    print_row("Build time", info.build_time, RESET);
    print_row("Commit", info.commit_short, RESET);
    print_row("Profile", info.profile, YELLOW);
    eprintln!();
}

fn print_row(label: &str, value: &'static str, color: &str) {
    eprintln!("  {BOLD}{label:<14}{RESET}{color}{value}{RESET}");
}
