use clap::Parser;

/// mac-cleanup — reclaim disk space taken by caches, logs and developer tools
#[derive(Parser, Debug)]
#[command(
    name = "mac-cleanup",
    version,
    about = "Reclaim disk space by sweeping system, user, and developer-tool caches",
    long_about = "mac-cleanup asks for administrator rights once, then deletes known cache,\n\
                  log, and temporary locations and runs the native cleanup commands of\n\
                  installed package managers, container engines, and SDKs.",
    after_help = "EXAMPLES:\n  \
        mac-cleanup              Sweep everything that is installed\n  \
        mac-cleanup -u           Update and upgrade Homebrew first\n  \
        mac-cleanup -v           Trace every step on stderr\n  \
        mac-cleanup --no-color   Plain diagnostics"
)]
pub struct Cli {
    /// Trace every step on stderr
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Run Homebrew's update and upgrade before cleaning
    #[arg(long, short)]
    pub update: bool,

    /// Accepted for compatibility; has no effect
    #[arg(short = 'n', hide = true)]
    pub legacy_n: bool,
}
