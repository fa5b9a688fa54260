use super::targets::{CleanupTarget, Privilege, ToolStep};

// ─── Target catalog ───────────────────────────────────────────────────────────
//
// Each target has exactly one privilege policy. Anything under the
// operator's home runs unprivileged; system locations and system services
// run elevated.

/// Trash, system caches and system logs
pub fn system_targets() -> Vec<CleanupTarget> {
    vec![
        CleanupTarget::paths("Volume Trash", Privilege::Elevated, &["/Volumes/*/.Trashes"]),
        CleanupTarget::paths("User Trash", Privilege::User, &["~/.Trash"]),
        CleanupTarget::paths(
            "System Caches",
            Privilege::Elevated,
            &["/Library/Caches", "/System/Library/Caches"],
        ),
        CleanupTarget::paths("User Caches", Privilege::User, &["~/Library/Caches"]),
        CleanupTarget::paths(
            "System Logs",
            Privilege::Elevated,
            &[
                "/private/var/log/asl/*.asl",
                "/Library/Logs/DiagnosticReports",
                "/Library/Logs/CreativeCloud",
                "/Library/Logs/Adobe",
                "/Library/Logs/adobegc.log",
            ],
        ),
        CleanupTarget::paths(
            "User Logs",
            Privilege::User,
            &[
                "~/Library/Logs",
                "~/Library/Containers/com.apple.mail/Data/Library/Logs/Mail",
                "~/Library/Logs/CoreSimulator",
            ],
        ),
    ]
}

/// Application caches under the home directory
pub fn application_targets() -> Vec<CleanupTarget> {
    vec![
        CleanupTarget::paths(
            "Adobe Media Cache",
            Privilege::User,
            &[
                "~/Library/Application Support/Adobe/Common/Media Cache Files",
                "~/Library/Application Support/Adobe/Common/Media Cache",
            ],
        ),
        CleanupTarget::paths(
            "Google Chrome Cache",
            Privilege::User,
            &["~/Library/Application Support/Google/Chrome/Default/Application Cache"],
        ),
        CleanupTarget::paths(
            "iOS Applications",
            Privilege::User,
            &["~/Music/iTunes/iTunes Media/Mobile Applications"],
        ),
        CleanupTarget::paths(
            "iOS Device Backups",
            Privilege::User,
            &["~/Library/Application Support/MobileSync/Backup"],
        ),
        CleanupTarget::paths(
            "Dropbox Cache",
            Privilege::User,
            &["~/Dropbox/.dropbox.cache"],
        )
        .when_dir("~/Dropbox"),
        CleanupTarget::paths(
            "Google Drive File Stream Cache",
            Privilege::User,
            &["~/Library/Application Support/Google/DriveFS/[0-9a-zA-Z]*/content_cache"],
        )
        .when_dir("~/Library/Application Support/Google/DriveFS"),
        CleanupTarget::paths(
            "Steam Caches and Logs",
            Privilege::User,
            &[
                "~/Library/Application Support/Steam/appcache",
                "~/Library/Application Support/Steam/depotcache",
                "~/Library/Application Support/Steam/logs",
                "~/Library/Application Support/Steam/steamapps/shadercache",
                "~/Library/Application Support/Steam/steamapps/temp",
                "~/Library/Application Support/Steam/steamapps/download",
            ],
        )
        .when_dir("~/Library/Application Support/Steam"),
        CleanupTarget::paths(
            "Minecraft Logs",
            Privilege::User,
            &[
                "~/Library/Application Support/minecraft/logs",
                "~/Library/Application Support/minecraft/crash-reports",
                "~/Library/Application Support/minecraft/webcache",
                "~/Library/Application Support/minecraft/webcache2",
                "~/Library/Application Support/minecraft/launcher_cef_log.txt",
                "~/Library/Application Support/minecraft/command_history.txt",
            ],
        )
        .when_dir("~/Library/Application Support/minecraft"),
        CleanupTarget::paths(
            "Lunar Client Logs",
            Privilege::User,
            &[
                "~/.lunarclient/game-cache",
                "~/.lunarclient/launcher-cache",
                "~/.lunarclient/logs",
                "~/.lunarclient/offline/*/logs",
                "~/.lunarclient/offline/files/*/logs",
            ],
        )
        .when_dir("~/.lunarclient"),
        CleanupTarget::paths("Wget Logs and Hosts", Privilege::User, &["~/wget-log", "~/.wget-hsts"]),
        CleanupTarget::paths("Cacher Logs", Privilege::User, &["~/.cacher/logs"])
            .when_dir("~/.cacher"),
    ]
}

/// IDE, SDK and build tool caches on disk
pub fn developer_targets() -> Vec<CleanupTarget> {
    vec![
        CleanupTarget::paths(
            "Xcode Derived Data and Archives",
            Privilege::User,
            &[
                "~/Library/Developer/Xcode/DerivedData",
                "~/Library/Developer/Xcode/Archives",
                "~/Library/Developer/Xcode/iOS Device Logs",
            ],
        ),
        CleanupTarget::tool(
            "iOS Simulators",
            "xcrun",
            vec![
                ToolStep::user("xcrun", &["simctl", "shutdown", "all"]),
                ToolStep::user("xcrun", &["simctl", "erase", "all"]),
            ],
        ),
        CleanupTarget::paths("pip Cache", Privilege::User, &["~/Library/Caches/pip"]),
        CleanupTarget::paths("pyenv Cache", Privilege::User, &["~/.pyenv/cache"])
            .when_tool("pyenv"),
        CleanupTarget::paths("Gradle Cache", Privilege::User, &["~/.gradle/caches"])
            .when_dir("~/.gradle/caches"),
        CleanupTarget::paths(
            "Android Studio Caches",
            Privilege::User,
            &["~/Library/Caches/Google/AndroidStudio*"],
        )
        .when_dir("~/Library/Caches/Google"),
        CleanupTarget::paths("Android SDK Cache", Privilege::User, &["~/.android/cache"])
            .when_dir("~/.android"),
        CleanupTarget::paths("JetBrains Caches", Privilege::User, &["~/Library/Caches/JetBrains/*"])
            .when_dir("~/Library/Caches/JetBrains"),
        CleanupTarget::paths(
            "Homebrew Download Cache",
            Privilege::User,
            &["~/Library/Caches/Homebrew"],
        )
        .when_tool("brew"),
    ]
}

/// Native cleanup subcommands of package managers and container engines
pub fn tool_targets() -> Vec<CleanupTarget> {
    vec![
        CleanupTarget::tool(
            "Homebrew",
            "brew",
            vec![
                ToolStep::user("brew", &["update"]).on_update(),
                ToolStep::user("brew", &["upgrade"]).on_update(),
                ToolStep::user("brew", &["cleanup", "-s"]),
                ToolStep::user("brew", &["tap", "--repair"]),
            ],
        ),
        CleanupTarget::tool("Ruby Gems", "gem", vec![ToolStep::user("gem", &["cleanup"])]),
        CleanupTarget::tool(
            "Docker",
            "docker",
            vec![
                ToolStep::user("docker", &["container", "prune", "-f"]),
                ToolStep::user("docker", &["image", "prune", "-f"]),
                ToolStep::user("docker", &["volume", "prune", "-f"]),
                ToolStep::user("docker", &["network", "prune", "-f"]),
            ],
        ),
        CleanupTarget::tool(
            "npm Cache",
            "npm",
            vec![ToolStep::user("npm", &["cache", "clean", "--force"])],
        ),
        CleanupTarget::tool(
            "Yarn Cache",
            "yarn",
            vec![ToolStep::user("yarn", &["cache", "clean", "--force"])],
        ),
        CleanupTarget::tool("pnpm Store", "pnpm", vec![ToolStep::user("pnpm", &["store", "prune"])]),
        CleanupTarget::tool(
            "CocoaPods Cache",
            "pod",
            vec![ToolStep::user("pod", &["cache", "clean", "--all"])],
        ),
        CleanupTarget::tool(
            "Go Module Cache",
            "go",
            vec![ToolStep::user("go", &["clean", "-modcache"])],
        ),
        CleanupTarget::tool(
            "Composer Cache",
            "composer",
            vec![ToolStep::user("composer", &["clearcache"])],
        ),
        CleanupTarget::tool(
            "Conda Cache",
            "conda",
            vec![ToolStep::user("conda", &["clean", "--all", "-y"])],
        ),
    ]
}

/// System services: DNS cache and inactive memory
pub fn maintenance_targets() -> Vec<CleanupTarget> {
    vec![
        CleanupTarget::tool(
            "DNS Cache",
            "dscacheutil",
            vec![
                ToolStep::elevated("dscacheutil", &["-flushcache"]),
                ToolStep::elevated("killall", &["-HUP", "mDNSResponder"]),
            ],
        ),
        CleanupTarget::tool("Inactive Memory", "purge", vec![ToolStep::elevated("purge", &[])]),
    ]
}

/// The full sweep, in narration order
pub fn default_targets() -> Vec<CleanupTarget> {
    let mut targets = Vec::new();
    targets.extend(system_targets());
    targets.extend(application_targets());
    targets.extend(developer_targets());
    targets.extend(tool_targets());
    targets.extend(maintenance_targets());
    targets
}
