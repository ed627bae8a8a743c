use clap::Parser;

/// LazyWin11 - post-install setup for Windows 11 via winget
#[derive(Parser, Debug)]
#[command(name = "lazywin11")]
#[command(about = "Interactive post-install setup for Windows 11 using winget")]
#[command(version)]
pub struct Cli {
    /// Dry-run mode: show what would be done without making changes.
    ///
    /// Menus are still shown. Installs, downloads and UAC elevation are
    /// skipped and logged instead.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
