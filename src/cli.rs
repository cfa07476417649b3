use clap::Parser;

/// regsweep — retention-driven tag cleanup for container registries
#[derive(Parser, Debug)]
#[command(name = "regsweep", version, about)]
pub struct Cli {
    /// Registry URL (e.g., http://localhost:5000)
    #[arg(long, env = "REGSWEEP_REGISTRY")]
    pub registry: String,

    /// Repository path to clean up
    #[arg(long)]
    pub repo: String,

    /// Delete tags whose name matches this regex (deletion is opt-in)
    #[arg(long)]
    pub delete_regex: Option<String>,

    /// Never delete tags matching this regex, even when they also match
    /// --delete-regex
    #[arg(long)]
    pub keep_regex: Option<String>,

    /// Keep the N most recently written matching tags
    #[arg(long)]
    pub keep_n: Option<usize>,

    /// Only delete tags older than N days
    #[arg(long)]
    pub older_than: Option<i64>,

    /// Tags to request per listing page
    #[arg(long, default_value_t = 100)]
    pub page_size: usize,

    /// Wall-clock budget for the whole run, in seconds
    #[arg(long, default_value_t = 250)]
    pub timeout: u64,

    /// Process every page to completion regardless of duration
    #[arg(long, default_value_t = false)]
    pub disable_timeout: bool,

    /// Verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
