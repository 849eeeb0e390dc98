//! CLI argument parsing with clap.

use clap::Parser;

/// Refresh a README with the latest Last.fm album collage.
#[derive(Parser, Debug)]
#[command(name = "readme-collage", version, about)]
pub struct Cli {
    /// How to embed the image: inline (data URI) or file.
    #[arg(short, long)]
    pub embed: Option<String>,

    /// Fetch this URL instead of the configured collage.
    #[arg(short, long)]
    pub url: Option<String>,

    /// README template path.
    #[arg(short, long)]
    pub template: Option<String>,

    /// Generated README path.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cli = Cli::parse_from(["readme-collage"]);
        assert!(cli.embed.is_none());
        assert!(cli.url.is_none());
        assert!(cli.template.is_none());
        assert!(cli.output.is_none());
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn all_options() {
        let cli = Cli::parse_from([
            "readme-collage",
            "-e",
            "file",
            "-u",
            "https://example.com/c.png",
            "-t",
            "tpl/custom.tmpl",
            "-o",
            "OUT.md",
            "--config",
            "c.toml",
            "-v",
        ]);
        assert_eq!(cli.embed.as_deref(), Some("file"));
        assert_eq!(cli.url.as_deref(), Some("https://example.com/c.png"));
        assert_eq!(cli.template.as_deref(), Some("tpl/custom.tmpl"));
        assert_eq!(cli.output.as_deref(), Some("OUT.md"));
        assert_eq!(cli.config.as_deref(), Some("c.toml"));
        assert!(cli.verbose);
    }

    #[test]
    fn positional_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["readme-collage", "extra"]).is_err());
    }
}
