use std::time::Duration;

use crate::commands::Command;
use clap::Parser;

#[derive(Debug, Parser)]
#[clap(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Options {
    #[command(flatten)]
    pub global: Global,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Parser)]
pub struct Global {
    /// Gives up on any single request after this many seconds. If not
    /// specified, requests may wait forever.
    #[clap(long, global(true), env("ACHIEVEMENT_THUMBS_TIMEOUT"))]
    pub timeout: Option<u64>,

    /// Sets verbosity level. Can be specified multiple times to increase the verbosity
    /// of this program.
    #[clap(long = "verbose", short, global(true), action(clap::ArgAction::Count))]
    pub verbosity: u8,
}

impl Global {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::thumbnail::ThumbnailSize;

    #[test]
    fn download_defaults() {
        let options = Options::try_parse_from([
            "achievement-thumbs",
            "download",
            "https://steamcommunity.com/stats/1177980/achievements",
        ])
        .unwrap();

        assert_eq!(options.global.verbosity, 0);

        let Command::Download(download) = options.command else {
            panic!("expected the download command");
        };
        assert_eq!(
            download.url.as_str(),
            "https://steamcommunity.com/stats/1177980/achievements"
        );
        assert_eq!(download.size, ThumbnailSize::default());
        assert!(download.output_dir.is_none());
    }

    #[test]
    fn global_flags_after_the_subcommand() {
        let options = Options::try_parse_from([
            "achievement-thumbs",
            "list",
            "https://steamcommunity.com/stats/1177980/achievements",
            "-vv",
            "--timeout",
            "15",
        ])
        .unwrap();

        assert_eq!(options.global.verbosity, 2);
        assert_eq!(options.global.timeout(), Some(Duration::from_secs(15)));
        assert!(matches!(options.command, Command::List(_)));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Options::try_parse_from([
            "achievement-thumbs",
            "download",
            "https://steamcommunity.com/stats/1/achievements",
            "--size",
            "64",
        ])
        .is_err());

        assert!(Options::try_parse_from(["achievement-thumbs", "download", "not a url"]).is_err());
    }
}
