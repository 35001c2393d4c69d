//! Local MP3 playback through whatever player the OS provides.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::config::constants::FALLBACK_AUDIO_FILE;
use crate::error::{Error, Result};
use crate::utils::temp_file::TempFile;

/// An executable we know how to drive, with the flags that make it play
/// one file headlessly and exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerCandidate {
    pub name: &'static str,
    pub args: &'static [&'static str],
}

const MPV: PlayerCandidate = PlayerCandidate {
    name: "mpv",
    args: &["--no-video", "--really-quiet"],
};

const FFPLAY: PlayerCandidate = PlayerCandidate {
    name: "ffplay",
    args: &["-nodisp", "-autoexit", "-loglevel", "quiet"],
};

/// Players in order of preference for the current OS
#[cfg(target_os = "macos")]
pub fn default_candidates() -> Vec<PlayerCandidate> {
    vec![
        PlayerCandidate {
            name: "afplay",
            args: &[],
        },
        MPV,
        FFPLAY,
    ]
}

#[cfg(target_os = "linux")]
pub fn default_candidates() -> Vec<PlayerCandidate> {
    vec![
        MPV,
        PlayerCandidate {
            name: "pw-play",
            args: &[],
        },
        PlayerCandidate {
            name: "paplay",
            args: &[],
        },
        FFPLAY,
    ]
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub fn default_candidates() -> Vec<PlayerCandidate> {
    vec![MPV, FFPLAY]
}

/// A candidate that was actually found on the search path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: &'static str,
    pub path: PathBuf,
    pub args: &'static [&'static str],
}

fn executable_in(dir: &Path, command: &str) -> Option<PathBuf> {
    let candidate = dir.join(command);
    if candidate.is_file() {
        return Some(candidate);
    }

    #[cfg(windows)]
    {
        for ext in [".exe", ".bat", ".cmd"] {
            let with_ext = dir.join(format!("{command}{ext}"));
            if with_ext.is_file() {
                return Some(with_ext);
            }
        }
    }

    None
}

/// First candidate present in any directory of `search_path`
pub fn find_player_in(candidates: &[PlayerCandidate], search_path: &OsStr) -> Option<Player> {
    let dirs: Vec<PathBuf> = env::split_paths(search_path).collect();

    candidates.iter().find_map(|candidate| {
        dirs.iter()
            .find_map(|dir| executable_in(dir, candidate.name))
            .map(|path| Player {
                name: candidate.name,
                path,
                args: candidate.args,
            })
    })
}

/// What happened to a piece of synthesized audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Played { player: &'static str },
    /// No player was available; the MP3 was written here instead
    Saved(PathBuf),
}

/// Plays MP3 bytes with the first available player, or saves them
#[derive(Debug, Clone)]
pub struct Playback {
    candidates: Vec<PlayerCandidate>,
    search_path: Option<OsString>,
    fallback_path: PathBuf,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    pub fn new() -> Self {
        Self {
            candidates: default_candidates(),
            search_path: None,
            fallback_path: PathBuf::from(FALLBACK_AUDIO_FILE),
        }
    }

    pub fn with_candidates(mut self, candidates: Vec<PlayerCandidate>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Search these directories instead of `$PATH`
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    pub fn with_fallback_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback_path = path.into();
        self
    }

    pub fn find_player(&self) -> Option<Player> {
        let search_path = match &self.search_path {
            Some(path) => path.clone(),
            None => env::var_os("PATH")?,
        };
        find_player_in(&self.candidates, &search_path)
    }

    /// Play `audio` to completion, or persist it when no player exists
    pub async fn play_mp3(&self, audio: &[u8]) -> Result<PlaybackOutcome> {
        let Some(player) = self.find_player() else {
            std::fs::write(&self.fallback_path, audio)?;
            tracing::debug!(path = ?self.fallback_path, "No audio player found, saved MP3");
            return Ok(PlaybackOutcome::Saved(self.fallback_path.clone()));
        };

        // Removed on drop, including when the player fails
        let temp = TempFile::write_mp3(audio)?;
        run_player(&player, temp.path()).await?;

        Ok(PlaybackOutcome::Played {
            player: player.name,
        })
    }
}

/// Run `player` on `file` and wait for it to exit
pub async fn run_player(player: &Player, file: &Path) -> Result<()> {
    tracing::debug!(player = player.name, file = ?file, "Starting playback");

    let status = Command::new(&player.path)
        .args(player.args)
        .arg(file)
        .status()
        .await
        .map_err(|e| Error::Player {
            player: player.name.to_string(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(Error::Player {
            player: player.name.to_string(),
            reason: status.to_string(),
        });
    }

    Ok(())
}
