use anyhow::{anyhow, Context, Result};
use std::process::{Child, Command, Stdio};

/// The one playback primitive the widget needs.
pub trait Playback {
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    /// Move the play position back to the start of the clip.
    fn rewind(&mut self);
    fn is_at_start(&self) -> bool;
    /// True once, when the clip has stopped on its own since the last call.
    fn poll_ended(&mut self) -> bool;
}

/// Streams a clip through an external player process (mpv, ffplay, afplay).
///
/// A process cannot be resumed mid-stream, so pausing stops it and the next
/// `play` starts from zero again.
pub struct ProcessPlayer {
    program: String,
    args: Vec<String>,
    url: String,
    child: Option<Child>,
}

impl ProcessPlayer {
    /// `command` is the program followed by its leading arguments.
    pub fn new(command: &[String], url: &str) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| anyhow!("Audio player command is empty"))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            url: url.to_string(),
            child: None,
        })
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Playback for ProcessPlayer {
    fn play(&mut self) -> Result<()> {
        self.stop();
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(&self.url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Starting audio player '{}'", self.program))?;
        log::debug!("Azan player started (pid {})", child.id());
        self.child = Some(child);
        Ok(())
    }

    fn pause(&mut self) {
        self.stop();
    }

    fn rewind(&mut self) {
        self.stop();
    }

    fn is_at_start(&self) -> bool {
        self.child.is_none()
    }

    fn poll_ended(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => false,
            Ok(Some(status)) => {
                if !status.success() {
                    log::error!("Error playing azan: player exited with {}", status);
                }
                self.child = None;
                true
            }
            Err(e) => {
                log::error!("Error playing azan: {}", e);
                self.child = None;
                true
            }
        }
    }
}

impl Drop for ProcessPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_command_is_rejected() {
        assert!(ProcessPlayer::new(&[], "https://example.com/a.mp3").is_err());
    }

    #[test]
    fn missing_program_fails_to_play() {
        let command = vec!["azan-player-that-does-not-exist".to_string()];
        let mut player = ProcessPlayer::new(&command, "https://example.com/a.mp3").unwrap();

        assert!(player.play().is_err());
        assert!(player.is_at_start());
        assert!(!player.poll_ended());
    }
}
